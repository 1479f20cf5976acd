//! ECS world setup, schedule definitions, core component types, and system ordering.
//!
//! Provides the [`World`](bevy_ecs::world::World) factory and the
//! [`EngineSchedules`] runner that drives the variable-rate and fixed-rate
//! ticks of a play session.

mod components;
mod input;
mod schedule;
mod system_ordering;
mod time;
mod world;

pub use components::{Name, Position, Rotation};
pub use input::{ACTION_JUMP, ACTION_SPRINT, InputState};
pub use schedule::{EngineSchedule, EngineSchedules};
pub use system_ordering::{
    FixedUpdateSet, PreUpdateSet, UpdateSet, configure_fixedupdate_ordering,
    configure_preupdate_ordering, configure_update_ordering, validate_schedules,
};
pub use time::TimeRes;
pub use world::{create_world, register_core_resources};
