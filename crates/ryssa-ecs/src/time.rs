//! Time resource for the ECS world.

use bevy_ecs::prelude::*;

/// Frame and fixed-step timing, updated by [`EngineSchedules::run`](crate::EngineSchedules::run).
#[derive(Resource, Debug, Clone, Default)]
pub struct TimeRes {
    /// Seconds elapsed since the previous frame.
    pub delta: f32,
    /// Length of one fixed step in seconds.
    pub fixed_delta: f32,
    /// Total simulated seconds.
    pub elapsed: f64,
    /// Frames run so far.
    pub frame: u64,
    /// Fixed steps run so far.
    pub fixed_tick: u64,
}
