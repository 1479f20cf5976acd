//! System set definitions and ordering constraints for engine stages.
//!
//! The fixed stage carries the one ordering the gameplay core depends on:
//! climb state must be resolved before locomotion integrates forces, so the
//! grounded override and climb velocity are visible in the same step.

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::Schedule;

/// Sets for systems in the PreUpdate stage.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PreUpdateSet {
    /// Reset per-frame input transients.
    ClearInput,
    /// Write this frame's axes, buttons and pointer deltas into InputState.
    Input,
}

/// Sets for systems in the FixedUpdate stage.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FixedUpdateSet {
    /// Collect trigger overlap events (climbable volumes).
    TriggerDetection,
    /// Run the climb state machine and publish the grounded override.
    ClimbResolve,
    /// Locomotion integration: velocity blending, extra gravity, displacement.
    ForceApplication,
    /// Step the physics engine.
    PhysicsStep,
    /// Copy physics results back into Position/Rotation.
    PhysicsSync,
}

/// Sets for systems in the Update stage.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum UpdateSet {
    /// Input sampling, ground test and jump.
    Locomotion,
    /// Camera rig orbit, zoom and follow.
    Camera,
}

/// Configure ordering constraints for the PreUpdate stage.
pub fn configure_preupdate_ordering(schedule: &mut Schedule) {
    schedule.configure_sets(PreUpdateSet::ClearInput.before(PreUpdateSet::Input));
}

/// Configure ordering constraints for the FixedUpdate stage.
pub fn configure_fixedupdate_ordering(schedule: &mut Schedule) {
    schedule.configure_sets((
        FixedUpdateSet::TriggerDetection.before(FixedUpdateSet::ClimbResolve),
        FixedUpdateSet::ClimbResolve.before(FixedUpdateSet::ForceApplication),
        FixedUpdateSet::ForceApplication.before(FixedUpdateSet::PhysicsStep),
        FixedUpdateSet::PhysicsStep.before(FixedUpdateSet::PhysicsSync),
    ));
}

/// Configure ordering constraints for the Update stage.
///
/// Locomotion reads the camera yaw of the previous frame; the camera then
/// follows the player's post-movement position.
pub fn configure_update_ordering(schedule: &mut Schedule) {
    schedule.configure_sets(UpdateSet::Locomotion.before(UpdateSet::Camera));
}

/// Validate all schedules by forcing graph initialization.
pub fn validate_schedules(schedules: &mut crate::EngineSchedules, world: &mut World) {
    schedules.initialize_all(world);
}
