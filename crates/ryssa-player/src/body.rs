//! The physics boundary the player core drives.
//!
//! The controllers never talk to a physics engine directly. They write
//! velocities, accelerations and displacements through [`PlayerBody`] and ask
//! [`GroundSensor`] whether anything solid lies under the feet.

use glam::Vec3;

/// A player's physical body as seen by the controllers.
///
/// Force-integrated bodies use the velocity/acceleration methods; kinematic
/// bodies use [`move_by`](PlayerBody::move_by). Implementations may support
/// either or both.
pub trait PlayerBody {
    /// Current world-space position in meters.
    fn position(&self) -> Vec3;

    /// Current linear velocity in m/s.
    fn velocity(&self) -> Vec3;

    /// Overwrite the linear velocity.
    fn set_velocity(&mut self, velocity: Vec3);

    /// Apply a mass-independent acceleration for `dt` seconds.
    fn add_acceleration(&mut self, acceleration: Vec3, dt: f32);

    /// Toggle the engine's own gravity integration for this body.
    fn set_gravity_enabled(&mut self, enabled: bool);

    /// Whether the engine integrates gravity for this body.
    fn gravity_enabled(&self) -> bool;

    /// Face the body toward `yaw` (compass radians, positive turns right).
    fn set_yaw(&mut self, yaw: f32);

    /// Move by `displacement` with collision resolution.
    ///
    /// Returns `true` if the body ends the move standing on ground.
    fn move_by(&mut self, displacement: Vec3, dt: f32) -> bool;
}

/// A downward sphere cast used as the physical ground test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereCast {
    /// Cast origin in world space.
    pub origin: Vec3,
    /// Sphere radius.
    pub radius: f32,
    /// Unit direction of travel.
    pub direction: Vec3,
    /// Maximum travel distance.
    pub max_distance: f32,
    /// Collision layers that count as hits.
    pub layer_mask: u32,
}

/// Answers shape-cast queries against the collision world.
pub trait GroundSensor {
    /// Returns `true` if the swept sphere hits a collider on `cast.layer_mask`.
    fn sphere_cast(&self, cast: &SphereCast) -> bool;
}
