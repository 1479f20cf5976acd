//! Engine-independent player core: camera rig, locomotion, climbing, and the
//! obstruction fade effect.
//!
//! Everything here talks to physics through the [`PlayerBody`] and
//! [`GroundSensor`] traits, so the controllers run unchanged against Rapier or
//! a test double.

pub mod body;
pub mod camera_rig;
pub mod climb;
pub mod climb_profile;
pub mod error;
pub mod ground;
pub mod locomotion;
pub mod obstruction_fade;
pub mod player;

#[cfg(test)]
mod testing;

pub use body::{GroundSensor, PlayerBody, SphereCast};
pub use camera_rig::{CameraPose, CameraRig, orbit_rotation, yaw_rotation};
pub use climb::{ClimbController, ClimbPhase, Stamina, TriggerEvent};
pub use climb_profile::ClimbProfile;
pub use error::{PlayerError, ProfileError};
pub use ground::GroundContact;
pub use locomotion::{
    ForceIntegration, KinematicDisplacement, LocomotionController, LocomotionStrategy, MoveIntent,
    camera_relative_direction,
};
pub use obstruction_fade::{BlendMode, FadeMaterials, ObstructionFade};
pub use player::Player;
