//! Third-person camera rig: orbit, tilt, and zoom around a followed target.

use bevy_ecs::prelude::Component;
use glam::{Quat, Vec3};
use ryssa_config::{CameraConfig, ConfigError};
use ryssa_ecs::InputState;
use tracing::debug;

use crate::error::PlayerError;

const FULL_TURN_DEG: f32 = 360.0;

/// Where the camera sits and how it is oriented after a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub rotation: Quat,
}

/// Rotation for compass-style angles in degrees.
///
/// Positive yaw turns right (clockwise seen from above), positive tilt looks
/// down. The rig looks along the rotated -Z axis.
pub fn orbit_rotation(tilt_deg: f32, yaw_deg: f32) -> Quat {
    yaw_rotation(yaw_deg) * Quat::from_rotation_x(-tilt_deg.to_radians())
}

/// Yaw-only rotation applied to the followed target.
pub fn yaw_rotation(yaw_deg: f32) -> Quat {
    Quat::from_rotation_y(-yaw_deg.to_radians())
}

/// Orbit camera state. Angles are stored in degrees.
#[derive(Component, Clone, Debug)]
pub struct CameraRig {
    settings: CameraConfig,
    /// Distance from the target.
    zoom: f32,
    /// Downward look angle.
    tilt: f32,
    /// Compass heading.
    yaw: f32,
}

impl CameraRig {
    /// Build a rig from the camera's starting transform relative to `target`.
    ///
    /// The initial zoom is the camera's distance to the target and the angles
    /// are those of the camera-to-target direction; all three are clamped to
    /// the configured ranges. A missing target or an empty range is an
    /// initialization error.
    pub fn from_transform(
        settings: CameraConfig,
        camera_position: Vec3,
        camera_rotation: Quat,
        target: Option<Vec3>,
    ) -> Result<Self, PlayerError> {
        let target = target.ok_or(PlayerError::MissingReference {
            component: "CameraRig",
            reference: "target",
        })?;
        check_settings(&settings)?;

        let offset = target - camera_position;
        let zoom = offset.length();
        let forward = if zoom > f32::EPSILON {
            offset / zoom
        } else {
            camera_rotation * Vec3::NEG_Z
        };
        let tilt = (-forward.y).clamp(-1.0, 1.0).asin().to_degrees();
        let yaw = forward.x.atan2(-forward.z).to_degrees();

        let mut rig = Self {
            settings,
            zoom,
            tilt,
            yaw,
        };
        rig.clamp_all();
        debug!(zoom = rig.zoom, tilt = rig.tilt, yaw = rig.yaw, "Camera rig initialized");
        Ok(rig)
    }

    pub fn settings(&self) -> &CameraConfig {
        &self.settings
    }

    /// Swap in new speeds and ranges, re-clamping the current state.
    ///
    /// Settings with an empty range are refused and the old ones kept.
    pub fn set_settings(&mut self, settings: CameraConfig) -> Result<(), PlayerError> {
        check_settings(&settings)?;
        self.settings = settings;
        self.clamp_all();
        Ok(())
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn tilt(&self) -> f32 {
        self.tilt
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Yaw in radians, as written to the followed target.
    pub fn yaw_radians(&self) -> f32 {
        self.yaw.to_radians()
    }

    /// Current camera rotation.
    pub fn rotation(&self) -> Quat {
        orbit_rotation(self.tilt, self.yaw)
    }

    /// Fold one frame of pointer and scroll input into the angles and zoom.
    pub fn apply_input(&mut self, input: &InputState) {
        let (dx, dy) = input.pointer_delta;
        self.zoom -= input.scroll_delta * self.settings.zoom_speed;
        self.tilt -= dy * self.settings.tilt_speed;
        self.yaw += dx * self.settings.yaw_speed;
        self.clamp_all();
    }

    /// Camera pose framing `target_position` at the current angles and zoom.
    ///
    /// The camera's forward axis passes exactly through the target.
    pub fn pose(&self, target_position: Vec3) -> CameraPose {
        let rotation = self.rotation();
        CameraPose {
            position: target_position - (rotation * Vec3::NEG_Z) * self.zoom,
            rotation,
        }
    }

    /// One variable-rate tick: apply input, then frame the target.
    pub fn tick(&mut self, input: &InputState, target_position: Vec3) -> CameraPose {
        self.apply_input(input);
        self.pose(target_position)
    }

    fn clamp_all(&mut self) {
        let s = &self.settings;
        self.zoom = self.zoom.clamp(s.min_zoom, s.max_zoom);
        self.tilt = self.tilt.clamp(s.min_tilt, s.max_tilt);
        self.yaw = match s.yaw_limits {
            Some((min, max)) => self.yaw.clamp(min, max),
            None => {
                // rem_euclid can round tiny negatives up to a full turn.
                let wrapped = self.yaw.rem_euclid(FULL_TURN_DEG);
                if wrapped >= FULL_TURN_DEG { 0.0 } else { wrapped }
            }
        };
    }
}

fn check_settings(settings: &CameraConfig) -> Result<(), PlayerError> {
    settings.validate().map_err(|err| PlayerError::InvalidRange {
        component: "CameraRig",
        setting: match err {
            ConfigError::Invalid { setting, .. } => setting,
            _ => "camera",
        },
    })
}
