//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level gameplay configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Third-person camera rig tuning.
    pub camera: CameraConfig,
    /// Player locomotion tuning.
    pub locomotion: LocomotionConfig,
    /// Climbing thresholds and stamina pool.
    pub climb: ClimbConfig,
    /// Obstruction fade (camera clipping) settings.
    pub fade: FadeConfig,
    /// Physics world settings.
    pub physics: PhysicsConfig,
    /// Session-wide settings.
    pub session: SessionConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Camera rig configuration. Angles are in degrees.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Distance change per unit of scroll.
    pub zoom_speed: f32,
    /// Closest allowed distance to the target.
    pub min_zoom: f32,
    /// Farthest allowed distance from the target.
    pub max_zoom: f32,
    /// Tilt change per unit of vertical pointer movement.
    pub tilt_speed: f32,
    /// Lowest tilt (degrees below the horizon the camera looks).
    pub min_tilt: f32,
    /// Highest tilt.
    pub max_tilt: f32,
    /// Yaw change per unit of horizontal pointer movement.
    pub yaw_speed: f32,
    /// Optional yaw range. `None` lets the camera orbit freely.
    pub yaw_limits: Option<(f32, f32)>,
}

/// Which physics primitive drives the player.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum,
)]
pub enum LocomotionStrategyKind {
    /// Dynamic rigid body steered with accelerations.
    #[default]
    Force,
    /// Kinematic body moved by explicit displacements.
    Kinematic,
}

/// Ground check geometry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GroundCheckConfig {
    /// Cast origin offset along the down axis. Negative values raise the origin.
    pub sphere_offset: f32,
    /// Radius of the cast sphere.
    pub sphere_radius: f32,
    /// Maximum cast distance below the origin.
    pub distance: f32,
    /// Collision layers counted as ground.
    pub layer_mask: u32,
}

/// Player locomotion configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Physics primitive used for movement.
    pub strategy: LocomotionStrategyKind,
    /// Horizontal speed in m/s.
    pub move_speed: f32,
    /// Speed multiplier while sprint is held.
    pub sprint_multiplier: f32,
    /// How quickly velocity converges on the target velocity.
    pub acceleration: f32,
    /// Fraction of the target velocity available while airborne.
    pub air_control_multiplier: f32,
    /// Upward speed set by a jump, in m/s.
    pub jump_force: f32,
    /// Extra downward acceleration applied while airborne.
    pub gravity_multiplier: f32,
    /// Downward acceleration integrated by the kinematic strategy, in m/s².
    pub kinematic_gravity: f32,
    /// Ground check geometry.
    pub ground_check: GroundCheckConfig,
}

/// Climbing configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClimbConfig {
    /// Vertical input magnitude at or below which climbing stops.
    pub deadzone: f32,
    /// Stamina pool size.
    pub stamina_max: f32,
    /// Stamina regained per second while not climbing.
    pub stamina_regen_per_second: f32,
    /// Fraction of the pool that must be restored before climbing again after exhaustion.
    pub stamina_resume_fraction: f32,
}

/// Obstruction fade configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FadeConfig {
    /// Alpha that obstructing materials fade toward (0.0 - 1.0).
    pub transparent_alpha: f32,
    /// Fade rate; multiplied by frame time to form the lerp factor.
    pub fade_speed: f32,
    /// Alpha distance from the original at which a material counts as restored.
    pub restore_epsilon: f32,
    /// Only colliders carrying this tag are faded.
    pub cull_tag: String,
}

/// Physics world configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Vertical gravity in m/s².
    pub gravity_y: f32,
    /// Fixed simulation rate in Hz.
    pub fixed_hz: f64,
    /// Fixed steps allowed per frame before the accumulator is left to lag.
    pub max_fixed_steps: u32,
}

/// Session configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Lock and hide the cursor while playing.
    pub lock_cursor: bool,
    /// Number of frames the headless session runs.
    pub frames: u32,
    /// Variable frame time used by the headless session, in seconds.
    pub frame_dt: f64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            zoom_speed: 10.0,
            min_zoom: 5.0,
            max_zoom: 20.0,
            tilt_speed: 2.0,
            min_tilt: 20.0,
            max_tilt: 80.0,
            yaw_speed: 2.0,
            yaw_limits: None,
        }
    }
}

impl Default for GroundCheckConfig {
    fn default() -> Self {
        Self {
            sphere_offset: -0.5,
            sphere_radius: 0.3,
            distance: 0.2,
            layer_mask: u32::MAX,
        }
    }
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            strategy: LocomotionStrategyKind::Force,
            move_speed: 5.0,
            sprint_multiplier: 1.5,
            acceleration: 10.0,
            air_control_multiplier: 0.5,
            jump_force: 8.0,
            gravity_multiplier: 2.0,
            kinematic_gravity: 20.0,
            ground_check: GroundCheckConfig::default(),
        }
    }
}

impl Default for ClimbConfig {
    fn default() -> Self {
        Self {
            deadzone: 0.1,
            stamina_max: 10.0,
            stamina_regen_per_second: 2.0,
            stamina_resume_fraction: 0.25,
        }
    }
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            transparent_alpha: 0.3,
            fade_speed: 5.0,
            restore_epsilon: 0.01,
            cull_tag: "Cull".to_string(),
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity_y: -9.81,
            fixed_hz: 60.0,
            max_fixed_steps: 10,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lock_cursor: true,
            frames: 600,
            frame_dt: 1.0 / 60.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Platform config directory for Ryssa (`<config_dir>/ryssa`), if one exists.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ryssa"))
}

// --- Validation ---

impl CameraConfig {
    /// Reject ranges whose minimum exceeds their maximum.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("camera.min_zoom..max_zoom", self.min_zoom, self.max_zoom)?;
        check_range("camera.min_tilt..max_tilt", self.min_tilt, self.max_tilt)?;
        if let Some((min, max)) = self.yaw_limits {
            check_range("camera.yaw_limits", min, max)?;
        }
        Ok(())
    }
}

impl Config {
    /// Check every section for values the game cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.camera.validate()
    }
}

fn check_range(setting: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if min <= max {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            setting,
            reason: format!("minimum {min} exceeds maximum {max}"),
        })
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            config.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        new_config.validate()?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("min_zoom: 5.0"));
        assert!(ron_str.contains("strategy: Force"));
        assert!(ron_str.contains("cull_tag: \"Cull\""));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.camera.yaw_limits = Some((-90.0, 90.0));
        config.locomotion.strategy = LocomotionStrategyKind::Kinematic;
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(camera: (min_zoom: 2.0), debug: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.camera.min_zoom, 2.0);
        assert_eq!(config.camera.max_zoom, 20.0);
        assert_eq!(config.climb, ClimbConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_default_ground_check_matches_prototype_tuning() {
        let ground = GroundCheckConfig::default();
        assert_eq!(ground.sphere_offset, -0.5);
        assert_eq!(ground.sphere_radius, 0.3);
        assert_eq!(ground.distance, 0.2);
        assert_eq!(ground.layer_mask, u32::MAX);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.locomotion.move_speed = 7.5;
        config.fade.cull_tag = "Foliage".to_string();

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.climb.deadzone = 0.2;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().climb.deadzone, 0.2);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_inverted_partial_camera_range_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "(camera: (min_zoom: 25.0))").unwrap();

        let result = Config::load_or_create(dir.path());
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                setting: "camera.min_zoom..max_zoom",
                ..
            })
        ));
    }

    #[test]
    fn test_reload_rejects_inverted_yaw_limits() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.camera.yaw_limits = Some((45.0, -45.0));
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path());
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                setting: "camera.yaw_limits",
                ..
            })
        ));
    }

    #[test]
    fn test_camera_validation() {
        assert!(CameraConfig::default().validate().is_ok());

        let tilt = CameraConfig {
            min_tilt: 60.0,
            max_tilt: 10.0,
            ..CameraConfig::default()
        };
        assert!(tilt.validate().is_err());

        let nan = CameraConfig {
            max_zoom: f32::NAN,
            ..CameraConfig::default()
        };
        assert!(nan.validate().is_err());
    }
}
