//! Configuration system for the Ryssa prototype.
//!
//! Provides runtime-configurable gameplay tuning that persists to disk as a RON
//! file. Supports CLI overrides via clap, hot-reload detection, and
//! forward/backward compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CameraConfig, ClimbConfig, Config, DebugConfig, FadeConfig, GroundCheckConfig,
    LocomotionConfig, LocomotionStrategyKind, PhysicsConfig, SessionConfig, default_config_dir,
};
pub use error::ConfigError;
