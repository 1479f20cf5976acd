//! Command-line argument parsing for the Ryssa session.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, ConfigError, LocomotionStrategyKind, default_config_dir};

/// Ryssa command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "ryssa", about = "Ryssa third-person platformer prototype")]
pub struct CliArgs {
    /// Locomotion strategy (force or kinematic).
    #[arg(long, value_enum)]
    pub strategy: Option<LocomotionStrategyKind>,

    /// Number of frames to simulate.
    #[arg(long)]
    pub frames: Option<u32>,

    /// Horizontal move speed in m/s.
    #[arg(long)]
    pub move_speed: Option<f32>,

    /// Jump speed in m/s.
    #[arg(long)]
    pub jump_force: Option<f32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl CliArgs {
    /// Directory holding `config.ron`: `--config` if given, else the platform default.
    pub fn config_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.config {
            Some(dir) => Ok(dir.clone()),
            None => default_config_dir().ok_or(ConfigError::NoConfigDir),
        }
    }
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(strategy) = args.strategy {
            self.locomotion.strategy = strategy;
        }
        if let Some(frames) = args.frames {
            self.session.frames = frames;
        }
        if let Some(speed) = args.move_speed {
            self.locomotion.move_speed = speed;
        }
        if let Some(jump) = args.jump_force {
            self.locomotion.jump_force = jump;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
