//! Ryssa headless session: a third-person player walks to a wall, climbs it
//! and orbits the camera, driven by a scripted input timeline.
//!
//! Run with: `cargo run -p ryssa-game -- --strategy kinematic --frames 600`

mod materials;
mod scene;
mod script;
mod session;
mod systems;

use std::process::ExitCode;

use clap::Parser;
use ryssa_config::{CliArgs, Config};
use ryssa_ecs::Position;
use ryssa_player::CameraRig;
use tracing::{error, info, warn};

use crate::materials::MaterialTable;
use crate::session::GameSession;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args.config_dir();
    let (on_disk, load_error) = match &config_dir {
        Ok(dir) => match Config::load_or_create(dir) {
            Ok(config) => (Some(config), None),
            Err(err) => (None, Some(err.to_string())),
        },
        Err(err) => (None, Some(err.to_string())),
    };
    let mut config = on_disk.clone().unwrap_or_default();
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.as_ref().ok().map(|dir| dir.join("logs"));
    ryssa_log::init_logging(log_dir.as_deref(), cfg!(debug_assertions), Some(&config));
    if let Some(err) = load_error {
        warn!(%err, "Using default configuration");
    }

    info!("Ryssa");
    info!(
        "Strategy: {:?} | move speed {:.1} m/s | jump {:.1} m/s",
        config.locomotion.strategy, config.locomotion.move_speed, config.locomotion.jump_force,
    );

    let mut session = GameSession::new(config);
    let scene = match session.build_scene() {
        Ok(scene) => scene,
        Err(err) => {
            error!(%err, "Failed to build scene");
            return ExitCode::FAILURE;
        }
    };

    if let (Ok(dir), Some(on_disk)) = (&config_dir, on_disk) {
        session.watch_config(dir, on_disk);
    }

    session.run(session.config().session.frames);

    let stats = session.stats().clone();
    let feet = scene
        .player
        .and_then(|player| session.world().get::<Position>(player))
        .map(|p| p.0);
    let zoom = session
        .world()
        .get::<CameraRig>(scene.camera)
        .map(CameraRig::zoom);
    let pillar = session
        .world()
        .resource::<MaterialTable>()
        .get(scene.pillar)
        .and_then(|slots| slots.first())
        .map(|m| (m.alpha, m.blend));
    info!(
        frames = session.frame(),
        jumps = stats.jumps,
        climbs = stats.climbs_started,
        max_height = stats.max_height,
        max_faded = stats.max_faded,
        ?feet,
        ?zoom,
        ?pillar,
        cursor_locked = session.cursor_locked(),
        "Session finished"
    );
    ExitCode::SUCCESS
}
