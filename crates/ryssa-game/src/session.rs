//! The game session: one world, its schedules and session-wide settings.

use std::path::{Path, PathBuf};

use bevy_ecs::prelude::*;
use ryssa_config::{Config, ConfigError};
use ryssa_ecs::{
    EngineSchedule, EngineSchedules, FixedUpdateSet, PreUpdateSet, UpdateSet,
    configure_fixedupdate_ordering, configure_preupdate_ordering, configure_update_ordering,
    create_world, validate_schedules,
};
use ryssa_physics::{ClimbVolumes, ColliderTags, PhysicsWorld, physics_step_system};
use ryssa_player::{CameraRig, ObstructionFade, ProfileError};
use tracing::{info, warn};

use crate::materials::{CameraFade, MaterialTable};
use crate::scene::{SceneEntities, build_scene};
use crate::script::{InputScript, clear_input_system, scripted_input_system};
use crate::systems::{
    SessionStats, camera_rig_system, climb_resolve_system, force_application_system,
    locomotion_frame_system, obstruction_fade_system, physics_sync_system,
    trigger_detection_system,
};

/// Frames between checks of a watched `config.ron`.
pub const RELOAD_CHECK_FRAMES: u64 = 120;

/// A `config.ron` the session re-reads while running.
struct ConfigWatch {
    dir: PathBuf,
    /// File contents as last read, before any CLI overrides.
    on_disk: Config,
}

/// Owns everything a running game needs. Constructed once by `main` and
/// passed around by reference.
pub struct GameSession {
    config: Config,
    watch: Option<ConfigWatch>,
    cursor_locked: bool,
    frame: u64,
    world: World,
    schedules: EngineSchedules,
}

impl GameSession {
    pub fn new(config: Config) -> Self {
        let mut world = create_world();
        world.insert_resource(PhysicsWorld::from_config(&config.physics));
        world.insert_resource(ClimbVolumes::default());
        world.insert_resource(ColliderTags::default());
        world.insert_resource(MaterialTable::default());
        world.insert_resource(CameraFade(ObstructionFade::new(config.fade.clone())));
        world.insert_resource(SessionStats::default());
        world.insert_resource(InputScript::demo());

        let mut schedules = EngineSchedules::with_fixed_rate(
            config.physics.fixed_hz,
            config.physics.max_fixed_steps,
        );
        if let Some(schedule) = schedules.get_schedule_mut(&EngineSchedule::PreUpdate) {
            configure_preupdate_ordering(schedule);
        }
        if let Some(schedule) = schedules.get_schedule_mut(&EngineSchedule::FixedUpdate) {
            configure_fixedupdate_ordering(schedule);
        }
        if let Some(schedule) = schedules.get_schedule_mut(&EngineSchedule::Update) {
            configure_update_ordering(schedule);
        }

        schedules.add_system(
            EngineSchedule::PreUpdate,
            clear_input_system.in_set(PreUpdateSet::ClearInput),
        );
        schedules.add_system(
            EngineSchedule::PreUpdate,
            scripted_input_system.in_set(PreUpdateSet::Input),
        );
        schedules.add_system(
            EngineSchedule::FixedUpdate,
            (
                trigger_detection_system.in_set(FixedUpdateSet::TriggerDetection),
                climb_resolve_system.in_set(FixedUpdateSet::ClimbResolve),
                force_application_system.in_set(FixedUpdateSet::ForceApplication),
                physics_step_system.in_set(FixedUpdateSet::PhysicsStep),
                physics_sync_system.in_set(FixedUpdateSet::PhysicsSync),
            ),
        );
        schedules.add_system(
            EngineSchedule::Update,
            (
                locomotion_frame_system.in_set(UpdateSet::Locomotion),
                camera_rig_system.in_set(UpdateSet::Camera),
            ),
        );
        schedules.add_system(EngineSchedule::PostUpdate, obstruction_fade_system);
        validate_schedules(&mut schedules, &mut world);

        let cursor_locked = config.session.lock_cursor;
        if cursor_locked {
            info!("Cursor locked");
        }
        info!(
            strategy = ?config.locomotion.strategy,
            fixed_hz = config.physics.fixed_hz,
            "Game session created"
        );

        Self {
            config,
            watch: None,
            cursor_locked,
            frame: 0,
            world,
            schedules,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cursor_locked(&self) -> bool {
        self.cursor_locked
    }

    /// Frames run so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn stats(&self) -> &SessionStats {
        self.world.resource::<SessionStats>()
    }

    /// Replace the input timeline.
    #[cfg(test)]
    pub fn set_script(&mut self, script: InputScript) {
        self.world.insert_resource(script);
    }

    /// Populate the world with the test level.
    pub fn build_scene(&mut self) -> Result<SceneEntities, ProfileError> {
        build_scene(&mut self.world, &self.config)
    }

    /// Re-read `dir/config.ron` every [`RELOAD_CHECK_FRAMES`] frames.
    ///
    /// `on_disk` is the file's contents as loaded at startup.
    pub fn watch_config(&mut self, dir: &Path, on_disk: Config) {
        info!(dir = %dir.display(), "Watching config for changes");
        self.watch = Some(ConfigWatch {
            dir: dir.to_path_buf(),
            on_disk,
        });
    }

    /// Apply edits made to the watched config file since the last read.
    ///
    /// Camera, fade and session settings change live. Locomotion, climb,
    /// physics and debug edits wait for the next start. Returns `true` if
    /// the file changed; an unreadable or invalid file leaves everything as
    /// it was.
    pub fn reload_config(&mut self) -> Result<bool, ConfigError> {
        let Some(watch) = &mut self.watch else {
            return Ok(false);
        };
        let Some(new) = watch.on_disk.reload(&watch.dir)? else {
            return Ok(false);
        };
        let old = std::mem::replace(&mut watch.on_disk, new.clone());

        if new.camera != old.camera {
            let mut rigs = self.world.query::<&mut CameraRig>();
            for mut rig in rigs.iter_mut(&mut self.world) {
                if let Err(err) = rig.set_settings(new.camera.clone()) {
                    warn!(%err, "Camera settings not applied");
                }
            }
            self.config.camera = new.camera;
        }
        if new.fade != old.fade {
            self.world
                .resource_mut::<CameraFade>()
                .0
                .set_settings(new.fade.clone());
            self.config.fade = new.fade;
        }
        if new.session != old.session {
            self.config.session.frame_dt = new.session.frame_dt;
            if new.session.lock_cursor != self.cursor_locked {
                info!(locked = new.session.lock_cursor, "Cursor lock changed");
                self.cursor_locked = new.session.lock_cursor;
            }
            self.config.session.lock_cursor = new.session.lock_cursor;
        }
        let restart_only = new.locomotion != old.locomotion
            || new.climb != old.climb
            || new.physics != old.physics
            || new.debug != old.debug;
        if restart_only {
            warn!("Locomotion, climb, physics and debug changes apply on next start");
        }
        Ok(true)
    }

    /// Advance one frame of `config.session.frame_dt` seconds.
    pub fn step(&mut self) {
        self.schedules.run(&mut self.world, self.config.session.frame_dt);
        self.frame += 1;

        if self.frame % RELOAD_CHECK_FRAMES == 0 {
            match self.reload_config() {
                Ok(true) => info!(frame = self.frame, "Config changes applied"),
                Ok(false) => {}
                Err(err) => warn!(%err, "Config reload failed; keeping current settings"),
            }
        }
    }

    /// Advance `frames` frames.
    pub fn run(&mut self, frames: u32) {
        info!(frames, "Session running");
        for _ in 0..frames {
            self.step();
        }
    }
}
