//! Engine schedule labels and the ordered schedule runner.

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::{IntoSystemConfigs, ScheduleLabel};
use tracing::warn;

use crate::TimeRes;

/// Default cap on fixed-update steps per frame to prevent spiral-of-death.
const MAX_FIXED_STEPS_PER_FRAME: u32 = 10;

/// Labels for each engine execution stage.
///
/// Stages run in the order listed, top to bottom, every frame.
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub enum EngineSchedule {
    /// Sample input for the frame.
    PreUpdate,
    /// Fixed-rate simulation (climb resolution, locomotion integration, physics).
    FixedUpdate,
    /// Variable-rate gameplay (ground test, jump, camera rig).
    Update,
    /// Presentation state (obstruction fade, diagnostics).
    PostUpdate,
}

/// Ordered collection of [`Schedule`]s that drives one frame.
///
/// `FixedUpdate` uses a time accumulator so it ticks at a stable rate
/// regardless of the frame rate.
pub struct EngineSchedules {
    schedules: Vec<(EngineSchedule, Schedule)>,
    fixed_accumulator: f64,
    fixed_dt: f64,
    max_fixed_steps: u32,
}

impl EngineSchedules {
    /// Create a new set of engine schedules with the default fixed timestep (1/60 s).
    pub fn new() -> Self {
        Self::with_fixed_rate(60.0, MAX_FIXED_STEPS_PER_FRAME)
    }

    /// Create schedules ticking `FixedUpdate` at `hz`, at most `max_steps` times per frame.
    pub fn with_fixed_rate(hz: f64, max_steps: u32) -> Self {
        let stages = vec![
            EngineSchedule::PreUpdate,
            EngineSchedule::FixedUpdate,
            EngineSchedule::Update,
            EngineSchedule::PostUpdate,
        ];

        let schedules = stages
            .into_iter()
            .map(|label| (label, Schedule::default()))
            .collect();

        Self {
            schedules,
            fixed_accumulator: 0.0,
            fixed_dt: 1.0 / hz,
            max_fixed_steps: max_steps.max(1),
        }
    }

    /// Register a system (or system tuple) into a specific stage.
    pub fn add_system<M>(&mut self, stage: EngineSchedule, system: impl IntoSystemConfigs<M>) {
        if let Some(schedule) = self.get_schedule_mut(&stage) {
            schedule.add_systems(system);
        }
    }

    /// Run all stages in order for one frame.
    ///
    /// `FixedUpdate` may run zero or more times (up to the configured cap)
    /// based on accumulated delta time. All other stages run exactly once.
    /// [`TimeRes`] is refreshed before each stage that depends on it, if present.
    pub fn run(&mut self, world: &mut World, frame_dt: f64) {
        let fixed_dt = self.fixed_dt;
        if let Some(mut time) = world.get_resource_mut::<TimeRes>() {
            time.delta = frame_dt as f32;
            time.fixed_delta = fixed_dt as f32;
            time.elapsed += frame_dt;
            time.frame += 1;
        }

        self.run_stage(EngineSchedule::PreUpdate, world);

        self.fixed_accumulator += frame_dt;
        let mut steps: u32 = 0;
        while self.fixed_accumulator >= self.fixed_dt && steps < self.max_fixed_steps {
            self.run_stage(EngineSchedule::FixedUpdate, world);
            if let Some(mut time) = world.get_resource_mut::<TimeRes>() {
                time.fixed_tick += 1;
            }
            self.fixed_accumulator -= self.fixed_dt;
            steps += 1;
        }
        if steps == self.max_fixed_steps && self.fixed_accumulator >= self.fixed_dt {
            warn!(
                "Fixed update capped at {} steps; {:.1}ms of simulation deferred",
                steps,
                self.fixed_accumulator * 1000.0
            );
        }

        self.run_stage(EngineSchedule::Update, world);
        self.run_stage(EngineSchedule::PostUpdate, world);
    }

    /// Returns the current fixed-update accumulator value in seconds.
    pub fn fixed_accumulator(&self) -> f64 {
        self.fixed_accumulator
    }

    /// Returns the fixed timestep in seconds.
    pub fn fixed_dt(&self) -> f64 {
        self.fixed_dt
    }

    /// Returns a mutable reference to the schedule for a given stage.
    ///
    /// Useful for configuring system sets and ordering constraints.
    pub fn get_schedule_mut(&mut self, stage: &EngineSchedule) -> Option<&mut Schedule> {
        self.schedules
            .iter_mut()
            .find(|(label, _)| label == stage)
            .map(|(_, schedule)| schedule)
    }

    /// Force-initialize all schedules, validating the dependency graph.
    pub fn initialize_all(&mut self, world: &mut World) {
        for (_label, schedule) in &mut self.schedules {
            let _ = schedule.initialize(world);
        }
    }

    fn run_stage(&mut self, target: EngineSchedule, world: &mut World) {
        if let Some(schedule) = self.get_schedule_mut(&target) {
            schedule.run(world);
        }
    }
}

impl Default for EngineSchedules {
    fn default() -> Self {
        Self::new()
    }
}
