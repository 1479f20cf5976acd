//! Climb state machine: proximity tracking, start/stop arbitration, climb
//! velocity and the grounded override.

use std::sync::Arc;

use glam::Vec3;
use ryssa_config::ClimbConfig;
use tracing::debug;

use crate::body::PlayerBody;
use crate::climb_profile::ClimbProfile;
use crate::ground::GroundContact;

/// Overlap notification for a climbable volume.
#[derive(Clone, Debug, PartialEq)]
pub enum TriggerEvent {
    /// The player started overlapping a climbable volume.
    Enter(Arc<ClimbProfile>),
    /// The player is still overlapping a climbable volume this tick.
    Stay(Arc<ClimbProfile>),
    /// The player stopped overlapping a climbable volume.
    Exit,
}

/// Climb controller state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClimbPhase {
    /// Not climbing; normal locomotion applies.
    #[default]
    Idle,
    /// Attached to a surface; climb velocity replaces locomotion.
    Climbing,
}

/// Stamina pool drained by surfaces whose profile sets `use_stamina`.
#[derive(Clone, Debug, PartialEq)]
pub struct Stamina {
    current: f32,
    max: f32,
    regen_per_second: f32,
    resume_at: f32,
    exhausted: bool,
}

impl Stamina {
    /// A full pool sized and tuned from `config`.
    pub fn new(config: &ClimbConfig) -> Self {
        let max = config.stamina_max.max(0.0);
        // A zero resume level would re-arm on the tick after exhaustion.
        let resume_at = match max * config.stamina_resume_fraction.clamp(0.0, 1.0) {
            level if level > 0.0 => level,
            _ => max,
        };
        Self {
            current: max,
            max,
            regen_per_second: config.stamina_regen_per_second.max(0.0),
            resume_at,
            exhausted: false,
        }
    }

    /// Stamina left.
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Fraction of the pool left, in `[0, 1]`.
    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }

    /// True from the moment the pool empties until it refills to the resume level.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Whether a stamina-draining surface can be grabbed.
    pub fn can_climb(&self) -> bool {
        !self.exhausted && self.current > 0.0
    }

    /// Drain `amount`. Returns `true` if this call emptied the pool.
    fn drain(&mut self, amount: f32) -> bool {
        if self.exhausted {
            return false;
        }
        self.current = (self.current - amount).max(0.0);
        if self.current <= 0.0 {
            self.exhausted = true;
            return true;
        }
        false
    }

    fn regenerate(&mut self, dt: f32) {
        self.current = (self.current + self.regen_per_second * dt).min(self.max);
        if self.exhausted && self.current >= self.resume_at {
            self.exhausted = false;
        }
    }
}

/// Detects climbable surfaces and decides when the player is climbing.
///
/// Idle → Climbing needs a climbable surface in contact and vertical input
/// beyond the deadzone. Losing either returns to Idle in the same tick.
/// Entering Climbing disables the body's gravity; leaving re-enables it.
#[derive(Clone, Debug)]
pub struct ClimbController {
    deadzone: f32,
    phase: ClimbPhase,
    contact: Option<Arc<ClimbProfile>>,
    climb_velocity: Vec3,
    stamina: Stamina,
}

impl ClimbController {
    /// Create an idle controller.
    pub fn new(config: &ClimbConfig) -> Self {
        Self {
            deadzone: config.deadzone.max(0.0),
            phase: ClimbPhase::Idle,
            contact: None,
            climb_velocity: Vec3::ZERO,
            stamina: Stamina::new(config),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> ClimbPhase {
        self.phase
    }

    /// Whether the controller is in the Climbing phase.
    pub fn is_climbing(&self) -> bool {
        self.phase == ClimbPhase::Climbing
    }

    /// Whether a climbable surface is in contact.
    pub fn near_climbable(&self) -> bool {
        self.contact.is_some()
    }

    /// Profile of the most recently overlapping climbable surface.
    pub fn active_profile(&self) -> Option<&ClimbProfile> {
        self.contact.as_deref()
    }

    /// Velocity to impose while climbing; zero while idle.
    pub fn climb_velocity(&self) -> Vec3 {
        self.climb_velocity
    }

    /// The stamina pool.
    pub fn stamina(&self) -> &Stamina {
        &self.stamina
    }

    /// Apply a trigger overlap event.
    ///
    /// Enter and Stay re-assert proximity each tick, so the last overlapping
    /// surface's profile wins. Exit clears proximity immediately.
    pub fn handle_trigger(&mut self, event: TriggerEvent) {
        match event {
            TriggerEvent::Enter(profile) | TriggerEvent::Stay(profile) => {
                self.contact = Some(profile);
            }
            TriggerEvent::Exit => {
                self.contact = None;
            }
        }
    }

    /// Run one climb tick.
    ///
    /// `axes` is `(horizontal, vertical)` input and `right` the player's
    /// horizontal right axis (used when the profile allows strafing). Always
    /// publishes the climbing status as the grounded override.
    pub fn fixed_tick<B: PlayerBody + ?Sized>(
        &mut self,
        axes: (f32, f32),
        right: Vec3,
        body: &mut B,
        ground: &mut GroundContact,
        dt: f32,
    ) {
        let (horizontal, vertical) = axes;
        let wants_climb = vertical.abs() > self.deadzone;

        let stamina_blocked = self.contact.as_ref().is_some_and(|p| p.use_stamina)
            && !self.stamina.can_climb();

        if self.near_climbable() && wants_climb && !stamina_blocked {
            self.start(body);
        } else {
            self.stop(body);
        }

        match (self.phase, self.contact.clone()) {
            (ClimbPhase::Climbing, Some(profile)) => {
                if profile.use_stamina
                    && self.stamina.drain(profile.stamina_drain_per_second * dt)
                {
                    debug!("Stamina exhausted, releasing surface");
                    self.stop(body);
                    self.climb_velocity = Vec3::ZERO;
                } else {
                    let mut velocity = Vec3::Y * (vertical * profile.climb_speed);
                    if profile.allow_strafe {
                        velocity += right * (horizontal * profile.climb_speed);
                    }
                    self.climb_velocity = velocity;
                }
            }
            _ => {
                self.stamina.regenerate(dt);
                self.climb_velocity = Vec3::ZERO;
            }
        }

        ground.set_climb_override(self.is_climbing());
    }

    fn start<B: PlayerBody + ?Sized>(&mut self, body: &mut B) {
        if self.phase == ClimbPhase::Climbing {
            return;
        }
        self.phase = ClimbPhase::Climbing;
        body.set_gravity_enabled(false);
        debug!(
            speed = self.active_profile().map(|p| p.climb_speed),
            "Climb started"
        );
    }

    fn stop<B: PlayerBody + ?Sized>(&mut self, body: &mut B) {
        if self.phase == ClimbPhase::Idle {
            return;
        }
        self.phase = ClimbPhase::Idle;
        body.set_gravity_enabled(true);
        debug!(near = self.near_climbable(), "Climb stopped");
    }
}
