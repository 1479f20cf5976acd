//! Camera-relative player locomotion over two physics primitives.
//!
//! [`LocomotionController`] maps input to a horizontal move velocity every
//! frame, runs the ground test, and handles jumps. On the fixed tick it hands
//! the integration to the [`LocomotionStrategy`] chosen at construction:
//!
//! - [`ForceIntegration`] steers a dynamic body with accelerations, leaving
//!   vertical velocity and native gravity to the physics engine (plus an
//!   additive extra-gravity term for a heavier fall).
//! - [`KinematicDisplacement`] owns a scalar vertical velocity and moves a
//!   kinematic body by one combined displacement per tick.

use glam::{Quat, Vec3};
use ryssa_config::{LocomotionConfig, LocomotionStrategyKind};
use ryssa_ecs::{ACTION_JUMP, ACTION_SPRINT, InputState};
use tracing::trace;

use crate::body::{GroundSensor, PlayerBody, SphereCast};
use crate::ground::GroundContact;

/// Normalized input length below which the player is not trying to move.
const MOVE_INPUT_THRESHOLD: f32 = 0.1;

/// Project the camera's axes onto the ground plane and combine them with the
/// movement axes. Returns a unit vector, or zero without input.
pub fn camera_relative_direction(camera_rotation: Quat, horizontal: f32, vertical: f32) -> Vec3 {
    let forward = flatten(camera_rotation * Vec3::NEG_Z);
    let right = flatten(camera_rotation * Vec3::X);
    (forward * vertical + right * horizontal).normalize_or_zero()
}

fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z).normalize_or_zero()
}

/// Velocity-level strategy for a dynamic body.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ForceIntegration;

impl ForceIntegration {
    fn fixed_step<B: PlayerBody + ?Sized>(
        &mut self,
        settings: &LocomotionConfig,
        intent: &MoveIntent,
        climb_velocity: Option<Vec3>,
        body: &mut B,
        ground: &mut GroundContact,
        dt: f32,
    ) {
        if let Some(climb) = climb_velocity {
            body.set_velocity(climb);
            return;
        }

        let airborne = !ground.is_grounded();
        if intent.is_moving() {
            let mut target = intent.velocity;
            if airborne {
                target *= settings.air_control_multiplier;
            }
            let mut change = target - body.velocity();
            change.y = 0.0;
            body.add_acceleration(change * settings.acceleration, dt);
        }

        if airborne {
            body.add_acceleration(Vec3::NEG_Y * settings.gravity_multiplier, dt);
        }
    }

    fn jump<B: PlayerBody + ?Sized>(&mut self, settings: &LocomotionConfig, body: &mut B) -> bool {
        let mut velocity = body.velocity();
        velocity.y = settings.jump_force;
        body.set_velocity(velocity);
        true
    }
}

/// Displacement-level strategy for a kinematic body.
#[derive(Clone, Debug, PartialEq)]
pub struct KinematicDisplacement {
    vertical_velocity: f32,
    can_jump: bool,
}

impl Default for KinematicDisplacement {
    fn default() -> Self {
        Self {
            vertical_velocity: 0.0,
            can_jump: true,
        }
    }
}

impl KinematicDisplacement {
    /// Current vertical velocity in m/s.
    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    /// Whether a jump may be triggered before the next landing.
    pub fn can_jump(&self) -> bool {
        self.can_jump
    }

    fn fixed_step<B: PlayerBody + ?Sized>(
        &mut self,
        settings: &LocomotionConfig,
        intent: &MoveIntent,
        climb_velocity: Option<Vec3>,
        body: &mut B,
        ground: &mut GroundContact,
        dt: f32,
    ) {
        if let Some(climb) = climb_velocity {
            self.vertical_velocity = 0.0;
            let grounded = body.move_by(climb * dt, dt);
            ground.record_ground_test(grounded);
            return;
        }

        if ground.physically_grounded() {
            if self.vertical_velocity <= 0.0 {
                self.vertical_velocity = 0.0;
                self.can_jump = true;
            }
        } else {
            self.vertical_velocity -= settings.kinematic_gravity * dt;
        }

        let displacement = (intent.velocity + Vec3::Y * self.vertical_velocity) * dt;
        let grounded = body.move_by(displacement, dt);
        ground.record_ground_test(grounded);
    }

    fn jump(&mut self, settings: &LocomotionConfig) -> bool {
        if !self.can_jump {
            return false;
        }
        self.vertical_velocity = settings.jump_force;
        self.can_jump = false;
        true
    }
}

/// Integration strategy selected at construction.
#[derive(Clone, Debug, PartialEq)]
pub enum LocomotionStrategy {
    /// Accelerations on a dynamic body.
    Force(ForceIntegration),
    /// Displacements of a kinematic body.
    Kinematic(KinematicDisplacement),
}

impl LocomotionStrategy {
    /// Fresh strategy state for `kind`.
    pub fn from_kind(kind: LocomotionStrategyKind) -> Self {
        match kind {
            LocomotionStrategyKind::Force => Self::Force(ForceIntegration),
            LocomotionStrategyKind::Kinematic => Self::Kinematic(KinematicDisplacement::default()),
        }
    }

    /// Which primitive this strategy drives.
    pub fn kind(&self) -> LocomotionStrategyKind {
        match self {
            Self::Force(_) => LocomotionStrategyKind::Force,
            Self::Kinematic(_) => LocomotionStrategyKind::Kinematic,
        }
    }
}

/// The per-frame movement request derived from input.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveIntent {
    /// Unit horizontal direction, or zero.
    pub direction: Vec3,
    /// Target horizontal velocity in m/s.
    pub velocity: Vec3,
    /// Whether sprint was held when sampled.
    pub sprinting: bool,
}

impl MoveIntent {
    /// True when the direction is long enough to count as movement input.
    pub fn is_moving(&self) -> bool {
        self.direction.length() > MOVE_INPUT_THRESHOLD
    }
}

/// Player locomotion: input mapping, ground test, jump, and fixed integration.
#[derive(Clone, Debug)]
pub struct LocomotionController {
    settings: LocomotionConfig,
    strategy: LocomotionStrategy,
    intent: MoveIntent,
}

impl LocomotionController {
    /// Create a controller using the strategy named in `settings`.
    pub fn new(settings: LocomotionConfig) -> Self {
        let strategy = LocomotionStrategy::from_kind(settings.strategy);
        Self {
            settings,
            strategy,
            intent: MoveIntent::default(),
        }
    }

    /// Tuning in use.
    pub fn settings(&self) -> &LocomotionConfig {
        &self.settings
    }

    /// Active strategy and its state.
    pub fn strategy(&self) -> &LocomotionStrategy {
        &self.strategy
    }

    /// The most recently sampled movement request.
    pub fn intent(&self) -> &MoveIntent {
        &self.intent
    }

    /// Sample movement axes and sprint relative to the camera.
    pub fn sample_input(&mut self, input: &InputState, camera_rotation: Quat) {
        let direction =
            camera_relative_direction(camera_rotation, input.horizontal(), input.vertical());
        let sprinting = input.is_active(ACTION_SPRINT);
        let mut speed = self.settings.move_speed;
        if sprinting {
            speed *= self.settings.sprint_multiplier;
        }
        self.intent = MoveIntent {
            direction,
            velocity: direction * speed,
            sprinting,
        };
    }

    /// The sphere cast used for the physical ground test at `position`.
    pub fn ground_cast(&self, position: Vec3) -> SphereCast {
        let ground = &self.settings.ground_check;
        SphereCast {
            origin: position + Vec3::NEG_Y * ground.sphere_offset,
            radius: ground.sphere_radius,
            direction: Vec3::NEG_Y,
            max_distance: ground.distance,
            layer_mask: ground.layer_mask,
        }
    }

    /// Run the physical ground test.
    ///
    /// The kinematic strategy learns ground contact from its own moves, so it
    /// skips the cast.
    pub fn ground_test<B: PlayerBody + GroundSensor + ?Sized>(
        &self,
        body: &B,
        ground: &mut GroundContact,
    ) {
        if let LocomotionStrategy::Force(_) = self.strategy {
            let cast = self.ground_cast(body.position());
            ground.record_ground_test(body.sphere_cast(&cast));
        }
    }

    /// Jump if `pressed` this frame and the player is effectively grounded.
    ///
    /// Returns `true` if a jump was applied.
    pub fn try_jump<B: PlayerBody + ?Sized>(
        &mut self,
        pressed: bool,
        ground: &GroundContact,
        body: &mut B,
    ) -> bool {
        if !pressed || !ground.is_grounded() {
            return false;
        }
        let jumped = match &mut self.strategy {
            LocomotionStrategy::Force(force) => force.jump(&self.settings, body),
            LocomotionStrategy::Kinematic(kinematic) => kinematic.jump(&self.settings),
        };
        if jumped {
            trace!(force = self.settings.jump_force, "Jump");
        }
        jumped
    }

    /// Variable-rate tick: sample input, test ground, handle jump.
    ///
    /// Returns `true` if the player jumped this frame.
    pub fn frame_tick<B: PlayerBody + GroundSensor + ?Sized>(
        &mut self,
        input: &InputState,
        camera_rotation: Quat,
        body: &mut B,
        ground: &mut GroundContact,
    ) -> bool {
        self.sample_input(input, camera_rotation);
        self.ground_test(body, ground);
        self.try_jump(input.just_pressed(ACTION_JUMP), ground, body)
    }

    /// Fixed-rate tick. `climb_velocity` is `Some` while climbing and replaces
    /// normal integration.
    pub fn fixed_tick<B: PlayerBody + ?Sized>(
        &mut self,
        climb_velocity: Option<Vec3>,
        body: &mut B,
        ground: &mut GroundContact,
        dt: f32,
    ) {
        match &mut self.strategy {
            LocomotionStrategy::Force(force) => {
                force.fixed_step(&self.settings, &self.intent, climb_velocity, body, ground, dt)
            }
            LocomotionStrategy::Kinematic(kinematic) => {
                kinematic.fixed_step(&self.settings, &self.intent, climb_velocity, body, ground, dt)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBody;
    use std::f32::consts::FRAC_PI_2;

    const DT: f32 = 1.0 / 60.0;

    fn controller(kind: LocomotionStrategyKind) -> LocomotionController {
        LocomotionController::new(LocomotionConfig {
            strategy: kind,
            ..LocomotionConfig::default()
        })
    }

    fn forward_input() -> InputState {
        InputState {
            move_axes: (0.0, 1.0),
            ..InputState::default()
        }
    }

    /// Compass yaw: positive turns right (clockwise from above).
    fn yaw(radians: f32) -> Quat {
        Quat::from_rotation_y(-radians)
    }

    #[test]
    fn test_direction_follows_camera_yaw() {
        let forward = camera_relative_direction(yaw(0.0), 0.0, 1.0);
        assert!((forward - Vec3::NEG_Z).length() < 1e-5);

        let turned = camera_relative_direction(yaw(FRAC_PI_2), 0.0, 1.0);
        assert!((turned - Vec3::X).length() < 1e-5, "got {turned}");

        let strafe = camera_relative_direction(yaw(0.0), 1.0, 0.0);
        assert!((strafe - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_direction_ignores_camera_pitch() {
        let pitched = yaw(0.3) * Quat::from_rotation_x(-1.2);
        let dir = camera_relative_direction(pitched, 0.0, 1.0);
        assert_eq!(dir.y, 0.0);
        assert!((dir.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_diagonal_input_is_renormalized() {
        let dir = camera_relative_direction(yaw(0.0), 1.0, 1.0);
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert_eq!(camera_relative_direction(yaw(0.0), 0.0, 0.0), Vec3::ZERO);
    }

    #[test]
    fn test_sprint_scales_move_velocity() {
        let mut loco = controller(LocomotionStrategyKind::Force);
        let mut input = forward_input();
        loco.sample_input(&input, Quat::IDENTITY);
        assert!((loco.intent().velocity.length() - 5.0).abs() < 1e-5);

        input.active_actions.insert(ACTION_SPRINT.to_string());
        loco.sample_input(&input, Quat::IDENTITY);
        assert!(loco.intent().sprinting);
        assert!((loco.intent().velocity.length() - 7.5).abs() < 1e-5);
    }

    #[test]
    fn test_ground_cast_origin_uses_offset() {
        let loco = controller(LocomotionStrategyKind::Force);
        let cast = loco.ground_cast(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(cast.origin, Vec3::new(1.0, 2.5, 3.0));
        assert_eq!(cast.direction, Vec3::NEG_Y);
        assert_eq!(cast.radius, 0.3);
        assert_eq!(cast.max_distance, 0.2);
    }

    #[test]
    fn test_force_blends_horizontal_and_keeps_vertical() {
        let mut loco = controller(LocomotionStrategyKind::Force);
        let mut body = MockBody::on_floor();
        body.velocity = Vec3::new(0.0, -1.0, 0.0);
        let mut ground = GroundContact::default();
        ground.record_ground_test(true);

        loco.sample_input(&forward_input(), Quat::IDENTITY);
        loco.fixed_tick(None, &mut body, &mut ground, DT);

        // Target (0, 0, -5): change (0, _, -5) * accel 10.
        assert_eq!(body.accelerations.len(), 1);
        let accel = body.accelerations[0];
        assert_eq!(accel.y, 0.0);
        assert!((accel.z + 50.0).abs() < 1e-4);
        assert_eq!(body.velocity.y, -1.0);
    }

    #[test]
    fn test_force_airborne_uses_air_control_and_extra_gravity() {
        let mut loco = controller(LocomotionStrategyKind::Force);
        let mut body = MockBody::default();
        let mut ground = GroundContact::default();

        loco.sample_input(&forward_input(), Quat::IDENTITY);
        loco.fixed_tick(None, &mut body, &mut ground, DT);

        assert_eq!(body.accelerations.len(), 2);
        // Air control halves the 5 m/s target.
        assert!((body.accelerations[0].z + 25.0).abs() < 1e-4);
        assert_eq!(body.accelerations[1], Vec3::new(0.0, -2.0, 0.0));
    }

    #[test]
    fn test_force_idle_on_ground_applies_nothing() {
        let mut loco = controller(LocomotionStrategyKind::Force);
        let mut body = MockBody::on_floor();
        let mut ground = GroundContact::default();
        ground.record_ground_test(true);

        loco.sample_input(&InputState::default(), Quat::IDENTITY);
        loco.fixed_tick(None, &mut body, &mut ground, DT);

        assert!(body.accelerations.is_empty());
    }

    #[test]
    fn test_climb_velocity_overrides_integration() {
        let mut loco = controller(LocomotionStrategyKind::Force);
        let mut body = MockBody::default();
        body.velocity = Vec3::new(4.0, -3.0, 1.0);
        let mut ground = GroundContact::default();
        ground.set_climb_override(true);

        loco.sample_input(&forward_input(), Quat::IDENTITY);
        loco.fixed_tick(Some(Vec3::new(0.0, 3.0, 0.0)), &mut body, &mut ground, DT);

        assert_eq!(body.velocity, Vec3::new(0.0, 3.0, 0.0));
        assert!(body.accelerations.is_empty(), "no blending or extra gravity");
    }

    #[test]
    fn test_jump_requires_effective_ground() {
        let mut loco = controller(LocomotionStrategyKind::Force);
        let mut body = MockBody::default();
        let ground = GroundContact::default();

        assert!(!loco.try_jump(true, &ground, &mut body));
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn test_jump_allowed_by_ground_test_or_override() {
        for (grounded, overridden) in [(true, false), (false, true)] {
            let mut loco = controller(LocomotionStrategyKind::Force);
            let mut body = MockBody::default();
            body.velocity = Vec3::new(1.0, 0.0, 2.0);
            let mut ground = GroundContact::default();
            ground.record_ground_test(grounded);
            ground.set_climb_override(overridden);

            assert!(loco.try_jump(true, &ground, &mut body));
            assert_eq!(body.velocity, Vec3::new(1.0, 8.0, 2.0));
        }
    }

    #[test]
    fn test_jump_needs_press_edge() {
        let mut loco = controller(LocomotionStrategyKind::Force);
        let mut body = MockBody::on_floor();
        let mut ground = GroundContact::default();
        let mut input = InputState::default();
        input.active_actions.insert(ACTION_JUMP.to_string());

        loco.frame_tick(&input, Quat::IDENTITY, &mut body, &mut ground);

        assert!(ground.physically_grounded());
        assert_eq!(body.velocity.y, 0.0, "holding jump is not a press");
    }

    #[test]
    fn test_frame_tick_runs_ground_test_then_jump() {
        let mut loco = controller(LocomotionStrategyKind::Force);
        let mut body = MockBody::on_floor();
        let mut ground = GroundContact::default();
        let mut input = InputState::default();
        input.set_action(ACTION_JUMP, true);

        let jumped = loco.frame_tick(&input, Quat::IDENTITY, &mut body, &mut ground);

        assert!(jumped);
        assert_eq!(body.casts.borrow().len(), 1);
        assert_eq!(body.velocity.y, 8.0);
    }

    #[test]
    fn test_kinematic_skips_shape_cast() {
        let loco = controller(LocomotionStrategyKind::Kinematic);
        let body = MockBody::on_floor();
        let mut ground = GroundContact::default();

        loco.ground_test(&body, &mut ground);

        assert!(body.casts.borrow().is_empty());
        assert!(!ground.physically_grounded());
    }

    #[test]
    fn test_kinematic_falls_and_lands() {
        let mut loco = controller(LocomotionStrategyKind::Kinematic);
        let mut body = MockBody::on_floor();
        body.position.y = 1.0;
        let mut ground = GroundContact::default();

        for _ in 0..120 {
            loco.fixed_tick(None, &mut body, &mut ground, DT);
        }

        assert_eq!(body.position.y, 0.0);
        assert!(ground.physically_grounded());
        let LocomotionStrategy::Kinematic(state) = loco.strategy() else {
            panic!("expected kinematic strategy");
        };
        assert_eq!(state.vertical_velocity(), 0.0);
        assert!(state.can_jump());
    }

    #[test]
    fn test_kinematic_single_combined_displacement() {
        let mut loco = controller(LocomotionStrategyKind::Kinematic);
        let mut body = MockBody::on_floor();
        let mut ground = GroundContact::default();
        ground.record_ground_test(true);

        loco.sample_input(&forward_input(), Quat::IDENTITY);
        loco.fixed_tick(None, &mut body, &mut ground, DT);

        assert_eq!(body.moves.len(), 1);
        let moved = body.moves[0];
        assert!((moved.z + 5.0 * DT).abs() < 1e-6);
        assert_eq!(moved.y, 0.0);
    }

    #[test]
    fn test_kinematic_jump_latch_blocks_second_jump() {
        let mut loco = controller(LocomotionStrategyKind::Kinematic);
        let mut body = MockBody::on_floor();
        let mut ground = GroundContact::default();
        ground.record_ground_test(true);

        assert!(loco.try_jump(true, &ground, &mut body));
        // Ground flag is still stale from before take-off.
        assert!(!loco.try_jump(true, &ground, &mut body));

        loco.fixed_tick(None, &mut body, &mut ground, DT);
        assert!(!ground.physically_grounded(), "jump lifted the body");
        assert!(body.position.y > 0.0);

        let LocomotionStrategy::Kinematic(state) = loco.strategy() else {
            panic!("expected kinematic strategy");
        };
        assert!(!state.can_jump());
    }

    #[test]
    fn test_kinematic_jump_rearms_after_landing() {
        let mut loco = controller(LocomotionStrategyKind::Kinematic);
        let mut body = MockBody::on_floor();
        let mut ground = GroundContact::default();
        ground.record_ground_test(true);

        assert!(loco.try_jump(true, &ground, &mut body));
        for _ in 0..240 {
            loco.fixed_tick(None, &mut body, &mut ground, DT);
        }

        assert!(ground.physically_grounded());
        assert!(loco.try_jump(true, &ground, &mut body));
    }

    #[test]
    fn test_kinematic_climb_moves_by_climb_velocity() {
        let mut loco = controller(LocomotionStrategyKind::Kinematic);
        let mut body = MockBody::on_floor();
        let mut ground = GroundContact::default();

        loco.fixed_tick(Some(Vec3::new(0.0, 3.0, 0.0)), &mut body, &mut ground, 0.5);

        assert_eq!(body.moves, vec![Vec3::new(0.0, 1.5, 0.0)]);
        assert_eq!(body.velocity, Vec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn test_strategy_kind_round_trips() {
        for kind in [LocomotionStrategyKind::Force, LocomotionStrategyKind::Kinematic] {
            assert_eq!(LocomotionStrategy::from_kind(kind).kind(), kind);
        }
    }
}
