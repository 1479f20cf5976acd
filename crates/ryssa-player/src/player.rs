//! The player entity's controllers and their per-tick ordering.

use bevy_ecs::prelude::{Component, Entity};
use glam::{Quat, Vec3};
use ryssa_config::{ClimbConfig, LocomotionConfig};
use ryssa_ecs::InputState;

use crate::body::{GroundSensor, PlayerBody};
use crate::climb::{ClimbController, TriggerEvent};
use crate::error::PlayerError;
use crate::ground::GroundContact;
use crate::locomotion::LocomotionController;

/// Player state: locomotion and climbing share one [`GroundContact`].
///
/// Within a fixed tick the climb controller resolves first, so the
/// locomotion integration that follows sees this tick's climb decision.
#[derive(Component, Clone, Debug)]
pub struct Player {
    camera: Entity,
    locomotion: LocomotionController,
    climb: ClimbController,
    ground: GroundContact,
    /// Heading in radians, written by the camera rig.
    yaw: f32,
}

impl Player {
    /// Create a player steered relative to `camera`.
    pub fn new(
        locomotion: LocomotionConfig,
        climb: &ClimbConfig,
        camera: Option<Entity>,
    ) -> Result<Self, PlayerError> {
        let camera = camera.ok_or(PlayerError::MissingReference {
            component: "LocomotionController",
            reference: "camera",
        })?;
        Ok(Self {
            camera,
            locomotion: LocomotionController::new(locomotion),
            climb: ClimbController::new(climb),
            ground: GroundContact::default(),
            yaw: 0.0,
        })
    }

    /// The camera whose yaw defines "forward".
    pub fn camera(&self) -> Entity {
        self.camera
    }

    pub fn locomotion(&self) -> &LocomotionController {
        &self.locomotion
    }

    pub fn climb(&self) -> &ClimbController {
        &self.climb
    }

    pub fn ground(&self) -> &GroundContact {
        &self.ground
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Horizontal right axis for the current heading.
    pub fn right(&self) -> Vec3 {
        Quat::from_rotation_y(-self.yaw) * Vec3::X
    }

    /// Turn the player to `yaw` radians.
    pub fn set_yaw<B: PlayerBody + ?Sized>(&mut self, yaw: f32, body: &mut B) {
        self.yaw = yaw;
        body.set_yaw(yaw);
    }

    /// Forward a climbable-volume overlap event.
    pub fn handle_trigger(&mut self, event: TriggerEvent) {
        self.climb.handle_trigger(event);
    }

    /// Variable-rate tick: input sampling, ground test, jump.
    ///
    /// Returns `true` if the player jumped.
    pub fn frame_tick<B: PlayerBody + GroundSensor + ?Sized>(
        &mut self,
        input: &InputState,
        camera_rotation: Quat,
        body: &mut B,
    ) -> bool {
        self.locomotion
            .frame_tick(input, camera_rotation, body, &mut self.ground)
    }

    /// Climb resolution stage of the fixed tick.
    pub fn resolve_climb<B: PlayerBody + ?Sized>(
        &mut self,
        input: &InputState,
        body: &mut B,
        dt: f32,
    ) {
        let right = self.right();
        self.climb
            .fixed_tick(input.move_axes, right, body, &mut self.ground, dt);
    }

    /// Force application stage of the fixed tick.
    pub fn apply_locomotion<B: PlayerBody + ?Sized>(&mut self, body: &mut B, dt: f32) {
        let climb_velocity = self
            .climb
            .is_climbing()
            .then(|| self.climb.climb_velocity());
        self.locomotion
            .fixed_tick(climb_velocity, body, &mut self.ground, dt);
    }

    /// Both fixed-tick stages in order.
    pub fn fixed_tick<B: PlayerBody + ?Sized>(
        &mut self,
        input: &InputState,
        body: &mut B,
        dt: f32,
    ) {
        self.resolve_climb(input, body, dt);
        self.apply_locomotion(body, dt);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::climb::ClimbPhase;
    use crate::climb_profile::ClimbProfile;
    use crate::testing::MockBody;
    use bevy_ecs::world::World;
    use ryssa_config::LocomotionStrategyKind;
    use ryssa_ecs::ACTION_JUMP;

    const DT: f32 = 1.0 / 60.0;

    fn player(kind: LocomotionStrategyKind) -> Player {
        let camera = World::new().spawn_empty().id();
        Player::new(
            LocomotionConfig {
                strategy: kind,
                ..LocomotionConfig::default()
            },
            &ClimbConfig::default(),
            Some(camera),
        )
        .unwrap()
    }

    fn wall() -> Arc<ClimbProfile> {
        Arc::new(ClimbProfile {
            climb_speed: 3.0,
            allow_strafe: false,
            ..ClimbProfile::default()
        })
    }

    fn axes(horizontal: f32, vertical: f32) -> InputState {
        InputState {
            move_axes: (horizontal, vertical),
            ..InputState::default()
        }
    }

    #[test]
    fn test_missing_camera_is_reported() {
        let err = Player::new(LocomotionConfig::default(), &ClimbConfig::default(), None)
            .unwrap_err();
        assert!(matches!(
            err,
            PlayerError::MissingReference {
                reference: "camera",
                ..
            }
        ));
    }

    #[test]
    fn test_climb_scenario_without_strafe() {
        let mut player = player(LocomotionStrategyKind::Force);
        let mut body = MockBody::default();
        player.handle_trigger(TriggerEvent::Enter(wall()));

        player.fixed_tick(&axes(1.0, 1.0), &mut body, DT);

        assert_eq!(player.climb().phase(), ClimbPhase::Climbing);
        assert_eq!(body.velocity.y, 3.0);
        assert_eq!(body.velocity.x, 0.0);
        assert_eq!(body.velocity.z, 0.0);
        assert!(!body.gravity_enabled);
        assert!(player.ground().override_active());
        assert!(player.ground().is_grounded());
    }

    #[test]
    fn test_exit_mid_climb_releases_in_same_tick() {
        let mut player = player(LocomotionStrategyKind::Force);
        let mut body = MockBody::default();
        player.handle_trigger(TriggerEvent::Enter(wall()));
        player.fixed_tick(&axes(0.0, 1.0), &mut body, DT);
        assert!(player.climb().is_climbing());

        player.handle_trigger(TriggerEvent::Exit);
        player.fixed_tick(&axes(0.0, 1.0), &mut body, DT);

        assert!(!player.climb().is_climbing());
        assert!(body.gravity_enabled);
        assert!(!player.ground().override_active());
        // Normal integration resumed: airborne, so extra gravity applies.
        assert_eq!(body.accelerations.last(), Some(&Vec3::new(0.0, -2.0, 0.0)));
    }

    #[test]
    fn test_releasing_input_stops_climb() {
        let mut player = player(LocomotionStrategyKind::Force);
        let mut body = MockBody::default();
        player.handle_trigger(TriggerEvent::Enter(wall()));
        player.fixed_tick(&axes(0.0, -1.0), &mut body, DT);
        assert!(player.climb().is_climbing());
        assert_eq!(body.velocity.y, -3.0);

        player.handle_trigger(TriggerEvent::Stay(wall()));
        player.fixed_tick(&axes(0.0, 0.05), &mut body, DT);
        assert!(!player.climb().is_climbing());
        assert!(body.gravity_enabled);
    }

    #[test]
    fn test_strafe_follows_player_right_axis() {
        let mut player = player(LocomotionStrategyKind::Force);
        let mut body = MockBody::default();
        player.set_yaw(std::f32::consts::FRAC_PI_2, &mut body);
        assert_eq!(body.yaw, std::f32::consts::FRAC_PI_2);

        let profile = Arc::new(ClimbProfile {
            climb_speed: 2.0,
            allow_strafe: true,
            ..ClimbProfile::default()
        });
        player.handle_trigger(TriggerEvent::Enter(profile));
        player.fixed_tick(&axes(1.0, 1.0), &mut body, DT);

        // Facing +X, right is +Z.
        assert!((body.velocity - Vec3::new(0.0, 2.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn test_climb_override_allows_jump() {
        let mut player = player(LocomotionStrategyKind::Force);
        let mut body = MockBody::default();
        player.handle_trigger(TriggerEvent::Enter(wall()));
        player.fixed_tick(&axes(0.0, 1.0), &mut body, DT);

        let mut input = axes(0.0, 1.0);
        input.set_action(ACTION_JUMP, true);
        assert!(player.frame_tick(&input, Quat::IDENTITY, &mut body));

        assert!(!player.ground().physically_grounded());
        assert_eq!(body.velocity.y, 8.0);
    }

    #[test]
    fn test_airborne_jump_is_ignored() {
        let mut player = player(LocomotionStrategyKind::Force);
        let mut body = MockBody::default();
        body.position.y = 10.0;
        let mut input = InputState::default();
        input.set_action(ACTION_JUMP, true);

        assert!(!player.frame_tick(&input, Quat::IDENTITY, &mut body));

        assert_eq!(body.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_kinematic_player_climbs() {
        let mut player = player(LocomotionStrategyKind::Kinematic);
        let mut body = MockBody::on_floor();
        player.handle_trigger(TriggerEvent::Enter(wall()));

        player.fixed_tick(&axes(0.0, 1.0), &mut body, DT);

        assert!(!body.gravity_enabled);
        assert!((body.position.y - 3.0 * DT).abs() < 1e-6);
    }
}
