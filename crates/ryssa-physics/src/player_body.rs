//! Player rigid body: a capsule driven either by velocities (dynamic) or by
//! collision-resolved displacements through Rapier's character controller
//! (kinematic).

use bevy_ecs::prelude::Component;
use glam::Vec3;
use rapier3d::control::{CharacterAutostep, CharacterLength, KinematicCharacterController};
use rapier3d::math::Pose;
use rapier3d::parry::query::ShapeCastOptions;
use rapier3d::prelude::*;
use ryssa_config::LocomotionStrategyKind;
use ryssa_player::{GroundSensor, PlayerBody, PlayerError, SphereCast};

use crate::{PhysicsWorld, body_translation, to_vector};

/// Capsule half-height of the cylindrical segment (meters).
pub const CAPSULE_HALF_HEIGHT: f32 = 0.6;
/// Capsule radius (meters).
pub const CAPSULE_RADIUS: f32 = 0.3;
/// Distance from the capsule centre down to the feet.
pub const FOOT_OFFSET: f32 = CAPSULE_HALF_HEIGHT + CAPSULE_RADIUS;

/// How the body is simulated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    /// Integrated by Rapier; steered through velocity.
    Dynamic,
    /// Position-based; moved by the character controller.
    Kinematic,
}

impl From<LocomotionStrategyKind> for BodyKind {
    fn from(kind: LocomotionStrategyKind) -> Self {
        match kind {
            LocomotionStrategyKind::Force => BodyKind::Dynamic,
            LocomotionStrategyKind::Kinematic => BodyKind::Kinematic,
        }
    }
}

/// Handles and per-body state that Rapier itself does not keep.
#[derive(Component, Clone, Debug)]
pub struct PlayerBodyHandle {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
    pub kind: BodyKind,
    controller: KinematicCharacterController,
    /// Compass heading in radians. Rotation stays locked in the simulation.
    yaw: f32,
    gravity_enabled: bool,
    /// Last velocity of a kinematic body, derived from its displacement.
    kinematic_velocity: Vec3,
}

impl PlayerBodyHandle {
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Yaw-only orientation for rendering and transform sync.
    pub fn rotation(&self) -> glam::Quat {
        glam::Quat::from_rotation_y(-self.yaw)
    }
}

/// Spawns the player capsule with its feet at `feet`.
///
/// The capsule is 1.8m tall (2×0.6 half-height + 2×0.3 radius). Dynamic
/// bodies have their rotations locked so contacts never tip them over.
pub fn spawn_player_body(
    physics: &mut PhysicsWorld,
    feet: Vec3,
    kind: BodyKind,
) -> PlayerBodyHandle {
    let center = to_vector(feet + Vec3::Y * FOOT_OFFSET);
    let builder = match kind {
        BodyKind::Dynamic => RigidBodyBuilder::dynamic().lock_rotations(),
        BodyKind::Kinematic => RigidBodyBuilder::kinematic_position_based(),
    };
    let body = physics
        .rigid_body_set
        .insert(builder.translation(center).build());

    let mut collider = ColliderBuilder::capsule_y(CAPSULE_HALF_HEIGHT, CAPSULE_RADIUS);
    if kind == BodyKind::Kinematic {
        collider = collider.friction(0.0);
    }
    let collider =
        physics
            .collider_set
            .insert_with_parent(collider.build(), body, &mut physics.rigid_body_set);

    let controller = KinematicCharacterController {
        max_slope_climb_angle: std::f32::consts::FRAC_PI_4,
        min_slope_slide_angle: std::f32::consts::FRAC_PI_4,
        autostep: Some(CharacterAutostep {
            max_height: CharacterLength::Absolute(0.4),
            min_width: CharacterLength::Absolute(0.3),
            include_dynamic_bodies: false,
        }),
        snap_to_ground: Some(CharacterLength::Absolute(0.2)),
        offset: CharacterLength::Absolute(0.01),
        ..Default::default()
    };

    tracing::info!(?kind, x = feet.x, y = feet.y, z = feet.z, "Player body spawned");

    PlayerBodyHandle {
        body,
        collider,
        kind,
        controller,
        yaw: 0.0,
        gravity_enabled: true,
        kinematic_velocity: Vec3::ZERO,
    }
}

/// Borrowed view of the player body implementing the controller traits.
pub struct RapierPlayerBody<'a> {
    physics: &'a mut PhysicsWorld,
    handle: &'a mut PlayerBodyHandle,
}

impl<'a> RapierPlayerBody<'a> {
    /// Fails if the handle's body is not in `physics`.
    pub fn new(
        physics: &'a mut PhysicsWorld,
        handle: &'a mut PlayerBodyHandle,
    ) -> Result<Self, PlayerError> {
        if physics.rigid_body_set.get(handle.body).is_none() {
            return Err(PlayerError::MissingReference {
                component: "RapierPlayerBody",
                reference: "rigid body",
            });
        }
        Ok(Self { physics, handle })
    }

    fn rigid_body(&self) -> &RigidBody {
        &self.physics.rigid_body_set[self.handle.body]
    }

    fn rigid_body_mut(&mut self) -> &mut RigidBody {
        &mut self.physics.rigid_body_set[self.handle.body]
    }

    fn center(&self) -> Vec3 {
        body_translation(self.rigid_body())
    }
}

impl PlayerBody for RapierPlayerBody<'_> {
    /// Feet position.
    fn position(&self) -> Vec3 {
        self.center() - Vec3::Y * FOOT_OFFSET
    }

    fn velocity(&self) -> Vec3 {
        match self.handle.kind {
            BodyKind::Dynamic => {
                let v = self.rigid_body().linvel();
                Vec3::new(v.x, v.y, v.z)
            }
            BodyKind::Kinematic => self.handle.kinematic_velocity,
        }
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        match self.handle.kind {
            BodyKind::Dynamic => self.rigid_body_mut().set_linvel(to_vector(velocity), true),
            BodyKind::Kinematic => self.handle.kinematic_velocity = velocity,
        }
    }

    fn add_acceleration(&mut self, acceleration: Vec3, dt: f32) {
        let velocity = self.velocity() + acceleration * dt;
        self.set_velocity(velocity);
    }

    fn set_gravity_enabled(&mut self, enabled: bool) {
        self.handle.gravity_enabled = enabled;
        if self.handle.kind == BodyKind::Dynamic {
            let scale = if enabled { 1.0 } else { 0.0 };
            self.rigid_body_mut().set_gravity_scale(scale, true);
        }
    }

    fn gravity_enabled(&self) -> bool {
        self.handle.gravity_enabled
    }

    fn set_yaw(&mut self, yaw: f32) {
        self.handle.yaw = yaw;
    }

    /// Kinematic bodies resolve the move against the world and report ground
    /// contact. Dynamic bodies are teleported and never report ground.
    fn move_by(&mut self, displacement: Vec3, dt: f32) -> bool {
        if self.handle.kind == BodyKind::Dynamic {
            let target = to_vector(self.center() + displacement);
            self.rigid_body_mut().set_translation(target, true);
            return false;
        }

        let filter = QueryFilter::new()
            .exclude_rigid_body(self.handle.body)
            .exclude_sensors();
        let query_pipeline = self.physics.broad_phase.as_query_pipeline(
            self.physics.narrow_phase.query_dispatcher(),
            &self.physics.rigid_body_set,
            &self.physics.collider_set,
            filter,
        );

        let character_shape = Capsule::new_y(CAPSULE_HALF_HEIGHT, CAPSULE_RADIUS);
        let body_pos = self.physics.rigid_body_set[self.handle.body].position();

        let corrected = self.handle.controller.move_shape(
            dt,
            &query_pipeline,
            &character_shape,
            body_pos,
            to_vector(displacement),
            |_| {},
        );

        let moved = Vec3::new(
            corrected.translation.x,
            corrected.translation.y,
            corrected.translation.z,
        );
        let target = to_vector(self.center() + moved);
        self.rigid_body_mut().set_next_kinematic_translation(target);
        if dt > 0.0 {
            self.handle.kinematic_velocity = moved / dt;
        }
        corrected.grounded
    }
}

impl GroundSensor for RapierPlayerBody<'_> {
    fn sphere_cast(&self, cast: &SphereCast) -> bool {
        let groups =
            InteractionGroups::all().with_filter(Group::from_bits_truncate(cast.layer_mask));
        let filter = QueryFilter::new()
            .exclude_rigid_body(self.handle.body)
            .exclude_sensors()
            .groups(groups);
        let query_pipeline = self.physics.broad_phase.as_query_pipeline(
            self.physics.narrow_phase.query_dispatcher(),
            &self.physics.rigid_body_set,
            &self.physics.collider_set,
            filter,
        );

        let pose = Pose::from_translation(to_vector(cast.origin));
        let options = ShapeCastOptions::with_max_time_of_impact(cast.max_distance);
        query_pipeline
            .cast_shape(
                &pose,
                to_vector(cast.direction),
                &Ball::new(cast.radius),
                options,
            )
            .is_some()
    }
}
