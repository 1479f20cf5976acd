//! Rapier physics boundary for the player core.
//!
//! Owns the simulation in a single [`PhysicsWorld`] resource and adapts it to
//! the engine-independent [`ryssa_player::PlayerBody`] and
//! [`ryssa_player::GroundSensor`] traits. Climbable trigger volumes and the
//! camera obstruction ray live here too, since both are collision queries.

use bevy_ecs::prelude::*;
use rapier3d::prelude::*;
use ryssa_config::PhysicsConfig;
use tracing::debug;

pub mod climb_volumes;
pub mod obstruction;
pub mod player_body;

pub use climb_volumes::ClimbVolumes;
pub use obstruction::{ColliderTags, obstructions_between};
pub use player_body::{
    BodyKind, CAPSULE_HALF_HEIGHT, CAPSULE_RADIUS, FOOT_OFFSET, PlayerBodyHandle, RapierPlayerBody,
    spawn_player_body,
};

/// Convert a workspace vector to rapier's vector type.
pub fn to_vector(v: glam::Vec3) -> Vector {
    Vector::new(v.x, v.y, v.z)
}

/// Convert rapier's vector type to a workspace vector.
pub fn to_glam(v: Vector) -> glam::Vec3 {
    glam::Vec3::new(v.x, v.y, v.z)
}

/// World-space translation of `body` as a workspace vector.
pub fn body_translation(body: &RigidBody) -> glam::Vec3 {
    let t = body.translation();
    glam::Vec3::new(t.x, t.y, t.z)
}

/// Central physics simulation resource owning all Rapier state.
///
/// Systems read via `Res<PhysicsWorld>` for queries or mutate via
/// `ResMut<PhysicsWorld>` to add bodies and step.
#[derive(Resource)]
pub struct PhysicsWorld {
    pub gravity: Vector,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    /// Broad phase; also provides the query pipeline.
    pub broad_phase: BroadPhaseBvh,
    pub narrow_phase: NarrowPhase,
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
}

impl PhysicsWorld {
    /// A world with gravity `(0, -9.81, 0)` stepping at 60 Hz.
    pub fn new() -> Self {
        Self::from_config(&PhysicsConfig::default())
    }

    /// A world using the configured gravity and fixed rate.
    pub fn from_config(config: &PhysicsConfig) -> Self {
        let dt = if config.fixed_hz > 0.0 {
            (1.0 / config.fixed_hz) as f32
        } else {
            1.0 / 60.0
        };
        let integration_parameters = IntegrationParameters {
            dt,
            ..Default::default()
        };
        debug!(gravity_y = config.gravity_y, dt, "Physics world created");

        Self {
            gravity: Vector::new(0.0, config.gravity_y, 0.0),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Advances the simulation by one fixed timestep.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            &(),
            &(),
        );
    }

    /// Fixed timestep in seconds.
    pub fn dt(&self) -> f32 {
        self.integration_parameters.dt
    }

    pub fn set_gravity(&mut self, x: f32, y: f32, z: f32) {
        self.gravity = Vector::new(x, y, z);
    }

    /// Current gravity as `(x, y, z)`.
    pub fn gravity(&self) -> (f32, f32, f32) {
        (self.gravity.x, self.gravity.y, self.gravity.z)
    }

    /// Insert a fixed cuboid centred at `center`. Returns its collider.
    pub fn add_fixed_cuboid(
        &mut self,
        center: glam::Vec3,
        half_extents: glam::Vec3,
    ) -> ColliderHandle {
        let body = RigidBodyBuilder::fixed()
            .translation(to_vector(center))
            .build();
        let handle = self.rigid_body_set.insert(body);
        let collider =
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set)
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Steps the simulation once per invocation. Runs in the fixed schedule.
pub fn physics_step_system(mut physics: ResMut<PhysicsWorld>) {
    physics.step();
}
