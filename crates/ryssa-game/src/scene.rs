//! Test level: a floor, a climbable wall, and a pillar between the camera and
//! the player's start.

use std::sync::Arc;

use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};
use rapier3d::prelude::ColliderHandle;
use ryssa_config::Config;
use ryssa_ecs::{Name, Position, Rotation};
use ryssa_physics::{BodyKind, ClimbVolumes, ColliderTags, PhysicsWorld, spawn_player_body};
use ryssa_player::{CameraRig, ClimbProfile, Player, ProfileError};
use tracing::{error, info};

use crate::materials::{Material, MaterialTable};
use crate::systems::CameraFollow;

/// Climb profile of the test wall.
pub const IVY_PROFILE: &str = "(climb_speed: 3.0, allow_strafe: false)";

pub const PLAYER_START: Vec3 = Vec3::ZERO;
pub const CAMERA_START: Vec3 = Vec3::new(0.0, 4.0, 8.0);
/// Height above the player's feet the camera frames.
pub const LOOK_HEIGHT: f32 = 1.6;
/// Front face of the climbable wall.
pub const WALL_FACE_Z: f32 = -6.0;
pub const WALL_HEIGHT: f32 = 8.0;
/// Depth of the climb trigger in front of the wall face.
const CLIMB_REACH: f32 = 1.0;

/// Entities created by [`build_scene`].
#[derive(Clone, Copy, Debug)]
pub struct SceneEntities {
    pub camera: Entity,
    /// `None` if the player failed to initialize.
    pub player: Option<Entity>,
    pub pillar: ColliderHandle,
}

/// Populate `world` with the level, the player and the camera.
///
/// Components missing a required reference are reported and left out; the
/// session keeps running without them.
pub fn build_scene(world: &mut World, config: &Config) -> Result<SceneEntities, ProfileError> {
    let ivy = Arc::new(ClimbProfile::from_ron_str(IVY_PROFILE)?);

    let pillar = world.resource_scope(|world, mut physics: Mut<PhysicsWorld>| {
        physics.add_fixed_cuboid(Vec3::new(0.0, -0.5, 0.0), Vec3::new(50.0, 0.5, 50.0));

        let half_wall = WALL_HEIGHT / 2.0;
        physics.add_fixed_cuboid(
            Vec3::new(0.0, half_wall, WALL_FACE_Z - 0.5),
            Vec3::new(3.0, half_wall, 0.5),
        );
        world.resource_mut::<ClimbVolumes>().add_box(
            &mut physics,
            Vec3::new(0.0, half_wall, WALL_FACE_Z + CLIMB_REACH / 2.0),
            Vec3::new(3.0, half_wall, CLIMB_REACH / 2.0),
            ivy,
        );

        let pillar =
            physics.add_fixed_cuboid(Vec3::new(0.0, 2.0, 4.0), Vec3::new(0.5, 2.0, 0.5));
        world
            .resource_mut::<ColliderTags>()
            .insert(pillar, config.fade.cull_tag.clone());
        world
            .resource_mut::<MaterialTable>()
            .insert(pillar, vec![Material::opaque(); 2]);
        pillar
    });

    let camera = world
        .spawn((
            Name::new("camera"),
            Position(CAMERA_START),
            Rotation::default(),
        ))
        .id();

    let player = spawn_player(world, config, camera);
    let target = player.map(|_| PLAYER_START + Vec3::Y * LOOK_HEIGHT);

    let rig = CameraRig::from_transform(
        config.camera.clone(),
        CAMERA_START,
        Quat::IDENTITY,
        target,
    );
    match (rig, player, target) {
        (Ok(rig), Some(player), Some(target)) => {
            let pose = rig.pose(target);
            let follow = CameraFollow {
                target: player,
                look_height: LOOK_HEIGHT,
            };
            world
                .entity_mut(camera)
                .insert((rig, follow, Position(pose.position), Rotation(pose.rotation)));
        }
        (Err(err), ..) => error!(%err, "Camera rig disabled"),
        _ => {}
    }

    // Scene queries only see colliders the broad phase has already indexed.
    world.resource_mut::<PhysicsWorld>().step();

    info!(?camera, ?player, "Scene built");
    Ok(SceneEntities {
        camera,
        player,
        pillar,
    })
}

fn spawn_player(world: &mut World, config: &Config, camera: Entity) -> Option<Entity> {
    let player = match Player::new(config.locomotion.clone(), &config.climb, Some(camera)) {
        Ok(player) => player,
        Err(err) => {
            error!(%err, "Player disabled");
            return None;
        }
    };

    let kind = BodyKind::from(config.locomotion.strategy);
    let handle = world.resource_scope(|_, mut physics: Mut<PhysicsWorld>| {
        spawn_player_body(&mut physics, PLAYER_START, kind)
    });

    Some(
        world
            .spawn((
                Name::new("player"),
                player,
                handle,
                Position(PLAYER_START),
                Rotation::default(),
            ))
            .id(),
    )
}
