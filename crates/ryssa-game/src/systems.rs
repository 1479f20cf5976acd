//! ECS systems wiring the player core to physics, input and presentation.

use bevy_ecs::prelude::*;
use glam::Vec3;
use ryssa_ecs::{InputState, Position, Rotation, TimeRes};
use ryssa_physics::{
    ClimbVolumes, ColliderTags, FOOT_OFFSET, PhysicsWorld, PlayerBodyHandle, RapierPlayerBody,
    body_translation, obstructions_between,
};
use ryssa_player::{CameraRig, Player};
use tracing::{debug, info};

use crate::materials::{CameraFade, MaterialTable};

/// Links a camera rig to the entity it frames.
#[derive(Component, Clone, Copy, Debug)]
pub struct CameraFollow {
    pub target: Entity,
    /// Height above the target's feet that the camera looks at.
    pub look_height: f32,
}

/// Counters reported at the end of a session.
#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct SessionStats {
    pub jumps: u32,
    pub climbs_started: u32,
    pub max_height: f32,
    pub max_faded: usize,
}

/// Feeds climbable-volume overlap events to each player.
pub fn trigger_detection_system(
    physics: Res<PhysicsWorld>,
    mut volumes: ResMut<ClimbVolumes>,
    mut players: Query<(&mut Player, &PlayerBodyHandle)>,
) {
    for (mut player, handle) in &mut players {
        for event in volumes.detect(&physics, handle.collider) {
            player.handle_trigger(event);
        }
    }
}

/// Runs the climb state machine ahead of locomotion integration.
pub fn climb_resolve_system(
    mut physics: ResMut<PhysicsWorld>,
    input: Res<InputState>,
    time: Res<TimeRes>,
    mut stats: ResMut<SessionStats>,
    mut players: Query<(&mut Player, &mut PlayerBodyHandle)>,
) {
    for (mut player, mut handle) in &mut players {
        let Ok(mut body) = RapierPlayerBody::new(&mut physics, &mut handle) else {
            continue;
        };
        let was_climbing = player.climb().is_climbing();
        player.resolve_climb(&input, &mut body, time.fixed_delta);
        if !was_climbing && player.climb().is_climbing() {
            stats.climbs_started += 1;
        }
    }
}

/// Locomotion integration: velocity blending, extra gravity or displacement.
pub fn force_application_system(
    mut physics: ResMut<PhysicsWorld>,
    time: Res<TimeRes>,
    mut players: Query<(&mut Player, &mut PlayerBodyHandle)>,
) {
    for (mut player, mut handle) in &mut players {
        let Ok(mut body) = RapierPlayerBody::new(&mut physics, &mut handle) else {
            continue;
        };
        player.apply_locomotion(&mut body, time.fixed_delta);
    }
}

/// Copies the simulated body back into the transform components.
pub fn physics_sync_system(
    physics: Res<PhysicsWorld>,
    mut stats: ResMut<SessionStats>,
    mut bodies: Query<(&PlayerBodyHandle, &mut Position, &mut Rotation)>,
) {
    for (handle, mut position, mut rotation) in &mut bodies {
        let Some(body) = physics.rigid_body_set.get(handle.body) else {
            continue;
        };
        position.0 = body_translation(body) - Vec3::Y * FOOT_OFFSET;
        rotation.0 = handle.rotation();
        stats.max_height = stats.max_height.max(position.0.y);
    }
}

/// Per-frame locomotion: input sampling, ground test and jump.
pub fn locomotion_frame_system(
    mut physics: ResMut<PhysicsWorld>,
    input: Res<InputState>,
    mut stats: ResMut<SessionStats>,
    mut players: Query<(&mut Player, &mut PlayerBodyHandle)>,
    cameras: Query<&Rotation, Without<Player>>,
) {
    for (mut player, mut handle) in &mut players {
        let camera_rotation = cameras
            .get(player.camera())
            .map(|r| r.0)
            .unwrap_or_default();
        let Ok(mut body) = RapierPlayerBody::new(&mut physics, &mut handle) else {
            continue;
        };
        if player.frame_tick(&input, camera_rotation, &mut body) {
            stats.jumps += 1;
            debug!(jumps = stats.jumps, "Player jumped");
        }
    }
}

/// Orbits each camera rig around its target and turns the target to match.
#[allow(clippy::type_complexity)]
pub fn camera_rig_system(
    mut physics: ResMut<PhysicsWorld>,
    input: Res<InputState>,
    mut cameras: Query<
        (&mut CameraRig, &CameraFollow, &mut Position, &mut Rotation),
        Without<Player>,
    >,
    mut targets: Query<(&mut Player, &mut PlayerBodyHandle, &Position)>,
) {
    for (mut rig, follow, mut position, mut rotation) in &mut cameras {
        let Ok((mut player, mut handle, target)) = targets.get_mut(follow.target) else {
            continue;
        };
        let pose = rig.tick(&input, target.0 + Vec3::Y * follow.look_height);
        position.0 = pose.position;
        rotation.0 = pose.rotation;

        if let Ok(mut body) = RapierPlayerBody::new(&mut physics, &mut handle) {
            player.set_yaw(rig.yaw_radians(), &mut body);
        }
    }
}

/// Fades tagged geometry between each camera and what it follows.
pub fn obstruction_fade_system(
    physics: Res<PhysicsWorld>,
    tags: Res<ColliderTags>,
    time: Res<TimeRes>,
    mut fade: ResMut<CameraFade>,
    mut materials: ResMut<MaterialTable>,
    mut stats: ResMut<SessionStats>,
    cameras: Query<(&Position, &CameraFollow), With<CameraRig>>,
    targets: Query<&Position, Without<CameraRig>>,
) {
    let mut obstructing = Vec::new();
    for (camera, follow) in &cameras {
        let Ok(target) = targets.get(follow.target) else {
            continue;
        };
        let look_at = target.0 + Vec3::Y * follow.look_height;
        let cull_tag = fade.0.settings().cull_tag.clone();
        obstructing.extend(obstructions_between(
            &physics, &tags, camera.0, look_at, &cull_tag,
        ));
    }

    let before = fade.0.tracked_count();
    fade.0.tick(&obstructing, &mut *materials, time.delta);
    let after = fade.0.tracked_count();
    if before != after {
        info!(tracked = after, "Obstruction set changed");
    }
    stats.max_faded = stats.max_faded.max(after);
}
