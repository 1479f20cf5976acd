//! Climbable trigger volumes and the overlap events they produce.

use std::sync::Arc;

use bevy_ecs::prelude::*;
use glam::Vec3;
use rapier3d::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use ryssa_player::{ClimbProfile, TriggerEvent};
use tracing::debug;

use crate::{PhysicsWorld, to_vector};

/// Sensor colliders marking climbable surfaces, each with its profile.
#[derive(Resource, Default)]
pub struct ClimbVolumes {
    profiles: FxHashMap<ColliderHandle, Arc<ClimbProfile>>,
    /// Volumes the player overlapped on the previous detection pass.
    overlapping: FxHashSet<ColliderHandle>,
}

impl ClimbVolumes {
    /// Insert a box-shaped climbable sensor centred at `center`.
    pub fn add_box(
        &mut self,
        physics: &mut PhysicsWorld,
        center: Vec3,
        half_extents: Vec3,
        profile: Arc<ClimbProfile>,
    ) -> ColliderHandle {
        let body = RigidBodyBuilder::fixed()
            .translation(to_vector(center))
            .build();
        let body = physics.rigid_body_set.insert(body);
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .sensor(true)
            .active_collision_types(ActiveCollisionTypes::all())
            .build();
        let handle =
            physics
                .collider_set
                .insert_with_parent(collider, body, &mut physics.rigid_body_set);
        self.profiles.insert(handle, profile);
        handle
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Profile attached to a volume.
    pub fn profile(&self, volume: ColliderHandle) -> Option<&Arc<ClimbProfile>> {
        self.profiles.get(&volume)
    }

    /// Compare the player collider's current sensor intersections with the
    /// previous pass and report the changes.
    ///
    /// Exits come first, then an `Enter` or `Stay` for every volume still
    /// overlapping, so a surface that remains in contact re-asserts itself
    /// after any exit.
    pub fn detect(
        &mut self,
        physics: &PhysicsWorld,
        player: ColliderHandle,
    ) -> Vec<TriggerEvent> {
        let narrow_phase = &physics.narrow_phase;
        let current: FxHashSet<ColliderHandle> = self
            .profiles
            .keys()
            .copied()
            .filter(|&volume| narrow_phase.intersection_pair(player, volume) == Some(true))
            .collect();

        let mut events = Vec::new();
        for volume in self.overlapping.difference(&current) {
            debug!(?volume, "Left climbable volume");
            events.push(TriggerEvent::Exit);
        }
        for volume in &current {
            let Some(profile) = self.profiles.get(volume) else {
                continue;
            };
            if self.overlapping.contains(volume) {
                events.push(TriggerEvent::Stay(Arc::clone(profile)));
            } else {
                debug!(?volume, "Entered climbable volume");
                events.push(TriggerEvent::Enter(Arc::clone(profile)));
            }
        }

        self.overlapping = current;
        events
    }
}
