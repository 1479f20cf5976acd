//! Line-of-sight query between the camera and its target.

use bevy_ecs::prelude::*;
use glam::Vec3;
use rapier3d::prelude::*;
use rustc_hash::FxHashMap;

use crate::{PhysicsWorld, to_vector};

/// String tags attached to colliders, used to pick which obstructions fade.
#[derive(Resource, Default, Debug)]
pub struct ColliderTags(pub FxHashMap<ColliderHandle, String>);

impl ColliderTags {
    pub fn insert(&mut self, collider: ColliderHandle, tag: impl Into<String>) {
        self.0.insert(collider, tag.into());
    }

    pub fn has_tag(&self, collider: ColliderHandle, tag: &str) -> bool {
        self.0.get(&collider).is_some_and(|t| t == tag)
    }
}

/// Every collider tagged `tag` that the segment `from → to` passes through.
///
/// Sensors are ignored. The result has no duplicates and is ordered by
/// collider handle.
pub fn obstructions_between(
    physics: &PhysicsWorld,
    tags: &ColliderTags,
    from: Vec3,
    to: Vec3,
    tag: &str,
) -> Vec<ColliderHandle> {
    let offset = to - from;
    let distance = offset.length();
    if distance <= f32::EPSILON {
        return Vec::new();
    }

    let query_pipeline = physics.broad_phase.as_query_pipeline(
        physics.narrow_phase.query_dispatcher(),
        &physics.rigid_body_set,
        &physics.collider_set,
        QueryFilter::new().exclude_sensors(),
    );
    let ray = Ray::new(to_vector(from), to_vector(offset / distance));

    let mut hits: Vec<ColliderHandle> = query_pipeline
        .intersect_ray(ray, distance, true)
        .map(|(handle, _, _)| handle)
        .filter(|&handle| tags.has_tag(handle, tag))
        .collect();
    hits.sort_by_key(|handle| handle.into_raw_parts());
    hits.dedup();
    hits
}
