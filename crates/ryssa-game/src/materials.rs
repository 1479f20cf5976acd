//! Per-collider material table standing in for renderer materials.

use bevy_ecs::prelude::*;
use rapier3d::prelude::ColliderHandle;
use rustc_hash::FxHashMap;
use ryssa_player::{BlendMode, FadeMaterials, ObstructionFade};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub alpha: f32,
    pub blend: BlendMode,
}

impl Material {
    pub fn opaque() -> Self {
        Self {
            alpha: 1.0,
            blend: BlendMode::Opaque,
        }
    }
}

/// Materials of every renderable collider, one entry per material slot.
#[derive(Resource, Default, Debug)]
pub struct MaterialTable {
    slots: FxHashMap<ColliderHandle, Vec<Material>>,
}

impl MaterialTable {
    pub fn insert(&mut self, renderer: ColliderHandle, materials: Vec<Material>) {
        self.slots.insert(renderer, materials);
    }

    pub fn get(&self, renderer: ColliderHandle) -> Option<&[Material]> {
        self.slots.get(&renderer).map(Vec::as_slice)
    }
}

impl FadeMaterials<ColliderHandle> for MaterialTable {
    fn material_count(&self, renderer: &ColliderHandle) -> usize {
        self.slots.get(renderer).map_or(0, Vec::len)
    }

    fn alpha(&self, renderer: &ColliderHandle, slot: usize) -> f32 {
        self.slots
            .get(renderer)
            .and_then(|m| m.get(slot))
            .map_or(1.0, |m| m.alpha)
    }

    fn set_alpha(&mut self, renderer: &ColliderHandle, slot: usize, alpha: f32) {
        if let Some(material) = self.slots.get_mut(renderer).and_then(|m| m.get_mut(slot)) {
            material.alpha = alpha;
        }
    }

    fn set_blend_mode(&mut self, renderer: &ColliderHandle, slot: usize, mode: BlendMode) {
        if let Some(material) = self.slots.get_mut(renderer).and_then(|m| m.get_mut(slot)) {
            material.blend = mode;
        }
    }
}

/// The camera's obstruction fade state.
#[derive(Resource, Debug)]
pub struct CameraFade(pub ObstructionFade<ColliderHandle>);
