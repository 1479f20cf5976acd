//! Fades geometry that blocks the line of sight between camera and target.

use std::hash::Hash;

use ryssa_config::FadeConfig;
use rustc_hash::FxHashMap;
use tracing::trace;

/// How a material is composited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlendMode {
    #[default]
    Opaque,
    AlphaBlend,
}

/// Material access for the renderers the fade effect touches.
///
/// `K` identifies a renderer; each renderer has one or more material slots.
pub trait FadeMaterials<K> {
    /// Number of material slots on `renderer`; zero if it no longer exists.
    fn material_count(&self, renderer: &K) -> usize;
    fn alpha(&self, renderer: &K, slot: usize) -> f32;
    fn set_alpha(&mut self, renderer: &K, slot: usize, alpha: f32);
    fn set_blend_mode(&mut self, renderer: &K, slot: usize, mode: BlendMode);
}

/// Tracks faded renderers and eases their alpha each tick.
#[derive(Clone, Debug)]
pub struct ObstructionFade<K> {
    settings: FadeConfig,
    /// Original alpha per material slot, keyed by renderer.
    originals: FxHashMap<K, Vec<f32>>,
}

impl<K: Eq + Hash + Clone> ObstructionFade<K> {
    pub fn new(settings: FadeConfig) -> Self {
        Self {
            settings,
            originals: FxHashMap::default(),
        }
    }

    pub fn settings(&self) -> &FadeConfig {
        &self.settings
    }

    /// New settings take effect from the next tick; tracked renderers keep
    /// their stored originals.
    pub fn set_settings(&mut self, settings: FadeConfig) {
        self.settings = settings;
    }

    /// Whether `renderer` is currently faded or restoring.
    pub fn is_tracked(&self, renderer: &K) -> bool {
        self.originals.contains_key(renderer)
    }

    pub fn tracked_count(&self) -> usize {
        self.originals.len()
    }

    /// Advance the effect by one frame.
    ///
    /// `obstructing` lists the tagged renderers on the camera-to-target ray
    /// this frame. They ease toward the translucent alpha; tracked renderers
    /// absent from the list ease back and are evicted once every slot is
    /// within the restore epsilon of its original alpha.
    pub fn tick<M: FadeMaterials<K>>(&mut self, obstructing: &[K], materials: &mut M, dt: f32) {
        let t = (dt * self.settings.fade_speed).clamp(0.0, 1.0);

        for renderer in obstructing {
            let count = materials.material_count(renderer);
            if count == 0 {
                continue;
            }
            if !self.originals.contains_key(renderer) {
                let alphas = (0..count).map(|slot| materials.alpha(renderer, slot)).collect();
                trace!(slots = count, "Obstruction fading");
                self.originals.insert(renderer.clone(), alphas);
            }
            for slot in 0..count {
                let alpha = materials.alpha(renderer, slot);
                let eased = lerp(alpha, self.settings.transparent_alpha, t);
                materials.set_alpha(renderer, slot, eased);
                materials.set_blend_mode(renderer, slot, BlendMode::AlphaBlend);
            }
        }

        let epsilon = self.settings.restore_epsilon;
        self.originals.retain(|renderer, originals| {
            if obstructing.contains(renderer) {
                return true;
            }
            let count = materials.material_count(renderer).min(originals.len());
            let mut restored = true;
            for (slot, &original) in originals.iter().enumerate().take(count) {
                let eased = lerp(materials.alpha(renderer, slot), original, t);
                materials.set_alpha(renderer, slot, eased);
                if (eased - original).abs() < epsilon {
                    materials.set_blend_mode(renderer, slot, BlendMode::Opaque);
                } else {
                    restored = false;
                }
            }
            if restored {
                trace!("Obstruction restored");
            }
            !restored
        });
    }
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}
