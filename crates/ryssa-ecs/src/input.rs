//! Aggregated input state resource for the current frame.

use bevy_ecs::prelude::*;
use std::collections::HashSet;

/// Action name for the jump button.
pub const ACTION_JUMP: &str = "jump";
/// Action name for the sprint modifier.
pub const ACTION_SPRINT: &str = "sprint";

/// Aggregated input state for the current frame. Written by PreUpdate,
/// read by FixedUpdate and Update.
///
/// Analog axes are in `[-1, 1]`; pointer and scroll deltas are raw per-frame
/// amounts.
#[derive(Resource, Clone, Debug, Default)]
pub struct InputState {
    /// Actions that are currently held down.
    pub active_actions: HashSet<String>,
    /// Actions that were first pressed this frame.
    pub just_pressed: HashSet<String>,
    /// Actions that were released this frame.
    pub just_released: HashSet<String>,
    /// Movement axes `(horizontal, vertical)`.
    pub move_axes: (f32, f32),
    /// Pointer movement since last frame `(horizontal, vertical)`.
    pub pointer_delta: (f32, f32),
    /// Scroll wheel movement since last frame.
    pub scroll_delta: f32,
}

impl InputState {
    /// Returns true if the named action is currently held down.
    pub fn is_active(&self, action: &str) -> bool {
        self.active_actions.contains(action)
    }

    /// Returns true if the named action was first pressed this frame.
    pub fn just_pressed(&self, action: &str) -> bool {
        self.just_pressed.contains(action)
    }

    /// Returns true if the named action was released this frame.
    pub fn just_released(&self, action: &str) -> bool {
        self.just_released.contains(action)
    }

    /// Horizontal movement axis.
    pub fn horizontal(&self) -> f32 {
        self.move_axes.0
    }

    /// Vertical movement axis.
    pub fn vertical(&self) -> f32 {
        self.move_axes.1
    }

    /// Hold or release an action, recording the press/release edge.
    pub fn set_action(&mut self, action: &str, held: bool) {
        let was_held = self.active_actions.contains(action);
        if held && !was_held {
            self.active_actions.insert(action.to_string());
            self.just_pressed.insert(action.to_string());
        } else if !held && was_held {
            self.active_actions.remove(action);
            self.just_released.insert(action.to_string());
        }
    }

    /// Clear per-frame transient state. Called at the start of PreUpdate
    /// before processing new input events.
    pub fn clear_transients(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
        self.pointer_delta = (0.0, 0.0);
        self.scroll_delta = 0.0;
    }
}
