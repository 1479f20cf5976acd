//! Scripted input timeline that stands in for a player at the keyboard.

use std::ops::Range;

use bevy_ecs::prelude::*;
use ryssa_ecs::{ACTION_JUMP, ACTION_SPRINT, InputState, TimeRes};

/// Input held constant over a range of frames.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub frames: Range<u64>,
    /// `(horizontal, vertical)` movement axes.
    pub axes: (f32, f32),
    /// Actions held for the whole segment.
    pub held: &'static [&'static str],
    pub pointer: (f32, f32),
    pub scroll: f32,
}

impl Segment {
    fn idle(frames: Range<u64>) -> Self {
        Self {
            frames,
            axes: (0.0, 0.0),
            held: &[],
            pointer: (0.0, 0.0),
            scroll: 0.0,
        }
    }
}

/// Ordered, non-overlapping input segments. Frames outside every segment
/// produce no input.
#[derive(Resource, Clone, Debug, Default)]
pub struct InputScript {
    segments: Vec<Segment>,
}

impl InputScript {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Walk to the wall and climb it, hop, orbit the camera while zooming
    /// in, then sprint-strafe.
    pub fn demo() -> Self {
        Self::new(vec![
            Segment::idle(0..30),
            Segment {
                axes: (0.0, 1.0),
                ..Segment::idle(30..330)
            },
            Segment {
                held: &[ACTION_JUMP],
                ..Segment::idle(360..370)
            },
            Segment {
                pointer: (1.5, 0.0),
                ..Segment::idle(380..440)
            },
            Segment {
                pointer: (0.0, -0.5),
                scroll: 0.05,
                ..Segment::idle(440..480)
            },
            Segment {
                axes: (1.0, 0.0),
                held: &[ACTION_SPRINT],
                ..Segment::idle(480..560)
            },
        ])
    }

    /// Segment active at `frame`, if any.
    pub fn sample(&self, frame: u64) -> Option<&Segment> {
        self.segments.iter().find(|s| s.frames.contains(&frame))
    }

    /// Write the input for `frame` into `input`, recording button edges.
    pub fn apply(&self, frame: u64, input: &mut InputState) {
        let segment = self.sample(frame);
        let held = segment.map_or(&[][..], |s| s.held);
        for action in [ACTION_JUMP, ACTION_SPRINT] {
            input.set_action(action, held.contains(&action));
        }
        input.move_axes = segment.map_or((0.0, 0.0), |s| s.axes);
        input.pointer_delta = segment.map_or((0.0, 0.0), |s| s.pointer);
        input.scroll_delta = segment.map_or(0.0, |s| s.scroll);
    }
}

/// Resets per-frame input transients.
pub fn clear_input_system(mut input: ResMut<InputState>) {
    input.clear_transients();
}

/// Feeds the script into [`InputState`] for the current frame.
pub fn scripted_input_system(
    script: Res<InputScript>,
    time: Res<TimeRes>,
    mut input: ResMut<InputState>,
) {
    script.apply(time.frame, &mut input);
}
