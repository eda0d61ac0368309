/*!
 * Process View
 * Presentation state: displayed position, movement target and blink flag
 */

use crate::core::limits::{
    ANIMATION_FRAME_MS, ANIMATION_SPEED, MAX_ANIMATION_FRAMES_PER_UPDATE, PROCESS_VIEW_HEIGHT,
    PROCESS_VIEW_WIDTH,
};
use crate::core::types::{Bounds, Millis, Position};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessView {
    pub position: Position,
    pub target: Option<Position>,
    pub width: i32,
    pub height: i32,
    pub blink: bool,
}

impl ProcessView {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            target: None,
            width: PROCESS_VIEW_WIDTH,
            height: PROCESS_VIEW_HEIGHT,
            blink: false,
        }
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.target.is_some()
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.position, self.width, self.height)
    }

    pub fn set_target(&mut self, target: Position) {
        self.target = Some(target);
    }

    /// Move toward the target for `elapsed` ms of frames; true once on it
    ///
    /// The target is kept.
    pub fn move_toward_target(&mut self, elapsed: Millis) -> bool {
        let Some(target) = self.target else {
            return true;
        };
        let max_step = step_length(elapsed);
        self.position.x = approach(self.position.x, target.x, max_step);
        self.position.y = approach(self.position.y, target.y, max_step);
        self.position == target
    }

    /// Advance the animation and drop the target once it is reached
    pub fn step(&mut self, elapsed: Millis) {
        if self.move_toward_target(elapsed) {
            self.target = None;
        }
    }

    pub fn toggle_blink(&mut self) {
        self.blink = !self.blink;
    }
}

/// Per-axis distance covered in `elapsed` ms
fn step_length(elapsed: Millis) -> i32 {
    let frames = (elapsed / ANIMATION_FRAME_MS).clamp(1, MAX_ANIMATION_FRAMES_PER_UPDATE);
    ANIMATION_SPEED * frames as i32
}

#[inline]
fn approach(from: i32, to: i32, max_step: i32) -> i32 {
    if from < to {
        from.saturating_add(max_step).min(to)
    } else {
        from.saturating_sub(max_step).max(to)
    }
}
