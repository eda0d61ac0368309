/*!
 * Core Types
 * Common types used across the simulation
 */

use serde::{Deserialize, Serialize};

/// Process ID type
pub type Pid = u32;

/// Simulation time in milliseconds
pub type Timestamp = u64;

/// Duration in simulation milliseconds
pub type Millis = u64;

/// Screen-space coordinate pair used by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box, inclusive of its top-left edge and exclusive of the bottom-right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub origin: Position,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub const fn new(origin: Position, width: i32, height: i32) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    pub fn contains(&self, point: Position) -> bool {
        point.x >= self.origin.x
            && point.x < self.origin.x + self.width
            && point.y >= self.origin.y
            && point.y < self.origin.y + self.height
    }
}

/// Input delivered by the host once per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputEvent {
    /// Primary pointer button released over `position`
    PointerClick { position: Position },
    /// Pointer moved to `position`
    PointerMotion { position: Position },
    /// Keyboard key released
    KeyUp { key: char },
}

impl InputEvent {
    pub fn click(x: i32, y: i32) -> Self {
        Self::PointerClick {
            position: Position::new(x, y),
        }
    }
}
