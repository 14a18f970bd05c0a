//! Input event types and pointer tracking.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Arrow direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Unit step in percent space (y grows downward).
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
        }
    }
}

/// A logical key, independent of the host's event system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Arrow(Direction),
    Escape,
    Enter,
    Delete,
    /// Printable character, lowercased.
    Char(char),
}

impl Key {
    /// Parse a key name as reported by browsers (`KeyboardEvent.key`).
    pub fn from_name(name: &str) -> Option<Key> {
        let key = match name {
            "ArrowLeft" | "Left" => Key::Arrow(Direction::Left),
            "ArrowRight" | "Right" => Key::Arrow(Direction::Right),
            "ArrowUp" | "Up" => Key::Arrow(Direction::Up),
            "ArrowDown" | "Down" => Key::Arrow(Direction::Down),
            "Escape" | "Esc" => Key::Escape,
            "Enter" | "Return" => Key::Enter,
            "Delete" | "Backspace" => Key::Delete,
            _ => {
                let mut chars = name.chars();
                let c = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                Key::Char(c.to_ascii_lowercase())
            }
        };
        Some(key)
    }

    /// Display name used in shortcut listings.
    pub fn name(&self) -> String {
        match self {
            Key::Arrow(Direction::Left) => "Left".to_string(),
            Key::Arrow(Direction::Right) => "Right".to_string(),
            Key::Arrow(Direction::Up) => "Up".to_string(),
            Key::Arrow(Direction::Down) => "Down".to_string(),
            Key::Escape => "Escape".to_string(),
            Key::Enter => "Enter".to_string(),
            Key::Delete => "Delete".to_string(),
            Key::Char(c) => c.to_ascii_uppercase().to_string(),
        }
    }

    pub fn arrow(&self) -> Option<Direction> {
        match self {
            Key::Arrow(direction) => Some(*direction),
            _ => None,
        }
    }
}

/// A key press with the modifiers held at the time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPress {
    pub key: Key,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }
}

/// Double-click detection constants.
const DOUBLE_CLICK_TIME_MS: u128 = 500;
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Tracks pointer position and click timing between events.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    /// Last known pointer position in screen pixels.
    pub position: Point,
    last_click_time: Option<Instant>,
    last_click_position: Option<Point>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn moved(&mut self, position: Point) {
        self.position = position;
    }

    /// Record a button press at `now`; returns true if it completes a double-click.
    pub fn pressed_at(&mut self, position: Point, now: Instant) -> bool {
        self.position = position;
        if let (Some(last_time), Some(last_pos)) = (self.last_click_time, self.last_click_position) {
            let elapsed = now.saturating_duration_since(last_time).as_millis();
            if elapsed < DOUBLE_CLICK_TIME_MS && position.distance(last_pos) < DOUBLE_CLICK_DISTANCE {
                // Reset so a third click starts a new sequence.
                self.last_click_time = None;
                self.last_click_position = None;
                return true;
            }
        }
        self.last_click_time = Some(now);
        self.last_click_position = Some(position);
        false
    }

    /// Record a button press now.
    pub fn pressed(&mut self, position: Point) -> bool {
        self.pressed_at(position, Instant::now())
    }
}
