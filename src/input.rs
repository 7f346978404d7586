//! Input model: pointer buttons, modifier keys, keys, and the gesture state machine.
//!
//! `InputState` is the gesture tracked between pointer-down and pointer-up.
//! A press that does not start a frame gesture is held as `Pressed` until it
//! either travels far enough to become a background pan or is released as a
//! click (select or deselect).

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::consts::PAN_START_THRESHOLD_PX;
use crate::frame::FrameId;
use crate::gesture::ActiveGesture;
use crate::viewport::Point;

/// Host pointer identifier, used for pointer capture.
pub type PointerId = i32;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Meta / Command key.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key as reported by the browser (e.g. `"Delete"`, `"ArrowLeft"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.0 == name
    }

    /// Case-insensitive match for single-letter shortcuts (Shift changes the reported case).
    #[must_use]
    pub fn is_letter(&self, letter: char) -> bool {
        let mut chars = self.0.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if c.eq_ignore_ascii_case(&letter))
    }

    /// World-unit direction for an arrow key.
    #[must_use]
    pub fn arrow_direction(&self) -> Option<(f64, f64)> {
        match self.0.as_str() {
            "ArrowLeft" => Some((-1.0, 0.0)),
            "ArrowRight" => Some((1.0, 0.0)),
            "ArrowUp" => Some((0.0, -1.0)),
            "ArrowDown" => Some((0.0, 1.0)),
            _ => None,
        }
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down, zooms out).
    pub dy: f64,
}

/// Gesture state between pointer-down and pointer-up.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A press that has not moved past the pan threshold yet.
    Pressed {
        pointer_id: PointerId,
        button: Button,
        /// Screen position of the press.
        start: Point,
        /// Frame body under the press, if any. A primary click selects it on release.
        target: Option<FrameId>,
        /// Whether moving far enough turns this press into a pan.
        can_pan: bool,
    },
    /// Background pan with the pointer captured.
    Panning {
        pointer_id: PointerId,
        /// Screen position of the previous event.
        last: Point,
    },
    /// A frame gesture with the pointer captured.
    Frame(ActiveGesture),
}

impl InputState {
    /// The pointer this state is tracking, if any.
    #[must_use]
    pub fn pointer_id(&self) -> Option<PointerId> {
        match self {
            Self::Idle => None,
            Self::Pressed { pointer_id, .. } | Self::Panning { pointer_id, .. } => Some(*pointer_id),
            Self::Frame(g) => Some(g.pointer_id),
        }
    }

    /// Whether the tracked pointer is captured by the engine.
    #[must_use]
    pub fn holds_capture(&self) -> bool {
        matches!(self, Self::Panning { .. } | Self::Frame(_))
    }
}

/// Whether a press at `start` has moved far enough to become a pan.
#[must_use]
pub fn exceeds_pan_threshold(start: Point, current: Point) -> bool {
    (current.x - start.x).hypot(current.y - start.y) > PAN_START_THRESHOLD_PX
}
