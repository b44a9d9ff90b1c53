//! Platform-agnostic input events.
//!
//! These are fed into
//! [`SessionController::handle_event`](crate::session::SessionController::handle_event),
//! which normalizes pointer and single-finger touch into one gesture
//! stream. Multi-finger touches (finger id other than 0) are ignored.

use glam::DVec2;

/// Keys the switcher recognizes while active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Step selection one slot left.
    Left,
    /// Step selection one slot right.
    Right,
    /// Commit the current rounded selection.
    Enter,
    /// Any other key; ignored.
    Other,
}

/// Raw input events delivered by the host compositor.
///
/// Timestamps are the event's millisecond clock (compositor event
/// time); they only ever participate in differences, never in absolute
/// comparisons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary pointer button pressed or released.
    PointerButton {
        /// `true` for press, `false` for release.
        pressed: bool,
        /// Cursor position in output coordinates.
        pos: DVec2,
        /// Event timestamp in milliseconds.
        time_ms: u32,
    },
    /// Pointer moved to an absolute position.
    PointerMotion {
        /// Cursor position in output coordinates.
        pos: DVec2,
        /// Event timestamp in milliseconds.
        time_ms: u32,
    },
    /// Touch point went down.
    TouchDown {
        /// Finger id; only finger 0 is recognized.
        finger: i32,
        /// Touch position in output coordinates.
        pos: DVec2,
        /// Event timestamp in milliseconds.
        time_ms: u32,
    },
    /// Touch point lifted.
    TouchUp {
        /// Finger id; only finger 0 is recognized.
        finger: i32,
        /// Lift-off position in output coordinates.
        pos: DVec2,
        /// Event timestamp in milliseconds.
        time_ms: u32,
    },
    /// Touch point moved.
    TouchMove {
        /// Finger id; only finger 0 is recognized.
        finger: i32,
        /// Touch position in output coordinates.
        pos: DVec2,
        /// Event timestamp in milliseconds.
        time_ms: u32,
    },
    /// Key pressed.
    KeyPress {
        /// Which key.
        key: Key,
        /// Whether any modifier is held; modified presses are ignored.
        modifiers: bool,
    },
}
