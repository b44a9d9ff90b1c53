//! Gesture recognition: raw input events in, high-level intents out.
//!
//! One [`GestureTracker`] replaces the keyboard/pointer/touch role
//! interfaces of traditional compositor plugins: every event arrives
//! through a single [`InputEvent`] entry point and comes back out as a
//! [`GestureIntent`] the session controller applies.

pub mod event;
pub mod tracker;

pub use event::{InputEvent, Key};
pub use tracker::{GestureIntent, GestureTracker, SwipeDirection};
