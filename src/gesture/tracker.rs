//! The gesture state machine.
//!
//! Classifies a press/move/release session as a horizontal pan, a
//! vertical action-swipe, or a tap, and tracks the flick window that
//! yields the terminal velocity used for momentum after release.

use glam::DVec2;

use crate::item::ItemId;

/// Movement below this (Euclidean, from the press point) is a tap.
pub const DEAD_ZONE_PX: f64 = 40.0;
/// Total displacement beyond which the swipe direction is committed.
pub const DIRECTION_COMMIT_PX: f64 = 50.0;
/// Per-step displacement that opens a flick window.
pub const FLICK_START_PX: f64 = 50.0;
/// Per-step displacement at or below which the flick window closes.
pub const FLICK_END_PX: f64 = 20.0;

/// Axis a gesture session has committed to. Decided once per session
/// and never revisited, even if the dominant axis later reverses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwipeDirection {
    /// No commitment yet.
    #[default]
    Undecided,
    /// Left/right pan over the carousel.
    Horizontal,
    /// Up/down action-swipe on the pressed item.
    Vertical,
}

/// High-level intent emitted by the tracker for the session controller
/// to apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureIntent {
    /// Horizontal pan by a per-step pixel delta.
    PanBy(f64),
    /// Vertical drag by a per-step pixel delta (the controller
    /// accumulates the session total).
    VerticalDragBy(f64),
    /// Vertical swipe session ended; apply the action threshold, reset
    /// the vertical offset and settle the selection.
    SwipeReleased,
    /// Horizontal session ended with an open flick window; hand the
    /// terminal velocity (px/ms) to the momentum integrator.
    FlickReleased(DVec2),
    /// Horizontal session ended with no flick; round the selection to
    /// the nearest slot immediately.
    SettleToSlot,
    /// Tap (no travel) on an item: commit-select it.
    TapItem(ItemId),
    /// Tap (no travel) on the background.
    TapBackground,
    /// Keyboard step of the selection by ±1 slot.
    StepBy(i64),
    /// Keyboard commit of the current rounded selection.
    CommitCurrent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum GesturePhase {
    #[default]
    Idle,
    Pressed,
    Dragging,
}

/// Press-to-release gesture session state.
#[derive(Debug, Default)]
pub struct GestureTracker {
    phase: GesturePhase,
    start: DVec2,
    last: DVec2,
    direction: SwipeDirection,
    /// Timestamp of the open flick window, if one is open.
    flick_started_ms: Option<u32>,
    flick_start_pos: DVec2,
    pressed_item: Option<ItemId>,
}

impl GestureTracker {
    /// Fresh tracker in the idle phase.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a press/touch is currently held (direct-mode signal for
    /// the animation driver).
    #[must_use]
    pub fn is_held(&self) -> bool {
        self.phase != GesturePhase::Idle
    }

    /// The item under the most recent press, if it was eligible.
    #[must_use]
    pub fn pressed_item(&self) -> Option<ItemId> {
        self.pressed_item
    }

    /// The direction this session committed to.
    #[must_use]
    pub fn direction(&self) -> SwipeDirection {
        self.direction
    }

    /// Forget the pressed item if it matches `id` (the item unmapped or
    /// left the carousel).
    pub fn clear_pressed(&mut self, id: ItemId) {
        if self.pressed_item == Some(id) {
            self.pressed_item = None;
        }
    }

    /// Begin a gesture session. `hit` is the eligible item under the
    /// press point, already resolved to its top-level ancestor.
    pub fn handle_press(&mut self, pos: DVec2, hit: Option<ItemId>) {
        self.phase = GesturePhase::Pressed;
        self.start = pos;
        self.last = pos;
        self.direction = SwipeDirection::Undecided;
        self.flick_started_ms = None;
        self.flick_start_pos = DVec2::ZERO;
        self.pressed_item = hit;
    }

    /// Process a motion sample while held. Emits at most one pan/drag
    /// intent once the session has left the dead zone and committed to
    /// an axis.
    pub fn handle_motion(
        &mut self,
        pos: DVec2,
        time_ms: u32,
    ) -> Option<GestureIntent> {
        match self.phase {
            GesturePhase::Idle => return None,
            GesturePhase::Pressed => {
                if self.start.distance(pos) > DEAD_ZONE_PX {
                    self.phase = GesturePhase::Dragging;
                } else {
                    return None;
                }
            }
            GesturePhase::Dragging => {}
        }

        let total = pos - self.start;
        let step = pos - self.last;

        if self.direction == SwipeDirection::Undecided
            && total.length() > DIRECTION_COMMIT_PX
        {
            self.direction = if total.y.abs() > total.x.abs() {
                SwipeDirection::Vertical
            } else {
                SwipeDirection::Horizontal
            };
        }

        let step_distance = step.length();
        if step_distance > FLICK_START_PX && self.flick_started_ms.is_none() {
            self.flick_started_ms = Some(time_ms);
            self.flick_start_pos = pos;
        } else if step_distance <= FLICK_END_PX {
            self.flick_started_ms = None;
            self.flick_start_pos = DVec2::ZERO;
        }

        self.last = pos;

        match self.direction {
            SwipeDirection::Horizontal => Some(GestureIntent::PanBy(step.x)),
            SwipeDirection::Vertical => {
                Some(GestureIntent::VerticalDragBy(step.y))
            }
            SwipeDirection::Undecided => None,
        }
    }

    /// End the gesture session, yielding the release intents in apply
    /// order.
    pub fn handle_release(
        &mut self,
        pos: DVec2,
        time_ms: u32,
    ) -> Vec<GestureIntent> {
        let travelled = self.phase == GesturePhase::Dragging;
        if self.phase == GesturePhase::Idle {
            return Vec::new();
        }
        self.phase = GesturePhase::Idle;

        if !travelled {
            return match self.pressed_item {
                Some(item) => vec![GestureIntent::TapItem(item)],
                None => vec![GestureIntent::TapBackground],
            };
        }

        let intents = match self.direction {
            SwipeDirection::Vertical => vec![GestureIntent::SwipeReleased],
            SwipeDirection::Horizontal => match self.flick_started_ms {
                Some(started) if time_ms > started => {
                    let elapsed = f64::from(time_ms - started);
                    let velocity = (pos - self.flick_start_pos) / elapsed;
                    vec![GestureIntent::FlickReleased(velocity)]
                }
                _ => vec![GestureIntent::SettleToSlot],
            },
            // An uncommitted axis pans nothing, so a fast final step
            // must not launch momentum either
            SwipeDirection::Undecided => vec![GestureIntent::SettleToSlot],
        };

        self.flick_started_ms = None;
        self.flick_start_pos = DVec2::ZERO;
        intents
    }

    /// Keyboard path, bypassing gesture classification entirely. Only
    /// unmodified presses of the three hardcoded bindings are
    /// recognized.
    #[must_use]
    pub fn handle_key(
        key: crate::gesture::Key,
        modifiers: bool,
    ) -> Option<GestureIntent> {
        if modifiers {
            return None;
        }
        match key {
            crate::gesture::Key::Left => Some(GestureIntent::StepBy(-1)),
            crate::gesture::Key::Right => Some(GestureIntent::StepBy(1)),
            crate::gesture::Key::Enter => Some(GestureIntent::CommitCurrent),
            crate::gesture::Key::Other => None,
        }
    }
}
