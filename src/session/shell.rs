//! The host-compositor boundary.
//!
//! The engine never touches the scene graph, input plumbing, or
//! window-manager actions directly; everything outward goes through
//! the [`Shell`] trait, and everything extensions consume comes back
//! as [`SessionEvent`] values drained from the controller. One
//! controller exists per output; there is no ambient global state.

use glam::DVec2;

use crate::item::ItemId;

/// Host-side collaborators the session controller calls into.
///
/// Implementations are expected to be cheap and non-blocking; every
/// call happens synchronously inside an event callback or a frame
/// hook.
pub trait Shell {
    /// Topmost item under a point, if any (scene-graph hit test).
    fn item_at(&self, pos: DVec2) -> Option<ItemId>;

    /// The currently focused item, used to seed the selection on
    /// activation.
    fn focused_item(&self) -> Option<ItemId>;

    /// Acquire exclusive input capture. Returning `false` makes
    /// activation fail normally.
    fn acquire_input_capture(&mut self) -> bool;

    /// Release exclusive input capture.
    fn release_input_capture(&mut self);

    /// Raise and focus an item (commit side effect).
    fn focus_raise(&mut self, item: ItemId);

    /// Minimize or restore an item.
    fn set_minimized(&mut self, item: ItemId, minimized: bool);

    /// Close an item. Hosts typically hide the surface first to avoid
    /// a full-size flicker while the client dies.
    fn close(&mut self, item: ItemId);

    /// Request another output frame (animation/momentum still live).
    fn schedule_frame(&mut self);
}

/// Typed notifications for overlay/decoration extensions.
///
/// Drained via
/// [`SessionController::drain_events`](super::SessionController::drain_events);
/// the queue replaces the signal/observer soup of compositor plugins
/// with one explicit subscription point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// An item first received a transform target; decoration data may
    /// be attached now.
    DecorationAttached(ItemId),
    /// An item's transform bookkeeping was torn down; decoration data
    /// must be dropped.
    DecorationDetached(ItemId),
    /// A layout pass ran while the session is active.
    Updated,
    /// The session ended (commit or forced cancellation). Fired once.
    Ended,
}
