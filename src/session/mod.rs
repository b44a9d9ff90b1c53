//! The top-level session lifecycle state machine.
//!
//! One [`SessionController`] exists per output. It owns the carousel
//! state (item forest, continuous selection offset, per-item transform
//! bookkeeping) and the gesture session, wires item-set mutations into
//! the layout engine, and drives the two per-frame hooks. Everything
//! runs synchronously inside event callbacks and frame hooks; external
//! readers only see committed transforms between frames.

pub mod shell;

use std::collections::VecDeque;
use std::time::Instant;

use glam::DVec2;
use rustc_hash::FxHashMap;

use crate::animation::{AnimatedTransform, EasingFunction, Transform};
use crate::gesture::{GestureIntent, GestureTracker, InputEvent, SwipeDirection};
use crate::geometry::Rect;
use crate::item::{ItemId, ItemTree};
use crate::layout::{entry_transform, layout_slots, SlotMetrics};
use crate::momentum::Momentum;
use crate::options::{BackgroundAction, Options, SwipeAction};

pub use shell::{SessionEvent, Shell};

/// Elapsed time assumed for the first momentum frame, before a frame
/// delta exists.
const FALLBACK_FRAME_MS: f64 = 16.0;

/// Lifecycle stage of the switcher session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStage {
    /// Not running; no carousel state exists.
    #[default]
    Inactive,
    /// Live: consuming input, laying out slots.
    Active,
    /// Committed: exit animations are playing toward resting state.
    Exiting,
}

/// Per-item transform bookkeeping, created lazily the first time an
/// item needs a target and destroyed when the item leaves the session.
#[derive(Debug)]
struct SlotState {
    transform: AnimatedTransform,
    /// The item arrived minimized (or was swipe-minimized) and should
    /// return to a minimized state on commit.
    was_minimized: bool,
}

impl SlotState {
    fn new(seed: Transform) -> Self {
        Self {
            transform: AnimatedTransform::new(seed),
            was_minimized: false,
        }
    }
}

/// Gesture-driven carousel window switcher for one output.
#[derive(Debug)]
pub struct SessionController {
    stage: SessionStage,
    tree: ItemTree,
    options: Options,
    workarea: Rect,
    /// Continuous selection offset in [0, count-1], or NaN: the "no
    /// active selection / show-desktop" sentinel. Never compared with
    /// `<`/`>=`; every index derivation short-circuits on it.
    offset: f64,
    /// Session-total vertical drag on the pressed item.
    vertical_offset: f64,
    tracker: GestureTracker,
    momentum: Momentum,
    slots: FxHashMap<ItemId, SlotState>,
    events: VecDeque<SessionEvent>,
    last_frame: Option<Instant>,
    ended_emitted: bool,
}

impl SessionController {
    /// Create an inactive controller for an output with the given
    /// workarea and configuration snapshot.
    #[must_use]
    pub fn new(workarea: Rect, options: Options) -> Self {
        Self {
            stage: SessionStage::Inactive,
            tree: ItemTree::new(),
            options,
            workarea,
            offset: f64::NAN,
            vertical_offset: 0.0,
            tracker: GestureTracker::new(),
            momentum: Momentum::new(),
            slots: FxHashMap::default(),
            events: VecDeque::new(),
            last_frame: None,
            ended_emitted: false,
        }
    }

    /// Current lifecycle stage.
    #[must_use]
    pub fn stage(&self) -> SessionStage {
        self.stage
    }

    /// Whether the switcher is live (consuming input).
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.stage == SessionStage::Active
    }

    /// The continuous selection offset (NaN while no selection exists).
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Committed transform for an item, for the renderer to read
    /// between frames.
    #[must_use]
    pub fn transform_of(&self, item: ItemId) -> Option<Transform> {
        self.slots.get(&item).map(|s| s.transform.current())
    }

    /// Whether any item still has a transition in flight.
    #[must_use]
    pub fn is_animating(&self, now: Instant) -> bool {
        self.slots.values().any(|s| s.transform.running(now))
    }

    /// Drain pending notifications for overlay extensions.
    pub fn drain_events(&mut self) -> impl Iterator<Item = SessionEvent> + '_ {
        self.events.drain(..)
    }

    // ── Item-set and environment notifications ──────────────────────────

    /// An item was mapped (or moved to this output). Children move
    /// rigidly with `parent`'s slot when given.
    pub fn handle_item_mapped(
        &mut self,
        id: ItemId,
        geometry: Rect,
        parent: Option<ItemId>,
        minimized: bool,
        shell: &mut dyn Shell,
        now: Instant,
    ) {
        if !self.tree.insert(id, geometry, parent) {
            log::warn!("ignoring duplicate map of {id}");
            return;
        }
        self.tree.set_minimized(id, minimized);
        if self.stage == SessionStage::Active {
            self.relayout(shell, now);
        }
    }

    /// An item (and its subtree) was unmapped or reparented away.
    pub fn handle_item_unmapped(
        &mut self,
        id: ItemId,
        shell: &mut dyn Shell,
        now: Instant,
    ) {
        let removed = self.tree.remove_subtree(id);
        if removed.is_empty() || self.stage == SessionStage::Inactive {
            return;
        }
        for &gone in &removed {
            self.tracker.clear_pressed(gone);
            if self.slots.remove(&gone).is_some() {
                self.events.push_back(SessionEvent::DecorationDetached(gone));
            }
        }
        if self.stage != SessionStage::Active {
            return;
        }
        if self.tree.is_empty() {
            self.finalize(shell);
            return;
        }
        // If we're over the bounds now, move back in
        let _ = self.clamp_offset();
        self.relayout(shell, now);
    }

    /// An item's geometry changed.
    pub fn handle_item_geometry_changed(
        &mut self,
        id: ItemId,
        geometry: Rect,
        shell: &mut dyn Shell,
        now: Instant,
    ) {
        if !self.tree.set_geometry(id, geometry) {
            return;
        }
        if self.stage == SessionStage::Active {
            self.relayout(shell, now);
        }
    }

    /// The output's workarea changed.
    pub fn handle_workarea_changed(
        &mut self,
        workarea: Rect,
        shell: &mut dyn Shell,
        now: Instant,
    ) {
        self.workarea = workarea;
        if self.stage == SessionStage::Active {
            self.relayout(shell, now);
        }
    }

    /// The host loaded a new configuration snapshot.
    pub fn handle_config_changed(
        &mut self,
        options: Options,
        shell: &mut dyn Shell,
        now: Instant,
    ) {
        self.options = options;
        if self.stage == SessionStage::Active {
            self.relayout(shell, now);
        }
    }

    /// A cooperating extension filtered/changed the item set and wants
    /// a fresh layout pass.
    pub fn handle_external_update(&mut self, shell: &mut dyn Shell, now: Instant) {
        if self.stage == SessionStage::Active {
            self.relayout(shell, now);
        }
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    /// Toggle: deactivate when live, otherwise try to activate.
    pub fn handle_toggle(&mut self, shell: &mut dyn Shell, now: Instant) -> bool {
        if self.stage == SessionStage::Active {
            self.deactivate(shell, now);
            return true;
        }
        self.activate(shell, now)
    }

    /// Start a session. Returns `false` when already running, when no
    /// items are eligible, or when exclusive input capture is denied.
    pub fn activate(&mut self, shell: &mut dyn Shell, now: Instant) -> bool {
        if self.stage != SessionStage::Inactive {
            return false;
        }
        let roots = self.tree.top_level();
        if roots.is_empty() {
            return false;
        }
        if !shell.acquire_input_capture() {
            return false;
        }

        // A fresh tracker guarantees no leftover events from the
        // activation binding trigger an action in the switcher.
        self.tracker = GestureTracker::new();
        self.momentum.cancel();
        self.vertical_offset = 0.0;
        self.ended_emitted = false;
        self.last_frame = None;

        self.offset = shell
            .focused_item()
            .and_then(|id| self.tree.root_of(id))
            .and_then(|root| roots.iter().position(|&r| r == root))
            .map_or(0.0, |idx| idx as f64);

        self.stage = SessionStage::Active;

        // Items already visible start animating from where they are
        for &root in &roots {
            if !self.tree.is_minimized(root) {
                self.ensure_slot(root, Transform::IDENTITY);
            }
        }

        self.relayout(shell, now);
        true
    }

    /// Commit the current selection and start exit animations.
    ///
    /// The selection's side effects (minimize policy, show-desktop)
    /// land in [`finalize`](Self::finalize) once the animations are
    /// done.
    pub fn deactivate(&mut self, shell: &mut dyn Shell, now: Instant) {
        if self.stage != SessionStage::Active {
            return;
        }
        let selected = self.current_item();
        self.stage = SessionStage::Exiting;

        if let Some(view) = selected {
            shell.focus_raise(view);
        }

        let to_desktop = selected.is_none()
            && self.options.background_action() == BackgroundAction::ShowDesktop;
        let metrics = SlotMetrics::new(self.workarea, &self.options);
        let resting_y = metrics.offset_y + self.workarea.height;
        let duration = self.options.duration();

        for (&item, slot) in &mut self.slots {
            let minimized_exit = Some(item) != selected
                && (slot.was_minimized
                    || self.options.minimize_others
                    || to_desktop);
            let target = if minimized_exit {
                // Sink to the bottom edge, keeping the horizontal drift
                Transform {
                    scale_x: self.options.window_scale,
                    scale_y: self.options.window_scale,
                    translation_x: slot.transform.current().translation_x,
                    translation_y: resting_y,
                }
            } else {
                Transform::IDENTITY
            };
            slot.transform
                .set_eased(target, now, duration, EasingFunction::DEFAULT);
        }

        self.events.push_back(SessionEvent::Ended);
        self.ended_emitted = true;
        shell.schedule_frame();
    }

    /// Tear the session down completely.
    ///
    /// Runs once exit animations finish, immediately when the item set
    /// empties, or forced on abnormal cancellation (e.g. losing the
    /// input capture). Idempotent.
    pub fn finalize(&mut self, shell: &mut dyn Shell) {
        if self.stage == SessionStage::Inactive && self.slots.is_empty() {
            return;
        }
        if !self.ended_emitted {
            // deactivate() never ran: forced cancellation
            self.events.push_back(SessionEvent::Ended);
            self.ended_emitted = true;
        }

        let selected = self.current_item();
        let to_desktop = selected.is_none()
            && self.options.background_action() == BackgroundAction::ShowDesktop;

        if let Some(view) = selected {
            shell.focus_raise(view);
        }
        for root in self.tree.top_level() {
            if to_desktop {
                shell.set_minimized(root, true);
                self.tree.set_minimized(root, true);
                continue;
            }
            if Some(root) == selected {
                continue;
            }
            let flagged = self
                .slots
                .get(&root)
                .is_some_and(|slot| slot.was_minimized);
            if self.options.minimize_others || flagged {
                shell.set_minimized(root, true);
                self.tree.set_minimized(root, true);
            }
        }

        let mut detached: Vec<ItemId> = self.slots.keys().copied().collect();
        detached.sort_unstable();
        for item in detached {
            self.events.push_back(SessionEvent::DecorationDetached(item));
        }
        self.slots.clear();

        self.tracker = GestureTracker::new();
        self.momentum.cancel();
        self.offset = f64::NAN;
        self.vertical_offset = 0.0;
        self.last_frame = None;
        self.stage = SessionStage::Inactive;
        shell.release_input_capture();
    }

    // ── Input ───────────────────────────────────────────────────────────

    /// Single entry point for all input while the switcher is live.
    /// Touch fingers other than 0 and modified key presses are ignored.
    pub fn handle_event(
        &mut self,
        event: InputEvent,
        shell: &mut dyn Shell,
        now: Instant,
    ) {
        if self.stage != SessionStage::Active {
            return;
        }
        match event {
            InputEvent::PointerButton {
                pressed,
                pos,
                time_ms,
            } => {
                if pressed {
                    self.begin_press(pos, shell);
                } else {
                    self.end_press(pos, time_ms, shell, now);
                }
            }
            InputEvent::TouchDown { finger, pos, .. } => {
                if finger == 0 {
                    self.begin_press(pos, shell);
                }
            }
            InputEvent::TouchUp {
                finger,
                pos,
                time_ms,
            } => {
                if finger == 0 {
                    self.end_press(pos, time_ms, shell, now);
                }
            }
            InputEvent::PointerMotion { pos, time_ms } => {
                self.handle_motion(pos, time_ms, shell, now);
            }
            InputEvent::TouchMove {
                finger,
                pos,
                time_ms,
            } => {
                if finger == 0 {
                    self.handle_motion(pos, time_ms, shell, now);
                }
            }
            InputEvent::KeyPress { key, modifiers } => {
                if let Some(intent) = GestureTracker::handle_key(key, modifiers) {
                    self.apply_intent(intent, shell, now);
                }
            }
        }
    }

    fn begin_press(&mut self, pos: DVec2, shell: &mut dyn Shell) {
        let roots = self.tree.top_level();
        // Only items whose top-level ancestor participates in the
        // carousel are eligible press targets
        let hit = shell
            .item_at(pos)
            .and_then(|id| self.tree.root_of(id))
            .filter(|root| roots.contains(root));
        self.momentum.cancel();
        self.tracker.handle_press(pos, hit);
    }

    fn end_press(
        &mut self,
        pos: DVec2,
        time_ms: u32,
        shell: &mut dyn Shell,
        now: Instant,
    ) {
        for intent in self.tracker.handle_release(pos, time_ms) {
            self.apply_intent(intent, shell, now);
            if self.stage != SessionStage::Active {
                break;
            }
        }
    }

    fn handle_motion(
        &mut self,
        pos: DVec2,
        time_ms: u32,
        shell: &mut dyn Shell,
        now: Instant,
    ) {
        if let Some(intent) = self.tracker.handle_motion(pos, time_ms) {
            self.apply_intent(intent, shell, now);
        }
    }

    fn apply_intent(
        &mut self,
        intent: GestureIntent,
        shell: &mut dyn Shell,
        now: Instant,
    ) {
        match intent {
            GestureIntent::PanBy(dx) => {
                self.vertical_offset = 0.0;
                self.pan_by_pixels(dx);
                self.relayout(shell, now);
            }
            GestureIntent::VerticalDragBy(dy) => {
                self.vertical_offset += dy;
                self.relayout(shell, now);
            }
            GestureIntent::SwipeReleased => {
                self.apply_swipe_action(shell);
                self.vertical_offset = 0.0;
                self.offset = self.offset.round();
                self.relayout(shell, now);
            }
            GestureIntent::FlickReleased(velocity) => {
                self.momentum = Momentum::from_velocity(velocity);
                self.vertical_offset = 0.0;
                self.relayout(shell, now);
                shell.schedule_frame();
            }
            GestureIntent::SettleToSlot => {
                self.vertical_offset = 0.0;
                self.offset = self.offset.round();
                self.relayout(shell, now);
            }
            GestureIntent::TapItem(item) => {
                let roots = self.tree.top_level();
                if let Some(idx) = roots.iter().position(|&r| r == item) {
                    // Touched an item directly, switch now
                    self.offset = idx as f64;
                    self.deactivate(shell, now);
                } else {
                    log::warn!("tapped {item} missing from the carousel");
                }
            }
            GestureIntent::TapBackground => {
                match self.options.background_action() {
                    BackgroundAction::Ignore => {}
                    BackgroundAction::ShowDesktop => {
                        // NaN guarantees no item is raised in finalize
                        self.offset = f64::NAN;
                        self.deactivate(shell, now);
                    }
                    BackgroundAction::Commit => self.deactivate(shell, now),
                }
            }
            GestureIntent::StepBy(delta) => {
                if self.offset.is_nan() {
                    return;
                }
                self.offset += delta as f64;
                let _ = self.clamp_offset();
                self.relayout(shell, now);
            }
            GestureIntent::CommitCurrent => self.deactivate(shell, now),
        }
    }

    /// Vertical swipe commit: beyond a quarter of the workarea height,
    /// run the configured pull action on the pressed item.
    fn apply_swipe_action(&mut self, shell: &mut dyn Shell) {
        let Some(item) = self.tracker.pressed_item() else {
            return;
        };
        if self.vertical_offset.abs() <= self.workarea.height / 4.0 {
            return;
        }
        let action = if self.vertical_offset < 0.0 {
            self.options.up_action()
        } else {
            self.options.down_action()
        };
        match action {
            SwipeAction::Close => shell.close(item),
            SwipeAction::Minimize => {
                if let Some(slot) = self.slots.get_mut(&item) {
                    slot.was_minimized = true;
                }
            }
            SwipeAction::None => {}
        }
    }

    /// Convert a horizontal pixel delta to offset space and clamp.
    fn pan_by_pixels(&mut self, dx: f64) {
        let metrics = SlotMetrics::new(self.workarea, &self.options);
        // Dragging right moves the carousel left under the finger
        self.offset -= dx / metrics.pitch;
        let _ = self.clamp_offset();
    }

    /// Force the offset back into [0, count-1]. A boundary hit kills
    /// momentum. Returns whether the clamp moved the offset.
    fn clamp_offset(&mut self) -> bool {
        if self.offset.is_nan() {
            return false;
        }
        let max = (self.tree.top_level().len().saturating_sub(1)) as f64;
        let clamped = self.offset.clamp(0.0, max);
        if clamped == self.offset {
            return false;
        }
        self.offset = clamped;
        self.momentum.cancel();
        true
    }

    /// The item in the rounded-selection slot, or `None` while the NaN
    /// sentinel is set.
    #[must_use]
    pub fn current_item(&self) -> Option<ItemId> {
        if self.offset.is_nan() {
            return None;
        }
        let idx = self.current_idx();
        self.tree.top_level().get(idx).copied()
    }

    /// The rounded selection slot. Must not be called while the NaN
    /// sentinel is set.
    fn current_idx(&self) -> usize {
        debug_assert!(!self.offset.is_nan(), "index derived from NaN offset");
        self.offset.round().max(0.0) as usize
    }

    // ── Layout ──────────────────────────────────────────────────────────

    /// Recompute target transforms for every item and reconcile them:
    /// directly while input or momentum is live, eased otherwise.
    fn relayout(&mut self, shell: &mut dyn Shell, now: Instant) {
        if self.stage != SessionStage::Active {
            return;
        }
        let roots = self.tree.top_level();
        if roots.is_empty() {
            return;
        }

        // Minimized items join the carousel on screen; remember to put
        // them back on commit
        for &root in &roots {
            if self.tree.is_minimized(root) {
                shell.set_minimized(root, false);
                self.tree.set_minimized(root, false);
                self.ensure_slot(
                    root,
                    entry_transform(
                        roots.iter().position(|&r| r == root).unwrap_or(0),
                        self.offset,
                        self.workarea,
                        &self.options,
                    ),
                );
                if let Some(slot) = self.slots.get_mut(&root) {
                    slot.was_minimized = true;
                }
            }
        }

        let targets = layout_slots(
            &self.tree,
            &roots,
            self.offset,
            self.tracker.pressed_item(),
            self.vertical_offset,
            self.workarea,
            &self.options,
        );

        // Animating during live interaction reads as input lag
        let direct = self.tracker.is_held() || !self.momentum.is_zero();
        let duration = self.options.duration();

        for target in targets {
            let item = target.item;
            if !self.slots.contains_key(&item) {
                let root = self.tree.root_of(item).unwrap_or(item);
                let seed = if item == root {
                    entry_transform(
                        roots.iter().position(|&r| r == root).unwrap_or(0),
                        self.offset,
                        self.workarea,
                        &self.options,
                    )
                } else {
                    // New children start at their parent's current
                    // transform so the subtree stays rigid
                    self.slots.get(&root).map_or_else(
                        || Transform::IDENTITY,
                        |s| s.transform.current(),
                    )
                };
                self.ensure_slot(item, seed);
            }
            if let Some(slot) = self.slots.get_mut(&item) {
                if direct {
                    slot.transform.set_direct(target.transform);
                } else {
                    slot.transform.set_eased(
                        target.transform,
                        now,
                        duration,
                        EasingFunction::DEFAULT,
                    );
                }
            }
        }

        self.events.push_back(SessionEvent::Updated);
        shell.schedule_frame();
    }

    fn ensure_slot(&mut self, item: ItemId, seed: Transform) {
        if self.slots.contains_key(&item) {
            return;
        }
        let _ = self.slots.insert(item, SlotState::new(seed));
        self.events.push_back(SessionEvent::DecorationAttached(item));
    }

    // ── Frame hooks ─────────────────────────────────────────────────────

    /// Pre-render hook: reconcile committed transforms from running
    /// transitions. Always runs before [`post_frame`](Self::post_frame)
    /// within a frame.
    pub fn pre_frame(&mut self, now: Instant) {
        for slot in self.slots.values_mut() {
            let _ = slot.transform.tick(now);
        }
    }

    /// Post-render hook: advance momentum, settle into a slot when it
    /// dies, and decide whether another frame is needed. Returning
    /// `false` while [`SessionStage::Exiting`] finalizes the session.
    pub fn post_frame(&mut self, shell: &mut dyn Shell, now: Instant) -> bool {
        let elapsed_ms = self.last_frame.map_or(FALLBACK_FRAME_MS, |prev| {
            now.saturating_duration_since(prev).as_secs_f64() * 1000.0
        });
        self.last_frame = Some(now);

        let mut running = self.is_animating(now) || !self.momentum.is_zero();

        if !self.tracker.is_held() && !self.momentum.is_zero() {
            self.momentum.decay(self.options.flick_motion);
            if self.momentum.is_zero() {
                // Was moving, now isn't: settle into a slot
                if !self.offset.is_nan() {
                    self.offset = self.offset.round();
                }
                self.relayout(shell, now);
            } else {
                let movement = self.momentum.step(elapsed_ms);
                match self.tracker.direction() {
                    SwipeDirection::Vertical => {
                        self.vertical_offset += movement.y;
                    }
                    SwipeDirection::Horizontal | SwipeDirection::Undecided => {
                        self.pan_by_pixels(movement.x);
                    }
                }
                self.relayout(shell, now);
                running = true;
            }
        }

        if self.stage == SessionStage::Active || running {
            return running;
        }

        self.finalize(shell);
        false
    }
}
