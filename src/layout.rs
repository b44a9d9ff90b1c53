//! The carousel layout engine.
//!
//! A pure function from {ordered item forest, continuous selection
//! offset, per-item vertical drag offset, workarea, options snapshot}
//! to target transforms for every item, including nested children. The
//! slot math descends from the classic compiz scale algorithm: each
//! top-level item occupies a pitch-spaced slot centered on the
//! workarea, children are individually fit-scaled but move rigidly
//! with their parent's slot.

use crate::animation::Transform;
use crate::geometry::Rect;
use crate::item::{ItemId, ItemTree};
use crate::options::Options;

/// Maximum scale: 1.0 means we will not "zoom in" on an item.
pub const MAX_SCALE_FACTOR: f64 = 1.0;
/// Maximum scale for child items relative to their parents. Zero means
/// unconstrained, 1.0 means a child cannot be scaled larger than its
/// parent.
pub const MAX_SCALE_CHILD: f64 = 1.0;

/// A computed target transform for one item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotTarget {
    /// The item this target applies to.
    pub item: ItemId,
    /// Where the item should end up.
    pub transform: Transform,
}

/// Slot box dimensions and centering offsets for a workarea/options
/// pair, shared by target layout and entry seeding.
#[derive(Debug, Clone, Copy)]
pub struct SlotMetrics {
    /// Width of a slot box (workarea width × window_scale, floored at 1).
    pub scaled_width: f64,
    /// Height of a slot box.
    pub scaled_height: f64,
    /// Distance between adjacent slot centers.
    pub pitch: f64,
    /// X offset centering slot 0 on the workarea.
    pub offset_x: f64,
    /// Y offset centering slots vertically.
    pub offset_y: f64,
}

impl SlotMetrics {
    /// Compute slot metrics for a workarea and options snapshot.
    #[must_use]
    pub fn new(workarea: Rect, options: &Options) -> Self {
        let scaled_width = (workarea.width * options.window_scale).max(1.0);
        let scaled_height = (workarea.height * options.window_scale).max(1.0);
        Self {
            scaled_width,
            scaled_height,
            pitch: options.spacing + scaled_width,
            offset_x: workarea.x - scaled_width / 2.0 + workarea.width / 2.0,
            offset_y: workarea.y - scaled_height / 2.0 + workarea.height / 2.0,
        }
    }

    /// Scale factor fitting `geometry` inside the slot box, honoring the
    /// zoom cap.
    #[must_use]
    pub fn fit_scale(&self, geometry: Rect, allow_zoom: bool) -> f64 {
        let scale = (self.scaled_width / geometry.width)
            .min(self.scaled_height / geometry.height);
        if allow_zoom {
            scale
        } else {
            scale.min(MAX_SCALE_FACTOR)
        }
    }
}

/// Compute target transforms for every item in the forest.
///
/// `offset` locates the selected slot among `roots` (must not be the
/// NaN sentinel — callers short-circuit that before deriving any slot
/// math). `vertical_offset` is applied only to `pressed`'s slot.
/// Idempotent: identical inputs yield identical targets.
#[must_use]
pub fn layout_slots(
    tree: &ItemTree,
    roots: &[ItemId],
    offset: f64,
    pressed: Option<ItemId>,
    vertical_offset: f64,
    workarea: Rect,
    options: &Options,
) -> Vec<SlotTarget> {
    debug_assert!(!offset.is_nan(), "layout with NaN selection offset");
    debug_assert!(!roots.is_empty(), "layout with empty item list");

    let metrics = SlotMetrics::new(workarea, options);
    let mut targets = Vec::with_capacity(tree.len());

    for (j, &root) in roots.iter().enumerate() {
        let index_position = j as f64 - offset;
        let x = metrics.offset_x + metrics.pitch * index_position;
        let mut y = metrics.offset_y;
        if pressed == Some(root) {
            y += vertical_offset;
        }

        let root_scale = tree
            .geometry(root)
            .map_or(1.0, |g| metrics.fit_scale(g, options.allow_zoom));

        for item in tree.subtree(root) {
            let Some(geometry) = tree.geometry(item) else {
                continue;
            };
            let mut scale = metrics.fit_scale(geometry, options.allow_zoom);
            // A child must not outgrow its parent
            if !options.allow_zoom && item != root && MAX_SCALE_CHILD > 0.0 {
                scale = scale.min(MAX_SCALE_CHILD * root_scale);
            }

            let center = geometry.center();
            let dx = x - center.x + metrics.scaled_width / 2.0;
            let dy = y - center.y + metrics.scaled_height / 2.0;
            targets.push(SlotTarget {
                item,
                transform: Transform {
                    scale_x: scale,
                    scale_y: scale,
                    translation_x: dx,
                    translation_y: dy,
                },
            });
        }
    }

    targets
}

/// Starting transform for an item that appears mid-session: it rises
/// from the bottom of the workarea at its slot's horizontal position
/// instead of popping in.
#[must_use]
pub fn entry_transform(
    slot_index: usize,
    offset: f64,
    workarea: Rect,
    options: &Options,
) -> Transform {
    debug_assert!(!offset.is_nan(), "entry seed with NaN selection offset");
    let metrics = SlotMetrics::new(workarea, options);
    let index_position = slot_index as f64 - offset;
    Transform {
        scale_x: options.window_scale,
        scale_y: options.window_scale,
        translation_x: metrics.pitch * index_position,
        translation_y: metrics.offset_y + workarea.height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn workarea() -> Rect {
        Rect::new(0.0, 0.0, 1000.0, 600.0)
    }

    fn tree_of(n: u64) -> (ItemTree, Vec<ItemId>) {
        let mut tree = ItemTree::new();
        for i in 0..n {
            assert!(tree.insert(
                ItemId(i),
                Rect::new(100.0 * i as f64, 50.0, 400.0, 300.0),
                None
            ));
        }
        let roots = tree.top_level();
        (tree, roots)
    }

    fn target_for(targets: &[SlotTarget], id: ItemId) -> Transform {
        targets
            .iter()
            .find(|t| t.item == id)
            .map(|t| t.transform)
            .unwrap()
    }

    #[test]
    fn test_selected_slot_is_centered() {
        let (tree, roots) = tree_of(3);
        let options = Options::default();
        for selected in 0..3u64 {
            let targets = layout_slots(
                &tree,
                &roots,
                selected as f64,
                None,
                0.0,
                workarea(),
                &options,
            );
            let t = target_for(&targets, ItemId(selected));
            let geom = tree.geometry(ItemId(selected)).unwrap();
            let on_screen_center_x = geom.center().x + t.translation_x;
            assert!(
                (on_screen_center_x - workarea().center().x).abs() < 1e-9,
                "slot {selected} not centered"
            );
        }
    }

    #[test]
    fn test_layout_is_idempotent() {
        let (tree, roots) = tree_of(4);
        let options = Options::default();
        let a = layout_slots(&tree, &roots, 1.5, None, 0.0, workarea(), &options);
        let b = layout_slots(&tree, &roots, 1.5, None, 0.0, workarea(), &options);
        assert_eq!(a, b);
    }

    #[test]
    fn test_slots_are_pitch_spaced() {
        let (tree, roots) = tree_of(3);
        let options = Options::default();
        let metrics = SlotMetrics::new(workarea(), &options);
        let targets =
            layout_slots(&tree, &roots, 0.0, None, 0.0, workarea(), &options);

        // All items share geometry height/width so fit scale is equal;
        // x targets differ by exactly one pitch plus the geometry delta.
        let t0 = target_for(&targets, ItemId(0));
        let t1 = target_for(&targets, ItemId(1));
        let c0 = tree.geometry(ItemId(0)).unwrap().center().x;
        let c1 = tree.geometry(ItemId(1)).unwrap().center().x;
        let screen0 = c0 + t0.translation_x;
        let screen1 = c1 + t1.translation_x;
        assert!((screen1 - screen0 - metrics.pitch).abs() < 1e-9);
    }

    #[test]
    fn test_fit_scale_capped_without_zoom() {
        let options = Options::default();
        let metrics = SlotMetrics::new(workarea(), &options);
        // Tiny window would upscale, cap holds it at 1.0
        let small = Rect::new(0.0, 0.0, 50.0, 40.0);
        assert_eq!(metrics.fit_scale(small, false), 1.0);
        assert!(metrics.fit_scale(small, true) > 1.0);

        // Large window always scales down
        let large = Rect::new(0.0, 0.0, 2000.0, 1500.0);
        assert!(metrics.fit_scale(large, false) < 1.0);
    }

    #[test]
    fn test_vertical_offset_applies_only_to_pressed_item() {
        let (tree, roots) = tree_of(2);
        let options = Options::default();
        let base =
            layout_slots(&tree, &roots, 0.0, None, 0.0, workarea(), &options);
        let dragged = layout_slots(
            &tree,
            &roots,
            0.0,
            Some(ItemId(0)),
            -120.0,
            workarea(),
            &options,
        );
        let d0 = target_for(&dragged, ItemId(0));
        let b0 = target_for(&base, ItemId(0));
        assert_eq!(d0.translation_y, b0.translation_y - 120.0);

        let d1 = target_for(&dragged, ItemId(1));
        let b1 = target_for(&base, ItemId(1));
        assert_eq!(d1.translation_y, b1.translation_y);
    }

    #[test]
    fn test_children_follow_parent_slot() {
        let mut tree = ItemTree::new();
        assert!(tree.insert(ItemId(1), Rect::new(0.0, 0.0, 800.0, 600.0), None));
        assert!(tree.insert(
            ItemId(2),
            Rect::new(200.0, 150.0, 300.0, 200.0),
            Some(ItemId(1))
        ));
        let roots = tree.top_level();
        let options = Options::default();
        let targets =
            layout_slots(&tree, &roots, 0.0, None, 0.0, workarea(), &options);
        assert_eq!(targets.len(), 2);

        // Both land with their centers on the slot center
        let slot_center = workarea().center();
        for id in [ItemId(1), ItemId(2)] {
            let t = target_for(&targets, id);
            let c = tree.geometry(id).unwrap().center();
            assert!((c.x + t.translation_x - slot_center.x).abs() < 1e-9);
            assert!((c.y + t.translation_y - slot_center.y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_child_scale_capped_by_parent() {
        let mut tree = ItemTree::new();
        // Huge parent scales way down; tiny dialog would stay at 1.0
        // but must not outgrow the parent's fit scale
        assert!(tree.insert(ItemId(1), Rect::new(0.0, 0.0, 2000.0, 1500.0), None));
        assert!(tree.insert(
            ItemId(2),
            Rect::new(100.0, 100.0, 100.0, 80.0),
            Some(ItemId(1))
        ));
        let roots = tree.top_level();
        let options = Options::default();
        let metrics = SlotMetrics::new(workarea(), &options);
        let parent_scale =
            metrics.fit_scale(tree.geometry(ItemId(1)).unwrap(), false);

        let targets =
            layout_slots(&tree, &roots, 0.0, None, 0.0, workarea(), &options);
        let child = target_for(&targets, ItemId(2));
        assert!((child.scale_x - MAX_SCALE_CHILD * parent_scale).abs() < 1e-9);
    }

    #[test]
    fn test_entry_transform_rises_from_bottom() {
        let options = Options::default();
        let t = entry_transform(2, 0.0, workarea(), &options);
        let metrics = SlotMetrics::new(workarea(), &options);
        assert_eq!(t.scale_x, options.window_scale);
        assert_eq!(t.translation_x, metrics.pitch * 2.0);
        assert_eq!(t.translation_y, metrics.offset_y + workarea().height);
    }
}
