//! Item identity and the arena-backed item forest.
//!
//! Items are opaque handles to displayable surfaces (toplevel windows
//! and their dialogs). The forest stores parent/child links by arena
//! index and is traversed iteratively, never by recursive calls on
//! owning handles. Top-level ordering is by [`ItemId`] (identity, not
//! geometry) so list order stays deterministic across frames.

use rustc_hash::FxHashMap;

use crate::geometry::Rect;

/// Stable identity of an item, assigned by the host compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u64);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "item-{}", self.0)
    }
}

/// A node in the item forest.
#[derive(Debug, Clone)]
struct ItemNode {
    id: ItemId,
    geometry: Rect,
    minimized: bool,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Ordered forest of items participating in the carousel.
///
/// Duplicates are forbidden; membership defines what participates in
/// layout. Child items (e.g. dialogs) move rigidly with their top-level
/// ancestor's slot.
#[derive(Debug, Default)]
pub struct ItemTree {
    nodes: Vec<Option<ItemNode>>,
    index: FxHashMap<ItemId, usize>,
    free: Vec<usize>,
}

impl ItemTree {
    /// Create an empty forest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live items (including children).
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the forest holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Whether `id` is present in the forest.
    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.index.contains_key(&id)
    }

    /// Insert an item, optionally as a child of `parent`.
    ///
    /// Returns `false` (and inserts nothing) if `id` is already present
    /// or the named parent does not exist.
    pub fn insert(
        &mut self,
        id: ItemId,
        geometry: Rect,
        parent: Option<ItemId>,
    ) -> bool {
        if self.index.contains_key(&id) {
            return false;
        }
        let parent_slot = match parent {
            Some(pid) => match self.index.get(&pid) {
                Some(&slot) => Some(slot),
                None => return false,
            },
            None => None,
        };

        let node = ItemNode {
            id,
            geometry,
            minimized: false,
            parent: parent_slot,
            children: Vec::new(),
        };
        let slot = if let Some(slot) = self.free.pop() {
            self.nodes[slot] = Some(node);
            slot
        } else {
            self.nodes.push(Some(node));
            self.nodes.len() - 1
        };
        if let Some(pslot) = parent_slot {
            if let Some(pnode) = self.nodes[pslot].as_mut() {
                pnode.children.push(slot);
            }
        }
        let _ = self.index.insert(id, slot);
        true
    }

    /// Remove an item and its whole subtree.
    ///
    /// Returns the removed ids in pre-order (the root first), or an
    /// empty vector if `id` was not present.
    pub fn remove_subtree(&mut self, id: ItemId) -> Vec<ItemId> {
        let Some(&slot) = self.index.get(&id) else {
            return Vec::new();
        };

        // Unlink from the parent's child list first.
        if let Some(pslot) = self.nodes[slot].as_ref().and_then(|n| n.parent) {
            if let Some(pnode) = self.nodes[pslot].as_mut() {
                pnode.children.retain(|&c| c != slot);
            }
        }

        let mut removed = Vec::new();
        let mut stack = vec![slot];
        while let Some(cur) = stack.pop() {
            let Some(node) = self.nodes[cur].take() else {
                continue;
            };
            let _ = self.index.remove(&node.id);
            removed.push(node.id);
            self.free.push(cur);
            for &child in node.children.iter().rev() {
                stack.push(child);
            }
        }
        removed
    }

    /// Geometry of an item in layout space.
    #[must_use]
    pub fn geometry(&self, id: ItemId) -> Option<Rect> {
        self.node(id).map(|n| n.geometry)
    }

    /// Update an item's geometry. Returns `false` if `id` is unknown.
    pub fn set_geometry(&mut self, id: ItemId, geometry: Rect) -> bool {
        match self.node_mut(id) {
            Some(n) => {
                n.geometry = geometry;
                true
            }
            None => false,
        }
    }

    /// Whether the host considers this item minimized.
    #[must_use]
    pub fn is_minimized(&self, id: ItemId) -> bool {
        self.node(id).is_some_and(|n| n.minimized)
    }

    /// Record the host's minimized state for an item.
    pub fn set_minimized(&mut self, id: ItemId, minimized: bool) {
        if let Some(n) = self.node_mut(id) {
            n.minimized = minimized;
        }
    }

    /// The top-level ancestor of `id` (itself, if it has no parent).
    #[must_use]
    pub fn root_of(&self, id: ItemId) -> Option<ItemId> {
        let mut slot = *self.index.get(&id)?;
        loop {
            let node = self.nodes[slot].as_ref()?;
            match node.parent {
                Some(p) => slot = p,
                None => return Some(node.id),
            }
        }
    }

    /// Top-level items, sorted by id.
    #[must_use]
    pub fn top_level(&self) -> Vec<ItemId> {
        let mut roots: Vec<ItemId> = self
            .nodes
            .iter()
            .flatten()
            .filter(|n| n.parent.is_none())
            .map(|n| n.id)
            .collect();
        roots.sort_unstable();
        roots
    }

    /// Pre-order traversal of `id`'s subtree (the item itself first),
    /// using an explicit stack.
    #[must_use]
    pub fn subtree(&self, id: ItemId) -> Vec<ItemId> {
        let Some(&slot) = self.index.get(&id) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut stack = vec![slot];
        while let Some(cur) = stack.pop() {
            let Some(node) = self.nodes[cur].as_ref() else {
                continue;
            };
            out.push(node.id);
            for &child in node.children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    fn node(&self, id: ItemId) -> Option<&ItemNode> {
        self.index.get(&id).and_then(|&slot| self.nodes[slot].as_ref())
    }

    fn node_mut(&mut self, id: ItemId) -> Option<&mut ItemNode> {
        self.index
            .get(&id)
            .and_then(|&slot| self.nodes[slot].as_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geom() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 100.0)
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut tree = ItemTree::new();
        assert!(tree.insert(ItemId(1), geom(), None));
        assert!(tree.contains(ItemId(1)));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.geometry(ItemId(1)), Some(geom()));
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut tree = ItemTree::new();
        assert!(tree.insert(ItemId(1), geom(), None));
        assert!(!tree.insert(ItemId(1), geom(), None));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_insert_with_missing_parent_rejected() {
        let mut tree = ItemTree::new();
        assert!(!tree.insert(ItemId(2), geom(), Some(ItemId(1))));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_top_level_sorted_by_id() {
        let mut tree = ItemTree::new();
        assert!(tree.insert(ItemId(30), geom(), None));
        assert!(tree.insert(ItemId(10), geom(), None));
        assert!(tree.insert(ItemId(20), geom(), None));
        assert_eq!(
            tree.top_level(),
            vec![ItemId(10), ItemId(20), ItemId(30)]
        );
    }

    #[test]
    fn test_children_excluded_from_top_level() {
        let mut tree = ItemTree::new();
        assert!(tree.insert(ItemId(1), geom(), None));
        assert!(tree.insert(ItemId(2), geom(), Some(ItemId(1))));
        assert_eq!(tree.top_level(), vec![ItemId(1)]);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_subtree_preorder() {
        let mut tree = ItemTree::new();
        assert!(tree.insert(ItemId(1), geom(), None));
        assert!(tree.insert(ItemId(2), geom(), Some(ItemId(1))));
        assert!(tree.insert(ItemId(3), geom(), Some(ItemId(1))));
        assert!(tree.insert(ItemId(4), geom(), Some(ItemId(2))));
        assert_eq!(
            tree.subtree(ItemId(1)),
            vec![ItemId(1), ItemId(2), ItemId(4), ItemId(3)]
        );
    }

    #[test]
    fn test_root_of() {
        let mut tree = ItemTree::new();
        assert!(tree.insert(ItemId(1), geom(), None));
        assert!(tree.insert(ItemId(2), geom(), Some(ItemId(1))));
        assert!(tree.insert(ItemId(3), geom(), Some(ItemId(2))));
        assert_eq!(tree.root_of(ItemId(3)), Some(ItemId(1)));
        assert_eq!(tree.root_of(ItemId(1)), Some(ItemId(1)));
        assert_eq!(tree.root_of(ItemId(9)), None);
    }

    #[test]
    fn test_remove_subtree() {
        let mut tree = ItemTree::new();
        assert!(tree.insert(ItemId(1), geom(), None));
        assert!(tree.insert(ItemId(2), geom(), Some(ItemId(1))));
        assert!(tree.insert(ItemId(3), geom(), None));

        let removed = tree.remove_subtree(ItemId(1));
        assert_eq!(removed, vec![ItemId(1), ItemId(2)]);
        assert_eq!(tree.len(), 1);
        assert!(!tree.contains(ItemId(1)));
        assert!(!tree.contains(ItemId(2)));
        assert!(tree.contains(ItemId(3)));
    }

    #[test]
    fn test_remove_child_unlinks_parent() {
        let mut tree = ItemTree::new();
        assert!(tree.insert(ItemId(1), geom(), None));
        assert!(tree.insert(ItemId(2), geom(), Some(ItemId(1))));
        let removed = tree.remove_subtree(ItemId(2));
        assert_eq!(removed, vec![ItemId(2)]);
        assert_eq!(tree.subtree(ItemId(1)), vec![ItemId(1)]);
    }

    #[test]
    fn test_slot_reuse_after_removal() {
        let mut tree = ItemTree::new();
        assert!(tree.insert(ItemId(1), geom(), None));
        let _ = tree.remove_subtree(ItemId(1));
        assert!(tree.insert(ItemId(2), geom(), None));
        assert_eq!(tree.top_level(), vec![ItemId(2)]);
    }

    #[test]
    fn test_minimized_flag() {
        let mut tree = ItemTree::new();
        assert!(tree.insert(ItemId(1), geom(), None));
        assert!(!tree.is_minimized(ItemId(1)));
        tree.set_minimized(ItemId(1), true);
        assert!(tree.is_minimized(ItemId(1)));
    }
}
