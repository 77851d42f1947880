//! The sparse tree store.
//!
//! [`SparseTree`] keeps every node in one `Vec` of slots. Links between
//! nodes are slot indices, validated against slot liveness on every public
//! call. Erased slots go onto a free list and are handed out again by later
//! insertions.

use std::collections::VecDeque;

use smallvec::SmallVec;

use crate::config::{ReuseOrder, TreeConfig};
use crate::error::TreeError;
use crate::index::NodeIndex;
use crate::iter::{ChildCursor, Children, ChildrenMut, Descendants, Direction};
use crate::node::{Links, Slot};

/// Arena-backed tree with stable, reusable integer addressing.
///
/// A tree always contains its root at [`NodeIndex::ROOT`]. The root is not
/// counted by [`size`](Self::size) and cannot be erased; every other node is
/// created by [`insert`](Self::insert) or [`merge`](Self::merge) and
/// destroyed by [`erase`](Self::erase) of itself or an ancestor.
///
/// Cloning deep-copies the arena and preserves every index.
#[derive(Clone, Debug)]
pub struct SparseTree<T> {
    /// All slots, live and free. Slot 0 is the root.
    pub(crate) slots: Vec<Slot<T>>,
    /// Free slots available for reuse.
    free_list: VecDeque<NodeIndex>,
    reuse: ReuseOrder,
    /// Live nodes, root excluded.
    len: usize,
}

impl<T: Default> SparseTree<T> {
    /// Create a tree whose root holds `T::default()`.
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    /// Create a tree with a default root payload and the given config.
    pub fn with_config(config: TreeConfig) -> Self {
        Self::with_root_and_config(T::default(), config)
    }

    /// Erase every node except the root and reset the root payload.
    ///
    /// Every released slot goes onto the free list; the next insertion
    /// reuses slot 1 whichever [`ReuseOrder`] is configured.
    pub fn clear(&mut self) {
        let slot_count = self.slots.len();
        for slot in &mut self.slots[1..] {
            slot.release();
        }
        self.slots[0] = Slot::occupied(T::default());
        self.free_list.clear();
        match self.reuse {
            ReuseOrder::Lifo => self
                .free_list
                .extend((1..slot_count).rev().map(|s| NodeIndex(s as u32))),
            ReuseOrder::Fifo => self
                .free_list
                .extend((1..slot_count).map(|s| NodeIndex(s as u32))),
        }
        self.len = 0;
    }
}

impl<T: Default> Default for SparseTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SparseTree<T> {
    /// Create a tree with an explicit root payload.
    pub fn with_root(root: T) -> Self {
        Self::with_root_and_config(root, TreeConfig::default())
    }

    /// Create a tree with an explicit root payload and config.
    pub fn with_root_and_config(root: T, config: TreeConfig) -> Self {
        let mut slots = Vec::with_capacity(config.effective_capacity());
        slots.push(Slot::occupied(root));
        Self {
            slots,
            free_list: VecDeque::new(),
            reuse: config.reuse,
            len: 0,
        }
    }

    /// Number of live nodes, root excluded.
    pub fn size(&self) -> usize {
        self.len
    }

    /// Whether nothing is attached to the root.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Physical arena length (live + free slots, root included).
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of free slots waiting for reuse.
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    /// Slots the arena can hold before reallocating.
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Whether `index` refers to a live node.
    pub fn contains(&self, index: NodeIndex) -> bool {
        self.slots
            .get(index.slot())
            .is_some_and(|slot| slot.is_live())
    }

    /// Payload of a live node, or `None`.
    pub fn get(&self, index: NodeIndex) -> Option<&T> {
        self.slots.get(index.slot())?.payload.as_ref()
    }

    /// Mutable payload of a live node, or `None`.
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut T> {
        self.slots.get_mut(index.slot())?.payload.as_mut()
    }

    /// Payload of a live node.
    pub fn at(&self, index: NodeIndex) -> Result<&T, TreeError> {
        self.get(index).ok_or(TreeError::InvalidNode { index })
    }

    /// Mutable payload of a live node.
    pub fn at_mut(&mut self, index: NodeIndex) -> Result<&mut T, TreeError> {
        self.get_mut(index).ok_or(TreeError::InvalidNode { index })
    }

    /// Insert `payload` as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if the arena already holds `u32::MAX` slots.
    pub fn insert(&mut self, payload: T, parent: NodeIndex) -> Result<NodeIndex, TreeError> {
        if !self.contains(parent) {
            return Err(TreeError::InvalidParent { index: parent });
        }
        Ok(self.attach(payload, parent))
    }

    /// Insert `payload` as the last child of the root.
    pub fn insert_under_root(&mut self, payload: T) -> NodeIndex {
        self.attach(payload, NodeIndex::ROOT)
    }

    /// Erase `index` and its whole subtree. Returns the number of nodes
    /// released.
    ///
    /// Surviving siblings keep their relative order. Every index in the
    /// erased subtree becomes invalid.
    pub fn erase(&mut self, index: NodeIndex) -> Result<usize, TreeError> {
        if index.is_root() {
            return Err(TreeError::RootErasure);
        }
        if !self.contains(index) {
            return Err(TreeError::InvalidNode { index });
        }
        self.unlink(index);

        let mut pending: SmallVec<[NodeIndex; 16]> = SmallVec::new();
        pending.push(index);
        let mut released = 0;
        while let Some(current) = pending.pop() {
            let mut cursor = ChildCursor::new(&self.slots, current);
            while let Some(child) = cursor.step(&self.slots, Direction::Backward) {
                pending.push(child);
            }
            self.slots[current.slot()].release();
            self.free_list.push_back(current);
            released += 1;
        }
        self.len -= released;
        Ok(released)
    }

    /// Exchange the whole state of two trees without copying nodes.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    // ── Topology ───────────────────────────────────────────────────

    fn links(&self, index: NodeIndex) -> Result<&Links, TreeError> {
        match self.slots.get(index.slot()) {
            Some(slot) if slot.is_live() => Ok(&slot.links),
            _ => Err(TreeError::InvalidNode { index }),
        }
    }

    /// Parent of a live node (`None` for the root).
    pub fn parent(&self, index: NodeIndex) -> Result<Option<NodeIndex>, TreeError> {
        Ok(self.links(index)?.parent)
    }

    /// First child of a live node.
    pub fn first_child(&self, index: NodeIndex) -> Result<Option<NodeIndex>, TreeError> {
        Ok(self.links(index)?.first_child)
    }

    /// Last child of a live node.
    pub fn last_child(&self, index: NodeIndex) -> Result<Option<NodeIndex>, TreeError> {
        Ok(self.links(index)?.last_child)
    }

    /// Next sibling of a live node, in insertion order.
    pub fn next_sibling(&self, index: NodeIndex) -> Result<Option<NodeIndex>, TreeError> {
        Ok(self.links(index)?.next_sibling)
    }

    /// Previous sibling of a live node, in insertion order.
    pub fn prev_sibling(&self, index: NodeIndex) -> Result<Option<NodeIndex>, TreeError> {
        Ok(self.links(index)?.prev_sibling)
    }

    /// Number of direct children of a live node.
    pub fn child_count(&self, index: NodeIndex) -> Result<usize, TreeError> {
        Ok(self.links(index)?.child_count)
    }

    /// The `n`-th direct child (zero-based, insertion order), if any.
    pub fn nth_child(&self, index: NodeIndex, n: usize) -> Result<Option<NodeIndex>, TreeError> {
        Ok(self.children(index)?.nth(n).map(|(child, _)| child))
    }

    // ── Iteration ──────────────────────────────────────────────────

    /// Iterate the direct children of a live node.
    pub fn children(&self, index: NodeIndex) -> Result<Children<'_, T>, TreeError> {
        self.links(index)?;
        Ok(Children::new(self, index))
    }

    /// Iterate the direct children of a live node, last child first.
    pub fn children_rev(
        &self,
        index: NodeIndex,
    ) -> Result<std::iter::Rev<Children<'_, T>>, TreeError> {
        Ok(self.children(index)?.rev())
    }

    /// Mutable cursor over the direct children of a live node.
    pub fn children_mut(&mut self, index: NodeIndex) -> Result<ChildrenMut<'_, T>, TreeError> {
        self.links(index)?;
        Ok(ChildrenMut::new(self, index))
    }

    /// Depth-first pre-order walk of the subtree rooted at `index`.
    pub fn descendants(&self, index: NodeIndex) -> Result<Descendants<'_, T>, TreeError> {
        self.links(index)?;
        Ok(Descendants::new(self, index))
    }

    /// Number of nodes in the subtree rooted at `index`, itself included.
    pub fn subtree_size(&self, index: NodeIndex) -> Result<usize, TreeError> {
        Ok(self.descendants(index)?.count())
    }

    /// First node in pre-order below (and including) `start` whose payload
    /// matches `predicate`.
    pub fn find<P>(&self, start: NodeIndex, mut predicate: P) -> Option<NodeIndex>
    where
        P: FnMut(&T) -> bool,
    {
        self.descendants(start)
            .ok()?
            .find(|(_, payload)| predicate(payload))
            .map(|(index, _)| index)
    }

    // ── Slot management ────────────────────────────────────────────

    /// Allocate a slot for `payload` and link it under `parent`, which the
    /// caller has checked is live.
    fn attach(&mut self, payload: T, parent: NodeIndex) -> NodeIndex {
        let index = self.alloc(payload);
        self.link_last_child(parent, index);
        self.len += 1;
        index
    }

    fn alloc(&mut self, payload: T) -> NodeIndex {
        let reused = match self.reuse {
            ReuseOrder::Lifo => self.free_list.pop_back(),
            ReuseOrder::Fifo => self.free_list.pop_front(),
        };
        match reused {
            Some(index) => {
                self.slots[index.slot()] = Slot::occupied(payload);
                index
            }
            None => {
                let index = u32::try_from(self.slots.len())
                    .ok()
                    .filter(|&i| i != u32::MAX)
                    .map(NodeIndex);
                let Some(index) = index else {
                    panic!("sparse tree index space exhausted");
                };
                self.slots.push(Slot::occupied(payload));
                index
            }
        }
    }

    fn link_last_child(&mut self, parent: NodeIndex, child: NodeIndex) {
        let last = self.slots[parent.slot()].links.last_child;
        {
            let links = &mut self.slots[child.slot()].links;
            links.parent = Some(parent);
            links.prev_sibling = last;
            links.next_sibling = None;
        }
        match last {
            Some(last) => self.slots[last.slot()].links.next_sibling = Some(child),
            None => self.slots[parent.slot()].links.first_child = Some(child),
        }
        let parent_links = &mut self.slots[parent.slot()].links;
        parent_links.last_child = Some(child);
        parent_links.child_count += 1;
    }

    /// Detach a live, non-root node from its parent's child chain.
    fn unlink(&mut self, index: NodeIndex) {
        let links = self.slots[index.slot()].links;
        let Some(parent) = links.parent else {
            return;
        };
        match links.prev_sibling {
            Some(prev) => self.slots[prev.slot()].links.next_sibling = links.next_sibling,
            None => self.slots[parent.slot()].links.first_child = links.next_sibling,
        }
        match links.next_sibling {
            Some(next) => self.slots[next.slot()].links.prev_sibling = links.prev_sibling,
            None => self.slots[parent.slot()].links.last_child = links.prev_sibling,
        }
        self.slots[parent.slot()].links.child_count -= 1;

        let links = &mut self.slots[index.slot()].links;
        links.parent = None;
        links.prev_sibling = None;
        links.next_sibling = None;
    }
}

impl<T: Clone> SparseTree<T> {
    /// Copy the subtree rooted at `source` in `other` under `destination`,
    /// as its last child. Returns the index of the copy of `source`.
    ///
    /// Copied nodes get fresh slots here, allocated in pre-order; their
    /// relative order is kept and `other` is not modified. Both indices are
    /// validated before anything is copied.
    pub fn merge(
        &mut self,
        other: &SparseTree<T>,
        source: NodeIndex,
        destination: NodeIndex,
    ) -> Result<NodeIndex, TreeError> {
        if !self.contains(destination) {
            return Err(TreeError::InvalidParent { index: destination });
        }
        let root_payload = other
            .get(source)
            .ok_or(TreeError::InvalidSource { index: source })?
            .clone();

        let merged_root = self.attach(root_payload, destination);
        // (node in `other`, parent of its copy here), popped in pre-order.
        let mut pending: SmallVec<[(NodeIndex, NodeIndex); 16]> = SmallVec::new();
        let mut cursor = ChildCursor::new(&other.slots, source);
        while let Some(child) = cursor.step(&other.slots, Direction::Backward) {
            pending.push((child, merged_root));
        }
        while let Some((from, parent)) = pending.pop() {
            let Some(payload) = other.get(from) else {
                continue;
            };
            let copy = self.attach(payload.clone(), parent);
            let mut cursor = ChildCursor::new(&other.slots, from);
            while let Some(child) = cursor.step(&other.slots, Direction::Backward) {
                pending.push((child, copy));
            }
        }
        Ok(merged_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Walk every live node and check the link invariants.
    fn assert_consistent<T>(tree: &SparseTree<T>) {
        let mut live = 0;
        for (slot_index, slot) in tree.slots.iter().enumerate() {
            let index = NodeIndex(slot_index as u32);
            if !slot.is_live() {
                assert!(
                    tree.free_list.contains(&index),
                    "free slot {index} not on free list"
                );
                continue;
            }
            if !index.is_root() {
                live += 1;
                let parent = slot.links.parent.expect("non-root node has a parent");
                let siblings: Vec<_> = tree.children(parent).unwrap().map(|(i, _)| i).collect();
                assert_eq!(siblings.iter().filter(|&&i| i == index).count(), 1);
            } else {
                assert!(slot.links.parent.is_none());
            }
            let forward: Vec<_> = tree.children(index).unwrap().map(|(i, _)| i).collect();
            let mut backward: Vec<_> = tree
                .children(index)
                .unwrap()
                .rev()
                .map(|(i, _)| i)
                .collect();
            backward.reverse();
            assert_eq!(forward, backward);
            assert_eq!(forward.len(), slot.links.child_count);
            assert_eq!(forward.first().copied(), slot.links.first_child);
            assert_eq!(forward.last().copied(), slot.links.last_child);
            for child in forward {
                assert_eq!(tree.parent(child).unwrap(), Some(index));
            }
        }
        assert_eq!(live, tree.size());
        assert_eq!(tree.subtree_size(NodeIndex::ROOT).unwrap(), tree.size() + 1);
    }

    fn values<T: Copy>(tree: &SparseTree<T>, index: NodeIndex) -> Vec<T> {
        tree.children(index).unwrap().map(|(_, v)| *v).collect()
    }

    #[test]
    fn empty_tree_has_only_root() {
        let tree = SparseTree::<u32>::new();
        assert_eq!(tree.size(), 0);
        assert!(tree.is_empty());
        assert!(tree.contains(NodeIndex::ROOT));
        assert_eq!(*tree.at(NodeIndex::ROOT).unwrap(), 0);
        assert_eq!(tree.parent(NodeIndex::ROOT).unwrap(), None);
        assert_eq!(tree.children(NodeIndex::ROOT).unwrap().count(), 0);
    }

    #[test]
    fn first_insert_lands_after_root() {
        let mut tree = SparseTree::<u32>::new();
        let index = tree.insert(1, NodeIndex::ROOT).unwrap();
        assert_eq!(index, NodeIndex(1));
        assert_eq!(tree.size(), 1);
        assert_eq!(tree.insert_under_root(2), NodeIndex(2));
    }

    #[test]
    fn insert_under_missing_parent_fails() {
        let mut tree = SparseTree::<u32>::new();
        assert_eq!(
            tree.insert(1, NodeIndex(9)),
            Err(TreeError::InvalidParent {
                index: NodeIndex(9)
            })
        );
        assert_eq!(tree.size(), 0);
        assert_eq!(tree.slot_count(), 1);
    }

    #[test]
    fn insert_under_erased_parent_fails() {
        let mut tree = SparseTree::<u32>::new();
        let a = tree.insert(1, NodeIndex::ROOT).unwrap();
        tree.erase(a).unwrap();
        assert_eq!(
            tree.insert(2, a),
            Err(TreeError::InvalidParent { index: a })
        );
    }

    #[test]
    fn children_keep_insertion_order() {
        let mut tree = SparseTree::<u32>::new();
        let a = tree.insert(10, NodeIndex::ROOT).unwrap();
        let b = tree.insert(20, a).unwrap();
        let c = tree.insert(30, a).unwrap();
        assert_eq!(values(&tree, a), [20, 30]);
        let rev: Vec<_> = tree.children_rev(a).unwrap().map(|(i, _)| i).collect();
        assert_eq!(rev, [c, b]);
        assert_eq!(tree.size(), 3);

        assert_eq!(tree.erase(a), Ok(3));
        assert_eq!(tree.size(), 0);
        for gone in [a, b, c] {
            assert_eq!(tree.at(gone), Err(TreeError::InvalidNode { index: gone }));
        }
        assert_consistent(&tree);
    }

    #[test]
    fn erase_middle_child_closes_gap() {
        let mut tree = SparseTree::<u32>::new();
        let a = tree.insert(1, NodeIndex::ROOT).unwrap();
        let b = tree.insert(2, NodeIndex::ROOT).unwrap();
        let c = tree.insert(3, NodeIndex::ROOT).unwrap();
        tree.erase(b).unwrap();
        assert_eq!(values(&tree, NodeIndex::ROOT), [1, 3]);
        assert_eq!(tree.next_sibling(a).unwrap(), Some(c));
        assert_eq!(tree.prev_sibling(c).unwrap(), Some(a));
        assert_consistent(&tree);
    }

    #[test]
    fn erase_first_and_last_child_moves_ends() {
        let mut tree = SparseTree::<u32>::new();
        let a = tree.insert(1, NodeIndex::ROOT).unwrap();
        let b = tree.insert(2, NodeIndex::ROOT).unwrap();
        let c = tree.insert(3, NodeIndex::ROOT).unwrap();
        tree.erase(a).unwrap();
        assert_eq!(tree.first_child(NodeIndex::ROOT).unwrap(), Some(b));
        tree.erase(c).unwrap();
        assert_eq!(tree.last_child(NodeIndex::ROOT).unwrap(), Some(b));
        assert_eq!(tree.child_count(NodeIndex::ROOT).unwrap(), 1);
        assert_consistent(&tree);
    }

    #[test]
    fn erase_root_is_rejected() {
        let mut tree = SparseTree::<u32>::new();
        tree.insert(1, NodeIndex::ROOT).unwrap();
        assert_eq!(tree.erase(NodeIndex::ROOT), Err(TreeError::RootErasure));
        assert_eq!(tree.size(), 1);
    }

    #[test]
    fn erase_twice_is_invalid_node() {
        let mut tree = SparseTree::<u32>::new();
        let a = tree.insert(1, NodeIndex::ROOT).unwrap();
        tree.erase(a).unwrap();
        assert_eq!(tree.erase(a), Err(TreeError::InvalidNode { index: a }));
        assert_eq!(
            tree.erase(NodeIndex(77)),
            Err(TreeError::InvalidNode {
                index: NodeIndex(77)
            })
        );
    }

    #[test]
    fn freed_slot_is_reused() {
        let mut tree = SparseTree::<u32>::new();
        let a = tree.insert(1, NodeIndex::ROOT).unwrap();
        tree.insert(2, NodeIndex::ROOT).unwrap();
        tree.erase(a).unwrap();
        assert_eq!(tree.free_count(), 1);
        let reused = tree.insert(3, NodeIndex::ROOT).unwrap();
        assert_eq!(reused, a);
        assert_eq!(tree.free_count(), 0);
        assert_eq!(tree.slot_count(), 3);
        // The reused node is a fresh last child.
        assert_eq!(values(&tree, NodeIndex::ROOT), [2, 3]);
    }

    #[test]
    fn fifo_reuses_oldest_slot_first() {
        let mut tree =
            SparseTree::<u32>::with_config(TreeConfig::new(4).with_reuse(ReuseOrder::Fifo));
        let a = tree.insert(1, NodeIndex::ROOT).unwrap();
        let b = tree.insert(2, NodeIndex::ROOT).unwrap();
        tree.erase(a).unwrap();
        tree.erase(b).unwrap();
        assert_eq!(tree.insert(3, NodeIndex::ROOT).unwrap(), a);
        assert_eq!(tree.insert(4, NodeIndex::ROOT).unwrap(), b);
    }

    #[test]
    fn lifo_reuses_newest_slot_first() {
        let mut tree = SparseTree::<u32>::new();
        let a = tree.insert(1, NodeIndex::ROOT).unwrap();
        let b = tree.insert(2, NodeIndex::ROOT).unwrap();
        tree.erase(a).unwrap();
        tree.erase(b).unwrap();
        assert_eq!(tree.insert(3, NodeIndex::ROOT).unwrap(), b);
        assert_eq!(tree.insert(4, NodeIndex::ROOT).unwrap(), a);
    }

    #[test]
    fn at_mut_edits_payload() {
        let mut tree = SparseTree::<String>::new();
        let a = tree.insert("a".into(), NodeIndex::ROOT).unwrap();
        tree.at_mut(a).unwrap().push('!');
        assert_eq!(tree.at(a).unwrap(), "a!");
        assert!(tree.get_mut(NodeIndex(5)).is_none());
    }

    #[test]
    fn clear_resets_root_and_frees_everything() {
        let mut tree = SparseTree::<u32>::new();
        *tree.at_mut(NodeIndex::ROOT).unwrap() = 99;
        let a = tree.insert(1, NodeIndex::ROOT).unwrap();
        tree.insert(2, a).unwrap();
        tree.clear();
        assert_eq!(tree.size(), 0);
        assert_eq!(*tree.at(NodeIndex::ROOT).unwrap(), 0);
        assert_eq!(tree.free_count(), 2);
        assert!(!tree.contains(a));
        let fresh = tree.insert(7, NodeIndex::ROOT).unwrap();
        assert_eq!(fresh, NodeIndex(1));
        assert_eq!(values(&tree, NodeIndex::ROOT), [7]);
        assert_consistent(&tree);
    }

    #[test]
    fn clear_with_fifo_also_starts_at_slot_one() {
        let mut tree =
            SparseTree::<u32>::with_config(TreeConfig::default().with_reuse(ReuseOrder::Fifo));
        for v in 0..4 {
            tree.insert(v, NodeIndex::ROOT).unwrap();
        }
        tree.clear();
        assert_eq!(tree.insert(1, NodeIndex::ROOT).unwrap(), NodeIndex(1));
        assert_eq!(tree.insert(2, NodeIndex::ROOT).unwrap(), NodeIndex(2));
    }

    #[test]
    fn swap_exchanges_state() {
        let mut full = SparseTree::<u32>::new();
        full.insert(1, NodeIndex::ROOT).unwrap();
        full.insert(2, NodeIndex::ROOT).unwrap();
        let mut empty = SparseTree::<u32>::new();
        full.swap(&mut empty);
        assert_eq!(full.size(), 0);
        assert_eq!(empty.size(), 2);
        assert_eq!(values(&empty, NodeIndex::ROOT), [1, 2]);
    }

    #[test]
    fn clone_preserves_indices() {
        let mut tree = SparseTree::<u32>::new();
        let a = tree.insert(1, NodeIndex::ROOT).unwrap();
        let b = tree.insert(2, a).unwrap();
        tree.erase(b).unwrap();
        let c = tree.insert(3, a).unwrap();
        let copy = tree.clone();
        assert_eq!(copy.at(c), Ok(&3));
        assert_eq!(copy.parent(c).unwrap(), Some(a));
        assert_eq!(copy.size(), tree.size());
    }

    #[test]
    fn merge_copies_subtree_and_leaves_source_alone() {
        let mut t1 = SparseTree::<char>::new();
        let x = t1.insert('x', NodeIndex::ROOT).unwrap();
        let y = t1.insert('y', x).unwrap();

        let mut t2 = SparseTree::<char>::new();
        let p = t2.insert('p', NodeIndex::ROOT).unwrap();
        let x2 = t2.merge(&t1, x, NodeIndex::ROOT).unwrap();

        assert_eq!(values(&t2, NodeIndex::ROOT), ['p', 'x']);
        assert_eq!(t2.first_child(NodeIndex::ROOT).unwrap(), Some(p));
        assert_eq!(values(&t2, x2), ['y']);
        assert_eq!(t2.size(), 3);

        assert_eq!(t2.erase(x2), Ok(2));
        assert_eq!(t1.size(), 2);
        assert_eq!(t1.at(x), Ok(&'x'));
        assert_eq!(t1.at(y), Ok(&'y'));
        assert_eq!(values(&t1, x), ['y']);
        assert_consistent(&t1);
        assert_consistent(&t2);
    }

    #[test]
    fn merge_preserves_nested_order() {
        let mut src = SparseTree::<u32>::new();
        let nine = src.insert(9, NodeIndex::ROOT).unwrap();
        let ten = src.insert(10, nine).unwrap();
        for v in [11, 12, 13] {
            src.insert(v, ten).unwrap();
        }
        let fourteen = src.insert(14, nine).unwrap();
        let fifteen = src.insert(15, fourteen).unwrap();
        src.insert(16, fifteen).unwrap();

        let mut dst = SparseTree::<u32>::new();
        let one = dst.insert(1, NodeIndex::ROOT).unwrap();
        let four = dst.insert(4, one).unwrap();
        let merged = dst.merge(&src, nine, four).unwrap();

        let src_order: Vec<_> = src.descendants(nine).unwrap().map(|(_, v)| *v).collect();
        let dst_order: Vec<_> = dst.descendants(merged).unwrap().map(|(_, v)| *v).collect();
        assert_eq!(src_order, dst_order);
        assert_eq!(dst_order, [9, 10, 11, 12, 13, 14, 15, 16]);
        assert_eq!(dst.parent(merged).unwrap(), Some(four));
        assert_eq!(dst.size(), 10);
        assert_consistent(&dst);
    }

    #[test]
    fn merge_validates_before_copying() {
        let src = SparseTree::<u32>::new();
        let mut dst = SparseTree::<u32>::new();
        assert_eq!(
            dst.merge(&src, NodeIndex(3), NodeIndex::ROOT),
            Err(TreeError::InvalidSource {
                index: NodeIndex(3)
            })
        );
        assert_eq!(
            dst.merge(&src, NodeIndex::ROOT, NodeIndex(8)),
            Err(TreeError::InvalidParent {
                index: NodeIndex(8)
            })
        );
        assert_eq!(dst.size(), 0);
        assert_eq!(dst.slot_count(), 1);
    }

    #[test]
    fn merge_from_erased_source_is_invalid_source() {
        let mut src = SparseTree::<u32>::new();
        let gone = src.insert(1, NodeIndex::ROOT).unwrap();
        src.insert(2, gone).unwrap();
        src.erase(gone).unwrap();

        let mut dst = SparseTree::<u32>::new();
        assert_eq!(
            dst.merge(&src, gone, NodeIndex::ROOT),
            Err(TreeError::InvalidSource { index: gone })
        );
        assert!(dst.is_empty());
        assert_eq!(dst.slot_count(), 1);
    }

    #[test]
    fn merge_of_source_root_copies_its_payload() {
        let mut src = SparseTree::<u32>::with_root(5);
        src.insert(6, NodeIndex::ROOT).unwrap();
        let mut dst = SparseTree::<u32>::new();
        let merged = dst.merge(&src, NodeIndex::ROOT, NodeIndex::ROOT).unwrap();
        assert_eq!(dst.at(merged), Ok(&5));
        assert_eq!(values(&dst, merged), [6]);
        assert_eq!(dst.size(), 2);
    }

    #[test]
    fn nth_child_and_find() {
        let mut tree = SparseTree::<u32>::new();
        let a = tree.insert(1, NodeIndex::ROOT).unwrap();
        let b = tree.insert(2, a).unwrap();
        let c = tree.insert(3, a).unwrap();
        assert_eq!(tree.nth_child(a, 0).unwrap(), Some(b));
        assert_eq!(tree.nth_child(a, 1).unwrap(), Some(c));
        assert_eq!(tree.nth_child(a, 2).unwrap(), None);
        assert_eq!(tree.find(NodeIndex::ROOT, |v| *v == 3), Some(c));
        assert_eq!(tree.find(b, |v| *v == 3), None);
        assert_eq!(tree.find(NodeIndex(40), |_| true), None);
        assert_eq!(tree.subtree_size(a), Ok(3));
    }

    #[test]
    fn topology_queries_reject_dead_nodes() {
        let tree = SparseTree::<u32>::new();
        let dead = NodeIndex(3);
        let err = Err(TreeError::InvalidNode { index: dead });
        assert_eq!(tree.parent(dead), err);
        assert_eq!(tree.first_child(dead), err);
        assert_eq!(tree.next_sibling(dead), err);
        assert!(tree.children(dead).is_err());
        assert!(tree.descendants(dead).is_err());
    }

    #[test]
    fn children_mut_rejects_dead_nodes() {
        let mut tree = SparseTree::<u32>::new();
        let a = tree.insert(1, NodeIndex::ROOT).unwrap();
        tree.erase(a).unwrap();
        assert_eq!(
            tree.children_mut(a).err(),
            Some(TreeError::InvalidNode { index: a })
        );
        let never = NodeIndex(12);
        assert_eq!(
            tree.children_mut(never).err(),
            Some(TreeError::InvalidNode { index: never })
        );
    }

    #[test]
    fn with_root_needs_no_default() {
        struct NoDefault(u8);
        let mut tree = SparseTree::with_root(NoDefault(1));
        let a = tree.insert(NoDefault(2), NodeIndex::ROOT).unwrap();
        assert_eq!(tree.at(a).unwrap().0, 2);
        assert_eq!(tree.at(NodeIndex::ROOT).unwrap().0, 1);
    }

    #[test]
    fn initial_capacity_is_reserved() {
        let tree = SparseTree::<u32>::with_config(TreeConfig::new(64));
        assert!(tree.capacity() >= 64);
        assert_eq!(tree.slot_count(), 1);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::collection::vec;
        use proptest::prelude::*;

        #[derive(Clone, Debug)]
        enum Op {
            /// Insert under the n-th live node (mod live count).
            Insert(usize),
            /// Erase the n-th live non-root node, if any.
            Erase(usize),
            Clear,
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                6 => any::<usize>().prop_map(Op::Insert),
                3 => any::<usize>().prop_map(Op::Erase),
                1 => Just(Op::Clear),
            ]
        }

        fn live_indices(tree: &SparseTree<u32>) -> Vec<NodeIndex> {
            tree.descendants(NodeIndex::ROOT)
                .unwrap()
                .map(|(i, _)| i)
                .collect()
        }

        fn pre_order_values(tree: &SparseTree<u32>, from: NodeIndex) -> Vec<u32> {
            tree.descendants(from).unwrap().map(|(_, v)| *v).collect()
        }

        proptest! {
            #[test]
            fn links_stay_consistent(ops in vec(op(), 1..80)) {
                let mut tree = SparseTree::<u32>::new();
                let mut next_value = 1;
                for op in ops {
                    let live = live_indices(&tree);
                    match op {
                        Op::Insert(n) => {
                            let parent = live[n % live.len()];
                            let before = tree.size();
                            let index = tree.insert(next_value, parent).unwrap();
                            next_value += 1;
                            prop_assert!(!live.contains(&index));
                            prop_assert_eq!(tree.size(), before + 1);
                            prop_assert_eq!(tree.last_child(parent).unwrap(), Some(index));
                        }
                        Op::Erase(n) => {
                            if live.len() > 1 {
                                let target = live[1 + n % (live.len() - 1)];
                                let doomed: Vec<_> =
                                    tree.descendants(target).unwrap().map(|(i, _)| i).collect();
                                let before = tree.size();
                                prop_assert_eq!(tree.erase(target), Ok(doomed.len()));
                                prop_assert_eq!(tree.size(), before - doomed.len());
                                for gone in doomed {
                                    prop_assert!(!tree.contains(gone));
                                }
                            }
                        }
                        Op::Clear => {
                            tree.clear();
                            prop_assert_eq!(tree.size(), 0);
                        }
                    }
                    assert_consistent(&tree);
                }
            }

            #[test]
            fn size_counts_successful_inserts(parents in vec(any::<usize>(), 0..60)) {
                let mut tree = SparseTree::<u32>::new();
                for (i, n) in parents.iter().enumerate() {
                    let live = live_indices(&tree);
                    tree.insert(i as u32, live[n % live.len()]).unwrap();
                }
                prop_assert_eq!(tree.size(), parents.len());
                let mut seen = live_indices(&tree);
                seen.sort();
                seen.dedup();
                prop_assert_eq!(seen.len(), parents.len() + 1);
            }

            #[test]
            fn merge_copy_matches_source_pre_order(parents in vec(any::<usize>(), 1..40)) {
                let mut src = SparseTree::<u32>::new();
                for (i, n) in parents.iter().enumerate() {
                    let live = live_indices(&src);
                    src.insert(i as u32, live[n % live.len()]).unwrap();
                }
                let snapshot = src.clone();
                let mut dst = SparseTree::<u32>::new();
                dst.insert(1000, NodeIndex::ROOT).unwrap();
                let merged = dst.merge(&src, NodeIndex(1), NodeIndex::ROOT).unwrap();

                let from = pre_order_values(&src, NodeIndex(1));
                let to = pre_order_values(&dst, merged);
                prop_assert_eq!(from, to);
                dst.erase(merged).unwrap();
                prop_assert_eq!(dst.size(), 1);

                prop_assert_eq!(live_indices(&src), live_indices(&snapshot));
                prop_assert_eq!(
                    pre_order_values(&src, NodeIndex::ROOT),
                    pre_order_values(&snapshot, NodeIndex::ROOT)
                );
                assert_consistent(&dst);
            }
        }
    }
}
