//! Child and subtree iteration.
//!
//! All walks share one primitive, `ChildCursor`, which steps through a
//! sibling chain from either end. [`Children`] wraps it in a read-only
//! double-ended iterator; [`ChildrenMut`] wraps it in a lending cursor that
//! hands out one `&mut T` at a time.

use std::iter::FusedIterator;

use smallvec::SmallVec;

use crate::index::NodeIndex;
use crate::node::Slot;
use crate::tree::SparseTree;

/// Which end of a sibling chain to step from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Insertion order, first child to last.
    Forward,
    /// Reverse insertion order, last child to first.
    Backward,
}

/// Position within one parent's child chain.
///
/// `front` and `back` close in on each other as the cursor is stepped from
/// either end; `remaining` stops them from crossing.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ChildCursor {
    front: Option<NodeIndex>,
    back: Option<NodeIndex>,
    remaining: usize,
}

impl ChildCursor {
    /// Cursor over the children of `parent`, which must be live.
    pub(crate) fn new<T>(slots: &[Slot<T>], parent: NodeIndex) -> Self {
        let links = &slots[parent.slot()].links;
        Self {
            front: links.first_child,
            back: links.last_child,
            remaining: links.child_count,
        }
    }

    pub(crate) fn step<T>(&mut self, slots: &[Slot<T>], direction: Direction) -> Option<NodeIndex> {
        if self.remaining == 0 {
            return None;
        }
        let current = match direction {
            Direction::Forward => self.front?,
            Direction::Backward => self.back?,
        };
        self.remaining -= 1;
        let links = &slots[current.slot()].links;
        match direction {
            Direction::Forward => self.front = links.next_sibling,
            Direction::Backward => self.back = links.prev_sibling,
        }
        if self.remaining == 0 {
            self.front = None;
            self.back = None;
        }
        Some(current)
    }

    pub(crate) fn remaining(&self) -> usize {
        self.remaining
    }
}

// ── Children ───────────────────────────────────────────────────────

/// Iterator over the direct children of a node, yielding `(index, &payload)`.
///
/// Created by [`SparseTree::children`]. Forward iteration follows insertion
/// order; `.rev()` or [`next_back`](DoubleEndedIterator::next_back) walks
/// from the last child. The iterator borrows the tree, so the topology
/// cannot change underneath it.
pub struct Children<'a, T> {
    tree: &'a SparseTree<T>,
    cursor: ChildCursor,
}

impl<'a, T> Children<'a, T> {
    pub(crate) fn new(tree: &'a SparseTree<T>, parent: NodeIndex) -> Self {
        Self {
            tree,
            cursor: ChildCursor::new(&tree.slots, parent),
        }
    }

    fn advance(&mut self, direction: Direction) -> Option<(NodeIndex, &'a T)> {
        let tree = self.tree;
        let slots = &tree.slots;
        let index = self.cursor.step(slots, direction)?;
        slots[index.slot()]
            .payload
            .as_ref()
            .map(|payload| (index, payload))
    }
}

impl<T> Clone for Children<'_, T> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            cursor: self.cursor,
        }
    }
}

impl<'a, T> Iterator for Children<'a, T> {
    type Item = (NodeIndex, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        self.advance(Direction::Forward)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.cursor.remaining();
        (n, Some(n))
    }
}

impl<T> DoubleEndedIterator for Children<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.advance(Direction::Backward)
    }
}

impl<T> ExactSizeIterator for Children<'_, T> {}

impl<T> FusedIterator for Children<'_, T> {}

// ── ChildrenMut ────────────────────────────────────────────────────

/// Mutable cursor over the direct children of a node.
///
/// Created by [`SparseTree::children_mut`]. Each step lends out one
/// `&mut T`, valid until the next step, so this is not an [`Iterator`]:
///
/// ```
/// use rte_tree::{NodeIndex, SparseTree};
///
/// let mut tree = SparseTree::<i32>::new();
/// tree.insert(1, NodeIndex::ROOT).unwrap();
/// tree.insert(2, NodeIndex::ROOT).unwrap();
///
/// let mut children = tree.children_mut(NodeIndex::ROOT).unwrap();
/// while let Some((_, value)) = children.next() {
///     *value *= 10;
/// }
/// let values: Vec<i32> = tree.children(NodeIndex::ROOT).unwrap().map(|(_, v)| *v).collect();
/// assert_eq!(values, [10, 20]);
/// ```
pub struct ChildrenMut<'a, T> {
    tree: &'a mut SparseTree<T>,
    cursor: ChildCursor,
}

impl<'a, T> ChildrenMut<'a, T> {
    pub(crate) fn new(tree: &'a mut SparseTree<T>, parent: NodeIndex) -> Self {
        let cursor = ChildCursor::new(&tree.slots, parent);
        Self { tree, cursor }
    }

    /// Step from the given end of the child chain.
    pub fn advance(&mut self, direction: Direction) -> Option<(NodeIndex, &mut T)> {
        let index = self.cursor.step(&self.tree.slots, direction)?;
        self.tree.slots[index.slot()]
            .payload
            .as_mut()
            .map(|payload| (index, payload))
    }

    /// Next child in insertion order.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<(NodeIndex, &mut T)> {
        self.advance(Direction::Forward)
    }

    /// Next child from the back (reverse insertion order).
    pub fn next_back(&mut self) -> Option<(NodeIndex, &mut T)> {
        self.advance(Direction::Backward)
    }

    /// Children not yet visited.
    pub fn len(&self) -> usize {
        self.cursor.remaining()
    }

    /// Whether every child has been visited.
    pub fn is_empty(&self) -> bool {
        self.cursor.remaining() == 0
    }
}

// ── Descendants ────────────────────────────────────────────────────

/// Depth-first pre-order walk of a subtree, yielding `(index, &payload)`.
///
/// Created by [`SparseTree::descendants`]. The subtree root comes first,
/// and siblings are visited in insertion order.
pub struct Descendants<'a, T> {
    tree: &'a SparseTree<T>,
    pending: SmallVec<[NodeIndex; 16]>,
}

impl<'a, T> Descendants<'a, T> {
    pub(crate) fn new(tree: &'a SparseTree<T>, root: NodeIndex) -> Self {
        let mut pending = SmallVec::new();
        pending.push(root);
        Self { tree, pending }
    }
}

impl<'a, T> Iterator for Descendants<'a, T> {
    type Item = (NodeIndex, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        let slots = &tree.slots;
        let index = self.pending.pop()?;
        // Pushed last-to-first so the first child is popped next.
        let mut cursor = ChildCursor::new(slots, index);
        while let Some(child) = cursor.step(slots, Direction::Backward) {
            self.pending.push(child);
        }
        slots[index.slot()]
            .payload
            .as_ref()
            .map(|payload| (index, payload))
    }
}

impl<T> FusedIterator for Descendants<'_, T> {}
