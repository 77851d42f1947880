//! Node addressing.

use std::fmt;

/// Identifies a node slot within a [`SparseTree`](crate::SparseTree).
///
/// `NodeIndex(n)` is the n-th slot of the arena. An index is only
/// meaningful for the tree that returned it, and only until that node is
/// erased. After an erase the same value may be handed out again for a new
/// node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    /// The root of every tree. Always live, never erasable.
    pub const ROOT: NodeIndex = NodeIndex(0);

    /// Whether this is the root index.
    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }

    /// Slot position in the arena.
    pub(crate) fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NodeIndex {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
