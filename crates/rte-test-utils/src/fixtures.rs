//! Canonical fixture trees.
//!
//! The "sample" tree, built under the root in this order:
//!
//! ```text
//! 1
//!   2
//!     3
//!     4
//!   5
//!   6
//!     7
//!     8
//! ```
//!
//! The "graft" tree, used as a merge source:
//!
//! ```text
//! 9
//!   10
//!     11
//!     12
//!     13
//!   14
//!     15
//!       16
//! ```

use rte_tree::{NodeIndex, SparseTree};

/// Index of every node of a fixture tree, addressed by payload value.
#[derive(Clone, Debug)]
pub struct FixtureNodes {
    nodes: Vec<(i32, NodeIndex)>,
}

impl FixtureNodes {
    /// Index of the node holding `value`.
    ///
    /// # Panics
    ///
    /// Panics if the fixture has no such value.
    pub fn of(&self, value: i32) -> NodeIndex {
        self.nodes
            .iter()
            .find(|(v, _)| *v == value)
            .map(|(_, index)| *index)
            .unwrap_or_else(|| panic!("fixture has no node {value}"))
    }
}

/// `(value, parent value)` pairs; parent `0` is the root.
const SAMPLE: [(i32, i32); 8] = [(1, 0), (2, 1), (3, 2), (4, 2), (5, 1), (6, 1), (7, 6), (8, 6)];

const GRAFT: [(i32, i32); 8] = [
    (9, 0),
    (10, 9),
    (11, 10),
    (12, 10),
    (13, 10),
    (14, 9),
    (15, 14),
    (16, 15),
];

fn build(shape: &[(i32, i32)]) -> (SparseTree<i32>, FixtureNodes) {
    let mut tree = SparseTree::new();
    let mut nodes = FixtureNodes { nodes: Vec::new() };
    for &(value, parent) in shape {
        let parent = if parent == 0 {
            NodeIndex::ROOT
        } else {
            nodes.of(parent)
        };
        let index = tree
            .insert(value, parent)
            .unwrap_or_else(|e| panic!("fixture insert {value}: {e}"));
        nodes.nodes.push((value, index));
    }
    (tree, nodes)
}

/// The eight-node sample tree. On a fresh store node `n` lands in slot `n`.
pub fn sample_tree() -> (SparseTree<i32>, FixtureNodes) {
    build(&SAMPLE)
}

/// The eight-node graft tree.
pub fn graft_tree() -> (SparseTree<i32>, FixtureNodes) {
    build(&GRAFT)
}

/// A root with `width` children, each holding its position.
pub fn wide_tree(width: usize) -> SparseTree<i32> {
    let mut tree = SparseTree::new();
    for value in 0..width {
        tree.insert_under_root(value as i32);
    }
    tree
}

/// A single chain `depth` nodes deep hanging off the root.
pub fn deep_tree(depth: usize) -> (SparseTree<i32>, NodeIndex) {
    let mut tree = SparseTree::new();
    let mut parent = NodeIndex::ROOT;
    let mut first = NodeIndex::ROOT;
    for value in 0..depth {
        parent = tree
            .insert(value as i32, parent)
            .unwrap_or_else(|e| panic!("chain insert {value}: {e}"));
        if value == 0 {
            first = parent;
        }
    }
    (tree, first)
}
