//! Tree shapes for benchmarking the sparse tree.
//!
//! - [`balanced_tree`]: every internal node has the same fanout
//! - [`churned_tree`]: a wide tree with every other child erased, so the
//!   free list is populated

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rte_tree::{NodeIndex, SparseTree};

/// Build a complete tree of `depth` levels below the root where every
/// internal node has `fanout` children. Payloads count up in creation order.
///
/// Returns the tree and the single top-level node.
pub fn balanced_tree(fanout: usize, depth: usize) -> (SparseTree<u32>, NodeIndex) {
    let mut tree = SparseTree::new();
    let mut next = 0u32;
    let top = tree.insert_under_root(next);
    let mut level = vec![top];
    for _ in 1..depth {
        let mut below = Vec::with_capacity(level.len() * fanout);
        for &parent in &level {
            for _ in 0..fanout {
                next += 1;
                let child = tree
                    .insert(next, parent)
                    .expect("parent was inserted on the previous level");
                below.push(child);
            }
        }
        level = below;
    }
    (tree, top)
}

/// Number of nodes in [`balanced_tree`]`(fanout, depth)`, root excluded.
pub fn balanced_size(fanout: usize, depth: usize) -> usize {
    (0..depth).map(|level| fanout.pow(level as u32)).sum()
}

/// Build `width` children under the root, then erase every other one.
pub fn churned_tree(width: usize) -> SparseTree<u32> {
    let mut tree = SparseTree::new();
    let children: Vec<NodeIndex> = (0..width as u32)
        .map(|v| tree.insert_under_root(v))
        .collect();
    for index in children.into_iter().step_by(2) {
        tree.erase(index).expect("each child is erased once");
    }
    tree
}
