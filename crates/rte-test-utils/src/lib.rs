//! Test utilities for RTE development.
//!
//! Provides the canonical fixture trees ([`fixtures`]) and traversal
//! helpers that count or search a tree through each iteration flavour, so
//! tests can check that every flavour sees the same topology.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use rte_tree::{Direction, NodeIndex, SparseTree};

/// Count every node reachable from the root (root included), walking
/// children forward with an explicit stack.
pub fn count_nodes<T>(tree: &SparseTree<T>) -> usize {
    let mut count = 0;
    let mut pending = vec![NodeIndex::ROOT];
    while let Some(index) = pending.pop() {
        count += 1;
        if let Ok(children) = tree.children(index) {
            pending.extend(children.map(|(child, _)| child));
        }
    }
    count
}

/// Same as [`count_nodes`], walking children back to front.
pub fn count_nodes_rev<T>(tree: &SparseTree<T>) -> usize {
    let mut count = 0;
    let mut pending = vec![NodeIndex::ROOT];
    while let Some(index) = pending.pop() {
        count += 1;
        if let Ok(children) = tree.children(index) {
            pending.extend(children.rev().map(|(child, _)| child));
        }
    }
    count
}

/// Same as [`count_nodes`], stepping the mutable cursor in `direction`.
pub fn count_nodes_mut<T>(tree: &mut SparseTree<T>, direction: Direction) -> usize {
    let mut count = 0;
    let mut pending = vec![NodeIndex::ROOT];
    while let Some(index) = pending.pop() {
        count += 1;
        if let Ok(mut children) = tree.children_mut(index) {
            while let Some((child, _)) = children.advance(direction) {
                pending.push(child);
            }
        }
    }
    count
}

/// Same as [`count_nodes`], following `last_child` / `prev_sibling` links
/// directly instead of an iterator.
pub fn count_nodes_by_links<T>(tree: &SparseTree<T>) -> usize {
    let mut count = 0;
    let mut pending = vec![NodeIndex::ROOT];
    while let Some(index) = pending.pop() {
        count += 1;
        let mut child = tree.last_child(index).ok().flatten();
        while let Some(current) = child {
            pending.push(current);
            child = tree.prev_sibling(current).ok().flatten();
        }
    }
    count
}

/// Depth-first search for `value` below `start`, visiting children in
/// insertion order.
pub fn find_value<T: PartialEq>(
    tree: &SparseTree<T>,
    start: NodeIndex,
    value: &T,
) -> Option<NodeIndex> {
    let mut pending = vec![start];
    while let Some(index) = pending.pop() {
        if tree.get(index)? == value {
            return Some(index);
        }
        if let Ok(children) = tree.children_rev(index) {
            pending.extend(children.map(|(child, _)| child));
        }
    }
    None
}

/// Payloads of the subtree at `start` in pre-order.
pub fn pre_order<T: Clone>(tree: &SparseTree<T>, start: NodeIndex) -> Vec<T> {
    tree.descendants(start)
        .map(|walk| walk.map(|(_, payload)| payload.clone()).collect())
        .unwrap_or_default()
}

/// Payloads of the direct children of `parent`, in insertion order.
pub fn child_values<T: Clone>(tree: &SparseTree<T>, parent: NodeIndex) -> Vec<T> {
    tree.children(parent)
        .map(|walk| walk.map(|(_, payload)| payload.clone()).collect())
        .unwrap_or_default()
}
