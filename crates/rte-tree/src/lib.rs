//! Index-addressed sparse tree store for RTE scene and resource hierarchies.
//!
//! Every tree-shaped entity in the engine (scene nodes, resource nodes,
//! flat material lists) lives in a [`SparseTree`]: a dense arena of slots
//! addressed by [`NodeIndex`], with parent, child and sibling links stored
//! as plain indices.
//!
//! # Architecture
//!
//! ```text
//! SparseTree<T>
//! ├── Vec<Slot<T>>          (dense arena, slot 0 is the root)
//! │   └── Slot { payload: Option<T>, Links }
//! ├── VecDeque<NodeIndex>   (free list, LIFO or FIFO per TreeConfig)
//! └── len                   (live nodes, root excluded)
//! ```
//!
//! # Index stability
//!
//! An index stays valid until its node, or one of its ancestors, is erased.
//! Freed slots are reused by later insertions, so index values are not
//! monotonic once anything has been erased.
//!
//! # Iteration
//!
//! [`Children`] is a double-ended iterator over the direct children of a
//! node. [`ChildrenMut`] is its mutable counterpart, a lending cursor over
//! the same link walk. [`Descendants`] walks a whole subtree in depth-first
//! pre-order.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod index;
pub mod iter;
mod node;
pub mod tree;

// Public re-exports for the primary API surface.
pub use config::{ReuseOrder, TreeConfig};
pub use error::TreeError;
pub use index::NodeIndex;
pub use iter::{Children, ChildrenMut, Descendants, Direction};
pub use tree::SparseTree;
