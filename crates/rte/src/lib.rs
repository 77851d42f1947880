//! RTE: an index-addressed sparse tree and the scene resource database
//! built on it.
//!
//! This facade re-exports the sub-crates so a single dependency is enough.
//!
//! # Quick start
//!
//! ```rust
//! use rte::prelude::*;
//!
//! let mut tree = SparseTree::<&str>::new();
//! let a = tree.insert("a", NodeIndex::ROOT).unwrap();
//! tree.insert("b", a).unwrap();
//! tree.insert("c", a).unwrap();
//!
//! let order: Vec<_> = tree.children_rev(a).unwrap().map(|(_, v)| *v).collect();
//! assert_eq!(order, ["c", "b"]);
//! assert_eq!(tree.erase(a), Ok(3));
//! assert!(tree.is_empty());
//!
//! let mut db = Database::new();
//! DatabaseLoader::default()
//!     .load_str(r#"{"resources": [{"user_id": 1, "children": [{"user_id": 2}]}]}"#, &mut db)
//!     .unwrap();
//! assert_eq!(db.resources().size(), 2);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`tree`] | `rte-tree` | `SparseTree`, indices, iterators, config |
//! | [`db`] | `rte-db` | Resource database, document schema, loader |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Sparse tree storage (`rte-tree`).
pub use rte_tree as tree;

/// Resource database and document loader (`rte-db`).
///
/// [`db::DatabaseLoader`] fills a [`db::Database`] from JSON documents.
pub use rte_db as db;

/// Common imports.
///
/// ```rust
/// use rte::prelude::*;
/// ```
pub mod prelude {
    // Tree
    pub use rte_tree::{Direction, NodeIndex, ReuseOrder, SparseTree, TreeConfig, TreeError};

    // Database
    pub use rte_db::{Database, DatabaseLoader, LoadError, LoaderConfig, UserId};
}
