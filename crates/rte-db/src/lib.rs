//! Resource database and JSON document loader for RTE scenes.
//!
//! A [`Database`] keeps one [`SparseTree`](rte_tree::SparseTree) per
//! payload type. Materials and meshes are flat lists hanging off the root;
//! resources and scene nodes are genuine hierarchies. Documents refer to
//! entries by [`UserId`], which the database maps to internal
//! [`NodeIndex`](rte_tree::NodeIndex) values.
//!
//! [`DatabaseLoader`] reads documents into a database, building resource
//! hierarchies depth-first and grafting in resources from other documents
//! referenced by `from_file`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod database;
pub mod document;
pub mod error;
pub mod loader;
pub mod model;

pub use config::LoaderConfig;
pub use database::Database;
pub use document::Document;
pub use error::LoadError;
pub use loader::DatabaseLoader;
pub use model::{Cubemap, Material, Mesh, Resource, SceneNode, UserId};
