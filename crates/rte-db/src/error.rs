//! Errors raised while loading documents.

use std::path::PathBuf;

use rte_tree::TreeError;
use thiserror::Error;

/// Reasons a document could not be loaded into a [`Database`](crate::Database).
///
/// Unresolved user-id references are not errors; the loader logs and skips
/// them.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The document file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or does not match the schema.
    #[error("invalid document: {0}")]
    Parse(#[from] serde_json::Error),

    /// A flat mesh array cannot be grouped into vectors of `arity` floats.
    #[error("mesh field `{field}` has {len} values, not a multiple of {arity}")]
    MalformedArray {
        /// Document field name.
        field: &'static str,
        /// Number of values present.
        len: usize,
        /// Components per vector.
        arity: usize,
    },

    /// `from_file` includes nested deeper than the configured limit,
    /// typically because two documents include each other.
    #[error("include of {} exceeds depth limit {depth}", .path.display())]
    IncludeDepthExceeded {
        /// Include that crossed the limit.
        path: PathBuf,
        /// The configured limit.
        depth: usize,
    },

    /// An included document defines no resource tree to graft.
    #[error("included document {} has no resources", .path.display())]
    EmptyInclude {
        /// The included document.
        path: PathBuf,
    },

    /// A tree operation failed.
    #[error(transparent)]
    Tree(#[from] TreeError),
}
