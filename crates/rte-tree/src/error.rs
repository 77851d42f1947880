//! Tree-specific error types.

use std::error::Error;
use std::fmt;

use crate::index::NodeIndex;

/// Errors that can occur during tree operations.
///
/// Every variant is recoverable. The tree reports the error to its caller
/// and leaves its own state untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeError {
    /// The index does not refer to a live node (erased, never allocated,
    /// or out of range).
    InvalidNode {
        /// The offending index.
        index: NodeIndex,
    },
    /// The parent supplied to an insertion or merge is not live.
    InvalidParent {
        /// The offending parent index.
        index: NodeIndex,
    },
    /// The root of a merge's source subtree is not live in the source tree.
    InvalidSource {
        /// The offending source index.
        index: NodeIndex,
    },
    /// Attempted to erase the root node.
    RootErasure,
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidNode { index } => write!(f, "node {index} is not live"),
            Self::InvalidParent { index } => {
                write!(f, "parent node {index} is not live")
            }
            Self::InvalidSource { index } => {
                write!(f, "source node {index} is not live in the source tree")
            }
            Self::RootErasure => write!(f, "the root node cannot be erased"),
        }
    }
}

impl Error for TreeError {}
