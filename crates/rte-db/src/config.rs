//! Loader configuration.

use std::path::PathBuf;

/// Settings for a [`DatabaseLoader`](crate::DatabaseLoader).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Directory that `from_file` paths resolve against for documents that
    /// were not read from a file. Default: the current directory.
    pub base_dir: PathBuf,
    /// How many `from_file` includes may nest below the top-level document.
    /// Default: [`DEFAULT_MAX_INCLUDE_DEPTH`](Self::DEFAULT_MAX_INCLUDE_DEPTH).
    pub max_include_depth: usize,
}

impl LoaderConfig {
    /// Default include nesting limit.
    pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 8;

    /// Config resolving includes against `base_dir`, with the default depth
    /// limit.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            max_include_depth: Self::DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }

    /// Builder-style depth override.
    pub fn with_max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
