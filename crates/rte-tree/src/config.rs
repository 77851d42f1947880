//! Tree configuration parameters.

/// Order in which freed slots are handed back out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReuseOrder {
    /// Most recently freed slot first (a stack).
    #[default]
    Lifo,
    /// Oldest freed slot first (a queue).
    Fifo,
}

/// Configuration for a [`SparseTree`](crate::SparseTree).
///
/// All values are fixed at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeConfig {
    /// Number of slots preallocated, the root included.
    ///
    /// Default: 16. Values below 1 are treated as 1.
    pub initial_capacity: usize,

    /// Free-list reuse order. Default: [`ReuseOrder::Lifo`].
    pub reuse: ReuseOrder,
}

impl TreeConfig {
    /// Default number of preallocated slots.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

    /// Create a config with the given initial capacity and default reuse order.
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            reuse: ReuseOrder::default(),
        }
    }

    /// Builder-style override of the reuse order.
    pub fn with_reuse(mut self, reuse: ReuseOrder) -> Self {
        self.reuse = reuse;
        self
    }

    /// Capacity actually reserved: the root slot always fits.
    pub(crate) fn effective_capacity(&self) -> usize {
        self.initial_capacity.max(1)
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INITIAL_CAPACITY)
    }
}
