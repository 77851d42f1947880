//! Arena slot layout.

use crate::index::NodeIndex;

/// Intra-tree links of one slot. `None` is the "no such node" sentinel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Links {
    pub(crate) parent: Option<NodeIndex>,
    pub(crate) first_child: Option<NodeIndex>,
    pub(crate) last_child: Option<NodeIndex>,
    pub(crate) prev_sibling: Option<NodeIndex>,
    pub(crate) next_sibling: Option<NodeIndex>,
    /// Number of direct children, kept in step with the child chain.
    pub(crate) child_count: usize,
}

/// One arena slot. A slot is live iff it holds a payload.
#[derive(Clone, Debug)]
pub(crate) struct Slot<T> {
    pub(crate) payload: Option<T>,
    pub(crate) links: Links,
}

impl<T> Slot<T> {
    pub(crate) fn occupied(payload: T) -> Self {
        Self {
            payload: Some(payload),
            links: Links::default(),
        }
    }

    pub(crate) fn is_live(&self) -> bool {
        self.payload.is_some()
    }

    /// Drop the payload and reset every link. The slot joins the free list.
    pub(crate) fn release(&mut self) {
        self.payload = None;
        self.links = Links::default();
    }
}
