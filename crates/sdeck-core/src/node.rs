#![forbid(unsafe_code)]

//! Stable handles into the document arena.

use std::fmt;

/// Index of a node inside a `sdeck_dom::Document`.
///
/// Handles are never reused: a node detached from the tree keeps its id, so a
/// `NodeId` stays valid for the lifetime of the document that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Wrap a raw arena index.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw arena index.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Arena index as `usize`.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<NodeId> for u32 {
    fn from(id: NodeId) -> Self {
        id.0
    }
}
