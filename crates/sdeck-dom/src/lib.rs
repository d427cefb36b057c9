#![forbid(unsafe_code)]

//! Document model for sdeck.
//!
//! # Role in sdeck
//! `sdeck-dom` is the surface the engine mutates. It is a small arena tree of
//! elements and text nodes with attributes, class lists, and inline style
//! maps: enough of a DOM to move slide content around, to carry transform
//! styles, and to serialize the result deterministically.
//!
//! # Key Components
//!
//! - [`Document`] - the arena tree and its mutation API
//! - [`DocumentChanges`] - what changed since the last drain, consumed by presenters
//! - [`NodeSpec`] - declarative (serde-friendly) description of a subtree
//! - [`DomError`] - failures of structural operations

pub mod document;
pub mod markup;
pub mod spec;

pub use document::{Document, DocumentChanges, NodeData};
pub use sdeck_core::node::NodeId;
pub use spec::NodeSpec;

use std::fmt;

/// Errors from document mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The id was not issued by this document.
    UnknownNode(NodeId),
    /// The operation requires an element but the node is text.
    NotAnElement(NodeId),
    /// `child` is not a child of `parent`.
    NotAChild { parent: NodeId, child: NodeId },
    /// Inserting `child` under `parent` would make a node its own ancestor.
    HierarchyCycle { parent: NodeId, child: NodeId },
    /// The document root cannot be inserted under another node.
    RootNotMovable,
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode(id) => write!(f, "unknown node {id}"),
            Self::NotAnElement(id) => write!(f, "node {id} is not an element"),
            Self::NotAChild { parent, child } => {
                write!(f, "node {child} is not a child of {parent}")
            }
            Self::HierarchyCycle { parent, child } => {
                write!(f, "inserting {child} under {parent} would create a cycle")
            }
            Self::RootNotMovable => f.write_str("the document root cannot be moved"),
        }
    }
}

impl std::error::Error for DomError {}
