#![forbid(unsafe_code)]

//! Declarative subtree descriptions.
//!
//! A [`NodeSpec`] is plain data: hosts ship it as JSON, tests build it with
//! the small builder API, and [`Document::append_spec`] materializes it.
//!
//! ```
//! use sdeck_dom::{Document, NodeSpec};
//!
//! let mut doc = Document::new();
//! let root = doc.root();
//! let slide = NodeSpec::element("section")
//!     .attr("data-x", "500")
//!     .child(NodeSpec::element("h1").child(NodeSpec::text("Hello")));
//! doc.append_spec(root, &slide).unwrap();
//! assert_eq!(
//!     doc.inner_markup(root),
//!     r#"<section data-x="500"><h1>Hello</h1></section>"#
//! );
//! ```

use std::collections::BTreeMap;

use sdeck_core::node::NodeId;
use serde::{Deserialize, Serialize};

use crate::DomError;
use crate::document::Document;

/// Serializable description of a node and its subtree.
///
/// In JSON a text node is a bare string and an element is an object:
/// `{"tag": "section", "attrs": {"id": "intro"}, "children": ["Hi"]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeSpec {
    Text(String),
    Element {
        tag: String,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        attrs: BTreeMap<String, String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<NodeSpec>,
    },
}

impl NodeSpec {
    /// An element with no attributes or children.
    #[must_use]
    pub fn element(tag: impl Into<String>) -> Self {
        Self::Element {
            tag: tag.into(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// A text node.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Add an attribute. No-op on text nodes.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Self::Element { attrs, .. } = &mut self {
            attrs.insert(name.into(), value.into());
        }
        self
    }

    /// Append a child. No-op on text nodes.
    #[must_use]
    pub fn child(mut self, child: NodeSpec) -> Self {
        if let Self::Element { children, .. } = &mut self {
            children.push(child);
        }
        self
    }

    /// Append several children. No-op on text nodes.
    #[must_use]
    pub fn children(mut self, more: impl IntoIterator<Item = NodeSpec>) -> Self {
        if let Self::Element { children, .. } = &mut self {
            children.extend(more);
        }
        self
    }
}

impl Document {
    /// Materialize `spec` as the last child of `parent`.
    pub fn append_spec(&mut self, parent: NodeId, spec: &NodeSpec) -> Result<NodeId, DomError> {
        let id = self.build_spec(spec)?;
        self.append_child(parent, id)?;
        Ok(id)
    }

    fn build_spec(&mut self, spec: &NodeSpec) -> Result<NodeId, DomError> {
        match spec {
            NodeSpec::Text(text) => Ok(self.create_text(text.clone())),
            NodeSpec::Element {
                tag,
                attrs,
                children,
            } => {
                let id = self.create_element(tag);
                for (name, value) in attrs {
                    self.set_attr(id, name, value.clone())?;
                }
                for child in children {
                    let child_id = self.build_spec(child)?;
                    self.append_child(id, child_id)?;
                }
                Ok(id)
            }
        }
    }
}
