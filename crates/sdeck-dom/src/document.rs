#![forbid(unsafe_code)]

//! Arena tree of elements and text nodes.
//!
//! Nodes are allocated once and never freed. Detaching a node keeps it (and
//! its subtree) alive in the arena so it can be re-inserted later.
//!
//! # Invariants
//!
//! 1. Every node except the root has at most one parent, and appears exactly
//!    once in that parent's child list.
//! 2. No node is its own ancestor.
//! 3. Only elements have children, attributes, or style.

use std::collections::{BTreeMap, BTreeSet};

use sdeck_core::node::NodeId;

use crate::DomError;

/// Tag of the root element every document starts with.
pub const ROOT_TAG: &str = "body";

/// Payload of one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Element(Element),
    Text(String),
}

/// Element payload: tag, attributes, and inline style.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    tag: String,
    attrs: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// Lowercase tag name.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attributes in name order.
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Inline style properties in name order.
    pub fn style(&self) -> impl Iterator<Item = (&str, &str)> {
        self.style.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// Mutations recorded since the last [`Document::take_changes`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentChanges {
    /// Nodes whose attributes, classes, or inline style changed.
    pub dirty: BTreeSet<NodeId>,
    /// Whether any node was inserted, moved, or removed.
    pub structural: bool,
}

impl DocumentChanges {
    /// Nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dirty.is_empty() && !self.structural
    }
}

/// An arena-backed document.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Option<Node>>,
    /// Slots released by [`Document::remove`], reused by the next allocation.
    free: Vec<NodeId>,
    root: NodeId,
    changes: DocumentChanges,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document holding only the root element.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(Node {
                parent: None,
                children: Vec::new(),
                data: NodeData::Element(Element::new(ROOT_TAG)),
            })],
            free: Vec::new(),
            root: NodeId::new(0),
            changes: DocumentChanges::default(),
        }
    }

    /// The root element.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes (attached or not).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// A document always holds its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `id` names a live node of this document.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.get(id.index()).is_some_and(Option::is_some)
    }

    fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.nodes
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(DomError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        self.nodes
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(DomError::UnknownNode(id))
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut Element, DomError> {
        match &mut self.node_mut(id)?.data {
            NodeData::Element(el) => Ok(el),
            NodeData::Text(_) => Err(DomError::NotAnElement(id)),
        }
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let node = Node {
            parent: None,
            children: Vec::new(),
            data,
        };
        if let Some(id) = self.free.pop() {
            self.nodes[id.index()] = Some(node);
            return id;
        }
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(Some(node));
        id
    }

    // ── Creation ────────────────────────────────────────────────────────

    /// Allocate a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeData::Element(Element::new(tag)))
    }

    /// Allocate a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Text(text.into()))
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Node payload.
    #[must_use]
    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.node(id).ok().map(|n| &n.data)
    }

    /// Element payload, if `id` is an element.
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.data(id)? {
            NodeData::Element(el) => Some(el),
            NodeData::Text(_) => None,
        }
    }

    /// Lowercase tag name, if `id` is an element.
    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(Element::tag)
    }

    /// Whether `id` is an element with the given tag (case-insensitive).
    #[must_use]
    pub fn is_tag(&self, id: NodeId, tag: &str) -> bool {
        self.tag(id).is_some_and(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Text content, if `id` is a text node.
    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.data(id)? {
            NodeData::Text(t) => Some(t),
            NodeData::Element(_) => None,
        }
    }

    /// Parent node, `None` for the root and for detached nodes.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).ok().and_then(|n| n.parent)
    }

    /// Children in order. Empty for text nodes and unknown ids.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id)
            .ok()
            .map_or(&[][..], |n| n.children.as_slice())
    }

    /// `id` followed by its ancestors up to the topmost node.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let start = self.contains(id).then_some(id);
        std::iter::successors(start, move |&n| self.parent(n))
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    #[must_use]
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|n| n == ancestor)
    }

    /// Whether `id` is attached to the root.
    #[must_use]
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.is_inclusive_ancestor(self.root, id)
    }

    /// Pre-order descendants of `id`, excluding `id` itself.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// First connected element (document order) whose `id` attribute equals `value`.
    #[must_use]
    pub fn element_by_id(&self, value: &str) -> Option<NodeId> {
        if value.is_empty() {
            return None;
        }
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .find(|&n| self.attr(n, "id") == Some(value))
    }

    // ── Attributes & classes ────────────────────────────────────────────

    /// Attribute value.
    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attrs.get(name).map(String::as_str)
    }

    /// Set an attribute.
    pub fn set_attr(
        &mut self,
        id: NodeId,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), DomError> {
        let value = value.into();
        let el = self.element_mut(id)?;
        if el.attrs.get(name) != Some(&value) {
            el.attrs.insert(name.to_owned(), value);
            self.changes.dirty.insert(id);
        }
        Ok(())
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Result<Option<String>, DomError> {
        let prev = self.element_mut(id)?.attrs.remove(name);
        if prev.is_some() {
            self.changes.dirty.insert(id);
        }
        Ok(prev)
    }

    /// Whitespace-separated class tokens.
    pub fn classes(&self, id: NodeId) -> impl Iterator<Item = &str> {
        self.attr(id, "class").unwrap_or("").split_ascii_whitespace()
    }

    /// Whether the class list contains `class`.
    #[must_use]
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.classes(id).any(|c| c == class)
    }

    /// Add a class token if missing.
    pub fn add_class(&mut self, id: NodeId, class: &str) -> Result<(), DomError> {
        if self.has_class(id, class) {
            return self.element_mut(id).map(|_| ());
        }
        let mut tokens: Vec<&str> = self.classes(id).collect();
        tokens.push(class);
        let joined = tokens.join(" ");
        self.set_attr(id, "class", joined)
    }

    /// Remove every occurrence of a class token.
    ///
    /// The `class` attribute stays present (possibly empty) once it existed.
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> Result<(), DomError> {
        if !self.has_class(id, class) {
            return self.element_mut(id).map(|_| ());
        }
        let joined = self
            .classes(id)
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attr(id, "class", joined)
    }

    // ── Inline style ────────────────────────────────────────────────────

    /// Inline style property value.
    #[must_use]
    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.element(id)?.style.get(property).map(String::as_str)
    }

    /// Number of inline style properties.
    #[must_use]
    pub fn style_len(&self, id: NodeId) -> usize {
        self.element(id).map_or(0, |el| el.style.len())
    }

    /// Set one inline style property.
    pub fn set_style(
        &mut self,
        id: NodeId,
        property: &str,
        value: impl Into<String>,
    ) -> Result<(), DomError> {
        let value = value.into();
        let el = self.element_mut(id)?;
        if el.style.get(property) != Some(&value) {
            el.style.insert(property.to_owned(), value);
            self.changes.dirty.insert(id);
        }
        Ok(())
    }

    /// Set several inline style properties.
    pub fn set_styles<'a>(
        &mut self,
        id: NodeId,
        props: impl IntoIterator<Item = (&'a str, String)>,
    ) -> Result<(), DomError> {
        for (property, value) in props {
            self.set_style(id, property, value)?;
        }
        Ok(())
    }

    /// Remove every inline style property.
    pub fn clear_style(&mut self, id: NodeId) -> Result<(), DomError> {
        let el = self.element_mut(id)?;
        if !el.style.is_empty() {
            el.style.clear();
            self.changes.dirty.insert(id);
        }
        Ok(())
    }

    // ── Structure ───────────────────────────────────────────────────────

    /// Detach `id` from its parent, if any.
    pub fn detach(&mut self, id: NodeId) -> Result<(), DomError> {
        let Some(parent) = self.node(id)?.parent else {
            return Ok(());
        };
        self.node_mut(parent)?.children.retain(|&c| c != id);
        self.node_mut(id)?.parent = None;
        self.changes.structural = true;
        Ok(())
    }

    /// Detach `id` and free it together with its subtree.
    ///
    /// The ids of freed nodes become unknown and may be reissued by later
    /// allocations.
    pub fn remove(&mut self, id: NodeId) -> Result<(), DomError> {
        if id == self.root {
            return Err(DomError::RootNotMovable);
        }
        self.detach(id)?;
        let mut doomed = self.descendants(id);
        doomed.push(id);
        for node in doomed {
            self.nodes[node.index()] = None;
            self.changes.dirty.remove(&node);
            self.free.push(node);
        }
        Ok(())
    }

    /// Remove `child` from `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if self.node(child)?.parent != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.detach(child)
    }

    /// Append `child` as the last child of `parent`, moving it if attached elsewhere.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` before `reference` under `parent` (`None` appends).
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        self.node(child)?;
        if child == self.root {
            return Err(DomError::RootNotMovable);
        }
        if !matches!(self.node(parent)?.data, NodeData::Element(_)) {
            return Err(DomError::NotAnElement(parent));
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyCycle { parent, child });
        }
        if let Some(r) = reference {
            if self.node(r)?.parent != Some(parent) {
                return Err(DomError::NotAChild { parent, child: r });
            }
            if r == child {
                return Ok(());
            }
        }
        self.detach(child)?;
        let siblings = &mut self.node_mut(parent)?.children;
        let at = reference
            .and_then(|r| siblings.iter().position(|&c| c == r))
            .unwrap_or(siblings.len());
        siblings.insert(at, child);
        self.node_mut(child)?.parent = Some(parent);
        self.changes.structural = true;
        Ok(())
    }

    // ── Change tracking ─────────────────────────────────────────────────

    /// Changes recorded since the last drain.
    #[must_use]
    pub fn changes(&self) -> &DocumentChanges {
        &self.changes
    }

    /// Drain recorded changes.
    pub fn take_changes(&mut self) -> DocumentChanges {
        std::mem::take(&mut self.changes)
    }
}
