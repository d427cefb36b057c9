#![forbid(unsafe_code)]

//! Section outline and depth resolution.
//!
//! A section's *child sections* are its nearest section descendants, i.e.
//! those with no other section between them and it. Depth is then defined
//! recursively: a section with no child sections has depth 0, any other
//! section has depth `1 + min(depth of its child sections)`.
//!
//! ```
//! use sdeck_dom::{Document, NodeSpec};
//! use sdeck_runtime::depth::SectionOutline;
//!
//! let mut doc = Document::new();
//! let root = doc.root();
//! doc.append_spec(
//!     root,
//!     &NodeSpec::element("section")
//!         .child(NodeSpec::element("section"))
//!         .child(NodeSpec::element("div").child(NodeSpec::element("section"))),
//! )
//! .unwrap();
//!
//! let outline = SectionOutline::resolve(&doc, root);
//! let depths: Vec<u32> = outline.iter().map(|s| s.depth).collect();
//! assert_eq!(depths, vec![1, 0, 0]);
//! ```

use std::collections::BTreeMap;

use sdeck_dom::{Document, NodeId};

/// Tag name that marks a presentation section.
pub const SECTION_TAG: &str = "section";

/// One section of the outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionInfo {
    /// The section element.
    pub node: NodeId,
    /// Outline index of the nearest enclosing section.
    pub parent: Option<usize>,
    /// Outline indices of the child sections, in document order.
    pub children: Vec<usize>,
    /// Resolved depth.
    pub depth: u32,
}

impl SectionInfo {
    /// True when no section is nested below this one.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// All sections under a root, in document order, with resolved depths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionOutline {
    sections: Vec<SectionInfo>,
    by_node: BTreeMap<NodeId, usize>,
}

impl SectionOutline {
    /// Walk the subtree rooted at `root` and resolve every section's depth.
    ///
    /// `root` itself counts only if it is a section.
    #[must_use]
    pub fn resolve(doc: &Document, root: NodeId) -> Self {
        let mut sections: Vec<SectionInfo> = Vec::new();
        let mut by_node: BTreeMap<NodeId, usize> = BTreeMap::new();

        let nodes = core::iter::once(root).chain(doc.descendants(root));
        for node in nodes.filter(|&n| doc.is_tag(n, SECTION_TAG)) {
            let parent = if node == root {
                None
            } else {
                doc.ancestors(node)
                    .skip(1)
                    .take_while(|&a| a != root)
                    .chain(core::iter::once(root))
                    .find_map(|a| by_node.get(&a).copied())
            };
            let index = sections.len();
            if let Some(p) = parent {
                sections[p].children.push(index);
            }
            by_node.insert(node, index);
            sections.push(SectionInfo {
                node,
                parent,
                children: Vec::new(),
                depth: 0,
            });
        }

        // Pre-order puts every child after its parent, so a reverse sweep
        // visits children first.
        for index in (0..sections.len()).rev() {
            let depth = sections[index]
                .children
                .iter()
                .map(|&c| sections[c].depth)
                .min()
                .map_or(0, |d| d + 1);
            sections[index].depth = depth;
        }

        tracing::trace!(
            target: "sdeck.build",
            sections = sections.len(),
            "resolved section outline"
        );
        Self { sections, by_node }
    }

    /// Number of sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// True when the subtree holds no sections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Sections in document order.
    #[must_use]
    pub fn sections(&self) -> &[SectionInfo] {
        &self.sections
    }

    /// Iterate sections in document order.
    pub fn iter(&self) -> impl Iterator<Item = &SectionInfo> {
        self.sections.iter()
    }

    /// Outline entry for a section element.
    #[must_use]
    pub fn get(&self, node: NodeId) -> Option<&SectionInfo> {
        self.by_node.get(&node).map(|&i| &self.sections[i])
    }

    /// Depth of a section element.
    #[must_use]
    pub fn depth_of(&self, node: NodeId) -> Option<u32> {
        self.get(node).map(|s| s.depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdeck_dom::NodeSpec;

    fn section() -> NodeSpec {
        NodeSpec::element("section")
    }

    fn depths(doc: &Document, root: NodeId) -> Vec<u32> {
        SectionOutline::resolve(doc, root)
            .iter()
            .map(|s| s.depth)
            .collect()
    }

    #[test]
    fn flat_sections_are_leaves() {
        let mut doc = Document::new();
        let root = doc.root();
        for _ in 0..3 {
            doc.append_spec(root, &section()).unwrap();
        }
        assert_eq!(depths(&doc, root), vec![0, 0, 0]);
    }

    #[test]
    fn depth_uses_shallowest_branch() {
        // A has children B (leaf) and C (which has a leaf D).
        let mut doc = Document::new();
        let root = doc.root();
        doc.append_spec(
            root,
            &section()
                .child(section())
                .child(section().child(section())),
        )
        .unwrap();
        assert_eq!(depths(&doc, root), vec![1, 0, 1, 0]);
    }

    #[test]
    fn deepest_chain_counts_levels() {
        let mut doc = Document::new();
        let root = doc.root();
        doc.append_spec(
            root,
            &section().child(section().child(section().child(section()))),
        )
        .unwrap();
        assert_eq!(depths(&doc, root), vec![3, 2, 1, 0]);
    }

    #[test]
    fn intermediate_elements_do_not_break_nesting() {
        let mut doc = Document::new();
        let root = doc.root();
        let outer = doc
            .append_spec(
                root,
                &section().child(
                    NodeSpec::element("div")
                        .child(NodeSpec::element("article").child(section())),
                ),
            )
            .unwrap();
        let outline = SectionOutline::resolve(&doc, root);
        assert_eq!(outline.depth_of(outer), Some(1));
        assert_eq!(outline.sections()[1].parent, Some(0));
        assert!(outline.sections()[1].is_leaf());
    }

    #[test]
    fn root_counts_only_when_it_is_a_section() {
        let mut doc = Document::new();
        let root = doc.root();
        let top = doc
            .append_spec(root, &section().child(section()))
            .unwrap();
        assert_eq!(SectionOutline::resolve(&doc, top).len(), 2);
        let div = doc.append_spec(root, &NodeSpec::element("div")).unwrap();
        assert!(SectionOutline::resolve(&doc, div).is_empty());
    }

    #[test]
    fn sections_outside_root_are_ignored() {
        let mut doc = Document::new();
        let root = doc.root();
        doc.append_spec(root, &section()).unwrap();
        let scope = doc
            .append_spec(root, &NodeSpec::element("div").child(section()))
            .unwrap();
        assert_eq!(SectionOutline::resolve(&doc, scope).len(), 1);
    }
}
