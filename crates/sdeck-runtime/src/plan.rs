#![forbid(unsafe_code)]

//! Read pass of step building.
//!
//! Everything the build needs is decided here without touching the document:
//! grid positions, per-step transforms, identifiers, and which children move
//! into the step wrapper. [`crate::builder`] then applies the plan in one
//! mutation pass.
//!
//! # Grid walk
//!
//! Sections are visited in document order with the previous depth starting
//! at an infinite sentinel. Equal depth moves one row down, a greater depth
//! moves one column right, and a smaller depth keeps the position.

use std::collections::BTreeSet;

use sdeck_core::geometry::{Transform3d, Vec3};
use sdeck_dom::{Document, NodeId};

use crate::config::DeckConfig;
use crate::depth::{SECTION_TAG, SectionOutline};

/// Prefix of synthesized step identifiers.
pub const SYNTHETIC_ID_PREFIX: &str = "step-";

/// Integer grid cell of a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GridPosition {
    pub x: u32,
    pub y: u32,
}

impl GridPosition {
    /// Create a grid position.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Advance from `self` given the previous and current depth.
    ///
    /// `previous` is `None` before the first section.
    #[must_use]
    pub const fn advance(self, previous: Option<u32>, depth: u32) -> Self {
        match previous {
            Some(p) if depth == p => Self::new(self.x, self.y + 1),
            Some(p) if depth > p => Self::new(self.x + 1, self.y),
            _ => self,
        }
    }
}

/// Grid positions for a sequence of depths in document order.
#[must_use]
pub fn grid_positions(depths: &[u32]) -> Vec<GridPosition> {
    let mut previous = None;
    let mut position = GridPosition::default();
    depths
        .iter()
        .map(|&depth| {
            position = position.advance(previous, depth);
            previous = Some(depth);
            position
        })
        .collect()
}

/// Author-supplied transform overrides read from `data-*` attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransformHints {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub rotate_x: Option<f64>,
    pub rotate_y: Option<f64>,
    pub rotate_z: Option<f64>,
    pub scale: Option<f64>,
}

/// Attribute names per hint, first match wins.
const X_ATTRS: &[&str] = &["data-x"];
const Y_ATTRS: &[&str] = &["data-y"];
const Z_ATTRS: &[&str] = &["data-z"];
const ROTATE_X_ATTRS: &[&str] = &["data-rotate-x", "data-rotateX", "data-rotatex"];
const ROTATE_Y_ATTRS: &[&str] = &["data-rotate-y", "data-rotateY", "data-rotatey"];
const ROTATE_Z_ATTRS: &[&str] = &[
    "data-rotate-z",
    "data-rotateZ",
    "data-rotatez",
    "data-rotate",
];
const SCALE_ATTRS: &[&str] = &["data-scale"];

impl TransformHints {
    /// Read hints from an element. Unparsable values are logged and ignored.
    #[must_use]
    pub fn from_element(doc: &Document, node: NodeId) -> Self {
        let read = |names: &[&str]| read_number(doc, node, names);
        let scale = read(SCALE_ATTRS).filter(|&s| {
            // The camera divides by the scale.
            let ok = s > 0.0 && s.recip().is_finite();
            if !ok {
                tracing::warn!(
                    target: "sdeck.build",
                    node = %node,
                    scale = s,
                    "ignoring non-invertible scale hint"
                );
            }
            ok
        });
        Self {
            x: read(X_ATTRS),
            y: read(Y_ATTRS),
            z: read(Z_ATTRS),
            rotate_x: read(ROTATE_X_ATTRS),
            rotate_y: read(ROTATE_Y_ATTRS),
            rotate_z: read(ROTATE_Z_ATTRS),
            scale,
        }
    }

    /// True when no hint is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Final transform: defaults from grid and depth, overridden per component.
    #[must_use]
    pub fn resolve(&self, position: GridPosition, depth: u32, grid_spacing: f64) -> Transform3d {
        let default_scale = if depth == 0 { 1.0 } else { f64::from(depth) };
        Transform3d {
            translate: Vec3::new(
                self.x.unwrap_or(f64::from(position.x) * grid_spacing),
                self.y.unwrap_or(f64::from(position.y) * grid_spacing),
                self.z.unwrap_or(0.0),
            ),
            rotate: Vec3::new(
                self.rotate_x.unwrap_or(0.0),
                self.rotate_y.unwrap_or(0.0),
                self.rotate_z.unwrap_or(0.0),
            ),
            scale: self.scale.unwrap_or(default_scale),
        }
    }
}

fn read_number(doc: &Document, node: NodeId, names: &[&str]) -> Option<f64> {
    let (name, raw) = names
        .iter()
        .find_map(|&name| doc.attr(node, name).map(|v| (name, v)))?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            tracing::warn!(
                target: "sdeck.build",
                node = %node,
                attr = name,
                value = raw,
                "ignoring unparsable transform hint"
            );
            None
        }
    }
}

/// Everything decided about one step before the document is mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedStep {
    /// Source section.
    pub section: NodeId,
    /// Resolved depth.
    pub depth: u32,
    /// Grid cell.
    pub position: GridPosition,
    /// Final placement.
    pub transform: Transform3d,
    /// Identifier the step element will carry.
    pub id: String,
    /// True when `id` was taken from the section.
    pub author_id: bool,
    /// Children that move into the step wrapper, in order.
    pub content: Vec<NodeId>,
    /// Snapshot of the section's children, restored on teardown.
    pub original_children: Vec<NodeId>,
}

/// Ordered plan for all steps under a root.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepPlan {
    pub steps: Vec<PlannedStep>,
}

impl StepPlan {
    /// Plan every section in `outline`.
    #[must_use]
    pub fn new(doc: &Document, outline: &SectionOutline, config: &DeckConfig) -> Self {
        let depths: Vec<u32> = outline.iter().map(|s| s.depth).collect();
        let positions = grid_positions(&depths);
        let mut ids = IdAllocator::new(doc);

        let steps = outline
            .iter()
            .zip(positions)
            .enumerate()
            .map(|(i, (info, position))| {
                let section = info.node;
                let hints = TransformHints::from_element(doc, section);
                let (id, author_id) = ids.assign(doc, section, i + 1);
                let original_children = doc.children(section).to_vec();
                let content = original_children
                    .iter()
                    .copied()
                    .filter(|&c| !doc.is_tag(c, SECTION_TAG))
                    .collect();
                PlannedStep {
                    section,
                    depth: info.depth,
                    position,
                    transform: hints.resolve(position, info.depth, config.grid_spacing),
                    id,
                    author_id,
                    content,
                    original_children,
                }
            })
            .collect();
        Self { steps }
    }

    /// Number of planned steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True when nothing is planned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

struct IdAllocator {
    taken: BTreeSet<String>,
}

impl IdAllocator {
    fn new(doc: &Document) -> Self {
        let root = doc.root();
        let taken = core::iter::once(root)
            .chain(doc.descendants(root))
            .filter_map(|n| doc.attr(n, "id"))
            .filter(|id| !id.is_empty())
            .map(str::to_owned)
            .collect();
        Self { taken }
    }

    fn assign(&mut self, doc: &Document, section: NodeId, ordinal: usize) -> (String, bool) {
        if let Some(id) = doc.attr(section, "id").filter(|id| !id.is_empty()) {
            return (id.to_owned(), true);
        }
        let base = format!("{SYNTHETIC_ID_PREFIX}{ordinal}");
        let mut candidate = base.clone();
        let mut suffix = 2;
        while self.taken.contains(&candidate) {
            candidate = format!("{base}-{suffix}");
            suffix += 1;
        }
        self.taken.insert(candidate.clone());
        (candidate, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sdeck_dom::NodeSpec;

    fn pos(x: u32, y: u32) -> GridPosition {
        GridPosition::new(x, y)
    }

    #[test]
    fn grid_walk_follows_depth_changes() {
        assert_eq!(
            grid_positions(&[0, 0, 1, 1, 0]),
            vec![pos(0, 0), pos(0, 1), pos(1, 1), pos(1, 2), pos(1, 2)]
        );
    }

    #[test]
    fn grid_walk_empty() {
        assert!(grid_positions(&[]).is_empty());
    }

    #[test]
    fn first_section_stays_at_origin_regardless_of_depth() {
        assert_eq!(grid_positions(&[3]), vec![pos(0, 0)]);
    }

    #[test]
    fn defaults_come_from_grid_and_depth() {
        let t = TransformHints::default().resolve(pos(2, 3), 0, 2000.0);
        assert_eq!(t.translate, Vec3::new(4000.0, 6000.0, 0.0));
        assert_eq!(t.rotate, Vec3::ZERO);
        assert_eq!(t.scale, 1.0);
        assert_eq!(TransformHints::default().resolve(pos(0, 0), 3, 2000.0).scale, 3.0);
    }

    #[test]
    fn hints_override_component_wise() {
        let mut doc = Document::new();
        let root = doc.root();
        let s = doc
            .append_spec(
                root,
                &NodeSpec::element("section")
                    .attr("data-x", "100")
                    .attr("data-rotate", "45.5")
                    .attr("data-rotate-x", "-10")
                    .attr("data-scale", "2"),
            )
            .unwrap();
        let hints = TransformHints::from_element(&doc, s);
        let t = hints.resolve(pos(1, 1), 0, 2000.0);
        assert_eq!(t.translate, Vec3::new(100.0, 2000.0, 0.0));
        assert_eq!(t.rotate, Vec3::new(-10.0, 0.0, 45.5));
        assert_eq!(t.scale, 2.0);
    }

    #[test]
    fn camel_case_rotation_aliases_are_read() {
        let mut doc = Document::new();
        let root = doc.root();
        let s = doc
            .append_spec(root, &NodeSpec::element("section").attr("data-rotateY", "30"))
            .unwrap();
        assert_eq!(TransformHints::from_element(&doc, s).rotate_y, Some(30.0));
    }

    #[test]
    fn invalid_hints_fall_back_to_defaults() {
        let mut doc = Document::new();
        let root = doc.root();
        let s = doc
            .append_spec(
                root,
                &NodeSpec::element("section")
                    .attr("data-x", "wide")
                    .attr("data-y", "")
                    .attr("data-z", "inf")
                    .attr("data-scale", "-1"),
            )
            .unwrap();
        assert!(TransformHints::from_element(&doc, s).is_empty());
    }

    #[test]
    fn subnormal_scale_is_rejected() {
        let mut doc = Document::new();
        let root = doc.root();
        let tiny = doc
            .append_spec(root, &NodeSpec::element("section").attr("data-scale", "1e-320"))
            .unwrap();
        let small = doc
            .append_spec(root, &NodeSpec::element("section").attr("data-scale", "1e-300"))
            .unwrap();
        assert_eq!(TransformHints::from_element(&doc, tiny).scale, None);
        assert_eq!(TransformHints::from_element(&doc, small).scale, Some(1e-300));
        let t = TransformHints::from_element(&doc, tiny).resolve(pos(0, 0), 0, 2000.0);
        assert_eq!(t.scale, 1.0);
    }

    #[test]
    fn plan_assigns_author_and_synthetic_ids() {
        let mut doc = Document::new();
        let root = doc.root();
        doc.append_spec(root, &NodeSpec::element("p").attr("id", "step-2"))
            .unwrap();
        for id in [None, None, Some("intro")] {
            let mut s = NodeSpec::element("section");
            if let Some(id) = id {
                s = s.attr("id", id);
            }
            doc.append_spec(root, &s).unwrap();
        }
        let outline = SectionOutline::resolve(&doc, root);
        let plan = StepPlan::new(&doc, &outline, &DeckConfig::default());
        let ids: Vec<(&str, bool)> = plan
            .steps
            .iter()
            .map(|s| (s.id.as_str(), s.author_id))
            .collect();
        assert_eq!(
            ids,
            vec![("step-1", false), ("step-2-2", false), ("intro", true)]
        );
    }

    #[test]
    fn nested_sections_stay_out_of_content() {
        let mut doc = Document::new();
        let root = doc.root();
        let outer = doc
            .append_spec(
                root,
                &NodeSpec::element("section")
                    .child(NodeSpec::text("a"))
                    .child(NodeSpec::element("section"))
                    .child(NodeSpec::element("p")),
            )
            .unwrap();
        let outline = SectionOutline::resolve(&doc, root);
        let plan = StepPlan::new(&doc, &outline, &DeckConfig::default());
        let kids = doc.children(outer);
        assert_eq!(plan.steps[0].original_children, kids.to_vec());
        assert_eq!(plan.steps[0].content, vec![kids[0], kids[2]]);
        assert!(plan.steps[1].content.is_empty());
    }
}
