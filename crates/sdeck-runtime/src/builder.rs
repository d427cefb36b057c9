#![forbid(unsafe_code)]

//! Mutation pass of step building, and its inverse.
//!
//! [`build_steps`] wraps each section's own content in a `div.step` placed
//! at the section's transform; [`teardown_steps`] puts every moved node back
//! where it was.

use sdeck_core::geometry::{Transform3d, step_placement};
use sdeck_dom::{Document, DomError, NodeId};

use crate::config::DeckConfig;
use crate::depth::SectionOutline;
use crate::plan::{GridPosition, PlannedStep, StepPlan};

/// Class carried by every step element.
pub const STEP_CLASS: &str = "step";

/// A built step.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// The wrapper element that the camera targets.
    pub element: NodeId,
    /// The section it was built from.
    pub section: NodeId,
    /// Identifier, unique among steps.
    pub id: String,
    /// True when the identifier was moved over from the section.
    pub author_id: bool,
    pub depth: u32,
    pub position: GridPosition,
    pub transform: Transform3d,
    original_children: Vec<NodeId>,
}

/// Resolve depths, plan, and build every step under `root`.
pub fn build_steps(
    doc: &mut Document,
    root: NodeId,
    config: &DeckConfig,
) -> Result<Vec<Step>, DomError> {
    let outline = SectionOutline::resolve(doc, root);
    let plan = StepPlan::new(doc, &outline, config);
    apply_plan(doc, plan)
}

/// Apply a plan computed against the current document.
pub fn apply_plan(doc: &mut Document, plan: StepPlan) -> Result<Vec<Step>, DomError> {
    let mut steps = Vec::with_capacity(plan.len());
    for planned in plan.steps {
        steps.push(apply_step(doc, planned)?);
    }
    tracing::debug!(target: "sdeck.build", steps = steps.len(), "built steps");
    Ok(steps)
}

fn apply_step(doc: &mut Document, planned: PlannedStep) -> Result<Step, DomError> {
    let PlannedStep {
        section,
        depth,
        position,
        transform,
        id,
        author_id,
        content,
        original_children,
    } = planned;

    let element = doc.create_element("div");
    doc.set_attr(element, "class", STEP_CLASS)?;
    if author_id {
        doc.remove_attr(section, "id")?;
    }
    doc.set_attr(element, "id", id.as_str())?;
    for child in content {
        doc.append_child(element, child)?;
    }
    let first = doc.children(section).first().copied();
    doc.insert_before(section, element, first)?;
    doc.set_styles(
        element,
        [
            ("position", "absolute".to_owned()),
            ("transform", step_placement(&transform)),
            ("transform-style", "preserve-3d".to_owned()),
        ],
    )?;

    tracing::trace!(
        target: "sdeck.build",
        id = %id,
        depth,
        x = position.x,
        y = position.y,
        "step placed"
    );
    Ok(Step {
        element,
        section,
        id,
        author_id,
        depth,
        position,
        transform,
        original_children,
    })
}

/// Undo [`build_steps`]: restore each section's original children in their
/// original order, give back author identifiers, and free the wrappers.
pub fn teardown_steps(doc: &mut Document, steps: &[Step]) -> Result<(), DomError> {
    for step in steps.iter().rev() {
        doc.detach(step.element)?;
        for &child in &step.original_children {
            doc.append_child(step.section, child)?;
        }
        // Nodes added to the wrapper while presenting are kept, after the rest.
        let leftovers = doc.children(step.element).to_vec();
        for child in leftovers {
            doc.append_child(step.section, child)?;
        }
        if step.author_id {
            doc.set_attr(step.section, "id", step.id.as_str())?;
        }
        doc.remove(step.element)?;
    }
    tracing::debug!(target: "sdeck.build", steps = steps.len(), "steps torn down");
    Ok(())
}
