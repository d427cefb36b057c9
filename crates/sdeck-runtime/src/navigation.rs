#![forbid(unsafe_code)]

//! Ordered step list with cyclic next/previous.

use std::collections::BTreeMap;

use sdeck_dom::NodeId;

use crate::builder::Step;

/// Steps in document order, indexed by element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigationIndex {
    steps: Vec<Step>,
    by_element: BTreeMap<NodeId, usize>,
}

impl NavigationIndex {
    /// Index the given steps, keeping their order.
    #[must_use]
    pub fn new(steps: Vec<Step>) -> Self {
        let by_element = steps
            .iter()
            .enumerate()
            .map(|(i, s)| (s.element, i))
            .collect();
        Self { steps, by_element }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Position of a step element.
    #[must_use]
    pub fn index_of(&self, element: NodeId) -> Option<usize> {
        self.by_element.get(&element).copied()
    }

    /// Position of the step with identifier `id`.
    #[must_use]
    pub fn index_of_id(&self, id: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.id == id)
    }

    /// True when `element` is a step element.
    #[must_use]
    pub fn is_step(&self, element: NodeId) -> bool {
        self.by_element.contains_key(&element)
    }

    /// Successor of `active`, wrapping to the first. No active step means the first.
    #[must_use]
    pub fn next_index(&self, active: Option<usize>) -> Option<usize> {
        let len = self.steps.len();
        if len == 0 {
            return None;
        }
        Some(active.map_or(0, |i| (i + 1) % len))
    }

    /// Predecessor of `active`, wrapping to the last. No active step means the last.
    #[must_use]
    pub fn previous_index(&self, active: Option<usize>) -> Option<usize> {
        let len = self.steps.len();
        if len == 0 {
            return None;
        }
        Some(match active {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        })
    }

    /// Consume the index, returning the steps.
    #[must_use]
    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }
}
