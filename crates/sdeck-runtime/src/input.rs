#![forbid(unsafe_code)]

//! Input routing: key bindings, activation targets, and fragment parsing.
//!
//! These are pure functions over the document; [`crate::Presentation`]
//! decides what to do with their answers.

use sdeck_core::event::KeyCode;
use sdeck_dom::{Document, NodeId};

/// What a key asks the presentation to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Previous,
    Next,
    ToggleMode,
}

/// Fixed key bindings.
///
/// | Keys | Action |
/// |------|--------|
/// | PageUp, Left, Up | previous |
/// | Tab, Space, PageDown, Right, Down | next |
/// | Escape | toggle mode |
#[must_use]
pub const fn action_for_key(code: KeyCode) -> Option<KeyAction> {
    match code {
        KeyCode::PageUp | KeyCode::Left | KeyCode::Up => Some(KeyAction::Previous),
        KeyCode::Tab | KeyCode::Char(' ') | KeyCode::PageDown | KeyCode::Right | KeyCode::Down => {
            Some(KeyAction::Next)
        }
        KeyCode::Escape => Some(KeyAction::ToggleMode),
        _ => None,
    }
}

/// Nearest inclusive ancestor of an activated node that can be acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationTarget {
    /// An `a` element.
    Anchor(NodeId),
    /// A step element.
    Step(NodeId),
    /// The document root; nothing closer matched.
    Root(NodeId),
}

impl ActivationTarget {
    #[must_use]
    pub const fn node(self) -> NodeId {
        match self {
            Self::Anchor(n) | Self::Step(n) | Self::Root(n) => n,
        }
    }
}

/// Walk up from `node` to the first anchor, step, or the document root.
///
/// Returns `None` for unknown or detached nodes.
pub fn resolve_activation_target(
    doc: &Document,
    node: NodeId,
    is_step: impl Fn(NodeId) -> bool,
) -> Option<ActivationTarget> {
    let root = doc.root();
    doc.ancestors(node).find_map(|n| {
        if doc.is_tag(n, "a") {
            Some(ActivationTarget::Anchor(n))
        } else if is_step(n) {
            Some(ActivationTarget::Step(n))
        } else if n == root {
            Some(ActivationTarget::Root(n))
        } else {
            None
        }
    })
}

/// Node the presentation should try to select for an activation target.
///
/// An anchor whose `href` is an in-page fragment points at the element with
/// that identifier (which may not exist). Anything else is its own target.
#[must_use]
pub fn selection_target(doc: &Document, target: ActivationTarget) -> Option<NodeId> {
    match target {
        ActivationTarget::Anchor(a) => match doc.attr(a, "href") {
            Some(href) if href.starts_with('#') => doc.element_by_id(step_id_from_fragment(href)),
            _ => Some(a),
        },
        other => Some(other.node()),
    }
}

/// Identifier named by a URL fragment: a leading `#` and then an optional
/// `/` are stripped, so `#/intro` and `#intro` both name `intro`.
#[must_use]
pub fn step_id_from_fragment(fragment: &str) -> &str {
    fragment
        .strip_prefix('#')
        .map_or(fragment, |rest| rest.strip_prefix('/').unwrap_or(rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdeck_dom::NodeSpec;

    #[test]
    fn key_table() {
        for code in [KeyCode::PageUp, KeyCode::Left, KeyCode::Up] {
            assert_eq!(action_for_key(code), Some(KeyAction::Previous));
        }
        for code in [
            KeyCode::Tab,
            KeyCode::Char(' '),
            KeyCode::PageDown,
            KeyCode::Right,
            KeyCode::Down,
        ] {
            assert_eq!(action_for_key(code), Some(KeyAction::Next));
        }
        assert_eq!(action_for_key(KeyCode::Escape), Some(KeyAction::ToggleMode));
        assert_eq!(action_for_key(KeyCode::Enter), None);
        assert_eq!(action_for_key(KeyCode::Char('x')), None);
    }

    #[test]
    fn fragment_prefixes_are_stripped() {
        assert_eq!(step_id_from_fragment("#/intro"), "intro");
        assert_eq!(step_id_from_fragment("#intro"), "intro");
        assert_eq!(step_id_from_fragment("#//x"), "/x");
        assert_eq!(step_id_from_fragment("intro"), "intro");
        assert_eq!(step_id_from_fragment("#"), "");
        assert_eq!(step_id_from_fragment(""), "");
    }

    fn page() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        let step = doc
            .append_spec(
                root,
                &NodeSpec::element("div").attr("id", "s").children([
                    NodeSpec::element("p").child(NodeSpec::text("x")),
                    NodeSpec::element("a")
                        .attr("href", "#/s")
                        .child(NodeSpec::element("span")),
                ]),
            )
            .unwrap();
        let para = doc.children(step)[0];
        let span = doc.children(doc.children(step)[1])[0];
        (doc, step, para, span)
    }

    #[test]
    fn nearest_step_wins() {
        let (doc, step, para, _) = page();
        let text = doc.children(para)[0];
        assert_eq!(
            resolve_activation_target(&doc, text, |n| n == step),
            Some(ActivationTarget::Step(step))
        );
    }

    #[test]
    fn anchor_retargets_to_fragment() {
        let (doc, step, _, span) = page();
        let target = resolve_activation_target(&doc, span, |n| n == step).unwrap();
        assert!(matches!(target, ActivationTarget::Anchor(_)));
        assert_eq!(selection_target(&doc, target), Some(step));
    }

    #[test]
    fn root_is_the_fallback() {
        let (doc, _, para, _) = page();
        let root = doc.root();
        assert_eq!(
            resolve_activation_target(&doc, para, |_| false),
            Some(ActivationTarget::Root(root))
        );
        assert_eq!(
            selection_target(&doc, ActivationTarget::Root(root)),
            Some(root)
        );
    }

    #[test]
    fn detached_nodes_resolve_to_nothing() {
        let (mut doc, _, para, _) = page();
        let orphan = doc.create_element("p");
        assert_eq!(resolve_activation_target(&doc, orphan, |_| false), None);
        doc.detach(para).unwrap();
        assert_eq!(resolve_activation_target(&doc, para, |_| false), None);
    }

    #[test]
    fn external_anchor_targets_itself() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc
            .append_spec(root, &NodeSpec::element("a").attr("href", "https://example.org"))
            .unwrap();
        assert_eq!(
            selection_target(&doc, ActivationTarget::Anchor(a)),
            Some(a)
        );
    }
}
