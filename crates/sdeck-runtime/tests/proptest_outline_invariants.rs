//! Property tests: depth definition, grid walk, cyclic navigation, and
//! document restoration across mode toggles.

use proptest::prelude::*;
use sdeck_core::event::{Event, KeyCode, KeyEvent};
use sdeck_dom::{Document, NodeId, NodeSpec};
use sdeck_runtime::{
    GridPosition, NavigationIndex, Presentation, SectionOutline, build_steps, grid_positions,
};
use sdeck_runtime::config::DeckConfig;
use sdeck_web::WebBackend;

/// Random nesting of sections and plain wrappers.
fn tree_strategy() -> impl Strategy<Value = NodeSpec> {
    let leaf = prop_oneof![
        Just(NodeSpec::element("section")),
        Just(NodeSpec::element("p").child(NodeSpec::text("x"))),
        Just(NodeSpec::text("t")),
    ];
    leaf.prop_recursive(4, 40, 4, |inner| {
        (
            prop_oneof![Just("section"), Just("div")],
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(tag, kids)| NodeSpec::element(tag).children(kids))
    })
}

fn deck_strategy() -> impl Strategy<Value = NodeSpec> {
    prop::collection::vec(tree_strategy(), 0..5)
        .prop_map(|kids| NodeSpec::element("div").children(kids))
}

fn load(spec: &NodeSpec) -> (Document, NodeId) {
    let mut doc = Document::new();
    let root = doc.root();
    let deck = doc.append_spec(root, spec).unwrap();
    (doc, deck)
}

/// Sections below `node` with no other section in between.
fn child_sections(doc: &Document, node: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    for &c in doc.children(node) {
        if doc.is_tag(c, "section") {
            out.push(c);
        } else {
            out.extend(child_sections(doc, c));
        }
    }
    out
}

fn reference_depth(doc: &Document, section: NodeId) -> u32 {
    child_sections(doc, section)
        .into_iter()
        .map(|c| reference_depth(doc, c))
        .min()
        .map_or(0, |d| d + 1)
}

proptest! {
    #[test]
    fn depth_matches_recursive_definition(spec in deck_strategy()) {
        let (doc, deck) = load(&spec);
        let outline = SectionOutline::resolve(&doc, deck);
        for info in outline.iter() {
            prop_assert_eq!(info.depth, reference_depth(&doc, info.node));
            prop_assert_eq!(info.is_leaf(), child_sections(&doc, info.node).is_empty());
        }
    }

    #[test]
    fn grid_walk_moves_by_the_depth_rule(depths in prop::collection::vec(0u32..4, 0..24)) {
        let positions = grid_positions(&depths);
        prop_assert_eq!(positions.len(), depths.len());
        if let Some(first) = positions.first() {
            prop_assert_eq!(*first, GridPosition::new(0, 0));
        }
        for i in 1..depths.len() {
            let (prev, cur) = (positions[i - 1], positions[i]);
            let expected = if depths[i] == depths[i - 1] {
                GridPosition::new(prev.x, prev.y + 1)
            } else if depths[i] > depths[i - 1] {
                GridPosition::new(prev.x + 1, prev.y)
            } else {
                prev
            };
            prop_assert_eq!(cur, expected);
        }
    }

    #[test]
    fn step_ids_are_unique_and_steps_scale_positively(spec in deck_strategy()) {
        let (mut doc, deck) = load(&spec);
        let steps = build_steps(&mut doc, deck, &DeckConfig::default()).unwrap();
        let mut ids: Vec<&str> = steps.iter().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), steps.len());
        for s in &steps {
            prop_assert!(s.transform.scale > 0.0);
            prop_assert_eq!(doc.children(s.section).first().copied(), Some(s.element));
        }
    }

    #[test]
    fn next_n_times_returns_to_start(n in 1usize..12, start_offset in 0usize..12) {
        let mut doc = Document::new();
        let root = doc.root();
        for _ in 0..n {
            doc.append_spec(root, &NodeSpec::element("section")).unwrap();
        }
        let index = NavigationIndex::new(build_steps(&mut doc, root, &DeckConfig::default()).unwrap());
        let start = start_offset % n;
        let mut cur = Some(start);
        for _ in 0..n {
            cur = index.next_index(cur);
        }
        prop_assert_eq!(cur, Some(start));
        for _ in 0..n {
            cur = index.previous_index(cur);
        }
        prop_assert_eq!(cur, Some(start));
    }

    #[test]
    fn toggle_round_trip_restores_markup(spec in deck_strategy(), presses in 0usize..6) {
        let (doc, deck) = load(&spec);
        let mut p = Presentation::new(WebBackend::new(), doc, deck).unwrap();
        let root = p.document().root();
        let before = p.document().outer_markup(root);

        p.toggle_mode().unwrap();
        for _ in 0..presses {
            p.handle_event(&Event::Key(KeyEvent::new(KeyCode::Right))).unwrap();
        }
        p.toggle_mode().unwrap();
        prop_assert_eq!(p.document().outer_markup(root), before.clone());

        // Twice more, to catch state leaking between sessions.
        p.toggle_mode().unwrap();
        p.toggle_mode().unwrap();
        prop_assert_eq!(p.document().outer_markup(root), before);
    }

    #[test]
    fn exactly_one_active_step_while_presenting(spec in deck_strategy(), moves in prop::collection::vec(any::<bool>(), 0..10)) {
        let (doc, deck) = load(&spec);
        let mut p = Presentation::new(WebBackend::new(), doc, deck).unwrap();
        p.activate().unwrap();
        for forward in moves {
            if forward { p.select_next().unwrap(); } else { p.select_previous().unwrap(); }
            let active = p
                .steps()
                .iter()
                .filter(|s| p.document().has_class(s.element, sdeck_runtime::ACTIVE_CLASS))
                .count();
            prop_assert_eq!(active, usize::from(!p.steps().is_empty()));
        }
    }
}
