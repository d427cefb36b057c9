#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sdeck_dom::{Document, NodeSpec};
use sdeck_runtime::Presentation;
use sdeck_web::WebBackend;

#[derive(Debug, Arbitrary)]
struct FuzzNode {
    section: bool,
    id: Option<u8>,
    hint: Option<(u8, String)>,
    children: Vec<FuzzNode>,
}

const HINTS: [&str; 6] = [
    "data-x",
    "data-y",
    "data-z",
    "data-rotate",
    "data-scale",
    "data-rotate-y",
];

fn to_spec(node: &FuzzNode, depth: usize) -> NodeSpec {
    let mut spec = NodeSpec::element(if node.section { "section" } else { "div" });
    if let Some(id) = node.id {
        // Collide with synthesized ids on purpose.
        spec = spec.attr("id", format!("step-{}", id % 8));
    }
    if let Some((which, value)) = &node.hint {
        spec = spec.attr(HINTS[usize::from(*which) % HINTS.len()], value.clone());
    }
    if depth < 6 {
        spec = spec.children(node.children.iter().take(6).map(|c| to_spec(c, depth + 1)));
    }
    spec
}

fuzz_target!(|root: FuzzNode| {
    let mut doc = Document::new();
    let doc_root = doc.root();
    let Ok(container) = doc.append_spec(doc_root, &to_spec(&root, 0)) else {
        return;
    };
    let Ok(mut deck) = Presentation::new(WebBackend::new(), doc, container) else {
        return;
    };
    let before = deck.document().outer_markup(doc_root);

    if deck.activate().is_err() {
        return;
    }
    let mut seen = std::collections::BTreeSet::new();
    for step in deck.steps() {
        // Author ids may repeat; synthesized ones never collide with anything.
        if !step.author_id {
            assert!(seen.insert(step.id.clone()), "duplicate step id {}", step.id);
        }
        assert!(step.transform.scale > 0.0, "non-positive scale");
    }
    for _ in 0..deck.steps().len() {
        let _ = deck.select_next();
    }

    let _ = deck.deactivate();
    assert_eq!(
        deck.document().outer_markup(doc_root),
        before,
        "teardown did not restore the document"
    );
});
