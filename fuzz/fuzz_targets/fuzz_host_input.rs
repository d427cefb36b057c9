#![no_main]

use libfuzzer_sys::fuzz_target;
use sdeck_dom::{Document, NodeSpec};
use sdeck_runtime::Presentation;
use sdeck_web::WebBackend;
use sdeck_web::input_parser::parse_encoded_input_to_event;

fn deck() -> NodeSpec {
    NodeSpec::element("div").children([
        NodeSpec::element("section").attr("id", "a"),
        NodeSpec::element("section").children([
            NodeSpec::element("a").attr("href", "#/a"),
            NodeSpec::element("section").attr("data-scale", "3"),
        ]),
        NodeSpec::element("section").attr("data-rotate", "45"),
    ])
}

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let mut doc = Document::new();
    let root = doc.root();
    let Ok(container) = doc.append_spec(root, &deck()) else {
        return;
    };
    let Ok(mut deck) = Presentation::new(WebBackend::new(), doc, container) else {
        return;
    };

    // One JSON message per line; malformed lines must be rejected cleanly.
    for line in text.lines().take(256) {
        let Ok(Some(event)) = parse_encoded_input_to_event(line) else {
            continue;
        };
        let _ = deck.handle_event(&event);

        // Post-conditions that must always hold:
        if deck.is_active() {
            assert_eq!(deck.steps().len(), 4, "step count changed mid-session");
            assert!(deck.active_index().is_some(), "session without an active step");
        } else {
            assert!(deck.steps().is_empty(), "steps outlived the session");
            assert!(deck.pending_fragment().is_none(), "fragment write outlived the session");
        }
    }
});
