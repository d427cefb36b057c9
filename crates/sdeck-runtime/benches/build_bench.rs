//! Benchmarks for step building and teardown.
//!
//! Run with: cargo bench -p sdeck-runtime --bench build_bench

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sdeck_dom::{Document, NodeId, NodeSpec};
use sdeck_runtime::config::DeckConfig;
use sdeck_runtime::{SectionOutline, build_steps, teardown_steps};
use std::hint::black_box;

/// `chapters` top-level sections, each holding `per_chapter` leaf sections.
fn deck(chapters: usize, per_chapter: usize) -> (Document, NodeId) {
    let mut doc = Document::new();
    let root = doc.root();
    let spec = NodeSpec::element("div").children((0..chapters).map(|c| {
        NodeSpec::element("section")
            .child(NodeSpec::element("h2").child(NodeSpec::text(format!("Chapter {c}"))))
            .children((0..per_chapter).map(|i| {
                NodeSpec::element("section")
                    .attr("data-rotate", format!("{}", i * 15))
                    .child(NodeSpec::element("p").child(NodeSpec::text("body")))
            }))
    }));
    let node = doc.append_spec(root, &spec).expect("deck");
    (doc, node)
}

fn bench_outline(c: &mut Criterion) {
    let mut group = c.benchmark_group("outline/resolve");
    for &(chapters, per) in &[(4, 4), (16, 8), (64, 16)] {
        let (doc, root) = deck(chapters, per);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{chapters}x{per}")),
            &(),
            |b, _| b.iter(|| black_box(SectionOutline::resolve(&doc, root))),
        );
    }
    group.finish();
}

fn bench_build_teardown(c: &mut Criterion) {
    let mut group = c.benchmark_group("steps/build_teardown");
    let config = DeckConfig::default();
    for &(chapters, per) in &[(4, 4), (16, 8), (64, 16)] {
        let (mut doc, root) = deck(chapters, per);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{chapters}x{per}")),
            &(),
            |b, _| {
                b.iter(|| {
                    let steps = build_steps(&mut doc, root, &config).expect("build");
                    teardown_steps(&mut doc, &steps).expect("teardown");
                    black_box(doc.take_changes())
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_outline, bench_build_teardown);
criterion_main!(benches);
