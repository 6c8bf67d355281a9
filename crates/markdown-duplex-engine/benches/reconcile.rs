use criterion::{Criterion, criterion_group, criterion_main};
use markdown_duplex_engine::editing::{
    Cmd, DisplayMode, Document, MarkupRule, NodeId, StyleFlags, create_delimited_span,
};

fn raw_span_doc() -> (Document, NodeId) {
    let mut doc = Document::new();
    doc.push_text("hello ");
    let span = doc.push_span(create_delimited_span(
        "**bold**",
        MarkupRule::from_tag("**", StyleFlags::BOLD),
    ));
    doc.push_text(" world");
    doc.apply(Cmd::ApplyModeChange {
        id: span,
        mode: DisplayMode::Raw,
    })
    .unwrap();
    (doc, span)
}

fn bench_reconcile_outcomes(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");

    let cases = [
        ("resync", "**strong**"),
        ("split_before", "X**bold**"),
        ("split_after", "**bold**Y"),
        ("dissolve", "no markup left"),
    ];

    for (name, text) in cases {
        let (doc, span) = raw_span_doc();
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut d = doc.clone();
                let patch = d.apply(Cmd::ReplaceText {
                    id: span,
                    text: std::hint::black_box(text.to_string()),
                });
                std::hint::black_box(patch)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_reconcile_outcomes);
criterion_main!(benches);
