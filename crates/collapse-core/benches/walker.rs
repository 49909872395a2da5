use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use collapse_core::{
    CollapseConfig, Command, CommandExecutor, Document, Element, Marker, MemoryHost, NodeId,
    SectionWalker, WalkMode,
};

/// `sections` collapsible headings, each followed by `body` indented paragraphs and a list.
fn large_document(sections: usize, body: usize) -> (Document, Vec<NodeId>) {
    let mut doc = Document::new();
    let mut headings = Vec::with_capacity(sections);
    for s in 0..sections {
        headings.push(doc.push(
            Element::heading(2)
                .with_text(format!("Section {s}"))
                .with_marker(Marker::Collapsible),
        ));
        for i in 0..body {
            let level = 1 + i % 3;
            doc.push(
                Element::paragraph(format!("{s:05}/{i:03} the quick brown fox jumps"))
                    .with_style(&format!("margin-left:{}px;", level * 40)),
            );
        }
        let list = doc.push(Element::list(false));
        for i in 0..4 {
            let li = doc.append_child(list, Element::list_item());
            doc.append_child(
                li,
                Element::paragraph(format!("item {i}")).with_style("margin-left:40px;"),
            );
        }
    }
    (doc, headings)
}

fn bench_compute_section(c: &mut Criterion) {
    let (doc, headings) = large_document(2_000, 50);
    let walker = SectionWalker::new(&CollapseConfig::default());
    let middle = headings[headings.len() / 2];

    c.bench_function("compute_section/50_members", |b| {
        b.iter(|| {
            let members = walker.compute_section(&doc, black_box(middle), 0, WalkMode::Collapsing);
            black_box(members.len());
        })
    });
}

fn bench_collapse_all(c: &mut Criterion) {
    let (doc, headings) = large_document(500, 20);
    c.bench_function("collapse_all/500_sections", |b| {
        b.iter_batched(
            || CommandExecutor::new(doc.clone(), CollapseConfig::default(), MemoryHost::new()),
            |mut executor| {
                for heading in &headings {
                    executor
                        .execute(Command::CollapseHeading { heading: *heading })
                        .unwrap();
                }
                black_box(executor.document().len());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_rendered_nodes(c: &mut Criterion) {
    let (doc, headings) = large_document(1_000, 20);
    let mut executor = CommandExecutor::new(doc, CollapseConfig::default(), MemoryHost::new());
    for heading in headings.iter().step_by(2) {
        executor
            .execute(Command::CollapseHeading { heading: *heading })
            .unwrap();
    }

    c.bench_function("rendered_nodes/1k_sections", |b| {
        b.iter(|| {
            black_box(executor.render_model().rendered_nodes().len());
        })
    });
}

criterion_group!(
    benches,
    bench_compute_section,
    bench_collapse_all,
    bench_rendered_nodes
);
criterion_main!(benches);
