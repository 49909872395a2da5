use collapse_core::{
    CollapseConfig, Document, Element, Marker, RenderModel, SectionWalker, UnhandledKind,
    VisibilityToggle, WalkMode,
};
use pretty_assertions::assert_eq;

fn at(level: usize, text: &str) -> Element {
    Element::paragraph(text).with_style(&format!("margin-left:{}px;", level * 40))
}

#[test]
fn test_expanding_guard_keeps_nested_section_hidden() {
    let mut doc = Document::new();
    let outer = doc.push(Element::heading(2).with_text("outer").with_marker(Marker::Collapsible));
    let inner = doc.push(
        Element::heading(3)
            .with_text("inner")
            .with_style("margin-left:40px;")
            .with_marker(Marker::Collapsible),
    );
    let a = doc.push(at(2, "a"));
    let img = doc.push(Element::image());
    let hr = doc.push(Element::unhandled(UnhandledKind::HorizontalLine));
    let b = doc.push(at(2, "b"));
    let c = doc.push(at(1, "c"));
    let end = doc.push(at(0, "end"));

    let config = CollapseConfig::default();
    let toggle = VisibilityToggle::new(&config);

    let inner_outcome = toggle.collapse_section(&mut doc, inner);
    assert_eq!(inner_outcome.members, vec![a, img, b]);
    let inner_placeholder = inner_outcome.placeholder_inserted.unwrap();

    // The walk reaches the image again, but it is already hidden and is not reported.
    let walker = SectionWalker::new(&config);
    assert_eq!(
        walker.compute_section(&doc, outer, 0, WalkMode::Collapsing),
        vec![inner, img, c]
    );
    let outer_outcome = toggle.collapse_section(&mut doc, outer);
    assert_eq!(outer_outcome.members, vec![inner, c]);
    let outer_placeholder = outer_outcome.placeholder_inserted.unwrap();

    assert_eq!(
        walker.compute_section(&doc, outer, 0, WalkMode::Expanding),
        vec![outer_placeholder, inner, c]
    );

    toggle.expand_section(&mut doc, outer);
    for id in [inner_placeholder, a, img, b] {
        assert!(doc.element(id).has(Marker::Hidden), "{id:?} should stay hidden");
    }

    let render = RenderModel::new(&doc, &config);
    assert!(!render.is_rendered(hr));
    assert_eq!(render.rendered_nodes(), vec![outer, inner, c, end]);
}

#[test]
fn test_walk_passes_over_hidden_members_when_collapsing() {
    let mut doc = Document::new();
    let h = doc.push(Element::heading(2));
    let a = doc.push(at(1, "a"));
    let b = doc.push(at(1, "b").with_marker(Marker::Hidden));
    let c = doc.push(at(2, "c"));

    let walker = SectionWalker::new(&CollapseConfig::default());
    assert_eq!(
        walker.compute_section(&doc, h, 0, WalkMode::Collapsing),
        vec![a, c]
    );
    assert_eq!(
        walker.compute_section(&doc, h, 0, WalkMode::Expanding),
        vec![a, b, c]
    );
}

#[test]
fn test_threshold_follows_anchor_indentation() {
    let mut doc = Document::new();
    let h = doc.push(Element::heading(3).with_style("margin-left:80px;"));
    let deep = doc.push(at(3, "deep"));
    doc.push(at(2, "sibling"));

    let walker = SectionWalker::new(&CollapseConfig::default());
    let threshold = walker.codec().indent_level(doc.element(h));
    assert_eq!(threshold, 2);
    assert_eq!(
        walker.compute_section(&doc, h, threshold, WalkMode::Collapsing),
        vec![deep]
    );
}

#[test]
fn test_levels_beyond_supported_range_end_the_section() {
    let mut doc = Document::new();
    let h = doc.push(Element::heading(2));
    let a = doc.push(at(1, "a"));
    doc.push(at(4, "too deep"));

    let config = CollapseConfig {
        supported_indent_levels: 3,
        ..CollapseConfig::default()
    };
    let walker = SectionWalker::new(&config);
    assert_eq!(walker.compute_section(&doc, h, 0, WalkMode::Collapsing), vec![a]);
}

#[test]
fn test_custom_indent_step() {
    let mut doc = Document::new();
    let h = doc.push(Element::heading(2));
    let a = doc.push(Element::paragraph("a").with_style("margin-left:24px;"));
    doc.push(Element::paragraph("b").with_style("margin-left:40px;"));

    let config = CollapseConfig {
        indent_step_px: 24,
        ..CollapseConfig::default()
    };
    let walker = SectionWalker::new(&config);
    assert_eq!(walker.compute_section(&doc, h, 0, WalkMode::Collapsing), vec![a]);
}
