use collapse_core::{CollapseConfig, Document, Element, NodeId, SectionWalker, WalkMode};
use pretty_assertions::assert_eq;

fn config(treat_lists_as_indented: bool) -> CollapseConfig {
    CollapseConfig {
        treat_lists_as_indented,
        ..CollapseConfig::default()
    }
}

/// A list with one item whose first child is `bullet`.
fn push_list(doc: &mut Document, bullet: Element) -> (NodeId, NodeId) {
    let list = doc.push(Element::list(false));
    let li = doc.append_child(list, Element::list_item());
    let first = doc.append_child(li, bullet);
    (list, first)
}

#[test]
fn test_same_level_list_joins_heading_section() {
    let mut doc = Document::new();
    let h = doc.push(Element::heading(2).with_style("margin-left:0px;"));
    let (_, item) = push_list(&mut doc, Element::paragraph("item"));
    doc.push(Element::paragraph("next").with_style("margin-left:0px;"));

    let walker = SectionWalker::new(&config(true));
    assert_eq!(
        walker.compute_section(&doc, h, 0, WalkMode::Collapsing),
        vec![item]
    );

    let walker = SectionWalker::new(&config(false));
    assert!(walker.compute_section(&doc, h, 0, WalkMode::Collapsing).is_empty());
}

#[test]
fn test_indented_heading_takes_lists_at_its_own_level() {
    let mut doc = Document::new();
    let h = doc.push(Element::heading(3).with_style("margin-left:40px;"));
    let (_, item) = push_list(
        &mut doc,
        Element::paragraph("item").with_style("margin-left:40px;"),
    );

    let walker = SectionWalker::new(&config(true));
    assert_eq!(
        walker.compute_section(&doc, h, 1, WalkMode::Collapsing),
        vec![item]
    );
    let walker = SectionWalker::new(&config(false));
    assert!(walker.compute_section(&doc, h, 1, WalkMode::Collapsing).is_empty());
}

#[test]
fn test_shallower_list_ends_section() {
    let mut doc = Document::new();
    let h = doc.push(Element::heading(3).with_style("margin-left:40px;"));
    let a = doc.push(Element::paragraph("a").with_style("margin-left:80px;"));
    push_list(&mut doc, Element::paragraph("top level"));

    let walker = SectionWalker::new(&config(true));
    assert_eq!(walker.compute_section(&doc, h, 1, WalkMode::Collapsing), vec![a]);
}

#[test]
fn test_empty_first_bullet_ends_collapse_only() {
    let mut doc = Document::new();
    let h = doc.push(Element::heading(2));
    let a = doc.push(Element::paragraph("a").with_style("margin-left:40px;"));
    push_list(&mut doc, Element::span(" "));
    let b = doc.push(Element::paragraph("b").with_style("margin-left:40px;"));

    let walker = SectionWalker::new(&config(true));
    assert_eq!(walker.compute_section(&doc, h, 0, WalkMode::Collapsing), vec![a]);
    assert_eq!(
        walker.compute_section(&doc, h, 0, WalkMode::Expanding),
        vec![a, b]
    );
}

#[test]
fn test_span_bullet_contributes_its_children() {
    let mut doc = Document::new();
    let h = doc.push(Element::heading(2));
    let (_, span) = push_list(&mut doc, Element::span(""));
    let x = doc.append_child(span, Element::span("x"));
    let y = doc.append_child(span, Element::span("y"));

    let walker = SectionWalker::new(&config(true));
    assert_eq!(
        walker.compute_section(&doc, h, 0, WalkMode::Collapsing),
        vec![x, y]
    );
}
