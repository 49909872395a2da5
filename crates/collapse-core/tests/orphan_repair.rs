use collapse_core::{
    ClickTarget, CollapseConfig, Command, CommandExecutor, CommandResult, Document, Element,
    Marker, MemoryHost, NodeId, Point, Rect, toggle::PLACEHOLDER_TEXT,
};
use pretty_assertions::assert_eq;

fn at(level: usize, text: &str) -> Element {
    Element::paragraph(text).with_style(&format!("margin-left:{}px;", level * 40))
}

fn heading(text: &str) -> Element {
    Element::heading(2)
        .with_text(text)
        .with_marker(Marker::Collapsible)
}

fn collapsed_then_orphaned() -> (CommandExecutor<MemoryHost>, NodeId, Vec<NodeId>, NodeId) {
    let mut doc = Document::new();
    let intro = doc.push(at(0, "intro"));
    let h = doc.push(heading("Section"));
    let a = doc.push(at(1, "a"));
    let b = doc.push(at(2, "b"));
    doc.push(at(0, "after"));

    let mut executor = CommandExecutor::new(doc, CollapseConfig::default(), MemoryHost::new());
    let placeholder = match executor.execute(Command::ToggleHeading { heading: h }).unwrap() {
        CommandResult::Section(outcome) => outcome.placeholder_inserted.unwrap(),
        other => panic!("unexpected result: {other:?}"),
    };
    executor.document_mut().remove(h);
    (executor, intro, vec![a, b], placeholder)
}

#[test]
fn test_deleted_anchor_exposes_placeholder() {
    let (executor, intro, hidden, placeholder) = collapsed_then_orphaned();
    let render = executor.render_model();

    assert_eq!(executor.document().prev_sibling(placeholder), Some(intro));
    assert_eq!(render.orphaned_placeholders(), vec![placeholder]);
    assert!(render.is_rendered(placeholder));
    assert_eq!(executor.document().element(placeholder).text, PLACEHOLDER_TEXT);
    for id in hidden {
        assert!(!render.is_rendered(id));
    }
}

#[test]
fn test_repair_reveals_run_and_drops_placeholder() {
    let (mut executor, _, hidden, placeholder) = collapsed_then_orphaned();
    let saves = executor.host().save_count();

    let report = match executor.execute(Command::RepairOrphans).unwrap() {
        CommandResult::Repaired(report) => report,
        other => panic!("unexpected result: {other:?}"),
    };
    assert_eq!(report.orphans, vec![placeholder]);
    assert_eq!(report.revealed, hidden);
    assert_eq!(report.placeholders_removed, vec![placeholder]);

    let doc = executor.document();
    assert!(!doc.contains(placeholder));
    assert!(doc.iter().all(|id| !doc.element(id).has(Marker::Hidden)));
    assert_eq!(executor.render_model().rendered_nodes().len(), doc.len());
    assert_eq!(executor.host().save_count(), saves + 1);
}

#[test]
fn test_clicking_placeholder_repairs() {
    let (mut executor, _, _, placeholder) = collapsed_then_orphaned();
    let rect = Rect::new(40.0, 60.0, 300.0, 20.0);
    executor.host_mut().set_rect(placeholder, rect);

    let point = Point::new(120.0, 70.0);
    assert_eq!(
        executor.anchors().classify_click(placeholder, point, rect),
        ClickTarget::Repair(placeholder)
    );
    let result = executor.execute(Command::Click { point }).unwrap();
    assert!(matches!(result, CommandResult::Repaired(ref r) if !r.is_empty()));
    assert!(!executor.document().contains(placeholder));
}

#[test]
fn test_intact_sections_are_left_alone() {
    let mut doc = Document::new();
    let kept = doc.push(heading("Kept"));
    let kept_body = doc.push(at(1, "kept body"));
    doc.push(at(0, "between"));
    let lost = doc.push(heading("Lost"));
    let lost_body = doc.push(at(1, "lost body"));
    doc.push(at(0, "end"));

    let mut executor = CommandExecutor::new(doc, CollapseConfig::default(), MemoryHost::new());
    executor
        .execute_batch(vec![
            Command::CollapseHeading { heading: kept },
            Command::CollapseHeading { heading: lost },
        ])
        .unwrap();
    executor.document_mut().remove(lost);

    let report = match executor.execute(Command::RepairOrphans).unwrap() {
        CommandResult::Repaired(report) => report,
        other => panic!("unexpected result: {other:?}"),
    };
    assert_eq!(report.revealed, vec![lost_body]);
    assert_eq!(report.placeholders_removed.len(), 1);

    let doc = executor.document();
    assert!(doc.element(kept).has(Marker::Collapsed));
    assert!(doc.element(kept_body).has(Marker::Hidden));
    assert!(!doc.element(lost_body).has(Marker::Hidden));
}

#[test]
fn test_repair_without_orphans_does_not_save() {
    let mut doc = Document::new();
    let h = doc.push(heading("Intact"));
    doc.push(at(1, "body"));

    let mut executor = CommandExecutor::new(doc, CollapseConfig::default(), MemoryHost::new());
    executor.execute(Command::ToggleHeading { heading: h }).unwrap();
    let result = executor.execute(Command::RepairOrphans).unwrap();

    assert_eq!(result, CommandResult::Repaired(Default::default()));
    assert_eq!(executor.host().save_count(), 1);
}
