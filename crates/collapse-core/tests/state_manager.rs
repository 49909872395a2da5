use collapse_core::{
    CollapseConfig, CollapseStateManager, Command, Document, Element, Marker, MemoryHost, NodeId,
    StateChangeType,
};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

fn manager() -> (CollapseStateManager<MemoryHost>, NodeId, NodeId) {
    let mut doc = Document::new();
    let heading = doc.push(
        Element::heading(2)
            .with_text("Notes")
            .with_marker(Marker::Collapsible),
    );
    doc.push(Element::paragraph("first").with_style("margin-left:40px;"));
    doc.push(Element::paragraph("second").with_style("margin-left:80px;"));
    let list = doc.push(Element::list(false));
    let li = doc.append_child(list, Element::list_item());
    let bullet = doc.append_child(li, Element::paragraph(""));
    (
        CollapseStateManager::new(doc, CollapseConfig::default(), MemoryHost::new()),
        heading,
        bullet,
    )
}

#[test]
fn test_version_tracks_effective_changes() {
    let (mut manager, heading, _) = manager();
    assert_eq!(manager.version(), 0);

    manager.execute(Command::ToggleHeading { heading }).unwrap();
    assert_eq!(manager.version(), 1);
    assert!(manager.has_changed_since(0));
    assert!(!manager.has_changed_since(1));

    // Nothing to repair, nothing recorded.
    manager.execute(Command::RepairOrphans).unwrap();
    assert_eq!(manager.version(), 1);
}

#[test]
fn test_document_state_summary() {
    let (mut manager, heading, _) = manager();
    let state = manager.get_document_state();
    assert_eq!(state.element_count, 6);
    assert_eq!(state.collapsed_headings, 0);
    assert_eq!(state.hidden_elements, 0);
    assert!(!state.is_modified);

    manager.execute(Command::ToggleHeading { heading }).unwrap();
    let state = manager.get_document_state();
    assert_eq!(state.element_count, 7);
    assert_eq!(state.collapsed_headings, 1);
    // Two paragraphs, the list representative and the placeholder.
    assert_eq!(state.hidden_elements, 4);
    assert_eq!(state.orphaned_placeholders, 0);
    assert!(state.is_modified);

    manager.mark_saved();
    assert!(!manager.get_document_state().is_modified);
}

#[test]
fn test_subscribers_receive_changes() {
    let (mut manager, heading, _) = manager();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    manager.subscribe(move |change| {
        sink.lock()
            .unwrap()
            .push((change.change_type, change.old_version, change.new_version));
    });

    manager.execute(Command::ToggleHeading { heading }).unwrap();
    manager
        .execute(Command::ToggleCollapsibilityAt { heading })
        .unwrap();
    manager.mark_modified(StateChangeType::DocumentModified);

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            (StateChangeType::SectionToggled, 0, 1),
            (StateChangeType::CollapsibilityChanged, 1, 2),
            (StateChangeType::DocumentModified, 2, 3),
        ]
    );
    assert_eq!(manager.get_document_state().collapsed_headings, 0);
    assert_eq!(manager.get_document_state().hidden_elements, 0);
}

#[test]
fn test_affected_nodes_are_reported() {
    let (mut manager, heading, _) = manager();
    let affected = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&affected);
    manager.subscribe(move |change| sink.lock().unwrap().extend(change.affected.clone()));

    manager.execute(Command::ToggleHeading { heading }).unwrap();
    // Three members plus the placeholder.
    assert_eq!(affected.lock().unwrap().len(), 4);
}

#[test]
fn test_replace_document_is_not_a_modification() {
    let (mut manager, _, _) = manager();
    manager.replace_document(Document::new());
    let state = manager.get_document_state();
    assert_eq!(state.version, 1);
    assert_eq!(state.element_count, 0);
    assert!(!state.is_modified);
}

#[test]
fn test_failed_command_changes_nothing() {
    let (mut manager, _, bullet) = manager();
    assert!(manager.execute(Command::ToggleBullet { bullet }).is_err());
    assert_eq!(manager.version(), 0);
    assert_eq!(manager.executor().get_command_history().len(), 1);
}
