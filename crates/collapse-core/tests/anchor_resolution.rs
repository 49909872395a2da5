use collapse_core::{
    AnchorResolver, BulletAction, ClickTarget, CollapseConfig, Command, CommandExecutor,
    CommandResult, DocPosition, Document, Element, Host, Marker, MemoryHost, NodeId, Point, Rect,
};

#[test]
fn test_click_on_inline_span_resolves_to_heading() {
    let mut doc = Document::new();
    let h = doc.push(Element::heading(2).with_marker(Marker::Collapsible));
    doc.append_child(h, Element::span("Big "));
    let title = doc.append_child(h, Element::span("Title"));
    doc.push(Element::paragraph("body").with_style("margin-left:40px;"));

    let mut host = MemoryHost::new();
    host.set_rect(h, Rect::new(0.0, 0.0, 300.0, 30.0));
    host.set_rect(title, Rect::new(2.0, 0.0, 60.0, 30.0));
    let mut executor = CommandExecutor::new(doc, CollapseConfig::default(), host);

    let result = executor
        .execute(Command::Click {
            point: Point::new(5.0, 10.0),
        })
        .unwrap();
    assert!(matches!(result, CommandResult::Section(ref o) if o.collapsed));
    assert_eq!(executor.host().cursor(), Some(DocPosition::new(title, 5)));
}

#[test]
fn test_heading_hit_zone_is_left_edge_only() {
    let mut doc = Document::new();
    let h = doc.push(Element::heading(3).with_marker(Marker::Collapsible));
    let config = CollapseConfig::default();
    let anchors = AnchorResolver::new(&doc, &config);
    let rect = Rect::new(100.0, 50.0, 400.0, 24.0);

    assert_eq!(
        anchors.classify_click(h, Point::new(104.0, 60.0), rect),
        ClickTarget::Heading(h)
    );
    assert_eq!(
        anchors.classify_click(h, Point::new(120.0, 60.0), rect),
        ClickTarget::None
    );
}

#[test]
fn test_heading_anchor_rules() {
    let mut doc = Document::new();
    let plain = doc.push(Element::heading(3));
    let title = doc.push(Element::heading(1).with_marker(Marker::Collapsible));
    let list = doc.push(Element::list(false));
    let li = doc.append_child(list, Element::list_item());
    let nested = doc.append_child(li, Element::heading(2).with_marker(Marker::Collapsible));

    let config = CollapseConfig::default();
    let anchors = AnchorResolver::new(&doc, &config);
    assert!(!anchors.is_heading_anchor(plain));
    assert!(!anchors.is_heading_anchor(title));
    assert!(!anchors.is_heading_anchor(nested));

    let config = CollapseConfig {
        all_headings_collapsible: true,
        ..CollapseConfig::default()
    };
    let anchors = AnchorResolver::new(&doc, &config);
    assert!(anchors.is_heading_anchor(plain));
    assert!(!anchors.is_heading_anchor(title));
}

fn nested_list(ordered: bool) -> (Document, NodeId, NodeId) {
    let mut doc = Document::new();
    let list = doc.push(Element::list(ordered));
    let li = doc.append_child(list, Element::list_item());
    let bullet = doc.append_child(li, Element::paragraph("parent"));
    let sub = doc.append_child(li, Element::list(false));
    let sub_li = doc.append_child(sub, Element::list_item());
    let child = doc.append_child(sub_li, Element::paragraph("child"));
    (doc, bullet, child)
}

#[test]
fn test_bullet_click_folds_sublist() {
    let (doc, bullet, child) = nested_list(false);
    let mut host = MemoryHost::new();
    host.set_rect(bullet, Rect::new(20.0, 100.0, 200.0, 24.0));
    let mut executor = CommandExecutor::new(doc, CollapseConfig::default(), host);

    // Above the bullet glyph.
    let result = executor
        .execute(Command::Click {
            point: Point::new(25.0, 103.0),
        })
        .unwrap();
    assert_eq!(result, CommandResult::Ignored);

    let result = executor
        .execute(Command::Click {
            point: Point::new(25.0, 110.0),
        })
        .unwrap();
    match result {
        CommandResult::Bullet(outcome) => {
            assert_eq!(outcome.action, BulletAction::ToggledBullet);
            assert_eq!(outcome.changed, vec![bullet]);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(executor.document().element(bullet).has(Marker::ListCollapsed));
    assert!(!executor.render_model().is_rendered(child));
    assert!(executor.render_model().is_rendered(bullet));

    executor.execute(Command::ToggleBullet { bullet }).unwrap();
    assert!(executor.render_model().is_rendered(child));
}

#[test]
fn test_ordered_list_items_are_not_bullets() {
    let (doc, bullet, _) = nested_list(true);
    let config = CollapseConfig::default();
    assert!(!AnchorResolver::new(&doc, &config).is_bullet(bullet));

    let (doc, bullet, child) = nested_list(false);
    let anchors = AnchorResolver::new(&doc, &config);
    assert!(anchors.is_bullet(bullet));
    // No sublist under the child's item.
    assert!(!anchors.is_bullet(child));
}

#[test]
fn test_disabled_list_collapse_ignores_bullets() {
    let (doc, bullet, _) = nested_list(false);
    let config = CollapseConfig {
        enable_list_collapse: false,
        ..CollapseConfig::default()
    };
    let mut executor = CommandExecutor::new(doc, config, MemoryHost::new());
    assert!(executor.execute(Command::ToggleBullet { bullet }).is_err());
    assert!(!executor.anchors().is_bullet(bullet));
}

#[test]
fn test_end_of_uses_last_text_descendant() {
    let mut doc = Document::new();
    let h = doc.push(Element::heading(2).with_text("Plain"));
    let p = doc.push(Element::paragraph(""));
    doc.append_child(p, Element::span("héllo"));
    let last = doc.append_child(p, Element::span("wörld!"));
    let empty = doc.push(Element::paragraph(""));

    let config = CollapseConfig::default();
    let anchors = AnchorResolver::new(&doc, &config);
    assert_eq!(anchors.end_of(h), DocPosition::new(h, 5));
    assert_eq!(anchors.end_of(p), DocPosition::new(last, 6));
    assert_eq!(anchors.end_of(empty), DocPosition::new(empty, 0));
}
