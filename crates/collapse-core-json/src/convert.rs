//! Conversion between [`Document`] and its stored form.

use crate::error::StorageError;
use crate::stored::{FORMAT_VERSION, StoredDocument, StoredNode};
use collapse_core::markers::{embed_markers, extract_markers};
use collapse_core::{Document, Element, ElementKind, NodeId, StyleProps, UnhandledKind};

/// Map a stored tag (and class list) to an element kind.
///
/// Unknown tags become [`ElementKind::Other`]; an empty tag is rejected by the caller.
pub fn kind_of(node: &StoredNode) -> ElementKind {
    let tag = node.tag.to_ascii_lowercase();
    match tag.as_str() {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            ElementKind::Heading(tag.as_bytes()[1] - b'0')
        }
        "p" => ElementKind::Paragraph,
        "ul" => ElementKind::List { ordered: false },
        "ol" => ElementKind::List { ordered: true },
        "li" => ElementKind::ListItem,
        "img" => ElementKind::Image,
        "span" => ElementKind::Span,
        "hr" => ElementKind::Unhandled(UnhandledKind::HorizontalLine),
        "table" => ElementKind::Unhandled(UnhandledKind::Table),
        "pre" => ElementKind::Unhandled(UnhandledKind::CodeBlock),
        "include-note" => ElementKind::Unhandled(UnhandledKind::IncludeNote),
        "mermaid" => ElementKind::Unhandled(UnhandledKind::Mermaid),
        "page-break" => ElementKind::Unhandled(UnhandledKind::PageBreak),
        "figure" if node.has_class("image") => ElementKind::Image,
        "figure" if node.has_class("table") => ElementKind::Unhandled(UnhandledKind::Table),
        _ if node.has_class("include-note") => ElementKind::Unhandled(UnhandledKind::IncludeNote),
        _ if node.has_class("ck-mermaid__wrapper") => {
            ElementKind::Unhandled(UnhandledKind::Mermaid)
        }
        _ if node.has_class("page-break") => ElementKind::Unhandled(UnhandledKind::PageBreak),
        _ if node.has_class("ck-horizontal-line") => {
            ElementKind::Unhandled(UnhandledKind::HorizontalLine)
        }
        _ => ElementKind::Other(node.tag.clone()),
    }
}

/// The tag an element kind is written back as.
pub fn tag_of(kind: &ElementKind) -> String {
    match kind {
        ElementKind::Heading(level) => format!("h{level}"),
        ElementKind::Paragraph => "p".to_string(),
        ElementKind::List { ordered: false } => "ul".to_string(),
        ElementKind::List { ordered: true } => "ol".to_string(),
        ElementKind::ListItem => "li".to_string(),
        ElementKind::Image => "img".to_string(),
        ElementKind::Span => "span".to_string(),
        ElementKind::Unhandled(kind) => match kind {
            UnhandledKind::HorizontalLine => "hr",
            UnhandledKind::Table => "table",
            UnhandledKind::CodeBlock => "pre",
            UnhandledKind::IncludeNote => "include-note",
            UnhandledKind::Mermaid => "mermaid",
            UnhandledKind::PageBreak => "page-break",
        }
        .to_string(),
        ElementKind::Other(tag) => tag.clone(),
    }
}

fn element_of(node: &StoredNode) -> Element {
    let (style, markers) = extract_markers(&node.style);
    let kind = kind_of(node);
    let tag = (tag_of(&kind) != node.tag).then(|| node.tag.clone());
    let mut element = Element::new(kind)
        .with_text(node.text.clone())
        .with_class(node.class.clone());
    element.style = StyleProps::parse(&style);
    element.markers = markers;
    element.tag = tag;
    element
}

fn node_of(doc: &Document, id: NodeId) -> StoredNode {
    let element = doc.element(id);
    StoredNode {
        tag: element
            .tag
            .clone()
            .unwrap_or_else(|| tag_of(&element.kind)),
        class: element.class.clone(),
        style: embed_markers(
            &element.style.render(),
            element.markers,
            element.kind.style_hint(),
        ),
        text: element.text.clone(),
        children: doc.children(id).map(|c| node_of(doc, c)).collect(),
    }
}

fn attach(
    doc: &mut Document,
    parent: Option<NodeId>,
    node: &StoredNode,
    path: String,
) -> Result<(), StorageError> {
    if node.tag.trim().is_empty() {
        return Err(StorageError::EmptyTag(path));
    }
    let element = element_of(node);
    let id = match parent {
        Some(parent) => doc.append_child(parent, element),
        None => doc.push(element),
    };
    for (i, child) in node.children.iter().enumerate() {
        attach(doc, Some(id), child, format!("{path}.children[{i}]"))?;
    }
    Ok(())
}

/// Convert a document to its stored form.
pub fn document_to_stored(doc: &Document) -> StoredDocument {
    StoredDocument {
        version: FORMAT_VERSION,
        blocks: doc.top_level().map(|id| node_of(doc, id)).collect(),
    }
}

/// Build a document from its stored form.
pub fn document_from_stored(stored: &StoredDocument) -> Result<Document, StorageError> {
    if stored.version > FORMAT_VERSION {
        return Err(StorageError::UnsupportedVersion(stored.version));
    }
    let mut doc = Document::new();
    for (i, node) in stored.blocks.iter().enumerate() {
        attach(&mut doc, None, node, format!("blocks[{i}]"))?;
    }
    tracing::debug!(blocks = stored.blocks.len(), elements = doc.len(), "loaded document");
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_mapping() {
        assert_eq!(kind_of(&StoredNode::new("H3")), ElementKind::Heading(3));
        assert_eq!(
            kind_of(&StoredNode::new("figure").with_class("image image_resized")),
            ElementKind::Image
        );
        assert_eq!(
            kind_of(&StoredNode::new("div").with_class("ck-mermaid__wrapper")),
            ElementKind::Unhandled(UnhandledKind::Mermaid)
        );
        assert_eq!(
            kind_of(&StoredNode::new("aside")),
            ElementKind::Other("aside".to_string())
        );
        assert_eq!(tag_of(&ElementKind::List { ordered: true }), "ol");
        assert_eq!(tag_of(&ElementKind::Unhandled(UnhandledKind::CodeBlock)), "pre");
    }

    #[test]
    fn test_markers_move_between_style_and_set() {
        let node = StoredNode::new("p")
            .with_style("margin-left:40px/*▼hidden▼*//*▼error▼*/;")
            .with_text("[Hidden Section]");
        let element = element_of(&node);
        assert_eq!(element.style.get("margin-left"), Some("40px"));
        assert!(element.has(collapse_core::Marker::Hidden));
        assert!(element.has(collapse_core::Marker::Error));

        let mut doc = Document::new();
        let id = doc.push(element);
        assert_eq!(node_of(&doc, id), node);
    }

    #[test]
    fn test_aliased_tag_and_class_are_kept() {
        let node = StoredNode::new("figure").with_class("image image-style-side");
        let element = element_of(&node);
        assert_eq!(element.kind, ElementKind::Image);
        assert_eq!(element.tag.as_deref(), Some("figure"));

        let mut doc = Document::new();
        let id = doc.push(element);
        assert_eq!(node_of(&doc, id), node);

        let plain = element_of(&StoredNode::new("img"));
        assert_eq!(plain.tag, None);
    }

    #[test]
    fn test_unmarked_unstyled_element_stays_bare() {
        let mut doc = Document::new();
        let id = doc.push(Element::paragraph("plain"));
        let node = node_of(&doc, id);
        assert_eq!(node.style, "");
    }

    #[test]
    fn test_marked_span_gets_span_base_style() {
        let mut doc = Document::new();
        let id = doc.push(Element::span("x").with_marker(collapse_core::Marker::ListCollapsed));
        assert_eq!(
            node_of(&doc, id).style,
            "background-color:auto/*▼list-collapsed▼*/;"
        );
    }
}
