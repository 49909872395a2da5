//! Block document model.
//!
//! A [`Document`] is an arena of [`Element`]s linked into the host's native tree shape: top-level
//! blocks form one sibling chain, list items hang under lists, paragraphs and spans under list
//! items, and so on. Nothing here infers nesting from indentation; the tree only reflects what
//! the host's markup nests. Section structure is layered on top by [`crate::walker`].
//!
//! Nodes are addressed by [`NodeId`]. Removing a node detaches its subtree but keeps the slots,
//! so ids held by callers never alias a different element.
//!
//! # Example
//!
//! ```rust
//! use collapse_core::{Document, Element};
//!
//! let mut doc = Document::new();
//! let heading = doc.push(Element::heading(2).with_text("Notes"));
//! let body = doc.push(Element::paragraph("indented").with_style("margin-left:40px;"));
//!
//! assert_eq!(doc.next_sibling(heading), Some(body));
//! assert_eq!(doc.prev_sibling(body), Some(heading));
//! ```

use crate::markers::{Marker, MarkerSet, StyleHint};
use crate::style::StyleProps;
use unicode_segmentation::UnicodeSegmentation;

/// Handle to a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena slot index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Opaque block kinds that cannot carry indentation of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnhandledKind {
    /// Horizontal rule wrapper.
    HorizontalLine,
    /// Embedded note.
    IncludeNote,
    /// Diagram wrapper.
    Mermaid,
    /// Highlighted code block.
    CodeBlock,
    /// Table figure.
    Table,
    /// Page break.
    PageBreak,
}

/// What kind of block or inline node an element is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// `h1`..`h6`.
    Heading(u8),
    /// Plain paragraph.
    Paragraph,
    /// Bulleted or numbered list container.
    List {
        /// `ol` rather than `ul`.
        ordered: bool,
    },
    /// List item.
    ListItem,
    /// Image figure.
    Image,
    /// Inline span.
    Span,
    /// Opaque block.
    Unhandled(UnhandledKind),
    /// Any other container (asides, callouts, block quotes), by tag name.
    Other(String),
}

impl ElementKind {
    /// Whether this is a heading that may be made collapsible (`h2`..`h6`).
    pub fn is_collapsible_heading(&self) -> bool {
        matches!(self, ElementKind::Heading(2..=6))
    }

    /// Whether this is a list container.
    pub fn is_list(&self) -> bool {
        matches!(self, ElementKind::List { .. })
    }

    /// Whether this is an opaque block.
    pub fn is_unhandled(&self) -> bool {
        matches!(self, ElementKind::Unhandled(_))
    }

    /// Whether this is block-level (everything except inline spans).
    pub fn is_block(&self) -> bool {
        !matches!(self, ElementKind::Span)
    }

    /// Which base style to synthesize when attaching a marker to an unstyled element.
    pub fn style_hint(&self) -> StyleHint {
        match self {
            ElementKind::Image => StyleHint::Image,
            ElementKind::Span => StyleHint::Span,
            _ => StyleHint::Text,
        }
    }
}

/// One document node: its kind, inline style, marker set and own text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Node kind.
    pub kind: ElementKind,
    /// Inline style declarations (presentation only; markers live in `markers`).
    pub style: StyleProps,
    /// Engine markers.
    pub markers: MarkerSet,
    /// The node's own inline text (children carry theirs separately).
    pub text: String,
    /// Host class list, carried through untouched.
    pub class: String,
    /// Host tag when it is not the usual spelling for `kind` (`figure` for an image).
    pub tag: Option<String>,
}

impl Element {
    /// Create an unstyled, unmarked element.
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            style: StyleProps::new(),
            markers: MarkerSet::empty(),
            text: String::new(),
            class: String::new(),
            tag: None,
        }
    }

    /// Heading of the given level.
    pub fn heading(level: u8) -> Self {
        Self::new(ElementKind::Heading(level))
    }

    /// Paragraph with text.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(ElementKind::Paragraph).with_text(text)
    }

    /// List container.
    pub fn list(ordered: bool) -> Self {
        Self::new(ElementKind::List { ordered })
    }

    /// List item.
    pub fn list_item() -> Self {
        Self::new(ElementKind::ListItem)
    }

    /// Image figure.
    pub fn image() -> Self {
        Self::new(ElementKind::Image)
    }

    /// Inline span with text.
    pub fn span(text: impl Into<String>) -> Self {
        Self::new(ElementKind::Span).with_text(text)
    }

    /// Opaque block.
    pub fn unhandled(kind: UnhandledKind) -> Self {
        Self::new(ElementKind::Unhandled(kind))
    }

    /// Generic container by tag name.
    pub fn other(tag: impl Into<String>) -> Self {
        Self::new(ElementKind::Other(tag.into()))
    }

    /// Replace the style with a parsed declaration list.
    pub fn with_style(mut self, style: &str) -> Self {
        self.style = StyleProps::parse(style);
        self
    }

    /// Add a marker.
    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.markers.insert(marker);
        self
    }

    /// Replace the text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Replace the class list.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    /// Record the host tag this element was read from.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Whether the element carries `marker`.
    pub fn has(&self, marker: Marker) -> bool {
        self.markers.contains(marker)
    }

    /// Heading level, if this is a heading.
    pub fn heading_level(&self) -> Option<u8> {
        match self.kind {
            ElementKind::Heading(level) => Some(level),
            _ => None,
        }
    }

    /// Length of the element's own text in grapheme clusters (cursor units).
    pub fn text_len(&self) -> usize {
        self.text.graphemes(true).count()
    }

    /// Whether the own text is empty or only filler whitespace (including `&nbsp;`).
    pub fn has_blank_text(&self) -> bool {
        self.text.chars().all(|c| c.is_whitespace())
    }
}

#[derive(Debug, Clone)]
struct Node {
    element: Element,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
    attached: bool,
}

impl Node {
    fn new(element: Element) -> Self {
        Self {
            element,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            attached: false,
        }
    }
}

/// Arena-backed block document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<Node>,
    first: Option<NodeId>,
    last: Option<NodeId>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, element: Element) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(element));
        id
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Append a top-level block.
    pub fn push(&mut self, element: Element) -> NodeId {
        let id = self.alloc(element);
        let prev = self.last;
        {
            let node = self.node_mut(id);
            node.prev_sibling = prev;
            node.attached = true;
        }
        match prev {
            Some(prev) => self.node_mut(prev).next_sibling = Some(id),
            None => self.first = Some(id),
        }
        self.last = Some(id);
        id
    }

    /// Append `element` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, element: Element) -> NodeId {
        let id = self.alloc(element);
        let prev = self.node(parent).last_child;
        let attached = self.node(parent).attached;
        {
            let node = self.node_mut(id);
            node.parent = Some(parent);
            node.prev_sibling = prev;
            node.attached = attached;
        }
        match prev {
            Some(prev) => self.node_mut(prev).next_sibling = Some(id),
            None => self.node_mut(parent).first_child = Some(id),
        }
        self.node_mut(parent).last_child = Some(id);
        id
    }

    /// Insert `element` as the sibling immediately before `reference`.
    pub fn insert_before(&mut self, reference: NodeId, element: Element) -> NodeId {
        let id = self.alloc(element);
        let parent = self.node(reference).parent;
        let prev = self.node(reference).prev_sibling;
        let attached = self.node(reference).attached;
        {
            let node = self.node_mut(id);
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = Some(reference);
            node.attached = attached;
        }
        self.node_mut(reference).prev_sibling = Some(id);
        match prev {
            Some(prev) => self.node_mut(prev).next_sibling = Some(id),
            None => self.set_first_of(parent, id, attached),
        }
        id
    }

    /// Insert `element` as the sibling immediately after `reference`.
    pub fn insert_after(&mut self, reference: NodeId, element: Element) -> NodeId {
        match self.node(reference).next_sibling {
            Some(next) => self.insert_before(next, element),
            None => match self.node(reference).parent {
                Some(parent) => self.append_child(parent, element),
                None if self.node(reference).attached => self.push(element),
                None => {
                    let id = self.alloc(element);
                    self.node_mut(reference).next_sibling = Some(id);
                    self.node_mut(id).prev_sibling = Some(reference);
                    id
                }
            },
        }
    }

    fn set_first_of(&mut self, parent: Option<NodeId>, id: NodeId, attached: bool) {
        match parent {
            Some(parent) => self.node_mut(parent).first_child = Some(id),
            None if attached => self.first = Some(id),
            None => {}
        }
    }

    fn set_last_of(&mut self, parent: Option<NodeId>, id: Option<NodeId>, attached: bool) {
        match parent {
            Some(parent) => self.node_mut(parent).last_child = id,
            None if attached => self.last = id,
            None => {}
        }
    }

    /// Detach `id` (and its subtree) from the document.
    ///
    /// The node's slot stays valid; it simply no longer appears in traversals. Removing an
    /// already detached node is a no-op.
    pub fn remove(&mut self, id: NodeId) {
        if !self.node(id).attached {
            return;
        }
        let (parent, prev, next) = {
            let node = self.node(id);
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        match prev {
            Some(prev) => self.node_mut(prev).next_sibling = next,
            None => match parent {
                Some(parent) => self.node_mut(parent).first_child = next,
                None => self.first = next,
            },
        }
        match next {
            Some(next) => self.node_mut(next).prev_sibling = prev,
            None => self.set_last_of(parent, prev, true),
        }
        {
            let node = self.node_mut(id);
            node.parent = None;
            node.prev_sibling = None;
            node.next_sibling = None;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            self.node_mut(current).attached = false;
            stack.extend(self.children(current));
        }
    }

    /// Replace the element stored at `id`, keeping its position and children.
    pub fn replace(&mut self, id: NodeId, element: Element) -> Element {
        std::mem::replace(&mut self.node_mut(id).element, element)
    }

    /// Whether `id` refers to a node of this document that is still attached.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.get(id.0).is_some_and(|n| n.attached)
    }

    /// The element at `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this document.
    pub fn element(&self, id: NodeId) -> &Element {
        &self.node(id).element
    }

    /// Mutable access to the element at `id`.
    pub fn element_mut(&mut self, id: NodeId) -> &mut Element {
        &mut self.node_mut(id).element
    }

    /// The element at `id`, or `None` for foreign or detached ids.
    pub fn get(&self, id: NodeId) -> Option<&Element> {
        self.nodes
            .get(id.0)
            .filter(|n| n.attached)
            .map(|n| &n.element)
    }

    /// Parent node (`None` for top-level blocks).
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// First child.
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).first_child
    }

    /// Last child.
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).last_child
    }

    /// Following sibling.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next_sibling
    }

    /// Preceding sibling.
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).prev_sibling
    }

    /// First top-level block.
    pub fn first(&self) -> Option<NodeId> {
        self.first
    }

    /// Iterate the direct children of `id`.
    pub fn children(&self, id: NodeId) -> Siblings<'_> {
        Siblings {
            doc: self,
            next: self.node(id).first_child,
        }
    }

    /// Iterate the top-level blocks.
    pub fn top_level(&self) -> Siblings<'_> {
        Siblings {
            doc: self,
            next: self.first,
        }
    }

    /// Whether `id` has any children.
    pub fn has_children(&self, id: NodeId) -> bool {
        self.node(id).first_child.is_some()
    }

    /// Iterate every descendant of `id` in document order (excluding `id`).
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            root: Some(id),
            next: self.node(id).first_child,
        }
    }

    /// Descendants of `id` whose element satisfies `pred`, in document order.
    pub fn find_descendants<F>(&self, id: NodeId, mut pred: F) -> Vec<NodeId>
    where
        F: FnMut(&Element) -> bool,
    {
        self.descendants(id)
            .filter(|d| pred(self.element(*d)))
            .collect()
    }

    /// Iterate `id`'s ancestors, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.node(id).parent, move |p| self.node(*p).parent)
    }

    /// Whether `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Iterate every attached node in document (pre-)order.
    pub fn iter(&self) -> Descendants<'_> {
        Descendants {
            doc: self,
            root: None,
            next: self.first,
        }
    }

    /// Number of attached nodes.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Whether the document has no attached nodes.
    pub fn is_empty(&self) -> bool {
        self.first.is_none()
    }

    /// Concatenated text of `id` and its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = self.element(id).text.clone();
        for d in self.descendants(id) {
            out.push_str(&self.element(d).text);
        }
        out
    }

    /// Nearest block-level node at or above `id`.
    pub fn enclosing_block(&self, id: NodeId) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|n| self.element(*n).kind.is_block())
    }
}

/// Iterator over a sibling chain.
pub struct Siblings<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Siblings<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.node(current).next_sibling;
        Some(current)
    }
}

/// Pre-order iterator over a subtree (or the whole document).
pub struct Descendants<'a> {
    doc: &'a Document,
    root: Option<NodeId>,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        let node = self.doc.node(current);
        self.next = match node.first_child {
            Some(child) => Some(child),
            None => {
                let mut cursor = Some(current);
                let mut found = None;
                while let Some(c) = cursor {
                    if Some(c) == self.root {
                        break;
                    }
                    let n = self.doc.node(c);
                    if let Some(sibling) = n.next_sibling {
                        found = Some(sibling);
                        break;
                    }
                    cursor = n.parent;
                    if cursor == self.root {
                        break;
                    }
                }
                found
            }
        };
        Some(current)
    }
}
