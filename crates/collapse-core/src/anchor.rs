//! Anchor resolution.
//!
//! Maps what the user pointed at (a screen point or the cursor) to the element an action
//! applies to, and decides which action a click triggers. Geometry comes from the host; this
//! module only compares it against the hit zones:
//!
//! - heading toggle: the leftmost 8px of a collapsible heading that is not inside a list;
//! - bullet toggle: the leftmost 14.4px, below the top 7px, of the first child of an unordered
//!   list item that owns a sublist;
//! - repair: anywhere on a visible element that carries (or wraps) a `hidden` marker, which
//!   can only happen when its section lost its anchor.

use crate::config::CollapseConfig;
use crate::document::{Document, ElementKind, NodeId};
use crate::markers::Marker;
use crate::visibility::RenderModel;

/// Width of the heading toggle zone.
pub const HEADING_HIT_WIDTH: f64 = 8.0;
/// Width of the bullet toggle zone.
pub const BULLET_HIT_WIDTH: f64 = 14.4;
/// Offset below an element's top edge where the bullet toggle zone starts.
pub const BULLET_HIT_TOP: f64 = 7.0;

/// A point in host page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An element's bounding box in host page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Create a rectangle.
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// A cursor location: a node and a grapheme offset into its own text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocPosition {
    /// Node holding the cursor.
    pub node: NodeId,
    /// Grapheme offset into the node's text.
    pub offset: usize,
}

impl DocPosition {
    /// Create a position.
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// What a click resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// Toggle the section of this heading.
    Heading(NodeId),
    /// Fold or unfold the sublist of this bullet.
    Bullet(NodeId),
    /// Repair orphaned sections (clicked on this hidden-like element).
    Repair(NodeId),
    /// Nothing to do.
    None,
}

/// Resolves anchors under a configuration.
#[derive(Debug, Clone, Copy)]
pub struct AnchorResolver<'a> {
    doc: &'a Document,
    config: &'a CollapseConfig,
}

impl<'a> AnchorResolver<'a> {
    /// Create a resolver over `doc`.
    pub fn new(doc: &'a Document, config: &'a CollapseConfig) -> Self {
        Self { doc, config }
    }

    fn inside_list(&self, id: NodeId) -> bool {
        self.doc
            .ancestors(id)
            .any(|a| self.doc.element(a).kind.is_list())
    }

    /// Whether `id` is a heading that toggles a section when clicked.
    pub fn is_heading_anchor(&self, id: NodeId) -> bool {
        let Some(element) = self.doc.get(id) else {
            return false;
        };
        self.config.enable_heading_collapse
            && element.kind.is_collapsible_heading()
            && (element.has(Marker::Collapsible) || self.config.all_headings_collapsible)
            && !self.inside_list(id)
    }

    /// Whether `id` is the first child of an unordered list item that owns a sublist.
    pub fn is_bullet(&self, id: NodeId) -> bool {
        let doc = self.doc;
        if !self.config.enable_list_collapse || !doc.contains(id) {
            return false;
        }
        let Some(li) = doc.parent(id) else {
            return false;
        };
        let in_unordered_item = doc.element(li).kind == ElementKind::ListItem
            && doc
                .parent(li)
                .is_some_and(|list| doc.element(list).kind == ElementKind::List { ordered: false });
        in_unordered_item
            && doc.first_child(li) == Some(id)
            && doc.children(li).any(|c| doc.element(c).kind.is_list())
    }

    /// Decide what clicking `target` (with bounding box `rect`) at `point` does.
    pub fn classify_click(&self, target: NodeId, point: Point, rect: Rect) -> ClickTarget {
        if !self.doc.contains(target) {
            return ClickTarget::None;
        }
        if self.is_heading_anchor(target) {
            return if point.x < rect.left + HEADING_HIT_WIDTH {
                ClickTarget::Heading(target)
            } else {
                ClickTarget::None
            };
        }
        if self.is_bullet(target)
            && point.x < rect.left + BULLET_HIT_WIDTH
            && point.y > rect.top + BULLET_HIT_TOP
        {
            return ClickTarget::Bullet(target);
        }
        let render = RenderModel::new(self.doc, self.config);
        if render.is_rendered(target) && render.is_hidden_like(target) {
            return ClickTarget::Repair(target);
        }
        ClickTarget::None
    }

    /// The block-level element enclosing a cursor position.
    pub fn block_at(&self, position: DocPosition) -> Option<NodeId> {
        if !self.doc.contains(position.node) {
            return None;
        }
        self.doc.enclosing_block(position.node)
    }

    /// The heading enclosing a cursor position, if any.
    pub fn heading_at(&self, position: DocPosition) -> Option<NodeId> {
        if !self.doc.contains(position.node) {
            return None;
        }
        std::iter::once(position.node)
            .chain(self.doc.ancestors(position.node))
            .find(|id| self.doc.element(*id).heading_level().is_some())
    }

    /// Cursor position at the end of `id`'s text.
    pub fn end_of(&self, id: NodeId) -> DocPosition {
        let last_text = std::iter::once(id)
            .chain(self.doc.descendants(id))
            .filter(|n| !self.doc.element(*n).text.is_empty())
            .last()
            .unwrap_or(id);
        DocPosition::new(last_text, self.doc.element(last_text).text_len())
    }
}
