//! Render model.
//!
//! The host hides collapsed content with declarative style rules keyed on the marker
//! vocabulary. The section walker needs to know what those rules currently hide (an element
//! that is already invisible belongs to a nested collapsed subsection), so [`RenderModel`]
//! evaluates the same rules directly against the document:
//!
//! - an element is *hidden-like* if it carries `hidden`, has a direct child carrying `hidden`,
//!   or is a list with any `hidden` descendant; hidden-like elements are not displayed;
//! - an opaque block directly after a collapsed heading or a hidden-like element is not
//!   displayed (it carries no marker of its own);
//! - a list directly after an element carrying `list-collapsed` (itself or on a direct child)
//!   is not displayed;
//! - an `error` placeholder whose previous sibling is neither a collapsed heading nor
//!   hidden-like is displayed regardless, as the orphan warning.
//!
//! Heading rules are only in force when heading collapse is enabled, list rules only when list
//! collapse is enabled. An element is *rendered* when it and all its ancestors are displayed.

use crate::config::CollapseConfig;
use crate::document::{Document, ElementKind, NodeId};
use crate::markers::Marker;

/// Read-only evaluation of the hiding rules over a document.
#[derive(Debug, Clone, Copy)]
pub struct RenderModel<'a> {
    doc: &'a Document,
    heading_rules: bool,
    list_rules: bool,
}

impl<'a> RenderModel<'a> {
    /// Evaluate `doc` under `config`'s enabled rule sets.
    pub fn new(doc: &'a Document, config: &CollapseConfig) -> Self {
        Self {
            doc,
            heading_rules: config.enable_heading_collapse,
            list_rules: config.enable_list_collapse,
        }
    }

    /// Whether `id` is a collapsed `h2`..`h6` heading.
    pub fn is_collapsed_heading(&self, id: NodeId) -> bool {
        let element = self.doc.element(id);
        element.kind.is_collapsible_heading() && element.has(Marker::Collapsed)
    }

    /// Whether `id` carries `hidden`, owns a direct child that does, or is a list holding one.
    pub fn is_hidden_like(&self, id: NodeId) -> bool {
        let doc = self.doc;
        let element = doc.element(id);
        if element.has(Marker::Hidden) {
            return true;
        }
        if doc
            .children(id)
            .any(|c| doc.element(c).has(Marker::Hidden))
        {
            return true;
        }
        element.kind.is_list() && doc.descendants(id).any(|d| doc.element(d).has(Marker::Hidden))
    }

    fn hides_following(&self, prev: NodeId) -> bool {
        self.is_collapsed_heading(prev) || self.is_hidden_like(prev)
    }

    /// Whether `id` is a placeholder that lost its anchor and is shown as a warning.
    pub fn is_orphaned_placeholder(&self, id: NodeId) -> bool {
        if !self.heading_rules || !self.doc.element(id).has(Marker::Error) {
            return false;
        }
        match self.doc.prev_sibling(id) {
            Some(prev) => !self.hides_following(prev),
            None => true,
        }
    }

    fn folded_by_bullet(&self, id: NodeId) -> bool {
        let doc = self.doc;
        if !self.list_rules || !doc.element(id).kind.is_list() {
            return false;
        }
        doc.prev_sibling(id).is_some_and(|prev| {
            doc.element(prev).has(Marker::ListCollapsed)
                || doc
                    .children(prev)
                    .any(|c| doc.element(c).has(Marker::ListCollapsed))
        })
    }

    /// Whether the rules leave `id` itself displayed (ignoring ancestors).
    pub fn is_displayed(&self, id: NodeId) -> bool {
        if self.heading_rules {
            if self.is_orphaned_placeholder(id) {
                return true;
            }
            if self.is_hidden_like(id) {
                return false;
            }
            if matches!(self.doc.element(id).kind, ElementKind::Unhandled(_))
                && self
                    .doc
                    .prev_sibling(id)
                    .is_some_and(|prev| self.hides_following(prev))
            {
                return false;
            }
        }
        !self.folded_by_bullet(id)
    }

    /// Whether `id` and all its ancestors are displayed.
    pub fn is_rendered(&self, id: NodeId) -> bool {
        self.doc.contains(id)
            && self.is_displayed(id)
            && self.doc.ancestors(id).all(|a| self.is_displayed(a))
    }

    /// Rendered nodes in document order, skipping the subtrees of undisplayed nodes.
    pub fn rendered_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.doc.top_level().collect();
        stack.reverse();
        while let Some(id) = stack.pop() {
            if !self.is_displayed(id) {
                continue;
            }
            out.push(id);
            let mut children: Vec<NodeId> = self.doc.children(id).collect();
            children.reverse();
            stack.extend(children);
        }
        out
    }

    /// Every placeholder currently shown as an orphan warning.
    pub fn orphaned_placeholders(&self) -> Vec<NodeId> {
        self.doc
            .iter()
            .filter(|id| self.is_orphaned_placeholder(*id) && self.is_rendered(*id))
            .collect()
    }
}
