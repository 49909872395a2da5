//! Editing guards.
//!
//! Deleting or splitting a collapsed heading would leave its hidden section without an anchor.
//! Hosts call [`EditGuard::check`] before applying a destructive edit and drop the edit when it
//! is blocked. Edits that stay inside a single element are always allowed, with one exception:
//! inserting a newline inside a collapsed heading is refused even for a caret. The split leaves
//! the `collapsed` marker on the first half while the placeholder and hidden run now follow the
//! second half, a new heading with no markers, so the section loses its anchor just as it would
//! if the heading were deleted.

use crate::anchor::{AnchorResolver, DocPosition};
use crate::config::CollapseConfig;
use crate::document::{Document, NodeId};
use crate::visibility::RenderModel;

/// Destructive edit commands the guard understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// Delete forward (`Delete`).
    ForwardDelete,
    /// Delete backward (`Backspace`).
    Backspace,
    /// Split the block (`Enter`).
    InsertNewline,
}

/// A selection between two cursor positions. `start == end` is a caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocRange {
    /// Selection start.
    pub start: DocPosition,
    /// Selection end.
    pub end: DocPosition,
}

impl DocRange {
    /// Create a range.
    pub fn new(start: DocPosition, end: DocPosition) -> Self {
        Self { start, end }
    }

    /// A caret at `position`.
    pub fn caret(position: DocPosition) -> Self {
        Self::new(position, position)
    }

    /// Whether the range is a caret.
    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }
}

/// Whether an edit may proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditVerdict {
    /// Apply the edit.
    Allowed,
    /// Drop the edit: it would delete or split this collapsed heading.
    Blocked {
        /// The heading that would be damaged.
        heading: NodeId,
    },
}

impl EditVerdict {
    /// Whether the edit may proceed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, EditVerdict::Allowed)
    }
}

/// Evaluates edits against the collapsed headings of a document.
pub struct EditGuard<'a> {
    doc: &'a Document,
    render: RenderModel<'a>,
    anchors: AnchorResolver<'a>,
}

impl<'a> EditGuard<'a> {
    /// Create a guard over `doc`.
    pub fn new(doc: &'a Document, config: &'a CollapseConfig) -> Self {
        Self {
            doc,
            render: RenderModel::new(doc, config),
            anchors: AnchorResolver::new(doc, config),
        }
    }

    /// Leaf blocks in document order: block elements with no block-level children.
    fn leaf_blocks(&self) -> Vec<NodeId> {
        let doc = self.doc;
        doc.iter()
            .filter(|id| {
                doc.element(*id).kind.is_block()
                    && !doc.children(*id).any(|c| doc.element(c).kind.is_block())
            })
            .collect()
    }

    fn texts_before(&self, block: NodeId, node: NodeId) -> bool {
        std::iter::once(block)
            .chain(self.doc.descendants(block))
            .take_while(|n| *n != node)
            .any(|n| !self.doc.element(n).text.is_empty())
    }

    fn is_at_start(&self, block: NodeId, position: DocPosition) -> bool {
        position.offset == 0 && !self.texts_before(block, position.node)
    }

    fn is_at_end(&self, block: NodeId, position: DocPosition) -> bool {
        let end = self.anchors.end_of(block);
        position.node == end.node && position.offset >= end.offset
            || self.doc.text_content(block).is_empty()
    }

    /// Decide whether `kind` applied to `range` may proceed.
    pub fn check(&self, kind: EditKind, range: DocRange) -> EditVerdict {
        let (Some(start_block), Some(end_block)) =
            (self.anchors.block_at(range.start), self.anchors.block_at(range.end))
        else {
            return EditVerdict::Allowed;
        };

        if kind == EditKind::InsertNewline && self.render.is_collapsed_heading(start_block) {
            return self.blocked(kind, start_block);
        }

        let blocks = self.leaf_blocks();
        let index_of = |id: NodeId| blocks.iter().position(|b| *b == id);
        let (Some(mut first), Some(mut last)) = (index_of(start_block), index_of(end_block))
        else {
            return EditVerdict::Allowed;
        };

        if range.is_caret() {
            match kind {
                EditKind::ForwardDelete if self.is_at_end(start_block, range.start) => {
                    last = (first + 1).min(blocks.len() - 1);
                }
                EditKind::Backspace if self.is_at_start(start_block, range.start) => {
                    first = first.saturating_sub(1);
                }
                _ => {}
            }
        }

        if first == last {
            return EditVerdict::Allowed;
        }
        let (lo, hi) = (first.min(last), first.max(last));
        match blocks[lo..=hi]
            .iter()
            .copied()
            .find(|b| self.render.is_collapsed_heading(*b))
        {
            Some(heading) => self.blocked(kind, heading),
            None => EditVerdict::Allowed,
        }
    }

    fn blocked(&self, kind: EditKind, heading: NodeId) -> EditVerdict {
        tracing::debug!(?kind, ?heading, "edit blocked by collapsed heading");
        EditVerdict::Blocked { heading }
    }
}
