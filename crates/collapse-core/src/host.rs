//! Host editing surface.
//!
//! The engine never renders, lays out, or persists anything itself. Whatever embeds it supplies
//! those through [`Host`]: geometry for hit testing, the cursor, and a sink for full-document
//! snapshots. [`MemoryHost`] is a self-contained implementation for headless use and tests.

use crate::anchor::{DocPosition, Point, Rect};
use crate::document::{Document, NodeId};
use std::collections::HashMap;

/// Services the embedding editor provides.
pub trait Host {
    /// Persist the full current document. Fire-and-forget: called after all mutation of a
    /// command is complete, and the engine does not wait for or inspect the outcome.
    fn request_save(&mut self, doc: &Document);

    /// Current cursor position, if the editor has focus.
    fn cursor(&self) -> Option<DocPosition>;

    /// Move the cursor.
    fn set_cursor(&mut self, position: DocPosition);

    /// Deepest element under a page point.
    fn element_at(&self, doc: &Document, point: Point) -> Option<NodeId>;

    /// Bounding box of an element.
    fn element_rect(&self, doc: &Document, id: NodeId) -> Option<Rect>;
}

/// In-memory [`Host`] that records saves and answers geometry from a lookup table.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    cursor: Option<DocPosition>,
    rects: HashMap<NodeId, Rect>,
    saves: usize,
    last_saved: Option<Document>,
}

impl MemoryHost {
    /// Create a host with no cursor and no geometry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an element's bounding box.
    pub fn set_rect(&mut self, id: NodeId, rect: Rect) {
        self.rects.insert(id, rect);
    }

    /// Number of save requests received.
    pub fn save_count(&self) -> usize {
        self.saves
    }

    /// The most recently saved snapshot.
    pub fn last_saved(&self) -> Option<&Document> {
        self.last_saved.as_ref()
    }
}

impl Host for MemoryHost {
    fn request_save(&mut self, doc: &Document) {
        self.saves += 1;
        self.last_saved = Some(doc.clone());
    }

    fn cursor(&self) -> Option<DocPosition> {
        self.cursor
    }

    fn set_cursor(&mut self, position: DocPosition) {
        self.cursor = Some(position);
    }

    fn element_at(&self, doc: &Document, point: Point) -> Option<NodeId> {
        // Later (deeper, in pre-order) boxes win over their containers.
        doc.iter()
            .filter(|id| {
                self.rects.get(id).is_some_and(|r| {
                    point.x >= r.left
                        && point.x < r.left + r.width
                        && point.y >= r.top
                        && point.y < r.top + r.height
                })
            })
            .last()
    }

    fn element_rect(&self, doc: &Document, id: NodeId) -> Option<Rect> {
        if !doc.contains(id) {
            return None;
        }
        self.rects.get(&id).copied()
    }
}
