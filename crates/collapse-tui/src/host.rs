//! Terminal implementation of the engine's host interface.

use collapse_core::{DocPosition, Document, Host, NodeId, Point, Rect};
use std::path::PathBuf;

/// Width of one terminal cell in synthetic page units.
pub const CELL_WIDTH: f64 = 8.0;
/// Height of one terminal row in synthetic page units.
pub const CELL_HEIGHT: f64 = 16.0;

/// Host backed by a JSON file and a row-per-element terminal layout.
///
/// The terminal has no pixel geometry, so each displayed element gets a synthetic box: one
/// row tall, starting at its indentation column. Hit testing runs against those boxes.
pub struct TuiHost {
    path: PathBuf,
    write_through: bool,
    cursor: Option<DocPosition>,
    layout: Vec<(NodeId, Rect)>,
    saves: usize,
    last_error: Option<String>,
}

impl TuiHost {
    /// Host saving to `path`; with `write_through` off, saves are counted but not written.
    pub fn new(path: PathBuf, write_through: bool) -> Self {
        Self {
            path,
            write_through,
            cursor: None,
            layout: Vec::new(),
            saves: 0,
            last_error: None,
        }
    }

    /// Replace the element boxes.
    pub fn set_layout(&mut self, layout: Vec<(NodeId, Rect)>) {
        self.layout = layout;
    }

    /// Box of the `row`-th displayed element, if any.
    pub fn row_rect(&self, row: usize) -> Option<Rect> {
        self.layout.get(row).map(|(_, rect)| *rect)
    }

    /// Successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves
    }

    /// The last save failure, cleared once read.
    pub fn take_error(&mut self) -> Option<String> {
        self.last_error.take()
    }
}

fn contains(rect: &Rect, point: Point) -> bool {
    point.x >= rect.left
        && point.x < rect.left + rect.width
        && point.y >= rect.top
        && point.y < rect.top + rect.height
}

impl Host for TuiHost {
    fn request_save(&mut self, doc: &Document) {
        if !self.write_through {
            self.saves += 1;
            return;
        }
        match collapse_core_json::save_to_path(doc, &self.path) {
            Ok(()) => {
                self.saves += 1;
                self.last_error = None;
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "saving document failed");
                self.last_error = Some(err.to_string());
            }
        }
    }

    fn cursor(&self) -> Option<DocPosition> {
        self.cursor
    }

    fn set_cursor(&mut self, position: DocPosition) {
        self.cursor = Some(position);
    }

    fn element_at(&self, doc: &Document, point: Point) -> Option<NodeId> {
        self.layout
            .iter()
            .filter(|(id, rect)| doc.contains(*id) && contains(rect, point))
            .map(|(id, _)| *id)
            .last()
    }

    fn element_rect(&self, doc: &Document, id: NodeId) -> Option<Rect> {
        if !doc.contains(id) {
            return None;
        }
        self.layout
            .iter()
            .find(|(node, _)| *node == id)
            .map(|(_, rect)| *rect)
    }
}
