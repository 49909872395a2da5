#![warn(missing_docs)]
//! `collapse-core-json` - JSON storage for `collapse-core` documents.
//!
//! In memory, markers are a typed [`collapse_core::MarkerSet`] on each element. On disk they
//! travel inside the element's inline style as sentinel comments (`/*▼hidden▼*/`), which keeps
//! them invisible to anything that only reads CSS and lets the host's own stylesheet hide
//! collapsed content before the engine has loaded. This crate is the only place that
//! representation is produced or parsed.
//!
//! # Example
//!
//! ```rust
//! use collapse_core::{Document, Element, Marker};
//! use collapse_core_json::{document_from_json, document_to_json};
//!
//! let mut doc = Document::new();
//! let heading = doc.push(Element::heading(2).with_text("Todo").with_marker(Marker::Collapsible));
//!
//! let json = document_to_json(&doc).unwrap();
//! assert!(json.contains("/*▼collapsible▼*/"));
//!
//! let loaded = document_from_json(&json).unwrap();
//! assert!(loaded.element(heading).has(Marker::Collapsible));
//! ```

mod convert;
mod error;
mod stored;

pub use convert::{document_from_stored, document_to_stored, kind_of, tag_of};
pub use error::StorageError;
pub use stored::{FORMAT_VERSION, StoredDocument, StoredNode};

use collapse_core::Document;
use std::fs;
use std::path::Path;

/// Serialize a document to compact JSON.
pub fn document_to_json(doc: &Document) -> Result<String, StorageError> {
    Ok(serde_json::to_string(&document_to_stored(doc))?)
}

/// Serialize a document to indented JSON.
pub fn document_to_json_pretty(doc: &Document) -> Result<String, StorageError> {
    Ok(serde_json::to_string_pretty(&document_to_stored(doc))?)
}

/// Parse a document from JSON.
pub fn document_from_json(json: &str) -> Result<Document, StorageError> {
    let stored: StoredDocument = serde_json::from_str(json)?;
    document_from_stored(&stored)
}

/// Load a document from a JSON file.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Document, StorageError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), bytes = json.len(), "reading stored document");
    document_from_json(&json)
}

/// Write a document to a JSON file.
pub fn save_to_path(doc: &Document, path: impl AsRef<Path>) -> Result<(), StorageError> {
    let path = path.as_ref();
    let json = document_to_json_pretty(doc)?;
    fs::write(path, &json)?;
    tracing::debug!(path = %path.display(), bytes = json.len(), "wrote stored document");
    Ok(())
}
