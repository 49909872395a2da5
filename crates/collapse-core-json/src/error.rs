use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while reading or writing stored documents.
pub enum StorageError {
    #[error("JSON error: {0}")]
    /// JSON (de)serialization failed.
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    /// Filesystem I/O failed.
    Io(#[from] std::io::Error),

    #[error("node without a tag at {0}")]
    /// A stored node had an empty `tag`; the payload is the node's path in the document.
    EmptyTag(String),

    #[error("unsupported document format version {0}")]
    /// The stored document was written by a newer format.
    UnsupportedVersion(u32),
}
