//! Serialized shape of a document.

use serde::{Deserialize, Serialize};

/// Newest format version this crate writes and reads.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A stored document: the top-level blocks of a note.
pub struct StoredDocument {
    #[serde(default = "default_version")]
    /// Format version (defaults to 1).
    pub version: u32,

    #[serde(default)]
    /// Top-level blocks in order.
    pub blocks: Vec<StoredNode>,
}

fn default_version() -> u32 {
    FORMAT_VERSION
}

impl Default for StoredDocument {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            blocks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// One stored element.
pub struct StoredNode {
    /// Element tag (`h2`, `p`, `ul`, `img`, ...).
    pub tag: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    /// Class list, used to recognise wrapped blocks such as `figure.image`.
    pub class: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    /// Inline style, with marker sentinels embedded.
    pub style: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    /// The element's own text.
    pub text: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    /// Child elements in order.
    pub children: Vec<StoredNode>,
}

impl StoredNode {
    /// A node with just a tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Set the class list.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    /// Set the stored style.
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// Set the text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Append a child.
    pub fn with_child(mut self, child: StoredNode) -> Self {
        self.children.push(child);
        self
    }

    /// Whether the class list contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.class.split_whitespace().any(|c| c == class)
    }
}
