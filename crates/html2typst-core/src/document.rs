//! Document type - the root content node plus metadata.

use crate::Node;

/// A parsed document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Root content node.
    pub content: Node,
    /// Document-level metadata.
    pub metadata: Metadata,
}

/// Document-level metadata gathered from the source head.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub description: Option<String>,
    pub keywords: Vec<String>,
}

impl Metadata {
    /// Check if no metadata was found.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.authors.is_empty()
            && self.description.is_none()
            && self.keywords.is_empty()
    }
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            content: Node::document(),
            metadata: Metadata::default(),
        }
    }

    /// Set the root content node.
    pub fn with_content(mut self, content: Node) -> Self {
        self.content = content;
        self
    }

    /// Set document metadata.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
