//! Reader and Writer traits, options, and errors.

use crate::{ConversionResult, Document};

/// Options for converting a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Emit a `// NAME` comment before semantic sections (`header`, `nav`, ...).
    pub section_comments: bool,
    /// Emit a `// Video: src` style comment for media elements.
    pub media_comments: bool,
    /// Emit a `#set document(...)` preamble from document metadata.
    pub document_metadata: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            section_comments: true,
            media_comments: true,
            document_metadata: true,
        }
    }
}

/// Error during parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse a source format into a document tree.
pub trait Reader: Send + Sync {
    /// Format this reader handles.
    fn format(&self) -> &str;

    /// Parse text into a document.
    fn read(&self, input: &str) -> Result<ConversionResult<Document>, ParseError>;
}

/// Render a document tree to a target format.
///
/// Writers are total: every tree has a rendering.
pub trait Writer: Send + Sync {
    /// Format this writer produces.
    fn format(&self) -> &str;

    /// Render a document.
    fn write(&self, doc: &Document, options: &ConvertOptions) -> ConversionResult<String>;
}
