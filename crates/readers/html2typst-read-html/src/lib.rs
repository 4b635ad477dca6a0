//! HTML reader for html2typst.
//!
//! Parses HTML5 with html5ever into the html2typst node tree. The tree keeps
//! every element with its tag name and ordered attributes; interpreting them
//! is left to the writer. Character references are decoded by the parser,
//! comments and doctypes are dropped, and the `<head>` becomes
//! [`Metadata`](html2typst_core::Metadata).

use html2typst_core::{ConversionResult, Document, Node, NodeKind, ParseError, Reader};

mod html5ever_backend;

pub use html5ever_backend::parse;

/// [`Reader`] for HTML input.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlReader;

impl Reader for HtmlReader {
    fn format(&self) -> &str {
        "html"
    }

    fn read(&self, input: &str) -> Result<ConversionResult<Document>, ParseError> {
        parse(input)
    }
}

/// Merge adjacent text nodes and drop empty ones.
pub(crate) fn merge_text_nodes(nodes: &mut Vec<Node>) {
    let mut i = 0;
    while i < nodes.len() {
        if let NodeKind::Text(content) = &nodes[i].kind
            && content.is_empty()
        {
            nodes.remove(i);
            continue;
        }

        if i + 1 < nodes.len()
            && let (NodeKind::Text(current), NodeKind::Text(next)) =
                (&nodes[i].kind, &nodes[i + 1].kind)
        {
            let merged = format!("{current}{next}");
            nodes[i] = Node::text(merged);
            nodes.remove(i + 1);
            continue;
        }

        i += 1;
    }
}
