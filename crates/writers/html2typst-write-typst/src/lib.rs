//! Typst writer for html2typst.
//!
//! Renders the HTML node tree as Typst markup. Rendering is total: unknown
//! elements keep their content, unusable style declarations are dropped one
//! by one, and anything worth knowing about is reported as a
//! [`FidelityWarning`](html2typst_core::FidelityWarning) instead of an error.

pub mod color;
pub mod compose;
pub mod context;
pub mod escape;
pub mod registry;
pub mod style;
pub mod text;

mod handlers;
mod preamble;
mod render;

use html2typst_core::{ConversionResult, ConvertOptions, Document, Writer};

use crate::render::Renderer;

/// Emit a document as Typst.
pub fn emit(doc: &Document) -> ConversionResult<String> {
    emit_with_options(doc, &ConvertOptions::default())
}

/// Emit a document as Typst with custom options.
pub fn emit_with_options(doc: &Document, options: &ConvertOptions) -> ConversionResult<String> {
    let result = Renderer::new(options).render(&doc.content);
    if !options.document_metadata {
        return result;
    }
    match preamble::document_preamble(&doc.metadata) {
        Some(preamble) if result.value.is_empty() => result.map(|_| preamble),
        Some(preamble) => result.map(|body| format!("{preamble}\n\n{body}")),
        None => result,
    }
}

/// [`Writer`] producing Typst.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypstWriter;

impl Writer for TypstWriter {
    fn format(&self) -> &str {
        "typst"
    }

    fn write(&self, doc: &Document, options: &ConvertOptions) -> ConversionResult<String> {
        emit_with_options(doc, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use html2typst_core::{Metadata, Node};
    use pretty_assertions::assert_eq;

    fn doc(children: impl IntoIterator<Item = Node>) -> Document {
        Document::new().with_content(Node::document().children(children))
    }

    fn el(tag: &str, text: &str) -> Node {
        Node::element(tag).child(Node::text(text))
    }

    #[test]
    fn test_emit_paragraphs() {
        let result = emit(&doc([el("p", "One"), el("p", "Two")]));
        assert_eq!(result.value, "One\n\nTwo");
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_metadata_preamble() {
        let document = doc([el("p", "Body")]).with_metadata(Metadata {
            title: Some("Report".into()),
            ..Metadata::default()
        });
        assert_eq!(
            emit(&document).value,
            "#set document(title: \"Report\")\n\nBody"
        );

        let options = ConvertOptions {
            document_metadata: false,
            ..ConvertOptions::default()
        };
        assert_eq!(emit_with_options(&document, &options).value, "Body");
    }

    #[test]
    fn test_writer_trait() {
        let writer = TypstWriter;
        assert_eq!(writer.format(), "typst");
        let result = writer.write(&doc([el("em", "x")]), &ConvertOptions::default());
        assert_eq!(result.value, "_x_");
    }

    #[test]
    fn test_encoded_text_is_decoded_once() {
        let document = doc([Node::element("p").child(Node::encoded_text("a &amp;amp; b &lt;c&gt;"))]);
        assert_eq!(emit(&document).value, "a &amp; b \\<c\\>");
    }

    #[test]
    fn test_figure_with_image_and_caption() {
        let document = doc([Node::element("figure").children([
            Node::element("img").attr("src", "fig.png"),
            el("figcaption", "Figure caption"),
        ])]);
        assert_eq!(
            emit(&document).value,
            "#figure(\n  [#image(\"fig.png\")],\n  caption: [Figure caption],\n)"
        );
    }

    #[test]
    fn test_justified_paragraph_keeps_nbsp() {
        let document = doc([Node::element("p")
            .attr("style", "text-align: justify")
            .child(Node::text("a\u{a0}b"))]);
        assert_eq!(
            emit(&document).value,
            "#par(justify: true)[a\u{a0}b]"
        );
    }
}
