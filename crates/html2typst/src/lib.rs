//! html2typst - convert HTML into Typst markup.
//!
//! The conversion never fails on content: unknown elements keep their text,
//! unusable styles are dropped declaration by declaration, and table shape
//! problems are reported as warnings rather than errors.
//!
//! # Quick Start
//!
//! ```rust
//! let typst = html2typst::convert("<h1>Title</h1><p>A <strong>bold</strong> word.</p>");
//! assert_eq!(typst, "= Title\n\nA *bold* word.");
//! ```
//!
//! Use [`convert_with_options`] to tune the output and to see what was lost:
//!
//! ```rust
//! use html2typst::{ConvertOptions, WarningKind};
//!
//! let result = html2typst::convert_with_options("<foo>X</foo>", &ConvertOptions::default());
//! assert_eq!(result.value, "X");
//! assert!(matches!(&result.warnings[0].kind, WarningKind::UnknownElement(tag) if tag == "foo"));
//! ```
//!
//! # Architecture
//!
//! [`read`] parses HTML into a [`Document`] with html5ever. [`typst`]
//! renders that tree: children before parents, with an explicit render
//! context threaded from sibling to sibling.

pub use html2typst_core::*;

/// HTML reading.
pub mod read {
    pub use html2typst_read_html::{HtmlReader, parse};
}

/// Typst writing.
pub mod typst {
    pub use html2typst_write_typst::{
        TypstWriter, color, compose, context, emit, emit_with_options, escape, registry, style,
        text,
    };
}

/// Convert HTML to Typst with default options.
pub fn convert(html: &str) -> String {
    convert_with_options(html, &ConvertOptions::default()).value
}

/// Convert HTML to Typst, returning the warnings collected along the way.
///
/// Reader warnings come before writer warnings.
pub fn convert_with_options(html: &str, options: &ConvertOptions) -> ConversionResult<String> {
    let parsed = match html2typst_read_html::parse(html) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!(error = %err, "reader failed, converting input as plain text");
            let doc = Document::new().with_content(Node::document().child(Node::text(html)));
            ConversionResult::ok(doc).warn(FidelityWarning::new(
                Severity::Major,
                WarningKind::Recovered(err.to_string()),
                format!("could not parse input, converted it as plain text: {err}"),
            ))
        }
    };

    let ConversionResult {
        value: doc,
        mut warnings,
    } = parsed;
    let written = convert_document(&doc, options);
    warnings.extend(written.warnings);
    ConversionResult::with_warnings(written.value, warnings)
}

/// Render an already parsed document.
pub fn convert_document(doc: &Document, options: &ConvertOptions) -> ConversionResult<String> {
    html2typst_write_typst::emit_with_options(doc, options)
}
