//! html2typst-core: the tree that sits between the HTML reader and the
//! Typst writer.
//!
//! This crate provides the parsed node tree, document metadata, fidelity
//! warnings, conversion options, and the reader/writer traits shared by the
//! rest of the workspace.

mod attributes;
mod document;
mod fidelity;
mod node;
mod traits;

pub use attributes::*;
pub use document::*;
pub use fidelity::*;
pub use node::*;
pub use traits::*;
