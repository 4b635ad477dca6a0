//! `#set document(...)` from the source head.

use html2typst_core::Metadata;

use crate::escape::quote_string;

/// The preamble line, or `None` when there is nothing to declare.
pub(crate) fn document_preamble(metadata: &Metadata) -> Option<String> {
    if metadata.is_empty() {
        return None;
    }

    let mut args = Vec::new();
    if let Some(title) = &metadata.title {
        args.push(format!("title: {}", quote_string(title)));
    }
    match metadata.authors.as_slice() {
        [] => {}
        [author] => args.push(format!("author: {}", quote_string(author))),
        authors => args.push(format!("author: {}", string_array(authors))),
    }
    if let Some(description) = &metadata.description {
        args.push(format!("description: {}", quote_string(description)));
    }
    if !metadata.keywords.is_empty() {
        args.push(format!("keywords: {}", string_array(&metadata.keywords)));
    }

    Some(format!("#set document({})", args.join(", ")))
}

/// A Typst array of strings. One element needs a trailing comma.
fn string_array(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| quote_string(item)).collect();
    if quoted.len() == 1 {
        format!("({},)", quoted[0])
    } else {
        format!("({})", quoted.join(", "))
    }
}
