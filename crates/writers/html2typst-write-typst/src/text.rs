//! Text normalization: entity decoding, whitespace collapsing, escaping.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::context::RenderContext;
use crate::escape::escape_text;

/// Runs of HTML whitespace. U+00A0 is not HTML whitespace and survives.
static HTML_SPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t\n\r\x0C]+").expect("valid whitespace pattern"));

/// ASCII whitespace as HTML defines it.
pub fn is_html_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

/// Trim HTML whitespace from both ends, keeping non-breaking spaces.
pub fn trim_html_space(s: &str) -> &str {
    s.trim_matches(is_html_space)
}

/// Whether `s` is empty or only HTML whitespace.
pub fn is_blank(s: &str) -> bool {
    s.chars().all(is_html_space)
}

/// Decode character references (`&amp;`, `&#169;`, `&nbsp;`, ...).
pub fn decode_entities(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }
    html_escape::decode_html_entities(s)
}

/// Collapse each run of HTML whitespace to one space.
pub fn collapse_whitespace(s: &str) -> Cow<'_, str> {
    HTML_SPACE_RUN.replace_all(s, " ")
}

/// Prepare a text payload for output.
///
/// Outside verbatim context the payload is decoded (if still encoded),
/// whitespace-collapsed, and escaped. Inside verbatim context it is emitted
/// exactly as given.
pub fn normalize(payload: &str, encoded: bool, ctx: RenderContext) -> String {
    if ctx.verbatim {
        return payload.to_string();
    }
    let decoded = if encoded {
        decode_entities(payload)
    } else {
        Cow::Borrowed(payload)
    };
    let collapsed = collapse_whitespace(&decoded);
    escape_text(&collapsed).into_owned()
}
