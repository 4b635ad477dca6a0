//! Typst escaping.
//!
//! Markup text and string literals have different metacharacters. Both
//! escapers borrow their input when nothing needs escaping.

use std::borrow::Cow;

/// Characters that carry meaning in Typst markup.
///
/// Some of these only matter at the start of a line (`=`, `-`, `+`, `/`), or
/// in pairs (`//`, `--`); they are escaped everywhere because text nodes do not
/// know where their lines start. Straight quotes would otherwise become
/// typographic ones.
const MARKUP_META: &[char] = &[
    '\\', '*', '_', '`', '$', '#', '@', '<', '>', '[', ']', '~', '=', '-', '+', '/', '"',
    '\'',
];

/// Whether `c` needs a backslash in Typst markup.
pub fn is_markup_meta(c: char) -> bool {
    MARKUP_META.contains(&c)
}

/// Escape text for Typst markup.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.contains(MARKUP_META) {
        return Cow::Borrowed(text);
    }
    let mut result = String::with_capacity(text.len() + text.len() / 4);
    for c in text.chars() {
        if is_markup_meta(c) {
            result.push('\\');
        }
        result.push(c);
    }
    Cow::Owned(result)
}

/// Escape text for the inside of a Typst string literal.
pub fn escape_string(text: &str) -> Cow<'_, str> {
    if !text.contains(['\\', '"', '\n', '\r', '\t']) {
        return Cow::Borrowed(text);
    }
    let mut result = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Quote `text` as a Typst string literal.
pub fn quote_string(text: &str) -> String {
    format!("\"{}\"", escape_string(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_borrowed() {
        assert!(matches!(escape_text("Hello, world."), Cow::Borrowed(_)));
        assert!(matches!(escape_string("https://x.org"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_markup_metacharacters() {
        assert_eq!(escape_text("#set"), "\\#set");
        assert_eq!(escape_text("a*b_c"), "a\\*b\\_c");
        assert_eq!(escape_text("$5 @me"), "\\$5 \\@me");
        assert_eq!(escape_text("[x] <y>"), "\\[x\\] \\<y\\>");
        assert_eq!(escape_text("`code`"), "\\`code\\`");
        assert_eq!(escape_text("a~b"), "a\\~b");
        assert_eq!(escape_text("C:\\dir"), "C:\\\\dir");
    }

    #[test]
    fn test_line_start_markers() {
        assert_eq!(escape_text("= not a heading"), "\\= not a heading");
        assert_eq!(escape_text("- not a list"), "\\- not a list");
        assert_eq!(escape_text("+ not enum"), "\\+ not enum");
        assert_eq!(escape_text("http://x"), "http:\\/\\/x");
    }

    #[test]
    fn test_straight_quotes_stay_straight() {
        assert_eq!(escape_text("it's \"fine\""), "it\\'s \\\"fine\\\"");
    }

    #[test]
    fn test_one_to_one() {
        let input = "*#_";
        let escaped = escape_text(input);
        assert_eq!(escaped.chars().filter(|&c| c == '\\').count(), 3);
    }

    #[test]
    fn test_unicode_untouched() {
        assert_eq!(escape_text("café – naïve \u{a0}✓"), "café – naïve \u{a0}✓");
    }

    #[test]
    fn test_string_literal() {
        assert_eq!(escape_string(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape_string("a\\b"), "a\\\\b");
        assert_eq!(escape_string("line\nbreak"), "line\\nbreak");
        assert_eq!(quote_string("fig.png"), "\"fig.png\"");
    }
}
