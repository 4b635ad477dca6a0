//! Fragments and how they are put together.
//!
//! Every rendered node yields [`Fragment`]s. A parent joins its children's
//! fragments as a flow: adjacent inline fragments are concatenated into a run,
//! and runs and block fragments are separated by exactly one blank line.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::style::{Alignment, Setting, StyleIntent};
use crate::text::{is_blank, is_html_space, trim_html_space};

/// Whether a fragment flows with its neighbours or stands on its own lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Block,
    Inline,
}

/// One table cell, before it is bracketed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub content: String,
    pub header: bool,
    pub colspan: usize,
}

/// What a fragment is to its parent, beyond its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Content,
    /// Delimiter markup such as `*x*`, with the equivalent function call for
    /// positions where a delimiter would touch a word character.
    Delimited { function: String },
    LineBreak,
    List,
    ListItem,
    Term,
    Definition,
    Caption,
    Row(Vec<Cell>),
    Cell(Cell),
}

/// Rendered output of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    pub layout: Layout,
    pub role: Role,
}

impl Fragment {
    pub fn inline(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            layout: Layout::Inline,
            role: Role::Content,
        }
    }

    pub fn block(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            layout: Layout::Block,
            role: Role::Content,
        }
    }

    /// An inline fragment with no text.
    pub fn empty() -> Self {
        Self::inline(String::new())
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        is_blank(&self.text)
    }
}

/// What a flow part came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    /// A run of inline fragments.
    Run,
    /// A list; list lines carry their own indentation.
    List,
    Block,
}

/// One paragraph-level piece of a flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub text: String,
    pub kind: PartKind,
}

/// Join fragments as a flow.
pub fn compose_flow(fragments: &[Fragment]) -> String {
    flow_parts(fragments)
        .into_iter()
        .map(|part| part.text)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Join the children of an inline element.
///
/// Unlike [`compose_flow`], surrounding whitespace is kept so the caller can
/// move it outside its own markup. Children that include blocks fall back to
/// a flow.
pub fn compose_inline(fragments: &[Fragment]) -> String {
    if fragments.iter().any(|f| f.layout == Layout::Block) {
        return compose_flow(fragments);
    }
    let mut run = String::new();
    for (i, fragment) in fragments.iter().enumerate() {
        push_inline(&mut run, fragment, fragments.get(i + 1));
    }
    run
}

/// Split fragments into paragraph-level parts.
///
/// Runs are trimmed of surrounding whitespace; blank runs and empty blocks
/// are dropped.
pub fn flow_parts(fragments: &[Fragment]) -> Vec<Part> {
    let mut parts = Vec::new();
    let mut run = String::new();

    for (i, fragment) in fragments.iter().enumerate() {
        match fragment.layout {
            Layout::Inline => {
                let next = fragments
                    .get(i + 1)
                    .filter(|next| next.layout == Layout::Inline);
                push_inline(&mut run, fragment, next);
            }
            Layout::Block => {
                flush_run(&mut run, &mut parts);
                let text = fragment.text.trim_matches(['\n', '\r']);
                if !is_blank(text) {
                    let kind = match fragment.role {
                        Role::List => PartKind::List,
                        _ => PartKind::Block,
                    };
                    parts.push(Part {
                        text: text.to_string(),
                        kind,
                    });
                }
            }
        }
    }
    flush_run(&mut run, &mut parts);

    parts
}

fn push_inline(run: &mut String, fragment: &Fragment, next: Option<&Fragment>) {
    let text: &str = match &fragment.role {
        Role::Delimited { function } if touches_word(run, &fragment.text, next) => function,
        _ => &fragment.text,
    };

    if fragment.role == Role::LineBreak {
        let kept = run.trim_end_matches(' ').len();
        run.truncate(kept);
        run.push_str(text);
        return;
    }

    let text = if run.ends_with([' ', '\n']) {
        text.trim_start_matches(' ')
    } else {
        text
    };
    if ends_in_call(run) && continues_call(text) {
        run.push('\\');
    }
    run.push_str(text);
}

/// Whether `run` ends in the unescaped closing bracket of an embedded
/// expression such as `#link("..")[..]` or `#image("..")`.
fn ends_in_call(run: &str) -> bool {
    run.strip_suffix([']', ')'])
        .is_some_and(|rest| !ends_in_escape(rest))
}

/// Whether `text` placed right after an expression would be read as more
/// arguments or a field access.
fn continues_call(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some('(' | '[') => true,
        Some('.') => chars.next().is_some_and(|c| c.is_alphabetic() || c == '_'),
        _ => false,
    }
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric()
}

/// Whether delimiter markup in `text` would sit directly against a word
/// character of a neighbour, where Typst reads it as a literal.
fn touches_word(run: &str, text: &str, next: Option<&Fragment>) -> bool {
    let before = run.chars().next_back().is_some_and(is_word) && !text.starts_with(is_html_space);
    let after = next
        .and_then(|n| n.text.chars().next())
        .is_some_and(is_word)
        && !text.ends_with(is_html_space);
    before || after
}

/// A line starting with `12. ` would be read as an enumeration item.
static ENUM_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^([ \t]*\d+)\.(\s|$)").expect("valid enum marker pattern"));

fn flush_run(run: &mut String, parts: &mut Vec<Part>) {
    let mut text = trim_html_space(run);
    if ends_with_break_marker(text) {
        text = text[..text.len() - 1].trim_end_matches(is_html_space);
    }
    if !text.is_empty() {
        parts.push(Part {
            text: ENUM_MARKER.replace_all(text, "${1}\\.${2}").into_owned(),
            kind: PartKind::Run,
        });
    }
    run.clear();
}

/// Whether `s` ends in a line break marker rather than an escaped backslash.
///
/// Escapes come in pairs, so an odd run of trailing backslashes ends with
/// the `\` of a line break whose newline has been trimmed.
fn ends_with_break_marker(s: &str) -> bool {
    ends_in_escape(s)
}

/// Whether `s` ends in an odd run of backslashes, so the character that
/// follows it is escaped.
fn ends_in_escape(s: &str) -> bool {
    let backslashes = s.len() - s.trim_end_matches('\\').len();
    backslashes % 2 == 1
}

/// Split off leading and trailing whitespace: `(leading, core, trailing)`.
///
/// A line break at the end of the content is moved to the trailing part, so
/// wrapping the core never puts a closing delimiter right after its `\`.
pub fn chomp(s: &str) -> (&str, &str, &str) {
    let core_start = s.len() - s.trim_start_matches(is_html_space).len();
    let mut core_end = s.trim_end_matches(is_html_space).len();
    if core_start >= core_end {
        return (s, "", "");
    }
    if ends_with_break_marker(&s[..core_end]) {
        core_end = s[..core_end - 1].trim_end_matches(is_html_space).len();
        if core_start >= core_end {
            return (s, "", "");
        }
    }
    (&s[..core_start], &s[core_start..core_end], &s[core_end..])
}

/// Prefix every non-empty line with `prefix`.
pub fn indent_lines(s: &str, prefix: &str) -> String {
    s.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wrap rendered content in the markup its style asks for.
///
/// From the outside in: alignment (or justification), size, colour,
/// background. Alignment only applies to blocks.
pub fn apply_style(content: String, style: &StyleIntent, layout: Layout) -> String {
    if style.is_empty() || trim_html_space(&content).is_empty() {
        return content;
    }

    let mut out = content;
    if let Setting::Set(background) = style.background {
        out = format!("#highlight(fill: {background})[{out}]");
    }
    if let Setting::Set(color) = style.color {
        out = format!("#text(fill: {color})[{out}]");
    }
    if let Setting::Set(size) = style.font_size {
        out = format!("#text(size: {size})[{out}]");
    }
    if layout == Layout::Block {
        match style.align {
            Setting::Set(Alignment::Justify) => out = format!("#par(justify: true)[{out}]"),
            Setting::Set(align) => out = format!("#align({align})[{out}]"),
            Setting::Unset => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::style::FontScale;

    fn strong(core: &str) -> Fragment {
        Fragment::inline(format!("*{core}*")).with_role(Role::Delimited {
            function: format!("#strong[{core}]"),
        })
    }

    #[test]
    fn test_blocks_separated_by_one_blank_line() {
        let out = compose_flow(&[
            Fragment::block("= Title"),
            Fragment::inline("\n  "),
            Fragment::block("A paragraph."),
            Fragment::block(""),
            Fragment::block("- One\n- Two"),
        ]);
        assert_eq!(out, "= Title\n\nA paragraph.\n\n- One\n- Two");
    }

    #[test]
    fn test_inline_runs_concatenate() {
        let out = compose_flow(&[
            Fragment::inline(" A "),
            strong("bold"),
            Fragment::inline(" word. "),
        ]);
        assert_eq!(out, "A *bold* word.");
    }

    #[test]
    fn test_runs_between_blocks() {
        let out = compose_flow(&[
            Fragment::inline("before"),
            Fragment::block("#line(length: 100%)"),
            Fragment::inline("after"),
        ]);
        assert_eq!(out, "before\n\n#line(length: 100%)\n\nafter");
    }

    #[test]
    fn test_delimiter_inside_word_uses_function() {
        let out = compose_flow(&[Fragment::inline("un"), strong("bold"), Fragment::inline("ly")]);
        assert_eq!(out, "un#strong[bold]ly");

        let out = compose_flow(&[Fragment::inline("a "), strong("b"), Fragment::inline(", c")]);
        assert_eq!(out, "a *b*, c");
    }

    #[test]
    fn test_text_after_call_is_not_an_argument() {
        let out = compose_flow(&[
            Fragment::inline("x"),
            strong("y"),
            Fragment::inline("(z)"),
        ]);
        assert_eq!(out, "x#strong[y]\\(z)");

        let out = compose_flow(&[
            Fragment::inline("#link(\"https://e.org\")[example]"),
            Fragment::inline(".com"),
        ]);
        assert_eq!(out, "#link(\"https://e.org\")[example]\\.com");

        let out = compose_flow(&[
            Fragment::inline("#image(\"a.png\")"),
            Fragment::inline("(fig)"),
        ]);
        assert_eq!(out, "#image(\"a.png\")\\(fig)");
    }

    #[test]
    fn test_text_after_escaped_bracket_is_untouched() {
        let out = compose_flow(&[Fragment::inline("a\\]"), Fragment::inline("(b)")]);
        assert_eq!(out, "a\\](b)");

        let out = compose_flow(&[Fragment::inline("#super[2]"), Fragment::inline(". Next")]);
        assert_eq!(out, "#super[2]. Next");

        let out = compose_flow(&[Fragment::inline("#super[2]"), Fragment::inline(" (n)")]);
        assert_eq!(out, "#super[2] (n)");
    }

    #[test]
    fn test_line_break_trims_spaces() {
        let out = compose_flow(&[
            Fragment::inline("Line 1 "),
            Fragment::inline("\\\n").with_role(Role::LineBreak),
            Fragment::inline(" Line 2"),
        ]);
        assert_eq!(out, "Line 1\\\nLine 2");
    }

    #[test]
    fn test_enum_marker_at_line_start_is_escaped() {
        let out = compose_flow(&[Fragment::inline("1. Not a list")]);
        assert_eq!(out, "1\\. Not a list");

        let out = compose_flow(&[Fragment::inline("Version 1. Done")]);
        assert_eq!(out, "Version 1. Done");
    }

    #[test]
    fn test_nbsp_survives_trimming() {
        let out = compose_flow(&[Fragment::inline(" \u{a0} ")]);
        assert_eq!(out, "\u{a0}");
    }

    #[test]
    fn test_list_parts_are_marked() {
        let parts = flow_parts(&[
            Fragment::inline("item"),
            Fragment::block("  - nested").with_role(Role::List),
        ]);
        assert_eq!(parts[0].kind, PartKind::Run);
        assert_eq!(parts[1].kind, PartKind::List);
        assert_eq!(parts[1].text, "  - nested");
    }

    #[test]
    fn test_chomp() {
        assert_eq!(chomp("  a b "), ("  ", "a b", " "));
        assert_eq!(chomp("x"), ("", "x", ""));
        assert_eq!(chomp("   "), ("   ", "", ""));
        assert_eq!(chomp("\u{a0}"), ("", "\u{a0}", ""));
    }

    #[test]
    fn test_chomp_moves_line_break_out() {
        assert_eq!(chomp("a \\\n"), ("", "a", " \\\n"));
        assert_eq!(chomp("a\\\\"), ("", "a\\\\", ""));
        assert_eq!(chomp("\\\n"), ("\\\n", "", ""));
    }

    #[test]
    fn test_trailing_line_break_dropped_at_paragraph_end() {
        let out = compose_flow(&[
            Fragment::inline("end"),
            Fragment::inline("\\\n").with_role(Role::LineBreak),
        ]);
        assert_eq!(out, "end");
    }

    #[test]
    fn test_compose_inline_keeps_edges() {
        let out = compose_inline(&[Fragment::inline(" bold "), Fragment::inline(" x")]);
        assert_eq!(out, " bold x");
    }

    #[test]
    fn test_indent_lines() {
        assert_eq!(indent_lines("a\n\nb", "  "), "  a\n\n  b");
    }

    #[test]
    fn test_style_wrapper_order() {
        let style = StyleIntent {
            align: Setting::Set(Alignment::Center),
            color: Setting::Set(Rgb::new(255, 0, 0)),
            background: Setting::Unset,
            font_size: FontScale::new(1.25).into(),
        };
        assert_eq!(
            apply_style("Hi".into(), &style, Layout::Block),
            "#align(center)[#text(size: 1.25em)[#text(fill: rgb(255, 0, 0))[Hi]]]"
        );
        assert_eq!(
            apply_style("Hi".into(), &style, Layout::Inline),
            "#text(size: 1.25em)[#text(fill: rgb(255, 0, 0))[Hi]]"
        );
    }

    #[test]
    fn test_justify_and_background() {
        let style = StyleIntent {
            align: Setting::Set(Alignment::Justify),
            background: Setting::Set(Rgb::new(255, 255, 0)),
            ..StyleIntent::default()
        };
        assert_eq!(
            apply_style("Text".into(), &style, Layout::Block),
            "#par(justify: true)[#highlight(fill: rgb(255, 255, 0))[Text]]"
        );
    }

    #[test]
    fn test_no_wrapper_around_nothing() {
        let style = StyleIntent {
            color: Setting::Set(Rgb::new(0, 0, 0)),
            ..StyleIntent::default()
        };
        assert_eq!(apply_style(" ".into(), &style, Layout::Inline), " ");
        assert_eq!(
            apply_style("\u{a0}".into(), &style, Layout::Inline),
            "#text(fill: rgb(0, 0, 0))[\u{a0}]"
        );
    }
}
