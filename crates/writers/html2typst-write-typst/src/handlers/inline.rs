//! Inline renderings: emphasis, code, links, and friends.

use html2typst_core::Node;

use crate::compose::{Fragment, Role, chomp, compose_inline};
use crate::escape::{escape_text, quote_string};

pub(super) fn line_break() -> Fragment {
    Fragment::inline("\\\n").with_role(Role::LineBreak)
}

pub(super) fn span(children: &[Fragment]) -> Fragment {
    Fragment::inline(compose_inline(children))
}

/// `*x*` / `_x_`, falling back to `#strong[x]` / `#emph[x]` where the
/// delimiters would not be recognised.
pub(super) fn delimited(marker: char, function: &str, children: &[Fragment]) -> Fragment {
    let content = compose_inline(children);
    let (lead, core, trail) = chomp(&content);
    if core.is_empty() {
        return Fragment::inline(content.clone());
    }

    let function_form = format!("{lead}#{function}[{core}]{trail}");
    if core.contains("\n\n") || core.starts_with(marker) || core.ends_with(marker) {
        return Fragment::inline(function_form);
    }

    Fragment::inline(format!("{lead}{marker}{core}{marker}{trail}")).with_role(Role::Delimited {
        function: function_form,
    })
}

/// `#name[x]`.
pub(super) fn function(name: &str, children: &[Fragment]) -> Fragment {
    let content = compose_inline(children);
    let (lead, core, trail) = chomp(&content);
    if core.is_empty() {
        return Fragment::inline(content.clone());
    }
    Fragment::inline(format!("{lead}#{name}[{core}]{trail}"))
}

/// Bold markup for content that is already rendered.
pub(super) fn strong_markup(content: &str) -> String {
    if content.contains("\n\n") || content.starts_with('*') || content.ends_with('*') {
        format!("#strong[{content}]")
    } else {
        format!("*{content}*")
    }
}

pub(super) fn quote(children: &[Fragment]) -> Fragment {
    let content = compose_inline(children);
    let (lead, core, trail) = chomp(&content);
    if core.is_empty() {
        return Fragment::inline(content.clone());
    }
    Fragment::inline(format!("{lead}\"{core}\"{trail}"))
}

/// Raw text of verbatim children.
pub(super) fn raw_text(children: &[Fragment]) -> String {
    children.iter().map(|f| f.text.as_str()).collect()
}

/// Inline raw text: `` `x` ``, or `#raw("x")` when x has a backtick or
/// spans lines.
pub(super) fn code(children: &[Fragment]) -> Fragment {
    Fragment::inline(raw_markup(&raw_text(children)))
}

fn raw_markup(raw: &str) -> String {
    if raw.is_empty() {
        String::new()
    } else if raw.contains(['`', '\n', '\r']) {
        format!("#raw({})", quote_string(raw))
    } else {
        format!("`{raw}`")
    }
}

pub(super) fn keyboard(children: &[Fragment]) -> Fragment {
    let raw = raw_markup(&raw_text(children));
    if raw.is_empty() {
        return Fragment::empty();
    }
    Fragment::inline(format!("#box(stroke: 0.5pt, inset: 2pt, radius: 2pt)[{raw}]"))
}

/// `#link("href")[x]`. Without a usable `href` only the content remains.
pub(super) fn link(element: &Node, children: &[Fragment]) -> Fragment {
    let content = compose_inline(children);
    let Some(href) = element.attrs.get_non_empty("href") else {
        return Fragment::inline(content);
    };

    let (lead, core, trail) = chomp(&content);
    let label = if core.is_empty() {
        escape_text(href)
    } else {
        core.into()
    };
    let lead = if core.is_empty() { "" } else { lead };
    Fragment::inline(format!("{lead}#link({})[{label}]{trail}", quote_string(href)))
}
