use html2typst_core::Node;

use super::Scope;
use super::inline::{raw_text, strong_markup};
use crate::compose::{Fragment, compose_flow, indent_lines};
use crate::text::{is_html_space, trim_html_space};

pub(super) fn heading(level: u8, children: &[Fragment]) -> Fragment {
    let content = compose_flow(children);
    if content.is_empty() {
        return Fragment::block("");
    }
    if content.contains('\n') {
        return Fragment::block(format!("#heading(level: {level})[{content}]"));
    }
    Fragment::block(format!("{} {content}", "=".repeat(usize::from(level))))
}

pub(super) fn container(children: &[Fragment]) -> Fragment {
    Fragment::block(compose_flow(children))
}

/// A semantic section, announced by a `// TAG` comment when enabled.
pub(super) fn section(element: &Node, children: &[Fragment], scope: &mut Scope<'_>) -> Fragment {
    let content = compose_flow(children);
    if content.is_empty() || !scope.options.section_comments {
        return Fragment::block(content);
    }
    let name = element.tag().unwrap_or_default().to_ascii_uppercase();
    Fragment::block(format!("// {name}\n{content}"))
}

pub(super) fn rule() -> Fragment {
    Fragment::block("#line(length: 100%)")
}

pub(super) fn blockquote(children: &[Fragment]) -> Fragment {
    let content = compose_flow(children);
    if content.is_empty() {
        return Fragment::block("");
    }
    Fragment::block(format!(
        "#quote(block: true)[\n{}\n]",
        indent_lines(&content, "  ")
    ))
}

/// A fenced raw block. The fence is longer than any backtick run inside.
pub(super) fn preformatted(element: &Node, children: &[Fragment]) -> Fragment {
    let raw = raw_text(children);
    let raw = raw
        .strip_prefix("\r\n")
        .or_else(|| raw.strip_prefix('\n'))
        .unwrap_or(&raw);
    let body = raw.trim_end_matches(is_html_space);
    if trim_html_space(body).is_empty() {
        return Fragment::block("");
    }

    let longest_run = body
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat((longest_run + 1).max(3));
    let lang = code_language(element).unwrap_or_default();
    Fragment::block(format!("{fence}{lang}\n{body}\n{fence}"))
}

/// Language named by a `language-*` or `lang-*` class on the `pre` or on
/// its first `code` child.
fn code_language(pre: &Node) -> Option<String> {
    let code = pre.children.iter().find(|child| child.tag().is_some());
    std::iter::once(pre)
        .chain(code.filter(|c| c.is_element("code")))
        .filter_map(|node| node.attrs.get("class"))
        .flat_map(str::split_ascii_whitespace)
        .find_map(|class| {
            class
                .strip_prefix("language-")
                .or_else(|| class.strip_prefix("lang-"))
        })
        .map(|lang| {
            lang.chars()
                .filter(|c| c.is_ascii_alphanumeric() || "+-_#.".contains(*c))
                .collect::<String>()
        })
        .filter(|lang| !lang.is_empty())
}

pub(super) fn summary(children: &[Fragment]) -> Fragment {
    let content = compose_flow(children);
    if content.is_empty() {
        return Fragment::block("");
    }
    Fragment::block(strong_markup(&content))
}
