use super::Scope;
use crate::compose::{
    Fragment, Layout, PartKind, Role, apply_style, compose_flow, flow_parts, indent_lines,
};
use crate::context::ListKind;
use crate::text::trim_html_space;

/// `ul`, `ol`, `menu`: one line per item. Items and nested lists carry their
/// own indentation.
pub(super) fn list(children: &[Fragment], scope: &mut Scope<'_>) -> Fragment {
    let indent = "  ".repeat(scope.inner.depth());
    let lines: Vec<String> = children
        .iter()
        .filter(|fragment| !fragment.is_blank())
        .map(|fragment| match fragment.role {
            Role::ListItem | Role::List => fragment.text.clone(),
            _ => indent_lines(trim_html_space(&fragment.text), &indent),
        })
        .collect();
    Fragment::block(lines.join("\n")).with_role(Role::List)
}

/// One list item: the marker line, then continuation blocks and nested lists.
pub(super) fn item(children: &[Fragment], scope: &mut Scope<'_>) -> Fragment {
    let frame = scope.ctx.list;
    let depth = frame.map_or(0, |frame| frame.depth);
    let marker = match frame {
        Some(frame) if frame.kind == ListKind::Ordered => format!("{}.", frame.ordinal),
        _ => "-".to_string(),
    };
    let indent = "  ".repeat(depth);
    let continuation = "  ".repeat(depth + 1);

    let mut out = format!("{indent}{marker}");
    let mut has_lead = false;
    for part in flow_parts(children) {
        if part.kind == PartKind::List {
            out.push('\n');
            out.push_str(&part.text);
            continue;
        }

        let text = apply_style(part.text, &scope.style, Layout::Block);
        if has_lead {
            out.push_str("\n\n");
            out.push_str(&indent_lines(&text, &continuation));
        } else {
            let mut lines = text.lines();
            if let Some(first) = lines.next() {
                out.push(' ');
                out.push_str(first);
            }
            for line in lines {
                out.push('\n');
                if !line.is_empty() {
                    out.push_str(&continuation);
                    out.push_str(line);
                }
            }
            has_lead = true;
        }
    }

    Fragment::block(out).with_role(Role::ListItem)
}

pub(super) fn description_list(children: &[Fragment]) -> Fragment {
    let lines: Vec<&str> = children
        .iter()
        .filter(|fragment| !fragment.is_blank())
        .map(|fragment| fragment.text.trim_matches('\n'))
        .collect();
    Fragment::block(lines.join("\n"))
}

/// `/ Term:`. Terms stay on one line.
pub(super) fn term(children: &[Fragment]) -> Fragment {
    let content = compose_flow(children);
    if content.is_empty() {
        return Fragment::block("");
    }
    Fragment::block(format!("/ {}:", content.replace('\n', " "))).with_role(Role::Term)
}

pub(super) fn definition(children: &[Fragment]) -> Fragment {
    let content = compose_flow(children);
    Fragment::block(indent_lines(&content, "  ")).with_role(Role::Definition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use html2typst_core::ConvertOptions;
    use pretty_assertions::assert_eq;

    use crate::context::RenderContext;
    use crate::style::{Setting, StyleIntent};

    fn render_item(ctx: RenderContext, children: &[Fragment]) -> String {
        render_item_styled(ctx, StyleIntent::default(), children)
    }

    fn render_item_styled(ctx: RenderContext, style: StyleIntent, children: &[Fragment]) -> String {
        let options = ConvertOptions::default();
        let mut warnings = Vec::new();
        let mut scope = Scope {
            ctx,
            inner: ctx,
            style,
            options: &options,
            warnings: &mut warnings,
        };
        item(children, &mut scope).text
    }

    #[test]
    fn test_bullet_and_numbered_markers() {
        let bullets = RenderContext::root().enter_list(ListKind::Unordered, 1, false);
        assert_eq!(render_item(bullets, &[Fragment::inline("One")]), "- One");

        let numbers = RenderContext::root().enter_list(ListKind::Ordered, 7, false);
        assert_eq!(render_item(numbers, &[Fragment::inline("Seven")]), "7. Seven");
    }

    #[test]
    fn test_nested_list_follows_marker_line() {
        let outer = RenderContext::root().enter_list(ListKind::Unordered, 1, false);
        let nested = Fragment::block("  - Inner").with_role(Role::List);
        assert_eq!(
            render_item(outer, &[Fragment::inline("Outer "), nested]),
            "- Outer\n  - Inner"
        );
    }

    #[test]
    fn test_item_continuation_blocks_are_indented() {
        let ctx = RenderContext::root().enter_list(ListKind::Unordered, 1, false);
        let out = render_item(
            ctx,
            &[Fragment::block("First"), Fragment::block("Second\nline")],
        );
        assert_eq!(out, "- First\n\n  Second\n  line");
    }

    #[test]
    fn test_empty_item_is_marker() {
        let ctx = RenderContext::root().enter_list(ListKind::Unordered, 1, false);
        assert_eq!(render_item(ctx, &[Fragment::inline(" ")]), "-");
    }

    #[test]
    fn test_item_style_wraps_content_not_marker() {
        let ctx = RenderContext::root().enter_list(ListKind::Unordered, 1, false);
        let style = StyleIntent {
            color: Setting::Set(crate::color::Rgb::new(0, 0, 255)),
            ..StyleIntent::default()
        };
        assert_eq!(
            render_item_styled(ctx, style, &[Fragment::inline("Blue")]),
            "- #text(fill: rgb(0, 0, 255))[Blue]"
        );
    }

    #[test]
    fn test_list_joins_items() {
        let options = ConvertOptions::default();
        let mut warnings = Vec::new();
        let ctx = RenderContext::root().enter_list(ListKind::Unordered, 1, false);
        let mut scope = Scope {
            ctx: RenderContext::root(),
            inner: ctx,
            style: StyleIntent::default(),
            options: &options,
            warnings: &mut warnings,
        };
        let items = [
            Fragment::inline("\n  "),
            Fragment::block("- One").with_role(Role::ListItem),
            Fragment::block("- Two").with_role(Role::ListItem),
        ];
        let out = list(&items, &mut scope);
        assert_eq!(out.text, "- One\n- Two");
        assert_eq!(out.role, Role::List);
    }

    #[test]
    fn test_description_list() {
        let out = description_list(&[
            term(&[Fragment::inline("Term")]),
            Fragment::inline(" "),
            definition(&[Fragment::inline("Meaning")]),
        ]);
        assert_eq!(out.text, "/ Term:\n  Meaning");
    }
}
