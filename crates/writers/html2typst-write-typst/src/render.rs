//! Tree traversal.
//!
//! Children render before their parent. Siblings render left to right, each
//! in the context its predecessor left behind, so list ordinals and table
//! column counts flow forward without shared mutable state.

use html2typst_core::{
    ConversionResult, ConvertOptions, FidelityWarning, MAX_NESTING, Node, NodeKind, Severity,
    WarningKind,
};

use crate::compose::{Fragment, Layout, Role, apply_style, compose_flow};
use crate::context::RenderContext;
use crate::handlers::{self, Scope, implied_style};
use crate::registry::{Tag, lookup};
use crate::style::{StyleIntent, interpret};
use crate::text::{is_blank, normalize};

/// Traversal state for one conversion.
pub(crate) struct Renderer<'a> {
    options: &'a ConvertOptions,
    warnings: Vec<FidelityWarning>,
    /// Elements entered on the way to the current node.
    depth: usize,
}

impl<'a> Renderer<'a> {
    pub fn new(options: &'a ConvertOptions) -> Self {
        Self {
            options,
            warnings: Vec::new(),
            depth: 0,
        }
    }

    /// Render a whole tree to markup.
    pub fn render(mut self, root: &Node) -> ConversionResult<String> {
        let (fragments, _) = self.render_node(root, RenderContext::root());
        let output = compose_flow(&fragments);
        tracing::debug!(
            bytes = output.len(),
            warnings = self.warnings.len(),
            "rendered document"
        );
        ConversionResult::with_warnings(output, self.warnings)
    }

    /// Render a node in `ctx`. Returns its fragments and the context its
    /// next sibling renders in.
    fn render_node(&mut self, node: &Node, ctx: RenderContext) -> (Vec<Fragment>, RenderContext) {
        let tag = match &node.kind {
            NodeKind::Document => return self.render_children(&node.children, ctx),
            NodeKind::Text(text) => return (text_fragment(text, false, ctx), ctx),
            NodeKind::EncodedText(text) => return (text_fragment(text, true, ctx), ctx),
            NodeKind::Element(tag) => tag,
        };

        if self.depth >= MAX_NESTING {
            return (self.flatten(tag, node, ctx), ctx);
        }
        self.depth += 1;
        let rendered = self.render_tag(tag, node, ctx);
        self.depth -= 1;
        rendered
    }

    fn render_tag(
        &mut self,
        tag: &str,
        node: &Node,
        ctx: RenderContext,
    ) -> (Vec<Fragment>, RenderContext) {
        if ctx.verbatim {
            return self.render_verbatim(tag, node, ctx);
        }

        let Some(tag_kind) = lookup(tag) else {
            self.warn(
                Severity::Info,
                WarningKind::UnknownElement(tag.into()),
                format!("unknown element <{tag}> rendered as its content"),
            );
            return self.render_children(&node.children, ctx);
        };

        match tag_kind {
            Tag::Omit => {
                if !is_blank(&node.text_content()) {
                    self.warn(
                        Severity::Info,
                        WarningKind::OmittedElement(tag.into()),
                        format!("content of <{tag}> omitted"),
                    );
                }
                (Vec::new(), ctx)
            }
            Tag::Transparent => self.render_children(&node.children, ctx),
            _ => self.render_element(tag_kind, node, ctx),
        }
    }

    /// Inside preformatted or code content only text and line breaks count.
    fn render_verbatim(
        &mut self,
        tag: &str,
        node: &Node,
        ctx: RenderContext,
    ) -> (Vec<Fragment>, RenderContext) {
        match lookup(tag) {
            Some(Tag::LineBreak) => (vec![Fragment::inline("\n")], ctx),
            Some(Tag::Omit) => (Vec::new(), ctx),
            _ => self.render_children(&node.children, ctx),
        }
    }

    fn render_element(
        &mut self,
        tag: Tag,
        element: &Node,
        ctx: RenderContext,
    ) -> (Vec<Fragment>, RenderContext) {
        let mut style = self.read_style(element);
        implied_style(tag, element, &mut style);
        if matches!(tag, Tag::Span | Tag::Font) && !style.affects(Layout::Inline) {
            return self.render_children(&element.children, ctx);
        }

        let inner = tag.child_context(element, ctx);
        let (children, _) = self.render_children(&element.children, inner);

        let mut scope = Scope {
            ctx,
            inner,
            style,
            options: self.options,
            warnings: &mut self.warnings,
        };
        let mut fragment = handlers::render(tag, element, children, &mut scope);

        if !tag.styles_inside() && !style.is_empty() {
            let styled = apply_style(fragment.text.clone(), &style, tag.layout());
            if styled != fragment.text {
                fragment.text = styled;
                if matches!(fragment.role, Role::Delimited { .. } | Role::List) {
                    fragment.role = Role::Content;
                }
            }
        }

        let next = tag.advance(ctx, &fragment);
        (vec![fragment], next)
    }

    fn render_children(
        &mut self,
        children: &[Node],
        mut ctx: RenderContext,
    ) -> (Vec<Fragment>, RenderContext) {
        let mut fragments = Vec::new();
        for child in children {
            let (rendered, next) = self.render_node(child, ctx);
            fragments.extend(rendered);
            ctx = next;
        }
        (fragments, ctx)
    }

    /// Text of a subtree nested past [`MAX_NESTING`], as plain runs.
    fn flatten(&mut self, tag: &str, node: &Node, ctx: RenderContext) -> Vec<Fragment> {
        let depth = self.depth + 1;
        tracing::warn!(tag, depth, "nesting limit reached, keeping text only");
        self.warn(
            Severity::Minor,
            WarningKind::NestingLimit { depth },
            format!("<{tag}> nested {depth} elements deep; kept its text only"),
        );

        let mut fragments = Vec::new();
        let mut stack = vec![node];
        while let Some(node) = stack.pop() {
            match &node.kind {
                NodeKind::Text(text) => fragments.extend(text_fragment(text, false, ctx)),
                NodeKind::EncodedText(text) => fragments.extend(text_fragment(text, true, ctx)),
                NodeKind::Element(tag) if lookup(tag) == Some(Tag::Omit) => {}
                _ => stack.extend(node.children.iter().rev()),
            }
        }
        fragments
    }

    /// Interpret the `style` attribute, recording declarations that could
    /// not be used.
    fn read_style(&mut self, element: &Node) -> StyleIntent {
        let Some(style) = element.attrs.get("style") else {
            return StyleIntent::default();
        };
        let interpretation = interpret(style);
        for dropped in interpretation.dropped {
            let message = format!("dropped style {}: {}", dropped.property, dropped.value);
            self.warn(
                Severity::Info,
                WarningKind::DroppedStyle {
                    property: dropped.property,
                    value: dropped.value,
                },
                message,
            );
        }
        interpretation.intent
    }

    fn warn(&mut self, severity: Severity, kind: WarningKind, message: String) {
        tracing::debug!(?severity, "{message}");
        self.warnings
            .push(FidelityWarning::new(severity, kind, message));
    }
}

fn text_fragment(payload: &str, encoded: bool, ctx: RenderContext) -> Vec<Fragment> {
    let text = normalize(payload, encoded, ctx);
    if text.is_empty() {
        Vec::new()
    } else {
        vec![Fragment::inline(text)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(root: &Node) -> ConversionResult<String> {
        let options = ConvertOptions::default();
        Renderer::new(&options).render(root)
    }

    fn body(children: impl IntoIterator<Item = Node>) -> Node {
        Node::document().child(Node::element("body").children(children))
    }

    fn el(tag: &str, text: &str) -> Node {
        Node::element(tag).child(Node::text(text))
    }

    #[test]
    fn test_heading_paragraph_and_list() {
        let doc = body([
            el("h1", "Title"),
            Node::element("p").children([
                Node::text("A "),
                el("strong", "bold"),
                Node::text(" word."),
            ]),
            Node::element("ul").children([el("li", "One"), el("li", "Two")]),
        ]);
        assert_eq!(render(&doc).value, "= Title\n\nA *bold* word.\n\n- One\n- Two");
    }

    #[test]
    fn test_ordered_list_numbers_flow_across_siblings() {
        let doc = body([Node::element("ol").attr("start", "3").children([
            el("li", "c"),
            Node::text("\n"),
            el("li", "d"),
        ])]);
        assert_eq!(render(&doc).value, "3. c\n4. d");
    }

    #[test]
    fn test_nested_lists() {
        let doc = body([Node::element("ul").child(
            Node::element("li")
                .child(Node::text("Outer"))
                .child(Node::element("ol").child(el("li", "Inner"))),
        )]);
        assert_eq!(render(&doc).value, "- Outer\n  1. Inner");
    }

    #[test]
    fn test_unknown_element_is_transparent() {
        let doc = body([Node::element("p").child(el("my-widget", "inside"))]);
        let result = render(&doc);
        assert_eq!(result.value, "inside");
        assert_eq!(
            result.warnings[0].kind,
            WarningKind::UnknownElement("my-widget".into())
        );
        assert_eq!(result.warnings[0].severity, Severity::Info);
    }

    #[test]
    fn test_script_is_omitted() {
        let doc = body([el("script", "alert(1)"), el("p", "after")]);
        let result = render(&doc);
        assert_eq!(result.value, "after");
        assert_eq!(
            result.warnings[0].kind,
            WarningKind::OmittedElement("script".into())
        );
    }

    #[test]
    fn test_styled_paragraph() {
        let doc = body([Node::element("p")
            .attr("style", "color: #ff0000; text-align: center; font-size: 20px")
            .child(Node::text("Hi"))]);
        assert_eq!(
            render(&doc).value,
            "#align(center)[#text(size: 1.25em)[#text(fill: rgb(255, 0, 0))[Hi]]]"
        );
    }

    #[test]
    fn test_dropped_style_is_reported() {
        let doc = body([Node::element("p")
            .attr("style", "color: nonsense")
            .child(Node::text("x"))]);
        let result = render(&doc);
        assert_eq!(result.value, "x");
        assert_eq!(
            result.warnings[0].kind,
            WarningKind::DroppedStyle {
                property: "color".into(),
                value: "nonsense".into()
            }
        );
    }

    #[test]
    fn test_plain_span_splices() {
        let doc = body([Node::element("p").children([
            Node::text("un"),
            el("span", "bro"),
            Node::text("ken"),
        ])]);
        assert_eq!(render(&doc).value, "unbroken");
    }

    #[test]
    fn test_ineffective_span_keeps_delimiter_fallback() {
        let doc = body([Node::element("p").children([
            Node::element("font").child(el("b", "bold")),
            Node::text("ly"),
        ])]);
        assert_eq!(render(&doc).value, "#strong[bold]ly");

        let doc = body([Node::element("p").children([
            Node::element("span")
                .attr("style", "text-align: center")
                .child(el("b", "bold")),
            Node::text("ly"),
        ])]);
        assert_eq!(render(&doc).value, "#strong[bold]ly");
    }

    #[test]
    fn test_nesting_past_the_limit_keeps_text() {
        let mut node = Node::element("p").child(Node::encoded_text("a &amp; b"));
        for _ in 0..MAX_NESTING + 10 {
            node = Node::element("span").child(node);
        }
        let result = render(&body([node]));
        assert_eq!(result.value, "a & b");
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(
            result.warnings[0].kind,
            WarningKind::NestingLimit {
                depth: MAX_NESTING + 1
            }
        );
    }

    #[test]
    fn test_code_block_is_verbatim() {
        let doc = body([Node::element("pre").child(
            Node::element("code")
                .attr("class", "language-python")
                .child(Node::text("x = 1 # *not* markup\n")),
        )]);
        assert_eq!(
            render(&doc).value,
            "```python\nx = 1 # *not* markup\n```"
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let doc = body([el("p", "Price: $5 #1")]);
        assert_eq!(render(&doc).value, "Price: \\$5 \\#1");
    }

    #[test]
    fn test_table_rows_share_column_count() {
        let doc = body([Node::element("table").child(Node::element("tbody").children([
            Node::element("tr").children([el("th", "A"), el("th", "B")]),
            Node::element("tr").child(el("td", "1")),
        ]))]);
        let result = render(&doc);
        assert_eq!(
            result.value,
            "#table(\n  columns: 2,\n  [*A*], [*B*],\n  [1], [],\n)"
        );
        assert_eq!(
            result.warnings[0].kind,
            WarningKind::ColumnMismatch {
                row: 2,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_styled_strong_loses_delimiter_role() {
        let doc = body([Node::element("p").children([
            Node::text("x"),
            Node::element("strong")
                .attr("style", "color: red")
                .child(Node::text("y")),
        ])]);
        assert_eq!(render(&doc).value, "x#text(fill: rgb(255, 0, 0))[*y*]");
    }
}
