//! Tag dispatch registry.
//!
//! Maps HTML tag names to the closed set of renderings this writer knows.
//! Names that are not registered are rendered transparently by the
//! traversal: their children are kept, no markup is added.

use std::collections::HashMap;

use html2typst_core::Node;
use once_cell::sync::Lazy;

use crate::compose::{Fragment, Layout, Role};
use crate::context::{ListKind, RenderContext};

/// Kind of embedded media.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Audio,
}

/// A registered rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Heading(u8),
    Paragraph,
    /// Generic block container.
    Container,
    /// `<center>`: a container that centres its content.
    Center,
    /// Semantic section (`header`, `nav`, ...), optionally announced by a comment.
    Section,
    Rule,
    LineBreak,
    Blockquote,
    Preformatted,
    Details,
    Summary,

    /// Styleable inline wrapper with no markup of its own.
    Span,
    /// `<font>`: like `Span`, with legacy `color`/`size` attributes.
    Font,
    Strong,
    Emphasis,
    Underline,
    Strike,
    Highlight,
    Superscript,
    Subscript,
    Small,
    InlineQuote,
    Code,
    Keyboard,
    Link,
    Image,

    UnorderedList,
    OrderedList,
    ListItem,
    DescriptionList,
    Term,
    Definition,

    Figure,
    Caption,
    Media(MediaKind),

    Table,
    TableRow,
    TableCell { header: bool },

    /// Known element with no markup; children are spliced into the parent.
    Transparent,
    /// Non-content element; nothing is rendered.
    Omit,
}

static REGISTRY: Lazy<HashMap<&'static str, Tag>> = Lazy::new(|| {
    HashMap::from([
        ("h1", Tag::Heading(1)),
        ("h2", Tag::Heading(2)),
        ("h3", Tag::Heading(3)),
        ("h4", Tag::Heading(4)),
        ("h5", Tag::Heading(5)),
        ("h6", Tag::Heading(6)),
        ("p", Tag::Paragraph),
        ("div", Tag::Container),
        ("fieldset", Tag::Container),
        ("form", Tag::Container),
        ("hgroup", Tag::Container),
        ("center", Tag::Center),
        ("header", Tag::Section),
        ("footer", Tag::Section),
        ("main", Tag::Section),
        ("section", Tag::Section),
        ("article", Tag::Section),
        ("aside", Tag::Section),
        ("nav", Tag::Section),
        ("address", Tag::Section),
        ("hr", Tag::Rule),
        ("br", Tag::LineBreak),
        ("blockquote", Tag::Blockquote),
        ("pre", Tag::Preformatted),
        ("details", Tag::Details),
        ("summary", Tag::Summary),
        ("span", Tag::Span),
        ("font", Tag::Font),
        ("strong", Tag::Strong),
        ("b", Tag::Strong),
        ("em", Tag::Emphasis),
        ("i", Tag::Emphasis),
        ("cite", Tag::Emphasis),
        ("var", Tag::Emphasis),
        ("dfn", Tag::Emphasis),
        ("u", Tag::Underline),
        ("ins", Tag::Underline),
        ("s", Tag::Strike),
        ("strike", Tag::Strike),
        ("del", Tag::Strike),
        ("mark", Tag::Highlight),
        ("sup", Tag::Superscript),
        ("sub", Tag::Subscript),
        ("small", Tag::Small),
        ("q", Tag::InlineQuote),
        ("code", Tag::Code),
        ("samp", Tag::Code),
        ("tt", Tag::Code),
        ("kbd", Tag::Keyboard),
        ("a", Tag::Link),
        ("img", Tag::Image),
        ("ul", Tag::UnorderedList),
        ("menu", Tag::UnorderedList),
        ("ol", Tag::OrderedList),
        ("li", Tag::ListItem),
        ("dl", Tag::DescriptionList),
        ("dt", Tag::Term),
        ("dd", Tag::Definition),
        ("figure", Tag::Figure),
        ("figcaption", Tag::Caption),
        ("caption", Tag::Caption),
        ("video", Tag::Media(MediaKind::Video)),
        ("audio", Tag::Media(MediaKind::Audio)),
        ("table", Tag::Table),
        ("tr", Tag::TableRow),
        ("td", Tag::TableCell { header: false }),
        ("th", Tag::TableCell { header: true }),
        ("html", Tag::Transparent),
        ("body", Tag::Transparent),
        ("thead", Tag::Transparent),
        ("tbody", Tag::Transparent),
        ("tfoot", Tag::Transparent),
        ("colgroup", Tag::Omit),
        ("abbr", Tag::Transparent),
        ("acronym", Tag::Transparent),
        ("time", Tag::Transparent),
        ("bdi", Tag::Transparent),
        ("bdo", Tag::Transparent),
        ("data", Tag::Transparent),
        ("label", Tag::Transparent),
        ("picture", Tag::Transparent),
        ("head", Tag::Omit),
        ("noscript", Tag::Omit),
        ("script", Tag::Omit),
        ("style", Tag::Omit),
        ("template", Tag::Omit),
        ("source", Tag::Omit),
        ("track", Tag::Omit),
    ])
});

/// Look up the rendering for a tag name.
pub fn lookup(tag: &str) -> Option<Tag> {
    REGISTRY.get(tag).copied().or_else(|| {
        tag.bytes()
            .any(|b| b.is_ascii_uppercase())
            .then(|| REGISTRY.get(tag.to_ascii_lowercase().as_str()).copied())
            .flatten()
    })
}

impl Tag {
    /// Whether the rendering stands on its own lines.
    pub fn layout(self) -> Layout {
        match self {
            Tag::Heading(_)
            | Tag::Paragraph
            | Tag::Container
            | Tag::Center
            | Tag::Section
            | Tag::Rule
            | Tag::Blockquote
            | Tag::Preformatted
            | Tag::Details
            | Tag::Summary
            | Tag::UnorderedList
            | Tag::OrderedList
            | Tag::ListItem
            | Tag::DescriptionList
            | Tag::Term
            | Tag::Definition
            | Tag::Figure
            | Tag::Caption
            | Tag::Media(_)
            | Tag::Table
            | Tag::TableRow => Layout::Block,
            _ => Layout::Inline,
        }
    }

    /// Whether children of this element are copied verbatim.
    pub fn is_verbatim(self) -> bool {
        matches!(self, Tag::Preformatted | Tag::Code | Tag::Keyboard)
    }

    /// Whether the handler applies the element's style itself, inside its
    /// own markup (list markers, cell brackets, row cells), instead of the
    /// traversal wrapping the whole rendering.
    pub fn styles_inside(self) -> bool {
        matches!(self, Tag::ListItem | Tag::TableRow | Tag::TableCell { .. })
    }

    /// Context the element's children render in.
    pub fn child_context(self, element: &Node, ctx: RenderContext) -> RenderContext {
        match self {
            Tag::UnorderedList => ctx.enter_list(ListKind::Unordered, 1, false),
            Tag::OrderedList => {
                let reversed = element.attrs.contains("reversed");
                let start = element
                    .attrs
                    .get("start")
                    .and_then(|s| s.trim().parse::<i64>().ok())
                    .map(|s| s.max(0) as u64)
                    .unwrap_or_else(|| {
                        if reversed {
                            count_items(element)
                        } else {
                            1
                        }
                    });
                ctx.enter_list(ListKind::Ordered, start, reversed)
            }
            Tag::Table => ctx.enter_table(),
            tag if tag.is_verbatim() => ctx.enter_verbatim(),
            _ => ctx,
        }
    }

    /// Context the next sibling renders in, after this element rendered
    /// `fragment` in `ctx`.
    pub fn advance(self, ctx: RenderContext, fragment: &Fragment) -> RenderContext {
        match (self, &fragment.role) {
            (Tag::ListItem, _) => ctx.next_item(),
            (Tag::TableRow, Role::Row(cells)) if !cells.is_empty() => {
                ctx.next_row(cells.iter().map(|cell| cell.colspan).sum())
            }
            _ => ctx,
        }
    }
}

/// Number of list items belonging to a list, looking through unknown wrappers
/// but not into nested lists.
fn count_items(list: &Node) -> u64 {
    list.children
        .iter()
        .map(|child| match child.tag() {
            Some("li") => 1,
            Some("ul" | "ol" | "menu") | None => 0,
            Some(_) => count_items(child),
        })
        .sum()
}
