//! Per-tag renderings.
//!
//! Each handler receives the element, its children's fragments (already
//! rendered), and the scope it renders in, and returns one fragment.

mod block;
mod inline;
mod list;
mod media;
mod table;

use html2typst_core::{ConvertOptions, FidelityWarning, Node, Severity, WarningKind};

use crate::color::parse_color;
use crate::compose::{Fragment, compose_flow};
use crate::context::RenderContext;
use crate::registry::Tag;
use crate::style::{Alignment, FontScale, Setting, StyleIntent};

/// What a handler can see and record.
pub(crate) struct Scope<'a> {
    /// Context the element itself renders in.
    pub ctx: RenderContext,
    /// Context its children rendered in.
    pub inner: RenderContext,
    pub style: StyleIntent,
    pub options: &'a ConvertOptions,
    pub warnings: &'a mut Vec<FidelityWarning>,
}

impl Scope<'_> {
    pub fn warn(&mut self, severity: Severity, kind: WarningKind, message: String) {
        tracing::debug!(?severity, "{message}");
        self.warnings
            .push(FidelityWarning::new(severity, kind, message));
    }
}

/// Render an element through its registered handler.
pub(crate) fn render(
    tag: Tag,
    element: &Node,
    children: Vec<Fragment>,
    scope: &mut Scope<'_>,
) -> Fragment {
    match tag {
        Tag::Heading(level) => block::heading(level, &children),
        Tag::Paragraph | Tag::Container | Tag::Center | Tag::Details => {
            block::container(&children)
        }
        Tag::Section => block::section(element, &children, scope),
        Tag::Rule => block::rule(),
        Tag::Blockquote => block::blockquote(&children),
        Tag::Preformatted => block::preformatted(element, &children),
        Tag::Summary => block::summary(&children),

        Tag::LineBreak => inline::line_break(),
        Tag::Span | Tag::Font => inline::span(&children),
        Tag::Strong => inline::delimited('*', "strong", &children),
        Tag::Emphasis => inline::delimited('_', "emph", &children),
        Tag::Underline => inline::function("underline", &children),
        Tag::Strike => inline::function("strike", &children),
        Tag::Highlight => inline::function("highlight", &children),
        Tag::Superscript => inline::function("super", &children),
        Tag::Subscript => inline::function("sub", &children),
        Tag::Small => inline::function("text(size: 0.85em)", &children),
        Tag::InlineQuote => inline::quote(&children),
        Tag::Code => inline::code(&children),
        Tag::Keyboard => inline::keyboard(&children),
        Tag::Link => inline::link(element, &children),

        Tag::UnorderedList | Tag::OrderedList => list::list(&children, scope),
        Tag::ListItem => list::item(&children, scope),
        Tag::DescriptionList => list::description_list(&children),
        Tag::Term => list::term(&children),
        Tag::Definition => list::definition(&children),

        Tag::Image => media::image(element, scope),
        Tag::Figure => media::figure(&children),
        Tag::Caption => media::caption(&children),
        Tag::Media(kind) => media::media(kind, element, &children, scope),

        Tag::Table => table::table(children),
        Tag::TableRow => table::row(children, scope),
        Tag::TableCell { header } => table::cell(header, element, &children, scope),

        // The traversal splices or drops these before reaching a handler.
        Tag::Transparent | Tag::Omit => Fragment::inline(compose_flow(&children)),
    }
}

/// Style carried by the tag itself or by legacy presentational attributes.
/// Never overrides what the `style` attribute set.
pub(crate) fn implied_style(tag: Tag, element: &Node, style: &mut StyleIntent) {
    match tag {
        Tag::Center if !style.align.is_set() => {
            style.align = Setting::Set(Alignment::Center);
        }
        Tag::Font => {
            if !style.color.is_set() {
                style.color = element.attrs.get("color").and_then(parse_color).into();
            }
            if !style.font_size.is_set() {
                style.font_size = element.attrs.get("size").and_then(font_size_attr).into();
            }
        }
        _ => {}
    }
}

/// `<font size>`: 1 to 7, or relative to 3 with a sign.
fn font_size_attr(value: &str) -> Option<FontScale> {
    const SCALES: [f64; 7] = [0.63, 0.82, 1.0, 1.13, 1.5, 2.0, 3.0];

    let value = value.trim();
    let step: i64 = match value.as_bytes().first()? {
        b'+' | b'-' => 3 + value.parse::<i64>().ok()?,
        _ => value.parse().ok()?,
    };
    let index = usize::try_from(step.clamp(1, 7) - 1).ok()?;
    FontScale::new(SCALES[index])
}
