use html2typst_core::{Node, Severity, WarningKind};

use super::Scope;
use crate::compose::{Fragment, Role, compose_flow, indent_lines};
use crate::escape::{escape_text, quote_string};
use crate::registry::MediaKind;
use crate::style::format_number;
use crate::text::trim_html_space;

/// `#image("src", alt: "...", width: ..., height: ...)`.
///
/// Without a source only the alternative text remains.
pub(super) fn image(element: &Node, scope: &mut Scope<'_>) -> Fragment {
    let alt = element.attrs.get_non_empty("alt");
    let Some(src) = element.attrs.get_non_empty("src") else {
        scope.warn(
            Severity::Minor,
            WarningKind::MissingSource("img".into()),
            "image without a source; kept its alternative text".into(),
        );
        return Fragment::inline(alt.map(|alt| escape_text(alt).into_owned()).unwrap_or_default());
    };

    let mut args = vec![quote_string(src)];
    if let Some(alt) = alt {
        args.push(format!("alt: {}", quote_string(alt)));
    }
    for name in ["width", "height"] {
        if let Some(length) = element.attrs.get(name).and_then(parse_length) {
            args.push(format!("{name}: {length}"));
        }
    }
    Fragment::inline(format!("#image({})", args.join(", ")))
}

/// An HTML length as a Typst length: percentages stay relative, pixels
/// become points.
fn parse_length(value: &str) -> Option<String> {
    let value = value.trim();
    if let Some(percent) = value.strip_suffix('%') {
        let n: f64 = percent.trim().parse().ok()?;
        return (n.is_finite() && n > 0.0).then(|| format!("{}%", format_number(n)));
    }
    let px = value.strip_suffix("px").unwrap_or(value).trim();
    let n: f64 = px.parse().ok()?;
    (n.is_finite() && n > 0.0).then(|| format!("{}pt", format_number(n * 0.75)))
}

/// `#figure(...)` with the body and an optional caption.
pub(super) fn figure(children: &[Fragment]) -> Fragment {
    let (captions, body): (Vec<&Fragment>, Vec<&Fragment>) = children
        .iter()
        .partition(|fragment| fragment.role == Role::Caption);
    let body: Vec<Fragment> = body.into_iter().cloned().collect();
    let body = compose_flow(&body);
    let caption = captions
        .iter()
        .map(|fragment| trim_html_space(&fragment.text))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if body.is_empty() && caption.is_empty() {
        return Fragment::block("");
    }

    let mut out = format!("#figure(\n{}", indent_lines(&format!("[{body}]"), "  "));
    if !caption.is_empty() {
        out.push_str(&format!(",\n  caption: [{caption}]"));
    }
    out.push_str(",\n)");
    Fragment::block(out)
}

pub(super) fn caption(children: &[Fragment]) -> Fragment {
    Fragment::block(compose_flow(children)).with_role(Role::Caption)
}

/// `video`/`audio`: a comment naming the source, then the fallback content.
pub(super) fn media(
    kind: MediaKind,
    element: &Node,
    children: &[Fragment],
    scope: &mut Scope<'_>,
) -> Fragment {
    let mut parts = Vec::new();
    if scope.options.media_comments {
        let label = match kind {
            MediaKind::Video => "Video",
            MediaKind::Audio => "Audio",
        };
        match media_source(element) {
            Some(src) => parts.push(format!("// {label}: {}", src.replace(['\n', '\r'], " "))),
            None => parts.push(format!("// {label}")),
        }
    }
    let fallback = compose_flow(children);
    if !fallback.is_empty() {
        parts.push(fallback);
    }
    Fragment::block(parts.join("\n"))
}

/// `src` of the element, or of its first `source` child.
fn media_source(element: &Node) -> Option<&str> {
    element.attrs.get_non_empty("src").or_else(|| {
        element
            .children
            .iter()
            .filter(|child| child.is_element("source"))
            .find_map(|source| source.attrs.get_non_empty("src"))
    })
}
