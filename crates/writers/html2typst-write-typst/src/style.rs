//! Inline `style` attribute interpretation.
//!
//! Only the properties that have a direct Typst rendering are read:
//! `text-align`, `color`, `background-color` (and a plain-colour
//! `background`), and `font-size`. Everything else is ignored. A recognised
//! property whose value cannot be used leaves its field unset and is reported
//! back so the caller can record it.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::color::{Rgb, parse_color};
use crate::compose::Layout;

/// A per-property setting: either set to a value or left alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Setting<T> {
    Set(T),
    Unset,
}

impl<T> Default for Setting<T> {
    fn default() -> Self {
        Setting::Unset
    }
}

impl<T> Setting<T> {
    pub fn is_set(&self) -> bool {
        matches!(self, Setting::Set(_))
    }

    pub fn as_set(&self) -> Option<&T> {
        match self {
            Setting::Set(value) => Some(value),
            Setting::Unset => None,
        }
    }
}

impl<T> From<Option<T>> for Setting<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Setting::Unset, Setting::Set)
    }
}

/// Horizontal alignment of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    /// Rendered as paragraph justification rather than alignment.
    Justify,
}

impl Alignment {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "left" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" => Some(Alignment::Right),
            "justify" => Some(Alignment::Justify),
            _ => None,
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        };
        f.write_str(name)
    }
}

/// A font size relative to the surrounding text, in `em`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontScale(f64);

impl FontScale {
    /// A positive, finite multiplier.
    pub fn new(em: f64) -> Option<Self> {
        (em.is_finite() && em > 0.0).then_some(Self(em))
    }

    pub fn em(self) -> f64 {
        self.0
    }
}

impl fmt::Display for FontScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}em", format_number(self.0))
    }
}

/// Style properties that survive into the output.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StyleIntent {
    pub align: Setting<Alignment>,
    pub color: Setting<Rgb>,
    pub background: Setting<Rgb>,
    pub font_size: Setting<FontScale>,
}

impl StyleIntent {
    /// Parse a `style` attribute, discarding what could not be used.
    pub fn parse(style: &str) -> Self {
        interpret(style).intent
    }

    /// True when no property is set.
    pub fn is_empty(&self) -> bool {
        !(self.align.is_set()
            || self.color.is_set()
            || self.background.is_set()
            || self.font_size.is_set())
    }

    /// True when wrapping content of `layout` would change its rendering.
    /// Alignment only applies to blocks.
    pub fn affects(&self, layout: Layout) -> bool {
        self.color.is_set()
            || self.background.is_set()
            || self.font_size.is_set()
            || (layout == Layout::Block && self.align.is_set())
    }
}

/// A declaration that named a recognised property but had an unusable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedDeclaration {
    pub property: String,
    pub value: String,
}

/// The outcome of reading a `style` attribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interpretation {
    pub intent: StyleIntent,
    pub dropped: Vec<DroppedDeclaration>,
}

/// Read a `style` attribute.
///
/// Declarations apply in order, so a later valid value overrides an earlier
/// one; an invalid value never clears an earlier valid one.
pub fn interpret(style: &str) -> Interpretation {
    let mut out = Interpretation::default();

    for declaration in style.split(';') {
        let Some((property, value)) = declaration.split_once(':') else {
            continue;
        };
        let property = property.trim().to_ascii_lowercase();
        let value = strip_important(value.trim()).to_ascii_lowercase();

        let accepted = match property.as_str() {
            "text-align" => set(&mut out.intent.align, Alignment::parse(&value)),
            "color" => set(&mut out.intent.color, parse_color(&value)),
            "background-color" => set(&mut out.intent.background, parse_color(&value)),
            "background" => {
                // Shorthand values (images, positions) are not colours; skip quietly.
                set(&mut out.intent.background, parse_color(&value));
                true
            }
            "font-size" => set(&mut out.intent.font_size, parse_font_size(&value)),
            _ => true,
        };

        if !accepted {
            out.dropped.push(DroppedDeclaration { property, value });
        }
    }

    out
}

fn set<T>(slot: &mut Setting<T>, value: Option<T>) -> bool {
    match value {
        Some(value) => {
            *slot = Setting::Set(value);
            true
        }
        None => false,
    }
}

fn strip_important(value: &str) -> &str {
    let lower = value.to_ascii_lowercase();
    match lower.rfind("!important") {
        Some(idx) if lower[idx..].trim() == "!important" => value[..idx].trim_end(),
        _ => value,
    }
}

/// Keyword sizes, relative to `medium`.
static FONT_SIZE_KEYWORDS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    HashMap::from([
        ("xx-small", 0.6),
        ("x-small", 0.75),
        ("small", 0.89),
        ("medium", 1.0),
        ("large", 1.2),
        ("x-large", 1.5),
        ("xx-large", 2.0),
        ("xxx-large", 3.0),
        ("huge", 2.0),
        ("smaller", 0.83),
        ("larger", 1.2),
    ])
});

static FONT_SIZE_LENGTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)?|\.\d+)(px|pt|em|rem|%)$").expect("valid font-size pattern")
});

/// Parse a CSS `font-size` value into a relative scale.
///
/// Absolute lengths are taken relative to a 16px (12pt) base.
pub fn parse_font_size(value: &str) -> Option<FontScale> {
    let value = value.trim().to_ascii_lowercase();
    if let Some(&em) = FONT_SIZE_KEYWORDS.get(value.as_str()) {
        return FontScale::new(em);
    }

    let caps = FONT_SIZE_LENGTH.captures(&value)?;
    let number: f64 = caps[1].parse().ok()?;
    let em = match &caps[2] {
        "px" => number / 16.0,
        "pt" => number / 12.0,
        "%" => number / 100.0,
        _ => number,
    };
    FontScale::new(em)
}

/// Format a number with at most three decimals and no trailing zeros.
pub(crate) fn format_number(value: f64) -> String {
    let formatted = format!("{value:.3}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_declaration_set() {
        let style = StyleIntent::parse("color:#ff0000;text-align:center;font-size:20px");
        assert_eq!(style.align, Setting::Set(Alignment::Center));
        assert_eq!(style.color, Setting::Set(Rgb::new(255, 0, 0)));
        assert_eq!(style.font_size.as_set().map(|s| s.em()), Some(1.25));
        assert_eq!(style.background, Setting::Unset);
    }

    #[test]
    fn test_empty_and_garbage() {
        assert!(StyleIntent::parse("").is_empty());
        assert!(StyleIntent::parse(";;;").is_empty());
        assert!(StyleIntent::parse("not css at all").is_empty());
        assert!(StyleIntent::parse("margin: 0; padding: 2px").is_empty());
    }

    #[test]
    fn test_alignment_only_affects_blocks() {
        let style = StyleIntent::parse("text-align: center");
        assert!(style.affects(Layout::Block));
        assert!(!style.affects(Layout::Inline));
        assert!(StyleIntent::parse("color: red").affects(Layout::Inline));
    }

    #[test]
    fn test_invalid_alignment_is_dropped() {
        let out = interpret("text-align: bogus");
        assert!(out.intent.is_empty());
        assert_eq!(
            out.dropped,
            vec![DroppedDeclaration {
                property: "text-align".into(),
                value: "bogus".into(),
            }]
        );
    }

    #[test]
    fn test_keywords_are_dropped() {
        let out = interpret("color: inherit; background-color: transparent; font-size: initial");
        assert!(out.intent.is_empty());
        assert_eq!(out.dropped.len(), 3);
    }

    #[test]
    fn test_justify() {
        let style = StyleIntent::parse("text-align: justify;");
        assert_eq!(style.align, Setting::Set(Alignment::Justify));
    }

    #[test]
    fn test_case_and_important() {
        let style = StyleIntent::parse("TEXT-ALIGN: Right !important; Color: Navy");
        assert_eq!(style.align, Setting::Set(Alignment::Right));
        assert_eq!(style.color, Setting::Set(Rgb::new(0, 0, 128)));
    }

    #[test]
    fn test_later_valid_value_wins() {
        let style = StyleIntent::parse("color: red; color: blue");
        assert_eq!(style.color, Setting::Set(Rgb::new(0, 0, 255)));

        let style = StyleIntent::parse("color: red; color: nonsense");
        assert_eq!(style.color, Setting::Set(Rgb::new(255, 0, 0)));
    }

    #[test]
    fn test_background_shorthand() {
        let style = StyleIntent::parse("background: yellow");
        assert_eq!(style.background, Setting::Set(Rgb::new(255, 255, 0)));

        let out = interpret("background: url(x.png) no-repeat");
        assert!(out.intent.is_empty());
        assert!(out.dropped.is_empty());
    }

    #[test]
    fn test_font_size_units() {
        let em = |v: &str| parse_font_size(v).map(FontScale::em);
        assert_eq!(em("16px"), Some(1.0));
        assert_eq!(em("18pt"), Some(1.5));
        assert_eq!(em("1.5em"), Some(1.5));
        assert_eq!(em(".5rem"), Some(0.5));
        assert_eq!(em("120%"), Some(1.2));
        assert_eq!(em("large"), Some(1.2));
        assert_eq!(em("XX-Large"), Some(2.0));
        assert_eq!(em("0px"), None);
        assert_eq!(em("-2px"), None);
        assert_eq!(em("12"), None);
        assert_eq!(em("calc(1em + 2px)"), None);
    }

    #[test]
    fn test_font_scale_display() {
        assert_eq!(FontScale::new(1.25).unwrap().to_string(), "1.25em");
        assert_eq!(FontScale::new(2.0).unwrap().to_string(), "2em");
        assert_eq!(FontScale::new(14.0 / 16.0).unwrap().to_string(), "0.875em");
        assert_eq!(FontScale::new(1.0 / 3.0).unwrap().to_string(), "0.333em");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(225.0), "225");
        assert_eq!(format_number(0.85), "0.85");
    }
}
