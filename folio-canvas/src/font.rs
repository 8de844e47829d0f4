//! CSS font shorthand parsing.
//!
//! Parses strings like "12pt Helvetica" or "bold italic 14px 'Times New Roman'"
//! into a [`FontSpec`]. Sizes are converted to user units, where one unit
//! is one PDF point.

use crate::error::{CanvasError, CanvasResult};

/// Default font size in user units.
pub const DEFAULT_FONT_SIZE: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

/// Font selection carried in the graphics state.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub style: FontStyle,
    /// Weight on the CSS 100-900 scale.
    pub weight: u16,
    /// Size in user units.
    pub size: f64,
    /// Font families in order of preference.
    pub families: Vec<String>,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            style: FontStyle::Normal,
            weight: 400,
            size: DEFAULT_FONT_SIZE,
            families: vec!["sans-serif".to_string()],
        }
    }
}

impl FontSpec {
    pub fn is_bold(&self) -> bool {
        self.weight >= 600
    }
}

/// Prefix keywords: `(keyword, style, weight)`; `None` leaves the field alone.
const PREFIX_KEYWORDS: &[(&str, Option<FontStyle>, Option<u16>)] = &[
    ("normal", None, None),
    ("italic", Some(FontStyle::Italic), None),
    ("oblique", Some(FontStyle::Oblique), None),
    ("small-caps", None, None),
    ("bold", None, Some(700)),
    ("bolder", None, Some(800)),
    ("lighter", None, Some(300)),
];

/// Strip `word` from the start of `s` when followed by whitespace or the end.
fn strip_word<'a>(s: &'a str, word: &str) -> Option<&'a str> {
    let rest = s.strip_prefix(word)?;
    (rest.is_empty() || rest.starts_with(char::is_whitespace)).then_some(rest)
}

/// Parse a CSS font shorthand.
///
/// Format: `[style] [variant] [weight] size[/line-height] family[, family]*`.
/// An empty string gives the default font.
pub fn parse_font(font_str: &str) -> CanvasResult<FontSpec> {
    let mut spec = FontSpec::default();
    let mut remaining = font_str.trim();
    if remaining.is_empty() {
        return Ok(spec);
    }

    'prefix: loop {
        remaining = remaining.trim_start();
        for &(word, style, weight) in PREFIX_KEYWORDS {
            if let Some(rest) = strip_word(remaining, word) {
                if let Some(style) = style {
                    spec.style = style;
                }
                if let Some(weight) = weight {
                    spec.weight = weight;
                }
                remaining = rest;
                continue 'prefix;
            }
        }
        if let Some((weight, rest)) = numeric_weight(remaining) {
            spec.weight = weight;
            remaining = rest;
            continue;
        }
        break;
    }

    let (size, rest) = font_size(remaining.trim_start())?;
    spec.size = size;
    remaining = rest;

    // Line height is irrelevant for single-line glyph runs
    if let Some(rest) = remaining.strip_prefix('/') {
        remaining = rest.trim_start_matches(|c: char| !c.is_whitespace());
    }

    let families = families(remaining);
    if !families.is_empty() {
        spec.families = families;
    }
    Ok(spec)
}

/// A multiple of 100 between 100 and 900 followed by whitespace.
fn numeric_weight(s: &str) -> Option<(u16, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let weight: u16 = s[..end].parse().ok()?;
    let rest = strip_word(&s[end..], "")?;
    ((100..=900).contains(&weight) && weight % 100 == 0).then_some((weight, rest))
}

fn font_size(s: &str) -> CanvasResult<(f64, &str)> {
    let end = s
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(s.len());
    if end == 0 {
        return Err(CanvasError::FontParseError(format!(
            "Expected font size, got: {}",
            s
        )));
    }
    let size: f64 = s[..end].parse().map_err(|_| {
        CanvasError::FontParseError(format!("Invalid font size number: {}", &s[..end]))
    })?;

    let rest = &s[end..];
    let (factor, unit_len) = [
        ("pt", 1.0),
        ("px", 0.75),
        ("rem", DEFAULT_FONT_SIZE),
        ("em", DEFAULT_FONT_SIZE),
        ("%", DEFAULT_FONT_SIZE / 100.0),
    ]
    .iter()
    .find(|(unit, _)| rest.starts_with(unit))
    .map(|(unit, factor)| (*factor, unit.len()))
    .unwrap_or((1.0, 0));

    Ok((size * factor, &rest[unit_len..]))
}

fn families(s: &str) -> Vec<String> {
    s.split(',')
        .map(|family| {
            family
                .trim()
                .trim_matches(|c| c == '"' || c == '\'')
                .trim()
                .to_string()
        })
        .filter(|family| !family.is_empty())
        .collect()
}
