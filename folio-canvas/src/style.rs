//! Style types and enums for drawing operations.

use crate::error::{CanvasError, CanvasResult};
use std::str::FromStr;

/// Straight (non-premultiplied) RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Parse any CSS color string (`#rgb`, `rgb()`, `hsl()`, named colors, ...).
    pub fn parse(s: &str) -> CanvasResult<Self> {
        let parsed = csscolorparser::parse(s)
            .map_err(|e| CanvasError::ColorParseError(format!("{}: {}", s, e)))?;
        let [r, g, b, a] = parsed.to_array();
        Ok(Color::rgba(r, g, b, a))
    }

    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl FromStr for Color {
    type Err = CanvasError;

    fn from_str(s: &str) -> CanvasResult<Self> {
        Color::parse(s)
    }
}

impl From<Color> for tiny_skia::Color {
    fn from(c: Color) -> Self {
        tiny_skia::Color::from_rgba(
            c.r.clamp(0.0, 1.0),
            c.g.clamp(0.0, 1.0),
            c.b.clamp(0.0, 1.0),
            c.a.clamp(0.0, 1.0),
        )
        .unwrap_or(tiny_skia::Color::BLACK)
    }
}

/// The four colors every element can refer to by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedColor {
    Foreground,
    Background,
    Midtone,
    Text,
}

/// Current values of the four role colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NamedColors {
    pub foreground: Color,
    pub background: Color,
    pub midtone: Color,
    pub text: Color,
}

impl Default for NamedColors {
    fn default() -> Self {
        Self {
            foreground: Color::BLACK,
            background: Color::WHITE,
            midtone: Color::rgba(0.5, 0.5, 0.5, 1.0),
            text: Color::BLACK,
        }
    }
}

impl NamedColors {
    pub fn get(&self, name: NamedColor) -> Color {
        match name {
            NamedColor::Foreground => self.foreground,
            NamedColor::Background => self.background,
            NamedColor::Midtone => self.midtone,
            NamedColor::Text => self.text,
        }
    }

    pub fn set(&mut self, name: NamedColor, color: Color) {
        match name {
            NamedColor::Foreground => self.foreground = color,
            NamedColor::Background => self.background = color,
            NamedColor::Midtone => self.midtone = color,
            NamedColor::Text => self.text = color,
        }
    }
}

/// Match `s` against keyword spellings, for the `FromStr` impls below.
fn keyword<T: Copy>(s: &str, what: &str, table: &[(&str, T)]) -> CanvasResult<T> {
    let s = s.trim();
    table
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(s))
        .map(|(_, value)| *value)
        .ok_or_else(|| CanvasError::InvalidArgument(format!("unknown {}: {:?}", what, s)))
}

/// Line cap style for stroke operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    /// Flat edge at the endpoint.
    #[default]
    Butt,
    /// Rounded edge extending past the endpoint.
    Round,
    /// Square edge extending past the endpoint.
    Square,
}

impl FromStr for LineCap {
    type Err = CanvasError;

    fn from_str(s: &str) -> CanvasResult<Self> {
        keyword(
            s,
            "line cap",
            &[
                ("butt", LineCap::Butt),
                ("round", LineCap::Round),
                ("square", LineCap::Square),
            ],
        )
    }
}

impl From<LineCap> for tiny_skia::LineCap {
    fn from(cap: LineCap) -> Self {
        match cap {
            LineCap::Butt => tiny_skia::LineCap::Butt,
            LineCap::Round => tiny_skia::LineCap::Round,
            LineCap::Square => tiny_skia::LineCap::Square,
        }
    }
}

/// Line join style for stroke operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    /// Sharp corner.
    #[default]
    Miter,
    /// Rounded corner.
    Round,
    /// Beveled corner.
    Bevel,
}

impl FromStr for LineJoin {
    type Err = CanvasError;

    fn from_str(s: &str) -> CanvasResult<Self> {
        keyword(
            s,
            "line join",
            &[
                ("miter", LineJoin::Miter),
                ("round", LineJoin::Round),
                ("bevel", LineJoin::Bevel),
            ],
        )
    }
}

impl From<LineJoin> for tiny_skia::LineJoin {
    fn from(join: LineJoin) -> Self {
        match join {
            LineJoin::Miter => tiny_skia::LineJoin::Miter,
            LineJoin::Round => tiny_skia::LineJoin::Round,
            LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
        }
    }
}

/// Horizontal text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl FromStr for TextAlign {
    type Err = CanvasError;

    fn from_str(s: &str) -> CanvasResult<Self> {
        keyword(
            s,
            "text align",
            &[
                ("left", TextAlign::Left),
                ("start", TextAlign::Left),
                ("center", TextAlign::Center),
                ("right", TextAlign::Right),
                ("end", TextAlign::Right),
            ],
        )
    }
}

/// Vertical text anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    /// Top of the em square.
    Top,
    /// Middle of the em square.
    Middle,
    /// Alphabetic baseline.
    #[default]
    Alphabetic,
    /// Bottom of the em square.
    Bottom,
}

impl FromStr for TextBaseline {
    type Err = CanvasError;

    fn from_str(s: &str) -> CanvasResult<Self> {
        keyword(
            s,
            "text baseline",
            &[
                ("top", TextBaseline::Top),
                ("middle", TextBaseline::Middle),
                ("alphabetic", TextBaseline::Alphabetic),
                ("bottom", TextBaseline::Bottom),
            ],
        )
    }
}

/// Text layout settings carried in the graphics state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextFormat {
    pub align: TextAlign,
    pub baseline: TextBaseline,
    /// Extra space added after every glyph, in user units.
    pub letter_spacing: f64,
}

/// How glyph outlines are painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextRenderingMode {
    #[default]
    Fill,
    Stroke,
    FillStroke,
    /// Glyphs take up space but leave no marks.
    Invisible,
}

impl TextRenderingMode {
    pub fn fills(self) -> bool {
        matches!(self, TextRenderingMode::Fill | TextRenderingMode::FillStroke)
    }

    pub fn strokes(self) -> bool {
        matches!(self, TextRenderingMode::Stroke | TextRenderingMode::FillStroke)
    }
}

impl FromStr for TextRenderingMode {
    type Err = CanvasError;

    fn from_str(s: &str) -> CanvasResult<Self> {
        keyword(
            s,
            "text rendering mode",
            &[
                ("fill", TextRenderingMode::Fill),
                ("stroke", TextRenderingMode::Stroke),
                ("fill-stroke", TextRenderingMode::FillStroke),
                ("invisible", TextRenderingMode::Invisible),
            ],
        )
    }
}

/// Fill rule for path operations.
///
/// Determines how the interior of a path is calculated when filling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    /// Non-zero winding rule (default).
    #[default]
    NonZero,
    /// Even-odd rule.
    EvenOdd,
}

impl From<FillRule> for tiny_skia::FillRule {
    fn from(rule: FillRule) -> Self {
        match rule {
            FillRule::NonZero => tiny_skia::FillRule::Winding,
            FillRule::EvenOdd => tiny_skia::FillRule::EvenOdd,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_color() {
        let red = Color::parse("#ff0000").unwrap();
        assert_eq!(red, Color::rgba(1.0, 0.0, 0.0, 1.0));
        let translucent = Color::parse("rgba(0, 0, 255, 0.5)").unwrap();
        assert!((translucent.a - 0.5).abs() < 1e-6);
        assert!(matches!(
            Color::parse("not-a-color"),
            Err(CanvasError::ColorParseError(_))
        ));
    }

    #[rstest]
    #[case("butt", LineCap::Butt)]
    #[case("Round", LineCap::Round)]
    #[case(" square ", LineCap::Square)]
    fn test_line_cap_keywords(#[case] s: &str, #[case] expected: LineCap) {
        assert_eq!(s.parse::<LineCap>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_keyword() {
        let err = "dotted".parse::<LineJoin>().unwrap_err();
        assert!(err.to_string().contains("line join"));
    }

    #[test]
    fn test_named_colors() {
        let mut colors = NamedColors::default();
        assert_eq!(colors.get(NamedColor::Background), Color::WHITE);
        colors.set(NamedColor::Midtone, Color::BLACK);
        assert_eq!(colors.midtone, Color::BLACK);
    }

    #[test]
    fn test_rendering_mode_flags() {
        assert!(TextRenderingMode::FillStroke.fills());
        assert!(TextRenderingMode::FillStroke.strokes());
        assert!(!TextRenderingMode::Invisible.fills());
        assert!(!TextRenderingMode::Invisible.strokes());
    }
}
