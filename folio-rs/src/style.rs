//! Element styling: paints, line style, text settings and transforms.

use folio_canvas::{
    parse_font, Canvas, Color, Gradient, LineCap, LineJoin, NamedColor, Paint, Point,
    RadialGradientParams, TextRenderingMode, Transform,
};
use serde::{Deserialize, Serialize};

use crate::error::RenderResult;

/// Whether elements fill and stroke their geometry.
///
/// Set by a style and inherited by the children of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaintFlags {
    pub fill: bool,
    pub stroke: bool,
}

impl Default for PaintFlags {
    fn default() -> Self {
        Self {
            fill: false,
            stroke: true,
        }
    }
}

/// One step of an element transform. Angles are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TransformOp {
    Translate {
        x: f64,
        y: f64,
    },
    Scale {
        x: f64,
        #[serde(default)]
        y: Option<f64>,
    },
    Rotate {
        angle: f64,
        #[serde(default)]
        cx: f64,
        #[serde(default)]
        cy: f64,
    },
    SkewX {
        angle: f64,
    },
    SkewY {
        angle: f64,
    },
    Matrix {
        values: [f64; 6],
    },
}

impl TransformOp {
    pub fn to_transform(&self) -> Transform {
        match *self {
            TransformOp::Translate { x, y } => Transform::translate(x, y),
            TransformOp::Scale { x, y } => Transform::scale(x, y.unwrap_or(x)),
            TransformOp::Rotate { angle, cx, cy } => {
                Transform::rotate_about(angle.to_radians(), cx, cy)
            }
            TransformOp::SkewX { angle } => Transform::skew_x(angle.to_radians()),
            TransformOp::SkewY { angle } => Transform::skew_y(angle.to_radians()),
            TransformOp::Matrix {
                values: [a, b, c, d, e, f],
            } => Transform::matrix(a, b, c, d, e, f),
        }
    }
}

/// Compose `ops` left to right, each applied in the frame of the previous.
pub fn compose_ops(ops: &[TransformOp]) -> Transform {
    ops.iter()
        .fold(Transform::identity(), |acc, op| acc * op.to_transform())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopSpec {
    pub offset: f64,
    pub color: String,
}

/// A gradient fill in element coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GradientSpec {
    Linear {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stops: Vec<StopSpec>,
    },
    Radial {
        cx: f64,
        cy: f64,
        r: f64,
        #[serde(default)]
        fx: Option<f64>,
        #[serde(default)]
        fy: Option<f64>,
        #[serde(default)]
        fr: f64,
        stops: Vec<StopSpec>,
    },
}

impl GradientSpec {
    fn stops(&self) -> &[StopSpec] {
        match self {
            GradientSpec::Linear { stops, .. } | GradientSpec::Radial { stops, .. } => stops,
        }
    }

    fn to_gradient<C: Canvas>(&self, canvas: &C) -> RenderResult<Gradient> {
        let mut gradient = match *self {
            GradientSpec::Linear { x1, y1, x2, y2, .. } => {
                Gradient::linear(Point::new(x1, y1), Point::new(x2, y2))
            }
            GradientSpec::Radial {
                cx,
                cy,
                r,
                fx,
                fy,
                fr,
                ..
            } => Gradient::radial(RadialGradientParams {
                start: Point::new(fx.unwrap_or(cx), fy.unwrap_or(cy)),
                start_radius: fr,
                end: Point::new(cx, cy),
                end_radius: r,
            }),
        };
        for stop in self.stops() {
            let color = resolve_color(canvas, &stop.color)?;
            gradient.add_color_stop(stop.offset, color)?;
        }
        Ok(gradient)
    }
}

/// Overrides for the four role colors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorRoles {
    pub foreground: Option<String>,
    pub background: Option<String>,
    pub midtone: Option<String>,
    pub text: Option<String>,
}

/// Style attached to an element. Unset fields inherit from the parent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    /// CSS color, role name or `"none"`.
    pub stroke: Option<String>,
    /// CSS color, role name or `"none"`.
    pub fill: Option<String>,
    /// Gradient fill; takes precedence over `fill`.
    pub gradient: Option<GradientSpec>,
    pub line_width: Option<f64>,
    pub line_cap: Option<String>,
    pub line_join: Option<String>,
    pub miter_limit: Option<f64>,
    pub dash: Option<Vec<f64>>,
    pub dash_offset: Option<f64>,
    pub transform: Vec<TransformOp>,
    pub colors: ColorRoles,
    /// CSS font shorthand.
    pub font: Option<String>,
    pub text_size: Option<f64>,
    /// `fill`, `stroke`, `fill-stroke` or `invisible`.
    pub text_mode: Option<String>,
    pub letter_spacing: Option<f64>,
}

/// Parse a color, resolving role names against the current state.
pub fn resolve_color<C: Canvas>(canvas: &C, spec: &str) -> RenderResult<Color> {
    let role = match spec.trim().to_ascii_lowercase().as_str() {
        "foreground" => Some(NamedColor::Foreground),
        "background" => Some(NamedColor::Background),
        "midtone" => Some(NamedColor::Midtone),
        "text" => Some(NamedColor::Text),
        _ => None,
    };
    match role {
        Some(role) => Ok(canvas.named_color(role)),
        None => Ok(Color::parse(spec)?),
    }
}

fn is_none(spec: &str) -> bool {
    spec.trim().eq_ignore_ascii_case("none")
}

impl Style {
    /// The element transform.
    pub fn transform(&self) -> Transform {
        compose_ops(&self.transform)
    }

    /// Whether the style sets a fill paint of its own.
    pub fn has_fill(&self) -> bool {
        self.gradient.is_some() || self.fill.as_deref().is_some_and(|f| !is_none(f))
    }

    /// Apply the style to the current state of `canvas`, returning the
    /// paint flags for this element and its children.
    pub fn apply<C: Canvas>(&self, canvas: &mut C, inherited: PaintFlags) -> RenderResult<PaintFlags> {
        let roles = [
            (NamedColor::Foreground, &self.colors.foreground),
            (NamedColor::Background, &self.colors.background),
            (NamedColor::Midtone, &self.colors.midtone),
            (NamedColor::Text, &self.colors.text),
        ];
        for (role, spec) in roles {
            if let Some(spec) = spec {
                let color = resolve_color(canvas, spec)?;
                canvas.set_named_color(role, color);
            }
        }

        if !self.transform.is_empty() {
            canvas.apply_transform(self.transform());
        }

        if let Some(width) = self.line_width {
            canvas.set_line_width(width);
        }
        if let Some(cap) = &self.line_cap {
            canvas.set_line_cap(cap.parse::<LineCap>()?);
        }
        if let Some(join) = &self.line_join {
            canvas.set_line_join(join.parse::<LineJoin>()?);
        }
        if let Some(limit) = self.miter_limit {
            canvas.set_miter_limit(limit);
        }
        if let Some(dash) = &self.dash {
            canvas.set_line_dash(dash.clone());
        }
        if let Some(offset) = self.dash_offset {
            canvas.set_line_dash_offset(offset);
        }

        if let Some(font) = &self.font {
            canvas.set_font(parse_font(font)?);
        }
        if let Some(size) = self.text_size {
            canvas.set_text_size(size);
        }
        if let Some(mode) = &self.text_mode {
            canvas.set_text_rendering_mode(mode.parse::<TextRenderingMode>()?);
        }
        if let Some(spacing) = self.letter_spacing {
            let mut format = canvas.text_format();
            format.letter_spacing = spacing;
            canvas.set_text_format(format);
        }

        let mut flags = inherited;
        if let Some(stroke) = &self.stroke {
            flags.stroke = !is_none(stroke);
            if flags.stroke {
                let color = resolve_color(canvas, stroke)?;
                canvas.set_stroke_paint(color.into());
            }
        }
        if let Some(gradient) = &self.gradient {
            let paint: Paint = gradient.to_gradient(canvas)?.into();
            canvas.set_fill_paint(paint);
            flags.fill = true;
        } else if let Some(fill) = &self.fill {
            flags.fill = !is_none(fill);
            if flags.fill {
                let color = resolve_color(canvas, fill)?;
                canvas.set_fill_paint(color.into());
            }
        }
        Ok(flags)
    }
}
