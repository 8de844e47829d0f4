//! Paint descriptors: solid colors and gradients.

use crate::error::{CanvasError, CanvasResult};
use crate::geometry::{Point, RadialGradientParams};
use crate::style::Color;

/// A color stop in a gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Offset position (0.0 to 1.0).
    pub offset: f64,
    /// Color at this stop.
    pub color: Color,
}

/// Gradient geometry in user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradientKind {
    /// Linear gradient along the line from `start` to `end`.
    Linear { start: Point, end: Point },
    /// Radial gradient from inner circle to outer circle.
    Radial(RadialGradientParams),
}

/// A linear or radial gradient with its color stops.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub kind: GradientKind,
    stops: Vec<GradientStop>,
}

impl Gradient {
    pub fn linear(start: Point, end: Point) -> Self {
        Self {
            kind: GradientKind::Linear { start, end },
            stops: Vec::new(),
        }
    }

    pub fn radial(params: RadialGradientParams) -> Self {
        Self {
            kind: GradientKind::Radial(params),
            stops: Vec::new(),
        }
    }

    /// Add a color stop, keeping stops ordered by offset.
    ///
    /// Stops with equal offsets keep their insertion order, which yields a
    /// hard color transition.
    pub fn add_color_stop(&mut self, offset: f64, color: Color) -> CanvasResult<()> {
        if !(0.0..=1.0).contains(&offset) {
            return Err(CanvasError::InvalidGradientStop(offset));
        }
        let index = self.stops.partition_point(|s| s.offset <= offset);
        self.stops.insert(index, GradientStop { offset, color });
        Ok(())
    }

    /// Builder-style [`Gradient::add_color_stop`].
    pub fn with_stop(mut self, offset: f64, color: Color) -> CanvasResult<Self> {
        self.add_color_stop(offset, color)?;
        Ok(self)
    }

    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }
}

/// Stroke or fill paint.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    Gradient(Gradient),
}

impl Default for Paint {
    fn default() -> Self {
        // Default is opaque black
        Paint::Solid(Color::BLACK)
    }
}

impl Paint {
    /// A single color standing in for the paint on backends without
    /// gradient support: the solid color, or a gradient's first stop.
    pub fn fallback_color(&self) -> Color {
        match self {
            Paint::Solid(color) => *color,
            Paint::Gradient(g) => g
                .stops()
                .first()
                .map(|s| s.color)
                .unwrap_or(Color::TRANSPARENT),
        }
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Solid(color)
    }
}

impl From<Gradient> for Paint {
    fn from(gradient: Gradient) -> Self {
        Paint::Gradient(gradient)
    }
}
