//! The drawing contract shared by every backend.
//!
//! A [`Canvas`] is a [`GraphicsContext`] that can also paint: it fills and
//! strokes user-space [`PathData`] with the current state and shows
//! positioned glyph runs. Everything else (calculators, rounded and
//! beveled rectangles, ellipses, scoped state) is provided on top of those
//! three operations.

mod measure;
mod raster;

pub use measure::MeasureCanvas;
pub use raster::{RasterCanvas, RasterCanvasBuilder, MAX_DIMENSION};

use crate::calculator::PathCalculator;
use crate::drawing::DrawingExt;
use crate::error::{CanvasError, CanvasResult};
use crate::geometry::{BevelRectParams, EllipseParams, Point, Rectangle, RoundRectParams};
use crate::path::PathData;
use crate::state::{GraphicsContext, GraphicsState};
use crate::style::FillRule;
use crate::transform::Transform;

/// Share of the em square above the baseline, for glyph boxes.
const EM_ASCENT: f64 = 0.8;
/// Share of the em square below the baseline, for glyph boxes.
const EM_DESCENT: f64 = 0.2;

/// One glyph positioned in user space.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedGlyph {
    pub ch: char,
    /// Baseline origin in user space.
    pub origin: Point,
    /// Baseline direction in radians.
    pub angle: f64,
    /// Advance width in user units.
    pub advance: f64,
    /// Outline in em units with y pointing up, if the font has one.
    pub outline: Option<PathData>,
}

impl PlacedGlyph {
    /// Maps em-space outline coordinates into user space for text of `size`.
    pub fn em_transform(&self, size: f64) -> Transform {
        Transform::translate(self.origin.x, self.origin.y)
            * Transform::rotate(self.angle)
            * Transform::scale(size, -size)
    }

    /// The outline in user space.
    pub fn outline_path(&self, size: f64) -> Option<PathData> {
        self.outline
            .as_ref()
            .map(|outline| outline.transformed(&self.em_transform(size)))
    }

    /// Corners of the glyph's advance box in user space.
    pub fn advance_box(&self, size: f64) -> [Point; 4] {
        let local = Transform::translate(self.origin.x, self.origin.y) * Transform::rotate(self.angle);
        [
            Point::new(0.0, -EM_ASCENT * size),
            Point::new(self.advance, -EM_ASCENT * size),
            Point::new(self.advance, EM_DESCENT * size),
            Point::new(0.0, EM_DESCENT * size),
        ]
        .map(|p| local.map(p))
    }
}

/// Glyphs of a single size, painted with the current text rendering mode.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphRun {
    pub size: f64,
    pub glyphs: Vec<PlacedGlyph>,
}

/// Fully qualified field name under the current prefix, or `None` when
/// fields are disabled.
pub fn qualified_field_name(state: &GraphicsState, name: &str) -> CanvasResult<Option<String>> {
    if !state.fields_enabled {
        return Ok(None);
    }
    let name = name.trim();
    if name.is_empty() {
        return Err(CanvasError::FieldError("field name is empty".to_string()));
    }
    Ok(Some(if state.field_prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", state.field_prefix, name)
    }))
}

/// A paintable graphics context.
pub trait Canvas: GraphicsContext {
    /// Fill `path` (user space) with the current fill paint.
    fn fill_path(&mut self, path: &PathData, rule: FillRule) -> CanvasResult<()>;

    /// Stroke `path` (user space) with the current stroke paint and line style.
    fn stroke_path(&mut self, path: &PathData) -> CanvasResult<()>;

    /// Paint a glyph run according to the text rendering mode.
    fn show_glyphs(&mut self, run: &GlyphRun) -> CanvasResult<()>;

    /// Declare a form field, returning its qualified name.
    fn declare_field(&mut self, name: &str) -> CanvasResult<Option<String>> {
        qualified_field_name(self.state(), name)
    }

    fn fill_and_stroke(&mut self, path: &PathData, fill: bool, stroke: bool) -> CanvasResult<()> {
        if fill {
            self.fill_path(path, FillRule::NonZero)?;
        }
        if stroke {
            self.stroke_path(path)?;
        }
        Ok(())
    }

    fn draw_calculator(
        &mut self,
        calc: &PathCalculator,
        fill: bool,
        stroke: bool,
    ) -> CanvasResult<()> {
        self.fill_and_stroke(&calc.to_path_data(), fill, stroke)
    }

    fn draw_round_rect(
        &mut self,
        params: &RoundRectParams,
        fill: bool,
        stroke: bool,
    ) -> CanvasResult<()> {
        let mut path = PathData::new();
        path.round_rect(params);
        self.fill_and_stroke(&path, fill, stroke)
    }

    fn draw_bevel_rect(
        &mut self,
        params: &BevelRectParams,
        fill: bool,
        stroke: bool,
    ) -> CanvasResult<()> {
        let mut path = PathData::new();
        path.bevel_rect(params);
        self.fill_and_stroke(&path, fill, stroke)
    }

    /// Closed ellipse inscribed in `bounds`.
    fn draw_ellipse(&mut self, bounds: &Rectangle, fill: bool, stroke: bool) -> CanvasResult<()> {
        let mut path = PathData::new();
        path.ellipse(&EllipseParams::inscribed(bounds));
        path.close();
        self.fill_and_stroke(&path, fill, stroke)
    }

    /// Run `f` between a save and a restore back to the current depth.
    ///
    /// The state is unwound even when `f` fails. If `f` restored more
    /// states than it saved the stack can not be recovered and a
    /// [`CanvasError::StackUnderflow`] is returned.
    fn scoped<R, F>(&mut self, f: F) -> CanvasResult<R>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> CanvasResult<R>,
    {
        let depth = self.depth();
        self.save();
        let result = f(self);
        if self.depth() <= depth {
            return Err(CanvasError::StackUnderflow {
                expected: depth + 1,
                actual: self.depth(),
            });
        }
        self.state_stack_mut().restore_to(depth)?;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_qualified_field_name() {
        let mut state = GraphicsState::default();
        assert_eq!(
            qualified_field_name(&state, "name").unwrap().as_deref(),
            Some("name")
        );
        state.field_prefix = "page1".to_string();
        assert_eq!(
            qualified_field_name(&state, " name ").unwrap().as_deref(),
            Some("page1.name")
        );
        assert!(matches!(
            qualified_field_name(&state, ""),
            Err(CanvasError::FieldError(_))
        ));
        state.fields_enabled = false;
        assert_eq!(qualified_field_name(&state, "name").unwrap(), None);
    }

    #[test]
    fn test_em_transform_flips_y() {
        let glyph = PlacedGlyph {
            ch: 'A',
            origin: Point::new(10.0, 20.0),
            angle: 0.0,
            advance: 6.0,
            outline: None,
        };
        let p = glyph.em_transform(10.0).map(Point::new(0.5, 1.0));
        assert!(p.approx_eq(Point::new(15.0, 10.0), 1e-9));
    }

    #[test]
    fn test_rotated_advance_box() {
        let glyph = PlacedGlyph {
            ch: 'x',
            origin: Point::ORIGIN,
            angle: FRAC_PI_2,
            advance: 5.0,
            outline: None,
        };
        let corners = glyph.advance_box(10.0);
        // The advance runs down the y axis
        assert!(corners[1].approx_eq(Point::new(8.0, 5.0), 1e-9));
    }
}
