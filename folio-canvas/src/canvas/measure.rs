//! A canvas that measures instead of painting.

use super::{qualified_field_name, Canvas, GlyphRun};
use crate::error::{CanvasError, CanvasResult};
use crate::geometry::Rectangle;
use crate::path::PathData;
use crate::state::{GraphicsContext, StateStack};
use crate::style::FillRule;
use std::collections::HashSet;

/// Dry-run canvas for validation and auto-size passes.
///
/// Tracks the same graphics state as a real backend, accumulates the
/// device-space bounds of everything drawn, counts draw calls and checks
/// that field names are unique.
#[derive(Debug, Default)]
pub struct MeasureCanvas {
    stack: StateStack,
    bounds: Option<Rectangle>,
    fills: usize,
    strokes: usize,
    glyphs: usize,
    fields: Vec<String>,
    field_names: HashSet<String>,
}

impl MeasureCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Device-space bounds of everything drawn so far.
    pub fn bounds(&self) -> Option<Rectangle> {
        self.bounds
    }

    pub fn fill_count(&self) -> usize {
        self.fills
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs
    }

    /// Total number of fill, stroke and glyph-run operations.
    pub fn draw_count(&self) -> usize {
        self.fills + self.strokes + self.glyphs
    }

    /// Qualified names of declared fields, in declaration order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    fn include(&mut self, rect: Rectangle) {
        self.bounds = Some(match self.bounds {
            Some(bounds) => bounds.union(&rect),
            None => rect,
        });
    }

    fn device_bounds(&self, path: &PathData) -> Option<Rectangle> {
        path.transformed(&self.transform()).control_bounds()
    }
}

impl GraphicsContext for MeasureCanvas {
    fn state_stack(&self) -> &StateStack {
        &self.stack
    }

    fn state_stack_mut(&mut self) -> &mut StateStack {
        &mut self.stack
    }
}

impl Canvas for MeasureCanvas {
    fn fill_path(&mut self, path: &PathData, rule: FillRule) -> CanvasResult<()> {
        log::debug!(target: "canvas", "measure fill {:?} ({} commands)", rule, path.len());
        self.fills += 1;
        if let Some(rect) = self.device_bounds(path) {
            self.include(rect);
        }
        Ok(())
    }

    fn stroke_path(&mut self, path: &PathData) -> CanvasResult<()> {
        log::debug!(target: "canvas", "measure stroke ({} commands)", path.len());
        self.strokes += 1;
        if let Some(rect) = self.device_bounds(path) {
            let half_width = self.line_width() * self.transform().average_scale() / 2.0;
            self.include(rect.inflate(half_width));
        }
        Ok(())
    }

    fn show_glyphs(&mut self, run: &GlyphRun) -> CanvasResult<()> {
        log::debug!(target: "canvas", "measure glyphs ({} glyphs)", run.glyphs.len());
        self.glyphs += 1;
        let transform = self.transform();
        for glyph in &run.glyphs {
            let rect = match glyph.outline_path(run.size) {
                Some(outline) => outline.transformed(&transform).control_bounds(),
                None => Rectangle::from_points(
                    glyph.advance_box(run.size).map(|p| transform.map(p)),
                ),
            };
            if let Some(rect) = rect {
                self.include(rect);
            }
        }
        Ok(())
    }

    fn declare_field(&mut self, name: &str) -> CanvasResult<Option<String>> {
        let Some(qualified) = qualified_field_name(self.state(), name)? else {
            return Ok(None);
        };
        if !self.field_names.insert(qualified.clone()) {
            return Err(CanvasError::FieldError(format!(
                "duplicate field name: {}",
                qualified
            )));
        }
        log::debug!(target: "canvas", "declare field {}", qualified);
        self.fields.push(qualified.clone());
        Ok(Some(qualified))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::PathCalculator;
    use crate::canvas::PlacedGlyph;
    use crate::geometry::Point;

    #[test]
    fn test_bounds_follow_transform() {
        let mut canvas = MeasureCanvas::new();
        canvas.translate(100.0, 50.0);
        canvas.scale(2.0, 2.0);
        canvas
            .draw_calculator(&PathCalculator::rect(Rectangle::new(0.0, 0.0, 10.0, 5.0)), true, false)
            .unwrap();
        assert!(canvas
            .bounds()
            .unwrap()
            .approx_eq(&Rectangle::new(100.0, 50.0, 20.0, 10.0), 1e-9));
        assert_eq!(canvas.fill_count(), 1);
    }

    #[test]
    fn test_stroke_inflates_by_half_width() {
        let mut canvas = MeasureCanvas::new();
        canvas.set_line_width(4.0);
        canvas
            .draw_calculator(
                &PathCalculator::line(Point::new(0.0, 0.0), Point::new(10.0, 0.0)),
                false,
                true,
            )
            .unwrap();
        assert!(canvas
            .bounds()
            .unwrap()
            .approx_eq(&Rectangle::new(-2.0, -2.0, 14.0, 4.0), 1e-9));
    }

    #[test]
    fn test_scoped_state_restores_after_error() {
        let mut canvas = MeasureCanvas::new();
        let result: CanvasResult<()> = canvas.scoped(|c| {
            c.set_line_width(9.0);
            c.save();
            Err(CanvasError::InvalidArgument("boom".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(canvas.depth(), 0);
        assert_eq!(canvas.line_width(), 1.0);
    }

    #[test]
    fn test_scoped_over_restore_is_reported() {
        let mut canvas = MeasureCanvas::new();
        canvas.save();
        let result = canvas.scoped(|c| {
            c.restore()?;
            c.restore()
        });
        assert!(matches!(
            result,
            Err(CanvasError::StackUnderflow {
                expected: 2,
                actual: 0
            })
        ));
    }

    #[test]
    fn test_duplicate_fields_rejected() {
        let mut canvas = MeasureCanvas::new();
        canvas.set_field_prefix("form");
        assert_eq!(
            canvas.declare_field("email").unwrap().as_deref(),
            Some("form.email")
        );
        assert!(canvas.declare_field("email").is_err());
        canvas.set_fields_enabled(false);
        assert_eq!(canvas.declare_field("email").unwrap(), None);
        assert_eq!(canvas.fields(), &["form.email".to_string()]);
    }

    #[test]
    fn test_glyph_boxes_without_outlines() {
        let mut canvas = MeasureCanvas::new();
        let run = GlyphRun {
            size: 10.0,
            glyphs: vec![PlacedGlyph {
                ch: 'a',
                origin: Point::new(0.0, 20.0),
                angle: 0.0,
                advance: 6.0,
                outline: None,
            }],
        };
        canvas.show_glyphs(&run).unwrap();
        assert!(canvas
            .bounds()
            .unwrap()
            .approx_eq(&Rectangle::new(0.0, 12.0, 6.0, 10.0), 1e-9));
        assert_eq!(canvas.draw_count(), 1);
    }
}
