//! PDF backend for the folio canvas contract.
//!
//! [`PdfCanvas`] records every fill and stroke into a single page content
//! stream using `pdf-writer`. User space has its origin at the top-left
//! with y pointing down, like the other canvases; the page transform flips
//! it into PDF's bottom-left, y-up space.
//!
//! Gradients are not emitted as PDF shadings: they paint with their first
//! stop color. Glyphs are drawn from their outlines.

use folio_canvas::{
    Canvas, CanvasError, CanvasResult, FillRule, GlyphRun, GraphicsContext, LineCap, LineJoin,
    Paint, PathCommand, PathData, Point, StateStack, Transform,
};
use pdf_writer::types::{LineCapStyle, LineJoinStyle};
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref};

/// Constant-alpha graphics state shared by every draw that uses it.
#[derive(Debug, Clone, Copy, PartialEq)]
struct AlphaState {
    alpha: f32,
    stroking: bool,
}

/// Canvas that writes a one-page PDF.
pub struct PdfCanvas {
    width: f64,
    height: f64,
    stack: StateStack,
    content: Content,
    alpha_states: Vec<AlphaState>,
}

impl PdfCanvas {
    /// A page of `width` x `height` points.
    pub fn new(width: f64, height: f64) -> CanvasResult<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(CanvasError::InvalidDimensions {
                width: width.max(0.0) as u32,
                height: height.max(0.0) as u32,
            });
        }
        log::debug!(target: "canvas", "pdf canvas {}x{}", width, height);
        Ok(Self {
            width,
            height,
            stack: StateStack::new(),
            content: Content::new(),
            alpha_states: Vec::new(),
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// User space to PDF page space.
    fn page_transform(&self) -> Transform {
        Transform::matrix(1.0, 0.0, 0.0, -1.0, 0.0, self.height) * self.transform()
    }

    /// Resource name of the graphics state applying `alpha`.
    fn alpha_state_name(&mut self, alpha: f32, stroking: bool) -> String {
        let wanted = AlphaState { alpha, stroking };
        let index = match self.alpha_states.iter().position(|s| *s == wanted) {
            Some(index) => index,
            None => {
                self.alpha_states.push(wanted);
                self.alpha_states.len() - 1
            }
        };
        format!("G{}", index + 1)
    }

    fn set_paint(&mut self, paint: &Paint, stroking: bool) {
        if matches!(paint, Paint::Gradient(_)) {
            log::debug!(target: "canvas", "pdf gradient painted with its first stop");
        }
        let color = paint.fallback_color();
        if stroking {
            self.content.set_stroke_rgb(color.r, color.g, color.b);
        } else {
            self.content.set_fill_rgb(color.r, color.g, color.b);
        }
        if color.a < 1.0 {
            let name = self.alpha_state_name(color.a.clamp(0.0, 1.0), stroking);
            self.content.set_parameters(Name(name.as_bytes()));
        }
    }

    fn set_line_style(&mut self) {
        let state = self.state();
        let width = state.line_width as f32;
        let cap = match state.line_cap {
            LineCap::Butt => LineCapStyle::ButtCap,
            LineCap::Round => LineCapStyle::RoundCap,
            LineCap::Square => LineCapStyle::ProjectingSquareCap,
        };
        let join = match state.line_join {
            LineJoin::Miter => LineJoinStyle::MiterJoin,
            LineJoin::Round => LineJoinStyle::RoundJoin,
            LineJoin::Bevel => LineJoinStyle::BevelJoin,
        };
        let miter = state.miter_limit as f32;
        let dash: Vec<f32> = state.line_dash.iter().map(|d| *d as f32).collect();
        let phase = state.line_dash_offset as f32;

        self.content
            .set_line_width(width)
            .set_line_cap(cap)
            .set_line_join(join)
            .set_miter_limit(miter);
        if !dash.is_empty() {
            self.content.set_dash_pattern(dash, phase);
        }
    }

    /// Begin a self-contained drawing operation under the page transform.
    fn begin(&mut self) {
        let matrix = self.page_transform().to_array();
        self.content.save_state().transform(matrix);
    }

    /// Serialize the page into PDF bytes.
    pub fn finish(self) -> Vec<u8> {
        // Allocate the indirect reference IDs
        let catalog_id = Ref::new(1);
        let page_tree_id = Ref::new(2);
        let page_id = Ref::new(3);
        let content_id = Ref::new(4);
        let first_state_id = 5;

        let state_names: Vec<String> = (1..=self.alpha_states.len())
            .map(|i| format!("G{}", i))
            .collect();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id).kids([page_id]).count(1);

        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, self.width as f32, self.height as f32));
        page.parent(page_tree_id);
        page.contents(content_id);
        if !state_names.is_empty() {
            let mut resources = page.resources();
            let mut states = resources.ext_g_states();
            for (i, name) in state_names.iter().enumerate() {
                states.pair(Name(name.as_bytes()), Ref::new(first_state_id + i as i32));
            }
            states.finish();
            resources.finish();
        }
        page.finish();

        for (i, state) in self.alpha_states.iter().enumerate() {
            let mut gs = pdf.ext_graphics(Ref::new(first_state_id + i as i32));
            if state.stroking {
                gs.stroking_alpha(state.alpha);
            } else {
                gs.non_stroking_alpha(state.alpha);
            }
            gs.finish();
        }

        pdf.stream(content_id, &self.content.finish());
        pdf.finish()
    }
}

/// Append path construction operators for `path`.
fn write_path(content: &mut Content, path: &PathData) {
    let mut current = Point::ORIGIN;
    let mut start = Point::ORIGIN;
    for cmd in path.commands() {
        match *cmd {
            PathCommand::MoveTo(p) => {
                content.move_to(p.x as f32, p.y as f32);
                current = p;
                start = p;
            }
            PathCommand::LineTo(p) => {
                content.line_to(p.x as f32, p.y as f32);
                current = p;
            }
            PathCommand::QuadTo(c, p) => {
                // PDF has no quadratic segments; raise to a cubic
                let c1 = current + (c - current) * (2.0 / 3.0);
                let c2 = p + (c - p) * (2.0 / 3.0);
                content.cubic_to(
                    c1.x as f32,
                    c1.y as f32,
                    c2.x as f32,
                    c2.y as f32,
                    p.x as f32,
                    p.y as f32,
                );
                current = p;
            }
            PathCommand::CubicTo(c1, c2, p) => {
                content.cubic_to(
                    c1.x as f32,
                    c1.y as f32,
                    c2.x as f32,
                    c2.y as f32,
                    p.x as f32,
                    p.y as f32,
                );
                current = p;
            }
            PathCommand::Close => {
                content.close_path();
                current = start;
            }
        }
    }
}

impl GraphicsContext for PdfCanvas {
    fn state_stack(&self) -> &StateStack {
        &self.stack
    }

    fn state_stack_mut(&mut self) -> &mut StateStack {
        &mut self.stack
    }
}

impl Canvas for PdfCanvas {
    fn fill_path(&mut self, path: &PathData, rule: FillRule) -> CanvasResult<()> {
        log::debug!(target: "canvas", "pdf fill {:?} ({} commands)", rule, path.len());
        if path.is_empty() {
            return Ok(());
        }
        self.begin();
        let paint = self.state().fill.clone();
        self.set_paint(&paint, false);
        write_path(&mut self.content, path);
        match rule {
            FillRule::NonZero => self.content.fill_nonzero(),
            FillRule::EvenOdd => self.content.fill_even_odd(),
        };
        self.content.restore_state();
        Ok(())
    }

    fn stroke_path(&mut self, path: &PathData) -> CanvasResult<()> {
        log::debug!(target: "canvas", "pdf stroke ({} commands)", path.len());
        if path.is_empty() {
            return Ok(());
        }
        self.begin();
        let paint = self.state().stroke.clone();
        self.set_paint(&paint, true);
        self.set_line_style();
        write_path(&mut self.content, path);
        self.content.stroke();
        self.content.restore_state();
        Ok(())
    }

    fn show_glyphs(&mut self, run: &GlyphRun) -> CanvasResult<()> {
        log::debug!(target: "canvas", "pdf glyphs ({} glyphs)", run.glyphs.len());
        let mode = self.text_rendering_mode();
        let mut outlines = PathData::new();
        for glyph in &run.glyphs {
            if let Some(outline) = glyph.outline_path(run.size) {
                outlines.extend(&outline);
            }
        }
        if mode.fills() {
            self.fill_path(&outlines, FillRule::NonZero)?;
        }
        if mode.strokes() {
            self.stroke_path(&outlines)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_canvas::Color;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_invalid_page_size() {
        assert!(PdfCanvas::new(0.0, 10.0).is_err());
        assert!(PdfCanvas::new(f64::NAN, 10.0).is_err());
    }

    #[test]
    fn test_page_transform_flips_y() {
        let mut canvas = PdfCanvas::new(100.0, 50.0).unwrap();
        canvas.translate(10.0, 5.0);
        let p = canvas.page_transform().map(Point::new(0.0, 0.0));
        assert!(p.approx_eq(Point::new(10.0, 45.0), 1e-9));
    }

    #[test]
    fn test_alpha_states_are_shared() {
        let mut canvas = PdfCanvas::new(10.0, 10.0).unwrap();
        assert_eq!(canvas.alpha_state_name(0.5, false), "G1");
        assert_eq!(canvas.alpha_state_name(0.5, true), "G2");
        assert_eq!(canvas.alpha_state_name(0.5, false), "G1");
    }

    #[test]
    fn test_translucent_fill_writes_ext_g_state() {
        let mut canvas = PdfCanvas::new(10.0, 10.0).unwrap();
        canvas.set_fill_paint(Color::rgba(1.0, 0.0, 0.0, 0.5).into());
        let mut path = PathData::new();
        path.move_to(Point::new(0.0, 0.0));
        path.line_to(Point::new(5.0, 5.0));
        path.close();
        canvas.fill_path(&path, FillRule::EvenOdd).unwrap();
        let bytes = canvas.finish();
        assert!(contains(&bytes, b"/ExtGState"));
        assert!(contains(&bytes, b"/ca 0.5"));
        assert!(contains(&bytes, b"f*"));
    }
}
