//! tiny-skia raster backend.

use super::{Canvas, GlyphRun};
use crate::error::{CanvasError, CanvasResult};
use crate::gradient::{Gradient, GradientKind, Paint};
use crate::path::PathData;
use crate::state::{GraphicsContext, StateStack};
use crate::style::{Color, FillRule};
use crate::transform::Transform;
use tiny_skia::Pixmap;

/// Maximum canvas dimension in device pixels (same as Chrome).
pub const MAX_DIMENSION: u32 = 32767;

/// Builder for [`RasterCanvas`].
#[derive(Debug, Clone)]
pub struct RasterCanvasBuilder {
    width: u32,
    height: u32,
    scale: f64,
    background: Option<Color>,
}

impl RasterCanvasBuilder {
    /// Create a builder for a canvas of `width` x `height` user units.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scale: 1.0,
            background: None,
        }
    }

    /// Device pixels per user unit.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Fill the canvas with `color` before drawing.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// Build the RasterCanvas.
    pub fn build(self) -> CanvasResult<RasterCanvas> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(CanvasError::InvalidArgument(format!(
                "device scale must be positive, got {}",
                self.scale
            )));
        }
        let width = (self.width as f64 * self.scale).ceil() as u32;
        let height = (self.height as f64 * self.scale).ceil() as u32;
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(CanvasError::InvalidDimensions { width, height });
        }
        let mut pixmap =
            Pixmap::new(width, height).ok_or(CanvasError::InvalidDimensions { width, height })?;
        if let Some(background) = self.background {
            pixmap.fill(background.into());
        }
        log::debug!(target: "canvas", "raster canvas {}x{} (scale {})", width, height, self.scale);
        Ok(RasterCanvas {
            width,
            height,
            scale: self.scale,
            pixmap,
            stack: StateStack::new(),
        })
    }
}

/// Canvas that paints into a tiny-skia pixmap.
pub struct RasterCanvas {
    width: u32,
    height: u32,
    scale: f64,
    pixmap: Pixmap,
    stack: StateStack,
}

impl RasterCanvas {
    /// A transparent canvas of `width` x `height` pixels.
    pub fn new(width: u32, height: u32) -> CanvasResult<Self> {
        RasterCanvasBuilder::new(width, height).build()
    }

    pub fn builder(width: u32, height: u32) -> RasterCanvasBuilder {
        RasterCanvasBuilder::new(width, height)
    }

    /// Width in device pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in device pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// User space to device space for the current state.
    fn device_transform(&self) -> Transform {
        Transform::scale(self.scale, self.scale) * self.transform()
    }

    /// Non-premultiplied RGBA at device pixel `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// The whole canvas as non-premultiplied RGBA rows.
    pub fn image_data(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    /// Encode the canvas as PNG, recording `ppi` (default 72) as pixel density.
    pub fn to_png(&self, ppi: Option<f32>) -> CanvasResult<Vec<u8>> {
        let ppi = ppi.unwrap_or(72.0);

        let mut buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buf, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);

            // Pixels per meter
            let ppm = (ppi.max(0.0) / 0.0254).round() as u32;
            encoder.set_pixel_dims(Some(png::PixelDimensions {
                xppu: ppm,
                yppu: ppm,
                unit: png::Unit::Meter,
            }));

            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.image_data())?;
        }
        Ok(buf)
    }

    fn with_paint<R>(
        &mut self,
        paint: &Paint,
        draw: impl for<'a> FnOnce(&mut Pixmap, &tiny_skia::Paint<'a>) -> R,
    ) -> Option<R> {
        let mut sk_paint = tiny_skia::Paint {
            anti_alias: true,
            ..Default::default()
        };
        match paint {
            Paint::Solid(color) => sk_paint.set_color((*color).into()),
            Paint::Gradient(gradient) => {
                sk_paint.shader = gradient_shader(gradient, self.device_transform())?;
            }
        }
        Some(draw(&mut self.pixmap, &sk_paint))
    }

    fn skia_stroke(&self) -> tiny_skia::Stroke {
        // Paths are pre-transformed, so widths and dashes move to device space too
        let scale = self.device_transform().average_scale();
        let state = self.state();
        let dash = if state.line_dash.is_empty() {
            None
        } else {
            let scaled: Vec<f32> = state
                .line_dash
                .iter()
                .map(|d| (d * scale) as f32)
                .collect();
            tiny_skia::StrokeDash::new(scaled, (state.line_dash_offset * scale) as f32)
        };
        tiny_skia::Stroke {
            width: (state.line_width * scale) as f32,
            line_cap: state.line_cap.into(),
            line_join: state.line_join.into(),
            miter_limit: state.miter_limit as f32,
            dash,
        }
    }
}

/// Shader for `gradient` in user space mapped by `transform`.
fn gradient_shader(gradient: &Gradient, transform: Transform) -> Option<tiny_skia::Shader<'static>> {
    if gradient.stops().is_empty() {
        return None;
    }
    let stops: Vec<tiny_skia::GradientStop> = gradient
        .stops()
        .iter()
        .map(|stop| tiny_skia::GradientStop::new(stop.offset as f32, stop.color.into()))
        .collect();
    let point = |p: crate::geometry::Point| tiny_skia::Point::from_xy(p.x as f32, p.y as f32);

    match gradient.kind {
        GradientKind::Linear { start, end } => tiny_skia::LinearGradient::new(
            point(start),
            point(end),
            stops,
            tiny_skia::SpreadMode::Pad,
            transform.into(),
        ),
        // tiny-skia draws two-point conical gradients with a single radius
        GradientKind::Radial(params) => tiny_skia::RadialGradient::new(
            point(params.start),
            point(params.end),
            params.end_radius as f32,
            stops,
            tiny_skia::SpreadMode::Pad,
            transform.into(),
        ),
    }
}

impl GraphicsContext for RasterCanvas {
    fn state_stack(&self) -> &StateStack {
        &self.stack
    }

    fn state_stack_mut(&mut self) -> &mut StateStack {
        &mut self.stack
    }
}

impl Canvas for RasterCanvas {
    fn fill_path(&mut self, path: &PathData, rule: FillRule) -> CanvasResult<()> {
        log::debug!(target: "canvas", "fill {:?} ({} commands)", rule, path.len());
        let Some(sk_path) = path.to_skia_path(&self.device_transform()) else {
            return Ok(());
        };
        let paint = self.state().fill.clone();
        self.with_paint(&paint, |pixmap, sk_paint| {
            pixmap.fill_path(
                &sk_path,
                sk_paint,
                rule.into(),
                tiny_skia::Transform::identity(),
                None,
            );
        });
        Ok(())
    }

    fn stroke_path(&mut self, path: &PathData) -> CanvasResult<()> {
        log::debug!(target: "canvas", "stroke ({} commands)", path.len());
        let Some(sk_path) = path.to_skia_path(&self.device_transform()) else {
            return Ok(());
        };
        let stroke = self.skia_stroke();
        let paint = self.state().stroke.clone();
        self.with_paint(&paint, |pixmap, sk_paint| {
            pixmap.stroke_path(
                &sk_path,
                sk_paint,
                &stroke,
                tiny_skia::Transform::identity(),
                None,
            );
        });
        Ok(())
    }

    fn show_glyphs(&mut self, run: &GlyphRun) -> CanvasResult<()> {
        log::debug!(target: "canvas", "glyphs ({} glyphs)", run.glyphs.len());
        let mode = self.text_rendering_mode();
        let mut outlines = PathData::new();
        for glyph in &run.glyphs {
            match glyph.outline_path(run.size) {
                Some(outline) => outlines.extend(&outline),
                None => log::trace!(target: "canvas", "no outline for {:?}", glyph.ch),
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
    use crate::geometry::{Point, Rectangle};
    use crate::DrawingExt;

    fn rect_path(x: f64, y: f64, w: f64, h: f64) -> PathData {
        let mut path = PathData::new();
        path.rect(&Rectangle::new(x, y, w, h));
        path
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            RasterCanvas::new(0, 10),
            Err(CanvasError::InvalidDimensions { .. })
        ));
        assert!(RasterCanvas::new(MAX_DIMENSION + 1, 10).is_err());
        assert!(RasterCanvas::builder(10, 10).with_scale(0.0).build().is_err());
    }

    #[test]
    fn test_fill_rect_pixels() {
        let mut canvas = RasterCanvas::new(100, 100).unwrap();
        canvas.set_fill_paint(Color::parse("#ff0000").unwrap().into());
        canvas
            .fill_path(&rect_path(10.0, 10.0, 50.0, 50.0), FillRule::NonZero)
            .unwrap();

        assert_eq!(canvas.pixel(30, 30), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(5, 5).map(|p| p[3]), Some(0));
    }

    #[test]
    fn test_stroke_rect_pixels() {
        let mut canvas = RasterCanvas::new(100, 100).unwrap();
        canvas.set_stroke_paint(Color::parse("#0000ff").unwrap().into());
        canvas.set_line_width(2.0);
        canvas.stroke_path(&rect_path(20.0, 20.0, 60.0, 60.0)).unwrap();

        let edge = canvas.pixel(50, 20).unwrap();
        assert!(edge[2] > 200);
        assert!(edge[3] > 0);
        assert_eq!(canvas.pixel(50, 50).map(|p| p[3]), Some(0));
    }

    #[test]
    fn test_save_restore_colors() {
        let mut canvas = RasterCanvas::builder(40, 20)
            .with_background(Color::WHITE)
            .build()
            .unwrap();
        canvas.set_fill_paint(Color::parse("green").unwrap().into());
        canvas
            .scoped(|c| {
                c.set_fill_paint(Color::parse("red").unwrap().into());
                c.fill_path(&rect_path(0.0, 0.0, 20.0, 20.0), FillRule::NonZero)
            })
            .unwrap();
        canvas
            .fill_path(&rect_path(20.0, 0.0, 20.0, 20.0), FillRule::NonZero)
            .unwrap();

        assert_eq!(canvas.pixel(10, 10), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(30, 10), Some([0, 128, 0, 255]));
    }

    #[test]
    fn test_device_scale() {
        let mut canvas = RasterCanvas::builder(10, 10).with_scale(2.0).build().unwrap();
        assert_eq!(canvas.width(), 20);
        canvas
            .fill_path(&rect_path(5.0, 5.0, 5.0, 5.0), FillRule::NonZero)
            .unwrap();
        assert_eq!(canvas.pixel(15, 15).map(|p| p[3]), Some(255));
        assert_eq!(canvas.pixel(8, 8).map(|p| p[3]), Some(0));
    }

    #[test]
    fn test_linear_gradient_fill() {
        let mut canvas = RasterCanvas::new(100, 10).unwrap();
        let gradient = Gradient::linear(Point::new(0.0, 0.0), Point::new(100.0, 0.0))
            .with_stop(0.0, Color::parse("#ff0000").unwrap())
            .and_then(|g| g.with_stop(1.0, Color::parse("#0000ff").unwrap()))
            .unwrap();
        canvas.set_fill_paint(gradient.into());
        canvas
            .fill_path(&rect_path(0.0, 0.0, 100.0, 10.0), FillRule::NonZero)
            .unwrap();

        let left = canvas.pixel(2, 5).unwrap();
        let right = canvas.pixel(97, 5).unwrap();
        assert!(left[0] > 200 && left[2] < 50);
        assert!(right[2] > 200 && right[0] < 50);
    }

    #[test]
    fn test_png_signature() {
        let canvas = RasterCanvas::new(4, 4).unwrap();
        let png = canvas.to_png(None).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
