//! Depth-first drawing of a [`Document`] onto any [`Canvas`].
//!
//! Every element is drawn in its own saved graphics state. An element that
//! fails is logged, recorded in the [`RenderReport`] and replaced by a
//! placeholder; its siblings still draw. A [`CancellationToken`] is checked
//! before each element.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use folio_canvas::{
    parse_font, parse_svg_path, place_along_path, BevelRectParams, Canvas, Color,
    ContinuationPolicy, CornerRadius, DrawingExt, EndpointArc, FontSpec, GlyphRun,
    GraphicsContext, MeasureCanvas, NamedColor, PathCalculator, PathData, PlacedGlyph, Point,
    Rectangle, RoundRectParams, Vector,
};
use serde::Serialize;

use crate::document::{all_finite, BoxGeometry, Document, Element, TextPathElement};
use crate::error::{RenderError, RenderResult};
use crate::fonts::{FixedPitchMetrics, FontMetrics, ResolvedFontConfig};
use crate::style::{resolve_color, PaintFlags};

/// Side of the placeholder drawn for a failed element without bounds.
const PLACEHOLDER_SIZE: f64 = 10.0;

const PLACEHOLDER_COLOR: Color = Color::rgba(1.0, 0.0, 0.0, 1.0);

/// Cooperative cancellation signal, shareable across threads.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the render to stop before its next element.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// An element that could not be drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementFailure {
    /// Element id, or its kind and position.
    pub id: String,
    pub message: String,
}

/// Outcome of one render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderReport {
    /// Elements drawn without error, groups included.
    pub rendered: usize,
    pub failures: Vec<ElementFailure>,
    pub cancelled: bool,
}

impl RenderReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && !self.cancelled
    }
}

/// Traversal options.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Draw a marker where a failed element would have been.
    pub placeholders: bool,
    /// Treat any element failure as a failure of the whole document.
    pub strict: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            placeholders: true,
            strict: false,
        }
    }
}

/// Result of a dry run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    /// Page width, as given or measured.
    pub width: f64,
    /// Page height, as given or measured.
    pub height: f64,
    /// Device-space extent of everything drawn, margin included.
    pub content: Option<BoxGeometry>,
    pub draw_calls: usize,
    /// Qualified names of every declared field.
    pub fields: Vec<String>,
    pub report: RenderReport,
}

/// Run `f` in its own graphics state, unwinding it afterwards.
fn scoped<C, R, F>(canvas: &mut C, f: F) -> RenderResult<R>
where
    C: Canvas,
    F: FnOnce(&mut C) -> RenderResult<R>,
{
    canvas.scoped(|canvas| Ok(f(canvas)))?
}

/// Draws documents.
pub struct Renderer<'a> {
    fonts: Option<&'a ResolvedFontConfig>,
    config: RenderConfig,
    cancellation: CancellationToken,
}

impl Default for Renderer<'_> {
    fn default() -> Self {
        Self {
            fonts: None,
            config: RenderConfig::default(),
            cancellation: CancellationToken::new(),
        }
    }
}

impl<'a> Renderer<'a> {
    /// A renderer using fixed-pitch metrics for text.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take text metrics from `fonts`.
    pub fn with_fonts(mut self, fonts: &'a ResolvedFontConfig) -> Self {
        self.fonts = Some(fonts);
        self
    }

    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Draw `doc` onto `canvas`.
    ///
    /// Element failures end up in the report. Only a broken document setup
    /// or a corrupted state stack is returned as an error. The canvas depth
    /// afterwards equals the depth before, cancelled or not.
    pub fn render<C: Canvas>(&self, canvas: &mut C, doc: &Document) -> RenderResult<RenderReport> {
        let mut report = RenderReport::default();
        scoped(canvas, |canvas| {
            setup_page(canvas, doc)?;
            self.render_elements(canvas, &doc.elements, PaintFlags::default(), &mut report);
            Ok(())
        })?;
        log::debug!(
            target: "render",
            "rendered {} elements, {} failed, cancelled: {}",
            report.rendered,
            report.failures.len(),
            report.cancelled
        );
        Ok(report)
    }

    /// Dry-run `doc`, sizing the page from its content where no size is given.
    pub fn measure(&self, doc: &Document) -> RenderResult<Measurement> {
        let mut canvas = MeasureCanvas::new();
        let report = self.render(&mut canvas, doc)?;
        let content = canvas.bounds();
        let (width, height) = page_size(doc, content);
        Ok(Measurement {
            width,
            height,
            content: content.map(BoxGeometry::from),
            draw_calls: canvas.draw_count(),
            fields: canvas.fields().to_vec(),
            report,
        })
    }

    /// Dry-run `doc` and report every element that would fail.
    pub fn validate(&self, doc: &Document) -> RenderResult<RenderReport> {
        Ok(self.measure(doc)?.report)
    }

    fn render_elements<C: Canvas>(
        &self,
        canvas: &mut C,
        elements: &[Element],
        paints: PaintFlags,
        report: &mut RenderReport,
    ) {
        for (index, element) in elements.iter().enumerate() {
            if self.cancellation.is_cancelled() {
                if !report.cancelled {
                    log::info!(
                        target: "render",
                        "render cancelled after {} elements",
                        report.rendered
                    );
                }
                report.cancelled = true;
                return;
            }

            let result = scoped(canvas, |canvas| {
                self.draw_element(canvas, element, paints, report)
            });
            match result {
                Ok(()) => report.rendered += 1,
                Err(err) => {
                    let id = element.label(index);
                    log::warn!(target: "render", "failed to draw {}: {}", id, err);
                    report.failures.push(ElementFailure {
                        id,
                        message: err.to_string(),
                    });
                    if self.config.placeholders {
                        if let Err(err) = draw_placeholder(canvas, element) {
                            log::warn!(target: "render", "failed to draw placeholder: {}", err);
                        }
                    }
                }
            }
        }
    }

    fn draw_element<C: Canvas>(
        &self,
        canvas: &mut C,
        element: &Element,
        inherited: PaintFlags,
        report: &mut RenderReport,
    ) -> RenderResult<()> {
        let name = element.id().unwrap_or(element.kind());
        let invalid = |reason: &str| RenderError::invalid(name, reason);
        let PaintFlags { fill, stroke } = element.style().apply(canvas, inherited)?;
        log::debug!(target: "render", "drawing {}", name);

        match element {
            Element::Rect(e) => {
                if !e.geometry.is_finite() {
                    return Err(invalid("geometry must be finite"));
                }
                let mut path = PathData::new();
                path.rect(&e.geometry.rect());
                canvas.fill_and_stroke(&path, fill, stroke)?;
            }
            Element::Ellipse(e) => {
                if !e.geometry.is_finite() {
                    return Err(invalid("geometry must be finite"));
                }
                canvas.draw_ellipse(&e.geometry.rect(), fill, stroke)?;
            }
            Element::RoundRect(e) => {
                let radii = corner_sizes(e.radius, e.corner_radii);
                if !e.geometry.is_finite() || !corners_finite(&radii) {
                    return Err(invalid("geometry must be finite"));
                }
                let params = RoundRectParams {
                    rect: e.geometry.rect(),
                    radii,
                };
                canvas.draw_round_rect(&params, fill, stroke)?;
            }
            Element::BevelRect(e) => {
                let bevels = corner_sizes(e.bevel, e.bevels);
                if !e.geometry.is_finite() || !corners_finite(&bevels) {
                    return Err(invalid("geometry must be finite"));
                }
                let params = BevelRectParams {
                    rect: e.geometry.rect(),
                    bevels,
                };
                canvas.draw_bevel_rect(&params, fill, stroke)?;
            }
            Element::Circle(e) => {
                if !all_finite(&[e.cx, e.cy, e.r]) || e.r < 0.0 {
                    return Err(invalid("radius must be a non-negative number"));
                }
                let circle = PathCalculator::circle(Point::new(e.cx, e.cy), e.r);
                canvas.draw_calculator(&circle, fill, stroke)?;
            }
            Element::Line(e) => {
                if !all_finite(&[e.x1, e.y1, e.x2, e.y2]) {
                    return Err(invalid("geometry must be finite"));
                }
                let line = PathCalculator::line(Point::new(e.x1, e.y1), Point::new(e.x2, e.y2));
                canvas.draw_calculator(&line, false, stroke)?;
            }
            Element::Polyline(e) | Element::Polygon(e) => {
                let points = e.points();
                if points.len() < 2 {
                    return Err(invalid("needs at least two points"));
                }
                if !points.iter().all(|p| p.is_finite()) {
                    return Err(invalid("geometry must be finite"));
                }
                let calc = if matches!(element, Element::Polygon(_)) {
                    PathCalculator::polygon(points)
                } else {
                    PathCalculator::polyline(points)
                };
                canvas.draw_calculator(&calc, fill, stroke)?;
            }
            Element::Arc(e) => {
                let arc = EndpointArc {
                    from: Point::new(e.from[0], e.from[1]),
                    to: Point::new(e.to[0], e.to[1]),
                    radius_x: e.rx,
                    radius_y: e.ry,
                    rotation: e.rotation.to_radians(),
                    large_arc: e.large_arc,
                    sweep: e.sweep,
                };
                if !all_finite(&[e.from[0], e.from[1], e.to[0], e.to[1], e.rx, e.ry, e.rotation]) {
                    return Err(invalid("geometry must be finite"));
                }
                let mut path = PathData::new();
                path.endpoint_arc(&arc);
                canvas.fill_and_stroke(&path, fill, stroke)?;
            }
            Element::Curve(e) => {
                let points = e.points();
                if !points.iter().all(|p| p.is_finite()) {
                    return Err(invalid("geometry must be finite"));
                }
                let calc = match points[..] {
                    [p0, p1, p2] => PathCalculator::quadratic(p0, p1, p2),
                    [p0, p1, p2, p3] => PathCalculator::cubic(p0, p1, p2, p3),
                    _ => {
                        return Err(invalid(&format!(
                            "a curve takes 3 or 4 points, got {}",
                            points.len()
                        )))
                    }
                };
                canvas.draw_calculator(&calc, fill, stroke)?;
            }
            Element::Path(e) => {
                let svg = parse_svg_path(&e.d)?;
                canvas.fill_and_stroke(&svg.to_path_data(), fill, stroke)?;
            }
            Element::TextPath(e) => self.draw_text_path(canvas, e)?,
            Element::Group(e) => {
                self.render_elements(canvas, &e.children, PaintFlags { fill, stroke }, report)
            }
            Element::Field(e) => {
                if !e.geometry.is_finite() {
                    return Err(invalid("geometry must be finite"));
                }
                if let Some(qualified) = canvas.declare_field(&e.name)? {
                    log::debug!(target: "render", "declared field {}", qualified);
                    if e.style.stroke.is_none() {
                        let midtone = canvas.named_color(NamedColor::Midtone);
                        canvas.set_stroke_paint(midtone.into());
                    }
                    let mut path = PathData::new();
                    path.rect(&e.geometry.rect());
                    canvas.fill_and_stroke(&path, fill, stroke)?;
                }
            }
        }
        Ok(())
    }

    fn draw_text_path<C: Canvas>(&self, canvas: &mut C, element: &TextPathElement) -> RenderResult<()> {
        let name = element.id.as_deref().unwrap_or("text_path");
        if !element.start_offset.is_finite() {
            return Err(RenderError::invalid(name, "start offset must be finite"));
        }
        let path = parse_svg_path(&element.d)?.to_calculator();
        let policy = match &element.continuation {
            Some(policy) => policy.parse::<ContinuationPolicy>()?,
            None => ContinuationPolicy::default(),
        };

        let size = canvas.text_size();
        let spacing = canvas.text_format().letter_spacing;
        let metrics = self.metrics_for(canvas.font());
        let chars: Vec<char> = element.text.chars().collect();
        let widths: Vec<f64> = chars.iter().map(|&ch| metrics.advance(ch, size)).collect();
        let advances: Vec<f64> = widths.iter().map(|w| w + spacing).collect();

        let glyphs: Vec<PlacedGlyph> =
            place_along_path(&path, &advances, element.start_offset, policy)
                .into_iter()
                .map(|placement| {
                    let i = placement.index;
                    let tangent = Vector::from_angle(placement.angle);
                    PlacedGlyph {
                        ch: chars[i],
                        origin: placement.point - tangent * (advances[i] / 2.0),
                        angle: placement.angle,
                        advance: widths[i],
                        outline: metrics.outline(chars[i]),
                    }
                })
                .collect();
        if glyphs.len() < chars.len() {
            log::debug!(
                target: "render",
                "{}: {} of {} glyphs fit the path",
                name,
                glyphs.len(),
                chars.len()
            );
        }

        if !element.style.has_fill() {
            let text = canvas.named_color(NamedColor::Text);
            canvas.set_fill_paint(text.into());
        }
        canvas.show_glyphs(&GlyphRun { size, glyphs })?;
        Ok(())
    }

    fn metrics_for(&self, font: &FontSpec) -> Box<dyn FontMetrics> {
        match self.fonts {
            Some(fonts) => fonts.metrics_for(font),
            None => Box::new(FixedPitchMetrics),
        }
    }
}

/// Document-wide state every element starts from.
fn setup_page<C: Canvas>(canvas: &mut C, doc: &Document) -> RenderResult<()> {
    if !doc.margin.is_finite() || doc.margin < 0.0 {
        return Err(RenderError::invalid("document", "margin must be a non-negative number"));
    }
    if let Some(font) = &doc.font {
        canvas.set_font(parse_font(font)?);
    }
    if let Some(background) = &doc.background {
        let color = resolve_color(canvas, background)?;
        canvas.set_named_color(NamedColor::Background, color);
    }
    if let Some(prefix) = &doc.field_prefix {
        canvas.set_field_prefix(prefix.trim());
    }
    canvas.set_fields_enabled(doc.fields_enabled);
    canvas.translate(doc.margin, doc.margin);
    Ok(())
}

fn corner_sizes(uniform: f64, corners: Option<[f64; 4]>) -> [CornerRadius; 4] {
    corners.unwrap_or([uniform; 4]).map(CornerRadius::uniform)
}

fn corners_finite(corners: &[CornerRadius; 4]) -> bool {
    corners.iter().all(|c| c.x.is_finite() && c.y.is_finite())
}

/// Red box with both diagonals where `element` would have been.
fn draw_placeholder<C: Canvas>(canvas: &mut C, element: &Element) -> RenderResult<()> {
    let transform = element.style().transform();
    let bounds = element
        .bounds()
        .unwrap_or_else(|| Rectangle::new(0.0, 0.0, PLACEHOLDER_SIZE, PLACEHOLDER_SIZE));
    scoped(canvas, |canvas| {
        canvas.apply_transform(transform);
        canvas.set_stroke_paint(PLACEHOLDER_COLOR.into());
        canvas.set_line_width(1.0);
        canvas.set_line_dash(Vec::new());

        let [top_left, top_right, bottom_right, bottom_left] = bounds.corners();
        let mut path = PathData::new();
        path.rect(&bounds);
        path.move_to(top_left);
        path.line_to(bottom_right);
        path.move_to(top_right);
        path.line_to(bottom_left);
        canvas.stroke_path(&path)?;
        Ok(())
    })
}

/// Page size from the document, falling back to the content extent plus
/// the margin on the far sides.
fn page_size(doc: &Document, content: Option<Rectangle>) -> (f64, f64) {
    let margin = doc.margin.max(0.0);
    let extent = |far: Option<f64>| {
        far.map_or(2.0 * margin, |far| far + margin)
            .ceil()
            .max(1.0)
    };
    let width = doc
        .width
        .unwrap_or_else(|| extent(content.map(|r| r.max_x())));
    let height = doc
        .height
        .unwrap_or_else(|| extent(content.map(|r| r.max_y())));
    (width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_canvas::{CanvasResult, FillRule, StateStack};
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        Document::from_value(value).unwrap()
    }

    #[test]
    fn test_failed_element_is_replaced_by_placeholder() {
        let doc = doc(json!({
            "elements": [
                {"type": "rect", "x": 0, "y": 0, "width": 10, "height": 10},
                {"type": "curve", "id": "bad", "points": [[0, 0], [5, 5]]},
                {"type": "circle", "cx": 20, "cy": 20, "r": 5}
            ]
        }));
        let mut canvas = MeasureCanvas::new();
        let report = Renderer::new().render(&mut canvas, &doc).unwrap();

        assert_eq!(report.rendered, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].id, "bad");
        assert!(report.failures[0].message.contains("3 or 4 points"));
        // Two strokes for the good elements, one for the placeholder
        assert_eq!(canvas.stroke_count(), 3);
        assert_eq!(canvas.depth(), 0);
    }

    #[test]
    fn test_placeholders_can_be_disabled() {
        let doc = doc(json!({
            "elements": [{"type": "path", "d": "M 0 0 L 10"}]
        }));
        let mut canvas = MeasureCanvas::new();
        let renderer = Renderer::new().with_config(RenderConfig {
            placeholders: false,
            ..RenderConfig::default()
        });
        let report = renderer.render(&mut canvas, &doc).unwrap();
        assert_eq!(report.failures[0].id, "path#0");
        assert_eq!(canvas.draw_count(), 0);
    }

    #[test]
    fn test_group_paint_is_inherited() {
        let doc = doc(json!({
            "elements": [{
                "type": "group",
                "style": {"fill": "red", "stroke": "none",
                          "transform": [{"op": "translate", "x": 100, "y": 0}]},
                "children": [
                    {"type": "rect", "x": 0, "y": 0, "width": 10, "height": 10},
                    {"type": "rect", "x": 20, "y": 0, "width": 10, "height": 10,
                     "style": {"stroke": "blue"}}
                ]
            }]
        }));
        let mut canvas = MeasureCanvas::new();
        let report = Renderer::new().render(&mut canvas, &doc).unwrap();
        assert_eq!(report.rendered, 3);
        assert_eq!(canvas.fill_count(), 2);
        assert_eq!(canvas.stroke_count(), 1);
        let bounds = canvas.bounds().unwrap();
        assert!((bounds.x - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let doc = doc(json!({
            "elements": [{"type": "rect", "x": 0, "y": 0, "width": 1, "height": 1}]
        }));
        let mut canvas = MeasureCanvas::new();
        let report = Renderer::new()
            .with_cancellation(token)
            .render(&mut canvas, &doc)
            .unwrap();
        assert!(report.cancelled);
        assert_eq!(report.rendered, 0);
        assert_eq!(canvas.draw_count(), 0);
    }

    /// Measures like [`MeasureCanvas`] and cancels after a number of strokes.
    struct CancelAfter {
        inner: MeasureCanvas,
        token: CancellationToken,
        strokes_left: usize,
    }

    impl GraphicsContext for CancelAfter {
        fn state_stack(&self) -> &StateStack {
            self.inner.state_stack()
        }

        fn state_stack_mut(&mut self) -> &mut StateStack {
            self.inner.state_stack_mut()
        }
    }

    impl Canvas for CancelAfter {
        fn fill_path(&mut self, path: &PathData, rule: FillRule) -> CanvasResult<()> {
            self.inner.fill_path(path, rule)
        }

        fn stroke_path(&mut self, path: &PathData) -> CanvasResult<()> {
            self.strokes_left = self.strokes_left.saturating_sub(1);
            if self.strokes_left == 0 {
                self.token.cancel();
            }
            self.inner.stroke_path(path)
        }

        fn show_glyphs(&mut self, run: &GlyphRun) -> CanvasResult<()> {
            self.inner.show_glyphs(run)
        }
    }

    #[test]
    fn test_cancel_inside_nested_group_keeps_stack_balanced() {
        let token = CancellationToken::new();
        let rect = json!({"type": "rect", "x": 0, "y": 0, "width": 1, "height": 1});
        let doc = doc(json!({
            "elements": [{
                "type": "group",
                "style": {"transform": [{"op": "scale", "x": 2}]},
                "children": [
                    rect.clone(),
                    {"type": "group", "children": [rect.clone(), rect.clone(), rect.clone()]}
                ]
            }, rect]
        }));
        let mut canvas = CancelAfter {
            inner: MeasureCanvas::new(),
            token: token.clone(),
            strokes_left: 2,
        };
        canvas.save();

        let report = Renderer::new()
            .with_cancellation(token)
            .render(&mut canvas, &doc)
            .unwrap();
        assert!(report.cancelled);
        assert_eq!(canvas.inner.stroke_count(), 2);
        assert_eq!(canvas.depth(), 1);
        assert!(canvas.transform().is_identity());
    }

    #[test]
    fn test_field_names_are_validated() {
        let doc = doc(json!({
            "field_prefix": "form",
            "elements": [
                {"type": "field", "name": "signature", "x": 0, "y": 0, "width": 50, "height": 10},
                {"type": "field", "id": "again", "name": " signature ",
                 "x": 0, "y": 20, "width": 50, "height": 10},
                {"type": "field", "id": "blank", "name": "", "x": 0, "y": 40, "width": 50, "height": 10}
            ]
        }));
        let measurement = Renderer::new().measure(&doc).unwrap();
        assert_eq!(measurement.fields, vec!["form.signature".to_string()]);
        let failed: Vec<&str> = measurement
            .report
            .failures
            .iter()
            .map(|f| f.id.as_str())
            .collect();
        assert_eq!(failed, vec!["again", "blank"]);
    }

    #[test]
    fn test_disabled_fields_draw_nothing() {
        let doc = doc(json!({
            "fields_enabled": false,
            "elements": [
                {"type": "field", "name": "a", "x": 0, "y": 0, "width": 5, "height": 5},
                {"type": "field", "name": "a", "x": 0, "y": 0, "width": 5, "height": 5}
            ]
        }));
        let measurement = Renderer::new().measure(&doc).unwrap();
        assert!(measurement.report.is_clean());
        assert!(measurement.fields.is_empty());
        assert_eq!(measurement.draw_calls, 0);
    }

    #[test]
    fn test_text_path_glyph_boxes() {
        let doc = doc(json!({
            "elements": [{
                "type": "text_path", "text": "abc", "d": "M 0 0 L 100 0",
                "style": {"text_size": 10}
            }]
        }));
        let mut canvas = MeasureCanvas::new();
        Renderer::new().render(&mut canvas, &doc).unwrap();
        assert_eq!(canvas.glyph_count(), 1);
        let bounds = canvas.bounds().unwrap();
        assert!(bounds.approx_eq(&Rectangle::new(0.0, -8.0, 18.0, 10.0), 1e-9));
    }

    #[test]
    fn test_text_past_the_end_is_dropped() {
        let doc = doc(json!({
            "elements": [{
                "type": "text_path", "text": "abcdef", "d": "M 0 0 L 20 0",
                "style": {"text_size": 10}
            }]
        }));
        let mut canvas = MeasureCanvas::new();
        Renderer::new().render(&mut canvas, &doc).unwrap();
        // Advances of 6: midpoints at 3, 9, 15 fit, 21 does not
        let bounds = canvas.bounds().unwrap();
        assert!((bounds.width - 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_auto_size_includes_margin() {
        let doc = doc(json!({
            "margin": 5,
            "elements": [{"type": "rect", "x": 0, "y": 0, "width": 50, "height": 20,
                          "style": {"line_width": 2}}]
        }));
        let measurement = Renderer::new().measure(&doc).unwrap();
        assert_eq!(measurement.width, 61.0);
        assert_eq!(measurement.height, 31.0);
        let content = measurement.content.unwrap();
        assert_eq!(content.x, 4.0);
    }

    #[test]
    fn test_explicit_size_wins() {
        let doc = doc(json!({"width": 200, "height": 100, "elements": []}));
        let measurement = Renderer::new().measure(&doc).unwrap();
        assert_eq!((measurement.width, measurement.height), (200.0, 100.0));
        assert!(measurement.content.is_none());
    }

    #[test]
    fn test_negative_margin_rejected() {
        let doc = doc(json!({"margin": -1, "elements": []}));
        assert!(matches!(
            Renderer::new().measure(&doc),
            Err(RenderError::InvalidElement { .. })
        ));
    }
}
