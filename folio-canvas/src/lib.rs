//! Path-geometry kernel and graphics-state engine for document composition.
//!
//! This crate provides the pieces every drawable element of a document
//! depends on:
//! - affine [`Transform`] algebra
//! - SVG endpoint arcs and their center form ([`EndpointArc`], [`CenterArc`])
//! - arc to cubic Bezier approximation ([`arc_to_cubics`])
//! - arc-length addressable [`PathCalculator`]s
//! - the save/restore [`StateStack`] behind the [`GraphicsContext`] trait
//! - the [`Canvas`] drawing contract with a dry-run [`MeasureCanvas`] and a
//!   `tiny-skia` [`RasterCanvas`]
//!
//! # Example
//!
//! ```rust,ignore
//! use folio_canvas::{Canvas, Color, GraphicsContext, PathCalculator, Point, RasterCanvas};
//!
//! let mut canvas = RasterCanvas::new(200, 100)?;
//! canvas.set_stroke_paint(Color::parse("#336699")?.into());
//! let line = PathCalculator::line(Point::new(10.0, 10.0), Point::new(190.0, 90.0));
//! canvas.draw_calculator(&line, false, true)?;
//! let png_data = canvas.to_png(None)?;
//! ```

mod arc;
mod bezier;
mod calculator;
mod canvas;
mod drawing;
mod error;
mod font;
mod geometry;
mod gradient;
mod handles;
mod path;
mod state;
mod style;
mod svg_path;
mod text_path;
mod transform;

// Re-export public API
pub use arc::{ArcParameterization, CenterArc, EndpointArc};
pub use bezier::{append_arc_cubics, arc_to_cubics, fragment_count, kappa, CubicSegment};
pub use calculator::{
    CircleCalc, CompositeCalc, CurveFn, CurveSource, LineCalc, PathCalculator, PathPoint,
    PolylineCalc, RectCalc, SampledCurve, DEFAULT_SAMPLES,
};
pub use canvas::{
    qualified_field_name, Canvas, GlyphRun, MeasureCanvas, PlacedGlyph, RasterCanvas,
    RasterCanvasBuilder, MAX_DIMENSION,
};
pub use drawing::{bevel_rect_calculator, ellipse_arc, round_rect_calculator, DrawingExt};
pub use error::{CanvasError, CanvasResult};
pub use font::{parse_font, FontSpec, FontStyle, DEFAULT_FONT_SIZE};
pub use geometry::{
    distance, ArcParams, ArcToParams, BevelRectParams, CornerRadius, EllipseParams, Point,
    RadialGradientParams, Rectangle, RoundRectParams, Vector, COINCIDENT_EPSILON,
};
pub use gradient::{Gradient, GradientKind, GradientStop, Paint};
pub use handles::PathHandleData;
pub use path::{PathCommand, PathData};
pub use state::{GraphicsContext, GraphicsState, StateSnapshot, StateStack};
pub use style::{
    Color, FillRule, LineCap, LineJoin, NamedColor, NamedColors, TextAlign, TextBaseline,
    TextFormat, TextRenderingMode,
};
pub use svg_path::{parse_svg_path, SvgPath};
pub use text_path::{place_along_path, ContinuationPolicy, GlyphPlacement};
pub use transform::Transform;
