//! SVG path data import.
//!
//! Path data is read with `svgtypes` and every segment becomes a path
//! calculator, so imported outlines can be measured and carry text just
//! like shapes built in code. Arcs stay true elliptical arcs instead of
//! being flattened to cubics.

use crate::arc::EndpointArc;
use crate::calculator::PathCalculator;
use crate::error::{CanvasError, CanvasResult};
use crate::geometry::Point;
use crate::path::PathData;

/// Parsed SVG path data, one calculator per subpath.
#[derive(Debug, Clone, Default)]
pub struct SvgPath {
    subpaths: Vec<PathCalculator>,
}

impl SvgPath {
    pub fn subpaths(&self) -> &[PathCalculator] {
        &self.subpaths
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    /// All subpaths addressed as one path; gaps between subpaths are skipped.
    pub fn to_calculator(&self) -> PathCalculator {
        PathCalculator::composite(self.subpaths.clone())
    }

    /// Drawable path data keeping subpaths separate.
    pub fn to_path_data(&self) -> PathData {
        let mut path = PathData::new();
        for subpath in &self.subpaths {
            if let Some(start) = subpath.start_point() {
                path.move_to(start);
            }
            subpath.append_to(&mut path);
        }
        path
    }
}

/// Accumulates the segments of the subpath being read.
#[derive(Default)]
struct SubpathBuilder {
    parts: Vec<PathCalculator>,
    subpaths: Vec<PathCalculator>,
}

impl SubpathBuilder {
    fn push(&mut self, part: PathCalculator) {
        self.parts.push(part);
    }

    fn finish(&mut self, close: bool) {
        if self.parts.is_empty() {
            return;
        }
        let subpath = PathCalculator::composite(std::mem::take(&mut self.parts));
        self.subpaths.push(if close { subpath.close() } else { subpath });
    }
}

/// Parse SVG path data (`M L H V C S Q T A Z`, absolute and relative).
pub fn parse_svg_path(data: &str) -> CanvasResult<SvgPath> {
    use svgtypes::PathSegment;

    let mut builder = SubpathBuilder::default();
    let mut current = Point::ORIGIN;
    let mut subpath_start = Point::ORIGIN;
    // Control point of the previous cubic / quadratic, for S and T reflection
    let mut last_cubic_ctrl: Option<Point> = None;
    let mut last_quad_ctrl: Option<Point> = None;

    for segment in svgtypes::PathParser::from(data) {
        let segment =
            segment.map_err(|e| CanvasError::PathError(format!("Invalid SVG path data: {}", e)))?;

        let resolve = move |abs: bool, x: f64, y: f64| {
            if abs {
                Point::new(x, y)
            } else {
                Point::new(current.x + x, current.y + y)
            }
        };

        let mut cubic_ctrl = None;
        let mut quad_ctrl = None;
        match segment {
            PathSegment::MoveTo { abs, x, y } => {
                builder.finish(false);
                current = resolve(abs, x, y);
                subpath_start = current;
            }
            PathSegment::LineTo { abs, x, y } => {
                let to = resolve(abs, x, y);
                builder.push(PathCalculator::line(current, to));
                current = to;
            }
            PathSegment::HorizontalLineTo { abs, x } => {
                let to = Point::new(if abs { x } else { current.x + x }, current.y);
                builder.push(PathCalculator::line(current, to));
                current = to;
            }
            PathSegment::VerticalLineTo { abs, y } => {
                let to = Point::new(current.x, if abs { y } else { current.y + y });
                builder.push(PathCalculator::line(current, to));
                current = to;
            }
            PathSegment::CurveTo {
                abs,
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                let (c1, c2, to) = (resolve(abs, x1, y1), resolve(abs, x2, y2), resolve(abs, x, y));
                builder.push(PathCalculator::cubic(current, c1, c2, to));
                cubic_ctrl = Some(c2);
                current = to;
            }
            PathSegment::SmoothCurveTo { abs, x2, y2, x, y } => {
                let c1 = reflect(last_cubic_ctrl, current);
                let (c2, to) = (resolve(abs, x2, y2), resolve(abs, x, y));
                builder.push(PathCalculator::cubic(current, c1, c2, to));
                cubic_ctrl = Some(c2);
                current = to;
            }
            PathSegment::Quadratic { abs, x1, y1, x, y } => {
                let (c, to) = (resolve(abs, x1, y1), resolve(abs, x, y));
                builder.push(PathCalculator::quadratic(current, c, to));
                quad_ctrl = Some(c);
                current = to;
            }
            PathSegment::SmoothQuadratic { abs, x, y } => {
                let c = reflect(last_quad_ctrl, current);
                let to = resolve(abs, x, y);
                builder.push(PathCalculator::quadratic(current, c, to));
                quad_ctrl = Some(c);
                current = to;
            }
            PathSegment::EllipticalArc {
                abs,
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                x,
                y,
            } => {
                let to = resolve(abs, x, y);
                if to != current {
                    builder.push(PathCalculator::endpoint_arc(&EndpointArc {
                        from: current,
                        to,
                        radius_x: rx,
                        radius_y: ry,
                        rotation: x_axis_rotation.to_radians(),
                        large_arc,
                        sweep,
                    }));
                }
                current = to;
            }
            PathSegment::ClosePath { .. } => {
                builder.finish(true);
                current = subpath_start;
            }
        }
        last_cubic_ctrl = cubic_ctrl;
        last_quad_ctrl = quad_ctrl;
    }
    builder.finish(false);

    log::debug!(target: "canvas", "parsed svg path: {} subpaths", builder.subpaths.len());
    Ok(SvgPath {
        subpaths: builder.subpaths,
    })
}

/// Reflection of the previous control point about `current`, or `current`
/// itself when the previous segment was not the matching curve type.
fn reflect(ctrl: Option<Point>, current: Point) -> Point {
    match ctrl {
        Some(c) => Point::new(2.0 * current.x - c.x, 2.0 * current.y - c.y),
        None => current,
    }
}
