//! Arc-length addressable path calculators.
//!
//! Every shape that can carry text or be measured is a [`PathCalculator`]:
//! a closed set of variants sharing one contract (length, closedness,
//! point at a distance, bounding box, handles). Straight and circular
//! variants are exact; arcs and curves go through a sampled lookup table.

mod circle;
mod composite;
mod line;
mod polyline;
mod sampled;

pub use circle::CircleCalc;
pub use composite::CompositeCalc;
pub use line::LineCalc;
pub use polyline::{PolylineCalc, RectCalc};
pub use sampled::{CurveFn, CurveSource, SampledCurve, DEFAULT_SAMPLES};

use crate::arc::{ArcParameterization, CenterArc, EndpointArc};
use crate::bezier::append_arc_cubics;
use crate::geometry::{Point, Rectangle, Vector, COINCIDENT_EPSILON};
use crate::handles::PathHandleData;
use crate::path::PathData;
use sampled::to_kurbo;

/// A point on a path with the unit normal at that point.
///
/// The normal is the travel direction rotated by +90 degrees. Paths with
/// no direction at all (a single point, or points that all coincide)
/// report a zero normal, so `tangent()` is zero and `angle()` is 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    pub point: Point,
    pub normal: Vector,
}

impl PathPoint {
    pub fn new(point: Point, normal: Vector) -> Self {
        Self { point, normal }
    }

    pub(crate) fn from_tangent(point: Point, direction: Vector) -> Self {
        Self::new(point, direction.normalize().perpendicular())
    }

    /// Unit travel direction.
    pub fn tangent(&self) -> Vector {
        Vector::new(self.normal.y, -self.normal.x)
    }

    /// Direction angle of travel in radians.
    pub fn angle(&self) -> f64 {
        self.tangent().angle()
    }
}

/// `distance` lies in `[0, length]`; false for NaN.
pub(crate) fn in_range(distance: f64, length: f64) -> bool {
    distance >= 0.0 && distance <= length
}

/// A path addressable by arc length.
#[derive(Debug, Clone)]
pub enum PathCalculator {
    Line(LineCalc),
    Circle(CircleCalc),
    Rect(RectCalc),
    Polyline(PolylineCalc),
    /// Sampled elliptical arc; the source is always [`CurveSource::EllipticalArc`].
    EllipticalArc(SampledCurve),
    Curve(SampledCurve),
    Composite(CompositeCalc),
}

impl PathCalculator {
    pub fn line(p1: Point, p2: Point) -> Self {
        PathCalculator::Line(LineCalc::new(p1, p2))
    }

    pub fn circle(center: Point, radius: f64) -> Self {
        PathCalculator::Circle(CircleCalc::new(center, radius))
    }

    pub fn rect(rect: Rectangle) -> Self {
        PathCalculator::Rect(RectCalc::new(rect))
    }

    pub fn polyline(points: Vec<Point>) -> Self {
        PathCalculator::Polyline(PolylineCalc::new(points, false))
    }

    pub fn polygon(points: Vec<Point>) -> Self {
        PathCalculator::Polyline(PolylineCalc::new(points, true))
    }

    /// Center-form elliptical arc with the default sample count.
    pub fn elliptical_arc(arc: CenterArc) -> Self {
        Self::elliptical_arc_with_samples(arc, DEFAULT_SAMPLES)
    }

    pub fn elliptical_arc_with_samples(arc: CenterArc, samples: usize) -> Self {
        PathCalculator::EllipticalArc(SampledCurve::with_samples(
            CurveSource::EllipticalArc(arc),
            samples,
        ))
    }

    /// SVG endpoint arc; degenerate radii or endpoints give a line.
    pub fn endpoint_arc(arc: &EndpointArc) -> Self {
        match arc.to_center() {
            ArcParameterization::Center(center) => Self::elliptical_arc(center),
            ArcParameterization::LineTo => Self::line(arc.from, arc.to),
        }
    }

    pub fn cubic(p0: Point, p1: Point, p2: Point, p3: Point) -> Self {
        PathCalculator::Curve(SampledCurve::new(CurveSource::Cubic(kurbo::CubicBez::new(
            to_kurbo(p0),
            to_kurbo(p1),
            to_kurbo(p2),
            to_kurbo(p3),
        ))))
    }

    pub fn quadratic(p0: Point, p1: Point, p2: Point) -> Self {
        PathCalculator::Curve(SampledCurve::new(CurveSource::Quadratic(kurbo::QuadBez::new(
            to_kurbo(p0),
            to_kurbo(p1),
            to_kurbo(p2),
        ))))
    }

    /// Arbitrary parametric curve `t ∈ [0, 1] -> (point, unit normal)`.
    pub fn curve<F>(f: F, samples: usize) -> Self
    where
        F: Fn(f64) -> (Point, Vector) + Send + Sync + 'static,
    {
        PathCalculator::Curve(SampledCurve::with_samples(
            CurveSource::Function(std::sync::Arc::new(f)),
            samples,
        ))
    }

    /// Join parts into one path. A single part is returned as is.
    pub fn composite(parts: Vec<PathCalculator>) -> Self {
        let mut parts = parts;
        if parts.len() == 1 {
            if let Some(only) = parts.pop() {
                return only;
            }
        }
        PathCalculator::Composite(CompositeCalc::new(parts, false))
    }

    /// Close the path with an explicit line back to its start.
    ///
    /// Variants that are always closed are returned unchanged. No line is
    /// added when the end already meets the start.
    pub fn close(self) -> Self {
        match self {
            PathCalculator::Circle(_) | PathCalculator::Rect(_) => self,
            PathCalculator::Polyline(p) => {
                PathCalculator::Polyline(PolylineCalc::new(p.points().to_vec(), true))
            }
            PathCalculator::Composite(c) if c.is_explicitly_closed() => PathCalculator::Composite(c),
            other => {
                let (start, end) = match (other.start_point(), other.end_point()) {
                    (Some(start), Some(end)) => (start, end),
                    _ => return other,
                };
                let mut parts = vec![other];
                if !end.approx_eq(start, COINCIDENT_EPSILON) {
                    parts.push(Self::line(end, start));
                }
                PathCalculator::Composite(CompositeCalc::new(parts, true))
            }
        }
    }

    pub fn length(&self) -> f64 {
        match self {
            PathCalculator::Line(l) => l.length(),
            PathCalculator::Circle(c) => c.length(),
            PathCalculator::Rect(r) => r.length(),
            PathCalculator::Polyline(p) => p.length(),
            PathCalculator::EllipticalArc(s) | PathCalculator::Curve(s) => s.length(),
            PathCalculator::Composite(c) => c.length(),
        }
    }

    pub fn is_closed(&self) -> bool {
        match self {
            PathCalculator::Line(_) => false,
            PathCalculator::Circle(_) | PathCalculator::Rect(_) => true,
            PathCalculator::Polyline(p) => p.is_closed(),
            PathCalculator::EllipticalArc(s) | PathCalculator::Curve(s) => {
                s.start_point().approx_eq(s.end_point(), COINCIDENT_EPSILON)
            }
            PathCalculator::Composite(c) => c.is_closed(),
        }
    }

    /// Point and normal at arc length `distance`, or `None` outside
    /// `[0, length]`.
    pub fn point_at(&self, distance: f64) -> Option<PathPoint> {
        match self {
            PathCalculator::Line(l) => l.point_at(distance),
            PathCalculator::Circle(c) => c.point_at(distance),
            PathCalculator::Rect(r) => r.point_at(distance),
            PathCalculator::Polyline(p) => p.point_at(distance),
            PathCalculator::EllipticalArc(s) | PathCalculator::Curve(s) => s.point_at(distance),
            PathCalculator::Composite(c) => c.point_at(distance),
        }
    }

    pub fn start_point(&self) -> Option<Point> {
        match self {
            PathCalculator::Line(l) => Some(l.p1),
            PathCalculator::Circle(c) => Some(c.start_point()),
            PathCalculator::Rect(r) => Some(r.corners()[0]),
            PathCalculator::Polyline(p) => p.start_point(),
            PathCalculator::EllipticalArc(s) | PathCalculator::Curve(s) => Some(s.start_point()),
            PathCalculator::Composite(c) => c.start_point(),
        }
    }

    pub fn end_point(&self) -> Option<Point> {
        match self {
            PathCalculator::Line(l) => Some(l.p2),
            PathCalculator::Circle(c) => Some(c.start_point()),
            PathCalculator::Rect(r) => Some(r.corners()[0]),
            PathCalculator::Polyline(p) => p.end_point(),
            PathCalculator::EllipticalArc(s) | PathCalculator::Curve(s) => Some(s.end_point()),
            PathCalculator::Composite(c) => c.end_point(),
        }
    }

    pub fn bounding_box(&self) -> Rectangle {
        match self {
            PathCalculator::Line(l) => l.bounding_box(),
            PathCalculator::Circle(c) => c.bounding_box(),
            PathCalculator::Rect(r) => r.bounding_box(),
            PathCalculator::Polyline(p) => p.bounding_box(),
            PathCalculator::EllipticalArc(s) | PathCalculator::Curve(s) => s.bounding_box(),
            PathCalculator::Composite(c) => c.bounding_box(),
        }
    }

    /// Editable control points; `None` for function curves and empty composites.
    pub fn handles(&self) -> Option<PathHandleData> {
        match self {
            PathCalculator::Line(l) => Some(l.handles()),
            PathCalculator::Circle(c) => Some(c.handles()),
            PathCalculator::Rect(r) => Some(r.handles()),
            PathCalculator::Polyline(p) => Some(p.handles()),
            PathCalculator::EllipticalArc(s) | PathCalculator::Curve(s) => s.handles(),
            PathCalculator::Composite(c) => c.handles(),
        }
    }

    /// Parts that begin their own subpath when drawn.
    fn starts_subpath(&self) -> bool {
        match self {
            PathCalculator::Circle(_) | PathCalculator::Rect(_) => true,
            PathCalculator::Polyline(p) => p.is_closed(),
            _ => false,
        }
    }

    /// Drawable path data for this calculator.
    pub fn to_path_data(&self) -> PathData {
        let mut path = PathData::new();
        self.append_to(&mut path);
        path
    }

    /// Append to `path`, joining open shapes to its current point with a line.
    pub fn append_to(&self, path: &mut PathData) {
        match self {
            PathCalculator::Line(l) => {
                path.connect_to(l.p1);
                path.line_to(l.p2);
            }
            PathCalculator::Circle(c) => {
                if c.radius > 0.0 {
                    path.move_to(c.start_point());
                    append_arc_cubics(path, &c.as_arc());
                    path.close();
                }
            }
            PathCalculator::Rect(r) => {
                let [p0, p1, p2, p3] = r.corners();
                path.move_to(p0);
                path.line_to(p1);
                path.line_to(p2);
                path.line_to(p3);
                path.close();
            }
            PathCalculator::Polyline(p) => {
                let Some((first, rest)) = p.points().split_first() else {
                    return;
                };
                if p.is_closed() {
                    path.move_to(*first);
                } else {
                    path.connect_to(*first);
                }
                for point in rest {
                    path.line_to(*point);
                }
                if p.is_closed() {
                    path.close();
                }
            }
            PathCalculator::EllipticalArc(s) | PathCalculator::Curve(s) => s.append_to(path),
            PathCalculator::Composite(c) => {
                let begins_fresh = path.current_point().is_none();
                for part in c.parts() {
                    part.append_to(path);
                }
                if begins_fresh && c.is_closed() && !c.parts().iter().any(Self::starts_subpath) {
                    path.close();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn three_parts() -> Vec<PathCalculator> {
        vec![
            PathCalculator::line(Point::new(0.0, 0.0), Point::new(10.0, 0.0)),
            PathCalculator::elliptical_arc(CenterArc::circular(
                Point::new(10.0, 5.0),
                5.0,
                -FRAC_PI_2,
                PI,
            )),
            PathCalculator::line(Point::new(10.0, 10.0), Point::new(0.0, 10.0)),
        ]
    }

    #[test]
    fn test_composite_length_is_sum() {
        let parts = three_parts();
        let expected: f64 = parts.iter().map(PathCalculator::length).sum();
        let composite = PathCalculator::composite(parts);
        assert!((composite.length() - expected).abs() < 1e-12);
    }

    #[rstest]
    #[case(0.0)]
    #[case(0.5)]
    #[case(0.999_999)]
    fn test_composite_delegates_at_boundaries(#[case] fraction: f64) {
        let parts = three_parts();
        let composite = PathCalculator::composite(parts.clone());
        let mut offset = 0.0;
        for part in &parts {
            let x = part.length() * fraction;
            let expected = part.point_at(x).unwrap();
            let actual = composite.point_at(offset + x).unwrap();
            assert!(actual.point.approx_eq(expected.point, 1e-9));
            assert!(actual.normal.approx_eq(expected.normal, 1e-6));
            offset += part.length();
        }
    }

    #[test]
    fn test_composite_outside_range() {
        let composite = PathCalculator::composite(three_parts());
        assert!(composite.point_at(-0.1).is_none());
        assert!(composite.point_at(composite.length() + 0.1).is_none());
        assert!(composite.point_at(f64::NAN).is_none());
        assert!(composite.point_at(composite.length()).is_some());
    }

    #[test]
    fn test_single_part_collapses() {
        let only = PathCalculator::composite(vec![PathCalculator::circle(Point::ORIGIN, 3.0)]);
        assert!(matches!(only, PathCalculator::Circle(_)));
    }

    #[test]
    fn test_nested_composites_flatten() {
        let inner = PathCalculator::composite(three_parts());
        let outer = PathCalculator::composite(vec![
            inner,
            PathCalculator::line(Point::new(0.0, 10.0), Point::new(0.0, 20.0)),
        ]);
        let PathCalculator::Composite(c) = &outer else {
            panic!("expected a composite");
        };
        assert_eq!(c.parts().len(), 4);
        assert!(c.parts().iter().all(|p| !matches!(p, PathCalculator::Composite(_))));
    }

    #[test]
    fn test_empty_composite() {
        let empty = PathCalculator::composite(vec![]);
        assert_eq!(empty.length(), 0.0);
        assert!(empty.point_at(0.0).is_none());
        assert_eq!(empty.bounding_box(), Rectangle::default());
        assert!(empty.handles().is_none());
        assert!(!empty.is_closed());
    }

    #[test]
    fn test_close_appends_line() {
        let open = PathCalculator::composite(three_parts());
        assert!(!open.is_closed());
        let before = open.length();
        let closed = open.close();
        assert!(closed.is_closed());
        assert!((closed.length() - before - 10.0).abs() < 1e-9);
        let PathCalculator::Composite(c) = &closed else {
            panic!("expected a composite");
        };
        assert_eq!(c.parts().len(), 4);
        assert!(matches!(c.parts()[3], PathCalculator::Line(_)));
    }

    #[test]
    fn test_elliptical_arc_round_trip() {
        let arc = CenterArc::elliptical(Point::new(100.0, 80.0), 60.0, 25.0, 0.5, 0.3, 2.2);
        let endpoints = arc.to_endpoint();
        let calc = PathCalculator::endpoint_arc(&endpoints);
        let start = calc.point_at(0.0).unwrap().point;
        let end = calc.point_at(calc.length()).unwrap().point;
        assert!(start.approx_eq(endpoints.from, 1e-3));
        assert!(end.approx_eq(endpoints.to, 1e-3));
    }

    #[test]
    fn test_degenerate_endpoint_arc_is_line() {
        let calc = PathCalculator::endpoint_arc(&EndpointArc {
            from: Point::ORIGIN,
            to: Point::new(3.0, 4.0),
            radius_x: 0.0,
            radius_y: 2.0,
            rotation: 0.0,
            large_arc: false,
            sweep: false,
        });
        assert!(matches!(calc, PathCalculator::Line(_)));
        assert_eq!(calc.length(), 5.0);
    }

    /// Rounded rectangle as 4 edges and 4 quarter arcs.
    fn rounded_rect(x: f64, y: f64, w: f64, h: f64, r: f64) -> PathCalculator {
        let corner = |cx: f64, cy: f64, start: f64| {
            PathCalculator::elliptical_arc(CenterArc::circular(Point::new(cx, cy), r, start, FRAC_PI_2))
        };
        PathCalculator::composite(vec![
            PathCalculator::line(Point::new(x + r, y), Point::new(x + w - r, y)),
            corner(x + w - r, y + r, -FRAC_PI_2),
            PathCalculator::line(Point::new(x + w, y + r), Point::new(x + w, y + h - r)),
            corner(x + w - r, y + h - r, 0.0),
            PathCalculator::line(Point::new(x + w - r, y + h), Point::new(x + r, y + h)),
            corner(x + r, y + h - r, FRAC_PI_2),
            PathCalculator::line(Point::new(x, y + h - r), Point::new(x, y + r)),
            corner(x + r, y + r, PI),
        ])
    }

    #[test]
    fn test_rounded_rect_composite() {
        let (x, y, w, h, r) = (20.0, 30.0, 200.0, 120.0, 15.0);
        let calc = rounded_rect(x, y, w, h, r);
        assert!(calc.is_closed());

        let expected = 2.0 * (w + h) - 8.0 * r + 2.0 * PI * r;
        assert!((calc.length() - expected).abs() / expected < 1e-4, "{}", calc.length());

        assert!(calc
            .bounding_box()
            .approx_eq(&Rectangle::new(x, y, w, h), 1e-9));
    }

    #[test]
    fn test_path_point_angle() {
        let line = PathCalculator::line(Point::ORIGIN, Point::new(0.0, 5.0));
        let p = line.point_at(1.0).unwrap();
        assert!((p.angle() - FRAC_PI_2).abs() < 1e-12);
        assert!(p.normal.approx_eq(Vector::new(-1.0, 0.0), 1e-12));
    }

    #[test]
    fn test_path_data_for_composite_closes_once() {
        let path = rounded_rect(0.0, 0.0, 100.0, 50.0, 10.0).to_path_data();
        let closes = path
            .commands()
            .iter()
            .filter(|c| matches!(c, crate::path::PathCommand::Close))
            .count();
        assert_eq!(closes, 1);
        assert!(matches!(path.commands()[0], crate::path::PathCommand::MoveTo(_)));
    }
}
