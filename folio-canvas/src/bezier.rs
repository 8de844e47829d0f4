//! Arc approximation using cubic bezier curves.
//!
//! Backends such as tiny-skia and PDF content streams have no arc
//! primitive, so arcs are split into fragments of at most 90 degrees and
//! each fragment becomes one cubic whose endpoints lie exactly on the arc.

use crate::arc::CenterArc;
use crate::geometry::{Point, Vector};
use crate::path::PathData;
use std::f64::consts::{FRAC_PI_2, TAU};

/// One cubic bezier segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicSegment {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

impl CubicSegment {
    /// Evaluate the curve at `t ∈ [0, 1]`.
    pub fn eval(&self, t: f64) -> Point {
        let mt = 1.0 - t;
        let a = mt * mt * mt;
        let b = 3.0 * mt * mt * t;
        let c = 3.0 * mt * t * t;
        let d = t * t * t;
        Point::new(
            a * self.p0.x + b * self.p1.x + c * self.p2.x + d * self.p3.x,
            a * self.p0.y + b * self.p1.y + c * self.p2.y + d * self.p3.y,
        )
    }
}

/// Control-point offset ratio for an arc fragment with half-angle `h`.
pub fn kappa(half_angle: f64) -> f64 {
    let sin = half_angle.sin().abs();
    if sin < f64::EPSILON {
        return 0.0;
    }
    4.0 / 3.0 * (1.0 - half_angle.cos()).abs() / sin
}

/// Number of fragments needed so that none spans more than 90 degrees.
///
/// Extents beyond two full turns are counted as two turns.
pub fn fragment_count(extent: f64) -> usize {
    let extent = extent.abs().min(2.0 * TAU);
    // Shave a rounding error off so that exactly 2π yields 4, not 5
    ((extent / FRAC_PI_2 - 1e-9).ceil() as usize).max(1)
}

/// Reduce an extent of more than one turn to one turn plus the remainder.
///
/// The end angle stays the same modulo 2π and the whole ellipse is still
/// traced.
fn wrap_extent(extent: f64) -> f64 {
    if extent.abs() <= TAU {
        extent
    } else {
        (TAU + extent.abs() % TAU).copysign(extent)
    }
}

/// Approximate an arc by cubic bezier fragments.
///
/// Returns no segments for a zero extent or degenerate radii.
pub fn arc_to_cubics(arc: &CenterArc) -> Vec<CubicSegment> {
    let extent = arc.sweep_angle;
    if extent == 0.0 || !extent.is_finite() || arc.radius_x <= 0.0 || arc.radius_y <= 0.0 {
        return Vec::new();
    }
    let extent = wrap_extent(extent);

    let n = fragment_count(extent);
    let step = extent / n as f64;
    let k = kappa(step / 2.0);
    let sign = extent.signum();

    // Tangent of the unit-parameter ellipse, scaled by the radii and rotated
    let tangent = |theta: f64| -> Vector {
        let (sin, cos) = theta.sin_cos();
        Vector::new(-arc.radius_x * sin, arc.radius_y * cos).rotate(arc.rotation)
    };

    (0..n)
        .map(|i| {
            let theta0 = arc.start_angle + i as f64 * step;
            let theta1 = if i + 1 == n {
                arc.start_angle + extent
            } else {
                theta0 + step
            };
            let p0 = arc.point_at_angle(theta0);
            let p3 = arc.point_at_angle(theta1);
            CubicSegment {
                p0,
                p1: p0 + tangent(theta0) * (sign * k),
                p2: p3 - tangent(theta1) * (sign * k),
                p3,
            }
        })
        .collect()
}

/// Append an arc to `path` as cubic fragments.
///
/// The arc start is connected with a line when the path already has a
/// current point, otherwise the path moves to it.
pub fn append_arc_cubics(path: &mut PathData, arc: &CenterArc) {
    let segments = arc_to_cubics(arc);
    let Some(first) = segments.first() else {
        return;
    };
    path.connect_to(first.p0);
    for seg in &segments {
        path.cubic_to(seg.p1, seg.p2, seg.p3);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::f64::consts::PI;

    #[test]
    fn test_quarter_kappa_constant() {
        assert!((kappa(PI / 4.0) - 0.552_284_749_8).abs() < 1e-9);
    }

    #[rstest]
    #[case(TAU, 4)]
    #[case(-TAU, 4)]
    #[case(FRAC_PI_2, 1)]
    #[case(FRAC_PI_2 + 0.01, 2)]
    #[case(0.1, 1)]
    #[case(3.0 * PI, 6)]
    #[case(1e300, 8)]
    #[case(f64::MAX, 8)]
    fn test_fragment_count(#[case] extent: f64, #[case] expected: usize) {
        assert_eq!(fragment_count(extent), expected);
    }

    #[test]
    fn test_full_circle_radial_deviation() {
        let radius = 100.0;
        let arc = CenterArc::circular(Point::new(10.0, -20.0), radius, 0.0, TAU);
        let segments = arc_to_cubics(&arc);
        assert_eq!(segments.len(), 4);

        let mut max_deviation: f64 = 0.0;
        for seg in &segments {
            for t in [0.25, 0.5, 0.75] {
                let r = seg.eval(t).distance(arc.center);
                max_deviation = max_deviation.max((r - radius).abs());
            }
        }
        assert!(max_deviation / radius < 0.003, "{}", max_deviation);
        // The endpoints close the loop exactly
        assert!(segments[3].p3.approx_eq(segments[0].p0, 1e-9));
    }

    #[test]
    fn test_negative_extent_runs_clockwise() {
        let arc = CenterArc::circular(Point::ORIGIN, 1.0, 0.0, -FRAC_PI_2);
        let segments = arc_to_cubics(&arc);
        assert_eq!(segments.len(), 1);
        let seg = segments[0];
        assert!(seg.p3.approx_eq(Point::new(0.0, -1.0), 1e-12));
        // First control point heads towards negative y
        assert!(seg.p1.y < 0.0);
        assert!((seg.p1.x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_elliptical_endpoints_exact() {
        let arc = CenterArc::elliptical(Point::new(5.0, 5.0), 40.0, 10.0, 0.6, 0.3, 4.0);
        let segments = arc_to_cubics(&arc);
        assert_eq!(segments.len(), 3);
        assert!(segments[0].p0.approx_eq(arc.start_point(), 1e-9));
        assert!(segments[2].p3.approx_eq(arc.end_point(), 1e-9));
    }

    #[test]
    fn test_many_turns_stay_bounded() {
        let arc = CenterArc::circular(Point::ORIGIN, 2.0, 0.3, 5.0 * PI + 0.5);
        let segments = arc_to_cubics(&arc);
        assert_eq!(segments.len(), 7);
        assert!(segments[6].p3.approx_eq(arc.end_point(), 1e-9));

        let huge = CenterArc::circular(Point::ORIGIN, 2.0, 0.0, 1e300);
        let segments = arc_to_cubics(&huge);
        assert!(segments.len() <= 8);
        assert!(segments
            .iter()
            .all(|seg| seg.p3.x.is_finite() && seg.p3.y.is_finite()));
    }

    #[test]
    fn test_append_connects_with_line() {
        let mut path = PathData::new();
        path.move_to(Point::new(-5.0, 0.0));
        append_arc_cubics(&mut path, &CenterArc::circular(Point::ORIGIN, 1.0, 0.0, PI));
        assert!(matches!(
            path.commands()[1],
            crate::path::PathCommand::LineTo(p) if p.approx_eq(Point::new(1.0, 0.0), 1e-12)
        ));
        assert_eq!(path.len(), 4);
    }
}
