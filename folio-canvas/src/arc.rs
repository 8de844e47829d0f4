//! Elliptical arc parameterizations.
//!
//! An arc can be described by its endpoints (the SVG `A` command form) or
//! by its center, radii and angle range. Drawing and arc-length sampling
//! work on the center form, so endpoint arcs are converted on entry.

use crate::geometry::{Point, Vector};
use std::f64::consts::{PI, TAU};

/// Relative growth applied to radii that had to be scaled up to reach both
/// endpoints, keeping the center radicand strictly positive.
const ARC_RADIUS_EPSILON: f64 = 1e-10;

/// An elliptical arc described by its endpoints (SVG endpoint parameterization).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndpointArc {
    pub from: Point,
    pub to: Point,
    pub radius_x: f64,
    pub radius_y: f64,
    /// Rotation of the ellipse's x-axis in radians.
    pub rotation: f64,
    /// Choose the arc spanning more than 180 degrees.
    pub large_arc: bool,
    /// Travel in the direction of increasing angle.
    pub sweep: bool,
}

/// Result of converting an [`EndpointArc`] to center form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArcParameterization {
    /// A radius is zero or the endpoints coincide: draw a straight line.
    LineTo,
    /// A true elliptical arc.
    Center(CenterArc),
}

/// An elliptical arc described by its center, radii and angle range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterArc {
    pub center: Point,
    pub radius_x: f64,
    pub radius_y: f64,
    /// Rotation of the ellipse's x-axis in radians.
    pub rotation: f64,
    /// Start angle θ1 in radians (ellipse-local frame).
    pub start_angle: f64,
    /// Signed angular extent Δθ in radians.
    pub sweep_angle: f64,
    /// The radii were too small to span the chord and were scaled up.
    pub radii_scaled: bool,
    /// The center radicand came out negative and was clamped to zero.
    ///
    /// Only happens with inconsistent input (non-finite or extreme
    /// coordinates); the arc is a best-effort approximation when set.
    pub discriminant_clamped: bool,
}

impl EndpointArc {
    /// Convert to center parameterization.
    ///
    /// Radii are used by absolute value and scaled up uniformly when they
    /// cannot span the chord. See SVG 2, appendix B.2.4.
    pub fn to_center(&self) -> ArcParameterization {
        let mut rx = self.radius_x.abs();
        let mut ry = self.radius_y.abs();
        if rx * rx < f64::EPSILON || ry * ry < f64::EPSILON || self.from == self.to {
            return ArcParameterization::LineTo;
        }

        let (sin_phi, cos_phi) = self.rotation.sin_cos();
        let (x1, y1) = (self.from.x, self.from.y);
        let (x2, y2) = (self.to.x, self.to.y);

        // Chord midpoint in the ellipse-local frame
        let mid_x = (x1 - x2) / 2.0;
        let mid_y = (y1 - y2) / 2.0;
        let x1p = cos_phi * mid_x + sin_phi * mid_y;
        let y1p = -sin_phi * mid_x + cos_phi * mid_y;

        let mut radii_scaled = false;
        let lambda = (x1p / rx).powi(2) + (y1p / ry).powi(2);
        if lambda > 1.0 {
            let s = lambda.sqrt() * (1.0 + ARC_RADIUS_EPSILON);
            rx *= s;
            ry *= s;
            radii_scaled = true;
        }

        let (rx2, ry2) = (rx * rx, ry * ry);
        let (x1p2, y1p2) = (x1p * x1p, y1p * y1p);
        let denominator = rx2 * y1p2 + ry2 * x1p2;
        let mut radicand = (rx2 * ry2 - rx2 * y1p2 - ry2 * x1p2) / denominator;
        let mut discriminant_clamped = false;
        if !(radicand >= 0.0) {
            log::warn!(
                target: "geometry",
                "arc radicand {} clamped to zero (from {:?} to {:?}, radii {} {})",
                radicand, self.from, self.to, self.radius_x, self.radius_y
            );
            radicand = 0.0;
            discriminant_clamped = true;
        }

        let sign = if self.large_arc == self.sweep { -1.0 } else { 1.0 };
        let coef = sign * radicand.sqrt();
        let cxp = coef * rx * y1p / ry;
        let cyp = -coef * ry * x1p / rx;

        let center = Point::new(
            cos_phi * cxp - sin_phi * cyp + (x1 + x2) / 2.0,
            sin_phi * cxp + cos_phi * cyp + (y1 + y2) / 2.0,
        );

        let u = Vector::new((x1p - cxp) / rx, (y1p - cyp) / ry);
        let v = Vector::new((-x1p - cxp) / rx, (-y1p - cyp) / ry);
        let start_angle = u.angle();
        let mut sweep_angle = u.cross(v).atan2(u.dot(v));
        if !self.sweep && sweep_angle > 0.0 {
            sweep_angle -= TAU;
        } else if self.sweep && sweep_angle < 0.0 {
            sweep_angle += TAU;
        }

        ArcParameterization::Center(CenterArc {
            center,
            radius_x: rx,
            radius_y: ry,
            rotation: self.rotation,
            start_angle,
            sweep_angle,
            radii_scaled,
            discriminant_clamped,
        })
    }
}

impl CenterArc {
    /// Arc of a circle, with no diagnostics set.
    pub fn circular(center: Point, radius: f64, start_angle: f64, sweep_angle: f64) -> Self {
        Self::elliptical(center, radius, radius, 0.0, start_angle, sweep_angle)
    }

    pub fn elliptical(
        center: Point,
        radius_x: f64,
        radius_y: f64,
        rotation: f64,
        start_angle: f64,
        sweep_angle: f64,
    ) -> Self {
        Self {
            center,
            radius_x,
            radius_y,
            rotation,
            start_angle,
            sweep_angle,
            radii_scaled: false,
            discriminant_clamped: false,
        }
    }

    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.sweep_angle
    }

    /// Position at ellipse angle `theta`.
    pub fn point_at_angle(&self, theta: f64) -> Point {
        let (sin, cos) = theta.sin_cos();
        let local = Vector::new(self.radius_x * cos, self.radius_y * sin);
        self.center + local.rotate(self.rotation)
    }

    /// Derivative of [`CenterArc::point_at_angle`] with respect to `theta`.
    pub fn derivative_at_angle(&self, theta: f64) -> Vector {
        let (sin, cos) = theta.sin_cos();
        Vector::new(-self.radius_x * sin, self.radius_y * cos).rotate(self.rotation)
    }

    pub fn start_point(&self) -> Point {
        self.point_at_angle(self.start_angle)
    }

    pub fn end_point(&self) -> Point {
        self.point_at_angle(self.end_angle())
    }

    /// Position and travel-direction derivative at parameter `t ∈ [0, 1]`.
    pub fn eval(&self, t: f64) -> (Point, Vector) {
        let theta = self.start_angle + t * self.sweep_angle;
        (
            self.point_at_angle(theta),
            self.derivative_at_angle(theta) * self.sweep_angle,
        )
    }

    /// Convert back to endpoint parameterization.
    pub fn to_endpoint(&self) -> EndpointArc {
        EndpointArc {
            from: self.start_point(),
            to: self.end_point(),
            radius_x: self.radius_x,
            radius_y: self.radius_y,
            rotation: self.rotation,
            large_arc: self.sweep_angle.abs() > PI,
            sweep: self.sweep_angle > 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::f64::consts::FRAC_PI_2;

    fn center_of(arc: &EndpointArc) -> CenterArc {
        match arc.to_center() {
            ArcParameterization::Center(c) => c,
            ArcParameterization::LineTo => panic!("expected a center arc"),
        }
    }

    #[test]
    fn test_zero_radius_is_a_line() {
        let arc = EndpointArc {
            from: Point::new(0.0, 0.0),
            to: Point::new(10.0, 0.0),
            radius_x: 0.0,
            radius_y: 5.0,
            rotation: 0.0,
            large_arc: false,
            sweep: true,
        };
        assert_eq!(arc.to_center(), ArcParameterization::LineTo);
    }

    #[test]
    fn test_half_circle_center() {
        let arc = EndpointArc {
            from: Point::new(0.0, 0.0),
            to: Point::new(10.0, 0.0),
            radius_x: 5.0,
            radius_y: 5.0,
            rotation: 0.0,
            large_arc: false,
            sweep: true,
        };
        let c = center_of(&arc);
        assert!(c.center.approx_eq(Point::new(5.0, 0.0), 1e-6));
        assert!((c.sweep_angle.abs() - PI).abs() < 1e-6);
        assert!(c.sweep_angle > 0.0);
    }

    #[test]
    fn test_small_radii_are_scaled_up() {
        let arc = EndpointArc {
            from: Point::new(0.0, 0.0),
            to: Point::new(10.0, 0.0),
            radius_x: 1.0,
            radius_y: 1.0,
            rotation: 0.0,
            large_arc: false,
            sweep: false,
        };
        let c = center_of(&arc);
        assert!(c.radii_scaled);
        assert!(!c.discriminant_clamped);
        assert!((c.radius_x - 5.0).abs() < 1e-6);
        assert!(c.start_point().approx_eq(arc.from, 1e-6));
        assert!(c.end_point().approx_eq(arc.to, 1e-6));
    }

    #[rstest]
    #[case(false, false)]
    #[case(false, true)]
    #[case(true, false)]
    #[case(true, true)]
    fn test_sweep_sign_follows_flag(#[case] large_arc: bool, #[case] sweep: bool) {
        let arc = EndpointArc {
            from: Point::new(10.0, 20.0),
            to: Point::new(40.0, 35.0),
            radius_x: 30.0,
            radius_y: 20.0,
            rotation: 0.4,
            large_arc,
            sweep,
        };
        let c = center_of(&arc);
        assert_eq!(c.sweep_angle > 0.0, sweep);
        assert_eq!(c.sweep_angle.abs() > PI, large_arc);
        assert!(c.start_point().approx_eq(arc.from, 1e-6));
        assert!(c.end_point().approx_eq(arc.to, 1e-6));
    }

    #[test]
    fn test_center_endpoint_round_trip() {
        let original = CenterArc::elliptical(Point::new(50.0, 40.0), 30.0, 12.0, 0.3, 0.2, 2.5);
        let endpoint = original.to_endpoint();
        let back = center_of(&endpoint);
        assert!(back.center.approx_eq(original.center, 1e-6));
        assert!((back.start_angle - original.start_angle).abs() < 1e-6);
        assert!((back.sweep_angle - original.sweep_angle).abs() < 1e-6);
    }

    #[test]
    fn test_nan_input_sets_clamp_diagnostic() {
        let arc = EndpointArc {
            from: Point::new(0.0, 0.0),
            to: Point::new(f64::NAN, 0.0),
            radius_x: 5.0,
            radius_y: 5.0,
            rotation: 0.0,
            large_arc: false,
            sweep: true,
        };
        let c = center_of(&arc);
        assert!(c.discriminant_clamped);
    }

    #[test]
    fn test_eval_derivative_points_along_travel() {
        let arc = CenterArc::circular(Point::ORIGIN, 1.0, 0.0, -FRAC_PI_2);
        let (p, d) = arc.eval(0.0);
        assert!(p.approx_eq(Point::new(1.0, 0.0), 1e-12));
        // Clockwise travel from (1, 0) heads towards negative y
        assert!(d.y < 0.0);
        assert!(d.x.abs() < 1e-12);
    }
}
