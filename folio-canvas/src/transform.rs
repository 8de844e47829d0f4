//! Affine transformation matrices.

use crate::error::{CanvasError, CanvasResult};
use crate::geometry::{Point, Vector};
use std::ops::Mul;

/// An immutable 2D affine transformation.
///
/// The matrix is represented as:
/// ```text
/// | a c e |
/// | b d f |
/// | 0 0 1 |
/// ```
///
/// Composition follows column-vector convention: `(A * B).map(p) == A.map(B.map(p))`,
/// so `B` is applied first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Scale X component.
    pub a: f64,
    /// Skew Y component.
    pub b: f64,
    /// Skew X component.
    pub c: f64,
    /// Scale Y component.
    pub d: f64,
    /// Translate X component.
    pub e: f64,
    /// Translate Y component.
    pub f: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Create a transform from its six coefficients.
    pub const fn matrix(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Create an identity matrix.
    pub const fn identity() -> Self {
        Self::matrix(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub const fn translate(x: f64, y: f64) -> Self {
        Self::matrix(1.0, 0.0, 0.0, 1.0, x, y)
    }

    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::matrix(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation by `angle` radians about the origin.
    pub fn rotate(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::matrix(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Rotation by `angle` radians about `(x, y)`.
    ///
    /// Equal to `translate(x, y) * rotate(angle) * translate(-x, -y)`,
    /// expanded into a single matrix.
    pub fn rotate_about(angle: f64, x: f64, y: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::matrix(
            cos,
            sin,
            -sin,
            cos,
            x - cos * x + sin * y,
            y - sin * x - cos * y,
        )
    }

    /// Horizontal skew by `angle` radians.
    pub fn skew_x(angle: f64) -> Self {
        Self::matrix(1.0, 0.0, angle.tan(), 1.0, 0.0, 0.0)
    }

    /// Vertical skew by `angle` radians.
    pub fn skew_y(angle: f64) -> Self {
        Self::matrix(1.0, angle.tan(), 0.0, 1.0, 0.0, 0.0)
    }

    /// `self * other`: `other` is applied first, then `self`.
    pub fn compose(&self, other: &Transform) -> Transform {
        Transform {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// The inverse transform.
    ///
    /// Fails with [`CanvasError::NonInvertibleTransform`] when the
    /// determinant is zero (or not finite).
    pub fn invert(&self) -> CanvasResult<Transform> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return Err(CanvasError::NonInvertibleTransform { determinant: det });
        }
        Ok(Transform {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }

    /// Map a point through the full transform.
    pub fn map(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Map a vector through the linear part only.
    pub fn map_vector(&self, v: Vector) -> Vector {
        Vector::new(self.a * v.x + self.c * v.y, self.b * v.x + self.d * v.y)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Average length of the mapped unit axes.
    ///
    /// Used to scale user-space stroke widths into device space.
    pub fn average_scale(&self) -> f64 {
        (self.a.hypot(self.b) + self.c.hypot(self.d)) / 2.0
    }

    /// Component-wise comparison within `eps`.
    pub fn approx_eq(&self, other: &Transform, eps: f64) -> bool {
        [
            self.a - other.a,
            self.b - other.b,
            self.c - other.c,
            self.d - other.d,
            self.e - other.e,
            self.f - other.f,
        ]
        .iter()
        .all(|delta| delta.abs() <= eps)
    }

    /// Coefficients in PDF `cm` operand order.
    pub fn to_array(&self) -> [f32; 6] {
        [
            self.a as f32,
            self.b as f32,
            self.c as f32,
            self.d as f32,
            self.e as f32,
            self.f as f32,
        ]
    }
}

impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        self.compose(&rhs)
    }
}

impl From<tiny_skia::Transform> for Transform {
    fn from(t: tiny_skia::Transform) -> Self {
        Transform::matrix(
            t.sx as f64,
            t.ky as f64,
            t.kx as f64,
            t.sy as f64,
            t.tx as f64,
            t.ty as f64,
        )
    }
}

impl From<Transform> for tiny_skia::Transform {
    fn from(m: Transform) -> Self {
        tiny_skia::Transform::from_row(
            m.a as f32, m.b as f32, m.c as f32, m.d as f32, m.e as f32, m.f as f32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_6};

    const EPS: f64 = 1e-9;

    fn samples() -> Vec<Transform> {
        vec![
            Transform::translate(3.0, -7.0),
            Transform::scale(2.0, 0.5),
            Transform::rotate(FRAC_PI_3),
            Transform::rotate_about(0.7, 10.0, -4.0),
            Transform::skew_x(FRAC_PI_6),
            Transform::skew_y(-0.3),
            Transform::matrix(1.5, 0.2, -0.4, 0.9, 12.0, 8.0),
        ]
    }

    #[test]
    fn test_double_inverse_round_trips() {
        for t in samples() {
            let back = t.invert().unwrap().invert().unwrap();
            assert!(back.approx_eq(&t, EPS), "{:?} vs {:?}", back, t);
        }
    }

    #[test]
    fn test_compose_with_inverse_is_identity() {
        for t in samples() {
            let id = t.compose(&t.invert().unwrap());
            assert!(id.approx_eq(&Transform::identity(), EPS), "{:?}", id);
        }
    }

    #[rstest]
    #[case(1.0, 2.0, 3.0, 4.0)]
    #[case(-5.5, 0.0, 10.0, -0.25)]
    fn test_translations_commute(#[case] a: f64, #[case] b: f64, #[case] c: f64, #[case] d: f64) {
        let expected = Transform::translate(a + c, b + d);
        assert_eq!(
            Transform::translate(a, b).compose(&Transform::translate(c, d)),
            expected
        );
        assert_eq!(
            Transform::translate(c, d).compose(&Transform::translate(a, b)),
            expected
        );
    }

    #[test]
    fn test_composition_is_associative() {
        let ts = samples();
        for a in &ts {
            for b in &ts {
                for c in &ts {
                    let left = a.compose(b).compose(c);
                    let right = a.compose(&b.compose(c));
                    assert!(left.approx_eq(&right, 1e-9));
                }
            }
        }
    }

    #[test]
    fn test_compose_applies_right_operand_first() {
        let t = Transform::translate(10.0, 0.0) * Transform::scale(2.0, 2.0);
        // scale first, then translate
        assert_eq!(t.map(Point::new(1.0, 1.0)), Point::new(12.0, 2.0));

        let t = Transform::scale(2.0, 2.0) * Transform::translate(10.0, 0.0);
        assert_eq!(t.map(Point::new(1.0, 1.0)), Point::new(22.0, 2.0));
    }

    #[test]
    fn test_rotate_about_matches_translate_rotate_translate() {
        let (angle, x, y) = (1.1, 25.0, -13.0);
        let composed = Transform::translate(x, y)
            * Transform::rotate(angle)
            * Transform::translate(-x, -y);
        assert!(Transform::rotate_about(angle, x, y).approx_eq(&composed, 1e-12));

        // The pivot is a fixed point
        let p = Transform::rotate_about(angle, x, y).map(Point::new(x, y));
        assert!(p.approx_eq(Point::new(x, y), 1e-12));
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let p = Transform::rotate(FRAC_PI_2).map(Point::new(1.0, 0.0));
        assert!(p.approx_eq(Point::new(0.0, 1.0), 1e-12));
    }

    #[test]
    fn test_singular_matrix_fails_to_invert() {
        let t = Transform::scale(0.0, 3.0);
        assert!(matches!(
            t.invert(),
            Err(CanvasError::NonInvertibleTransform { determinant }) if determinant == 0.0
        ));
        let t = Transform::matrix(1.0, 2.0, 2.0, 4.0, 5.0, 5.0);
        assert!(t.invert().is_err());
    }

    #[test]
    fn test_map_vector_ignores_translation() {
        let t = Transform::translate(100.0, 100.0) * Transform::scale(2.0, 3.0);
        assert_eq!(t.map_vector(Vector::new(1.0, 1.0)), Vector::new(2.0, 3.0));
    }

    #[test]
    fn test_tiny_skia_round_trip() {
        let t = Transform::matrix(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        let ts: tiny_skia::Transform = t.into();
        assert_eq!(ts.sx, 1.0);
        assert_eq!(ts.ky, 2.0);
        assert_eq!(ts.kx, 3.0);
        assert_eq!(ts.sy, 4.0);
        assert_eq!(Transform::from(ts), t);
    }
}
