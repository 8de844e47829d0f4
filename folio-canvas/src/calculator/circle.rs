//! Full circles.

use super::{in_range, PathPoint};
use crate::arc::CenterArc;
use crate::geometry::{Point, Rectangle, Vector};
use crate::handles::PathHandleData;
use std::f64::consts::TAU;

/// A circle traversed from angle 0 in the direction of increasing angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleCalc {
    pub center: Point,
    pub radius: f64,
}

impl CircleCalc {
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            center,
            radius: radius.abs(),
        }
    }

    pub fn length(&self) -> f64 {
        TAU * self.radius
    }

    pub fn point_at(&self, distance: f64) -> Option<PathPoint> {
        if !in_range(distance, self.length()) {
            return None;
        }
        let theta = if self.radius > 0.0 {
            distance / self.radius
        } else {
            0.0
        };
        let (sin, cos) = theta.sin_cos();
        Some(PathPoint::from_tangent(
            self.center + Vector::new(cos, sin) * self.radius,
            Vector::new(-sin, cos),
        ))
    }

    pub fn start_point(&self) -> Point {
        self.center + Vector::new(self.radius, 0.0)
    }

    pub fn bounding_box(&self) -> Rectangle {
        Rectangle::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            2.0 * self.radius,
            2.0 * self.radius,
        )
    }

    /// The full circle as a center-form arc.
    pub fn as_arc(&self) -> CenterArc {
        CenterArc::circular(self.center, self.radius, 0.0, TAU)
    }

    pub fn handles(&self) -> PathHandleData {
        PathHandleData::from_parts(vec![self.start_point(), self.center], vec![true, false], true)
    }
}
