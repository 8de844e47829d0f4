//! Straight line segments.

use super::{in_range, PathPoint};
use crate::geometry::{Point, Rectangle};
use crate::handles::PathHandleData;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineCalc {
    pub p1: Point,
    pub p2: Point,
}

impl LineCalc {
    pub fn new(p1: Point, p2: Point) -> Self {
        Self { p1, p2 }
    }

    pub fn length(&self) -> f64 {
        self.p1.distance(self.p2)
    }

    pub fn point_at(&self, distance: f64) -> Option<PathPoint> {
        let length = self.length();
        if !in_range(distance, length) {
            return None;
        }
        let t = if length > 0.0 { distance / length } else { 0.0 };
        // Land exactly on the endpoint instead of p1 + 1.0 * (p2 - p1)
        let point = if t >= 1.0 { self.p2 } else { self.p1.lerp(self.p2, t) };
        Some(PathPoint::from_tangent(point, self.p2 - self.p1))
    }

    pub fn bounding_box(&self) -> Rectangle {
        Rectangle::from_corners(self.p1, self.p2)
    }

    pub fn handles(&self) -> PathHandleData {
        PathHandleData::on_curve(vec![self.p1, self.p2], false)
    }
}
