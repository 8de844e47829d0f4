//! Polylines, polygons and axis-aligned rectangles.

use super::{in_range, PathPoint};
use crate::geometry::{Point, Rectangle, Vector};
use crate::handles::PathHandleData;

/// Connected straight segments through a point list.
///
/// A closed polyline (polygon) has an extra segment from the last point
/// back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct PolylineCalc {
    points: Vec<Point>,
    closed: bool,
    /// `cumulative[i]` is the arc length at the start of segment `i`, with
    /// one trailing entry holding the total length.
    cumulative: Vec<f64>,
}

impl PolylineCalc {
    pub fn new(points: Vec<Point>, closed: bool) -> Self {
        let segment_count = segment_count(points.len(), closed);
        let mut cumulative = Vec::with_capacity(segment_count + 1);
        cumulative.push(0.0);
        let mut total = 0.0;
        for i in 0..segment_count {
            let (a, b) = segment(&points, i);
            total += a.distance(b);
            cumulative.push(total);
        }
        Self {
            points,
            closed,
            cumulative,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    pub fn point_at(&self, distance: f64) -> Option<PathPoint> {
        if !in_range(distance, self.length()) {
            return None;
        }
        let segment_count = self.cumulative.len() - 1;
        if segment_count == 0 {
            return self
                .points
                .first()
                .map(|&p| PathPoint::new(p, Vector::ZERO));
        }

        // Segment starting at or before `distance` and ending after it; a
        // boundary belongs to the segment that starts there, so zero-length
        // segments are never picked inside the path
        let mut index = self
            .cumulative
            .partition_point(|&c| c <= distance)
            .saturating_sub(1)
            .min(segment_count - 1);
        // At the very end, step back over trailing zero-length segments
        while index > 0 && self.cumulative[index + 1] - self.cumulative[index] <= 0.0 {
            index -= 1;
        }
        let (a, b) = segment(&self.points, index);
        let seg_len = self.cumulative[index + 1] - self.cumulative[index];
        let t = if seg_len > 0.0 {
            ((distance - self.cumulative[index]) / seg_len).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let point = if t >= 1.0 { b } else { a.lerp(b, t) };
        Some(PathPoint::from_tangent(point, b - a))
    }

    pub fn start_point(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn end_point(&self) -> Option<Point> {
        if self.closed {
            self.points.first().copied()
        } else {
            self.points.last().copied()
        }
    }

    pub fn bounding_box(&self) -> Rectangle {
        Rectangle::from_points(self.points.iter().copied()).unwrap_or_default()
    }

    pub fn handles(&self) -> PathHandleData {
        PathHandleData::on_curve(self.points.clone(), self.closed)
    }
}

fn segment_count(points: usize, closed: bool) -> usize {
    match points {
        0 | 1 => 0,
        n if closed => n,
        n => n - 1,
    }
}

fn segment(points: &[Point], index: usize) -> (Point, Point) {
    (points[index], points[(index + 1) % points.len()])
}

/// An axis-aligned rectangle traversed clockwise (in y-down space) from
/// its origin corner.
#[derive(Debug, Clone, PartialEq)]
pub struct RectCalc {
    rect: Rectangle,
    outline: PolylineCalc,
}

impl RectCalc {
    pub fn new(rect: Rectangle) -> Self {
        // Re-normalize in case the fields were set directly
        let rect = Rectangle::new(rect.x, rect.y, rect.width, rect.height);
        Self {
            rect,
            outline: PolylineCalc::new(rect.corners().to_vec(), true),
        }
    }

    pub fn rect(&self) -> Rectangle {
        self.rect
    }

    pub fn corners(&self) -> [Point; 4] {
        self.rect.corners()
    }

    /// Perimeter, summed over the outline's segments so that
    /// `point_at(length())` always lands on the path.
    pub fn length(&self) -> f64 {
        self.outline.length()
    }

    pub fn point_at(&self, distance: f64) -> Option<PathPoint> {
        self.outline.point_at(distance)
    }

    pub fn bounding_box(&self) -> Rectangle {
        self.rect
    }

    pub fn handles(&self) -> PathHandleData {
        self.outline.handles()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]
    }

    #[test]
    fn test_open_and_closed_lengths() {
        assert_eq!(PolylineCalc::new(square(), false).length(), 30.0);
        assert_eq!(PolylineCalc::new(square(), true).length(), 40.0);
    }

    #[rstest]
    #[case(0.0, Point::new(0.0, 0.0))]
    #[case(5.0, Point::new(5.0, 0.0))]
    #[case(10.0, Point::new(10.0, 0.0))]
    #[case(15.0, Point::new(10.0, 5.0))]
    #[case(35.0, Point::new(0.0, 5.0))]
    #[case(40.0, Point::new(0.0, 0.0))]
    fn test_polygon_points(#[case] distance: f64, #[case] expected: Point) {
        let polygon = PolylineCalc::new(square(), true);
        let p = polygon.point_at(distance).unwrap();
        assert!(p.point.approx_eq(expected, 1e-12), "{:?}", p.point);
    }

    #[test]
    fn test_segment_direction() {
        let polygon = PolylineCalc::new(square(), true);
        let tangent = polygon.point_at(15.0).unwrap().tangent();
        assert!(tangent.approx_eq(Vector::new(0.0, 1.0), 1e-12));
    }

    #[test]
    fn test_degenerate_polylines() {
        let empty = PolylineCalc::new(vec![], false);
        assert_eq!(empty.length(), 0.0);
        assert!(empty.point_at(0.0).is_none());
        assert_eq!(empty.bounding_box(), Rectangle::default());

        let single = PolylineCalc::new(vec![Point::new(2.0, 3.0)], true);
        let p = single.point_at(0.0).unwrap();
        assert_eq!(p.point, Point::new(2.0, 3.0));
        assert_eq!(p.normal, Vector::ZERO);
        assert_eq!(p.angle(), 0.0);
    }

    #[test]
    fn test_duplicate_points_skip_zero_length_segment() {
        let polyline = PolylineCalc::new(
            vec![Point::new(0.0, 0.0), Point::new(0.0, 0.0), Point::new(4.0, 0.0)],
            false,
        );
        let p = polyline.point_at(0.0).unwrap();
        assert_eq!(p.point, Point::ORIGIN);
        assert!(p.tangent().approx_eq(Vector::new(1.0, 0.0), 1e-12));
        let p = polyline.point_at(2.0).unwrap();
        assert!(p.tangent().approx_eq(Vector::new(1.0, 0.0), 1e-12));
    }

    #[test]
    fn test_leading_and_trailing_duplicates_keep_direction() {
        let polyline = PolylineCalc::new(
            vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, 0.0),
                Point::new(0.0, 4.0),
                Point::new(0.0, 4.0),
            ],
            false,
        );
        let start = polyline.point_at(0.0).unwrap();
        assert!(start.tangent().approx_eq(Vector::new(0.0, 1.0), 1e-12));
        assert!((start.angle() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);

        let end = polyline.point_at(polyline.length()).unwrap();
        assert_eq!(end.point, Point::new(0.0, 4.0));
        assert!(end.tangent().approx_eq(Vector::new(0.0, 1.0), 1e-12));
    }

    #[test]
    fn test_vertex_belongs_to_following_segment() {
        let polygon = PolylineCalc::new(square(), true);
        let corner = polygon.point_at(10.0).unwrap();
        assert!(corner.point.approx_eq(Point::new(10.0, 0.0), 1e-12));
        assert!(corner.tangent().approx_eq(Vector::new(0.0, 1.0), 1e-12));
    }

    #[test]
    fn test_fractional_rects_reach_their_end() {
        for i in 1..40 {
            for j in 1..40 {
                let rect = RectCalc::new(Rectangle::new(0.1 * i as f64, 0.3, 0.1 * j as f64, 0.7));
                let end = rect.point_at(rect.length());
                assert!(end.is_some(), "{:?} length {}", rect.rect(), rect.length());
                assert!(end.unwrap().point.approx_eq(rect.corners()[0], 1e-9));
                assert!((rect.length() - 2.0 * (0.1 * j as f64 + 0.7)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_rect_normalizes_and_walks_clockwise() {
        let rect = RectCalc::new(Rectangle {
            x: 10.0,
            y: 10.0,
            width: -10.0,
            height: 5.0,
        });
        assert_eq!(rect.rect(), Rectangle::new(0.0, 10.0, 10.0, 5.0));
        assert_eq!(rect.length(), 30.0);
        assert!(rect
            .point_at(12.0)
            .unwrap()
            .point
            .approx_eq(Point::new(10.0, 12.0), 1e-12));
        assert!(rect.handles().is_closed());
        assert_eq!(rect.handles().len(), 4);
    }
}
