//! Value types and parameter structs for geometry and drawing operations.
//!
//! Points, vectors and rectangles are small immutable `Copy` values. The
//! parameter structs replace long positional argument lists with named
//! fields, grouping semantically related parameters together.

use std::ops::{Add, Mul, Neg, Sub};

/// Tolerance used when deciding whether two positions coincide.
pub const COINCIDENT_EPSILON: f64 = 1e-9;

/// A position in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points.
    pub fn distance(self, other: Point) -> f64 {
        (other - self).length()
    }

    /// Linear interpolation between `self` (t = 0) and `other` (t = 1).
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    /// Midpoint between two points.
    pub fn midpoint(self, other: Point) -> Point {
        self.lerp(other, 0.5)
    }

    /// The vector from the origin to this point.
    pub fn to_vector(self) -> Vector {
        Vector::new(self.x, self.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Whether two points coincide within `eps` on both axes.
    pub fn approx_eq(self, other: Point, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps && (self.y - other.y).abs() <= eps
    }
}

/// Distance between two points.
pub fn distance(p1: Point, p2: Point) -> f64 {
    p1.distance(p2)
}

/// A direction and magnitude, not anchored to any position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing at `angle` radians from the positive x axis.
    pub fn from_angle(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(cos, sin)
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction. The zero vector normalizes to itself.
    pub fn normalize(self) -> Vector {
        let len = self.length();
        if len > 0.0 && len.is_finite() {
            Vector::new(self.x / len, self.y / len)
        } else {
            Vector::ZERO
        }
    }

    /// Rotate counter-clockwise (in a y-up frame) by `angle` radians.
    pub fn rotate(self, angle: f64) -> Vector {
        let (sin, cos) = angle.sin_cos();
        Vector::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// The vector rotated by +90 degrees: `(-y, x)`.
    pub fn perpendicular(self) -> Vector {
        Vector::new(-self.y, self.x)
    }

    pub fn dot(self, other: Vector) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z component of the 3D cross product.
    pub fn cross(self, other: Vector) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Direction angle in radians, in `(-PI, PI]`.
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    pub fn approx_eq(self, other: Vector, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps && (self.y - other.y).abs() <= eps
    }
}

impl Add<Vector> for Point {
    type Output = Point;

    fn add(self, v: Vector) -> Point {
        Point::new(self.x + v.x, self.y + v.y)
    }
}

impl Sub<Vector> for Point {
    type Output = Point;

    fn sub(self, v: Vector) -> Point {
        Point::new(self.x - v.x, self.y - v.y)
    }
}

impl Sub<Point> for Point {
    type Output = Vector;

    fn sub(self, other: Point) -> Vector {
        Vector::new(self.x - other.x, self.y - other.y)
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, other: Vector) -> Vector {
        Vector::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, other: Vector) -> Vector {
        Vector::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, k: f64) -> Vector {
        Vector::new(self.x * k, self.y * k)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y)
    }
}

/// An axis-aligned rectangle. Width and height are never negative once
/// constructed through [`Rectangle::new`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rectangle {
    /// Create a rectangle, normalizing negative width/height.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        let (x, width) = if width < 0.0 { (x + width, -width) } else { (x, width) };
        let (y, height) = if height < 0.0 { (y + height, -height) } else { (y, height) };
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanning two opposite corners.
    pub fn from_corners(p0: Point, p1: Point) -> Self {
        Self::new(p0.x, p0.y, p1.x - p0.x, p1.y - p0.y)
    }

    /// Smallest rectangle containing every point, or `None` for no points.
    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in iter {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    pub fn min_x(&self) -> f64 {
        self.x
    }

    pub fn min_y(&self) -> f64 {
        self.y
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Corners in drawing order: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.min_x(), self.min_y()),
            Point::new(self.max_x(), self.min_y()),
            Point::new(self.max_x(), self.max_y()),
            Point::new(self.min_x(), self.max_y()),
        ]
    }

    /// Smallest rectangle containing both rectangles.
    pub fn union(&self, other: &Rectangle) -> Rectangle {
        let min_x = self.min_x().min(other.min_x());
        let min_y = self.min_y().min(other.min_y());
        let max_x = self.max_x().max(other.max_x());
        let max_y = self.max_y().max(other.max_y());
        Rectangle::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Grow the rectangle by `amount` on every side.
    pub fn inflate(&self, amount: f64) -> Rectangle {
        Rectangle::new(
            self.x - amount,
            self.y - amount,
            self.width + 2.0 * amount,
            self.height + 2.0 * amount,
        )
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x() && p.x <= self.max_x() && p.y >= self.min_y() && p.y <= self.max_y()
    }

    pub fn approx_eq(&self, other: &Rectangle, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps
            && (self.y - other.y).abs() <= eps
            && (self.width - other.width).abs() <= eps
            && (self.height - other.height).abs() <= eps
    }
}

/// Parameters for a circular arc given by its center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcParams {
    /// Center of the arc.
    pub center: Point,
    /// Radius of the arc.
    pub radius: f64,
    /// Starting angle in radians.
    pub start_angle: f64,
    /// Ending angle in radians.
    pub end_angle: f64,
    /// If true, draw arc counterclockwise.
    pub anticlockwise: bool,
}

/// Parameters for an elliptical arc given by its center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseParams {
    /// Center of the ellipse.
    pub center: Point,
    /// X-axis radius of the ellipse.
    pub radius_x: f64,
    /// Y-axis radius of the ellipse.
    pub radius_y: f64,
    /// Rotation of the ellipse in radians.
    pub rotation: f64,
    /// Starting angle in radians.
    pub start_angle: f64,
    /// Ending angle in radians.
    pub end_angle: f64,
    /// If true, draw arc counterclockwise.
    pub anticlockwise: bool,
}

impl EllipseParams {
    /// A full, unrotated ellipse inscribed in `bounds`.
    pub fn inscribed(bounds: &Rectangle) -> Self {
        Self {
            center: bounds.center(),
            radius_x: bounds.width / 2.0,
            radius_y: bounds.height / 2.0,
            rotation: 0.0,
            start_angle: 0.0,
            end_angle: std::f64::consts::TAU,
            anticlockwise: false,
        }
    }
}

impl From<&ArcParams> for EllipseParams {
    fn from(arc: &ArcParams) -> Self {
        Self {
            center: arc.center,
            radius_x: arc.radius,
            radius_y: arc.radius,
            rotation: 0.0,
            start_angle: arc.start_angle,
            end_angle: arc.end_angle,
            anticlockwise: arc.anticlockwise,
        }
    }
}

/// Parameters for an arcTo operation.
///
/// The arc is drawn from the current point through a tangent defined by
/// two control points with a given radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcToParams {
    /// Corner point shared by both tangent lines.
    pub corner: Point,
    /// Point the second tangent line heads towards.
    pub to: Point,
    /// Arc radius.
    pub radius: f64,
}

/// An independent x/y corner radius for rounded rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CornerRadius {
    pub x: f64,
    pub y: f64,
}

impl CornerRadius {
    /// Create a corner radius with equal x and y values.
    pub const fn uniform(r: f64) -> Self {
        Self { x: r, y: r }
    }

    fn clamped(self) -> Self {
        Self {
            x: self.x.max(0.0),
            y: self.y.max(0.0),
        }
    }

    fn scaled(self, k: f64) -> Self {
        Self {
            x: self.x * k,
            y: self.y * k,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.x <= 0.0 && self.y <= 0.0
    }
}

/// Parameters for a rounded rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundRectParams {
    pub rect: Rectangle,
    /// Corner radii in order: [top-left, top-right, bottom-right, bottom-left].
    pub radii: [CornerRadius; 4],
}

impl RoundRectParams {
    /// Rounded rectangle with the same circular radius at every corner.
    pub fn uniform(rect: Rectangle, radius: f64) -> Self {
        Self {
            rect,
            radii: [CornerRadius::uniform(radius); 4],
        }
    }
}

/// Parameters for a beveled (chamfered) rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BevelRectParams {
    pub rect: Rectangle,
    /// Chamfer sizes in order: [top-left, top-right, bottom-right, bottom-left].
    /// `x` is the cut along the horizontal edge, `y` along the vertical edge.
    pub bevels: [CornerRadius; 4],
}

impl BevelRectParams {
    pub fn uniform(rect: Rectangle, bevel: f64) -> Self {
        Self {
            rect,
            bevels: [CornerRadius::uniform(bevel); 4],
        }
    }
}

/// Clamp corner sizes to be non-negative, then scale them down uniformly so
/// that adjacent corners never overlap along any edge of `rect`.
pub(crate) fn fit_corners(rect: &Rectangle, corners: [CornerRadius; 4]) -> [CornerRadius; 4] {
    let [tl, tr, br, bl] = corners.map(CornerRadius::clamped);

    let top = (tl.x + tr.x).max(1e-10);
    let bottom = (bl.x + br.x).max(1e-10);
    let left = (tl.y + bl.y).max(1e-10);
    let right = (tr.y + br.y).max(1e-10);
    let scale = (rect.width / top)
        .min(rect.width / bottom)
        .min(rect.height / left)
        .min(rect.height / right)
        .min(1.0);

    if scale < 1.0 {
        [tl, tr, br, bl].map(|c| c.scaled(scale))
    } else {
        [tl, tr, br, bl]
    }
}

/// Parameters for a radial gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGradientParams {
    /// Inner circle center.
    pub start: Point,
    /// Inner circle radius.
    pub start_radius: f64,
    /// Outer circle center.
    pub end: Point,
    /// Outer circle radius.
    pub end_radius: f64,
}
