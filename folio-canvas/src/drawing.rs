//! Drawing extensions built on paths, arcs and calculators.
//!
//! Rounded and beveled rectangles, tangent arcs, and center-form or
//! endpoint-form ellipse arcs. Each shape is available both as path data
//! (through [`DrawingExt`]) and, where it makes sense, as a
//! [`PathCalculator`] so it can be measured or carry text.

use crate::arc::{ArcParameterization, CenterArc, EndpointArc};
use crate::bezier::append_arc_cubics;
use crate::calculator::PathCalculator;
use crate::geometry::{
    fit_corners, ArcParams, ArcToParams, BevelRectParams, CornerRadius, EllipseParams, Point,
    Rectangle, RoundRectParams, COINCIDENT_EPSILON,
};
use crate::path::PathData;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Fitted corner radii; a corner with either radius zero is square.
fn fitted_radii(rect: &Rectangle, radii: [CornerRadius; 4]) -> [CornerRadius; 4] {
    fit_corners(rect, radii).map(|c| {
        if c.x > 0.0 && c.y > 0.0 {
            c
        } else {
            CornerRadius::default()
        }
    })
}

/// A rounded rectangle as four edges and four quarter-ellipse corners,
/// starting at the end of the top-left corner and running clockwise.
pub fn round_rect_calculator(params: &RoundRectParams) -> PathCalculator {
    let r = Rectangle::new(params.rect.x, params.rect.y, params.rect.width, params.rect.height);
    let [tl, tr, br, bl] = fitted_radii(&r, params.radii);
    let (x0, y0, x1, y1) = (r.min_x(), r.min_y(), r.max_x(), r.max_y());

    let corner = |center: Point, radius: CornerRadius, start: f64| {
        (!radius.is_zero()).then(|| {
            PathCalculator::elliptical_arc(CenterArc::elliptical(
                center, radius.x, radius.y, 0.0, start, FRAC_PI_2,
            ))
        })
    };
    let edge = |from: Point, to: Point| {
        (!from.approx_eq(to, COINCIDENT_EPSILON)).then(|| PathCalculator::line(from, to))
    };

    let parts = [
        edge(Point::new(x0 + tl.x, y0), Point::new(x1 - tr.x, y0)),
        corner(Point::new(x1 - tr.x, y0 + tr.y), tr, -FRAC_PI_2),
        edge(Point::new(x1, y0 + tr.y), Point::new(x1, y1 - br.y)),
        corner(Point::new(x1 - br.x, y1 - br.y), br, 0.0),
        edge(Point::new(x1 - br.x, y1), Point::new(x0 + bl.x, y1)),
        corner(Point::new(x0 + bl.x, y1 - bl.y), bl, FRAC_PI_2),
        edge(Point::new(x0, y1 - bl.y), Point::new(x0, y0 + tl.y)),
        corner(Point::new(x0 + tl.x, y0 + tl.y), tl, PI),
    ];
    PathCalculator::composite(parts.into_iter().flatten().collect()).close()
}

/// Outline points of a beveled rectangle, clockwise from the top edge.
fn bevel_points(params: &BevelRectParams) -> Vec<Point> {
    let r = Rectangle::new(params.rect.x, params.rect.y, params.rect.width, params.rect.height);
    let [tl, tr, br, bl] = fit_corners(&r, params.bevels);
    let (x0, y0, x1, y1) = (r.min_x(), r.min_y(), r.max_x(), r.max_y());

    let candidates = [
        Point::new(x0 + tl.x, y0),
        Point::new(x1 - tr.x, y0),
        Point::new(x1, y0 + tr.y),
        Point::new(x1, y1 - br.y),
        Point::new(x1 - br.x, y1),
        Point::new(x0 + bl.x, y1),
        Point::new(x0, y1 - bl.y),
        Point::new(x0, y0 + tl.y),
    ];
    let mut points: Vec<Point> = Vec::with_capacity(8);
    for p in candidates {
        if points
            .last()
            .map_or(true, |last| !last.approx_eq(p, COINCIDENT_EPSILON))
        {
            points.push(p);
        }
    }
    // Square top-left corner: the last point repeats the first
    if points.len() > 1 && points[0].approx_eq(points[points.len() - 1], COINCIDENT_EPSILON) {
        points.pop();
    }
    points
}

/// A beveled rectangle as a polygon.
pub fn bevel_rect_calculator(params: &BevelRectParams) -> PathCalculator {
    PathCalculator::polygon(bevel_points(params))
}

/// The center-form arc described by canvas-style ellipse parameters.
///
/// Clockwise arcs (increasing angle, `anticlockwise == false`) run from
/// `start_angle` forward to `end_angle`; a span of a full turn or more
/// draws the whole ellipse.
pub fn ellipse_arc(params: &EllipseParams) -> CenterArc {
    let span = params.end_angle - params.start_angle;
    let sweep = if !params.anticlockwise && span >= TAU {
        TAU
    } else if params.anticlockwise && -span >= TAU {
        -TAU
    } else if params.anticlockwise {
        -((-span).rem_euclid(TAU))
    } else {
        span.rem_euclid(TAU)
    };
    CenterArc::elliptical(
        params.center,
        params.radius_x,
        params.radius_y,
        params.rotation,
        params.start_angle,
        sweep,
    )
}

/// Path-building operations composed from lines and kappa arcs.
pub trait DrawingExt {
    /// Closed rectangle subpath; negative sizes are normalized.
    fn rect(&mut self, rect: &Rectangle);
    /// Closed rounded-rectangle subpath.
    fn round_rect(&mut self, params: &RoundRectParams);
    /// Closed beveled-rectangle subpath.
    fn bevel_rect(&mut self, params: &BevelRectParams);
    /// Circular arc, joined to the current point with a line.
    fn arc(&mut self, params: &ArcParams);
    /// Elliptical arc, joined to the current point with a line.
    fn ellipse(&mut self, params: &EllipseParams);
    /// Arc tangent to the lines current→corner and corner→to.
    fn arc_to(&mut self, params: &ArcToParams);
    /// SVG-style arc between two endpoints.
    fn endpoint_arc(&mut self, arc: &EndpointArc);
}

impl DrawingExt for PathData {
    fn rect(&mut self, rect: &Rectangle) {
        let [p0, p1, p2, p3] = Rectangle::new(rect.x, rect.y, rect.width, rect.height).corners();
        self.move_to(p0);
        self.line_to(p1);
        self.line_to(p2);
        self.line_to(p3);
        self.close();
    }

    fn round_rect(&mut self, params: &RoundRectParams) {
        let calc = round_rect_calculator(params);
        let Some(start) = calc.start_point() else {
            return;
        };
        self.move_to(start);
        calc.append_to(self);
        self.close();
    }

    fn bevel_rect(&mut self, params: &BevelRectParams) {
        let points = bevel_points(params);
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.move_to(*first);
        for p in rest {
            self.line_to(*p);
        }
        self.close();
    }

    fn arc(&mut self, params: &ArcParams) {
        self.ellipse(&EllipseParams::from(params));
    }

    fn ellipse(&mut self, params: &EllipseParams) {
        if !(params.radius_x >= 0.0 && params.radius_y >= 0.0)
            || !params.radius_x.is_finite()
            || !params.radius_y.is_finite()
        {
            return;
        }
        let arc = ellipse_arc(params);
        if params.radius_x == 0.0 || params.radius_y == 0.0 {
            self.connect_to(arc.start_point());
            self.line_to(arc.end_point());
            return;
        }
        append_arc_cubics(self, &arc);
    }

    fn arc_to(&mut self, params: &ArcToParams) {
        let ArcToParams { corner, to, radius } = *params;
        let Some(from) = self.current_point() else {
            self.move_to(corner);
            return;
        };
        if !(radius > 0.0) {
            self.line_to(corner);
            return;
        }

        // Unit vectors from the corner towards both neighbours
        let v1 = from - corner;
        let v2 = to - corner;
        if v1.length() < 1e-9 || v2.length() < 1e-9 {
            self.line_to(corner);
            return;
        }
        let (v1, v2) = (v1.normalize(), v2.normalize());

        let cross = v1.cross(v2);
        let angle = cross.atan2(v1.dot(v2));
        if angle.abs() < 1e-9 || (PI - angle.abs()).abs() < 1e-9 {
            // Collinear: no tangent circle exists
            self.line_to(corner);
            return;
        }

        let tangent_distance = radius / (angle / 2.0).tan().abs();
        let start = corner + v1 * tangent_distance;
        let end = corner + v2 * tangent_distance;

        let side = if cross < 0.0 { -1.0 } else { 1.0 };
        let center = start + v1.perpendicular() * (side * radius);

        self.line_to(start);
        self.arc(&ArcParams {
            center,
            radius,
            start_angle: (start - center).angle(),
            end_angle: (end - center).angle(),
            anticlockwise: cross > 0.0,
        });
    }

    fn endpoint_arc(&mut self, arc: &EndpointArc) {
        self.connect_to(arc.from);
        match arc.to_center() {
            ArcParameterization::Center(center) => append_arc_cubics(self, &center),
            ArcParameterization::LineTo => self.line_to(arc.to),
        }
    }
}
