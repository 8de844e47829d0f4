//! Lookup-table addressing for parametric curves.
//!
//! A curve `f(t)` over `[0, 1]` is sampled at `N` uniform parameter steps
//! into a cumulative chord-length table. Distance queries binary-search
//! that table, interpolate the *parameter* within the bracketing pair and
//! evaluate `f` again, so the returned point lies on the curve rather than
//! on the chord between samples.

use super::{in_range, PathPoint};
use crate::arc::CenterArc;
use crate::bezier::append_arc_cubics;
use crate::geometry::{Point, Rectangle, Vector};
use crate::handles::PathHandleData;
use crate::path::PathData;
use kurbo::{ParamCurve, ParamCurveDeriv};
use std::fmt;
use std::sync::Arc;

/// Sample count used when none is given.
pub const DEFAULT_SAMPLES: usize = 100;

/// A parametric curve `t -> (point, unit normal)`.
pub type CurveFn = Arc<dyn Fn(f64) -> (Point, Vector) + Send + Sync>;

/// The function behind a sampled curve.
#[derive(Clone)]
pub enum CurveSource {
    EllipticalArc(CenterArc),
    Cubic(kurbo::CubicBez),
    Quadratic(kurbo::QuadBez),
    Function(CurveFn),
}

impl fmt::Debug for CurveSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveSource::EllipticalArc(arc) => f.debug_tuple("EllipticalArc").field(arc).finish(),
            CurveSource::Cubic(c) => f.debug_tuple("Cubic").field(c).finish(),
            CurveSource::Quadratic(q) => f.debug_tuple("Quadratic").field(q).finish(),
            CurveSource::Function(_) => f.write_str("Function(..)"),
        }
    }
}

pub(crate) fn to_kurbo(p: Point) -> kurbo::Point {
    kurbo::Point::new(p.x, p.y)
}

pub(crate) fn from_kurbo(p: kurbo::Point) -> Point {
    Point::new(p.x, p.y)
}

/// Step used to recover a direction where the derivative vanishes.
const DIRECTION_PROBE: f64 = 1e-6;

impl CurveSource {
    /// Evaluate the position and unit normal at `t`.
    pub fn eval(&self, t: f64) -> (Point, Vector) {
        match self {
            CurveSource::Function(f) => f(t),
            _ => {
                let point = self.position(t);
                let mut direction = self.derivative(t);
                if direction.length() < 1e-12 {
                    // Coincident control points zero the derivative at an end
                    let t0 = (t - DIRECTION_PROBE).max(0.0);
                    let t1 = (t + DIRECTION_PROBE).min(1.0);
                    direction = self.position(t1) - self.position(t0);
                }
                (point, direction.normalize().perpendicular())
            }
        }
    }

    fn position(&self, t: f64) -> Point {
        match self {
            CurveSource::EllipticalArc(arc) => arc.eval(t).0,
            CurveSource::Cubic(c) => from_kurbo(c.eval(t)),
            CurveSource::Quadratic(q) => from_kurbo(q.eval(t)),
            CurveSource::Function(f) => f(t).0,
        }
    }

    fn derivative(&self, t: f64) -> Vector {
        match self {
            CurveSource::EllipticalArc(arc) => arc.eval(t).1,
            CurveSource::Cubic(c) => from_kurbo(c.deriv().eval(t)).to_vector(),
            CurveSource::Quadratic(q) => from_kurbo(q.deriv().eval(t)).to_vector(),
            CurveSource::Function(f) => -f(t).1.perpendicular(),
        }
    }

    pub fn start_point(&self) -> Point {
        self.position(0.0)
    }

    pub fn end_point(&self) -> Point {
        self.position(1.0)
    }
}

/// A parametric curve addressed through a sampled distance table.
#[derive(Debug, Clone)]
pub struct SampledCurve {
    source: CurveSource,
    samples: usize,
    /// Cumulative chord length at each sample; a single `[0.0]` when `samples == 1`.
    cumulative: Vec<f64>,
    length: f64,
    bounds: Rectangle,
}

impl SampledCurve {
    pub fn new(source: CurveSource) -> Self {
        Self::with_samples(source, DEFAULT_SAMPLES)
    }

    /// Sample `source` at `samples` uniform steps (at least one).
    pub fn with_samples(source: CurveSource, samples: usize) -> Self {
        let samples = samples.max(1);
        if samples == 1 {
            let start = source.start_point();
            let end = source.end_point();
            return Self {
                samples,
                cumulative: vec![0.0],
                length: start.distance(end),
                bounds: Rectangle::from_corners(start, end),
                source,
            };
        }

        let step = 1.0 / (samples - 1) as f64;
        let mut prev = source.start_point();
        let mut min = prev;
        let mut max = prev;
        let mut total = 0.0;
        let mut cumulative = Vec::with_capacity(samples);
        cumulative.push(0.0);
        for i in 1..samples {
            let p = source.position(i as f64 * step);
            total += prev.distance(p);
            cumulative.push(total);
            min = Point::new(min.x.min(p.x), min.y.min(p.y));
            max = Point::new(max.x.max(p.x), max.y.max(p.y));
            prev = p;
        }
        log::trace!(target: "geometry", "sampled curve: {} samples, length {}", samples, total);

        Self {
            source,
            samples,
            cumulative,
            length: total,
            bounds: Rectangle::from_corners(min, max),
        }
    }

    pub fn source(&self) -> &CurveSource {
        &self.source
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// The curve parameter for arc length `distance`, already range-checked.
    fn parameter_at(&self, distance: f64) -> f64 {
        if self.samples == 1 {
            return if self.length > 0.0 {
                distance / self.length
            } else {
                0.0
            };
        }
        let last = self.samples - 1;
        let upper = self
            .cumulative
            .partition_point(|&c| c < distance)
            .clamp(1, last);
        let lower = upper - 1;
        let span = self.cumulative[upper] - self.cumulative[lower];
        let frac = if span > 0.0 {
            ((distance - self.cumulative[lower]) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        ((lower as f64 + frac) / last as f64).min(1.0)
    }

    pub fn point_at(&self, distance: f64) -> Option<PathPoint> {
        if !in_range(distance, self.length) {
            return None;
        }
        let (point, normal) = self.source.eval(self.parameter_at(distance));
        Some(PathPoint::new(point, normal))
    }

    pub fn start_point(&self) -> Point {
        self.source.start_point()
    }

    pub fn end_point(&self) -> Point {
        self.source.end_point()
    }

    /// Bounds of the sampled points.
    pub fn bounding_box(&self) -> Rectangle {
        self.bounds
    }

    pub fn handles(&self) -> Option<PathHandleData> {
        match &self.source {
            CurveSource::EllipticalArc(arc) => Some(PathHandleData::from_parts(
                vec![arc.start_point(), arc.center, arc.end_point()],
                vec![true, false, true],
                false,
            )),
            CurveSource::Cubic(c) => Some(PathHandleData::from_parts(
                vec![from_kurbo(c.p0), from_kurbo(c.p1), from_kurbo(c.p2), from_kurbo(c.p3)],
                vec![true, false, false, true],
                false,
            )),
            CurveSource::Quadratic(q) => Some(PathHandleData::from_parts(
                vec![from_kurbo(q.p0), from_kurbo(q.p1), from_kurbo(q.p2)],
                vec![true, false, true],
                false,
            )),
            CurveSource::Function(_) => None,
        }
    }

    pub(crate) fn append_to(&self, path: &mut PathData) {
        match &self.source {
            CurveSource::EllipticalArc(arc) => append_arc_cubics(path, arc),
            CurveSource::Cubic(c) => {
                path.connect_to(from_kurbo(c.p0));
                path.cubic_to(from_kurbo(c.p1), from_kurbo(c.p2), from_kurbo(c.p3));
            }
            CurveSource::Quadratic(q) => {
                path.connect_to(from_kurbo(q.p0));
                path.quad_to(from_kurbo(q.p1), from_kurbo(q.p2));
            }
            CurveSource::Function(_) => {
                // No closed form: trace the sample points
                let steps = self.samples.max(2) - 1;
                path.connect_to(self.source.start_point());
                for i in 1..=steps {
                    path.line_to(self.source.position(i as f64 / steps as f64));
                }
            }
        }
    }
}
