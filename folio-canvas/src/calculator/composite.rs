//! Several calculators addressed as one continuous path.

use super::{in_range, PathCalculator, PathPoint};
use crate::geometry::{Rectangle, COINCIDENT_EPSILON};
use crate::handles::PathHandleData;

/// An ordered list of calculators with a prefix-sum length table.
///
/// Parts are never composites themselves: nested composites are spliced
/// into the parent at construction, so addressing is one binary search
/// regardless of how the path was assembled.
#[derive(Debug, Clone)]
pub struct CompositeCalc {
    parts: Vec<PathCalculator>,
    /// `cumulative[k]` is the total length of parts `0..=k`.
    cumulative: Vec<f64>,
    closed: bool,
}

impl CompositeCalc {
    pub(crate) fn new(parts: Vec<PathCalculator>, closed: bool) -> Self {
        let mut flat = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                PathCalculator::Composite(inner) => flat.extend(inner.parts),
                other => flat.push(other),
            }
        }
        let mut total = 0.0;
        let cumulative = flat
            .iter()
            .map(|part| {
                total += part.length();
                total
            })
            .collect();
        Self {
            parts: flat,
            cumulative,
            closed,
        }
    }

    pub fn parts(&self) -> &[PathCalculator] {
        &self.parts
    }

    pub fn length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Explicitly closed, or the last point meets the first.
    pub fn is_closed(&self) -> bool {
        if self.closed {
            return true;
        }
        match (self.start_point(), self.end_point()) {
            (Some(start), Some(end)) => start.approx_eq(end, COINCIDENT_EPSILON),
            _ => false,
        }
    }

    pub(crate) fn is_explicitly_closed(&self) -> bool {
        self.closed
    }

    pub fn point_at(&self, distance: f64) -> Option<PathPoint> {
        if self.parts.is_empty() || !in_range(distance, self.length()) {
            return None;
        }
        // First part ending strictly after `distance`; a boundary belongs to
        // the part that starts there
        let k = self
            .cumulative
            .partition_point(|&c| c <= distance)
            .min(self.parts.len() - 1);
        let before = if k == 0 { 0.0 } else { self.cumulative[k - 1] };
        let part = &self.parts[k];
        part.point_at((distance - before).clamp(0.0, part.length()))
    }

    pub fn start_point(&self) -> Option<crate::geometry::Point> {
        self.parts.first().and_then(PathCalculator::start_point)
    }

    pub fn end_point(&self) -> Option<crate::geometry::Point> {
        self.parts.last().and_then(PathCalculator::end_point)
    }

    /// Union of the parts' boxes; a zero rectangle at the origin when empty.
    pub fn bounding_box(&self) -> Rectangle {
        self.parts
            .iter()
            .map(PathCalculator::bounding_box)
            .reduce(|acc, b| acc.union(&b))
            .unwrap_or_default()
    }

    pub fn handles(&self) -> Option<PathHandleData> {
        let handles: Vec<PathHandleData> =
            self.parts.iter().filter_map(PathCalculator::handles).collect();
        PathHandleData::concat(&handles, self.is_closed())
    }
}
