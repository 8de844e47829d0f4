//! Editable handle view of a path, for editor and diagnostic tooling.

use crate::error::{CanvasError, CanvasResult};
use crate::geometry::Point;

/// Control points of a path with parallel on-curve flags.
///
/// Rendering never consults this; it exists so tooling can display and
/// edit a path's defining points.
#[derive(Debug, Clone, PartialEq)]
pub struct PathHandleData {
    locations: Vec<Point>,
    on_curve: Vec<bool>,
    closed: bool,
}

impl PathHandleData {
    /// Create handle data, rejecting mismatched location/flag counts.
    pub fn new(locations: Vec<Point>, on_curve: Vec<bool>, closed: bool) -> CanvasResult<Self> {
        if locations.len() != on_curve.len() {
            return Err(CanvasError::MalformedHandles {
                locations: locations.len(),
                flags: on_curve.len(),
            });
        }
        Ok(Self {
            locations,
            on_curve,
            closed,
        })
    }

    /// Handle data where every location lies on the curve.
    pub fn on_curve(locations: Vec<Point>, closed: bool) -> Self {
        let on_curve = vec![true; locations.len()];
        Self {
            locations,
            on_curve,
            closed,
        }
    }

    pub(crate) fn from_parts(locations: Vec<Point>, on_curve: Vec<bool>, closed: bool) -> Self {
        debug_assert_eq!(locations.len(), on_curve.len());
        Self {
            locations,
            on_curve,
            closed,
        }
    }

    pub fn locations(&self) -> &[Point] {
        &self.locations
    }

    pub fn on_curve_flags(&self) -> &[bool] {
        &self.on_curve
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Iterate `(location, on_curve)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point, bool)> + '_ {
        self.locations
            .iter()
            .copied()
            .zip(self.on_curve.iter().copied())
    }

    /// Concatenate handle sets; the result takes the given closed flag.
    pub(crate) fn concat<'a, I>(parts: I, closed: bool) -> Option<Self>
    where
        I: IntoIterator<Item = &'a PathHandleData>,
    {
        let mut locations = Vec::new();
        let mut on_curve = Vec::new();
        let mut any = false;
        for part in parts {
            any = true;
            locations.extend_from_slice(&part.locations);
            on_curve.extend_from_slice(&part.on_curve);
        }
        any.then_some(Self {
            locations,
            on_curve,
            closed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatched_lengths_rejected() {
        let err = PathHandleData::new(vec![Point::ORIGIN, Point::new(1.0, 1.0)], vec![true], false)
            .unwrap_err();
        assert!(matches!(
            err,
            CanvasError::MalformedHandles {
                locations: 2,
                flags: 1
            }
        ));
    }

    #[test]
    fn test_iter_pairs() {
        let handles =
            PathHandleData::new(vec![Point::ORIGIN, Point::new(1.0, 0.0)], vec![true, false], true)
                .unwrap();
        let pairs: Vec<_> = handles.iter().collect();
        assert_eq!(pairs, vec![(Point::ORIGIN, true), (Point::new(1.0, 0.0), false)]);
        assert!(handles.is_closed());
    }
}
