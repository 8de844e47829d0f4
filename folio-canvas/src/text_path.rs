//! Walking glyph advances along a path.

use crate::calculator::{PathCalculator, PathPoint};
use crate::error::CanvasError;
use crate::geometry::Point;
use std::str::FromStr;

/// What happens to glyphs that run past the end of the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContinuationPolicy {
    /// Drop every glyph from the first one that does not fit.
    #[default]
    None,
    /// Keep going in a straight line along the final direction.
    Continue,
    /// Wrap around to the start of the path.
    Loop,
}

impl FromStr for ContinuationPolicy {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "stop" => Ok(ContinuationPolicy::None),
            "continue" => Ok(ContinuationPolicy::Continue),
            "loop" => Ok(ContinuationPolicy::Loop),
            other => Err(CanvasError::InvalidArgument(format!(
                "unknown continuation policy: {:?}",
                other
            ))),
        }
    }
}

/// Where one glyph lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPlacement {
    /// Index of the advance this glyph was placed for.
    pub index: usize,
    /// Path point under the middle of the glyph's advance.
    pub point: Point,
    /// Baseline direction in radians.
    pub angle: f64,
    /// Unwrapped arc-length position of the glyph's midpoint.
    pub offset: f64,
}

/// Place one glyph per advance along `path`, starting `start_offset` into it.
///
/// Each glyph is anchored at the middle of its advance so it sits tangent
/// to the path where it is centred. Glyphs before the start of the path
/// are skipped under `None`, extrapolated backwards under `Continue` and
/// wrapped under `Loop`.
pub fn place_along_path(
    path: &PathCalculator,
    advances: &[f64],
    start_offset: f64,
    policy: ContinuationPolicy,
) -> Vec<GlyphPlacement> {
    let length = path.length();
    let (Some(first), Some(last)) = (path.point_at(0.0), path.point_at(length)) else {
        return Vec::new();
    };

    let mut placements = Vec::with_capacity(advances.len());
    let mut cursor = start_offset;
    for (index, &advance) in advances.iter().enumerate() {
        let mid = cursor + advance / 2.0;
        cursor += advance;

        let resolved = match policy {
            ContinuationPolicy::None => {
                if mid > length || mid.is_nan() {
                    break;
                }
                path.point_at(mid)
            }
            ContinuationPolicy::Continue => {
                if mid > length {
                    Some(extrapolate(&last, mid - length))
                } else if mid < 0.0 {
                    Some(extrapolate(&first, mid))
                } else {
                    path.point_at(mid)
                }
            }
            ContinuationPolicy::Loop => {
                if length <= 0.0 {
                    break;
                }
                path.point_at(mid.rem_euclid(length))
            }
        };

        if let Some(p) = resolved {
            placements.push(GlyphPlacement {
                index,
                point: p.point,
                angle: p.angle(),
                offset: mid,
            });
        }
    }
    log::debug!(
        target: "canvas",
        "placed {} of {} glyphs along path of length {}",
        placements.len(),
        advances.len(),
        length
    );
    placements
}

fn extrapolate(from: &PathPoint, distance: f64) -> PathPoint {
    PathPoint::new(from.point + from.tangent() * distance, from.normal)
}
