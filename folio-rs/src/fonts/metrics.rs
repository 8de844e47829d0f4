use folio_canvas::{PathData, Point};

/// Share of the em square a fixed-pitch glyph advances by.
const FIXED_PITCH_ADVANCE: f64 = 0.6;

/// Per-character glyph metrics for one font face.
pub trait FontMetrics {
    /// Advance width of `ch` at `size`, in user units.
    fn advance(&self, ch: char, size: f64) -> f64;

    /// Outline of `ch` in em units with y pointing up.
    fn outline(&self, ch: char) -> Option<PathData>;
}

/// Every glyph advances by 0.6 em and has no outline.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPitchMetrics;

impl FontMetrics for FixedPitchMetrics {
    fn advance(&self, _ch: char, size: f64) -> f64 {
        FIXED_PITCH_ADVANCE * size
    }

    fn outline(&self, _ch: char) -> Option<PathData> {
        None
    }
}

/// Metrics read from a font file with ttf-parser.
#[derive(Debug, Clone)]
pub struct FaceMetrics {
    data: Vec<u8>,
    index: u32,
    units_per_em: f64,
}

impl FaceMetrics {
    /// `None` when the data is not a parseable font.
    pub fn from_data(data: Vec<u8>, index: u32) -> Option<Self> {
        let units_per_em = ttf_parser::Face::parse(&data, index).ok()?.units_per_em();
        if units_per_em == 0 {
            return None;
        }
        Some(Self {
            data,
            index,
            units_per_em: f64::from(units_per_em),
        })
    }

    fn face(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.data, self.index).ok()
    }
}

impl FontMetrics for FaceMetrics {
    fn advance(&self, ch: char, size: f64) -> f64 {
        let units = self.face().and_then(|face| {
            let glyph = face.glyph_index(ch)?;
            face.glyph_hor_advance(glyph)
        });
        match units {
            Some(units) => f64::from(units) / self.units_per_em * size,
            None => FIXED_PITCH_ADVANCE * size,
        }
    }

    fn outline(&self, ch: char) -> Option<PathData> {
        let face = self.face()?;
        let glyph = face.glyph_index(ch)?;
        let mut builder = EmOutline {
            path: PathData::new(),
            scale: 1.0 / self.units_per_em,
        };
        face.outline_glyph(glyph, &mut builder)?;
        Some(builder.path)
    }
}

/// Collects a glyph outline into em-unit path data.
struct EmOutline {
    path: PathData,
    scale: f64,
}

impl EmOutline {
    fn point(&self, x: f32, y: f32) -> Point {
        Point::new(f64::from(x) * self.scale, f64::from(y) * self.scale)
    }
}

impl ttf_parser::OutlineBuilder for EmOutline {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.path.move_to(p);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.path.line_to(p);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (c, p) = (self.point(x1, y1), self.point(x, y));
        self.path.quad_to(c, p);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (c1, c2, p) = (self.point(x1, y1), self.point(x2, y2), self.point(x, y));
        self.path.cubic_to(c1, c2, p);
    }

    fn close(&mut self) {
        self.path.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case('i', 10.0, 6.0)]
    #[case('W', 20.0, 12.0)]
    #[case(' ', 0.0, 0.0)]
    fn test_fixed_pitch_advance(#[case] ch: char, #[case] size: f64, #[case] expected: f64) {
        assert_eq!(FixedPitchMetrics.advance(ch, size), expected);
    }

    #[test]
    fn test_garbage_is_not_a_face() {
        assert!(FaceMetrics::from_data(vec![0u8; 128], 0).is_none());
        assert!(FaceMetrics::from_data(Vec::new(), 0).is_none());
    }

    #[test]
    fn test_outline_builder_scales_to_em() {
        use ttf_parser::OutlineBuilder;

        let mut builder = EmOutline {
            path: PathData::new(),
            scale: 1.0 / 1000.0,
        };
        builder.move_to(0.0, 0.0);
        builder.line_to(500.0, 0.0);
        builder.quad_to(500.0, 700.0, 0.0, 700.0);
        builder.close();

        let bounds = builder.path.control_bounds().unwrap();
        assert!((bounds.width - 0.5).abs() < 1e-9);
        assert!((bounds.height - 0.7).abs() < 1e-9);
    }
}
