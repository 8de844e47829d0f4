//! Integration tests for folio-pdf.

use folio_canvas::{
    Canvas, Color, GraphicsContext, LineCap, PathCalculator, Point, Rectangle, RoundRectParams,
};
use folio_pdf::PdfCanvas;
use rstest::rstest;

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

#[test]
fn test_single_page_document() {
    let mut canvas = PdfCanvas::new(200.0, 100.0).unwrap();
    canvas.set_fill_paint(Color::parse("#ff0000").unwrap().into());
    canvas
        .draw_round_rect(
            &RoundRectParams::uniform(Rectangle::new(10.0, 10.0, 180.0, 80.0), 12.0),
            true,
            false,
        )
        .unwrap();
    let bytes = canvas.finish();

    assert!(bytes.starts_with(b"%PDF-"));
    assert!(contains(&bytes, b"/MediaBox [0 0 200 100]"));
    assert!(contains(&bytes, b"1 0 0 -1 0 100 cm"));
    assert!(contains(&bytes, b"1 0 0 rg"));
    assert!(contains(&bytes, b"%%EOF"));
}

#[rstest]
#[case(LineCap::Butt, b"0 J".as_slice())]
#[case(LineCap::Round, b"1 J".as_slice())]
#[case(LineCap::Square, b"2 J".as_slice())]
fn test_stroke_line_cap(#[case] cap: LineCap, #[case] operator: &[u8]) {
    let mut canvas = PdfCanvas::new(50.0, 50.0).unwrap();
    canvas.set_line_cap(cap);
    canvas
        .draw_calculator(
            &PathCalculator::line(Point::new(5.0, 5.0), Point::new(45.0, 45.0)),
            false,
            true,
        )
        .unwrap();
    assert!(contains(&canvas.finish(), operator));
}

#[test]
fn test_dash_pattern_written() {
    let mut canvas = PdfCanvas::new(50.0, 50.0).unwrap();
    canvas.set_line_dash(vec![4.0, 2.0]);
    canvas
        .draw_calculator(&PathCalculator::circle(Point::new(25.0, 25.0), 10.0), false, true)
        .unwrap();
    assert!(contains(&canvas.finish(), b"[4 2] 0 d"));
}
