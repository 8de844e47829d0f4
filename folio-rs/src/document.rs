//! The JSON document model.
//!
//! A [`Document`] is a page description with a flat or nested list of
//! [`Element`]s. Every element carries resolved geometry in its own user
//! space plus an optional id and [`Style`].

use folio_canvas::{parse_svg_path, Point, Rectangle};
use serde::{Deserialize, Serialize};

use crate::error::RenderResult;
use crate::style::Style;

fn default_true() -> bool {
    true
}

/// A single page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Page width; measured from the content when absent.
    #[serde(default)]
    pub width: Option<f64>,
    /// Page height; measured from the content when absent.
    #[serde(default)]
    pub height: Option<f64>,
    /// Space around the content. Elements are drawn offset by it.
    #[serde(default)]
    pub margin: f64,
    /// Page background color.
    #[serde(default)]
    pub background: Option<String>,
    /// Default CSS font shorthand for text.
    #[serde(default)]
    pub font: Option<String>,
    /// Prefix for every field name on the page.
    #[serde(default)]
    pub field_prefix: Option<String>,
    #[serde(default = "default_true")]
    pub fields_enabled: bool,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Document {
    pub fn from_json(json: &str) -> RenderResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: serde_json::Value) -> RenderResult<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

/// Axis-aligned box geometry shared by several elements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoxGeometry {
    pub fn rect(&self) -> Rectangle {
        Rectangle::new(self.x, self.y, self.width, self.height)
    }

    pub(crate) fn is_finite(&self) -> bool {
        all_finite(&[self.x, self.y, self.width, self.height])
    }
}

impl From<Rectangle> for BoxGeometry {
    fn from(rect: Rectangle) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxElement {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub style: Style,
    #[serde(flatten)]
    pub geometry: BoxGeometry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRectElement {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub style: Style,
    #[serde(flatten)]
    pub geometry: BoxGeometry,
    /// Radius used at every corner unless `corner_radii` is given.
    #[serde(default)]
    pub radius: f64,
    /// Top-left, top-right, bottom-right, bottom-left.
    #[serde(default)]
    pub corner_radii: Option<[f64; 4]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BevelRectElement {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub style: Style,
    #[serde(flatten)]
    pub geometry: BoxGeometry,
    #[serde(default)]
    pub bevel: f64,
    /// Top-left, top-right, bottom-right, bottom-left.
    #[serde(default)]
    pub bevels: Option<[f64; 4]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleElement {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub style: Style,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineElement {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub style: Style,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Polylines, polygons and Bezier curves given by their points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsElement {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub style: Style,
    pub points: Vec<[f64; 2]>,
}

impl PointsElement {
    pub fn points(&self) -> Vec<Point> {
        self.points.iter().map(|[x, y]| Point::new(*x, *y)).collect()
    }
}

/// An SVG endpoint arc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcElement {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub style: Style,
    pub from: [f64; 2],
    pub to: [f64; 2],
    pub rx: f64,
    pub ry: f64,
    /// Rotation of the ellipse's x axis, in degrees.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub large_arc: bool,
    #[serde(default)]
    pub sweep: bool,
}

/// SVG path data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathElement {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub style: Style,
    pub d: String,
}

/// Text laid along SVG path data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPathElement {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub style: Style,
    pub text: String,
    pub d: String,
    #[serde(default)]
    pub start_offset: f64,
    /// `none`, `continue` or `loop`.
    #[serde(default)]
    pub continuation: Option<String>,
}

/// Children drawn under a shared style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupElement {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub children: Vec<Element>,
}

/// A named form field occupying a box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldElement {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub style: Style,
    pub name: String,
    #[serde(flatten)]
    pub geometry: BoxGeometry,
}

/// A drawable element, tagged by `"type"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Rect(BoxElement),
    RoundRect(RoundRectElement),
    BevelRect(BevelRectElement),
    Ellipse(BoxElement),
    Circle(CircleElement),
    Line(LineElement),
    Polyline(PointsElement),
    Polygon(PointsElement),
    Arc(ArcElement),
    Curve(PointsElement),
    Path(PathElement),
    TextPath(TextPathElement),
    Group(GroupElement),
    Field(FieldElement),
}

impl Element {
    pub fn kind(&self) -> &'static str {
        match self {
            Element::Rect(_) => "rect",
            Element::RoundRect(_) => "round_rect",
            Element::BevelRect(_) => "bevel_rect",
            Element::Ellipse(_) => "ellipse",
            Element::Circle(_) => "circle",
            Element::Line(_) => "line",
            Element::Polyline(_) => "polyline",
            Element::Polygon(_) => "polygon",
            Element::Arc(_) => "arc",
            Element::Curve(_) => "curve",
            Element::Path(_) => "path",
            Element::TextPath(_) => "text_path",
            Element::Group(_) => "group",
            Element::Field(_) => "field",
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Element::Rect(e) | Element::Ellipse(e) => e.id.as_deref(),
            Element::RoundRect(e) => e.id.as_deref(),
            Element::BevelRect(e) => e.id.as_deref(),
            Element::Circle(e) => e.id.as_deref(),
            Element::Line(e) => e.id.as_deref(),
            Element::Polyline(e) | Element::Polygon(e) | Element::Curve(e) => e.id.as_deref(),
            Element::Arc(e) => e.id.as_deref(),
            Element::Path(e) => e.id.as_deref(),
            Element::TextPath(e) => e.id.as_deref(),
            Element::Group(e) => e.id.as_deref(),
            Element::Field(e) => e.id.as_deref(),
        }
    }

    pub fn style(&self) -> &Style {
        match self {
            Element::Rect(e) | Element::Ellipse(e) => &e.style,
            Element::RoundRect(e) => &e.style,
            Element::BevelRect(e) => &e.style,
            Element::Circle(e) => &e.style,
            Element::Line(e) => &e.style,
            Element::Polyline(e) | Element::Polygon(e) | Element::Curve(e) => &e.style,
            Element::Arc(e) => &e.style,
            Element::Path(e) => &e.style,
            Element::TextPath(e) => &e.style,
            Element::Group(e) => &e.style,
            Element::Field(e) => &e.style,
        }
    }

    /// The id, or the kind and position when the element has none.
    pub fn label(&self, index: usize) -> String {
        match self.id() {
            Some(id) => id.to_string(),
            None => format!("{}#{}", self.kind(), index),
        }
    }

    /// Extent of the element geometry in its own user space, before its
    /// style transform. `None` when it can not be known without drawing.
    pub fn bounds(&self) -> Option<Rectangle> {
        let rect = match self {
            Element::Rect(e) | Element::Ellipse(e) => Some(e.geometry.rect()),
            Element::RoundRect(e) => Some(e.geometry.rect()),
            Element::BevelRect(e) => Some(e.geometry.rect()),
            Element::Field(e) => Some(e.geometry.rect()),
            Element::Circle(e) => Some(Rectangle::new(
                e.cx - e.r.abs(),
                e.cy - e.r.abs(),
                2.0 * e.r.abs(),
                2.0 * e.r.abs(),
            )),
            Element::Line(e) => Some(Rectangle::from_corners(
                Point::new(e.x1, e.y1),
                Point::new(e.x2, e.y2),
            )),
            Element::Polyline(e) | Element::Polygon(e) | Element::Curve(e) => {
                Rectangle::from_points(e.points())
            }
            Element::Arc(e) => Some(Rectangle::from_corners(
                Point::new(e.from[0], e.from[1]),
                Point::new(e.to[0], e.to[1]),
            )),
            Element::Path(e) => parse_svg_path(&e.d)
                .ok()
                .filter(|svg| !svg.is_empty())
                .map(|svg| svg.to_calculator().bounding_box()),
            Element::TextPath(_) | Element::Group(_) => None,
        };
        rect.filter(|r| all_finite(&[r.x, r.y, r.width, r.height]))
    }
}

/// Whether every value is a finite number.
pub(crate) fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_document_defaults() {
        let doc = Document::from_json(r#"{"elements": []}"#).unwrap();
        assert_eq!(doc.width, None);
        assert_eq!(doc.margin, 0.0);
        assert!(doc.fields_enabled);
        assert!(doc.elements.is_empty());
    }

    #[test]
    fn test_elements_are_tagged_by_type() {
        let doc = Document::from_json(
            r#"{
                "width": 100, "height": 50,
                "elements": [
                    {"type": "rect", "id": "box", "x": 1, "y": 2, "width": 3, "height": 4,
                     "style": {"fill": "red"}},
                    {"type": "round_rect", "x": 0, "y": 0, "width": 10, "height": 10, "radius": 2},
                    {"type": "group", "children": [{"type": "circle", "cx": 5, "cy": 5, "r": 1}]},
                    {"type": "text_path", "text": "hi", "d": "M 0 0 L 10 0", "continuation": "loop"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(doc.elements.len(), 4);
        assert_eq!(doc.elements[0].id(), Some("box"));
        assert_eq!(doc.elements[0].style().fill.as_deref(), Some("red"));
        assert_eq!(
            doc.elements[0].bounds(),
            Some(Rectangle::new(1.0, 2.0, 3.0, 4.0))
        );
        assert_eq!(doc.elements[1].kind(), "round_rect");
        let Element::Group(group) = &doc.elements[2] else {
            panic!("expected a group");
        };
        assert_eq!(group.children.len(), 1);
        assert_eq!(doc.elements[3].label(3), "text_path#3");
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let err = Document::from_json(r#"{"elements": [{"type": "star"}]}"#);
        assert!(err.is_err());
    }

    #[rstest]
    #[case(r#"{"type": "circle", "cx": 10, "cy": 10, "r": 5}"#, Rectangle::new(5.0, 5.0, 10.0, 10.0))]
    #[case(r#"{"type": "line", "x1": 8, "y1": 0, "x2": 2, "y2": 4}"#, Rectangle::new(2.0, 0.0, 6.0, 4.0))]
    #[case(r#"{"type": "polygon", "points": [[0, 0], [4, 1], [2, 3]]}"#, Rectangle::new(0.0, 0.0, 4.0, 3.0))]
    #[case(r#"{"type": "path", "d": "M 1 1 L 5 1 L 5 7"}"#, Rectangle::new(1.0, 1.0, 4.0, 6.0))]
    fn test_element_bounds(#[case] json: &str, #[case] expected: Rectangle) {
        let element: Element = serde_json::from_str(json).unwrap();
        assert!(element.bounds().unwrap().approx_eq(&expected, 1e-9));
    }

    #[test]
    fn test_unknowable_bounds() {
        let element: Element = serde_json::from_str(r#"{"type": "path", "d": "M 0 0 L 10"}"#).unwrap();
        assert_eq!(element.bounds(), None);
        let group: Element = serde_json::from_str(r#"{"type": "group"}"#).unwrap();
        assert_eq!(group.bounds(), None);
    }
}
