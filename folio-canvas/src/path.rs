//! Recorded path data.
//!
//! `PathData` is the backend-neutral unit of exchange between path
//! calculators, the drawing extensions and canvas backends. Coordinates are
//! stored in user space; backends map them through the current transform.

use crate::geometry::{Point, Rectangle};
use crate::transform::Transform;

/// One drawing command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    QuadTo(Point, Point),
    CubicTo(Point, Point, Point),
    Close,
}

/// A sequence of drawing commands with current-point tracking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData {
    commands: Vec<PathCommand>,
    current: Option<Point>,
    subpath_start: Option<Point>,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// The last point reached, if any command has been recorded.
    pub fn current_point(&self) -> Option<Point> {
        self.current
    }

    /// Move to a point without drawing.
    pub fn move_to(&mut self, p: Point) {
        self.commands.push(PathCommand::MoveTo(p));
        self.current = Some(p);
        self.subpath_start = Some(p);
    }

    /// Draw a line to a point. Starts a subpath if there is no current point.
    pub fn line_to(&mut self, p: Point) {
        if self.current.is_none() {
            self.move_to(p);
            return;
        }
        self.commands.push(PathCommand::LineTo(p));
        self.current = Some(p);
    }

    /// Line to `p` when a current point exists, otherwise move there.
    pub(crate) fn connect_to(&mut self, p: Point) {
        match self.current {
            Some(current) if current.approx_eq(p, 1e-9) => {}
            Some(_) => self.line_to(p),
            None => self.move_to(p),
        }
    }

    pub fn quad_to(&mut self, ctrl: Point, p: Point) {
        self.ensure_start(ctrl);
        self.commands.push(PathCommand::QuadTo(ctrl, p));
        self.current = Some(p);
    }

    pub fn cubic_to(&mut self, ctrl1: Point, ctrl2: Point, p: Point) {
        self.ensure_start(ctrl1);
        self.commands.push(PathCommand::CubicTo(ctrl1, ctrl2, p));
        self.current = Some(p);
    }

    /// Close the current subpath.
    pub fn close(&mut self) {
        if self.current.is_none() {
            return;
        }
        self.commands.push(PathCommand::Close);
        self.current = self.subpath_start;
    }

    fn ensure_start(&mut self, p: Point) {
        if self.current.is_none() {
            self.move_to(p);
        }
    }

    /// Append every command of `other`.
    pub fn extend(&mut self, other: &PathData) {
        for cmd in other.commands() {
            match *cmd {
                PathCommand::MoveTo(p) => self.move_to(p),
                PathCommand::LineTo(p) => self.line_to(p),
                PathCommand::QuadTo(c, p) => self.quad_to(c, p),
                PathCommand::CubicTo(c1, c2, p) => self.cubic_to(c1, c2, p),
                PathCommand::Close => self.close(),
            }
        }
    }

    /// A copy with every point mapped through `transform`.
    pub fn transformed(&self, transform: &Transform) -> PathData {
        let map = |p: Point| transform.map(p);
        let commands = self
            .commands
            .iter()
            .map(|cmd| match *cmd {
                PathCommand::MoveTo(p) => PathCommand::MoveTo(map(p)),
                PathCommand::LineTo(p) => PathCommand::LineTo(map(p)),
                PathCommand::QuadTo(c, p) => PathCommand::QuadTo(map(c), map(p)),
                PathCommand::CubicTo(c1, c2, p) => PathCommand::CubicTo(map(c1), map(c2), map(p)),
                PathCommand::Close => PathCommand::Close,
            })
            .collect();
        PathData {
            commands,
            current: self.current.map(map),
            subpath_start: self.subpath_start.map(map),
        }
    }

    /// Bounds of every point in the path, control points included.
    ///
    /// Control points bound the curve (convex hull property) so this is a
    /// conservative box.
    pub fn control_bounds(&self) -> Option<Rectangle> {
        Rectangle::from_points(self.commands.iter().flat_map(|cmd| {
            let pts: Vec<Point> = match *cmd {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => vec![p],
                PathCommand::QuadTo(c, p) => vec![c, p],
                PathCommand::CubicTo(c1, c2, p) => vec![c1, c2, p],
                PathCommand::Close => vec![],
            };
            pts
        }))
    }

    /// Convert to a tiny-skia path, mapping through `transform`.
    ///
    /// Returns `None` for empty or degenerate paths.
    pub fn to_skia_path(&self, transform: &Transform) -> Option<tiny_skia::Path> {
        let mut pb = tiny_skia::PathBuilder::new();
        let map = |p: Point| {
            let p = transform.map(p);
            (p.x as f32, p.y as f32)
        };
        for cmd in &self.commands {
            match *cmd {
                PathCommand::MoveTo(p) => {
                    let (x, y) = map(p);
                    pb.move_to(x, y);
                }
                PathCommand::LineTo(p) => {
                    let (x, y) = map(p);
                    pb.line_to(x, y);
                }
                PathCommand::QuadTo(c, p) => {
                    let (cx, cy) = map(c);
                    let (x, y) = map(p);
                    pb.quad_to(cx, cy, x, y);
                }
                PathCommand::CubicTo(c1, c2, p) => {
                    let (c1x, c1y) = map(c1);
                    let (c2x, c2y) = map(c2);
                    let (x, y) = map(p);
                    pb.cubic_to(c1x, c1y, c2x, c2y, x, y);
                }
                PathCommand::Close => pb.close(),
            }
        }
        pb.finish()
    }
}
