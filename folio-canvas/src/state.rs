//! Graphics state and the save/restore stack.

use crate::error::{CanvasError, CanvasResult};
use crate::font::FontSpec;
use crate::gradient::Paint;
use crate::style::{Color, LineCap, LineJoin, NamedColor, NamedColors, TextFormat, TextRenderingMode};
use crate::transform::Transform;

/// Everything a drawing operation reads from its context.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsState {
    /// User space to device space.
    pub transform: Transform,
    pub stroke: Paint,
    pub fill: Paint,
    pub line_width: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f64,
    /// Dash pattern; always even in length, empty for solid lines.
    pub line_dash: Vec<f64>,
    pub line_dash_offset: f64,
    pub colors: NamedColors,
    pub text_size: f64,
    pub text_format: TextFormat,
    pub text_rendering_mode: TextRenderingMode,
    pub font: FontSpec,
    pub fields_enabled: bool,
    /// Prepended to field names declared while this state is current.
    pub field_prefix: String,
}

impl Default for GraphicsState {
    fn default() -> Self {
        let font = FontSpec::default();
        Self {
            transform: Transform::identity(),
            stroke: Paint::default(),
            fill: Paint::default(),
            line_width: 1.0,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
            miter_limit: 10.0,
            line_dash: Vec::new(),
            line_dash_offset: 0.0,
            colors: NamedColors::default(),
            text_size: font.size,
            text_format: TextFormat::default(),
            text_rendering_mode: TextRenderingMode::default(),
            font,
            fields_enabled: true,
            field_prefix: String::new(),
        }
    }
}

/// A point-in-time copy of a [`GraphicsState`], for carrying paint and
/// transform into another context.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSnapshot(GraphicsState);

impl StateSnapshot {
    pub fn state(&self) -> &GraphicsState {
        &self.0
    }

    pub fn into_state(self) -> GraphicsState {
        self.0
    }
}

impl From<GraphicsState> for StateSnapshot {
    fn from(state: GraphicsState) -> Self {
        StateSnapshot(state)
    }
}

/// The current state plus the LIFO stack of saved states.
#[derive(Debug, Clone, Default)]
pub struct StateStack {
    current: GraphicsState,
    saved: Vec<GraphicsState>,
}

impl StateStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// A stack whose current state starts as `initial`.
    pub fn with_state(initial: GraphicsState) -> Self {
        Self {
            current: initial,
            saved: Vec::new(),
        }
    }

    pub fn current(&self) -> &GraphicsState {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut GraphicsState {
        &mut self.current
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Push a copy of the current state.
    pub fn save(&mut self) {
        log::debug!(target: "canvas", "save (depth {})", self.saved.len() + 1);
        self.saved.push(self.current.clone());
    }

    /// Pop the most recently saved state into the current state.
    ///
    /// Fails without touching the current state when nothing was saved.
    pub fn restore(&mut self) -> CanvasResult<()> {
        log::debug!(target: "canvas", "restore (depth {})", self.saved.len());
        match self.saved.pop() {
            Some(state) => {
                self.current = state;
                Ok(())
            }
            None => Err(CanvasError::StackUnderflow {
                expected: 1,
                actual: 0,
            }),
        }
    }

    /// Restore repeatedly until exactly `depth` states remain saved.
    ///
    /// Fails, changing nothing, when fewer than `depth` states are saved.
    pub fn restore_to(&mut self, depth: usize) -> CanvasResult<()> {
        if self.saved.len() < depth {
            return Err(CanvasError::StackUnderflow {
                expected: depth,
                actual: self.saved.len(),
            });
        }
        while self.saved.len() > depth {
            self.restore()?;
        }
        Ok(())
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot(self.current.clone())
    }

    /// Replace the current state with a snapshot; saved states are untouched.
    pub fn import(&mut self, snapshot: &StateSnapshot) {
        self.current = snapshot.0.clone();
    }
}

/// Get/set access to a graphics state with save/restore.
///
/// Implementors only expose their [`StateStack`]; every accessor is
/// provided. Setters ignore invalid values the way canvas APIs do rather
/// than failing.
pub trait GraphicsContext {
    fn state_stack(&self) -> &StateStack;
    fn state_stack_mut(&mut self) -> &mut StateStack;

    fn state(&self) -> &GraphicsState {
        self.state_stack().current()
    }

    fn save(&mut self) {
        self.state_stack_mut().save();
    }

    fn restore(&mut self) -> CanvasResult<()> {
        self.state_stack_mut().restore()
    }

    fn depth(&self) -> usize {
        self.state_stack().depth()
    }

    fn snapshot(&self) -> StateSnapshot {
        self.state_stack().snapshot()
    }

    fn import_snapshot(&mut self, snapshot: &StateSnapshot) {
        self.state_stack_mut().import(snapshot);
    }

    // --- Transform ---

    fn transform(&self) -> Transform {
        self.state().transform
    }

    /// Replace the current transform outright.
    fn set_transform(&mut self, transform: Transform) {
        log::debug!(target: "canvas", "setTransform {:?}", transform);
        self.state_stack_mut().current_mut().transform = transform;
    }

    /// Compose `transform` in the local frame: `new = old * transform`.
    fn apply_transform(&mut self, transform: Transform) {
        log::debug!(target: "canvas", "transform {:?}", transform);
        let state = self.state_stack_mut().current_mut();
        state.transform = state.transform * transform;
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.apply_transform(Transform::translate(x, y));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.apply_transform(Transform::scale(sx, sy));
    }

    fn rotate(&mut self, angle: f64) {
        self.apply_transform(Transform::rotate(angle));
    }

    // --- Paint ---

    fn stroke_paint(&self) -> &Paint {
        &self.state().stroke
    }

    fn set_stroke_paint(&mut self, paint: Paint) {
        self.state_stack_mut().current_mut().stroke = paint;
    }

    fn fill_paint(&self) -> &Paint {
        &self.state().fill
    }

    fn set_fill_paint(&mut self, paint: Paint) {
        self.state_stack_mut().current_mut().fill = paint;
    }

    // --- Line style ---

    fn line_width(&self) -> f64 {
        self.state().line_width
    }

    /// Ignores non-finite or non-positive widths.
    fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.state_stack_mut().current_mut().line_width = width;
        }
    }

    fn line_cap(&self) -> LineCap {
        self.state().line_cap
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.state_stack_mut().current_mut().line_cap = cap;
    }

    fn line_join(&self) -> LineJoin {
        self.state().line_join
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.state_stack_mut().current_mut().line_join = join;
    }

    fn miter_limit(&self) -> f64 {
        self.state().miter_limit
    }

    /// Ignores non-finite or non-positive limits.
    fn set_miter_limit(&mut self, limit: f64) {
        if limit.is_finite() && limit > 0.0 {
            self.state_stack_mut().current_mut().miter_limit = limit;
        }
    }

    fn line_dash(&self) -> &[f64] {
        &self.state().line_dash
    }

    /// Ignores patterns with negative or non-finite entries; odd-length
    /// patterns are repeated to even length.
    fn set_line_dash(&mut self, mut segments: Vec<f64>) {
        if segments.iter().any(|&v| !v.is_finite() || v < 0.0) {
            return;
        }
        if segments.len() % 2 == 1 {
            segments.extend_from_within(..);
        }
        self.state_stack_mut().current_mut().line_dash = segments;
    }

    fn line_dash_offset(&self) -> f64 {
        self.state().line_dash_offset
    }

    fn set_line_dash_offset(&mut self, offset: f64) {
        if offset.is_finite() {
            self.state_stack_mut().current_mut().line_dash_offset = offset;
        }
    }

    // --- Named colors ---

    fn named_color(&self, name: NamedColor) -> Color {
        self.state().colors.get(name)
    }

    fn set_named_color(&mut self, name: NamedColor, color: Color) {
        self.state_stack_mut().current_mut().colors.set(name, color);
    }

    // --- Text ---

    fn text_size(&self) -> f64 {
        self.state().text_size
    }

    fn set_text_size(&mut self, size: f64) {
        if size.is_finite() && size >= 0.0 {
            self.state_stack_mut().current_mut().text_size = size;
        }
    }

    fn text_format(&self) -> TextFormat {
        self.state().text_format
    }

    fn set_text_format(&mut self, format: TextFormat) {
        self.state_stack_mut().current_mut().text_format = format;
    }

    fn text_rendering_mode(&self) -> TextRenderingMode {
        self.state().text_rendering_mode
    }

    fn set_text_rendering_mode(&mut self, mode: TextRenderingMode) {
        self.state_stack_mut().current_mut().text_rendering_mode = mode;
    }

    fn font(&self) -> &FontSpec {
        &self.state().font
    }

    /// Select a font; the text size follows the font's size.
    fn set_font(&mut self, font: FontSpec) {
        let state = self.state_stack_mut().current_mut();
        state.text_size = font.size;
        state.font = font;
    }

    // --- Fields ---

    fn fields_enabled(&self) -> bool {
        self.state().fields_enabled
    }

    fn set_fields_enabled(&mut self, enabled: bool) {
        self.state_stack_mut().current_mut().fields_enabled = enabled;
    }

    fn field_prefix(&self) -> &str {
        &self.state().field_prefix
    }

    fn set_field_prefix(&mut self, prefix: &str) {
        self.state_stack_mut().current_mut().field_prefix = prefix.to_string();
    }
}

impl GraphicsContext for StateStack {
    fn state_stack(&self) -> &StateStack {
        self
    }

    fn state_stack_mut(&mut self) -> &mut StateStack {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_save_restore_is_a_no_op() {
        let mut stack = StateStack::new();
        stack.set_line_width(3.0);
        let before = stack.state().clone();
        stack.save();
        stack.restore().unwrap();
        assert_eq!(stack.state(), &before);
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_nested_restore_order() {
        let mut stack = StateStack::new();
        stack.set_line_width(1.5);
        stack.save();
        stack.set_line_width(2.5);
        stack.save();
        stack.set_line_width(3.5);
        assert_eq!(stack.depth(), 2);

        stack.restore().unwrap();
        assert_eq!(stack.line_width(), 2.5);
        stack.restore().unwrap();
        assert_eq!(stack.line_width(), 1.5);
    }

    #[test]
    fn test_empty_restore_fails_without_mutation() {
        let mut stack = StateStack::new();
        stack.set_field_prefix("form.");
        let before = stack.state().clone();
        let err = stack.restore().unwrap_err();
        assert!(matches!(
            err,
            CanvasError::StackUnderflow {
                expected: 1,
                actual: 0
            }
        ));
        assert_eq!(stack.state(), &before);
    }

    #[test]
    fn test_restore_to_depth() {
        let mut stack = StateStack::new();
        stack.save();
        stack.translate(5.0, 0.0);
        stack.save();
        stack.save();
        stack.restore_to(1).unwrap();
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.transform(), Transform::translate(5.0, 0.0));

        assert!(stack.restore_to(3).is_err());
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_apply_transform_composes_in_local_frame() {
        let mut stack = StateStack::new();
        stack.translate(10.0, 0.0);
        stack.scale(2.0, 2.0);
        let p = stack.transform().map(crate::geometry::Point::new(1.0, 1.0));
        assert_eq!(p, crate::geometry::Point::new(12.0, 2.0));

        stack.set_transform(Transform::identity());
        assert!(stack.transform().is_identity());
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn test_invalid_line_width_ignored(#[case] width: f64) {
        let mut stack = StateStack::new();
        stack.set_line_width(width);
        assert_eq!(stack.line_width(), 1.0);
        stack.set_miter_limit(width);
        assert_eq!(stack.miter_limit(), 10.0);
    }

    #[test]
    fn test_line_dash_rules() {
        let mut stack = StateStack::new();
        stack.set_line_dash(vec![5.0, 10.0, 15.0]);
        assert_eq!(stack.line_dash(), &[5.0, 10.0, 15.0, 5.0, 10.0, 15.0]);
        stack.set_line_dash(vec![1.0, -1.0]);
        assert_eq!(stack.line_dash().len(), 6);
        stack.set_line_dash(vec![]);
        assert!(stack.line_dash().is_empty());
    }

    #[test]
    fn test_snapshot_round_trip_between_stacks() {
        let mut source = StateStack::new();
        source.set_fill_paint(Paint::Solid(Color::WHITE));
        source.rotate(0.5);
        let snapshot = source.snapshot();

        let mut target = StateStack::new();
        target.save();
        target.import_snapshot(&snapshot);
        assert_eq!(target.state(), snapshot.state());
        assert_eq!(target.depth(), 1);
        target.restore().unwrap();
        assert_eq!(target.state(), &GraphicsState::default());
    }

    #[test]
    fn test_set_font_updates_text_size() {
        let mut stack = StateStack::new();
        stack.set_font(crate::font::parse_font("bold 20pt Helvetica").unwrap());
        assert_eq!(stack.text_size(), 20.0);
        assert!(stack.font().is_bold());
    }
}
