use crate::core::{ScreenPoint, ScreenRect};
use crate::render::{Color, RenderContext, StrokeStyle, TextStyle};

/// Drawing context that only counts primitives.
///
/// It still inspects the geometry so tests can assert that nothing
/// non-finite reached the backend.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NullRenderContext {
    pub line_count: usize,
    pub polygon_count: usize,
    pub rectangle_count: usize,
    pub text_count: usize,
    pub non_finite_count: usize,
}

impl NullRenderContext {
    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.line_count + self.polygon_count + self.rectangle_count + self.text_count
    }

    fn inspect(&mut self, points: &[ScreenPoint]) {
        if points.iter().any(|point| !point.is_finite()) {
            self.non_finite_count += 1;
        }
    }
}

impl RenderContext for NullRenderContext {
    fn draw_line(&mut self, points: &[ScreenPoint], _stroke: StrokeStyle) {
        self.inspect(points);
        self.line_count += 1;
    }

    fn draw_polygon(&mut self, points: &[ScreenPoint], _fill: Color, _stroke: StrokeStyle) {
        self.inspect(points);
        self.polygon_count += 1;
    }

    fn draw_rectangle(&mut self, rect: ScreenRect, _fill: Color, _stroke: StrokeStyle) {
        self.inspect(&[ScreenPoint::new(rect.left, rect.top)]);
        self.rectangle_count += 1;
    }

    fn draw_text(&mut self, position: ScreenPoint, _text: &str, _style: TextStyle) {
        self.inspect(&[position]);
        self.text_count += 1;
    }
}
