mod frame;
mod null_renderer;
mod primitives;

pub use frame::{DrawCommand, RenderFrame};
pub use null_renderer::NullRenderContext;
pub use primitives::{Color, StrokeStyle, TextHAlign, TextStyle, TextVAlign};

use crate::core::{ScreenPoint, ScreenRect};

/// Drawing-context capability consumed by the render pipeline.
///
/// Implementations are pure output sinks: the model hands over screen-space
/// geometry in paint order and never reads anything back except text metrics.
pub trait RenderContext {
    /// Polyline through `points`; fewer than two points draw nothing.
    fn draw_line(&mut self, points: &[ScreenPoint], stroke: StrokeStyle);

    fn draw_polygon(&mut self, points: &[ScreenPoint], fill: Color, stroke: StrokeStyle);

    fn draw_rectangle(&mut self, rect: ScreenRect, fill: Color, stroke: StrokeStyle);

    fn draw_text(&mut self, position: ScreenPoint, text: &str, style: TextStyle);

    /// Independent segments given as consecutive point pairs.
    fn draw_line_segments(&mut self, points: &[ScreenPoint], stroke: StrokeStyle) {
        for pair in points.chunks_exact(2) {
            self.draw_line(pair, stroke);
        }
    }

    /// `(width, height)` of `text`; backends with real font metrics override it.
    fn measure_text(&mut self, text: &str, font_size_px: f64) -> (f64, f64) {
        (estimate_text_width_px(text, font_size_px), font_size_px)
    }

    fn set_clip(&mut self, _rect: ScreenRect) {}

    fn reset_clip(&mut self) {}
}

/// Backend-independent width estimate used for layout when no font metrics exist.
#[must_use]
pub fn estimate_text_width_px(text: &str, font_size_px: f64) -> f64 {
    if text.is_empty() {
        return 0.0;
    }
    let units = text.chars().fold(0.0, |acc, ch| {
        acc + match ch {
            '0'..='9' => 0.62,
            '.' | ',' => 0.34,
            '-' | '+' | '%' => 0.42,
            ' ' => 0.33,
            _ => 0.58,
        }
    });
    (units * font_size_px).max(font_size_px)
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoRenderContext, CairoRenderStats};
