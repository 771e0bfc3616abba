use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;
use tracing::warn;

use crate::core::{ScreenPoint, ScreenRect};
use crate::error::{PlotError, PlotResult};
use crate::render::{Color, RenderContext, StrokeStyle, TextHAlign, TextStyle, TextVAlign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub lines_drawn: usize,
    pub polygons_drawn: usize,
    pub rects_drawn: usize,
    pub texts_drawn: usize,
    pub backend_errors: usize,
}

/// Cairo + Pango + PangoCairo drawing context.
///
/// It either draws on an external Cairo context (for example a toolkit draw
/// callback) or owns an offscreen image surface.
#[derive(Debug)]
pub struct CairoRenderContext {
    context: Context,
    surface: Option<ImageSurface>,
    stats: CairoRenderStats,
}

impl CairoRenderContext {
    #[must_use]
    pub fn new(context: Context) -> Self {
        Self {
            context,
            surface: None,
            stats: CairoRenderStats::default(),
        }
    }

    pub fn offscreen(width: i32, height: i32) -> PlotResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(PlotError::InvalidData(
                "cairo surface size must be > 0".to_owned(),
            ));
        }

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        let context = Context::new(&surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        Ok(Self {
            context,
            surface: Some(surface),
            stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    #[must_use]
    pub fn surface(&self) -> Option<&ImageSurface> {
        self.surface.as_ref()
    }

    #[must_use]
    pub fn stats(&self) -> CairoRenderStats {
        self.stats
    }

    fn stroke_current_path(&mut self, stroke: StrokeStyle, what: &str) {
        if !stroke.is_visible() {
            self.context.new_path();
            return;
        }
        apply_color(&self.context, stroke.color);
        self.context.set_line_width(stroke.thickness);
        if let Err(err) = self.context.stroke() {
            self.record_error(what, err);
        }
    }

    fn fill_current_path(&mut self, fill: Color, what: &str) {
        if !fill.is_visible() {
            return;
        }
        apply_color(&self.context, fill);
        if let Err(err) = self.context.fill_preserve() {
            self.record_error(what, err);
        }
    }

    fn record_error(&mut self, what: &str, err: cairo::Error) {
        self.stats.backend_errors += 1;
        warn!(error = %err, operation = what, "cairo drawing failed");
    }

    fn append_path(&self, points: &[ScreenPoint]) {
        let mut iter = points.iter();
        if let Some(first) = iter.next() {
            self.context.move_to(first.x, first.y);
        }
        for point in iter {
            self.context.line_to(point.x, point.y);
        }
    }
}

impl RenderContext for CairoRenderContext {
    fn draw_line(&mut self, points: &[ScreenPoint], stroke: StrokeStyle) {
        if points.len() < 2 || !stroke.is_visible() {
            return;
        }
        self.append_path(points);
        self.stroke_current_path(stroke, "stroke line");
        self.stats.lines_drawn += 1;
    }

    fn draw_polygon(&mut self, points: &[ScreenPoint], fill: Color, stroke: StrokeStyle) {
        if points.len() < 3 {
            return;
        }
        self.append_path(points);
        self.context.close_path();
        self.fill_current_path(fill, "fill polygon");
        self.stroke_current_path(stroke, "stroke polygon");
        self.stats.polygons_drawn += 1;
    }

    fn draw_rectangle(&mut self, rect: ScreenRect, fill: Color, stroke: StrokeStyle) {
        self.context
            .rectangle(rect.left, rect.top, rect.width, rect.height);
        self.fill_current_path(fill, "fill rectangle");
        self.stroke_current_path(stroke, "stroke rectangle");
        self.stats.rects_drawn += 1;
    }

    fn draw_text(&mut self, position: ScreenPoint, text: &str, style: TextStyle) {
        if text.is_empty() {
            return;
        }
        let layout = pangocairo::functions::create_layout(&self.context);
        let font_description = FontDescription::from_string(&format!("Sans {}", style.font_size_px));
        layout.set_font_description(Some(&font_description));
        layout.set_text(text);

        let (text_width, text_height) = layout.pixel_size();
        let x = match style.h_align {
            TextHAlign::Left => position.x,
            TextHAlign::Center => position.x - f64::from(text_width) / 2.0,
            TextHAlign::Right => position.x - f64::from(text_width),
        };
        let y = match style.v_align {
            TextVAlign::Top => position.y,
            TextVAlign::Middle => position.y - f64::from(text_height) / 2.0,
            TextVAlign::Bottom => position.y - f64::from(text_height),
        };

        apply_color(&self.context, style.color);
        self.context.move_to(x, y);
        pangocairo::functions::show_layout(&self.context, &layout);
        self.stats.texts_drawn += 1;
    }

    fn measure_text(&mut self, text: &str, font_size_px: f64) -> (f64, f64) {
        let layout = pangocairo::functions::create_layout(&self.context);
        let font_description = FontDescription::from_string(&format!("Sans {font_size_px}"));
        layout.set_font_description(Some(&font_description));
        layout.set_text(text);
        let (width, height) = layout.pixel_size();
        (f64::from(width), f64::from(height))
    }

    fn set_clip(&mut self, rect: ScreenRect) {
        self.context.reset_clip();
        self.context
            .rectangle(rect.left, rect.top, rect.width, rect.height);
        self.context.clip();
    }

    fn reset_clip(&mut self) {
        self.context.reset_clip();
    }
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> PlotError {
    PlotError::InvalidData(format!("{prefix}: {err}"))
}
