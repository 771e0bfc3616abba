use std::any::Any;

use crate::core::element::within_tolerance;
use crate::core::{
    Annotation, AxisTransform, DataPoint, ElementHit, ElementId, PlotElement, ScreenPoint,
    ScreenRect, XyTransform,
};
use crate::render::{
    Color, RenderContext, StrokeStyle, TextHAlign, TextStyle, TextVAlign, estimate_text_width_px,
};

/// Maps a possibly infinite data value onto the clip band of one axis.
fn clamp_to_band(transform: AxisTransform, value: f64, low: f64, high: f64) -> f64 {
    let screen = transform.transform(value);
    if screen.is_nan() {
        return if value > 0.0 { high } else { low };
    }
    screen.clamp(low, high)
}

/// Filled rectangle in data space; infinite bounds extend to the plot area edge.
#[derive(Debug, Clone)]
pub struct RectangleAnnotation {
    id: ElementId,
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub fill: Color,
    pub stroke: StrokeStyle,
    text: Option<String>,
    pub text_style: TextStyle,
    x_axis_key: Option<String>,
    y_axis_key: Option<String>,
    visible: bool,
}

impl Default for RectangleAnnotation {
    fn default() -> Self {
        Self::new(
            f64::NEG_INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::INFINITY,
        )
    }
}

impl RectangleAnnotation {
    #[must_use]
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            id: ElementId::next(),
            min_x,
            max_x,
            min_y,
            max_y,
            fill: Color::rgba(0.27, 0.51, 0.71, 0.4),
            stroke: StrokeStyle::NONE,
            text: None,
            text_style: TextStyle::new(Color::BLACK, 12.0)
                .aligned(TextHAlign::Center, TextVAlign::Middle),
            x_axis_key: None,
            y_axis_key: None,
            visible: true,
        }
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = fill;
        self
    }

    #[must_use]
    pub fn with_axis_keys(mut self, x_axis_key: Option<&str>, y_axis_key: Option<&str>) -> Self {
        self.x_axis_key = x_axis_key.map(str::to_owned);
        self.y_axis_key = y_axis_key.map(str::to_owned);
        self
    }

    pub fn set_text(&mut self, text: Option<String>) {
        self.text = text;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Screen rectangle clipped to the plot area.
    #[must_use]
    pub fn screen_rect(&self, transform: &XyTransform) -> ScreenRect {
        let clip = transform.clip;
        let x0 = clamp_to_band(transform.x, self.min_x, clip.left, clip.right());
        let x1 = clamp_to_band(transform.x, self.max_x, clip.left, clip.right());
        let y0 = clamp_to_band(transform.y, self.min_y, clip.top, clip.bottom());
        let y1 = clamp_to_band(transform.y, self.max_y, clip.top, clip.bottom());
        ScreenRect::from_points(ScreenPoint::new(x0, y0), ScreenPoint::new(x1, y1))
    }
}

impl PlotElement for RectangleAnnotation {
    fn id(&self) -> ElementId {
        self.id
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn x_axis_key(&self) -> Option<&str> {
        self.x_axis_key.as_deref()
    }

    fn y_axis_key(&self) -> Option<&str> {
        self.y_axis_key.as_deref()
    }

    fn render(&mut self, rc: &mut dyn RenderContext, transform: &XyTransform) {
        let rect = self.screen_rect(transform);
        if rect.is_degenerate() {
            return;
        }
        rc.draw_rectangle(rect, self.fill, self.stroke);
        if let Some(text) = self.text.as_deref() {
            rc.draw_text(rect.center(), text, self.text_style);
        }
    }

    fn hit_test(
        &self,
        point: ScreenPoint,
        tolerance: f64,
        transform: &XyTransform,
    ) -> Option<ElementHit> {
        let rect = self.screen_rect(transform);
        if rect.is_degenerate() {
            return None;
        }
        let nearest = rect.nearest_point(point);
        within_tolerance(
            ElementHit {
                nearest_point: nearest,
                distance: nearest.distance_to(point),
                item_index: None,
                data_point: Some(transform.inverse_transform(nearest)),
            },
            tolerance,
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Annotation for RectangleAnnotation {
    fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// Orientation and data coordinate of a `LineAnnotation`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineAnnotationKind {
    Horizontal { y: f64 },
    Vertical { x: f64 },
}

/// Horizontal or vertical line spanning the plot area.
#[derive(Debug, Clone)]
pub struct LineAnnotation {
    id: ElementId,
    pub kind: LineAnnotationKind,
    pub stroke: StrokeStyle,
    text: Option<String>,
    pub text_style: TextStyle,
    x_axis_key: Option<String>,
    y_axis_key: Option<String>,
    visible: bool,
}

impl LineAnnotation {
    #[must_use]
    pub fn new(kind: LineAnnotationKind) -> Self {
        Self {
            id: ElementId::next(),
            kind,
            stroke: StrokeStyle::new(Color::rgb(0.84, 0.15, 0.16), 1.0),
            text: None,
            text_style: TextStyle::new(Color::BLACK, 12.0)
                .aligned(TextHAlign::Right, TextVAlign::Bottom),
            x_axis_key: None,
            y_axis_key: None,
            visible: true,
        }
    }

    #[must_use]
    pub fn horizontal(y: f64) -> Self {
        Self::new(LineAnnotationKind::Horizontal { y })
    }

    #[must_use]
    pub fn vertical(x: f64) -> Self {
        Self::new(LineAnnotationKind::Vertical { x })
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_axis_keys(mut self, x_axis_key: Option<&str>, y_axis_key: Option<&str>) -> Self {
        self.x_axis_key = x_axis_key.map(str::to_owned);
        self.y_axis_key = y_axis_key.map(str::to_owned);
        self
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Endpoints across the clip rectangle, or `None` when the line is outside it.
    fn screen_segment(&self, transform: &XyTransform) -> Option<(ScreenPoint, ScreenPoint)> {
        let clip = transform.clip;
        if clip.is_degenerate() {
            return None;
        }
        match self.kind {
            LineAnnotationKind::Horizontal { y } => {
                let screen_y = transform.y.transform(y);
                (screen_y.is_finite() && screen_y >= clip.top && screen_y <= clip.bottom()).then(
                    || {
                        (
                            ScreenPoint::new(clip.left, screen_y),
                            ScreenPoint::new(clip.right(), screen_y),
                        )
                    },
                )
            }
            LineAnnotationKind::Vertical { x } => {
                let screen_x = transform.x.transform(x);
                (screen_x.is_finite() && screen_x >= clip.left && screen_x <= clip.right()).then(
                    || {
                        (
                            ScreenPoint::new(screen_x, clip.bottom()),
                            ScreenPoint::new(screen_x, clip.top),
                        )
                    },
                )
            }
        }
    }
}

impl PlotElement for LineAnnotation {
    fn id(&self) -> ElementId {
        self.id
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn x_axis_key(&self) -> Option<&str> {
        self.x_axis_key.as_deref()
    }

    fn y_axis_key(&self) -> Option<&str> {
        self.y_axis_key.as_deref()
    }

    fn render(&mut self, rc: &mut dyn RenderContext, transform: &XyTransform) {
        let Some((start, end)) = self.screen_segment(transform) else {
            return;
        };
        rc.draw_line(&[start, end], self.stroke);
        if let Some(text) = self.text.as_deref() {
            rc.draw_text(end, text, self.text_style);
        }
    }

    fn hit_test(
        &self,
        point: ScreenPoint,
        tolerance: f64,
        transform: &XyTransform,
    ) -> Option<ElementHit> {
        let (start, end) = self.screen_segment(transform)?;
        let (nearest, _) = point.nearest_on_segment(start, end);
        within_tolerance(
            ElementHit {
                nearest_point: nearest,
                distance: nearest.distance_to(point),
                item_index: None,
                data_point: Some(transform.inverse_transform(nearest)),
            },
            tolerance,
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Annotation for LineAnnotation {
    fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// Text anchored at a data-space position.
#[derive(Debug, Clone)]
pub struct TextAnnotation {
    id: ElementId,
    pub position: DataPoint,
    text: String,
    pub style: TextStyle,
    x_axis_key: Option<String>,
    y_axis_key: Option<String>,
    visible: bool,
}

impl TextAnnotation {
    #[must_use]
    pub fn new(position: DataPoint, text: impl Into<String>) -> Self {
        Self {
            id: ElementId::next(),
            position,
            text: text.into(),
            style: TextStyle::new(Color::BLACK, 12.0)
                .aligned(TextHAlign::Center, TextVAlign::Bottom),
            x_axis_key: None,
            y_axis_key: None,
            visible: true,
        }
    }

    #[must_use]
    pub fn with_axis_keys(mut self, x_axis_key: Option<&str>, y_axis_key: Option<&str>) -> Self {
        self.x_axis_key = x_axis_key.map(str::to_owned);
        self.y_axis_key = y_axis_key.map(str::to_owned);
        self
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Estimated screen bounds of the text, honoring its alignment.
    fn text_bounds(&self, transform: &XyTransform) -> Option<ScreenRect> {
        let anchor = transform.transform(self.position);
        if !anchor.is_finite() || self.text.is_empty() {
            return None;
        }
        let width = estimate_text_width_px(&self.text, self.style.font_size_px);
        let height = self.style.font_size_px;
        let left = match self.style.h_align {
            TextHAlign::Left => anchor.x,
            TextHAlign::Center => anchor.x - width * 0.5,
            TextHAlign::Right => anchor.x - width,
        };
        let top = match self.style.v_align {
            TextVAlign::Top => anchor.y,
            TextVAlign::Middle => anchor.y - height * 0.5,
            TextVAlign::Bottom => anchor.y - height,
        };
        Some(ScreenRect::new(left, top, width, height))
    }
}

impl PlotElement for TextAnnotation {
    fn id(&self) -> ElementId {
        self.id
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn x_axis_key(&self) -> Option<&str> {
        self.x_axis_key.as_deref()
    }

    fn y_axis_key(&self) -> Option<&str> {
        self.y_axis_key.as_deref()
    }

    fn render(&mut self, rc: &mut dyn RenderContext, transform: &XyTransform) {
        let anchor = transform.transform(self.position);
        if !anchor.is_finite() || !transform.clip.contains(anchor) {
            return;
        }
        rc.draw_text(anchor, &self.text, self.style);
    }

    fn hit_test(
        &self,
        point: ScreenPoint,
        tolerance: f64,
        transform: &XyTransform,
    ) -> Option<ElementHit> {
        let bounds = self.text_bounds(transform)?;
        let nearest = bounds.nearest_point(point);
        within_tolerance(
            ElementHit {
                nearest_point: nearest,
                distance: nearest.distance_to(point),
                item_index: None,
                data_point: Some(self.position),
            },
            tolerance,
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Annotation for TextAnnotation {
    fn text(&self) -> Option<&str> {
        Some(&self.text)
    }
}
