use std::any::Any;

use crate::core::element::{nearest_item, within_tolerance};
use crate::core::{
    DataPoint, DataRect, ElementHit, ElementId, PlotElement, ScreenPoint, ScreenRect, Series,
    TrackerHitResult, XyTransform,
};
use crate::render::{Color, RenderContext, StrokeStyle};

/// Unconnected markers, one per data point.
#[derive(Debug, Clone)]
pub struct ScatterSeries {
    id: ElementId,
    title: Option<String>,
    points: Vec<DataPoint>,
    marker_size: f64,
    marker_fill: Color,
    marker_stroke: StrokeStyle,
    x_axis_key: Option<String>,
    y_axis_key: Option<String>,
    visible: bool,
    extents: Option<DataRect>,
}

impl Default for ScatterSeries {
    fn default() -> Self {
        Self::new()
    }
}

impl ScatterSeries {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: ElementId::next(),
            title: None,
            points: Vec::new(),
            marker_size: 6.0,
            marker_fill: Color::rgb(0.84, 0.15, 0.16),
            marker_stroke: StrokeStyle::NONE,
            x_axis_key: None,
            y_axis_key: None,
            visible: true,
            extents: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_points(mut self, points: impl IntoIterator<Item = DataPoint>) -> Self {
        self.points.extend(points);
        self.update_data();
        self
    }

    #[must_use]
    pub fn with_marker(mut self, size: f64, fill: Color, stroke: StrokeStyle) -> Self {
        self.marker_size = if size.is_finite() { size.max(0.0) } else { 0.0 };
        self.marker_fill = fill;
        self.marker_stroke = stroke;
        self
    }

    #[must_use]
    pub fn with_axis_keys(mut self, x_axis_key: Option<&str>, y_axis_key: Option<&str>) -> Self {
        self.x_axis_key = x_axis_key.map(str::to_owned);
        self.y_axis_key = y_axis_key.map(str::to_owned);
        self
    }

    #[must_use]
    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut Vec<DataPoint> {
        &mut self.points
    }

    pub fn push(&mut self, point: DataPoint) {
        self.points.push(point);
        self.update_data();
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

impl PlotElement for ScatterSeries {
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

    fn update_data(&mut self) {
        self.extents = DataRect::from_points(&self.points);
    }

    fn data_extents(&self) -> Option<DataRect> {
        self.extents
    }

    fn render(&mut self, rc: &mut dyn RenderContext, transform: &XyTransform) {
        if self.marker_size <= 0.0 {
            return;
        }
        let half = self.marker_size * 0.5;
        let clip = transform.clip;
        for point in self.points.iter().filter(|point| point.is_defined()) {
            let screen = transform.transform(*point);
            if !screen.is_finite() {
                continue;
            }
            let marker = ScreenRect::new(
                screen.x - half,
                screen.y - half,
                self.marker_size,
                self.marker_size,
            );
            if marker.intersect(clip).is_degenerate() {
                continue;
            }
            rc.draw_rectangle(marker, self.marker_fill, self.marker_stroke);
        }
    }

    fn hit_test(
        &self,
        point: ScreenPoint,
        tolerance: f64,
        transform: &XyTransform,
    ) -> Option<ElementHit> {
        let (index, nearest, distance) = nearest_item(&self.points, point, transform)?;
        within_tolerance(
            ElementHit {
                nearest_point: nearest,
                distance,
                item_index: Some(index),
                data_point: Some(self.points[index]),
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

impl Series for ScatterSeries {
    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Scatter points are never interpolated.
    fn nearest_point(
        &self,
        point: ScreenPoint,
        _interpolate: bool,
        transform: &XyTransform,
    ) -> Option<TrackerHitResult> {
        let (index, position, _) = nearest_item(&self.points, point, transform)?;
        let data_point = self.points[index];
        Some(TrackerHitResult {
            series_id: self.id,
            series_title: self.title.clone(),
            data_point,
            position,
            item_index: index as f64,
            text: TrackerHitResult::format_text(self.title.as_deref(), data_point),
        })
    }
}
