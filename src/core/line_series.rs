use std::any::Any;

use crate::core::element::{nearest_item, nearest_on_polyline, within_tolerance};
use crate::core::windowing::{is_sorted_by_x, visible_index_range};
use crate::core::{
    DataPoint, DataRect, ElementHit, ElementId, PlotElement, ScreenPoint, ScreenRect, Series,
    TrackerHitResult, XyTransform,
};
use crate::error::{PlotError, PlotResult};
use crate::render::{Color, RenderContext, StrokeStyle};

/// Below this many points every item is projected; above it x-sorted series
/// only project the visible window.
const WINDOWING_THRESHOLD: usize = 512;

/// Polyline through ordered data points; undefined points break the line.
#[derive(Debug, Clone)]
pub struct LineSeries {
    id: ElementId,
    title: Option<String>,
    points: Vec<DataPoint>,
    stroke: StrokeStyle,
    marker_size: f64,
    marker_fill: Color,
    background: Option<Color>,
    x_axis_key: Option<String>,
    y_axis_key: Option<String>,
    visible: bool,
    extents: Option<DataRect>,
    windowable: bool,
    screen_buffer: Vec<ScreenPoint>,
}

impl Default for LineSeries {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSeries {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: ElementId::next(),
            title: None,
            points: Vec::new(),
            stroke: StrokeStyle::new(Color::rgb(0.13, 0.47, 0.71), 2.0),
            marker_size: 0.0,
            marker_fill: Color::rgb(0.13, 0.47, 0.71),
            background: None,
            x_axis_key: None,
            y_axis_key: None,
            visible: true,
            extents: None,
            windowable: true,
            screen_buffer: Vec::new(),
        }
    }

    /// Samples `f` at `samples` evenly spaced x values in `[x0, x1]`.
    ///
    /// Non-finite function values become gaps.
    pub fn from_function(
        f: impl Fn(f64) -> f64,
        x0: f64,
        x1: f64,
        samples: usize,
    ) -> PlotResult<Self> {
        Self::from_parametric(|t| t, f, x0, x1, samples)
    }

    /// Samples `(fx(t), fy(t))` at `samples` evenly spaced t values in `[t0, t1]`.
    pub fn from_parametric(
        fx: impl Fn(f64) -> f64,
        fy: impl Fn(f64) -> f64,
        t0: f64,
        t1: f64,
        samples: usize,
    ) -> PlotResult<Self> {
        if !t0.is_finite() || !t1.is_finite() {
            return Err(PlotError::InvalidData(
                "function series interval must be finite".to_owned(),
            ));
        }
        if samples < 2 {
            return Err(PlotError::InvalidData(
                "function series needs at least 2 samples".to_owned(),
            ));
        }

        let step = (t1 - t0) / (samples - 1) as f64;
        let points = (0..samples).map(|index| {
            let t = t0 + step * index as f64;
            let point = DataPoint::new(fx(t), fy(t));
            if point.is_defined() {
                point
            } else {
                DataPoint::UNDEFINED
            }
        });
        Ok(Self::new().with_points(points))
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
    pub fn with_stroke(mut self, stroke: StrokeStyle) -> Self {
        self.stroke = stroke;
        self
    }

    /// Square markers of `size` screen units on every defined point.
    #[must_use]
    pub fn with_markers(mut self, size: f64, fill: Color) -> Self {
        self.marker_size = if size.is_finite() { size.max(0.0) } else { 0.0 };
        self.marker_fill = fill;
        self
    }

    #[must_use]
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = Some(background);
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

    /// Direct access to the data; call `update_data` (or update the model with
    /// data refresh) afterwards so cached extents follow.
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

    #[must_use]
    pub fn stroke(&self) -> StrokeStyle {
        self.stroke
    }

    fn render_range(&self, transform: &XyTransform) -> std::ops::Range<usize> {
        if !self.windowable || self.points.len() < WINDOWING_THRESHOLD {
            return 0..self.points.len();
        }
        let clip = transform.clip;
        let start = transform.x.inverse_transform(clip.left);
        let end = transform.x.inverse_transform(clip.right());
        visible_index_range(&self.points, start, end)
    }
}

impl PlotElement for LineSeries {
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
        self.windowable = self.points.iter().all(|point| point.is_defined())
            && is_sorted_by_x(&self.points);
    }

    fn data_extents(&self) -> Option<DataRect> {
        self.extents
    }

    fn background(&self) -> Option<Color> {
        self.background
    }

    fn render(&mut self, rc: &mut dyn RenderContext, transform: &XyTransform) {
        if self.points.is_empty() {
            return;
        }
        let range = self.render_range(transform);
        let mut buffer = std::mem::take(&mut self.screen_buffer);
        buffer.clear();

        if self.stroke.is_visible() {
            for point in &self.points[range.clone()] {
                let screen = transform.transform(*point);
                if point.is_defined() && screen.is_finite() {
                    buffer.push(screen);
                    continue;
                }
                if buffer.len() >= 2 {
                    rc.draw_line(&buffer, self.stroke);
                }
                buffer.clear();
            }
            if buffer.len() >= 2 {
                rc.draw_line(&buffer, self.stroke);
            }
        }

        if self.marker_size > 0.0 && self.marker_fill.is_visible() {
            let half = self.marker_size * 0.5;
            for point in &self.points[range] {
                let screen = transform.transform(*point);
                if !point.is_defined() || !screen.is_finite() {
                    continue;
                }
                let marker = ScreenRect::new(
                    screen.x - half,
                    screen.y - half,
                    self.marker_size,
                    self.marker_size,
                );
                rc.draw_rectangle(marker, self.marker_fill, StrokeStyle::NONE);
            }
        }

        buffer.clear();
        self.screen_buffer = buffer;
    }

    fn hit_test(
        &self,
        point: ScreenPoint,
        tolerance: f64,
        transform: &XyTransform,
    ) -> Option<ElementHit> {
        let (index, nearest, distance) = nearest_on_polyline(&self.points, point, transform)?;
        within_tolerance(
            ElementHit {
                nearest_point: nearest,
                distance,
                item_index: Some(index.round() as usize),
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

impl Series for LineSeries {
    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn nearest_point(
        &self,
        point: ScreenPoint,
        interpolate: bool,
        transform: &XyTransform,
    ) -> Option<TrackerHitResult> {
        let (item_index, position, data_point) = if interpolate {
            let (index, nearest, _) = nearest_on_polyline(&self.points, point, transform)?;
            (index, nearest, transform.inverse_transform(nearest))
        } else {
            let (index, nearest, _) = nearest_item(&self.points, point, transform)?;
            (index as f64, nearest, self.points[index])
        };

        Some(TrackerHitResult {
            series_id: self.id,
            series_title: self.title.clone(),
            data_point,
            position,
            item_index,
            text: TrackerHitResult::format_text(self.title.as_deref(), data_point),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::LineSeries;
    use crate::core::{AxisTransform, DataPoint, PlotElement, ScreenPoint, ScreenRect, Series, XyTransform};
    use crate::render::{DrawCommand, RenderFrame};

    fn unit_transform() -> XyTransform {
        XyTransform::new(
            AxisTransform::new(0.0, 10.0, 0.0, 100.0),
            AxisTransform::new(0.0, 10.0, 100.0, 0.0),
            ScreenRect::new(0.0, 0.0, 100.0, 100.0),
        )
    }

    #[test]
    fn gaps_split_the_polyline() {
        let mut series = LineSeries::new().with_points([
            DataPoint::new(0.0, 0.0),
            DataPoint::new(1.0, 1.0),
            DataPoint::UNDEFINED,
            DataPoint::new(3.0, 3.0),
            DataPoint::new(4.0, 4.0),
        ]);
        let mut frame = RenderFrame::new(100.0, 100.0);
        series.render(&mut frame, &unit_transform());
        let lines: Vec<_> = frame.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|line| line.len() == 2));
    }

    #[test]
    fn windowing_projects_only_visible_items() {
        let mut series =
            LineSeries::new().with_points((0..10_000).map(|i| DataPoint::new(f64::from(i), 1.0)));
        let mut frame = RenderFrame::new(100.0, 100.0);
        series.render(&mut frame, &unit_transform());
        let drawn = frame
            .commands()
            .iter()
            .map(|command| match command {
                DrawCommand::Line { points, .. } => points.len(),
                _ => 0,
            })
            .sum::<usize>();
        assert_eq!(drawn, 12);
    }

    #[test]
    fn hit_test_reports_nearest_point_on_segment() {
        let series = LineSeries::new().with_points([DataPoint::new(0.0, 5.0), DataPoint::new(10.0, 5.0)]);
        let hit = series
            .hit_test(ScreenPoint::new(40.0, 47.0), 5.0, &unit_transform())
            .expect("hit");
        assert!((hit.nearest_point.x - 40.0).abs() <= 1e-9);
        assert!((hit.nearest_point.y - 50.0).abs() <= 1e-9);
        assert!((hit.distance - 3.0).abs() <= 1e-9);
        assert!(
            series
                .hit_test(ScreenPoint::new(40.0, 80.0), 5.0, &unit_transform())
                .is_none()
        );
    }

    #[test]
    fn tracker_interpolates_or_snaps() {
        let series = LineSeries::new()
            .with_title("ramp")
            .with_points([DataPoint::new(0.0, 0.0), DataPoint::new(10.0, 10.0)]);
        let pointer = ScreenPoint::new(30.0, 70.0);
        let interpolated = series
            .nearest_point(pointer, true, &unit_transform())
            .expect("interpolated");
        assert!((interpolated.item_index - 0.3).abs() <= 1e-9);
        assert!((interpolated.data_point.x - 3.0).abs() <= 1e-9);
        assert!(interpolated.text.starts_with("ramp"));

        let snapped = series
            .nearest_point(pointer, false, &unit_transform())
            .expect("snapped");
        assert_eq!(snapped.data_point, DataPoint::new(0.0, 0.0));
    }

    #[test]
    fn function_series_samples_interval() {
        let series = LineSeries::from_function(|x| x * x, -1.0, 1.0, 21).expect("series");
        assert_eq!(series.points().len(), 21);
        let extents = series.data_extents().expect("extents");
        assert!((extents.y_max - 1.0).abs() <= 1e-12);
        assert!(LineSeries::from_function(f64::sin, 0.0, 1.0, 1).is_err());

        let circle =
            LineSeries::from_parametric(f64::cos, f64::sin, 0.0, std::f64::consts::TAU, 64)
                .expect("circle");
        assert!(circle.points().iter().all(|p| (p.x.hypot(p.y) - 1.0).abs() <= 1e-12));
    }
}
