use std::fmt::Debug;

use tracing::trace;

use crate::api::{CursorType, PlotModel, PlotView};
use crate::core::{AxisHandle, ElementId, ScreenPoint, ScreenRect, TrackerHitResult};
use crate::interaction::MouseEventArgs;

/// Tracker results farther than this from the pointer are not shown when snapping.
pub const TRACKER_FIRING_DISTANCE_PX: f64 = 20.0;

/// Zoom rectangles thinner than this along an axis leave that axis alone.
const MIN_ZOOM_RECTANGLE_PX: f64 = 2.0;

/// Stateful handler of one pointer gesture, fed by the controller.
///
/// Mouse-down manipulators receive moves until the button is released;
/// hover manipulators receive moves until the pointer leaves the view.
pub trait MouseManipulator: Debug {
    fn started(&mut self, _view: &dyn PlotView, _args: &MouseEventArgs) {}

    fn delta(&mut self, _view: &dyn PlotView, _args: &MouseEventArgs) {}

    fn completed(&mut self, _view: &dyn PlotView, _args: &MouseEventArgs) {}
}

fn axes_at(view: &dyn PlotView, point: ScreenPoint) -> (Option<AxisHandle>, Option<AxisHandle>) {
    let Some(model) = view.actual_model() else {
        return (None, None);
    };
    let Ok(model) = model.try_borrow() else {
        return (None, None);
    };
    model.axes_at_point(point)
}

fn invalidate(view: &dyn PlotView) {
    if let Some(model) = view.actual_model() {
        if let Ok(model) = model.try_borrow() {
            model.invalidate_plot(false);
        }
    }
}

/// Drags the axes under the start point along with the pointer.
#[derive(Debug, Default)]
pub struct PanManipulator {
    previous: Option<ScreenPoint>,
    x_axis: Option<AxisHandle>,
    y_axis: Option<AxisHandle>,
}

impl PanManipulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl MouseManipulator for PanManipulator {
    fn started(&mut self, view: &dyn PlotView, args: &MouseEventArgs) {
        let (x_axis, y_axis) = axes_at(view, args.position);
        if x_axis.is_none() && y_axis.is_none() {
            return;
        }
        self.x_axis = x_axis;
        self.y_axis = y_axis;
        self.previous = Some(args.position);
        view.set_cursor_type(CursorType::Pan);
    }

    fn delta(&mut self, view: &dyn PlotView, args: &MouseEventArgs) {
        let Some(previous) = self.previous else {
            return;
        };
        let mut changed = false;
        for axis in [&self.x_axis, &self.y_axis].into_iter().flatten() {
            changed |= axis.borrow_mut().pan(previous, args.position);
        }
        self.previous = Some(args.position);
        if changed {
            invalidate(view);
        }
    }

    fn completed(&mut self, view: &dyn PlotView, _args: &MouseEventArgs) {
        if self.previous.take().is_some() {
            view.set_cursor_type(CursorType::Default);
        }
    }
}

/// Shows a rubber-band rectangle and zooms the axes to it on release.
#[derive(Debug, Default)]
pub struct ZoomRectangleManipulator {
    start: Option<ScreenPoint>,
    x_axis: Option<AxisHandle>,
    y_axis: Option<AxisHandle>,
    rectangle: Option<ScreenRect>,
}

impl ZoomRectangleManipulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rectangle shown since the last move, while dragging.
    #[must_use]
    pub fn rectangle(&self) -> Option<ScreenRect> {
        self.rectangle
    }

    /// Rectangle from the start point to `current`, limited to the axis bands.
    fn rectangle_to(&self, start: ScreenPoint, current: ScreenPoint) -> ScreenRect {
        let band = |axis: &Option<AxisHandle>, fallback: (f64, f64)| {
            axis.as_ref().map_or(fallback, |axis| {
                let (a, b) = axis.borrow().screen_band();
                (a.min(b), a.max(b))
            })
        };
        let (x0, x1) = band(&self.x_axis, (start.x, start.x));
        let (y0, y1) = band(&self.y_axis, (start.y, start.y));
        let (left, right) = if self.x_axis.is_some() {
            (start.x.min(current.x).max(x0), start.x.max(current.x).min(x1))
        } else {
            (x0, x1)
        };
        let (top, bottom) = if self.y_axis.is_some() {
            (start.y.min(current.y).max(y0), start.y.max(current.y).min(y1))
        } else {
            (y0, y1)
        };
        ScreenRect::new(left, top, right - left, bottom - top)
    }
}

impl MouseManipulator for ZoomRectangleManipulator {
    fn started(&mut self, view: &dyn PlotView, args: &MouseEventArgs) {
        let (x_axis, y_axis) = axes_at(view, args.position);
        let x_axis = x_axis.filter(|axis| axis.borrow().is_zoom_enabled());
        let y_axis = y_axis.filter(|axis| axis.borrow().is_zoom_enabled());
        let cursor = match (&x_axis, &y_axis) {
            (Some(_), Some(_)) => CursorType::ZoomRectangle,
            (Some(_), None) => CursorType::ZoomHorizontal,
            (None, Some(_)) => CursorType::ZoomVertical,
            (None, None) => return,
        };
        self.x_axis = x_axis;
        self.y_axis = y_axis;
        self.start = Some(args.position);
        view.set_cursor_type(cursor);
    }

    fn delta(&mut self, view: &dyn PlotView, args: &MouseEventArgs) {
        let Some(start) = self.start else {
            return;
        };
        let rectangle = self.rectangle_to(start, args.position);
        self.rectangle = Some(rectangle);
        view.show_zoom_rectangle(rectangle);
    }

    fn completed(&mut self, view: &dyn PlotView, args: &MouseEventArgs) {
        let Some(start) = self.start.take() else {
            return;
        };
        view.set_cursor_type(CursorType::Default);
        view.hide_zoom_rectangle();
        let rectangle = self.rectangle_to(start, args.position);
        self.rectangle = None;

        let mut changed = false;
        if let Some(axis) = &self.x_axis {
            if rectangle.width >= MIN_ZOOM_RECTANGLE_PX {
                let mut axis = axis.borrow_mut();
                let a = axis.to_data(rectangle.left);
                let b = axis.to_data(rectangle.right());
                changed |= axis.zoom(a.min(b), a.max(b));
            }
        }
        if let Some(axis) = &self.y_axis {
            if rectangle.height >= MIN_ZOOM_RECTANGLE_PX {
                let mut axis = axis.borrow_mut();
                let a = axis.to_data(rectangle.top);
                let b = axis.to_data(rectangle.bottom());
                changed |= axis.zoom(a.min(b), a.max(b));
            }
        }
        trace!(?rectangle, changed, "zoom rectangle completed");
        if changed {
            invalidate(view);
        }
    }
}

/// How a tracker picks the value it shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerOptions {
    /// Show the nearest series point instead of the pointer position.
    pub snap: bool,
    /// Only data items, never interpolated positions between them.
    pub points_only: bool,
    /// Stay on the series found at start instead of re-picking on every move.
    pub lock_to_initial_series: bool,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            snap: true,
            points_only: false,
            lock_to_initial_series: true,
        }
    }
}

/// Reports the series point near the pointer through `PlotView::show_tracker`.
#[derive(Debug, Default)]
pub struct TrackerManipulator {
    options: TrackerOptions,
    series: Option<ElementId>,
    active: bool,
}

impl TrackerManipulator {
    #[must_use]
    pub fn new(options: TrackerOptions) -> Self {
        Self {
            options,
            series: None,
            active: false,
        }
    }

    fn update(&mut self, view: &dyn PlotView, point: ScreenPoint) {
        let locked = self.series.filter(|_| self.options.lock_to_initial_series);
        let hit = view.actual_model().and_then(|model| {
            let model = model.try_borrow().ok()?;
            tracker_hit(&model, point, self.options, locked)
        });
        if let Some(hit) = &hit {
            self.series = Some(hit.series_id);
        }
        match hit {
            Some(hit) => view.show_tracker(&hit),
            None => view.hide_tracker(),
        }
    }
}

impl MouseManipulator for TrackerManipulator {
    fn started(&mut self, view: &dyn PlotView, args: &MouseEventArgs) {
        self.active = true;
        self.series = None;
        self.update(view, args.position);
    }

    fn delta(&mut self, view: &dyn PlotView, args: &MouseEventArgs) {
        if self.active {
            self.update(view, args.position);
        }
    }

    fn completed(&mut self, view: &dyn PlotView, _args: &MouseEventArgs) {
        self.active = false;
        self.series = None;
        view.hide_tracker();
    }
}

/// Tracker result for `point`, or `None` when no series qualifies.
#[must_use]
pub fn tracker_hit(
    model: &PlotModel,
    point: ScreenPoint,
    options: TrackerOptions,
    series: Option<ElementId>,
) -> Option<TrackerHitResult> {
    if !point.is_finite() || model.plot_area().is_degenerate() {
        return None;
    }
    let interpolate = !options.points_only;
    let mut best: Option<(f64, TrackerHitResult)> = None;
    for candidate in model.series() {
        if !candidate.is_visible() || series.is_some_and(|id| id != candidate.id()) {
            continue;
        }
        let Some(transform) = model.element_transform(candidate.as_ref()) else {
            continue;
        };
        if !transform.clip.contains(point) {
            continue;
        }
        let Some(mut hit) = candidate.nearest_point(point, interpolate, &transform) else {
            continue;
        };
        let distance = hit.position.distance_to(point);
        if !distance.is_finite() {
            continue;
        }
        if !options.snap && !options.points_only {
            hit.data_point = transform.inverse_transform(point);
            hit.position = point;
            hit.text = TrackerHitResult::format_text(hit.series_title.as_deref(), hit.data_point);
        }
        if best.as_ref().is_none_or(|(best_distance, _)| distance < *best_distance) {
            best = Some((distance, hit));
        }
    }

    let (distance, hit) = best?;
    if (options.snap || options.points_only) && distance > TRACKER_FIRING_DISTANCE_PX {
        return None;
    }
    Some(hit)
}
