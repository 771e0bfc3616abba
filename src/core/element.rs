use std::any::Any;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::core::{DataPoint, DataRect, ElementId, ScreenPoint, XyTransform};
use crate::render::{Color, RenderContext};

/// Answer of one element to a hit-test query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementHit {
    /// Closest point of the element's drawn geometry to the query point.
    pub nearest_point: ScreenPoint,
    pub distance: f64,
    /// Index of the closest data item, for elements made of items.
    pub item_index: Option<usize>,
    pub data_point: Option<DataPoint>,
}

/// Tracker information for the series point nearest to the pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerHitResult {
    pub series_id: ElementId,
    pub series_title: Option<String>,
    pub data_point: DataPoint,
    pub position: ScreenPoint,
    /// Fractional for interpolated results (`2.5` is halfway between items 2 and 3).
    pub item_index: f64,
    pub text: String,
}

impl TrackerHitResult {
    #[must_use]
    pub fn format_text(title: Option<&str>, data_point: DataPoint) -> String {
        let values = format!("X: {:.4}\nY: {:.4}", data_point.x, data_point.y);
        match title {
            Some(title) if !title.is_empty() => format!("{title}\n{values}"),
            _ => values,
        }
    }
}

/// Capability set shared by everything the model draws over its axes.
///
/// `render` and `hit_test` receive the transform of the element's resolved
/// axes; elements never look axes up themselves.
pub trait PlotElement: Any + Debug {
    fn id(&self) -> ElementId;

    fn is_visible(&self) -> bool {
        true
    }

    /// Key of the horizontal axis; `None` or an unknown key uses the default axis.
    fn x_axis_key(&self) -> Option<&str> {
        None
    }

    fn y_axis_key(&self) -> Option<&str> {
        None
    }

    /// Recomputes cached data (extents, sort state) after the caller edited it.
    fn update_data(&mut self) {}

    /// Data-space bounds contributed to the axes' automatic ranges.
    fn data_extents(&self) -> Option<DataRect> {
        None
    }

    /// Fill drawn over the element's axis band in the background phase.
    fn background(&self) -> Option<Color> {
        None
    }

    fn render(&mut self, rc: &mut dyn RenderContext, transform: &XyTransform);

    /// Nearest point of the element within `tolerance` screen units, if any.
    ///
    /// Must not mutate state; the hit-test engine is a read-only query.
    fn hit_test(
        &self,
        point: ScreenPoint,
        tolerance: f64,
        transform: &XyTransform,
    ) -> Option<ElementHit>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A sequence of data points plotted against two axes.
pub trait Series: PlotElement {
    fn title(&self) -> Option<&str>;

    /// Point used by trackers; `interpolate` follows the drawn line between items.
    fn nearest_point(
        &self,
        point: ScreenPoint,
        interpolate: bool,
        transform: &XyTransform,
    ) -> Option<TrackerHitResult>;
}

/// Overlay drawn above all series.
pub trait Annotation: PlotElement {
    fn text(&self) -> Option<&str> {
        None
    }
}

impl dyn Series {
    #[must_use]
    pub fn downcast_ref<T: Series>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    #[must_use]
    pub fn downcast_mut<T: Series>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

impl dyn Annotation {
    #[must_use]
    pub fn downcast_ref<T: Annotation>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    #[must_use]
    pub fn downcast_mut<T: Annotation>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// Filters an element hit by tolerance.
#[must_use]
pub(crate) fn within_tolerance(hit: ElementHit, tolerance: f64) -> Option<ElementHit> {
    (hit.distance.is_finite() && hit.distance <= tolerance).then_some(hit)
}

/// Closest defined item by screen distance: `(index, screen position, distance)`.
pub(crate) fn nearest_item(
    points: &[DataPoint],
    point: ScreenPoint,
    transform: &XyTransform,
) -> Option<(usize, ScreenPoint, f64)> {
    let mut best: Option<(usize, ScreenPoint, f64)> = None;
    for (index, data) in points.iter().enumerate() {
        if !data.is_defined() {
            continue;
        }
        let screen = transform.transform(*data);
        if !screen.is_finite() {
            continue;
        }
        let distance = screen.distance_to(point);
        if best.is_none_or(|(_, _, current)| distance < current) {
            best = Some((index, screen, distance));
        }
    }
    best
}

/// Closest point on the polyline through the defined items.
///
/// Gaps break the line; an isolated item still counts as a point. Returns the
/// fractional item index, the screen position and the distance.
pub(crate) fn nearest_on_polyline(
    points: &[DataPoint],
    point: ScreenPoint,
    transform: &XyTransform,
) -> Option<(f64, ScreenPoint, f64)> {
    let (index, screen, distance) = nearest_item(points, point, transform)?;
    let mut best = (index as f64, screen, distance);

    for (index, pair) in points.windows(2).enumerate() {
        if !pair[0].is_defined() || !pair[1].is_defined() {
            continue;
        }
        let a = transform.transform(pair[0]);
        let b = transform.transform(pair[1]);
        if !a.is_finite() || !b.is_finite() {
            continue;
        }
        let (nearest, t) = point.nearest_on_segment(a, b);
        let distance = nearest.distance_to(point);
        if distance < best.2 {
            best = (index as f64 + t, nearest, distance);
        }
    }
    Some(best)
}
