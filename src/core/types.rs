use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_unix_seconds, decimal_to_f64};
use crate::error::PlotResult;

static NEXT_MODEL_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one `PlotModel`, used as the owner back-reference of its axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelId(u64);

impl ModelId {
    #[must_use]
    pub(crate) fn next() -> Self {
        Self(NEXT_MODEL_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Identity of one series or annotation, stable across collection edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(u64);

impl ElementId {
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Point in data space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    /// Marker for gaps in a series; undefined points break polylines.
    pub const UNDEFINED: Self = Self {
        x: f64::NAN,
        y: f64::NAN,
    };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn from_decimal_time(time: DateTime<Utc>, value: Decimal) -> PlotResult<Self> {
        Ok(Self {
            x: datetime_to_unix_seconds(time),
            y: decimal_to_f64(value, "value")?,
        })
    }

    pub fn from_decimal(x: Decimal, y: Decimal) -> PlotResult<Self> {
        Ok(Self {
            x: decimal_to_f64(x, "x")?,
            y: decimal_to_f64(y, "y")?,
        })
    }

    #[must_use]
    pub fn is_defined(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Point in screen space (device-independent pixels, y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Nearest point on the segment `a..b`, plus the segment parameter in `[0, 1]`.
    #[must_use]
    pub fn nearest_on_segment(self, a: Self, b: Self) -> (Self, f64) {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let length_sq = dx * dx + dy * dy;
        if length_sq <= f64::EPSILON {
            return (a, 0.0);
        }
        let t = (((self.x - a.x) * dx + (self.y - a.y) * dy) / length_sq).clamp(0.0, 1.0);
        (Self::new(a.x + t * dx, a.y + t * dy), t)
    }
}

/// Axis-aligned rectangle in screen space.
///
/// Width and height are never negative; constructors clamp them to zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    /// Extent below which a rectangle is treated as collapsed.
    pub const MIN_EXTENT: f64 = 1e-6;

    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width: sanitize_extent(width),
            height: sanitize_extent(height),
        }
    }

    #[must_use]
    pub fn from_points(a: ScreenPoint, b: ScreenPoint) -> Self {
        let left = a.x.min(b.x);
        let top = a.y.min(b.y);
        Self::new(left, top, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.top + self.height
    }

    #[must_use]
    pub fn center(self) -> ScreenPoint {
        ScreenPoint::new(self.left + self.width * 0.5, self.top + self.height * 0.5)
    }

    #[must_use]
    pub fn is_degenerate(self) -> bool {
        !(self.width >= Self::MIN_EXTENT && self.height >= Self::MIN_EXTENT)
            || !self.left.is_finite()
            || !self.top.is_finite()
    }

    #[must_use]
    pub fn contains(self, point: ScreenPoint) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }

    /// Closest point of the rectangle (border or interior) to `point`.
    #[must_use]
    pub fn nearest_point(self, point: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new(
            point.x.clamp(self.left, self.right()),
            point.y.clamp(self.top, self.bottom()),
        )
    }

    /// Euclidean distance to the rectangle; zero for interior points.
    #[must_use]
    pub fn distance_to(self, point: ScreenPoint) -> f64 {
        point.distance_to(self.nearest_point(point))
    }

    /// Shrinks the rectangle by `thickness`, collapsing to zero size instead of inverting.
    #[must_use]
    pub fn deflate(self, thickness: Thickness) -> Self {
        Self::new(
            self.left + thickness.left,
            self.top + thickness.top,
            self.width - thickness.left - thickness.right,
            self.height - thickness.top - thickness.bottom,
        )
    }

    #[must_use]
    pub fn intersect(self, other: Self) -> Self {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Self::new(left, top, right - left, bottom - top)
    }
}

fn sanitize_extent(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// Padding around the plot, in screen units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Thickness {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Thickness {
    #[must_use]
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        [self.left, self.top, self.right, self.bottom]
            .iter()
            .all(|value| value.is_finite() && *value >= 0.0)
    }
}

/// Data-space bounding box of an element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataRect {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl DataRect {
    /// Bounding box of the defined points, or `None` when there are none.
    #[must_use]
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a DataPoint>) -> Option<Self> {
        points
            .into_iter()
            .filter(|point| point.is_defined())
            .fold(None, |acc: Option<Self>, point| {
                Some(match acc {
                    None => Self {
                        x_min: point.x,
                        x_max: point.x,
                        y_min: point.y,
                        y_max: point.y,
                    },
                    Some(rect) => Self {
                        x_min: rect.x_min.min(point.x),
                        x_max: rect.x_max.max(point.x),
                        y_min: rect.y_min.min(point.y),
                        y_max: rect.y_max.max(point.y),
                    },
                })
            })
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            x_min: self.x_min.min(other.x_min),
            x_max: self.x_max.max(other.x_max),
            y_min: self.y_min.min(other.y_min),
            y_max: self.y_max.max(other.y_max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DataPoint, DataRect, ScreenPoint, ScreenRect, Thickness};

    #[test]
    fn deflate_collapses_instead_of_inverting() {
        let rect = ScreenRect::new(0.0, 0.0, 10.0, 10.0).deflate(Thickness::uniform(8.0));
        assert_eq!(rect.width, 0.0);
        assert_eq!(rect.height, 0.0);
        assert!(rect.is_degenerate());
    }

    #[test]
    fn rect_distance_is_zero_inside_and_euclidean_outside() {
        let rect = ScreenRect::new(10.0, 10.0, 20.0, 20.0);
        assert_eq!(rect.distance_to(ScreenPoint::new(15.0, 15.0)), 0.0);
        assert!((rect.distance_to(ScreenPoint::new(33.0, 34.0)) - 5.0).abs() <= 1e-12);
    }

    #[test]
    fn data_rect_skips_undefined_points() {
        let points = [
            DataPoint::new(1.0, 5.0),
            DataPoint::UNDEFINED,
            DataPoint::new(-2.0, 7.0),
        ];
        let rect = DataRect::from_points(&points).expect("extents");
        assert_eq!((rect.x_min, rect.x_max), (-2.0, 1.0));
        assert_eq!((rect.y_min, rect.y_max), (5.0, 7.0));
        assert!(DataRect::from_points(&[DataPoint::UNDEFINED]).is_none());
    }

    #[test]
    fn nearest_on_segment_clamps_to_endpoints() {
        let (nearest, t) = ScreenPoint::new(-5.0, 3.0)
            .nearest_on_segment(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(10.0, 0.0));
        assert_eq!(nearest, ScreenPoint::new(0.0, 0.0));
        assert_eq!(t, 0.0);
    }
}
