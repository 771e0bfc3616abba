use serde::{Deserialize, Serialize};

use crate::core::{DataPoint, ScreenPoint, ScreenRect};

/// Smallest screen span a transform is built with; collapsed bands use it instead of zero.
pub const MIN_SCREEN_SPAN: f64 = 1e-6;
/// Smallest absolute data span (in scale space) a transform is built with.
pub const MIN_DATA_SPAN: f64 = 1e-9;
/// Smallest data span relative to the magnitude of the range center.
pub const MIN_RELATIVE_SPAN: f64 = 1e-9;

/// Monotonic mapping applied before the linear screen mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AxisScaleKind {
    #[default]
    Linear,
    /// Uniform spacing in log10 units (all values must be > 0).
    Logarithmic,
}

impl AxisScaleKind {
    #[must_use]
    pub fn to_scale_space(self, value: f64) -> f64 {
        match self {
            Self::Linear => value,
            Self::Logarithmic => value.log10(),
        }
    }

    #[must_use]
    pub fn from_scale_space(self, value: f64) -> f64 {
        match self {
            Self::Linear => value,
            Self::Logarithmic => 10f64.powf(value),
        }
    }

    #[must_use]
    pub fn accepts(self, value: f64) -> bool {
        match self {
            Self::Linear => value.is_finite(),
            Self::Logarithmic => value.is_finite() && value > 0.0,
        }
    }
}

/// Widens a range narrower than `min_span` symmetrically around its center.
///
/// Bounds are returned in ascending order.
#[must_use]
pub fn normalize_range(min: f64, max: f64, min_span: f64) -> (f64, f64) {
    let (low, high) = if min <= max { (min, max) } else { (max, min) };
    let center = 0.5 * (low + high);
    let min_span = min_span.max(minimal_span(center));
    if high - low >= min_span {
        return (low, high);
    }
    (center - min_span * 0.5, center + min_span * 0.5)
}

fn minimal_span(center: f64) -> f64 {
    MIN_DATA_SPAN.max(center.abs() * MIN_RELATIVE_SPAN)
}

/// Offset + scale pair mapping one axis between data and screen space.
///
/// `transform(v) = (s(v) - offset) * scale` where `s` is the scale-kind
/// mapping; `inverse_transform` is its exact algebraic inverse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisTransform {
    offset: f64,
    scale: f64,
    kind: AxisScaleKind,
}

impl Default for AxisTransform {
    fn default() -> Self {
        Self::identity(AxisScaleKind::Linear)
    }
}

impl AxisTransform {
    #[must_use]
    pub const fn identity(kind: AxisScaleKind) -> Self {
        Self {
            offset: 0.0,
            scale: 1.0,
            kind,
        }
    }

    /// Linear transform mapping `data_min -> screen_start` and `data_max -> screen_end`.
    #[must_use]
    pub fn new(data_min: f64, data_max: f64, screen_start: f64, screen_end: f64) -> Self {
        Self::with_kind(
            AxisScaleKind::Linear,
            data_min,
            data_max,
            screen_start,
            screen_end,
        )
    }

    /// Transform for an arbitrary scale kind.
    ///
    /// A zero data span is replaced by a minimal span centered on the value and a
    /// collapsed screen band by `MIN_SCREEN_SPAN`, so the result is always invertible.
    #[must_use]
    pub fn with_kind(
        kind: AxisScaleKind,
        data_min: f64,
        data_max: f64,
        screen_start: f64,
        screen_end: f64,
    ) -> Self {
        let start = kind.to_scale_space(data_min);
        let end = kind.to_scale_space(data_max);
        if !start.is_finite() || !end.is_finite() {
            return Self::identity(kind);
        }

        let (start, end) = if (end - start).abs() < minimal_span(0.5 * (start + end)) {
            normalize_range(start, end, 0.0)
        } else {
            (start, end)
        };

        let screen_start = if screen_start.is_finite() {
            screen_start
        } else {
            0.0
        };
        let mut screen_span = screen_end - screen_start;
        if !screen_span.is_finite() || screen_span.abs() < MIN_SCREEN_SPAN {
            screen_span = if screen_span < 0.0 {
                -MIN_SCREEN_SPAN
            } else {
                MIN_SCREEN_SPAN
            };
        }

        let scale = screen_span / (end - start);
        let offset = start - screen_start / scale;
        if !scale.is_normal() || !offset.is_finite() {
            return Self::identity(kind);
        }

        Self {
            offset,
            scale,
            kind,
        }
    }

    #[must_use]
    pub fn offset(self) -> f64 {
        self.offset
    }

    #[must_use]
    pub fn scale(self) -> f64 {
        self.scale
    }

    #[must_use]
    pub fn kind(self) -> AxisScaleKind {
        self.kind
    }

    /// Data value to screen coordinate.
    #[must_use]
    pub fn transform(self, value: f64) -> f64 {
        (self.kind.to_scale_space(value) - self.offset) * self.scale
    }

    /// Screen coordinate to data value.
    #[must_use]
    pub fn inverse_transform(self, screen: f64) -> f64 {
        self.kind.from_scale_space(screen / self.scale + self.offset)
    }
}

/// Pair of axis transforms an element is drawn and hit-tested with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XyTransform {
    pub x: AxisTransform,
    pub y: AxisTransform,
    /// Screen region covered by both axis bands; elements clip to it.
    pub clip: ScreenRect,
}

impl XyTransform {
    #[must_use]
    pub fn new(x: AxisTransform, y: AxisTransform, clip: ScreenRect) -> Self {
        Self { x, y, clip }
    }

    #[must_use]
    pub fn transform(&self, point: DataPoint) -> ScreenPoint {
        ScreenPoint::new(self.x.transform(point.x), self.y.transform(point.y))
    }

    #[must_use]
    pub fn inverse_transform(&self, point: ScreenPoint) -> DataPoint {
        DataPoint::new(
            self.x.inverse_transform(point.x),
            self.y.inverse_transform(point.y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{AxisScaleKind, AxisTransform, MIN_SCREEN_SPAN, normalize_range};

    #[test]
    fn maps_range_endpoints_onto_screen_band() {
        let transform = AxisTransform::new(10.0, 110.0, 50.0, 850.0);
        assert!((transform.transform(10.0) - 50.0).abs() <= 1e-9);
        assert!((transform.transform(110.0) - 850.0).abs() <= 1e-9);
    }

    #[test]
    fn inverted_band_maps_minimum_to_bottom() {
        let transform = AxisTransform::new(0.0, 100.0, 500.0, 100.0);
        assert!((transform.transform(0.0) - 500.0).abs() <= 1e-9);
        assert!((transform.transform(100.0) - 100.0).abs() <= 1e-9);
        assert!(transform.scale() < 0.0);
    }

    #[test]
    fn zero_data_span_is_centered_on_value() {
        let transform = AxisTransform::new(5.0, 5.0, 0.0, 100.0);
        assert!(transform.scale().is_finite());
        assert!((transform.transform(5.0) - 50.0).abs() <= 1e-3);
        assert!((transform.inverse_transform(50.0) - 5.0).abs() <= 1e-9);
    }

    #[test]
    fn collapsed_screen_band_stays_invertible() {
        let transform = AxisTransform::new(0.0, 10.0, 3.0, 3.0);
        assert!(transform.scale().is_normal());
        assert!((transform.scale() - MIN_SCREEN_SPAN / 10.0).abs() <= 1e-18);
        assert!((transform.inverse_transform(transform.transform(7.0)) - 7.0).abs() <= 1e-6);
    }

    #[test]
    fn logarithmic_transform_spaces_decades_evenly() {
        let transform = AxisTransform::with_kind(AxisScaleKind::Logarithmic, 1.0, 1000.0, 0.0, 300.0);
        assert!((transform.transform(10.0) - 100.0).abs() <= 1e-9);
        assert!((transform.transform(100.0) - 200.0).abs() <= 1e-9);
        assert!((transform.inverse_transform(150.0) - 10f64.powf(1.5)).abs() <= 1e-9);
    }

    #[test]
    fn normalize_range_orders_and_widens() {
        assert_eq!(normalize_range(3.0, 1.0, 0.5), (1.0, 3.0));
        let (low, high) = normalize_range(2.0, 2.0, 1.0);
        assert_eq!((low, high), (1.5, 2.5));
        let (low, high) = normalize_range(0.0, 0.0, 0.0);
        assert!(high > low);
    }
}
