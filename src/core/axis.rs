use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::axis_label_format::{AxisLabelFormat, format_axis_label};
use crate::core::ticks::{AxisTicks, axis_ticks};
use crate::core::transform::{AxisScaleKind, AxisTransform, normalize_range};
use crate::core::{ModelId, ScreenPoint, ScreenRect};
use crate::error::{PlotError, PlotResult};
use crate::render::Color;

/// Range used by axes that have neither bound data nor user bounds.
pub const DEFAULT_AXIS_RANGE: (f64, f64) = (0.0, 100.0);

/// Edge of the plot area an axis is drawn along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisPosition {
    /// Not drawn and never picked as a default axis; still usable by key.
    None,
    Left,
    Right,
    Top,
    Bottom,
}

impl AxisPosition {
    #[must_use]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    #[must_use]
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// Draw geometry of tick marks; never affects which ticks are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TickStyle {
    Crossing,
    #[default]
    Outside,
    Inside,
    None,
}

impl TickStyle {
    /// `(inside, outside)` tick extents relative to the axis line.
    #[must_use]
    pub fn extents(self, tick_length: f64) -> (f64, f64) {
        match self {
            Self::Crossing => (tick_length * 0.75, tick_length * 0.75),
            Self::Outside => (0.0, tick_length),
            Self::Inside => (tick_length, 0.0),
            Self::None => (0.0, 0.0),
        }
    }
}

/// Tuning controls for automatic axis ranges and tick density.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisTuning {
    pub minimum_padding: f64,
    pub maximum_padding: f64,
    pub min_span_absolute: f64,
    pub interval_length_px: f64,
    pub minor_ticks_per_major: usize,
}

impl Default for AxisTuning {
    fn default() -> Self {
        Self {
            minimum_padding: 0.01,
            maximum_padding: 0.01,
            min_span_absolute: 1e-9,
            interval_length_px: 60.0,
            minor_ticks_per_major: 5,
        }
    }
}

impl AxisTuning {
    pub fn validate(self) -> PlotResult<Self> {
        if !self.minimum_padding.is_finite()
            || !self.maximum_padding.is_finite()
            || self.minimum_padding < 0.0
            || self.maximum_padding < 0.0
        {
            return Err(PlotError::InvalidData(
                "axis padding ratios must be finite and >= 0".to_owned(),
            ));
        }
        if !self.min_span_absolute.is_finite() || self.min_span_absolute <= 0.0 {
            return Err(PlotError::InvalidData(
                "axis min span must be finite and > 0".to_owned(),
            ));
        }
        if !self.interval_length_px.is_finite() || self.interval_length_px <= 0.0 {
            return Err(PlotError::InvalidData(
                "axis interval length must be finite and > 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Colors and sizes used when drawing an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisAppearance {
    pub axis_line_color: Color,
    pub tick_color: Color,
    pub text_color: Color,
    pub major_gridline_color: Color,
    pub minor_gridline_color: Color,
    pub font_size_px: f64,
    pub tick_length_px: f64,
    pub show_major_gridlines: bool,
    pub show_minor_gridlines: bool,
}

impl Default for AxisAppearance {
    fn default() -> Self {
        Self {
            axis_line_color: Color::BLACK,
            tick_color: Color::BLACK,
            text_color: Color::BLACK,
            major_gridline_color: Color::rgba(0.0, 0.0, 0.0, 0.25),
            minor_gridline_color: Color::rgba(0.0, 0.0, 0.0, 0.1),
            font_size_px: 12.0,
            tick_length_px: 4.0,
            show_major_gridlines: false,
            show_minor_gridlines: false,
        }
    }
}

impl AxisAppearance {
    pub fn validate(self) -> PlotResult<Self> {
        for color in [
            self.axis_line_color,
            self.tick_color,
            self.text_color,
            self.major_gridline_color,
            self.minor_gridline_color,
        ] {
            color.validate()?;
        }
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(PlotError::InvalidData(
                "axis font size must be finite and > 0".to_owned(),
            ));
        }
        if !self.tick_length_px.is_finite() || self.tick_length_px < 0.0 {
            return Err(PlotError::InvalidData(
                "axis tick length must be finite and >= 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// One axis: a data range mapped onto a band along one edge of the plot area.
///
/// The configured properties (position, band, key, user bounds, tuning) are
/// set by the caller. The actual range, the screen band and the transform are
/// recomputed by the owning model on every update and by pan/zoom operations.
#[derive(Debug, Clone)]
pub struct Axis {
    position: AxisPosition,
    start_position: f64,
    end_position: f64,
    key: Option<String>,
    title: Option<String>,
    tick_style: TickStyle,
    scale_kind: AxisScaleKind,
    label_format: AxisLabelFormat,
    minimum: Option<f64>,
    maximum: Option<f64>,
    absolute_minimum: f64,
    absolute_maximum: f64,
    is_pan_enabled: bool,
    is_zoom_enabled: bool,
    tuning: AxisTuning,
    appearance: AxisAppearance,

    data_range: Option<(f64, f64)>,
    view_range: Option<(f64, f64)>,
    actual_minimum: f64,
    actual_maximum: f64,
    screen_start: f64,
    screen_end: f64,
    transform: AxisTransform,
    owner: Option<ModelId>,
}

impl Axis {
    #[must_use]
    pub fn new(position: AxisPosition) -> Self {
        Self {
            position,
            start_position: 0.0,
            end_position: 1.0,
            key: None,
            title: None,
            tick_style: TickStyle::default(),
            scale_kind: AxisScaleKind::Linear,
            label_format: AxisLabelFormat::default(),
            minimum: None,
            maximum: None,
            absolute_minimum: f64::NEG_INFINITY,
            absolute_maximum: f64::INFINITY,
            is_pan_enabled: true,
            is_zoom_enabled: true,
            tuning: AxisTuning::default(),
            appearance: AxisAppearance::default(),
            data_range: None,
            view_range: None,
            actual_minimum: DEFAULT_AXIS_RANGE.0,
            actual_maximum: DEFAULT_AXIS_RANGE.1,
            screen_start: 0.0,
            screen_end: 1.0,
            transform: AxisTransform::default(),
            owner: None,
        }
    }

    #[must_use]
    pub fn logarithmic(position: AxisPosition) -> Self {
        Self::new(position).with_scale_kind(AxisScaleKind::Logarithmic)
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_tick_style(mut self, tick_style: TickStyle) -> Self {
        self.tick_style = tick_style;
        self
    }

    #[must_use]
    pub fn with_scale_kind(mut self, scale_kind: AxisScaleKind) -> Self {
        self.scale_kind = scale_kind;
        self.transform = AxisTransform::identity(scale_kind);
        if scale_kind == AxisScaleKind::Logarithmic {
            self.actual_minimum = 1.0;
        }
        self
    }

    /// Requested bounds; `None` leaves that side to the data range.
    pub fn with_range(mut self, minimum: Option<f64>, maximum: Option<f64>) -> PlotResult<Self> {
        self.set_range(minimum, maximum)?;
        Ok(self)
    }

    pub fn with_band(mut self, start_position: f64, end_position: f64) -> PlotResult<Self> {
        self.set_band(start_position, end_position)?;
        Ok(self)
    }

    #[must_use]
    pub fn position(&self) -> AxisPosition {
        self.position
    }

    pub fn set_position(&mut self, position: AxisPosition) {
        self.position = position;
    }

    /// Axes without a position map along x.
    #[must_use]
    pub fn is_horizontal(&self) -> bool {
        !self.position.is_vertical()
    }

    #[must_use]
    pub fn is_vertical(&self) -> bool {
        self.position.is_vertical()
    }

    #[must_use]
    pub fn start_position(&self) -> f64 {
        self.start_position
    }

    #[must_use]
    pub fn end_position(&self) -> f64 {
        self.end_position
    }

    /// Fraction of the plot area the axis covers, enabling stacked axes.
    pub fn set_band(&mut self, start_position: f64, end_position: f64) -> PlotResult<()> {
        for value in [start_position, end_position] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(PlotError::InvalidData(
                    "axis band positions must be finite and in [0, 1]".to_owned(),
                ));
            }
        }
        self.start_position = start_position;
        self.end_position = end_position;
        Ok(())
    }

    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn set_key(&mut self, key: Option<String>) {
        self.key = key;
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    #[must_use]
    pub fn tick_style(&self) -> TickStyle {
        self.tick_style
    }

    pub fn set_tick_style(&mut self, tick_style: TickStyle) {
        self.tick_style = tick_style;
    }

    #[must_use]
    pub fn scale_kind(&self) -> AxisScaleKind {
        self.scale_kind
    }

    #[must_use]
    pub fn label_format(&self) -> &AxisLabelFormat {
        &self.label_format
    }

    pub fn set_label_format(&mut self, label_format: AxisLabelFormat) -> PlotResult<()> {
        label_format.validate()?;
        self.label_format = label_format;
        Ok(())
    }

    #[must_use]
    pub fn minimum(&self) -> Option<f64> {
        self.minimum
    }

    #[must_use]
    pub fn maximum(&self) -> Option<f64> {
        self.maximum
    }

    pub fn set_range(&mut self, minimum: Option<f64>, maximum: Option<f64>) -> PlotResult<()> {
        for value in [minimum, maximum].into_iter().flatten() {
            if !self.scale_kind.accepts(value) {
                return Err(PlotError::InvalidData(format!(
                    "axis bound {value} is not valid for a {:?} axis",
                    self.scale_kind
                )));
            }
        }
        self.minimum = minimum;
        self.maximum = maximum;
        Ok(())
    }

    #[must_use]
    pub fn absolute_minimum(&self) -> f64 {
        self.absolute_minimum
    }

    #[must_use]
    pub fn absolute_maximum(&self) -> f64 {
        self.absolute_maximum
    }

    /// Hard limits that neither pan nor zoom nor data can move the range past.
    pub fn set_absolute_range(&mut self, minimum: f64, maximum: f64) -> PlotResult<()> {
        if minimum.is_nan() || maximum.is_nan() || minimum >= maximum {
            return Err(PlotError::InvalidData(
                "axis absolute minimum must be < absolute maximum".to_owned(),
            ));
        }
        self.absolute_minimum = minimum;
        self.absolute_maximum = maximum;
        Ok(())
    }

    #[must_use]
    pub fn is_pan_enabled(&self) -> bool {
        self.is_pan_enabled
    }

    pub fn set_pan_enabled(&mut self, enabled: bool) {
        self.is_pan_enabled = enabled;
    }

    #[must_use]
    pub fn is_zoom_enabled(&self) -> bool {
        self.is_zoom_enabled
    }

    pub fn set_zoom_enabled(&mut self, enabled: bool) {
        self.is_zoom_enabled = enabled;
    }

    #[must_use]
    pub fn tuning(&self) -> AxisTuning {
        self.tuning
    }

    pub fn set_tuning(&mut self, tuning: AxisTuning) -> PlotResult<()> {
        self.tuning = tuning.validate()?;
        Ok(())
    }

    #[must_use]
    pub fn appearance(&self) -> AxisAppearance {
        self.appearance
    }

    pub fn set_appearance(&mut self, appearance: AxisAppearance) -> PlotResult<()> {
        self.appearance = appearance.validate()?;
        Ok(())
    }

    #[must_use]
    pub fn actual_minimum(&self) -> f64 {
        self.actual_minimum
    }

    #[must_use]
    pub fn actual_maximum(&self) -> f64 {
        self.actual_maximum
    }

    #[must_use]
    pub fn actual_range(&self) -> (f64, f64) {
        (self.actual_minimum, self.actual_maximum)
    }

    /// Range set by pan/zoom, if any.
    #[must_use]
    pub fn view_range(&self) -> Option<(f64, f64)> {
        self.view_range
    }

    #[must_use]
    pub fn data_range(&self) -> Option<(f64, f64)> {
        self.data_range
    }

    #[must_use]
    pub fn transform(&self) -> AxisTransform {
        self.transform
    }

    /// Screen coordinates of the data minimum and maximum.
    #[must_use]
    pub fn screen_band(&self) -> (f64, f64) {
        (self.screen_start, self.screen_end)
    }

    #[must_use]
    pub fn owner(&self) -> Option<ModelId> {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: Option<ModelId>) {
        self.owner = owner;
    }

    #[must_use]
    pub fn to_screen(&self, value: f64) -> f64 {
        self.transform.transform(value)
    }

    #[must_use]
    pub fn to_data(&self, screen: f64) -> f64 {
        self.transform.inverse_transform(screen)
    }

    /// Whether the point falls inside this axis' band along its own direction.
    #[must_use]
    pub fn band_contains(&self, point: ScreenPoint) -> bool {
        let coordinate = if self.is_horizontal() {
            point.x
        } else {
            point.y
        };
        let low = self.screen_start.min(self.screen_end);
        let high = self.screen_start.max(self.screen_end);
        coordinate >= low && coordinate <= high
    }

    pub(crate) fn reset_data_range(&mut self) {
        self.data_range = None;
    }

    /// Widens the data range; values the scale kind cannot map are skipped.
    pub(crate) fn include_data_range(&mut self, minimum: f64, maximum: f64) {
        let kind = self.scale_kind;
        let mut accepted = [minimum, maximum]
            .into_iter()
            .filter(|value| kind.accepts(*value));
        let Some(first) = accepted.next() else {
            return;
        };
        let (low, high) = accepted.fold((first, first), |(low, high), value| {
            (low.min(value), high.max(value))
        });

        self.data_range = Some(match self.data_range {
            Some((current_low, current_high)) => (current_low.min(low), current_high.max(high)),
            None => (low, high),
        });
    }

    /// Resolves the actual range.
    ///
    /// Precedence: pan/zoom view range, then the user bounds, then the padded
    /// data range, then `DEFAULT_AXIS_RANGE`. The result is clamped to the
    /// absolute limits and widened to the minimum span.
    pub(crate) fn update_actual_range(&mut self) {
        let kind = self.scale_kind;
        let (minimum, maximum) = match self.view_range {
            Some(range) => range,
            None => {
                let (data_min, data_max) = self.data_range.unwrap_or(DEFAULT_AXIS_RANGE);
                let (low, high) = (kind.to_scale_space(data_min), kind.to_scale_space(data_max));
                let span = high - low;
                let padded_min = kind.from_scale_space(low - span * self.tuning.minimum_padding);
                let padded_max = kind.from_scale_space(high + span * self.tuning.maximum_padding);
                let (padded_min, padded_max) = if self.data_range.is_some() {
                    (padded_min, padded_max)
                } else {
                    (data_min, data_max)
                };
                (
                    self.minimum.unwrap_or(padded_min),
                    self.maximum.unwrap_or(padded_max),
                )
            }
        };

        let (minimum, maximum) = self.sanitize_range(minimum, maximum);
        self.actual_minimum = minimum;
        self.actual_maximum = maximum;
    }

    fn sanitize_range(&self, minimum: f64, maximum: f64) -> (f64, f64) {
        let kind = self.scale_kind;
        let (mut minimum, mut maximum) = if minimum <= maximum {
            (minimum, maximum)
        } else {
            (maximum, minimum)
        };
        if !kind.accepts(maximum) {
            maximum = if kind.accepts(minimum) {
                minimum * 100.0
            } else {
                DEFAULT_AXIS_RANGE.1
            };
        }
        if !kind.accepts(minimum) {
            minimum = match kind {
                AxisScaleKind::Linear => DEFAULT_AXIS_RANGE.0,
                AxisScaleKind::Logarithmic => maximum / 100.0,
            };
        }

        minimum = minimum.max(self.absolute_minimum);
        maximum = maximum.min(self.absolute_maximum);

        let (low, high) = normalize_range(
            kind.to_scale_space(minimum),
            kind.to_scale_space(maximum),
            self.tuning.min_span_absolute,
        );
        (kind.from_scale_space(low), kind.from_scale_space(high))
    }

    /// Places the axis band inside `plot_area` and rebuilds the transform.
    ///
    /// Vertical axes run bottom to top so increasing values go up.
    pub fn update_transform(&mut self, plot_area: ScreenRect) {
        let (start, end) = if self.is_horizontal() {
            (
                plot_area.left + self.start_position * plot_area.width,
                plot_area.left + self.end_position * plot_area.width,
            )
        } else {
            (
                plot_area.bottom() - self.start_position * plot_area.height,
                plot_area.bottom() - self.end_position * plot_area.height,
            )
        };
        self.screen_start = start;
        self.screen_end = end;
        self.refresh_transform();
    }

    fn refresh_transform(&mut self) {
        self.transform = AxisTransform::with_kind(
            self.scale_kind,
            self.actual_minimum,
            self.actual_maximum,
            self.screen_start,
            self.screen_end,
        );
    }

    fn apply_view_range(&mut self, minimum: f64, maximum: f64) -> bool {
        if !minimum.is_finite() || !maximum.is_finite() {
            return false;
        }
        let previous = self.actual_range();
        self.view_range = Some(self.sanitize_range(minimum, maximum));
        self.update_actual_range();
        self.refresh_transform();
        trace!(
            minimum = self.actual_minimum,
            maximum = self.actual_maximum,
            "axis view range changed"
        );
        previous != self.actual_range()
    }

    /// Pans by the pointer movement from `previous` to `current` along this axis.
    pub fn pan(&mut self, previous: ScreenPoint, current: ScreenPoint) -> bool {
        let delta = if self.is_horizontal() {
            current.x - previous.x
        } else {
            current.y - previous.y
        };
        self.pan_by(delta)
    }

    /// Shifts the visible range so content moves by `delta_px` screen units.
    ///
    /// Hitting an absolute limit keeps the span and stops at the limit.
    pub fn pan_by(&mut self, delta_px: f64) -> bool {
        if !self.is_pan_enabled || !delta_px.is_finite() || delta_px == 0.0 {
            return false;
        }

        let kind = self.scale_kind;
        let shifted =
            |value: f64| kind.to_scale_space(self.to_data(self.to_screen(value) - delta_px));
        let mut low = shifted(self.actual_minimum);
        let mut high = shifted(self.actual_maximum);
        if low > high {
            std::mem::swap(&mut low, &mut high);
        }
        let span = high - low;
        let absolute_low = kind.to_scale_space(self.absolute_minimum);
        let absolute_high = kind.to_scale_space(self.absolute_maximum);
        if absolute_low.is_finite() && low < absolute_low {
            low = absolute_low;
            high = low + span;
        }
        if absolute_high.is_finite() && high > absolute_high {
            high = absolute_high;
            low = high - span;
        }

        self.apply_view_range(kind.from_scale_space(low), kind.from_scale_space(high))
    }

    /// Zooms around the data value under `screen_coordinate`; `factor > 1` zooms in.
    pub fn zoom_at(&mut self, factor: f64, screen_coordinate: f64) -> bool {
        if !self.is_zoom_enabled
            || !factor.is_finite()
            || factor <= 0.0
            || !screen_coordinate.is_finite()
        {
            return false;
        }

        let kind = self.scale_kind;
        let anchor = kind.to_scale_space(self.to_data(screen_coordinate));
        let low = kind.to_scale_space(self.actual_minimum);
        let high = kind.to_scale_space(self.actual_maximum);
        let new_low = anchor + (low - anchor) / factor;
        let new_high = anchor + (high - anchor) / factor;
        self.apply_view_range(kind.from_scale_space(new_low), kind.from_scale_space(new_high))
    }

    /// Zooms around the middle of the axis band.
    pub fn zoom_by(&mut self, factor: f64) -> bool {
        let center = 0.5 * (self.screen_start + self.screen_end);
        self.zoom_at(factor, center)
    }

    /// Shows exactly `[minimum, maximum]` (clamped to the absolute limits).
    pub fn zoom(&mut self, minimum: f64, maximum: f64) -> bool {
        if !self.is_zoom_enabled {
            return false;
        }
        self.apply_view_range(minimum, maximum)
    }

    /// Drops the pan/zoom state; the next range comes from bounds or data.
    pub fn reset(&mut self) {
        self.view_range = None;
        self.update_actual_range();
        self.refresh_transform();
    }

    #[must_use]
    pub fn ticks(&self) -> AxisTicks {
        axis_ticks(
            self.scale_kind,
            self.actual_range(),
            self.screen_end - self.screen_start,
            self.tuning.interval_length_px,
            self.tuning.minor_ticks_per_major,
        )
    }

    #[must_use]
    pub fn format_label(&self, value: f64, tick_step: f64) -> String {
        format_axis_label(value, tick_step, &self.label_format)
    }
}

/// Shared, identity-carrying handle to an axis.
///
/// Models store handles, so an axis can be inspected and mutated by the
/// caller while a model owns it; identity (`ptr_eq`) is what the ownership
/// invariants are checked against.
#[derive(Debug, Clone)]
pub struct AxisHandle(Rc<RefCell<Axis>>);

impl AxisHandle {
    #[must_use]
    pub fn new(axis: Axis) -> Self {
        Self(Rc::new(RefCell::new(axis)))
    }

    /// Panics if the axis is currently mutably borrowed.
    #[must_use]
    pub fn borrow(&self) -> Ref<'_, Axis> {
        self.0.borrow()
    }

    /// Panics if the axis is currently borrowed.
    #[must_use]
    pub fn borrow_mut(&self) -> RefMut<'_, Axis> {
        self.0.borrow_mut()
    }

    pub(crate) fn try_borrow_mut(&self) -> Option<RefMut<'_, Axis>> {
        self.0.try_borrow_mut().ok()
    }

    pub(crate) fn try_borrow(&self) -> Option<Ref<'_, Axis>> {
        self.0.try_borrow().ok()
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl From<Axis> for AxisHandle {
    fn from(axis: Axis) -> Self {
        Self::new(axis)
    }
}
