use serde::{Deserialize, Serialize};

use crate::core::AxisScaleKind;

/// Hard cap on ticks produced for one axis, whatever the range/span ratio.
pub const MAX_TICK_COUNT: usize = 1_000;

/// Tick values covering one axis range, in ascending order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisTicks {
    pub major: Vec<f64>,
    pub minor: Vec<f64>,
    /// Distance between major ticks in data units (decades for log axes).
    pub major_step: f64,
}

/// Number of intervals that fit `axis_span_px` at `target_spacing_px`.
#[must_use]
pub fn axis_tick_target_count(
    axis_span_px: f64,
    target_spacing_px: f64,
    min_ticks: usize,
    max_ticks: usize,
) -> usize {
    if !axis_span_px.is_finite() || axis_span_px <= 0.0 {
        return min_ticks;
    }
    if !target_spacing_px.is_finite() || target_spacing_px <= 0.0 {
        return min_ticks;
    }

    let raw = (axis_span_px / target_spacing_px).floor() as usize + 1;
    raw.clamp(min_ticks, max_ticks)
}

/// Rounds `range_span / interval_count` up to 1, 2, 2.5 or 5 times a power of ten.
#[must_use]
pub fn nice_step(range_span: f64, interval_count: usize) -> f64 {
    if !range_span.is_finite() || range_span <= 0.0 || interval_count == 0 {
        return 1.0;
    }

    let raw = range_span / interval_count as f64;
    let exponent = 10f64.powf(raw.log10().floor());
    let mantissa = raw / exponent;
    let nice = [1.0, 2.0, 2.5, 5.0, 10.0]
        .into_iter()
        .find(|candidate| *candidate >= mantissa - 1e-12)
        .unwrap_or(10.0);
    nice * exponent
}

/// Multiples of `step` inside `[min, max]`.
#[must_use]
pub fn linear_ticks(min: f64, max: f64, step: f64) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() || !step.is_finite() || step <= 0.0 || max < min {
        return Vec::new();
    }

    let tolerance = step * 1e-9;
    let first = (min / step).ceil();
    let mut ticks = Vec::new();
    for index in 0..MAX_TICK_COUNT {
        let value = (first + index as f64) * step;
        if value > max + tolerance {
            break;
        }
        // Avoid "-0" and 1e-17 style labels around zero.
        ticks.push(if value.abs() < tolerance { 0.0 } else { value });
    }
    ticks
}

/// Major and minor ticks for a range drawn over `axis_span_px` screen units.
#[must_use]
pub fn axis_ticks(
    kind: AxisScaleKind,
    range: (f64, f64),
    axis_span_px: f64,
    interval_length_px: f64,
    minor_per_major: usize,
) -> AxisTicks {
    let (min, max) = range;
    if !min.is_finite() || !max.is_finite() || max <= min {
        return AxisTicks::default();
    }

    let intervals =
        axis_tick_target_count(axis_span_px.abs(), interval_length_px, 1, MAX_TICK_COUNT);
    if kind == AxisScaleKind::Logarithmic && min > 0.0 {
        let decades = decade_ticks(min, max);
        if decades.len() >= 2 {
            let minor = log_minor_ticks(min, max);
            return AxisTicks {
                major: decades,
                minor,
                major_step: 10.0,
            };
        }
    }

    let major_step = nice_step(max - min, intervals);
    let major = linear_ticks(min, max, major_step);
    let minor = if minor_per_major > 1 {
        let minor_step = major_step / minor_per_major as f64;
        linear_ticks(min, max, minor_step)
            .into_iter()
            .filter(|value| !is_multiple_of(*value, major_step))
            .collect()
    } else {
        Vec::new()
    };

    AxisTicks {
        major,
        minor,
        major_step,
    }
}

fn is_multiple_of(value: f64, step: f64) -> bool {
    let ratio = value / step;
    (ratio - ratio.round()).abs() <= 1e-6
}

fn decade_ticks(min: f64, max: f64) -> Vec<f64> {
    let first = (min.log10() - 1e-12).ceil() as i32;
    let last = (max.log10() + 1e-12).floor() as i32;
    (first..=last)
        .take(MAX_TICK_COUNT)
        .map(|exponent| 10f64.powi(exponent))
        .collect()
}

fn log_minor_ticks(min: f64, max: f64) -> Vec<f64> {
    let first = min.log10().floor() as i32;
    let last = max.log10().ceil() as i32;
    let mut ticks = Vec::new();
    for exponent in first..last {
        let decade = 10f64.powi(exponent);
        for multiplier in 2..10 {
            let value = decade * f64::from(multiplier);
            if value >= min && value <= max && ticks.len() < MAX_TICK_COUNT {
                ticks.push(value);
            }
        }
    }
    ticks
}

/// Smallest positive gap between adjacent values, or zero.
#[must_use]
pub fn tick_step_hint_from_values(values: &[f64]) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }

    let mut best = f64::INFINITY;
    for pair in values.windows(2) {
        let step = (pair[1] - pair[0]).abs();
        if step.is_finite() && step > 0.0 {
            best = best.min(step);
        }
    }

    if best.is_finite() { best } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::{AxisTicks, MAX_TICK_COUNT, axis_ticks, linear_ticks, nice_step};
    use crate::core::AxisScaleKind;

    #[test]
    fn nice_step_snaps_to_one_two_five_series() {
        assert_eq!(nice_step(100.0, 10), 10.0);
        assert_eq!(nice_step(100.0, 7), 20.0);
        assert_eq!(nice_step(1.0, 3), 0.5);
        assert_eq!(nice_step(10.0, 4), 2.5);
    }

    #[test]
    fn linear_ticks_cover_range_in_order() {
        let ticks = linear_ticks(-0.3, 1.05, 0.5);
        assert_eq!(ticks, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn tick_density_follows_screen_span() {
        let narrow = axis_ticks(AxisScaleKind::Linear, (0.0, 100.0), 120.0, 60.0, 5);
        let wide = axis_ticks(AxisScaleKind::Linear, (0.0, 100.0), 1200.0, 60.0, 5);
        assert!(narrow.major.len() < wide.major.len());
        assert!(wide.major.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn minor_ticks_exclude_major_positions() {
        let ticks = axis_ticks(AxisScaleKind::Linear, (0.0, 10.0), 600.0, 60.0, 5);
        for minor in &ticks.minor {
            assert!(!ticks.major.iter().any(|major| (major - minor).abs() < 1e-9));
        }
    }

    #[test]
    fn logarithmic_axis_uses_decades() {
        let ticks = axis_ticks(AxisScaleKind::Logarithmic, (1.0, 1000.0), 600.0, 60.0, 5);
        assert_eq!(ticks.major, vec![1.0, 10.0, 100.0, 1000.0]);
        assert!(ticks.minor.contains(&20.0));
    }

    #[test]
    fn degenerate_inputs_produce_no_ticks() {
        assert_eq!(
            axis_ticks(AxisScaleKind::Linear, (5.0, 5.0), 600.0, 60.0, 5),
            AxisTicks::default()
        );
        let capped = linear_ticks(0.0, 1e12, 1.0);
        assert_eq!(capped.len(), MAX_TICK_COUNT);
    }
}
