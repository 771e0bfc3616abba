use serde::{Deserialize, Serialize};

use crate::core::primitives::unix_seconds_to_datetime;
use crate::error::{PlotError, PlotResult};

/// How tick values are turned into label text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisLabelFormat {
    /// Decimal places derived from the tick step; scientific notation for extremes.
    #[default]
    Auto,
    FixedDecimals { precision: u8 },
    /// Values are UTC unix seconds rendered with a `chrono` strftime pattern.
    UtcDateTime { pattern: String },
}

impl AxisLabelFormat {
    pub fn validate(&self) -> PlotResult<()> {
        match self {
            Self::Auto => Ok(()),
            Self::FixedDecimals { precision } => {
                if *precision > 12 {
                    return Err(PlotError::InvalidData(
                        "axis label decimal precision must be <= 12".to_owned(),
                    ));
                }
                Ok(())
            }
            Self::UtcDateTime { pattern } => {
                if pattern.trim().is_empty() {
                    return Err(PlotError::InvalidData(
                        "axis label date/time pattern must not be empty".to_owned(),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Formats one tick value; `tick_step` drives the automatic precision.
#[must_use]
pub fn format_axis_label(value: f64, tick_step: f64, format: &AxisLabelFormat) -> String {
    if !value.is_finite() {
        return String::new();
    }

    match format {
        AxisLabelFormat::Auto => format_auto(value, tick_step),
        AxisLabelFormat::FixedDecimals { precision } => {
            format!("{value:.prec$}", prec = usize::from(*precision))
        }
        AxisLabelFormat::UtcDateTime { pattern } => unix_seconds_to_datetime(value)
            .map(|time| time.format(pattern).to_string())
            .unwrap_or_default(),
    }
}

fn format_auto(value: f64, tick_step: f64) -> String {
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-6..1e9).contains(&magnitude) {
        return format!("{value:e}");
    }

    let precision = if tick_step.is_finite() && tick_step > 0.0 {
        (-tick_step.log10().floor()).clamp(0.0, 12.0) as usize
    } else {
        0
    };
    let text = format!("{value:.precision$}");
    // "-0.0" style labels come from rounding tiny negatives.
    if text.starts_with('-') && text[1..].chars().all(|ch| ch == '0' || ch == '.') {
        return text[1..].to_owned();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::{AxisLabelFormat, format_axis_label};

    #[test]
    fn auto_precision_follows_step() {
        assert_eq!(format_axis_label(20.0, 10.0, &AxisLabelFormat::Auto), "20");
        assert_eq!(format_axis_label(0.25, 0.05, &AxisLabelFormat::Auto), "0.25");
        assert_eq!(format_axis_label(-0.0001, 0.5, &AxisLabelFormat::Auto), "0.0");
    }

    #[test]
    fn auto_switches_to_scientific_for_extremes() {
        assert_eq!(format_axis_label(2e10, 1e9, &AxisLabelFormat::Auto), "2e10");
    }

    #[test]
    fn utc_pattern_formats_unix_seconds() {
        let format = AxisLabelFormat::UtcDateTime {
            pattern: "%Y-%m-%d".to_owned(),
        };
        assert_eq!(format_axis_label(86_400.0, 86_400.0, &format), "1970-01-02");
    }

    #[test]
    fn fixed_precision_is_validated() {
        assert!(AxisLabelFormat::FixedDecimals { precision: 13 }.validate().is_err());
        assert_eq!(
            format_axis_label(1.0, 1.0, &AxisLabelFormat::FixedDecimals { precision: 2 }),
            "1.00"
        );
    }
}
