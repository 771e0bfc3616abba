use plotcore::core::{AxisScaleKind, AxisTransform};
use proptest::prelude::*;

proptest! {
    #[test]
    fn linear_transform_round_trip_property(
        data_min in -1.0e9f64..1.0e9,
        data_span in 1.0e-6f64..1.0e9,
        screen_start in -5_000.0f64..5_000.0,
        screen_span in 1.0f64..10_000.0,
        inverted in any::<bool>(),
        value_factor in 0.0f64..=1.0
    ) {
        let data_max = data_min + data_span;
        let value = data_min + value_factor * data_span;
        let screen_end = if inverted {
            screen_start - screen_span
        } else {
            screen_start + screen_span
        };

        let transform = AxisTransform::new(data_min, data_max, screen_start, screen_end);
        let recovered = transform.inverse_transform(transform.transform(value));

        let magnitude = data_min.abs().max(data_max.abs()).max(data_span);
        prop_assert!((recovered - value).abs() <= 1e-9 * magnitude);
    }

    #[test]
    fn transform_hits_band_ends(
        data_min in -1.0e6f64..1.0e6,
        data_span in 1.0f64..1.0e6,
        screen_start in 0.0f64..1_000.0,
        screen_span in 1.0f64..4_000.0
    ) {
        let data_max = data_min + data_span;
        let screen_end = screen_start + screen_span;
        let transform = AxisTransform::new(data_min, data_max, screen_start, screen_end);

        let tolerance = 1e-6 * screen_span.max(screen_start.abs()).max(1.0);
        prop_assert!((transform.transform(data_min) - screen_start).abs() <= tolerance);
        prop_assert!((transform.transform(data_max) - screen_end).abs() <= tolerance);
    }

    #[test]
    fn logarithmic_transform_round_trip_property(
        exponent_min in -6.0f64..6.0,
        decades in 0.5f64..8.0,
        value_factor in 0.0f64..=1.0
    ) {
        let data_min = 10f64.powf(exponent_min);
        let data_max = 10f64.powf(exponent_min + decades);
        let value = 10f64.powf(exponent_min + value_factor * decades);

        let transform =
            AxisTransform::with_kind(AxisScaleKind::Logarithmic, data_min, data_max, 600.0, 20.0);
        let recovered = transform.inverse_transform(transform.transform(value));

        prop_assert!((recovered - value).abs() <= 1e-9 * value.abs());
    }
}

#[test]
fn zero_span_range_stays_invertible() {
    let transform = AxisTransform::new(42.0, 42.0, 0.0, 500.0);
    assert!(transform.scale().is_finite() && transform.scale() != 0.0);
    let screen = transform.transform(42.0);
    assert!((screen - 250.0).abs() <= 1e-3);
    approx::assert_abs_diff_eq!(transform.inverse_transform(screen), 42.0, epsilon = 1e-9);
}

#[test]
fn collapsed_screen_band_stays_finite() {
    let transform = AxisTransform::new(0.0, 10.0, 100.0, 100.0);
    let screen = transform.transform(5.0);
    assert!(screen.is_finite());
    approx::assert_abs_diff_eq!(transform.inverse_transform(screen), 5.0, epsilon = 1e-5);
}
