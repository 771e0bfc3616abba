use plotcore::PlotModel;
use plotcore::core::{
    Axis, AxisPosition, DataPoint, LineAnnotation, LineSeries, RectangleAnnotation,
    ScatterSeries, TextAnnotation,
};
use plotcore::render::{NullRenderContext, RenderFrame};

fn populated_model() -> PlotModel {
    let mut model = PlotModel::new();
    model.set_title("Degenerate");
    model.set_subtitle("surface sizes");
    model
        .add_axis(Axis::new(AxisPosition::Bottom).with_title("x"))
        .expect("x axis");
    model
        .add_axis(Axis::logarithmic(AxisPosition::Left).with_title("y"))
        .expect("y axis");
    model.add_series(
        LineSeries::new()
            .with_points((1..200).map(|i| DataPoint::new(f64::from(i), f64::from(i).powi(2))))
            .with_markers(3.0, plotcore::render::Color::BLACK),
    );
    model.add_series(ScatterSeries::new().with_points([DataPoint::new(5.0, 5.0)]));
    model.add_annotation(RectangleAnnotation::new(10.0, 20.0, 1.0, 100.0).with_text("band"));
    model.add_annotation(LineAnnotation::horizontal(50.0).with_text("limit"));
    model.add_annotation(TextAnnotation::new(DataPoint::new(3.0, 3.0), "note"));
    model
}

#[test]
fn smallest_positive_sizes_render_without_panicking() {
    let mut model = populated_model();
    model.update(true);
    for (width, height) in [
        (f64::MIN_POSITIVE, f64::MIN_POSITIVE),
        (5e-324, 5e-324),
        (0.0, 0.0),
        (-10.0, 200.0),
        (f64::INFINITY, 100.0),
    ] {
        let mut rc = NullRenderContext::default();
        model.render(&mut rc, width, height);
        assert_eq!(rc.primitive_count(), 0, "size {width}x{height}");
        assert!(model.hit_test(plotcore::core::ScreenPoint::new(0.0, 0.0), 5.0).is_empty());
    }
}

#[test]
fn surfaces_smaller_than_the_padding_draw_only_finite_geometry() {
    let mut model = populated_model();
    model.update(true);
    for size in [1e-6, 0.5, 3.0, 16.0, 40.0] {
        let mut frame = RenderFrame::new(size, size);
        model.render(&mut frame, size, size);
        frame.validate().expect("finite primitives");
        model.update(false);
    }
}

#[test]
fn empty_model_renders_background_only() {
    let mut model = PlotModel::new();
    model.update(true);
    let mut frame = RenderFrame::new(300.0, 200.0);
    model.render(&mut frame, 300.0, 200.0);
    assert_eq!(frame.rectangles().count(), 2);
    assert_eq!(frame.lines().count(), 0);
}

#[test]
fn single_value_series_gets_a_non_zero_span() {
    let mut model = PlotModel::new();
    model.add_series(LineSeries::new().with_points([
        DataPoint::new(7.0, 3.0),
        DataPoint::new(7.0, 3.0),
    ]));
    model.update(true);
    let mut frame = RenderFrame::new(400.0, 300.0);
    model.render(&mut frame, 400.0, 300.0);
    frame.validate().expect("finite primitives");

    for (axis, value) in model.axes().iter().zip([7.0, 3.0]) {
        let axis = axis.borrow();
        let (minimum, maximum) = axis.actual_range();
        assert!(maximum > minimum);
        assert!(minimum <= value && value <= maximum);
        assert!(axis.transform().scale().is_finite());
    }
}
