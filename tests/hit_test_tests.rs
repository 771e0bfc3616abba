use plotcore::PlotModel;
use plotcore::api::ElementKind;
use plotcore::core::{Axis, AxisPosition, DataPoint, LineSeries, RectangleAnnotation, ScreenPoint};
use plotcore::render::NullRenderContext;
use proptest::prelude::*;

fn model_with_fixed_axes() -> PlotModel {
    let mut model = PlotModel::new();
    model
        .add_axis(
            Axis::new(AxisPosition::Bottom)
                .with_range(Some(0.0), Some(100.0))
                .expect("x range"),
        )
        .expect("x axis");
    model
        .add_axis(
            Axis::new(AxisPosition::Left)
                .with_range(Some(0.0), Some(100.0))
                .expect("y range"),
        )
        .expect("y axis");
    model
}

fn layout(model: &mut PlotModel) {
    model.update(true);
    model.render(&mut NullRenderContext::default(), 640.0, 480.0);
}

fn screen_of(model: &PlotModel, x: f64, y: f64) -> ScreenPoint {
    let axes = model.axes();
    ScreenPoint::new(axes[0].borrow().to_screen(x), axes[1].borrow().to_screen(y))
}

#[test]
fn topmost_of_two_overlapping_rectangles_comes_first() {
    let mut model = model_with_fixed_axes();
    let a = model.add_annotation(RectangleAnnotation::new(10.0, 60.0, 10.0, 60.0).with_text("A"));
    let b = model.add_annotation(RectangleAnnotation::new(40.0, 90.0, 40.0, 90.0).with_text("B"));
    layout(&mut model);

    let hits = model.hit_test(screen_of(&model, 50.0, 50.0), 0.0);
    let ids: Vec<_> = hits.iter().map(|hit| hit.element.id).collect();
    assert_eq!(ids, vec![b, a]);
    assert!(hits.iter().all(|hit| hit.distance == 0.0));
}

#[test]
fn closer_element_beats_paint_order() {
    let mut model = model_with_fixed_axes();
    let near = model.add_annotation(RectangleAnnotation::new(10.0, 30.0, 10.0, 30.0));
    let far = model.add_annotation(RectangleAnnotation::new(35.0, 60.0, 10.0, 30.0));
    layout(&mut model);

    let probe = screen_of(&model, 31.0, 20.0);
    let hits = model.hit_test(probe, 100.0);
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].element.id, near);
    assert_eq!(hits[1].element.id, far);
    assert!(hits[0].distance < hits[1].distance);
}

#[test]
fn hits_beyond_tolerance_are_excluded() {
    let mut model = model_with_fixed_axes();
    model.add_annotation(RectangleAnnotation::new(10.0, 20.0, 10.0, 20.0));
    layout(&mut model);

    let probe = screen_of(&model, 50.0, 50.0);
    assert!(model.hit_test(probe, 5.0).is_empty());
    assert_eq!(model.hit_test(probe, 10_000.0).len(), 1);
}

#[test]
fn series_hit_reports_item_and_data_point() {
    let mut model = model_with_fixed_axes();
    let id = model.add_series(LineSeries::new().with_points([
        DataPoint::new(10.0, 10.0),
        DataPoint::new(50.0, 50.0),
        DataPoint::new(90.0, 10.0),
    ]));
    model.add_annotation(RectangleAnnotation::new(0.0, 100.0, 0.0, 100.0));
    layout(&mut model);

    let probe = screen_of(&model, 50.0, 50.0);
    let hits = model.hit_test_kind(probe, 3.0, ElementKind::Series);
    assert_eq!(hits.len(), 1);
    let hit = hits[0];
    assert_eq!(hit.element.id, id);
    assert_eq!(hit.element.index, 0);
    let data = hit.data_point.expect("data point");
    approx::assert_abs_diff_eq!(data.x, 50.0, epsilon = 1e-6);
    approx::assert_abs_diff_eq!(data.y, 50.0, epsilon = 1e-6);
}

#[test]
fn hidden_elements_are_not_hit() {
    let mut model = model_with_fixed_axes();
    let mut hidden = RectangleAnnotation::new(0.0, 100.0, 0.0, 100.0);
    hidden.set_visible(false);
    model.add_annotation(hidden);
    layout(&mut model);
    assert!(model.hit_test(screen_of(&model, 50.0, 50.0), 1.0).is_empty());
}

#[test]
fn hit_test_does_not_change_the_model() {
    let mut model = model_with_fixed_axes();
    model.add_series(
        LineSeries::new().with_points([DataPoint::new(0.0, 0.0), DataPoint::new(100.0, 100.0)]),
    );
    layout(&mut model);
    let ranges: Vec<_> = model.axes().iter().map(|axis| axis.borrow().actual_range()).collect();

    let first = model.hit_test(screen_of(&model, 50.0, 50.0), 20.0);
    let second = model.hit_test(screen_of(&model, 50.0, 50.0), 20.0);
    assert_eq!(first, second);
    let after: Vec<_> = model.axes().iter().map(|axis| axis.borrow().actual_range()).collect();
    assert_eq!(ranges, after);
}

proptest! {
    #[test]
    fn results_are_sorted_by_distance_then_reverse_paint_order(
        rects in prop::collection::vec((0.0f64..90.0, 0.0f64..90.0, 1.0f64..10.0), 1..12),
        probe_x in 0.0f64..100.0,
        probe_y in 0.0f64..100.0,
    ) {
        let mut model = model_with_fixed_axes();
        for (x, y, size) in &rects {
            model.add_annotation(RectangleAnnotation::new(*x, x + size, *y, y + size));
        }
        layout(&mut model);

        let hits = model.hit_test(screen_of(&model, probe_x, probe_y), 40.0);
        for pair in hits.windows(2) {
            prop_assert!(pair[0].distance <= pair[1].distance);
            if pair[0].distance == pair[1].distance {
                prop_assert!(pair[0].z_order > pair[1].z_order);
            }
        }
        prop_assert!(hits.iter().all(|hit| hit.distance <= 40.0));
    }
}
