use plotcore::core::{Axis, AxisHandle, AxisPosition, DataPoint, LineSeries};
use plotcore::{PlotError, PlotModel};

#[test]
fn axis_added_twice_to_same_model_is_rejected() {
    let mut model = PlotModel::new();
    let axis = AxisHandle::new(Axis::new(AxisPosition::Bottom));
    model.add_axis(axis.clone()).expect("first add");

    let err = model.add_axis(axis.clone()).expect_err("second add must fail");
    assert!(matches!(err, PlotError::Structural(_)));
    assert_eq!(model.axes().len(), 1);
    assert!(model.axes()[0].ptr_eq(&axis));
}

#[test]
fn axis_owned_by_another_model_is_rejected_without_mutation() {
    let mut first = PlotModel::new();
    let mut second = PlotModel::new();
    second
        .add_axis(Axis::new(AxisPosition::Left))
        .expect("unrelated axis");
    let shared = AxisHandle::new(Axis::new(AxisPosition::Bottom));
    first.add_axis(shared.clone()).expect("owner model");

    let err = second.add_axis(shared.clone()).expect_err("foreign axis");
    assert!(matches!(err, PlotError::Structural(_)));
    assert_eq!(second.axes().len(), 1);
    assert_eq!(shared.borrow().owner(), Some(first.id()));
}

#[test]
fn removed_axis_can_join_another_model() {
    let mut first = PlotModel::new();
    let mut second = PlotModel::new();
    let axis = AxisHandle::new(Axis::new(AxisPosition::Bottom));
    first.add_axis(axis.clone()).expect("add");

    assert!(first.remove_axis(&axis));
    assert!(!first.remove_axis(&axis));
    assert_eq!(axis.borrow().owner(), None);
    second.add_axis(axis.clone()).expect("re-add after removal");
    assert_eq!(axis.borrow().owner(), Some(second.id()));
}

#[test]
fn dropping_a_model_releases_its_axes() {
    let axis = AxisHandle::new(Axis::new(AxisPosition::Bottom));
    {
        let mut model = PlotModel::new();
        model.add_axis(axis.clone()).expect("add");
    }
    assert_eq!(axis.borrow().owner(), None);
    PlotModel::new().add_axis(axis).expect("axis is free again");
}

#[test]
fn key_lookup_resolves_last_match_or_fails() {
    let mut model = PlotModel::new();
    let first = AxisHandle::new(Axis::new(AxisPosition::Left).with_key("value"));
    let second = AxisHandle::new(Axis::new(AxisPosition::Right).with_key("value"));
    model.add_axis(first).expect("first");
    model.add_axis(second.clone()).expect("second");

    let found = model.axis_by_key("value").expect("keyed axis");
    assert!(found.ptr_eq(&second));

    let err = model.axis_by_key("missing").expect_err("unknown key");
    assert!(matches!(err, PlotError::AxisNotFound { ref key } if key == "missing"));
}

#[test]
fn key_lookup_reports_a_borrowed_axis_instead_of_skipping_it() {
    let mut model = PlotModel::new();
    let first = AxisHandle::new(Axis::new(AxisPosition::Left).with_key("value"));
    let second = AxisHandle::new(Axis::new(AxisPosition::Right).with_key("value"));
    model.add_axis(first.clone()).expect("first");
    model.add_axis(second.clone()).expect("second");

    {
        let _held = second.borrow_mut();
        let err = model.axis_by_key("value").expect_err("borrowed axis");
        assert!(matches!(err, PlotError::Structural(_)));
    }

    let found = model.axis_by_key("value").expect("keyed axis");
    assert!(found.ptr_eq(&second));
    assert!(!found.ptr_eq(&first));
}

#[test]
fn removing_a_keyed_axis_falls_back_to_default_axis() {
    let mut model = PlotModel::new();
    let bottom = AxisHandle::new(Axis::new(AxisPosition::Bottom));
    let keyed = AxisHandle::new(Axis::new(AxisPosition::Top).with_key("top"));
    model.add_axis(bottom.clone()).expect("bottom");
    model.add_axis(keyed.clone()).expect("top");
    model.add_axis(Axis::new(AxisPosition::Left)).expect("left");
    model.add_series(
        LineSeries::new()
            .with_axis_keys(Some("top"), None)
            .with_points([DataPoint::new(10.0, 1.0), DataPoint::new(20.0, 2.0)]),
    );

    model.update(true);
    assert_eq!(keyed.borrow().data_range(), Some((10.0, 20.0)));
    assert_eq!(bottom.borrow().data_range(), None);

    assert!(model.remove_axis(&keyed));
    model.update(true);
    assert_eq!(bottom.borrow().data_range(), Some((10.0, 20.0)));
}

#[test]
fn series_and_annotations_are_found_by_id() {
    let mut model = PlotModel::new();
    let id = model.add_series(LineSeries::new().with_title("temperature"));
    let series = model.series_as::<LineSeries>(id).expect("typed access");
    assert_eq!(series.points().len(), 0);

    model
        .series_as_mut::<LineSeries>(id)
        .expect("typed mutable access")
        .push(DataPoint::new(1.0, 2.0));
    assert_eq!(
        model.series_by_id(id).and_then(|series| series.title()),
        Some("temperature")
    );

    let removed = model.remove_series(id).expect("removed");
    assert_eq!(removed.id(), id);
    assert!(model.series().is_empty());
}
