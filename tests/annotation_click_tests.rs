use std::cell::{Cell, RefCell};
use std::rc::Rc;

use plotcore::api::ElementKind;
use plotcore::core::{Annotation, DataPoint, RectangleAnnotation, ScatterSeries, ScreenPoint};
use plotcore::interaction::{MouseButton, MouseButtonEventArgs, delegate_command};
use plotcore::{HeadlessPlotView, PlotController, PlotModel};

fn model_with_rectangles() -> Rc<RefCell<PlotModel>> {
    let mut model = PlotModel::new();
    model.set_title("Rectangle annotations");
    model.add_annotation(RectangleAnnotation::new(25.0, 75.0, 20.0, 40.0).with_text("lower band"));
    model.add_annotation(RectangleAnnotation::new(25.0, 75.0, 60.0, 80.0).with_text("upper band"));
    Rc::new(RefCell::new(model))
}

fn click_controller() -> PlotController {
    let mut controller = PlotController::empty();
    controller.bind_mouse_down(
        MouseButton::Left,
        delegate_command(|view, _controller, args| {
            let Some(position) = args.position() else {
                return;
            };
            let Some(model) = view.actual_model() else {
                return;
            };
            let mut model = model.borrow_mut();
            let text = model
                .hit_test_kind(position, 10.0, ElementKind::Annotation)
                .first()
                .and_then(|hit| model.annotation_as::<RectangleAnnotation>(hit.element.id))
                .and_then(|annotation| annotation.text())
                .map(str::to_owned);
            if let Some(text) = text {
                model.set_subtitle(text);
                model.invalidate_plot(false);
            }
        }),
    );
    controller
}

fn screen_of(model: &PlotModel, x: f64, y: f64) -> ScreenPoint {
    let axes = model.axes();
    ScreenPoint::new(axes[0].borrow().to_screen(x), axes[1].borrow().to_screen(y))
}

#[test]
fn clicking_a_rectangle_shows_its_text_as_subtitle() {
    let model = model_with_rectangles();
    let view = HeadlessPlotView::new(Rc::clone(&model), click_controller()).expect("view");
    let _ = view.render(600.0, 400.0);

    let inside_upper = screen_of(&model.borrow(), 50.0, 70.0);
    assert!(view.mouse_down(&MouseButtonEventArgs::new(inside_upper, MouseButton::Left)));
    assert_eq!(model.borrow().subtitle(), Some("upper band"));
    assert_eq!(view.invalidation_count(), 1);

    let inside_lower = screen_of(&model.borrow(), 30.0, 30.0);
    view.mouse_down(&MouseButtonEventArgs::new(inside_lower, MouseButton::Left));
    assert_eq!(model.borrow().subtitle(), Some("lower band"));
    assert_eq!(view.invalidation_count(), 2);
}

#[test]
fn clicking_empty_space_leaves_the_subtitle_alone() {
    let model = model_with_rectangles();
    let view = HeadlessPlotView::new(Rc::clone(&model), click_controller()).expect("view");
    let _ = view.render(600.0, 400.0);

    let outside = screen_of(&model.borrow(), 50.0, 50.0);
    view.mouse_down(&MouseButtonEventArgs::new(outside, MouseButton::Left));
    assert_eq!(model.borrow().subtitle(), None);
    assert_eq!(view.invalidation_count(), 0);
}

#[test]
fn left_click_adds_a_scatter_point_at_the_pointer() {
    let mut model = PlotModel::new();
    let points = model.add_series(
        ScatterSeries::new()
            .with_points([DataPoint::new(10.0, 10.0), DataPoint::new(20.0, 20.0)]),
    );
    let model = Rc::new(RefCell::new(model));

    let added = Rc::new(Cell::new(None));
    let recorded = Rc::clone(&added);
    let mut controller = PlotController::empty();
    controller.bind_mouse_down(
        MouseButton::Left,
        delegate_command(move |view, _controller, args| {
            let Some(position) = args.position() else {
                return;
            };
            let Some(model) = view.actual_model() else {
                return;
            };
            let mut model = model.borrow_mut();
            let point = {
                let axes = model.axes();
                DataPoint::new(
                    axes[0].borrow().to_data(position.x),
                    axes[1].borrow().to_data(position.y),
                )
            };
            if let Some(series) = model.series_as_mut::<ScatterSeries>(points) {
                series.push(point);
                recorded.set(Some(point));
                model.invalidate_plot(true);
            }
        }),
    );
    let view = HeadlessPlotView::new(Rc::clone(&model), controller).expect("view");
    let _ = view.render(600.0, 400.0);

    let corner = {
        let area = model.borrow().plot_area();
        ScreenPoint::new(area.left + 2.0, area.top + 2.0)
    };
    assert!(view.mouse_down(&MouseButtonEventArgs::new(corner, MouseButton::Left)));
    let point = added.get().expect("point added");
    assert!(point.x < 10.0 && point.y > 20.0);
    assert_eq!(view.data_invalidation_count(), 1);
    assert_eq!(
        model
            .borrow()
            .series_as::<ScatterSeries>(points)
            .expect("scatter")
            .points()
            .len(),
        3
    );

    let _ = view.render(600.0, 400.0);
    let model = model.borrow();
    let x_range = model.axes()[0].borrow().data_range().expect("x data");
    let y_range = model.axes()[1].borrow().data_range().expect("y data");
    assert_eq!(x_range, (point.x, 20.0));
    assert_eq!(y_range, (10.0, point.y));
}
