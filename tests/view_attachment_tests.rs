use std::cell::{Cell, RefCell};
use std::rc::Rc;

use plotcore::{HeadlessPlotView, PlotController, PlotError, PlotModel, PlotView};

#[derive(Debug, Default)]
struct CountingView {
    model: RefCell<Option<Rc<RefCell<PlotModel>>>>,
    redraws: Cell<usize>,
    data_refreshes: Cell<usize>,
}

impl PlotView for CountingView {
    fn actual_model(&self) -> Option<Rc<RefCell<PlotModel>>> {
        self.model.borrow().clone()
    }

    fn invalidate_plot(&self, update_data: bool) {
        self.redraws.set(self.redraws.get() + 1);
        if update_data {
            self.data_refreshes.set(self.data_refreshes.get() + 1);
        }
    }
}

#[test]
fn dropping_the_view_detaches_it() {
    let model = Rc::new(RefCell::new(PlotModel::new()));
    {
        let _view = HeadlessPlotView::new(Rc::clone(&model), PlotController::new()).expect("view");
        assert!(model.borrow().plot_view().is_some());
    }
    assert!(model.borrow().plot_view().is_none());
    model.borrow().invalidate_plot(true);

    let view = HeadlessPlotView::new(Rc::clone(&model), PlotController::new())
        .expect("reattach after drop");
    model.borrow().invalidate_plot(true);
    assert_eq!(view.invalidation_count(), 1);
    assert_eq!(view.data_invalidation_count(), 1);
}

#[test]
fn second_live_view_is_rejected() {
    let model = Rc::new(RefCell::new(PlotModel::new()));
    let first = HeadlessPlotView::new(Rc::clone(&model), PlotController::new()).expect("view");

    let error = HeadlessPlotView::new(Rc::clone(&model), PlotController::new())
        .expect_err("second view must be rejected");
    assert!(matches!(error, PlotError::Structural(_)));

    model.borrow().invalidate_plot(false);
    assert_eq!(first.invalidation_count(), 1);
}

#[test]
fn reattaching_the_same_view_is_a_no_op() {
    let model = Rc::new(RefCell::new(PlotModel::new()));
    let view = Rc::new(CountingView::default());
    *view.model.borrow_mut() = Some(Rc::clone(&model));
    let handle: Rc<dyn PlotView> = view.clone();

    model.borrow_mut().attach_plot_view(&handle).expect("attach");
    model.borrow_mut().attach_plot_view(&handle).expect("same view again");

    model.borrow().invalidate_plot(false);
    model.borrow().invalidate_plot(true);
    assert_eq!(view.redraws.get(), 2);
    assert_eq!(view.data_refreshes.get(), 1);

    model.borrow_mut().detach_plot_view();
    model.borrow().invalidate_plot(true);
    assert_eq!(view.redraws.get(), 2);
}
