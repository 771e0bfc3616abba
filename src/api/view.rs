use std::cell::{Cell, RefCell, RefMut};
use std::rc::Rc;

use tracing::debug;

use crate::api::PlotModel;
use crate::core::{ScreenRect, TrackerHitResult};
use crate::error::{PlotError, PlotResult};
use crate::interaction::{
    KeyEventArgs, MouseButtonEventArgs, MouseEventArgs, MouseWheelEventArgs, PlotController,
};
use crate::render::RenderFrame;

/// Pointer shape a host should show while a manipulator is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorType {
    #[default]
    Default,
    Pan,
    ZoomRectangle,
    ZoomHorizontal,
    ZoomVertical,
}

/// View capability the model and the commands talk to.
///
/// The model holds views only weakly and calls nothing but `invalidate_plot`.
/// Commands and manipulators additionally use the feedback hooks, which
/// hosts may ignore.
pub trait PlotView {
    /// Model currently displayed, if any.
    fn actual_model(&self) -> Option<Rc<RefCell<PlotModel>>>;

    /// Requests a redraw, optionally preceded by a data refresh.
    fn invalidate_plot(&self, update_data: bool);

    fn set_cursor_type(&self, _cursor: CursorType) {}

    fn show_tracker(&self, _hit: &TrackerHitResult) {}

    fn hide_tracker(&self) {}

    fn show_zoom_rectangle(&self, _rect: ScreenRect) {}

    fn hide_zoom_rectangle(&self) {}
}

/// Windowless view host: renders into a `RenderFrame` and records feedback.
///
/// It owns its controller and forwards input to it; tests and offscreen
/// hosts drive it directly.
#[derive(Debug)]
pub struct HeadlessPlotView {
    model: Rc<RefCell<PlotModel>>,
    controller: RefCell<PlotController>,
    invalidation_count: Cell<usize>,
    data_invalidation_count: Cell<usize>,
    needs_data_update: Cell<bool>,
    tracker: RefCell<Option<TrackerHitResult>>,
    zoom_rectangle: Cell<Option<ScreenRect>>,
    cursor: Cell<CursorType>,
}

impl HeadlessPlotView {
    /// Creates the view and attaches it to `model`.
    pub fn new(model: Rc<RefCell<PlotModel>>, controller: PlotController) -> PlotResult<Rc<Self>> {
        let view = Rc::new(Self {
            model: Rc::clone(&model),
            controller: RefCell::new(controller),
            invalidation_count: Cell::new(0),
            data_invalidation_count: Cell::new(0),
            needs_data_update: Cell::new(true),
            tracker: RefCell::new(None),
            zoom_rectangle: Cell::new(None),
            cursor: Cell::new(CursorType::Default),
        });

        let handle: Rc<dyn PlotView> = view.clone();
        let mut model = model.try_borrow_mut().map_err(|_| {
            PlotError::Structural("model is borrowed while attaching a view".to_owned())
        })?;
        model.attach_plot_view(&handle)?;
        Ok(view)
    }

    #[must_use]
    pub fn model(&self) -> Rc<RefCell<PlotModel>> {
        Rc::clone(&self.model)
    }

    /// Mutable access to the controller, e.g. to change bindings.
    #[must_use]
    pub fn controller(&self) -> RefMut<'_, PlotController> {
        self.controller.borrow_mut()
    }

    /// Updates and renders the model into a fresh frame.
    #[must_use]
    pub fn render(&self, width: f64, height: f64) -> RenderFrame {
        let mut frame = RenderFrame::new(width, height);
        let mut model = self.model.borrow_mut();
        model.update(self.needs_data_update.replace(false));
        model.render(&mut frame, width, height);
        frame
    }

    #[must_use]
    pub fn invalidation_count(&self) -> usize {
        self.invalidation_count.get()
    }

    #[must_use]
    pub fn data_invalidation_count(&self) -> usize {
        self.data_invalidation_count.get()
    }

    #[must_use]
    pub fn tracker(&self) -> Option<TrackerHitResult> {
        self.tracker.borrow().clone()
    }

    #[must_use]
    pub fn zoom_rectangle(&self) -> Option<ScreenRect> {
        self.zoom_rectangle.get()
    }

    #[must_use]
    pub fn cursor(&self) -> CursorType {
        self.cursor.get()
    }

    pub fn mouse_down(&self, args: &MouseButtonEventArgs) -> bool {
        self.dispatch(|controller| controller.handle_mouse_down(self, args))
    }

    pub fn mouse_move(&self, args: &MouseEventArgs) -> bool {
        self.dispatch(|controller| controller.handle_mouse_move(self, args))
    }

    pub fn mouse_up(&self, args: &MouseButtonEventArgs) -> bool {
        self.dispatch(|controller| controller.handle_mouse_up(self, args))
    }

    pub fn mouse_enter(&self, args: &MouseEventArgs) -> bool {
        self.dispatch(|controller| controller.handle_mouse_enter(self, args))
    }

    pub fn mouse_leave(&self, args: &MouseEventArgs) -> bool {
        self.dispatch(|controller| controller.handle_mouse_leave(self, args))
    }

    pub fn mouse_wheel(&self, args: &MouseWheelEventArgs) -> bool {
        self.dispatch(|controller| controller.handle_mouse_wheel(self, args))
    }

    pub fn key_down(&self, args: &KeyEventArgs) -> bool {
        self.dispatch(|controller| controller.handle_key_down(self, args))
    }

    fn dispatch(&self, handle: impl FnOnce(&mut PlotController) -> bool) -> bool {
        // Re-entrant input from inside a command is dropped.
        let Ok(mut controller) = self.controller.try_borrow_mut() else {
            debug!("ignoring re-entrant input event");
            return false;
        };
        handle(&mut controller)
    }
}

impl PlotView for HeadlessPlotView {
    fn actual_model(&self) -> Option<Rc<RefCell<PlotModel>>> {
        Some(Rc::clone(&self.model))
    }

    fn invalidate_plot(&self, update_data: bool) {
        self.invalidation_count.set(self.invalidation_count.get() + 1);
        if update_data {
            self.data_invalidation_count
                .set(self.data_invalidation_count.get() + 1);
            self.needs_data_update.set(true);
        }
    }

    fn set_cursor_type(&self, cursor: CursorType) {
        self.cursor.set(cursor);
    }

    fn show_tracker(&self, hit: &TrackerHitResult) {
        *self.tracker.borrow_mut() = Some(hit.clone());
    }

    fn hide_tracker(&self) {
        *self.tracker.borrow_mut() = None;
    }

    fn show_zoom_rectangle(&self, rect: ScreenRect) {
        self.zoom_rectangle.set(Some(rect));
    }

    fn hide_zoom_rectangle(&self) {
        self.zoom_rectangle.set(None);
    }
}
