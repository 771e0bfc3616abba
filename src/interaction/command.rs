use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::api::PlotView;
use crate::interaction::{
    InputEventArgs, MouseEventArgs, PanManipulator, PlotController, TrackerManipulator,
    TrackerOptions, ZoomRectangleManipulator,
};

/// Zoom step per wheel notch or key press.
pub const ZOOM_STEP: f64 = 0.12;
/// Zoom step with the fine modifier held.
pub const FINE_ZOOM_STEP: f64 = 0.012;
/// Fraction of the plot area moved by one pan key press.
pub const PAN_STEP_FRACTION: f64 = 0.1;

/// Unit of behavior bound to an input gesture.
///
/// Commands may mutate the model through `view.actual_model()`; they must
/// request a redraw themselves with `PlotModel::invalidate_plot`.
pub trait PlotCommand {
    fn execute(&self, view: &dyn PlotView, controller: &mut PlotController, args: &InputEventArgs);
}

/// Command backed by a closure.
pub struct DelegatePlotCommand<F> {
    handler: F,
}

impl<F> DelegatePlotCommand<F>
where
    F: Fn(&dyn PlotView, &mut PlotController, &InputEventArgs),
{
    #[must_use]
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

impl<F> fmt::Debug for DelegatePlotCommand<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegatePlotCommand").finish_non_exhaustive()
    }
}

impl<F> PlotCommand for DelegatePlotCommand<F>
where
    F: Fn(&dyn PlotView, &mut PlotController, &InputEventArgs),
{
    fn execute(&self, view: &dyn PlotView, controller: &mut PlotController, args: &InputEventArgs) {
        (self.handler)(view, controller, args);
    }
}

/// Wraps a closure as a shareable command.
pub fn delegate_command<F>(handler: F) -> Rc<dyn PlotCommand>
where
    F: Fn(&dyn PlotView, &mut PlotController, &InputEventArgs) + 'static,
{
    Rc::new(DelegatePlotCommand::new(handler))
}

/// Starts a pan manipulator at the pointer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanAtCommand;

impl PlotCommand for PanAtCommand {
    fn execute(&self, view: &dyn PlotView, controller: &mut PlotController, args: &InputEventArgs) {
        if let Some(mouse) = args.mouse_event() {
            controller.add_mouse_manipulator(view, Box::new(PanManipulator::new()), &mouse);
        }
    }
}

/// Starts a zoom rectangle at the pointer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZoomRectangleCommand;

impl PlotCommand for ZoomRectangleCommand {
    fn execute(&self, view: &dyn PlotView, controller: &mut PlotController, args: &InputEventArgs) {
        if let Some(mouse) = args.mouse_event() {
            controller.add_mouse_manipulator(
                view,
                Box::new(ZoomRectangleManipulator::new()),
                &mouse,
            );
        }
    }
}

/// Starts a tracker, either while a button is held or while the pointer hovers.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackCommand {
    pub options: TrackerOptions,
    pub hover: bool,
}

impl PlotCommand for TrackCommand {
    fn execute(&self, view: &dyn PlotView, controller: &mut PlotController, args: &InputEventArgs) {
        let Some(mouse) = args.mouse_event() else {
            return;
        };
        let manipulator = Box::new(TrackerManipulator::new(self.options));
        if self.hover {
            controller.add_hover_manipulator(view, manipulator, &mouse);
        } else {
            controller.add_mouse_manipulator(view, manipulator, &mouse);
        }
    }
}

/// Converts a signed step count into a multiplicative zoom factor.
///
/// Positive steps zoom in; `n` steps in and `n` steps out cancel exactly.
#[must_use]
pub fn zoom_factor(steps: f64, step: f64) -> f64 {
    let amount = steps * step;
    if !amount.is_finite() {
        return 1.0;
    }
    if amount >= 0.0 {
        1.0 + amount
    } else {
        1.0 / (1.0 - amount)
    }
}

/// Zooms the axes under the pointer by the wheel delta.
#[derive(Debug, Clone, Copy)]
pub struct ZoomWheelCommand {
    pub step: f64,
}

impl Default for ZoomWheelCommand {
    fn default() -> Self {
        Self { step: ZOOM_STEP }
    }
}

impl PlotCommand for ZoomWheelCommand {
    fn execute(&self, view: &dyn PlotView, _controller: &mut PlotController, args: &InputEventArgs) {
        let InputEventArgs::MouseWheel(wheel) = args else {
            return;
        };
        let factor = zoom_factor(wheel.delta, self.step);
        zoom_at_pointer(view, factor, &MouseEventArgs::new(wheel.position));
    }
}

fn zoom_at_pointer(view: &dyn PlotView, factor: f64, args: &MouseEventArgs) {
    let Some(model) = view.actual_model() else {
        return;
    };
    let Ok(model) = model.try_borrow() else {
        return;
    };
    let (x_axis, y_axis) = model.axes_at_point(args.position);
    let mut changed = false;
    if let Some(axis) = x_axis {
        changed |= axis.borrow_mut().zoom_at(factor, args.position.x);
    }
    if let Some(axis) = y_axis {
        changed |= axis.borrow_mut().zoom_at(factor, args.position.y);
    }
    trace!(factor, changed, "zoom at pointer");
    if changed {
        model.invalidate_plot(false);
    }
}

/// Zooms every axis around the middle of its band by a fixed number of steps.
#[derive(Debug, Clone, Copy)]
pub struct ZoomCenterCommand {
    /// Positive zooms in, negative zooms out.
    pub steps: f64,
    pub step: f64,
}

impl PlotCommand for ZoomCenterCommand {
    fn execute(&self, view: &dyn PlotView, _controller: &mut PlotController, _args: &InputEventArgs) {
        let Some(model) = view.actual_model() else {
            return;
        };
        let Ok(model) = model.try_borrow() else {
            return;
        };
        if model.zoom_all_axes(zoom_factor(self.steps, self.step)) {
            model.invalidate_plot(false);
        }
    }
}

/// Pans every axis by a fraction of the plot area.
#[derive(Debug, Clone, Copy)]
pub struct PanByCommand {
    /// Horizontal content movement as a fraction of the plot width; positive moves right.
    pub dx: f64,
    /// Vertical content movement as a fraction of the plot height; positive moves down.
    pub dy: f64,
}

impl PlotCommand for PanByCommand {
    fn execute(&self, view: &dyn PlotView, _controller: &mut PlotController, _args: &InputEventArgs) {
        let Some(model) = view.actual_model() else {
            return;
        };
        let Ok(model) = model.try_borrow() else {
            return;
        };
        let plot_area = model.plot_area();
        let mut changed = false;
        for axis in model.axes() {
            let mut axis = axis.borrow_mut();
            let delta = if axis.is_vertical() {
                self.dy * plot_area.height
            } else {
                self.dx * plot_area.width
            };
            changed |= axis.pan_by(delta);
        }
        if changed {
            model.invalidate_plot(false);
        }
    }
}

/// Drops pan/zoom state of all axes, or of the axes under the pointer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResetCommand {
    pub at_pointer: bool,
}

impl PlotCommand for ResetCommand {
    fn execute(&self, view: &dyn PlotView, _controller: &mut PlotController, args: &InputEventArgs) {
        let Some(model) = view.actual_model() else {
            return;
        };
        let Ok(model) = model.try_borrow() else {
            return;
        };
        match args.position().filter(|_| self.at_pointer) {
            Some(position) => {
                let (x_axis, y_axis) = model.axes_at_point(position);
                for axis in [x_axis, y_axis].into_iter().flatten() {
                    axis.borrow_mut().reset();
                }
            }
            None => model.reset_all_axes(),
        }
        model.invalidate_plot(false);
    }
}

/// Shareable instances of the built-in commands.
pub mod commands {
    use std::rc::Rc;

    use super::{
        FINE_ZOOM_STEP, PAN_STEP_FRACTION, PanAtCommand, PanByCommand, PlotCommand,
        ResetCommand, TrackCommand, ZOOM_STEP, ZoomCenterCommand, ZoomRectangleCommand,
        ZoomWheelCommand,
    };
    use crate::interaction::TrackerOptions;

    #[must_use]
    pub fn pan_at() -> Rc<dyn PlotCommand> {
        Rc::new(PanAtCommand)
    }

    #[must_use]
    pub fn zoom_rectangle() -> Rc<dyn PlotCommand> {
        Rc::new(ZoomRectangleCommand)
    }

    #[must_use]
    pub fn zoom_wheel() -> Rc<dyn PlotCommand> {
        Rc::new(ZoomWheelCommand { step: ZOOM_STEP })
    }

    #[must_use]
    pub fn zoom_wheel_fine() -> Rc<dyn PlotCommand> {
        Rc::new(ZoomWheelCommand {
            step: FINE_ZOOM_STEP,
        })
    }

    #[must_use]
    pub fn zoom_in() -> Rc<dyn PlotCommand> {
        Rc::new(ZoomCenterCommand {
            steps: 1.0,
            step: ZOOM_STEP,
        })
    }

    #[must_use]
    pub fn zoom_out() -> Rc<dyn PlotCommand> {
        Rc::new(ZoomCenterCommand {
            steps: -1.0,
            step: ZOOM_STEP,
        })
    }

    #[must_use]
    pub fn pan_left() -> Rc<dyn PlotCommand> {
        Rc::new(PanByCommand {
            dx: -PAN_STEP_FRACTION,
            dy: 0.0,
        })
    }

    #[must_use]
    pub fn pan_right() -> Rc<dyn PlotCommand> {
        Rc::new(PanByCommand {
            dx: PAN_STEP_FRACTION,
            dy: 0.0,
        })
    }

    #[must_use]
    pub fn pan_up() -> Rc<dyn PlotCommand> {
        Rc::new(PanByCommand {
            dx: 0.0,
            dy: -PAN_STEP_FRACTION,
        })
    }

    #[must_use]
    pub fn pan_down() -> Rc<dyn PlotCommand> {
        Rc::new(PanByCommand {
            dx: 0.0,
            dy: PAN_STEP_FRACTION,
        })
    }

    #[must_use]
    pub fn reset() -> Rc<dyn PlotCommand> {
        Rc::new(ResetCommand { at_pointer: false })
    }

    #[must_use]
    pub fn reset_at() -> Rc<dyn PlotCommand> {
        Rc::new(ResetCommand { at_pointer: true })
    }

    /// Tracker while the button is held, snapping to the nearest series point.
    #[must_use]
    pub fn snap_track() -> Rc<dyn PlotCommand> {
        Rc::new(TrackCommand {
            options: TrackerOptions::default(),
            hover: false,
        })
    }

    /// Tracker while the button is held, showing the pointer position.
    #[must_use]
    pub fn track() -> Rc<dyn PlotCommand> {
        Rc::new(TrackCommand {
            options: TrackerOptions {
                snap: false,
                ..TrackerOptions::default()
            },
            hover: false,
        })
    }

    #[must_use]
    pub fn points_only_track() -> Rc<dyn PlotCommand> {
        Rc::new(TrackCommand {
            options: TrackerOptions {
                points_only: true,
                ..TrackerOptions::default()
            },
            hover: false,
        })
    }

    /// Tracker following the pointer without a button, until it leaves the view.
    #[must_use]
    pub fn hover_snap_track() -> Rc<dyn PlotCommand> {
        Rc::new(TrackCommand {
            options: TrackerOptions {
                lock_to_initial_series: false,
                ..TrackerOptions::default()
            },
            hover: true,
        })
    }

    #[must_use]
    pub fn hover_points_only_track() -> Rc<dyn PlotCommand> {
        Rc::new(TrackCommand {
            options: TrackerOptions {
                points_only: true,
                lock_to_initial_series: false,
                ..TrackerOptions::default()
            },
            hover: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::zoom_factor;

    #[test]
    fn zoom_in_and_out_cancel() {
        let zoom_in = zoom_factor(3.0, 0.12);
        let zoom_out = zoom_factor(-3.0, 0.12);
        assert!(zoom_in > 1.0 && zoom_out < 1.0);
        assert!((zoom_in * zoom_out - 1.0).abs() <= 1e-12);
        assert!((zoom_factor(1.0, 0.12) * zoom_factor(-1.0, 0.12) - 1.0).abs() <= 1e-12);
        assert_eq!(zoom_factor(f64::NAN, 0.12), 1.0);
    }
}
