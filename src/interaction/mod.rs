mod command;
mod controller;
mod gesture;
mod input;
mod manipulators;

pub use command::{
    DelegatePlotCommand, FINE_ZOOM_STEP, PAN_STEP_FRACTION, PanAtCommand, PanByCommand,
    PlotCommand, ResetCommand, TrackCommand, ZOOM_STEP, ZoomCenterCommand,
    ZoomRectangleCommand, ZoomWheelCommand, commands, delegate_command, zoom_factor,
};
pub use controller::PlotController;
pub use gesture::{InputGesture, InputTrigger, ModifierMatch};
pub use input::{
    InputEventArgs, Key, KeyEventArgs, ModifierKeys, MouseButton, MouseButtonEventArgs,
    MouseEventArgs, MouseWheelEventArgs,
};
pub use manipulators::{
    MouseManipulator, PanManipulator, TRACKER_FIRING_DISTANCE_PX, TrackerManipulator,
    TrackerOptions, ZoomRectangleManipulator, tracker_hit,
};
