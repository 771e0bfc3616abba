use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::api::PlotView;
use crate::interaction::{
    InputEventArgs, InputGesture, Key, KeyEventArgs, ModifierKeys, MouseButton,
    MouseButtonEventArgs, MouseEventArgs, MouseManipulator, MouseWheelEventArgs, PlotCommand,
    commands,
};

type Manipulators = SmallVec<[Box<dyn MouseManipulator>; 2]>;

/// Maps input gestures to commands and feeds active manipulators.
///
/// Bindings are kept in insertion order with replace-on-equal-gesture
/// semantics. A dispatched event first looks for a binding with exactly the
/// event's modifiers, then for one accepting any modifiers; with no match the
/// event is not handled.
pub struct PlotController {
    bindings: IndexMap<InputGesture, Rc<dyn PlotCommand>>,
    mouse_down_manipulators: Manipulators,
    hover_manipulators: Manipulators,
}

impl Default for PlotController {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PlotController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlotController")
            .field("gestures", &self.bindings.keys().collect::<Vec<_>>())
            .field("mouse_down_manipulators", &self.mouse_down_manipulators)
            .field("hover_manipulators", &self.hover_manipulators)
            .finish()
    }
}

impl PlotController {
    /// Controller with the default pan/zoom/track bindings.
    #[must_use]
    pub fn new() -> Self {
        let mut controller = Self::empty();
        controller.bind_mouse_down(MouseButton::Left, commands::snap_track());
        controller.bind_mouse_down(MouseButton::Right, commands::pan_at());
        controller.bind_mouse_down(MouseButton::Middle, commands::zoom_rectangle());
        controller.bind_mouse_down_with(
            MouseButton::Right,
            ModifierKeys::CONTROL,
            commands::zoom_rectangle(),
        );
        controller.bind(
            InputGesture::mouse_double_click(MouseButton::Middle),
            commands::reset_at(),
        );
        controller.bind_mouse_wheel(commands::zoom_wheel());
        controller.bind(
            InputGesture::mouse_wheel().with_modifiers(ModifierKeys::CONTROL),
            commands::zoom_wheel_fine(),
        );

        controller.bind_key_down(Key::char('a'), commands::reset());
        controller.bind_key_down(Key::Home, commands::reset());
        controller.bind_key_down(Key::Left, commands::pan_left());
        controller.bind_key_down(Key::Right, commands::pan_right());
        controller.bind_key_down(Key::Up, commands::pan_up());
        controller.bind_key_down(Key::Down, commands::pan_down());
        controller.bind_key_down(Key::Add, commands::zoom_in());
        controller.bind_key_down(Key::Subtract, commands::zoom_out());
        controller.bind_key_down(Key::PageUp, commands::zoom_in());
        controller.bind_key_down(Key::PageDown, commands::zoom_out());
        controller
    }

    /// Controller without any binding.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            bindings: IndexMap::new(),
            mouse_down_manipulators: SmallVec::new(),
            hover_manipulators: SmallVec::new(),
        }
    }

    /// Binds `command` to `gesture`, replacing an equal gesture's command in place.
    pub fn bind(&mut self, gesture: InputGesture, command: Rc<dyn PlotCommand>) {
        if self.bindings.insert(gesture, command).is_some() {
            trace!(?gesture, "binding replaced");
        } else {
            trace!(?gesture, "binding added");
        }
    }

    pub fn bind_mouse_down(&mut self, button: MouseButton, command: Rc<dyn PlotCommand>) {
        self.bind(InputGesture::mouse_down(button), command);
    }

    pub fn bind_mouse_down_with(
        &mut self,
        button: MouseButton,
        modifiers: ModifierKeys,
        command: Rc<dyn PlotCommand>,
    ) {
        self.bind(InputGesture::mouse_down(button).with_modifiers(modifiers), command);
    }

    pub fn bind_mouse_enter(&mut self, command: Rc<dyn PlotCommand>) {
        self.bind(InputGesture::mouse_enter(), command);
    }

    pub fn bind_mouse_wheel(&mut self, command: Rc<dyn PlotCommand>) {
        self.bind(InputGesture::mouse_wheel(), command);
    }

    pub fn bind_key_down(&mut self, key: Key, command: Rc<dyn PlotCommand>) {
        self.bind(InputGesture::key_down(key), command);
    }

    /// Removes the binding of `gesture`; returns whether one existed.
    pub fn unbind(&mut self, gesture: &InputGesture) -> bool {
        let removed = self.bindings.shift_remove(gesture).is_some();
        if removed {
            trace!(?gesture, "binding removed");
        }
        removed
    }

    /// Removes every binding to `command` (by identity); returns how many were removed.
    pub fn unbind_command(&mut self, command: &Rc<dyn PlotCommand>) -> usize {
        let before = self.bindings.len();
        self.bindings
            .retain(|_, bound| !Rc::ptr_eq(bound, command));
        before - self.bindings.len()
    }

    pub fn unbind_all(&mut self) {
        self.bindings.clear();
        debug!("all bindings removed");
    }

    /// Command bound to exactly `gesture`.
    #[must_use]
    pub fn binding(&self, gesture: &InputGesture) -> Option<Rc<dyn PlotCommand>> {
        self.bindings.get(gesture).cloned()
    }

    /// Bound gestures in binding order.
    pub fn gestures(&self) -> impl Iterator<Item = &InputGesture> + '_ {
        self.bindings.keys()
    }

    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Command an event with `gesture` would run: exact modifiers first, then any.
    #[must_use]
    pub fn resolve(&self, gesture: &InputGesture) -> Option<Rc<dyn PlotCommand>> {
        self.bindings
            .get(gesture)
            .or_else(|| self.bindings.get(&gesture.wildcard()))
            .cloned()
    }

    #[must_use]
    pub fn has_active_manipulators(&self) -> bool {
        !self.mouse_down_manipulators.is_empty() || !self.hover_manipulators.is_empty()
    }

    /// Starts `manipulator` and feeds it moves until the next mouse-up.
    pub fn add_mouse_manipulator(
        &mut self,
        view: &dyn PlotView,
        mut manipulator: Box<dyn MouseManipulator>,
        args: &MouseEventArgs,
    ) {
        manipulator.started(view, args);
        self.mouse_down_manipulators.push(manipulator);
    }

    /// Starts `manipulator` and feeds it moves until the pointer leaves.
    ///
    /// A hover manipulator still running from an earlier enter is completed
    /// and replaced, so at most one is active.
    pub fn add_hover_manipulator(
        &mut self,
        view: &dyn PlotView,
        mut manipulator: Box<dyn MouseManipulator>,
        args: &MouseEventArgs,
    ) {
        for mut previous in std::mem::take(&mut self.hover_manipulators) {
            trace!("replacing active hover manipulator");
            previous.completed(view, args);
        }
        manipulator.started(view, args);
        self.hover_manipulators.push(manipulator);
    }

    #[must_use]
    pub fn hover_manipulator_count(&self) -> usize {
        self.hover_manipulators.len()
    }

    /// Dispatches any event to its typed handler.
    pub fn handle_event(&mut self, view: &dyn PlotView, args: &InputEventArgs) -> bool {
        match args {
            InputEventArgs::MouseDown(args) => self.handle_mouse_down(view, args),
            InputEventArgs::MouseUp(args) => self.handle_mouse_up(view, args),
            InputEventArgs::MouseMove(args) => self.handle_mouse_move(view, args),
            InputEventArgs::MouseEnter(args) => self.handle_mouse_enter(view, args),
            InputEventArgs::MouseLeave(args) => self.handle_mouse_leave(view, args),
            InputEventArgs::MouseWheel(args) => self.handle_mouse_wheel(view, args),
            InputEventArgs::KeyDown(args) => self.handle_key_down(view, args),
        }
    }

    pub fn handle_mouse_down(&mut self, view: &dyn PlotView, args: &MouseButtonEventArgs) -> bool {
        self.dispatch(view, &InputEventArgs::MouseDown(*args))
    }

    pub fn handle_mouse_move(&mut self, view: &dyn PlotView, args: &MouseEventArgs) -> bool {
        let mut handled = !self.mouse_down_manipulators.is_empty();
        for manipulator in &mut self.mouse_down_manipulators {
            manipulator.delta(view, args);
        }
        for manipulator in &mut self.hover_manipulators {
            manipulator.delta(view, args);
        }
        handled |= self.dispatch(view, &InputEventArgs::MouseMove(*args));
        handled
    }

    pub fn handle_mouse_up(&mut self, view: &dyn PlotView, args: &MouseButtonEventArgs) -> bool {
        let manipulators = std::mem::take(&mut self.mouse_down_manipulators);
        let mut handled = !manipulators.is_empty();
        let mouse = args.as_mouse_event();
        for mut manipulator in manipulators {
            manipulator.completed(view, &mouse);
        }
        handled |= self.dispatch(view, &InputEventArgs::MouseUp(*args));
        handled
    }

    pub fn handle_mouse_enter(&mut self, view: &dyn PlotView, args: &MouseEventArgs) -> bool {
        self.dispatch(view, &InputEventArgs::MouseEnter(*args))
    }

    pub fn handle_mouse_leave(&mut self, view: &dyn PlotView, args: &MouseEventArgs) -> bool {
        let manipulators = std::mem::take(&mut self.hover_manipulators);
        let mut handled = !manipulators.is_empty();
        for mut manipulator in manipulators {
            manipulator.completed(view, args);
        }
        handled |= self.dispatch(view, &InputEventArgs::MouseLeave(*args));
        handled
    }

    pub fn handle_mouse_wheel(&mut self, view: &dyn PlotView, args: &MouseWheelEventArgs) -> bool {
        self.dispatch(view, &InputEventArgs::MouseWheel(*args))
    }

    pub fn handle_key_down(&mut self, view: &dyn PlotView, args: &KeyEventArgs) -> bool {
        self.dispatch(view, &InputEventArgs::KeyDown(*args))
    }

    fn dispatch(&mut self, view: &dyn PlotView, args: &InputEventArgs) -> bool {
        let gesture = InputGesture::from_event(args);
        let Some(command) = self.resolve(&gesture) else {
            trace!(?gesture, "no binding for input");
            return false;
        };
        trace!(?gesture, "executing bound command");
        command.execute(view, self, args);
        true
    }
}
