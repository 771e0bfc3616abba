use crate::interaction::{
    InputEventArgs, Key, KeyEventArgs, ModifierKeys, MouseButton, MouseButtonEventArgs,
    MouseEventArgs, MouseWheelEventArgs,
};

/// Event kind plus the button or key that raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputTrigger {
    MouseDown {
        button: MouseButton,
        click_count: u32,
    },
    MouseUp(MouseButton),
    MouseMove,
    MouseEnter,
    MouseLeave,
    MouseWheel,
    KeyDown(Key),
}

/// Modifier requirement of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierMatch {
    Exact(ModifierKeys),
    /// Matches whatever modifiers are held; loses to an `Exact` match.
    Any,
}

/// Dispatch key of a controller binding.
///
/// Gestures built from events always carry `ModifierMatch::Exact`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputGesture {
    pub trigger: InputTrigger,
    pub modifiers: ModifierMatch,
}

impl InputGesture {
    #[must_use]
    pub const fn new(trigger: InputTrigger, modifiers: ModifierMatch) -> Self {
        Self { trigger, modifiers }
    }

    #[must_use]
    pub const fn mouse_down(button: MouseButton) -> Self {
        Self::new(
            InputTrigger::MouseDown {
                button,
                click_count: 1,
            },
            ModifierMatch::Exact(ModifierKeys::NONE),
        )
    }

    #[must_use]
    pub const fn mouse_double_click(button: MouseButton) -> Self {
        Self::new(
            InputTrigger::MouseDown {
                button,
                click_count: 2,
            },
            ModifierMatch::Exact(ModifierKeys::NONE),
        )
    }

    #[must_use]
    pub const fn mouse_up(button: MouseButton) -> Self {
        Self::new(
            InputTrigger::MouseUp(button),
            ModifierMatch::Exact(ModifierKeys::NONE),
        )
    }

    #[must_use]
    pub const fn mouse_move() -> Self {
        Self::new(InputTrigger::MouseMove, ModifierMatch::Any)
    }

    #[must_use]
    pub const fn mouse_enter() -> Self {
        Self::new(InputTrigger::MouseEnter, ModifierMatch::Any)
    }

    #[must_use]
    pub const fn mouse_leave() -> Self {
        Self::new(InputTrigger::MouseLeave, ModifierMatch::Any)
    }

    #[must_use]
    pub const fn mouse_wheel() -> Self {
        Self::new(InputTrigger::MouseWheel, ModifierMatch::Any)
    }

    #[must_use]
    pub const fn key_down(key: Key) -> Self {
        Self::new(
            InputTrigger::KeyDown(key.normalized()),
            ModifierMatch::Exact(ModifierKeys::NONE),
        )
    }

    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: ModifierKeys) -> Self {
        self.modifiers = ModifierMatch::Exact(modifiers);
        self
    }

    #[must_use]
    pub const fn with_any_modifiers(mut self) -> Self {
        self.modifiers = ModifierMatch::Any;
        self
    }

    /// The same trigger with an `Any` modifier requirement.
    #[must_use]
    pub(crate) const fn wildcard(self) -> Self {
        self.with_any_modifiers()
    }

    #[must_use]
    pub fn from_mouse_down(args: &MouseButtonEventArgs) -> Self {
        Self::new(
            InputTrigger::MouseDown {
                button: args.button,
                click_count: args.click_count.max(1),
            },
            ModifierMatch::Exact(args.modifiers),
        )
    }

    #[must_use]
    pub fn from_event(args: &InputEventArgs) -> Self {
        let exact = ModifierMatch::Exact(args.modifiers());
        let trigger = match args {
            InputEventArgs::MouseDown(args) => return Self::from_mouse_down(args),
            InputEventArgs::MouseUp(args) => InputTrigger::MouseUp(args.button),
            InputEventArgs::MouseMove(_) => InputTrigger::MouseMove,
            InputEventArgs::MouseEnter(_) => InputTrigger::MouseEnter,
            InputEventArgs::MouseLeave(_) => InputTrigger::MouseLeave,
            InputEventArgs::MouseWheel(_) => InputTrigger::MouseWheel,
            InputEventArgs::KeyDown(args) => InputTrigger::KeyDown(args.key.normalized()),
        };
        Self::new(trigger, exact)
    }
}

impl From<&MouseButtonEventArgs> for InputGesture {
    fn from(args: &MouseButtonEventArgs) -> Self {
        Self::from_mouse_down(args)
    }
}

impl From<&MouseWheelEventArgs> for InputGesture {
    fn from(args: &MouseWheelEventArgs) -> Self {
        Self::from_event(&InputEventArgs::MouseWheel(*args))
    }
}

impl From<&KeyEventArgs> for InputGesture {
    fn from(args: &KeyEventArgs) -> Self {
        Self::from_event(&InputEventArgs::KeyDown(*args))
    }
}

impl From<&MouseEventArgs> for InputGesture {
    /// Treated as a move event.
    fn from(args: &MouseEventArgs) -> Self {
        Self::from_event(&InputEventArgs::MouseMove(*args))
    }
}
