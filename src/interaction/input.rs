use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::core::ScreenPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MouseButton {
    #[default]
    None,
    Left,
    Middle,
    Right,
    XButton1,
    XButton2,
}

/// Keys the built-in bindings care about; everything else arrives as `Char`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Add,
    Subtract,
    Escape,
    Enter,
    Space,
    /// Compared in upper case; gestures and key events normalize it.
    Char(char),
}

impl Key {
    #[must_use]
    pub const fn char(ch: char) -> Self {
        Self::Char(ch.to_ascii_uppercase())
    }

    /// Same key with an ASCII letter in upper case.
    #[must_use]
    pub const fn normalized(self) -> Self {
        match self {
            Self::Char(ch) => Self::char(ch),
            other => other,
        }
    }
}

bitflags! {
    /// Modifier keys held during an input event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModifierKeys: u8 {
        const NONE = 0;
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT = 1 << 2;
        const WINDOWS = 1 << 3;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEventArgs {
    pub position: ScreenPoint,
    pub modifiers: ModifierKeys,
}

impl MouseEventArgs {
    #[must_use]
    pub fn new(position: ScreenPoint) -> Self {
        Self {
            position,
            modifiers: ModifierKeys::NONE,
        }
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: ModifierKeys) -> Self {
        self.modifiers = modifiers;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseButtonEventArgs {
    pub position: ScreenPoint,
    pub button: MouseButton,
    /// 1 for a single click, 2 for a double click.
    pub click_count: u32,
    pub modifiers: ModifierKeys,
}

impl MouseButtonEventArgs {
    #[must_use]
    pub fn new(position: ScreenPoint, button: MouseButton) -> Self {
        Self {
            position,
            button,
            click_count: 1,
            modifiers: ModifierKeys::NONE,
        }
    }

    #[must_use]
    pub fn with_click_count(mut self, click_count: u32) -> Self {
        self.click_count = click_count;
        self
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: ModifierKeys) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Position and modifiers only, as manipulators see them.
    #[must_use]
    pub fn as_mouse_event(&self) -> MouseEventArgs {
        MouseEventArgs {
            position: self.position,
            modifiers: self.modifiers,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseWheelEventArgs {
    pub position: ScreenPoint,
    /// Wheel notches; positive values scroll away from the user.
    pub delta: f64,
    pub modifiers: ModifierKeys,
}

impl MouseWheelEventArgs {
    #[must_use]
    pub fn new(position: ScreenPoint, delta: f64) -> Self {
        Self {
            position,
            delta,
            modifiers: ModifierKeys::NONE,
        }
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: ModifierKeys) -> Self {
        self.modifiers = modifiers;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyEventArgs {
    pub key: Key,
    pub modifiers: ModifierKeys,
}

impl KeyEventArgs {
    #[must_use]
    pub fn new(key: Key) -> Self {
        Self {
            key: key.normalized(),
            modifiers: ModifierKeys::NONE,
        }
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: ModifierKeys) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Any input event, as handed to commands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEventArgs {
    MouseDown(MouseButtonEventArgs),
    MouseUp(MouseButtonEventArgs),
    MouseMove(MouseEventArgs),
    MouseEnter(MouseEventArgs),
    MouseLeave(MouseEventArgs),
    MouseWheel(MouseWheelEventArgs),
    KeyDown(KeyEventArgs),
}

impl InputEventArgs {
    /// Pointer position; `None` for keyboard events.
    #[must_use]
    pub fn position(&self) -> Option<ScreenPoint> {
        match self {
            Self::MouseDown(args) | Self::MouseUp(args) => Some(args.position),
            Self::MouseMove(args) | Self::MouseEnter(args) | Self::MouseLeave(args) => {
                Some(args.position)
            }
            Self::MouseWheel(args) => Some(args.position),
            Self::KeyDown(_) => None,
        }
    }

    #[must_use]
    pub fn modifiers(&self) -> ModifierKeys {
        match self {
            Self::MouseDown(args) | Self::MouseUp(args) => args.modifiers,
            Self::MouseMove(args) | Self::MouseEnter(args) | Self::MouseLeave(args) => {
                args.modifiers
            }
            Self::MouseWheel(args) => args.modifiers,
            Self::KeyDown(args) => args.modifiers,
        }
    }

    /// Pointer part of the event, for starting manipulators.
    #[must_use]
    pub fn mouse_event(&self) -> Option<MouseEventArgs> {
        match self {
            Self::MouseDown(args) | Self::MouseUp(args) => Some(args.as_mouse_event()),
            Self::MouseMove(args) | Self::MouseEnter(args) | Self::MouseLeave(args) => {
                Some(*args)
            }
            Self::MouseWheel(args) => Some(MouseEventArgs {
                position: args.position,
                modifiers: args.modifiers,
            }),
            Self::KeyDown(_) => None,
        }
    }
}
