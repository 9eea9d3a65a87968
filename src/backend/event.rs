//! Native events as delivered by a windowing backend.
//!
//! These mirror what SDL-like libraries report: raw keycodes with a
//! modifier state, text input payloads, pointer events in physical window
//! pixels, and window sub-events. The driver translates them into
//! [`Msg`](crate::driver::Msg) values.

use bitflags::bitflags;

/// Whether a key or button went down or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyState {
    /// Key or button pressed.
    Pressed,
    /// Key or button released.
    Released,
}

/// Native virtual keycode.
///
/// Only keys the driver can classify get their own variant. Letter and
/// symbol keys arrive as [`Keycode::Char`] and are otherwise handled
/// through text input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keycode {
    /// A key producing a character.
    Char(char),
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Backspace.
    Backspace,
    /// Delete.
    Delete,
    /// End.
    End,
    /// Escape.
    Escape,
    /// Return/Enter.
    Return,
    /// Home.
    Home,
    /// Insert.
    Insert,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Tab.
    Tab,
    /// Keypad 0.
    Kp0,
    /// Keypad 1.
    Kp1,
    /// Keypad 2.
    Kp2,
    /// Keypad 3.
    Kp3,
    /// Keypad 4.
    Kp4,
    /// Keypad 5.
    Kp5,
    /// Keypad 6.
    Kp6,
    /// Keypad 7.
    Kp7,
    /// Keypad 8.
    Kp8,
    /// Keypad 9.
    Kp9,
    /// Keypad period.
    KpPeriod,
    /// Keypad enter.
    KpEnter,
    /// Keypad backspace.
    KpBackspace,
    /// Function key (F1-F24).
    F(u8),
    /// Any other native keycode.
    Other(i32),
}

bitflags! {
    /// Native modifier key state.
    ///
    /// Bit values follow the SDL layout so real backends can convert with
    /// `KeyMod::from_bits_truncate`.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyMod: u16 {
        /// Left shift
        const LSHIFT = 0x0001;
        /// Right shift
        const RSHIFT = 0x0002;
        /// Left control
        const LCTRL = 0x0040;
        /// Right control
        const RCTRL = 0x0080;
        /// Left alt
        const LALT = 0x0100;
        /// Right alt (AltGr on many layouts)
        const RALT = 0x0200;
        /// Left GUI/super
        const LGUI = 0x0400;
        /// Right GUI/super
        const RGUI = 0x0800;
        /// Num lock active
        const NUM = 0x1000;
        /// Caps lock active
        const CAPS = 0x2000;
        /// AltGr mode
        const MODE = 0x4000;
    }
}

impl std::fmt::Debug for KeyMod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// Native mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeButton {
    /// Left button.
    Left,
    /// Middle button.
    Middle,
    /// Right button.
    Right,
    /// First extra button.
    X1,
    /// Second extra button.
    X2,
}

/// Window sub-event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowEvent {
    /// Window became visible.
    Shown,
    /// Window was hidden.
    Hidden,
    /// Window contents were damaged and must be redrawn.
    Exposed,
    /// Window moved.
    Moved,
    /// Window resized by the user.
    Resized,
    /// Window size changed.
    SizeChanged,
    /// Window minimized.
    Minimized,
    /// Window maximized.
    Maximized,
    /// Window restored.
    Restored,
    /// Pointer entered the window.
    Enter,
    /// Pointer left the window.
    Leave,
    /// Keyboard focus gained.
    FocusGained,
    /// Keyboard focus lost.
    FocusLost,
    /// Window manager asked to close the window.
    Close,
}

/// One event from the native event queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeEvent {
    /// The application was asked to quit.
    Quit,
    /// Key pressed or released.
    Key {
        /// Press or release.
        state: KeyState,
        /// Virtual keycode.
        keycode: Keycode,
        /// Modifier state at the time of the event.
        keymod: KeyMod,
    },
    /// Committed text input.
    TextInput {
        /// UTF-8 payload.
        text: String,
    },
    /// In-progress input method composition.
    TextEditing {
        /// Composition text.
        text: String,
    },
    /// Mouse button pressed or released.
    MouseButton {
        /// Press or release.
        state: KeyState,
        /// Button.
        button: NativeButton,
        /// Physical pixel x.
        x: i32,
        /// Physical pixel y.
        y: i32,
    },
    /// Pointer moved.
    MouseMotion {
        /// Physical pixel x.
        x: i32,
        /// Physical pixel y.
        y: i32,
    },
    /// Wheel scrolled.
    MouseWheel {
        /// Horizontal amount.
        x: i32,
        /// Vertical amount, positive away from the user.
        y: i32,
    },
    /// Window sub-event.
    Window(WindowEvent),
    /// Anything the backend reports that has no variant above.
    Unknown,
}

impl NativeEvent {
    /// A key press with the given modifiers.
    pub const fn key_down(keycode: Keycode, keymod: KeyMod) -> Self {
        Self::Key {
            state: KeyState::Pressed,
            keycode,
            keymod,
        }
    }

    /// A key release with the given modifiers.
    pub const fn key_up(keycode: Keycode, keymod: KeyMod) -> Self {
        Self::Key {
            state: KeyState::Released,
            keycode,
            keymod,
        }
    }

    /// Committed text input.
    pub fn text(text: impl Into<String>) -> Self {
        Self::TextInput { text: text.into() }
    }

    /// A mouse button press at physical pixel `(x, y)`.
    pub const fn button_down(button: NativeButton, x: i32, y: i32) -> Self {
        Self::MouseButton {
            state: KeyState::Pressed,
            button,
            x,
            y,
        }
    }

    /// A mouse button release at physical pixel `(x, y)`.
    pub const fn button_up(button: NativeButton, x: i32, y: i32) -> Self {
        Self::MouseButton {
            state: KeyState::Released,
            button,
            x,
            y,
        }
    }
}
