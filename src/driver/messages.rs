//! Message types delivered to the application.
//!
//! Every native event the driver understands is reduced to one of the
//! [`Msg`] variants below. Messages are plain values sent once to the
//! consumer.

use crate::layout::Point;
use bitflags::bitflags;
use std::time::Instant;

/// Keys the driver reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A literal character from text input.
    Char(char),
    /// Down arrow.
    ArrowDown,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Up arrow.
    ArrowUp,
    /// Backspace.
    Backspace,
    /// Delete.
    Delete,
    /// End.
    End,
    /// Escape.
    Escape,
    /// Enter/Return.
    Enter,
    /// Home.
    Home,
    /// Insert.
    Insert,
    /// Page Down.
    PageDown,
    /// Page Up.
    PageUp,
    /// Tab.
    Tab,
}

bitflags! {
    /// Modifier keys held during an input message.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModMask: u8 {
        /// Shift key held.
        const SHIFT = 0b0001;
        /// Control key held.
        const CTRL = 0b0010;
        /// Alt/Option key held.
        const ALT = 0b0100;
        /// Meta/Super key held.
        const META = 0b1000;
    }
}

impl std::fmt::Debug for ModMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// What happened with the mouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseAction {
    /// Main (left) button pressed.
    Main,
    /// Auxiliary (middle) button pressed.
    Auxiliary,
    /// Secondary (right) button pressed.
    Secondary,
    /// The dragging button was released.
    Release,
    /// Pointer moved to another cell.
    Move,
    /// Wheel scrolled up.
    WheelUp,
    /// Wheel scrolled down.
    WheelDown,
}

/// An input message for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Msg {
    /// A key was pressed.
    KeyDown {
        /// The key.
        key: Key,
        /// Modifiers held during the keypress.
        modifiers: ModMask,
        /// When the message was produced.
        time: Instant,
    },

    /// Mouse button, motion or wheel input.
    Mouse {
        /// The action.
        action: MouseAction,
        /// Grid cell under the pointer.
        pos: Point,
        /// Modifiers held during the action.
        modifiers: ModMask,
        /// When the message was produced.
        time: Instant,
    },

    /// The screen must be redrawn at the given grid size.
    Screen {
        /// Width in cells.
        width: i32,
        /// Height in cells.
        height: i32,
        /// When the message was produced.
        time: Instant,
    },

    /// The application was asked to quit.
    Quit(Instant),
}

impl Msg {
    /// When the message was produced.
    pub const fn time(&self) -> Instant {
        match self {
            Self::KeyDown { time, .. }
            | Self::Mouse { time, .. }
            | Self::Screen { time, .. }
            | Self::Quit(time) => *time,
        }
    }
}
