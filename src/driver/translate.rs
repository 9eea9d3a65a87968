//! Event translation: Native events in, application messages out.
//!
//! Each native event yields zero or one [`Msg`]. The translator keeps the
//! little state needed to do that: the last reported pointer cell and the
//! button currently being dragged, if any.
//!
//! ```text
//!   press(b) ──▶ [drag = b] ──release(b)──▶ [no drag]
//!                   │
//!                   └── press(other) / release(other): ignored
//! ```

use super::messages::{Key, ModMask, MouseAction, Msg};
use crate::backend::{Backend, KeyMod, KeyState, Keycode, NativeButton, NativeEvent, WindowEvent};
use crate::layout::{Geometry, Point};
use std::time::Instant;
use tracing::trace;

/// Stateful native event to message translator.
#[derive(Debug, Clone, Default)]
pub struct EventTranslator {
    /// Last cell reported in a mouse message.
    mouse_pos: Point,
    /// Button whose press started the current drag.
    drag: Option<MouseAction>,
}

impl EventTranslator {
    /// Create a translator with no drag in progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last cell reported in a mouse message.
    pub const fn mouse_pos(&self) -> Point {
        self.mouse_pos
    }

    /// The button being dragged, if any.
    pub const fn drag(&self) -> Option<MouseAction> {
        self.drag
    }

    /// Forget any drag in progress.
    pub const fn reset_drag(&mut self) {
        self.drag = None;
    }

    /// Translate one native event.
    ///
    /// `backend` is consulted for the live modifier state on mouse events
    /// and for the window size on expose events.
    pub fn translate<B: Backend + ?Sized>(
        &mut self,
        event: NativeEvent,
        geometry: &Geometry,
        backend: &B,
    ) -> Option<Msg> {
        match event {
            NativeEvent::Quit => Some(Msg::Quit(Instant::now())),
            NativeEvent::TextInput { text } => Self::text_input(&text),
            NativeEvent::Key {
                state,
                keycode,
                keymod,
            } => Self::key(state, keycode, keymod),
            NativeEvent::MouseButton {
                state,
                button,
                x,
                y,
            } => self.mouse_button(state, button, x, y, geometry, backend),
            NativeEvent::MouseMotion { x, y } => self.mouse_motion(x, y, geometry, backend),
            NativeEvent::MouseWheel { y, .. } => self.mouse_wheel(y),
            NativeEvent::Window(ev) => Self::window(ev, geometry, backend),
            // Composition is not supported: only committed text is reported.
            NativeEvent::TextEditing { .. } | NativeEvent::Unknown => None,
        }
    }

    fn text_input(text: &str) -> Option<Msg> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(Msg::KeyDown {
                key: Key::Char(c),
                modifiers: ModMask::empty(),
                time: Instant::now(),
            }),
            _ => {
                trace!(text, "dropping multi-character text input");
                None
            }
        }
    }

    fn key(state: KeyState, keycode: Keycode, keymod: KeyMod) -> Option<Msg> {
        if state == KeyState::Released {
            return None;
        }
        let mut key = special_key(keycode);
        if !keymod.contains(KeyMod::NUM) {
            key = keypad_key(keycode).or(key);
        }
        Some(Msg::KeyDown {
            key: key?,
            modifiers: mod_mask(keymod),
            time: Instant::now(),
        })
    }

    fn mouse_button<B: Backend + ?Sized>(
        &mut self,
        state: KeyState,
        button: NativeButton,
        x: i32,
        y: i32,
        geometry: &Geometry,
        backend: &B,
    ) -> Option<Msg> {
        let button = match button {
            NativeButton::Left => MouseAction::Main,
            NativeButton::Middle => MouseAction::Auxiliary,
            NativeButton::Right => MouseAction::Secondary,
            NativeButton::X1 | NativeButton::X2 => return None,
        };
        let mut pos = geometry.viewport.pixel_to_cell(x, y);
        let action = match state {
            KeyState::Pressed => {
                if self.drag.is_some() || !geometry.contains(pos) {
                    return None;
                }
                self.drag = Some(button);
                button
            }
            KeyState::Released => {
                if self.drag != Some(button) {
                    return None;
                }
                if !geometry.contains(pos) {
                    pos = Point::ZERO;
                }
                self.drag = None;
                MouseAction::Release
            }
        };
        self.mouse_pos = pos;
        Some(Msg::Mouse {
            action,
            pos,
            modifiers: mod_mask(backend.mod_state()),
            time: Instant::now(),
        })
    }

    fn mouse_motion<B: Backend + ?Sized>(
        &mut self,
        x: i32,
        y: i32,
        geometry: &Geometry,
        backend: &B,
    ) -> Option<Msg> {
        let pos = geometry.viewport.pixel_to_cell(x, y);
        if pos == self.mouse_pos || !geometry.contains(pos) {
            return None;
        }
        self.mouse_pos = pos;
        Some(Msg::Mouse {
            action: MouseAction::Move,
            pos,
            modifiers: mod_mask(backend.mod_state()),
            time: Instant::now(),
        })
    }

    fn mouse_wheel(&self, dy: i32) -> Option<Msg> {
        let action = match dy.signum() {
            1 => MouseAction::WheelUp,
            -1 => MouseAction::WheelDown,
            _ => return None,
        };
        Some(Msg::Mouse {
            action,
            pos: self.mouse_pos,
            modifiers: ModMask::empty(),
            time: Instant::now(),
        })
    }

    fn window<B: Backend + ?Sized>(ev: WindowEvent, geometry: &Geometry, backend: &B) -> Option<Msg> {
        match ev {
            WindowEvent::Exposed => Some(screen_msg(geometry, backend)),
            _ => None,
        }
    }
}

/// A screen message for the current window size in cells.
pub fn screen_msg<B: Backend + ?Sized>(geometry: &Geometry, backend: &B) -> Msg {
    let (w, h) = backend.window_size();
    let (width, height) = geometry.viewport.grid_size(w, h);
    Msg::Screen {
        width,
        height,
        time: Instant::now(),
    }
}

/// Convert native modifier state to the message modifier mask.
///
/// Only left alt counts as alt (right alt is AltGr on many layouts) and
/// only right GUI counts as meta.
pub fn mod_mask(keymod: KeyMod) -> ModMask {
    let mut mods = ModMask::empty();
    if keymod.contains(KeyMod::LALT) {
        mods |= ModMask::ALT;
    }
    if keymod.intersects(KeyMod::LSHIFT | KeyMod::RSHIFT) {
        mods |= ModMask::SHIFT;
    }
    if keymod.intersects(KeyMod::LCTRL | KeyMod::RCTRL) {
        mods |= ModMask::CTRL;
    }
    if keymod.contains(KeyMod::RGUI) {
        mods |= ModMask::META;
    }
    mods
}

const fn special_key(keycode: Keycode) -> Option<Key> {
    Some(match keycode {
        Keycode::Down => Key::ArrowDown,
        Keycode::Left => Key::ArrowLeft,
        Keycode::Right => Key::ArrowRight,
        Keycode::Up => Key::ArrowUp,
        Keycode::Backspace => Key::Backspace,
        Keycode::Delete => Key::Delete,
        Keycode::End => Key::End,
        Keycode::Escape => Key::Escape,
        Keycode::Return => Key::Enter,
        Keycode::Home => Key::Home,
        Keycode::Insert => Key::Insert,
        Keycode::PageUp => Key::PageUp,
        Keycode::PageDown => Key::PageDown,
        Keycode::Tab => Key::Tab,
        _ => return None,
    })
}

/// Keypad keys acting as navigation keys when num lock is off.
const fn keypad_key(keycode: Keycode) -> Option<Key> {
    Some(match keycode {
        Keycode::Kp2 => Key::ArrowDown,
        Keycode::Kp4 => Key::ArrowLeft,
        Keycode::Kp6 => Key::ArrowRight,
        Keycode::Kp8 => Key::ArrowUp,
        Keycode::KpBackspace => Key::Backspace,
        Keycode::KpPeriod => Key::Delete,
        Keycode::Kp1 => Key::End,
        Keycode::Kp5 | Keycode::KpEnter => Key::Enter,
        Keycode::Kp7 => Key::Home,
        Keycode::Kp0 => Key::Insert,
        Keycode::Kp9 => Key::PageUp,
        Keycode::Kp3 => Key::PageDown,
        _ => return None,
    })
}
