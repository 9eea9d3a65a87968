//! `HeadlessBackend`: An in-memory backend that records every call.
//!
//! Nothing is shown on screen. Uploaded textures keep their pixels, every
//! state-changing call is appended to an operation log, and individual
//! steps can be made to fail. Events are injected with
//! [`HeadlessBackend::push_event`].

use super::{Backend, KeyMod, NativeEvent};
use crate::error::BackendError;
use crate::layout::Rect;
use image::RgbaImage;
use std::collections::{HashMap, VecDeque};

/// Handle to a texture owned by a [`HeadlessBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(u32);

impl TextureId {
    /// Raw id.
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// A recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// `init_video`
    InitVideo,
    /// `create_window`
    CreateWindow {
        /// Physical width.
        width: u32,
        /// Physical height.
        height: u32,
    },
    /// `create_renderer`
    CreateRenderer {
        /// Accelerated renderer requested.
        accelerated: bool,
    },
    /// `set_icon`
    SetIcon,
    /// `set_fullscreen`
    SetFullscreen(bool),
    /// `set_scale`
    SetScale(f32, f32),
    /// `clear`
    Clear,
    /// `set_window_size`
    SetWindowSize(u32, u32),
    /// `set_title`
    SetTitle(String),
    /// `create_texture`
    CreateTexture(TextureId),
    /// `destroy_texture`
    DestroyTexture(TextureId),
    /// `copy`
    Copy(TextureId, Rect),
    /// `present`
    Present,
    /// `destroy_renderer`
    DestroyRenderer,
    /// `destroy_window`
    DestroyWindow,
    /// `quit`
    Quit,
}

/// Steps that can be made to fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Faults {
    /// `init_video` fails.
    pub video: bool,
    /// `create_window` fails.
    pub window: bool,
    /// `create_renderer` fails.
    pub renderer: bool,
    /// `set_scale` fails.
    pub scale: bool,
    /// `set_fullscreen` fails.
    pub fullscreen: bool,
    /// `create_texture` fails.
    pub upload: bool,
    /// `copy` fails.
    pub blit: bool,
    /// `destroy_*` calls fail (the resource is still released).
    pub destroy: bool,
}

/// State of the simulated window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessWindow {
    /// Title.
    pub title: String,
    /// Physical width.
    pub width: u32,
    /// Physical height.
    pub height: u32,
    /// User resizing allowed.
    pub resizable: bool,
    /// Fullscreen active.
    pub fullscreen: bool,
    /// Icon dimensions, if an icon was set.
    pub icon: Option<(u32, u32)>,
}

/// In-memory [`Backend`].
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    /// Failure injection switches.
    pub faults: Faults,
    video: bool,
    window: Option<HeadlessWindow>,
    renderer: bool,
    scale: (f32, f32),
    text_input: Option<Rect>,
    textures: HashMap<TextureId, RgbaImage>,
    next_texture: u32,
    events: VecDeque<NativeEvent>,
    mod_state: KeyMod,
    ops: Vec<Op>,
}

impl HeadlessBackend {
    /// Create a backend with no window and no faults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a native event for `poll_event`.
    pub fn push_event(&mut self, event: NativeEvent) {
        self.events.push_back(event);
    }

    /// Queue several native events.
    pub fn push_events(&mut self, events: impl IntoIterator<Item = NativeEvent>) {
        self.events.extend(events);
    }

    /// Number of events not yet polled.
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Set the modifier state reported by `mod_state`.
    pub fn set_mod_state(&mut self, keymod: KeyMod) {
        self.mod_state = keymod;
    }

    /// The simulated window, if one exists.
    pub const fn window(&self) -> Option<&HeadlessWindow> {
        self.window.as_ref()
    }

    /// Whether the video subsystem is running.
    pub const fn video_active(&self) -> bool {
        self.video
    }

    /// Whether a renderer exists.
    pub const fn has_renderer(&self) -> bool {
        self.renderer
    }

    /// Renderer scale as last set.
    pub const fn scale(&self) -> (f32, f32) {
        self.scale
    }

    /// Text input area while text input is enabled.
    pub const fn text_input(&self) -> Option<Rect> {
        self.text_input
    }

    /// Number of textures currently alive.
    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    /// Pixels of a live texture.
    pub fn texture_pixels(&self, id: TextureId) -> Option<&RgbaImage> {
        self.textures.get(&id)
    }

    /// Every recorded call, oldest first.
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Drain the operation log.
    pub fn take_ops(&mut self) -> Vec<Op> {
        std::mem::take(&mut self.ops)
    }

    /// Number of textures created since the log was last drained.
    pub fn textures_created(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, Op::CreateTexture(_)))
            .count()
    }

    /// Blits recorded since the log was last drained.
    pub fn blits(&self) -> Vec<(TextureId, Rect)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Copy(id, rect) => Some((*id, *rect)),
                _ => None,
            })
            .collect()
    }

    fn destroy_result(&self, what: &str) -> Result<(), BackendError> {
        if self.faults.destroy {
            Err(BackendError::new(format!("{what} destroy failed")))
        } else {
            Ok(())
        }
    }

    fn window_mut(&mut self) -> Result<&mut HeadlessWindow, BackendError> {
        self.window
            .as_mut()
            .ok_or_else(|| BackendError::new("no window"))
    }
}

impl Backend for HeadlessBackend {
    type Texture = TextureId;

    fn init_video(&mut self) -> Result<(), BackendError> {
        if self.faults.video {
            return Err(BackendError::new("video subsystem unavailable"));
        }
        self.video = true;
        self.ops.push(Op::InitVideo);
        Ok(())
    }

    fn create_window(&mut self, title: &str, width: u32, height: u32) -> Result<(), BackendError> {
        if self.faults.window || !self.video {
            return Err(BackendError::new("could not create window"));
        }
        self.window = Some(HeadlessWindow {
            title: title.to_owned(),
            width,
            height,
            resizable: true,
            fullscreen: false,
            icon: None,
        });
        self.ops.push(Op::CreateWindow { width, height });
        Ok(())
    }

    fn create_renderer(&mut self, accelerated: bool) -> Result<(), BackendError> {
        if self.faults.renderer || self.window.is_none() {
            return Err(BackendError::new("could not create renderer"));
        }
        self.renderer = true;
        self.scale = (1.0, 1.0);
        self.ops.push(Op::CreateRenderer { accelerated });
        Ok(())
    }

    fn set_resizable(&mut self, resizable: bool) {
        if let Some(window) = self.window.as_mut() {
            window.resizable = resizable;
        }
    }

    fn set_icon(&mut self, icon: &RgbaImage) -> Result<(), BackendError> {
        self.window_mut()?.icon = Some(icon.dimensions());
        self.ops.push(Op::SetIcon);
        Ok(())
    }

    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<(), BackendError> {
        if self.faults.fullscreen {
            return Err(BackendError::new("fullscreen mode change refused"));
        }
        self.window_mut()?.fullscreen = fullscreen;
        self.ops.push(Op::SetFullscreen(fullscreen));
        Ok(())
    }

    fn set_scale(&mut self, scale_x: f32, scale_y: f32) -> Result<(), BackendError> {
        if self.faults.scale || !self.renderer {
            return Err(BackendError::new("invalid renderer scale"));
        }
        self.scale = (scale_x, scale_y);
        self.ops.push(Op::SetScale(scale_x, scale_y));
        Ok(())
    }

    fn clear(&mut self) -> Result<(), BackendError> {
        if !self.renderer {
            return Err(BackendError::new("no renderer"));
        }
        self.ops.push(Op::Clear);
        Ok(())
    }

    fn start_text_input(&mut self, area: Rect) {
        self.text_input = Some(area);
    }

    fn stop_text_input(&mut self) {
        self.text_input = None;
    }

    fn window_size(&self) -> (u32, u32) {
        self.window.as_ref().map_or((0, 0), |w| (w.width, w.height))
    }

    fn set_window_size(&mut self, width: u32, height: u32) {
        if let Some(window) = self.window.as_mut() {
            window.width = width;
            window.height = height;
            self.ops.push(Op::SetWindowSize(width, height));
        }
    }

    fn set_title(&mut self, title: &str) {
        if let Some(window) = self.window.as_mut() {
            title.clone_into(&mut window.title);
            self.ops.push(Op::SetTitle(title.to_owned()));
        }
    }

    fn create_texture(&mut self, pixels: &RgbaImage) -> Result<TextureId, BackendError> {
        if self.faults.upload || !self.renderer {
            return Err(BackendError::new("texture upload failed"));
        }
        let id = TextureId(self.next_texture);
        self.next_texture += 1;
        self.textures.insert(id, pixels.clone());
        self.ops.push(Op::CreateTexture(id));
        Ok(id)
    }

    fn destroy_texture(&mut self, texture: TextureId) -> Result<(), BackendError> {
        if self.textures.remove(&texture).is_none() {
            return Err(BackendError::new(format!("unknown texture {}", texture.0)));
        }
        self.ops.push(Op::DestroyTexture(texture));
        self.destroy_result("texture")
    }

    fn copy(&mut self, texture: &TextureId, dst: Rect) -> Result<(), BackendError> {
        if self.faults.blit {
            return Err(BackendError::new("copy failed"));
        }
        if !self.textures.contains_key(texture) {
            return Err(BackendError::new(format!("unknown texture {}", texture.0)));
        }
        self.ops.push(Op::Copy(*texture, dst));
        Ok(())
    }

    fn present(&mut self) -> Result<(), BackendError> {
        if !self.renderer {
            return Err(BackendError::new("no renderer"));
        }
        self.ops.push(Op::Present);
        Ok(())
    }

    fn poll_event(&mut self) -> Option<NativeEvent> {
        self.events.pop_front()
    }

    fn mod_state(&self) -> KeyMod {
        self.mod_state
    }

    fn destroy_renderer(&mut self) -> Result<(), BackendError> {
        if !self.renderer {
            return Err(BackendError::new("no renderer"));
        }
        self.renderer = false;
        self.textures.clear();
        self.ops.push(Op::DestroyRenderer);
        self.destroy_result("renderer")
    }

    fn destroy_window(&mut self) -> Result<(), BackendError> {
        if self.window.take().is_none() {
            return Err(BackendError::new("no window"));
        }
        self.ops.push(Op::DestroyWindow);
        self.destroy_result("window")
    }

    fn quit(&mut self) {
        self.video = false;
        self.events.clear();
        self.ops.push(Op::Quit);
    }
}
