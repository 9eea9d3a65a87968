//! Backend module: The native windowing and 2D rendering capability.
//!
//! The driver never talks to a windowing library directly. Everything it
//! needs (a window, a renderer that can upload and blit textures, and an
//! event queue) goes through the [`Backend`] trait. Native windowing APIs
//! are usually thread-affine, so a backend is not required to be `Send`;
//! it lives on the thread that created the driver.
//!
//! [`HeadlessBackend`] is an in-memory implementation that records every
//! call, for tests, benchmarks and headless runs.

mod event;
pub mod headless;

pub use event::{KeyMod, KeyState, Keycode, NativeButton, NativeEvent, WindowEvent};
pub use headless::HeadlessBackend;

use crate::error::BackendError;
use crate::layout::Rect;
use image::RgbaImage;

/// Native window, renderer and event source.
///
/// Creation is split into steps so that a failing step leaves nothing
/// further allocated: `init_video`, then `create_window`, then
/// `create_renderer`. Teardown runs in reverse.
pub trait Backend {
    /// Handle to an uploaded texture.
    type Texture;

    /// Start the native video subsystem.
    fn init_video(&mut self) -> Result<(), BackendError>;

    /// Create the window with a size in physical pixels.
    fn create_window(&mut self, title: &str, width: u32, height: u32) -> Result<(), BackendError>;

    /// Create the renderer for the window.
    fn create_renderer(&mut self, accelerated: bool) -> Result<(), BackendError>;

    /// Allow or forbid user resizing of the window.
    fn set_resizable(&mut self, resizable: bool);

    /// Set the window icon.
    fn set_icon(&mut self, icon: &RgbaImage) -> Result<(), BackendError>;

    /// Switch to or from real fullscreen.
    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<(), BackendError>;

    /// Set the renderer scale applied to every copy.
    fn set_scale(&mut self, scale_x: f32, scale_y: f32) -> Result<(), BackendError>;

    /// Clear the render target.
    fn clear(&mut self) -> Result<(), BackendError>;

    /// Start delivering text input events.
    fn start_text_input(&mut self, area: Rect);

    /// Stop delivering text input events.
    fn stop_text_input(&mut self);

    /// Current window size in physical pixels.
    fn window_size(&self) -> (u32, u32);

    /// Resize the window, in physical pixels.
    fn set_window_size(&mut self, width: u32, height: u32);

    /// Change the window title.
    fn set_title(&mut self, title: &str);

    /// Upload pixels as a texture.
    fn create_texture(&mut self, pixels: &RgbaImage) -> Result<Self::Texture, BackendError>;

    /// Release a texture.
    fn destroy_texture(&mut self, texture: Self::Texture) -> Result<(), BackendError>;

    /// Copy a texture to `dst`, in logical pixels, on the render target.
    fn copy(&mut self, texture: &Self::Texture, dst: Rect) -> Result<(), BackendError>;

    /// Show the render target.
    fn present(&mut self) -> Result<(), BackendError>;

    /// Take the next pending event, if any, without blocking.
    fn poll_event(&mut self) -> Option<NativeEvent>;

    /// Current modifier key state.
    fn mod_state(&self) -> KeyMod;

    /// Destroy the renderer.
    fn destroy_renderer(&mut self) -> Result<(), BackendError>;

    /// Destroy the window.
    fn destroy_window(&mut self) -> Result<(), BackendError>;

    /// Shut the native subsystem down.
    fn quit(&mut self);
}
