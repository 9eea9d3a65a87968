//! Driver: Lifecycle, configuration and flushing.
//!
//! The driver owns the native backend and must stay on the thread that
//! created it. Frames are drawn with [`Driver::flush`]; input is read with
//! [`Driver::poll_msg`] or [`Driver::poll_msgs`]. Configuration can be
//! changed from any thread through a [`DriverHandle`].
//!
//! # Lifecycle
//!
//! ```text
//!   new ──init()──▶ initialized ──close()──▶ closed ──init()──▶ ...
//!                       ▲   │
//!                       └───┘ close() with keep-alive: session and window stay
//! ```
//!
//! # Flush order
//!
//! 1. Pending actions, oldest first (may change tile size or scale)
//! 2. Window resize if the frame's grid size changed
//! 3. One texture copy per frame cell
//! 4. Present

use super::actions::{Action, ActionQueue, DriverHandle};
use super::cache::TextureCache;
use super::translate::EventTranslator;
use crate::backend::Backend;
use crate::buffer::{Cell, Frame};
use crate::error::{DriverError, Result, TileError};
use crate::layout::{scale_is_active, Geometry, Point, Rect, Viewport};
use crate::tiles::TileManager;
use image::DynamicImage;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default grid width in cells.
pub const DEFAULT_WIDTH: i32 = 80;
/// Default grid height in cells.
pub const DEFAULT_HEIGHT: i32 = 24;
/// Default window title.
pub const DEFAULT_TITLE: &str = "tilewin";

/// Area reported to the backend when text input starts.
const TEXT_INPUT_AREA: Rect = Rect::new(0, 0, 100, 100);

/// Configuration for the driver.
#[derive(Clone)]
pub struct DriverConfig {
    /// Source of tile images (required by `init`).
    pub tile_manager: Option<Arc<dyn TileManager>>,
    /// Initial grid width in cells (non-positive means default).
    pub width: i32,
    /// Initial grid height in cells (non-positive means default).
    pub height: i32,
    /// Use real fullscreen with a video mode change.
    pub fullscreen: bool,
    /// Use an accelerated renderer (rarely necessary).
    pub accelerated: bool,
    /// Window title (empty means default).
    pub window_title: String,
    /// Window icon.
    pub window_icon: Option<DynamicImage>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tile_manager: None,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fullscreen: false,
            accelerated: false,
            window_title: DEFAULT_TITLE.to_owned(),
            window_icon: None,
        }
    }
}

impl std::fmt::Debug for DriverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverConfig")
            .field("tile_size", &self.tile_manager.as_ref().map(|tm| tm.tile_size()))
            .field("width", &self.width)
            .field("height", &self.height)
            .field("fullscreen", &self.fullscreen)
            .field("accelerated", &self.accelerated)
            .field("window_title", &self.window_title)
            .finish_non_exhaustive()
    }
}

impl DriverConfig {
    /// Default configuration with the given tile manager.
    pub fn with_tiles(tiles: Arc<dyn TileManager>) -> Self {
        Self {
            tile_manager: Some(tiles),
            ..Self::default()
        }
    }
}

/// Tile-based graphical driver over a native [`Backend`].
pub struct Driver<B: Backend> {
    pub(super) backend: B,
    tiles: Option<Arc<dyn TileManager>>,
    pub(super) geometry: Geometry,
    /// Scale last accepted by the renderer.
    applied_scale: (f32, f32),
    fullscreen: bool,
    accelerated: bool,
    title: String,
    icon: Option<DynamicImage>,
    cache: TextureCache<B::Texture>,
    pub(super) translator: EventTranslator,
    pub(super) init: bool,
    pub(super) redraw_requested: bool,
    keep_alive: Arc<AtomicBool>,
    actions: ActionQueue,
}

impl<B: Backend> Driver<B> {
    /// Create a driver. No native resources are created until `init`.
    pub fn new(backend: B, config: DriverConfig) -> Self {
        let width = if config.width > 0 { config.width } else { DEFAULT_WIDTH };
        let height = if config.height > 0 { config.height } else { DEFAULT_HEIGHT };
        let title = if config.window_title.is_empty() {
            DEFAULT_TITLE.to_owned()
        } else {
            config.window_title
        };

        let mut driver = Self {
            backend,
            tiles: None,
            geometry: Geometry::new(Viewport::default(), width, height),
            applied_scale: (0.0, 0.0),
            fullscreen: config.fullscreen,
            accelerated: config.accelerated,
            title,
            icon: config.window_icon,
            cache: TextureCache::new(),
            translator: EventTranslator::new(),
            init: false,
            redraw_requested: false,
            keep_alive: Arc::new(AtomicBool::new(false)),
            actions: ActionQueue::new(),
        };
        if let Some(tiles) = config.tile_manager {
            driver.apply_tile_manager(tiles);
        }
        driver
    }

    /// A handle for configuring this driver from other threads.
    pub fn handle(&self) -> DriverHandle {
        DriverHandle::new(self.actions.sender(), self.keep_alive.clone())
    }

    /// The native backend.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// The native backend, mutably.
    pub const fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Whether `init` succeeded and the session is running.
    pub const fn is_initialized(&self) -> bool {
        self.init
    }

    /// Grid width in cells.
    pub const fn width(&self) -> i32 {
        self.geometry.width
    }

    /// Grid height in cells.
    pub const fn height(&self) -> i32 {
        self.geometry.height
    }

    /// Tile size in pixels.
    pub const fn tile_size(&self) -> Point {
        Point::new(
            self.geometry.viewport.tile_width(),
            self.geometry.viewport.tile_height(),
        )
    }

    /// Render scale as currently configured.
    pub const fn scale(&self) -> (f32, f32) {
        self.geometry.viewport.raw_scale()
    }

    /// Current window title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Number of cached tile textures.
    pub fn cached_textures(&self) -> usize {
        self.cache.len()
    }

    /// Swap the tile manager.
    ///
    /// While the driver is running the change is queued and applied at the
    /// next flush, which clears the texture cache and resizes the window.
    /// Otherwise it applies at once, after any actions already queued.
    pub fn set_tile_manager(&mut self, tiles: Arc<dyn TileManager>) {
        if self.init {
            self.actions.push(Action::SetTileManager(tiles));
        } else {
            self.drain_actions();
            self.apply_tile_manager(tiles);
        }
    }

    /// Change the render scale and resize the window accordingly.
    ///
    /// Pointer mapping uses the new scale immediately; the renderer picks it
    /// up at the next flush.
    pub fn set_scale(&mut self, scale_x: f32, scale_y: f32) {
        if !self.init {
            self.drain_actions();
            self.geometry.viewport.set_scale(scale_x, scale_y);
            return;
        }
        self.geometry.viewport.set_scale(scale_x, scale_y);
        self.actions.push(Action::SetScale {
            x: scale_x,
            y: scale_y,
        });
    }

    /// Change the window title.
    pub fn set_window_title(&mut self, title: impl Into<String>) {
        if !self.init {
            self.drain_actions();
        }
        self.title = title.into();
        if self.init {
            self.actions.push(Action::SetTitle(self.title.clone()));
        }
    }

    /// Make the next `close` keep the native session and window alive, so
    /// that the driver can be initialized again for another application.
    /// It is then up to the caller to `init` again or `close` once more.
    pub fn keep_session_alive(&self) {
        self.keep_alive.store(true, Ordering::Relaxed);
    }

    /// Create the native window and renderer.
    ///
    /// Actions queued through a handle before `init` are applied first. If
    /// the native session was kept alive by the previous `close`, only the
    /// window size is refreshed.
    pub fn init(&mut self) -> Result<()> {
        self.drain_actions();
        if self.tiles.is_none() {
            return Err(DriverError::NoTileManager);
        }

        if self.init {
            self.resize_window();
        } else {
            self.create_session()?;
        }

        self.cache.clear(&mut self.backend);
        self.translator.reset_drag();
        self.init = true;
        info!(
            width = self.geometry.width,
            height = self.geometry.height,
            tile = ?self.tile_size(),
            "driver initialized"
        );
        Ok(())
    }

    fn create_session(&mut self) -> Result<()> {
        self.backend.init_video().map_err(DriverError::Subsystem)?;

        let vp = self.geometry.viewport;
        let (w, h) = Viewport::new(vp.tile_width(), vp.tile_height())
            .window_size(self.geometry.width, self.geometry.height);
        if let Err(e) = self.backend.create_window(&self.title, w, h) {
            self.backend.quit();
            return Err(DriverError::Window(e));
        }
        if let Err(e) = self.backend.create_renderer(self.accelerated) {
            if let Err(e) = self.backend.destroy_window() {
                warn!("window destroy: {e}");
            }
            self.backend.quit();
            return Err(DriverError::Renderer(e));
        }

        self.backend.set_resizable(false);
        self.set_icon();
        if self.fullscreen {
            if let Err(e) = self.backend.set_fullscreen(true) {
                warn!("set fullscreen: {e}");
            }
        }
        self.applied_scale = (0.0, 0.0);
        match vp.active_scale() {
            Some((sx, sy)) if self.apply_scale(sx, sy) => {}
            _ => self.geometry.viewport.clear_scale(),
        }
        if let Err(e) = self.backend.clear() {
            warn!("renderer clear: {e}");
        }
        self.backend.start_text_input(TEXT_INPUT_AREA);
        Ok(())
    }

    fn set_icon(&mut self) {
        let Some(icon) = &self.icon else {
            return;
        };
        if icon.width() == 0 || icon.height() == 0 {
            warn!("bad icon image: empty");
            return;
        }
        if let Err(e) = self.backend.set_icon(&icon.to_rgba8()) {
            warn!("bad icon image: {e}");
        }
    }

    /// Draw a frame and present it.
    pub fn flush(&mut self, frame: &Frame) {
        if !self.init {
            warn!("flush before init, ignoring frame");
            return;
        }
        self.drain_actions();

        if frame.width != self.geometry.width || frame.height != self.geometry.height {
            self.geometry.width = frame.width;
            self.geometry.height = frame.height;
            self.resize_window();
        }

        let Some(tiles) = self.tiles.as_deref() else {
            return;
        };
        for fc in &frame.cells {
            let dst = self.geometry.viewport.cell_rect(fc.p);
            if let Err(e) = draw_cell(&mut self.cache, tiles, &mut self.backend, &fc.cell, dst) {
                warn!(pos = ?fc.p, "{e}");
            }
        }

        if let Err(e) = self.backend.present() {
            warn!("present: {e}");
        }
    }

    /// Release the texture cache and, unless the session is kept alive,
    /// the renderer, window and native subsystem.
    ///
    /// Calling `close` on a closed driver does nothing.
    pub fn close(&mut self) {
        if !self.init {
            return;
        }
        self.cache.clear(&mut self.backend);
        if self.keep_alive.swap(false, Ordering::Relaxed) {
            info!("driver closed, native session kept alive");
            return;
        }
        self.backend.stop_text_input();
        if let Err(e) = self.backend.destroy_renderer() {
            warn!("renderer destroy: {e}");
        }
        if let Err(e) = self.backend.destroy_window() {
            warn!("window destroy: {e}");
        }
        self.backend.quit();
        self.init = false;
        info!("driver closed");
    }

    /// Destroy every cached tile texture.
    pub fn clear_cache(&mut self) {
        self.cache.clear(&mut self.backend);
    }

    fn drain_actions(&mut self) {
        while let Some(action) = self.actions.pop() {
            debug!(?action, "applying action");
            self.apply(action);
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::SetTileManager(tiles) => self.apply_tile_manager(tiles),
            Action::SetScale { x, y } => {
                if !self.init {
                    self.geometry.viewport.set_scale(x, y);
                } else if !self.apply_scale(x, y) {
                    let (sx, sy) = self.applied_scale;
                    self.geometry.viewport.set_scale(sx, sy);
                }
            }
            Action::SetTitle(title) => {
                if self.init {
                    self.backend.set_title(&title);
                }
                self.title = title;
            }
        }
    }

    fn apply_tile_manager(&mut self, tiles: Arc<dyn TileManager>) {
        let size = tiles.tile_size();
        self.tiles = Some(tiles);
        self.geometry.viewport.set_tile_size(size.x, size.y);
        if !self.init {
            return;
        }
        self.cache.clear(&mut self.backend);
        let scaled = match self.geometry.viewport.active_scale() {
            Some((sx, sy)) => self.apply_scale(sx, sy),
            None => false,
        };
        if !scaled {
            self.geometry.viewport.clear_scale();
            self.resize_window();
        }
        self.redraw_requested = true;
    }

    /// Set the renderer scale and resize the window. Returns whether the
    /// renderer accepted the scale.
    ///
    /// A scale that is not active resets the renderer to 1:1.
    fn apply_scale(&mut self, scale_x: f32, scale_y: f32) -> bool {
        let active = scale_is_active(scale_x, scale_y);
        let (rx, ry) = if active { (scale_x, scale_y) } else { (1.0, 1.0) };
        if let Err(e) = self.backend.set_scale(rx, ry) {
            warn!(scale_x, scale_y, "set scale: {e}");
            return false;
        }
        if active {
            self.applied_scale = (scale_x, scale_y);
            self.geometry.viewport.set_scale(scale_x, scale_y);
        } else {
            self.applied_scale = (0.0, 0.0);
            self.geometry.viewport.clear_scale();
        }
        self.resize_window();
        true
    }

    fn resize_window(&mut self) {
        let (w, h) = self.geometry.window_size();
        self.backend.set_window_size(w, h);
    }
}

impl<B: Backend> Drop for Driver<B> {
    fn drop(&mut self) {
        self.keep_alive.store(false, Ordering::Relaxed);
        self.close();
    }
}

/// Draw one cell: fetch or create its texture, then copy it to `dst`.
fn draw_cell<B: Backend>(
    cache: &mut TextureCache<B::Texture>,
    tiles: &dyn TileManager,
    backend: &mut B,
    cell: &Cell,
    dst: Rect,
) -> Result<(), TileError> {
    let texture = cache.get_or_create(cell, tiles, backend)?;
    backend.copy(texture, dst).map_err(TileError::Blit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::headless::Op;
    use crate::backend::HeadlessBackend;
    use crate::buffer::Rgb;
    use crate::tiles::SolidTiles;
    use image::RgbaImage;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    /// Solid tiles that count `get_image` calls.
    struct CountingTiles {
        inner: SolidTiles,
        size: Point,
        calls: AtomicUsize,
    }

    impl CountingTiles {
        fn new(width: u32, height: u32) -> Arc<Self> {
            Arc::new(Self {
                inner: SolidTiles::new(width, height),
                size: Point::new(width as i32, height as i32),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::Relaxed)
        }
    }

    impl TileManager for CountingTiles {
        fn get_image(&self, cell: &Cell) -> Option<DynamicImage> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            if cell.ch == '?' {
                return None;
            }
            self.inner.get_image(cell)
        }

        fn tile_size(&self) -> Point {
            self.size
        }
    }

    fn driver_with(tiles: Arc<dyn TileManager>) -> Driver<HeadlessBackend> {
        Driver::new(HeadlessBackend::new(), DriverConfig::with_tiles(tiles))
    }

    fn running(tiles: Arc<dyn TileManager>) -> Driver<HeadlessBackend> {
        let mut driver = driver_with(tiles);
        driver.init().unwrap();
        driver.backend_mut().take_ops();
        driver
    }

    #[test]
    fn test_init_requires_tile_manager() {
        let mut driver = Driver::new(HeadlessBackend::new(), DriverConfig::default());
        assert!(matches!(driver.init(), Err(DriverError::NoTileManager)));
        assert!(!driver.is_initialized());
        assert!(driver.backend().ops().is_empty());
    }

    #[test]
    fn test_init_creates_window_for_grid() {
        let mut driver = driver_with(Arc::new(SolidTiles::new(16, 16)));
        driver.init().unwrap();

        let window = driver.backend().window().unwrap();
        assert_eq!((window.width, window.height), (1280, 384));
        assert_eq!(window.title, DEFAULT_TITLE);
        assert!(!window.resizable);
        assert!(driver.backend().has_renderer());
        assert!(driver.backend().text_input().is_some());
        assert_eq!(
            &driver.backend().ops()[..3],
            &[
                Op::InitVideo,
                Op::CreateWindow {
                    width: 1280,
                    height: 384
                },
                Op::CreateRenderer { accelerated: false },
            ]
        );
    }

    #[test]
    fn test_config_defaults_applied() {
        let config = DriverConfig {
            tile_manager: Some(Arc::new(SolidTiles::new(0, 10))),
            width: 0,
            height: -3,
            window_title: String::new(),
            ..DriverConfig::default()
        };
        let driver = Driver::new(HeadlessBackend::new(), config);
        assert_eq!((driver.width(), driver.height()), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
        assert_eq!(driver.tile_size(), Point::new(1, 10));
        assert_eq!(driver.title(), DEFAULT_TITLE);
    }

    #[test]
    fn test_init_failures_propagate_without_leaks() {
        let mut driver = driver_with(Arc::new(SolidTiles::new(8, 8)));
        driver.backend_mut().faults.video = true;
        assert!(matches!(driver.init(), Err(DriverError::Subsystem(_))));
        assert!(driver.backend().ops().is_empty());

        driver.backend_mut().faults = Default::default();
        driver.backend_mut().faults.window = true;
        assert!(matches!(driver.init(), Err(DriverError::Window(_))));
        assert!(!driver.backend().video_active());

        driver.backend_mut().faults = Default::default();
        driver.backend_mut().faults.renderer = true;
        let err = driver.init().unwrap_err();
        assert!(matches!(err, DriverError::Renderer(_)));
        assert!(err.to_string().starts_with("failed to create renderer"));
        assert!(driver.backend().window().is_none());
        assert!(!driver.backend().video_active());
        assert!(!driver.is_initialized());
    }

    #[test]
    fn test_fullscreen_and_icon_failures_are_not_fatal() {
        let config = DriverConfig {
            fullscreen: true,
            window_icon: Some(DynamicImage::ImageRgba8(RgbaImage::new(0, 0))),
            ..DriverConfig::with_tiles(Arc::new(SolidTiles::new(8, 8)))
        };
        let mut driver = Driver::new(HeadlessBackend::new(), config);
        driver.backend_mut().faults.fullscreen = true;
        driver.init().unwrap();
        let window = driver.backend().window().unwrap();
        assert!(!window.fullscreen);
        assert_eq!(window.icon, None);
    }

    #[test]
    fn test_icon_and_fullscreen_applied() {
        let config = DriverConfig {
            fullscreen: true,
            accelerated: true,
            window_icon: Some(DynamicImage::ImageRgba8(RgbaImage::new(32, 32))),
            ..DriverConfig::with_tiles(Arc::new(SolidTiles::new(8, 8)))
        };
        let mut driver = Driver::new(HeadlessBackend::new(), config);
        driver.init().unwrap();
        let window = driver.backend().window().unwrap();
        assert!(window.fullscreen);
        assert_eq!(window.icon, Some((32, 32)));
        assert!(driver
            .backend()
            .ops()
            .contains(&Op::CreateRenderer { accelerated: true }));
    }

    #[test]
    fn test_flush_single_cell() {
        let tiles = CountingTiles::new(16, 16);
        let mut driver = running(tiles.clone());

        let frame = Frame::new(80, 24).with_cell(Point::new(0, 0), Cell::new('@'));
        driver.flush(&frame);

        let backend = driver.backend();
        assert_eq!(backend.textures_created(), 1);
        let blits = backend.blits();
        assert_eq!(blits.len(), 1);
        assert_eq!(blits[0].1, Rect::new(0, 0, 16, 16));
        assert_eq!(backend.ops().last(), Some(&Op::Present));
        assert_eq!(tiles.calls(), 1);

        let pixels = backend.texture_pixels(blits[0].0).unwrap();
        assert_eq!(pixels.dimensions(), (16, 16));
        assert_eq!(pixels.get_pixel(0, 0).0, Rgb::DEFAULT_BG.to_rgba());
        assert_eq!(pixels.get_pixel(8, 8).0, Rgb::DEFAULT_FG.to_rgba());
    }

    #[test]
    fn test_flush_reuses_textures() {
        let tiles = CountingTiles::new(8, 8);
        let mut driver = running(tiles.clone());
        let wall = Cell::new('#').with_fg(Rgb::from_u32(0x00_80_80));
        let frame = Frame::filled(10, 3, |_| wall);
        driver.flush(&frame);
        driver.flush(&frame);

        assert_eq!(tiles.calls(), 1);
        assert_eq!(driver.cached_textures(), 1);
        assert_eq!(driver.backend().blits().len(), 60);
        assert_eq!(driver.backend().blits()[29].1, Rect::new(72, 16, 8, 8));
    }

    #[test]
    fn test_flush_skips_bad_cells() {
        let tiles = CountingTiles::new(8, 8);
        let mut driver = running(tiles);
        let frame = Frame::new(80, 24)
            .with_cell(Point::new(0, 0), Cell::new('?'))
            .with_cell(Point::new(1, 0), Cell::new('a'));
        driver.flush(&frame);
        assert_eq!(driver.backend().blits().len(), 1);
        assert_eq!(driver.backend().ops().last(), Some(&Op::Present));

        driver.backend_mut().faults.blit = true;
        driver.flush(&frame);
        assert_eq!(driver.backend().ops().last(), Some(&Op::Present));
    }

    #[test]
    fn test_flush_before_init_is_ignored() {
        let mut driver = driver_with(Arc::new(SolidTiles::new(8, 8)));
        driver.flush(&Frame::new(80, 24).with_cell(Point::ZERO, Cell::EMPTY));
        assert!(driver.backend().ops().is_empty());
    }

    #[test]
    fn test_flush_resizes_on_grid_change() {
        let mut driver = running(Arc::new(SolidTiles::new(10, 20)));
        driver.flush(&Frame::new(40, 10).with_cell(Point::new(1, 1), Cell::new('x')));

        let ops = driver.backend().ops();
        assert_eq!(ops[0], Op::SetWindowSize(400, 200));
        assert!(matches!(ops[1], Op::CreateTexture(_)));
        assert_eq!((driver.width(), driver.height()), (40, 10));
    }

    #[test]
    fn test_foreign_thread_tile_manager_swap() {
        let mut driver = running(Arc::new(SolidTiles::new(16, 16)));
        let frame = Frame::new(80, 24).with_cell(Point::new(2, 1), Cell::new('a'));
        driver.flush(&frame);
        driver.backend_mut().take_ops();

        let handle = driver.handle();
        thread::spawn(move || {
            assert!(handle.set_tile_manager(Arc::new(SolidTiles::new(8, 12))));
        })
        .join()
        .unwrap();

        driver.flush(&frame);
        assert_eq!(driver.tile_size(), Point::new(8, 12));

        let ops = driver.backend().ops();
        let destroy = ops.iter().position(|op| matches!(op, Op::DestroyTexture(_)));
        let resize = ops.iter().position(|op| *op == Op::SetWindowSize(640, 288));
        let create = ops.iter().position(|op| matches!(op, Op::CreateTexture(_)));
        let copy = ops.iter().position(|op| matches!(op, Op::Copy(..)));
        assert!(destroy < resize, "{ops:?}");
        assert!(resize < create, "{ops:?}");
        assert!(create < copy, "{ops:?}");
        assert_eq!(driver.backend().blits()[0].1, Rect::new(16, 12, 8, 12));
        assert!(driver.redraw_requested);
    }

    #[test]
    fn test_set_tile_manager_queues_while_running() {
        let mut driver = running(Arc::new(SolidTiles::new(16, 16)));
        driver.set_tile_manager(Arc::new(SolidTiles::new(4, 4)));
        assert_eq!(driver.tile_size(), Point::new(16, 16));
        driver.flush(&Frame::new(80, 24));
        assert_eq!(driver.tile_size(), Point::new(4, 4));
        assert_eq!(driver.backend().window().map(|w| w.width), Some(320));
    }

    #[test]
    fn test_scale_applied_on_flush() {
        let mut driver = running(Arc::new(SolidTiles::new(16, 16)));
        driver.set_scale(2.0, 2.0);
        assert_eq!(driver.scale(), (2.0, 2.0));
        driver.flush(&Frame::new(80, 24));

        assert_eq!(driver.backend().scale(), (2.0, 2.0));
        let window = driver.backend().window().unwrap();
        assert_eq!((window.width, window.height), (2560, 768));
    }

    #[test]
    fn test_scale_failure_restores_previous() {
        let mut driver = running(Arc::new(SolidTiles::new(16, 16)));
        driver.backend_mut().faults.scale = true;
        driver.set_scale(3.0, 3.0);
        driver.flush(&Frame::new(80, 24));
        assert_eq!(driver.scale(), (0.0, 0.0));
        assert_eq!(driver.backend().window().map(|w| w.width), Some(1280));
    }

    #[test]
    fn test_inactive_scale_resets_renderer() {
        let mut driver = running(Arc::new(SolidTiles::new(16, 16)));
        driver.set_scale(2.0, 2.0);
        driver.flush(&Frame::new(80, 24));
        driver.set_scale(0.05, 0.05);
        driver.flush(&Frame::new(80, 24));

        assert_eq!(driver.backend().scale(), (1.0, 1.0));
        assert_eq!(driver.scale(), (0.0, 0.0));
        let window = driver.backend().window().unwrap();
        assert_eq!((window.width, window.height), (1280, 384));
    }

    #[test]
    fn test_direct_setters_apply_after_queued_actions() {
        let mut driver = Driver::new(HeadlessBackend::new(), DriverConfig::default());
        let handle = driver.handle();
        handle.set_window_title("first");
        handle.set_tile_manager(Arc::new(SolidTiles::new(4, 4)));
        handle.set_scale(3.0, 3.0);
        driver.set_window_title("second");
        driver.set_tile_manager(Arc::new(SolidTiles::new(10, 10)));
        driver.set_scale(2.0, 2.0);
        driver.init().unwrap();

        assert_eq!(driver.title(), "second");
        assert_eq!(driver.tile_size(), Point::new(10, 10));
        assert_eq!(driver.scale(), (2.0, 2.0));
        let window = driver.backend().window().unwrap();
        assert_eq!(window.title, "second");
        assert_eq!((window.width, window.height), (1600, 480));
    }

    #[test]
    fn test_direct_setter_after_full_close_keeps_order() {
        let mut driver = running(Arc::new(SolidTiles::new(8, 8)));
        driver.close();
        driver.handle().set_window_title("queued");
        driver.set_window_title("direct");
        driver.init().unwrap();
        assert_eq!(driver.backend().window().map(|w| w.title.as_str()), Some("direct"));
    }

    #[test]
    fn test_scale_set_before_init() {
        let mut driver = driver_with(Arc::new(SolidTiles::new(16, 16)));
        driver.set_scale(1.5, 1.5);
        driver.init().unwrap();
        let window = driver.backend().window().unwrap();
        assert_eq!((window.width, window.height), (1920, 576));
        assert_eq!(driver.backend().scale(), (1.5, 1.5));
    }

    #[test]
    fn test_handle_actions_before_init_apply_at_init() {
        let mut driver = Driver::new(HeadlessBackend::new(), DriverConfig::default());
        let handle = driver.handle();
        handle.set_tile_manager(Arc::new(SolidTiles::new(12, 12)));
        handle.set_window_title("queued");
        driver.init().unwrap();
        assert_eq!(driver.tile_size(), Point::new(12, 12));
        assert_eq!(driver.backend().window().map(|w| w.title.as_str()), Some("queued"));
    }

    #[test]
    fn test_set_window_title() {
        let mut driver = running(Arc::new(SolidTiles::new(8, 8)));
        driver.set_window_title("dungeon");
        assert_eq!(driver.title(), "dungeon");
        driver.flush(&Frame::new(80, 24));
        assert_eq!(driver.backend().window().map(|w| w.title.as_str()), Some("dungeon"));
    }

    #[test]
    fn test_close_with_keep_alive() {
        let mut driver = running(Arc::new(SolidTiles::new(8, 8)));
        driver.flush(&Frame::new(80, 24).with_cell(Point::ZERO, Cell::new('k')));
        driver.keep_session_alive();

        driver.close();
        assert!(driver.backend().window().is_some());
        assert!(driver.backend().has_renderer());
        assert_eq!(driver.backend().live_textures(), 0);
        assert!(driver.is_initialized());

        driver.close();
        assert!(driver.backend().window().is_none());
        assert!(!driver.backend().has_renderer());
        assert!(!driver.backend().video_active());
        assert!(!driver.is_initialized());

        let before = driver.backend().ops().len();
        driver.close();
        assert_eq!(driver.backend().ops().len(), before);
    }

    #[test]
    fn test_reinit_on_kept_session() {
        let mut driver = running(Arc::new(SolidTiles::new(8, 8)));
        driver.keep_session_alive();
        driver.close();
        driver.backend_mut().take_ops();

        driver.init().unwrap();
        assert_eq!(driver.backend().ops(), [Op::SetWindowSize(640, 192)]);
    }

    #[test]
    fn test_init_after_full_close() {
        let mut driver = running(Arc::new(SolidTiles::new(8, 8)));
        driver.close();
        driver.init().unwrap();
        assert!(driver.backend().window().is_some());
        assert!(driver.is_initialized());
    }

    #[test]
    fn test_clear_cache() {
        let tiles = CountingTiles::new(8, 8);
        let mut driver = running(tiles.clone());
        let frame = Frame::new(80, 24).with_cell(Point::ZERO, Cell::new('c'));
        driver.flush(&frame);
        driver.clear_cache();
        assert_eq!(driver.cached_textures(), 0);
        driver.flush(&frame);
        assert_eq!(tiles.calls(), 2);
    }

    #[test]
    fn test_drop_closes_session() {
        let driver = running(Arc::new(SolidTiles::new(8, 8)));
        driver.keep_session_alive();
        let handle = driver.handle();
        drop(driver);
        // The queue is gone with the driver.
        assert!(!handle.set_window_title("late"));
    }
}
