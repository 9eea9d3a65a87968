//! # Tilewin
//!
//! A tile-based graphical driver for cell-grid applications.
//!
//! Tilewin draws grids of styled cells into a native window, one texture
//! per distinct cell appearance, and turns native input into a small set of
//! grid-level messages.
//!
//! ## Core Concepts
//!
//! - **Tile cache**: Tile images are uploaded once per distinct cell and reused
//! - **Pixel mapping**: Pointer positions map to cells through tile size and scale
//! - **Owning thread**: Native calls stay on one thread; other threads queue actions
//! - **Pluggable backend**: Any SDL-like windowing library behind [`Backend`]
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tilewin::{Cell, Driver, DriverConfig, Frame, HeadlessBackend, Point, SolidTiles};
//!
//! let tiles = Arc::new(SolidTiles::new(16, 16));
//! let mut driver = Driver::new(HeadlessBackend::new(), DriverConfig::with_tiles(tiles));
//! driver.init()?;
//!
//! driver.flush(&Frame::new(80, 24).with_cell(Point::new(0, 0), Cell::new('@')));
//! assert_eq!(driver.cached_textures(), 1);
//!
//! driver.close();
//! # Ok::<(), tilewin::DriverError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod backend;
pub mod buffer;
pub mod driver;
pub mod error;
pub mod layout;
pub mod tiles;

// Re-exports for convenience
pub use backend::{Backend, HeadlessBackend, KeyMod, Keycode, NativeButton, NativeEvent, WindowEvent};
pub use buffer::{Attrs, Cell, Frame, FrameCell, Rgb};
pub use driver::{
    cancellation, CancelToken, Canceller, Driver, DriverConfig, DriverHandle, Key, ModMask, MouseAction, Msg,
};
pub use error::{BackendError, DriverError, Result, TileError};
pub use layout::{Geometry, Point, Rect, Viewport};
pub use tiles::{SolidTiles, TileManager};
