//! Error types.
//!
//! Only initialization and message delivery failures are returned to
//! callers. Everything that can go wrong while drawing a single tile is a
//! [`TileError`], which the driver logs and skips.

use crate::buffer::Cell;
use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T, E = DriverError> = std::result::Result<T, E>;

/// An error reported by a native backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BackendError {
    message: String,
}

impl BackendError {
    /// Create an error from a backend message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The backend message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors surfaced by the driver.
#[derive(Debug, Error)]
pub enum DriverError {
    /// `init` was called without a tile manager.
    #[error("no tile manager provided")]
    NoTileManager,

    /// The native video subsystem could not be started.
    #[error("failed to initialize video subsystem: {0}")]
    Subsystem(#[source] BackendError),

    /// The native window could not be created.
    #[error("failed to create window: {0}")]
    Window(#[source] BackendError),

    /// The native renderer could not be created.
    #[error("failed to create renderer: {0}")]
    Renderer(#[source] BackendError),

    /// The consumer side of the message channel was dropped.
    #[error("message channel closed")]
    ChannelClosed,
}

/// Why a single tile could not be drawn.
#[derive(Debug, Error)]
pub enum TileError {
    /// The tile manager has no image for the cell.
    #[error("no tile for {0:?}")]
    MissingImage(Cell),

    /// The tile image has no pixels.
    #[error("tile image for {cell:?} is empty ({width}x{height})")]
    EmptyImage {
        /// Cell whose image was empty.
        cell: Cell,
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
    },

    /// Uploading the image as a texture failed.
    #[error("texture upload: {0}")]
    Upload(#[source] BackendError),

    /// Copying the texture to the render target failed.
    #[error("draw: copy: {0}")]
    Blit(#[source] BackendError),
}
