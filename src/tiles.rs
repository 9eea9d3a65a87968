//! Tile managers: Where tile images come from.
//!
//! The driver asks a [`TileManager`] for the image of a cell the first time
//! that cell is drawn and caches the uploaded texture afterwards.

use crate::buffer::Cell;
use crate::error::TileError;
use crate::layout::Point;
use image::{DynamicImage, RgbaImage};

/// Provides tile images for cells.
///
/// Tile managers can be swapped from any thread while the driver runs, so
/// they must be `Send + Sync`.
pub trait TileManager: Send + Sync {
    /// The image to use for a given cell, or `None` if there is no tile for
    /// it.
    fn get_image(&self, cell: &Cell) -> Option<DynamicImage>;

    /// The `(width, height)` of tiles in pixels. Both should be positive;
    /// the driver clamps them to at least one pixel.
    fn tile_size(&self) -> Point;
}

/// Convert a tile image into the pixel layout uploaded to the backend.
pub fn image_to_pixels(cell: &Cell, image: &DynamicImage) -> Result<RgbaImage, TileError> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(TileError::EmptyImage {
            cell: *cell,
            width,
            height,
        });
    }
    Ok(image.to_rgba8())
}

/// A tile manager that paints every cell as a solid block of its
/// background color, with the foreground color in a centered square when
/// the glyph is not a space.
///
/// Useful for demos and tests where no font or tileset is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolidTiles {
    width: u32,
    height: u32,
}

impl SolidTiles {
    /// Create a tile manager with the given tile size in pixels.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl TileManager for SolidTiles {
    fn get_image(&self, cell: &Cell) -> Option<DynamicImage> {
        let (fg, bg) = cell.colors();
        let (w, h) = (self.width, self.height);
        let img = RgbaImage::from_fn(w, h, |x, y| {
            let inner = x >= w / 4 && x < w - w / 4 && y >= h / 4 && y < h - h / 4;
            if inner && cell.ch != ' ' {
                image::Rgba(fg.to_rgba())
            } else {
                image::Rgba(bg.to_rgba())
            }
        });
        Some(DynamicImage::ImageRgba8(img))
    }

    fn tile_size(&self) -> Point {
        Point::new(
            i32::try_from(self.width).unwrap_or(i32::MAX),
            i32::try_from(self.height).unwrap_or(i32::MAX),
        )
    }
}
