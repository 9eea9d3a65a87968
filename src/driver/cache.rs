//! Texture cache: One uploaded texture per distinct cell appearance.
//!
//! Textures are created lazily the first time a cell is drawn and live
//! until the whole cache is cleared. There is no per-entry eviction: the
//! cache grows with the number of distinct cells drawn since the last
//! clear, and is cleared when the tile manager or tile size changes and
//! when the driver closes.

use crate::backend::Backend;
use crate::buffer::Cell;
use crate::error::TileError;
use crate::tiles::{image_to_pixels, TileManager};
use std::collections::HashMap;
use tracing::warn;

/// Cell-keyed texture cache.
#[derive(Debug)]
pub struct TextureCache<T> {
    textures: HashMap<Cell, T>,
}

impl<T> Default for TextureCache<T> {
    fn default() -> Self {
        Self {
            textures: HashMap::new(),
        }
    }
}

impl<T> TextureCache<T> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached textures.
    #[inline]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Whether the cache holds no textures.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Whether a texture for `cell` is cached.
    #[inline]
    pub fn contains(&self, cell: &Cell) -> bool {
        self.textures.contains_key(cell)
    }

    /// The cached texture for `cell`, creating it on a miss.
    ///
    /// On a miss the tile manager is asked for the cell's image, which is
    /// converted and uploaded through `backend`. Failures leave the cache
    /// unchanged.
    pub fn get_or_create<B>(
        &mut self,
        cell: &Cell,
        tiles: &dyn TileManager,
        backend: &mut B,
    ) -> Result<&T, TileError>
    where
        B: Backend<Texture = T> + ?Sized,
    {
        if !self.textures.contains_key(cell) {
            let image = tiles
                .get_image(cell)
                .ok_or(TileError::MissingImage(*cell))?;
            let pixels = image_to_pixels(cell, &image)?;
            let texture = backend.create_texture(&pixels).map_err(TileError::Upload)?;
            self.textures.insert(*cell, texture);
        }
        Ok(&self.textures[cell])
    }

    /// Destroy every cached texture.
    ///
    /// Destruction failures are logged; the entry is dropped either way.
    pub fn clear<B>(&mut self, backend: &mut B)
    where
        B: Backend<Texture = T> + ?Sized,
    {
        for (cell, texture) in self.textures.drain() {
            if let Err(e) = backend.destroy_texture(texture) {
                warn!(?cell, "texture destroy: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HeadlessBackend;
    use crate::buffer::Rgb;
    use crate::layout::Point;
    use image::{DynamicImage, RgbaImage};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Tile manager counting `get_image` calls. Cells with `'?'` have no tile.
    struct CountingTiles {
        calls: AtomicUsize,
    }

    impl CountingTiles {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
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
            if cell.ch == '0' {
                return Some(DynamicImage::ImageRgba8(RgbaImage::new(0, 0)));
            }
            Some(DynamicImage::ImageRgba8(RgbaImage::new(4, 4)))
        }

        fn tile_size(&self) -> Point {
            Point::new(4, 4)
        }
    }

    fn ready_backend() -> HeadlessBackend {
        let mut backend = HeadlessBackend::new();
        backend.init_video().unwrap();
        backend.create_window("cache", 16, 16).unwrap();
        backend.create_renderer(false).unwrap();
        backend
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let tiles = CountingTiles::new();
        let mut backend = ready_backend();
        let mut cache = TextureCache::new();
        let cell = Cell::new('@').with_fg(Rgb::new(200, 10, 10));

        let first = *cache.get_or_create(&cell, &tiles, &mut backend).unwrap();
        let second = *cache.get_or_create(&cell, &tiles, &mut backend).unwrap();

        assert_eq!(first, second);
        assert_eq!(tiles.calls(), 1);
        assert_eq!(backend.textures_created(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear_forces_refetch() {
        let tiles = CountingTiles::new();
        let mut backend = ready_backend();
        let mut cache = TextureCache::new();
        let cell = Cell::new('#');

        cache.get_or_create(&cell, &tiles, &mut backend).unwrap();
        cache.get_or_create(&Cell::new('.'), &tiles, &mut backend).unwrap();
        cache.clear(&mut backend);
        assert!(cache.is_empty());
        assert_eq!(backend.live_textures(), 0);

        cache.get_or_create(&cell, &tiles, &mut backend).unwrap();
        assert_eq!(tiles.calls(), 3);
        assert!(cache.contains(&cell));
    }

    #[test]
    fn test_failures_are_not_cached() {
        let tiles = CountingTiles::new();
        let mut backend = ready_backend();
        let mut cache = TextureCache::new();

        let missing = cache.get_or_create(&Cell::new('?'), &tiles, &mut backend);
        assert!(matches!(missing, Err(TileError::MissingImage(_))));

        let empty = cache.get_or_create(&Cell::new('0'), &tiles, &mut backend);
        assert!(matches!(empty, Err(TileError::EmptyImage { .. })));

        backend.faults.upload = true;
        let upload = cache.get_or_create(&Cell::new('u'), &tiles, &mut backend);
        assert!(matches!(upload, Err(TileError::Upload(_))));

        assert!(cache.is_empty());
        assert_eq!(backend.live_textures(), 0);
    }

    #[test]
    fn test_clear_tolerates_destroy_failures() {
        let tiles = CountingTiles::new();
        let mut backend = ready_backend();
        let mut cache = TextureCache::new();
        cache.get_or_create(&Cell::new('a'), &tiles, &mut backend).unwrap();
        backend.faults.destroy = true;
        cache.clear(&mut backend);
        assert!(cache.is_empty());
    }
}
