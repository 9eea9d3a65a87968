//! Viewport: Mapping between window pixels and grid cells.
//!
//! Native backends report pointer positions in physical window pixels. The
//! renderer may apply a scale factor on top of the logical tile grid, so a
//! pointer position is first divided by the scale, then by the tile size.
//! The inverse direction is used to size the window for a given grid.
//!
//! ```text
//!   physical px ──(÷ scale)──▶ logical px ──(−1, ÷ tile)──▶ cell
//!   cell count  ──(× tile)───▶ logical px ──(× scale, round)──▶ window px
//! ```

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

use super::{Point, Rect};

/// Scale factors at or below this value are treated as "no scale".
pub const SCALE_EPSILON: f32 = 0.1;

/// Tile dimensions and render scale for one driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    tile_width: i32,
    tile_height: i32,
    scale_x: f32,
    scale_y: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl Viewport {
    /// Create a viewport for the given tile size, without scaling.
    ///
    /// Tile dimensions are clamped to at least one pixel.
    pub const fn new(tile_width: i32, tile_height: i32) -> Self {
        Self {
            tile_width: clamp_tile(tile_width),
            tile_height: clamp_tile(tile_height),
            scale_x: 0.0,
            scale_y: 0.0,
        }
    }

    /// Set the render scale (builder pattern).
    #[must_use]
    pub const fn with_scale(mut self, scale_x: f32, scale_y: f32) -> Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }

    /// Tile width in pixels (always >= 1).
    #[inline]
    pub const fn tile_width(&self) -> i32 {
        self.tile_width
    }

    /// Tile height in pixels (always >= 1).
    #[inline]
    pub const fn tile_height(&self) -> i32 {
        self.tile_height
    }

    /// Replace the tile size, clamping each dimension to at least one pixel.
    pub const fn set_tile_size(&mut self, width: i32, height: i32) {
        self.tile_width = clamp_tile(width);
        self.tile_height = clamp_tile(height);
    }

    /// The scale factors as last configured, active or not.
    #[inline]
    pub const fn raw_scale(&self) -> (f32, f32) {
        (self.scale_x, self.scale_y)
    }

    /// Store new scale factors.
    pub const fn set_scale(&mut self, scale_x: f32, scale_y: f32) {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
    }

    /// Forget any configured scale.
    pub const fn clear_scale(&mut self) {
        self.scale_x = 0.0;
        self.scale_y = 0.0;
    }

    /// The scale factors if both are finite and above [`SCALE_EPSILON`].
    pub fn active_scale(&self) -> Option<(f32, f32)> {
        scale_is_active(self.scale_x, self.scale_y).then_some((self.scale_x, self.scale_y))
    }

    /// Convert physical window pixels to logical (unscaled) pixels.
    pub fn to_logical(&self, px: i32, py: i32) -> (i32, i32) {
        match self.active_scale() {
            Some((sx, sy)) => ((px as f32 / sx) as i32, (py as f32 / sy) as i32),
            None => (px, py),
        }
    }

    /// Convert logical pixels to physical window pixels, rounding to the
    /// nearest pixel.
    pub fn to_physical(&self, lx: i32, ly: i32) -> (i32, i32) {
        match self.active_scale() {
            Some((sx, sy)) => (
                (lx as f32 * sx).round() as i32,
                (ly as f32 * sy).round() as i32,
            ),
            None => (lx, ly),
        }
    }

    /// Map a physical pointer position to the grid cell under it.
    ///
    /// The one pixel subtracted before dividing accounts for the sub-tile
    /// origin offset of native pointer coordinates. Integer division
    /// truncates toward zero.
    pub fn pixel_to_cell(&self, px: i32, py: i32) -> Point {
        let (x, y) = self.to_logical(px, py);
        Point::new(
            x.saturating_sub(1) / self.tile_width,
            y.saturating_sub(1) / self.tile_height,
        )
    }

    /// Window size in physical pixels needed to show a `width` x `height`
    /// grid.
    pub fn window_size(&self, width: i32, height: i32) -> (u32, u32) {
        let lw = f64::from(width.max(0)) * f64::from(self.tile_width);
        let lh = f64::from(height.max(0)) * f64::from(self.tile_height);
        match self.active_scale() {
            Some((sx, sy)) => (
                to_pixels((lw * f64::from(sx)).round()),
                to_pixels((lh * f64::from(sy)).round()),
            ),
            None => (to_pixels(lw), to_pixels(lh)),
        }
    }

    /// Number of whole cells that fit in a window of the given physical size.
    pub fn grid_size(&self, window_width: u32, window_height: u32) -> (i32, i32) {
        let (sx, sy) = self.active_scale().unwrap_or((1.0, 1.0));
        let lw = (f64::from(window_width) / f64::from(sx)).round() as i64;
        let lh = (f64::from(window_height) / f64::from(sy)).round() as i64;
        (
            (lw / i64::from(self.tile_width)) as i32,
            (lh / i64::from(self.tile_height)) as i32,
        )
    }

    /// Logical pixel rectangle covered by the tile at grid position `p`.
    pub const fn cell_rect(&self, p: Point) -> Rect {
        Rect::new(
            p.x.saturating_mul(self.tile_width),
            p.y.saturating_mul(self.tile_height),
            self.tile_width as u32,
            self.tile_height as u32,
        )
    }
}

/// Grid size together with its viewport: everything needed to place a
/// pointer position on the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    /// Tile size and scale.
    pub viewport: Viewport,
    /// Grid width in cells.
    pub width: i32,
    /// Grid height in cells.
    pub height: i32,
}

impl Geometry {
    /// Create a geometry for a `width` x `height` grid.
    pub const fn new(viewport: Viewport, width: i32, height: i32) -> Self {
        Self {
            viewport,
            width,
            height,
        }
    }

    /// Whether `p` lies on the grid.
    #[inline]
    pub const fn contains(&self, p: Point) -> bool {
        p.in_grid(self.width, self.height)
    }

    /// Physical window size needed for the whole grid.
    pub fn window_size(&self) -> (u32, u32) {
        self.viewport.window_size(self.width, self.height)
    }
}

/// Whether a pair of scale factors should be applied.
pub fn scale_is_active(scale_x: f32, scale_y: f32) -> bool {
    scale_x.is_finite() && scale_y.is_finite() && scale_x > SCALE_EPSILON && scale_y > SCALE_EPSILON
}

const fn clamp_tile(v: i32) -> i32 {
    if v <= 0 {
        1
    } else {
        v
    }
}

fn to_pixels(v: f64) -> u32 {
    v.clamp(0.0, f64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_size_clamped() {
        let vp = Viewport::new(0, -4);
        assert_eq!(vp.tile_width(), 1);
        assert_eq!(vp.tile_height(), 1);

        let mut vp = Viewport::new(16, 16);
        vp.set_tile_size(-1, 24);
        assert_eq!((vp.tile_width(), vp.tile_height()), (1, 24));
    }

    #[test]
    fn test_pixel_to_cell_unscaled() {
        let vp = Viewport::new(16, 24);
        for &(px, py) in &[(0, 0), (1, 1), (16, 24), (17, 25), (33, 49), (1279, 575)] {
            assert_eq!(
                vp.pixel_to_cell(px, py),
                Point::new((px - 1) / 16, (py - 1) / 24),
                "pixel ({px}, {py})"
            );
        }
    }

    #[test]
    fn test_pixel_to_cell_scaled() {
        let vp = Viewport::new(16, 16).with_scale(2.0, 2.0);
        // Physical 66 -> logical 33 -> cell 2
        assert_eq!(vp.pixel_to_cell(66, 66), Point::new(2, 2));
        assert_eq!(vp.pixel_to_cell(32, 32), Point::new(0, 0));
    }

    #[test]
    fn test_tiny_scale_is_ignored() {
        let vp = Viewport::new(8, 8).with_scale(0.05, 3.0);
        assert_eq!(vp.active_scale(), None);
        assert_eq!(vp.pixel_to_cell(17, 17), Point::new(2, 2));

        let vp = Viewport::new(8, 8).with_scale(f32::NAN, 2.0);
        assert_eq!(vp.active_scale(), None);
        let vp = Viewport::new(8, 8).with_scale(f32::INFINITY, 2.0);
        assert_eq!(vp.active_scale(), None);
    }

    #[test]
    fn test_scale_round_trip_within_one_pixel() {
        for &scale in &[1.5_f32, 2.0, 1.25, 3.3, 0.75] {
            let vp = Viewport::new(16, 16).with_scale(scale, scale);
            for lx in 0..400 {
                let (px, py) = vp.to_physical(lx, lx / 2);
                let (bx, by) = vp.to_logical(px, py);
                assert!((bx - lx).abs() <= 1, "scale {scale}: {lx} -> {px} -> {bx}");
                assert!((by - lx / 2).abs() <= 1);
            }
        }
    }

    #[test]
    fn test_window_size() {
        let vp = Viewport::new(16, 16);
        assert_eq!(vp.window_size(80, 24), (1280, 384));

        let vp = Viewport::new(16, 16).with_scale(1.5, 2.0);
        assert_eq!(vp.window_size(80, 24), (1920, 768));

        let vp = Viewport::new(10, 10).with_scale(1.25, 1.25);
        // 3 * 10 * 1.25 = 37.5 rounds to 38
        assert_eq!(vp.window_size(3, 3), (38, 38));
    }

    #[test]
    fn test_grid_size_inverts_window_size() {
        let vp = Viewport::new(16, 24).with_scale(1.5, 1.5);
        let (w, h) = vp.window_size(80, 24);
        assert_eq!(vp.grid_size(w, h), (80, 24));

        let vp = Viewport::new(16, 24);
        assert_eq!(vp.grid_size(1280, 576), (80, 24));
    }

    #[test]
    fn test_geometry_contains() {
        let geo = Geometry::new(Viewport::new(16, 16), 80, 24);
        assert!(geo.contains(Point::new(79, 23)));
        assert!(!geo.contains(Point::new(80, 23)));
        assert_eq!(geo.window_size(), (1280, 384));
    }

    #[test]
    fn test_cell_rect() {
        let vp = Viewport::new(16, 16);
        assert_eq!(vp.cell_rect(Point::new(0, 0)), Rect::new(0, 0, 16, 16));
        assert_eq!(vp.cell_rect(Point::new(3, 2)), Rect::new(48, 32, 16, 16));
    }
}
