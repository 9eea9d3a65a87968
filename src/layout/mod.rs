//! Layout module: Grid geometry and pixel mapping.
//!
//! Grid positions are [`Point`]s in cell units, blit destinations are pixel
//! [`Rect`]s, and a [`Viewport`] converts between the two given the tile size
//! and render scale.

mod mapper;
mod point;
mod rect;

pub use mapper::{scale_is_active, Geometry, Viewport, SCALE_EPSILON};
pub use point::Point;
pub use rect::Rect;
