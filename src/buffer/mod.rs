//! Buffer module: What the driver is asked to draw.
//!
//! This module contains:
//! - [`Cell`]: The appearance of one grid position, used as a cache key
//! - [`Frame`]: A snapshot of positioned cells for one flush
//! - [`Rgb`]: True-color representation
//! - [`Attrs`]: Style attribute bitflags

mod cell;
mod frame;

pub use cell::{Attrs, Cell, Rgb};
pub use frame::{Frame, FrameCell};
