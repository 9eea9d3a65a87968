//! Frame: An immutable snapshot of cells to draw in one flush.

use super::cell::Cell;
use crate::layout::Point;

/// A cell to draw at a grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCell {
    /// Appearance of the position.
    pub cell: Cell,
    /// Grid position.
    pub p: Point,
}

/// The cells to render for one flush, in drawing order.
///
/// `width` and `height` are the logical grid size the frame was produced
/// for. A frame usually carries only the cells that changed since the
/// previous one, so `cells` may be much shorter than `width * height`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    /// Grid width in cells.
    pub width: i32,
    /// Grid height in cells.
    pub height: i32,
    /// Cells to draw.
    pub cells: Vec<FrameCell>,
}

impl Frame {
    /// Create an empty frame for a grid of the given size.
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            cells: Vec::new(),
        }
    }

    /// Append a cell (builder pattern).
    #[must_use]
    pub fn with_cell(mut self, p: Point, cell: Cell) -> Self {
        self.push(p, cell);
        self
    }

    /// Append a cell.
    pub fn push(&mut self, p: Point, cell: Cell) {
        self.cells.push(FrameCell { cell, p });
    }

    /// Build a frame covering every position of the grid, filled row by row
    /// from `cell_at`.
    pub fn filled(width: i32, height: i32, mut cell_at: impl FnMut(Point) -> Cell) -> Self {
        let capacity = usize::try_from(width.max(0)).unwrap_or(0)
            * usize::try_from(height.max(0)).unwrap_or(0);
        let mut frame = Self {
            width,
            height,
            cells: Vec::with_capacity(capacity),
        };
        for y in 0..height {
            for x in 0..width {
                let p = Point::new(x, y);
                frame.push(p, cell_at(p));
            }
        }
        frame
    }

    /// Number of cells in the frame.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the frame draws nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
