//! Cell: The visual-style key of one grid position.
//!
//! A cell describes how a grid position should look: a glyph, foreground and
//! background colors, and style attributes. Cells are small `Copy` values
//! with value equality and hashing, which is what lets the driver use them
//! directly as texture cache keys.

use bitflags::bitflags;

/// A 24-bit color, as passed to tile managers.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Rgb {
    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Pure white.
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Foreground of [`Cell::EMPTY`].
    pub const DEFAULT_FG: Self = Self::WHITE;
    /// Background of [`Cell::EMPTY`].
    pub const DEFAULT_BG: Self = Self::BLACK;

    /// Color from its three channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Color from a packed `0xRRGGBB` value. The top byte is ignored.
    pub const fn from_u32(packed: u32) -> Self {
        let [_, r, g, b] = packed.to_be_bytes();
        Self::new(r, g, b)
    }

    /// Opaque RGBA pixel of this color.
    pub const fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, u8::MAX]
    }
}

impl std::fmt::Debug for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<u32> for Rgb {
    fn from(packed: u32) -> Self {
        Self::from_u32(packed)
    }
}

bitflags! {
    /// Style attributes of a cell.
    ///
    /// Tile managers are free to interpret these however they like; the
    /// driver only uses them as part of the cache key.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Attrs: u16 {
        /// Heavy glyph.
        const BOLD = 1;
        /// Faint glyph.
        const DIM = 1 << 1;
        /// Slanted glyph.
        const ITALIC = 1 << 2;
        /// Glyph with an underline.
        const UNDERLINE = 1 << 3;
        /// Foreground and background swapped, see [`Cell::colors`].
        const REVERSED = 1 << 4;
        /// Cell belongs to a map layer rather than text
        const IN_MAP = 1 << 8;
    }
}

impl std::fmt::Debug for Attrs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// The appearance of a single grid position.
///
/// Two cells that compare equal render to the same tile, so every field
/// that influences the tile image belongs here.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Glyph drawn in the tile.
    pub ch: char,
    /// Foreground color.
    pub fg: Rgb,
    /// Background color.
    pub bg: Rgb,
    /// Style attributes.
    pub attrs: Attrs,
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Cell {
    /// A blank tile: a space, white on black, no attributes.
    pub const EMPTY: Self = Self {
        ch: ' ',
        fg: Rgb::DEFAULT_FG,
        bg: Rgb::DEFAULT_BG,
        attrs: Attrs::empty(),
    };

    /// A cell showing `ch` in the default colors.
    #[inline]
    pub const fn new(ch: char) -> Self {
        Self {
            ch,
            fg: Rgb::DEFAULT_FG,
            bg: Rgb::DEFAULT_BG,
            attrs: Attrs::empty(),
        }
    }

    /// Replace the foreground color.
    #[must_use]
    pub const fn with_fg(mut self, fg: Rgb) -> Self {
        self.fg = fg;
        self
    }

    /// Replace the background color.
    #[must_use]
    pub const fn with_bg(mut self, bg: Rgb) -> Self {
        self.bg = bg;
        self
    }

    /// Replace the attributes.
    #[must_use]
    pub const fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }

    /// Foreground and background after applying [`Attrs::REVERSED`].
    #[inline]
    pub const fn colors(&self) -> (Rgb, Rgb) {
        if self.attrs.contains(Attrs::REVERSED) {
            (self.bg, self.fg)
        } else {
            (self.fg, self.bg)
        }
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cell")
            .field("ch", &self.ch)
            .field("fg", &self.fg)
            .field("bg", &self.bg)
            .field("attrs", &self.attrs)
            .finish()
    }
}
