//! PPU Mask Register ($2001, write-only).
//!
//! Only the two rendering-enable bits drive this core's pipeline; the
//! greyscale, edge-clip, and emphasis bits are latched so games can write
//! whatever they like, but they do not affect output here.

use bitflags::bitflags;

bitflags! {
    /// PPU Mask Register ($2001) flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Mask: u8 {
        /// Greyscale display (latched, unused).
        const GREYSCALE = 1 << 0;
        /// Show background in the left 8 columns (latched, unused).
        const BG_LEFT_EDGE = 1 << 1;
        /// Show sprites in the left 8 columns (latched, unused).
        const SPRITE_LEFT_EDGE = 1 << 2;
        /// Background rendering enable.
        const SHOW_BG = 1 << 3;
        /// Sprite rendering enable.
        const SHOW_SPRITES = 1 << 4;
        /// Emphasize red (latched, unused).
        const EMPHASIZE_RED = 1 << 5;
        /// Emphasize green (latched, unused).
        const EMPHASIZE_GREEN = 1 << 6;
        /// Emphasize blue (latched, unused).
        const EMPHASIZE_BLUE = 1 << 7;
    }
}

impl Mask {
    /// Whether background tiles are rendered.
    #[must_use]
    #[inline]
    pub const fn show_background(self) -> bool {
        self.contains(Self::SHOW_BG)
    }

    /// Whether sprites are rendered.
    #[must_use]
    #[inline]
    pub const fn show_sprites(self) -> bool {
        self.contains(Self::SHOW_SPRITES)
    }
}
