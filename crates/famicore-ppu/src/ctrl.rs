//! PPU Control Register ($2000, write-only).
//!
//! ```text
//! 7  6  5  4  3  2  1  0
//! V  .  H  B  S  I  N  N
//! |     |  |  |  |  +--+-- Base nametable (0=$2000, 1=$2400, 2=$2800, 3=$2C00)
//! |     |  |  |  +-------- VRAM address increment (0: add 1; 1: add 32)
//! |     |  |  +----------- Sprite pattern table for 8x8 sprites (0: $0000; 1: $1000)
//! |     |  +-------------- Background pattern table (0: $0000; 1: $1000)
//! |     +----------------- Sprite size (0: 8x8; 1: 8x16)
//! +----------------------- Raise NMI at VBlank entry
//! ```

use bitflags::bitflags;

bitflags! {
    /// PPU Control Register ($2000) flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Ctrl: u8 {
        /// Base nametable select, low bit.
        const NT_LO = 1 << 0;
        /// Base nametable select, high bit.
        const NT_HI = 1 << 1;
        /// VRAM address increment: clear adds 1 (across), set adds 32 (down).
        const INCREMENT_32 = 1 << 2;
        /// Pattern table for 8x8 sprites.
        const SPRITE_TABLE = 1 << 3;
        /// Pattern table for the background.
        const BG_TABLE = 1 << 4;
        /// Sprite size: clear 8x8, set 8x16.
        const TALL_SPRITES = 1 << 5;
        /// Master/slave select (unused here).
        const MASTER_SLAVE = 1 << 6;
        /// Raise NMI when the VBlank flag is set.
        const NMI_AT_VBLANK = 1 << 7;
    }
}

impl Ctrl {
    /// VRAM base address of the selected nametable.
    #[must_use]
    #[inline]
    pub const fn nametable_base(self) -> u16 {
        0x2000 + (self.bits() as u16 & 0x03) * 0x0400
    }

    /// Step applied to the VRAM address after each $2007 access.
    #[must_use]
    #[inline]
    pub const fn vram_increment(self) -> u16 {
        if self.contains(Self::INCREMENT_32) { 32 } else { 1 }
    }

    /// Pattern table base for 8x8 sprites. 8x16 sprites pick their table
    /// from the tile index instead.
    #[must_use]
    #[inline]
    pub const fn sprite_pattern_base(self) -> u16 {
        if self.contains(Self::SPRITE_TABLE) { 0x1000 } else { 0x0000 }
    }

    /// Pattern table base for background tiles.
    #[must_use]
    #[inline]
    pub const fn bg_pattern_base(self) -> u16 {
        if self.contains(Self::BG_TABLE) { 0x1000 } else { 0x0000 }
    }

    /// Sprite height in pixels (8 or 16).
    #[must_use]
    #[inline]
    pub const fn sprite_height(self) -> u8 {
        if self.contains(Self::TALL_SPRITES) { 16 } else { 8 }
    }

    /// Whether VBlank entry raises an NMI.
    #[must_use]
    #[inline]
    pub const fn nmi_enabled(self) -> bool {
        self.contains(Self::NMI_AT_VBLANK)
    }
}
