//! PPU Status Register ($2002, read-only).
//!
//! Reading $2002 has side effects handled by [`crate::Ppu::read`]: it
//! clears the VBlank flag and resets the shared $2005/$2006 write latch.

use bitflags::bitflags;

bitflags! {
    /// PPU Status Register ($2002) flags.
    ///
    /// Sprite overflow and sprite-zero hit are not modelled by this core;
    /// their bits read back as zero.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PpuStatus: u8 {
        /// VBlank flag: set at scanline 240, cleared by reading $2002 and
        /// on the pre-render line.
        const VBLANK = 1 << 7;
    }
}

impl PpuStatus {
    /// Whether the PPU is inside the vertical blanking interval.
    #[must_use]
    #[inline]
    pub const fn in_vblank(self) -> bool {
        self.contains(Self::VBLANK)
    }
}
