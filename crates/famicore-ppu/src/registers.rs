//! Two-write register latches.
//!
//! $2005 (scroll) and $2006 (VRAM address) each take two sequential
//! writes and share a single phase latch; reading $2002 resets it. The
//! phase is an explicit enum so the reset is visible at the type level
//! rather than hidden in a boolean.

/// Phase of the shared two-write sequence for $2005/$2006.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteLatch {
    /// Next write is the first of the pair.
    #[default]
    First,
    /// Next write completes the pair.
    Second,
}

impl WriteLatch {
    /// Consume one write: returns the phase this write occupies and
    /// toggles to the other.
    pub fn advance(&mut self) -> Self {
        let phase = *self;
        *self = match phase {
            Self::First => Self::Second,
            Self::Second => Self::First,
        };
        phase
    }

    /// Snap back to the first phase ($2002 read side effect).
    pub fn reset(&mut self) {
        *self = Self::First;
    }
}

/// Fine scroll registers written through $2005.
///
/// The scanline renderer in this core does not scroll, but games write
/// these continuously and the register file must latch them.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scroll {
    /// Fine X scroll (first write).
    pub x: u8,
    /// Fine Y scroll (second write).
    pub y: u8,
}
