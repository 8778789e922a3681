//! Scanline-level 2C02 PPU emulation for the famicore NES core.
//!
//! The PPU owns VRAM, OAM, and the framebuffer, and advances one scanline
//! per step rather than one dot: each visible line renders its 32
//! background tile columns in one pass, and sprites are composited for
//! the whole frame at VBlank entry. Pixel-exact dot timing is out of
//! scope; register semantics and frame pacing are not.
//!
//! # Frame structure
//!
//! - Scanlines 0-239: visible; background rendered per line
//! - Scanline 240: VBlank flag set, sprites composited, NMI when enabled
//! - Scanlines 241-260: idle
//! - Scanline 261: pre-render; VBlank flag and write latch cleared
//!
//! # Usage
//!
//! ```
//! use famicore_ppu::{Mirroring, Ppu, SCANLINES_PER_FRAME};
//!
//! let mut ppu = Ppu::new(Mirroring::Vertical);
//! ppu.write(0x2000, 0x80); // enable NMI at VBlank
//!
//! let mut nmi_seen = false;
//! for _ in 0..SCANLINES_PER_FRAME {
//!     if ppu.step_scanline() {
//!         nmi_seen = true;
//!     }
//! }
//! assert!(nmi_seen);
//! let _frame = ppu.framebuffer();
//! ```

mod background;
mod ctrl;
mod mask;
mod mirroring;
mod oam;
mod ppu;
mod registers;
mod sprites;
mod status;
mod vram;

pub use ctrl::Ctrl;
pub use mask::Mask;
pub use mirroring::Mirroring;
pub use oam::{OAM_SIZE, Oam, SPRITE_COUNT, Sprite, SpriteAttr};
pub use ppu::{
    FRAME_HEIGHT, FRAME_WIDTH, FrameBuffer, PRE_RENDER_SCANLINE, Ppu, SCANLINES_PER_FRAME,
    VBLANK_SCANLINE,
};
pub use registers::{Scroll, WriteLatch};
pub use status::PpuStatus;
pub use vram::{CHR_BANK_SIZE, IMAGE_PALETTE, SPRITE_PALETTE, VRAM_SIZE, Vram};
