//! famicore-core - NES emulation integration layer.
//!
//! Ties the CPU and PPU crates together with the pieces the console
//! itself provides: the iNES ROM loader, the mapper-0 bus, the controller
//! port, and the scanline-interleaved frame loop.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                   Console                     │
//! │  ┌─────────────────────────────────────────┐  │
//! │  │                 CpuBus                  │  │
//! │  │  ┌───────┐  ┌───────┐  ┌────────────┐   │  │
//! │  │  │  RAM  │  │  PPU  │  │ Controller │   │  │
//! │  │  │ 64 KB │  │       │  │            │   │  │
//! │  │  └───────┘  └───────┘  └────────────┘   │  │
//! │  └─────────────────────────────────────────┘  │
//! │                      ▲                        │
//! │                 ┌────┴────┐                   │
//! │                 │   CPU   │                   │
//! │                 │  6502   │                   │
//! │                 └─────────┘                   │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use famicore_core::{Console, Display, InputSource, InputState, RomImage};
//! use famicore_ppu::FrameBuffer;
//!
//! struct Host;
//!
//! impl Display for Host {
//!     fn present(&mut self, _frame: &FrameBuffer) {
//!         // blit through the NTSC palette
//!     }
//! }
//!
//! impl InputSource for Host {
//!     fn poll(&mut self) -> InputState {
//!         InputState::default()
//!     }
//! }
//!
//! let rom = RomImage::load("game.nes").expect("ROM load failed");
//! let mut console = Console::new(&rom);
//! let mut host = Host;
//! let mut input = Host;
//! console.run(&mut host, &mut input);
//! ```

mod bus;
mod console;
pub mod input;
mod rom;

pub use bus::CpuBus;
pub use console::{
    CYCLES_PER_SCANLINE, Console, Display, InputSource, InputState, PRG_LOWER, PRG_UPPER,
};
pub use input::{Button, Controller};
pub use rom::{CHR_BANK_SIZE, PRG_BANK_SIZE, RomError, RomImage};

// Re-export commonly used types from the component crates.
pub use famicore_cpu::{Cpu, CpuError, Interrupt};
pub use famicore_ppu::{FrameBuffer, Mirroring, Ppu};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn re_exported_constants_agree() {
        assert_eq!(PRG_BANK_SIZE, 16 * 1024);
        assert_eq!(CHR_BANK_SIZE, 8 * 1024);
        assert_eq!(CYCLES_PER_SCANLINE, 113);
        assert_eq!(famicore_ppu::SCANLINES_PER_FRAME, 262);
    }

    #[test]
    fn button_masks_match_packed_input() {
        let mut controller = Controller::new();
        controller.set_buttons(Button::A.mask() | Button::Right.mask());
        assert_eq!(controller.buttons(), 0x81);
    }
}
