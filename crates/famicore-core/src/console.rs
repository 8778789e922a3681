//! Console orchestration.
//!
//! The console owns the CPU and the bus and interleaves them one scanline
//! at a time: forward any PPU NMI request, run the CPU for the scanline's
//! cycle budget, then advance the PPU one line. After 262 lines the frame
//! is complete and handed to the host's display sink.

use famicore_cpu::{Cpu, Interrupt};
use famicore_ppu::{FrameBuffer, SCANLINES_PER_FRAME};

use crate::bus::CpuBus;
use crate::rom::RomImage;

/// Whole CPU cycles per scanline. The true ratio is 113⅔ (341 PPU dots at
/// 3 dots per CPU cycle); the fractional part is paid by
/// [`Console::fractional_cycles`].
pub const CYCLES_PER_SCANLINE: i32 = 113;

/// CPU address where the first PRG bank lands.
pub const PRG_LOWER: u16 = 0x8000;

/// CPU address of the upper PRG bank (mirror of the first when the
/// cartridge has only one).
pub const PRG_UPPER: u16 = 0xC000;

/// Host display sink; receives each finished frame as NES colour indices
/// to map through an NTSC palette.
pub trait Display {
    /// Present one finished frame.
    fn present(&mut self, frame: &FrameBuffer);
}

/// Controller state sampled from the host at each frame boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    /// Packed button bits (bit 0 = A ... bit 7 = Right).
    pub buttons: u8,
    /// The host wants the emulation loop to return.
    pub quit: bool,
}

/// Host input source, polled between frames so button writes are ordered
/// against CPU reads of $4016.
pub trait InputSource {
    /// Current controller state.
    fn poll(&mut self) -> InputState;
}

/// The assembled machine: CPU, bus (RAM + PPU + controller), and frame
/// pacing state.
pub struct Console {
    cpu: Cpu,
    bus: CpuBus,
    /// Cycle overrun carried between scanline budgets (always <= 0).
    cycle_carry: i32,
    /// Rational accumulator paying out the ⅔ cycle per scanline: +2 each
    /// line, one extra cycle each time it reaches 3.
    frac_bank: u8,
    total_cycles: u64,
    frame_count: u64,
}

impl Console {
    /// Build a console around a loaded ROM: PRG into $8000/$C000 (single
    /// banks are mirrored), CHR into the pattern tables, then reset.
    #[must_use]
    pub fn new(rom: &RomImage) -> Self {
        let mut bus = CpuBus::new(rom.mirroring());

        bus.bulk_write(PRG_LOWER, rom.prg_bank(0));
        let upper = if rom.prg_count() == 1 {
            rom.prg_bank(0)
        } else {
            rom.prg_bank(1)
        };
        bus.bulk_write(PRG_UPPER, upper);

        if let Some(chr) = rom.chr_bank() {
            bus.ppu.load_chr(chr);
        }

        let mut console = Self {
            cpu: Cpu::new(),
            bus,
            cycle_carry: 0,
            frac_bank: 0,
            total_cycles: 0,
            frame_count: 0,
        };
        console.reset();
        console
    }

    /// Reset the CPU and PPU and restart frame pacing.
    pub fn reset(&mut self) {
        self.cpu.reset(&mut self.bus);
        self.bus.ppu.reset();
        self.cycle_carry = 0;
        self.frac_bank = 0;
    }

    /// Run one full frame: 262 scanlines of interleaved CPU and PPU work.
    pub fn run_frame(&mut self) {
        for _ in 0..SCANLINES_PER_FRAME {
            self.run_scanline();
        }
        self.frame_count += 1;
    }

    /// One scanline: deliver a pending NMI, run the CPU for the line's
    /// budget, advance the PPU.
    fn run_scanline(&mut self) {
        if self.bus.ppu.take_nmi() {
            self.cpu.set_interrupt(Interrupt::Nmi);
        }

        let budget = CYCLES_PER_SCANLINE + self.fractional_cycles() + self.cycle_carry;
        let overrun = self.cpu.emulate(&mut self.bus, budget);
        self.total_cycles += (budget - overrun) as u64;
        self.cycle_carry = overrun;

        self.bus.ppu.step_scanline();
    }

    /// Pay out the fractional ⅔ CPU cycle per scanline: two thirds
    /// accumulate each line and convert to one whole cycle at three.
    fn fractional_cycles(&mut self) -> i32 {
        self.frac_bank += 2;
        if self.frac_bank >= 3 {
            self.frac_bank -= 3;
            1
        } else {
            0
        }
    }

    /// Frame loop: poll input, emulate, present; returns when the input
    /// source reports quit.
    pub fn run(&mut self, display: &mut dyn Display, input: &mut dyn InputSource) {
        loop {
            let state = input.poll();
            if state.quit {
                return;
            }
            self.bus.controller.set_buttons(state.buttons);

            self.run_frame();
            display.present(self.bus.ppu.framebuffer());
        }
    }

    /// The current framebuffer (updated as each frame's scanlines render).
    #[must_use]
    pub fn framebuffer(&self) -> &FrameBuffer {
        self.bus.ppu.framebuffer()
    }

    /// Frames completed since power-on.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// CPU cycles consumed by frame budgets so far.
    #[must_use]
    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    /// The CPU, for inspection.
    #[must_use]
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// The bus (RAM, PPU, controller), for inspection.
    #[must_use]
    pub fn bus(&self) -> &CpuBus {
        &self.bus
    }

    /// Mutable bus access, for hosts that poke controllers directly.
    pub fn bus_mut(&mut self) -> &mut CpuBus {
        &mut self.bus
    }
}
