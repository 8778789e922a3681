//! PPU register protocol and scanline state machine.
//!
//! The PPU owns its memory (VRAM, OAM) and framebuffer outright. The CPU
//! reaches the registers only through the bus, which hands this module
//! already-mirrored addresses in $2000-$2007.

use crate::background::{build_attribute_byte_table, build_attribute_square_table};
use crate::ctrl::Ctrl;
use crate::mask::Mask;
use crate::mirroring::Mirroring;
use crate::oam::{OAM_SIZE, Oam};
use crate::registers::{Scroll, WriteLatch};
use crate::status::PpuStatus;
use crate::vram::{IMAGE_PALETTE, Vram};

/// Framebuffer width in pixels.
pub const FRAME_WIDTH: usize = 256;

/// Framebuffer height in pixels.
pub const FRAME_HEIGHT: usize = 240;

/// Scanlines per frame, VBlank and pre-render included.
pub const SCANLINES_PER_FRAME: u16 = 262;

/// First scanline of the vertical blanking interval.
pub const VBLANK_SCANLINE: u16 = 240;

/// The pre-render scanline that closes each frame.
pub const PRE_RENDER_SCANLINE: u16 = 261;

/// One frame of NES colour indices (0..64), row-major.
pub type FrameBuffer = [[u8; FRAME_WIDTH]; FRAME_HEIGHT];

/// The 2C02 Picture Processing Unit, advanced one scanline at a time.
pub struct Ppu {
    pub(crate) ctrl: Ctrl,
    pub(crate) mask: Mask,
    status: PpuStatus,
    /// OAM access pointer ($2003), advanced by $2004 writes.
    oam_addr: u8,
    pub(crate) scroll: Scroll,
    /// Shared two-write phase for $2005/$2006.
    latch: WriteLatch,
    /// High address byte staged by the first $2006 write.
    addr_stage: u8,
    /// Current VRAM access address, set by the $2006 pair.
    vram_addr: u16,
    /// Delayed-read buffer for $2007.
    read_buffer: u8,
    pub(crate) vram: Vram,
    pub(crate) oam: Oam,
    scanline: u16,
    frame: u64,
    /// NMI request raised at VBlank entry, consumed by the console.
    nmi_line: bool,
    /// For nametable index i, the offset of its attribute byte within the
    /// 64-byte attribute region.
    pub(crate) attribute_byte_table: [u8; 960],
    /// For nametable index i, which 2-bit field of that byte applies.
    pub(crate) attribute_square_table: [u8; 960],
    pub(crate) framebuffer: Box<FrameBuffer>,
}

impl Ppu {
    /// Create a PPU with the given nametable mirroring.
    #[must_use]
    pub fn new(mirroring: Mirroring) -> Self {
        Self {
            ctrl: Ctrl::empty(),
            mask: Mask::empty(),
            status: PpuStatus::empty(),
            oam_addr: 0,
            scroll: Scroll::default(),
            latch: WriteLatch::default(),
            addr_stage: 0,
            vram_addr: 0,
            read_buffer: 0,
            vram: Vram::new(mirroring),
            oam: Oam::new(),
            scanline: 0,
            frame: 0,
            nmi_line: false,
            attribute_byte_table: build_attribute_byte_table(),
            attribute_square_table: build_attribute_square_table(),
            framebuffer: Box::new([[0; FRAME_WIDTH]; FRAME_HEIGHT]),
        }
    }

    /// Reset the register file and frame position. Memory contents
    /// (VRAM, OAM) survive, as they do through a console reset.
    pub fn reset(&mut self) {
        self.ctrl = Ctrl::empty();
        self.mask = Mask::empty();
        self.status = PpuStatus::empty();
        self.oam_addr = 0;
        self.scroll = Scroll::default();
        self.latch.reset();
        self.addr_stage = 0;
        self.vram_addr = 0;
        self.read_buffer = 0;
        self.scanline = 0;
        self.nmi_line = false;
    }

    /// Read a PPU register. `addr` must already be mirrored into
    /// $2000-$2007 and name a readable register.
    pub fn read(&mut self, addr: u16) -> u8 {
        match addr {
            0x2002 => {
                let bits = self.status.bits();
                self.status.remove(PpuStatus::VBLANK);
                self.latch.reset();
                bits
            }
            0x2004 => self.oam.read(self.oam_addr),
            0x2007 => self.read_data(),
            _ => unreachable!("read from non-readable PPU register 0x{addr:04X}"),
        }
    }

    /// Write a PPU register. `addr` must already be mirrored into
    /// $2000-$2007 and name a writable register.
    pub fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x2000 => self.ctrl = Ctrl::from_bits_truncate(value),
            0x2001 => self.mask = Mask::from_bits_truncate(value),
            0x2003 => self.oam_addr = value,
            0x2004 => {
                self.oam.write(self.oam_addr, value);
                self.oam_addr = self.oam_addr.wrapping_add(1);
            }
            0x2005 => match self.latch.advance() {
                WriteLatch::First => self.scroll.x = value,
                WriteLatch::Second => self.scroll.y = value,
            },
            0x2006 => match self.latch.advance() {
                WriteLatch::First => self.addr_stage = value,
                WriteLatch::Second => {
                    self.vram_addr = u16::from_le_bytes([value, self.addr_stage]);
                }
            },
            0x2007 => {
                self.vram.write(self.vram_addr, value);
                self.vram_addr = self.vram_addr.wrapping_add(self.ctrl.vram_increment());
            }
            _ => unreachable!("write to non-writable PPU register 0x{addr:04X}"),
        }
    }

    /// $2007 read: below the palette the value is served from the one-byte
    /// buffer (one access late); palette reads are immediate, with the
    /// buffer refilled from the nametable image underneath.
    fn read_data(&mut self) -> u8 {
        let addr = self.vram_addr;
        self.vram_addr = self.vram_addr.wrapping_add(self.ctrl.vram_increment());

        if (addr & 0x3FFF) >= IMAGE_PALETTE {
            self.read_buffer = self.vram.read(addr.wrapping_sub(0x1000));
            self.vram.read(addr)
        } else {
            let value = self.read_buffer;
            self.read_buffer = self.vram.read(addr);
            value
        }
    }

    /// OAM DMA ($4014): copy a full CPU page into OAM starting at the
    /// current OAM address, wrapping.
    pub fn oam_dma(&mut self, page: &[u8; OAM_SIZE]) {
        self.oam.fill_from(self.oam_addr, page);
    }

    /// Advance one scanline. Returns true when this line entered VBlank
    /// with NMI generation enabled.
    pub fn step_scanline(&mut self) -> bool {
        let mut nmi = false;
        match self.scanline {
            0..=239 => self.render_background_scanline(),
            VBLANK_SCANLINE => {
                self.status.insert(PpuStatus::VBLANK);
                self.render_sprite_frame();
                if self.ctrl.nmi_enabled() {
                    self.nmi_line = true;
                    nmi = true;
                }
            }
            241..=260 => {}
            PRE_RENDER_SCANLINE => {
                self.status.remove(PpuStatus::VBLANK);
                self.latch.reset();
            }
            _ => unreachable!("scanline out of range"),
        }

        self.scanline += 1;
        if self.scanline == SCANLINES_PER_FRAME {
            self.scanline = 0;
            self.frame += 1;
        }
        nmi
    }

    /// Consume the pending NMI request, if any.
    pub fn take_nmi(&mut self) -> bool {
        std::mem::take(&mut self.nmi_line)
    }

    /// Copy a CHR bank into the pattern tables.
    pub fn load_chr(&mut self, bank: &[u8]) {
        self.vram.load_chr(bank);
    }

    /// The rendered frame as NES colour indices.
    #[must_use]
    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.framebuffer
    }

    /// PPU-private memory, for inspection.
    #[must_use]
    pub fn vram(&self) -> &Vram {
        &self.vram
    }

    /// Nametable mirroring pass-through.
    pub fn set_mirroring(&mut self, mirroring: Mirroring) {
        self.vram.set_mirroring(mirroring);
    }

    /// Current scanline (0-261).
    #[must_use]
    pub fn scanline(&self) -> u16 {
        self.scanline
    }

    /// Frames completed since power-on.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Whether the VBlank flag is currently set.
    #[must_use]
    pub fn in_vblank(&self) -> bool {
        self.status.in_vblank()
    }
}

impl std::fmt::Debug for Ppu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ppu")
            .field("ctrl", &self.ctrl)
            .field("mask", &self.mask)
            .field("status", &self.status)
            .field("scanline", &self.scanline)
            .field("frame", &self.frame)
            .field("vram_addr", &self.vram_addr)
            .finish_non_exhaustive()
    }
}
