//! PPU memory (VRAM).
//!
//! Memory map, folded on every access (no cached pointers, so CTRL bit
//! flips mid-frame cannot leave anything stale):
//!
//! ```text
//! +---------+-------+--------------------------------+
//! | Address | Size  | Description                    |
//! +---------+-------+--------------------------------+
//! | $0000   | $1000 | Pattern table 0 (CHR)          |
//! | $1000   | $1000 | Pattern table 1 (CHR)          |
//! | $2000   | $1000 | Nametables (mirrored, 4x $400) |
//! | $3000   | $F00  | Mirror of $2000-$2EFF          |
//! | $3F00   | $10   | Image palette                  |
//! | $3F10   | $10   | Sprite palette                 |
//! | $3F20   | $E0   | Palette mirrors                |
//! +---------+-------+--------------------------------+
//! ```

use crate::mirroring::Mirroring;

/// Total PPU address space in bytes.
pub const VRAM_SIZE: usize = 0x4000;

/// Base address of the image (background) palette.
pub const IMAGE_PALETTE: u16 = 0x3F00;

/// Base address of the sprite palette.
pub const SPRITE_PALETTE: u16 = 0x3F10;

/// Size of one CHR bank in bytes.
pub const CHR_BANK_SIZE: usize = 0x2000;

/// PPU-private memory with mirroring applied per access.
#[derive(Debug, Clone)]
pub struct Vram {
    mem: Box<[u8; VRAM_SIZE]>,
    mirroring: Mirroring,
}

impl Vram {
    /// Create zeroed VRAM with the given nametable mirroring.
    #[must_use]
    pub fn new(mirroring: Mirroring) -> Self {
        Self {
            mem: Box::new([0; VRAM_SIZE]),
            mirroring,
        }
    }

    /// Change the nametable mirroring (cartridge wiring).
    pub fn set_mirroring(&mut self, mirroring: Mirroring) {
        self.mirroring = mirroring;
    }

    /// Current nametable mirroring.
    #[must_use]
    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    /// Read one byte, with all mirrors folded.
    #[must_use]
    pub fn read(&self, addr: u16) -> u8 {
        self.mem[self.index(addr)]
    }

    /// Write one byte, with all mirrors folded.
    pub fn write(&mut self, addr: u16, value: u8) {
        let index = self.index(addr);
        self.mem[index] = value;
    }

    /// Copy an 8 KiB CHR bank into the pattern tables.
    pub fn load_chr(&mut self, bank: &[u8]) {
        if bank.len() != CHR_BANK_SIZE {
            log::warn!("CHR bank is {} bytes, expected {CHR_BANK_SIZE}", bank.len());
        }
        let len = bank.len().min(CHR_BANK_SIZE);
        self.mem[..len].copy_from_slice(&bank[..len]);
    }

    /// The pattern-table region, for round-trip checks against the ROM.
    #[must_use]
    pub fn pattern_tables(&self) -> &[u8] {
        &self.mem[..CHR_BANK_SIZE]
    }

    fn index(&self, addr: u16) -> usize {
        let addr = addr & 0x3FFF;
        match addr {
            0x0000..=0x1FFF => addr as usize,
            // $3000-$3EFF mirrors the nametables; the mirroring mode folds
            // the four logical tables onto physical pages.
            0x2000..=0x3EFF => 0x2000 + self.mirroring.map_nametable(addr) as usize,
            // Palette region repeats every 32 bytes up to $4000.
            _ => 0x3F00 + (addr & 0x1F) as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_table_is_flat() {
        let mut vram = Vram::new(Mirroring::Vertical);
        vram.write(0x0000, 0x11);
        vram.write(0x1FFF, 0x22);
        assert_eq!(vram.read(0x0000), 0x11);
        assert_eq!(vram.read(0x1FFF), 0x22);
    }

    #[test]
    fn nametable_mirroring_applies() {
        let mut vram = Vram::new(Mirroring::Vertical);
        vram.write(0x2000, 0xAA);
        // Vertical: $2800 shares the page with $2000.
        assert_eq!(vram.read(0x2800), 0xAA);
        assert_eq!(vram.read(0x2400), 0x00);

        vram.set_mirroring(Mirroring::Horizontal);
        vram.write(0x2400, 0xBB);
        // Horizontal: $2000/$2400 share.
        assert_eq!(vram.read(0x2000), 0xBB);
    }

    #[test]
    fn three_thousand_region_mirrors_nametables() {
        let mut vram = Vram::new(Mirroring::Vertical);
        vram.write(0x3123, 0x7E);
        assert_eq!(vram.read(0x2123), 0x7E);
    }

    #[test]
    fn palette_mirrors_every_32_bytes() {
        let mut vram = Vram::new(Mirroring::Vertical);
        vram.write(IMAGE_PALETTE, 0x21);
        assert_eq!(vram.read(0x3F20), 0x21);
        assert_eq!(vram.read(0x3FE0), 0x21);

        vram.write(SPRITE_PALETTE + 1, 0x15);
        assert_eq!(vram.read(0x3F31), 0x15);
    }

    #[test]
    fn chr_bank_round_trip() {
        let mut vram = Vram::new(Mirroring::Horizontal);
        let bank: Vec<u8> = (0..CHR_BANK_SIZE).map(|i| (i % 251) as u8).collect();
        vram.load_chr(&bank);
        assert_eq!(vram.pattern_tables(), &bank[..]);
    }

    #[test]
    fn address_space_wraps_at_16k() {
        let mut vram = Vram::new(Mirroring::Horizontal);
        vram.write(0x0012, 0x34);
        assert_eq!(vram.read(0x4012), 0x34);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn nametable_mirror_region_reads_back(addr in 0x2000u16..0x2F00, value: u8) {
                let mut vram = Vram::new(Mirroring::Vertical);
                vram.write(addr, value);
                prop_assert_eq!(vram.read(addr), value);
                // The $3000 image always agrees.
                prop_assert_eq!(vram.read(addr + 0x1000), value);
            }

            #[test]
            fn palette_folds_every_32_bytes(offset in 0u16..0x20, value: u8) {
                let mut vram = Vram::new(Mirroring::Horizontal);
                vram.write(0x3F00 + offset, value);
                for mirror in 1u16..7 {
                    prop_assert_eq!(vram.read(0x3F00 + mirror * 0x20 + offset), value);
                }
            }

            #[test]
            fn mirrored_pairs_share_storage(offset in 0u16..0x400, value: u8) {
                let mut vram = Vram::new(Mirroring::Horizontal);
                vram.write(0x2000 + offset, value);
                prop_assert_eq!(vram.read(0x2400 + offset), value);

                let mut vram = Vram::new(Mirroring::Vertical);
                vram.write(0x2000 + offset, value);
                prop_assert_eq!(vram.read(0x2800 + offset), value);
            }
        }
    }
}
