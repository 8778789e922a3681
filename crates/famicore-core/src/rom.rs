//! iNES ROM image loading.
//!
//! The iNES container is a 16-byte header followed by the PRG banks and
//! an optional CHR bank:
//!
//! ```text
//! Byte 0-3: Magic "NES" + MS-DOS EOF (4E 45 53 1A)
//! Byte 4:   PRG bank count, 16 KiB units
//! Byte 5:   CHR bank count, 8 KiB units
//! Byte 6:   Flags (bit 0 vertical mirroring, bit 3 four-screen,
//!           bits 4-7 mapper low nibble)
//! Byte 7:   Flags (bits 4-7 mapper high nibble)
//! Byte 8+:  Reserved
//! ```

use std::path::Path;

use famicore_ppu::Mirroring;

/// Size of one PRG bank in bytes.
pub const PRG_BANK_SIZE: usize = 16 * 1024;

/// Size of one CHR bank in bytes.
pub const CHR_BANK_SIZE: usize = 8 * 1024;

/// iNES header length in bytes.
const HEADER_SIZE: usize = 16;

/// iNES magic number.
const MAGIC: [u8; 4] = [0x4E, 0x45, 0x53, 0x1A];

/// Errors raised while loading a ROM image.
#[derive(Debug, thiserror::Error)]
pub enum RomError {
    /// The file could not be read at all.
    #[error("failed to read ROM file")]
    Io(#[from] std::io::Error),

    /// The image has no content.
    #[error("ROM image is empty")]
    EmptyFile,

    /// The image does not start with the iNES magic.
    #[error("invalid iNES magic: expected [4E 45 53 1A], got {0:02X?}")]
    BadMagic([u8; 4]),

    /// The body is shorter than the bank counts promise.
    #[error("ROM image truncated: header promises {expected} bytes, got {actual}")]
    Truncated {
        /// Bytes required by the header.
        expected: usize,
        /// Bytes actually present.
        actual: usize,
    },
}

/// A parsed iNES image. Bank accessors borrow from the owned file data,
/// so they stay valid for the life of the image.
#[derive(Debug, Clone)]
pub struct RomImage {
    data: Vec<u8>,
    prg_count: u8,
    chr_count: u8,
    mirroring: Mirroring,
    mapper_id: u8,
}

impl RomImage {
    /// Read and parse a ROM file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`RomError`] when the file cannot be read or the image
    /// fails validation.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RomError> {
        Self::from_bytes(std::fs::read(path)?)
    }

    /// Parse a ROM image from raw file contents.
    ///
    /// # Errors
    ///
    /// Returns [`RomError::EmptyFile`] for an empty input,
    /// [`RomError::BadMagic`] when the iNES signature is missing, and
    /// [`RomError::Truncated`] when the body is shorter than the header's
    /// bank counts require.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, RomError> {
        if data.is_empty() {
            return Err(RomError::EmptyFile);
        }
        if data.len() < HEADER_SIZE {
            return Err(RomError::Truncated {
                expected: HEADER_SIZE,
                actual: data.len(),
            });
        }

        let magic = [data[0], data[1], data[2], data[3]];
        if magic != MAGIC {
            return Err(RomError::BadMagic(magic));
        }

        let prg_count = data[4];
        let chr_count = data[5];

        let expected = HEADER_SIZE
            + usize::from(prg_count) * PRG_BANK_SIZE
            + usize::from(chr_count) * CHR_BANK_SIZE;
        if prg_count == 0 || data.len() < expected {
            return Err(RomError::Truncated {
                expected: expected.max(HEADER_SIZE + PRG_BANK_SIZE),
                actual: data.len(),
            });
        }

        // Bit 3 selects four-screen, bit 0 vertical; both clear means
        // horizontal. Single-screen only ever comes from mapper wiring,
        // never the header.
        let mirroring = if data[6] & 0x08 != 0 {
            Mirroring::FourScreen
        } else if data[6] & 0x01 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };

        let mapper_id = (data[6] >> 4) | (data[7] & 0xF0);
        if mapper_id != 0 {
            log::warn!("mapper {mapper_id} is not supported; running with mapper 0 semantics");
        }

        log::debug!(
            "loaded iNES image: {prg_count}x16K PRG, {chr_count}x8K CHR, \
             mapper {mapper_id}, {mirroring:?} mirroring"
        );

        Ok(Self {
            data,
            prg_count,
            chr_count,
            mirroring,
            mapper_id,
        })
    }

    /// Number of 16 KiB PRG banks (1 or 2 in scope).
    #[must_use]
    pub fn prg_count(&self) -> u8 {
        self.prg_count
    }

    /// Number of 8 KiB CHR banks (0 or 1 in scope).
    #[must_use]
    pub fn chr_count(&self) -> u8 {
        self.chr_count
    }

    /// Nametable mirroring from the header flags.
    #[must_use]
    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    /// Mapper number assembled from the two header nibbles.
    #[must_use]
    pub fn mapper_id(&self) -> u8 {
        self.mapper_id
    }

    /// PRG bank `index` (0-based). Panics if the bank does not exist;
    /// `from_bytes` guarantees at least one.
    #[must_use]
    pub fn prg_bank(&self, index: usize) -> &[u8] {
        assert!(index < usize::from(self.prg_count), "PRG bank out of range");
        let start = HEADER_SIZE + index * PRG_BANK_SIZE;
        &self.data[start..start + PRG_BANK_SIZE]
    }

    /// The CHR bank, when the cartridge has one.
    #[must_use]
    pub fn chr_bank(&self) -> Option<&[u8]> {
        if self.chr_count == 0 {
            return None;
        }
        let start = HEADER_SIZE + usize::from(self.prg_count) * PRG_BANK_SIZE;
        Some(&self.data[start..start + CHR_BANK_SIZE])
    }
}
