//! ROM loading scenarios driven through the public API.

use famicore_core::{Console, Mirroring, RomError, RomImage};

/// Build an iNES image with the given banks and header flags; PRG filled
/// with `fill`, reset vector pointed at $8000.
fn build_rom(prg_count: u8, chr_count: u8, flags6: u8, fill: u8) -> Vec<u8> {
    let mut data = vec![0x4E, 0x45, 0x53, 0x1A, prg_count, chr_count, flags6, 0x00];
    data.extend_from_slice(&[0; 8]);

    let mut prg = vec![fill; usize::from(prg_count) * 16384];
    let last = prg.len();
    prg[last - 4] = 0x00;
    prg[last - 3] = 0x80;
    data.extend_from_slice(&prg);

    data.extend(std::iter::repeat(0x5C).take(usize::from(chr_count) * 8192));
    data
}

#[test]
fn sixteen_zero_bytes_fail_with_bad_magic() {
    let result = RomImage::from_bytes(vec![0; 16]);
    assert!(matches!(result, Err(RomError::BadMagic([0, 0, 0, 0]))));
}

#[test]
fn empty_input_fails_with_empty_file() {
    assert!(matches!(
        RomImage::from_bytes(Vec::new()),
        Err(RomError::EmptyFile)
    ));
}

#[test]
fn single_bank_is_mirrored_into_both_halves() {
    let rom = RomImage::from_bytes(build_rom(1, 0, 0x00, 0xAB)).unwrap();
    let mut console = Console::new(&rom);

    assert_eq!(console.bus_mut().read(0x8000), 0xAB);
    assert_eq!(console.bus_mut().read(0xC000), 0xAB);
    // An arbitrary offset agrees across the halves too.
    assert_eq!(
        console.bus_mut().read(0x9234),
        console.bus_mut().read(0xD234)
    );
}

#[test]
fn header_metadata_is_exposed() {
    let rom = RomImage::from_bytes(build_rom(2, 1, 0x01, 0xEA)).unwrap();
    assert_eq!(rom.prg_count(), 2);
    assert_eq!(rom.chr_count(), 1);
    assert_eq!(rom.mirroring(), Mirroring::Vertical);
    assert_eq!(rom.mapper_id(), 0);
}

#[test]
fn chr_bank_lands_in_vram_byte_for_byte() {
    let rom = RomImage::from_bytes(build_rom(1, 1, 0x00, 0xEA)).unwrap();
    let console = Console::new(&rom);
    assert_eq!(
        console.bus().ppu.vram().pattern_tables(),
        rom.chr_bank().unwrap()
    );
}

#[test]
fn load_reports_missing_file() {
    let result = RomImage::load("/nonexistent/path/game.nes");
    assert!(matches!(result, Err(RomError::Io(_))));
}
