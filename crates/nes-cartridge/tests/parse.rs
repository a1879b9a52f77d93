//! Cartridge parsing against hand-built images.

use nes_cartridge::{CartridgeImage, HeaderFormat, Mirroring, ParseError, parse};

/// Build an iNES image with PRG/CHR filled with recognisable bytes.
fn build_rom(prg_units: u8, chr_units: u8, flags6: u8, flags7: u8) -> Vec<u8> {
    let mut rom = vec![0u8; 16];
    rom[0..4].copy_from_slice(b"NES\x1a");
    rom[4] = prg_units;
    rom[5] = chr_units;
    rom[6] = flags6;
    rom[7] = flags7;
    if flags6 & 0x04 != 0 {
        rom.extend(std::iter::repeat_n(0x7A, 512));
    }
    let prg_len = if prg_units == 0 { 256 } else { usize::from(prg_units) } * 0x4000;
    rom.extend((0..prg_len).map(|i| (i % 251) as u8));
    rom.extend(std::iter::repeat_n(0xC4, usize::from(chr_units) * 0x2000));
    rom
}

#[test]
fn nrom_16k_with_chr_ram() {
    let image = parse(&build_rom(1, 0, 0, 0)).expect("valid image");
    assert_eq!(image.prg.len(), 0x4000);
    assert!(image.has_chr_ram());
    assert_eq!(image.prg_banks(), 2);
    assert_eq!(image.mapper, 0);
    assert_eq!(image.mirroring, Mirroring::Horizontal);
    assert_eq!(image.format, HeaderFormat::INes);
    assert!(image.trainer.is_none());
}

#[test]
fn header_flags_decode() {
    let image = parse(&build_rom(2, 1, 0x13, 0x41)).expect("valid image");
    assert_eq!(image.mirroring, Mirroring::Vertical);
    assert!(image.has_battery);
    assert!(image.vs_unisystem);
    assert!(!image.playchoice10);
    assert_eq!(image.mapper, 0x41);
    assert_eq!(image.chr_banks(), 1);
    assert!(image.chr.iter().all(|&b| b == 0xC4));
}

#[test]
fn four_screen_overrides_mirroring_bit() {
    let image = parse(&build_rom(1, 1, 0x09, 0)).expect("valid image");
    assert_eq!(image.mirroring, Mirroring::FourScreen);
}

#[test]
fn trainer_sits_between_header_and_prg() {
    let rom = build_rom(1, 1, 0x04, 0);
    let image = parse(&rom).expect("valid image");
    let trainer = image.trainer.as_ref().expect("trainer present");
    assert!(trainer.iter().all(|&b| b == 0x7A));
    assert_eq!(image.prg[..4], [0, 1, 2, 3]);
}

#[test]
fn zero_prg_count_means_256_units() {
    let image = parse(&build_rom(0, 0, 0, 0)).expect("valid image");
    assert_eq!(image.prg.len(), 256 * 0x4000);
}

#[test]
fn short_input_rejected() {
    assert_eq!(parse(b"NES\x1a"), Err(ParseError::HeaderTooShort(4)));
    assert_eq!(parse(&[]), Err(ParseError::HeaderTooShort(0)));
}

#[test]
fn bad_signature_rejected() {
    let mut rom = build_rom(1, 0, 0, 0);
    rom[3] = 0x1B;
    assert_eq!(parse(&rom), Err(ParseError::BadMagic));
}

#[test]
fn truncated_chr_rejected() {
    let mut rom = build_rom(1, 1, 0, 0);
    rom.truncate(rom.len() - 1);
    assert!(matches!(
        parse(&rom),
        Err(ParseError::TruncatedImage { expected, actual }) if expected == actual + 1
    ));
}

#[test]
fn missing_trainer_rejected() {
    let mut rom = build_rom(1, 0, 0, 0);
    rom[6] |= 0x04;
    assert!(matches!(parse(&rom), Err(ParseError::TruncatedImage { .. })));
}

#[test]
fn trailing_bytes_rejected() {
    let mut rom = build_rom(1, 1, 0, 0);
    rom.extend([0; 3]);
    assert_eq!(parse(&rom), Err(ParseError::TrailingData { extra: 3 }));
}

#[test]
fn playchoice10_trailer_accepted() {
    let mut rom = build_rom(2, 1, 0, 0x02);
    rom.extend(std::iter::repeat_n(0, 0x2000 + 32));
    let image = parse(&rom).expect("valid image");
    assert!(image.playchoice10);
    assert_eq!(image.chr.len(), 0x2000);
}

#[test]
fn nes20_exponential_chr() {
    let mut rom = build_rom(1, 0, 0, 0x08);
    // CHR: 2^13 * 3 = 24 KiB
    rom[5] = (13 << 2) | 1;
    rom[9] = 0xF0;
    rom.extend(std::iter::repeat_n(0x11, 0x6000));
    let image = parse(&rom).expect("valid image");
    assert_eq!(image.format, HeaderFormat::Nes20);
    assert_eq!(image.chr.len(), 0x6000);
}

#[test]
fn nes20_zero_prg_is_empty() {
    let mut rom = vec![0u8; 16];
    rom[0..4].copy_from_slice(b"NES\x1a");
    rom[5] = 1;
    rom[7] = 0x08;
    rom.extend([0u8; 0x2000]);
    let image = parse(&rom).expect("valid image");
    assert!(image.prg.is_empty());
}

#[test]
fn parsing_is_repeatable() {
    let rom = build_rom(2, 1, 0x07, 0x10);
    let first: CartridgeImage = parse(&rom).expect("valid image");
    let second = parse(&rom).expect("valid image");
    assert_eq!(first, second);
}

#[test]
fn error_messages_name_the_problem() {
    let err = ParseError::UnalignedSize { block: "CHR", size: 100 };
    assert_eq!(err.to_string(), "CHR size 100 is not a multiple of 8 KiB");
}
