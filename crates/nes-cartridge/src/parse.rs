//! Header decoding.
//!
//! Header layout:
//! - 0-3: "NES" followed by $1A
//! - 4: PRG size (16 KiB units; LSB under NES 2.0)
//! - 5: CHR size (8 KiB units; LSB under NES 2.0)
//! - 6: mirroring, battery, trainer, four-screen, mapper bits 0-3
//! - 7: VS Unisystem, PlayChoice-10, NES 2.0 marker, mapper bits 4-7
//! - 8: NES 2.0 mapper bits 8-11
//! - 9: NES 2.0 PRG/CHR size MSB nibbles

use crate::error::ParseError;
use crate::image::{CartridgeImage, HeaderFormat, TRAINER_SIZE};
use crate::Mirroring;

/// Header length in bytes.
pub const HEADER_SIZE: usize = 16;

const MAGIC: &[u8; 4] = b"NES\x1A";

const PRG_UNIT: u64 = 0x4000;
const CHR_UNIT: u64 = 0x2000;
const BANK_ALIGN: u64 = 0x2000;

/// PlayChoice-10 hint screen (8 KiB) plus PROM data and mask (16 + 16).
const PLAYCHOICE10_TRAILER: usize = 0x2000 + 32;

// Byte 6
const FLAG_VERTICAL: u8 = 0x01;
const FLAG_BATTERY: u8 = 0x02;
const FLAG_TRAINER: u8 = 0x04;
const FLAG_FOUR_SCREEN: u8 = 0x08;

// Byte 7
const FLAG_VS_UNISYSTEM: u8 = 0x01;
const FLAG_PLAYCHOICE10: u8 = 0x02;
const NES20_MASK: u8 = 0x0C;
const NES20_MARKER: u8 = 0x08;

/// Parse a complete cartridge image.
///
/// The payload after the header (and trainer) must be exactly PRG followed
/// by CHR; anything missing or left over rejects the image.
pub fn parse(data: &[u8]) -> Result<CartridgeImage, ParseError> {
    if data.len() < HEADER_SIZE {
        return Err(ParseError::HeaderTooShort(data.len()));
    }
    let header = &data[..HEADER_SIZE];
    if &header[0..4] != MAGIC {
        return Err(ParseError::BadMagic);
    }

    let flags6 = header[6];
    let flags7 = header[7];
    let format = if flags7 & NES20_MASK == NES20_MARKER {
        HeaderFormat::Nes20
    } else {
        HeaderFormat::INes
    };

    let mut mapper = u16::from(flags6 >> 4) | u16::from(flags7 & 0xF0);
    let (prg_size, chr_size) = match format {
        HeaderFormat::Nes20 => {
            mapper |= u16::from(header[8] & 0x0F) << 8;
            (
                nes20_size(header[4], header[9] & 0x0F, PRG_UNIT),
                nes20_size(header[5], header[9] >> 4, CHR_UNIT),
            )
        }
        HeaderFormat::INes => {
            // A PRG count of 0 is how 256 x 16 KiB fits in one byte
            let prg_units = if header[4] == 0 { 256 } else { u64::from(header[4]) };
            (prg_units * PRG_UNIT, u64::from(header[5]) * CHR_UNIT)
        }
    };

    for (block, size) in [("PRG", prg_size), ("CHR", chr_size)] {
        if size % BANK_ALIGN != 0 {
            return Err(ParseError::UnalignedSize { block, size });
        }
    }

    let has_trainer = flags6 & FLAG_TRAINER != 0;
    let trainer_size = if has_trainer { TRAINER_SIZE as u64 } else { 0 };
    let expected = (HEADER_SIZE as u64)
        .saturating_add(trainer_size)
        .saturating_add(prg_size)
        .saturating_add(chr_size);
    let actual = data.len() as u64;
    if actual < expected {
        return Err(ParseError::TruncatedImage { expected, actual });
    }

    // Every size now fits in the input, so the narrowing below is lossless
    let playchoice10 = flags7 & FLAG_PLAYCHOICE10 != 0;
    let extra = (actual - expected) as usize;
    if extra != 0 && !(playchoice10 && extra == PLAYCHOICE10_TRAILER) {
        return Err(ParseError::TrailingData { extra });
    }

    let mut offset = HEADER_SIZE;
    let trainer = if has_trainer {
        let mut block = Box::new([0u8; TRAINER_SIZE]);
        block.copy_from_slice(&data[offset..offset + TRAINER_SIZE]);
        offset += TRAINER_SIZE;
        Some(block)
    } else {
        None
    };
    let prg = data[offset..offset + prg_size as usize].to_vec();
    offset += prg.len();
    let chr = data[offset..offset + chr_size as usize].to_vec();

    let mirroring = if flags6 & FLAG_FOUR_SCREEN != 0 {
        Mirroring::FourScreen
    } else if flags6 & FLAG_VERTICAL != 0 {
        Mirroring::Vertical
    } else {
        Mirroring::Horizontal
    };

    let image = CartridgeImage {
        prg,
        chr,
        trainer,
        mapper,
        mirroring,
        has_battery: flags6 & FLAG_BATTERY != 0,
        format,
        vs_unisystem: flags7 & FLAG_VS_UNISYSTEM != 0,
        playchoice10,
    };

    log::debug!(
        "{:?} image: mapper {}, PRG {} KiB, CHR {} KiB, {:?}, battery {}, trainer {}",
        image.format,
        image.mapper,
        image.prg.len() / 1024,
        image.chr.len() / 1024,
        image.mirroring,
        image.has_battery,
        has_trainer,
    );

    Ok(image)
}

/// NES 2.0 block size from its LSB byte and MSB nibble.
///
/// An MSB of $F switches to exponent-multiplier form: LSB is `EEEEEEMM`
/// and the size is `2^E * (MM * 2 + 1)` bytes.
fn nes20_size(lsb: u8, msb: u8, unit: u64) -> u64 {
    if msb == 0x0F {
        let exponent = u32::from(lsb >> 2).min(60);
        (u64::from(lsb & 0x03) * 2 + 1) << exponent
    } else {
        ((u64::from(msb) << 8) | u64::from(lsb)) * unit
    }
}
