use crate::Mirroring;

/// Trainer length in bytes. Mapped at $7000-$71FF.
pub const TRAINER_SIZE: usize = 512;

/// Header dialect the image was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderFormat {
    INes,
    Nes20,
}

/// A parsed cartridge. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartridgeImage {
    /// Program ROM, a multiple of 8 KiB.
    pub prg: Vec<u8>,
    /// Tile ROM, a multiple of 8 KiB. Empty when the board has CHR RAM.
    pub chr: Vec<u8>,
    pub trainer: Option<Box<[u8; TRAINER_SIZE]>>,
    pub mapper: u16,
    pub mirroring: Mirroring,
    /// Battery-backed RAM at $6000-$7FFF.
    pub has_battery: bool,
    pub format: HeaderFormat,
    pub vs_unisystem: bool,
    pub playchoice10: bool,
}

impl CartridgeImage {
    /// PRG size in 8 KiB banks.
    #[must_use]
    pub fn prg_banks(&self) -> usize {
        self.prg.len() / 0x2000
    }

    /// CHR size in 8 KiB banks (0 for CHR RAM).
    #[must_use]
    pub fn chr_banks(&self) -> usize {
        self.chr.len() / 0x2000
    }

    #[must_use]
    pub fn has_chr_ram(&self) -> bool {
        self.chr.is_empty()
    }
}
