//! PPU address space ($0000-$3FFF).
//!
//! - $0000-$1FFF: two 4 KiB pattern tables (cartridge CHR, or CHR RAM)
//! - $2000-$2FFF: four logical 1 KiB nametables
//! - $3000-$3EFF: mirror of $2000-$2EFF
//! - $3F00-$3FFF: 32-byte palette, mirrored every 32 bytes
//!
//! OAM is not on this bus but lives here so that all video memory is
//! cleared and reloaded together.

use nes_cartridge::Mirroring;

const PATTERN_TABLE_SIZE: usize = 0x1000;
const NAMETABLE_SIZE: usize = 0x400;

/// Video memory owned by the PPU.
pub struct VideoMemory {
    pattern: [[u8; PATTERN_TABLE_SIZE]; 2],
    /// False when the cartridge supplied CHR ROM.
    chr_writable: bool,
    /// Logical nametable (0-3) to physical buffer.
    nametable_map: [u8; 4],
    nametables: [[u8; NAMETABLE_SIZE]; 4],
    palette: [u8; 0x20],
    oam: [u8; 0x100],
}

impl VideoMemory {
    /// Blank memory: CHR RAM, horizontal mirroring.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pattern: [[0; PATTERN_TABLE_SIZE]; 2],
            chr_writable: true,
            nametable_map: Mirroring::Horizontal.nametable_map(),
            nametables: [[0; NAMETABLE_SIZE]; 4],
            palette: [0; 0x20],
            oam: [0; 0x100],
        }
    }

    /// Clear everything and install a cartridge's tile data.
    ///
    /// Empty `chr` means the board carries CHR RAM. Only the first 8 KiB of
    /// larger CHR ROMs is visible; CHR banking belongs to mapper extensions.
    pub fn load_cartridge(&mut self, chr: &[u8], mirroring: Mirroring) {
        *self = Self::new();
        self.nametable_map = mirroring.nametable_map();
        if !chr.is_empty() {
            self.chr_writable = false;
            for (table, src) in self.pattern.iter_mut().zip(chr.chunks(PATTERN_TABLE_SIZE)) {
                table[..src.len()].copy_from_slice(src);
            }
        }
    }

    /// Rewire the nametables without touching their contents.
    pub fn set_mirroring(&mut self, mirroring: Mirroring) {
        self.nametable_map = mirroring.nametable_map();
    }

    /// Read a byte from the PPU bus.
    #[must_use]
    pub fn read(&self, addr: u16) -> u8 {
        let addr = addr & 0x3FFF;
        match addr {
            0x0000..=0x1FFF => {
                self.pattern[usize::from(addr >> 12)][usize::from(addr) & 0x0FFF]
            }
            0x2000..=0x3EFF => {
                let (quadrant, offset) = split_nametable_addr(addr);
                self.nametable_byte(quadrant, offset)
            }
            _ => self.palette[palette_index(addr)],
        }
    }

    /// Write a byte to the PPU bus. Pattern writes are dropped for CHR ROM.
    pub fn write(&mut self, addr: u16, value: u8) {
        let addr = addr & 0x3FFF;
        match addr {
            0x0000..=0x1FFF => {
                if self.chr_writable {
                    self.pattern[usize::from(addr >> 12)][usize::from(addr) & 0x0FFF] = value;
                }
            }
            0x2000..=0x3EFF => {
                let (quadrant, offset) = split_nametable_addr(addr);
                let buffer = usize::from(self.nametable_map[quadrant]);
                self.nametables[buffer][offset] = value;
            }
            _ => self.palette[palette_index(addr)] = value,
        }
    }

    /// Byte `offset` of logical nametable `quadrant` (0-3).
    #[must_use]
    pub fn nametable_byte(&self, quadrant: usize, offset: usize) -> u8 {
        let buffer = usize::from(self.nametable_map[quadrant & 3]);
        self.nametables[buffer][offset & (NAMETABLE_SIZE - 1)]
    }

    /// Byte `offset` of pattern table `table` (0 or 1).
    #[must_use]
    pub fn pattern_byte(&self, table: usize, offset: usize) -> u8 {
        self.pattern[table & 1][offset & (PATTERN_TABLE_SIZE - 1)]
    }

    /// Palette entry `index` (0-31), applying the sprite-backdrop mirrors.
    #[must_use]
    pub fn palette_entry(&self, index: usize) -> u8 {
        self.palette[palette_index(index as u16)]
    }

    #[must_use]
    pub fn oam(&self) -> &[u8; 0x100] {
        &self.oam
    }

    pub fn oam_mut(&mut self) -> &mut [u8; 0x100] {
        &mut self.oam
    }
}

impl Default for VideoMemory {
    fn default() -> Self {
        Self::new()
    }
}

/// Logical nametable and offset for an address in $2000-$3EFF.
fn split_nametable_addr(addr: u16) -> (usize, usize) {
    let index = usize::from(addr & 0x0FFF);
    (index / NAMETABLE_SIZE, index % NAMETABLE_SIZE)
}

/// $3F10/$3F14/$3F18/$3F1C are the same cells as $3F00/$3F04/$3F08/$3F0C.
fn palette_index(addr: u16) -> usize {
    let index = usize::from(addr & 0x1F);
    if index & 0x13 == 0x10 {
        index & 0x0F
    } else {
        index
    }
}
