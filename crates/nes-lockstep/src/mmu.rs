//! CPU address routing.
//!
//! Routes every CPU address to work RAM, a peripheral port, extended RAM,
//! battery RAM or banked PRG ROM:
//!
//! | Range         | Target                                      |
//! |---------------|---------------------------------------------|
//! | $0000-$1FFF   | 2 KiB work RAM, mirrored                    |
//! | $2000-$3FFF   | PPU ports, mirrored every 8 bytes           |
//! | $4000-$401F   | APU, controllers, OAM DMA                   |
//! | $4020-$5FFF   | extended RAM                                |
//! | $6000-$7FFF   | battery RAM (trainer overlays $7000-$71FF)  |
//! | $8000-$FFFF   | PRG ROM through four 8 KiB bank windows     |
//!
//! The router owns memory only. Peripherals are lent to it for each access
//! through [`Ports`], so it never holds a reference to the PPU.

use emu_core::BusDevice;
use nes_cartridge::{CartridgeImage, TRAINER_SIZE};

pub(crate) const RAM_SIZE: usize = 0x800;
pub(crate) const EX_RAM_SIZE: usize = 0x2000;
pub(crate) const SRAM_SIZE: usize = 0x2000;

/// PRG bank window size.
pub const BANK_SIZE: usize = 0x2000;

/// Peripherals reachable through the router for one access.
pub struct Ports<'a> {
    /// PPU register file, addressed as $2000-$2007.
    pub ppu: &'a mut dyn BusDevice,
    /// Everything at $4000-$401F.
    pub io: &'a mut dyn BusDevice,
}

/// Memory management unit: work, extended and battery RAM plus cartridge.
pub struct Mmu {
    pub(crate) ram: [u8; RAM_SIZE],
    pub(crate) ex_ram: [u8; EX_RAM_SIZE],
    pub(crate) sram: [u8; SRAM_SIZE],
    /// 8 KiB PRG bank selected for each window at $8000/$A000/$C000/$E000.
    pub(crate) banks: [u8; 4],
    /// Controller bytes latched for the current frame.
    pub(crate) pads: [u8; 2],
    cartridge: Option<CartridgeImage>,
}

impl Mmu {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ram: [0; RAM_SIZE],
            ex_ram: [0; EX_RAM_SIZE],
            sram: [0; SRAM_SIZE],
            banks: [0; 4],
            pads: [0; 2],
            cartridge: None,
        }
    }

    /// Install a cartridge, clearing all RAM and selecting the default
    /// bank layout for its PRG size.
    pub fn load_cartridge(&mut self, image: CartridgeImage) {
        self.cartridge = Some(image);
        self.clear_memory();
        self.banks = self.default_banks();
    }

    /// Drop the cartridge and clear all RAM.
    pub fn eject(&mut self) {
        self.cartridge = None;
        self.clear_memory();
        self.banks = [0; 4];
    }

    #[must_use]
    pub fn cartridge(&self) -> Option<&CartridgeImage> {
        self.cartridge.as_ref()
    }

    /// Point PRG window `window` (0-3) at 8 KiB bank `bank`.
    pub fn set_bank(&mut self, window: usize, bank: u8) {
        self.banks[window & 3] = bank;
    }

    #[must_use]
    pub fn banks(&self) -> [u8; 4] {
        self.banks
    }

    pub fn set_pads(&mut self, pad1: u8, pad2: u8) {
        self.pads = [pad1, pad2];
    }

    #[must_use]
    pub fn pads(&self) -> [u8; 2] {
        self.pads
    }

    #[must_use]
    pub fn has_battery(&self) -> bool {
        self.cartridge.as_ref().is_some_and(|c| c.has_battery)
    }

    /// Battery RAM contents, for persisting to disk.
    #[must_use]
    pub fn sram(&self) -> &[u8] {
        &self.sram
    }

    pub(crate) fn clear_memory(&mut self) {
        self.ram.fill(0);
        self.ex_ram.fill(0);
        self.sram.fill(0);
        self.pads = [0; 2];
    }

    /// Identity for 32 KiB or more, otherwise 16 KiB mirrored twice.
    pub(crate) fn default_banks(&self) -> [u8; 4] {
        match &self.cartridge {
            Some(c) if c.prg.len() >= 4 * BANK_SIZE => [0, 1, 2, 3],
            _ => [0, 1, 0, 1],
        }
    }

    /// Read a byte as the CPU sees it.
    pub fn read(&mut self, addr: u16, ports: &mut Ports<'_>) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.ram[usize::from(addr) & (RAM_SIZE - 1)],
            0x2000..=0x3FFF => ports.ppu.read(0x2000 + (addr & 0x07)),
            0x4000..=0x401F => ports.io.read(addr),
            _ => self.peek(addr),
        }
    }

    /// Write a byte as the CPU does.
    pub fn write(&mut self, addr: u16, value: u8, ports: &mut Ports<'_>) {
        match addr {
            0x0000..=0x1FFF => self.ram[usize::from(addr) & (RAM_SIZE - 1)] = value,
            0x2000..=0x3FFF => ports.ppu.write(0x2000 + (addr & 0x07), value),
            0x4000..=0x401F => ports.io.write(addr, value),
            0x4020..=0x5FFF => self.ex_ram[usize::from(addr - 0x4000)] = value,
            0x6000..=0x7FFF => {
                if self.has_battery() {
                    self.sram[usize::from(addr - 0x6000)] = value;
                }
            }
            // ROM: fixed banking
            _ => {}
        }
    }

    /// Read memory without side effects. Port ranges read as 0.
    #[must_use]
    pub fn peek(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.ram[usize::from(addr) & (RAM_SIZE - 1)],
            0x2000..=0x401F => 0,
            0x4020..=0x5FFF => self.ex_ram[usize::from(addr - 0x4000)],
            0x6000..=0x7FFF => self.peek_sram(addr),
            _ => self.peek_prg(addr),
        }
    }

    fn peek_sram(&self, addr: u16) -> u8 {
        let Some(cart) = &self.cartridge else {
            return 0;
        };
        if let Some(trainer) = &cart.trainer {
            let offset = usize::from(addr.wrapping_sub(0x7000));
            if addr >= 0x7000 && offset < TRAINER_SIZE {
                return trainer[offset];
            }
        }
        if cart.has_battery {
            self.sram[usize::from(addr - 0x6000)]
        } else {
            0
        }
    }

    fn peek_prg(&self, addr: u16) -> u8 {
        let Some(cart) = &self.cartridge else {
            return 0;
        };
        let bank = usize::from(self.banks[usize::from((addr >> 13) & 0x03)]);
        let offset = bank * BANK_SIZE + usize::from(addr & 0x1FFF);
        cart.prg.get(offset).copied().unwrap_or(0)
    }
}

impl Default for Mmu {
    fn default() -> Self {
        Self::new()
    }
}
