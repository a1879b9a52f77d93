//! Peripheral bus, $4000-$401F.

use emu_core::BusDevice;

use crate::apu::Apu;
use crate::controller::Controller;

/// Everything on the CPU die or controller ports that the CPU reaches
/// through $4000-$401F.
#[derive(Debug, Default)]
pub struct Peripherals {
    pub apu: Apu,
    pub controller1: Controller,
    pub controller2: Controller,
    /// Page written to $4014, waiting for the DMA unit to pick it up.
    pub oam_dma_page: Option<u8>,
}

impl Peripherals {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Present this frame's pad bytes to both controller ports.
    pub fn latch_pads(&mut self, pad1: u8, pad2: u8) {
        self.controller1.latch(pad1);
        self.controller2.latch(pad2);
    }
}

impl BusDevice for Peripherals {
    fn read(&mut self, addr: u16) -> u8 {
        match addr {
            0x4016 => self.controller1.read(),
            0x4017 => self.controller2.read(),
            0x4000..=0x4015 => self.apu.read(addr),
            _ => 0, // APU test registers
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x4014 => self.oam_dma_page = Some(value),
            // One strobe line drives both ports
            0x4016 => {
                self.controller1.write(value);
                self.controller2.write(value);
            }
            0x4000..=0x4013 | 0x4015 | 0x4017 => self.apu.write(addr, value),
            _ => {}
        }
    }
}
