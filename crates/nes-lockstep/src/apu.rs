//! Audio unit placeholder.
//!
//! Accepts register writes so software that programs sound keeps running,
//! and remembers them for inspection. Produces no samples.

/// $4000-$4013, $4015 and $4017 register file.
#[derive(Debug, Clone)]
pub struct Apu {
    registers: [u8; 0x18],
}

impl Apu {
    #[must_use]
    pub fn new() -> Self {
        Self {
            registers: [0; 0x18],
        }
    }

    /// Status reads report every channel silent.
    pub fn read(&mut self, addr: u16) -> u8 {
        log::trace!("APU read ${addr:04X}");
        0
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        log::trace!("APU write ${value:02X} to ${addr:04X}");
        if let Some(reg) = self.registers.get_mut(usize::from(addr.wrapping_sub(0x4000))) {
            *reg = value;
        }
    }

    /// Last value written to `addr`.
    #[must_use]
    pub fn register(&self, addr: u16) -> u8 {
        self.registers
            .get(usize::from(addr.wrapping_sub(0x4000)))
            .copied()
            .unwrap_or(0)
    }
}

impl Default for Apu {
    fn default() -> Self {
        Self::new()
    }
}
