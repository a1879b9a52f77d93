//! Cycle-lockstep NES core.
//!
//! Wires an external 6502 core to the memory router, the 2C02 PPU and the
//! peripheral bus, advancing the PPU three dots for every CPU cycle. The
//! console owns every component; the CPU only ever sees a
//! [`emu_core::BusDevice`] for the duration of one cycle.

mod apu;
#[cfg(feature = "capture")]
pub mod capture;
mod config;
pub mod controller;
mod display;
mod error;
mod io;
mod mmu;
mod nes;
mod palette;
mod snapshot;

pub use apu::Apu;
pub use config::NesConfig;
pub use controller::Controller;
pub use display::ColorDisplay;
pub use error::{LoadError, StateFormatError};
pub use io::Peripherals;
pub use mmu::{BANK_SIZE, Mmu, Ports};
pub use nes::{DOTS_PER_CPU_CYCLE, Nes};
pub use palette::ColorFormat;

pub use nes_cartridge::{CartridgeImage, Mirroring, ParseError};
pub use ricoh_ppu_2c02::{Ppu, Region};
