//! Ricoh 2C02 picture processing unit.
//!
//! One `tick()` = one PPU dot. There is no scanline/dot pair stored as
//! state: a single dot counter runs from 0 to the region's frame length and
//! wraps, and the scanline is always `dot_clock / 341`.
//!
//! ## Scanline layout (NTSC)
//! - 0-239: visible, one background pixel per dot for dots 0-255
//! - 240: post-render (idle)
//! - 241: vertical blank starts at dot 1 (status bit, NMI, frame done)
//! - 261: pre-render, status flags cleared at dot 1
//!
//! The CPU sees the chip only through its eight ports ($2000-$2007), which
//! [`Ppu`] exposes as an [`emu_core::BusDevice`].

mod memory;
mod ppu;
mod region;

pub use memory::VideoMemory;
pub use ppu::{DOTS_PER_LINE, FB_HEIGHT, FB_WIDTH, Ppu};
pub use region::Region;
