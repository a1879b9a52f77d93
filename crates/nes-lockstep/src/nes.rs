//! Top-level console.
//!
//! The CPU is the clock master. Every CPU cycle is followed by exactly three
//! PPU dots, so a port read in the middle of an instruction sees the PPU
//! exactly where real hardware would have it:
//!
//! - CPU: 1,789,773 Hz (NTSC) / 1,773,447 Hz (PAL)
//! - PPU: 3 dots per CPU cycle
//! - One frame of emulation = CPU clock / 60 cycles
//!
//! NMI and frame completion are checked after each dot, so the core sees
//! the NMI on the cycle boundary following the dot that raised it.

use std::fs;
use std::path::Path;

use emu_core::{BusDevice, Cpu, FrameSink, MasterClock, Observable, Tickable, Ticks, Value};
use nes_cartridge::{Mirroring, ParseError};
use ricoh_ppu_2c02::Ppu;

use crate::config::NesConfig;
use crate::display::ColorDisplay;
use crate::error::{LoadError, StateFormatError};
use crate::io::Peripherals;
use crate::mmu::{Mmu, Ports};

/// PPU dots per CPU cycle.
pub const DOTS_PER_CPU_CYCLE: u32 = 3;

/// Frames per emulated second, both regions.
const FRAMES_PER_SECOND: u64 = 60;

/// The CPU's view of the machine for one cycle.
struct SystemBus<'a> {
    mmu: &'a mut Mmu,
    ppu: &'a mut Ppu,
    io: &'a mut Peripherals,
}

impl BusDevice for SystemBus<'_> {
    fn read(&mut self, addr: u16) -> u8 {
        self.mmu.read(
            addr,
            &mut Ports {
                ppu: &mut *self.ppu,
                io: &mut *self.io,
            },
        )
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.mmu.write(
            addr,
            value,
            &mut Ports {
                ppu: &mut *self.ppu,
                io: &mut *self.io,
            },
        );
    }
}

/// A sprite DMA transfer in flight.
///
/// One idle cycle (two when started on an odd cycle), then 256 alternating
/// read and write cycles: 513 or 514 in total.
#[derive(Debug, Clone, Copy)]
struct OamDma {
    page: u8,
    idle: u8,
    offset: u8,
    data: u8,
    reading: bool,
}

impl OamDma {
    fn new(page: u8, odd_cycle: bool) -> Self {
        Self {
            page,
            idle: if odd_cycle { 2 } else { 1 },
            offset: 0,
            data: 0,
            reading: true,
        }
    }

    /// Run one stolen CPU cycle. Returns true once the last byte is written.
    fn step(&mut self, mmu: &mut Mmu, ppu: &mut Ppu, io: &mut Peripherals) -> bool {
        if self.idle > 0 {
            self.idle -= 1;
            return false;
        }

        if self.reading {
            let addr = (u16::from(self.page) << 8) | u16::from(self.offset);
            self.data = mmu.read(
                addr,
                &mut Ports {
                    ppu: &mut *ppu,
                    io: &mut *io,
                },
            );
            self.reading = false;
            return false;
        }

        ppu.write_oam(ppu.oam_addr().wrapping_add(self.offset), self.data);
        self.reading = true;
        if self.offset == 0xFF {
            return true;
        }
        self.offset += 1;
        false
    }
}

/// NES console around an external CPU core.
pub struct Nes<C: Cpu, S: FrameSink = ColorDisplay> {
    cpu: C,
    mmu: Mmu,
    ppu: Ppu,
    io: Peripherals,
    sink: S,
    config: NesConfig,
    cycles_per_frame: Ticks,
    /// CPU cycles since power-on, DMA included.
    cpu_cycles: u64,
    /// Frames delivered to the sink.
    frame_count: u64,
    dma: Option<OamDma>,
}

impl<C: Cpu> Nes<C> {
    /// A console that renders into a [`ColorDisplay`] in the configured
    /// pixel format.
    #[must_use]
    pub fn new(config: &NesConfig, cpu: C) -> Self {
        Self::with_sink(config, cpu, ColorDisplay::new(config.color_format))
    }

    /// The translated picture.
    #[must_use]
    pub fn display(&self) -> &ColorDisplay {
        &self.sink
    }
}

impl<C: Cpu, S: FrameSink> Nes<C, S> {
    /// A console that hands finished frames to `sink`.
    #[must_use]
    pub fn with_sink(config: &NesConfig, cpu: C, sink: S) -> Self {
        let clock = MasterClock::new(config.region.cpu_hz());
        Self {
            cpu,
            mmu: Mmu::new(),
            ppu: Ppu::new(config.region),
            io: Peripherals::new(),
            sink,
            config: *config,
            cycles_per_frame: clock.ticks_per_frame(FRAMES_PER_SECOND),
            cpu_cycles: 0,
            frame_count: 0,
            dma: None,
        }
    }

    /// Load a cartridge image and reset.
    ///
    /// The previous cartridge and all memory are discarded first, so a
    /// rejected image leaves the console empty. Returns false on rejection.
    pub fn load_image(&mut self, data: &[u8]) -> bool {
        match self.try_load_image(data) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("rejected cartridge image: {e}");
                false
            }
        }
    }

    /// [`Nes::load_image`] with the parse error.
    pub fn try_load_image(&mut self, data: &[u8]) -> Result<(), ParseError> {
        self.mmu.eject();
        self.ppu.power_on();
        self.io = Peripherals::new();
        self.dma = None;
        self.sink.clear();

        let image = nes_cartridge::parse(data)?;
        if image.mapper != 0 {
            log::warn!(
                "mapper {} bank switching is not emulated; using fixed PRG banks",
                image.mapper
            );
        }

        self.ppu.load_cartridge(&image.chr, image.mirroring);
        self.mmu.load_cartridge(image);
        self.reset();
        log::debug!("cartridge loaded, banks {:?}", self.mmu.banks());
        Ok(())
    }

    /// Read a cartridge file and load it.
    pub fn load_image_file(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let data = fs::read(path.as_ref())?;
        self.try_load_image(&data)?;
        Ok(())
    }

    /// Console reset: blank the picture, abort any DMA and reset the CPU.
    pub fn reset(&mut self) {
        self.ppu.clear_framebuffer();
        self.sink.clear();
        self.dma = None;
        self.io.oam_dma_page = None;
        self.cpu.reset();
    }

    #[must_use]
    pub fn has_cartridge(&self) -> bool {
        self.mmu.cartridge().is_some()
    }

    /// Run one frame's worth of CPU cycles with the given pad bytes held.
    ///
    /// Does nothing without a cartridge.
    pub fn run_frame(&mut self, pad1: u8, pad2: u8) {
        if !self.has_cartridge() {
            return;
        }
        self.mmu.set_pads(pad1, pad2);
        self.io.latch_pads(pad1, pad2);
        self.tick_n(self.cycles_per_frame);
    }

    /// Serialize RAM and the bank registers.
    #[must_use]
    pub fn save_state(&self) -> Vec<u8> {
        self.mmu.save_state()
    }

    /// Restore a state from [`Nes::save_state`]. Returns bytes consumed.
    pub fn load_state(&mut self, data: &[u8]) -> Result<usize, StateFormatError> {
        match self.mmu.load_state(data) {
            Ok(consumed) => {
                log::debug!("loaded {consumed}-byte state");
                Ok(consumed)
            }
            Err(e) => {
                log::warn!("ignoring save state: {e}");
                Err(e)
            }
        }
    }

    /// Start a pending sprite DMA, if any.
    fn poll_dma(&mut self) {
        if self.dma.is_some() {
            return;
        }
        if let Some(page) = self.io.oam_dma_page.take() {
            log::trace!("OAM DMA from page ${page:02X} at cycle {}", self.cpu_cycles);
            self.dma = Some(OamDma::new(page, self.cpu_cycles % 2 == 1));
        }
    }

    fn tick_ppu(&mut self) {
        for _ in 0..DOTS_PER_CPU_CYCLE {
            self.ppu.tick();
            if self.ppu.take_nmi() {
                self.cpu.nmi();
            }
            if self.ppu.take_frame_complete() {
                self.sink.frame_complete(self.ppu.framebuffer());
                self.frame_count += 1;
            }
        }
    }

    /// Palette indices, 256x240, as the PPU is drawing them.
    #[must_use]
    pub fn framebuffer(&self) -> &[u8] {
        self.ppu.framebuffer()
    }

    #[must_use]
    pub fn cpu(&self) -> &C {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut C {
        &mut self.cpu
    }

    #[must_use]
    pub fn ppu(&self) -> &Ppu {
        &self.ppu
    }

    #[must_use]
    pub fn mmu(&self) -> &Mmu {
        &self.mmu
    }

    /// Bank registers live here for mapper extensions.
    pub fn mmu_mut(&mut self) -> &mut Mmu {
        &mut self.mmu
    }

    /// Nametable wiring for mapper extensions; the header's choice holds
    /// until the next load.
    pub fn set_mirroring(&mut self, mirroring: Mirroring) {
        log::debug!("mirroring switched to {mirroring:?}");
        self.ppu.set_mirroring(mirroring);
    }

    #[must_use]
    pub fn peripherals(&self) -> &Peripherals {
        &self.io
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    #[must_use]
    pub fn config(&self) -> &NesConfig {
        &self.config
    }

    #[must_use]
    pub fn cycles_per_frame(&self) -> Ticks {
        self.cycles_per_frame
    }

    #[must_use]
    pub fn cpu_cycles(&self) -> u64 {
        self.cpu_cycles
    }

    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// True while sprite DMA is holding the CPU.
    #[must_use]
    pub fn dma_active(&self) -> bool {
        self.dma.is_some()
    }
}

/// One tick = one CPU cycle plus its three PPU dots.
impl<C: Cpu, S: FrameSink> Tickable for Nes<C, S> {
    fn tick(&mut self) {
        self.poll_dma();

        if let Some(dma) = &mut self.dma {
            if dma.step(&mut self.mmu, &mut self.ppu, &mut self.io) {
                self.dma = None;
            }
        } else {
            self.cpu.tick(&mut SystemBus {
                mmu: &mut self.mmu,
                ppu: &mut self.ppu,
                io: &mut self.io,
            });
        }
        self.cpu_cycles += 1;

        self.tick_ppu();
    }
}

impl<C: Cpu, S: FrameSink> Observable for Nes<C, S> {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(rest) = path.strip_prefix("ppu.") {
            self.ppu.query(rest)
        } else if let Some(rest) = path.strip_prefix("memory.") {
            let addr =
                if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
                    u16::from_str_radix(hex, 16).ok()
                } else if let Some(hex) = rest.strip_prefix('$') {
                    u16::from_str_radix(hex, 16).ok()
                } else {
                    rest.parse().ok()
                };
            addr.map(|a| Value::U8(self.mmu.peek(a)))
        } else {
            match path {
                "cpu.pc" => Some(self.cpu.pc().into()),
                "cpu_cycles" => Some(self.cpu_cycles.into()),
                "frame_count" => Some(self.frame_count.into()),
                "dma_active" => Some(self.dma.is_some().into()),
                _ => None,
            }
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "cpu.pc",
            "ppu.<path>",
            "memory.<addr>",
            "cpu_cycles",
            "frame_count",
            "dma_active",
        ]
    }
}
