//! PPU timing state machine, port interface and background decode.

use emu_core::{BusDevice, Observable, Tickable, Value};
use nes_cartridge::Mirroring;

use crate::Region;
use crate::memory::VideoMemory;

/// Framebuffer dimensions.
pub const FB_WIDTH: usize = 256;
pub const FB_HEIGHT: usize = 240;

/// Dots per scanline, both regions.
pub const DOTS_PER_LINE: u32 = 341;

const VBLANK_LINE: u32 = 241;

/// Dots between the second $2006 write and the visible address changing.
const VRAM_ADDR_DELAY: u32 = 3;

const CTRL_NAMETABLE: u8 = 0x03;
const CTRL_INCREMENT_32: u8 = 0x04;
const CTRL_BG_TABLE: u8 = 0x10;
const CTRL_NMI_ENABLE: u8 = 0x80;

const MASK_BG_LEFT: u8 = 0x02;
const MASK_SHOW_BG: u8 = 0x08;

const STATUS_SPRITE_OVERFLOW: u8 = 0x20;
const STATUS_SPRITE_ZERO_HIT: u8 = 0x40;
const STATUS_VBLANK: u8 = 0x80;

/// Backdrop colour lives in the first entry of sprite palette 0 ($3F10).
const BACKDROP_ENTRY: usize = 0x10;

/// PPU 2C02.
pub struct Ppu {
    mem: VideoMemory,
    region: Region,
    frame_dots: u32,
    pre_render_line: u32,

    // Registers
    ctrl: u8,
    mask: u8,
    status: u8,
    oam_addr: u8,
    scroll: [u8; 2],

    // Double-write toggle shared by $2005 and $2006
    write_toggle: bool,

    // Deferred $2006 address
    vram_latch: [u8; 2],
    vram_update_pending: bool,
    vram_update_dot: u32,
    vram_addr: u16,

    // Timing
    dot_clock: u32,
    scanline: u32,
    frame: u64,

    // Output
    framebuffer: Vec<u8>,
    nmi_pending: bool,
    frame_complete: bool,
}

impl Ppu {
    #[must_use]
    pub fn new(region: Region) -> Self {
        Self {
            mem: VideoMemory::new(),
            region,
            frame_dots: region.dots_per_frame(),
            pre_render_line: region.pre_render_line(),

            ctrl: 0,
            mask: 0,
            status: 0,
            oam_addr: 0,
            scroll: [0; 2],

            write_toggle: false,

            vram_latch: [0; 2],
            vram_update_pending: false,
            vram_update_dot: 0,
            vram_addr: 0,

            dot_clock: 0,
            scanline: 0,
            frame: 0,

            framebuffer: vec![0; FB_WIDTH * FB_HEIGHT],
            nmi_pending: false,
            frame_complete: false,
        }
    }

    /// Back to the power-on state with blank video memory.
    pub fn power_on(&mut self) {
        *self = Self::new(self.region);
    }

    /// Power on with a cartridge's tile data and nametable wiring.
    pub fn load_cartridge(&mut self, chr: &[u8], mirroring: Mirroring) {
        self.power_on();
        if chr.len() > 2 * 0x1000 {
            log::warn!(
                "CHR is {} bytes; only the first 8 KiB is mapped without CHR banking",
                chr.len()
            );
        }
        self.mem.load_cartridge(chr, mirroring);
    }

    /// Mapper hook for boards that switch nametable wiring.
    pub fn set_mirroring(&mut self, mirroring: Mirroring) {
        self.mem.set_mirroring(mirroring);
    }

    /// Fill the framebuffer with the backdrop colour.
    pub fn clear_framebuffer(&mut self) {
        let backdrop = self.mem.palette_entry(BACKDROP_ENTRY) & 0x3F;
        self.framebuffer.fill(backdrop);
    }

    fn enter_vblank(&mut self) {
        self.status |= STATUS_VBLANK;
        if self.ctrl & CTRL_NMI_ENABLE != 0 {
            self.nmi_pending = true;
        }
        self.frame_complete = true;
        self.frame += 1;
    }

    fn render_pixel(&mut self, x: u32, y: u32) {
        if self.mask & MASK_SHOW_BG == 0 {
            return;
        }
        if x < 8 && self.mask & MASK_BG_LEFT == 0 {
            return;
        }
        if let Some(colour) = self.background_pixel(x, y) {
            self.framebuffer[y as usize * FB_WIDTH + x as usize] = colour;
        }
    }

    /// Palette index of the background at screen position (x, y), or `None`
    /// where the tile pixel is transparent and the backdrop shows through.
    fn background_pixel(&self, x: u32, y: u32) -> Option<u8> {
        // Scrolled position on the 512x480 plane of four nametables
        let base = self.ctrl & CTRL_NAMETABLE;
        let sx = (x + u32::from(self.scroll[0]) + u32::from(base & 1) * 256) % 512;
        let sy = (y + u32::from(self.scroll[1]) + u32::from(base >> 1) * 240) % 480;

        let quadrant = (sx / 256 + (sy / 240) * 2) as usize;
        let (px, py) = (sx % 256, sy % 240);
        let (col, row) = (px / 8, py / 8);

        let tile = self.mem.nametable_byte(quadrant, (row * 32 + col) as usize);

        let table = usize::from(self.ctrl & CTRL_BG_TABLE != 0);
        let offset = usize::from(tile) * 16 + (py % 8) as usize;
        let lo = self.mem.pattern_byte(table, offset);
        let hi = self.mem.pattern_byte(table, offset + 8);

        let bit = 7 - (px % 8);
        let colour = (((hi >> bit) & 1) << 1) | ((lo >> bit) & 1);
        if colour == 0 {
            return None;
        }

        // One attribute byte per 4x4 tile block, two bits per 2x2 quadrant
        let attr = self
            .mem
            .nametable_byte(quadrant, 0x3C0 + (row / 4 * 8 + col / 4) as usize);
        let shift = ((row & 2) << 1) | (col & 2);
        let group = (attr >> shift) & 0x03;

        Some(self.mem.palette_entry(usize::from(group) * 4 + usize::from(colour)) & 0x3F)
    }

    fn advance_vram_addr(&mut self) {
        let step = if self.ctrl & CTRL_INCREMENT_32 != 0 { 32 } else { 1 };
        self.vram_addr = self.vram_addr.wrapping_add(step) & 0x3FFF;
    }

    /// Take the pending NMI request (edge: true once per vblank start).
    pub fn take_nmi(&mut self) -> bool {
        std::mem::take(&mut self.nmi_pending)
    }

    /// Take the frame-complete signal (true once per frame).
    pub fn take_frame_complete(&mut self) -> bool {
        std::mem::take(&mut self.frame_complete)
    }

    /// Write OAM directly (for DMA).
    pub fn write_oam(&mut self, offset: u8, value: u8) {
        self.mem.oam_mut()[usize::from(offset)] = value;
    }

    /// Read OAM without side effects.
    #[must_use]
    pub fn read_oam(&self, offset: u8) -> u8 {
        self.mem.oam()[usize::from(offset)]
    }

    /// OAM address register ($2003).
    #[must_use]
    pub fn oam_addr(&self) -> u8 {
        self.oam_addr
    }

    /// Read the PPU bus without touching the address register.
    #[must_use]
    pub fn peek_vram(&self, addr: u16) -> u8 {
        self.mem.read(addr)
    }

    /// Palette indices, 256x240, row-major.
    #[must_use]
    pub fn framebuffer(&self) -> &[u8] {
        &self.framebuffer
    }

    /// Address used by $2007 and rendering (after the deferred update).
    #[must_use]
    pub fn vram_addr(&self) -> u16 {
        self.vram_addr
    }

    #[must_use]
    pub fn dot_clock(&self) -> u32 {
        self.dot_clock
    }

    #[must_use]
    pub fn scanline(&self) -> u32 {
        self.dot_clock / DOTS_PER_LINE
    }

    #[must_use]
    pub fn dot(&self) -> u32 {
        self.dot_clock % DOTS_PER_LINE
    }

    #[must_use]
    pub fn frame_dots(&self) -> u32 {
        self.frame_dots
    }

    #[must_use]
    pub fn status(&self) -> u8 {
        self.status
    }

    #[must_use]
    pub fn region(&self) -> Region {
        self.region
    }
}

impl Tickable for Ppu {
    fn tick(&mut self) {
        self.dot_clock += 1;
        if self.dot_clock == self.frame_dots {
            self.dot_clock = 0;
        }

        if self.vram_update_pending && self.dot_clock == self.vram_update_dot {
            self.vram_update_pending = false;
            self.vram_addr = u16::from_be_bytes(self.vram_latch) & 0x3FFF;
        }

        let line = self.dot_clock / DOTS_PER_LINE;
        let dot = self.dot_clock % DOTS_PER_LINE;

        if line != self.scanline {
            self.scanline = line;
            if line == 0 {
                self.clear_framebuffer();
            }
        }

        if dot == 1 {
            if line == VBLANK_LINE {
                self.enter_vblank();
            } else if line == self.pre_render_line {
                self.status &=
                    !(STATUS_VBLANK | STATUS_SPRITE_ZERO_HIT | STATUS_SPRITE_OVERFLOW);
            }
        }

        if line < FB_HEIGHT as u32 && dot < FB_WIDTH as u32 {
            self.render_pixel(dot, line);
        }
    }
}

/// CPU-side ports $2000-$2007 (only the low three address bits decode).
impl BusDevice for Ppu {
    fn read(&mut self, addr: u16) -> u8 {
        match addr & 0x07 {
            // $2002 - PPUSTATUS
            2 => {
                let result = self.status & 0xE0;
                self.status &= !STATUS_VBLANK;
                self.write_toggle = false;
                result
            }
            // $2004 - OAMDATA
            4 => self.read_oam(self.oam_addr),
            // $2007 - PPUDATA
            7 => {
                let result = self.mem.read(self.vram_addr);
                self.advance_vram_addr();
                result
            }
            _ => 0, // Write-only registers
        }
    }

    fn write(&mut self, addr: u16, value: u8) {
        match addr & 0x07 {
            // $2000 - PPUCTRL
            0 => self.ctrl = value,
            // $2001 - PPUMASK
            1 => self.mask = value,
            // $2003 - OAMADDR
            3 => self.oam_addr = value,
            // $2004 - OAMDATA
            4 => {
                self.write_oam(self.oam_addr, value);
                self.oam_addr = self.oam_addr.wrapping_add(1);
            }
            // $2005 - PPUSCROLL: X then Y
            5 => {
                self.scroll[usize::from(self.write_toggle)] = value;
                self.write_toggle = !self.write_toggle;
            }
            // $2006 - PPUADDR: high then low, applied a few dots later
            6 => {
                self.vram_latch[usize::from(self.write_toggle)] = value;
                if self.write_toggle {
                    self.vram_update_dot = (self.dot_clock + VRAM_ADDR_DELAY) % self.frame_dots;
                    self.vram_update_pending = true;
                }
                self.write_toggle = !self.write_toggle;
            }
            // $2007 - PPUDATA
            7 => {
                self.mem.write(self.vram_addr, value);
                self.advance_vram_addr();
            }
            _ => {}
        }
    }
}

impl Observable for Ppu {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "dot_clock" => Some(self.dot_clock.into()),
            "scanline" => Some(self.scanline().into()),
            "dot" => Some(self.dot().into()),
            "ctrl" => Some(self.ctrl.into()),
            "mask" => Some(self.mask.into()),
            "status" => Some(self.status.into()),
            "oam_addr" => Some(self.oam_addr.into()),
            "vram_addr" => Some(self.vram_addr.into()),
            "frame" => Some(self.frame.into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "dot_clock",
            "scanline",
            "dot",
            "ctrl",
            "mask",
            "status",
            "oam_addr",
            "vram_addr",
            "frame",
        ]
    }
}
