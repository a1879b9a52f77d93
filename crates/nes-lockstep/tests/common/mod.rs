//! Scripted CPU and cartridge builders shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;

use emu_core::{BusDevice, Cpu};

/// One bus cycle of a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Read(u16),
    Write(u16, u8),
    Idle,
}

/// A stand-in CPU that performs a fixed list of bus cycles, one per tick,
/// then idles.
#[derive(Debug, Default)]
pub struct ScriptCpu {
    script: VecDeque<Op>,
    /// Values returned by each `Read`, in order.
    pub reads: Vec<u8>,
    /// Cycles actually given to the core (excludes DMA stalls).
    pub cycles: u64,
    /// `cycles` value at each NMI.
    pub nmi_cycles: Vec<u64>,
    pub resets: u32,
    pc: u16,
}

impl ScriptCpu {
    pub fn new(ops: impl IntoIterator<Item = Op>) -> Self {
        Self {
            script: ops.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn push(&mut self, ops: impl IntoIterator<Item = Op>) {
        self.script.extend(ops);
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Cpu for ScriptCpu {
    fn tick<B: BusDevice>(&mut self, bus: &mut B) {
        self.cycles += 1;
        match self.script.pop_front() {
            Some(Op::Read(addr)) => {
                self.pc = addr;
                self.reads.push(bus.read(addr));
            }
            Some(Op::Write(addr, value)) => {
                self.pc = addr;
                bus.write(addr, value);
            }
            Some(Op::Idle) | None => {}
        }
    }

    fn nmi(&mut self) {
        self.nmi_cycles.push(self.cycles);
    }

    fn reset(&mut self) {
        self.resets += 1;
    }

    fn pc(&self) -> u16 {
        self.pc
    }
}

/// iNES image with `prg_16k` PRG banks, the given CHR and header flags 6.
///
/// PRG byte `i` is `i` mod 256 xor the 8 KiB bank number.
pub fn build_rom(prg_16k: u8, chr: &[u8], flags6: u8) -> Vec<u8> {
    let mut rom = vec![0u8; 16];
    rom[0..4].copy_from_slice(b"NES\x1a");
    rom[4] = prg_16k;
    rom[5] = (chr.len() / 0x2000) as u8;
    rom[6] = flags6;
    let prg_len = usize::from(prg_16k) * 0x4000;
    rom.extend((0..prg_len).map(|i| (i as u8) ^ ((i / 0x2000) as u8)));
    rom.extend_from_slice(chr);
    rom
}

/// Write a run of bytes into PPU memory through $2006/$2007.
pub fn ppu_upload(addr: u16, bytes: &[u8]) -> Vec<Op> {
    let [hi, lo] = addr.to_be_bytes();
    let mut ops = vec![Op::Write(0x2006, hi), Op::Write(0x2006, lo)];
    ops.extend(bytes.iter().map(|&b| Op::Write(0x2007, b)));
    ops
}
