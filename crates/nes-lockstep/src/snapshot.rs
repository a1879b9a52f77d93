//! Save states for the memory router.
//!
//! Stream layout, all lengths big-endian:
//!
//! ```text
//! "MM" | total: u16 (header included) | chunk*
//! chunk = tag: u8 | len: u16 | payload[len]
//! ```
//!
//! | Tag | Payload                         | Present                  |
//! |-----|---------------------------------|--------------------------|
//! | W   | work RAM (2048)                 | always                   |
//! | R   | bank windows (4), pads (2)      | always                   |
//! | E   | extended RAM (8192)             | unless all zero          |
//! | S   | battery RAM (8192)              | battery cartridges only  |
//!
//! Unknown tags are skipped by length.

use std::ops::Range;

use crate::error::StateFormatError;
use crate::mmu::{EX_RAM_SIZE, Mmu, RAM_SIZE, SRAM_SIZE};

const MAGIC: &[u8; 2] = b"MM";
const HEADER_LEN: usize = 4;
const CHUNK_HEADER_LEN: usize = 3;

const TAG_WORK_RAM: u8 = b'W';
const TAG_REGISTERS: u8 = b'R';
const TAG_EX_RAM: u8 = b'E';
const TAG_SRAM: u8 = b'S';

const REGISTERS_LEN: usize = 6;

impl Mmu {
    /// Serialize RAM and the bank/pad registers.
    #[must_use]
    pub fn save_state(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            HEADER_LEN + 4 * CHUNK_HEADER_LEN + RAM_SIZE + REGISTERS_LEN + EX_RAM_SIZE + SRAM_SIZE,
        );
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&[0, 0]);

        push_chunk(&mut out, TAG_WORK_RAM, &self.ram);

        let mut registers = [0u8; REGISTERS_LEN];
        registers[..4].copy_from_slice(&self.banks);
        registers[4..].copy_from_slice(&self.pads);
        push_chunk(&mut out, TAG_REGISTERS, &registers);

        if self.ex_ram.iter().any(|&b| b != 0) {
            push_chunk(&mut out, TAG_EX_RAM, &self.ex_ram);
        }
        if self.has_battery() {
            push_chunk(&mut out, TAG_SRAM, &self.sram);
        }

        // Every chunk is bounded, so the total always fits in 16 bits
        let total = out.len() as u16;
        out[2..4].copy_from_slice(&total.to_be_bytes());
        out
    }

    /// Restore a stream produced by [`Mmu::save_state`].
    ///
    /// The stream is checked in full before anything is touched. On success
    /// all RAM is cleared, the chunks present are applied and the declared
    /// stream length is returned.
    pub fn load_state(&mut self, data: &[u8]) -> Result<usize, StateFormatError> {
        let (total, chunks) = parse_chunks(data)?;

        self.clear_memory();
        self.banks = self.default_banks();

        for (tag, range) in chunks {
            let payload = &data[range];
            match tag {
                TAG_WORK_RAM => self.ram.copy_from_slice(payload),
                TAG_REGISTERS => {
                    self.banks.copy_from_slice(&payload[..4]);
                    self.pads.copy_from_slice(&payload[4..]);
                }
                TAG_EX_RAM => self.ex_ram.copy_from_slice(payload),
                TAG_SRAM => self.sram.copy_from_slice(payload),
                _ => log::debug!("skipping unknown state chunk {:?}", char::from(tag)),
            }
        }

        Ok(total)
    }
}

fn push_chunk(out: &mut Vec<u8>, tag: u8, payload: &[u8]) {
    out.push(tag);
    out.extend_from_slice(&(payload.len() as u16).to_be_bytes());
    out.extend_from_slice(payload);
}

/// Payload length a known tag must carry.
fn expected_len(tag: u8) -> Option<usize> {
    match tag {
        TAG_WORK_RAM => Some(RAM_SIZE),
        TAG_REGISTERS => Some(REGISTERS_LEN),
        TAG_EX_RAM => Some(EX_RAM_SIZE),
        TAG_SRAM => Some(SRAM_SIZE),
        _ => None,
    }
}

/// Validate the stream and locate each chunk's payload.
fn parse_chunks(data: &[u8]) -> Result<(usize, Vec<(u8, Range<usize>)>), StateFormatError> {
    if data.len() < MAGIC.len() || &data[..MAGIC.len()] != MAGIC {
        return Err(StateFormatError::BadMagic);
    }
    if data.len() < HEADER_LEN {
        return Err(StateFormatError::Truncated {
            declared: HEADER_LEN,
            available: data.len(),
        });
    }
    let declared = usize::from(u16::from_be_bytes([data[2], data[3]]));
    if declared < HEADER_LEN || declared > data.len() {
        return Err(StateFormatError::Truncated {
            declared,
            available: data.len(),
        });
    }

    let mut chunks = Vec::new();
    let mut offset = HEADER_LEN;
    while offset < declared {
        let tag = data[offset];
        let payload_start = offset + CHUNK_HEADER_LEN;
        if payload_start > declared {
            return Err(StateFormatError::ChunkOverrun {
                tag: char::from(tag),
                offset,
            });
        }
        let len = usize::from(u16::from_be_bytes([data[offset + 1], data[offset + 2]]));
        let payload_end = payload_start + len;
        if payload_end > declared {
            return Err(StateFormatError::ChunkOverrun {
                tag: char::from(tag),
                offset,
            });
        }
        match expected_len(tag) {
            Some(expected) if expected != len => {
                return Err(StateFormatError::ChunkSize {
                    tag: char::from(tag),
                    expected,
                    actual: len,
                });
            }
            _ => {}
        }
        chunks.push((tag, payload_start..payload_end));
        offset = payload_end;
    }

    Ok((declared, chunks))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(total: u16) -> Vec<u8> {
        let mut v = MAGIC.to_vec();
        v.extend_from_slice(&total.to_be_bytes());
        v
    }

    #[test]
    fn fresh_state_has_work_ram_and_registers_only() {
        let mmu = Mmu::new();
        let state = mmu.save_state();
        assert_eq!(&state[..2], b"MM");
        let total = usize::from(u16::from_be_bytes([state[2], state[3]]));
        assert_eq!(total, state.len());
        assert_eq!(total, HEADER_LEN + 2 * CHUNK_HEADER_LEN + RAM_SIZE + REGISTERS_LEN);
        assert_eq!(state[HEADER_LEN], b'W');
    }

    #[test]
    fn round_trip_restores_memory_and_registers() {
        let mut mmu = Mmu::new();
        mmu.ram[0x123] = 0x45;
        mmu.ex_ram[0x1FFF] = 0x67;
        mmu.banks = [3, 2, 1, 0];
        mmu.pads = [0x81, 0x18];
        let state = mmu.save_state();

        let mut other = Mmu::new();
        other.ram[0] = 0xFF;
        assert_eq!(other.load_state(&state), Ok(state.len()));
        assert_eq!(other.ram, mmu.ram);
        assert_eq!(other.ex_ram, mmu.ex_ram);
        assert_eq!(other.banks, [3, 2, 1, 0]);
        assert_eq!(other.pads, [0x81, 0x18]);
    }

    #[test]
    fn missing_extended_ram_chunk_leaves_it_zero() {
        let clean = Mmu::new().save_state();
        let mut mmu = Mmu::new();
        mmu.ex_ram[10] = 1;
        mmu.load_state(&clean).expect("valid state");
        assert!(mmu.ex_ram.iter().all(|&b| b == 0));
    }

    #[test]
    fn bad_magic_changes_nothing() {
        let mut mmu = Mmu::new();
        mmu.ram[0] = 0x42;
        assert_eq!(mmu.load_state(b"XX\x00\x04"), Err(StateFormatError::BadMagic));
        assert_eq!(mmu.load_state(b"M"), Err(StateFormatError::BadMagic));
        assert_eq!(mmu.ram[0], 0x42);
    }

    #[test]
    fn declared_length_beyond_input_is_truncated() {
        let mut state = Mmu::new().save_state();
        state.truncate(state.len() - 1);
        let mut mmu = Mmu::new();
        assert!(matches!(
            mmu.load_state(&state),
            Err(StateFormatError::Truncated { .. })
        ));
    }

    #[test]
    fn oversized_chunk_length_is_rejected() {
        let mut state = header(4 + 3 + 2);
        state.extend_from_slice(&[b'W', 0xFF, 0xFF, 0, 0]);
        let mut mmu = Mmu::new();
        mmu.ram[5] = 5;
        assert_eq!(
            mmu.load_state(&state),
            Err(StateFormatError::ChunkOverrun {
                tag: 'W',
                offset: 4
            })
        );
        assert_eq!(mmu.ram[5], 5);
    }

    #[test]
    fn chunk_header_cut_short_is_rejected() {
        let mut state = header(4 + 2);
        state.extend_from_slice(&[b'W', 0x08]);
        assert!(matches!(
            Mmu::new().load_state(&state),
            Err(StateFormatError::ChunkOverrun { .. })
        ));
    }

    #[test]
    fn wrong_size_for_known_chunk_is_rejected() {
        let mut state = header(4 + 3 + 2);
        state.extend_from_slice(&[b'R', 0, 2, 1, 2]);
        assert_eq!(
            Mmu::new().load_state(&state),
            Err(StateFormatError::ChunkSize {
                tag: 'R',
                expected: 6,
                actual: 2
            })
        );
    }

    #[test]
    fn unknown_chunks_are_skipped() {
        let mut mmu = Mmu::new();
        mmu.ram[7] = 0x77;
        let mut state = mmu.save_state();
        state.extend_from_slice(&[b'Z', 0, 3, 9, 9, 9]);
        let total = state.len() as u16;
        state[2..4].copy_from_slice(&total.to_be_bytes());

        let mut other = Mmu::new();
        assert_eq!(other.load_state(&state), Ok(state.len()));
        assert_eq!(other.ram[7], 0x77);
    }

    #[test]
    fn trailing_bytes_after_declared_total_are_not_consumed() {
        let mut state = Mmu::new().save_state();
        let total = state.len();
        state.extend_from_slice(b"next");
        assert_eq!(Mmu::new().load_state(&state), Ok(total));
    }
}
