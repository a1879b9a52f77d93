//! Error types.

use std::io;

use nes_cartridge::ParseError;
use thiserror::Error;

/// A save-state stream that can't be applied. Loading it changes nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateFormatError {
    #[error("missing \"MM\" save-state signature")]
    BadMagic,

    #[error("state declares {declared} bytes but {available} are available")]
    Truncated { declared: usize, available: usize },

    #[error("chunk '{tag}' at offset {offset} runs past the end of the state")]
    ChunkOverrun { tag: char, offset: usize },

    #[error("chunk '{tag}' is {actual} bytes, expected {expected}")]
    ChunkSize {
        tag: char,
        expected: usize,
        actual: usize,
    },
}

/// Failure loading a cartridge from disk.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read cartridge file: {0}")]
    Io(#[from] io::Error),

    #[error("invalid cartridge image: {0}")]
    Parse(#[from] ParseError),
}
