//! iNES and NES 2.0 cartridge image parser.
//!
//! A cartridge dump is a 16-byte header, an optional 512-byte trainer, then
//! PRG ROM followed by CHR ROM. [`parse`] checks the whole layout up front
//! and returns an immutable [`CartridgeImage`]; nothing is ever partially
//! loaded.

mod error;
mod image;
mod mirroring;
mod parse;

pub use error::ParseError;
pub use image::{CartridgeImage, HeaderFormat, TRAINER_SIZE};
pub use parse::{HEADER_SIZE, parse};
pub use mirroring::Mirroring;
