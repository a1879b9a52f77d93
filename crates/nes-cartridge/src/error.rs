use thiserror::Error;

/// Why a cartridge image was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("image is {0} bytes, shorter than the 16-byte header")]
    HeaderTooShort(usize),

    #[error("missing \"NES\\x1A\" signature")]
    BadMagic,

    #[error("{block} size {size} is not a multiple of 8 KiB")]
    UnalignedSize { block: &'static str, size: u64 },

    #[error("image needs {expected} bytes but only {actual} are present")]
    TruncatedImage { expected: u64, actual: u64 },

    #[error("{extra} unexpected bytes after CHR data")]
    TrailingData { extra: usize },
}
