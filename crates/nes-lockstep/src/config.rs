//! Console configuration.

use ricoh_ppu_2c02::Region;

use crate::palette::ColorFormat;

/// Options fixed for the lifetime of a console session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NesConfig {
    /// Frame length and CPU clock.
    pub region: Region,
    /// Pixel format produced by [`crate::ColorDisplay`].
    pub color_format: ColorFormat,
}
