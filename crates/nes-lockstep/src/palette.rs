//! Fixed 64-colour master palette in two 16-bit pixel formats.

/// Host pixel format for the translated display.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ColorFormat {
    /// 0RRRRRGGGGGBBBBB
    #[default]
    Rgb555,
    /// RRRRRGGGGGGBBBBB
    Rgb565,
}

impl ColorFormat {
    /// Lookup table from palette index (0-63) to a host pixel.
    #[must_use]
    pub fn table(self) -> &'static [u16; 64] {
        match self {
            Self::Rgb555 => &RGB555,
            Self::Rgb565 => &RGB565,
        }
    }

    /// Expand a host pixel to 8-bit RGB.
    #[must_use]
    pub fn to_rgb888(self, pixel: u16) -> [u8; 3] {
        let (r, g, b) = match self {
            Self::Rgb555 => ((pixel >> 10) & 0x1F, (pixel >> 5) & 0x1F, pixel & 0x1F),
            Self::Rgb565 => ((pixel >> 11) & 0x1F, (pixel >> 5) & 0x3F, pixel & 0x1F),
        };
        let g = match self {
            Self::Rgb555 => expand5(g),
            Self::Rgb565 => ((g << 2) | (g >> 4)) as u8,
        };
        [expand5(r), g, expand5(b)]
    }
}

fn expand5(c: u16) -> u8 {
    ((c << 3) | (c >> 2)) as u8
}

#[rustfmt::skip]
const RGB555: [u16; 64] = [
    0x3DEF, 0x001F, 0x0017, 0x20B7, 0x4810, 0x5404, 0x5440, 0x4440,
    0x28C0, 0x01E0, 0x01A0, 0x0160, 0x010B, 0x0000, 0x0000, 0x0000,
    0x5EF7, 0x01FF, 0x017F, 0x351F, 0x6C19, 0x700B, 0x7CE0, 0x7162,
    0x55E0, 0x02E0, 0x02A0, 0x02A8, 0x0231, 0x0000, 0x0000, 0x0000,
    0x7FFF, 0x1EFF, 0x363F, 0x4DFF, 0x7DFF, 0x7D73, 0x7DEB, 0x7E88,
    0x7EE0, 0x5FE3, 0x2F6A, 0x2FF3, 0x03BB, 0x3DEF, 0x0000, 0x0000,
    0x7FFF, 0x539F, 0x5EFF, 0x6EFF, 0x7EFF, 0x7E98, 0x7B56, 0x7F95,
    0x7F6F, 0x6FEF, 0x5FF7, 0x5FFB, 0x03FF, 0x7F7F, 0x0000, 0x0000,
];

#[rustfmt::skip]
const RGB565: [u16; 64] = [
    0x7BCF, 0x2016, 0x2817, 0x6094, 0x990F, 0xB086, 0xA180, 0x7A00,
    0x4AC0, 0x3B40, 0x3B60, 0x3308, 0x3290, 0x0000, 0x0000, 0x0000,
    0xB596, 0x431F, 0x421F, 0x921E, 0xDA18, 0xDA0C, 0xE280, 0xC380,
    0x8C40, 0x5500, 0x4D42, 0x4D0D, 0x4498, 0x0000, 0x0000, 0x0000,
    0xFFFF, 0x651F, 0x541F, 0xA39F, 0xF31F, 0xFB16, 0xFBC6, 0xFD00,
    0xEE84, 0x9F40, 0x7788, 0x7712, 0x669C, 0x7BCF, 0x0000, 0x0000,
    0xFFFF, 0x969F, 0xA5DF, 0xC59F, 0xE59F, 0xFDDD, 0xFE57, 0xFED4,
    0xFF92, 0xCF90, 0xA794, 0xA7F9, 0xA7FE, 0xA514, 0x0000, 0x0000,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_expands_to_full_scale() {
        assert_eq!(ColorFormat::Rgb555.to_rgb888(RGB555[0x30]), [0xFF, 0xFF, 0xFF]);
        assert_eq!(ColorFormat::Rgb565.to_rgb888(RGB565[0x30]), [0xFF, 0xFF, 0xFF]);
        assert_eq!(ColorFormat::Rgb565.to_rgb888(0), [0, 0, 0]);
    }

    #[test]
    fn tables_agree_on_black_columns() {
        for i in [0x0D, 0x0E, 0x0F, 0x1D, 0x2E, 0x3F] {
            assert_eq!(RGB555[i], 0);
            assert_eq!(RGB565[i], 0);
        }
    }
}
