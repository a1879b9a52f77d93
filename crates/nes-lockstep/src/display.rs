//! Frame sink that translates palette indices to 16-bit host pixels.

use emu_core::FrameSink;
use ricoh_ppu_2c02::{FB_HEIGHT, FB_WIDTH};

use crate::palette::ColorFormat;

/// The most recent completed frame in host pixel format.
///
/// The colour table is chosen per display, so two consoles can render in
/// different formats side by side.
#[derive(Debug, Clone)]
pub struct ColorDisplay {
    format: ColorFormat,
    pixels: Vec<u16>,
    frames: u64,
}

impl ColorDisplay {
    #[must_use]
    pub fn new(format: ColorFormat) -> Self {
        Self {
            format,
            pixels: vec![0; FB_WIDTH * FB_HEIGHT],
            frames: 0,
        }
    }

    /// 256x240 pixels, row-major.
    #[must_use]
    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }

    #[must_use]
    pub fn format(&self) -> ColorFormat {
        self.format
    }

    /// Frames delivered since construction.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        FB_WIDTH as u32
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        FB_HEIGHT as u32
    }
}

impl Default for ColorDisplay {
    fn default() -> Self {
        Self::new(ColorFormat::default())
    }
}

impl FrameSink for ColorDisplay {
    fn frame_complete(&mut self, indices: &[u8]) {
        let table = self.format.table();
        for (out, &index) in self.pixels.iter_mut().zip(indices) {
            *out = table[usize::from(index & 0x3F)];
        }
        self.frames += 1;
    }

    fn clear(&mut self) {
        self.pixels.fill(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_through_selected_table() {
        let mut indices = vec![0x0Fu8; FB_WIDTH * FB_HEIGHT];
        indices[0] = 0x30;
        indices[1] = 0x01;

        let mut d555 = ColorDisplay::new(ColorFormat::Rgb555);
        let mut d565 = ColorDisplay::new(ColorFormat::Rgb565);
        d555.frame_complete(&indices);
        d565.frame_complete(&indices);

        assert_eq!(d555.pixels()[0], 0x7FFF);
        assert_eq!(d555.pixels()[1], 0x001F);
        assert_eq!(d565.pixels()[0], 0xFFFF);
        assert_eq!(d565.pixels()[1], 0x2016);
        assert_eq!(d555.pixels()[2], 0);
        assert_eq!(d555.frames(), 1);
    }

    #[test]
    fn clear_blanks_pixels() {
        let mut d = ColorDisplay::default();
        d.frame_complete(&vec![0x30; FB_WIDTH * FB_HEIGHT]);
        d.clear();
        assert!(d.pixels().iter().all(|&p| p == 0));
    }
}
