//! Regional timing standards.

/// Video region. Fixes the frame length in dots and the CPU clock.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Region {
    /// 60 Hz, 262 scanlines.
    #[default]
    Ntsc,
    /// 50 Hz timing.
    Pal,
}

impl Region {
    /// PPU dots per frame.
    #[must_use]
    pub const fn dots_per_frame(self) -> u32 {
        match self {
            Self::Ntsc => 89_342,
            Self::Pal => 105_710,
        }
    }

    /// Whole scanlines per frame.
    #[must_use]
    pub const fn scanlines_per_frame(self) -> u32 {
        self.dots_per_frame() / crate::DOTS_PER_LINE
    }

    /// Pre-render scanline (last line of the frame).
    #[must_use]
    pub const fn pre_render_line(self) -> u32 {
        self.scanlines_per_frame() - 1
    }

    /// CPU clock in Hz.
    #[must_use]
    pub const fn cpu_hz(self) -> u64 {
        match self {
            Self::Ntsc => 1_789_773,
            Self::Pal => 1_773_447,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_lengths_are_whole_scanlines() {
        assert_eq!(Region::Ntsc.scanlines_per_frame(), 262);
        assert_eq!(Region::Ntsc.pre_render_line(), 261);
        assert_eq!(Region::Pal.dots_per_frame() % 341, 0);
        assert_eq!(Region::Pal.scanlines_per_frame(), 310);
    }
}
