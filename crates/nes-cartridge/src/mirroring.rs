//! Nametable mirroring.

/// How the four logical nametables ($2000/$2400/$2800/$2C00) land on the
/// physical 1 KiB buffers. Headers declare the first three; `SingleScreen`
/// only comes from mapper hardware switching it at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mirroring {
    /// Left/right pairs share a buffer: $2000=$2400, $2800=$2C00.
    Horizontal,
    /// Top/bottom pairs share a buffer: $2000=$2800, $2400=$2C00.
    Vertical,
    /// Cartridge supplies extra VRAM; all four are distinct.
    FourScreen,
    /// All four are the same buffer.
    SingleScreen,
}

impl Mirroring {
    /// Physical buffer index for each logical nametable, in the order
    /// top-left, top-right, bottom-left, bottom-right.
    #[must_use]
    pub const fn nametable_map(self) -> [u8; 4] {
        match self {
            Self::Horizontal => [0, 0, 1, 1],
            Self::Vertical => [0, 1, 0, 1],
            Self::FourScreen => [0, 1, 2, 3],
            Self::SingleScreen => [0, 0, 0, 0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_mode_has_a_distinct_map() {
        let maps = [
            Mirroring::Horizontal.nametable_map(),
            Mirroring::Vertical.nametable_map(),
            Mirroring::FourScreen.nametable_map(),
            Mirroring::SingleScreen.nametable_map(),
        ];
        for (i, a) in maps.iter().enumerate() {
            for b in &maps[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
