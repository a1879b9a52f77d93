//! Standard controller (joypad).
//!
//! A serial shift register read through $4016/$4017. Writing bit 0 = 1 to
//! $4016 holds the register in reload; the falling edge latches the
//! buttons. Each read returns one bit and shifts right.

/// Button bit positions in a pad byte.
pub mod button {
    pub const A: u8 = 0;
    pub const B: u8 = 1;
    pub const SELECT: u8 = 2;
    pub const START: u8 = 3;
    pub const UP: u8 = 4;
    pub const DOWN: u8 = 5;
    pub const LEFT: u8 = 6;
    pub const RIGHT: u8 = 7;
}

/// One controller port.
#[derive(Debug, Default, Clone)]
pub struct Controller {
    /// Buttons held this frame (bit per button).
    buttons: u8,
    shift_register: u8,
    /// While set the shift register keeps reloading.
    strobe: bool,
}

impl Controller {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole button byte, as sampled once per frame.
    pub fn latch(&mut self, buttons: u8) {
        self.buttons = buttons;
        if self.strobe {
            self.shift_register = buttons;
        }
    }

    /// Serial read: bit 0 of the shift register, then shift.
    pub fn read(&mut self) -> u8 {
        if self.strobe {
            return self.buttons & 1;
        }
        let result = self.shift_register & 1;
        // Reads past the eighth bit return 1
        self.shift_register = (self.shift_register >> 1) | 0x80;
        result
    }

    /// Strobe write: bit 0.
    pub fn write(&mut self, value: u8) {
        let strobe = value & 1 != 0;
        if self.strobe && !strobe {
            self.shift_register = self.buttons;
        }
        self.strobe = strobe;
    }

    #[must_use]
    pub fn buttons(&self) -> u8 {
        self.buttons
    }
}
