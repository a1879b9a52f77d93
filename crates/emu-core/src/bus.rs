//! Byte-wide bus capability.

/// Something that answers byte reads and writes on a 16-bit address bus.
///
/// Memory routers, memory-mapped peripherals and the combined system bus
/// all implement this. Reads take `&mut self` because many ports have read
/// side effects (status registers that clear on read, auto-incrementing
/// data ports).
///
/// Both operations are total: an address nobody decodes reads as 0 and
/// writes to it are dropped.
pub trait BusDevice {
    /// Read a byte from the given address.
    fn read(&mut self, addr: u16) -> u8;

    /// Write a byte to the given address.
    fn write(&mut self, addr: u16, value: u8);
}

impl<T: BusDevice + ?Sized> BusDevice for &mut T {
    fn read(&mut self, addr: u16) -> u8 {
        (**self).read(addr)
    }

    fn write(&mut self, addr: u16, value: u8) {
        (**self).write(addr, value);
    }
}
