//! Processor core boundary.

use crate::BusDevice;

/// A processor core driven one bus cycle at a time.
///
/// The orchestrator owns the clock: it calls [`Cpu::tick`] once per
/// processor cycle and advances every other component in between, so a
/// core must perform at most one bus access per call. A core that stalls
/// (for DMA, say) simply isn't ticked.
pub trait Cpu {
    /// Execute exactly one processor cycle against the bus.
    fn tick<B: BusDevice>(&mut self, bus: &mut B);

    /// Request a non-maskable interrupt. Latched until the core services it.
    fn nmi(&mut self);

    /// Return to the power-on state. The core fetches its reset vector on
    /// the following ticks.
    fn reset(&mut self);

    /// Current program counter.
    fn pc(&self) -> u16;
}
