//! Capability traits shared by every component of the console.
//!
//! Components never hold pointers to each other. The orchestrator owns them
//! all and lends them out through these traits: a processor core sees a
//! [`BusDevice`], a video chip hands finished pictures to a [`FrameSink`],
//! and anything clocked implements [`Tickable`].

mod bus;
mod clock;
mod cpu;
mod frame;
mod observable;
mod tickable;
mod ticks;

pub use bus::BusDevice;
pub use clock::MasterClock;
pub use cpu::Cpu;
pub use frame::FrameSink;
pub use observable::{Observable, Value};
pub use tickable::Tickable;
pub use ticks::Ticks;
