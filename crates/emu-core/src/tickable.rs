//! Trait for components advanced by their own clock.

use crate::Ticks;

/// A component advanced one clock at a time.
///
/// "One clock" is whatever the component's native unit is: a dot for a
/// video chip, a cycle for an audio sequencer.
pub trait Tickable {
    fn tick(&mut self);

    /// Advance by several clocks. Must behave exactly like repeated `tick()`.
    fn tick_n(&mut self, count: Ticks) {
        for _ in 0..count.get() {
            self.tick();
        }
    }
}
