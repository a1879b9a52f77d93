//! Completed-frame delivery.

/// Receiver for finished pictures.
///
/// A video chip calls this exactly once per frame, at the start of vertical
/// blank, with its whole framebuffer. The buffer holds one palette index per
/// pixel, row-major from the top-left corner.
pub trait FrameSink {
    fn frame_complete(&mut self, pixels: &[u8]);

    /// Blank whatever the sink is currently showing. Called on console reset.
    fn clear(&mut self) {}
}

/// Discards every frame. Handy for headless runs that only inspect memory.
impl FrameSink for () {
    fn frame_complete(&mut self, _pixels: &[u8]) {}
}
