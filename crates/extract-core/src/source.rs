//! Frame source seam

use hardsub_common::{Frame, Result};

/// Sequential access to decoded video frames
///
/// A source is exclusively owned and sequentially advanced for the duration
/// of one extraction run; random seeking is not required.
pub trait FrameSource {
    /// Frames per second of the underlying video, always positive
    fn frame_rate(&self) -> f64;

    /// Frame width in pixels
    fn frame_width(&self) -> u32;

    /// Read the next frame in decode order
    ///
    /// Returns `Ok(None)` at end of stream.
    ///
    /// # Errors
    ///
    /// Returns an error when the stream is corrupt and no further frames can
    /// be produced.
    fn next_frame(&mut self) -> Result<Option<Frame>>;
}
