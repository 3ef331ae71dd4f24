//! Frame sampling and time-window arithmetic

use hardsub_common::{ExtractError, Result};

/// Time interval a sampled frame stands in for, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleWindow {
    pub start_ms: u64,
    pub end_ms: u64,
}

/// Decides which frames are submitted to recognition and what time window
/// each sampled frame represents
///
/// Pure index/time arithmetic; performs no recognition itself, which keeps
/// the expensive recognition calls isolated and easy to mock in tests.
#[derive(Debug, Clone)]
pub struct SamplingController {
    frame_rate: f64,
    stride: u32,
}

impl SamplingController {
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `frame_rate` is not positive or
    /// `stride` is zero.
    pub fn new(frame_rate: f64, stride: u32) -> Result<Self> {
        if !(frame_rate > 0.0) {
            return Err(ExtractError::InvalidConfiguration(format!(
                "frame rate must be positive (got {frame_rate})"
            )));
        }
        if stride == 0 {
            return Err(ExtractError::InvalidConfiguration(
                "sampling stride must be positive".to_string(),
            ));
        }
        Ok(Self { frame_rate, stride })
    }

    /// Whether the frame at `frame_index` should be recognized
    #[must_use]
    pub fn is_sample_point(&self, frame_index: u64) -> bool {
        frame_index % u64::from(self.stride) == 0
    }

    /// Time window the sample at `frame_index` stands in for
    ///
    /// The window covers the strided gap ending at the sampled frame. The
    /// very first sample yields a degenerate `[0, 0)` window.
    #[must_use]
    pub fn window_for(&self, frame_index: u64) -> SampleWindow {
        let start_frame = frame_index.saturating_sub(u64::from(self.stride));
        SampleWindow {
            start_ms: self.frame_to_ms(start_frame),
            end_ms: self.frame_to_ms(frame_index),
        }
    }

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn frame_to_ms(&self, frame_index: u64) -> u64 {
        (frame_index as f64 * 1000.0 / self.frame_rate) as u64
    }
}
