//! Geometric detection filtering

use crate::recognizer::Detection;

/// Keeps detections whose top edge is horizontally centered in the frame
///
/// Burned-in subtitles are reliably centered; logos, watermarks and ticker
/// text are not. The test is necessary, not sufficient: centered text that
/// recurs for too long is caught by the noise ledger instead.
#[derive(Debug, Clone)]
pub struct CenterFilter {
    center_x: f32,
    eps: f32,
}

impl CenterFilter {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(frame_width: u32, eps: f32) -> Self {
        Self {
            center_x: frame_width as f32 / 2.0,
            eps,
        }
    }

    /// Whether the detection is plausibly subtitle text
    #[must_use]
    pub fn keep(&self, detection: &Detection) -> bool {
        (detection.quad.top_mid_x() - self.center_x).abs() < self.eps
    }
}
