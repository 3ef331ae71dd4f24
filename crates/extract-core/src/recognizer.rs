//! Text recognition seam and detection geometry

use hardsub_common::{Frame, Result};
use serde::{Deserialize, Serialize};

/// A 2-D point in frame pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Quadrilateral bounds of a detection
///
/// Corner order is top-left, top-right, bottom-right, bottom-left, in frame
/// pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
}

impl Quad {
    /// Axis-aligned quad covering the rectangle at (`x`, `y`)
    #[must_use]
    pub fn from_rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            top_left: Point { x, y },
            top_right: Point { x: x + width, y },
            bottom_right: Point {
                x: x + width,
                y: y + height,
            },
            bottom_left: Point { x, y: y + height },
        }
    }

    /// Horizontal midpoint of the top edge
    #[must_use]
    pub fn top_mid_x(&self) -> f32 {
        (self.top_left.x + self.top_right.x) / 2.0
    }

    /// Vertical position of the top edge
    #[must_use]
    pub fn top_y(&self) -> f32 {
        self.top_left.y.min(self.top_right.y)
    }
}

/// One recognized text region in one sampled frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Region bounds in frame pixel coordinates
    pub quad: Quad,
    /// Recognized text, non-empty
    pub text: String,
    /// Recognition confidence in [0, 1]; diagnostic only, never gates the
    /// keep/drop decision
    pub confidence: f32,
}

/// Text recognizer seam
pub trait RegionRecognizer {
    /// Recognize text regions in one frame
    ///
    /// An empty list is a valid, common response (no text on screen) and is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns an error when the recognition engine fails for this frame.
    fn recognize(&self, frame: &Frame) -> Result<Vec<Detection>>;
}
