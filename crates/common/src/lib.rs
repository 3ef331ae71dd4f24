/// Common types and errors for burned-in subtitle extraction
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Extraction errors
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Video file not found: {0}")]
    FileNotFound(String),

    #[error("No video stream found")]
    NoVideoStream,

    #[error("Video stream error: {0}")]
    Stream(String),

    #[error("Text recognition failed: {0}")]
    Recognition(String),

    #[error("Subtitle write failed: {0}")]
    Write(String),

    #[error("FFmpeg error: {0}")]
    FFmpeg(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Decoded video frame in RGB24 layout
#[derive(Debug, Clone)]
pub struct Frame {
    /// Frame number (0-indexed, decode order)
    pub frame_number: u64,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Raw pixel data (row-major, 3 bytes per pixel)
    pub data: Vec<u8>,
}

/// One timed subtitle line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleEntry {
    /// 1-based sequence position, assigned at final assembly
    pub index: usize,
    /// Subtitle text
    pub text: String,
    /// Start time in milliseconds
    pub start_ms: u64,
    /// End time in milliseconds
    pub end_ms: u64,
}

impl SubtitleEntry {
    /// On-screen duration in milliseconds
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}
