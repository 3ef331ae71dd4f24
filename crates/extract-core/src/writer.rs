//! Subtitle output seam

use std::path::Path;

use hardsub_common::{Result, SubtitleEntry};

/// Serializes a finalized entry sequence to a subtitle file
///
/// Time values are integer milliseconds; the writer owns the conversion to
/// its on-disk timestamp format.
pub trait SubtitleWriter {
    /// Write `entries` to `destination`
    ///
    /// # Errors
    ///
    /// Returns an error when the destination cannot be written. Failures are
    /// surfaced to the caller unmodified; the pipeline never retries.
    fn write(&self, entries: &[SubtitleEntry], destination: &Path) -> Result<()>;
}
