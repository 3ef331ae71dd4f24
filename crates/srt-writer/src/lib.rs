//! SRT subtitle serialization
//!
//! Writes finalized subtitle entries as a standard SubRip file:
//!
//! ```text
//! 1
//! 00:00:00,000 --> 00:00:02,500
//! Subtitle text
//!
//! 2
//! ...
//! ```
//!
//! Timestamps are `HH:MM:SS,mmm`; input times are integer milliseconds.

use std::path::Path;

use thiserror::Error;
use tracing::debug;

use hardsub_common::{ExtractError, SubtitleEntry};
use hardsub_core::SubtitleWriter;

/// SRT serialization errors
#[derive(Debug, Error)]
pub enum SrtError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SrtError> for ExtractError {
    fn from(err: SrtError) -> Self {
        ExtractError::Write(err.to_string())
    }
}

/// Writer producing SubRip (.srt) output
#[derive(Debug, Default)]
pub struct SrtWriter;

impl SrtWriter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn write_file(entries: &[SubtitleEntry], destination: &Path) -> Result<(), SrtError> {
        std::fs::write(destination, render_srt(entries))?;
        debug!(
            "Wrote {} entries to {}",
            entries.len(),
            destination.display()
        );
        Ok(())
    }
}

impl SubtitleWriter for SrtWriter {
    fn write(&self, entries: &[SubtitleEntry], destination: &Path) -> hardsub_common::Result<()> {
        Ok(Self::write_file(entries, destination)?)
    }
}

/// Render entries as SRT text
#[must_use]
pub fn render_srt(entries: &[SubtitleEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            entry.index,
            format_srt_timestamp(entry.start_ms),
            format_srt_timestamp(entry.end_ms),
            entry.text
        ));
    }
    out
}

/// Format integer milliseconds as an SRT timestamp (HH:MM:SS,mmm)
#[must_use]
pub fn format_srt_timestamp(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{hours:02}:{minutes:02}:{seconds:02},{millis:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(index: usize, text: &str, start_ms: u64, end_ms: u64) -> SubtitleEntry {
        SubtitleEntry {
            index,
            text: text.to_string(),
            start_ms,
            end_ms,
        }
    }

    #[test]
    fn test_format_srt_timestamp() {
        assert_eq!(format_srt_timestamp(0), "00:00:00,000");
        assert_eq!(format_srt_timestamp(2_500), "00:00:02,500");
        assert_eq!(format_srt_timestamp(90_250), "00:01:30,250");
        assert_eq!(format_srt_timestamp(3_600_000), "01:00:00,000");
    }

    #[test]
    fn test_render_srt_block_layout() {
        let entries = vec![
            entry(1, "Hello", 0, 400),
            entry(2, "World", 400, 1000),
        ];

        assert_eq!(
            render_srt(&entries),
            "1\n00:00:00,000 --> 00:00:00,400\nHello\n\n\
             2\n00:00:00,400 --> 00:00:01,000\nWorld\n\n"
        );
    }

    #[test]
    fn test_render_srt_empty_list() {
        assert!(render_srt(&[]).is_empty());
    }

    #[test]
    fn test_write_round_trips_through_the_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.srt");
        let entries = vec![entry(1, "多行\n字幕", 1_000, 2_500)];

        SrtWriter::new().write(&entries, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("1\n00:00:01,000 --> 00:00:02,500\n多行\n字幕\n"));
    }

    #[test]
    fn test_write_to_unwritable_destination_fails() {
        let entries = vec![entry(1, "Hello", 0, 400)];
        let result = SrtWriter::new().write(&entries, Path::new("/nonexistent/dir/out.srt"));
        assert!(matches!(result, Err(ExtractError::Write(_))));
    }
}
