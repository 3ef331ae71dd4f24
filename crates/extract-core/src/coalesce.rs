//! Temporal coalescing of kept detections

use crate::sampling::SampleWindow;
use hardsub_common::SubtitleEntry;

/// Merges consecutive text-identical detections into single timed entries
///
/// At most one entry is open at any time and entries are never reopened once
/// closed: two occurrences of the same text separated by a differing-text
/// sample produce two distinct entries, reflecting that the text genuinely
/// disappeared and reappeared. Indexes are left at 0 here and assigned at
/// final assembly.
#[derive(Debug, Default)]
pub struct Coalescer {
    closed: Vec<SubtitleEntry>,
    current: Option<SubtitleEntry>,
}

impl Coalescer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one kept detection into the running entry list
    ///
    /// The same text as the open entry extends its end time to the window's
    /// end; a different text closes the open entry and opens a new one with
    /// the window's bounds.
    pub fn fold(&mut self, text: &str, window: SampleWindow) {
        match &mut self.current {
            Some(entry) if entry.text == text => {
                entry.end_ms = window.end_ms;
            }
            _ => {
                if let Some(entry) = self.current.take() {
                    self.closed.push(entry);
                }
                self.current = Some(SubtitleEntry {
                    index: 0,
                    text: text.to_string(),
                    start_ms: window.start_ms,
                    end_ms: window.end_ms,
                });
            }
        }
    }

    /// Close any still-open entry and return the ordered entry list
    #[must_use]
    pub fn finish(mut self) -> Vec<SubtitleEntry> {
        if let Some(entry) = self.current.take() {
            self.closed.push(entry);
        }
        self.closed
    }
}
