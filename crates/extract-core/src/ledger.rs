//! Recurrence-based noise tracking

use std::collections::{HashMap, HashSet};

use hardsub_common::{ExtractError, Result};

/// Tracks how often each distinct text has passed the geometric filter and
/// escalates recurring text to a permanent blacklist
///
/// Recurring identical text across many non-adjacent sampling windows is the
/// signature of static overlay graphics, not dialogue, which naturally
/// varies line to line. The ledger is owned by one extraction run; nothing
/// is retained across runs.
#[derive(Debug)]
pub struct NoiseLedger {
    occurrence_count: HashMap<String, u64>,
    blacklist: HashSet<String>,
    max_count: u64,
}

impl NoiseLedger {
    /// Create a ledger whose threshold allows a text at most `max_seconds`
    /// of cumulative screen time: `max_count = floor(max_seconds *
    /// frame_rate / stride)` samples.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `max_seconds`, `frame_rate` or
    /// `stride` is not positive.
    pub fn new(max_seconds: f64, frame_rate: f64, stride: u32) -> Result<Self> {
        if !(max_seconds > 0.0) {
            return Err(ExtractError::InvalidConfiguration(format!(
                "max tolerated screen time must be positive (got {max_seconds})"
            )));
        }
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

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let max_count = (max_seconds * frame_rate / f64::from(stride)).floor() as u64;

        Ok(Self {
            occurrence_count: HashMap::new(),
            blacklist: HashSet::new(),
            max_count,
        })
    }

    /// Record one filtered occurrence of `text`
    ///
    /// The count is incremented unconditionally, even for text that is
    /// already blacklisted. Returns `true` iff this call's increment pushed
    /// the text over the threshold.
    pub fn record(&mut self, text: &str) -> bool {
        let count = self
            .occurrence_count
            .entry(text.to_string())
            .or_insert(0);
        *count += 1;

        if *count > self.max_count && !self.blacklist.contains(text) {
            self.blacklist.insert(text.to_string());
            return true;
        }
        false
    }

    /// Whether `text` has been blacklisted in this run
    #[must_use]
    pub fn is_blacklisted(&self, text: &str) -> bool {
        self.blacklist.contains(text)
    }

    /// Number of samples a text may occupy before it is treated as noise
    #[must_use]
    pub fn max_count(&self) -> u64 {
        self.max_count
    }
}
