//! Final assembly: retroactive purge and renumbering

use tracing::debug;

use crate::ledger::NoiseLedger;
use hardsub_common::SubtitleEntry;

/// Apply the final blacklist retroactively and renumber survivors 1..N
///
/// Every entry whose text crossed the noise threshold at any point in the
/// scan is dropped, including entries that closed long before the crossing.
/// Whether a text is noise cannot be decided from a prefix of the stream, so
/// the purge runs once over the complete list instead of online.
#[must_use]
pub fn assemble(entries: Vec<SubtitleEntry>, ledger: &NoiseLedger) -> Vec<SubtitleEntry> {
    let total = entries.len();
    let mut survivors: Vec<SubtitleEntry> = entries
        .into_iter()
        .filter(|entry| !ledger.is_blacklisted(&entry.text))
        .collect();

    for (position, entry) in survivors.iter_mut().enumerate() {
        entry.index = position + 1;
    }

    debug!(
        "Assembled {} of {} coalesced entries",
        survivors.len(),
        total
    );
    survivors
}
