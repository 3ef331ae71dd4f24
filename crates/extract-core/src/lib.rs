//! Core pipeline for burned-in subtitle extraction
//!
//! Turns noisy per-frame text detections into a clean, temporally coalesced
//! subtitle sequence:
//! - [`SamplingController`] decides which frames are recognized and what time
//!   window each sample stands in for
//! - [`CenterFilter`] keeps detections that are horizontally centered
//! - [`NoiseLedger`] blacklists text that recurs beyond a screen-time budget
//! - [`Coalescer`] merges consecutive identical detections into timed entries
//! - [`assemble`] purges blacklisted entries retroactively and renumbers
//!
//! Video decoding, text recognition and subtitle serialization stay behind
//! the [`FrameSource`], [`RegionRecognizer`] and [`SubtitleWriter`] seams so
//! the pipeline can be driven with mock collaborators in tests.

pub mod assembler;
pub mod coalesce;
pub mod filter;
pub mod ledger;
pub mod pipeline;
pub mod recognizer;
pub mod sampling;
pub mod source;
pub mod writer;

pub use assembler::assemble;
pub use coalesce::Coalescer;
pub use filter::CenterFilter;
pub use ledger::NoiseLedger;
pub use pipeline::{extract_subtitles, ExtractorConfig};
pub use recognizer::{Detection, Point, Quad, RegionRecognizer};
pub use sampling::{SampleWindow, SamplingController};
pub use source::FrameSource;
pub use writer::SubtitleWriter;
