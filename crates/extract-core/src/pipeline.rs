//! Sequential scan driving sampling, recognition, filtering and coalescing

use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::assembler::assemble;
use crate::coalesce::Coalescer;
use crate::filter::CenterFilter;
use crate::ledger::NoiseLedger;
use crate::recognizer::RegionRecognizer;
use crate::sampling::SamplingController;
use crate::source::FrameSource;
use crate::writer::SubtitleWriter;
use hardsub_common::{ExtractError, Result};

/// Tunable parameters of one extraction run
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Frames skipped between successive recognized samples
    pub stride: u32,

    /// Accepted distance, in pixels, between a detection's top-edge midpoint
    /// and the frame's horizontal center
    pub eps: f32,

    /// Cumulative screen time, in seconds, a single text may occupy before
    /// it is treated as overlay noise
    pub max_seconds: f64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            stride: 10,
            eps: 3.0,
            max_seconds: 30.0,
        }
    }
}

impl ExtractorConfig {
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `stride` or `max_seconds` is not
    /// positive.
    pub fn validate(&self) -> Result<()> {
        if self.stride == 0 {
            return Err(ExtractError::InvalidConfiguration(
                "sampling stride must be positive".to_string(),
            ));
        }
        if !(self.max_seconds > 0.0) {
            return Err(ExtractError::InvalidConfiguration(format!(
                "max tolerated screen time must be positive (got {})",
                self.max_seconds
            )));
        }
        Ok(())
    }
}

/// Extract burned-in subtitles from `source` and write them to `destination`
///
/// Scans the video sequentially, recognizing every `stride`-th frame,
/// keeping horizontally centered detections, coalescing consecutive
/// identical text into timed entries, and purging text that exceeded the
/// noise budget before writing. Returns the number of emitted entries.
///
/// Recognition failures are downgraded to empty samples, counted and
/// reported at scan end. A stream error aborts the scan, but the entries
/// coalesced so far are still assembled and written before the error is
/// returned.
///
/// # Errors
///
/// - `InvalidConfiguration` before any frame is processed
/// - `Stream` when the source fails mid-scan (after the partial write)
/// - `Write` when the subtitle writer fails
pub fn extract_subtitles<S, R, W>(
    source: &mut S,
    recognizer: &R,
    writer: &W,
    destination: &Path,
    config: &ExtractorConfig,
) -> Result<usize>
where
    S: FrameSource,
    R: RegionRecognizer,
    W: SubtitleWriter,
{
    config.validate()?;

    let frame_rate = source.frame_rate();
    let sampler = SamplingController::new(frame_rate, config.stride)?;
    let mut ledger = NoiseLedger::new(config.max_seconds, frame_rate, config.stride)?;
    let filter = CenterFilter::new(source.frame_width(), config.eps);
    let mut coalescer = Coalescer::new();

    info!(
        "Scanning for burned-in subtitles: {:.2} fps, stride {}, noise threshold {} samples",
        frame_rate,
        config.stride,
        ledger.max_count()
    );

    let mut sampled = 0u64;
    let mut recognition_failures = 0u64;
    let mut scan_error = None;

    loop {
        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(e) => {
                error!("Aborting scan, stream error: {e}");
                scan_error = Some(e);
                break;
            }
        };

        if !sampler.is_sample_point(frame.frame_number) {
            continue;
        }
        sampled += 1;
        let window = sampler.window_for(frame.frame_number);

        let mut detections = match recognizer.recognize(&frame) {
            Ok(detections) => detections,
            Err(e) => {
                // Best-effort: one bad frame must not abort the whole video.
                warn!("Recognition failed for frame {}: {e}", frame.frame_number);
                recognition_failures += 1;
                Vec::new()
            }
        };

        detections.retain(|d| filter.keep(d));
        // Bottom-most region first, matching on-screen subtitle stacking
        detections.sort_by(|a, b| b.quad.top_y().total_cmp(&a.quad.top_y()));

        for detection in &detections {
            debug!(
                "Frame {}: kept '{}' (confidence {:.2})",
                frame.frame_number, detection.text, detection.confidence
            );
            if ledger.record(&detection.text) {
                warn!(
                    "Text '{}' exceeded the noise threshold, blacklisted",
                    detection.text
                );
            }
            coalescer.fold(&detection.text, window);
        }
    }

    if recognition_failures > 0 {
        warn!("{recognition_failures} of {sampled} sampled frames failed recognition");
    }

    let entries = assemble(coalescer.finish(), &ledger);
    writer.write(&entries, destination)?;

    info!(
        "Wrote {} subtitle entries to {}",
        entries.len(),
        destination.display()
    );

    match scan_error {
        Some(e) => Err(e),
        None => Ok(entries.len()),
    }
}
