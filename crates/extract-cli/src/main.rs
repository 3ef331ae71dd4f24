//! Hardsub Extract CLI - burned-in subtitle extraction tool
//!
//! Wires the FFmpeg frame source, the Tesseract recognizer and the SRT
//! writer into the extraction pipeline.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use hardsub_common::{ExtractError, SubtitleEntry};
use hardsub_core::{extract_subtitles, ExtractorConfig, SubtitleWriter};
use hardsub_decoder::VideoSource;
use hardsub_ocr::{OcrConfig, TesseractRecognizer};
use hardsub_srt::SrtWriter;

#[derive(Parser)]
#[command(
    name = "hardsub-extract",
    version,
    about = "Extract burned-in subtitles from a video into an SRT file",
    long_about = "Samples video frames at a fixed stride, recognizes text in the bottom\n\
                  band of each sampled frame with Tesseract, filters out off-center and\n\
                  recurring overlay text, and writes the surviving lines as SubRip (.srt).",
    after_help = "EXAMPLES:\n  \
                  hardsub-extract video.mp4\n  \
                  hardsub-extract video.mp4 -o subs.srt --stride 5 --eps 8\n  \
                  hardsub-extract video.mp4 --language chi_sim --max-seconds 10\n  \
                  hardsub-extract video.mp4 --json entries.json -v"
)]
struct Cli {
    /// Input video file
    video: PathBuf,

    /// Output subtitle file (defaults to the video path with an .srt extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Frames skipped between recognized samples
    #[arg(long, default_value_t = 10)]
    stride: u32,

    /// Accepted distance, in pixels, between a detection's top-edge midpoint
    /// and the frame's horizontal center
    #[arg(long, default_value_t = 3.0)]
    eps: f32,

    /// Screen-time budget, in seconds, before a recurring text is treated as
    /// overlay noise
    #[arg(long, default_value_t = 30.0)]
    max_seconds: f64,

    /// Tesseract language codes (e.g. "eng", "chi_sim", "eng+fra")
    #[arg(long, default_value = "eng")]
    language: String,

    /// Fraction of the frame height, from the bottom, searched for text
    #[arg(long, default_value_t = 1.0 / 3.0)]
    band: f32,

    /// Also dump the emitted entries as JSON for diagnostics
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Writes the SRT file plus an optional JSON dump of the same entries
struct OutputWriter {
    srt: SrtWriter,
    json_path: Option<PathBuf>,
}

impl SubtitleWriter for OutputWriter {
    fn write(&self, entries: &[SubtitleEntry], destination: &Path) -> hardsub_common::Result<()> {
        self.srt.write(entries, destination)?;

        if let Some(path) = &self.json_path {
            let json = serde_json::to_string_pretty(entries)
                .map_err(|e| ExtractError::Write(format!("Failed to serialize entries: {e}")))?;
            std::fs::write(path, json)?;
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let destination = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.video.with_extension("srt"));

    let mut source = VideoSource::open(&cli.video)
        .with_context(|| format!("Failed to open {}", cli.video.display()))?;

    let recognizer = TesseractRecognizer::new(OcrConfig {
        language: cli.language.clone(),
        band_fraction: cli.band,
        ..OcrConfig::default()
    })
    .context("Failed to initialize Tesseract")?;

    let writer = OutputWriter {
        srt: SrtWriter::new(),
        json_path: cli.json.clone(),
    };

    let config = ExtractorConfig {
        stride: cli.stride,
        eps: cli.eps,
        max_seconds: cli.max_seconds,
    };

    let emitted = extract_subtitles(&mut source, &recognizer, &writer, &destination, &config)
        .with_context(|| format!("Subtitle extraction failed for {}", cli.video.display()))?;

    println!(
        "Wrote {} subtitle entries to {}",
        emitted,
        destination.display()
    );
    Ok(())
}
