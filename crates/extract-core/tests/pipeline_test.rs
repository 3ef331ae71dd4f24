use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use hardsub_common::{ExtractError, Frame, Result, SubtitleEntry};
use hardsub_core::{
    extract_subtitles, Detection, ExtractorConfig, FrameSource, Quad, RegionRecognizer,
    SubtitleWriter,
};

/// Frame source over a synthetic video of `frame_count` frames
struct MockSource {
    frame_rate: f64,
    width: u32,
    height: u32,
    frame_count: u64,
    next: u64,
    /// Fail instead of producing the frame at this index
    fail_at: Option<u64>,
}

impl MockSource {
    fn new(frame_rate: f64, frame_count: u64) -> Self {
        Self {
            frame_rate,
            width: 1280,
            height: 720,
            frame_count,
            next: 0,
            fail_at: None,
        }
    }
}

impl FrameSource for MockSource {
    fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    fn frame_width(&self) -> u32 {
        self.width
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if Some(self.next) == self.fail_at {
            return Err(ExtractError::Stream("truncated stream".to_string()));
        }
        if self.next >= self.frame_count {
            return Ok(None);
        }
        let frame = Frame {
            frame_number: self.next,
            width: self.width,
            height: self.height,
            data: Vec::new(),
        };
        self.next += 1;
        Ok(Some(frame))
    }
}

/// Recognizer replaying a per-frame script
struct ScriptedRecognizer {
    script: HashMap<u64, Vec<Detection>>,
    fail_frames: HashSet<u64>,
}

impl ScriptedRecognizer {
    fn new() -> Self {
        Self {
            script: HashMap::new(),
            fail_frames: HashSet::new(),
        }
    }

    fn detect(mut self, frame_number: u64, detection: Detection) -> Self {
        self.script.entry(frame_number).or_default().push(detection);
        self
    }

    fn fail_on(mut self, frame_number: u64) -> Self {
        self.fail_frames.insert(frame_number);
        self
    }
}

impl RegionRecognizer for ScriptedRecognizer {
    fn recognize(&self, frame: &Frame) -> Result<Vec<Detection>> {
        if self.fail_frames.contains(&frame.frame_number) {
            return Err(ExtractError::Recognition("engine crashed".to_string()));
        }
        Ok(self.script.get(&frame.frame_number).cloned().unwrap_or_default())
    }
}

/// Writer capturing the entries it was handed
#[derive(Default)]
struct CollectingWriter {
    written: RefCell<Option<Vec<SubtitleEntry>>>,
}

impl CollectingWriter {
    fn entries(&self) -> Vec<SubtitleEntry> {
        self.written.borrow().clone().expect("writer never invoked")
    }
}

impl SubtitleWriter for CollectingWriter {
    fn write(&self, entries: &[SubtitleEntry], _destination: &Path) -> Result<()> {
        *self.written.borrow_mut() = Some(entries.to_vec());
        Ok(())
    }
}

struct FailingWriter;

impl SubtitleWriter for FailingWriter {
    fn write(&self, _entries: &[SubtitleEntry], destination: &Path) -> Result<()> {
        Err(ExtractError::Write(format!(
            "permission denied: {}",
            destination.display()
        )))
    }
}

/// Detection whose top edge midpoint sits at `mid_x`
fn detection(text: &str, mid_x: f32) -> Detection {
    Detection {
        quad: Quad::from_rect(mid_x - 150.0, 620.0, 300.0, 40.0),
        text: text.to_string(),
        confidence: 0.97,
    }
}

fn out_path() -> PathBuf {
    PathBuf::from("unused.srt")
}

#[test]
fn test_two_line_scan_yields_two_timed_entries() {
    // 10 fps video sampled every 2 frames: "Hello" on frames 2 and 4,
    // "World" on frames 6, 8 and 10, nothing else on screen.
    let mut source = MockSource::new(10.0, 11);
    let recognizer = ScriptedRecognizer::new()
        .detect(2, detection("Hello", 640.0))
        .detect(4, detection("Hello", 640.0))
        .detect(6, detection("World", 640.0))
        .detect(8, detection("World", 640.0))
        .detect(10, detection("World", 640.0));
    let writer = CollectingWriter::default();
    let config = ExtractorConfig {
        stride: 2,
        eps: 5.0,
        max_seconds: 100.0,
    };

    let emitted =
        extract_subtitles(&mut source, &recognizer, &writer, &out_path(), &config).unwrap();

    assert_eq!(emitted, 2);
    assert_eq!(
        writer.entries(),
        vec![
            SubtitleEntry {
                index: 1,
                text: "Hello".to_string(),
                start_ms: 0,
                end_ms: 400,
            },
            SubtitleEntry {
                index: 2,
                text: "World".to_string(),
                start_ms: 400,
                end_ms: 1000,
            },
        ]
    );
}

#[test]
fn test_off_center_detections_never_reach_the_output() {
    let mut source = MockSource::new(10.0, 11);
    let recognizer = ScriptedRecognizer::new()
        .detect(2, detection("Hello", 640.0))
        .detect(2, detection("NEWS TICKER", 200.0))
        .detect(4, detection("Hello", 640.0))
        .detect(4, detection("NEWS TICKER", 200.0));
    let writer = CollectingWriter::default();
    let config = ExtractorConfig {
        stride: 2,
        eps: 5.0,
        max_seconds: 100.0,
    };

    let emitted =
        extract_subtitles(&mut source, &recognizer, &writer, &out_path(), &config).unwrap();

    assert_eq!(emitted, 1);
    assert_eq!(writer.entries()[0].text, "Hello");
}

#[test]
fn test_recurring_text_is_purged_retroactively() {
    // max_count = floor(0.4 * 10 / 2) = 2; "Hello" recurs at three
    // non-adjacent samples, so its third occurrence blacklists it and every
    // "Hello" entry is purged, including the one that closed at 200 ms.
    let mut source = MockSource::new(10.0, 11);
    let recognizer = ScriptedRecognizer::new()
        .detect(2, detection("Hello", 640.0))
        .detect(4, detection("World", 640.0))
        .detect(6, detection("Hello", 640.0))
        .detect(8, detection("World", 640.0))
        .detect(10, detection("Hello", 640.0));
    let writer = CollectingWriter::default();
    let config = ExtractorConfig {
        stride: 2,
        eps: 5.0,
        max_seconds: 0.4,
    };

    let emitted =
        extract_subtitles(&mut source, &recognizer, &writer, &out_path(), &config).unwrap();

    let entries = writer.entries();
    assert_eq!(emitted, 2);
    assert!(entries.iter().all(|e| e.text != "Hello"));
    assert_eq!(
        entries.iter().map(|e| e.index).collect::<Vec<_>>(),
        vec![1, 2]
    );
}

#[test]
fn test_recognition_failure_downgrades_to_an_empty_sample() {
    // The engine crashes on frame 4; the open "Hello" entry is left
    // un-extended and picks back up at frame 6.
    let mut source = MockSource::new(10.0, 11);
    let recognizer = ScriptedRecognizer::new()
        .detect(2, detection("Hello", 640.0))
        .fail_on(4)
        .detect(6, detection("Hello", 640.0));
    let writer = CollectingWriter::default();
    let config = ExtractorConfig {
        stride: 2,
        eps: 5.0,
        max_seconds: 100.0,
    };

    let emitted =
        extract_subtitles(&mut source, &recognizer, &writer, &out_path(), &config).unwrap();

    assert_eq!(emitted, 1);
    assert_eq!(
        writer.entries(),
        vec![SubtitleEntry {
            index: 1,
            text: "Hello".to_string(),
            start_ms: 0,
            end_ms: 600,
        }]
    );
}

#[test]
fn test_stream_error_writes_partial_output_and_surfaces_the_error() {
    let mut source = MockSource::new(10.0, 11);
    source.fail_at = Some(5);
    let recognizer = ScriptedRecognizer::new()
        .detect(2, detection("Hello", 640.0))
        .detect(4, detection("Hello", 640.0));
    let writer = CollectingWriter::default();
    let config = ExtractorConfig {
        stride: 2,
        eps: 5.0,
        max_seconds: 100.0,
    };

    let result = extract_subtitles(&mut source, &recognizer, &writer, &out_path(), &config);

    assert!(matches!(result, Err(ExtractError::Stream(_))));
    assert_eq!(
        writer.entries(),
        vec![SubtitleEntry {
            index: 1,
            text: "Hello".to_string(),
            start_ms: 0,
            end_ms: 400,
        }]
    );
}

#[test]
fn test_writer_failure_is_surfaced_unmodified() {
    let mut source = MockSource::new(10.0, 11);
    let recognizer = ScriptedRecognizer::new().detect(2, detection("Hello", 640.0));
    let config = ExtractorConfig {
        stride: 2,
        eps: 5.0,
        max_seconds: 100.0,
    };

    let result =
        extract_subtitles(&mut source, &recognizer, &FailingWriter, &out_path(), &config);
    assert!(matches!(result, Err(ExtractError::Write(_))));
}

#[test]
fn test_empty_video_emits_zero_entries() {
    let mut source = MockSource::new(25.0, 0);
    let recognizer = ScriptedRecognizer::new();
    let writer = CollectingWriter::default();

    let emitted = extract_subtitles(
        &mut source,
        &recognizer,
        &writer,
        &out_path(),
        &ExtractorConfig::default(),
    )
    .unwrap();

    assert_eq!(emitted, 0);
    assert!(writer.entries().is_empty());
}

#[test]
fn test_invalid_configuration_fails_before_any_frame_is_read() {
    let mut source = MockSource::new(10.0, 11);
    let recognizer = ScriptedRecognizer::new();
    let writer = CollectingWriter::default();
    let config = ExtractorConfig {
        stride: 0,
        ..ExtractorConfig::default()
    };

    let result = extract_subtitles(&mut source, &recognizer, &writer, &out_path(), &config);

    assert!(matches!(result, Err(ExtractError::InvalidConfiguration(_))));
    assert_eq!(source.next, 0, "no frame should have been read");
    assert!(writer.written.borrow().is_none(), "writer must not run");
}
