//! Sequential video frame source backed by `FFmpeg`
//!
//! Opens a video file, selects the best video stream and yields frames one
//! at a time as RGB24 buffers via the [`FrameSource`] seam. Frames are
//! produced in decode order with no random seeking, which is all the
//! subtitle scan needs; the whole video is never held in memory.

use std::path::Path;

use ffmpeg_next as ffmpeg;
use tracing::debug;

use hardsub_common::{ExtractError, Frame, Result};
use hardsub_core::FrameSource;

/// Initialize `FFmpeg` library
fn init_ffmpeg() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        ffmpeg::init().expect("Failed to initialize FFmpeg");
    });
}

/// Pull-based decoder over the video stream of one media file
pub struct VideoSource {
    ictx: ffmpeg::format::context::Input,
    decoder: ffmpeg::decoder::Video,
    scaler: ffmpeg::software::scaling::Context,
    stream_index: usize,
    frame_rate: f64,
    width: u32,
    height: u32,
    frame_number: u64,
    flushed: bool,
    decoded: ffmpeg::util::frame::video::Video,
    converted: ffmpeg::util::frame::video::Video,
}

impl VideoSource {
    /// Open a video file for sequential decoding
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path does not exist (`FileNotFound`)
    /// - The container has no video stream (`NoVideoStream`)
    /// - The stream reports no usable frame rate
    /// - The decoder or scaler cannot be created
    pub fn open(path: &Path) -> Result<Self> {
        init_ffmpeg();

        if !path.exists() {
            return Err(ExtractError::FileNotFound(path.display().to_string()));
        }

        let ictx = ffmpeg::format::input(&path)
            .map_err(|e| ExtractError::FFmpeg(format!("Failed to open input file: {e}")))?;

        let (stream_index, frame_rate, codec_params) = {
            let stream = ictx
                .streams()
                .best(ffmpeg::media::Type::Video)
                .ok_or(ExtractError::NoVideoStream)?;

            let frame_rate = rational_to_f64(stream.avg_frame_rate())
                .or_else(|| rational_to_f64(stream.rate()))
                .ok_or_else(|| {
                    ExtractError::Stream("Video reports no usable frame rate".to_string())
                })?;

            (stream.index(), frame_rate, stream.parameters())
        };

        let decoder = ffmpeg::codec::context::Context::from_parameters(codec_params)
            .map_err(|e| ExtractError::FFmpeg(format!("Failed to create context: {e}")))?
            .decoder()
            .video()
            .map_err(|e| ExtractError::FFmpeg(format!("Failed to create decoder: {e}")))?;

        let width = decoder.width();
        let height = decoder.height();

        let scaler = ffmpeg::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg::format::Pixel::RGB24,
            width,
            height,
            ffmpeg::software::scaling::Flags::BILINEAR,
        )
        .map_err(|e| ExtractError::FFmpeg(format!("Failed to create scaler: {e}")))?;

        debug!(
            "Opened {} ({}x{} @ {:.2} fps)",
            path.display(),
            width,
            height,
            frame_rate
        );

        Ok(Self {
            ictx,
            decoder,
            scaler,
            stream_index,
            frame_rate,
            width,
            height,
            frame_number: 0,
            flushed: false,
            decoded: ffmpeg::util::frame::video::Video::empty(),
            converted: ffmpeg::util::frame::video::Video::empty(),
        })
    }

    fn convert_current(&mut self) -> Result<Frame> {
        self.scaler
            .run(&self.decoded, &mut self.converted)
            .map_err(|e| ExtractError::FFmpeg(format!("Failed to convert frame: {e}")))?;

        let frame = Frame {
            frame_number: self.frame_number,
            width: self.width,
            height: self.height,
            data: copy_rgb24(&self.converted),
        };
        self.frame_number += 1;
        Ok(frame)
    }
}

impl FrameSource for VideoSource {
    fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    fn frame_width(&self) -> u32 {
        self.width
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        loop {
            // Drain the decoder before feeding it more input; one packet can
            // yield several frames.
            if self.decoder.receive_frame(&mut self.decoded).is_ok() {
                return self.convert_current().map(Some);
            }

            if self.flushed {
                return Ok(None);
            }

            match self.ictx.packets().next() {
                Some((stream, packet)) => {
                    if stream.index() == self.stream_index {
                        self.decoder.send_packet(&packet).map_err(|e| {
                            ExtractError::Stream(format!("Failed to decode packet: {e}"))
                        })?;
                    }
                }
                None => {
                    self.decoder.send_eof().ok();
                    self.flushed = true;
                }
            }
        }
    }
}

fn rational_to_f64(rate: ffmpeg::Rational) -> Option<f64> {
    if rate.denominator() != 0 && rate.numerator() > 0 {
        Some(f64::from(rate.numerator()) / f64::from(rate.denominator()))
    } else {
        None
    }
}

/// Copy RGB24 frame data to a contiguous buffer, dropping row padding
fn copy_rgb24(frame: &ffmpeg::util::frame::video::Video) -> Vec<u8> {
    let width = frame.width() as usize;
    let height = frame.height() as usize;
    let stride = frame.stride(0);
    let plane_data = frame.data(0);

    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        let row_start = y * stride;
        let row_end = row_start + (width * 3);
        data.extend_from_slice(&plane_data[row_start..row_end]);
    }
    data
}
