//! Text recognition over video frames using Tesseract
//!
//! Implements the [`RegionRecognizer`] seam with Tesseract 5.x via `leptess`.
//! Only the bottom band of each frame is searched: burned-in subtitles live
//! in the lower part of the picture, and skipping the rest keeps the
//! recognition call cheap. Detected line boxes are reported as
//! quadrilaterals in full-frame pixel coordinates with their recognized text
//! and confidence.

use image::RgbImage;
use leptess::{LepTess, Variable};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use hardsub_common::{ExtractError, Frame};
use hardsub_core::{Detection, Quad, RegionRecognizer};

/// Errors that can occur during text recognition
#[derive(Error, Debug)]
pub enum OcrError {
    #[error("Failed to initialize Tesseract: {0}")]
    Init(String),

    #[error("Failed to run OCR: {0}")]
    Recognition(String),

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),
}

impl From<OcrError> for ExtractError {
    fn from(err: OcrError) -> Self {
        ExtractError::Recognition(err.to_string())
    }
}

/// Configuration for Tesseract recognition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Tesseract language codes (e.g., "eng", "eng+fra")
    pub language: String,

    /// Page segmentation mode (see Tesseract PSM)
    pub page_segmentation_mode: u32,

    /// Fraction of the frame height, measured from the bottom, that is
    /// searched for text. Values outside (0, 1] are clamped.
    pub band_fraction: f32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            page_segmentation_mode: 3, // PSM_AUTO (fully automatic)
            band_fraction: 1.0 / 3.0,
        }
    }
}

/// Pixel rows of the searched band: (top row, height)
fn band_bounds(frame_height: u32, band_fraction: f32) -> (u32, u32) {
    let fraction = band_fraction.clamp(f32::MIN_POSITIVE, 1.0);
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let band_height = ((frame_height as f32 * fraction).round() as u32)
        .clamp(1, frame_height.max(1));
    (frame_height - band_height, band_height)
}

/// Subtitle text recognizer using Tesseract
pub struct TesseractRecognizer {
    config: OcrConfig,
}

impl TesseractRecognizer {
    /// Create a new recognizer
    ///
    /// # Errors
    ///
    /// Returns `OcrError::Init` when Tesseract cannot initialize with the
    /// configured language (typically missing language data).
    pub fn new(config: OcrConfig) -> Result<Self, OcrError> {
        let _probe = LepTess::new(None, &config.language).map_err(|e| {
            OcrError::Init(format!(
                "Failed to initialize Tesseract with language '{}': {}. \
                 Make sure language data is installed",
                config.language, e
            ))
        })?;

        Ok(Self { config })
    }

    fn detect_band(&self, frame: &Frame) -> Result<Vec<Detection>, OcrError> {
        if frame.width == 0 || frame.height == 0 {
            return Err(OcrError::InvalidFrame(format!(
                "Frame dimensions must be non-zero (got {}x{})",
                frame.width, frame.height
            )));
        }

        let expected = frame.width as usize * frame.height as usize * 3;
        if frame.data.len() != expected {
            return Err(OcrError::InvalidFrame(format!(
                "Expected {expected} bytes of RGB24 data, got {}",
                frame.data.len()
            )));
        }

        let (band_top, band_height) = band_bounds(frame.height, self.config.band_fraction);
        let row_bytes = frame.width as usize * 3;
        let band_data = frame.data[band_top as usize * row_bytes..].to_vec();
        let band = RgbImage::from_raw(frame.width, band_height, band_data)
            .ok_or_else(|| OcrError::InvalidFrame("Band extraction failed".to_string()))?;

        let mut lt = LepTess::new(None, &self.config.language)
            .map_err(|e| OcrError::Init(format!("Failed to initialize Tesseract: {e}")))?;

        lt.set_variable(
            Variable::TesseditPagesegMode,
            &self.config.page_segmentation_mode.to_string(),
        )
        .map_err(|e| OcrError::Init(format!("Failed to set PSM: {e}")))?;

        // Encode the band to PNG in memory (leptess expects encoded data)
        let mut png_buf = std::io::Cursor::new(Vec::new());
        band.write_to(&mut png_buf, image::ImageFormat::Png)
            .map_err(|e| OcrError::Recognition(format!("Failed to encode band to PNG: {e}")))?;

        lt.set_image_from_mem(png_buf.get_ref())
            .map_err(|e| OcrError::Recognition(format!("Failed to set image from memory: {e}")))?;

        // get_component_boxes() returns None when the band has no text,
        // which is the common case and not an error
        let boxes = match lt
            .get_component_boxes(leptess::capi::TessPageIteratorLevel_RIL_TEXTLINE, true)
        {
            Some(boxes) => boxes,
            None => return Ok(Vec::new()),
        };

        let mut detections = Vec::new();

        for text_box in &boxes {
            let geom = text_box.get_geometry();

            // Restrict recognition to this line box
            lt.set_rectangle(geom.x, geom.y, geom.w, geom.h);

            let text = lt.get_utf8_text().unwrap_or_default().trim().to_string();
            if text.is_empty() {
                continue;
            }

            #[allow(clippy::cast_precision_loss)]
            let confidence = lt.mean_text_conf() as f32 / 100.0;

            #[allow(clippy::cast_precision_loss)]
            let quad = Quad::from_rect(
                geom.x as f32,
                geom.y as f32 + band_top as f32,
                geom.w as f32,
                geom.h as f32,
            );

            debug!(
                "Frame {}: recognized '{}' with confidence {:.2} at top-mid x {:.1}",
                frame.frame_number,
                text,
                confidence,
                quad.top_mid_x()
            );

            detections.push(Detection {
                quad,
                text,
                confidence,
            });
        }

        Ok(detections)
    }
}

impl RegionRecognizer for TesseractRecognizer {
    fn recognize(&self, frame: &Frame) -> hardsub_common::Result<Vec<Detection>> {
        Ok(self.detect_band(frame)?)
    }
}
