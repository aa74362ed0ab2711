//! Vision/OCR Layer
//!
//! Turns a selected image into text. Supports two backends:
//! - Windows OCR API (built into Windows 10+)
//! - Tesseract command-line engine (everywhere else)

pub mod tesseract;
#[cfg(windows)]
pub mod windows_ocr;

pub use tesseract::TesseractRecognizer;
#[cfg(windows)]
pub use windows_ocr::WindowsOcrRecognizer;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::OcrSettings;
use crate::workflow::TextRecognizer;

/// OCR backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcrBackend {
    /// Windows built-in OCR
    WindowsOcr,
    /// Tesseract executable
    Tesseract,
}

impl Default for OcrBackend {
    fn default() -> Self {
        if cfg!(windows) {
            OcrBackend::WindowsOcr
        } else {
            OcrBackend::Tesseract
        }
    }
}

/// Decoded image in the form the recognizers consume
#[derive(Debug, Clone)]
pub struct InputImage {
    /// File the pixels were read from
    pub source: PathBuf,
    pub width: u32,
    pub height: u32,
    /// RGBA8 pixel data, row-major
    pub rgba: Vec<u8>,
}

impl InputImage {
    /// Decode an image file; fails on unreadable or unsupported files
    pub fn from_path(path: &Path) -> Result<Self> {
        let decoded = image::open(path)
            .with_context(|| format!("cannot read image {}", path.display()))?
            .to_rgba8();
        let (width, height) = decoded.dimensions();
        debug!("Decoded {:?}: {}x{}", path, width, height);

        Ok(Self {
            source: path.to_path_buf(),
            width,
            height,
            rgba: decoded.into_raw(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.rgba.is_empty()
    }
}

/// Build the recognizer selected in the configuration
pub fn build_recognizer(settings: &OcrSettings) -> Result<Arc<dyn TextRecognizer>> {
    info!("Using {:?} OCR backend", settings.backend);
    match settings.backend {
        OcrBackend::Tesseract => Ok(Arc::new(TesseractRecognizer::new(
            settings.tesseract_path.clone(),
            settings.tesseract_language.clone(),
        ))),
        #[cfg(windows)]
        OcrBackend::WindowsOcr => Ok(Arc::new(WindowsOcrRecognizer::new(settings.language.clone()))),
        #[cfg(not(windows))]
        OcrBackend::WindowsOcr => anyhow::bail!("Windows OCR is only available on Windows"),
    }
}
