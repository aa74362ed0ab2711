//! Windows OCR API backend
//!
//! Uses the built-in Windows OCR (Windows.Media.Ocr). The WinRT calls block,
//! so each recognition runs on the blocking pool with its own engine.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info, warn};
use windows::{
    core::HSTRING,
    Globalization::Language,
    Graphics::Imaging::{BitmapPixelFormat, SoftwareBitmap},
    Media::Ocr::{OcrEngine as WinOcrEngine, OcrResult as WinOcrResult},
    Storage::Streams::DataWriter,
};

use super::InputImage;
use crate::workflow::TextRecognizer;

/// Windows OCR engine wrapper
pub struct WindowsOcr {
    engine: WinOcrEngine,
    language: String,
}

impl WindowsOcr {
    /// Create an engine for a BCP-47 tag, falling back to the user's profile languages
    pub fn new(language_tag: &str) -> Result<Self> {
        let language = Language::CreateLanguage(&HSTRING::from(language_tag))
            .context("Failed to create language")?;

        if WinOcrEngine::IsLanguageSupported(&language)
            .context("Failed to check language support")?
        {
            let engine = WinOcrEngine::TryCreateFromLanguage(&language)
                .context("Failed to create OCR engine for language")?;
            return Ok(Self {
                engine,
                language: language_tag.to_string(),
            });
        }

        warn!("OCR language '{}' not installed, using profile languages", language_tag);
        let engine = WinOcrEngine::TryCreateFromUserProfileLanguages()
            .context("Failed to create OCR engine from user profile")?;
        let language = engine
            .RecognizerLanguage()
            .and_then(|l| l.LanguageTag())
            .context("Failed to get recognizer language")?
            .to_string();

        Ok(Self { engine, language })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Recognize text in an RGBA buffer, one output line per OCR line
    pub fn recognize_text(&self, rgba: &[u8], width: u32, height: u32) -> Result<String> {
        if rgba.is_empty() || width == 0 || height == 0 {
            return Ok(String::new());
        }

        let bitmap = create_software_bitmap(&rgba_to_bgra(rgba), width, height)?;
        let result: WinOcrResult = self
            .engine
            .RecognizeAsync(&bitmap)
            .context("Failed to start OCR recognition")?
            .get()
            .context("OCR recognition failed")?;

        collect_lines(&result)
    }
}

/// Windows expects BGRA
fn rgba_to_bgra(rgba: &[u8]) -> Vec<u8> {
    let mut bgra = rgba.to_vec();
    for pixel in bgra.chunks_exact_mut(4) {
        pixel.swap(0, 2);
    }
    bgra
}

fn create_software_bitmap(bgra: &[u8], width: u32, height: u32) -> Result<SoftwareBitmap> {
    let writer = DataWriter::new().context("Failed to create data writer")?;
    writer.WriteBytes(bgra).context("Failed to write pixel data")?;
    let buffer = writer.DetachBuffer().context("Failed to detach pixel buffer")?;

    SoftwareBitmap::CreateCopyFromBuffer(&buffer, BitmapPixelFormat::Bgra8, width as i32, height as i32)
        .context("Failed to create SoftwareBitmap")
}

fn collect_lines(result: &WinOcrResult) -> Result<String> {
    let lines = result.Lines().context("Failed to get OCR lines")?;
    let mut text = Vec::new();
    for i in 0..lines.Size().context("Failed to get lines size")? {
        let line = lines.GetAt(i).context("Failed to get line")?;
        text.push(line.Text().context("Failed to get line text")?.to_string());
    }
    debug!("Windows OCR: {} lines", text.len());
    Ok(text.join("\n"))
}

/// `TextRecognizer` adapter for the Windows OCR engine
pub struct WindowsOcrRecognizer {
    language: String,
}

impl WindowsOcrRecognizer {
    pub fn new(language: String) -> Self {
        info!("Windows OCR recognizer configured for {}", language);
        Self { language }
    }
}

#[async_trait]
impl TextRecognizer for WindowsOcrRecognizer {
    fn name(&self) -> &'static str {
        "Windows OCR"
    }

    async fn recognize(&self, image: &InputImage) -> Result<String> {
        let language = self.language.clone();
        let rgba = image.rgba.clone();
        let (width, height) = (image.width, image.height);

        tokio::task::spawn_blocking(move || {
            let engine = WindowsOcr::new(&language)?;
            debug!("Recognizing with language {}", engine.language());
            engine.recognize_text(&rgba, width, height)
        })
        .await
        .context("OCR task panicked")?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_to_bgra_swaps_channels() {
        assert_eq!(rgba_to_bgra(&[1, 2, 3, 4, 5, 6, 7, 8]), vec![3, 2, 1, 4, 7, 6, 5, 8]);
    }

    #[test]
    fn test_create_engine() {
        assert!(WindowsOcr::new("en-US").is_ok());
    }

    #[test]
    fn test_blank_image_recognizes_nothing() {
        let engine = WindowsOcr::new("en-US").unwrap();
        let rgba = vec![255u8; 64 * 64 * 4];
        assert_eq!(engine.recognize_text(&rgba, 64, 64).unwrap().trim(), "");
    }
}
