//! Tesseract OCR backend
//!
//! Runs the `tesseract` executable on the source image file and reads the
//! recognized text from its stdout.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::InputImage;
use crate::workflow::TextRecognizer;

pub struct TesseractRecognizer {
    executable: String,
    language: String,
}

impl TesseractRecognizer {
    pub fn new(executable: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            language: language.into(),
        }
    }

    fn command(&self, image: &InputImage) -> Command {
        let mut command = Command::new(&self.executable);
        command
            .arg(&image.source)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language);
        command
    }
}

#[async_trait]
impl TextRecognizer for TesseractRecognizer {
    fn name(&self) -> &'static str {
        "Tesseract"
    }

    async fn recognize(&self, image: &InputImage) -> Result<String> {
        if image.is_empty() {
            return Ok(String::new());
        }

        let output = self
            .command(image)
            .output()
            .await
            .with_context(|| format!("failed to run {}", self.executable))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("tesseract exited with {}: {}", output.status, stderr.trim());
        }

        let text = normalize_output(&String::from_utf8_lossy(&output.stdout));
        debug!("Tesseract recognized {} lines", text.lines().count());
        Ok(text)
    }
}

/// Trim trailing whitespace per line and drop the form-feed page separator
fn normalize_output(raw: &str) -> String {
    let lines: Vec<&str> = raw
        .split('\u{c}')
        .flat_map(str::lines)
        .map(str::trim_end)
        .collect();
    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_normalize_output() {
        assert_eq!(normalize_output("Hello  \nWorld\n\n\u{c}"), "Hello\nWorld");
        assert_eq!(normalize_output("\u{c}"), "");
    }

    #[test]
    fn test_empty_image_short_circuits() {
        let recognizer = TesseractRecognizer::new("definitely-not-installed", "eng");
        let image = InputImage {
            source: PathBuf::from("x.png"),
            width: 0,
            height: 0,
            rgba: Vec::new(),
        };
        let rt = tokio::runtime::Runtime::new().unwrap();
        assert_eq!(rt.block_on(recognizer.recognize(&image)).unwrap(), "");
    }

    #[test]
    fn test_missing_executable_is_an_error() {
        let recognizer = TesseractRecognizer::new("definitely-not-installed-ocr", "eng");
        let image = InputImage {
            source: PathBuf::from("x.png"),
            width: 1,
            height: 1,
            rgba: vec![0, 0, 0, 255],
        };
        let rt = tokio::runtime::Runtime::new().unwrap();
        let err = rt.block_on(recognizer.recognize(&image)).unwrap_err();
        assert!(format!("{:#}", err).contains("definitely-not-installed-ocr"));
    }
}
