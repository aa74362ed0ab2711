//! Gallery picker backed by the native file dialog

use anyhow::Result;
use std::path::Path;
use tracing::info;

use super::{ImageReference, PickOutcome};

/// Extensions offered by the picker dialog
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "webp", "tif", "tiff"];

/// Whether the file name carries one of the image extensions
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(ext)))
}

/// Picks an existing image file from disk
#[derive(Debug, Clone, Default)]
pub struct GalleryPicker {
    start_dir: Option<std::path::PathBuf>,
}

impl GalleryPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the dialog in a specific directory
    pub fn with_start_dir(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
        self.start_dir = Some(dir.into());
        self
    }

    /// Show the file dialog and wait for the user
    pub async fn pick(&self) -> Result<PickOutcome> {
        let mut dialog = rfd::AsyncFileDialog::new()
            .set_title("Select Image")
            .add_filter("Images", IMAGE_EXTENSIONS);
        if let Some(dir) = &self.start_dir {
            dialog = dialog.set_directory(dir);
        }

        match dialog.pick_file().await {
            Some(handle) => {
                let path = handle.path().to_path_buf();
                info!("Gallery image picked: {:?}", path);
                Ok(PickOutcome::Picked(ImageReference::new(path)))
            }
            None => Ok(PickOutcome::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extensions_match_any_case() {
        assert!(is_image_path(Path::new("/tmp/menu.png")));
        assert!(is_image_path(Path::new("scan.JPEG")));
        assert!(is_image_path(Path::new("page.Tiff")));
    }

    #[test]
    fn test_other_files_are_not_images() {
        assert!(!is_image_path(Path::new("notes.txt")));
        assert!(!is_image_path(Path::new("archive.png.zip")));
        assert!(!is_image_path(Path::new("README")));
        assert!(!is_image_path(Path::new("/tmp/photos")));
    }
}
