//! Image Acquisition Layer
//!
//! Image sources the workflow can pick from: the native file dialog for the
//! gallery and an external capture command for the camera.

pub mod camera;
pub mod gallery;

pub use camera::CommandCamera;
pub use gallery::GalleryPicker;

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::workflow::collaborators::ImagePicker;

/// Where a new image comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    Camera,
    Gallery,
}

impl ImageSource {
    pub fn label(&self) -> &'static str {
        match self {
            ImageSource::Camera => "Camera",
            ImageSource::Gallery => "Gallery",
        }
    }
}

/// Handle to the currently selected image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference(PathBuf);

impl ImageReference {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// URI understood by the egui image loaders
    pub fn uri(&self) -> String {
        format!("file://{}", self.0.display())
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Result of a picker flow that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    Picked(ImageReference),
    Cancelled,
}

/// Picker dispatching to the desktop camera and gallery implementations
pub struct DesktopImagePicker {
    camera: CommandCamera,
    gallery: GalleryPicker,
}

impl DesktopImagePicker {
    pub fn new(camera: CommandCamera, gallery: GalleryPicker) -> Self {
        Self { camera, gallery }
    }
}

#[async_trait]
impl ImagePicker for DesktopImagePicker {
    async fn pick(&self, source: ImageSource) -> Result<PickOutcome> {
        match source {
            ImageSource::Camera => self.camera.capture().await,
            ImageSource::Gallery => self.gallery.pick().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_reference_uri() {
        let reference = ImageReference::new("/tmp/photo.png");
        assert_eq!(reference.uri(), "file:///tmp/photo.png");
        assert_eq!(reference.path(), Path::new("/tmp/photo.png"));
    }

    #[test]
    fn test_source_labels() {
        assert_eq!(ImageSource::Camera.label(), "Camera");
        assert_eq!(ImageSource::Gallery.label(), "Gallery");
    }
}
