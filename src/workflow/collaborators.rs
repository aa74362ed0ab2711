//! Contracts for the external engines the workflow drives

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::capture::{ImageSource, PickOutcome};
use crate::permissions::{Permission, PermissionGrant};
use crate::translation::DownloadConditions;
use crate::vision::InputImage;

/// Text recognition engine
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Recognize all text in the image, possibly returning an empty string
    async fn recognize(&self, image: &InputImage) -> Result<String>;
}

/// Builds translators for a language pair
pub trait TranslationService: Send + Sync {
    fn translator(&self, source: &str, target: &str) -> Box<dyn Translator>;
}

/// Translator bound to one language pair
#[async_trait]
pub trait Translator: Send + Sync {
    /// Make the pair's model available locally, honouring the conditions
    async fn download_model_if_needed(&self, conditions: &DownloadConditions) -> Result<()>;

    async fn translate(&self, text: &str) -> Result<String>;
}

/// Provides the supported language codes
pub trait LanguageCatalogSource: Send + Sync {
    fn language_codes(&self) -> Vec<String>;
}

/// Camera and gallery flows
#[async_trait]
pub trait ImagePicker: Send + Sync {
    async fn pick(&self, source: ImageSource) -> Result<PickOutcome>;
}

/// Runtime permission checks and requests
#[async_trait]
pub trait PermissionGate: Send + Sync {
    fn is_granted(&self, permission: Permission) -> bool;

    /// Ask for permissions; an empty answer means the request was dismissed
    async fn request(&self, permissions: &[Permission]) -> Vec<PermissionGrant>;
}

/// The collaborators a workflow controller is wired to
#[derive(Clone)]
pub struct Collaborators {
    pub picker: Arc<dyn ImagePicker>,
    pub permissions: Arc<dyn PermissionGate>,
    pub recognizer: Arc<dyn TextRecognizer>,
    pub translation: Arc<dyn TranslationService>,
}
