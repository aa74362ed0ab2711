//! Application Coordinator
//!
//! Builds the collaborators from the configuration once and hands out
//! workflow controllers wired to them, for both the GUI and headless runs.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::info;

use crate::capture::{CommandCamera, DesktopImagePicker, GalleryPicker};
use crate::config::AppConfig;
use crate::languages::{BundledLanguages, LanguageCatalog};
use crate::permissions::ConsentGate;
use crate::storage;
use crate::translation::{HttpTranslationService, ModelManager, TranslationClient};
use crate::vision;
use crate::workflow::{
    Collaborators, LanguageCatalogSource, RepaintHook, SessionState, WorkflowController,
    WorkflowSettings,
};

/// Long-lived services shared by every workflow screen
pub struct AppServices {
    collaborators: Collaborators,
    /// Concrete gate, kept for the consent dialog
    consent: Arc<ConsentGate>,
    catalog_source: Arc<dyn LanguageCatalogSource>,
    settings: WorkflowSettings,
    source_language: String,
    target_language: String,
}

impl AppServices {
    /// Wire up the desktop collaborators described by the configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let captures_dir = storage::get_captures_dir()?;
        let camera = CommandCamera::new(config.camera.command.clone(), captures_dir);
        let gallery = match dirs_pictures() {
            Some(dir) => GalleryPicker::new().with_start_dir(dir),
            None => GalleryPicker::new(),
        };
        let picker = Arc::new(DesktopImagePicker::new(camera, gallery));

        let consent = Arc::new(ConsentGate::new(
            config.permissions.storage_policy,
            config.permissions.granted.iter().copied(),
        ));

        let recognizer = vision::build_recognizer(&config.ocr)?;

        let client = TranslationClient::new(
            &config.translation.endpoint,
            config.translation.api_key.clone(),
            config.translation.timeout(),
        )
        .context("Failed to create translation client")?;
        let models = Arc::new(ModelManager::new()?);
        let translation = Arc::new(HttpTranslationService::new(
            client,
            models,
            config.translation.network,
        ));

        info!("Services ready (OCR: {})", recognizer.name());

        Ok(Self {
            collaborators: Collaborators {
                picker,
                permissions: consent.clone(),
                recognizer,
                translation,
            },
            consent,
            catalog_source: Arc::new(BundledLanguages),
            settings: config.workflow_settings(),
            source_language: config.general.source_language.clone(),
            target_language: config.general.target_language.clone(),
        })
    }

    pub fn consent(&self) -> &Arc<ConsentGate> {
        &self.consent
    }

    /// Start a fresh workflow session; the catalog is loaded here and fixed for its lifetime
    pub fn new_controller(&self, runtime: Handle, repaint: Option<RepaintHook>) -> WorkflowController {
        self.controller_with_languages(runtime, repaint, &self.source_language, &self.target_language)
    }

    /// Like `new_controller` but with explicit default language codes
    pub fn controller_with_languages(
        &self,
        runtime: Handle,
        repaint: Option<RepaintHook>,
        source: &str,
        target: &str,
    ) -> WorkflowController {
        let catalog = LanguageCatalog::load(self.catalog_source.as_ref());
        let session = SessionState::with_defaults(&catalog, source, target);
        let controller = WorkflowController::new(
            session,
            catalog,
            self.collaborators.clone(),
            self.settings,
            runtime,
        );
        match repaint {
            Some(hook) => controller.with_repaint_hook(hook),
            None => controller,
        }
    }
}

fn dirs_pictures() -> Option<std::path::PathBuf> {
    directories::UserDirs::new().and_then(|dirs| dirs.picture_dir().map(|p| p.to_path_buf()))
}
