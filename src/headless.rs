//! Headless mode
//!
//! Drives the same workflow controller as the GUI from the command line:
//! adopt an image, recognize its text, translate it, print both.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::info;

use crate::app::AppServices;
use crate::capture::ImageReference;
use crate::config::AppConfig;
use crate::languages::{BundledLanguages, LanguageCatalog};
use crate::translation::TranslationClient;
use crate::workflow::{LanguageSlot, NoticeLevel, WorkflowController};

/// Inputs for one headless translation
#[derive(Debug, Clone)]
pub struct HeadlessRequest {
    pub image: PathBuf,
    pub source: Option<String>,
    pub target: Option<String>,
    /// Upper bound for each workflow step
    pub step_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessOutput {
    pub source: String,
    pub target: String,
    pub recognized: String,
    pub translated: String,
}

/// Recognize and translate one image, printing the result
pub fn run(services: &AppServices, runtime: &Runtime, request: HeadlessRequest) -> Result<()> {
    let mut controller = services.new_controller(runtime.handle().clone(), None);
    let output = run_pipeline(&mut controller, &request)?;

    println!("[{}] {}", output.source, output.recognized);
    println!("[{}] {}", output.target, output.translated);
    Ok(())
}

/// Run recognition then translation on a controller and collect the texts
pub fn run_pipeline(controller: &mut WorkflowController, request: &HeadlessRequest) -> Result<HeadlessOutput> {
    if let Some(code) = &request.source {
        select(controller, LanguageSlot::Source, code)?;
    }
    if let Some(code) = &request.target {
        select(controller, LanguageSlot::Target, code)?;
    }

    controller.adopt_image(ImageReference::new(&request.image));

    controller.recognize()?;
    wait(controller, request.step_timeout, "recognition")?;
    info!("Recognized {} characters", controller.session().recognized_text.len());

    controller.translate()?;
    wait(controller, request.step_timeout, "translation")?;

    let session = controller.session();
    Ok(HeadlessOutput {
        source: session.source_language.code.clone(),
        target: session.target_language.code.clone(),
        recognized: session.recognized_text.clone(),
        translated: session.translated_text.clone(),
    })
}

fn select(controller: &mut WorkflowController, slot: LanguageSlot, code: &str) -> Result<()> {
    let index = controller
        .catalog()
        .position(code)
        .with_context(|| format!("Unknown language code '{}'", code))?;
    controller.select_language(slot, index)?;
    Ok(())
}

/// Wait for the running step and surface its failure notice as an error
fn wait(controller: &mut WorkflowController, timeout: Duration, step: &str) -> Result<()> {
    if !controller.settle(timeout) {
        bail!("Timed out waiting for {}", step);
    }
    if let Some(error) = controller
        .take_notices()
        .into_iter()
        .find(|n| n.level == NoticeLevel::Error)
    {
        bail!(error.message);
    }
    Ok(())
}

/// Print the language catalog, bundled or as reported by the translation server
pub fn list_languages(config: &AppConfig, runtime: &Runtime, remote: bool) -> Result<()> {
    if remote {
        let client = TranslationClient::new(
            &config.translation.endpoint,
            config.translation.api_key.clone(),
            config.translation.timeout(),
        )?;
        let languages = runtime
            .block_on(client.languages())
            .with_context(|| format!("Failed to list languages from {}", client.endpoint()))?;
        for language in languages {
            println!("{:<6}{}", language.code, language.name);
        }
        return Ok(());
    }

    let catalog = LanguageCatalog::load(&BundledLanguages);
    for language in catalog.iter() {
        println!("{:<6}{}", language.code, language.title);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::fakes::{
        sample_catalog, write_test_image, FakeGate, FakePicker, FakeRecognizer, FakeTranslation,
    };
    use crate::workflow::{Collaborators, SessionState, WorkflowSettings};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn controller(
        runtime: &Runtime,
        recognizer: FakeRecognizer,
        translation: Arc<FakeTranslation>,
    ) -> WorkflowController {
        WorkflowController::new(
            SessionState::default(),
            sample_catalog(),
            Collaborators {
                picker: Arc::new(FakePicker::default()),
                permissions: Arc::new(FakeGate::granting_all()),
                recognizer: Arc::new(recognizer),
                translation,
            },
            WorkflowSettings::default(),
            runtime.handle().clone(),
        )
    }

    fn request(image: PathBuf) -> HeadlessRequest {
        HeadlessRequest {
            image,
            source: None,
            target: Some("de".to_string()),
            step_timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_pipeline_recognizes_then_translates() {
        let runtime = Runtime::new().unwrap();
        let dir = TempDir::new().unwrap();
        let image = write_test_image(dir.path());
        let translation = Arc::new(FakeTranslation::returning("Hallo"));
        let mut controller = controller(&runtime, FakeRecognizer::returning(" Hello "), translation.clone());

        let output = run_pipeline(&mut controller, &request(image.path().to_path_buf())).unwrap();

        assert_eq!(output.source, "en");
        assert_eq!(output.target, "de");
        assert_eq!(output.recognized, " Hello ");
        assert_eq!(output.translated, "Hallo");
        assert_eq!(translation.pairs(), vec![("en".to_string(), "de".to_string())]);
        assert_eq!(translation.translated_texts(), vec!["Hello".to_string()]);
    }

    #[test]
    fn test_recognition_failure_stops_pipeline() {
        let runtime = Runtime::new().unwrap();
        let dir = TempDir::new().unwrap();
        let image = write_test_image(dir.path());
        let translation = Arc::new(FakeTranslation::returning("Hallo"));
        let mut controller = controller(&runtime, FakeRecognizer::failing("engine offline"), translation.clone());

        let err = run_pipeline(&mut controller, &request(image.path().to_path_buf())).unwrap_err();

        assert!(err.to_string().starts_with("Failed to recognize text due to"));
        assert!(translation.pairs().is_empty());
    }

    #[test]
    fn test_unknown_language_code_is_rejected() {
        let runtime = Runtime::new().unwrap();
        let translation = Arc::new(FakeTranslation::returning("Hallo"));
        let mut controller = controller(&runtime, FakeRecognizer::returning("Hello"), translation);

        let mut request = request(PathBuf::from("unused.png"));
        request.target = Some("xx".to_string());
        let err = run_pipeline(&mut controller, &request).unwrap_err();
        assert_eq!(err.to_string(), "Unknown language code 'xx'");
    }

    #[test]
    fn test_no_text_is_an_error() {
        let runtime = Runtime::new().unwrap();
        let dir = TempDir::new().unwrap();
        let image = write_test_image(dir.path());
        let translation = Arc::new(FakeTranslation::returning("Hallo"));
        let mut controller = controller(&runtime, FakeRecognizer::returning("   "), translation.clone());

        let err = run_pipeline(&mut controller, &request(image.path().to_path_buf())).unwrap_err();
        assert_eq!(err.to_string(), "Enter text to translate...");
        assert!(translation.pairs().is_empty());
    }
}
