//! Scripted collaborators for workflow tests

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

use super::collaborators::{ImagePicker, PermissionGate, TextRecognizer, TranslationService, Translator};
use crate::capture::{ImageReference, ImageSource, PickOutcome};
use crate::languages::{LanguageCatalog, LanguageOption};
use crate::permissions::{Permission, PermissionGrant};
use crate::translation::DownloadConditions;
use crate::vision::InputImage;

pub fn sample_catalog() -> LanguageCatalog {
    LanguageCatalog::from_options(vec![
        LanguageOption::new("en", "English"),
        LanguageOption::new("uk", "Ukrainian"),
        LanguageOption::new("de", "German"),
    ])
}

/// Write a small PNG into `dir` and return its reference
pub fn write_test_image(dir: &Path) -> ImageReference {
    let path = dir.join("sample.png");
    let image = image::RgbaImage::from_pixel(8, 4, image::Rgba([255, 255, 255, 255]));
    image.save(&path).expect("write test image");
    ImageReference::new(path)
}

/// Picker returning queued outcomes, `Cancelled` once the queue is empty
#[derive(Default)]
pub struct FakePicker {
    outcomes: Mutex<VecDeque<Result<PickOutcome, String>>>,
    sources: Mutex<Vec<ImageSource>>,
}

impl FakePicker {
    pub fn push(&self, outcome: Result<PickOutcome, String>) {
        self.outcomes.lock().push_back(outcome);
    }

    pub fn sources(&self) -> Vec<ImageSource> {
        self.sources.lock().clone()
    }
}

#[async_trait]
impl ImagePicker for FakePicker {
    async fn pick(&self, source: ImageSource) -> Result<PickOutcome> {
        self.sources.lock().push(source);
        match self.outcomes.lock().pop_front() {
            Some(Ok(outcome)) => Ok(outcome),
            Some(Err(reason)) => Err(anyhow!(reason)),
            None => Ok(PickOutcome::Cancelled),
        }
    }
}

enum GateAnswer {
    Allow,
    Deny,
    Dismiss,
}

/// Permission gate with a scripted answer to every request
pub struct FakeGate {
    granted: Mutex<HashSet<Permission>>,
    answer: GateAnswer,
    requests: Mutex<Vec<Vec<Permission>>>,
}

impl FakeGate {
    pub fn granting_all() -> Self {
        Self {
            granted: Mutex::new([Permission::Camera, Permission::Storage].into_iter().collect()),
            answer: GateAnswer::Allow,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Nothing granted up front; requests are allowed or denied
    pub fn answering(allow: bool) -> Self {
        Self {
            granted: Mutex::new(HashSet::new()),
            answer: if allow { GateAnswer::Allow } else { GateAnswer::Deny },
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn dismissing() -> Self {
        Self {
            granted: Mutex::new(HashSet::new()),
            answer: GateAnswer::Dismiss,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<Vec<Permission>> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl PermissionGate for FakeGate {
    fn is_granted(&self, permission: Permission) -> bool {
        self.granted.lock().contains(&permission)
    }

    async fn request(&self, permissions: &[Permission]) -> Vec<PermissionGrant> {
        self.requests.lock().push(permissions.to_vec());
        match self.answer {
            GateAnswer::Dismiss => Vec::new(),
            GateAnswer::Allow => {
                self.granted.lock().extend(permissions.iter().copied());
                permissions
                    .iter()
                    .map(|&permission| PermissionGrant { permission, granted: true })
                    .collect()
            }
            GateAnswer::Deny => permissions
                .iter()
                .map(|&permission| PermissionGrant { permission, granted: false })
                .collect(),
        }
    }
}

/// Recognizer returning a fixed result
pub struct FakeRecognizer {
    result: Result<String, String>,
    gate: Option<Arc<Semaphore>>,
    calls: AtomicUsize,
}

impl FakeRecognizer {
    pub fn returning(text: &str) -> Self {
        Self {
            result: Ok(text.to_string()),
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            result: Err(reason.to_string()),
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Hold every recognize call until `release` is called
    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextRecognizer for FakeRecognizer {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn recognize(&self, _image: &InputImage) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire().await?.forget();
        }
        self.result.clone().map_err(|reason| anyhow!(reason))
    }
}

#[derive(Default)]
struct TranslationLog {
    pairs: Mutex<Vec<(String, String)>>,
    conditions: Mutex<Vec<DownloadConditions>>,
    downloads: AtomicUsize,
    texts: Mutex<Vec<String>>,
}

/// Translation service with scripted model and translate results
pub struct FakeTranslation {
    model: Result<(), String>,
    result: Result<String, String>,
    gate: Option<Arc<Semaphore>>,
    log: Arc<TranslationLog>,
}

impl FakeTranslation {
    pub fn returning(text: &str) -> Self {
        Self {
            model: Ok(()),
            result: Ok(text.to_string()),
            gate: None,
            log: Arc::default(),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            result: Err(reason.to_string()),
            ..Self::returning("")
        }
    }

    pub fn model_unavailable(reason: &str) -> Self {
        Self {
            model: Err(reason.to_string()),
            ..Self::returning("unused")
        }
    }

    /// Hold every translate call until `release` is called
    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub fn pairs(&self) -> Vec<(String, String)> {
        self.log.pairs.lock().clone()
    }

    pub fn conditions(&self) -> Vec<DownloadConditions> {
        self.log.conditions.lock().clone()
    }

    pub fn downloads(&self) -> usize {
        self.log.downloads.load(Ordering::SeqCst)
    }

    pub fn translated_texts(&self) -> Vec<String> {
        self.log.texts.lock().clone()
    }
}

impl TranslationService for FakeTranslation {
    fn translator(&self, source: &str, target: &str) -> Box<dyn Translator> {
        self.log
            .pairs
            .lock()
            .push((source.to_string(), target.to_string()));
        Box::new(FakeTranslator {
            model: self.model.clone(),
            result: self.result.clone(),
            gate: self.gate.clone(),
            log: self.log.clone(),
        })
    }
}

struct FakeTranslator {
    model: Result<(), String>,
    result: Result<String, String>,
    gate: Option<Arc<Semaphore>>,
    log: Arc<TranslationLog>,
}

#[async_trait]
impl Translator for FakeTranslator {
    async fn download_model_if_needed(&self, conditions: &DownloadConditions) -> Result<()> {
        self.log.downloads.fetch_add(1, Ordering::SeqCst);
        self.log.conditions.lock().push(*conditions);
        self.model.clone().map_err(|reason| anyhow!(reason))
    }

    async fn translate(&self, text: &str) -> Result<String> {
        if let Some(gate) = &self.gate {
            gate.acquire().await?.forget();
        }
        self.log.texts.lock().push(text.to_string());
        self.result.clone().map_err(|reason| anyhow!(reason))
    }
}
