//! Workflow controller
//!
//! Owns the session state and drives the collaborators. Every method runs on
//! the UI thread; asynchronous work is spawned on the tokio runtime and its
//! results come back as `WorkflowEvent`s that `pump` applies.

use crossbeam_channel::{unbounded, Receiver};
use std::collections::VecDeque;
use std::future::Future;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::collaborators::Collaborators;
use super::error::WorkflowError;
use super::events::{BusyIndicator, EventSink, Notice, RepaintHook, WorkflowEvent};
use super::phase::{Operation, Phase};
use super::state::SessionState;
use crate::capture::gallery::is_image_path;
use crate::capture::{ImageReference, ImageSource, PickOutcome};
use crate::languages::{LanguageCatalog, LanguageOption};
use crate::permissions::{required_permissions, StoragePolicy};
use crate::translation::DownloadConditions;
use crate::vision::InputImage;

pub const PREPARING_IMAGE_MESSAGE: &str = "Preparing Image...";
pub const RECOGNIZING_MESSAGE: &str = "Recognizing text...";
pub const PREPARING_MODEL_MESSAGE: &str = "Processing language model...";
pub const TRANSLATING_MESSAGE: &str = "Translating...";

/// Policy knobs for the workflow
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkflowSettings {
    pub storage_policy: StoragePolicy,
    pub download_conditions: DownloadConditions,
}

/// Which language selection a menu writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageSlot {
    Source,
    Target,
}

pub struct WorkflowController {
    session: SessionState,
    catalog: LanguageCatalog,
    collaborators: Collaborators,
    settings: WorkflowSettings,
    runtime: Handle,
    sink: EventSink,
    events: Receiver<WorkflowEvent>,
    /// Cancelled when the owning screen goes away
    lifetime: CancellationToken,
    phase: Phase,
    busy: Option<BusyIndicator>,
    notices: VecDeque<Notice>,
    pending_tasks: usize,
}

impl WorkflowController {
    pub fn new(
        session: SessionState,
        catalog: LanguageCatalog,
        collaborators: Collaborators,
        settings: WorkflowSettings,
        runtime: Handle,
    ) -> Self {
        let (tx, events) = unbounded();
        Self {
            session,
            catalog,
            collaborators,
            settings,
            runtime,
            sink: EventSink::new(tx, None),
            events,
            lifetime: CancellationToken::new(),
            phase: Phase::Idle,
            busy: None,
            notices: VecDeque::new(),
            pending_tasks: 0,
        }
    }

    /// Redraw the UI whenever a task reports back
    pub fn with_repaint_hook(mut self, hook: RepaintHook) -> Self {
        self.sink = self.sink.with_repaint(hook);
        self
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn catalog(&self) -> &LanguageCatalog {
        &self.catalog
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn busy(&self) -> Option<&BusyIndicator> {
        self.busy.as_ref()
    }

    pub fn has_pending_tasks(&self) -> bool {
        self.pending_tasks > 0
    }

    /// Drain the notices posted since the last call
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    /// Editable recognized text (the user may fix OCR mistakes)
    pub fn recognized_text_mut(&mut self) -> &mut String {
        &mut self.session.recognized_text
    }

    pub fn translated_text_mut(&mut self) -> &mut String {
        &mut self.session.translated_text
    }

    // ---------------------------------------------------------------------
    // Image acquisition
    // ---------------------------------------------------------------------

    /// Start acquiring an image from the camera or the gallery
    pub fn choose_image(&mut self, source: ImageSource) {
        if self.missing_permissions(source) {
            self.request_permissions(source);
        } else {
            self.launch_picker(source);
        }
    }

    /// Replace the current image without going through a picker
    pub fn adopt_image(&mut self, image: ImageReference) {
        info!("Image selected: {}", image);
        self.session.image = Some(image);
    }

    /// Adopt a file handed over outside the picker, such as a drop onto the window
    pub fn adopt_file(&mut self, path: PathBuf) -> Result<(), WorkflowError> {
        if !is_image_path(&path) {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            let error = WorkflowError::UnsupportedImage(name);
            warn!("Rejected dropped file {:?}", path);
            self.post(&error);
            return Err(error);
        }
        self.adopt_image(ImageReference::new(path));
        Ok(())
    }

    fn missing_permissions(&self, source: ImageSource) -> bool {
        required_permissions(source, self.settings.storage_policy)
            .into_iter()
            .any(|p| !self.collaborators.permissions.is_granted(p))
    }

    fn request_permissions(&mut self, source: ImageSource) {
        let permissions = required_permissions(source, self.settings.storage_policy);
        info!("Requesting permissions {:?} for {}", permissions, source.label());

        let gate = self.collaborators.permissions.clone();
        self.spawn(move |_| async move {
            let grants = gate.request(&permissions).await;
            WorkflowEvent::PermissionResult { source, grants }
        });
    }

    fn launch_picker(&mut self, source: ImageSource) {
        debug!("Launching {} picker", source.label());
        let picker = self.collaborators.picker.clone();
        self.spawn(move |_| async move {
            let result = picker.pick(source).await.map_err(|e| format!("{:#}", e));
            WorkflowEvent::PickCompleted { source, result }
        });
    }

    // ---------------------------------------------------------------------
    // Text recognition
    // ---------------------------------------------------------------------

    /// Recognize text in the selected image
    pub fn recognize(&mut self) -> Result<(), WorkflowError> {
        self.begin_validation(Operation::Recognition)?;

        let Some(image) = self.session.image.clone() else {
            return Err(self.reject(WorkflowError::NoImage));
        };

        self.enter_busy(Operation::Recognition, PREPARING_IMAGE_MESSAGE);
        info!("Recognizing text in {}", image);

        let recognizer = self.collaborators.recognizer.clone();
        self.spawn(move |sink| async move {
            let path = image.path().to_path_buf();
            let input = match tokio::task::spawn_blocking(move || InputImage::from_path(&path)).await {
                Ok(Ok(input)) => input,
                Ok(Err(e)) => {
                    return WorkflowEvent::Failed(WorkflowError::PrepareImage(format!("{:#}", e)))
                }
                Err(e) => return WorkflowEvent::Failed(WorkflowError::PrepareImage(e.to_string())),
            };

            sink.send(WorkflowEvent::BusyMessage(RECOGNIZING_MESSAGE));
            debug!("Running {} on {}x{} image", recognizer.name(), input.width, input.height);

            match recognizer.recognize(&input).await {
                Ok(text) => WorkflowEvent::Recognized(text),
                Err(e) => WorkflowEvent::Failed(WorkflowError::Recognition(format!("{:#}", e))),
            }
        });

        Ok(())
    }

    // ---------------------------------------------------------------------
    // Language selection
    // ---------------------------------------------------------------------

    pub fn select_source(&mut self, index: usize) -> Result<&LanguageOption, WorkflowError> {
        self.select_language(LanguageSlot::Source, index)
    }

    pub fn select_target(&mut self, index: usize) -> Result<&LanguageOption, WorkflowError> {
        self.select_language(LanguageSlot::Target, index)
    }

    /// Set a language selection to the catalog entry at `index`
    pub fn select_language(
        &mut self,
        slot: LanguageSlot,
        index: usize,
    ) -> Result<&LanguageOption, WorkflowError> {
        let Some(option) = self.catalog.get(index).cloned() else {
            return Err(WorkflowError::LanguageOutOfRange {
                index,
                len: self.catalog.len(),
            });
        };

        debug!("{:?} language: {} ({})", slot, option.code, option.title);
        let selection = match slot {
            LanguageSlot::Source => &mut self.session.source_language,
            LanguageSlot::Target => &mut self.session.target_language,
        };
        *selection = option;
        Ok(&*selection)
    }

    // ---------------------------------------------------------------------
    // Translation
    // ---------------------------------------------------------------------

    /// Translate the recognized text with the current language selection
    pub fn translate(&mut self) -> Result<(), WorkflowError> {
        self.begin_validation(Operation::Translation)?;

        let text = self.session.text_to_translate().to_string();
        debug!("Text to translate: {:?}", text);
        if text.is_empty() {
            return Err(self.reject(WorkflowError::EmptyText));
        }

        // Snapshot the selection so later menu changes cannot leak into this call
        let source = self.session.source_language.code.clone();
        let target = self.session.target_language.code.clone();
        let conditions = self.settings.download_conditions;
        let translator = self.collaborators.translation.translator(&source, &target);

        self.enter_busy(Operation::Translation, PREPARING_MODEL_MESSAGE);
        info!("Translating {} -> {}", source, target);

        self.spawn(move |sink| async move {
            if let Err(e) = translator.download_model_if_needed(&conditions).await {
                warn!("Model for {} -> {} not ready: {:#}", source, target, e);
                return WorkflowEvent::Failed(WorkflowError::ModelDownload(format!("{:#}", e)));
            }

            debug!("Model ready, translating");
            sink.send(WorkflowEvent::BusyMessage(TRANSLATING_MESSAGE));

            match translator.translate(&text).await {
                Ok(translated) => WorkflowEvent::Translated(translated),
                Err(e) => WorkflowEvent::Failed(WorkflowError::Translation(format!("{:#}", e))),
            }
        });

        Ok(())
    }

    // ---------------------------------------------------------------------
    // Event handling
    // ---------------------------------------------------------------------

    /// Apply every event that has arrived; returns how many were applied
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Block until no task is pending or the timeout elapses.
    ///
    /// Returns `false` on timeout. Intended for headless runs; the UI uses `pump`.
    pub fn settle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.pending_tasks > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.events.recv_timeout(remaining) {
                Ok(event) => self.apply(event),
                Err(_) => return false,
            }
        }
        // Intermediate events can still sit behind the last terminal one
        self.pump();
        true
    }

    fn apply(&mut self, event: WorkflowEvent) {
        if self.lifetime.is_cancelled() {
            return;
        }
        if event.is_terminal() {
            self.pending_tasks = self.pending_tasks.saturating_sub(1);
        }

        match event {
            WorkflowEvent::PermissionResult { source, grants } => {
                if grants.is_empty() {
                    debug!("Permission request for {} dismissed", source.label());
                    return;
                }
                if self.missing_permissions(source) {
                    warn!("Permissions for {} denied", source.label());
                    self.post(&WorkflowError::PermissionDenied(source));
                } else {
                    self.launch_picker(source);
                }
            }
            WorkflowEvent::PickCompleted { source, result } => match result {
                Ok(PickOutcome::Picked(image)) => {
                    info!("{} image picked: {}", source.label(), image);
                    self.session.image = Some(image);
                }
                Ok(PickOutcome::Cancelled) => {
                    debug!("{} pick cancelled", source.label());
                    self.post(&WorkflowError::PickCancelled);
                }
                Err(reason) => {
                    warn!("{} pick failed: {}", source.label(), reason);
                    self.post(&WorkflowError::PickFailed(reason));
                }
            },
            WorkflowEvent::BusyMessage(message) => {
                if let Some(busy) = self.busy.as_mut() {
                    busy.message = message;
                }
            }
            WorkflowEvent::Recognized(text) => {
                info!("Recognized {} characters", text.chars().count());
                self.session.recognized_text = text;
                self.finish(Phase::Done(Operation::Recognition));
            }
            WorkflowEvent::Translated(text) => {
                debug!("Translated text: {:?}", text);
                self.session.translated_text = text;
                self.finish(Phase::Done(Operation::Translation));
            }
            WorkflowEvent::Failed(error) => {
                warn!("Workflow step failed: {}", error);
                self.finish(Phase::Idle);
                self.post(&error);
            }
        }
    }

    // ---------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------

    /// Cancel all in-flight work; no further results are applied
    pub fn shutdown(&mut self) {
        if !self.lifetime.is_cancelled() {
            info!("Workflow shutting down with {} pending task(s)", self.pending_tasks);
            self.lifetime.cancel();
        }
        self.pending_tasks = 0;
        self.busy = None;
    }

    fn spawn<F, Fut>(&mut self, task: F)
    where
        F: FnOnce(EventSink) -> Fut,
        Fut: Future<Output = WorkflowEvent> + Send + 'static,
    {
        let sink = self.sink.clone();
        let token = self.lifetime.child_token();
        let work = task(sink.clone());
        self.pending_tasks += 1;

        self.runtime.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => debug!("Workflow task cancelled"),
                event = work => sink.send(event),
            }
        });
    }

    fn begin_validation(&mut self, operation: Operation) -> Result<(), WorkflowError> {
        if self.phase.is_busy() {
            return Err(WorkflowError::Busy);
        }
        self.transition(Phase::Validating(operation));
        Ok(())
    }

    /// Reject a request during validation
    fn reject(&mut self, error: WorkflowError) -> WorkflowError {
        self.transition(Phase::Idle);
        self.post(&error);
        error
    }

    fn enter_busy(&mut self, operation: Operation, message: &'static str) {
        self.transition(Phase::Busy(operation));
        self.busy = Some(BusyIndicator::new(message));
    }

    fn finish(&mut self, next: Phase) {
        self.busy = None;
        self.transition(next);
    }

    fn transition(&mut self, next: Phase) {
        if !self.phase.can_transition_to(next) {
            warn!("Unexpected workflow transition {} -> {}", self.phase, next);
        }
        debug!("Workflow phase {} -> {}", self.phase, next);
        self.phase = next;
    }

    fn post(&mut self, error: &WorkflowError) {
        self.notices.push_back(Notice::from(error));
    }
}

impl Drop for WorkflowController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
