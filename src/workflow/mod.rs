//! Image-to-translation workflow
//!
//! A UI-independent controller over an injectable session state. The egui
//! workflow screen and the headless CLI both drive it:
//!
//! pick image -> recognize text -> choose languages -> translate

pub mod collaborators;
pub mod controller;
pub mod error;
pub mod events;
pub mod phase;
pub mod state;

#[cfg(test)]
pub mod fakes;

pub use collaborators::{
    Collaborators, ImagePicker, LanguageCatalogSource, PermissionGate, TextRecognizer,
    TranslationService, Translator,
};
pub use controller::{LanguageSlot, WorkflowController, WorkflowSettings};
pub use error::WorkflowError;
pub use events::{BusyIndicator, Notice, NoticeLevel, RepaintHook, WorkflowEvent};
pub use phase::{Operation, Phase};
pub use state::SessionState;
