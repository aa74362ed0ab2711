//! Workflow error taxonomy
//!
//! The `Display` text of each variant is the notice shown to the user.

use thiserror::Error;

use crate::capture::ImageSource;
use crate::permissions::denied_message;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Pick Image First...")]
    NoImage,

    #[error("Enter text to translate...")]
    EmptyText,

    #[error("{}", permission_denied(.0))]
    PermissionDenied(ImageSource),

    #[error("Cancelled...")]
    PickCancelled,

    #[error("{0} is not a supported image file")]
    UnsupportedImage(String),

    #[error("Failed to pick image due to {0}")]
    PickFailed(String),

    #[error("Failed to prepare image due to {0}")]
    PrepareImage(String),

    #[error("Failed to recognize text due to {0}")]
    Recognition(String),

    #[error("Failed due to {0}")]
    ModelDownload(String),

    #[error("Failed to translate due to {0}")]
    Translation(String),

    #[error("Language position {index} is outside the catalog of {len} languages")]
    LanguageOutOfRange { index: usize, len: usize },

    #[error("Please wait for the current operation to finish")]
    Busy,
}

fn permission_denied(source: &ImageSource) -> &'static str {
    denied_message(*source)
}

impl WorkflowError {
    /// Precondition failures are reported as info, everything else as an error
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            WorkflowError::NoImage
                | WorkflowError::EmptyText
                | WorkflowError::PickCancelled
                | WorkflowError::UnsupportedImage(_)
                | WorkflowError::Busy
                | WorkflowError::LanguageOutOfRange { .. }
        )
    }
}
