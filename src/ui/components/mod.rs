//! Reusable UI components

pub mod busy_modal;
pub mod consent_dialog;
pub mod status_card;
pub mod toasts;

pub use busy_modal::show_busy_modal;
pub use consent_dialog::show_consent_dialog;
pub use status_card::{CardStatus, StatusCard};
pub use toasts::Toasts;
