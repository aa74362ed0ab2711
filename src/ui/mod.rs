//! Desktop UI Module
//!
//! eframe application with a launcher screen and the translation workflow
//! screen.

pub mod app;
pub mod components;
pub mod theme;
pub mod views;

pub use app::{run_app, TranslatorApp};
