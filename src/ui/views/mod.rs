//! UI screens

pub mod launcher;
pub mod workflow;

pub use launcher::render_launcher_view;
pub use workflow::{render_workflow_view, WorkflowViewAction};
