//! Camera capture through an external command
//!
//! The output file is reserved before the command starts and is only handed
//! out as an image reference once the command reports success and the file
//! holds data.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::{ImageReference, PickOutcome};

/// Placeholder replaced with the reserved output path
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Runs a capture command such as `fswebcam` or `imagesnap`
#[derive(Debug, Clone)]
pub struct CommandCamera {
    command: Vec<String>,
    captures_dir: PathBuf,
}

impl CommandCamera {
    pub fn new(command: Vec<String>, captures_dir: PathBuf) -> Self {
        Self {
            command,
            captures_dir,
        }
    }

    /// Reserve a fresh output path in the captures directory
    pub fn reserve_output(&self) -> PathBuf {
        self.captures_dir
            .join(format!("capture-{}.jpg", uuid::Uuid::new_v4()))
    }

    /// Take a photo and return its reference
    pub async fn capture(&self) -> Result<PickOutcome> {
        let Some((program, args)) = self.command.split_first() else {
            anyhow::bail!("No camera command configured");
        };

        std::fs::create_dir_all(&self.captures_dir)
            .context("Failed to create captures directory")?;
        let output = self.reserve_output();
        let args = expand_args(args, &output);

        info!("Launching camera: {} {:?}", program, args);
        let status = Command::new(program)
            .args(&args)
            .status()
            .await
            .with_context(|| format!("Failed to launch camera command '{}'", program))?;

        if status.success() && has_data(&output) {
            info!("Camera capture saved to {:?}", output);
            return Ok(PickOutcome::Picked(ImageReference::new(output)));
        }

        debug!("Camera command finished with {} and no image", status);
        if output.exists() {
            if let Err(e) = std::fs::remove_file(&output) {
                warn!("Failed to remove empty capture {:?}: {}", output, e);
            }
        }
        Ok(PickOutcome::Cancelled)
    }
}

fn expand_args(args: &[String], output: &Path) -> Vec<String> {
    let output = output.display().to_string();
    args.iter()
        .map(|arg| arg.replace(OUTPUT_PLACEHOLDER, &output))
        .collect()
}

fn has_data(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false)
}
