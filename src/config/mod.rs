//! Application Configuration
//!
//! User settings and preferences stored in TOML format.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::permissions::{Permission, StoragePolicy};
use crate::translation::{DownloadConditions, NetworkKind};
use crate::vision::OcrBackend;
use crate::workflow::WorkflowSettings;

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General settings
    pub general: GeneralConfig,
    /// Text recognition settings
    pub ocr: OcrSettings,
    /// Translation server settings
    pub translation: TranslationSettings,
    /// Camera capture settings
    pub camera: CameraSettings,
    /// Permission state
    pub permissions: PermissionSettings,
}

impl AppConfig {
    /// Settings the workflow controller runs with
    pub fn workflow_settings(&self) -> WorkflowSettings {
        WorkflowSettings {
            storage_policy: self.permissions.storage_policy,
            download_conditions: DownloadConditions {
                require_unmetered: self.translation.require_unmetered,
            },
        }
    }
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Language code preselected as the source
    pub source_language: String,
    /// Language code preselected as the target
    pub target_language: String,
    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            source_language: "en".to_string(),
            target_language: "uk".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// OCR-related settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    pub backend: OcrBackend,
    /// BCP-47 tag for Windows OCR
    pub language: String,
    /// Tesseract executable name or path
    pub tesseract_path: String,
    /// Tesseract traineddata name(s), e.g. "eng" or "eng+ukr"
    pub tesseract_language: String,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            backend: OcrBackend::default(),
            language: "en-US".to_string(),
            tesseract_path: "tesseract".to_string(),
            tesseract_language: "eng".to_string(),
        }
    }
}

/// Translation server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationSettings {
    /// Base URL of a LibreTranslate-compatible server
    pub endpoint: String,
    pub api_key: Option<String>,
    /// Only prepare language models on an unmetered connection
    pub require_unmetered: bool,
    /// Connection kind this machine is on
    pub network: NetworkKind,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TranslationSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5000".to_string(),
            api_key: None,
            require_unmetered: true,
            network: NetworkKind::default(),
            timeout_secs: 30,
        }
    }
}

/// Camera capture settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Capture program and arguments; `{output}` is replaced by the target file
    pub command: Vec<String>,
}

impl Default for CameraSettings {
    fn default() -> Self {
        let command: &[&str] = if cfg!(target_os = "linux") {
            &["fswebcam", "--no-banner", "-r", "1280x720", "{output}"]
        } else if cfg!(target_os = "macos") {
            &["imagesnap", "-w", "1", "{output}"]
        } else {
            &[]
        };
        Self {
            command: command.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Permission state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionSettings {
    pub storage_policy: StoragePolicy,
    /// Permissions the user already granted
    pub granted: Vec<Permission>,
}

/// How the configuration for this run was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Read from the file
    Loaded,
    /// No file at the path yet
    Missing,
    /// The file exists but could not be used; it must not be overwritten
    Invalid(String),
}

/// Configuration together with where it came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub origin: ConfigOrigin,
}

impl LoadedConfig {
    /// Whether settings may be written back to the source file
    pub fn is_writable(&self) -> bool {
        !matches!(self.origin, ConfigOrigin::Invalid(_))
    }
}

/// Load the file at `path`, falling back to defaults when it is missing or invalid
pub fn load_or_default(path: &Path) -> LoadedConfig {
    if !path.exists() {
        return LoadedConfig {
            config: AppConfig::default(),
            origin: ConfigOrigin::Missing,
        };
    }
    match load_config(path) {
        Ok(config) => LoadedConfig {
            config,
            origin: ConfigOrigin::Loaded,
        },
        Err(e) => LoadedConfig {
            config: AppConfig::default(),
            origin: ConfigOrigin::Invalid(format!("{:#}", e)),
        },
    }
}

/// Write granted permissions back to `path` if they changed.
///
/// Returns whether the file was written. An invalid source file is left untouched.
pub fn persist_grants(loaded: &LoadedConfig, path: &Path, mut granted: Vec<Permission>) -> Result<bool> {
    if !loaded.is_writable() {
        return Ok(false);
    }

    let mut known = loaded.config.permissions.granted.clone();
    known.sort_by_key(|p| p.display_name());
    granted.sort_by_key(|p| p.display_name());
    if granted == known {
        return Ok(false);
    }

    let mut updated = loaded.config.clone();
    updated.permissions.granted = granted;
    save_config(&updated, path)?;
    Ok(true)
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
