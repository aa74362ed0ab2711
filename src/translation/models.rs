//! Translation model bookkeeping
//!
//! Tracks which language pairs have been prepared so later translations skip
//! the readiness round-trip. The manifest is a JSON file in the models
//! directory.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const MANIFEST_FILE: &str = "manifest.json";

/// Model manifest tracking prepared pairs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelManifest {
    pub version: String,
    pub pairs: Vec<PreparedPair>,
}

impl Default for ModelManifest {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            pairs: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedPair {
    pub source: String,
    pub target: String,
    /// Server the pair was confirmed against
    pub endpoint: String,
    /// Unix timestamp (seconds)
    pub prepared_at: u64,
}

/// Keeps the manifest of prepared language pairs
pub struct ModelManager {
    models_dir: PathBuf,
    manifest: Mutex<ModelManifest>,
}

impl ModelManager {
    /// Create a manager in the default models directory
    pub fn new() -> Result<Self> {
        Self::with_dir(crate::storage::get_models_dir()?)
    }

    /// Create a manager with a custom directory
    pub fn with_dir(models_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&models_dir)?;
        let manifest = match load_manifest(&models_dir) {
            Ok(manifest) => manifest,
            Err(e) => {
                warn!("Ignoring unreadable model manifest: {:#}", e);
                ModelManifest::default()
            }
        };
        debug!("{} prepared language pair(s)", manifest.pairs.len());

        Ok(Self {
            models_dir,
            manifest: Mutex::new(manifest),
        })
    }

    pub fn is_prepared(&self, endpoint: &str, source: &str, target: &str) -> bool {
        self.manifest
            .lock()
            .pairs
            .iter()
            .any(|p| p.endpoint == endpoint && p.source == source && p.target == target)
    }

    /// Record a pair as ready and persist the manifest
    pub fn mark_prepared(&self, endpoint: &str, source: &str, target: &str) -> Result<()> {
        let mut manifest = self.manifest.lock();
        if manifest
            .pairs
            .iter()
            .any(|p| p.endpoint == endpoint && p.source == source && p.target == target)
        {
            return Ok(());
        }

        // Only a persisted pair counts as prepared
        let mut updated = manifest.clone();
        updated.pairs.push(PreparedPair {
            source: source.to_string(),
            target: target.to_string(),
            endpoint: endpoint.to_string(),
            prepared_at: unix_now(),
        });
        save_manifest(&self.models_dir, &updated)?;
        *manifest = updated;
        info!("Language model {} -> {} ready", source, target);
        Ok(())
    }

    pub fn prepared_pairs(&self) -> Vec<PreparedPair> {
        self.manifest.lock().pairs.clone()
    }
}

fn load_manifest(models_dir: &Path) -> Result<ModelManifest> {
    let path = models_dir.join(MANIFEST_FILE);
    if !path.exists() {
        return Ok(ModelManifest::default());
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let manifest = serde_json::from_str(&content).context("Failed to parse model manifest")?;
    Ok(manifest)
}

fn save_manifest(models_dir: &Path, manifest: &ModelManifest) -> Result<()> {
    let content = serde_json::to_string_pretty(manifest)?;
    std::fs::write(models_dir.join(MANIFEST_FILE), content)
        .context("Failed to write model manifest")?;
    Ok(())
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ENDPOINT: &str = "http://localhost:5000";

    #[test]
    fn test_mark_and_reload() {
        let dir = TempDir::new().unwrap();
        let manager = ModelManager::with_dir(dir.path().to_path_buf()).unwrap();
        assert!(!manager.is_prepared(ENDPOINT, "en", "uk"));

        manager.mark_prepared(ENDPOINT, "en", "uk").unwrap();
        manager.mark_prepared(ENDPOINT, "en", "uk").unwrap();
        assert!(manager.is_prepared(ENDPOINT, "en", "uk"));
        assert!(!manager.is_prepared(ENDPOINT, "uk", "en"));
        assert_eq!(manager.prepared_pairs().len(), 1);

        let reloaded = ModelManager::with_dir(dir.path().to_path_buf()).unwrap();
        assert!(reloaded.is_prepared(ENDPOINT, "en", "uk"));
        assert!(!reloaded.is_prepared("http://other", "en", "uk"));
    }

    #[test]
    fn test_failed_save_leaves_pair_unprepared() {
        let dir = TempDir::new().unwrap();
        let models_dir = dir.path().join("models");
        let manager = ModelManager::with_dir(models_dir.clone()).unwrap();
        std::fs::remove_dir_all(&models_dir).unwrap();

        assert!(manager.mark_prepared(ENDPOINT, "en", "uk").is_err());
        assert!(!manager.is_prepared(ENDPOINT, "en", "uk"));
        assert!(manager.prepared_pairs().is_empty());
    }

    #[test]
    fn test_corrupt_manifest_starts_empty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), "{ not json").unwrap();
        let manager = ModelManager::with_dir(dir.path().to_path_buf()).unwrap();
        assert!(manager.prepared_pairs().is_empty());
    }
}
