//! Translation Layer
//!
//! Translators backed by a LibreTranslate-compatible HTTP server. Preparing a
//! pair's "model" means checking the download conditions and confirming with
//! the server that the pair is supported; prepared pairs are remembered in
//! the model manifest.

pub mod client;
pub mod models;

pub use client::{ServerLanguage, TranslationClient};
pub use models::ModelManager;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::workflow::{TranslationService, Translator};

/// Conditions a model download must satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DownloadConditions {
    /// Only download over an unmetered connection
    pub require_unmetered: bool,
}

/// Kind of network the machine is on, as declared in the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkKind {
    #[default]
    Unmetered,
    Metered,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Unsupported language pair: {from} -> {to}")]
    UnsupportedLanguagePair { from: String, to: String },

    #[error("Model download requires an unmetered network connection")]
    ConditionsNotMet,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication error")]
    AuthenticationError,
}

/// Builds HTTP translators sharing one client and model manifest
pub struct HttpTranslationService {
    client: TranslationClient,
    models: Arc<ModelManager>,
    network: NetworkKind,
}

impl HttpTranslationService {
    pub fn new(client: TranslationClient, models: Arc<ModelManager>, network: NetworkKind) -> Self {
        info!("Translation server: {}", client.endpoint());
        Self {
            client,
            models,
            network,
        }
    }
}

impl TranslationService for HttpTranslationService {
    fn translator(&self, source: &str, target: &str) -> Box<dyn Translator> {
        Box::new(HttpTranslator {
            client: self.client.clone(),
            models: self.models.clone(),
            network: self.network,
            source: source.to_string(),
            target: target.to_string(),
        })
    }
}

/// Translator for one language pair
pub struct HttpTranslator {
    client: TranslationClient,
    models: Arc<ModelManager>,
    network: NetworkKind,
    source: String,
    target: String,
}

impl HttpTranslator {
    fn unsupported(&self) -> TranslateError {
        TranslateError::UnsupportedLanguagePair {
            from: self.source.clone(),
            to: self.target.clone(),
        }
    }
}

/// Whether the server's language list allows `source -> target`
fn supports_pair(languages: &[ServerLanguage], source: &str, target: &str) -> bool {
    let Some(from) = languages.iter().find(|l| l.code == source) else {
        return false;
    };
    if from.targets.is_empty() {
        languages.iter().any(|l| l.code == target)
    } else {
        from.targets.iter().any(|t| t == target)
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn download_model_if_needed(&self, conditions: &DownloadConditions) -> Result<()> {
        let endpoint = self.client.endpoint();
        if self.models.is_prepared(endpoint, &self.source, &self.target) {
            debug!("Model {} -> {} already prepared", self.source, self.target);
            return Ok(());
        }

        if conditions.require_unmetered && self.network == NetworkKind::Metered {
            return Err(TranslateError::ConditionsNotMet.into());
        }

        info!("Preparing language model {} -> {}", self.source, self.target);
        let languages = self.client.languages().await?;
        if !supports_pair(&languages, &self.source, &self.target) {
            return Err(self.unsupported().into());
        }

        self.models.mark_prepared(endpoint, &self.source, &self.target)?;
        Ok(())
    }

    async fn translate(&self, text: &str) -> Result<String> {
        let translated = self.client.translate(text, &self.source, &self.target).await?;
        Ok(translated)
    }
}

#[cfg(test)]
mod tests {
    use super::client::test_server::serve;
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    const LANGUAGES: &str = r#"[{"code":"en","name":"English","targets":["uk"]},{"code":"uk","name":"Ukrainian","targets":["en"]}]"#;

    fn service(endpoint: &str, dir: &TempDir, network: NetworkKind) -> HttpTranslationService {
        let client = TranslationClient::new(endpoint, None, Duration::from_secs(5)).unwrap();
        let models = Arc::new(ModelManager::with_dir(dir.path().to_path_buf()).unwrap());
        HttpTranslationService::new(client, models, network)
    }

    fn lang(code: &str, targets: &[&str]) -> ServerLanguage {
        ServerLanguage {
            code: code.into(),
            name: code.into(),
            targets: targets.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_supports_pair() {
        let languages = vec![lang("en", &["uk"]), lang("uk", &[]), lang("de", &[])];
        assert!(supports_pair(&languages, "en", "uk"));
        assert!(!supports_pair(&languages, "en", "de"));
        // Without a target list any listed language is accepted
        assert!(supports_pair(&languages, "uk", "de"));
        assert!(!supports_pair(&languages, "fr", "en"));
    }

    #[tokio::test]
    async fn test_metered_network_blocks_download() {
        let dir = TempDir::new().unwrap();
        // Nothing listens here; the conditions check must fail first
        let service = service("http://127.0.0.1:9", &dir, NetworkKind::Metered);
        let translator = service.translator("en", "uk");

        let err = translator
            .download_model_if_needed(&DownloadConditions { require_unmetered: true })
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Model download requires an unmetered network connection"
        );
    }

    #[tokio::test]
    async fn test_prepared_pair_skips_server_and_conditions() {
        let dir = TempDir::new().unwrap();
        let service = service("http://127.0.0.1:9", &dir, NetworkKind::Metered);
        service
            .models
            .mark_prepared("http://127.0.0.1:9", "en", "uk")
            .unwrap();

        let translator = service.translator("en", "uk");
        translator
            .download_model_if_needed(&DownloadConditions { require_unmetered: true })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_download_then_translate() {
        let dir = TempDir::new().unwrap();
        let (endpoint, _languages) = serve(200, LANGUAGES, 1).await;
        let service = service(&endpoint, &dir, NetworkKind::Unmetered);

        let translator = service.translator("en", "uk");
        translator
            .download_model_if_needed(&DownloadConditions::default())
            .await
            .unwrap();
        assert!(service.models.is_prepared(&endpoint, "en", "uk"));
    }

    #[tokio::test]
    async fn test_unsupported_pair_is_not_recorded() {
        let dir = TempDir::new().unwrap();
        let (endpoint, _languages) = serve(200, LANGUAGES, 1).await;
        let service = service(&endpoint, &dir, NetworkKind::Unmetered);

        let translator = service.translator("en", "de");
        let err = translator
            .download_model_if_needed(&DownloadConditions::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Unsupported language pair: en -> de");
        assert!(service.models.prepared_pairs().is_empty());
    }

    #[tokio::test]
    async fn test_translate_uses_pair() {
        let dir = TempDir::new().unwrap();
        let (endpoint, server) = serve(200, r#"{"translatedText":"Hallo"}"#, 1).await;
        let service = service(&endpoint, &dir, NetworkKind::Unmetered);

        let translated = service.translator("en", "de").translate("Hello").await.unwrap();
        assert_eq!(translated, "Hallo");
        let requests = server.await.unwrap();
        assert!(requests[0].contains(r#""source":"en""#));
        assert!(requests[0].contains(r#""target":"de""#));
    }
}
