//! Image Translator - recognize text in a photo and translate it
//!
//! Pick an image from the camera or the gallery, run OCR on it, edit the
//! recognized text if needed and translate it between two languages.

mod app;
mod capture;
mod config;
mod headless;
mod languages;
mod permissions;
mod storage;
mod translation;
mod ui;
mod vision;
mod workflow;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app::AppServices;
use crate::config::{AppConfig, ConfigOrigin, LoadedConfig};
use crate::headless::HeadlessRequest;

/// Image Translator - OCR and translation for photos
#[derive(Parser, Debug)]
#[command(name = "image-translator")]
#[command(about = "Recognize text in an image and translate it")]
struct Args {
    /// Recognize and translate this image without opening a window
    #[arg(long)]
    image: Option<PathBuf>,

    /// Source language code (e.g. en)
    #[arg(long, requires = "image")]
    from: Option<String>,

    /// Target language code (e.g. uk)
    #[arg(long, requires = "image")]
    to: Option<String>,

    /// List available languages and exit
    #[arg(long)]
    list_languages: bool,

    /// With --list-languages, ask the translation server instead of the bundled list
    #[arg(long, requires = "list_languages")]
    remote: bool,

    /// Configuration file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let path = config_path(args.config.as_deref());
    let loaded = load_or_create_config(path.as_deref(), args.config.is_none());
    let config = &loaded.config;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("image-translator-worker")
        .build()?;

    if args.list_languages {
        return headless::list_languages(config, &runtime, args.remote);
    }

    info!("Image Translator starting...");
    let services = AppServices::from_config(config)?;

    if let Some(image) = args.image {
        let request = HeadlessRequest {
            image,
            source: args.from,
            target: args.to,
            step_timeout: config.translation.timeout() * 4,
        };
        return headless::run(&services, &runtime, request);
    }

    let services = Arc::new(services);
    if let Err(e) = ui::run_app(services.clone(), runtime.handle().clone()) {
        tracing::error!("UI error: {}", e);
    }

    remember_grants(&services, &loaded, path.as_deref());
    runtime.shutdown_timeout(Duration::from_secs(2));
    info!("Image Translator shutdown complete");

    Ok(())
}

fn config_path(explicit: Option<&std::path::Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => storage::default_config_path().ok(),
    }
}

/// Load configuration from file or create default
fn load_or_create_config(path: Option<&std::path::Path>, create_missing: bool) -> LoadedConfig {
    let Some(path) = path else {
        return LoadedConfig {
            config: AppConfig::default(),
            origin: ConfigOrigin::Missing,
        };
    };

    let loaded = config::load_or_default(path);
    match &loaded.origin {
        ConfigOrigin::Loaded => {}
        ConfigOrigin::Invalid(reason) => {
            eprintln!("Ignoring invalid configuration {}: {}", path.display(), reason);
        }
        ConfigOrigin::Missing if create_missing => {
            // First run: write the defaults so they can be edited
            if let Err(e) = config::save_config(&loaded.config, path) {
                eprintln!("Failed to write default configuration {}: {:#}", path.display(), e);
            }
        }
        ConfigOrigin::Missing => {}
    }
    loaded
}

/// Persist permissions granted through the consent dialog
fn remember_grants(services: &AppServices, loaded: &LoadedConfig, path: Option<&std::path::Path>) {
    let Some(path) = path else {
        return;
    };
    if !loaded.is_writable() {
        warn!("Not saving granted permissions: {} could not be loaded", path.display());
        return;
    }
    match config::persist_grants(loaded, path, services.consent().granted()) {
        Ok(true) => info!("Saved granted permissions to {:?}", path),
        Ok(false) => {}
        Err(e) => warn!("Failed to save permissions: {:#}", e),
    }
}
