//! ShopSearch-RS: a thin e-commerce search service written in Rust
//!
//! This is the main entry point for the application.

use anyhow::Result;
use shopsearch_rs::{
    config::Settings,
    network::HttpClient,
    vendors::Rakuten,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    info!("Starting ShopSearch-RS v{}", shopsearch_rs::VERSION);

    // Load configuration
    let settings = load_settings()?;
    if settings.vendor.app_id.is_none() {
        warn!("RAKUTEN_APP_ID is not set; searches will fail until it is configured");
    }

    // Initialize HTTP client and vendor adapter
    let client = HttpClient::with_settings(&settings.outgoing)?;
    let vendor = Arc::new(Rakuten::new(&settings.vendor, client));
    info!("Vendor adapter initialized: rakuten");

    // Create application state
    let state = AppState::new(settings.clone(), vendor);
    info!("Application state initialized");

    // Create router
    let app = create_router(state);

    // Bind address
    let addr = SocketAddr::new(
        settings.server.bind_address.parse()?,
        settings.server.port,
    );

    info!("Starting server on http://{}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Load settings from file or use defaults
fn load_settings() -> Result<Settings> {
    // Check for settings file in various locations
    let paths = [
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
        PathBuf::from("/etc/shopsearch/settings.yml"),
        dirs::config_dir()
            .map(|p| p.join("shopsearch-rs/settings.yml"))
            .unwrap_or_default(),
    ];

    // Check environment variable first
    if let Ok(path) = std::env::var("SHOPSEARCH_SETTINGS_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            info!("Loading settings from: {}", path.display());
            let mut settings = Settings::from_file(&path)?;
            settings.merge_env();
            return Ok(settings);
        }
    }

    // Try each default path
    for path in paths.iter() {
        if path.exists() {
            info!("Loading settings from: {}", path.display());
            let mut settings = Settings::from_file(path)?;
            settings.merge_env();
            return Ok(settings);
        }
    }

    // Use defaults
    info!("No settings file found, using defaults");
    let mut settings = Settings::default();
    settings.merge_env();
    Ok(settings)
}
