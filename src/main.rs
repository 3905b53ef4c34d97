//! Placefinder: nearby place discovery service
//!
//! This is the main entry point for the application.

use anyhow::{bail, Result};
use placefinder::{
    config,
    network::HttpClient,
    providers::GooglePlaces,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Settings decide the log level, so they load first
    let settings = config::load()?;

    let default_level = if settings.general.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    info!("Starting placefinder v{}", placefinder::VERSION);
    settings.validate()?;
    info!("Loaded configuration for instance: {}", settings.general.instance_name);

    // Initialize HTTP client
    let client = HttpClient::with_settings(&settings.outgoing)?;
    info!("HTTP client initialized");

    // Initialize the places provider
    let provider = match settings.places.provider.as_str() {
        "google" => GooglePlaces::from_settings(client, &settings.places)?,
        other => bail!("Unknown places provider: {}", other),
    };
    info!("Using places provider: {}", settings.places.provider);

    let addr = SocketAddr::new(
        settings.server.bind_address.parse()?,
        settings.server.port,
    );

    let state = AppState::new(settings, Arc::new(provider));
    if state.categories.is_empty() {
        bail!("No enabled categories configured");
    }
    info!("Loaded {} categories", state.categories.len());

    let app = create_router(state);

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
