use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod error;
mod matchup;
mod models;
mod render;
mod scrape;

use api::AppState;
use config::Config;
use render::ChromiumRenderer;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    // Refuse to serve without a working headless browser binary.
    let renderer = ChromiumRenderer::new(Duration::from_secs(config.nav_timeout_secs));
    let version = renderer
        .probe()
        .await
        .context("headless browser unavailable")?;
    info!("Headless browser ready: {}", version);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState {
        renderer: Arc::new(renderer),
        config,
    };
    let app = api::router(state);

    info!("Matchup API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
