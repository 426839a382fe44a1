mod config;
mod dom;
mod errors;
mod export;
mod loader;
mod models;
mod presentation;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, SiteMode};
use crate::export::build_site;
use crate::loader::{DataSource, FileSource, HttpSource};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Folio v{} ({} mode)", env!("CARGO_PKG_VERSION"), config.mode);

    let source = data_source(&config)?;
    info!("Resume data source: {}", source.describe());

    match config.mode {
        SiteMode::Build => {
            build_site(&config, source).await?;
        }
        SiteMode::Serve => {
            let state = AppState::from_config(config.clone(), source).await?;
            let app = build_router(state).layer(TraceLayer::new_for_http());

            let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
            info!("Listening on {addr}");

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

/// HTTP when a data URL is configured, otherwise the site root on disk.
fn data_source(config: &Config) -> Result<Arc<dyn DataSource>> {
    Ok(match &config.data_url {
        Some(url) => Arc::new(HttpSource::new(url)?),
        None => Arc::new(FileSource::new(config.site_root.clone())),
    })
}
