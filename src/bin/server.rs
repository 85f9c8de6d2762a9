//! supply-diagnostic HTTP server binary.
//!
//! Starts an axum HTTP server exposing the questionnaire, feedback,
//! submission and admin endpoints.
//!
//! # Environment Variables
//!
//! - `PORT` — HTTP port (default: 8080)
//! - `BIND_HOST` — bind address (default: 0.0.0.0)
//! - `DIAGNOSTIC_DATA_FILE` — submissions document (default: data/submissions.json)
//! - `DIAGNOSTIC_CATALOG` — YAML catalog overriding the embedded one
//! - `ANTHROPIC_API_KEY` — enables generated feedback
//! - `RUST_LOG` — Tracing filter (default: "info,supply_diagnostic=debug")
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin server
//! ```

use anyhow::Context;
use supply_diagnostic::config::AppConfig;
use supply_diagnostic::server::{app_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,supply_diagnostic=debug".into()),
        )
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let state = AppState::from_config(&config).context("failed to load statement catalog")?;

    tracing::info!(
        statements = state.catalog.len(),
        catalog_version = state.catalog.version().unwrap_or("unversioned"),
        data_file = %config.data_file.display(),
        llm_enabled = state.generator.is_enabled(),
        "Loaded catalog"
    );

    let app = app_router(state);
    let bind_addr = config.bind_addr();

    tracing::info!("supply-diagnostic server starting on {}", bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health             — liveness probe");
    tracing::info!("  GET  /api/statements     — questionnaire catalog");
    tracing::info!("  POST /api/diagnostic     — score, feedback and save");
    tracing::info!("  GET  /api/admin/stats    — submission averages");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    axum::serve(listener, app).await.context("server failed")?;
    Ok(())
}
