mod advisor;
mod config;
mod errors;
mod intake;
mod llm_client;
mod routes;
mod state;
mod ui;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::demo::DemoBackend;
use crate::llm_client::{CompletionBackend, LlmClient, OpenAiCompatBackend};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Résumé Doctor v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM backend
    let backend: Arc<dyn CompletionBackend> = if config.demo_mode {
        warn!("ADVISOR_DEMO_MODE is on: diagnoses and rewrites are canned demo output");
        Arc::new(DemoBackend)
    } else {
        if !config.has_api_key() {
            warn!("DEEPSEEK_API_KEY is not set; AI calls will fail until it is configured");
        }
        Arc::new(
            OpenAiCompatBackend::new(config.deepseek_api_key.clone())
                .context("Failed to build HTTP client")?,
        )
    };
    let llm = LlmClient::new(backend);
    info!(
        "LLM client initialized (backend: {}, model: {})",
        llm.backend_name(),
        llm_client::MODEL
    );

    let state = AppState {
        llm,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
