mod assessment;
mod config;
mod db;
mod errors;
mod extractors;
mod llm_client;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assessment::fallback::StaticSampleProvider;
use crate::assessment::generator::{AssessmentGenerator, FailurePolicy};
use crate::config::{Config, FailureMode};
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Testera API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize LLM client
    let llm = LlmClient::new(config.openai_api_key.clone(), config.openai_api_url.clone())?;
    if config.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; assessment generation will fail until it is configured");
    }
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let on_failure = match config.failure_mode {
        FailureMode::Propagate => FailurePolicy::Propagate,
        FailureMode::Fallback => FailurePolicy::Fallback(Arc::new(StaticSampleProvider)),
    };
    info!("Generation failure mode: {:?}", config.failure_mode);

    // Build app state
    let state = AppState {
        db,
        generator: Arc::new(AssessmentGenerator::new(Arc::new(llm), on_failure)),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
