use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::config::FailureMode;
use crate::llm_client::MODEL;
use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "testera-api",
        "model": MODEL,
        "fallback_enabled": state.config.failure_mode == FailureMode::Fallback
    }))
}
