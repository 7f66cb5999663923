use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::llm_client::MODEL;
use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "cvdoctor-api"
    }))
}

/// GET /api/v1/status
/// Self-check shown in the page's side panel.
pub async fn status_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "backend": state.llm.backend_name(),
        "model": MODEL,
        "api_key_configured": state.config.has_api_key(),
        "demo_mode": state.config.demo_mode,
        "max_upload_bytes": state.config.max_upload_bytes,
    }))
}
