use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::debug;

use crate::state::AppState;

/// GET /health
///
/// Probes Ollama's tags endpoint. The service itself is always up, so the
/// status only reflects backend reachability: `healthy` when the probe
/// answers, `degraded` otherwise.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    match state.ollama.check_reachable().await {
        Ok(()) => Json(json!({
            "status": "healthy",
            "ollama": "connected"
        })),
        Err(e) => {
            debug!("Ollama health probe failed: {e}");
            Json(json!({
                "status": "degraded",
                "ollama": "unavailable"
            }))
        }
    }
}
