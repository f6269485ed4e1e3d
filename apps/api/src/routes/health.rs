use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
///
/// Reports the service version, the size of the loaded skill vocabulary and
/// which narrative backend (if any) is wired in.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": env!("CARGO_PKG_NAME"),
        "skill_tokens": state.engine.vocabulary().len(),
        "narrative_backend": state.narrator.as_ref().map(|n| n.backend()),
    }))
}
