use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::llm_client::ModelTier;
use crate::state::AppState;

/// GET /health
/// Returns a simple status object with the generation model and service version.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "model": state.llm.model_name(ModelTier::Generation),
        "version": env!("CARGO_PKG_VERSION"),
        "service": "campus-ads-api"
    }))
}
