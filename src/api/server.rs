use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::state::AppState;

/// GET /api/health - 健康检查
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Job search service is running",
        "engine": state.gateway.engine_name(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
