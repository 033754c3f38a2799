//! Liveness probe.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};
use tracing::warn;

use crate::AppState;

/// GET /health
///
/// Always 200; a failing database ping is logged, not reported.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    if !state.db.health_check().await {
        warn!("Health check could not reach the database");
    }

    Json(json!({
        "status": "OK",
        "message": "StockMaster API is running",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
