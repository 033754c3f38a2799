//! Dashboard endpoints.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::Query;
use crate::AppState;

/// GET /api/dashboard/stats
pub async fn stats(State(state): State<AppState>, _user: AuthUser) -> ApiResult<Json<Value>> {
    let stats = state.db.dashboard().stats().await?;

    Ok(Json(json!({ "success": true, "stats": stats })))
}

#[derive(Debug, Default, Deserialize)]
pub struct MoveHistoryQuery {
    pub product_id: Option<i64>,
    /// Defaults to 50
    pub limit: Option<i64>,
}

/// GET /api/dashboard/move-history?product_id=&limit=
pub async fn move_history(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<MoveHistoryQuery>,
) -> ApiResult<Json<Value>> {
    let history = state
        .db
        .move_history()
        .list(query.product_id, query.limit)
        .await?;

    Ok(Json(json!({ "success": true, "history": history })))
}
