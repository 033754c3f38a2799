//! # HTTP Handlers
//!
//! One module per resource. Every handler returns `ApiResult<...>` and
//! builds a `{ "success": true, <key>: ... }` body.
//!
//! ## Handler Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  async fn create(                                                       │
//! │      State(state): State<AppState>,      ← Database + JwtManager       │
//! │      _user: AuthUser,                    ← 401 without bearer token    │
//! │      ValidJson(body): ValidJson<Req>,    ← 400 on bad JSON / rules     │
//! │  ) -> ApiResult<(StatusCode, Json<Value>)>                             │
//! │                                                                         │
//! │  body → *Input (trim, defaults) → repository → json!({ success, .. })  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod locations;
pub mod operations;
pub mod products;
pub mod stock;
pub mod warehouses;

use axum::Json;
use serde_json::{json, Value};

/// `{ "success": true, "message": ... }`
pub(crate) fn message(text: &str) -> Json<Value> {
    Json(json!({ "success": true, "message": text }))
}

/// Trimmed optional text; blank becomes `None`.
pub(crate) fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
