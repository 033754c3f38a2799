//! Warehouse endpoints. Writes are limited to Inventory Managers and Admins.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use stockmaster_core::WarehouseInput;
use validator::Validate;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::{validate_short_code, validate_warehouse_name, Path, ValidJson};
use crate::handlers::{message, trimmed};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct WarehouseRequest {
    #[serde(default)]
    #[validate(custom = "validate_warehouse_name")]
    pub name: String,

    #[serde(default)]
    #[validate(custom = "validate_short_code")]
    pub short_code: String,

    pub address: Option<String>,
}

impl WarehouseRequest {
    fn into_input(self) -> WarehouseInput {
        WarehouseInput {
            name: self.name.trim().to_string(),
            short_code: self.short_code.trim().to_string(),
            address: trimmed(self.address),
        }
    }
}

/// GET /api/warehouses
pub async fn list(State(state): State<AppState>, _user: AuthUser) -> ApiResult<Json<Value>> {
    let warehouses = state.db.warehouses().list().await?;

    Ok(Json(json!({ "success": true, "warehouses": warehouses })))
}

/// GET /api/warehouses/:id
pub async fn get(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let warehouse = state
        .db
        .warehouses()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Warehouse not found".to_string()))?;

    Ok(Json(json!({ "success": true, "warehouse": warehouse })))
}

/// POST /api/warehouses
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(body): ValidJson<WarehouseRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    user.require_manager()?;

    let warehouse = state.db.warehouses().create(&body.into_input()).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Warehouse created successfully",
            "warehouse": warehouse,
        })),
    ))
}

/// PUT /api/warehouses/:id
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    ValidJson(body): ValidJson<WarehouseRequest>,
) -> ApiResult<Json<Value>> {
    user.require_manager()?;

    let warehouse = state.db.warehouses().update(id, &body.into_input()).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Warehouse updated successfully",
        "warehouse": warehouse,
    })))
}

/// DELETE /api/warehouses/:id
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    user.require_manager()?;

    state.db.warehouses().delete(id).await?;

    Ok(message("Warehouse deleted successfully"))
}
