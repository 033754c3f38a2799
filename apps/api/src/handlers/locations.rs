//! Location endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use stockmaster_core::LocationInput;
use validator::Validate;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::{
    require, validate_location_name, validate_short_code, Path, Query, ValidJson,
};
use crate::handlers::message;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct LocationRequest {
    #[serde(default)]
    #[validate(custom = "validate_location_name")]
    pub name: String,

    #[serde(default)]
    #[validate(custom = "validate_short_code")]
    pub short_code: String,

    pub warehouse_id: Option<i64>,
}

impl LocationRequest {
    fn into_input(self) -> ApiResult<LocationInput> {
        let mut missing = Vec::new();
        let Some(warehouse_id) = require(
            self.warehouse_id,
            "warehouse_id",
            "Valid warehouse ID is required",
            &mut missing,
        ) else {
            return Err(ApiError::Validation(missing));
        };

        Ok(LocationInput {
            name: self.name.trim().to_string(),
            short_code: self.short_code.trim().to_string(),
            warehouse_id,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LocationQuery {
    pub warehouse_id: Option<i64>,
}

/// GET /api/locations?warehouse_id=
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<LocationQuery>,
) -> ApiResult<Json<Value>> {
    let locations = state.db.locations().list(query.warehouse_id).await?;

    Ok(Json(json!({ "success": true, "locations": locations })))
}

/// GET /api/locations/:id
pub async fn get(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let location = state
        .db
        .locations()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Location not found".to_string()))?;

    Ok(Json(json!({ "success": true, "location": location })))
}

/// POST /api/locations
pub async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    ValidJson(body): ValidJson<LocationRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let location = state.db.locations().create(&body.into_input()?).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Location created successfully",
            "location": location,
        })),
    ))
}

/// PUT /api/locations/:id
pub async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
    ValidJson(body): ValidJson<LocationRequest>,
) -> ApiResult<Json<Value>> {
    let location = state.db.locations().update(id, &body.into_input()?).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Location updated successfully",
        "location": location,
    })))
}

/// DELETE /api/locations/:id
pub async fn delete(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    state.db.locations().delete(id).await?;

    Ok(message("Location deleted successfully"))
}
