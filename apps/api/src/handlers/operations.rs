//! Operation endpoints (receipts, deliveries, transfers, adjustments).
//!
//! ## Lifecycle
//! ```text
//! POST   /api/operations              → reference WH/IN/0001 ..., items inserted
//! PUT    /api/operations/:id          → header overwritten, items replaced if sent
//! POST   /api/operations/:id/complete → status Done, one history entry per item
//! ```
//!
//! Completing an operation records history only; stock cells are adjusted
//! separately through `/api/stock`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use stockmaster_core::validation::parse_schedule_date;
use stockmaster_core::{NewOperationItem, OperationInput, OperationStatus, OperationType};
use stockmaster_db::OperationFilter;
use validator::Validate;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::{
    validate_operation_status, validate_operation_type, validate_schedule_date, Path, Query,
    ValidJson,
};
use crate::handlers::{message, trimmed};
use crate::AppState;

/// Body of POST and PUT.
#[derive(Debug, Deserialize, Validate)]
pub struct OperationRequest {
    /// Generated from the type when absent (create only)
    pub reference: Option<String>,

    #[serde(rename = "type", default)]
    #[validate(custom = "validate_operation_type")]
    pub op_type: String,

    #[validate(custom = "validate_operation_status")]
    pub status: Option<String>,

    pub from_location: Option<String>,
    pub to_location: Option<String>,
    pub contact: Option<String>,

    #[serde(default)]
    #[validate(custom = "validate_schedule_date")]
    pub schedule_date: String,

    pub responsible_id: Option<i64>,
    pub notes: Option<String>,

    pub items: Option<Vec<NewOperationItem>>,
}

impl OperationRequest {
    fn into_parts(self) -> ApiResult<(OperationInput, Option<Vec<NewOperationItem>>)> {
        let op_type: OperationType = self.op_type.parse()?;
        let status = self
            .status
            .as_deref()
            .map(str::parse::<OperationStatus>)
            .transpose()?;
        let schedule_date = parse_schedule_date(&self.schedule_date)?;

        let input = OperationInput {
            reference: trimmed(self.reference),
            status,
            from_location: trimmed(self.from_location),
            to_location: trimmed(self.to_location),
            contact: trimmed(self.contact),
            responsible_id: self.responsible_id,
            notes: trimmed(self.notes),
            ..OperationInput::new(op_type, schedule_date)
        };

        Ok((input, self.items))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct OperationQuery {
    #[serde(rename = "type")]
    pub op_type: Option<String>,
    pub status: Option<String>,
}

impl OperationQuery {
    fn into_filter(self) -> ApiResult<OperationFilter> {
        let op_type = trimmed(self.op_type)
            .map(|t| t.parse::<OperationType>())
            .transpose()?;
        let status = trimmed(self.status)
            .map(|s| s.parse::<OperationStatus>())
            .transpose()?;

        Ok(OperationFilter { op_type, status })
    }
}

/// GET /api/operations?type=&status=
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<OperationQuery>,
) -> ApiResult<Json<Value>> {
    let operations = state.db.operations().list(&query.into_filter()?).await?;

    Ok(Json(json!({ "success": true, "operations": operations })))
}

/// GET /api/operations/:id
pub async fn get(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let operation = state
        .db
        .operations()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Operation not found".to_string()))?;

    Ok(Json(json!({ "success": true, "operation": operation })))
}

/// POST /api/operations
pub async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    ValidJson(body): ValidJson<OperationRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let (input, items) = body.into_parts()?;
    let items = items.unwrap_or_default();

    let operation = state.db.operations().create(&input, &items).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Operation created successfully",
            "operation": operation,
        })),
    ))
}

/// PUT /api/operations/:id
///
/// Every header field is overwritten, so a body without `status` fails.
pub async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
    ValidJson(body): ValidJson<OperationRequest>,
) -> ApiResult<Json<Value>> {
    let (input, items) = body.into_parts()?;

    let operation = state
        .db
        .operations()
        .update(id, &input, items.as_deref())
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Operation updated successfully",
        "operation": operation,
    })))
}

/// DELETE /api/operations/:id
pub async fn delete(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    state.db.operations().delete(id).await?;

    Ok(message("Operation deleted successfully"))
}

/// POST /api/operations/:id/complete
pub async fn complete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    state.db.operations().complete(id, Some(user.id)).await?;

    Ok(message("Operation completed successfully"))
}
