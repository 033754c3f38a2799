//! Stock cell endpoints.
//!
//! `POST /api/stock` overwrites a cell wholesale and writes no history.
//! `PUT /api/stock/:id` changes quantities and logs the on-hand delta.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use stockmaster_core::{Money, StockUpsert};
use stockmaster_db::StockFilter;
use validator::{Validate, ValidationError};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::{require, Path, Query, ValidJson};
use crate::handlers::message;
use crate::AppState;

const ON_HAND_RULE: &str = "On hand must be a non-negative integer";
const FREE_TO_USE_RULE: &str = "Free to use must be a non-negative integer";
const COST_RULE: &str = "Cost per unit must be a non-negative number";

/// Largest cost a DECIMAL(10, 2) column holds, in cents.
const MAX_COST_CENTS: i64 = 9_999_999_999;

fn validate_cost(cost: &Money) -> Result<(), ValidationError> {
    if cost.is_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some(COST_RULE.into());
        return Err(err);
    }
    if cost.cents() > MAX_COST_CENTS {
        let mut err = ValidationError::new("range");
        err.message = Some("Cost per unit must be at most 99999999.99".into());
        return Err(err);
    }
    Ok(())
}

/// Body of POST: one full stock cell. `cost_per_unit` accepts `12.5` or `"12.50"`.
///
/// Quantities are capped at `i32::MAX`. Presence of every field is checked
/// by [`StockUpsertRequest::into_upsert`].
#[derive(Debug, Deserialize, Validate)]
pub struct StockUpsertRequest {
    pub product_id: Option<i64>,

    pub warehouse_id: Option<i64>,

    pub location_id: Option<i64>,

    #[validate(range(
        min = 0,
        max = 2147483647,
        message = "On hand must be a non-negative integer"
    ))]
    pub on_hand: Option<i64>,

    #[validate(range(
        min = 0,
        max = 2147483647,
        message = "Free to use must be a non-negative integer"
    ))]
    pub free_to_use: Option<i64>,

    #[validate(custom = "validate_cost")]
    pub cost_per_unit: Option<Money>,
}

impl StockUpsertRequest {
    fn into_upsert(self) -> ApiResult<StockUpsert> {
        let mut missing = Vec::new();
        let product_id = require(
            self.product_id,
            "product_id",
            "Valid product ID is required",
            &mut missing,
        );
        let warehouse_id = require(
            self.warehouse_id,
            "warehouse_id",
            "Valid warehouse ID is required",
            &mut missing,
        );
        let location_id = require(
            self.location_id,
            "location_id",
            "Valid location ID is required",
            &mut missing,
        );
        let on_hand = require(self.on_hand, "on_hand", ON_HAND_RULE, &mut missing);
        let free_to_use = require(self.free_to_use, "free_to_use", FREE_TO_USE_RULE, &mut missing);
        let cost_per_unit =
            require(self.cost_per_unit, "cost_per_unit", COST_RULE, &mut missing);

        match (product_id, warehouse_id, location_id, on_hand, free_to_use, cost_per_unit) {
            (
                Some(product_id),
                Some(warehouse_id),
                Some(location_id),
                Some(on_hand),
                Some(free_to_use),
                Some(cost_per_unit),
            ) => Ok(StockUpsert {
                product_id,
                warehouse_id,
                location_id,
                on_hand,
                free_to_use,
                cost_per_unit,
            }),
            _ => Err(ApiError::Validation(missing)),
        }
    }
}

/// Body of PUT: new quantities for an existing cell.
#[derive(Debug, Deserialize, Validate)]
pub struct StockQuantityRequest {
    #[validate(range(
        min = 0,
        max = 2147483647,
        message = "On hand must be a non-negative integer"
    ))]
    pub on_hand: Option<i64>,

    #[validate(range(
        min = 0,
        max = 2147483647,
        message = "Free to use must be a non-negative integer"
    ))]
    pub free_to_use: Option<i64>,
}

impl StockQuantityRequest {
    /// `(on_hand, free_to_use)`, both required.
    fn into_quantities(self) -> ApiResult<(i64, i64)> {
        let mut missing = Vec::new();
        let on_hand = require(self.on_hand, "on_hand", ON_HAND_RULE, &mut missing);
        let free_to_use = require(self.free_to_use, "free_to_use", FREE_TO_USE_RULE, &mut missing);

        match (on_hand, free_to_use) {
            (Some(on_hand), Some(free_to_use)) => Ok((on_hand, free_to_use)),
            _ => Err(ApiError::Validation(missing)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct StockQuery {
    pub warehouse_id: Option<i64>,
    pub product_id: Option<i64>,
}

/// GET /api/stock?warehouse_id=&product_id=
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<StockQuery>,
) -> ApiResult<Json<Value>> {
    let filter = StockFilter {
        warehouse_id: query.warehouse_id,
        product_id: query.product_id,
    };
    let stock = state.db.stock().list(&filter).await?;

    Ok(Json(json!({ "success": true, "stock": stock })))
}

/// GET /api/stock/:id
pub async fn get(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let entry = state
        .db
        .stock()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Stock item not found".to_string()))?;

    Ok(Json(json!({ "success": true, "stock": entry })))
}

/// POST /api/stock
pub async fn upsert(
    State(state): State<AppState>,
    _user: AuthUser,
    ValidJson(body): ValidJson<StockUpsertRequest>,
) -> ApiResult<Json<Value>> {
    let entry = state.db.stock().upsert(&body.into_upsert()?).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Stock updated successfully",
        "stock": entry,
    })))
}

/// PUT /api/stock/:id
pub async fn update_quantity(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    ValidJson(body): ValidJson<StockQuantityRequest>,
) -> ApiResult<Json<Value>> {
    let (on_hand, free_to_use) = body.into_quantities()?;

    let entry = state
        .db
        .stock()
        .update_quantity(id, on_hand, free_to_use, Some(user.id))
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Stock updated successfully",
        "stock": entry,
    })))
}

/// DELETE /api/stock/:id
pub async fn delete(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    state.db.stock().delete(id).await?;

    Ok(message("Stock deleted successfully"))
}
