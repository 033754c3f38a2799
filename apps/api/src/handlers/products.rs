//! Product catalog endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use stockmaster_core::{ProductInput, DEFAULT_UNIT_OF_MEASURE};
use stockmaster_db::{DbError, ProductFilter};
use validator::Validate;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::{
    validate_category, validate_product_name, validate_sku, Path, Query, ValidJson,
};
use crate::handlers::{message, trimmed};
use crate::AppState;

/// Body of POST and PUT. Both writes send every field.
#[derive(Debug, Deserialize, Validate)]
pub struct ProductRequest {
    #[serde(default)]
    #[validate(custom = "validate_product_name")]
    pub name: String,

    #[serde(default)]
    #[validate(custom = "validate_sku")]
    pub sku: String,

    #[serde(default)]
    #[validate(custom = "validate_category")]
    pub category: String,

    pub unit_of_measure: Option<String>,

    #[validate(range(min = 0, message = "Reorder level must be a non-negative integer"))]
    pub reorder_level: Option<i64>,

    pub description: Option<String>,
}

impl ProductRequest {
    fn into_input(self) -> ProductInput {
        ProductInput {
            name: self.name.trim().to_string(),
            sku: self.sku.trim().to_string(),
            category: self.category.trim().to_string(),
            unit_of_measure: trimmed(self.unit_of_measure)
                .unwrap_or_else(|| DEFAULT_UNIT_OF_MEASURE.to_string()),
            reorder_level: self.reorder_level.unwrap_or(0),
            description: trimmed(self.description),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

/// GET /api/products?category=&search=
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ProductQuery>,
) -> ApiResult<Json<Value>> {
    let filter = ProductFilter {
        category: query.category,
        search: query.search,
    };
    let products = state.db.products().list(&filter).await?;

    Ok(Json(json!({ "success": true, "products": products })))
}

/// GET /api/products/categories
pub async fn categories(State(state): State<AppState>, _user: AuthUser) -> ApiResult<Json<Value>> {
    let categories = state.db.products().categories().await?;

    Ok(Json(json!({ "success": true, "categories": categories })))
}

/// GET /api/products/:id
pub async fn get(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let product = state
        .db
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    Ok(Json(json!({ "success": true, "product": product })))
}

/// POST /api/products
pub async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    ValidJson(body): ValidJson<ProductRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let product = state.db.products().create(&body.into_input()).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Product created successfully",
            "product": product,
        })),
    ))
}

/// PUT /api/products/:id
pub async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
    ValidJson(body): ValidJson<ProductRequest>,
) -> ApiResult<Json<Value>> {
    let product = state
        .db
        .products()
        .update(id, &body.into_input())
        .await
        .map_err(|err| match err {
            DbError::UniqueViolation { .. } => {
                ApiError::BadRequest("SKU already exists for another product".to_string())
            }
            other => other.into(),
        })?;

    Ok(Json(json!({
        "success": true,
        "message": "Product updated successfully",
        "product": product,
    })))
}

/// DELETE /api/products/:id
pub async fn delete(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    state.db.products().delete(id).await?;

    Ok(message("Product deleted successfully"))
}
