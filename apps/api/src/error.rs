//! # API Errors
//!
//! Every handler returns `Result<_, ApiError>`; this module turns the
//! error into an HTTP status and a JSON body.
//!
//! ## Mapping
//! ```text
//! ┌───────────────────────────────┬────────┬──────────────────────────────┐
//! │ Source                        │ Status │ Body                         │
//! ├───────────────────────────────┼────────┼──────────────────────────────┤
//! │ validator / core rules        │ 400    │ error + errors[{field,msg}]  │
//! │ bad JSON / path / query       │ 400    │ extractor message            │
//! │ DbError::UniqueViolation      │ 400    │ "SKU already exists" ...     │
//! │ DbError::ForeignKeyViolation  │ 400    │ "Invalid reference"          │
//! │ DbError::Rule (strict policy) │ 400    │ transition message           │
//! │ missing / bad token           │ 401    │                              │
//! │ role check                    │ 403    │ "Access denied"              │
//! │ DbError::NotFound             │ 404    │ "Product not found" ...      │
//! │ anything else                 │ 500    │ "Server error" (cause logged)│
//! └───────────────────────────────┴────────┴──────────────────────────────┘
//! ```

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use stockmaster_db::DbError;
use tracing::error;

/// One failed field rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// API error types.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            ApiError::Validation(errors) => json!({
                "error": "Validation failed",
                "errors": errors,
            }),
            ApiError::Internal(cause) => {
                error!(%cause, "Request failed");
                json!({ "error": "Server error" })
            }
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Human message for a duplicate key, keyed by the offending field or
/// `table.column` constraint name.
fn duplicate_message(field: &str) -> &'static str {
    match field {
        "sku" | "products.sku" => "SKU already exists",
        "short_code" | "warehouses.short_code" => "Short code already exists",
        "locations.short_code" | "locations.warehouse_id, locations.short_code" => {
            "Short code already exists in this warehouse"
        }
        "email" | "users.email" => "Email already registered",
        "operations.reference" => "Reference already exists",
        _ => "Duplicate value",
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, .. } => ApiError::NotFound(format!("{} not found", entity)),
            DbError::UniqueViolation { field, .. } => {
                ApiError::BadRequest(duplicate_message(&field).to_string())
            }
            DbError::ForeignKeyViolation { .. } => ApiError::BadRequest("Invalid reference".to_string()),
            DbError::Rule(rule) => ApiError::BadRequest(rule.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<stockmaster_core::ValidationError> for ApiError {
    fn from(err: stockmaster_core::ValidationError) -> Self {
        ApiError::Validation(vec![FieldError {
            field: err.field().to_string(),
            message: err.to_string(),
        }])
    }
}

impl From<stockmaster_core::CoreError> for ApiError {
    fn from(err: stockmaster_core::CoreError) -> Self {
        match err {
            stockmaster_core::CoreError::Validation(validation) => validation.into(),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field)),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ApiError::Validation(fields)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use stockmaster_core::{CoreError, OperationStatus};

    use super::*;

    #[test]
    fn test_db_error_mapping() {
        let err: ApiError = DbError::not_found("Product", 7).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Product not found");

        let err: ApiError = DbError::duplicate("sku", "X-1").into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "SKU already exists");

        let err: ApiError = DbError::ForeignKeyViolation {
            message: "FOREIGN KEY constraint failed".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Invalid reference");

        let err: ApiError = DbError::QueryFailed("NOT NULL constraint failed".into()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_rule_violation_is_bad_request() {
        let err: ApiError = DbError::Rule(CoreError::InvalidStatusTransition {
            reference: "WH/IN/0001".into(),
            from: OperationStatus::Done,
            to: OperationStatus::Draft,
        })
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_core_validation_names_field() {
        let err: ApiError = stockmaster_core::ValidationError::ExactLength {
            field: "otp".into(),
            len: 6,
        }
        .into();

        match err {
            ApiError::Validation(fields) => assert_eq!(fields[0].field, "otp"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
