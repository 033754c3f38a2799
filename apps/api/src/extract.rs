//! Request extractors and validator hooks.
//!
//! `ValidJson<T>` is `Json<T>` plus `T::validate()`. Malformed bodies are
//! rejected as 400 with the deserializer's message; rule failures become a
//! 400 with one `{field, message}` per failed rule.
//!
//! `Path<T>` and `Query<T>` wrap axum's extractors so that a bad id or
//! query string answers with the same JSON `{"error": ...}` body.

use std::borrow::Cow;

use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use stockmaster_core::validation::{parse_schedule_date, validate_otp_code};
use stockmaster_core::{OperationStatus, OperationType, Role};
use validator::{Validate, ValidationError};

use crate::error::{ApiError, FieldError};

/// JSON body that has passed its `validator` rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;

        value.validate()?;
        Ok(ValidJson(value))
    }
}

/// Path parameters; rejections become [`ApiError::BadRequest`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Path<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Path(value) =
            axum::extract::Path::<T>::from_request_parts(parts, state).await?;
        Ok(Path(value))
    }
}

/// Query string; rejections become [`ApiError::BadRequest`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Query<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Query(value) =
            axum::extract::Query::<T>::from_request_parts(parts, state).await?;
        Ok(Query(value))
    }
}

/// Passes `value` through, recording `{field, message}` in `missing` when
/// it is absent.
pub fn require<T>(
    value: Option<T>,
    field: &str,
    message: &str,
    missing: &mut Vec<FieldError>,
) -> Option<T> {
    if value.is_none() {
        missing.push(FieldError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }
    value
}

// =============================================================================
// Custom Rules
// =============================================================================

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Trimmed value must be non-empty.
fn not_blank(value: &str, message: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(rule("required", message))
    } else {
        Ok(())
    }
}

pub fn validate_name(value: &str) -> Result<(), ValidationError> {
    not_blank(value, "Name is required")
}

pub fn validate_product_name(value: &str) -> Result<(), ValidationError> {
    not_blank(value, "Product name is required")
}

pub fn validate_sku(value: &str) -> Result<(), ValidationError> {
    not_blank(value, "SKU is required")
}

pub fn validate_category(value: &str) -> Result<(), ValidationError> {
    not_blank(value, "Category is required")
}

pub fn validate_warehouse_name(value: &str) -> Result<(), ValidationError> {
    not_blank(value, "Warehouse name is required")
}

pub fn validate_location_name(value: &str) -> Result<(), ValidationError> {
    not_blank(value, "Location name is required")
}

pub fn validate_short_code(value: &str) -> Result<(), ValidationError> {
    not_blank(value, "Short code is required")
}

pub fn validate_otp(value: &str) -> Result<(), ValidationError> {
    validate_otp_code(value).map_err(|_| rule("otp", "OTP must be 6 digits"))
}

pub fn validate_role(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<Role>()
        .map(|_| ())
        .map_err(|_| rule("role", "Invalid role"))
}

pub fn validate_operation_type(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<OperationType>()
        .map(|_| ())
        .map_err(|_| rule("type", "Invalid operation type"))
}

pub fn validate_operation_status(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<OperationStatus>()
        .map(|_| ())
        .map_err(|_| rule("status", "Invalid operation status"))
}

pub fn validate_schedule_date(value: &str) -> Result<(), ValidationError> {
    parse_schedule_date(value)
        .map(|_| ())
        .map_err(|_| rule("schedule_date", "Valid schedule date is required"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_rules_carry_messages() {
        let err = validate_sku("   ").unwrap_err();
        assert_eq!(err.message.as_deref(), Some("SKU is required"));

        let err = validate_operation_type("Transfer").unwrap_err();
        assert_eq!(err.message.as_deref(), Some("Invalid operation type"));

        assert!(validate_operation_type("Internal Transfer").is_ok());
        assert!(validate_operation_status("Waiting").is_ok());
        assert!(validate_role("Warehouse Staff").is_ok());
        assert!(validate_role("Owner").is_err());
    }

    #[test]
    fn test_schedule_date_rule() {
        assert!(validate_schedule_date("2026-03-14").is_ok());
        assert!(validate_schedule_date("2026-03-14T09:30:00Z").is_ok());
        assert!(validate_schedule_date("14/03/2026").is_err());
        assert!(validate_schedule_date("").is_err());
    }

    #[test]
    fn test_require_records_missing_fields() {
        let mut missing = Vec::new();

        assert_eq!(require(Some(3), "on_hand", "On hand is required", &mut missing), Some(3));
        let absent: Option<i64> = None;
        assert_eq!(
            require(absent, "location_id", "Valid location ID is required", &mut missing),
            None
        );

        assert_eq!(
            missing,
            vec![FieldError {
                field: "location_id".into(),
                message: "Valid location ID is required".into(),
            }]
        );
    }

    #[test]
    fn test_otp_rule() {
        assert!(validate_otp("123456").is_ok());
        assert!(validate_otp("12345").is_err());
    }
}
