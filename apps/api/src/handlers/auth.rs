//! Registration, login and password reset.
//!
//! ## Password Reset Flow
//! ```text
//! POST /request-otp { email }            → code stored (10 min), logged
//! POST /verify-otp  { email, otp }       → code marked used
//! POST /reset-password { email, password } → hash overwritten
//! ```
//!
//! The reset step does not check that a code was verified first, and it
//! reports success even when no account has that email.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use stockmaster_core::Role;
use tracing::{info, warn};
use validator::Validate;

use crate::auth::{generate_otp, hash_password, verify_password, AuthUser};
use crate::error::{ApiError, ApiResult};
use crate::extract::{validate_name, validate_otp, validate_role, ValidJson};
use crate::handlers::message;
use crate::AppState;

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(custom = "validate_name")]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "Valid email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    /// Defaults to Warehouse Staff
    #[validate(custom = "validate_role")]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(email(message = "Valid email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct OtpRequest {
    #[serde(default)]
    #[validate(email(message = "Valid email is required"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    #[validate(email(message = "Valid email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(custom = "validate_otp")]
    pub otp: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    #[validate(email(message = "Valid email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let role = match body.role.as_deref() {
        Some(role) => role.parse::<Role>()?,
        None => Role::default(),
    };

    let password_hash = hash_password(&body.password)?;
    let user = state
        .db
        .users()
        .create(body.name.trim(), body.email.trim(), &password_hash, role)
        .await?;

    let token = state.jwt.issue(&user)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "User registered successfully",
            "token": token,
            "user": user,
        })),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<LoginRequest>,
) -> ApiResult<Json<Value>> {
    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

    let user = match state.db.users().find_by_email(body.email.trim()).await? {
        Some(user) => user,
        None => {
            warn!(email = %body.email, "Login for unknown email");
            return Err(invalid());
        }
    };

    if !verify_password(&body.password, &user.password_hash) {
        warn!(user_id = user.id, "Login with wrong password");
        return Err(invalid());
    }

    let token = state.jwt.issue(&user)?;
    info!(user_id = user.id, "User logged in");

    Ok(Json(json!({
        "success": true,
        "token": token,
        "user": user,
    })))
}

/// POST /api/auth/request-otp
pub async fn request_otp(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<OtpRequest>,
) -> ApiResult<Json<Value>> {
    let email = body.email.trim();

    if state.db.users().find_by_email(email).await?.is_none() {
        return Err(ApiError::NotFound("Email not found".to_string()));
    }

    let code = generate_otp();
    let expires_at = Utc::now() + Duration::seconds(state.config.otp_lifetime_secs);
    state.db.otps().create(email, &code, expires_at).await?;

    // No mail transport: the log line is the delivery channel
    info!(email = %email, otp = %code, "Password reset code issued");

    let mut response = json!({
        "success": true,
        "message": "OTP sent to email",
    });
    if !state.config.is_production() {
        response["otp"] = json!(code);
    }

    Ok(Json(response))
}

/// POST /api/auth/verify-otp
pub async fn verify_otp(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<VerifyOtpRequest>,
) -> ApiResult<Json<Value>> {
    let accepted = state
        .db
        .otps()
        .consume(body.email.trim(), &body.otp, Utc::now())
        .await?;

    if !accepted {
        warn!(email = %body.email, "Rejected password reset code");
        return Err(ApiError::BadRequest("Invalid or expired OTP".to_string()));
    }

    Ok(message("OTP verified successfully"))
}

/// POST /api/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<ResetPasswordRequest>,
) -> ApiResult<Json<Value>> {
    let password_hash = hash_password(&body.password)?;
    let updated = state
        .db
        .users()
        .update_password(body.email.trim(), &password_hash)
        .await?;

    if updated == 0 {
        warn!(email = %body.email, "Password reset matched no account");
    }

    Ok(message("Password reset successfully"))
}

/// GET /api/auth/me
pub async fn me(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<Value>> {
    let profile = state
        .db
        .users()
        .get_by_id(user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(json!({ "success": true, "user": profile })))
}
