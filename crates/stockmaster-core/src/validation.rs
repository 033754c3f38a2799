//! # Validation Module
//!
//! Field rules shared by the API layer.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Request DTO (apps/api, validator derive)                     │
//! │  ├── Presence, length, email shape, ranges                             │
//! │  └── Custom hooks call into THIS MODULE                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Domain rules (this module)                                   │
//! │  ├── Schedule date parsing                                             │
//! │  └── OTP shape, code lengths                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE constraints (sku, short_code, reference, email)            │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate};

use crate::error::ValidationError;
use crate::OTP_LENGTH;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Checks that a trimmed value is present and at most `max` characters.
///
/// ## Example
/// ```rust
/// use stockmaster_core::validation::validate_required;
///
/// assert!(validate_required("sku", "OC-001", 100).is_ok());
/// assert!(validate_required("sku", "   ", 100).is_err());
/// ```
pub fn validate_required(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a password-reset code.
///
/// ## Rules
/// - Exactly [`OTP_LENGTH`] characters
pub fn validate_otp_code(otp: &str) -> ValidationResult<()> {
    if otp.chars().count() != OTP_LENGTH {
        return Err(ValidationError::ExactLength {
            field: "otp".to_string(),
            len: OTP_LENGTH,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Rejects negative quantities and levels.
pub fn validate_non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Parses an ISO-8601 schedule date.
///
/// ## Accepted Forms
/// ```text
/// "2026-03-14"                   → 2026-03-14
/// "2026-03-14T09:30:00Z"         → 2026-03-14
/// "2026-03-14T09:30:00+02:00"    → 2026-03-14  (date as written)
/// ```
pub fn parse_schedule_date(value: &str) -> ValidationResult<NaiveDate> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: "schedule_date".to_string(),
        });
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.date_naive())
        .map_err(|_| ValidationError::InvalidFormat {
            field: "schedule_date".to_string(),
            reason: "must be an ISO-8601 date".to_string(),
        })
}

// =============================================================================
// Unit Tests
// =============================================================================
