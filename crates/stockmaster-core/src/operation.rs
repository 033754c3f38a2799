//! # Operations
//!
//! Logistics documents (Receipt, Delivery, Internal Transfer, Adjustment),
//! their line items, the status field and reference numbering.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Conventional status flow                             │
//! │                                                                         │
//! │   Draft ──► Waiting ──► Ready ──► Done                                 │
//! │     │  ◄──     │          │                                             │
//! │     └──────────┴──────────┴──► Canceled                                │
//! │                                                                         │
//! │  StatusPolicy::Permissive (default): any status may be written.        │
//! │  StatusPolicy::Strict: only the arrows above (plus "no change").       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Reference Numbers
//! `{prefix}/{count + 1:04}` where `count` is the number of operations of
//! the same type that already exist:
//!
//! | Type              | Prefix   | First reference |
//! |-------------------|----------|-----------------|
//! | Receipt           | `WH/IN`  | `WH/IN/0001`    |
//! | Delivery          | `WH/OUT` | `WH/OUT/0001`   |
//! | Internal Transfer | `WH/INT` | `WH/INT/0001`   |
//! | Adjustment        | `WH/ADJ` | `WH/ADJ/0001`   |

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Operation Type
// =============================================================================

/// Kind of logistics document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum OperationType {
    /// Goods arriving from a supplier.
    Receipt,
    /// Goods leaving to a customer.
    Delivery,
    /// Goods moving between locations.
    #[serde(rename = "Internal Transfer")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Internal Transfer"))]
    InternalTransfer,
    /// Inventory correction; quantity sign carries the direction.
    Adjustment,
}

impl OperationType {
    /// Every operation type, in display order.
    pub const ALL: [OperationType; 4] = [
        OperationType::Receipt,
        OperationType::Delivery,
        OperationType::InternalTransfer,
        OperationType::Adjustment,
    ];

    /// Reference prefix for this type.
    pub const fn prefix(&self) -> &'static str {
        match self {
            OperationType::Receipt => "WH/IN",
            OperationType::Delivery => "WH/OUT",
            OperationType::InternalTransfer => "WH/INT",
            OperationType::Adjustment => "WH/ADJ",
        }
    }

    /// Stored / wire name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OperationType::Receipt => "Receipt",
            OperationType::Delivery => "Delivery",
            OperationType::InternalTransfer => "Internal Transfer",
            OperationType::Adjustment => "Adjustment",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperationType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::UnknownValue {
                kind: "operation type",
                value: s.to_string(),
            })
    }
}

/// Builds the human reference for the next operation of `op_type`.
///
/// ## Arguments
/// * `op_type` - Type of the operation being created
/// * `existing_count` - How many operations of that type already exist
///
/// ## Example
/// ```rust
/// use stockmaster_core::operation::{format_reference, OperationType};
///
/// assert_eq!(format_reference(OperationType::Delivery, 0), "WH/OUT/0001");
/// assert_eq!(format_reference(OperationType::Adjustment, 41), "WH/ADJ/0042");
/// ```
///
/// ## Note
/// Count-then-insert is not atomic. Two concurrent creates of the same type
/// can compute the same reference; the UNIQUE column rejects the second one.
pub fn format_reference(op_type: OperationType, existing_count: i64) -> String {
    format!("{}/{:04}", op_type.prefix(), existing_count + 1)
}

// =============================================================================
// Operation Status
// =============================================================================

/// Status of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum OperationStatus {
    #[default]
    Draft,
    Waiting,
    Ready,
    Done,
    Canceled,
}

impl OperationStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [OperationStatus; 5] = [
        OperationStatus::Draft,
        OperationStatus::Waiting,
        OperationStatus::Ready,
        OperationStatus::Done,
        OperationStatus::Canceled,
    ];

    /// Stored / wire name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OperationStatus::Draft => "Draft",
            OperationStatus::Waiting => "Waiting",
            OperationStatus::Ready => "Ready",
            OperationStatus::Done => "Done",
            OperationStatus::Canceled => "Canceled",
        }
    }

    /// States from which `self` may be entered under the strict policy.
    pub const fn allowed_predecessors(&self) -> &'static [OperationStatus] {
        use OperationStatus::*;
        match self {
            Draft => &[Waiting],
            Waiting => &[Draft],
            Ready => &[Draft, Waiting],
            Done => &[Waiting, Ready],
            Canceled => &[Draft, Waiting, Ready],
        }
    }

    /// Whether moving from `self` to `next` follows the transition table.
    /// Rewriting the current status is always allowed.
    pub fn can_transition_to(&self, next: OperationStatus) -> bool {
        *self == next || next.allowed_predecessors().contains(self)
    }

    /// Still open: neither Done nor Canceled.
    pub const fn is_pending(&self) -> bool {
        !matches!(self, OperationStatus::Done | OperationStatus::Canceled)
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::UnknownValue {
                kind: "operation status",
                value: s.to_string(),
            })
    }
}

// =============================================================================
// Status Policy
// =============================================================================

/// How status writes are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusPolicy {
    /// Any status may be written at any time.
    #[default]
    Permissive,
    /// Status writes must follow [`OperationStatus::allowed_predecessors`].
    Strict,
}

impl StatusPolicy {
    /// Checks a status change for the operation identified by `reference`.
    ///
    /// ## Returns
    /// * `Ok(())` - change allowed
    /// * `Err(CoreError::InvalidStatusTransition)` - strict policy rejected it
    pub fn check(
        &self,
        reference: &str,
        from: OperationStatus,
        to: OperationStatus,
    ) -> CoreResult<()> {
        match self {
            StatusPolicy::Permissive => Ok(()),
            StatusPolicy::Strict if from.can_transition_to(to) => Ok(()),
            StatusPolicy::Strict => Err(CoreError::InvalidStatusTransition {
                reference: reference.to_string(),
                from,
                to,
            }),
        }
    }
}

impl FromStr for StatusPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(StatusPolicy::Permissive),
            "strict" => Ok(StatusPolicy::Strict),
            other => Err(CoreError::UnknownValue {
                kind: "status policy",
                value: other.to_string(),
            }),
        }
    }
}

// =============================================================================
// Operation
// =============================================================================

/// A logistics document with its line items.
///
/// `from_location` / `to_location` are free text, not location ids.
#[derive(Debug, Clone, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Operation {
    pub id: i64,
    /// Human reference, e.g. `WH/IN/0001`.
    pub reference: String,
    #[serde(rename = "type")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "type"))]
    pub op_type: OperationType,
    pub status: OperationStatus,
    pub from_location: Option<String>,
    pub to_location: Option<String>,
    pub contact: Option<String>,
    #[ts(as = "String")]
    pub schedule_date: NaiveDate,
    pub responsible_id: Option<i64>,
    /// Name of the responsible user (joined).
    pub responsible_name: Option<String>,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
    /// Line items, loaded separately from the operation row.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub items: Vec<OperationItem>,
}

impl Operation {
    /// Note written to move history when this operation is completed.
    pub fn completion_note(&self) -> String {
        format!("{} - {}", self.op_type, self.reference)
    }
}

/// A line item of an operation.
#[derive(Debug, Clone, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OperationItem {
    pub id: i64,
    pub operation_id: i64,
    pub product_id: i64,
    /// Signed. Adjustments use the sign for direction.
    pub quantity: i64,
    /// Product name (joined).
    pub product_name: Option<String>,
    /// Product SKU (joined).
    pub sku: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Fields written by create and update.
///
/// Update is a full overwrite: every `None` clears its column. A `None`
/// status on update is passed to the store as NULL and rejected by the
/// NOT NULL constraint. `reference` is only read on create.
#[derive(Debug, Clone)]
pub struct OperationInput {
    pub reference: Option<String>,
    pub op_type: OperationType,
    pub status: Option<OperationStatus>,
    pub from_location: Option<String>,
    pub to_location: Option<String>,
    pub contact: Option<String>,
    pub schedule_date: NaiveDate,
    pub responsible_id: Option<i64>,
    pub notes: Option<String>,
}

impl OperationInput {
    /// Minimal input: a type and a schedule date.
    pub fn new(op_type: OperationType, schedule_date: NaiveDate) -> Self {
        OperationInput {
            reference: None,
            op_type,
            status: None,
            from_location: None,
            to_location: None,
            contact: None,
            schedule_date,
            responsible_id: None,
            notes: None,
        }
    }
}

/// A line item supplied on create/update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewOperationItem {
    pub product_id: i64,
    pub quantity: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================
