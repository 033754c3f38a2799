//! # Domain Types
//!
//! Core domain types used throughout StockMaster.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   Warehouse     │   │    Location     │       │
//! │  │  sku (unique)   │   │  short_code (u) │   │  short_code     │       │
//! │  │  reorder_level  │   │  address        │   │  (u per WH)     │       │
//! │  └────────┬────────┘   └────────┬────────┘   └────────┬────────┘       │
//! │           │                     │                     │                 │
//! │           └──────────────┬──────┴─────────────────────┘                 │
//! │                          ▼                                              │
//! │                 ┌─────────────────┐      ┌──────────────────┐          │
//! │                 │   StockEntry    │      │ MoveHistoryEntry │          │
//! │                 │ one stock cell  │      │ append-only log  │          │
//! │                 │ on_hand, free   │      │ signed quantity  │          │
//! │                 └─────────────────┘      └──────────────────┘          │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │      User       │   │       Otp       │                             │
//! │  │  role           │   │  6-digit code   │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Row types carry joined display columns (`warehouse_name`, `sku`, ...)
//! because every read path in the API returns them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::Money;
use crate::operation::{Operation, OperationStatus, OperationType};

// =============================================================================
// Role
// =============================================================================

/// Access role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum Role {
    #[serde(rename = "Inventory Manager")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Inventory Manager"))]
    InventoryManager,
    #[default]
    #[serde(rename = "Warehouse Staff")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Warehouse Staff"))]
    WarehouseStaff,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::InventoryManager, Role::WarehouseStaff, Role::Admin];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::InventoryManager => "Inventory Manager",
            Role::WarehouseStaff => "Warehouse Staff",
            Role::Admin => "Admin",
        }
    }

    /// Whether this role may create, edit or delete warehouses.
    pub const fn can_manage_warehouses(&self) -> bool {
        matches!(self, Role::InventoryManager | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| CoreError::UnknownValue {
                kind: "role",
                value: s.to_string(),
            })
    }
}

// =============================================================================
// User
// =============================================================================

/// A registered user.
///
/// The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string.
    #[serde(skip_serializing)]
    #[ts(skip)]
    pub password_hash: String,
    pub role: Role,
    pub avatar: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A password-reset code.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Otp {
    pub id: i64,
    pub email: String,
    pub otp: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

impl Otp {
    /// Usable: not consumed and not past its expiry.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.used && self.expires_at > now
    }
}

// =============================================================================
// Stock Status
// =============================================================================

/// Availability of a product summed over all stock cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum StockStatus {
    #[default]
    #[serde(rename = "Out of Stock")]
    OutOfStock,
    Low,
    Normal,
}

impl StockStatus {
    /// Classifies a product.
    ///
    /// ## Rules
    /// ```text
    /// total_stock == 0              → Out of Stock
    /// total_stock <= reorder_level  → Low
    /// otherwise                     → Normal
    /// ```
    ///
    /// Negative totals (possible after manual adjustments) count as Low.
    pub const fn classify(total_stock: i64, reorder_level: i64) -> Self {
        if total_stock == 0 {
            StockStatus::OutOfStock
        } else if total_stock <= reorder_level {
            StockStatus::Low
        } else {
            StockStatus::Normal
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product with its summed stock.
#[derive(Debug, Clone, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub sku: String,
    pub category: String,
    pub unit_of_measure: String,
    pub reorder_level: i64,
    pub description: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
    /// Sum of `on_hand` over every stock cell of this product.
    pub total_stock: i64,
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub status: StockStatus,
}

impl Product {
    /// Recomputes `status` from `total_stock` and `reorder_level`.
    pub fn with_status(mut self) -> Self {
        self.status = StockStatus::classify(self.total_stock, self.reorder_level);
        self
    }
}

/// Fields written when creating or updating a product.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub sku: String,
    pub category: String,
    pub unit_of_measure: String,
    pub reorder_level: i64,
    pub description: Option<String>,
}

// =============================================================================
// Warehouse & Location
// =============================================================================

#[derive(Debug, Clone, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Warehouse {
    pub id: i64,
    pub name: String,
    pub short_code: String,
    pub address: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct WarehouseInput {
    pub name: String,
    pub short_code: String,
    pub address: Option<String>,
}

/// A storage location inside a warehouse.
#[derive(Debug, Clone, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Location {
    pub id: i64,
    pub name: String,
    /// Unique within the owning warehouse only.
    pub short_code: String,
    pub warehouse_id: i64,
    pub warehouse_name: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct LocationInput {
    pub name: String,
    pub short_code: String,
    pub warehouse_id: i64,
}

// =============================================================================
// Stock
// =============================================================================

/// One stock cell: a product at a location of a warehouse.
///
/// `free_to_use <= on_hand` is not enforced.
#[derive(Debug, Clone, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StockEntry {
    pub id: i64,
    pub product_id: i64,
    pub warehouse_id: i64,
    pub location_id: i64,
    pub on_hand: i64,
    pub free_to_use: i64,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "cost_per_unit_cents"))]
    #[ts(type = "string")]
    pub cost_per_unit: Money,
    pub product_name: Option<String>,
    pub sku: Option<String>,
    pub unit_of_measure: Option<String>,
    pub warehouse_name: Option<String>,
    pub warehouse_code: Option<String>,
    pub location_name: Option<String>,
    pub location_code: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl StockEntry {
    /// On-hand quantity valued at the cell's unit cost, `None` on overflow.
    pub fn value(&self) -> Option<Money> {
        self.cost_per_unit.checked_multiply_quantity(self.on_hand)
    }
}

/// Fields of a stock upsert, keyed by the (product, warehouse, location) cell.
#[derive(Debug, Clone, Copy)]
pub struct StockUpsert {
    pub product_id: i64,
    pub warehouse_id: i64,
    pub location_id: i64,
    pub on_hand: i64,
    pub free_to_use: i64,
    pub cost_per_unit: Money,
}

// =============================================================================
// Move History
// =============================================================================

/// An audit row recording a quantity movement.
#[derive(Debug, Clone, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct MoveHistoryEntry {
    pub id: i64,
    pub product_id: i64,
    /// Cleared when the operation is deleted.
    pub operation_id: Option<i64>,
    pub from_location: Option<String>,
    pub to_location: Option<String>,
    pub quantity: i64,
    pub user_id: Option<i64>,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub product_name: Option<String>,
    pub sku: Option<String>,
    pub user_name: Option<String>,
    pub operation_reference: Option<String>,
}

// =============================================================================
// Dashboard
// =============================================================================

/// Operation count grouped by type and status.
#[derive(Debug, Clone, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OperationCount {
    #[serde(rename = "type")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "type"))]
    pub op_type: OperationType,
    pub status: OperationStatus,
    pub count: i64,
}

/// Summary numbers for the dashboard.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardStats {
    pub total_products: i64,
    pub low_stock: i64,
    pub out_of_stock: i64,
    pub pending_receipts: i64,
    pub pending_deliveries: i64,
    pub total_operations: i64,
    /// Σ on_hand × cost_per_unit over all stock cells.
    #[ts(type = "string")]
    pub total_stock_value: Money,
    pub operations_by_type: Vec<OperationCount>,
    pub recent_operations: Vec<Operation>,
}

// =============================================================================
// Unit Tests
// =============================================================================
