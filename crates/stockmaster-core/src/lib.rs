//! # stockmaster-core: Pure Domain Logic for StockMaster
//!
//! Entity types, enums and business rules for the warehouse inventory
//! tracker. Nothing in here touches the database or the network.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       StockMaster Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web client (SPA)                             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/api (axum)                              │   │
//! │  │    auth, products, warehouses, stock, operations, dashboard     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ stockmaster-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ operation │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  Status   │  │   rules   │  │   │
//! │  │   │   Stock   │  │  (cents)  │  │ Reference │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 stockmaster-db (Database Layer)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Users, catalog entities, stock cells, move history, dashboard
//! - [`operation`] - Logistics documents, status table, reference numbers
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Field rules shared by the API layer
//!
//! ## Example Usage
//!
//! ```rust
//! use stockmaster_core::operation::{format_reference, OperationType};
//! use stockmaster_core::types::StockStatus;
//!
//! // Third receipt ever created
//! assert_eq!(format_reference(OperationType::Receipt, 2), "WH/IN/0003");
//!
//! // 4 units on hand against a reorder level of 10
//! assert_eq!(StockStatus::classify(4, 10), StockStatus::Low);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod operation;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use operation::*;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Length of a password-reset code.
pub const OTP_LENGTH: usize = 6;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Default number of rows returned by the move-history feed.
pub const DEFAULT_HISTORY_LIMIT: i64 = 50;

/// Number of operations shown in the dashboard's "recent" panel.
pub const RECENT_OPERATIONS_LIMIT: i64 = 10;

/// Unit of measure assigned when a product is created without one.
pub const DEFAULT_UNIT_OF_MEASURE: &str = "Unit";
