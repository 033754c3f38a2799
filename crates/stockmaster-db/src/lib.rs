//! # stockmaster-db: Database Layer for StockMaster
//!
//! SQLite storage for the inventory tracker, accessed through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       StockMaster Data Flow                             │
//! │                                                                         │
//! │  HTTP handler (POST /api/operations/:id/complete)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  stockmaster-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │   │  (embedded)  │  │   │
//! │  │   │               │    │ ProductRepo    │   │              │  │   │
//! │  │   │ SqlitePool    │◄───│ StockRepo      │   │ 001_init.sql │  │   │
//! │  │   │ StatusPolicy  │    │ OperationRepo  │   │              │  │   │
//! │  │   │               │    │ ...            │   │              │  │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (stockmaster.db)                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - One repository per aggregate
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockmaster_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./stockmaster.db")).await?;
//! let low = db.products().list(&ProductFilter::default()).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::dashboard::DashboardRepository;
pub use repository::location::LocationRepository;
pub use repository::move_history::MoveHistoryRepository;
pub use repository::operation::{OperationFilter, OperationRepository};
pub use repository::otp::OtpRepository;
pub use repository::product::{ProductFilter, ProductRepository};
pub use repository::stock::{StockFilter, StockRepository};
pub use repository::user::UserRepository;
pub use repository::warehouse::WarehouseRepository;
