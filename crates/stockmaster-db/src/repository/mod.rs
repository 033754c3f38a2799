//! # Repository Module
//!
//! Database repository implementations for StockMaster.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.operations().complete(id, Some(user_id))                   │
//! │       ▼                                                                 │
//! │  OperationRepository                                                   │
//! │  ├── list(&self, filter)                                               │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── create(&self, input, items)      ─┐                               │
//! │  ├── update(&self, id, input, items)   ├─ one transaction each         │
//! │  └── complete(&self, id, user)        ─┘                               │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`user::UserRepository`] - Accounts and password hashes
//! - [`otp::OtpRepository`] - Password-reset codes
//! - [`product::ProductRepository`] - Catalog with summed stock
//! - [`warehouse::WarehouseRepository`] - Warehouses
//! - [`location::LocationRepository`] - Locations within warehouses
//! - [`stock::StockRepository`] - Stock cells and manual adjustments
//! - [`operation::OperationRepository`] - Logistics documents
//! - [`move_history::MoveHistoryRepository`] - Audit ledger
//! - [`dashboard::DashboardRepository`] - Read-only aggregates

pub mod dashboard;
pub mod location;
pub mod move_history;
pub mod operation;
pub mod otp;
pub mod product;
pub mod stock;
pub mod user;
pub mod warehouse;

#[cfg(test)]
pub(crate) mod test_support {
    //! Fixtures shared by repository tests.

    use stockmaster_core::{
        LocationInput, Money, ProductInput, Role, StockUpsert, WarehouseInput,
    };

    use crate::{Database, DbConfig};

    /// Ids of a minimal catalog: one user, product, warehouse and location.
    pub struct Fixture {
        pub db: Database,
        pub user_id: i64,
        pub product_id: i64,
        pub warehouse_id: i64,
        pub location_id: i64,
    }

    pub async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    pub fn product_input(sku: &str) -> ProductInput {
        ProductInput {
            name: format!("Product {}", sku),
            sku: sku.to_string(),
            category: "Furniture".to_string(),
            unit_of_measure: "Unit".to_string(),
            reorder_level: 10,
            description: None,
        }
    }

    pub async fn fixture() -> Fixture {
        let db = test_db().await;

        let user = db
            .users()
            .create("John Manager", "demo.manager@stockmaster.test", "hash", Role::InventoryManager)
            .await
            .unwrap();
        let product = db.products().create(&product_input("OC-001")).await.unwrap();
        let warehouse = db
            .warehouses()
            .create(&WarehouseInput {
                name: "Main Warehouse".to_string(),
                short_code: "WH".to_string(),
                address: None,
            })
            .await
            .unwrap();
        let location = db
            .locations()
            .create(&LocationInput {
                name: "Stock Area 1".to_string(),
                short_code: "Stock1".to_string(),
                warehouse_id: warehouse.id,
            })
            .await
            .unwrap();

        Fixture {
            db,
            user_id: user.id,
            product_id: product.id,
            warehouse_id: warehouse.id,
            location_id: location.id,
        }
    }

    impl Fixture {
        /// Stock cell for the fixture product at the fixture location.
        pub fn stock_upsert(&self, on_hand: i64, free_to_use: i64) -> StockUpsert {
            StockUpsert {
                product_id: self.product_id,
                warehouse_id: self.warehouse_id,
                location_id: self.location_id,
                on_hand,
                free_to_use,
                cost_per_unit: Money::from_cents(15000),
            }
        }
    }
}
