//! # Stock Repository
//!
//! One row per (product, warehouse, location) stock cell.
//!
//! ## Write Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Stock Writes                                    │
//! │                                                                         │
//! │  upsert(cell, on_hand, free, cost)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT ... ON CONFLICT(product_id, warehouse_id, location_id)         │
//! │  DO UPDATE  ← last writer wins, no history entry                       │
//! │                                                                         │
//! │  update_quantity(id, on_hand, free, user)         ┐                    │
//! │       │                                           │ one transaction    │
//! │       ├── read old on_hand (404 if missing)       │                    │
//! │       ├── write new on_hand / free_to_use         │                    │
//! │       └── delta ≠ 0 → move_history(delta)         ┘                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `free_to_use` is informational; nothing keeps it below `on_hand`.

use chrono::Utc;
use sqlx::SqlitePool;
use stockmaster_core::{StockEntry, StockUpsert};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::move_history::{self, NewMove};

const SELECT_STOCK: &str = r#"
    SELECT s.id, s.product_id, s.warehouse_id, s.location_id, s.on_hand,
           s.free_to_use, s.cost_per_unit_cents, s.created_at, s.updated_at,
           p.name AS product_name, p.sku, p.unit_of_measure,
           w.name AS warehouse_name, w.short_code AS warehouse_code,
           l.name AS location_name, l.short_code AS location_code
    FROM stock s
    JOIN products p ON p.id = s.product_id
    JOIN warehouses w ON w.id = s.warehouse_id
    JOIN locations l ON l.id = s.location_id
"#;

const MANUAL_ADJUSTMENT: &str = "Manual Adjustment";
const ADJUSTMENT_NOTE: &str = "Stock quantity adjusted";

/// Optional list filters.
#[derive(Debug, Clone, Copy, Default)]
pub struct StockFilter {
    pub warehouse_id: Option<i64>,
    pub product_id: Option<i64>,
}

/// Repository for stock cells.
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
}

impl StockRepository {
    /// Creates a new StockRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockRepository { pool }
    }

    /// Lists stock cells, most recently updated first.
    pub async fn list(&self, filter: &StockFilter) -> DbResult<Vec<StockEntry>> {
        let entries = sqlx::query_as::<_, StockEntry>(&format!(
            r#"{SELECT_STOCK}
            WHERE (?1 IS NULL OR s.warehouse_id = ?1)
              AND (?2 IS NULL OR s.product_id = ?2)
            ORDER BY s.updated_at DESC, s.id DESC"#
        ))
        .bind(filter.warehouse_id)
        .bind(filter.product_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(?filter, count = entries.len(), "Stock listed");
        Ok(entries)
    }

    /// Gets a stock cell by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<StockEntry>> {
        let entry = sqlx::query_as::<_, StockEntry>(&format!("{SELECT_STOCK} WHERE s.id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(entry)
    }

    /// Creates the cell or overwrites its quantities and cost.
    ///
    /// ## Returns
    /// * `Ok(StockEntry)` - the cell as stored
    /// * `Err(DbError::ForeignKeyViolation)` - product, warehouse or location missing
    pub async fn upsert(&self, upsert: &StockUpsert) -> DbResult<StockEntry> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO stock
                (product_id, warehouse_id, location_id, on_hand, free_to_use,
                 cost_per_unit_cents, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            ON CONFLICT (product_id, warehouse_id, location_id) DO UPDATE SET
                on_hand = excluded.on_hand,
                free_to_use = excluded.free_to_use,
                cost_per_unit_cents = excluded.cost_per_unit_cents,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(upsert.product_id)
        .bind(upsert.warehouse_id)
        .bind(upsert.location_id)
        .bind(upsert.on_hand)
        .bind(upsert.free_to_use)
        .bind(upsert.cost_per_unit)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let entry = sqlx::query_as::<_, StockEntry>(&format!(
            "{SELECT_STOCK} WHERE s.product_id = ?1 AND s.warehouse_id = ?2 AND s.location_id = ?3"
        ))
        .bind(upsert.product_id)
        .bind(upsert.warehouse_id)
        .bind(upsert.location_id)
        .fetch_one(&self.pool)
        .await?;

        info!(
            stock_id = entry.id,
            product_id = upsert.product_id,
            on_hand = upsert.on_hand,
            "Stock upserted"
        );
        Ok(entry)
    }

    /// Sets the quantities of a cell and logs the on-hand delta.
    ///
    /// ## What This Does
    /// 1. Reads the current `on_hand` (NotFound if the cell is gone)
    /// 2. Writes the new `on_hand` and `free_to_use`
    /// 3. If `on_hand` changed, appends a move-history entry with the
    ///    signed delta
    ///
    /// All three steps share one transaction.
    pub async fn update_quantity(
        &self,
        id: i64,
        on_hand: i64,
        free_to_use: i64,
        user_id: Option<i64>,
    ) -> DbResult<StockEntry> {
        let mut tx = self.pool.begin().await?;

        let old: Option<(i64, i64)> =
            sqlx::query_as("SELECT product_id, on_hand FROM stock WHERE id = ?1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((product_id, old_on_hand)) = old else {
            return Err(DbError::not_found("Stock item", id));
        };

        sqlx::query("UPDATE stock SET on_hand = ?1, free_to_use = ?2, updated_at = ?3 WHERE id = ?4")
            .bind(on_hand)
            .bind(free_to_use)
            .bind(Utc::now())
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let delta = on_hand - old_on_hand;
        if delta != 0 {
            let to_location = format!("Stock ID: {}", id);
            move_history::record(
                &mut *tx,
                NewMove {
                    product_id,
                    operation_id: None,
                    from_location: Some(MANUAL_ADJUSTMENT),
                    to_location: Some(&to_location),
                    quantity: delta,
                    user_id,
                    notes: Some(ADJUSTMENT_NOTE),
                },
            )
            .await?;
        }

        tx.commit().await?;
        info!(stock_id = id, delta, "Stock quantity updated");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Stock item", id))
    }

    /// Deletes a stock cell.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM stock WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Stock item", id));
        }

        info!(stock_id = id, "Stock deleted");
        Ok(())
    }
}
