//! # Warehouse Repository
//!
//! Warehouses are identified to users by a unique short code ("WH", "SF").
//! Deleting a warehouse removes its locations and stock cells via
//! `ON DELETE CASCADE`.

use chrono::Utc;
use sqlx::SqlitePool;
use stockmaster_core::{Warehouse, WarehouseInput};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

const SELECT_WAREHOUSE: &str = r#"
    SELECT id, name, short_code, address, created_at, updated_at
    FROM warehouses
"#;

/// Repository for warehouse database operations.
#[derive(Debug, Clone)]
pub struct WarehouseRepository {
    pool: SqlitePool,
}

impl WarehouseRepository {
    /// Creates a new WarehouseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        WarehouseRepository { pool }
    }

    /// Lists warehouses, newest first.
    pub async fn list(&self) -> DbResult<Vec<Warehouse>> {
        let warehouses = sqlx::query_as::<_, Warehouse>(&format!(
            "{SELECT_WAREHOUSE} ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = warehouses.len(), "Warehouses listed");
        Ok(warehouses)
    }

    /// Gets a warehouse by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Warehouse>> {
        let warehouse =
            sqlx::query_as::<_, Warehouse>(&format!("{SELECT_WAREHOUSE} WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(warehouse)
    }

    /// Creates a warehouse.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - short code taken
    pub async fn create(&self, input: &WarehouseInput) -> DbResult<Warehouse> {
        if self.short_code_taken(&input.short_code, None).await? {
            return Err(DbError::duplicate("short_code", &input.short_code));
        }

        let now = Utc::now();
        let id = sqlx::query(
            r#"
            INSERT INTO warehouses (name, short_code, address, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            "#,
        )
        .bind(&input.name)
        .bind(&input.short_code)
        .bind(&input.address)
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        info!(warehouse_id = id, short_code = %input.short_code, "Warehouse created");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Warehouse", id))
    }

    /// Overwrites name, short code and address.
    pub async fn update(&self, id: i64, input: &WarehouseInput) -> DbResult<Warehouse> {
        if self.short_code_taken(&input.short_code, Some(id)).await? {
            return Err(DbError::duplicate("short_code", &input.short_code));
        }

        let result = sqlx::query(
            r#"
            UPDATE warehouses
            SET name = ?1, short_code = ?2, address = ?3, updated_at = ?4
            WHERE id = ?5
            "#,
        )
        .bind(&input.name)
        .bind(&input.short_code)
        .bind(&input.address)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Warehouse", id));
        }

        info!(warehouse_id = id, "Warehouse updated");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Warehouse", id))
    }

    /// Deletes a warehouse with its locations and stock.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM warehouses WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Warehouse", id));
        }

        info!(warehouse_id = id, "Warehouse deleted");
        Ok(())
    }

    async fn short_code_taken(&self, short_code: &str, exclude_id: Option<i64>) -> DbResult<bool> {
        let existing: Option<i64> =
            sqlx::query_scalar("SELECT id FROM warehouses WHERE short_code = ?1 AND id != ?2")
                .bind(short_code)
                .bind(exclude_id.unwrap_or(0))
                .fetch_optional(&self.pool)
                .await?;
        Ok(existing.is_some())
    }
}
