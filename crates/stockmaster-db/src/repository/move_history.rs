//! # Move History Repository
//!
//! Append-only audit ledger of quantity movements.
//!
//! ## Writers
//! ```text
//! OperationRepository::complete ──┐
//!                                  ├──► record(&mut conn, entry)   (inside their tx)
//! StockRepository::update_quantity ┘
//!
//! MoveHistoryRepository::list ◄── dashboard "move history" view
//! ```
//!
//! Entries are never updated or deleted by the application. Deleting an
//! operation leaves its entries in place with `operation_id` cleared.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use stockmaster_core::{MoveHistoryEntry, DEFAULT_HISTORY_LIMIT};
use tracing::debug;

use crate::error::DbResult;

/// Fields of one ledger row, borrowed from the caller.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NewMove<'a> {
    pub product_id: i64,
    pub operation_id: Option<i64>,
    pub from_location: Option<&'a str>,
    pub to_location: Option<&'a str>,
    pub quantity: i64,
    pub user_id: Option<i64>,
    pub notes: Option<&'a str>,
}

/// Appends one entry on the caller's connection (usually a transaction).
pub(crate) async fn record(conn: &mut SqliteConnection, entry: NewMove<'_>) -> DbResult<i64> {
    let id = sqlx::query(
        r#"
        INSERT INTO move_history
            (product_id, operation_id, from_location, to_location, quantity,
             user_id, notes, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(entry.product_id)
    .bind(entry.operation_id)
    .bind(entry.from_location)
    .bind(entry.to_location)
    .bind(entry.quantity)
    .bind(entry.user_id)
    .bind(entry.notes)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    debug!(
        move_id = id,
        product_id = entry.product_id,
        quantity = entry.quantity,
        "Move recorded"
    );
    Ok(id)
}

/// Read access to the ledger.
#[derive(Debug, Clone)]
pub struct MoveHistoryRepository {
    pool: SqlitePool,
}

impl MoveHistoryRepository {
    /// Creates a new MoveHistoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MoveHistoryRepository { pool }
    }

    /// Lists entries newest first with product, user and operation names.
    ///
    /// ## Arguments
    /// * `product_id` - restrict to one product
    /// * `limit` - maximum rows; `None` means [`DEFAULT_HISTORY_LIMIT`]
    pub async fn list(&self, product_id: Option<i64>, limit: Option<i64>) -> DbResult<Vec<MoveHistoryEntry>> {
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);

        let entries = sqlx::query_as::<_, MoveHistoryEntry>(
            r#"
            SELECT mh.id, mh.product_id, mh.operation_id, mh.from_location,
                   mh.to_location, mh.quantity, mh.user_id, mh.notes, mh.created_at,
                   p.name AS product_name, p.sku,
                   u.name AS user_name,
                   o.reference AS operation_reference
            FROM move_history mh
            JOIN products p ON p.id = mh.product_id
            LEFT JOIN users u ON u.id = mh.user_id
            LEFT JOIN operations o ON o.id = mh.operation_id
            WHERE (?1 IS NULL OR mh.product_id = ?1)
            ORDER BY mh.created_at DESC, mh.id DESC
            LIMIT ?2
            "#,
        )
        .bind(product_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(?product_id, limit, count = entries.len(), "Move history listed");
        Ok(entries)
    }

    /// Counts every ledger row.
    #[cfg(test)]
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM move_history")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::test_support::{fixture, product_input};

    use super::*;

    #[tokio::test]
    async fn test_record_and_list() {
        let fx = fixture().await;
        let other = fx.db.products().create(&product_input("DL-002")).await.unwrap();

        let mut conn = fx.db.pool().acquire().await.unwrap();
        for (product_id, quantity) in [(fx.product_id, 5), (other.id, -2), (fx.product_id, 7)] {
            record(
                &mut conn,
                NewMove {
                    product_id,
                    operation_id: None,
                    from_location: Some("Vendor"),
                    to_location: Some("WH/Stock1"),
                    quantity,
                    user_id: Some(fx.user_id),
                    notes: None,
                },
            )
            .await
            .unwrap();
        }
        drop(conn);

        let repo = fx.db.move_history();
        let all = repo.list(None, None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].quantity, 7);
        assert_eq!(all[0].user_name.as_deref(), Some("John Manager"));
        assert_eq!(all[0].sku.as_deref(), Some("OC-001"));
        assert!(all[0].operation_reference.is_none());

        let filtered = repo.list(Some(other.id), None).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].quantity, -2);

        assert_eq!(repo.list(None, Some(2)).await.unwrap().len(), 2);
        assert_eq!(repo.count().await.unwrap(), 3);
    }
}
