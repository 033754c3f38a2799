//! # Dashboard Repository
//!
//! Read-only aggregates for the dashboard screen.
//!
//! ## What Is Counted
//! ```text
//! totalProducts      COUNT(products)
//! lowStock           products with 0 < Σ on_hand <= reorder_level
//! outOfStock         products with Σ on_hand == 0
//! pendingReceipts    Receipts not Done / Canceled
//! pendingDeliveries  Deliveries not Done / Canceled
//! totalOperations    COUNT(operations)
//! totalStockValue    Σ on_hand × cost_per_unit   (exact cents, checked)
//! operationsByType   COUNT grouped by (type, status)
//! recentOperations   10 newest, with responsible_name
//! ```
//!
//! Products whose stock went negative are in neither lowStock nor
//! outOfStock.

use sqlx::{SqliteConnection, SqlitePool};
use stockmaster_core::{
    DashboardStats, Money, OperationCount, OperationType, RECENT_OPERATIONS_LIMIT,
};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::operation;

/// Repository for dashboard aggregates.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    pool: SqlitePool,
}

impl DashboardRepository {
    /// Creates a new DashboardRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DashboardRepository { pool }
    }

    /// Computes every dashboard figure on a single connection.
    pub async fn stats(&self) -> DbResult<DashboardStats> {
        let mut conn = self.pool.acquire().await?;

        let (total_products, low_stock, out_of_stock): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COALESCE(SUM(CASE WHEN total > 0 AND total <= reorder_level THEN 1 ELSE 0 END), 0),
                   COALESCE(SUM(CASE WHEN total = 0 THEN 1 ELSE 0 END), 0)
            FROM (
                SELECT p.reorder_level, COALESCE(SUM(s.on_hand), 0) AS total
                FROM products p
                LEFT JOIN stock s ON s.product_id = p.id
                GROUP BY p.id
            )
            "#,
        )
        .fetch_one(&mut *conn)
        .await?;

        let pending_receipts = count_pending(&mut conn, OperationType::Receipt).await?;
        let pending_deliveries = count_pending(&mut conn, OperationType::Delivery).await?;

        let total_operations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM operations")
            .fetch_one(&mut *conn)
            .await?;

        let operations_by_type = sqlx::query_as::<_, OperationCount>(
            r#"
            SELECT type, status, COUNT(*) AS count
            FROM operations
            GROUP BY type, status
            ORDER BY type, status
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        let cells: Vec<(i64, Money)> =
            sqlx::query_as("SELECT on_hand, cost_per_unit_cents FROM stock")
                .fetch_all(&mut *conn)
                .await?;
        let total_stock_value = cells
            .into_iter()
            .map(|(on_hand, cost)| cost.checked_multiply_quantity(on_hand))
            .try_fold(Money::zero(), |total, value| total.checked_add(value?))
            .ok_or_else(|| DbError::Internal("total stock value overflows".to_string()))?;

        let recent_operations = operation::fetch_recent(&mut conn, RECENT_OPERATIONS_LIMIT).await?;

        debug!(
            total_products,
            total_operations,
            total_stock_value = %total_stock_value,
            "Dashboard stats computed"
        );

        Ok(DashboardStats {
            total_products,
            low_stock,
            out_of_stock,
            pending_receipts,
            pending_deliveries,
            total_operations,
            total_stock_value,
            operations_by_type,
            recent_operations,
        })
    }
}

async fn count_pending(conn: &mut SqliteConnection, op_type: OperationType) -> DbResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM operations WHERE type = ?1 AND status NOT IN ('Done', 'Canceled')",
    )
    .bind(op_type)
    .fetch_one(&mut *conn)
    .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use stockmaster_core::{NewOperationItem, OperationInput, OperationStatus};

    use crate::repository::test_support::{fixture, product_input, test_db};

    use super::*;

    #[tokio::test]
    async fn test_empty_database() {
        let db = test_db().await;

        let stats = db.dashboard().stats().await.unwrap();

        assert_eq!(stats.total_products, 0);
        assert_eq!(stats.total_stock_value, Money::zero());
        assert!(stats.operations_by_type.is_empty());
        assert!(stats.recent_operations.is_empty());
    }

    #[tokio::test]
    async fn test_stats() {
        let fx = fixture().await;
        let date = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();

        // OC-001: 8 on hand, reorder 10 → low
        fx.db.stock().upsert(&fx.stock_upsert(8, 8)).await.unwrap();
        // DL-002: nothing → out of stock
        fx.db.products().create(&product_input("DL-002")).await.unwrap();

        let ops = fx.db.operations();
        let item = [NewOperationItem {
            product_id: fx.product_id,
            quantity: 1,
        }];
        let mut receipt = OperationInput::new(OperationType::Receipt, date);
        receipt.status = Some(OperationStatus::Ready);
        receipt.responsible_id = Some(fx.user_id);
        ops.create(&receipt, &item).await.unwrap();
        receipt.status = Some(OperationStatus::Done);
        ops.create(&receipt, &item).await.unwrap();
        let mut delivery = OperationInput::new(OperationType::Delivery, date);
        delivery.status = Some(OperationStatus::Canceled);
        ops.create(&delivery, &[]).await.unwrap();

        let stats = fx.db.dashboard().stats().await.unwrap();

        assert_eq!(stats.total_products, 2);
        assert_eq!(stats.low_stock, 1);
        assert_eq!(stats.out_of_stock, 1);
        assert_eq!(stats.pending_receipts, 1);
        assert_eq!(stats.pending_deliveries, 0);
        assert_eq!(stats.total_operations, 3);
        // 8 × 150.00
        assert_eq!(stats.total_stock_value.to_decimal_string(), "1200.00");
        assert_eq!(stats.operations_by_type.len(), 3);
        assert_eq!(stats.recent_operations.len(), 3);
        assert_eq!(stats.recent_operations[0].op_type, OperationType::Delivery);
        assert_eq!(
            stats.recent_operations[1].responsible_name.as_deref(),
            Some("John Manager")
        );
    }

    #[tokio::test]
    async fn test_stock_value_overflow_is_an_error() {
        let fx = fixture().await;
        fx.db
            .stock()
            .upsert(&fx.stock_upsert(100_000_000_000_000_000, 0))
            .await
            .unwrap();

        let err = fx.db.dashboard().stats().await.unwrap_err();

        assert!(matches!(err, DbError::Internal(_)));
    }
}
