//! # Operation Repository
//!
//! Receipts, deliveries, internal transfers and adjustments, with their
//! line items.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Operation Write Paths                               │
//! │                                                                         │
//! │  create(input, items)                                                  │
//! │   BEGIN                                                                 │
//! │   ├── reference = input.reference                                      │
//! │   │      or "{prefix}/{count(type)+1:04}"   e.g. WH/IN/0003            │
//! │   ├── INSERT operations (status defaults to Draft)                     │
//! │   ├── INSERT operation_items × N                                       │
//! │   COMMIT  (any failure rolls back every row)                           │
//! │                                                                         │
//! │  update(id, input, Some(items))                                        │
//! │   BEGIN → overwrite row → DELETE items → INSERT items → COMMIT         │
//! │                                                                         │
//! │  complete(id, user)                                                    │
//! │   BEGIN → status = Done → move_history × N items → COMMIT              │
//! │           (stock cells are NOT touched)                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Status Policy
//! Every status write goes through [`StatusPolicy::check`]. The permissive
//! policy accepts anything; the strict one follows
//! [`OperationStatus::allowed_predecessors`].
//!
//! ## Reference Numbering
//! The sequence is the count of existing operations of the same type, read
//! inside the create transaction. Deleting an operation can make the next
//! number collide with a surviving reference; the UNIQUE constraint then
//! rejects the create as a duplicate.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use stockmaster_core::{
    format_reference, NewOperationItem, Operation, OperationInput, OperationItem,
    OperationStatus, OperationType, StatusPolicy,
};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::move_history::{self, NewMove};

const SELECT_OPERATION: &str = r#"
    SELECT o.id, o.reference, o.type, o.status, o.from_location, o.to_location,
           o.contact, o.schedule_date, o.responsible_id, u.name AS responsible_name,
           o.notes, o.created_at, o.updated_at
    FROM operations o
    LEFT JOIN users u ON u.id = o.responsible_id
"#;

/// Optional list filters (equality).
#[derive(Debug, Clone, Copy, Default)]
pub struct OperationFilter {
    pub op_type: Option<OperationType>,
    pub status: Option<OperationStatus>,
}

/// Repository for operations and their items.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.operations();
///
/// let receipt = repo
///     .create(&OperationInput::new(OperationType::Receipt, today), &items)
///     .await?;
/// assert_eq!(receipt.reference, "WH/IN/0001");
///
/// repo.complete(receipt.id, Some(user_id)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct OperationRepository {
    pool: SqlitePool,
    policy: StatusPolicy,
}

impl OperationRepository {
    /// Creates a new OperationRepository using `policy` for status writes.
    pub fn new(pool: SqlitePool, policy: StatusPolicy) -> Self {
        OperationRepository { pool, policy }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Lists operations newest first, each with its items.
    pub async fn list(&self, filter: &OperationFilter) -> DbResult<Vec<Operation>> {
        let mut conn = self.pool.acquire().await?;

        let mut operations = sqlx::query_as::<_, Operation>(&format!(
            r#"{SELECT_OPERATION}
            WHERE (?1 IS NULL OR o.type = ?1)
              AND (?2 IS NULL OR o.status = ?2)
            ORDER BY o.created_at DESC, o.id DESC"#
        ))
        .bind(filter.op_type)
        .bind(filter.status)
        .fetch_all(&mut *conn)
        .await?;

        for operation in &mut operations {
            operation.items = fetch_items(&mut conn, operation.id).await?;
        }

        debug!(?filter, count = operations.len(), "Operations listed");
        Ok(operations)
    }

    /// Lists the `limit` newest operations without their items.
    pub async fn recent(&self, limit: i64) -> DbResult<Vec<Operation>> {
        let mut conn = self.pool.acquire().await?;
        fetch_recent(&mut conn, limit).await
    }

    /// Gets an operation with its items.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Operation>> {
        let mut conn = self.pool.acquire().await?;
        fetch_operation(&mut conn, id).await
    }

    /// Counts operations of one type.
    #[cfg(test)]
    pub async fn count_by_type(&self, op_type: OperationType) -> DbResult<i64> {
        let mut conn = self.pool.acquire().await?;
        count_by_type(&mut conn, op_type).await
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Creates an operation and its items atomically.
    ///
    /// ## Arguments
    /// * `input` - header fields; a missing reference is generated
    /// * `items` - inserted in order
    ///
    /// ## Returns
    /// * `Ok(Operation)` - the stored operation with its items
    /// * `Err(DbError::UniqueViolation)` - reference already used
    /// * `Err(DbError::ForeignKeyViolation)` - unknown product or user; nothing written
    pub async fn create(
        &self,
        input: &OperationInput,
        items: &[NewOperationItem],
    ) -> DbResult<Operation> {
        let mut tx = self.pool.begin().await?;

        let reference = match input.reference.as_deref().filter(|r| !r.is_empty()) {
            Some(reference) => reference.to_string(),
            None => format_reference(input.op_type, count_by_type(&mut *tx, input.op_type).await?),
        };

        let now = Utc::now();
        let id = sqlx::query(
            r#"
            INSERT INTO operations
                (reference, type, status, from_location, to_location, contact,
                 schedule_date, responsible_id, notes, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
            "#,
        )
        .bind(&reference)
        .bind(input.op_type)
        .bind(input.status.unwrap_or_default())
        .bind(&input.from_location)
        .bind(&input.to_location)
        .bind(&input.contact)
        .bind(input.schedule_date)
        .bind(input.responsible_id)
        .bind(&input.notes)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        insert_items(&mut *tx, id, items).await?;

        tx.commit().await?;
        info!(
            operation_id = id,
            reference = %reference,
            op_type = %input.op_type,
            items = items.len(),
            "Operation created"
        );

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Operation", id))
    }

    /// Overwrites an operation's header and optionally replaces its items.
    ///
    /// Every header field is written: `None` clears optional columns, and a
    /// `None` status hits the NOT NULL constraint (`DbError::QueryFailed`).
    /// The reference never changes.
    ///
    /// ## Arguments
    /// * `items` - `Some` deletes every existing item and inserts these;
    ///   `None` leaves items untouched
    pub async fn update(
        &self,
        id: i64,
        input: &OperationInput,
        items: Option<&[NewOperationItem]>,
    ) -> DbResult<Operation> {
        let mut tx = self.pool.begin().await?;

        let current: Option<(String, OperationStatus)> =
            sqlx::query_as("SELECT reference, status FROM operations WHERE id = ?1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((reference, current_status)) = current else {
            return Err(DbError::not_found("Operation", id));
        };

        if let Some(next) = input.status {
            self.policy.check(&reference, current_status, next)?;
        }

        let result = sqlx::query(
            r#"
            UPDATE operations
            SET type = ?1, status = ?2, from_location = ?3, to_location = ?4,
                contact = ?5, schedule_date = ?6, responsible_id = ?7, notes = ?8,
                updated_at = ?9
            WHERE id = ?10
            "#,
        )
        .bind(input.op_type)
        .bind(input.status)
        .bind(&input.from_location)
        .bind(&input.to_location)
        .bind(&input.contact)
        .bind(input.schedule_date)
        .bind(input.responsible_id)
        .bind(&input.notes)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Operation", id));
        }

        if let Some(items) = items {
            sqlx::query("DELETE FROM operation_items WHERE operation_id = ?1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            insert_items(&mut *tx, id, items).await?;
        }

        tx.commit().await?;
        info!(
            operation_id = id,
            reference = %reference,
            items_replaced = items.is_some(),
            "Operation updated"
        );

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Operation", id))
    }

    /// Deletes an operation. Items cascade; history rows keep existing with
    /// `operation_id` cleared.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM operations WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Operation", id));
        }

        info!(operation_id = id, "Operation deleted");
        Ok(())
    }

    /// Marks an operation Done and writes one history entry per item.
    ///
    /// ## What This Does
    /// 1. Loads the operation and its items (NotFound if absent)
    /// 2. Checks the status change against the policy
    /// 3. Sets status to Done
    /// 4. Appends a move-history row per item: from/to location and
    ///    quantity copied, notes `"{type} - {reference}"`
    ///
    /// Stock cells are not modified. Completing twice appends the entries
    /// twice under the permissive policy.
    pub async fn complete(&self, id: i64, user_id: Option<i64>) -> DbResult<Operation> {
        let mut tx = self.pool.begin().await?;

        let operation = fetch_operation(&mut *tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Operation", id))?;

        self.policy
            .check(&operation.reference, operation.status, OperationStatus::Done)?;

        sqlx::query("UPDATE operations SET status = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(OperationStatus::Done)
            .bind(Utc::now())
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let note = operation.completion_note();
        for item in &operation.items {
            move_history::record(
                &mut *tx,
                NewMove {
                    product_id: item.product_id,
                    operation_id: Some(id),
                    from_location: operation.from_location.as_deref(),
                    to_location: operation.to_location.as_deref(),
                    quantity: item.quantity,
                    user_id,
                    notes: Some(&note),
                },
            )
            .await?;
        }

        tx.commit().await?;
        info!(
            operation_id = id,
            reference = %operation.reference,
            moves = operation.items.len(),
            "Operation completed"
        );

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Operation", id))
    }
}

// =============================================================================
// Connection-level helpers (shared by pool reads and transactions)
// =============================================================================

async fn count_by_type(conn: &mut SqliteConnection, op_type: OperationType) -> DbResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM operations WHERE type = ?1")
        .bind(op_type)
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}

pub(crate) async fn fetch_recent(conn: &mut SqliteConnection, limit: i64) -> DbResult<Vec<Operation>> {
    let operations = sqlx::query_as::<_, Operation>(&format!(
        "{SELECT_OPERATION} ORDER BY o.created_at DESC, o.id DESC LIMIT ?1"
    ))
    .bind(limit)
    .fetch_all(&mut *conn)
    .await?;
    Ok(operations)
}

async fn fetch_operation(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Operation>> {
    let operation =
        sqlx::query_as::<_, Operation>(&format!("{SELECT_OPERATION} WHERE o.id = ?1"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

    match operation {
        Some(mut operation) => {
            operation.items = fetch_items(conn, id).await?;
            Ok(Some(operation))
        }
        None => Ok(None),
    }
}

async fn fetch_items(conn: &mut SqliteConnection, operation_id: i64) -> DbResult<Vec<OperationItem>> {
    let items = sqlx::query_as::<_, OperationItem>(
        r#"
        SELECT oi.id, oi.operation_id, oi.product_id, oi.quantity,
               p.name AS product_name, p.sku, oi.created_at
        FROM operation_items oi
        LEFT JOIN products p ON p.id = oi.product_id
        WHERE oi.operation_id = ?1
        ORDER BY oi.id
        "#,
    )
    .bind(operation_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(items)
}

async fn insert_items(
    conn: &mut SqliteConnection,
    operation_id: i64,
    items: &[NewOperationItem],
) -> DbResult<()> {
    let now = Utc::now();
    for item in items {
        sqlx::query(
            r#"
            INSERT INTO operation_items (operation_id, product_id, quantity, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(operation_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(now)
        .execute(&mut *conn)
        .await?;
    }
    debug!(operation_id, count = items.len(), "Operation items inserted");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use stockmaster_core::CoreError;

    use crate::repository::stock::StockFilter;
    use crate::repository::test_support::{fixture, product_input, Fixture};

    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 20).unwrap()
    }

    fn receipt(fx: &Fixture) -> OperationInput {
        let mut input = OperationInput::new(OperationType::Receipt, date());
        input.from_location = Some("Vendor".to_string());
        input.to_location = Some("WH/Stock1".to_string());
        input.contact = Some("Azure Interior".to_string());
        input.responsible_id = Some(fx.user_id);
        input
    }

    fn item(product_id: i64, quantity: i64) -> NewOperationItem {
        NewOperationItem { product_id, quantity }
    }

    async fn operation_rows(fx: &Fixture) -> (i64, i64) {
        let operations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM operations")
            .fetch_one(fx.db.pool())
            .await
            .unwrap();
        let items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM operation_items")
            .fetch_one(fx.db.pool())
            .await
            .unwrap();
        (operations, items)
    }

    #[tokio::test]
    async fn test_generated_references_per_type() {
        let fx = fixture().await;
        let repo = fx.db.operations();

        for (op_type, expected) in [
            (OperationType::Receipt, "WH/IN/0001"),
            (OperationType::Receipt, "WH/IN/0002"),
            (OperationType::Delivery, "WH/OUT/0001"),
            (OperationType::InternalTransfer, "WH/INT/0001"),
            (OperationType::Adjustment, "WH/ADJ/0001"),
        ] {
            let op = repo
                .create(&OperationInput::new(op_type, date()), &[])
                .await
                .unwrap();
            assert_eq!(op.reference, expected);
            assert_eq!(op.status, OperationStatus::Draft);
        }

        assert_eq!(repo.count_by_type(OperationType::Receipt).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_supplied_reference_and_collision() {
        let fx = fixture().await;
        let repo = fx.db.operations();

        let mut input = OperationInput::new(OperationType::Delivery, date());
        input.reference = Some("WH/OUT/0002".to_string());
        input.status = Some(OperationStatus::Ready);
        let op = repo.create(&input, &[]).await.unwrap();
        assert_eq!(op.reference, "WH/OUT/0002");
        assert_eq!(op.status, OperationStatus::Ready);

        // One delivery exists, so the generated number is 0002 again
        input.reference = None;
        let err = repo.create(&input, &[]).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
        assert_eq!(repo.count_by_type(OperationType::Delivery).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_round_trips_items() {
        let fx = fixture().await;
        let repo = fx.db.operations();
        let second = fx.db.products().create(&product_input("DL-002")).await.unwrap();

        let created = repo
            .create(&receipt(&fx), &[item(fx.product_id, 20), item(second.id, 5)])
            .await
            .unwrap();

        let op = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(op.items.len(), 2);
        assert_eq!((op.items[0].product_id, op.items[0].quantity), (fx.product_id, 20));
        assert_eq!((op.items[1].product_id, op.items[1].quantity), (second.id, 5));
        assert_eq!(op.items[1].sku.as_deref(), Some("DL-002"));
        assert_eq!(op.responsible_name.as_deref(), Some("John Manager"));
        assert_eq!(op.schedule_date, date());
    }

    #[tokio::test]
    async fn test_create_rolls_back_on_bad_item() {
        let fx = fixture().await;
        let repo = fx.db.operations();

        let err = repo
            .create(&receipt(&fx), &[item(fx.product_id, 1), item(fx.product_id, 2), item(9999, 3)])
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert_eq!(operation_rows(&fx).await, (0, 0));

        // The failed attempt did not consume a reference number
        let op = repo.create(&receipt(&fx), &[]).await.unwrap();
        assert_eq!(op.reference, "WH/IN/0001");
    }

    #[tokio::test]
    async fn test_update_replaces_items() {
        let fx = fixture().await;
        let repo = fx.db.operations();

        let op = repo
            .create(
                &receipt(&fx),
                &[item(fx.product_id, 1), item(fx.product_id, 2), item(fx.product_id, 3)],
            )
            .await
            .unwrap();

        let mut input = receipt(&fx);
        input.status = Some(OperationStatus::Ready);
        input.contact = None;
        let updated = repo
            .update(op.id, &input, Some(&[item(fx.product_id, 9)]))
            .await
            .unwrap();

        assert_eq!(updated.items.len(), 1);
        assert_eq!(updated.items[0].quantity, 9);
        assert_eq!(updated.status, OperationStatus::Ready);
        assert!(updated.contact.is_none());
        assert_eq!(updated.reference, op.reference);
        assert_eq!(operation_rows(&fx).await, (1, 1));

        // Without items the set is left alone
        let kept = repo.update(op.id, &input, None).await.unwrap();
        assert_eq!(kept.items.len(), 1);
    }

    #[tokio::test]
    async fn test_update_without_status_fails_not_null() {
        let fx = fixture().await;
        let repo = fx.db.operations();
        let op = repo.create(&receipt(&fx), &[item(fx.product_id, 1)]).await.unwrap();

        let err = repo.update(op.id, &receipt(&fx), None).await.unwrap_err();

        assert!(matches!(err, DbError::QueryFailed(_)));
        assert_eq!(
            repo.get_by_id(op.id).await.unwrap().unwrap().status,
            OperationStatus::Draft
        );
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let fx = fixture().await;
        let mut input = receipt(&fx);
        input.status = Some(OperationStatus::Ready);

        let err = fx.db.operations().update(9999, &input, None).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_complete_writes_history_not_stock() {
        let fx = fixture().await;
        let repo = fx.db.operations();
        fx.db.stock().upsert(&fx.stock_upsert(45, 40)).await.unwrap();

        let op = repo.create(&receipt(&fx), &[item(fx.product_id, 5)]).await.unwrap();
        let done = repo.complete(op.id, Some(fx.user_id)).await.unwrap();
        assert_eq!(done.status, OperationStatus::Done);

        let history = fx.db.move_history().list(None, None).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].quantity, 5);
        assert_eq!(history[0].operation_id, Some(op.id));
        assert_eq!(history[0].from_location.as_deref(), Some("Vendor"));
        assert_eq!(history[0].to_location.as_deref(), Some("WH/Stock1"));
        assert_eq!(history[0].notes.as_deref(), Some("Receipt - WH/IN/0001"));
        assert_eq!(history[0].operation_reference.as_deref(), Some("WH/IN/0001"));

        let stock = fx.db.stock().list(&StockFilter::default()).await.unwrap();
        assert_eq!(stock[0].on_hand, 45);
    }

    #[tokio::test]
    async fn test_complete_one_entry_per_item() {
        let fx = fixture().await;
        let repo = fx.db.operations();

        let mut input = OperationInput::new(OperationType::Adjustment, date());
        input.status = Some(OperationStatus::Ready);
        let op = repo
            .create(&input, &[item(fx.product_id, -3), item(fx.product_id, 2)])
            .await
            .unwrap();
        repo.complete(op.id, None).await.unwrap();

        let history = fx.db.move_history().list(None, None).await.unwrap();
        let mut quantities: Vec<i64> = history.iter().map(|h| h.quantity).collect();
        quantities.sort();
        assert_eq!(quantities, vec![-3, 2]);
        assert!(history.iter().all(|h| h.user_id.is_none()));
    }

    #[tokio::test]
    async fn test_complete_missing_is_not_found() {
        let fx = fixture().await;
        let err = fx.db.operations().complete(9999, None).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_strict_policy_rejects_disallowed_transitions() {
        let fx = fixture().await;
        let strict = OperationRepository::new(fx.db.pool().clone(), StatusPolicy::Strict);

        let op = strict.create(&receipt(&fx), &[item(fx.product_id, 1)]).await.unwrap();

        // Draft → Done is not allowed
        let err = strict.complete(op.id, None).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Rule(CoreError::InvalidStatusTransition { .. })
        ));
        assert_eq!(fx.db.move_history().count().await.unwrap(), 0);

        let mut input = receipt(&fx);
        input.status = Some(OperationStatus::Ready);
        strict.update(op.id, &input, None).await.unwrap();
        strict.complete(op.id, None).await.unwrap();

        // Done is terminal
        input.status = Some(OperationStatus::Draft);
        assert!(matches!(
            strict.update(op.id, &input, None).await.unwrap_err(),
            DbError::Rule(_)
        ));
    }

    #[tokio::test]
    async fn test_permissive_policy_accepts_anything() {
        let fx = fixture().await;
        let repo = fx.db.operations();
        let op = repo.create(&receipt(&fx), &[]).await.unwrap();

        repo.complete(op.id, None).await.unwrap();

        let mut input = receipt(&fx);
        input.status = Some(OperationStatus::Draft);
        let reopened = repo.update(op.id, &input, None).await.unwrap();
        assert_eq!(reopened.status, OperationStatus::Draft);
    }

    #[tokio::test]
    async fn test_delete_keeps_history() {
        let fx = fixture().await;
        let repo = fx.db.operations();
        let op = repo.create(&receipt(&fx), &[item(fx.product_id, 4)]).await.unwrap();
        repo.complete(op.id, None).await.unwrap();

        repo.delete(op.id).await.unwrap();

        assert_eq!(operation_rows(&fx).await, (0, 0));
        let history = fx.db.move_history().list(None, None).await.unwrap();
        assert_eq!(history.len(), 1);
        assert!(history[0].operation_id.is_none());
        assert!(matches!(repo.delete(op.id).await.unwrap_err(), DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_filters_with_items() {
        let fx = fixture().await;
        let repo = fx.db.operations();

        repo.create(&receipt(&fx), &[item(fx.product_id, 1)]).await.unwrap();
        let mut delivery = OperationInput::new(OperationType::Delivery, date());
        delivery.status = Some(OperationStatus::Waiting);
        repo.create(&delivery, &[item(fx.product_id, 2), item(fx.product_id, 3)])
            .await
            .unwrap();

        let all = repo.list(&OperationFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].op_type, OperationType::Delivery);
        assert_eq!(all[0].items.len(), 2);
        assert_eq!(all[1].items.len(), 1);

        let receipts = repo
            .list(&OperationFilter {
                op_type: Some(OperationType::Receipt),
                status: None,
            })
            .await
            .unwrap();
        assert_eq!(receipts.len(), 1);

        let waiting_receipts = repo
            .list(&OperationFilter {
                op_type: Some(OperationType::Receipt),
                status: Some(OperationStatus::Waiting),
            })
            .await
            .unwrap();
        assert!(waiting_receipts.is_empty());

        assert_eq!(repo.recent(1).await.unwrap().len(), 1);
    }
}
