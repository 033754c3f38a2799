//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Stock Rollup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How total_stock Is Computed                          │
//! │                                                                         │
//! │  products p  LEFT JOIN  stock s ON s.product_id = p.id                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  GROUP BY p.id → COALESCE(SUM(s.on_hand), 0) AS total_stock            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Product::with_status()                                                │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │ OC-001 | total 45 | reorder 20 | Normal │                           │
//! │  │ MN-004 | total  8 | reorder 15 | Low    │                           │
//! │  │ SD-005 | total  0 | reorder 10 | Out    │                           │
//! │  └─────────────────────────────────────────┘                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The status column is derived on every read and never stored.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use stockmaster_core::{Product, ProductInput};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

const SELECT_PRODUCT: &str = r#"
    SELECT p.id, p.name, p.sku, p.category, p.unit_of_measure, p.reorder_level,
           p.description, p.created_at, p.updated_at,
           COALESCE(SUM(s.on_hand), 0) AS total_stock
    FROM products p
    LEFT JOIN stock s ON s.product_id = p.id
"#;

/// Optional list filters. Empty strings count as absent.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Exact category match.
    pub category: Option<String>,
    /// Case-insensitive substring of name or SKU.
    pub search: Option<String>,
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let low = repo
///     .list(&ProductFilter { search: Some("desk".into()), ..Default::default() })
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products, newest first, with stock totals and status.
    pub async fn list(&self, filter: &ProductFilter) -> DbResult<Vec<Product>> {
        debug!(?filter, "Listing products");

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_PRODUCT);
        let mut has_where = false;

        if let Some(category) = filter.category.as_deref().filter(|c| !c.is_empty()) {
            builder.push(" WHERE p.category = ");
            builder.push_bind(category.to_string());
            has_where = true;
        }

        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search);
            builder.push(if has_where { " AND " } else { " WHERE " });
            builder.push("(p.name LIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR p.sku LIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }

        builder.push(" GROUP BY p.id ORDER BY p.created_at DESC, p.id DESC");

        let products = builder
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Products listed");
        Ok(products.into_iter().map(Product::with_status).collect())
    }

    /// Gets a product by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "{SELECT_PRODUCT} WHERE p.id = ?1 GROUP BY p.id"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product.map(Product::with_status))
    }

    /// Creates a product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - with `total_stock` 0 and status Out of Stock
    /// * `Err(DbError::UniqueViolation)` - SKU taken
    pub async fn create(&self, input: &ProductInput) -> DbResult<Product> {
        if self.sku_taken(&input.sku, None).await? {
            return Err(DbError::duplicate("sku", &input.sku));
        }

        let now = Utc::now();
        let id = sqlx::query(
            r#"
            INSERT INTO products
                (name, sku, category, unit_of_measure, reorder_level, description,
                 created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            "#,
        )
        .bind(&input.name)
        .bind(&input.sku)
        .bind(&input.category)
        .bind(&input.unit_of_measure)
        .bind(input.reorder_level)
        .bind(&input.description)
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        info!(product_id = id, sku = %input.sku, "Product created");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Overwrites every field of a product.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - SKU belongs to another product
    /// * `Err(DbError::NotFound)` - no such product
    pub async fn update(&self, id: i64, input: &ProductInput) -> DbResult<Product> {
        if self.sku_taken(&input.sku, Some(id)).await? {
            return Err(DbError::duplicate("sku", &input.sku));
        }

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?1, sku = ?2, category = ?3, unit_of_measure = ?4,
                reorder_level = ?5, description = ?6, updated_at = ?7
            WHERE id = ?8
            "#,
        )
        .bind(&input.name)
        .bind(&input.sku)
        .bind(&input.category)
        .bind(&input.unit_of_measure)
        .bind(input.reorder_level)
        .bind(&input.description)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        info!(product_id = id, "Product updated");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Deletes a product. Stock cells, operation items and history cascade.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        info!(product_id = id, "Product deleted");
        Ok(())
    }

    /// Distinct categories in alphabetical order.
    pub async fn categories(&self) -> DbResult<Vec<String>> {
        let categories: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT category FROM products ORDER BY category")
                .fetch_all(&self.pool)
                .await?;
        Ok(categories)
    }

    /// Counts products in the catalog.
    #[cfg(test)]
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn sku_taken(&self, sku: &str, exclude_id: Option<i64>) -> DbResult<bool> {
        let existing: Option<i64> =
            sqlx::query_scalar("SELECT id FROM products WHERE sku = ?1 AND id != ?2")
                .bind(sku)
                .bind(exclude_id.unwrap_or(0))
                .fetch_optional(&self.pool)
                .await?;
        Ok(existing.is_some())
    }
}
