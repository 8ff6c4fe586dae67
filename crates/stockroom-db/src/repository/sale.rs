//! # Sale Aggregator
//!
//! Maintains the derived `total` of a sale as items are added or removed.
//! This component exclusively owns `Sale::total` and the totals-consistency
//! invariant: the stored total always equals the sum of `qty × price` over
//! the sale's current items.
//!
//! The total is a cached aggregate, recomputed from the item rows inside the
//! same transaction as every item mutation - never a value callers can set
//! independently. Reads trust the cache (`current_total`) rather than
//! re-summing, matching the original bill-printing behavior.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use stockroom_core::{Money, Sale, SaleItem};

/// The component owning the derived, cached sale total.
#[derive(Debug, Clone)]
pub struct SaleAggregator {
    pool: SqlitePool,
}

impl SaleAggregator {
    /// Creates a new SaleAggregator.
    pub fn new(pool: SqlitePool) -> Self {
        SaleAggregator { pool }
    }

    /// Creates a sale with total 0.
    ///
    /// A sale that never receives items stays at total 0; that is a valid
    /// terminal state, not an error.
    pub async fn create_sale(&self, customer: Option<&str>) -> EngineResult<Sale> {
        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            customer: customer.map(str::to_string),
            total: Money::zero(),
            created_at: Utc::now(),
        };

        debug!(id = %sale.id, "Creating sale");

        sqlx::query(
            r#"
            INSERT INTO sales (id, customer, total, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.customer)
        .bind(sale.total)
        .bind(sale.created_at)
        .execute(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Gets a sale by ID.
    pub async fn get_sale(&self, id: &str) -> EngineResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, customer, total, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Gets all items of a sale, in insertion order.
    pub async fn get_items(&self, sale_id: &str) -> EngineResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT id, sale_id, product_id, qty, price, created_at
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Pure read of the maintained total.
    ///
    /// Returns the stored authoritative value; does NOT re-sum the items.
    pub async fn current_total(&self, sale_id: &str) -> EngineResult<Money> {
        let total: Option<Money> = sqlx::query_scalar("SELECT total FROM sales WHERE id = ?1")
            .bind(sale_id)
            .fetch_optional(&self.pool)
            .await?;

        total.ok_or_else(|| EngineError::not_found("Sale", sale_id))
    }

    /// Recomputes the stored total from the sale's current items.
    ///
    /// The orchestrator calls the connection-scoped variant inside the same
    /// transaction as each item mutation; this standalone form exists for
    /// symmetry and repair.
    pub async fn recompute(&self, sale_id: &str) -> EngineResult<()> {
        let mut conn = self.pool.acquire().await?;
        recompute_total(&mut *conn, sale_id).await
    }
}

// =============================================================================
// Connection-Scoped Operations
// =============================================================================

/// Sets the sale's total to the sum of qty × price over its current items,
/// on an existing connection/transaction.
pub(crate) async fn recompute_total(
    conn: &mut SqliteConnection,
    sale_id: &str,
) -> EngineResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE sales
        SET total = COALESCE(
            (SELECT SUM(qty * price) FROM sale_items WHERE sale_id = ?1),
            0
        )
        WHERE id = ?1
        "#,
    )
    .bind(sale_id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(EngineError::not_found("Sale", sale_id));
    }

    debug!(sale_id = %sale_id, "Sale total recomputed");
    Ok(())
}
