//! # Stock Ledger
//!
//! Atomic operations that move stock. This component exclusively owns
//! `Product::stock` and the non-negative-stock invariant.
//!
//! ## Check-Then-Decrement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                   reserve_and_commit(product, qty)                  │
//! │                                                                     │
//! │  UPDATE products                                                    │
//! │  SET stock = stock - qty            ← check and decrement are ONE   │
//! │  WHERE id = ? AND stock >= qty        statement: no window where    │
//! │                                       another sale can slip in      │
//! │        │                                                            │
//! │        ├── 1 row  → committed, stock decreased by exactly qty       │
//! │        │                                                            │
//! │        └── 0 rows → product missing?        → NotFound              │
//! │                     stock < qty?            → InsufficientStock     │
//! │                     (stock unchanged either way)                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The original system maintained stock with insert/delete triggers on the
//! event tables; here each movement is an explicit engine operation so the
//! sufficiency check is a typed, testable error path instead of a generic
//! row-insert abort.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use stockroom_core::validation::{validate_price, validate_quantity};
use stockroom_core::{Money, Purchase};

/// The component owning authoritative stock quantities and their atomic
/// adjustment.
#[derive(Debug, Clone)]
pub struct StockLedger {
    pool: SqlitePool,
}

impl StockLedger {
    /// Creates a new StockLedger.
    pub fn new(pool: SqlitePool) -> Self {
        StockLedger { pool }
    }

    /// Receives stock: inserts a purchase event and increases the product's
    /// stock by `qty`, as one atomic unit.
    ///
    /// ## Errors
    /// * `InvalidArgument` - qty <= 0 or cost_price < 0 (before any mutation)
    /// * `NotFound` - no such product (before any mutation)
    pub async fn receive_stock(
        &self,
        product_id: &str,
        qty: i64,
        cost_price: Money,
    ) -> EngineResult<Purchase> {
        validate_quantity(qty)?;
        validate_price("cost_price", cost_price)?;

        debug!(product_id = %product_id, qty = %qty, "Receiving stock");

        let mut tx = self.pool.begin().await?;

        let exists: Option<String> = sqlx::query_scalar("SELECT id FROM products WHERE id = ?1")
            .bind(product_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(EngineError::not_found("Product", product_id));
        }

        let purchase = Purchase {
            id: Uuid::new_v4().to_string(),
            product_id: product_id.to_string(),
            qty,
            cost_price,
            purchased_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO purchases (id, product_id, qty, cost_price, purchased_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&purchase.id)
        .bind(&purchase.product_id)
        .bind(purchase.qty)
        .bind(purchase.cost_price)
        .bind(purchase.purchased_at)
        .execute(&mut *tx)
        .await?;

        restore_stock(&mut *tx, product_id, qty).await?;

        tx.commit().await?;

        Ok(purchase)
    }

    /// Conditionally commits `qty` units out of stock.
    ///
    /// The sufficiency check and the decrement are indivisible with respect
    /// to concurrent callers on the same product. On success stock decreases
    /// by exactly `qty`; on failure it is unchanged.
    ///
    /// ## Errors
    /// * `InvalidArgument` - qty <= 0
    /// * `NotFound` - no such product
    /// * `InsufficientStock` - fewer than `qty` units available
    pub async fn reserve_and_commit(&self, product_id: &str, qty: i64) -> EngineResult<i64> {
        validate_quantity(qty)?;

        let mut conn = self.pool.acquire().await?;
        reserve_stock(&mut *conn, product_id, qty).await?;
        Ok(qty)
    }

    /// Reverses a prior commit, incrementing stock by `qty` unconditionally.
    ///
    /// Used when a sale item is removed or a sale is aborted.
    pub async fn restore(&self, product_id: &str, qty: i64) -> EngineResult<()> {
        validate_quantity(qty)?;

        let mut conn = self.pool.acquire().await?;
        restore_stock(&mut *conn, product_id, qty).await
    }

    /// Current stock level for a product.
    pub async fn stock_level(&self, product_id: &str) -> EngineResult<i64> {
        let stock: Option<i64> = sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await?;

        stock.ok_or_else(|| EngineError::not_found("Product", product_id))
    }
}

// =============================================================================
// Connection-Scoped Operations
// =============================================================================
// The orchestrator composes these into its own transaction so a committed
// stock decrement can never exist without its item record, and vice versa.

/// Conditional decrement on an existing connection/transaction.
pub(crate) async fn reserve_stock(
    conn: &mut SqliteConnection,
    product_id: &str,
    qty: i64,
) -> EngineResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock = stock - ?2, updated_at = ?3
        WHERE id = ?1 AND stock >= ?2
        "#,
    )
    .bind(product_id)
    .bind(qty)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        // Zero rows means either the product is missing or the stock check
        // failed; look once more to tell the two apart.
        let available: Option<i64> = sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
            .bind(product_id)
            .fetch_optional(&mut *conn)
            .await?;

        return match available {
            None => Err(EngineError::not_found("Product", product_id)),
            Some(available) => {
                debug!(product_id = %product_id, available, requested = qty, "Stock reservation rejected");
                Err(EngineError::InsufficientStock {
                    product_id: product_id.to_string(),
                    available,
                    requested: qty,
                })
            }
        };
    }

    debug!(product_id = %product_id, qty, "Stock reserved");
    Ok(())
}

/// Unconditional increment on an existing connection/transaction.
pub(crate) async fn restore_stock(
    conn: &mut SqliteConnection,
    product_id: &str,
    qty: i64,
) -> EngineResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock = stock + ?2, updated_at = ?3
        WHERE id = ?1
        "#,
    )
    .bind(product_id)
    .bind(qty)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(EngineError::not_found("Product", product_id));
    }

    debug!(product_id = %product_id, qty, "Stock restored");
    Ok(())
}
