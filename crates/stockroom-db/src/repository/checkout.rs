//! # Sale Transaction Orchestrator
//!
//! Composes the stock ledger and the sale aggregator into all-or-nothing
//! units representing "create a sale with N items".
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                │
//! │                                                                     │
//! │  1. START                                                           │
//! │     └── start(customer?) → Sale { total: 0 }                        │
//! │         (never rolled back by later item failures)                  │
//! │                                                                     │
//! │  2. ADD ITEMS (repeat; each is its own atomic unit)                 │
//! │     └── add_item() ── InsufficientStock? item rejected, sale open   │
//! │     └── add_item() ── ok: reserve + insert + recompute, one txn     │
//! │                                                                     │
//! │  3. (OPTIONAL) REMOVE ITEM                                          │
//! │     └── remove_item() → delete + restore + recompute, one txn       │
//! │                                                                     │
//! │  4. FINALIZE                                                        │
//! │     └── finalize() → Bill (pure read; zero items is a valid bill)   │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Semantics
//! `InsufficientStock` on one item is local and non-fatal to the sale as a
//! whole: the caller may keep adding other items (the original's per-item
//! retry loop). Any other failure inside an atomic unit rolls that unit
//! back completely - a committed stock decrement never exists without its
//! item record, and the stored total is never observably stale.

use sqlx::SqlitePool;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::repository::ledger::{reserve_stock, restore_stock};
use crate::repository::sale::{recompute_total, SaleAggregator};
use stockroom_core::validation::validate_quantity;
use stockroom_core::{Bill, BillLine, Money, Sale, SaleItem};

/// Orchestrates multi-step sale mutations under one transaction each.
#[derive(Debug, Clone)]
pub struct SaleOrchestrator {
    pool: SqlitePool,
}

impl SaleOrchestrator {
    /// Creates a new SaleOrchestrator.
    pub fn new(pool: SqlitePool) -> Self {
        SaleOrchestrator { pool }
    }

    /// Starts a sale transaction: creates the (empty) sale row.
    ///
    /// The sale row persists even if no items are ever added or every item
    /// is rejected.
    pub async fn start(&self, customer: Option<&str>) -> EngineResult<Sale> {
        SaleAggregator::new(self.pool.clone())
            .create_sale(customer)
            .await
    }

    /// Adds an item to an open sale.
    ///
    /// Resolves the effective price first: an absent or non-positive
    /// `price_override` means "use the product's current unit price". Then,
    /// in one transaction: conditional stock decrement, item insert, total
    /// recompute - all three commit or none do.
    ///
    /// ## Errors
    /// * `InvalidArgument` - qty <= 0 (before any mutation)
    /// * `NotFound` - sale or product missing (before any mutation)
    /// * `InsufficientStock` - item rejected; stock, items and total are
    ///   untouched and the sale stays open for further items
    /// * `TransactionFailed` / `Busy` - the unit was rolled back; previously
    ///   committed items stand
    pub async fn add_item(
        &self,
        sale_id: &str,
        product_id: &str,
        qty: i64,
        price_override: Option<Money>,
    ) -> EngineResult<SaleItem> {
        validate_quantity(qty)?;

        let mut tx = self.pool.begin().await?;

        let sale: Option<String> = sqlx::query_scalar("SELECT id FROM sales WHERE id = ?1")
            .bind(sale_id)
            .fetch_optional(&mut *tx)
            .await?;
        if sale.is_none() {
            return Err(EngineError::not_found("Sale", sale_id));
        }

        let current_price: Option<Money> =
            sqlx::query_scalar("SELECT unit_price FROM products WHERE id = ?1")
                .bind(product_id)
                .fetch_optional(&mut *tx)
                .await?;
        let current_price = match current_price {
            Some(p) => p,
            None => return Err(EngineError::not_found("Product", product_id)),
        };

        let price = price_override
            .filter(|p| p.cents() > 0)
            .unwrap_or(current_price);

        // Dropping the transaction on the error path rolls everything back.
        if let Err(err) = reserve_stock(&mut *tx, product_id, qty).await {
            if matches!(err, EngineError::InsufficientStock { .. }) {
                warn!(sale_id = %sale_id, product_id = %product_id, qty, "Item rejected, sale stays open");
            }
            return Err(err);
        }

        let item = SaleItem {
            id: Uuid::new_v4().to_string(),
            sale_id: sale_id.to_string(),
            product_id: product_id.to_string(),
            qty,
            price,
            created_at: chrono::Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO sale_items (id, sale_id, product_id, qty, price, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&item.id)
        .bind(&item.sale_id)
        .bind(&item.product_id)
        .bind(item.qty)
        .bind(item.price)
        .bind(item.created_at)
        .execute(&mut *tx)
        .await?;

        recompute_total(&mut *tx, sale_id).await?;

        tx.commit().await?;

        debug!(sale_id = %sale_id, item_id = %item.id, qty, price = %item.price, "Sale item committed");
        Ok(item)
    }

    /// Removes an item from a sale, restoring its stock and recomputing the
    /// total, atomically.
    ///
    /// ## Errors
    /// * `NotFound` - the item does not exist or belongs to another sale
    pub async fn remove_item(&self, sale_id: &str, item_id: &str) -> EngineResult<()> {
        let mut tx = self.pool.begin().await?;

        let item: Option<(String, i64)> = sqlx::query_as(
            r#"
            SELECT product_id, qty
            FROM sale_items
            WHERE id = ?1 AND sale_id = ?2
            "#,
        )
        .bind(item_id)
        .bind(sale_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (product_id, qty) = match item {
            Some(row) => row,
            None => return Err(EngineError::not_found("SaleItem", item_id)),
        };

        sqlx::query("DELETE FROM sale_items WHERE id = ?1")
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        restore_stock(&mut *tx, &product_id, qty).await?;
        recompute_total(&mut *tx, sale_id).await?;

        tx.commit().await?;

        debug!(sale_id = %sale_id, item_id = %item_id, qty, "Sale item removed");
        Ok(())
    }

    /// Produces the line-item listing and authoritative total for display.
    ///
    /// Purely a read: the total comes from the stored sale aggregate, the
    /// lines resolve product names for rendering. A zero-item bill has
    /// total 0.
    pub async fn finalize(&self, sale_id: &str) -> EngineResult<Bill> {
        let sale = SaleAggregator::new(self.pool.clone())
            .get_sale(sale_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Sale", sale_id))?;

        let rows: Vec<(String, String, i64, Money)> = sqlx::query_as(
            r#"
            SELECT si.id, p.name, si.qty, si.price
            FROM sale_items si
            JOIN products p ON p.id = si.product_id
            WHERE si.sale_id = ?1
            ORDER BY si.created_at
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        let lines = rows
            .into_iter()
            .map(|(item_id, product_name, qty, unit_price)| BillLine {
                item_id,
                product_name,
                qty,
                unit_price,
                line_total: unit_price.line_total(qty),
            })
            .collect();

        Ok(Bill {
            sale_id: sale.id,
            customer: sale.customer,
            created_at: sale.created_at,
            lines,
            total: sale.total,
        })
    }
}
