//! # Query Surface
//!
//! Read-only projections consumed by the external presentation layer. Each
//! call is a single consistent snapshot read; there are no invariants to
//! maintain here, so these run outside any write transaction.

use sqlx::SqlitePool;

use crate::error::EngineResult;
use stockroom_core::{DateRange, InventoryRow, LowStockRow, SalesSummary};

/// Read-only query surface.
#[derive(Debug, Clone)]
pub struct Queries {
    pool: SqlitePool,
}

impl Queries {
    /// Creates a new Queries handle.
    pub fn new(pool: SqlitePool) -> Self {
        Queries { pool }
    }

    /// All products with resolved supplier name, price and stock, ordered
    /// by product id.
    pub async fn list_inventory(&self) -> EngineResult<Vec<InventoryRow>> {
        let rows = sqlx::query_as::<_, InventoryRow>(
            r#"
            SELECT p.id, p.name, s.name AS supplier, p.unit_price, p.stock
            FROM products p
            LEFT JOIN suppliers s ON s.id = p.supplier_id
            ORDER BY p.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Products with stock strictly below `threshold`, ordered ascending by
    /// stock.
    pub async fn low_stock(&self, threshold: i64) -> EngineResult<Vec<LowStockRow>> {
        let rows = sqlx::query_as::<_, LowStockRow>(
            r#"
            SELECT id, name, stock
            FROM products
            WHERE stock < ?1
            ORDER BY stock ASC, id
            "#,
        )
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Count and gross revenue of sales whose creation date falls in the
    /// inclusive range; unbounded on either side if a bound is omitted.
    pub async fn sales_summary(&self, range: DateRange) -> EngineResult<SalesSummary> {
        let mut sql = String::from(
            "SELECT COUNT(*) AS count, COALESCE(SUM(total), 0) AS revenue \
             FROM sales WHERE 1=1",
        );
        if range.from.is_some() {
            sql.push_str(" AND date(created_at) >= date(?)");
        }
        if range.to.is_some() {
            sql.push_str(" AND date(created_at) <= date(?)");
        }

        let mut query = sqlx::query_as::<_, SalesSummary>(&sql);
        if let Some(from) = range.from {
            query = query.bind(from);
        }
        if let Some(to) = range.to {
            query = query.bind(to);
        }

        let summary = query.fetch_one(&self.pool).await?;
        Ok(summary)
    }
}
