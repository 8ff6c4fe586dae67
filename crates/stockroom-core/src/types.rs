//! # Domain Types
//!
//! Core domain types used throughout Stockroom.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌───────────────┐    ┌───────────────┐    ┌───────────────┐       │
//! │  │   Supplier    │◄───│    Product    │◄───│   Purchase    │       │
//! │  │ ───────────── │ ?  │ ───────────── │    │ ───────────── │       │
//! │  │ id (UUID)     │    │ id (UUID)     │    │ stock-in      │       │
//! │  │ name (unique) │    │ unit_price    │    │ event         │       │
//! │  └───────────────┘    │ stock >= 0    │    └───────────────┘       │
//! │                       └───────▲───────┘                            │
//! │                               │                                    │
//! │  ┌───────────────┐    ┌───────┴───────┐                            │
//! │  │     Sale      │◄───│   SaleItem    │                            │
//! │  │ ───────────── │    │ ───────────── │    stock-out event;        │
//! │  │ total derived │    │ qty, price    │    insertion conditional   │
//! │  │ from items    │    │ snapshot      │    on available stock      │
//! │  └───────────────┘    └───────────────┘                            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Purchases and sale items are append-mostly *events*; the authoritative
//! `Product::stock` counter and `Sale::total` aggregate are what the engine
//! folds those events into, atomically with each insert or delete.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Supplier
// =============================================================================

/// A supplier that products may reference.
///
/// The reference is weak: deleting a supplier clears `Product::supplier_id`
/// on its products, it never deletes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Supplier {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Supplier name - unique, non-empty.
    pub name: String,

    /// Contact phone, optional.
    pub phone: Option<String>,

    /// Contact email, optional.
    pub email: Option<String>,

    /// When the supplier was recorded.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A product tracked in inventory.
///
/// `stock` is exclusively owned by the stock ledger: it only moves through
/// `receive_stock`, `reserve_and_commit` and `restore`, and is never
/// observable below zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Product name - unique, non-empty.
    pub name: String,

    /// Weak reference to the supplier; nullable.
    pub supplier_id: Option<String>,

    /// Current selling price per unit.
    pub unit_price: Money,

    /// Units on hand. Never negative.
    pub stock: i64,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// Last mutation (price or stock) timestamp.
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Purchase
// =============================================================================

/// A stock-in event: goods received from a supplier.
///
/// Inserting a purchase increases the product's stock by `qty`, atomically
/// with the insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Purchase {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Product the stock was received for.
    pub product_id: String,

    /// Units received. Strictly positive.
    pub qty: i64,

    /// Cost per unit at receiving time.
    pub cost_price: Money,

    /// When the stock was received.
    pub purchased_at: DateTime<Utc>,
}

// =============================================================================
// Sale
// =============================================================================

/// A sale with a derived, cached total.
///
/// `total` always equals the sum of `qty × price` over the sale's current
/// items; the aggregator recomputes it inside the same transaction as every
/// item insert or delete. A sale with zero items (total 0) is a valid
/// terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Customer name, optional.
    pub customer: Option<String>,

    /// Cached sum over current items. Authoritative for display.
    pub total: Money,

    /// When the sale was created.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Sale Item
// =============================================================================

/// A stock-out event: one line of a sale.
///
/// ## Snapshot Pattern
/// `price` is the unit price at insertion time (the product's current price
/// or a caller override). Later price updates never rewrite history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning sale. Deleting the sale deletes its items.
    pub sale_id: String,

    /// Product sold. Deletion of the product is blocked while items exist.
    pub product_id: String,

    /// Units sold. Strictly positive; never more than was in stock at
    /// insertion time.
    pub qty: i64,

    /// Unit price snapshot.
    pub price: Money,

    /// When the item was added.
    pub created_at: DateTime<Utc>,
}

impl SaleItem {
    /// Line total for this item (qty × price).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.line_total(self.qty)
    }
}

// =============================================================================
// Query Projections
// =============================================================================

/// One row of the inventory listing: product with resolved supplier name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryRow {
    pub id: String,
    pub name: String,
    /// Resolved supplier name; `None` when the product has no supplier.
    pub supplier: Option<String>,
    pub unit_price: Money,
    pub stock: i64,
}

/// One row of the low-stock report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct LowStockRow {
    pub id: String,
    pub name: String,
    pub stock: i64,
}

/// Sales count and gross revenue over a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SalesSummary {
    /// Number of sales whose creation date falls in the range.
    pub count: i64,
    /// Sum of those sales' totals.
    pub revenue: Money,
}

/// Inclusive date range for [`SalesSummary`]; either side may be unbounded.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Unbounded on both sides: every sale counts.
    pub const fn all() -> Self {
        DateRange {
            from: None,
            to: None,
        }
    }

    /// A single day, bounded on both sides.
    pub const fn on(day: NaiveDate) -> Self {
        DateRange {
            from: Some(day),
            to: Some(day),
        }
    }
}

// =============================================================================
// Bill
// =============================================================================

/// One rendered line of a bill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillLine {
    pub item_id: String,
    pub product_name: String,
    pub qty: i64,
    pub unit_price: Money,
    pub line_total: Money,
}

/// The line-item listing and authoritative total for a finalized sale.
///
/// `total` comes from the stored sale aggregate, not from re-summing the
/// lines at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    pub sale_id: String,
    pub customer: Option<String>,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<BillLine>,
    pub total: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================
