//! # stockroom-db: Transactional Engine for Stockroom
//!
//! This crate provides the transactional stock-consistency engine over
//! SQLite: the set of atomic operations that mutate product stock and
//! derived sale totals under concurrent access, and the invariants they
//! preserve.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Stockroom Data Flow                           │
//! │                                                                     │
//! │  Presentation layer (external)                                      │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │                  stockroom-db (THIS CRATE)                    │ │
//! │  │                                                               │ │
//! │  │  ┌──────────┐ ┌────────────┐ ┌──────────────┐ ┌───────────┐  │ │
//! │  │  │ Catalog  │ │StockLedger │ │SaleAggregator│ │  Queries  │  │ │
//! │  │  └──────────┘ └─────▲──────┘ └──────▲───────┘ └───────────┘  │ │
//! │  │                     │               │                        │ │
//! │  │              ┌──────┴───────────────┴──────┐                 │ │
//! │  │              │      SaleOrchestrator       │                 │ │
//! │  │              │  (one transaction per unit) │                 │ │
//! │  │              └─────────────────────────────┘                 │ │
//! │  └───────────────────────────────┬───────────────────────────────┘ │
//! │                                  │                                  │
//! │  ┌───────────────────────────────▼───────────────────────────────┐ │
//! │  │                       SQLite Database                         │ │
//! │  │   CHECK constraints + referential actions: last line of       │ │
//! │  │   defense (reject only, never repair)                         │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//!
//! - Stock never negative: the ledger's check-and-decrement is one
//!   statement; the schema CHECK backs it up.
//! - Total always consistent: the aggregator recomputes the cached sale
//!   total inside the same transaction as every item insert or delete.
//! - Event/aggregate pairing: a committed stock decrement never exists
//!   without its item record, and vice versa.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockroom_db::{Database, DbConfig};
//! use stockroom_core::Money;
//!
//! let db = Database::new(DbConfig::new("path/to/stockroom.db")).await?;
//!
//! let beans = db.catalog().create_product("Beans", None, Money::from_cents(1000)).await?;
//! db.ledger().receive_stock(&beans.id, 5, Money::from_cents(600)).await?;
//!
//! let sale = db.checkout().start(Some("Alice")).await?;
//! db.checkout().add_item(&sale.id, &beans.id, 3, None).await?;
//! let bill = db.checkout().finalize(&sale.id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{EngineError, EngineResult};
pub use pool::{Database, DbConfig};

// Component re-exports for convenience
pub use repository::catalog::CatalogRepository;
pub use repository::checkout::SaleOrchestrator;
pub use repository::ledger::StockLedger;
pub use repository::query::Queries;
pub use repository::sale::SaleAggregator;
