//! # stockroom-core: Pure Business Logic for Stockroom
//!
//! Stockroom tracks inventory for a small retail/wholesale operation:
//! suppliers, products, incoming stock (purchases) and outgoing stock
//! (sales). This crate holds the domain types and pure rules; the
//! transactional engine that enforces them against SQLite lives in
//! `stockroom-db`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Stockroom Architecture                          │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │        Presentation layer (external collaborator)             │ │
//! │  │   prompts ──► engine calls ──► rendered tables / bills        │ │
//! │  └──────────────────────────────┬────────────────────────────────┘ │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐ │
//! │  │              ★ stockroom-core (THIS CRATE) ★                  │ │
//! │  │                                                               │ │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐               │ │
//! │  │   │   types   │  │   money   │  │ validation │               │ │
//! │  │   │  Product  │  │   Money   │  │   rules    │               │ │
//! │  │   │   Sale    │  │  (cents)  │  │   checks   │               │ │
//! │  │   └───────────┘  └───────────┘  └────────────┘               │ │
//! │  │                                                               │ │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS          │ │
//! │  └──────────────────────────────┬────────────────────────────────┘ │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐ │
//! │  │                stockroom-db (Transactional Engine)            │ │
//! │  │        stock ledger, sale aggregator, orchestrator            │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Supplier, Product, Purchase, Sale, SaleItem)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Validation error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use stockroom_core::Money` instead of
// `use stockroom_core::money::Money`

pub use error::ValidationError;
pub use money::Money;
pub use types::*;
