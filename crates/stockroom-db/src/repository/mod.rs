//! # Engine Components
//!
//! One module per component of the engine:
//!
//! - [`catalog`] - supplier/product reference data
//! - [`ledger`] - atomic stock movements (owns the non-negative invariant)
//! - [`sale`] - the derived sale total (owns the totals-consistency invariant)
//! - [`checkout`] - composes ledger + aggregator into atomic units
//! - [`query`] - read-only projections

pub mod catalog;
pub mod checkout;
pub mod ledger;
pub mod query;
pub mod sale;
