//! # Engine Error Types
//!
//! The error taxonomy of the transactional engine.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                │
//! │                                                                     │
//! │  SQLite Error (sqlx::Error)                                         │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  EngineError (this module) ← categorized: Busy, TransactionFailed   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  Presentation layer surfaces the message verbatim                   │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Propagation Policy
//! - `NotFound` / `InvalidArgument` are detected before any mutation and
//!   returned with no side effects.
//! - `InsufficientStock` during `add_item` rejects that one item; the sale
//!   stays open.
//! - `TransactionFailed` / `Busy` abort only the atomic unit in progress;
//!   everything previously committed stays intact, and `Busy` is retryable.

use thiserror::Error;

use stockroom_core::ValidationError;

/// Engine operation errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Referenced supplier/product/sale/item does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Caller-supplied argument violates a domain rule (non-positive
    /// quantity, negative price, empty required name). Raised before any
    /// mutation runs.
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ValidationError),

    /// A stock commit would drive the product's stock negative.
    ///
    /// ## When This Occurs
    /// The conditional decrement in `reserve_and_commit` found fewer units
    /// than requested. Stock is left unchanged.
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// An atomic unit could not complete: storage-level abort, constraint
    /// violation, or an unexpected driver error. The unit was rolled back.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Contention timeout (database locked or pool exhausted). Retryable.
    #[error("Store is busy, retry the operation")]
    Busy,

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

impl EngineError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        EngineError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Whether the caller may simply retry the failed operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::Busy)
    }
}

/// Convert sqlx errors to EngineError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound              → NotFound
/// sqlx::Error::Database (busy/locked)   → Busy
/// sqlx::Error::Database (constraint)    → TransactionFailed
/// sqlx::Error::PoolTimedOut             → Busy
/// sqlx::Error::PoolClosed               → ConnectionFailed
/// Other                                 → TransactionFailed
/// ```
impl From<sqlx::Error> for EngineError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => EngineError::NotFound {
                entity: "record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message().to_string();

                // SQLITE_BUSY surfaces as "database is locked" once the
                // busy_timeout elapses; both writers-contending cases are
                // retryable from the caller's perspective.
                if msg.contains("database is locked") || msg.contains("database table is locked") {
                    EngineError::Busy
                } else {
                    // CHECK, UNIQUE and FOREIGN KEY violations land here:
                    // the schema is the last line of defense and only
                    // rejects, never repairs.
                    EngineError::TransactionFailed(msg)
                }
            }

            sqlx::Error::PoolTimedOut => EngineError::Busy,

            sqlx::Error::PoolClosed => EngineError::ConnectionFailed("pool is closed".to_string()),

            _ => EngineError::TransactionFailed(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for EngineError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        EngineError::MigrationFailed(err.to_string())
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EngineError::InsufficientStock {
            product_id: "p-1".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product p-1: available 3, requested 5"
        );

        let err = EngineError::not_found("Product", "p-9");
        assert_eq!(err.to_string(), "Product not found: p-9");
    }

    #[test]
    fn test_retryable() {
        assert!(EngineError::Busy.is_retryable());
        assert!(!EngineError::TransactionFailed("x".to_string()).is_retryable());
    }

    #[test]
    fn test_validation_converts_to_invalid_argument() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let engine_err: EngineError = validation_err.into();
        assert!(matches!(engine_err, EngineError::InvalidArgument(_)));
    }

    #[test]
    fn test_pool_timeout_maps_to_busy() {
        let engine_err: EngineError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(engine_err, EngineError::Busy));
    }
}
