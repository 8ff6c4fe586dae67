//! # Validation Error Types
//!
//! Typed input-validation failures for stockroom-core.
//!
//! These are raised before any mutation runs: the engine checks arguments
//! first and only then touches the store, so a validation failure never has
//! side effects. The storage schema repeats the same rules as CHECK
//! constraints, which makes the database the last line of defense rather
//! than the first.
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field name, bounds)
//! 3. Errors are enum variants, never String

use thiserror::Error;

/// Input validation errors.
///
/// These occur when caller-supplied arguments don't meet the domain rules
/// (positive quantities, non-negative prices, non-empty names). The engine
/// wraps them in its `InvalidArgument` variant.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive (quantities).
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range (prices must be >= 0).
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },
}

/// Convenience type alias for Results with ValidationError.
pub type ValidationResult<T> = Result<T, ValidationError>;
