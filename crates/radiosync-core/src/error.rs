//! # Error Types
//!
//! Domain-specific error types for radiosync-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  radiosync-core errors (this file)                                      │
//! │  ├── CoreError        - Catalog / promo table definitions rejected      │
//! │  └── ValidationError  - Setter input rejected (prior value retained)    │
//! │                                                                         │
//! │  configurator app errors (separate crate)                               │
//! │  ├── ConfigError      - Config file / environment problems              │
//! │  ├── TransportError   - Order / lead delivery failures                  │
//! │  └── ApiError         - What the presentation layer sees (serialized)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! - An unknown promo code: it simply contributes no discount.
//! - A total that would go negative: it is floored at zero.
//!
//! The pricing engine itself never returns an error. Everything the user can
//! type is either accepted, clamped, or rejected at the setter boundary.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised while loading static configuration (catalog, promo table).
///
/// These are startup failures, not user-editing failures.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The catalog definition violates an invariant.
    ///
    /// ## When This Occurs
    /// - Volume tiers not strictly increasing by threshold
    /// - Negative unit price or shipping cost
    /// - Discount rate above 100 %
    #[error("Invalid catalog: {reason}")]
    InvalidCatalog { reason: String },

    /// The promo table definition violates an invariant.
    #[error("Invalid promo code '{code}': {reason}")]
    InvalidPromo { code: String, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Returned by `Configuration` setters and input parsers. A rejected setter
/// call leaves the configuration untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g. non-numeric quantity text).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Field cannot be set until another one is.
    #[error("{field} requires {requires} to be selected first")]
    Requires { field: String, requires: String },

    /// Duplicate value (e.g. the same promo code listed twice).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    /// The input field the error is about.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustBeNonNegative { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. }
            | ValidationError::Requires { field, .. }
            | ValidationError::Duplicate { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
