//! # API Error Type
//!
//! Unified error type for configurator commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Configurator                       │
//! │                                                                         │
//! │  Presentation                 Rust Backend                              │
//! │  ────────────                 ────────────                              │
//! │                                                                         │
//! │  set_receiver_qty("1a")                                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Validation Error? ─── ValidationError ──────────► ApiError ───►│  │
//! │  │         │              (state unchanged)                         │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "VALIDATION_ERROR",                                          │
//! │    "message": "receiver_qty has invalid format: must contain only      │
//! │                digits" }                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Submission outcomes are not errors here: order commands report them as
//! `Notification`s.

use serde::Serialize;

use radiosync_core::{CoreError, ValidationError};

/// Error returned to the presentation layer.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "headphones_qty requires headphones_type to be selected first"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed
    ValidationError,

    /// Unknown command or argument
    NotFound,

    /// Catalog or promo table problem
    ConfigError,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a not found error.
    pub fn not_found(what: &str, name: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", what, name))
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => e.into(),
            other => ApiError::new(ErrorCode::ConfigError, other.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_screaming_snake_code() {
        let err = ApiError::from(ValidationError::MustBeNonNegative {
            field: "receiver_qty".into(),
        });
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "receiver_qty must not be negative");
    }

    #[test]
    fn test_core_errors_map_to_codes() {
        let err = ApiError::from(CoreError::InvalidCatalog {
            reason: "bad".into(),
        });
        assert_eq!(err.code, ErrorCode::ConfigError);

        let err = ApiError::from(CoreError::Validation(ValidationError::Required {
            field: "name".into(),
        }));
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
