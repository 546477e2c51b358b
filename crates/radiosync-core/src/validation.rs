//! # Validation Module
//!
//! Input validation and parsing for everything the user can type.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation (excluded)                                      │
//! │  └── Renders inputs, forwards raw text                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── parse_quantity_input("12") → 12      ("1a" → rejected)            │
//! │  ├── parse_percent_input("20,5") → 20.5 % (clamped to 0..=100)         │
//! │  └── customer / webhook checks before submission                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Configuration setters                                        │
//! │  └── Typed values only; invariants (headphones need a type, charger    │
//! │      must exist in the catalog)                                        │
//! │                                                                         │
//! │  A rejection never reaches the pricing engine: the previous valid      │
//! │  value stays in place.                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::VatRate;
use crate::{MAX_BUNDLE_COUNT, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a per-bundle item quantity.
///
/// ## Rules
/// - Must not be negative
/// - Must not exceed MAX_ITEM_QUANTITY
///
/// ```rust
/// use radiosync_core::validation::validate_quantity;
///
/// assert_eq!(validate_quantity("receiver_qty", 0), Ok(0));
/// assert_eq!(validate_quantity("receiver_qty", 12), Ok(12));
/// assert!(validate_quantity("receiver_qty", -1).is_err());
/// ```
pub fn validate_quantity(field: &str, qty: i64) -> ValidationResult<u32> {
    validate_bounded(field, qty, MAX_ITEM_QUANTITY)
}

/// Validates the bundle multiplier.
///
/// Zero is accepted and stored as entered; the pricing engine treats it as 1.
pub fn validate_bundle_count(count: i64) -> ValidationResult<u32> {
    validate_bounded("bundle_count", count, MAX_BUNDLE_COUNT)
}

fn validate_bounded(field: &str, value: i64, max: u32) -> ValidationResult<u32> {
    if value < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    if value > max as i64 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: max as i64,
        });
    }

    Ok(value as u32)
}

/// Converts a VAT percentage into a rate, clamping to [0, 100].
///
/// ## Rules
/// - NaN / infinity are rejected (prior rate stays)
/// - Anything below 0 becomes 0 %, anything above 100 becomes 100 %
/// - Precision is 0.01 %
///
/// ```rust
/// use radiosync_core::validation::clamp_vat_percent;
///
/// assert_eq!(clamp_vat_percent(20.0).unwrap().bps(), 2000);
/// assert_eq!(clamp_vat_percent(12.5).unwrap().bps(), 1250);
/// assert_eq!(clamp_vat_percent(250.0).unwrap().bps(), 10_000);
/// assert_eq!(clamp_vat_percent(-5.0).unwrap().bps(), 0);
/// assert!(clamp_vat_percent(f64::NAN).is_err());
/// ```
pub fn clamp_vat_percent(percent: f64) -> ValidationResult<VatRate> {
    if !percent.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "vat_rate".to_string(),
            reason: "must be a number".to_string(),
        });
    }

    let clamped = percent.clamp(0.0, 100.0);
    Ok(VatRate::from_bps((clamped * 100.0).round() as u32))
}

// =============================================================================
// Text Input Parsers
// =============================================================================

/// Parses a quantity text field.
///
/// ## Rules
/// - Only ASCII digits are accepted; an empty field means 0
/// - Signs, spaces, decimals and letters are rejected
/// - The value must not exceed MAX_ITEM_QUANTITY
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  "Количество аудиогидов" field                                          │
/// │                                                                         │
/// │  user types "12"  ──► parse_quantity_input ──► Ok(12)  ──► setter       │
/// │  user types "12a" ──► parse_quantity_input ──► Err     ──► keep 12      │
/// │  user clears      ──► parse_quantity_input ──► Ok(0)   ──► setter       │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn parse_quantity_input(field: &str, text: &str) -> ValidationResult<u32> {
    parse_digits(field, text, MAX_ITEM_QUANTITY)
}

/// Parses the bundle count text field (same rules, different cap).
pub fn parse_bundle_input(text: &str) -> ValidationResult<u32> {
    parse_digits("bundle_count", text, MAX_BUNDLE_COUNT)
}

fn parse_digits(field: &str, text: &str, max: u32) -> ValidationResult<u32> {
    if text.is_empty() {
        return Ok(0);
    }

    if !text.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must contain only digits".to_string(),
        });
    }

    // Leading zeros and long digit runs are fine; overflow is just "too big".
    let value = text.parse::<i64>().unwrap_or(i64::MAX);
    validate_bounded(field, value, max)
}

/// Parses the VAT percentage field (`"20"`, `"12.5"`, `"12,5"`).
///
/// An empty field means 0 %. The result is clamped like `clamp_vat_percent`.
pub fn parse_percent_input(text: &str) -> ValidationResult<VatRate> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(VatRate::zero());
    }

    let percent = text
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: "vat_rate".to_string(),
            reason: "must be a number".to_string(),
        })?;

    clamp_vat_percent(percent)
}

/// Normalizes a promo code for lookup: trimmed, upper-cased.
///
/// ```rust
/// use radiosync_core::validation::normalize_promo_code;
///
/// assert_eq!(normalize_promo_code("  radio10 "), "RADIO10");
/// ```
pub fn normalize_promo_code(code: &str) -> String {
    code.trim().to_uppercase()
}

// =============================================================================
// Submission Validators
// =============================================================================

/// Validates the customer's name (required after trimming).
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    Ok(())
}

/// Validates the customer's email.
///
/// ## Rules
/// - Required (after trimming)
/// - Must contain `@`
///
/// Deliverability is not checked here: the order desk follows up by phone.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if !email.contains('@') {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must contain '@'".to_string(),
        });
    }

    Ok(())
}

/// Minimum subscriber digits in a phone number (after the country code).
pub const MIN_PHONE_DIGITS: usize = 10;

/// Validates a phone number.
///
/// ## Rules
/// - Formatting characters (spaces, dashes, parentheses) are ignored
/// - A leading `+` is followed by a one-digit country code, which is not
///   counted (the form pre-fills `+7`)
/// - At least MIN_PHONE_DIGITS digits must remain
///
/// ```rust
/// use radiosync_core::validation::validate_phone;
///
/// assert!(validate_phone("+7 (916) 123-45-67").is_ok());
/// assert!(validate_phone("89161234567").is_ok());
/// assert!(validate_phone("+7").is_err());
/// assert!(validate_phone("+7 916 12").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();
    let digits: Vec<char> = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    let subscriber_digits = if phone.starts_with('+') {
        digits.len().saturating_sub(1)
    } else {
        digits.len()
    };

    if subscriber_digits < MIN_PHONE_DIGITS {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: format!("must contain at least {} digits", MIN_PHONE_DIGITS),
        });
    }

    Ok(())
}

/// Validates that a webhook URL was entered.
///
/// Scheme and syntax are checked by the app layer, which owns the transport.
pub fn validate_webhook_url_present(url: &str) -> ValidationResult<()> {
    if url.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "webhook_url".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
