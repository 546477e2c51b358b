//! # Promo Codes
//!
//! Lookup table from promo code to discount.
//!
//! Codes are matched trimmed and case-insensitive. An unknown or blank code
//! is not an error: it just contributes no discount, since the promo field
//! is optional free text the user edits live.
//!
//! ```rust
//! use radiosync_core::money::Money;
//! use radiosync_core::promo::{PromoDiscount, PromoTable};
//!
//! let table = PromoTable::standard();
//! let (code, discount) = table.lookup(" radio10 ").unwrap();
//! assert_eq!(code, "RADIO10");
//! assert_eq!(discount.amount_on(Money::from_rubles(5_000)), Money::from_rubles(500));
//!
//! assert!(table.lookup("ABC123").is_none());
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::VatRate;
use crate::validation::normalize_promo_code;

/// What a promo code takes off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PromoDiscount {
    /// A share of the amount, in basis points.
    Percent { rate_bps: u32 },
    /// A fixed amount off.
    Fixed { amount: Money },
}

impl PromoDiscount {
    /// Discount granted on `base` (the subtotal after the volume discount).
    ///
    /// Never negative and never more than `base`.
    pub fn amount_on(&self, base: Money) -> Money {
        let base = base.non_negative();
        let raw = match *self {
            PromoDiscount::Percent { rate_bps } => base.percent_bps(rate_bps),
            PromoDiscount::Fixed { amount } => amount,
        };
        raw.non_negative().min(base)
    }
}

/// One row of the promo table, as written in configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoEntry {
    pub code: String,
    #[serde(flatten)]
    pub discount: PromoDiscount,
}

impl PromoEntry {
    pub fn percent(code: &str, rate_bps: u32) -> Self {
        PromoEntry {
            code: code.to_string(),
            discount: PromoDiscount::Percent { rate_bps },
        }
    }

    pub fn fixed(code: &str, amount: Money) -> Self {
        PromoEntry {
            code: code.to_string(),
            discount: PromoDiscount::Fixed { amount },
        }
    }
}

/// Promo codes keyed by their normalized form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromoTable {
    entries: HashMap<String, PromoDiscount>,
}

impl PromoTable {
    /// An empty table: every code contributes zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Codes handed out with the standard price list.
    pub fn standard() -> Self {
        let entries = [
            PromoEntry::percent("RADIO10", 1_000),
            PromoEntry::percent("EXPO5", 500),
            PromoEntry::fixed("MINUS1000", Money::from_rubles(1_000)),
        ];

        let mut table = PromoTable::new();
        for entry in entries {
            table.entries.insert(entry.code, entry.discount);
        }
        table
    }

    /// Builds a table from configuration rows.
    ///
    /// ## Rules
    /// - Codes must be non-blank and unique after normalization
    /// - Percentages may not exceed 100 %
    /// - Fixed amounts may not be negative
    pub fn from_entries(entries: impl IntoIterator<Item = PromoEntry>) -> CoreResult<Self> {
        let mut table = PromoTable::new();

        for entry in entries {
            let code = normalize_promo_code(&entry.code);

            if code.is_empty() {
                return Err(ValidationError::Required {
                    field: "promo code".to_string(),
                }
                .into());
            }

            match entry.discount {
                PromoDiscount::Percent { rate_bps } if rate_bps > VatRate::MAX_BPS => {
                    return Err(CoreError::InvalidPromo {
                        code,
                        reason: "percentage exceeds 100 %".to_string(),
                    });
                }
                PromoDiscount::Fixed { amount } if amount.is_negative() => {
                    return Err(CoreError::InvalidPromo {
                        code,
                        reason: "fixed amount is negative".to_string(),
                    });
                }
                _ => {}
            }

            if table.entries.contains_key(&code) {
                return Err(ValidationError::Duplicate {
                    field: "promo code".to_string(),
                    value: code,
                }
                .into());
            }

            table.entries.insert(code, entry.discount);
        }

        Ok(table)
    }

    /// Looks up a code as typed by the user.
    ///
    /// Returns the normalized code together with its discount.
    pub fn lookup(&self, code: &str) -> Option<(String, PromoDiscount)> {
        let code = normalize_promo_code(code);
        if code.is_empty() {
            return None;
        }
        self.entries.get(&code).map(|discount| (code, *discount))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_trimmed_and_case_insensitive() {
        let table = PromoTable::standard();
        assert!(table.lookup("RADIO10").is_some());
        assert!(table.lookup("radio10").is_some());
        assert!(table.lookup("  Radio10\t").is_some());
    }

    #[test]
    fn test_unknown_and_blank_codes_miss() {
        let table = PromoTable::standard();
        assert!(table.lookup("ABC123").is_none());
        assert!(table.lookup("").is_none());
        assert!(table.lookup("   ").is_none());
    }

    #[test]
    fn test_fixed_discount_is_capped_at_base() {
        let discount = PromoDiscount::Fixed {
            amount: Money::from_rubles(1_000),
        };
        assert_eq!(discount.amount_on(Money::from_rubles(400)), Money::from_rubles(400));
        assert_eq!(discount.amount_on(Money::from_rubles(4_000)), Money::from_rubles(1_000));
        assert_eq!(discount.amount_on(Money::zero()), Money::zero());
    }

    #[test]
    fn test_percent_discount() {
        let discount = PromoDiscount::Percent { rate_bps: 500 };
        assert_eq!(discount.amount_on(Money::from_rubles(3_000)), Money::from_rubles(150));
    }

    #[test]
    fn test_from_entries_rejects_duplicates_after_normalization() {
        let result = PromoTable::from_entries([
            PromoEntry::percent("spring", 500),
            PromoEntry::percent(" SPRING ", 700),
        ]);
        assert!(matches!(
            result,
            Err(CoreError::Validation(ValidationError::Duplicate { .. }))
        ));
    }

    #[test]
    fn test_from_entries_rejects_bad_amounts() {
        assert!(PromoTable::from_entries([PromoEntry::percent("HALFPLUS", 10_001)]).is_err());
        assert!(
            PromoTable::from_entries([PromoEntry::fixed("NEG", Money::from_kopecks(-1))]).is_err()
        );
        assert!(PromoTable::from_entries([PromoEntry::percent("  ", 100)]).is_err());
    }

    #[test]
    fn test_entry_deserializes_flat() {
        let entry: PromoEntry =
            serde_json::from_str(r#"{"code":"EXPO5","kind":"percent","rate_bps":500}"#).unwrap();
        assert_eq!(entry, PromoEntry::percent("EXPO5", 500));
    }
}
