//! # Orders
//!
//! Everything that leaves the configurator: the frozen order snapshot, the
//! customer's contact details, and the bundle summary label.
//!
//! ## Snapshot Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Configuration ──capture()──► OrderSnapshot ──► transport (app layer)   │
//! │       │                            │                                    │
//! │       │ keeps changing             │ frozen: id, captured_at, items,    │
//! │       ▼                            │ breakdown, every selection         │
//! │  (user edits)                      ▼                                    │
//! │                              retried as-is on failure                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::{line_items, LineItem};
use crate::catalog::Catalog;
use crate::configuration::Configuration;
use crate::pricing::{compute_breakdown, Breakdown};
use crate::promo::PromoTable;
use crate::types::{ChargerVariant, DeliveryZone, HeadphonesType, VatRate};
use crate::validation::{validate_customer_name, validate_email, validate_phone, ValidationResult};

// =============================================================================
// Order Snapshot
// =============================================================================

/// Per-bundle quantities as selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Quantities {
    pub transmitter: u32,
    pub receiver: u32,
    pub microphone: u32,
}

/// Headphone selection (type and quantity travel together).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HeadphonesSelection {
    pub kind: HeadphonesType,
    pub quantity: u32,
}

/// An immutable copy of a configuration and its price, taken at submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderSnapshot {
    pub id: String,
    #[ts(as = "String")]
    pub captured_at: DateTime<Utc>,
    pub delivery_zone: DeliveryZone,
    pub quantities: Quantities,
    pub headphones: Option<HeadphonesSelection>,
    pub charger: Option<ChargerVariant>,
    pub promo_code: String,
    pub vat_included: bool,
    pub vat_rate: VatRate,
    /// As entered (0 is kept; pricing counted it as 1).
    pub bundle_count: u32,
    pub items: Vec<LineItem>,
    pub breakdown: Breakdown,
}

impl OrderSnapshot {
    /// Captures the configuration now, with a fresh id.
    pub fn capture(config: &Configuration, catalog: &Catalog, promos: &PromoTable) -> Self {
        Self::capture_at(config, catalog, promos, Uuid::new_v4(), Utc::now())
    }

    /// Captures with an explicit id and timestamp.
    pub fn capture_at(
        config: &Configuration,
        catalog: &Catalog,
        promos: &PromoTable,
        id: Uuid,
        captured_at: DateTime<Utc>,
    ) -> Self {
        let headphones = config.headphones_type().map(|kind| HeadphonesSelection {
            kind,
            quantity: config.headphones_qty(),
        });

        OrderSnapshot {
            id: id.to_string(),
            captured_at,
            delivery_zone: config.delivery_zone(),
            quantities: Quantities {
                transmitter: config.transmitter_qty(),
                receiver: config.receiver_qty(),
                microphone: config.microphone_qty(),
            },
            headphones,
            charger: config.charger_variant().cloned(),
            promo_code: config.promo_code().to_string(),
            vat_included: config.vat_included(),
            vat_rate: config.vat_rate(),
            bundle_count: config.bundle_count(),
            items: line_items(config, catalog),
            breakdown: compute_breakdown(config, catalog, promos),
        }
    }

    /// True when nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Customer Info
// =============================================================================

/// Contact details entered in the order dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Default for CustomerInfo {
    /// The phone field starts pre-filled with the Russian country code.
    fn default() -> Self {
        CustomerInfo {
            name: String::new(),
            email: String::new(),
            phone: "+7".to_string(),
        }
    }
}

impl CustomerInfo {
    pub fn new(name: &str, email: &str, phone: &str) -> Self {
        CustomerInfo {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
        }
    }

    /// Checks name, then email, then phone; reports the first problem.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_customer_name(&self.name)?;
        validate_email(&self.email)?;
        validate_phone(&self.phone)?;
        Ok(())
    }

    /// Copy with surrounding whitespace removed.
    pub fn trimmed(&self) -> Self {
        CustomerInfo::new(self.name.trim(), self.email.trim(), self.phone.trim())
    }
}

// =============================================================================
// Bundle Label
// =============================================================================

/// Summary label for multi-bundle orders: "За 3 комплекта".
///
/// `None` for a single bundle (or 0, which counts as one).
///
/// ```rust
/// use radiosync_core::order::bundle_label;
///
/// assert_eq!(bundle_label(1), None);
/// assert_eq!(bundle_label(2).as_deref(), Some("За 2 комплекта"));
/// assert_eq!(bundle_label(5).as_deref(), Some("За 5 комплектов"));
/// ```
pub fn bundle_label(bundles: u32) -> Option<String> {
    if bundles <= 1 {
        return None;
    }

    let suffix = if bundles > 4 { "ов" } else { "а" };
    Some(format!("За {} комплект{}", bundles, suffix))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::validation::MIN_PHONE_DIGITS;
    use chrono::TimeZone;

    #[test]
    fn test_snapshot_freezes_configuration() {
        let catalog = Catalog::standard();
        let promos = PromoTable::standard();
        let mut config = Configuration::new();
        config.set_receiver_qty(2).unwrap();
        config.set_transmitter_qty(1).unwrap();
        config.set_headphones_type(Some(HeadphonesType::InEar));
        config.set_bundle_count(0).unwrap();

        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let id = Uuid::nil();
        let snapshot = OrderSnapshot::capture_at(&config, &catalog, &promos, id, at);

        config.set_receiver_qty(50).unwrap();

        assert_eq!(snapshot.id, Uuid::nil().to_string());
        assert_eq!(snapshot.captured_at, at);
        assert_eq!(snapshot.quantities.receiver, 2);
        assert_eq!(snapshot.bundle_count, 0);
        assert_eq!(snapshot.breakdown.effective_bundles, 1);
        assert_eq!(snapshot.breakdown.total, Money::from_rubles(4_200));
        assert_eq!(
            snapshot.headphones,
            Some(HeadphonesSelection {
                kind: HeadphonesType::InEar,
                quantity: 0
            })
        );
        assert_eq!(snapshot.items.len(), 2);
    }

    #[test]
    fn test_capture_assigns_fresh_ids() {
        let catalog = Catalog::standard();
        let promos = PromoTable::standard();
        let config = Configuration::new();

        let a = OrderSnapshot::capture(&config, &catalog, &promos);
        let b = OrderSnapshot::capture(&config, &catalog, &promos);
        assert_ne!(a.id, b.id);
        assert!(a.is_empty());
    }

    #[test]
    fn test_snapshot_json_shape() {
        let catalog = Catalog::standard();
        let snapshot = OrderSnapshot::capture(&Configuration::new(), &catalog, &PromoTable::new());
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["deliveryZone"], "moscow");
        assert_eq!(json["bundleCount"], 1);
        assert!(json["capturedAt"].is_string());
        assert!(json["breakdown"]["total"].is_number());
    }

    #[test]
    fn test_customer_validation_order() {
        let empty = CustomerInfo::default();
        assert_eq!(empty.phone, "+7");
        assert!(matches!(
            empty.validate(),
            Err(crate::error::ValidationError::Required { ref field }) if field == "name"
        ));

        let bad_email = CustomerInfo::new("Анна", "anna", "+7 916 123 45 67");
        assert!(bad_email.validate().is_err());

        let short_phone = CustomerInfo::new("Анна", "anna@example.ru", "+7 916");
        assert!(short_phone.validate().is_err());

        let digits = "9".repeat(MIN_PHONE_DIGITS);
        let ok = CustomerInfo::new(" Анна ", "anna@example.ru", &format!("+7{}", digits));
        assert!(ok.validate().is_ok());
        assert_eq!(ok.trimmed().name, "Анна");
    }

    #[test]
    fn test_bundle_label_suffixes() {
        assert_eq!(bundle_label(0), None);
        assert_eq!(bundle_label(1), None);
        assert_eq!(bundle_label(3).as_deref(), Some("За 3 комплекта"));
        assert_eq!(bundle_label(4).as_deref(), Some("За 4 комплекта"));
        assert_eq!(bundle_label(21).as_deref(), Some("За 21 комплектов"));
    }
}
