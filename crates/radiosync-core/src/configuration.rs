//! # Configuration State
//!
//! The user's current selections: what to buy, how many bundles, where to
//! ship, which promo code, how VAT is shown.
//!
//! ## Mutation Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Setters                                │
//! │                                                                         │
//! │  UI input ──► set_*(value) ──► Ok(())  ──► field updated               │
//! │                            └─► Err(..) ──► field unchanged             │
//! │                                                                         │
//! │  Invariants held after every call:                                     │
//! │  • headphones_qty > 0  ⇒  headphones_type is Some                       │
//! │  • charger_variant is Some ⇒ label exists in the catalog               │
//! │  • every quantity ≤ MAX_ITEM_QUANTITY, bundle_count ≤ MAX_BUNDLE_COUNT  │
//! │  • vat_rate within 0 %..=100 %                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Fields are private so the invariants cannot be bypassed. The cart
//! reconciler (`crate::cart`) writes back through the same setters.

use serde::Serialize;
use ts_rs::TS;

use crate::catalog::Catalog;
use crate::error::ValidationError;
use crate::types::{ChargerVariant, DeliveryZone, HeadphonesType, ItemId, Sku, VatRate};
use crate::validation::{clamp_vat_percent, validate_bundle_count, validate_quantity, ValidationResult};

/// A mutable snapshot of the user's selections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    delivery_zone: DeliveryZone,
    receiver_qty: u32,
    transmitter_qty: u32,
    microphone_qty: u32,
    headphones_type: Option<HeadphonesType>,
    headphones_qty: u32,
    charger_variant: Option<ChargerVariant>,
    promo_code: String,
    vat_included: bool,
    vat_rate: VatRate,
    bundle_count: u32,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            delivery_zone: DeliveryZone::default(),
            receiver_qty: 0,
            transmitter_qty: 0,
            microphone_qty: 0,
            headphones_type: None,
            headphones_qty: 0,
            charger_variant: None,
            promo_code: String::new(),
            vat_included: false,
            vat_rate: VatRate::default(),
            bundle_count: 1,
        }
    }
}

impl Configuration {
    /// An empty configuration: Moscow, nothing selected, 20 % VAT on top,
    /// one bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty configuration with deployment-specific VAT settings.
    pub fn with_vat(vat_rate: VatRate, vat_included: bool) -> Self {
        Configuration {
            vat_rate,
            vat_included,
            ..Self::default()
        }
    }

    // =========================================================================
    // Setters
    // =========================================================================

    pub fn set_delivery_zone(&mut self, zone: DeliveryZone) {
        self.delivery_zone = zone;
    }

    pub fn set_receiver_qty(&mut self, qty: i64) -> ValidationResult<()> {
        self.receiver_qty = validate_quantity("receiver_qty", qty)?;
        Ok(())
    }

    pub fn set_transmitter_qty(&mut self, qty: i64) -> ValidationResult<()> {
        self.transmitter_qty = validate_quantity("transmitter_qty", qty)?;
        Ok(())
    }

    pub fn set_microphone_qty(&mut self, qty: i64) -> ValidationResult<()> {
        self.microphone_qty = validate_quantity("microphone_qty", qty)?;
        Ok(())
    }

    /// Selects a headphone form factor. `None` also zeroes the quantity.
    pub fn set_headphones_type(&mut self, kind: Option<HeadphonesType>) {
        self.headphones_type = kind;
        if kind.is_none() {
            self.headphones_qty = 0;
        }
    }

    /// Sets the headphone quantity.
    ///
    /// A positive quantity requires a selected type; zero is always accepted
    /// and leaves the type as it is.
    pub fn set_headphones_qty(&mut self, qty: i64) -> ValidationResult<()> {
        let qty = validate_quantity("headphones_qty", qty)?;

        if qty > 0 && self.headphones_type.is_none() {
            return Err(ValidationError::Requires {
                field: "headphones_qty".to_string(),
                requires: "headphones_type".to_string(),
            });
        }

        self.headphones_qty = qty;
        Ok(())
    }

    /// Selects a charger (always quantity 1) or clears it.
    ///
    /// The label must exist in `catalog`.
    pub fn set_charger_variant(
        &mut self,
        variant: Option<ChargerVariant>,
        catalog: &Catalog,
    ) -> ValidationResult<()> {
        if let Some(label) = &variant {
            if !catalog.has_charger(label) {
                return Err(ValidationError::NotAllowed {
                    field: "charger_variant".to_string(),
                    allowed: catalog.charger_labels().map(|l| l.to_string()).collect(),
                });
            }
        }

        self.charger_variant = variant;
        Ok(())
    }

    /// Stores the promo code exactly as typed. Matching happens at pricing.
    pub fn set_promo_code(&mut self, code: impl Into<String>) {
        self.promo_code = code.into();
    }

    pub fn set_vat_included(&mut self, included: bool) {
        self.vat_included = included;
    }

    /// Sets the VAT rate from a percentage, clamped to [0, 100].
    pub fn set_vat_rate(&mut self, percent: f64) -> ValidationResult<()> {
        self.vat_rate = clamp_vat_percent(percent)?;
        Ok(())
    }

    /// Sets the VAT rate directly (already bounded by `VatRate`).
    pub fn set_vat(&mut self, rate: VatRate) {
        self.vat_rate = rate;
    }

    /// Sets the bundle multiplier. Zero is stored as entered.
    pub fn set_bundle_count(&mut self, count: i64) -> ValidationResult<()> {
        self.bundle_count = validate_bundle_count(count)?;
        Ok(())
    }

    /// Empties the cart: all quantities, both variants, the promo code, and
    /// the bundle count. Delivery zone and VAT settings are kept.
    pub fn clear_all(&mut self) {
        *self = Configuration {
            delivery_zone: self.delivery_zone,
            vat_included: self.vat_included,
            vat_rate: self.vat_rate,
            ..Self::default()
        };
    }

    /// Takes one cart line out entirely: quantity 0, variant cleared.
    pub(crate) fn reset_line(&mut self, item: ItemId) {
        match item {
            ItemId::Transmitter => self.transmitter_qty = 0,
            ItemId::Receiver => self.receiver_qty = 0,
            ItemId::Microphone => self.microphone_qty = 0,
            ItemId::Headphones => self.set_headphones_type(None),
            ItemId::Charger => self.charger_variant = None,
        }
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn delivery_zone(&self) -> DeliveryZone {
        self.delivery_zone
    }

    pub fn receiver_qty(&self) -> u32 {
        self.receiver_qty
    }

    pub fn transmitter_qty(&self) -> u32 {
        self.transmitter_qty
    }

    pub fn microphone_qty(&self) -> u32 {
        self.microphone_qty
    }

    pub fn headphones_type(&self) -> Option<HeadphonesType> {
        self.headphones_type
    }

    pub fn headphones_qty(&self) -> u32 {
        self.headphones_qty
    }

    pub fn charger_variant(&self) -> Option<&ChargerVariant> {
        self.charger_variant.as_ref()
    }

    pub fn promo_code(&self) -> &str {
        &self.promo_code
    }

    pub fn vat_included(&self) -> bool {
        self.vat_included
    }

    pub fn vat_rate(&self) -> VatRate {
        self.vat_rate
    }

    /// Bundle count as entered (may be 0).
    pub fn bundle_count(&self) -> u32 {
        self.bundle_count
    }

    /// Bundle count used for computation: 0 counts as 1.
    pub fn effective_bundles(&self) -> u32 {
        self.bundle_count.max(1)
    }

    // =========================================================================
    // Derived Views
    // =========================================================================

    /// Per-bundle quantity of a cart line.
    ///
    /// Headphones count only with a type selected; a selected charger is 1.
    pub fn quantity_of(&self, item: ItemId) -> u32 {
        match item {
            ItemId::Transmitter => self.transmitter_qty,
            ItemId::Receiver => self.receiver_qty,
            ItemId::Microphone => self.microphone_qty,
            ItemId::Headphones => match self.headphones_type {
                Some(_) => self.headphones_qty,
                None => 0,
            },
            ItemId::Charger => u32::from(self.charger_variant.is_some()),
        }
    }

    /// Units in a single bundle, charger included.
    pub fn units_per_bundle(&self) -> u32 {
        ItemId::ALL.into_iter().map(|item| self.quantity_of(item)).sum()
    }

    /// Selected SKUs in cart order, with their per-bundle quantity.
    ///
    /// Lines with quantity 0 are skipped.
    pub fn selected_skus(&self) -> Vec<(ItemId, Sku<'_>, u32)> {
        ItemId::ALL
            .into_iter()
            .filter_map(|item| {
                let qty = self.quantity_of(item);
                if qty == 0 {
                    return None;
                }
                let sku = match item {
                    ItemId::Transmitter => Sku::Transmitter,
                    ItemId::Receiver => Sku::Receiver,
                    ItemId::Microphone => Sku::Microphone,
                    ItemId::Headphones => Sku::Headphones(self.headphones_type?),
                    ItemId::Charger => Sku::Charger(self.charger_variant.as_ref()?),
                };
                Some((item, sku, qty))
            })
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_ITEM_QUANTITY;

    #[test]
    fn test_defaults() {
        let config = Configuration::new();
        assert_eq!(config.delivery_zone(), DeliveryZone::Moscow);
        assert_eq!(config.vat_rate(), VatRate::from_percent(20));
        assert!(!config.vat_included());
        assert_eq!(config.bundle_count(), 1);
        assert_eq!(config.units_per_bundle(), 0);
        assert!(config.selected_skus().is_empty());
    }

    #[test]
    fn test_rejected_quantity_keeps_prior_value() {
        let mut config = Configuration::new();
        config.set_receiver_qty(5).unwrap();

        assert!(config.set_receiver_qty(-1).is_err());
        assert!(config.set_receiver_qty(MAX_ITEM_QUANTITY as i64 + 1).is_err());
        assert_eq!(config.receiver_qty(), 5);
    }

    #[test]
    fn test_headphones_qty_requires_type() {
        let mut config = Configuration::new();

        let err = config.set_headphones_qty(4).unwrap_err();
        assert!(matches!(err, ValidationError::Requires { .. }));
        assert_eq!(config.headphones_qty(), 0);

        // zero is harmless without a type
        assert!(config.set_headphones_qty(0).is_ok());

        config.set_headphones_type(Some(HeadphonesType::OnEar));
        config.set_headphones_qty(4).unwrap();
        assert_eq!(config.quantity_of(ItemId::Headphones), 4);
    }

    #[test]
    fn test_clearing_headphones_type_zeroes_qty() {
        let mut config = Configuration::new();
        config.set_headphones_type(Some(HeadphonesType::InEar));
        config.set_headphones_qty(10).unwrap();

        config.set_headphones_type(None);
        assert_eq!(config.headphones_qty(), 0);
        assert_eq!(config.headphones_type(), None);
    }

    #[test]
    fn test_charger_must_exist_in_catalog() {
        let catalog = Catalog::standard();
        let mut config = Configuration::new();

        config
            .set_charger_variant(Some(ChargerVariant::new("20 slots")), &catalog)
            .unwrap();
        assert_eq!(config.quantity_of(ItemId::Charger), 1);

        let err = config
            .set_charger_variant(Some(ChargerVariant::new("1000 slots")), &catalog)
            .unwrap_err();
        assert!(matches!(err, ValidationError::NotAllowed { .. }));
        assert_eq!(config.charger_variant().map(|c| c.as_str()), Some("20 slots"));

        config.set_charger_variant(None, &catalog).unwrap();
        assert_eq!(config.quantity_of(ItemId::Charger), 0);
    }

    #[test]
    fn test_vat_rate_is_clamped() {
        let mut config = Configuration::new();
        config.set_vat_rate(150.0).unwrap();
        assert_eq!(config.vat_rate().bps(), 10_000);
        config.set_vat_rate(-3.0).unwrap();
        assert_eq!(config.vat_rate().bps(), 0);
        config.set_vat_rate(12.5).unwrap();

        assert!(config.set_vat_rate(f64::NAN).is_err());
        assert_eq!(config.vat_rate().bps(), 1_250);
    }

    #[test]
    fn test_zero_bundles_stored_but_counted_as_one() {
        let mut config = Configuration::new();
        config.set_bundle_count(0).unwrap();
        assert_eq!(config.bundle_count(), 0);
        assert_eq!(config.effective_bundles(), 1);
        assert!(config.set_bundle_count(-1).is_err());
        assert_eq!(config.bundle_count(), 0);
    }

    #[test]
    fn test_units_per_bundle_counts_charger() {
        let catalog = Catalog::standard();
        let mut config = Configuration::new();
        config.set_receiver_qty(5).unwrap();
        config.set_transmitter_qty(1).unwrap();
        config.set_headphones_type(Some(HeadphonesType::OverEar));
        config.set_headphones_qty(5).unwrap();
        config
            .set_charger_variant(Some(ChargerVariant::new("40 slots")), &catalog)
            .unwrap();

        assert_eq!(config.units_per_bundle(), 12);

        let items: Vec<ItemId> = config.selected_skus().into_iter().map(|(id, _, _)| id).collect();
        assert_eq!(
            items,
            vec![ItemId::Transmitter, ItemId::Receiver, ItemId::Headphones, ItemId::Charger]
        );
    }

    #[test]
    fn test_clear_all_keeps_zone_and_vat() {
        let catalog = Catalog::standard();
        let mut config = Configuration::new();
        config.set_delivery_zone(DeliveryZone::World);
        config.set_vat_included(true);
        config.set_vat_rate(10.0).unwrap();
        config.set_receiver_qty(3).unwrap();
        config.set_headphones_type(Some(HeadphonesType::InEar));
        config.set_headphones_qty(3).unwrap();
        config
            .set_charger_variant(Some(ChargerVariant::new("20 slots")), &catalog)
            .unwrap();
        config.set_promo_code("RADIO10");
        config.set_bundle_count(4).unwrap();

        config.clear_all();

        assert_eq!(config.units_per_bundle(), 0);
        assert_eq!(config.headphones_type(), None);
        assert_eq!(config.charger_variant(), None);
        assert_eq!(config.promo_code(), "");
        assert_eq!(config.bundle_count(), 1);
        assert_eq!(config.delivery_zone(), DeliveryZone::World);
        assert!(config.vat_included());
        assert_eq!(config.vat_rate().bps(), 1_000);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(Configuration::new()).unwrap();
        assert_eq!(json["deliveryZone"], "moscow");
        assert_eq!(json["bundleCount"], 1);
        assert_eq!(json["vatRate"], 2000);
        assert!(json["headphonesType"].is_null());
    }
}
