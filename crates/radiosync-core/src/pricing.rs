//! # Pricing Engine
//!
//! Pure computation from a configuration to a price breakdown.
//!
//! ## Calculation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        compute_breakdown                                │
//! │                                                                         │
//! │  Σ unit_price × qty × bundles ───────────────────────────► subtotal     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  highest tier reached by unit_count ──► − volume_discount_amount        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  promo lookup on (subtotal − volume) ──► − promo_discount_amount        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  discounted_amount ──┬──► VAT base ──► vat_amount                       │
//! │                      │                                                  │
//! │                      └──► zone rule ──► shipping_cost (once per order)  │
//! │                                                                         │
//! │  total = max(0, discounted + shipping + (included ? 0 : vat))           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding
//! Sums are exact in kopecks. Each percentage-derived amount (volume
//! discount, percent promo, VAT) is rounded half away from zero exactly
//! once, from exact inputs. The total is the exact sum of the reported
//! components, so a receipt always adds up.
//!
//! No clock, no randomness, no I/O: the same inputs always give the same
//! `Breakdown`.

use serde::Serialize;
use ts_rs::TS;

use crate::catalog::Catalog;
use crate::configuration::Configuration;
use crate::money::Money;
use crate::promo::PromoTable;
use crate::types::VatRate;

/// The derived price breakdown for one configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    /// Goods before any discount, bundle multiplier applied.
    pub subtotal: Money,
    pub volume_discount_amount: Money,
    pub promo_discount_amount: Money,
    pub shipping_cost: Money,
    /// VAT on the discounted goods. Informational when `vat_included`.
    pub vat_amount: Money,
    pub total: Money,

    /// Units across all bundles (charger included).
    pub unit_count: u32,
    pub effective_bundles: u32,
    /// `subtotal − volume − promo`.
    pub discounted_amount: Money,
    /// Applied tier rate, 0 when no tier is reached.
    pub volume_discount_rate_bps: u32,
    /// Normalized promo code, when it matched.
    pub applied_promo: Option<String>,
    pub vat_included: bool,
    pub vat_rate: VatRate,
}

impl Breakdown {
    /// Breakdown of an empty configuration.
    pub fn empty(config: &Configuration) -> Self {
        Breakdown {
            subtotal: Money::zero(),
            volume_discount_amount: Money::zero(),
            promo_discount_amount: Money::zero(),
            shipping_cost: Money::zero(),
            vat_amount: Money::zero(),
            total: Money::zero(),
            unit_count: 0,
            effective_bundles: config.effective_bundles(),
            discounted_amount: Money::zero(),
            volume_discount_rate_bps: 0,
            applied_promo: None,
            vat_included: config.vat_included(),
            vat_rate: config.vat_rate(),
        }
    }

    /// Total discount (volume + promo).
    pub fn discount_total(&self) -> Money {
        self.volume_discount_amount + self.promo_discount_amount
    }

    /// Amount payable before VAT is added (goods after discounts + shipping).
    pub fn net_with_shipping(&self) -> Money {
        self.discounted_amount + self.shipping_cost
    }
}

/// Computes the full breakdown for `config`.
///
/// ## Policies
/// - **Bundles** multiply every goods quantity. Zero bundles count as one.
/// - **Volume discount** is keyed on the unit count across all bundles;
///   only the highest tier reached applies.
/// - **Promo** applies after the volume discount and never exceeds what is
///   left. Unknown or blank codes contribute zero.
/// - **Shipping** is charged once per order, never per bundle.
/// - **No goods, no dispatch**: a configuration with zero units is charged
///   no shipping in any zone, so its breakdown is all zeros.
/// - **VAT** is computed on discounted goods only, shipping excluded.
///
/// ## Example
/// ```rust
/// use radiosync_core::catalog::Catalog;
/// use radiosync_core::configuration::Configuration;
/// use radiosync_core::money::Money;
/// use radiosync_core::pricing::compute_breakdown;
/// use radiosync_core::promo::PromoTable;
///
/// let mut config = Configuration::new();
/// config.set_receiver_qty(2).unwrap();
/// config.set_transmitter_qty(1).unwrap();
///
/// let breakdown = compute_breakdown(&config, &Catalog::standard(), &PromoTable::standard());
/// assert_eq!(breakdown.subtotal, Money::from_rubles(3_500));
/// assert_eq!(breakdown.vat_amount, Money::from_rubles(700));
/// assert_eq!(breakdown.total, Money::from_rubles(4_200));
/// ```
///
/// # Panics
/// Panics if `config` holds a charger label absent from `catalog`
/// (see [`Catalog::entry`]).
pub fn compute_breakdown(config: &Configuration, catalog: &Catalog, promos: &PromoTable) -> Breakdown {
    let bundles = config.effective_bundles();

    // Step 1: Subtotal
    let per_bundle: Money = config
        .selected_skus()
        .into_iter()
        .map(|(_, sku, qty)| catalog.unit_price(sku).multiply_quantity(qty))
        .sum();
    let subtotal = per_bundle.multiply_quantity(bundles);
    let unit_count = config.units_per_bundle().saturating_mul(bundles);

    if unit_count == 0 {
        return Breakdown::empty(config);
    }

    // Step 2: Volume discount
    let volume_discount_rate_bps = catalog
        .volume_tier_for(unit_count)
        .map(|tier| tier.rate_bps)
        .unwrap_or(0);
    let volume_discount_amount = subtotal
        .percent_bps(volume_discount_rate_bps)
        .non_negative()
        .min(subtotal);
    let after_volume = subtotal - volume_discount_amount;

    // Step 3: Promo discount
    let (applied_promo, promo_discount_amount) = match promos.lookup(config.promo_code()) {
        Some((code, discount)) => (Some(code), discount.amount_on(after_volume)),
        None => (None, Money::zero()),
    };
    let discounted_amount = after_volume - promo_discount_amount;

    // Step 4: Shipping
    let shipping_cost = catalog
        .shipping_rule(config.delivery_zone())
        .cost_for(discounted_amount)
        .non_negative();

    // Step 5: VAT
    let vat_rate = config.vat_rate();
    let vat_included = config.vat_included();
    let vat_amount = if vat_included {
        discounted_amount.vat_inclusive(vat_rate)
    } else {
        discounted_amount.vat_exclusive(vat_rate)
    };

    // Step 6: Total
    let vat_added = if vat_included { Money::zero() } else { vat_amount };
    let total = (discounted_amount + shipping_cost + vat_added).non_negative();

    Breakdown {
        subtotal,
        volume_discount_amount,
        promo_discount_amount,
        shipping_cost,
        vat_amount,
        total,
        unit_count,
        effective_bundles: bundles,
        discounted_amount,
        volume_discount_rate_bps,
        applied_promo,
        vat_included,
        vat_rate,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ShippingRule, VolumeTier};
    use crate::types::{ChargerVariant, DeliveryZone, HeadphonesType};

    fn basic_config() -> Configuration {
        let mut config = Configuration::new();
        config.set_receiver_qty(2).unwrap();
        config.set_transmitter_qty(1).unwrap();
        config
    }

    fn price(config: &Configuration) -> Breakdown {
        compute_breakdown(config, &Catalog::standard(), &PromoTable::standard())
    }

    #[test]
    fn test_basic_breakdown() {
        let breakdown = price(&basic_config());

        assert_eq!(breakdown.subtotal, Money::from_rubles(3_500));
        assert_eq!(breakdown.volume_discount_amount, Money::zero());
        assert_eq!(breakdown.promo_discount_amount, Money::zero());
        assert_eq!(breakdown.shipping_cost, Money::zero());
        assert_eq!(breakdown.vat_amount, Money::from_rubles(700));
        assert_eq!(breakdown.total, Money::from_rubles(4_200));
        assert_eq!(breakdown.unit_count, 3);
    }

    #[test]
    fn test_empty_configuration_is_all_zero() {
        let mut config = Configuration::new();
        config.set_delivery_zone(DeliveryZone::World);
        config.set_promo_code("RADIO10");

        let breakdown = price(&config);
        assert_eq!(breakdown, Breakdown::empty(&config));
        assert_eq!(breakdown.total, Money::zero());
    }

    #[test]
    fn test_largest_valid_order_does_not_overflow() {
        let mut catalog = Catalog::standard();
        for entry in [
            &mut catalog.transmitter,
            &mut catalog.receiver,
            &mut catalog.microphone,
            &mut catalog.headphones.over_ear,
        ] {
            entry.unit_price = Catalog::MAX_AMOUNT;
        }
        catalog.shipping.world = ShippingRule::Flat {
            cost: Catalog::MAX_AMOUNT,
        };
        catalog.volume_tiers.clear();
        catalog.validate().unwrap();

        let max = i64::from(crate::MAX_ITEM_QUANTITY);
        let mut config = Configuration::new();
        config.set_transmitter_qty(max).unwrap();
        config.set_receiver_qty(max).unwrap();
        config.set_microphone_qty(max).unwrap();
        config.set_headphones_type(Some(HeadphonesType::OverEar));
        config.set_headphones_qty(max).unwrap();
        config.set_bundle_count(i64::from(crate::MAX_BUNDLE_COUNT)).unwrap();
        config.set_delivery_zone(DeliveryZone::World);
        config.set_vat_rate(100.0).unwrap();

        let breakdown = compute_breakdown(&config, &catalog, &PromoTable::standard());
        let expected_subtotal = Catalog::MAX_AMOUNT
            .multiply_quantity(4 * crate::MAX_ITEM_QUANTITY)
            .multiply_quantity(crate::MAX_BUNDLE_COUNT);
        assert_eq!(breakdown.subtotal, expected_subtotal);
        assert_eq!(breakdown.vat_amount, expected_subtotal);
        assert_eq!(
            breakdown.total,
            expected_subtotal + expected_subtotal + Catalog::MAX_AMOUNT
        );
        assert!(breakdown.total < Money::from_kopecks(i64::MAX));
    }

    #[test]
    fn test_shipping_not_multiplied_by_bundles() {
        let mut config = basic_config();
        config.set_delivery_zone(DeliveryZone::Rf);
        let single = price(&config);

        config.set_bundle_count(3).unwrap();
        let triple = price(&config);

        assert_eq!(single.shipping_cost, Money::from_rubles(1_500));
        assert_eq!(triple.shipping_cost, single.shipping_cost);
        assert_eq!(triple.subtotal, Money::from_rubles(10_500));
        // VAT excludes shipping
        assert_eq!(triple.vat_amount, Money::from_rubles(2_100));
        assert_eq!(triple.total, Money::from_rubles(10_500 + 1_500 + 2_100));
    }

    #[test]
    fn test_zero_bundles_priced_as_one() {
        let mut config = basic_config();
        config.set_bundle_count(0).unwrap();
        assert_eq!(price(&config).subtotal, Money::from_rubles(3_500));
        assert_eq!(price(&config).effective_bundles, 1);
    }

    #[test]
    fn test_volume_tier_on_unit_count() {
        let mut config = Configuration::new();
        config.set_receiver_qty(10).unwrap();

        let breakdown = price(&config);
        assert_eq!(breakdown.subtotal, Money::from_rubles(10_000));
        assert_eq!(breakdown.volume_discount_rate_bps, 300);
        assert_eq!(breakdown.volume_discount_amount, Money::from_rubles(300));

        config.set_receiver_qty(9).unwrap();
        assert_eq!(price(&config).volume_discount_amount, Money::zero());

        // 9 units × 3 bundles = 27 units → 5 % tier
        config.set_bundle_count(3).unwrap();
        let breakdown = price(&config);
        assert_eq!(breakdown.unit_count, 27);
        assert_eq!(breakdown.volume_discount_rate_bps, 500);
    }

    #[test]
    fn test_charger_counts_as_unit() {
        let catalog = Catalog::standard();
        let mut config = Configuration::new();
        config.set_receiver_qty(9).unwrap();
        config
            .set_charger_variant(Some(ChargerVariant::new("20 slots")), &catalog)
            .unwrap();

        let breakdown = compute_breakdown(&config, &catalog, &PromoTable::new());
        assert_eq!(breakdown.unit_count, 10);
        assert_eq!(breakdown.subtotal, Money::from_rubles(15_000));
        assert_eq!(breakdown.volume_discount_amount, Money::from_rubles(450));
    }

    #[test]
    fn test_promo_applies_after_volume_discount() {
        let mut config = Configuration::new();
        config.set_receiver_qty(10).unwrap();
        config.set_promo_code(" radio10 ");

        let breakdown = price(&config);
        // 10 000 − 3 % = 9 700; 10 % of 9 700 = 970
        assert_eq!(breakdown.promo_discount_amount, Money::from_rubles(970));
        assert_eq!(breakdown.applied_promo.as_deref(), Some("RADIO10"));
        assert_eq!(breakdown.discounted_amount, Money::from_rubles(8_730));
        assert_eq!(breakdown.vat_amount, Money::from_kopecks(174_600));
    }

    #[test]
    fn test_unknown_promo_is_zero() {
        let mut config = basic_config();
        config.set_promo_code("ABC123");

        let breakdown = price(&config);
        assert_eq!(breakdown.promo_discount_amount, Money::zero());
        assert_eq!(breakdown.applied_promo, None);
        assert_eq!(breakdown.total, Money::from_rubles(4_200));
    }

    #[test]
    fn test_fixed_promo_capped_at_goods() {
        let mut config = Configuration::new();
        config.set_headphones_type(Some(HeadphonesType::InEar));
        config.set_headphones_qty(1).unwrap();
        config.set_promo_code("MINUS1000");
        config.set_delivery_zone(DeliveryZone::Rf);

        let breakdown = price(&config);
        assert_eq!(breakdown.promo_discount_amount, Money::from_rubles(300));
        assert_eq!(breakdown.discounted_amount, Money::zero());
        assert_eq!(breakdown.vat_amount, Money::zero());
        assert_eq!(breakdown.total, Money::from_rubles(1_500));
    }

    #[test]
    fn test_vat_included_is_informational() {
        let mut config = basic_config();
        config.set_vat_included(true);

        let breakdown = price(&config);
        // 3500 × 20 / 120 = 583.333… → 583.33
        assert_eq!(breakdown.vat_amount, Money::from_kopecks(58_333));
        assert_eq!(breakdown.total, Money::from_rubles(3_500));
    }

    #[test]
    fn test_free_over_threshold_uses_discounted_goods() {
        let mut catalog = Catalog::standard();
        catalog.shipping.rf = ShippingRule::FreeOver {
            cost: Money::from_rubles(1_500),
            threshold: Money::from_rubles(10_000),
        };
        catalog.volume_tiers = vec![VolumeTier::new(10, 300)];

        let mut config = Configuration::new();
        config.set_delivery_zone(DeliveryZone::Rf);
        config.set_receiver_qty(10).unwrap();

        // 10 000 − 3 % = 9 700, below the threshold
        let breakdown = compute_breakdown(&config, &catalog, &PromoTable::new());
        assert_eq!(breakdown.shipping_cost, Money::from_rubles(1_500));

        config.set_receiver_qty(11).unwrap();
        let breakdown = compute_breakdown(&config, &catalog, &PromoTable::new());
        assert_eq!(breakdown.shipping_cost, Money::zero());
    }

    #[test]
    fn test_compute_is_idempotent() {
        let mut config = basic_config();
        config.set_promo_code("EXPO5");
        config.set_delivery_zone(DeliveryZone::World);
        assert_eq!(price(&config), price(&config));
    }

    #[test]
    fn test_breakdown_serializes_camel_case() {
        let json = serde_json::to_value(price(&basic_config())).unwrap();
        assert_eq!(json["subtotal"], 350_000);
        assert_eq!(json["volumeDiscountAmount"], 0);
        assert_eq!(json["vatAmount"], 70_000);
        assert!(json["appliedPromo"].is_null());
    }
}
