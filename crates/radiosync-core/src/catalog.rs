//! # Catalog
//!
//! The read-only price table the pricing engine consults: unit prices per
//! SKU, shipping rules per delivery zone, and volume-discount tiers.
//!
//! ## Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            Catalog                                      │
//! │                                                                         │
//! │  transmitter ─► SkuEntry        headphones ─► in_ear   ─► SkuEntry      │
//! │  receiver    ─► SkuEntry                      on_ear   ─► SkuEntry      │
//! │  microphone  ─► SkuEntry                      over_ear ─► SkuEntry      │
//! │                                                                         │
//! │  chargers ─► { "20 slots" ─► SkuEntry, "40 slots" ─► SkuEntry, ... }   │
//! │                                                                         │
//! │  shipping ─► moscow / rf / world ─► ShippingRule                       │
//! │                                                                         │
//! │  volume_tiers ─► [ (10 units, 3 %), (25, 5 %), (50, 7 %), (100, 10 %) ] │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Headphones are a fixed struct (every variant must be priced), chargers
//! are an open map keyed by label. Prices are kopecks, like every `Money`.
//!
//! A catalog is immutable once loaded. Custom catalogs must pass
//! [`Catalog::validate`] before use.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{ChargerVariant, DeliveryZone, HeadphonesType, Sku, VatRate};

// =============================================================================
// Catalog Entries
// =============================================================================

/// One priced product with its display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SkuEntry {
    /// Display name shown on the cart line.
    pub name: String,
    /// Product code sent with orders.
    pub sku: String,
    /// Icon/label passed through to the presentation layer.
    #[serde(default)]
    pub icon: String,
    /// Price per unit, in kopecks.
    pub unit_price: Money,
}

impl SkuEntry {
    pub fn new(name: &str, sku: &str, icon: &str, unit_price: Money) -> Self {
        SkuEntry {
            name: name.to_string(),
            sku: sku.to_string(),
            icon: icon.to_string(),
            unit_price,
        }
    }
}

/// Prices for each headphone form factor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HeadphonesCatalog {
    pub in_ear: SkuEntry,
    pub on_ear: SkuEntry,
    pub over_ear: SkuEntry,
}

impl HeadphonesCatalog {
    pub fn get(&self, kind: HeadphonesType) -> &SkuEntry {
        match kind {
            HeadphonesType::InEar => &self.in_ear,
            HeadphonesType::OnEar => &self.on_ear,
            HeadphonesType::OverEar => &self.over_ear,
        }
    }
}

// =============================================================================
// Volume Tiers
// =============================================================================

/// A volume-discount step: orders with at least `min_units` units get
/// `rate_bps` off the subtotal.
///
/// Tiers do not stack. Only the highest tier reached applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VolumeTier {
    pub min_units: u32,
    pub rate_bps: u32,
}

impl VolumeTier {
    pub const fn new(min_units: u32, rate_bps: u32) -> Self {
        VolumeTier { min_units, rate_bps }
    }
}

// =============================================================================
// Shipping
// =============================================================================

/// How a delivery zone prices shipping.
///
/// Shipping is charged once per order: it models a single dispatch, so the
/// bundle multiplier never scales it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShippingRule {
    /// Always the same cost (zero for free delivery).
    Flat { cost: Money },
    /// `cost`, waived once the discounted goods amount reaches `threshold`.
    FreeOver { cost: Money, threshold: Money },
}

impl ShippingRule {
    /// Shipping cost for an order whose goods (after discounts) total `goods`.
    ///
    /// ```rust
    /// use radiosync_core::catalog::ShippingRule;
    /// use radiosync_core::money::Money;
    ///
    /// let rule = ShippingRule::FreeOver {
    ///     cost: Money::from_rubles(1500),
    ///     threshold: Money::from_rubles(50_000),
    /// };
    /// assert_eq!(rule.cost_for(Money::from_rubles(10_000)), Money::from_rubles(1500));
    /// assert_eq!(rule.cost_for(Money::from_rubles(50_000)), Money::zero());
    /// ```
    pub fn cost_for(&self, goods: Money) -> Money {
        match *self {
            ShippingRule::Flat { cost } => cost,
            ShippingRule::FreeOver { cost, threshold } => {
                if goods >= threshold {
                    Money::zero()
                } else {
                    cost
                }
            }
        }
    }

    fn base_cost(&self) -> Money {
        match *self {
            ShippingRule::Flat { cost } | ShippingRule::FreeOver { cost, .. } => cost,
        }
    }
}

/// One shipping rule per delivery zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShippingTable {
    pub moscow: ShippingRule,
    pub rf: ShippingRule,
    pub world: ShippingRule,
}

impl ShippingTable {
    pub fn get(&self, zone: DeliveryZone) -> &ShippingRule {
        match zone {
            DeliveryZone::Moscow => &self.moscow,
            DeliveryZone::Rf => &self.rf,
            DeliveryZone::World => &self.world,
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// The full price table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Catalog {
    pub transmitter: SkuEntry,
    pub receiver: SkuEntry,
    pub microphone: SkuEntry,
    pub headphones: HeadphonesCatalog,
    #[serde(default)]
    pub chargers: BTreeMap<ChargerVariant, SkuEntry>,
    #[serde(default)]
    pub volume_tiers: Vec<VolumeTier>,
    pub shipping: ShippingTable,
}

impl Catalog {
    /// The standard RadioSync price list.
    ///
    /// ## Prices
    /// ```text
    /// ┌────────────────────────────┬──────────────────┬──────────────┐
    /// │ Product                    │ SKU              │ Price, ₽     │
    /// ├────────────────────────────┼──────────────────┼──────────────┤
    /// │ Transmitter                │ radiosync-x      │ 1 500        │
    /// │ Receiver                   │ radiosync-r      │ 1 000        │
    /// │ Microphone                 │ radiosync-m      │ 2 000        │
    /// │ Headphones in / on / over  │ radiosync-h-*    │ 300/500/900  │
    /// │ Charger 20 / 40 slots      │ radiosync-c20/40 │ 6 000/10 000 │
    /// └────────────────────────────┴──────────────────┴──────────────┘
    /// ```
    ///
    /// Shipping: Moscow free, elsewhere in Russia 1 500 ₽, abroad 5 000 ₽.
    pub fn standard() -> Self {
        let mut chargers = BTreeMap::new();
        chargers.insert(
            ChargerVariant::new("20 slots"),
            SkuEntry::new(
                "Зарядное устройство на 20 слотов",
                "radiosync-c20",
                "🔌",
                Money::from_rubles(6_000),
            ),
        );
        chargers.insert(
            ChargerVariant::new("40 slots"),
            SkuEntry::new(
                "Зарядное устройство на 40 слотов",
                "radiosync-c40",
                "🔌",
                Money::from_rubles(10_000),
            ),
        );

        Catalog {
            transmitter: SkuEntry::new("Передатчик", "radiosync-x", "🔴", Money::from_rubles(1_500)),
            receiver: SkuEntry::new("Приёмник", "radiosync-r", "🔵", Money::from_rubles(1_000)),
            microphone: SkuEntry::new("Микрофон", "radiosync-m", "🎤", Money::from_rubles(2_000)),
            headphones: HeadphonesCatalog {
                in_ear: SkuEntry::new("Наушники (вкладыши)", "radiosync-h-in", "🎧", Money::from_rubles(300)),
                on_ear: SkuEntry::new("Наушники (накладные)", "radiosync-h-on", "🎧", Money::from_rubles(500)),
                over_ear: SkuEntry::new(
                    "Наушники (полноразмерные)",
                    "radiosync-h-over",
                    "🎧",
                    Money::from_rubles(900),
                ),
            },
            chargers,
            volume_tiers: vec![
                VolumeTier::new(10, 300),
                VolumeTier::new(25, 500),
                VolumeTier::new(50, 700),
                VolumeTier::new(100, 1_000),
            ],
            shipping: ShippingTable {
                moscow: ShippingRule::Flat { cost: Money::zero() },
                rf: ShippingRule::Flat { cost: Money::from_rubles(1_500) },
                world: ShippingRule::Flat { cost: Money::from_rubles(5_000) },
            },
        }
    }

    /// Returns the entry for a SKU.
    ///
    /// # Panics
    /// Panics if `sku` names a charger label absent from this catalog.
    /// Configurations only hold labels accepted by
    /// `Configuration::set_charger_variant`, so this is a programming error
    /// (e.g. pricing a configuration against a different catalog).
    pub fn entry(&self, sku: Sku<'_>) -> &SkuEntry {
        match sku {
            Sku::Transmitter => &self.transmitter,
            Sku::Receiver => &self.receiver,
            Sku::Microphone => &self.microphone,
            Sku::Headphones(kind) => self.headphones.get(kind),
            Sku::Charger(label) => match self.chargers.get(label) {
                Some(entry) => entry,
                None => panic!("charger variant '{}' is not in the catalog", label),
            },
        }
    }

    /// Unit price of a SKU. Same panics as [`Catalog::entry`].
    pub fn unit_price(&self, sku: Sku<'_>) -> Money {
        self.entry(sku).unit_price
    }

    pub fn charger(&self, label: &ChargerVariant) -> Option<&SkuEntry> {
        self.chargers.get(label)
    }

    pub fn has_charger(&self, label: &ChargerVariant) -> bool {
        self.chargers.contains_key(label)
    }

    /// Charger labels in display order.
    pub fn charger_labels(&self) -> impl Iterator<Item = &ChargerVariant> {
        self.chargers.keys()
    }

    pub fn shipping_rule(&self, zone: DeliveryZone) -> &ShippingRule {
        self.shipping.get(zone)
    }

    pub fn volume_tiers(&self) -> &[VolumeTier] {
        &self.volume_tiers
    }

    /// The highest tier whose threshold `unit_count` reaches, if any.
    ///
    /// ```rust
    /// use radiosync_core::catalog::Catalog;
    ///
    /// let catalog = Catalog::standard();
    /// assert!(catalog.volume_tier_for(9).is_none());
    /// assert_eq!(catalog.volume_tier_for(10).unwrap().rate_bps, 300);
    /// assert_eq!(catalog.volume_tier_for(99).unwrap().rate_bps, 700);
    /// ```
    pub fn volume_tier_for(&self, unit_count: u32) -> Option<&VolumeTier> {
        self.volume_tiers
            .iter()
            .rev()
            .find(|tier| tier.min_units <= unit_count)
    }

    /// Largest unit price or shipping amount a catalog may carry: 100 000 000 ₽.
    ///
    /// Every line at this price, times `MAX_ITEM_QUANTITY` and
    /// `MAX_BUNDLE_COUNT`, plus shipping and 100 % VAT, stays inside `i64`.
    pub const MAX_AMOUNT: Money = Money::from_kopecks(10_000_000_000);

    /// Checks the catalog invariants.
    ///
    /// ## Rules
    /// - Every unit price and shipping cost is non-negative
    /// - No unit price or shipping amount exceeds [`Catalog::MAX_AMOUNT`]
    /// - Volume tier thresholds are positive and strictly increasing
    /// - Tier rates are at most 100 %
    pub fn validate(&self) -> CoreResult<()> {
        let mut entries: Vec<&SkuEntry> = vec![
            &self.transmitter,
            &self.receiver,
            &self.microphone,
            &self.headphones.in_ear,
            &self.headphones.on_ear,
            &self.headphones.over_ear,
        ];
        entries.extend(self.chargers.values());

        if let Some(entry) = entries.iter().find(|e| e.unit_price.is_negative()) {
            return Err(CoreError::InvalidCatalog {
                reason: format!("unit price of {} is negative", entry.sku),
            });
        }
        if let Some(entry) = entries.iter().find(|e| e.unit_price > Self::MAX_AMOUNT) {
            return Err(CoreError::InvalidCatalog {
                reason: format!(
                    "unit price of {} exceeds {}",
                    entry.sku,
                    Self::MAX_AMOUNT
                ),
            });
        }

        for zone in DeliveryZone::ALL {
            let rule = self.shipping_rule(zone);
            let mut amounts = vec![rule.base_cost()];
            if let ShippingRule::FreeOver { threshold, .. } = rule {
                amounts.push(*threshold);
            }

            if amounts.iter().any(|a| a.is_negative()) {
                return Err(CoreError::InvalidCatalog {
                    reason: format!("shipping rule for {} has a negative amount", zone),
                });
            }
            if amounts.iter().any(|a| *a > Self::MAX_AMOUNT) {
                return Err(CoreError::InvalidCatalog {
                    reason: format!("shipping rule for {} exceeds {}", zone, Self::MAX_AMOUNT),
                });
            }
        }

        let mut previous: Option<u32> = None;
        for tier in &self.volume_tiers {
            if tier.min_units == 0 {
                return Err(CoreError::InvalidCatalog {
                    reason: "volume tier thresholds must be positive".to_string(),
                });
            }
            if previous.is_some_and(|p| tier.min_units <= p) {
                return Err(CoreError::InvalidCatalog {
                    reason: "volume tiers must be strictly increasing".to_string(),
                });
            }
            if tier.rate_bps > VatRate::MAX_BPS {
                return Err(CoreError::InvalidCatalog {
                    reason: format!("volume tier at {} units exceeds 100 %", tier.min_units),
                });
            }
            previous = Some(tier.min_units);
        }

        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::standard()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
