//! # Domain Types
//!
//! Small value types shared by the catalog, the configuration and the
//! pricing engine.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    VatRate      │   │  DeliveryZone   │   │ HeadphonesType  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Moscow         │   │  InEar          │       │
//! │  │  2000 = 20 %    │   │  Rf             │   │  OnEar          │       │
//! │  └─────────────────┘   │  World          │   │  OverEar        │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ ChargerVariant  │   │     ItemId      │   │      Sku        │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  "20 slots"     │   │  cart line key  │   │  catalog lookup │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// VAT Rate
// =============================================================================

/// VAT rate represented in basis points (bps).
///
/// 1 basis point = 0.01 %, so 2000 bps = 20 % (the Russian standard rate).
/// The UI edits the rate in steps of 0.1 %, which basis points hold exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VatRate(u32);

impl VatRate {
    /// Upper bound: 100 %.
    pub const MAX_BPS: u32 = 10_000;

    /// Creates a rate from basis points, clamped to 100 %.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        if bps > Self::MAX_BPS {
            VatRate(Self::MAX_BPS)
        } else {
            VatRate(bps)
        }
    }

    /// Creates a rate from a whole percentage, clamped to 100 %.
    #[inline]
    pub const fn from_percent(pct: u32) -> Self {
        Self::from_bps(pct.saturating_mul(100))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        VatRate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for VatRate {
    fn default() -> Self {
        VatRate::from_percent(20)
    }
}

// =============================================================================
// Delivery Zone
// =============================================================================

/// Where the order ships to. Each zone has its own shipping rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryZone {
    /// Moscow (courier).
    #[default]
    Moscow,
    /// Elsewhere in the Russian Federation.
    Rf,
    /// Outside Russia.
    World,
}

impl DeliveryZone {
    pub const ALL: [DeliveryZone; 3] = [DeliveryZone::Moscow, DeliveryZone::Rf, DeliveryZone::World];

    /// Wire tag used by the UI select (`moscow`, `rf`, `world`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            DeliveryZone::Moscow => "moscow",
            DeliveryZone::Rf => "rf",
            DeliveryZone::World => "world",
        }
    }
}

impl fmt::Display for DeliveryZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryZone {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "moscow" => Ok(DeliveryZone::Moscow),
            "rf" => Ok(DeliveryZone::Rf),
            "world" => Ok(DeliveryZone::World),
            _ => Err(ValidationError::NotAllowed {
                field: "delivery_zone".to_string(),
                allowed: DeliveryZone::ALL.iter().map(|z| z.to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Headphones Type
// =============================================================================

/// Headphone form factor. Each has its own catalog price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum HeadphonesType {
    InEar,
    OnEar,
    OverEar,
}

impl HeadphonesType {
    pub const ALL: [HeadphonesType; 3] = [
        HeadphonesType::InEar,
        HeadphonesType::OnEar,
        HeadphonesType::OverEar,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            HeadphonesType::InEar => "in_ear",
            HeadphonesType::OnEar => "on_ear",
            HeadphonesType::OverEar => "over_ear",
        }
    }
}

impl fmt::Display for HeadphonesType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeadphonesType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in_ear" => Ok(HeadphonesType::InEar),
            "on_ear" => Ok(HeadphonesType::OnEar),
            "over_ear" => Ok(HeadphonesType::OverEar),
            _ => Err(ValidationError::NotAllowed {
                field: "headphones_type".to_string(),
                allowed: HeadphonesType::ALL.iter().map(|h| h.to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Charger Variant
// =============================================================================

/// Charger label as keyed in the catalog (e.g. "20 slots").
///
/// Unlike headphones the set of chargers is data, not code, so the variant
/// is a label. `Configuration::set_charger_variant` only accepts labels that
/// exist in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(transparent)]
pub struct ChargerVariant(#[ts(type = "string")] String);

impl ChargerVariant {
    pub fn new(label: impl Into<String>) -> Self {
        ChargerVariant(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChargerVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChargerVariant {
    fn from(label: &str) -> Self {
        ChargerVariant::new(label)
    }
}

// =============================================================================
// Item Id
// =============================================================================

/// Identifies a cart line. One line per product family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ItemId {
    Transmitter,
    Receiver,
    Microphone,
    Headphones,
    Charger,
}

impl ItemId {
    /// Cart display order.
    pub const ALL: [ItemId; 5] = [
        ItemId::Transmitter,
        ItemId::Receiver,
        ItemId::Microphone,
        ItemId::Headphones,
        ItemId::Charger,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ItemId::Transmitter => "transmitter",
            ItemId::Receiver => "receiver",
            ItemId::Microphone => "microphone",
            ItemId::Headphones => "headphones",
            ItemId::Charger => "charger",
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemId::ALL
            .into_iter()
            .find(|id| id.as_str() == s.trim())
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "item_id".to_string(),
                allowed: ItemId::ALL.iter().map(|id| id.to_string()).collect(),
            })
    }
}

// =============================================================================
// Sku (catalog lookup key)
// =============================================================================

/// A fully resolved catalog key: product family plus variant where needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sku<'a> {
    Transmitter,
    Receiver,
    Microphone,
    Headphones(HeadphonesType),
    Charger(&'a ChargerVariant),
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charger_variant_exports_as_string() {
        assert_eq!(ChargerVariant::inline(), "string");
        assert!(ChargerVariant::decl().contains("= string"));
    }

    #[test]
    fn test_vat_rate_from_percent() {
        let rate = VatRate::from_percent(20);
        assert_eq!(rate.bps(), 2000);
        assert!((rate.percentage() - 20.0).abs() < 0.001);
    }

    #[test]
    fn test_vat_rate_clamps_to_hundred_percent() {
        assert_eq!(VatRate::from_bps(25_000).bps(), VatRate::MAX_BPS);
        assert_eq!(VatRate::from_percent(150).bps(), VatRate::MAX_BPS);
    }

    #[test]
    fn test_vat_rate_default_is_twenty_percent() {
        assert_eq!(VatRate::default(), VatRate::from_percent(20));
    }

    #[test]
    fn test_delivery_zone_parsing() {
        assert_eq!("moscow".parse::<DeliveryZone>().unwrap(), DeliveryZone::Moscow);
        assert_eq!(" RF ".parse::<DeliveryZone>().unwrap(), DeliveryZone::Rf);
        assert_eq!("world".parse::<DeliveryZone>().unwrap(), DeliveryZone::World);
        assert!("mars".parse::<DeliveryZone>().is_err());
    }

    #[test]
    fn test_headphones_type_round_trips_through_str() {
        for kind in HeadphonesType::ALL {
            assert_eq!(kind.as_str().parse::<HeadphonesType>().unwrap(), kind);
        }
        assert!("bone_conduction".parse::<HeadphonesType>().is_err());
    }

    #[test]
    fn test_item_id_parsing() {
        assert_eq!("headphones".parse::<ItemId>().unwrap(), ItemId::Headphones);
        assert!("speaker".parse::<ItemId>().is_err());
    }

    #[test]
    fn test_serde_tags_match_ui_values() {
        let json = serde_json::to_string(&DeliveryZone::Rf).unwrap();
        assert_eq!(json, "\"rf\"");
        let json = serde_json::to_string(&HeadphonesType::OverEar).unwrap();
        assert_eq!(json, "\"over_ear\"");
        let json = serde_json::to_string(&ChargerVariant::new("20 slots")).unwrap();
        assert_eq!(json, "\"20 slots\"");
    }
}
