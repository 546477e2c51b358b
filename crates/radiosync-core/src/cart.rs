//! # Cart Reconciler
//!
//! The cart is not stored separately: it is a view of the configuration.
//! Edits made from the cart are written back through the configuration
//! setters, so the two can never disagree.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart ⇄ Configuration                                 │
//! │                                                                         │
//! │  Cart Action          Function               Configuration Change       │
//! │  ───────────          ────────               ────────────────────       │
//! │                                                                         │
//! │  View Cart ─────────► line_items() ────────► (read only)               │
//! │                                                                         │
//! │  Change Quantity ───► update_quantity() ───► set_*_qty(n)              │
//! │                                                                         │
//! │  + / − buttons ─────► increment/decrement ─► set_*_qty(n ± 1)          │
//! │                                                                         │
//! │  Click Remove ──────► remove_item() ───────► qty 0, variant cleared     │
//! │                                                                         │
//! │  NOTE: the charger is always quantity 1; quantity edits ignore it and  │
//! │        only remove_item() takes it out.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use ts_rs::TS;

use crate::catalog::Catalog;
use crate::configuration::Configuration;
use crate::error::ValidationError;
use crate::money::Money;
use crate::types::ItemId;
use crate::validation::ValidationResult;

/// One cart line, derived from the configuration.
///
/// Quantities and totals are per bundle, as the cart shows them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: ItemId,
    pub name: String,
    pub sku: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub line_total: Money,
    pub icon: String,
}

/// Cart lines in display order: transmitter, receiver, microphone,
/// headphones, charger. Lines with quantity 0 are omitted.
pub fn line_items(config: &Configuration, catalog: &Catalog) -> Vec<LineItem> {
    config
        .selected_skus()
        .into_iter()
        .map(|(id, sku, quantity)| {
            let entry = catalog.entry(sku);
            LineItem {
                id,
                name: entry.name.clone(),
                sku: entry.sku.clone(),
                quantity,
                unit_price: entry.unit_price,
                line_total: entry.unit_price.multiply_quantity(quantity),
                icon: entry.icon.clone(),
            }
        })
        .collect()
}

/// Writes a cart quantity back to the configuration.
///
/// ## Behavior
/// - Negative quantities are rejected; nothing changes
/// - Headphones at 0 keep their selected type (use `remove_item` to clear it)
/// - The charger has no quantity to edit: always `Ok(())`, nothing changes
pub fn update_quantity(config: &mut Configuration, item: ItemId, qty: i64) -> ValidationResult<()> {
    match item {
        ItemId::Transmitter => config.set_transmitter_qty(qty),
        ItemId::Receiver => config.set_receiver_qty(qty),
        ItemId::Microphone => config.set_microphone_qty(qty),
        ItemId::Headphones => config.set_headphones_qty(qty),
        ItemId::Charger => {
            if qty < 0 {
                return Err(ValidationError::MustBeNonNegative {
                    field: "charger_qty".to_string(),
                });
            }
            Ok(())
        }
    }
}

/// Takes a line out of the cart.
///
/// Headphones also lose their type and the charger its variant, so the line
/// disappears completely.
pub fn remove_item(config: &mut Configuration, item: ItemId) {
    config.reset_line(item);
}

/// Adds one unit to a line.
pub fn increment(config: &mut Configuration, item: ItemId) -> ValidationResult<()> {
    let current = config.quantity_of(item) as i64;
    update_quantity(config, item, current + 1)
}

/// Removes one unit from a line. At 0 this is rejected.
pub fn decrement(config: &mut Configuration, item: ItemId) -> ValidationResult<()> {
    let current = config.quantity_of(item) as i64;
    update_quantity(config, item, current - 1)
}

/// Summary of the cart as shown in the order dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: u32,
    /// Σ line totals for one bundle, before discounts.
    pub subtotal: Money,
}

impl From<&[LineItem]> for CartTotals {
    fn from(items: &[LineItem]) -> Self {
        CartTotals {
            item_count: items.len(),
            total_quantity: items.iter().map(|i| i.quantity).sum(),
            subtotal: items.iter().map(|i| i.line_total).sum(),
        }
    }
}

pub fn cart_totals(items: &[LineItem]) -> CartTotals {
    CartTotals::from(items)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChargerVariant, HeadphonesType};

    fn full_config(catalog: &Catalog) -> Configuration {
        let mut config = Configuration::new();
        config.set_microphone_qty(1).unwrap();
        config.set_receiver_qty(20).unwrap();
        config.set_transmitter_qty(2).unwrap();
        config.set_headphones_type(Some(HeadphonesType::OnEar));
        config.set_headphones_qty(20).unwrap();
        config
            .set_charger_variant(Some(ChargerVariant::new("20 slots")), catalog)
            .unwrap();
        config
    }

    #[test]
    fn test_line_items_order_and_totals() {
        let catalog = Catalog::standard();
        let items = line_items(&full_config(&catalog), &catalog);

        let ids: Vec<ItemId> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, ItemId::ALL.to_vec());

        assert_eq!(items[0].name, "Передатчик");
        assert_eq!(items[0].line_total, Money::from_rubles(3_000));
        assert_eq!(items[3].sku, "radiosync-h-on");
        assert_eq!(items[3].line_total, Money::from_rubles(10_000));
        assert_eq!(items[4].quantity, 1);
        assert_eq!(items[4].icon, "🔌");
    }

    #[test]
    fn test_headphones_at_zero_not_listed() {
        let catalog = Catalog::standard();
        let mut config = Configuration::new();
        config.set_receiver_qty(1).unwrap();
        config.set_headphones_type(Some(HeadphonesType::InEar));

        // type selected but quantity 0
        let items = line_items(&config, &catalog);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, ItemId::Receiver);
    }

    #[test]
    fn test_update_quantity_rejects_negative() {
        let catalog = Catalog::standard();
        let mut config = full_config(&catalog);
        let before = config.clone();

        assert!(update_quantity(&mut config, ItemId::Receiver, -1).is_err());
        assert!(update_quantity(&mut config, ItemId::Charger, -1).is_err());
        assert_eq!(config, before);
    }

    #[test]
    fn test_update_quantity_on_charger_is_noop() {
        let catalog = Catalog::standard();
        let mut config = full_config(&catalog);
        let before = config.clone();

        assert!(update_quantity(&mut config, ItemId::Charger, 5).is_ok());
        assert!(update_quantity(&mut config, ItemId::Charger, 0).is_ok());
        assert_eq!(config, before);
    }

    #[test]
    fn test_headphones_at_zero_keep_type() {
        let catalog = Catalog::standard();
        let mut config = full_config(&catalog);

        update_quantity(&mut config, ItemId::Headphones, 0).unwrap();
        assert_eq!(config.headphones_qty(), 0);
        assert_eq!(config.headphones_type(), Some(HeadphonesType::OnEar));

        // the line is gone, but raising the quantity brings it back as on-ear
        assert!(line_items(&config, &catalog)
            .iter()
            .all(|i| i.id != ItemId::Headphones));
        update_quantity(&mut config, ItemId::Headphones, 3).unwrap();
        assert_eq!(config.quantity_of(ItemId::Headphones), 3);
    }

    #[test]
    fn test_remove_item_clears_line_completely() {
        let catalog = Catalog::standard();
        let mut config = full_config(&catalog);

        remove_item(&mut config, ItemId::Headphones);
        assert_eq!(config.headphones_qty(), 0);
        assert_eq!(config.headphones_type(), None);

        remove_item(&mut config, ItemId::Charger);
        assert_eq!(config.charger_variant(), None);

        remove_item(&mut config, ItemId::Receiver);
        assert_eq!(config.receiver_qty(), 0);

        let ids: Vec<ItemId> = line_items(&config, &catalog).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![ItemId::Transmitter, ItemId::Microphone]);
    }

    #[test]
    fn test_increment_and_decrement() {
        let mut config = Configuration::new();

        increment(&mut config, ItemId::Microphone).unwrap();
        increment(&mut config, ItemId::Microphone).unwrap();
        assert_eq!(config.microphone_qty(), 2);

        decrement(&mut config, ItemId::Microphone).unwrap();
        decrement(&mut config, ItemId::Microphone).unwrap();
        assert!(decrement(&mut config, ItemId::Microphone).is_err());
        assert_eq!(config.microphone_qty(), 0);

        // headphones need a type first
        assert!(increment(&mut config, ItemId::Headphones).is_err());
    }

    #[test]
    fn test_cart_totals() {
        let catalog = Catalog::standard();
        let items = line_items(&full_config(&catalog), &catalog);
        let totals = cart_totals(&items);

        assert_eq!(totals.item_count, 5);
        assert_eq!(totals.total_quantity, 44);
        // 3000 + 20000 + 2000 + 10000 + 6000
        assert_eq!(totals.subtotal, Money::from_rubles(41_000));
        assert_eq!(cart_totals(&[]), CartTotals::default());
    }
}
