//! # Cart Commands
//!
//! Commands behind the cart list. The cart is a view of the configuration,
//! so every edit writes through to the matching configuration field.
//!
//! ## Line Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌──────────┐   set_*_qty / increment    ┌──────────┐                   │
//! │  │  Absent  │ ─────────────────────────► │ Present  │                   │
//! │  │ (qty 0)  │ ◄───────────────────────── │ (qty>0)  │                   │
//! │  └──────────┘   remove / update to 0     └──────────┘                   │
//! │                                              │                          │
//! │                                   update_cart_item / decrement          │
//! │                                                                         │
//! │  clear_cart ─────────► every line absent (zone and VAT kept)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use radiosync_core::cart::{decrement, increment, remove_item, update_quantity};
use radiosync_core::ItemId;

use super::{apply, ConfiguratorResponse};
use crate::state::Session;

/// Gets the current cart with the full breakdown.
pub fn get_cart(session: &Session) -> ConfiguratorResponse {
    debug!("get_cart command");
    ConfiguratorResponse::from_session(session)
}

/// Sets a line's quantity. Negative values are rejected; the charger line
/// has a fixed quantity and ignores edits.
pub fn update_cart_item(session: &mut Session, item: &str, quantity: i64) -> ConfiguratorResponse {
    debug!(item = %item, quantity, "update_cart_item command");
    apply(session, "update_cart_item", |c, _| {
        let item = item.parse::<ItemId>()?;
        Ok(update_quantity(c, item, quantity)?)
    })
}

pub fn increment_cart_item(session: &mut Session, item: &str) -> ConfiguratorResponse {
    debug!(item = %item, "increment_cart_item command");
    apply(session, "increment_cart_item", |c, _| {
        let item = item.parse::<ItemId>()?;
        Ok(increment(c, item)?)
    })
}

/// Decrements a line. At zero this is rejected rather than clamped.
pub fn decrement_cart_item(session: &mut Session, item: &str) -> ConfiguratorResponse {
    debug!(item = %item, "decrement_cart_item command");
    apply(session, "decrement_cart_item", |c, _| {
        let item = item.parse::<ItemId>()?;
        Ok(decrement(c, item)?)
    })
}

/// Removes a line entirely (headphones also lose their type).
pub fn remove_from_cart(session: &mut Session, item: &str) -> ConfiguratorResponse {
    debug!(item = %item, "remove_from_cart command");
    apply(session, "remove_from_cart", |c, _| {
        remove_item(c, item.parse::<ItemId>()?);
        Ok(())
    })
}

pub fn clear_cart(session: &mut Session) -> ConfiguratorResponse {
    debug!("clear_cart command");
    apply(session, "clear_cart", |c, _| {
        c.clear_all();
        Ok(())
    })
}
