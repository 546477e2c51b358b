//! # Configuration Commands
//!
//! One command per form field. Each takes the raw text the field holds.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Field                   Command                    Accepts             │
//! │  ─────                   ───────                    ───────             │
//! │  Зона доставки           set_delivery_zone          moscow | rf | world │
//! │  Передатчики             set_transmitter_qty        digits, "" = 0      │
//! │  Приёмники               set_receiver_qty           digits, "" = 0      │
//! │  Микрофоны               set_microphone_qty         digits, "" = 0      │
//! │  Тип наушников           set_headphones_type        type | "" | none    │
//! │  Наушники                set_headphones_qty         digits, "" = 0      │
//! │  Зарядное устройство     set_charger_variant        catalog label | ""  │
//! │  Промокод                set_promo_code             any text            │
//! │  НДС включён             set_vat_included           bool                │
//! │  Ставка НДС              set_vat_rate               "20", "12,5", ""    │
//! │  Комплектов              set_bundle_count           digits, "" = 0      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use radiosync_core::validation::{
    parse_bundle_input, parse_percent_input, parse_quantity_input,
};
use radiosync_core::{ChargerVariant, DeliveryZone, HeadphonesType};

use super::{apply, ConfiguratorResponse};
use crate::state::Session;

/// Returns the current session view.
pub fn get_configuration(session: &Session) -> ConfiguratorResponse {
    debug!("get_configuration command");
    ConfiguratorResponse::from_session(session)
}

pub fn set_delivery_zone(session: &mut Session, zone: &str) -> ConfiguratorResponse {
    debug!(zone = %zone, "set_delivery_zone command");
    apply(session, "set_delivery_zone", |c, _| {
        c.set_delivery_zone(zone.parse::<DeliveryZone>()?);
        Ok(())
    })
}

pub fn set_transmitter_qty(session: &mut Session, text: &str) -> ConfiguratorResponse {
    debug!(text = %text, "set_transmitter_qty command");
    apply(session, "set_transmitter_qty", |c, _| {
        let qty = parse_quantity_input("transmitter_qty", text)?;
        Ok(c.set_transmitter_qty(i64::from(qty))?)
    })
}

pub fn set_receiver_qty(session: &mut Session, text: &str) -> ConfiguratorResponse {
    debug!(text = %text, "set_receiver_qty command");
    apply(session, "set_receiver_qty", |c, _| {
        let qty = parse_quantity_input("receiver_qty", text)?;
        Ok(c.set_receiver_qty(i64::from(qty))?)
    })
}

pub fn set_microphone_qty(session: &mut Session, text: &str) -> ConfiguratorResponse {
    debug!(text = %text, "set_microphone_qty command");
    apply(session, "set_microphone_qty", |c, _| {
        let qty = parse_quantity_input("microphone_qty", text)?;
        Ok(c.set_microphone_qty(i64::from(qty))?)
    })
}

/// Selects the headphone type. `""` or `"none"` deselects it, which also
/// zeroes the headphone quantity.
pub fn set_headphones_type(session: &mut Session, kind: &str) -> ConfiguratorResponse {
    debug!(kind = %kind, "set_headphones_type command");
    apply(session, "set_headphones_type", |c, _| {
        let kind = kind.trim();
        let selection = if kind.is_empty() || kind.eq_ignore_ascii_case("none") {
            None
        } else {
            Some(kind.parse::<HeadphonesType>()?)
        };
        c.set_headphones_type(selection);
        Ok(())
    })
}

pub fn set_headphones_qty(session: &mut Session, text: &str) -> ConfiguratorResponse {
    debug!(text = %text, "set_headphones_qty command");
    apply(session, "set_headphones_qty", |c, _| {
        let qty = parse_quantity_input("headphones_qty", text)?;
        Ok(c.set_headphones_qty(i64::from(qty))?)
    })
}

/// Selects a charger by its catalog label; `""` removes it.
pub fn set_charger_variant(session: &mut Session, label: &str) -> ConfiguratorResponse {
    debug!(label = %label, "set_charger_variant command");
    apply(session, "set_charger_variant", |c, catalog| {
        let label = label.trim();
        let variant = (!label.is_empty()).then(|| ChargerVariant::new(label));
        Ok(c.set_charger_variant(variant, catalog)?)
    })
}

pub fn set_promo_code(session: &mut Session, code: &str) -> ConfiguratorResponse {
    debug!(code = %code, "set_promo_code command");
    apply(session, "set_promo_code", |c, _| {
        c.set_promo_code(code);
        Ok(())
    })
}

pub fn set_vat_included(session: &mut Session, included: bool) -> ConfiguratorResponse {
    debug!(included, "set_vat_included command");
    apply(session, "set_vat_included", |c, _| {
        c.set_vat_included(included);
        Ok(())
    })
}

pub fn set_vat_rate(session: &mut Session, text: &str) -> ConfiguratorResponse {
    debug!(text = %text, "set_vat_rate command");
    apply(session, "set_vat_rate", |c, _| {
        c.set_vat(parse_percent_input(text)?);
        Ok(())
    })
}

pub fn set_bundle_count(session: &mut Session, text: &str) -> ConfiguratorResponse {
    debug!(text = %text, "set_bundle_count command");
    apply(session, "set_bundle_count", |c, _| {
        let count = parse_bundle_input(text)?;
        Ok(c.set_bundle_count(i64::from(count))?)
    })
}
