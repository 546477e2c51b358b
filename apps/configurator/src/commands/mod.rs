//! # Commands Module
//!
//! Every operation the presentation layer can invoke.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs            ◄─── You are here (response type, shared helper)
//! ├── configuration.rs  ◄─── Form fields (zone, quantities, VAT, promo, ...)
//! ├── cart.rs           ◄─── Cart list editing
//! └── order.rs          ◄─── Order / lead submission and retry
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  UI field "Приёмники" ── "12" ──► set_receiver_qty(&mut session, "12") │
//! │                                          │                              │
//! │                                          ▼                              │
//! │                         parse text ─► Configuration setter              │
//! │                                          │                              │
//! │                              ┌───────────┴───────────┐                  │
//! │                              ▼                       ▼                  │
//! │                           accepted               rejected               │
//! │                              │                  (debug! log,            │
//! │                              │                   state unchanged)       │
//! │                              └───────────┬───────────┘                  │
//! │                                          ▼                              │
//! │                  ConfiguratorResponse { configuration, breakdown,       │
//! │                                         items, totals, rejected }       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Configuration commands never fail: a rejected input leaves the session as
//! it was and the response says what was rejected. Only submission commands
//! produce user-facing notifications.

pub mod cart;
pub mod configuration;
pub mod order;

use serde::Serialize;
use tracing::debug;

use radiosync_core::order::bundle_label;
use radiosync_core::{Breakdown, CartTotals, Catalog, Configuration, LineItem};

use crate::error::ApiError;
use crate::state::Session;

/// Full view of the session after a command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguratorResponse {
    pub configuration: Configuration,
    pub breakdown: Breakdown,
    pub items: Vec<LineItem>,
    pub totals: CartTotals,
    /// "За 3 комплекта" style caption when more than one bundle is ordered.
    pub bundle_label: Option<String>,
    /// Set when the command's input was rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected: Option<ApiError>,
}

impl ConfiguratorResponse {
    pub fn from_session(session: &Session) -> Self {
        let items = session.line_items();
        let totals = CartTotals::from(items.as_slice());

        ConfiguratorResponse {
            configuration: session.configuration().clone(),
            breakdown: session.breakdown().clone(),
            items,
            totals,
            bundle_label: bundle_label(session.breakdown().effective_bundles),
            rejected: None,
        }
    }

    fn with_rejection(mut self, rejected: Option<ApiError>) -> Self {
        self.rejected = rejected;
        self
    }

    pub fn is_rejected(&self) -> bool {
        self.rejected.is_some()
    }
}

/// Runs a mutation against the session and builds the response.
///
/// A rejection is logged at debug level and reported in `rejected`; the
/// setter has already left the configuration untouched.
pub(crate) fn apply<F>(session: &mut Session, command: &'static str, f: F) -> ConfiguratorResponse
where
    F: FnOnce(&mut Configuration, &Catalog) -> Result<(), ApiError>,
{
    let rejected = match session.update(f) {
        Ok(()) => None,
        Err(err) => {
            debug!(command, error = %err, "Input rejected");
            Some(err)
        }
    };

    ConfiguratorResponse::from_session(session).with_rejection(rejected)
}
