//! # Session State
//!
//! One user's configurator session: the configuration being edited and the
//! breakdown derived from it.
//!
//! ## Recompute Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session Operations                                   │
//! │                                                                         │
//! │  Command                  Session                  Result               │
//! │  ───────                  ───────                  ──────               │
//! │                                                                         │
//! │  set_receiver_qty ──────► update(|c| ...) ───────► setter runs         │
//! │                                │                   breakdown recomputed │
//! │                                ▼                                        │
//! │  get_cart ──────────────► breakdown() ───────────► (read only)         │
//! │                                                                         │
//! │  submit_order ──────────► snapshot() ────────────► owned OrderSnapshot  │
//! │                                                                         │
//! │  NOTE: the breakdown is only ever replaced by compute_breakdown; it is │
//! │        never edited in place.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session is a plain owned value. Mutation needs `&mut Session`, so a
//! single-user console or UI thread needs no lock.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use radiosync_core::cart::{cart_totals, line_items};
use radiosync_core::{
    compute_breakdown, Breakdown, CartTotals, Catalog, Configuration, LineItem, OrderSnapshot,
    PromoTable,
};

use crate::config::{AppConfig, ConfigResult};

/// A configurator session.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    config: Configuration,
    catalog: Arc<Catalog>,
    promos: Arc<PromoTable>,
    breakdown: Breakdown,
}

impl Session {
    /// Creates a session over an existing configuration.
    pub fn new(config: Configuration, catalog: Arc<Catalog>, promos: Arc<PromoTable>) -> Self {
        let breakdown = compute_breakdown(&config, &catalog, &promos);
        Session {
            id: Uuid::new_v4(),
            config,
            catalog,
            promos,
            breakdown,
        }
    }

    /// Creates an empty session with the deployment's defaults.
    pub fn from_app_config(app: &AppConfig) -> ConfigResult<Self> {
        let mut config = Configuration::with_vat(app.pricing.vat()?, app.pricing.vat_included);
        config.set_delivery_zone(app.pricing.delivery_zone);

        let session = Session::new(
            config,
            Arc::new(app.catalog()),
            Arc::new(app.promo_table()?),
        );

        info!(
            session_id = %session.id,
            vat_rate = session.config.vat_rate().percentage(),
            vat_included = session.config.vat_included(),
            zone = %session.config.delivery_zone(),
            "Session started"
        );

        Ok(session)
    }

    /// Runs `f` against the configuration, then recomputes the breakdown.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// session.update(|config, _| config.set_receiver_qty(4))?;
    /// ```
    pub fn update<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut Configuration, &Catalog) -> R,
    {
        let result = f(&mut self.config, &self.catalog);
        self.recompute();
        result
    }

    fn recompute(&mut self) {
        self.breakdown = compute_breakdown(&self.config, &self.catalog, &self.promos);
    }

    // =========================================================================
    // Read Accessors
    // =========================================================================

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    pub fn breakdown(&self) -> &Breakdown {
        &self.breakdown
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn promos(&self) -> &PromoTable {
        &self.promos
    }

    pub fn line_items(&self) -> Vec<LineItem> {
        line_items(&self.config, &self.catalog)
    }

    pub fn cart_totals(&self) -> CartTotals {
        cart_totals(&self.line_items())
    }

    /// Owned, frozen copy for submission.
    pub fn snapshot(&self) -> OrderSnapshot {
        OrderSnapshot::capture(&self.config, &self.catalog, &self.promos)
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new(
            Configuration::new(),
            Arc::new(Catalog::standard()),
            Arc::new(PromoTable::standard()),
        )
    }
}
