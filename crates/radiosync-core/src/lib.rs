//! # radiosync-core: Pricing & Cart Logic for the RadioSync Configurator
//!
//! This crate holds the business logic of the equipment configurator as
//! plain data and pure functions. It performs no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    RadioSync Configurator                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation (web form / console)               │   │
//! │  │    Quantities ──► Delivery ──► Promo / VAT ──► Order dialog     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ raw text                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             radiosync-configurator (commands, session)          │   │
//! │  │    set_receiver_qty, update_cart_item, submit_order, etc.       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ radiosync-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────┐   │   │
//! │  │   │configuration│ │ pricing  │ │   cart   │ │   catalog    │   │   │
//! │  │   │  setters    │ │Breakdown │ │LineItem  │ │  promo table │   │   │
//! │  │   └─────────────┘ └──────────┘ └──────────┘ └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO LOGGING • NO CLOCK IN PRICING • INTEGER MONEY     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money in kopecks, percentage and VAT math
//! - [`types`] - Small domain types (zones, headphone types, item ids)
//! - [`catalog`] - Price table, shipping rules, volume tiers
//! - [`promo`] - Promo code table
//! - [`configuration`] - The user's selections, guarded by setters
//! - [`pricing`] - `compute_breakdown`
//! - [`cart`] - Cart lines derived from the configuration, cart edits
//! - [`order`] - Order snapshot, customer details, bundle label
//! - [`validation`] - Input parsing and validation rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use radiosync_core::{compute_breakdown, Catalog, Configuration, Money, PromoTable};
//!
//! let catalog = Catalog::standard();
//! let promos = PromoTable::standard();
//!
//! let mut config = Configuration::new();
//! config.set_receiver_qty(2).unwrap();
//! config.set_transmitter_qty(1).unwrap();
//! config.set_bundle_count(3).unwrap();
//!
//! let breakdown = compute_breakdown(&config, &catalog, &promos);
//! assert_eq!(breakdown.subtotal, Money::from_rubles(10_500));
//! assert_eq!(breakdown.total, Money::from_rubles(12_600));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod configuration;
pub mod error;
pub mod money;
pub mod order;
pub mod pricing;
pub mod promo;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{CartTotals, LineItem};
pub use catalog::Catalog;
pub use configuration::Configuration;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::{CustomerInfo, OrderSnapshot};
pub use pricing::{compute_breakdown, Breakdown};
pub use promo::{PromoDiscount, PromoTable};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum per-bundle quantity of a single item.
///
/// ## Business Reason
/// Catches typos (an extra zero or two) before they reach an order.
pub const MAX_ITEM_QUANTITY: u32 = 9_999;

/// Maximum bundle multiplier.
pub const MAX_BUNDLE_COUNT: u32 = 999;
