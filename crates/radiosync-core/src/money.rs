//! # Money Module
//!
//! Provides the `Money` type for handling ruble amounts safely.
//!
//! ## Why Integer Kopecks?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A breakdown with five components summed on every keystroke would      │
//! │  drift by fractions of a kopeck and render "4199.999999 ₽".            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Kopecks                                          │
//! │    Sums and quantity products are exact.                                │
//! │    Percentage-derived amounts (discounts, VAT) are rounded to the      │
//! │    kopeck exactly ONCE, from exact inputs.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use radiosync_core::money::Money;
//!
//! let receiver = Money::from_rubles(1000);
//! let line_total = receiver.multiply_quantity(2);
//! assert_eq!(line_total, Money::from_rubles(2000));
//!
//! // 10 % of 2000.00 ₽
//! assert_eq!(line_total.percent_bps(1000), Money::from_rubles(200));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::VatRate;

/// Basis points in 100 %.
const FULL_BPS: i128 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in kopecks (1/100 of a ruble).
///
/// ## Design Decisions
/// - **i64 (signed)**: discounts are subtracted, intermediate sums may dip
///   below zero before the total floor is applied
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serialized as kopecks**: the presentation layer formats for display
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  SkuEntry.unit_price ──┬──► LineItem.line_total ──► CartTotals          │
/// │                        │                                                │
/// │                        └──► Breakdown.subtotal ──► discounts ──► VAT    │
/// │                                                        │                │
/// │                                              Breakdown.total            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from kopecks (the smallest currency unit).
    ///
    /// ```rust
    /// use radiosync_core::money::Money;
    ///
    /// let price = Money::from_kopecks(150_050); // 1500.50 ₽
    /// assert_eq!(price.kopecks(), 150_050);
    /// ```
    #[inline]
    pub const fn from_kopecks(kopecks: i64) -> Self {
        Money(kopecks)
    }

    /// Creates a Money value from whole rubles.
    ///
    /// Catalog prices are whole rubles, so this is the usual constructor
    /// for price tables.
    #[inline]
    pub const fn from_rubles(rubles: i64) -> Self {
        Money(rubles * 100)
    }

    /// Returns the value in kopecks.
    #[inline]
    pub const fn kopecks(&self) -> i64 {
        self.0
    }

    /// Returns the whole-ruble portion (truncated toward zero).
    ///
    /// ```rust
    /// use radiosync_core::money::Money;
    ///
    /// assert_eq!(Money::from_kopecks(150_099).rubles(), 1500);
    /// assert_eq!(Money::from_kopecks(-550).rubles(), -5);
    /// ```
    #[inline]
    pub const fn rubles(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the kopeck portion (always 0-99).
    #[inline]
    pub const fn kopecks_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Floors the value at zero.
    ///
    /// ```rust
    /// use radiosync_core::money::Money;
    ///
    /// assert_eq!(Money::from_kopecks(-1).non_negative(), Money::zero());
    /// assert_eq!(Money::from_kopecks(7).non_negative(), Money::from_kopecks(7));
    /// ```
    #[inline]
    pub const fn non_negative(self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            self
        }
    }

    /// Multiplies money by a unit quantity, saturating at the `i64` bounds.
    ///
    /// ```rust
    /// use radiosync_core::money::Money;
    ///
    /// let unit_price = Money::from_rubles(300);
    /// assert_eq!(unit_price.multiply_quantity(3), Money::from_rubles(900));
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }

    /// Returns `bps / 10000` of this amount, rounded half away from zero.
    ///
    /// Used for volume discounts and percentage promo codes.
    ///
    /// ```rust
    /// use radiosync_core::money::Money;
    ///
    /// // 3 % of 333.33 ₽ = 9.9999 ₽ → 10.00 ₽
    /// assert_eq!(Money::from_kopecks(33_333).percent_bps(300).kopecks(), 1000);
    /// ```
    pub fn percent_bps(&self, bps: u32) -> Money {
        let amount = div_round(self.0 as i128 * bps as i128, FULL_BPS);
        Money(amount as i64)
    }

    /// VAT to add on top of a net amount (`amount × r / 100`).
    ///
    /// ```rust
    /// use radiosync_core::money::Money;
    /// use radiosync_core::types::VatRate;
    ///
    /// let net = Money::from_rubles(3500);
    /// assert_eq!(net.vat_exclusive(VatRate::from_percent(20)), Money::from_rubles(700));
    /// ```
    pub fn vat_exclusive(&self, rate: VatRate) -> Money {
        self.percent_bps(rate.bps())
    }

    /// VAT contained in a gross amount (`amount × r / (100 + r)`).
    ///
    /// ## Back-calculation
    /// ```text
    /// gross 1200.00 ₽ at 20 %
    ///      │
    ///      ▼
    /// 1200.00 × 20 / 120 = 200.00 ₽ VAT  (net 1000.00 ₽)
    /// ```
    ///
    /// ```rust
    /// use radiosync_core::money::Money;
    /// use radiosync_core::types::VatRate;
    ///
    /// let gross = Money::from_rubles(1200);
    /// assert_eq!(gross.vat_inclusive(VatRate::from_percent(20)), Money::from_rubles(200));
    /// ```
    pub fn vat_inclusive(&self, rate: VatRate) -> Money {
        let bps = rate.bps() as i128;
        let amount = div_round(self.0 as i128 * bps, FULL_BPS + bps);
        Money(amount as i64)
    }
}

/// Integer division rounding half away from zero.
///
/// `den` is always positive at every call site.
fn div_round(num: i128, den: i128) -> i128 {
    let half = den / 2;
    if num >= 0 {
        (num + half) / den
    } else {
        (num - half) / den
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money as rubles with two decimals.
///
/// ## Note
/// This is for logs and debugging. Locale formatting ("4 200,00 ₽") is the
/// presentation layer's job.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}{}.{:02} ₽",
            sign,
            self.rubles().abs(),
            self.kopecks_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by a quantity or bundle count.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
