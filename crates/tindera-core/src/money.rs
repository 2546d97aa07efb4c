//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The legacy store kept amounts as JS numbers:                           │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Every invoice total was patched up with                                │
//! │    Math.round(x * 100) / 100                                            │
//! │  sprinkled at each call site.                                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    ₱180.00 is 18000 centavos. Rounding to two decimals becomes          │
//! │    rounding to the nearest integer, exactly once, in one place.         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tindera_core::money::{DiscountRate, Money};
//!
//! let subtotal = Money::from_cents(20000); // ₱200.00
//! let rate = DiscountRate::from_percent(10.0);
//!
//! let discount = subtotal.discount(rate);
//! assert_eq!(discount.cents(), 2000);              // ₱20.00
//! assert_eq!((subtotal - discount).cents(), 18000); // ₱180.00
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (centavos).
///
/// ## Design Decisions
/// - **i64 (signed)**: net income may be negative when expenses exceed revenue
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money Flows
/// ```text
/// Product.price_cents ──► LineItem.price_cents ──► Transaction.subtotal
///                                                       │
///                              discount(rate) ──────────┤
///                                                       ▼
///                                              Transaction.total
///                                                       │
/// Expense.amount_cents ──► total_expenses ──────────────┤
///                                                       ▼
///                                                  net_income
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use tindera_core::money::Money;
    ///
    /// let price = Money::from_cents(15050); // ₱150.50
    /// assert_eq!(price.cents(), 15050);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole pesos.
    #[inline]
    pub const fn from_pesos(pesos: i64) -> Self {
        Money(pesos * 100)
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-peso portion.
    #[inline]
    pub const fn pesos(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavo portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (net loss).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates the discount amount for a percentage rate, rounded to
    /// the nearest centavo.
    ///
    /// ## Rounding Contract
    /// The invoice invariant is
    /// `total = round(subtotal × (1 − percent/100), 2)`.
    /// In integer centavos that is one half-up rounding of the discount:
    /// `(cents × bps + 5000) / 10000`. The subtraction itself is exact.
    ///
    /// ## Example
    /// ```rust
    /// use tindera_core::money::{DiscountRate, Money};
    ///
    /// let subtotal = Money::from_cents(20000); // ₱200.00
    /// let discount = subtotal.discount(DiscountRate::from_percent(10.0));
    /// assert_eq!(discount.cents(), 2000); // ₱20.00
    /// ```
    pub fn discount(&self, rate: DiscountRate) -> Money {
        // i128 to avoid overflow on large subtotals
        let cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(cents as i64)
    }

    /// Applies a percentage discount and returns what remains.
    ///
    /// ## Example
    /// ```rust
    /// use tindera_core::money::{DiscountRate, Money};
    ///
    /// let subtotal = Money::from_cents(20000);
    /// let total = subtotal.apply_discount(DiscountRate::from_percent(10.0));
    /// assert_eq!(total.cents(), 18000); // ₱180.00
    /// ```
    #[inline]
    pub fn apply_discount(&self, rate: DiscountRate) -> Money {
        *self - self.discount(rate)
    }
}

// =============================================================================
// Discount Rate
// =============================================================================

/// Discount rate in basis points (1 bps = 0.01%).
///
/// ## Why Basis Points?
/// The checkout form accepts fractional percentages ("12.5"). Storing the
/// rate as an integer number of basis points keeps the discount math in
/// pure integer arithmetic: 1250 bps = 12.5%.
///
/// Rates are clamped to 0–100% on construction; the form allowed free
/// text, so out-of-range and non-numeric input must degrade safely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// Maximum representable rate: 100% = 10000 bps.
    pub const MAX_BPS: u32 = 10_000;

    /// Creates a rate from basis points, clamped to 0–10000.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        if bps > Self::MAX_BPS {
            DiscountRate(Self::MAX_BPS)
        } else {
            DiscountRate(bps)
        }
    }

    /// Creates a rate from a percentage, clamped to 0–100.
    ///
    /// Non-finite input (NaN from a garbled form field) maps to 0%.
    ///
    /// ## Example
    /// ```rust
    /// use tindera_core::money::DiscountRate;
    ///
    /// assert_eq!(DiscountRate::from_percent(10.0).bps(), 1000);
    /// assert_eq!(DiscountRate::from_percent(150.0).bps(), 10000); // clamped
    /// assert_eq!(DiscountRate::from_percent(-5.0).bps(), 0);      // clamped
    /// ```
    pub fn from_percent(pct: f64) -> Self {
        if !pct.is_finite() {
            return DiscountRate(0);
        }
        let clamped = pct.clamp(0.0, 100.0);
        DiscountRate((clamped * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero discount.
    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        DiscountRate::zero()
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for receipts and debugging. The frontend formats for locale.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₱{}.{:02}", sign, self.pesos().abs(), self.cents_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Negation (a refund-style flip, used by net-income math).
impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Summation over iterators of Money (revenue/expense totals).
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
