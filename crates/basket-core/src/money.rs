//! # Money Module
//!
//! Provides the `Money` and `Percentage` types used by every price in the
//! basket engine.
//!
//! ## Why Fixed-Point Decimal?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE PRECISION PROBLEM                                                  │
//! │                                                                         │
//! │  Floating point:                                                        │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Integer cents round too early:                                         │
//! │    £30.00 × 2 at 10% off then ×20% VAT                                  │
//! │    every intermediate step would be snapped to a whole penny            │
//! │                                                                         │
//! │  OUR SOLUTION: rust_decimal                                             │
//! │    Exact base-10 arithmetic, sub-penny digits are KEPT                  │
//! │    Rounding happens only when the caller asks (`round_to_pennies`)      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use basket_core::money::{Money, Percentage};
//!
//! let price = Money::from_pennies(3000);     // £30.00
//! let line = price.multiply_quantity(2).unwrap(); // £60.00
//! let ten = Percentage::new(10).unwrap();
//!
//! assert_eq!(line.apply_percentage_discount(ten), Money::from_pennies(5400));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;
use thiserror::Error;

use crate::types::VatRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in the basket's single currency.
///
/// ## Design Decisions
/// - **Decimal (96-bit mantissa)**: base-10 exact, no float drift
/// - **No implicit rounding**: `1000.00 × 1.5%` stays `15.000`
/// - **Transparent serde**: stored and serialized as the decimal itself
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Item.price ──► BasketLineItem.total_price() ──► subtotal               │
/// │                                                      │                  │
/// │                      Shipping.cost ──────────────────┤                  │
/// │                                                      ▼                  │
/// │                              total_without_vat ──► vat ──► total_with_vat│
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Wraps an existing decimal amount.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from pennies (hundredths).
    ///
    /// ## Example
    /// ```rust
    /// use basket_core::money::Money;
    ///
    /// let price = Money::from_pennies(599);
    /// assert_eq!(price.to_string(), "£5.99");
    /// ```
    #[inline]
    pub fn from_pennies(pennies: i64) -> Self {
        Money(Decimal::new(pennies, 2))
    }

    /// Parses a decimal string without losing any digits.
    ///
    /// ## Example
    /// ```rust
    /// use basket_core::money::Money;
    ///
    /// let vat = Money::from_str_exact("210.805").unwrap();
    /// assert_eq!(vat.amount().scale(), 3);
    /// ```
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Decimal::from_str_exact(s).map(Money)
    }

    /// Returns the underlying decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Multiplies money by a line quantity. `None` when the product leaves
    /// the decimal range.
    ///
    /// ## Example
    /// ```rust
    /// use basket_core::money::Money;
    ///
    /// let unit_price = Money::from_pennies(3000);
    /// assert_eq!(unit_price.multiply_quantity(2), Some(Money::from_pennies(6000)));
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(qty)).map(Money)
    }

    /// Adds two amounts. `None` on overflow.
    #[inline]
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Sums amounts, stopping at the first overflow.
    pub fn checked_sum<I>(amounts: I) -> Option<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |acc, amount| acc.checked_add(amount))
    }

    /// Returns `percentage` of this amount, e.g. the discount to subtract.
    #[inline]
    pub fn percentage_of(&self, percentage: Percentage) -> Money {
        Money(self.0 * percentage.fraction())
    }

    /// Applies a percentage discount and returns the reduced amount.
    ///
    /// Computed as `amount - amount × (p / 100)`; nothing is rounded.
    ///
    /// ## Example
    /// ```rust
    /// use basket_core::money::{Money, Percentage};
    ///
    /// let subtotal = Money::from_str_exact("19.99").unwrap();
    /// let discounted = subtotal.apply_percentage_discount(Percentage::new(15).unwrap());
    /// assert_eq!(discounted, Money::from_str_exact("16.9915").unwrap());
    /// ```
    pub fn apply_percentage_discount(&self, percentage: Percentage) -> Money {
        *self - self.percentage_of(percentage)
    }

    /// Calculates VAT on this amount.
    ///
    /// ## User Workflow
    /// ```text
    /// Subtotal + Shipping: £1054.00
    ///      │
    ///      ▼
    /// calculate_tax(20%) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// VAT: £210.80
    /// ```
    ///
    /// `None` when the tax leaves the decimal range (possible only for rates
    /// far above 100%).
    pub fn calculate_tax(&self, rate: VatRate) -> Option<Money> {
        self.0.checked_mul(rate.fraction()).map(Money)
    }

    /// Rounds to whole pennies using Bankers Rounding (half to even).
    ///
    /// Only presentation code should call this; totals keep full precision.
    pub fn round_to_pennies(&self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven),
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the amount rounded to two fraction digits.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.round_to_pennies().0;
        if rounded.is_sign_negative() && !rounded.is_zero() {
            write!(f, "-£{:.2}", rounded.abs())
        } else {
            write!(f, "£{:.2}", rounded.abs())
        }
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_str_exact(s.trim())
    }
}

/// Default money is zero.
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

// =============================================================================
// Percentage
// =============================================================================

/// Returned when a percentage falls outside `0..=100`.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("percentage must be between 0 and 100, got {0}")]
pub struct PercentageOutOfRange(pub i64);

/// A whole-number percentage between 0 and 100 inclusive.
///
/// Used for per-line discounts and basket-level discount codes. Applied as
/// `value / 100` with no pre-rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Percentage(u8);

impl Percentage {
    /// Largest allowed percentage.
    pub const MAX: u8 = 100;

    /// Creates a percentage, returning `None` when above 100.
    #[inline]
    pub const fn new(value: u8) -> Option<Self> {
        if value <= Self::MAX {
            Some(Percentage(value))
        } else {
            None
        }
    }

    /// Returns the whole-number value (10 for 10%).
    #[inline]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Returns the percentage as a decimal fraction (0.10 for 10%).
    #[inline]
    pub fn fraction(&self) -> Decimal {
        Decimal::new(i64::from(self.0), 2)
    }
}

impl TryFrom<i64> for Percentage {
    type Error = PercentageOutOfRange;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Percentage::new)
            .ok_or(PercentageOutOfRange(value))
    }
}

impl From<Percentage> for i64 {
    fn from(p: Percentage) -> Self {
        i64::from(p.0)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
