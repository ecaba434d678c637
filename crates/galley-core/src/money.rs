//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    5.53 × 1.08 = 5.972400000000001  ❌ WRONG!                           │
//! │                                                                         │
//! │  Integer cents don't help either: the exchange table produces           │
//! │  fractions of a cent (5.9724) that must survive until display.          │
//! │                                                                         │
//! │  OUR SOLUTION: Exact base-10 decimals                                   │
//! │    5.53 × 1.08 = 5.9724 exactly                                         │
//! │    Rounded ONCE, at display time, half away from zero                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use galley_core::money::Money;
//!
//! let price = Money::from_minor(553); // 5.53
//!
//! let doubled = price.multiply_quantity(2);
//! assert_eq!(doubled, Money::from_minor(1106));
//!
//! // Display rounds to two places, nothing else does
//! assert_eq!(Money::from_str_exact("5.526").unwrap().to_fixed(), "5.53");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

/// Number of decimal places shown to the customer.
pub const DISPLAY_DECIMALS: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount, in whatever currency the caller is tracking.
///
/// `Money` carries no currency of its own: a product knows its native
/// currency, and the pricing pipeline knows its target currency. Keeping the
/// amount bare lets conversion stay a plain multiplication.
///
/// ## Design Decisions
/// - **Decimal (signed)**: Exact, and allows negative change for short cash
/// - **Single field tuple struct**: Zero-cost abstraction over `Decimal`
/// - **Serialized as a string**: `"5.53"` crosses JSON without float drift
///
/// ## User Workflow Context
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                    Where Money is Used                                  │
/// │                                                                         │
/// │  Product.price ──► convert ──► discount ──► × quantity ──► line total  │
/// │                                                                │        │
/// │                                        Σ lines ──► grand total │        │
/// │                                                                ▼        │
/// │                                          format_currency ──► "8.96 $"  │
/// │                                                                         │
/// │  EVERY price on both surfaces flows through this type                  │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Wraps an exact decimal amount.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from minor units (cents, pence).
    ///
    /// ## Example
    /// ```rust
    /// use galley_core::money::Money;
    ///
    /// let price = Money::from_minor(1099);
    /// assert_eq!(price.to_fixed(), "10.99");
    /// ```
    #[inline]
    pub fn from_minor(minor: i64) -> Self {
        Money(Decimal::new(minor, DISPLAY_DECIMALS))
    }

    /// Parses a decimal string without any loss of precision.
    ///
    /// ## Example
    /// ```rust
    /// use galley_core::money::Money;
    ///
    /// assert!(Money::from_str_exact("5.9724").is_ok());
    /// assert!(Money::from_str_exact("five").is_err());
    /// ```
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Decimal::from_str_exact(s.trim()).map(Money)
    }

    /// Returns the exact underlying amount.
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

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use galley_core::money::Money;
    ///
    /// let unit_price = Money::from_str_exact("4.4793").unwrap();
    /// let line_total = unit_price.multiply_quantity(2);
    /// assert_eq!(line_total, Money::from_str_exact("8.9586").unwrap());
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0 * Decimal::from(qty))
    }

    /// Multiplies by an exact factor (an exchange rate).
    #[inline]
    pub fn scale(&self, factor: Decimal) -> Self {
        Money(self.0 * factor)
    }

    /// Applies a whole-number percentage discount and returns the discounted
    /// amount: `amount - amount × percent / 100`.
    ///
    /// No rounding happens here. A 25% discount on 5.9724 is 4.4793, not 4.48.
    ///
    /// ## Example
    /// ```rust
    /// use galley_core::money::Money;
    ///
    /// let price = Money::from_minor(10000); // 100.00
    /// assert_eq!(price.apply_percentage_discount(25), Money::from_minor(7500));
    /// ```
    pub fn apply_percentage_discount(&self, percent: u8) -> Money {
        let discount_amount = self.0 * Decimal::from(percent) / Decimal::ONE_HUNDRED;
        Money(self.0 - discount_amount)
    }

    /// Rounds to two decimal places, half away from zero.
    ///
    /// ## Rounding Rule
    /// ```text
    /// 5.526  → 5.53
    /// 5.525  → 5.53   (midpoint goes away from zero)
    /// 5.524  → 5.52
    /// -5.525 → -5.53
    /// ```
    /// This is the only place rounding happens in the whole engine.
    pub fn round_for_display(&self) -> Money {
        let mut rounded = self
            .0
            .round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
        if rounded.is_zero() {
            // "-0.00" is never a price
            rounded.set_sign_positive(true);
        }
        Money(rounded)
    }

    /// Renders the amount with exactly two decimal places.
    ///
    /// ## Example
    /// ```rust
    /// use galley_core::money::Money;
    ///
    /// assert_eq!(Money::from_minor(500).to_fixed(), "5.00");
    /// assert_eq!(Money::from_str_exact("8.9586").unwrap().to_fixed(), "8.96");
    /// ```
    pub fn to_fixed(&self) -> String {
        let mut rounded = self.round_for_display().0;
        rounded.rescale(DISPLAY_DECIMALS);
        rounded.to_string()
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the two-decimal amount without a symbol.
///
/// ## Note
/// Use [`crate::currency::format_currency`] for anything the customer reads.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fixed())
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
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

/// Multiplication by a quantity.
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

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
