//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Catalog price 22.49 × 10 units in floating point:                      │
//! │    224.89999999999998  ❌ WRONG!                                        │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (paise)                              │
//! │    2249 × 10 = 22490  →  ₹224.90                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cleancart_core::money::Money;
//!
//! let price = Money::from_cents(2249); // ₹22.49
//! let line = price * 10_i64;           // ₹224.90
//! assert_eq!(line.cents(), 22_490);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (paise for INR).
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  ItemDescriptor.unit_price ──► LineItem.unit_price ──┐                  │
/// │                                                      ├─► effective price│
/// │  BulkTier.unit_price ────────────────────────────────┘        │         │
/// │                                                               ▼         │
/// │                               Cart.total_price = Σ price × quantity     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from the smallest currency unit.
    ///
    /// ## Example
    /// ```rust
    /// use cleancart_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // ₹10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// ## Example
    /// ```rust
    /// use cleancart_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(22, 50).cents(), 2250);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in the smallest currency unit.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
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

    /// Multiplies money by a quantity, saturating at the `i64` bounds.
    ///
    /// ## Example
    /// ```rust
    /// use cleancart_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(2500);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 7500);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Returns `self` as a whole percentage of `whole`, rounded half up.
    ///
    /// Used for "% OFF" badges. Returns 0 when `whole` is not positive.
    ///
    /// ## Example
    /// ```rust
    /// use cleancart_core::money::Money;
    ///
    /// let savings = Money::from_cents(15_000);
    /// let original = Money::from_cents(45_000);
    /// assert_eq!(savings.percentage_of(original), 33);
    /// ```
    pub fn percentage_of(&self, whole: Money) -> i64 {
        if !whole.is_positive() {
            return 0;
        }
        // (part * 100 + whole / 2) / whole, in i128 to keep large carts exact
        let part = self.0 as i128 * 100;
        let whole = whole.0 as i128;
        ((part + whole / 2).div_euclid(whole)) as i64
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the amount with the storefront's rupee sign.
///
/// ## Note
/// This is for logs and the `cart-inspect` tool. The UI formats amounts itself.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        // pad() so width and alignment flags work in tables
        f.pad(&format!("{}₹{}.{:02}", sign, self.major().abs(), self.minor()))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition and subtraction saturate at the `i64` bounds.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

/// Summing line totals into a cart total.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(22_500)), "₹225.00");
        assert_eq!(format!("{}", Money::from_cents(2249)), "₹22.49");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-₹5.50");
        assert_eq!(format!("{}", Money::zero()), "₹0.00");
        assert_eq!(format!("{:>8}", Money::from_cents(550)), "   ₹5.50");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3_i64).cents(), 3000);

        let mut c = a;
        c += b;
        c -= Money::from_cents(250);
        assert_eq!(c.cents(), 1250);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Money::from_cents(i64::MAX);
        let min = Money::from_cents(i64::MIN);

        assert_eq!(max + Money::from_cents(1), max);
        assert_eq!(min - Money::from_cents(1), min);
        assert_eq!(max * 2_i64, max);
        assert_eq!(Money::from_cents(2500).multiply_quantity(i64::MAX), max);
        assert_eq!(Money::from_cents(-2500).multiply_quantity(i64::MAX), min);

        let mut c = max;
        c += max;
        assert_eq!(c, max);

        let total: Money = [max, Money::from_cents(100)].iter().sum();
        assert_eq!(total, max);
    }

    #[test]
    fn test_sum() {
        let lines = [Money::from_cents(100), Money::from_cents(250)];
        let total: Money = lines.iter().sum();
        assert_eq!(total.cents(), 350);

        let empty: Money = Vec::<Money>::new().into_iter().sum();
        assert!(empty.is_zero());
    }

    #[test]
    fn test_percentage_of() {
        let original = Money::from_cents(1000);
        assert_eq!(Money::from_cents(250).percentage_of(original), 25);
        // 1/3 rounds down, 2/3 rounds up
        assert_eq!(Money::from_cents(1).percentage_of(Money::from_cents(3)), 33);
        assert_eq!(Money::from_cents(2).percentage_of(Money::from_cents(3)), 67);
        assert_eq!(Money::from_cents(100).percentage_of(Money::zero()), 0);
    }

    /// 22.49 × 10 must be exact; this is why prices are never floats.
    #[test]
    fn test_bulk_line_total_is_exact() {
        let tier_price = Money::from_major_minor(22, 49);
        assert_eq!(tier_price.multiply_quantity(10).cents(), 22_490);
    }

    #[test]
    fn test_sign_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_cents(1).is_positive());
        assert!(Money::from_cents(-1).is_negative());
    }
}
