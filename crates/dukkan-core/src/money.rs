//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A ledger cannot be reconciled on approximations: debt settlement       │
//! │  hinges on exact >= comparisons between sums of payments.               │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Kuruş                                            │
//! │    ₺10,99 is stored as 1099; every sum, allocation and refund          │
//! │    comparison is exact integer arithmetic                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use dukkan_core::money::Money;
//!
//! // Create from kuruş (preferred)
//! let price = Money::from_kurus(1099); // ₺10,99
//!
//! // Arithmetic operations
//! let total = price + Money::from_kurus(500); // ₺15,99
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in kuruş, the smallest currency unit (1/100 lira).
///
/// ## Design Decisions
/// - **i64 (signed)**: refunds and ledger corrections can go negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from kuruş.
    ///
    /// ## Example
    /// ```rust
    /// use dukkan_core::money::Money;
    ///
    /// let price = Money::from_kurus(1099); // ₺10,99
    /// assert_eq!(price.kurus(), 1099);
    /// ```
    #[inline]
    pub const fn from_kurus(kurus: i64) -> Self {
        Money(kurus)
    }

    /// Returns the value in kuruş.
    #[inline]
    pub const fn kurus(&self) -> i64 {
        self.0
    }

    /// Returns the lira (major unit) portion.
    #[inline]
    pub const fn lira(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the kuruş (minor unit) portion, always 0-99.
    #[inline]
    pub const fn kurus_part(&self) -> i64 {
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

    /// Returns the smaller of two amounts.
    ///
    /// ## Usage
    /// Payment allocation applies `min(remaining payment, remaining debt)`
    /// to each open debt.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    /// Subtraction floored at zero.
    ///
    /// ## Usage
    /// Refunds reduce a debt amount but never push it below zero:
    /// `amount = max(0, amount - refund)`.
    ///
    /// ## Example
    /// ```rust
    /// use dukkan_core::money::Money;
    ///
    /// let debt = Money::from_kurus(1000);
    /// assert_eq!(debt.sub_floor_zero(Money::from_kurus(1200)).kurus(), 0);
    /// assert_eq!(debt.sub_floor_zero(Money::from_kurus(300)).kurus(), 700);
    /// ```
    #[inline]
    pub const fn sub_floor_zero(self, other: Self) -> Self {
        let diff = self.0 - other.0;
        if diff < 0 {
            Money(0)
        } else {
            Money(diff)
        }
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use dukkan_core::money::Money;
    ///
    /// let unit_price = Money::from_kurus(299); // ₺2,99
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.kurus(), 897); // ₺8,97
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and logs. Frontends format amounts themselves
/// to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₺{},{:02}", sign, self.lira().abs(), self.kurus_part())
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

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
