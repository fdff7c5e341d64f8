//! # Money Module
//!
//! Provides the `Money` type: a fixed-point decimal with exactly two
//! fractional digits. It carries every amount in the system, including
//! munji quantities and the production fractions (wastage, quality).
//!
//! ## Why Integer Hundredths?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    10.15 * 3 = 30.449999999999996   ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Hundredths                                       │
//! │    1015 * 300 = 304500 (4 places) → round half-up → 3045 = 30.45        │
//! │                                                                         │
//! │  Every derivation rounds back to 2 places immediately, so a value is    │
//! │  never left at raw precision and rounding is idempotent.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mill_core::money::Money;
//!
//! let quantity: Money = "10".parse().unwrap();
//! let unit_price: Money = "50.00".parse().unwrap();
//!
//! let total = quantity.multiply(unit_price).unwrap();
//! assert_eq!(total.to_string(), "500.00");
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;
use thiserror::Error;

/// Number of hundredths in one whole unit.
const SCALE: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A decimal value with exactly two fractional digits, stored as hundredths.
///
/// ## Design Decisions
/// - **i64 (signed)**: ledger deltas can be negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serialized as a string** (`"500.00"`) so JSON clients never see floats
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct Money(i64);

impl Money {
    /// Largest amount any field or balance may hold: 12 digits, 2 of them
    /// decimal places (9 999 999 999.99).
    pub const MAX: Money = Money(999_999_999_999);

    /// Creates a value from hundredths (the smallest representable unit).
    ///
    /// ## Example
    /// ```rust
    /// use mill_core::money::Money;
    ///
    /// let price = Money::from_hundredths(1099); // 10.99
    /// assert_eq!(price.hundredths(), 1099);
    /// ```
    #[inline]
    pub const fn from_hundredths(hundredths: i64) -> Self {
        Money(hundredths)
    }

    /// Creates a value from a whole number of units.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * SCALE)
    }

    /// Creates a value from major and minor units.
    ///
    /// For negative amounts only the major unit should be negative:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * SCALE - minor)
        } else {
            Money(major * SCALE + minor)
        }
    }

    /// Returns the raw value in hundredths.
    #[inline]
    pub const fn hundredths(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / SCALE
    }

    /// Returns the fractional portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % SCALE).abs()
    }

    /// Returns zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// One whole unit (1.00).
    #[inline]
    pub const fn one() -> Self {
        Money(SCALE)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies two 2-place values and rounds the 4-place product back to
    /// 2 places, half away from zero. Returns `None` when the result does
    /// not fit.
    ///
    /// ## Example
    /// ```rust
    /// use mill_core::money::Money;
    ///
    /// let quantity = Money::from_hundredths(333);   // 3.33
    /// let price = Money::from_hundredths(1015);     // 10.15
    ///
    /// // 3.33 × 10.15 = 33.7995 → 33.80
    /// assert_eq!(quantity.multiply(price).unwrap().hundredths(), 3380);
    ///
    /// assert!(Money::from_hundredths(i64::MAX).multiply(price).is_none());
    /// ```
    ///
    /// ## Where It Is Used
    /// ```text
    /// Purchase:   quantity × unit_price          → total_price
    /// Production: quantity_produced × quality    → total_quality
    ///             total_quality × unit_price     → total_price
    /// ```
    pub fn multiply(&self, factor: Money) -> Option<Money> {
        // i128 keeps the 4-place intermediate exact
        let product = self.0 as i128 * factor.0 as i128;
        let scale = SCALE as i128;
        let mut quotient = product / scale;
        let remainder = product % scale;

        if remainder.abs() * 2 >= scale {
            quotient += product.signum();
        }

        i64::try_from(quotient).ok().map(Money)
    }

    /// Adds two values, returning `None` on overflow.
    #[inline]
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Subtracts two values, returning `None` on overflow.
    #[inline]
    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Error returned when a decimal string cannot be read as `Money`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid decimal '{input}': {reason}")]
pub struct ParseMoneyError {
    pub input: String,
    pub reason: &'static str,
}

impl ParseMoneyError {
    fn new(input: &str, reason: &'static str) -> Self {
        ParseMoneyError {
            input: input.to_string(),
            reason,
        }
    }
}

/// Parses a plain decimal (`"12"`, `"-3.5"`, `"1.005"`), rounding any digits
/// beyond the second fractional place half away from zero.
///
/// ## Example
/// ```rust
/// use mill_core::money::Money;
///
/// assert_eq!("1.005".parse::<Money>().unwrap().hundredths(), 101);
/// assert_eq!("1.004".parse::<Money>().unwrap().hundredths(), 100);
/// assert_eq!("-2.345".parse::<Money>().unwrap().hundredths(), -235);
/// ```
impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let (negative, unsigned) = match input.as_bytes().first() {
            Some(b'-') => (true, &input[1..]),
            Some(b'+') => (false, &input[1..]),
            Some(_) => (false, input),
            None => return Err(ParseMoneyError::new(s, "empty value")),
        };

        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (unsigned, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(ParseMoneyError::new(s, "no digits"));
        }
        if !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(ParseMoneyError::new(s, "expected digits with an optional decimal point"));
        }

        let whole_value: i64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| ParseMoneyError::new(s, "value out of range"))?
        };

        let digits: Vec<i64> = fraction.bytes().map(|b| i64::from(b - b'0')).collect();
        let tenths = digits.first().copied().unwrap_or(0);
        let hundredths = digits.get(1).copied().unwrap_or(0);
        let round_up = digits.get(2).is_some_and(|d| *d >= 5);

        let magnitude = whole_value
            .checked_mul(SCALE)
            .and_then(|v| v.checked_add(tenths * 10 + hundredths + i64::from(round_up)))
            .ok_or_else(|| ParseMoneyError::new(s, "value out of range"))?;

        Ok(Money(if negative { -magnitude } else { magnitude }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering, always with two fractional digits.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Accepts `"12.50"`, `12.5` or `12`; anything finer than hundredths is
/// rounded half-up on the way in.
impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a decimal number or decimal string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(SCALE)
            .map(Money)
            .ok_or_else(|| E::custom("value out of range"))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        i64::try_from(v)
            .map_err(|_| E::custom("value out of range"))
            .and_then(|v| self.visit_i64(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        if !v.is_finite() {
            return Err(E::custom("value must be finite"));
        }
        // Shortest round-trip rendering, then exact decimal rounding
        self.visit_str(&v.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn m(s: &str) -> Money {
        s.parse().unwrap()
    }

    #[test]
    fn test_parts() {
        let money = Money::from_hundredths(1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
        assert_eq!(Money::from_major_minor(-5, 50).hundredths(), -550);
        assert_eq!(Money::from_major(7).hundredths(), 700);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_hundredths(1099).to_string(), "10.99");
        assert_eq!(Money::from_hundredths(500).to_string(), "5.00");
        assert_eq!(Money::from_hundredths(-550).to_string(), "-5.50");
        assert_eq!(Money::from_hundredths(-5).to_string(), "-0.05");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_parse_rounds_half_up() {
        assert_eq!(m("1.005").hundredths(), 101);
        assert_eq!(m("1.0049999").hundredths(), 100);
        assert_eq!(m("2.675").hundredths(), 268);
        assert_eq!(m("-2.675").hundredths(), -268);
        assert_eq!(m("0.5").hundredths(), 50);
        assert_eq!(m(".25").hundredths(), 25);
        assert_eq!(m("12").hundredths(), 1200);
        assert_eq!(m(" +3.10 ").hundredths(), 310);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Money>().is_err());
        assert!("-".parse::<Money>().is_err());
        assert!(".".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
        assert!("12a".parse::<Money>().is_err());
        assert!("99999999999999999999".parse::<Money>().is_err());
    }

    #[test]
    fn test_multiply_rounds_half_up() {
        let product = |a: &str, b: &str| m(a).multiply(m(b)).unwrap();
        // 10 × 50.00 = 500.00
        assert_eq!(product("10", "50.00"), m("500.00"));
        // 0.05 × 0.10 = 0.005 → 0.01
        assert_eq!(product("0.05", "0.10").hundredths(), 1);
        // 0.04 × 0.10 = 0.004 → 0.00
        assert_eq!(product("0.04", "0.10").hundredths(), 0);
        // -0.05 × 0.10 = -0.005 → -0.01
        assert_eq!(product("-0.05", "0.10").hundredths(), -1);
    }

    #[test]
    fn test_multiply_overflow_is_none() {
        assert_eq!(m("92233720368547758").multiply(m("100")), None);
        assert_eq!(Money::from_hundredths(i64::MIN).multiply(m("2")), None);
        assert_eq!(Money::MAX.multiply(Money::MAX), None);
        assert_eq!(Money::MAX.multiply(Money::one()), Some(Money::MAX));
    }

    #[test]
    fn test_rounding_is_idempotent() {
        let once = m("123.456");
        let twice: Money = once.to_string().parse().unwrap();
        assert_eq!(once, twice);

        let product = m("3.33").multiply(m("10.15")).unwrap();
        assert_eq!(product.multiply(Money::one()), Some(product));
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = m("10.00");
        let b = m("5.00");
        assert_eq!(a.checked_add(b), Some(m("15.00")));
        assert_eq!(a.checked_sub(b), Some(m("5.00")));
        assert_eq!(-a, m("-10.00"));
        assert_eq!(Money::from_hundredths(i64::MAX).checked_add(Money::one()), None);
        assert_eq!(Money::from_hundredths(i64::MIN).checked_sub(Money::one()), None);
        assert_eq!(Money::MAX.to_string(), "9999999999.99");
    }

    #[test]
    fn test_serde_string_and_number() {
        let json = serde_json::to_string(&m("500")).unwrap();
        assert_eq!(json, "\"500.00\"");

        let from_str: Money = serde_json::from_str("\"12.345\"").unwrap();
        assert_eq!(from_str, m("12.35"));

        let from_float: Money = serde_json::from_str("0.1").unwrap();
        assert_eq!(from_float, m("0.10"));

        let from_int: Money = serde_json::from_str("42").unwrap();
        assert_eq!(from_int, m("42.00"));

        assert!(serde_json::from_str::<Money>("\"abc\"").is_err());
    }
}
