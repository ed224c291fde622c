//! # Money Module
//!
//! Provides the `Money` type and the lenient number reading used for
//! listing payloads.
//!
//! ## Where Rounding Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Listing JSON (prices as 10.99 or "10.99")                             │
//! │        │                                                                │
//! │        ▼  RawAmount::to_f64 / parse_float                              │
//! │  f64 working values (sums, fee percentages)                            │
//! │        │                                                                │
//! │        ▼  Money::from_decimal  ← rounds to cents, ONCE per result      │
//! │  Money (i64 cents) returned to callers                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prices arrive from the backend as JSON numbers or numeric strings, so the
//! working arithmetic is done on `f64` and every calculation function rounds
//! its result to whole cents at the boundary. Repeated additions therefore
//! never accumulate floating point drift across calls.
//!
//! ## Usage
//! ```rust
//! use searchable_core::money::Money;
//!
//! let price = Money::from_cents(1099); // $10.99
//! let total = price + Money::from_decimal(5.5);
//! assert_eq!(total.cents(), 1649);
//! assert_eq!(total.to_string(), "$16.49");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: negative values show up as shortfalls and refunds
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Saturating arithmetic**: a non-finite listing price becomes
///   `i64::MAX` cents, so sums clamp at the bounds instead of overflowing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Rounds a decimal amount to the nearest cent.
    ///
    /// Halves round toward positive infinity, the same as
    /// `Math.round(x * 100) / 100` in the checkout frontend, so both sides
    /// agree on every displayed total. NaN becomes zero and infinities
    /// saturate.
    ///
    /// ## Example
    /// ```rust
    /// use searchable_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(10.99).cents(), 1099);
    /// assert_eq!(Money::from_decimal(0.125).cents(), 13);
    /// assert_eq!(Money::from_decimal(-0.125).cents(), -12);
    /// assert_eq!(Money::from_decimal(f64::NAN).cents(), 0);
    /// ```
    pub fn from_decimal(amount: f64) -> Self {
        Money((amount * 100.0 + 0.5).floor() as i64)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the value as a decimal number of dollars (for JSON payloads).
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly `$10.99` rendering. Use [`crate::format`] for display text
/// with thousands separators or other currencies.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
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
        Money(self.0.saturating_add(other.0))
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Decimal (de)serialization
// =============================================================================

/// Serializes [`Money`] as a decimal JSON number (`45.99`) instead of cents.
///
/// Used on wire types the frontend reads directly (fee breakdowns, receipt
/// lines, `total_price` in invoice requests).
///
/// ```rust,ignore
/// #[serde(with = "crate::money::decimal")]
/// pub total_price: Money,
/// ```
pub mod decimal {
    use super::Money;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(money: &Money, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(money.to_decimal())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Money, D::Error>
    where
        D: Deserializer<'de>,
    {
        let amount = f64::deserialize(deserializer)?;
        Ok(Money::from_decimal(amount))
    }
}

// =============================================================================
// Raw Amounts
// =============================================================================

/// A price or amount exactly as it appears in a listing payload.
///
/// Sellers' listing editors store prices either as JSON numbers or as the
/// string typed into a form field, so both are accepted and read leniently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
}

impl RawAmount {
    /// Reads the amount as a number; `None` when it does not parse.
    ///
    /// ## Example
    /// ```rust
    /// use searchable_core::money::RawAmount;
    ///
    /// assert_eq!(RawAmount::from("12.50 USD").to_f64(), Some(12.5));
    /// assert_eq!(RawAmount::from(3.0).to_f64(), Some(3.0));
    /// assert_eq!(RawAmount::from("abc").to_f64(), None);
    /// ```
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            RawAmount::Number(n) if n.is_nan() => None,
            RawAmount::Number(n) => Some(*n),
            RawAmount::Text(s) => parse_float(s),
        }
    }

    /// Reads the amount, treating anything unparseable as zero.
    pub fn value_or_zero(&self) -> f64 {
        self.to_f64().unwrap_or(0.0)
    }

    /// Whether a UI would treat this value as "set".
    ///
    /// Zero and NaN numbers and empty strings are unset; any other string
    /// counts as set even when it is not numeric.
    pub fn is_set(&self) -> bool {
        match self {
            RawAmount::Number(n) => *n != 0.0 && !n.is_nan(),
            RawAmount::Text(s) => !s.is_empty(),
        }
    }
}

impl From<f64> for RawAmount {
    fn from(n: f64) -> Self {
        RawAmount::Number(n)
    }
}

impl From<&str> for RawAmount {
    fn from(s: &str) -> Self {
        RawAmount::Text(s.to_string())
    }
}

impl From<String> for RawAmount {
    fn from(s: String) -> Self {
        RawAmount::Text(s)
    }
}

/// Reads an optional raw amount, defaulting missing or unparseable values to 0.
pub fn amount_or_zero(amount: Option<&RawAmount>) -> f64 {
    amount.map(RawAmount::value_or_zero).unwrap_or(0.0)
}

// =============================================================================
// Lenient Parsing
// =============================================================================

/// Parses the longest leading decimal number in `input`.
///
/// Accepts leading whitespace, an optional sign, digits with an optional
/// fraction and exponent, or `Infinity`. Trailing garbage is ignored
/// (`"12.5kg"` → 12.5). Returns `None` when no digits are found.
///
/// ## Example
/// ```rust
/// use searchable_core::money::parse_float;
///
/// assert_eq!(parse_float("  10.99"), Some(10.99));
/// assert_eq!(parse_float(".5"), Some(0.5));
/// assert_eq!(parse_float("1e3x"), Some(1000.0));
/// assert_eq!(parse_float("-"), None);
/// ```
pub fn parse_float(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    if s[end..].starts_with("Infinity") {
        let negative = bytes.first() == Some(&b'-');
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Parses `input` leniently, returning `fallback` when it does not parse.
pub fn safe_parse_float(input: &str, fallback: f64) -> f64 {
    parse_float(input).unwrap_or(fallback)
}

// =============================================================================
// Unit Tests
// =============================================================================
