//! # Validation Module
//!
//! Input validation for checkout amounts and listing forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Checkout / listing forms                                     │
//! │  └── THIS MODULE: messages rendered directly under the input           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Backend                                                      │
//! │  └── Authoritative checks on invoice creation                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validators never panic and never return `Err` to the UI: amount checks
//! produce an [`AmountValidation`] record, form rules produce an optional
//! message. The typed [`ValidationError`] is available for callers that
//! prefer `?`.
//!
//! ## Usage
//! ```rust
//! use searchable_core::validation::{validate_payment_amount, AmountKind};
//!
//! let result = validate_payment_amount(0.5, AmountKind::Donation);
//! assert!(!result.is_valid);
//! assert_eq!(result.error.as_deref(), Some("Minimum donation is $1.00"));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, ValidationError};
use crate::money::{parse_float, RawAmount};
use crate::{MAX_PAYMENT_AMOUNT, MIN_DONATION_AMOUNT, MIN_PAYMENT_AMOUNT};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Default floor for listing prices.
pub const DEFAULT_MIN_PRICE: f64 = 0.01;

// =============================================================================
// Payment Amounts
// =============================================================================

/// What an amount is for. Donations have their own minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum AmountKind {
    #[default]
    General,
    Donation,
}

impl FromStr for AmountKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "general" => Ok(AmountKind::General),
            "donation" => Ok(AmountKind::Donation),
            other => Err(CoreError::UnknownAmountKind(other.to_string())),
        }
    }
}

impl fmt::Display for AmountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountKind::General => f.write_str("general"),
            AmountKind::Donation => f.write_str("donation"),
        }
    }
}

/// Outcome of an amount check, shaped for form rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AmountValidation {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl AmountValidation {
    pub fn valid() -> Self {
        AmountValidation {
            is_valid: true,
            error: None,
        }
    }
}

impl<T> From<ValidationResult<T>> for AmountValidation {
    fn from(result: ValidationResult<T>) -> Self {
        match result {
            Ok(_) => AmountValidation::valid(),
            Err(err) => AmountValidation {
                is_valid: false,
                error: Some(err.to_string()),
            },
        }
    }
}

/// Checks an amount against the payment limits, returning the parsed value.
///
/// ## Rules (in order)
/// 1. Must parse as a number
/// 2. Must be at least $0.01
/// 3. Must be at most $999,999.99
/// 4. Donations must be at least $1.00
///
/// Limits compare against the unrounded input, so `0.006` is rejected even
/// though it would round to one cent.
pub fn check_payment_amount(amount: impl Into<RawAmount>, kind: AmountKind) -> ValidationResult<f64> {
    let value = amount
        .into()
        .to_f64()
        .ok_or(ValidationError::NotANumber)?;

    if value < MIN_PAYMENT_AMOUNT {
        return Err(ValidationError::BelowMinimum { min: MIN_PAYMENT_AMOUNT });
    }

    if value > MAX_PAYMENT_AMOUNT {
        return Err(ValidationError::AboveMaximum { max: MAX_PAYMENT_AMOUNT });
    }

    if kind == AmountKind::Donation && value < MIN_DONATION_AMOUNT {
        return Err(ValidationError::DonationBelowMinimum { min: MIN_DONATION_AMOUNT });
    }

    Ok(value)
}

/// Validates a payment or donation amount for display.
///
/// ## Example
/// ```rust
/// use searchable_core::validation::{validate_payment_amount, AmountKind};
///
/// assert!(validate_payment_amount(10.0, AmountKind::General).is_valid);
/// assert_eq!(
///     validate_payment_amount("abc", AmountKind::General).error.as_deref(),
///     Some("Please enter a valid number")
/// );
/// ```
pub fn validate_payment_amount(amount: impl Into<RawAmount>, kind: AmountKind) -> AmountValidation {
    check_payment_amount(amount, kind).into()
}

// =============================================================================
// Listing Form Rules
// =============================================================================
// Each rule returns the message to show, or None when the value passes.

fn message(result: ValidationResult<()>) -> Option<String> {
    result.err().map(|e| e.to_string())
}

/// Value must be present and not blank.
pub fn required(value: Option<&str>, field: &str) -> Option<String> {
    message(check_required(value, field))
}

pub fn check_required(value: Option<&str>, field: &str) -> ValidationResult<()> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(ValidationError::Required {
            field: field.to_string(),
        }),
    }
}

/// Value, when non-empty, must have at least `min` characters.
///
/// Empty values pass; pair with [`required`] when the field is mandatory.
pub fn min_length(value: Option<&str>, min: usize, field: &str) -> Option<String> {
    match value {
        Some(v) if !v.is_empty() && v.chars().count() < min => {
            message(Err(ValidationError::TooShort {
                field: field.to_string(),
                min,
            }))
        }
        _ => None,
    }
}

/// Value must parse as a number greater than zero.
pub fn positive_number(value: &str, field: &str) -> Option<String> {
    match parse_float(value) {
        Some(n) if n > 0.0 => None,
        _ => message(Err(ValidationError::MustBePositive {
            field: field.to_string(),
        })),
    }
}

/// Value must parse as a price of at least `min`.
///
/// ## Example
/// ```rust
/// use searchable_core::validation::{min_price, DEFAULT_MIN_PRICE};
///
/// assert_eq!(min_price("1.00", DEFAULT_MIN_PRICE), None);
/// assert_eq!(min_price("5.00", 10.0).as_deref(), Some("Price must be at least $10.00"));
/// ```
pub fn min_price(value: &str, min: f64) -> Option<String> {
    match parse_float(value) {
        Some(n) if n >= min => None,
        _ => message(Err(ValidationError::PriceTooLow { min })),
    }
}

/// A listing must contain at least one file / item.
pub fn validate_items_array<T>(items: Option<&[T]>, item_type: &str) -> Option<String> {
    match items {
        Some(items) if !items.is_empty() => None,
        _ => message(Err(ValidationError::NoItems {
            item_type: item_type.to_string(),
        })),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_general_amount() {
        let result = validate_payment_amount(10.0, AmountKind::General);
        assert!(result.is_valid);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_non_numeric_amount() {
        let result = validate_payment_amount("abc", AmountKind::General);
        assert!(!result.is_valid);
        assert_eq!(result.error.as_deref(), Some("Please enter a valid number"));
    }

    #[test]
    fn test_amount_limits() {
        let result = validate_payment_amount(0.001, AmountKind::General);
        assert_eq!(result.error.as_deref(), Some("Minimum amount is $0.01"));

        let result = validate_payment_amount(0.006, AmountKind::General);
        assert!(!result.is_valid);

        let result = validate_payment_amount(1_000_000.0, AmountKind::General);
        assert_eq!(result.error.as_deref(), Some("Maximum amount is $999999.99"));

        assert!(validate_payment_amount(0.01, AmountKind::General).is_valid);
        assert!(validate_payment_amount(999_999.99, AmountKind::General).is_valid);
    }

    #[test]
    fn test_donation_minimum() {
        let result = validate_payment_amount(0.5, AmountKind::Donation);
        assert!(!result.is_valid);
        assert_eq!(result.error.as_deref(), Some("Minimum donation is $1.00"));

        let result = validate_payment_amount(5.0, AmountKind::Donation);
        assert!(result.is_valid);
        assert!(validate_payment_amount(1.0, AmountKind::Donation).is_valid);
    }

    #[test]
    fn test_string_amounts_parse_leniently() {
        assert!(validate_payment_amount("25.00", AmountKind::Donation).is_valid);
        assert!(validate_payment_amount(" 3 dollars", AmountKind::General).is_valid);
    }

    #[test]
    fn test_check_payment_amount_with_question_mark() {
        fn charge(input: &str) -> Result<f64, CoreError> {
            Ok(check_payment_amount(input, AmountKind::General)?)
        }
        assert_eq!(charge("12.5").unwrap(), 12.5);
        assert!(matches!(
            charge("x"),
            Err(CoreError::Validation(ValidationError::NotANumber))
        ));
    }

    #[test]
    fn test_amount_kind_parsing() {
        assert_eq!("Donation".parse::<AmountKind>().unwrap(), AmountKind::Donation);
        assert!("tip".parse::<AmountKind>().is_err());
    }

    #[test]
    fn test_required() {
        assert_eq!(required(Some("test"), "Field"), None);
        assert_eq!(required(Some(""), "Field").as_deref(), Some("Field is required"));
        assert_eq!(required(None, "Field").as_deref(), Some("Field is required"));
        assert_eq!(required(Some("  "), "Field").as_deref(), Some("Field is required"));
    }

    #[test]
    fn test_min_length() {
        assert_eq!(min_length(Some("test"), 3, "Field"), None);
        assert_eq!(
            min_length(Some("te"), 3, "Field").as_deref(),
            Some("Field must be at least 3 characters")
        );
        assert_eq!(min_length(Some(""), 1, "Field"), None);
        assert_eq!(
            min_length(Some("a"), 2, "Field").as_deref(),
            Some("Field must be at least 2 characters")
        );
    }

    #[test]
    fn test_positive_number() {
        assert_eq!(positive_number("10", "Price"), None);
        assert_eq!(positive_number("0.01", "Price"), None);
        for bad in ["0", "-5", "abc"] {
            assert_eq!(
                positive_number(bad, "Price").as_deref(),
                Some("Price must be a positive number")
            );
        }
    }

    #[test]
    fn test_min_price() {
        assert_eq!(min_price("1.00", DEFAULT_MIN_PRICE), None);
        assert_eq!(min_price("0.01", DEFAULT_MIN_PRICE), None);
        assert_eq!(
            min_price("0.001", DEFAULT_MIN_PRICE).as_deref(),
            Some("Price must be at least $0.01")
        );
        assert_eq!(
            min_price("5.00", 10.0).as_deref(),
            Some("Price must be at least $10.00")
        );
    }

    #[test]
    fn test_validate_items_array() {
        assert_eq!(validate_items_array(Some(&[1, 2, 3][..]), "items"), None);
        assert_eq!(
            validate_items_array::<i32>(Some(&[]), "items").as_deref(),
            Some("Please add at least one items")
        );
        assert_eq!(
            validate_items_array::<i32>(None, "items").as_deref(),
            Some("Please add at least one items")
        );
        assert_eq!(
            validate_items_array::<String>(Some(&[]), "files").as_deref(),
            Some("Please add at least one files")
        );
    }
}
