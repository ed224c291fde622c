//! # Error Types
//!
//! Domain-specific error types for searchable-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  searchable-core errors (this file)                                    │
//! │  ├── CoreError        - Strict parsing and domain failures             │
//! │  └── ValidationError  - Amount and form input failures                 │
//! │                                                                         │
//! │  CLI errors (apps/cli)                                                 │
//! │  └── CliError         - Config, file and JSON failures                 │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CliError → exit code              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Messages Are User-Facing
//! The `Display` text of [`ValidationError`] is exactly what checkout forms
//! show under an input ("Minimum donation is $1.00"), so variants carry the
//! values needed to render it.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Calculations themselves never fail (they degrade to zero totals); these
/// errors come from the strict entry points used by tooling.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Payment type string is not one we know how to price.
    #[error("Unknown payment type: {0}")]
    UnknownPaymentType(String),

    /// Amount kind string is not `general` or `donation`.
    #[error("Unknown amount kind: {0}")]
    UnknownAmountKind(String),

    /// Listing has no all-in-one component configuration.
    #[error("Invalid searchable configuration")]
    MissingComponents,

    /// Listing payload has no `searchable_id` to invoice against.
    #[error("Searchable item not loaded")]
    MissingSearchableId,

    /// Nothing was selected, so there is nothing to invoice.
    #[error("Please select at least one item")]
    NoSelections,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Input did not parse as a number at all.
    #[error("Please enter a valid number")]
    NotANumber,

    /// Amount is below the global payment minimum.
    #[error("Minimum amount is ${min:.2}")]
    BelowMinimum { min: f64 },

    /// Amount is above the global payment maximum.
    #[error("Maximum amount is ${max:.2}")]
    AboveMaximum { max: f64 },

    /// Donation is below the donation-specific minimum.
    #[error("Minimum donation is ${min:.2}")]
    DonationBelowMinimum { min: f64 },

    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Value must be a number greater than zero.
    #[error("{field} must be a positive number")]
    MustBePositive { field: String },

    /// Listing price below the configured floor.
    #[error("Price must be at least ${min:.2}")]
    PriceTooLow { min: f64 },

    /// A listing needs at least one file / item.
    #[error("Please add at least one {item_type}")]
    NoItems { item_type: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_error_messages() {
        assert_eq!(
            ValidationError::BelowMinimum { min: 0.01 }.to_string(),
            "Minimum amount is $0.01"
        );
        assert_eq!(
            ValidationError::AboveMaximum { max: 999_999.99 }.to_string(),
            "Maximum amount is $999999.99"
        );
        assert_eq!(
            ValidationError::DonationBelowMinimum { min: 1.0 }.to_string(),
            "Minimum donation is $1.00"
        );
    }

    #[test]
    fn test_form_error_messages() {
        let err = ValidationError::TooShort {
            field: "Field".to_string(),
            min: 3,
        };
        assert_eq!(err.to_string(), "Field must be at least 3 characters");

        let err = ValidationError::NoItems {
            item_type: "files".to_string(),
        };
        assert_eq!(err.to_string(), "Please add at least one files");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::NotANumber.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(
            core_err.to_string(),
            "Validation error: Please enter a valid number"
        );
    }
}
