//! # searchable-core: Pricing Logic for the Searchable Marketplace
//!
//! Everything the checkout and listing pages compute before talking to the
//! backend: totals, fees, amount checks, selection payloads and receipt
//! lines. Pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Searchable Marketplace                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                       Frontend pages                            │   │
//! │  │   Listing ──► Selection ──► Checkout ──► Receipt                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ ts-rs bindings / searchable CLI        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ searchable-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌───────────┐           │   │
//! │  │   │  money  │ │  fees   │ │  totals  │ │ selection │           │   │
//! │  │   │  Money  │ │ FeeBrk  │ │ allinone │ │  build /  │           │   │
//! │  │   │ parse   │ │ balance │ │  simple  │ │  format   │           │   │
//! │  │   └─────────┘ └─────────┘ └──────────┘ └───────────┘           │   │
//! │  │   ┌───────────┐ ┌─────────┐ ┌─────────┐                        │   │
//! │  │   │validation │ │ format  │ │ invoice │                        │   │
//! │  │   └───────────┘ └─────────┘ └─────────┘                        │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON request bodies                    │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    Backend (invoices, payments)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Listing payloads, selection state, selections, receipt lines
//! - [`money`] - Integer-cent `Money` and lenient number parsing
//! - [`fees`] - Card / balance fee breakdowns
//! - [`totals`] - Totals for all-in-one and plain listings
//! - [`selection`] - Selection builder and receipt formatter
//! - [`validation`] - Amount limits and listing form rules
//! - [`format`] - Price and file size display strings
//! - [`invoice`] - Invoice, balance payment and listing request bodies
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same listing + same selection = same total
//! 2. **No I/O**: no network, no storage, no clock
//! 3. **Cents Once Rounded**: results are integer cents; inputs arrive as
//!    decimals and are rounded at the end of each calculation
//! 4. **Degrade, Don't Fail**: bad listing data adds nothing to a total
//!
//! ## Example Usage
//!
//! ```rust
//! use searchable_core::fees::{calculate_payment_fees, PaymentType};
//! use searchable_core::format::format_usd;
//!
//! let fees = calculate_payment_fees(45.99, PaymentType::Stripe);
//! assert_eq!(format_usd(fees.total_amount.to_decimal()), "$47.60");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod fees;
pub mod format;
pub mod invoice;
pub mod money;
pub mod selection;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use fees::{calculate_payment_fees, FeeBreakdown, PaymentType};
pub use money::Money;
pub use selection::{build_all_in_one_selections, format_selections_for_balance_payment};
pub use totals::{calculate_all_in_one_total, calculate_simple_searchable_total};
pub use types::*;
pub use validation::{validate_payment_amount, AmountKind, AmountValidation};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Card processing fee rate (3.5%), added on top of the base for the buyer.
pub const STRIPE_FEE_RATE: f64 = 0.035;

/// Platform fee rate (0.1%), withheld from the seller.
pub const PLATFORM_FEE_RATE: f64 = 0.001;

/// Smallest payment accepted.
pub const MIN_PAYMENT_AMOUNT: f64 = 0.01;

/// Largest payment accepted.
pub const MAX_PAYMENT_AMOUNT: f64 = 999_999.99;

/// Smallest donation accepted.
pub const MIN_DONATION_AMOUNT: f64 = 1.00;

/// Amount preselected in donation inputs.
pub const DEFAULT_DONATION_AMOUNT: f64 = 10.00;

/// Most receipt lines a single offline selection expands into.
pub const MAX_RECEIPT_UNITS: i64 = 999;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_are_ordered() {
        assert!(MIN_PAYMENT_AMOUNT < MIN_DONATION_AMOUNT);
        assert!(MIN_DONATION_AMOUNT <= DEFAULT_DONATION_AMOUNT);
        assert!(DEFAULT_DONATION_AMOUNT < MAX_PAYMENT_AMOUNT);
    }

    #[test]
    fn test_default_donation_is_valid() {
        assert!(validate_payment_amount(DEFAULT_DONATION_AMOUNT, AmountKind::Donation).is_valid);
    }
}
