//! # Payment Fees
//!
//! Fee breakdowns for the two ways a buyer can pay.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Card (processor)                     Balance (internal wallet)        │
//! │  ────────────────                     ─────────────────────────        │
//! │  base            100.00               base            100.00           │
//! │  platform fee      0.10  (0.1%)       platform fee      0.00           │
//! │  processing fee    3.50  (3.5%)       processing fee    0.00           │
//! │  buyer pays      103.50               buyer pays      100.00           │
//! │  seller gets      99.90               seller gets     100.00           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each field is rounded to cents on its own, from the unrounded
//! intermediate values. `total_amount` can therefore differ by a cent from
//! `base_amount + processing_fee` rebuilt from the rounded fields; receipts
//! and the backend both expect these literal values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::Money;
use crate::{PLATFORM_FEE_RATE, STRIPE_FEE_RATE};

// =============================================================================
// Payment Type
// =============================================================================

/// How the buyer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    /// Card payment through the processor.
    #[default]
    Stripe,
    /// Internal wallet balance, no processor involved.
    Balance,
}

impl PaymentType {
    /// Lenient mapping used by checkout screens: only `"balance"` skips
    /// the processor, every other name is priced as a card payment.
    pub fn from_name(name: &str) -> Self {
        if name == "balance" {
            PaymentType::Balance
        } else {
            PaymentType::Stripe
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Stripe => "stripe",
            PaymentType::Balance => "balance",
        }
    }
}

impl FromStr for PaymentType {
    type Err = CoreError;

    /// Strict parsing for tooling and configuration.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stripe" | "card" => Ok(PaymentType::Stripe),
            "balance" => Ok(PaymentType::Balance),
            other => Err(CoreError::UnknownPaymentType(other.to_string())),
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Fee Breakdown
// =============================================================================

/// Derived fee breakdown for one payment. Recomputed on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FeeBreakdown {
    #[serde(with = "crate::money::decimal")]
    #[ts(type = "number")]
    pub base_amount: Money,

    #[serde(with = "crate::money::decimal")]
    #[ts(type = "number")]
    pub platform_fee: Money,

    #[serde(with = "crate::money::decimal")]
    #[ts(type = "number")]
    pub processing_fee: Money,

    /// What the buyer is charged.
    #[serde(with = "crate::money::decimal")]
    #[ts(type = "number")]
    pub total_amount: Money,

    /// What the seller is credited.
    #[serde(with = "crate::money::decimal")]
    #[ts(type = "number")]
    pub seller_receives: Money,
}

/// Calculates the fee breakdown for `amount` paid via `payment_type`.
///
/// Non-finite amounts are treated as zero.
///
/// ## Example
/// ```rust
/// use searchable_core::fees::{calculate_payment_fees, PaymentType};
///
/// let fees = calculate_payment_fees(100.0, PaymentType::Stripe);
/// assert_eq!(fees.platform_fee.cents(), 10);
/// assert_eq!(fees.processing_fee.cents(), 350);
/// assert_eq!(fees.total_amount.cents(), 10350);
/// assert_eq!(fees.seller_receives.cents(), 9990);
/// ```
pub fn calculate_payment_fees(amount: f64, payment_type: PaymentType) -> FeeBreakdown {
    let base = if amount.is_finite() { amount } else { 0.0 };

    match payment_type {
        PaymentType::Balance => {
            let base_amount = Money::from_decimal(base);
            FeeBreakdown {
                base_amount,
                platform_fee: Money::zero(),
                processing_fee: Money::zero(),
                total_amount: base_amount,
                seller_receives: base_amount,
            }
        }
        PaymentType::Stripe => {
            let platform_fee = base * PLATFORM_FEE_RATE;
            let processing_fee = base * STRIPE_FEE_RATE;
            let total_amount = base + processing_fee;
            let seller_receives = base - platform_fee;

            FeeBreakdown {
                base_amount: Money::from_decimal(base),
                platform_fee: Money::from_decimal(platform_fee),
                processing_fee: Money::from_decimal(processing_fee),
                total_amount: Money::from_decimal(total_amount),
                seller_receives: Money::from_decimal(seller_receives),
            }
        }
    }
}

// =============================================================================
// Balance Payments
// =============================================================================

/// Whether a wallet balance covers `total`.
pub fn can_pay_with_balance(balance: Money, total: Money) -> bool {
    balance >= total
}

/// How much is missing from the wallet to cover `total` (zero if covered).
///
/// ## Example
/// ```rust
/// use searchable_core::fees::balance_shortfall;
/// use searchable_core::Money;
///
/// let missing = balance_shortfall(Money::from_cents(3000), Money::from_cents(4599));
/// assert_eq!(missing.cents(), 1599);
/// ```
pub fn balance_shortfall(balance: Money, total: Money) -> Money {
    if can_pay_with_balance(balance, total) {
        Money::zero()
    } else {
        total - balance
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
