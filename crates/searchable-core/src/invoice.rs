//! # Request Payloads
//!
//! Request bodies the checkout and publish screens send to the backend.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Checkout                                                               │
//! │  ├── card     → InvoiceRequest         (Selection[], redirect urls)     │
//! │  └── balance  → BalancePaymentRequest  (FormattedSelection[])           │
//! │                                                                         │
//! │  Publish                                                                │
//! │  └── create_searchable_payload → { payloads: { public: { ... } } }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Builders only shape data. Sending it is the caller's job.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::fees::PaymentType;
use crate::money::Money;
use crate::selection::{build_all_in_one_selections, format_selections_for_balance_payment};
use crate::totals::calculate_all_in_one_total;
use crate::types::{FormattedSelection, SearchableType, Searchable, Selection, SelectionState};

/// Currency of card invoices, and of new listings that do not name one.
pub const DEFAULT_CURRENCY: &str = "usd";

// =============================================================================
// Buyer
// =============================================================================

/// Optional delivery contact attached to an invoice for offline goods.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Buyer {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub tel: String,
}

// =============================================================================
// Card Invoice
// =============================================================================

/// Body of a card checkout invoice request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceRequest {
    #[ts(type = "number")]
    pub searchable_id: i64,
    pub invoice_type: PaymentType,
    pub currency: String,
    pub selections: Vec<Selection>,

    #[serde(with = "crate::money::decimal")]
    #[ts(type = "number")]
    pub total_price: Money,

    pub success_url: String,
    pub cancel_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tel: Option<String>,
}

impl InvoiceRequest {
    /// A card invoice that returns the buyer to `return_url` either way.
    pub fn new(searchable_id: i64, selections: Vec<Selection>, total_price: Money, return_url: &str) -> Self {
        InvoiceRequest {
            searchable_id,
            invoice_type: PaymentType::Stripe,
            currency: DEFAULT_CURRENCY.to_string(),
            selections,
            total_price,
            success_url: return_url.to_string(),
            cancel_url: return_url.to_string(),
            address: None,
            tel: None,
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into().to_lowercase();
        self
    }

    pub fn with_buyer(mut self, buyer: Buyer) -> Self {
        self.address = Some(buyer.address);
        self.tel = Some(buyer.tel);
        self
    }
}

// =============================================================================
// Balance Payment
// =============================================================================

/// Body of a wallet balance payment. Lines are itemized for the receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BalancePaymentRequest {
    #[ts(type = "number")]
    pub searchable_id: i64,
    pub invoice_type: PaymentType,
    pub selections: Vec<FormattedSelection>,

    #[serde(with = "crate::money::decimal")]
    #[ts(type = "number")]
    pub total_price: Money,
}

// =============================================================================
// All-in-one Checkout
// =============================================================================

fn all_in_one_selections(searchable: &Searchable, state: &SelectionState) -> CoreResult<(i64, Vec<Selection>)> {
    let searchable_id = searchable.searchable_id.ok_or(CoreError::MissingSearchableId)?;
    let components = searchable
        .public()
        .components
        .as_ref()
        .ok_or(CoreError::MissingComponents)?;

    let selections = build_all_in_one_selections(components, state);
    if selections.is_empty() {
        return Err(CoreError::NoSelections);
    }
    Ok((searchable_id, selections))
}

/// Card invoice for an all-in-one listing.
///
/// The invoice is always in [`DEFAULT_CURRENCY`], whatever the listing's
/// display currency; use [`InvoiceRequest::with_currency`] to change it.
///
/// ## Errors
/// - [`CoreError::MissingSearchableId`] when the listing has no id
/// - [`CoreError::MissingComponents`] when it has no component configuration
/// - [`CoreError::NoSelections`] when nothing billable is selected
pub fn stripe_invoice_for_all_in_one(
    searchable: &Searchable,
    state: &SelectionState,
    return_url: &str,
) -> CoreResult<InvoiceRequest> {
    let (searchable_id, selections) = all_in_one_selections(searchable, state)?;
    let total = calculate_all_in_one_total(Some(searchable), state);
    debug!(searchable_id, lines = selections.len(), total = %total, "built card invoice");

    Ok(InvoiceRequest::new(searchable_id, selections, total, return_url))
}

/// Balance payment for an all-in-one listing, with receipt lines expanded.
///
/// Fails the same way as [`stripe_invoice_for_all_in_one`].
pub fn balance_payment_for_all_in_one(searchable: &Searchable, state: &SelectionState) -> CoreResult<BalancePaymentRequest> {
    let (searchable_id, selections) = all_in_one_selections(searchable, state)?;
    let total = calculate_all_in_one_total(Some(searchable), state);

    Ok(BalancePaymentRequest {
        searchable_id,
        invoice_type: PaymentType::Balance,
        selections: format_selections_for_balance_payment(searchable, &selections),
        total_price: total,
    })
}

// =============================================================================
// Listing Creation
// =============================================================================

/// Common fields of every listing editor form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ListingForm {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Builds the body of a create-listing request.
///
/// `extra` holds the type-specific fields (`downloadableFiles`,
/// `components`, ...) and is merged into the public payload last, so it may
/// override the common fields.
///
/// ## Example
/// ```rust
/// use searchable_core::invoice::{create_searchable_payload, ListingForm};
/// use searchable_core::types::SearchableType;
///
/// let form = ListingForm { title: "Zine".into(), description: "Issue 3".into(), currency: None };
/// let body = create_searchable_payload(&form, SearchableType::Direct, &[], Default::default());
///
/// assert_eq!(body["payloads"]["public"]["currency"], "usd");
/// assert_eq!(body["payloads"]["public"]["visibility"]["udf"], "always_true");
/// ```
pub fn create_searchable_payload(
    form: &ListingForm,
    searchable_type: SearchableType,
    images: &[String],
    extra: Map<String, Value>,
) -> Value {
    let currency = form
        .currency
        .as_deref()
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CURRENCY);

    let mut public = json!({
        "title": form.title,
        "description": form.description,
        "currency": currency,
        "type": searchable_type,
        "images": images,
        "visibility": {
            "udf": "always_true",
            "data": {}
        }
    });

    if let Value::Object(fields) = &mut public {
        fields.extend(extra);
    }

    json!({ "payloads": { "public": public } })
}

// =============================================================================
// Unit Tests
// =============================================================================
