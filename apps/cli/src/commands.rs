//! # Commands
//!
//! One handler per subcommand. Handlers read their input files, call
//! `searchable-core`, and return a serializable report; `main` prints it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  total       listing + state/selections ──► TotalReport                 │
//! │  fees        amount + payment type      ──► FeeBreakdown                │
//! │  validate    amount + kind              ──► AmountValidation            │
//! │  selections  listing + state            ──► SelectionsReport            │
//! │  receipt     listing + selections       ──► ReceiptReport               │
//! │  invoice     listing + state            ──► InvoiceRequest | Balance…   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::Path;

use searchable_core::format::format_currency;
use searchable_core::invoice::{
    balance_payment_for_all_in_one, stripe_invoice_for_all_in_one, BalancePaymentRequest, Buyer,
    InvoiceRequest,
};
use searchable_core::selection::SelectionSummary;
use searchable_core::validation::{check_payment_amount, validate_payment_amount};
use searchable_core::{
    build_all_in_one_selections, calculate_all_in_one_total, calculate_payment_fees,
    calculate_simple_searchable_total, format_selections_for_balance_payment, AmountKind,
    AmountValidation, CoreError, FeeBreakdown, FormattedSelection, Money, PaymentType,
    SearchableType, Searchable, Selection, SelectionState,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

fn read_json<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn read_optional<T: DeserializeOwned + Default>(path: Option<&Path>) -> CliResult<T> {
    path.map(read_json).transpose().map(Option::unwrap_or_default)
}

fn listing_currency<'a>(listing: &'a Searchable, config: &'a CliConfig) -> &'a str {
    listing.public().currency.as_deref().unwrap_or(&config.currency)
}

// =============================================================================
// total
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalReport {
    pub searchable_type: SearchableType,
    #[serde(with = "searchable_core::money::decimal")]
    pub total: Money,
    pub formatted: String,
}

/// All-in-one listings are totalled from `state`, every other type from
/// `selections`. Missing files count as empty.
pub fn total(
    listing_path: &Path,
    state_path: Option<&Path>,
    selections_path: Option<&Path>,
    config: &CliConfig,
) -> CliResult<TotalReport> {
    let listing: Searchable = read_json(listing_path)?;
    let searchable_type = listing.public().searchable_type();

    let total = if searchable_type == SearchableType::AllInOne {
        let state: SelectionState = read_optional(state_path)?;
        calculate_all_in_one_total(Some(&listing), &state)
    } else {
        let selections: Vec<Selection> = read_optional(selections_path)?;
        calculate_simple_searchable_total(Some(listing.public()), &selections)
    };

    info!(%searchable_type, %total, "Calculated total");
    Ok(TotalReport {
        searchable_type,
        total,
        formatted: format_currency(Some(total.to_decimal()), listing_currency(&listing, config)),
    })
}

// =============================================================================
// fees / validate
// =============================================================================

/// Fee breakdown for a typed-in amount. The amount must pass the general
/// payment limits first.
pub fn fees(amount: &str, payment_type: PaymentType) -> CliResult<FeeBreakdown> {
    let value = check_payment_amount(amount, AmountKind::General)
        .map_err(|err| CliError::InvalidAmount(err.to_string()))?;
    debug!(value, %payment_type, "Calculating fees");
    Ok(calculate_payment_fees(value, payment_type))
}

pub fn validate(amount: &str, kind: AmountKind) -> AmountValidation {
    let result = validate_payment_amount(amount, kind);
    debug!(amount, %kind, valid = result.is_valid, "Validated amount");
    result
}

// =============================================================================
// selections
// =============================================================================

#[derive(Debug, Serialize)]
pub struct SelectionsReport {
    pub selections: Vec<Selection>,
    pub summary: SelectionSummary,
}

pub fn selections(listing_path: &Path, state_path: &Path) -> CliResult<SelectionsReport> {
    let listing: Searchable = read_json(listing_path)?;
    let state: SelectionState = read_json(state_path)?;
    let components = listing
        .public()
        .components
        .as_ref()
        .ok_or(CoreError::MissingComponents)?;

    Ok(SelectionsReport {
        selections: build_all_in_one_selections(components, &state),
        summary: state.summary(),
    })
}

// =============================================================================
// receipt
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ReceiptReport {
    pub lines: Vec<FormattedSelection>,
    #[serde(with = "searchable_core::money::decimal")]
    pub total: Money,
    pub formatted: String,
}

pub fn receipt(listing_path: &Path, selections_path: &Path, config: &CliConfig) -> CliResult<ReceiptReport> {
    let listing: Searchable = read_json(listing_path)?;
    let selections: Vec<Selection> = read_json(selections_path)?;

    let lines = format_selections_for_balance_payment(&listing, &selections);
    let total: Money = lines.iter().map(|line| line.price).sum();
    info!(lines = lines.len(), %total, "Formatted receipt");

    Ok(ReceiptReport {
        formatted: format_currency(Some(total.to_decimal()), listing_currency(&listing, config)),
        lines,
        total,
    })
}

// =============================================================================
// invoice
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum InvoiceOutput {
    Card(InvoiceRequest),
    Balance(BalancePaymentRequest),
}

pub fn invoice(
    listing_path: &Path,
    state_path: &Path,
    payment_type: PaymentType,
    buyer: Option<Buyer>,
    config: &CliConfig,
) -> CliResult<InvoiceOutput> {
    let listing: Searchable = read_json(listing_path)?;
    let state: SelectionState = read_json(state_path)?;

    match payment_type {
        PaymentType::Stripe => {
            let mut request = stripe_invoice_for_all_in_one(&listing, &state, &config.return_url)?
                .with_currency(config.currency.as_str());
            if let Some(buyer) = buyer {
                request = request.with_buyer(buyer);
            }
            info!(searchable_id = request.searchable_id, total = %request.total_price, "Built card invoice");
            Ok(InvoiceOutput::Card(request))
        }
        PaymentType::Balance => {
            let request = balance_payment_for_all_in_one(&listing, &state)?;
            info!(searchable_id = request.searchable_id, total = %request.total_price, "Built balance payment");
            Ok(InvoiceOutput::Balance(request))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn json_file(value: serde_json::Value) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(value.to_string().as_bytes()).unwrap();
        file
    }

    fn all_in_one_listing() -> NamedTempFile {
        json_file(json!({
            "searchable_id": 9,
            "payloads": {
                "public": {
                    "type": "allinone",
                    "components": {
                        "downloadable": {
                            "enabled": true,
                            "files": [{ "id": "1", "name": "File 1", "price": 10.99 }]
                        },
                        "offline": {
                            "enabled": true,
                            "items": [{ "id": "3", "name": "Item 1", "price": 25.00 }]
                        },
                        "donation": { "enabled": true }
                    }
                }
            }
        }))
    }

    fn state_file() -> NamedTempFile {
        json_file(json!({ "files": { "1": true }, "offlineItems": { "3": 1 }, "donation": 10 }))
    }

    #[test]
    fn test_total_all_in_one() {
        let listing = all_in_one_listing();
        let state = state_file();
        let report = total(listing.path(), Some(state.path()), None, &CliConfig::default()).unwrap();
        assert_eq!(report.total, Money::from_cents(4599));
        assert_eq!(report.formatted, "$45.99");
    }

    #[test]
    fn test_total_simple_listing() {
        let listing = json_file(json!({
            "payloads": { "public": { "type": "direct", "currency": "eur" } }
        }));
        let selections = json_file(json!([{ "amount": 50 }, { "amount": "25" }]));
        let report = total(listing.path(), None, Some(selections.path()), &CliConfig::default()).unwrap();
        assert_eq!(report.total, Money::from_cents(7500));
        assert_eq!(report.formatted, "€75.00");
    }

    #[test]
    fn test_fees_rejects_invalid_amount() {
        let breakdown = fees("100", PaymentType::Stripe).unwrap();
        assert_eq!(breakdown.total_amount, Money::from_cents(10350));

        let err = fees("abc", PaymentType::Stripe).unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid number");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_validate_donation() {
        let result = validate("0.5", AmountKind::Donation);
        assert!(!result.is_valid);
        assert_eq!(result.error.as_deref(), Some("Minimum donation is $1.00"));
    }

    #[test]
    fn test_selections_and_receipt() {
        let listing = all_in_one_listing();
        let state = state_file();
        let report = selections(listing.path(), state.path()).unwrap();
        assert_eq!(report.selections.len(), 3);
        assert!(report.summary.has_selection);

        let selections_file = json_file(serde_json::to_value(&report.selections).unwrap());
        let receipt = receipt(listing.path(), selections_file.path(), &CliConfig::default()).unwrap();
        assert_eq!(receipt.lines.len(), 3);
        assert_eq!(receipt.total, Money::from_cents(4599));
    }

    #[test]
    fn test_invoice_uses_config() {
        let listing = all_in_one_listing();
        let state = state_file();
        let config = CliConfig {
            return_url: "https://shop.example.com/back".to_string(),
            currency: "gbp".to_string(),
            ..CliConfig::default()
        };

        let output = invoice(listing.path(), state.path(), PaymentType::Stripe, None, &config).unwrap();
        let InvoiceOutput::Card(request) = output else {
            panic!("expected card invoice");
        };
        assert_eq!(request.success_url, "https://shop.example.com/back");
        assert_eq!(request.currency, "gbp");
        assert_eq!(request.total_price, Money::from_cents(4599));
    }

    #[test]
    fn test_invoice_currency_comes_from_config_not_listing() {
        let listing = json_file(json!({
            "searchable_id": 9,
            "payloads": {
                "public": {
                    "type": "allinone",
                    "currency": "eur",
                    "components": { "donation": { "enabled": true } }
                }
            }
        }));
        let state = json_file(json!({ "donation": 5 }));

        let output = invoice(listing.path(), state.path(), PaymentType::Stripe, None, &CliConfig::default()).unwrap();
        let InvoiceOutput::Card(request) = output else {
            panic!("expected card invoice");
        };
        assert_eq!(request.currency, "usd");
    }

    #[test]
    fn test_balance_invoice() {
        let listing = all_in_one_listing();
        let state = state_file();
        let output = invoice(listing.path(), state.path(), PaymentType::Balance, None, &CliConfig::default()).unwrap();
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["invoice_type"], "balance");
        assert_eq!(value["selections"][2]["name"], "Support Creator");
    }

    #[test]
    fn test_missing_and_broken_inputs() {
        let missing = Path::new("/nonexistent/listing.json");
        assert!(matches!(
            total(missing, None, None, &CliConfig::default()),
            Err(CliError::Io { .. })
        ));

        let mut broken = NamedTempFile::new().unwrap();
        broken.write_all(b"{ not json").unwrap();
        assert!(matches!(
            selections(broken.path(), broken.path()),
            Err(CliError::Json { .. })
        ));
    }
}
