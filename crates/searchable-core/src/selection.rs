//! # Selections
//!
//! Turns the checkout page's selection state into request selections, and
//! request selections back into receipt lines.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SelectionState                                                         │
//! │  files { "1": true, "2": false }                                        │
//! │  offlineItems { "3": 2 }                                                │
//! │  donation 10                                                            │
//! │        │                                                                │
//! │        ▼  build_all_in_one_selections                                   │
//! │  [ {id:"1", component:downloadable, count:1},                           │
//! │    {id:"3", component:offline, count:2},                                │
//! │    {component:donation, amount:10} ]           → invoice request body   │
//! │        │                                                                │
//! │        ▼  format_selections_for_balance_payment                         │
//! │  [ File 1 $10.99, Item 1 $25.00, Item 1 $25.00, Support Creator $10 ]   │
//! │                                                → itemized receipt       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function returns a fresh `Vec`; inputs are never modified.
//! Catalog misses are skipped, never reported as errors.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::money::{amount_or_zero, Money};
use crate::MAX_RECEIPT_UNITS;
use crate::types::{
    Component, Components, FormattedSelection, ItemId, LineType, SearchableType, Searchable,
    Selection, SelectionState,
};

/// Receipt name of a donation line.
pub const DONATION_LINE_NAME: &str = "Support Creator";

/// Receipt id of a donation line.
pub const DONATION_LINE_ID: &str = "donation";

// =============================================================================
// Key Ordering
// =============================================================================

/// Parses keys that a JavaScript object would treat as array indices.
fn array_index(key: &str) -> Option<u32> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    key.parse::<u32>().ok().filter(|n| *n != u32::MAX)
}

/// Orders selection-state keys the way the checkout page enumerates them:
/// integer-like keys ascending by value, then the remaining keys.
fn js_key_order(a: &str, b: &str) -> Ordering {
    match (array_index(a), array_index(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn ordered_entries<V>(map: &BTreeMap<String, V>) -> Vec<(&String, &V)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|(a, _), (b, _)| js_key_order(a, b));
    entries
}

// =============================================================================
// Builder
// =============================================================================

/// Builds the `selections` array of an all-in-one invoice request.
///
/// Emits, in selection-state key order:
/// - one `{id, component: downloadable, count: 1}` per checked file,
/// - one `{id, component: offline, count}` per item with quantity > 0,
/// - one `{component: donation, amount}` when a donation is set,
///
/// each only when its component is enabled. Ids with no catalog entry are
/// skipped. The emitted `id` is the catalog's id, keeping its JSON type.
///
/// ## Example
/// ```rust
/// use searchable_core::selection::build_all_in_one_selections;
/// use searchable_core::types::{Components, SelectionState};
///
/// let components: Components = serde_json::from_str(r#"{
///   "offline": { "enabled": true, "items": [{ "id": "3", "name": "Mug", "price": 25 }] }
/// }"#).unwrap();
///
/// let mut state = SelectionState::default();
/// state.offline_items.insert("3".to_string(), 2);
/// state.offline_items.insert("4".to_string(), 0);
///
/// let selections = build_all_in_one_selections(&components, &state);
/// assert_eq!(selections.len(), 1);
/// assert_eq!(selections[0].count, Some(2));
/// ```
pub fn build_all_in_one_selections(components: &Components, state: &SelectionState) -> Vec<Selection> {
    let mut selections = Vec::new();

    if let Some(files) = components.enabled_files() {
        for (key, _) in ordered_entries(&state.files).into_iter().filter(|(_, checked)| **checked) {
            match files.iter().find(|f| f.matches(key)) {
                Some(file) => selections.push(Selection::file(catalog_id(file.id.as_ref(), key))),
                None => debug!(id = %key, "selected file not in catalog, skipping"),
            }
        }
    }

    if let Some(items) = components.enabled_items() {
        for (key, count) in ordered_entries(&state.offline_items).into_iter().filter(|(_, count)| **count > 0) {
            match items.iter().find(|i| i.matches(key)) {
                Some(item) => selections.push(Selection::offline(catalog_id(item.id.as_ref(), key), *count)),
                None => debug!(id = %key, "selected item not in catalog, skipping"),
            }
        }
    }

    if components.donation_enabled() {
        if let Some(amount) = state.donation_if_set() {
            selections.push(Selection::donation(amount.clone()));
        }
    }

    selections
}

fn catalog_id(id: Option<&ItemId>, key: &str) -> ItemId {
    id.cloned().unwrap_or_else(|| ItemId::from(key))
}

// =============================================================================
// Formatter
// =============================================================================

/// Expands request selections into receipt lines for a balance payment.
///
/// For all-in-one listings the name and unit price come from the listing's
/// components, and an offline selection of `count` units becomes `count`
/// separate lines so receipts list every physical unit, up to
/// [`MAX_RECEIPT_UNITS`] lines per selection. Donations become a
/// single "Support Creator" line. Selections whose catalog entry is missing
/// are dropped.
///
/// Other listing types pass each selection through, defaulting a missing
/// name to `Item <id>` and a missing price to zero.
///
/// ## Example
/// ```rust
/// use searchable_core::selection::format_selections_for_balance_payment;
/// use searchable_core::types::{Searchable, Selection};
///
/// let listing: Searchable = serde_json::from_str(r#"{
///   "payloads": { "public": { "type": "allinone", "components": {
///     "offline": { "items": [{ "id": "2", "name": "Poster", "price": 25 }] }
///   } } }
/// }"#).unwrap();
///
/// let lines = format_selections_for_balance_payment(&listing, &[Selection::offline("2".into(), 2)]);
/// assert_eq!(lines.len(), 2);
/// assert_eq!(lines[1].name, "Poster");
/// ```
pub fn format_selections_for_balance_payment(searchable: &Searchable, selections: &[Selection]) -> Vec<FormattedSelection> {
    let data = searchable.public();
    let searchable_type = data.searchable_type();

    if searchable_type != SearchableType::AllInOne {
        return selections
            .iter()
            .map(|selection| format_legacy(selection, searchable_type))
            .collect();
    }

    let empty = Components::default();
    let components = data.components.as_ref().unwrap_or(&empty);
    let mut lines = Vec::new();

    for selection in selections {
        match selection.component {
            Some(Component::Downloadable) => {
                let Some(key) = selection.key() else { continue };
                match components.find_file(&key) {
                    Some(file) => lines.push(FormattedSelection {
                        id: file.id.clone(),
                        name: file.name.clone(),
                        price: Money::from_decimal(file.unit_price()),
                        line_type: LineType::Downloadable,
                    }),
                    None => debug!(id = %key, "file not in catalog, dropped from receipt"),
                }
            }
            Some(Component::Offline) => {
                let Some(key) = selection.key() else { continue };
                match components.find_item(&key) {
                    Some(item) => {
                        let count = selection.count.unwrap_or(0).max(0);
                        let units = count.min(MAX_RECEIPT_UNITS);
                        if units < count {
                            debug!(id = %key, count, units, "offline count over receipt limit, clamped");
                        }
                        let line = FormattedSelection {
                            id: item.id.clone(),
                            name: item.name.clone(),
                            price: Money::from_decimal(item.unit_price()),
                            line_type: LineType::Offline,
                        };
                        lines.extend(std::iter::repeat(line).take(units as usize));
                    }
                    None => debug!(id = %key, "item not in catalog, dropped from receipt"),
                }
            }
            Some(Component::Donation) => lines.push(FormattedSelection {
                id: Some(ItemId::from(DONATION_LINE_ID)),
                name: DONATION_LINE_NAME.to_string(),
                price: Money::from_decimal(amount_or_zero(selection.amount.as_ref())),
                line_type: LineType::Donation,
            }),
            Some(Component::Unknown) | None => {
                debug!("selection without a known component, dropped from receipt")
            }
        }
    }

    lines
}

fn format_legacy(selection: &Selection, searchable_type: SearchableType) -> FormattedSelection {
    let name = match (&selection.name, &selection.id) {
        (Some(name), _) if !name.is_empty() => name.clone(),
        (_, Some(id)) => format!("Item {}", id),
        _ => "Item".to_string(),
    };

    FormattedSelection {
        id: selection.id.clone(),
        name,
        price: Money::from_decimal(amount_or_zero(selection.price.as_ref())),
        line_type: LineType::from(searchable_type),
    }
}

// =============================================================================
// Cart Summary
// =============================================================================

/// Counts shown in the checkout cart summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SelectionSummary {
    /// Number of checked files.
    pub selected_files: usize,
    /// Total units across offline items with quantity > 0.
    #[ts(type = "number")]
    pub offline_units: i64,
    pub has_donation: bool,
    /// Whether anything at all is selected (the summary is hidden otherwise).
    pub has_selection: bool,
}

impl SelectionState {
    /// Summarizes the current choices for the cart panel.
    pub fn summary(&self) -> SelectionSummary {
        let selected_files = self.files.values().filter(|checked| **checked).count();
        let offline_units: i64 = self.offline_items.values().filter(|q| **q > 0).sum();
        let has_donation = self.donation_if_set().is_some();

        SelectionSummary {
            selected_files,
            offline_units,
            has_donation,
            has_selection: selected_files > 0 || offline_units > 0 || has_donation,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
