//! # Listing Totals
//!
//! Totals for what a buyer has chosen on a listing page.
//!
//! Both calculators are defensive: a missing listing, a missing catalog, an
//! unknown id, or an unparseable price contributes nothing instead of
//! failing, so the checkout page always has a number to show. The sum is
//! rounded to cents once, at the end.

use tracing::debug;

use crate::money::{amount_or_zero, Money};
use crate::types::{PublicData, SearchableType, Searchable, Selection, SelectionState};

/// Total for an all-in-one listing from the checkout page's selection state.
///
/// ```text
/// total = Σ price(file)            for every checked file
///       + Σ price(item) × quantity for every item with quantity > 0
///       + donation                 when the donation component is enabled
/// ```
/// Each part only counts when its component is enabled. Returns zero when
/// there is no listing or it has no component configuration.
///
/// ## Example
/// ```rust
/// use searchable_core::totals::calculate_all_in_one_total;
/// use searchable_core::types::{Searchable, SelectionState};
///
/// let listing: Searchable = serde_json::from_str(r#"{
///   "payloads": { "public": { "type": "allinone", "components": {
///     "downloadable": { "enabled": true, "files": [{ "id": "1", "name": "A", "price": 10.99 }] }
///   } } }
/// }"#).unwrap();
///
/// let mut state = SelectionState::default();
/// state.files.insert("1".to_string(), true);
///
/// assert_eq!(calculate_all_in_one_total(Some(&listing), &state).cents(), 1099);
/// ```
pub fn calculate_all_in_one_total(searchable: Option<&Searchable>, state: &SelectionState) -> Money {
    let Some(components) = searchable.and_then(|s| s.public().components.as_ref()) else {
        return Money::zero();
    };

    let mut total = 0.0;

    if let Some(files) = components.enabled_files() {
        total += files
            .iter()
            .filter(|file| {
                file.id
                    .as_ref()
                    .and_then(|id| state.files.get(id.as_key().as_ref()))
                    .copied()
                    .unwrap_or(false)
            })
            .map(|file| file.unit_price())
            .sum::<f64>();
    }

    if let Some(items) = components.enabled_items() {
        for item in items {
            let quantity = item
                .id
                .as_ref()
                .and_then(|id| state.offline_items.get(id.as_key().as_ref()))
                .copied()
                .unwrap_or(0);
            if quantity > 0 {
                total += item.unit_price() * quantity as f64;
            }
        }
    }

    if components.donation_enabled() {
        if let Some(donation) = state.donation_if_set() {
            total += donation.value_or_zero();
        }
    }

    Money::from_decimal(total)
}

/// Total for a plain (`downloadable`, `offline`, `direct`) listing.
///
/// - `downloadable`: price of each selected file, matched on `fileId`
/// - `offline`: price × `count` of each item, matched on `itemId`; a
///   missing or zero count counts as one unit
/// - `direct`: sum of the selections' `amount`
///
/// Any other type, an absent listing, or no selections gives zero.
///
/// ## Example
/// ```rust
/// use searchable_core::totals::calculate_simple_searchable_total;
/// use searchable_core::types::{PublicData, Selection};
///
/// let data: PublicData = serde_json::from_str(r#"{ "type": "direct" }"#).unwrap();
/// let selections = vec![
///     Selection { amount: Some(50.0.into()), ..Default::default() },
///     Selection { amount: Some("25".into()), ..Default::default() },
/// ];
///
/// assert_eq!(calculate_simple_searchable_total(Some(&data), &selections).cents(), 7500);
/// ```
pub fn calculate_simple_searchable_total(public_data: Option<&PublicData>, selections: &[Selection]) -> Money {
    let Some(data) = public_data else {
        return Money::zero();
    };
    if selections.is_empty() {
        return Money::zero();
    }

    let mut total = 0.0;

    match data.searchable_type() {
        SearchableType::Downloadable => {
            for selection in selections {
                let Some(key) = selection.key() else { continue };
                let file = data
                    .downloadable_files
                    .iter()
                    .find(|f| f.file_id.as_ref().map_or(false, |id| id.matches(&key)));
                match file {
                    Some(file) => total += amount_or_zero(file.price.as_ref()),
                    None => debug!(id = %key, "selected file not in catalog"),
                }
            }
        }
        SearchableType::Offline => {
            for selection in selections {
                let Some(key) = selection.key() else { continue };
                let item = data
                    .offline_items
                    .iter()
                    .find(|i| i.item_id.as_ref().map_or(false, |id| id.matches(&key)));
                match item {
                    Some(item) => {
                        let count = selection.count.filter(|c| *c != 0).unwrap_or(1);
                        total += amount_or_zero(item.price.as_ref()) * count as f64;
                    }
                    None => debug!(id = %key, "selected item not in catalog"),
                }
            }
        }
        SearchableType::Direct => {
            total = selections
                .iter()
                .map(|s| amount_or_zero(s.amount.as_ref()))
                .sum();
        }
        other => debug!(searchable_type = %other, "no simple total for listing type"),
    }

    Money::from_decimal(total)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn all_in_one_listing() -> Searchable {
        serde_json::from_value(json!({
            "payloads": {
                "public": {
                    "type": "allinone",
                    "components": {
                        "downloadable": {
                            "enabled": true,
                            "files": [
                                { "id": "1", "name": "File 1", "price": 10.99 },
                                { "id": "2", "name": "File 2", "price": 5.50 }
                            ]
                        },
                        "offline": {
                            "enabled": true,
                            "items": [
                                { "id": "3", "name": "Item 1", "price": 25.00 },
                                { "id": "4", "name": "Item 2", "price": 15.75 }
                            ]
                        },
                        "donation": { "enabled": true, "pricingMode": "flexible" }
                    }
                }
            }
        }))
        .unwrap()
    }

    fn state(files: &[(&str, bool)], items: &[(&str, i64)], donation: Option<f64>) -> SelectionState {
        SelectionState {
            files: files.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            offline_items: items.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            donation: donation.map(Into::into),
        }
    }

    #[test]
    fn test_selected_files_only() {
        let listing = all_in_one_listing();
        let total = calculate_all_in_one_total(Some(&listing), &state(&[("1", true), ("2", false)], &[], None));
        assert_eq!(total, Money::from_cents(1099));
    }

    #[test]
    fn test_offline_items_with_quantities() {
        let listing = all_in_one_listing();
        let total = calculate_all_in_one_total(Some(&listing), &state(&[], &[("3", 2), ("4", 1)], None));
        assert_eq!(total, Money::from_cents(6575));
    }

    #[test]
    fn test_offline_item_quantity_two() {
        let listing = all_in_one_listing();
        let total = calculate_all_in_one_total(Some(&listing), &state(&[], &[("3", 2)], None));
        assert_eq!(total, Money::from_cents(5000));
    }

    #[test]
    fn test_donation_only() {
        let listing = all_in_one_listing();
        let total = calculate_all_in_one_total(Some(&listing), &state(&[], &[], Some(20.0)));
        assert_eq!(total, Money::from_cents(2000));
    }

    #[test]
    fn test_combined_total() {
        let listing = all_in_one_listing();
        let total = calculate_all_in_one_total(Some(&listing), &state(&[("1", true)], &[("3", 1)], Some(10.0)));
        assert_eq!(total, Money::from_cents(4599));
    }

    #[test]
    fn test_missing_listing_or_components() {
        assert!(calculate_all_in_one_total(None, &SelectionState::default()).is_zero());

        let listing: Searchable = serde_json::from_value(json!({ "payloads": { "public": {} } })).unwrap();
        let total = calculate_all_in_one_total(Some(&listing), &state(&[("1", true)], &[], Some(5.0)));
        assert!(total.is_zero());
    }

    #[test]
    fn test_disabled_components_ignored() {
        let mut listing = all_in_one_listing();
        let components = listing.payloads.public.components.as_mut().unwrap();
        components.offline.as_mut().unwrap().enabled = false;
        components.donation.as_mut().unwrap().enabled = false;

        let total = calculate_all_in_one_total(Some(&listing), &state(&[("2", true)], &[("3", 4)], Some(50.0)));
        assert_eq!(total, Money::from_cents(550));
    }

    #[test]
    fn test_negative_quantity_and_unknown_ids_ignored() {
        let listing = all_in_one_listing();
        let total = calculate_all_in_one_total(Some(&listing), &state(&[("99", true)], &[("3", -2), ("77", 1)], None));
        assert!(total.is_zero());
    }

    #[test]
    fn test_total_is_stable_across_calls() {
        let listing = all_in_one_listing();
        let selection = state(&[("1", true), ("2", true)], &[("4", 3)], Some(0.01));
        let first = calculate_all_in_one_total(Some(&listing), &selection);
        let second = calculate_all_in_one_total(Some(&listing), &selection);
        assert_eq!(first, second);
        assert_eq!(first, Money::from_cents(6375));
    }

    #[test]
    fn test_simple_downloadable_total() {
        let data: PublicData = serde_json::from_value(json!({
            "type": "downloadable",
            "downloadableFiles": [
                { "fileId": "1", "price": 10.99 },
                { "fileId": "2", "price": 5.50 }
            ]
        }))
        .unwrap();
        let selections = vec![
            Selection { id: Some("1".into()), ..Default::default() },
            Selection { id: Some("2".into()), ..Default::default() },
        ];
        assert_eq!(
            calculate_simple_searchable_total(Some(&data), &selections),
            Money::from_cents(1649)
        );
    }

    #[test]
    fn test_simple_offline_total_with_counts() {
        let data: PublicData = serde_json::from_value(json!({
            "type": "offline",
            "offlineItems": [
                { "itemId": "1", "price": 25.00 },
                { "itemId": "2", "price": 15.75 }
            ]
        }))
        .unwrap();
        let selections = vec![
            Selection { id: Some("1".into()), count: Some(2), ..Default::default() },
            Selection { id: Some("2".into()), count: Some(1), ..Default::default() },
        ];
        assert_eq!(
            calculate_simple_searchable_total(Some(&data), &selections),
            Money::from_cents(6575)
        );
    }

    #[test]
    fn test_simple_offline_missing_count_is_one_unit() {
        let data: PublicData = serde_json::from_value(json!({
            "type": "offline",
            "offlineItems": [{ "itemId": 1, "price": "4.25" }]
        }))
        .unwrap();
        let selections = vec![
            Selection { id: Some("1".into()), ..Default::default() },
            Selection { id: Some(1i64.into()), count: Some(0), ..Default::default() },
        ];
        assert_eq!(
            calculate_simple_searchable_total(Some(&data), &selections),
            Money::from_cents(850)
        );
    }

    #[test]
    fn test_simple_direct_total() {
        let data: PublicData = serde_json::from_value(json!({ "type": "direct" })).unwrap();
        let selections = vec![
            Selection { amount: Some(50.0.into()), ..Default::default() },
            Selection { amount: Some(25.0.into()), ..Default::default() },
        ];
        assert_eq!(
            calculate_simple_searchable_total(Some(&data), &selections),
            Money::from_cents(7500)
        );
    }

    #[test]
    fn test_simple_empty_or_unknown() {
        let data: PublicData = serde_json::from_value(json!({ "type": "downloadable", "downloadableFiles": [] })).unwrap();
        assert!(calculate_simple_searchable_total(Some(&data), &[]).is_zero());
        assert!(calculate_simple_searchable_total(None, &[Selection::default()]).is_zero());

        let data: PublicData = serde_json::from_value(json!({ "type": "allinone" })).unwrap();
        let selections = vec![Selection { amount: Some(5.0.into()), ..Default::default() }];
        assert!(calculate_simple_searchable_total(Some(&data), &selections).is_zero());
    }
}
