//! # Domain Types
//!
//! Listing ("searchable") payloads, UI selection state, and the derived
//! records produced by the calculators.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Searchable                                                             │
//! │  └── payloads.public: PublicData                                        │
//! │      ├── type: downloadable | offline | direct | allinone               │
//! │      ├── downloadableFiles[]  (legacy downloadable catalog)             │
//! │      ├── offlineItems[]       (legacy offline catalog)                  │
//! │      └── components           (allinone only)                           │
//! │          ├── downloadable { enabled, files[] }                          │
//! │          ├── offline      { enabled, items[] }                          │
//! │          └── donation     { enabled, pricingMode, ... }                 │
//! │                                                                         │
//! │  SelectionState ──build──► Selection[] ──format──► FormattedSelection[] │
//! │  (UI maps)                 (invoice body)          (receipt lines)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is transient: rebuilt from the listing payload and the
//! buyer's in-progress choices, never persisted by this crate.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{amount_or_zero, Money, RawAmount};

// =============================================================================
// Item Identifiers
// =============================================================================

/// Identifier of a file or item inside a listing catalog.
///
/// Catalog ids are written by different listing editors as either JSON
/// numbers or strings, and selection maps always key them by string. Two ids
/// are equal when their string forms are equal, so `1` matches `"1"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(serde_json::Number),
    Text(String),
}

impl ItemId {
    /// Returns the string form used for comparisons and map keys.
    pub fn as_key(&self) -> Cow<'_, str> {
        match self {
            ItemId::Number(n) => Cow::Owned(n.to_string()),
            ItemId::Text(s) => Cow::Borrowed(s.as_str()),
        }
    }

    /// Checks this id against a selection-map key.
    pub fn matches(&self, key: &str) -> bool {
        self.as_key() == key
    }
}

impl PartialEq for ItemId {
    fn eq(&self, other: &Self) -> bool {
        self.as_key() == other.as_key()
    }
}

impl Eq for ItemId {}

impl Hash for ItemId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_key().hash(state);
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_key())
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId::Text(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        ItemId::Text(s)
    }
}

impl From<i64> for ItemId {
    fn from(n: i64) -> Self {
        ItemId::Number(n.into())
    }
}

fn id_matches(id: Option<&ItemId>, key: &str) -> bool {
    id.map_or(false, |id| id.matches(key))
}

// =============================================================================
// Searchable Type
// =============================================================================

/// The kind of listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SearchableType {
    /// Digital files, priced per file.
    #[default]
    Downloadable,
    /// Physical goods, priced per unit.
    Offline,
    /// Buyer-entered amount (tips, invoices).
    Direct,
    /// Composite of downloadable files, offline items and a donation.
    #[serde(rename = "allinone")]
    AllInOne,
    /// Any type string this crate does not price.
    #[serde(other)]
    Unknown,
}

impl SearchableType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchableType::Downloadable => "downloadable",
            SearchableType::Offline => "offline",
            SearchableType::Direct => "direct",
            SearchableType::AllInOne => "allinone",
            SearchableType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SearchableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// All-in-one Components
// =============================================================================

/// A file or item in an all-in-one component catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogEntry {
    #[serde(default)]
    #[ts(type = "string | number | null")]
    pub id: Option<ItemId>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    #[ts(type = "number | string | null")]
    pub price: Option<RawAmount>,
}

impl CatalogEntry {
    /// Unit price as a decimal; unparseable prices count as zero.
    pub fn unit_price(&self) -> f64 {
        amount_or_zero(self.price.as_ref())
    }

    pub fn matches(&self, key: &str) -> bool {
        id_matches(self.id.as_ref(), key)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DownloadableComponent {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub files: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OfflineComponent {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub items: Vec<CatalogEntry>,
}

/// How a donation amount is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PricingMode {
    /// Seller sets one amount.
    Fixed,
    /// Buyer types any amount.
    Flexible,
    /// Buyer picks from preset buttons or types an amount.
    Preset,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DonationComponent {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub pricing_mode: Option<PricingMode>,

    #[serde(default)]
    #[ts(type = "number | string | null")]
    pub fixed_amount: Option<RawAmount>,

    #[serde(default)]
    #[ts(type = "Array<number | string>")]
    pub preset_amounts: Vec<RawAmount>,
}

impl DonationComponent {
    /// The seller's fixed donation amount, when the mode is `fixed`.
    pub fn fixed_amount(&self) -> Option<Money> {
        match self.pricing_mode {
            Some(PricingMode::Fixed) => self
                .fixed_amount
                .as_ref()
                .and_then(RawAmount::to_f64)
                .map(Money::from_decimal),
            _ => None,
        }
    }

    /// Preset amounts that parse, rounded to cents, in listing order.
    pub fn presets(&self) -> Vec<Money> {
        self.preset_amounts
            .iter()
            .filter_map(RawAmount::to_f64)
            .map(Money::from_decimal)
            .collect()
    }
}

/// Component configuration of an all-in-one listing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Components {
    #[serde(default)]
    pub downloadable: Option<DownloadableComponent>,

    #[serde(default)]
    pub offline: Option<OfflineComponent>,

    #[serde(default)]
    pub donation: Option<DonationComponent>,
}

impl Components {
    /// Files of the downloadable component, only when it is enabled.
    pub fn enabled_files(&self) -> Option<&[CatalogEntry]> {
        self.downloadable
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| c.files.as_slice())
    }

    /// Items of the offline component, only when it is enabled.
    pub fn enabled_items(&self) -> Option<&[CatalogEntry]> {
        self.offline
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| c.items.as_slice())
    }

    pub fn donation_enabled(&self) -> bool {
        self.donation.as_ref().map_or(false, |d| d.enabled)
    }

    /// Looks up a file regardless of the enabled flag (receipts show what was bought).
    pub fn find_file(&self, key: &str) -> Option<&CatalogEntry> {
        self.downloadable
            .as_ref()
            .and_then(|c| c.files.iter().find(|f| f.matches(key)))
    }

    /// Looks up an offline item regardless of the enabled flag.
    pub fn find_item(&self, key: &str) -> Option<&CatalogEntry> {
        self.offline
            .as_ref()
            .and_then(|c| c.items.iter().find(|i| i.matches(key)))
    }
}

// =============================================================================
// Legacy Catalogs
// =============================================================================

/// A file of a plain `downloadable` listing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DownloadableFile {
    #[serde(default)]
    #[ts(type = "string | number | null")]
    pub file_id: Option<ItemId>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    #[ts(type = "number | string | null")]
    pub price: Option<RawAmount>,
}

/// An item of a plain `offline` listing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OfflineItem {
    #[serde(default)]
    #[ts(type = "string | number | null")]
    pub item_id: Option<ItemId>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    #[ts(type = "number | string | null")]
    pub price: Option<RawAmount>,
}

// =============================================================================
// Searchable
// =============================================================================

/// The public payload of a listing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PublicData {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub currency: Option<String>,

    /// Listing type; missing means `downloadable`.
    #[serde(default, rename = "type")]
    pub kind: Option<SearchableType>,

    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default)]
    pub components: Option<Components>,

    #[serde(default)]
    pub downloadable_files: Vec<DownloadableFile>,

    #[serde(default)]
    pub offline_items: Vec<OfflineItem>,
}

impl PublicData {
    pub fn searchable_type(&self) -> SearchableType {
        self.kind.unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Payloads {
    #[serde(default)]
    pub public: PublicData,
}

/// A listing as returned by the backend.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Searchable {
    #[serde(default)]
    #[ts(type = "number | null")]
    pub searchable_id: Option<i64>,

    #[serde(default)]
    pub payloads: Payloads,
}

impl Searchable {
    pub fn public(&self) -> &PublicData {
        &self.payloads.public
    }
}

// =============================================================================
// Selection State
// =============================================================================

/// A buyer's in-progress choices on an all-in-one listing.
///
/// Mirrors the checkout page's state: a checkbox per file, a quantity
/// stepper per offline item, and an optional donation amount.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    /// File id → checked.
    #[serde(default)]
    pub files: BTreeMap<String, bool>,

    /// Offline item id → quantity.
    #[serde(default)]
    #[ts(type = "Record<string, number>")]
    pub offline_items: BTreeMap<String, i64>,

    /// Chosen donation amount.
    #[serde(default)]
    #[ts(type = "number | string | null")]
    pub donation: Option<RawAmount>,
}

impl SelectionState {
    /// The donation amount when the UI would consider one chosen.
    pub fn donation_if_set(&self) -> Option<&RawAmount> {
        self.donation.as_ref().filter(|d| d.is_set())
    }
}

// =============================================================================
// Selections
// =============================================================================

/// Which all-in-one component a selection belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    Downloadable,
    Offline,
    Donation,
    #[serde(other)]
    Unknown,
}

/// One chosen line as sent in invoice and payment request bodies.
///
/// All-in-one selections carry `component`; plain listings send `id`
/// (with `count` for offline goods) or `amount` for direct payments.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Selection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | number | null")]
    pub id: Option<ItemId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<Component>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | null")]
    pub count: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | string | null")]
    pub amount: Option<RawAmount>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "number | string | null")]
    pub price: Option<RawAmount>,
}

impl Selection {
    /// A single downloadable file.
    pub fn file(id: ItemId) -> Self {
        Selection {
            id: Some(id),
            component: Some(Component::Downloadable),
            count: Some(1),
            ..Default::default()
        }
    }

    /// `count` units of an offline item.
    pub fn offline(id: ItemId, count: i64) -> Self {
        Selection {
            id: Some(id),
            component: Some(Component::Offline),
            count: Some(count),
            ..Default::default()
        }
    }

    /// A donation of `amount`.
    pub fn donation(amount: RawAmount) -> Self {
        Selection {
            component: Some(Component::Donation),
            amount: Some(amount),
            ..Default::default()
        }
    }

    /// The selection id as a map key, if any.
    pub fn key(&self) -> Option<Cow<'_, str>> {
        self.id.as_ref().map(ItemId::as_key)
    }
}

// =============================================================================
// Receipt Lines
// =============================================================================

/// Line type shown on a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
    Downloadable,
    Offline,
    Direct,
    Donation,
    #[serde(rename = "allinone")]
    AllInOne,
    Unknown,
}

impl From<SearchableType> for LineType {
    fn from(kind: SearchableType) -> Self {
        match kind {
            SearchableType::Downloadable => LineType::Downloadable,
            SearchableType::Offline => LineType::Offline,
            SearchableType::Direct => LineType::Direct,
            SearchableType::AllInOne => LineType::AllInOne,
            SearchableType::Unknown => LineType::Unknown,
        }
    }
}

/// A display-ready receipt line.
///
/// Derived, not authoritative: the backend owns the actual invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FormattedSelection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | number | null")]
    pub id: Option<ItemId>,

    pub name: String,

    #[serde(with = "crate::money::decimal")]
    #[ts(type = "number")]
    pub price: Money,

    #[serde(rename = "type")]
    pub line_type: LineType,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_id_matches_across_representations() {
        let numeric: ItemId = serde_json::from_value(json!(7)).unwrap();
        let text: ItemId = serde_json::from_value(json!("7")).unwrap();

        assert_eq!(numeric, text);
        assert!(numeric.matches("7"));
        assert!(!text.matches("8"));
    }

    #[test]
    fn test_searchable_type_defaults_and_unknown() {
        let data: PublicData = serde_json::from_value(json!({})).unwrap();
        assert_eq!(data.searchable_type(), SearchableType::Downloadable);

        let data: PublicData = serde_json::from_value(json!({ "type": "auction" })).unwrap();
        assert_eq!(data.searchable_type(), SearchableType::Unknown);

        let data: PublicData = serde_json::from_value(json!({ "type": "allinone" })).unwrap();
        assert_eq!(data.searchable_type(), SearchableType::AllInOne);
    }

    #[test]
    fn test_searchable_deserializes_backend_shape() {
        let listing: Searchable = serde_json::from_value(json!({
            "searchable_id": 42,
            "terminal_id": 9,
            "payloads": {
                "public": {
                    "title": "Bundle",
                    "type": "allinone",
                    "components": {
                        "downloadable": {
                            "enabled": true,
                            "files": [{ "id": 1, "name": "Track", "price": "1.99" }]
                        },
                        "donation": { "enabled": true, "pricingMode": "flexible" }
                    }
                }
            }
        }))
        .unwrap();

        assert_eq!(listing.searchable_id, Some(42));
        let components = listing.public().components.as_ref().unwrap();
        assert_eq!(components.enabled_files().unwrap().len(), 1);
        assert!(components.enabled_items().is_none());
        assert!(components.donation_enabled());
        assert_eq!(components.find_file("1").unwrap().unit_price(), 1.99);
    }

    #[test]
    fn test_disabled_component_hides_catalog() {
        let components = Components {
            downloadable: Some(DownloadableComponent {
                enabled: false,
                files: vec![CatalogEntry {
                    id: Some("1".into()),
                    name: "File".to_string(),
                    price: Some(5.0.into()),
                }],
            }),
            ..Default::default()
        };

        assert!(components.enabled_files().is_none());
        assert!(components.find_file("1").is_some());
    }

    #[test]
    fn test_donation_fixed_amount_and_presets() {
        let donation: DonationComponent = serde_json::from_value(json!({
            "enabled": true,
            "pricingMode": "fixed",
            "fixedAmount": "15",
            "presetAmounts": [5, "10", "x"]
        }))
        .unwrap();

        assert_eq!(donation.fixed_amount(), Some(Money::from_cents(1500)));
        assert_eq!(
            donation.presets(),
            vec![Money::from_cents(500), Money::from_cents(1000)]
        );
    }

    #[test]
    fn test_selection_serializes_without_empty_fields() {
        let value = serde_json::to_value(Selection::file("1".into())).unwrap();
        assert_eq!(value, json!({ "id": "1", "component": "downloadable", "count": 1 }));

        let value = serde_json::to_value(Selection::donation(25.0.into())).unwrap();
        assert_eq!(value, json!({ "component": "donation", "amount": 25.0 }));
    }

    #[test]
    fn test_selection_state_donation_if_set() {
        let mut state = SelectionState::default();
        assert!(state.donation_if_set().is_none());

        state.donation = Some(0.0.into());
        assert!(state.donation_if_set().is_none());

        state.donation = Some("12".into());
        assert!(state.donation_if_set().is_some());
    }
}
