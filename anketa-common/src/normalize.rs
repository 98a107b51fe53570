//! Entry normalizer
//!
//! Turns raw form submissions (checkbox states, free-text "other" rows,
//! locale-formatted numbers) into the canonical shape that gets stored.
//! Incomplete items are filtered out, never defaulted.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{Catalog, OTHER_KEY};
use crate::entry::{CanonicalField, ItemEntry, OtherSlot};
use crate::{Error, Result};

/// One submitted item, as the form posts it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl RawItem {
    pub fn new(key: &str, area: &str) -> Self {
        Self {
            key: Some(key.to_string()),
            area: Some(area.to_string()),
            name: None,
        }
    }

    pub fn other(name: &str, area: &str) -> Self {
        Self {
            key: Some(OTHER_KEY.to_string()),
            area: Some(area.to_string()),
            name: Some(name.to_string()),
        }
    }
}

/// Checkbox row of the seeds/seedlings form sections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckboxState {
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Normalize raw items against a catalog.
///
/// - items without a key or with an empty area are dropped
/// - keys outside the catalog are dropped
/// - `other` items (or pre-numbered `other_N`) are renumbered into
///   `other_1..` in submission order; an `other` item without a name is
///   incomplete and dropped; items beyond the catalog's slot capacity are
///   dropped
///
/// Returns `None` when nothing survives.
pub fn normalize(raw: &[RawItem], catalog: &Catalog) -> Option<CanonicalField> {
    let capacity = catalog.other_slots();
    let mut next_slot = 1usize;
    let mut entries = Vec::with_capacity(raw.len());
    let mut dropped = 0usize;
    let mut overflow = 0usize;

    for item in raw {
        let key = match item.key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => key,
            _ => {
                dropped += 1;
                continue;
            }
        };
        let area = match item.area.as_deref().map(normalize_area) {
            Some(area) if !area.is_empty() => area,
            _ => {
                dropped += 1;
                continue;
            }
        };

        let is_other = key == OTHER_KEY || OtherSlot::parse_key(key).is_some();
        if is_other && capacity > 0 {
            let name = item.name.as_deref().map(str::trim).unwrap_or_default();
            if name.is_empty() {
                dropped += 1;
                continue;
            }
            match OtherSlot::new(next_slot).filter(|_| next_slot <= capacity) {
                Some(slot) => {
                    entries.push(ItemEntry::other(slot, name, area));
                    next_slot += 1;
                }
                None => overflow += 1,
            }
        } else if catalog.contains(key) {
            entries.push(ItemEntry::typed(key, area));
        } else {
            dropped += 1;
        }
    }

    if dropped > 0 || overflow > 0 {
        debug!(
            "Normalized {} entries for {} ({} incomplete or unknown, {} over other capacity)",
            entries.len(),
            catalog.name(),
            dropped,
            overflow
        );
    }

    CanonicalField::from_entries(entries)
}

/// Convert a checkbox map into raw items: checked rows only, catalog order,
/// `other` last.
pub fn from_checkbox_state(
    state: &BTreeMap<String, CheckboxState>,
    catalog: &Catalog,
) -> Vec<RawItem> {
    let mut items: Vec<RawItem> = catalog
        .keys()
        .filter_map(|key| state.get(key).map(|s| (key, s)))
        .filter(|(_, s)| s.checked)
        .map(|(key, s)| RawItem {
            key: Some(key.to_string()),
            area: Some(s.area.clone()),
            name: None,
        })
        .collect();

    if catalog.other().is_some() {
        if let Some(s) = state.get(OTHER_KEY).filter(|s| s.checked) {
            items.push(RawItem {
                key: Some(OTHER_KEY.to_string()),
                area: Some(s.area.clone()),
                name: s.name.clone(),
            });
        }
    }

    items
}

/// Deduplicate a multi-select submission, keeping first occurrences.
/// Blank and unknown keys are dropped.
pub fn normalize_multi_select(keys: &[String], catalog: &Catalog) -> Vec<String> {
    let mut seen = HashSet::new();
    keys.iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty() && catalog.contains(k))
        .filter(|k| seen.insert(k.to_string()))
        .map(str::to_string)
        .collect()
}

/// Keep only the digits of a phone number
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Area magnitude as entered, trimmed, with `,` accepted as decimal separator
pub fn normalize_area(raw: &str) -> String {
    raw.trim().replace(',', ".")
}

/// Parse a locale-tolerant decimal and render it with two decimals.
/// Blank input is `None`.
pub fn normalize_decimal(raw: Option<&str>) -> Result<Option<String>> {
    let text = match raw.map(normalize_area) {
        Some(text) if !text.is_empty() => text,
        _ => return Ok(None),
    };
    let value: f64 = text
        .parse()
        .map_err(|_| Error::InvalidInput(format!("Not a number: {}", text)))?;
    if !value.is_finite() {
        return Err(Error::InvalidInput(format!("Not a number: {}", text)));
    }
    Ok(Some(format!("{:.2}", value)))
}

/// Parse a meeting date in any of the formats the forms produce
pub fn normalize_date(raw: &str) -> Result<NaiveDate> {
    let text = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%d.%m.%Y") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date());
    }
    Err(Error::InvalidInput(format!("Unparseable date: {}", text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin;

    #[test]
    fn test_drops_incomplete_items() {
        let raw = vec![
            RawItem::new("tomato", ""),
            RawItem {
                key: None,
                area: Some("1".into()),
                name: None,
            },
            RawItem::new("  ", "1"),
            RawItem::new("onion", "0,75"),
        ];
        let field = normalize(&raw, &builtin::seeds()).unwrap();
        assert_eq!(field.entries(), &[ItemEntry::typed("onion", "0.75")]);
    }

    #[test]
    fn test_unknown_keys_dropped() {
        let raw = vec![RawItem::new("mango", "2"), RawItem::new("apple", "1")];
        assert!(normalize(&raw, &builtin::seeds()).is_none());
        assert!(normalize(&raw, &builtin::seedlings()).is_some());
    }

    #[test]
    fn test_other_overflow_dropped() {
        let raw: Vec<RawItem> = (1..=6)
            .map(|i| RawItem::other(&format!("crop {}", i), "1"))
            .collect();
        let field = normalize(&raw, &builtin::seeds()).unwrap();
        assert_eq!(field.len(), 4);
        let slots: Vec<usize> = field.iter().filter_map(|e| e.slot()).map(OtherSlot::get).collect();
        assert_eq!(slots, vec![1, 2, 3, 4]);
        assert_eq!(field.entries()[3].name(), Some("crop 4"));
    }

    #[test]
    fn test_other_capacity_follows_catalog() {
        let raw = vec![RawItem::other("a", "1"), RawItem::other("b", "2")];
        let field = normalize(&raw, &builtin::seeds().with_other_slots(1)).unwrap();
        assert_eq!(field.len(), 1);
    }

    #[test]
    fn test_prenumbered_other_renumbered() {
        let raw = vec![
            RawItem {
                key: Some("other_3".into()),
                area: Some("2".into()),
                name: Some("Зира".into()),
            },
            RawItem::new("beet", "1"),
        ];
        let field = normalize(&raw, &builtin::seeds()).unwrap();
        assert_eq!(field.entries()[0].key(), "other_1");
        assert_eq!(field.entries()[1].key(), "beet");
    }

    #[test]
    fn test_other_ignored_without_section() {
        let raw = vec![RawItem::other("x", "1")];
        assert!(normalize(&raw, &builtin::irrigation()).is_none());
    }

    #[test]
    fn test_checkbox_state_order() {
        let mut state = BTreeMap::new();
        state.insert("potato".to_string(), CheckboxState { checked: true, area: "1".into(), name: None });
        state.insert("tomato".to_string(), CheckboxState { checked: true, area: "2".into(), name: None });
        state.insert("onion".to_string(), CheckboxState { checked: false, area: "3".into(), name: None });
        state.insert(
            "other".to_string(),
            CheckboxState { checked: true, area: "4".into(), name: Some("Базилик".into()) },
        );

        let items = from_checkbox_state(&state, &builtin::seeds());
        let keys: Vec<_> = items.iter().filter_map(|i| i.key.as_deref()).collect();
        assert_eq!(keys, vec!["tomato", "potato", "other"]);
    }

    #[test]
    fn test_multi_select_dedup() {
        let keys = vec!["well".into(), "".into(), "pump".into(), "well".into(), "river".into()];
        assert_eq!(normalize_multi_select(&keys, &builtin::irrigation()), vec!["well", "pump"]);
    }

    #[test]
    fn test_scalar_normalizers() {
        assert_eq!(normalize_phone("+992 (90) 123-45-67"), "992901234567");
        assert_eq!(normalize_decimal(Some("1,5")).unwrap(), Some("1.50".to_string()));
        assert_eq!(normalize_decimal(Some(" ")).unwrap(), None);
        assert_eq!(normalize_decimal(None).unwrap(), None);
        assert!(normalize_decimal(Some("abc")).is_err());
    }

    #[test]
    fn test_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(normalize_date("2025-03-07").unwrap(), expected);
        assert_eq!(normalize_date("07.03.2025").unwrap(), expected);
        assert_eq!(normalize_date("2025-03-07T10:00:00+05:00").unwrap(), expected);
        assert!(normalize_date("March 7").is_err());
    }
}
