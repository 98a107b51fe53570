//! Canonical item entries for multi-select-with-area fields
//!
//! In memory an entry is either a catalog category (`Typed`) or one of the
//! reserved free-text slots (`Other`). On disk both share the historical JSON
//! shape `{"key": ..., "name": ..., "area": ...}` where free-text entries use
//! the synthetic keys `other_1` .. `other_4`.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::catalog::MAX_OTHER_SLOTS;
use crate::Result;

const OTHER_SLOT_PREFIX: &str = "other_";

/// Position of a free-text entry, 1-based and bounded by MAX_OTHER_SLOTS
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OtherSlot(u8);

impl OtherSlot {
    /// `None` for 0 or anything above MAX_OTHER_SLOTS
    pub fn new(slot: usize) -> Option<Self> {
        if (1..=MAX_OTHER_SLOTS).contains(&slot) {
            Some(Self(slot as u8))
        } else {
            None
        }
    }

    /// 1-based slot number
    pub fn get(self) -> usize {
        self.0 as usize
    }

    /// 0-based column index
    pub fn index(self) -> usize {
        self.get() - 1
    }

    /// Storage key, e.g. `other_2`
    pub fn key(self) -> String {
        format!("{}{}", OTHER_SLOT_PREFIX, self.0)
    }

    /// Parse a storage key. Only the exact `other_N` spelling is accepted.
    pub fn parse_key(key: &str) -> Option<Self> {
        let digits = key.strip_prefix(OTHER_SLOT_PREFIX)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse::<usize>().ok().and_then(Self::new)
    }

    /// All slots up to `capacity` (clamped to MAX_OTHER_SLOTS)
    pub fn up_to(capacity: usize) -> impl Iterator<Item = OtherSlot> {
        (1..=capacity.min(MAX_OTHER_SLOTS)).filter_map(Self::new)
    }
}

impl fmt::Display for OtherSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", OTHER_SLOT_PREFIX, self.0)
    }
}

/// One selected category with its magnitude
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredItem", into = "StoredItem")]
pub enum ItemEntry {
    /// Catalog category (or a key that drifted out of the catalog)
    Typed { key: String, area: String },
    /// Free-text entry in a reserved slot
    Other {
        slot: OtherSlot,
        name: String,
        area: String,
    },
}

impl ItemEntry {
    pub fn typed(key: impl Into<String>, area: impl Into<String>) -> Self {
        ItemEntry::Typed {
            key: key.into(),
            area: area.into(),
        }
    }

    pub fn other(slot: OtherSlot, name: impl Into<String>, area: impl Into<String>) -> Self {
        ItemEntry::Other {
            slot,
            name: name.into(),
            area: area.into(),
        }
    }

    /// Storage key (`tomato`, `other_1`, ...)
    pub fn key(&self) -> Cow<'_, str> {
        match self {
            ItemEntry::Typed { key, .. } => Cow::Borrowed(key.as_str()),
            ItemEntry::Other { slot, .. } => Cow::Owned(slot.key()),
        }
    }

    pub fn area(&self) -> &str {
        match self {
            ItemEntry::Typed { area, .. } | ItemEntry::Other { area, .. } => area,
        }
    }

    /// Free-text name, only present on `Other` entries
    pub fn name(&self) -> Option<&str> {
        match self {
            ItemEntry::Typed { .. } => None,
            ItemEntry::Other { name, .. } => Some(name.as_str()),
        }
    }

    pub fn slot(&self) -> Option<OtherSlot> {
        match self {
            ItemEntry::Typed { .. } => None,
            ItemEntry::Other { slot, .. } => Some(*slot),
        }
    }
}

/// JSON shape shared with rows written before the tagged model existed
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredItem {
    #[serde(default)]
    key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, deserialize_with = "area_from_any")]
    area: String,
}

impl From<StoredItem> for ItemEntry {
    fn from(item: StoredItem) -> Self {
        match OtherSlot::parse_key(&item.key) {
            Some(slot) => ItemEntry::Other {
                slot,
                name: item.name.unwrap_or_default(),
                area: item.area,
            },
            None => ItemEntry::Typed {
                key: item.key,
                area: item.area,
            },
        }
    }
}

impl From<ItemEntry> for StoredItem {
    fn from(entry: ItemEntry) -> Self {
        match entry {
            ItemEntry::Typed { key, area } => StoredItem {
                key,
                name: None,
                area,
            },
            ItemEntry::Other { slot, name, area } => StoredItem {
                key: slot.key(),
                name: Some(name),
                area,
            },
        }
    }
}

/// Older rows occasionally hold the area as a JSON number
fn area_from_any<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    })
}

/// Normalized, persisted value of a seeds/seedlings style field.
///
/// Never empty: an empty selection is `None` at the record level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalField(Vec<ItemEntry>);

impl CanonicalField {
    /// Wrap entries, mapping an empty list to `None`
    pub fn from_entries(entries: Vec<ItemEntry>) -> Option<Self> {
        if entries.is_empty() {
            None
        } else {
            Some(Self(entries))
        }
    }

    pub fn entries(&self) -> &[ItemEntry] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ItemEntry> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Area of the first typed entry with `key`
    pub fn area_of(&self, key: &str) -> Option<&str> {
        self.0.iter().find_map(|entry| match entry {
            ItemEntry::Typed { key: k, area } if k == key => Some(area.as_str()),
            _ => None,
        })
    }

    /// `(name, area)` of the entry occupying `slot`
    pub fn other_in(&self, slot: OtherSlot) -> Option<(&str, &str)> {
        self.0.iter().find_map(|entry| match entry {
            ItemEntry::Other { slot: s, name, area } if *s == slot => {
                Some((name.as_str(), area.as_str()))
            }
            _ => None,
        })
    }

    /// Encode for a nullable TEXT column
    pub fn to_column(field: Option<&Self>) -> Result<Option<String>> {
        field
            .map(|f| serde_json::to_string(f).map_err(Into::into))
            .transpose()
    }

    /// Decode a nullable TEXT column; `[]` and blank text read back as `None`
    pub fn from_column(raw: Option<&str>) -> Result<Option<Self>> {
        match raw.map(str::trim) {
            None | Some("") | Some("null") => Ok(None),
            Some(text) => {
                let entries: Vec<ItemEntry> = serde_json::from_str(text)?;
                Ok(Self::from_entries(entries))
            }
        }
    }
}

impl<'a> IntoIterator for &'a CanonicalField {
    type Item = &'a ItemEntry;
    type IntoIter = std::slice::Iter<'a, ItemEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_bounds() {
        assert!(OtherSlot::new(0).is_none());
        assert!(OtherSlot::new(5).is_none());
        assert_eq!(OtherSlot::new(4).map(|s| s.index()), Some(3));
        assert_eq!(OtherSlot::up_to(9).count(), MAX_OTHER_SLOTS);
    }

    #[test]
    fn test_parse_slot_key() {
        assert_eq!(OtherSlot::parse_key("other_2").map(OtherSlot::get), Some(2));
        assert!(OtherSlot::parse_key("other_5").is_none());
        assert!(OtherSlot::parse_key("other_").is_none());
        assert!(OtherSlot::parse_key("other_+1").is_none());
        assert!(OtherSlot::parse_key("other").is_none());
        assert!(OtherSlot::parse_key("tomato").is_none());
    }

    #[test]
    fn test_stored_shape() {
        let slot = OtherSlot::new(1).unwrap();
        let field = CanonicalField::from_entries(vec![
            ItemEntry::typed("tomato", "2.5"),
            ItemEntry::other(slot, "Basil", "1.0"),
        ])
        .unwrap();

        let json = CanonicalField::to_column(Some(&field)).unwrap().unwrap();
        assert_eq!(
            json,
            r#"[{"key":"tomato","area":"2.5"},{"key":"other_1","name":"Basil","area":"1.0"}]"#
        );
    }

    #[test]
    fn test_reads_historical_rows() {
        let raw = r#"[{"key":"onion","area":3},{"key":"other_3","name":"Укроп","area":"0,5"},{"key":"other_9","area":"1"}]"#;
        let field = CanonicalField::from_column(Some(raw)).unwrap().unwrap();

        assert_eq!(field.area_of("onion"), Some("3"));
        assert_eq!(field.other_in(OtherSlot::new(3).unwrap()), Some(("Укроп", "0,5")));
        // Out-of-range slot keys stay as drifted typed keys
        assert_eq!(field.area_of("other_9"), Some("1"));
    }

    #[test]
    fn test_empty_column_is_none() {
        assert!(CanonicalField::from_column(None).unwrap().is_none());
        assert!(CanonicalField::from_column(Some("[]")).unwrap().is_none());
        assert!(CanonicalField::from_column(Some("null")).unwrap().is_none());
        assert!(CanonicalField::to_column(None).unwrap().is_none());
    }
}
