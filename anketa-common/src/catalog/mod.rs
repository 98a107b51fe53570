//! Category catalogs and their localized label dictionaries
//!
//! A catalog is the fixed, ordered set of keys a form field may carry
//! (seed types, irrigation sources, ...) together with display labels for
//! every supported locale. Catalogs are plain values: export layouts and the
//! normalizer receive them as arguments, so several revisions or locales can
//! coexist in one process.

pub mod builtin;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Upper bound for free-text "other" slots in any catalog
pub const MAX_OTHER_SLOTS: usize = 4;

/// Key the forms submit for a free-text entry
pub const OTHER_KEY: &str = "other";

/// Display locale for labels and headers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Tajik
    #[default]
    Tg,
    /// Russian
    Ru,
}

impl Locale {
    pub fn code(&self) -> &'static str {
        match self {
            Locale::Tg => "tg",
            Locale::Ru => "ru",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tg" | "tj" => Ok(Locale::Tg),
            "ru" => Ok(Locale::Ru),
            other => Err(Error::InvalidInput(format!("Unknown locale: {}", other))),
        }
    }
}

/// Display strings for one catalog key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub tg: String,
    pub ru: String,
}

impl Labels {
    pub fn new(tg: impl Into<String>, ru: impl Into<String>) -> Self {
        Self {
            tg: tg.into(),
            ru: ru.into(),
        }
    }

    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::Tg => &self.tg,
            Locale::Ru => &self.ru,
        }
    }
}

/// One known category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub key: String,
    pub labels: Labels,
}

/// Free-text "other" section of a catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherSection {
    pub labels: Labels,
    /// Number of reserved `other_N` slots (1..=MAX_OTHER_SLOTS)
    pub slots: usize,
}

/// Ordered set of category keys with localized labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    name: String,
    revision: u32,
    entries: Vec<CatalogEntry>,
    other: Option<OtherSection>,
}

impl Catalog {
    pub fn new(name: impl Into<String>, revision: u32) -> Self {
        Self {
            name: name.into(),
            revision,
            entries: Vec::new(),
            other: None,
        }
    }

    /// Append a category. Keys are unique; a repeated key is ignored.
    pub fn entry(mut self, key: impl Into<String>, tg: &str, ru: &str) -> Self {
        let key = key.into();
        debug_assert!(!self.contains(&key), "duplicate catalog key {}", key);
        if !self.contains(&key) {
            self.entries.push(CatalogEntry {
                key,
                labels: Labels::new(tg, ru),
            });
        }
        self
    }

    /// Reserve free-text "other" slots, clamped into 1..=MAX_OTHER_SLOTS
    pub fn with_other(mut self, tg: &str, ru: &str, slots: usize) -> Self {
        self.other = Some(OtherSection {
            labels: Labels::new(tg, ru),
            slots: clamp_slots(slots),
        });
        self
    }

    /// Change the slot capacity of an existing "other" section.
    /// Catalogs without one are returned unchanged.
    pub fn with_other_slots(mut self, slots: usize) -> Self {
        if let Some(other) = self.other.as_mut() {
            other.slots = clamp_slots(slots);
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Number of fixed categories (the "other" section is not counted)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.key == key)
    }

    /// True if the key may be submitted for this field: a fixed category,
    /// or the literal `other` when the catalog has an "other" section.
    pub fn accepts(&self, key: &str) -> bool {
        self.contains(key) || (key == OTHER_KEY && self.other.is_some())
    }

    pub fn other(&self) -> Option<&OtherSection> {
        self.other.as_ref()
    }

    /// Reserved "other" slot count, 0 when the catalog has none
    pub fn other_slots(&self) -> usize {
        self.other.as_ref().map(|o| o.slots).unwrap_or(0)
    }

    pub fn other_label(&self, locale: Locale) -> Option<&str> {
        self.other.as_ref().map(|o| o.labels.get(locale))
    }

    /// Label for a key in the given locale, if the catalog knows it
    pub fn label(&self, key: &str, locale: Locale) -> Option<&str> {
        if let Some(entry) = self.entries.iter().find(|e| e.key == key) {
            return Some(entry.labels.get(locale));
        }
        if key == OTHER_KEY {
            return self.other_label(locale);
        }
        None
    }

    /// Label for a key, falling back to the raw key for unknown values
    pub fn display<'a>(&'a self, key: &'a str, locale: Locale) -> &'a str {
        self.label(key, locale).unwrap_or(key)
    }
}

fn clamp_slots(slots: usize) -> usize {
    slots.clamp(1, MAX_OTHER_SLOTS)
}

/// Every catalog the two survey variants use
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSet {
    pub seeds: Catalog,
    pub seedlings: Catalog,
    pub irrigation: Catalog,
    pub income: Catalog,
    pub experience: Catalog,
    pub equipment: Catalog,
}

impl CatalogSet {
    /// Catalogs shipped with the forms (revision 1)
    pub fn builtin() -> Self {
        Self {
            seeds: builtin::seeds(),
            seedlings: builtin::seedlings(),
            irrigation: builtin::irrigation(),
            income: builtin::income(),
            experience: builtin::experience(),
            equipment: builtin::equipment(),
        }
    }

    /// Apply one "other" capacity to every catalog that has an "other" section
    pub fn with_other_slots(self, slots: usize) -> Self {
        Self {
            seeds: self.seeds.with_other_slots(slots),
            seedlings: self.seedlings.with_other_slots(slots),
            ..self
        }
    }
}

impl Default for CatalogSet {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_lookup_and_fallback() {
        let catalog = builtin::seeds();
        assert_eq!(catalog.label("tomato", Locale::Ru), Some("Помидор"));
        assert_eq!(catalog.label("pepper", Locale::Tg), Some("Қаламфури булғорӣ"));
        assert_eq!(catalog.label("other", Locale::Ru), Some("Другое"));
        assert_eq!(catalog.label("mango", Locale::Ru), None);
        assert_eq!(catalog.display("mango", Locale::Ru), "mango");
    }

    #[test]
    fn test_accepts_other_only_with_section() {
        assert!(builtin::seeds().accepts("other"));
        assert!(!builtin::irrigation().accepts("other"));
        assert!(builtin::irrigation().accepts("canal"));
    }

    #[test]
    fn test_keys_keep_insertion_order() {
        let catalog = Catalog::new("t", 1).entry("a", "A", "A").entry("b", "B", "B");
        assert_eq!(catalog.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(catalog.position("b"), Some(1));
    }

    #[test]
    fn test_other_slots_clamped() {
        let catalog = builtin::seeds().with_other_slots(9);
        assert_eq!(catalog.other_slots(), MAX_OTHER_SLOTS);
        let catalog = catalog.with_other_slots(0);
        assert_eq!(catalog.other_slots(), 1);
        assert_eq!(builtin::irrigation().with_other_slots(3).other_slots(), 0);
    }

    #[test]
    fn test_locale_parse() {
        assert_eq!("RU".parse::<Locale>().unwrap(), Locale::Ru);
        assert_eq!("tg".parse::<Locale>().unwrap(), Locale::Tg);
        assert!("en".parse::<Locale>().is_err());
    }
}
