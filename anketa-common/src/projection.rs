//! Record projector
//!
//! Flattens variable-length canonical fields into spreadsheet cells, either
//! as one human-readable string or as a fixed set of slot columns whose width
//! depends only on the catalog.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Locale, OTHER_KEY};
use crate::entry::{CanonicalField, ItemEntry, OtherSlot};

/// One output cell
pub type Cell = String;

/// How an `Other` entry is labelled in flattened output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtherLabel {
    /// Catalog "other" label ("Другое")
    #[default]
    Generic,
    /// Submitter's free-text name, generic label when the name is blank
    FreeText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    /// Single `label: area, label: area` cell
    FlattenedString,
    /// One cell per catalog category, then `(name, area)` per other slot
    FixedColumns,
}

/// Projects canonical fields of one catalog
#[derive(Debug, Clone, Copy)]
pub struct Projector<'a> {
    catalog: &'a Catalog,
    locale: Locale,
    other_label: OtherLabel,
}

impl<'a> Projector<'a> {
    pub fn new(catalog: &'a Catalog, locale: Locale) -> Self {
        Self {
            catalog,
            locale,
            other_label: OtherLabel::default(),
        }
    }

    pub fn with_other_label(mut self, other_label: OtherLabel) -> Self {
        self.other_label = other_label;
        self
    }

    /// Number of cells `project` returns for `mode`
    pub fn width(&self, mode: ProjectionMode) -> usize {
        match mode {
            ProjectionMode::FlattenedString => 1,
            ProjectionMode::FixedColumns => self.catalog.len() + 2 * self.catalog.other_slots(),
        }
    }

    pub fn project(&self, field: Option<&CanonicalField>, mode: ProjectionMode) -> Vec<Cell> {
        match mode {
            ProjectionMode::FlattenedString => vec![self.flatten(field)],
            ProjectionMode::FixedColumns => self.fixed_columns(field),
        }
    }

    /// `label: area` pairs joined with `", "`, in record order.
    /// Empty or missing fields give an empty string.
    pub fn flatten(&self, field: Option<&CanonicalField>) -> String {
        let Some(field) = field else {
            return String::new();
        };
        field
            .iter()
            .map(|entry| {
                let pair = format!("{}: {}", self.entry_label(entry), entry.area());
                pair.trim().to_string()
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Fixed-width slot columns.
    ///
    /// Keys no longer in the catalog are not represented; they only show up
    /// in flattened output.
    pub fn fixed_columns(&self, field: Option<&CanonicalField>) -> Vec<Cell> {
        let mut cells = Vec::with_capacity(self.width(ProjectionMode::FixedColumns));

        for key in self.catalog.keys() {
            let area = field.and_then(|f| f.area_of(key)).unwrap_or_default();
            cells.push(area.to_string());
        }

        for slot in OtherSlot::up_to(self.catalog.other_slots()) {
            let (name, area) = field.and_then(|f| f.other_in(slot)).unwrap_or(("", ""));
            cells.push(name.to_string());
            cells.push(area.to_string());
        }

        cells
    }

    fn entry_label<'s>(&'s self, entry: &'s ItemEntry) -> &'s str {
        match entry {
            ItemEntry::Typed { key, .. } => self.catalog.display(key, self.locale),
            ItemEntry::Other { name, .. } => {
                let generic = self.catalog.other_label(self.locale).unwrap_or(OTHER_KEY);
                match self.other_label {
                    OtherLabel::FreeText if !name.trim().is_empty() => name.trim(),
                    _ => generic,
                }
            }
        }
    }
}

/// Labels of a multi-select value, blanks removed
pub fn multi_select_labels(keys: &[String], catalog: &Catalog, locale: Locale) -> Vec<String> {
    keys.iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(|k| catalog.display(k, locale).to_string())
        .collect()
}

/// Multi-select value as exactly `width` cells (truncated or padded)
pub fn multi_select_columns(
    keys: &[String],
    catalog: &Catalog,
    locale: Locale,
    width: usize,
) -> Vec<Cell> {
    let mut cells = multi_select_labels(keys, catalog, locale);
    cells.truncate(width);
    cells.resize(width, String::new());
    cells
}

/// Multi-select value as one `", "`-joined cell
pub fn multi_select_joined(keys: &[String], catalog: &Catalog, locale: Locale) -> Cell {
    multi_select_labels(keys, catalog, locale).join(", ")
}

/// Split a comma-separated text column (income) into trimmed parts
pub fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|text| {
        text.split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

/// Localized yes/no cell
pub fn flag_label(flag: bool, locale: Locale) -> &'static str {
    match (locale, flag) {
        (Locale::Tg, true) => "Ҳа",
        (Locale::Tg, false) => "Не",
        (Locale::Ru, true) => "Да",
        (Locale::Ru, false) => "Нет",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin;

    fn sample() -> CanonicalField {
        CanonicalField::from_entries(vec![
            ItemEntry::typed("tomato", "2.5"),
            ItemEntry::other(OtherSlot::new(1).unwrap(), "Basil", "1.0"),
        ])
        .unwrap()
    }

    #[test]
    fn test_flatten_generic_and_free_text() {
        let catalog = builtin::seeds();
        let field = sample();

        let generic = Projector::new(&catalog, Locale::Ru);
        assert_eq!(generic.flatten(Some(&field)), "Помидор: 2.5, Другое: 1.0");

        let named = generic.with_other_label(OtherLabel::FreeText);
        assert_eq!(named.flatten(Some(&field)), "Помидор: 2.5, Basil: 1.0");
    }

    #[test]
    fn test_flatten_unknown_key_uses_raw_key() {
        let catalog = builtin::seeds();
        let field = CanonicalField::from_entries(vec![ItemEntry::typed("melon", "3")]).unwrap();
        assert_eq!(Projector::new(&catalog, Locale::Tg).flatten(Some(&field)), "melon: 3");
    }

    #[test]
    fn test_fixed_columns_ignores_drifted_key() {
        let catalog = builtin::seeds();
        let field = CanonicalField::from_entries(vec![
            ItemEntry::typed("melon", "3"),
            ItemEntry::typed("beet", "1"),
        ])
        .unwrap();
        let cells = Projector::new(&catalog, Locale::Tg).fixed_columns(Some(&field));
        assert_eq!(cells.len(), 14);
        assert_eq!(cells[4], "1");
        assert!(cells.iter().all(|c| c != "3"));
    }

    #[test]
    fn test_fixed_columns_width_without_other_section() {
        let catalog = builtin::irrigation();
        let projector = Projector::new(&catalog, Locale::Tg);
        assert_eq!(projector.width(ProjectionMode::FixedColumns), 4);
        assert_eq!(projector.fixed_columns(None), vec![""; 4]);
    }

    #[test]
    fn test_multi_select_columns() {
        let catalog = builtin::irrigation();
        let keys = vec!["canal".to_string(), "well".to_string()];
        assert_eq!(
            multi_select_columns(&keys, &catalog, Locale::Ru, 4),
            vec!["Канал / река", "Скважина", "", ""]
        );
        assert_eq!(multi_select_joined(&keys, &catalog, Locale::Tg), "Канал / дарё, Чоҳ");
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(Some("agriculture, pension,,")), vec!["agriculture", "pension"]);
        assert!(split_list(None).is_empty());
    }
}
