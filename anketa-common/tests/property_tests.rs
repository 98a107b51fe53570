//! Properties of the normalizer, projector and filter gate over arbitrary input

use anketa_common::catalog::{builtin, MAX_OTHER_SLOTS};
use anketa_common::normalize::{normalize, RawItem};
use anketa_common::projection::{ProjectionMode, Projector};
use anketa_common::query::{apply, Filterable, Filters, SortSpec};
use anketa_common::{Locale, OtherSlot, WorkerSurvey};
use proptest::prelude::*;

fn raw_item() -> impl Strategy<Value = RawItem> {
    let key = prop_oneof![
        Just(None),
        Just(Some(String::new())),
        Just(Some("tomato".to_string())),
        Just(Some("beet".to_string())),
        Just(Some("other".to_string())),
        Just(Some("other_3".to_string())),
        Just(Some("mango".to_string())),
    ];
    let area = prop_oneof![
        Just(None),
        Just(Some(String::new())),
        Just(Some("  ".to_string())),
        "[0-9]{1,3}(,[0-9]{1,2})?".prop_map(Some),
    ];
    let name = prop_oneof![Just(None), Just(Some(String::new())), "[a-zA-Zа-я]{1,8}".prop_map(Some)];
    (key, area, name).prop_map(|(key, area, name)| RawItem { key, area, name })
}

proptest! {
    #[test]
    fn prop_normalized_entries_have_area(raw in prop::collection::vec(raw_item(), 0..12)) {
        if let Some(field) = normalize(&raw, &builtin::seeds()) {
            prop_assert!(!field.is_empty());
            for entry in field.iter() {
                prop_assert!(!entry.area().trim().is_empty());
            }
        }
    }

    #[test]
    fn prop_other_slots_bounded_and_sequential(raw in prop::collection::vec(raw_item(), 0..12)) {
        if let Some(field) = normalize(&raw, &builtin::seeds()) {
            let slots: Vec<usize> = field.iter().filter_map(|e| e.slot()).map(OtherSlot::get).collect();
            prop_assert!(slots.len() <= MAX_OTHER_SLOTS);
            let expected: Vec<usize> = (1..=slots.len()).collect();
            prop_assert_eq!(slots, expected);
        }
    }

    #[test]
    fn prop_fixed_width_is_constant(raw in prop::collection::vec(raw_item(), 0..12)) {
        let catalog = builtin::seeds();
        let field = normalize(&raw, &catalog);
        let cells = Projector::new(&catalog, Locale::Tg).project(field.as_ref(), ProjectionMode::FixedColumns);
        prop_assert_eq!(cells.len(), catalog.len() + 2 * MAX_OTHER_SLOTS);
    }

    #[test]
    fn prop_other_slots_round_trip(names in prop::collection::vec("[a-z]{1,6}", 0..7)) {
        let catalog = builtin::seedlings();
        let raw: Vec<RawItem> = names
            .iter()
            .enumerate()
            .map(|(i, name)| RawItem::other(name, &format!("{}", i + 1)))
            .collect();
        let field = normalize(&raw, &catalog);
        let cells = Projector::new(&catalog, Locale::Ru).fixed_columns(field.as_ref());

        for slot in 0..MAX_OTHER_SLOTS {
            let name_cell = &cells[catalog.len() + 2 * slot];
            let area_cell = &cells[catalog.len() + 2 * slot + 1];
            match names.get(slot) {
                Some(name) => {
                    prop_assert_eq!(name_cell, name);
                    prop_assert_eq!(area_cell, &format!("{}", slot + 1));
                }
                None => {
                    prop_assert!(name_cell.is_empty());
                    prop_assert!(area_cell.is_empty());
                }
            }
        }
    }

    #[test]
    fn prop_unknown_sort_falls_back(field in "[a-z_]{0,20}", order in "[a-z]{0,5}") {
        let sort = SortSpec::resolve::<WorkerSurvey>(Some(field.as_str()), Some(order.as_str()));
        if !WorkerSurvey::SORT_FIELDS.contains(&field.as_str()) {
            prop_assert_eq!(sort.field, "created_at");
        }
    }
}

mod filtering {
    use super::*;
    use anketa_common::query::{EqualityValue, SortKey};
    use chrono::NaiveDate;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: i64,
        name: String,
        day: u32,
    }

    impl Filterable for Row {
        const SORT_FIELDS: &'static [&'static str] = &["created_at", "name"];
        const EQUALITY_FIELDS: &'static [&'static str] = &[];
        const FACET_FIELDS: &'static [&'static str] = &[];

        fn search_text(&self) -> Vec<&str> {
            vec![self.name.as_str()]
        }

        fn filter_date(&self) -> NaiveDate {
            NaiveDate::from_ymd_opt(2025, 1, self.day).unwrap()
        }

        fn equality_value(&self, _field: &str) -> Option<EqualityValue<'_>> {
            None
        }

        fn sort_key(&self, field: &str) -> SortKey {
            match field {
                "name" => SortKey::text(&self.name),
                _ => SortKey::Int(self.id),
            }
        }
    }

    fn rows() -> impl Strategy<Value = Vec<Row>> {
        prop::collection::vec(("[a-c]{1,3}", 1u32..=28), 0..20).prop_map(|items| {
            items
                .into_iter()
                .enumerate()
                .map(|(i, (name, day))| Row { id: i as i64, name, day })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_filtering_is_idempotent(rows in rows(), needle in "[a-c]{0,2}", from in 1u32..=28, span in 0u32..10) {
            let to = (from + span).min(28);
            let filters = Filters::default()
                .text(needle)
                .between(NaiveDate::from_ymd_opt(2025, 1, from), NaiveDate::from_ymd_opt(2025, 1, to));
            let sort = SortSpec::resolve::<Row>(Some("name"), Some("asc"));

            let once: Vec<Row> = apply(&rows, &filters, &sort).into_iter().cloned().collect();
            let twice: Vec<Row> = apply(&once, &filters, &sort).into_iter().cloned().collect();
            prop_assert_eq!(once, twice);
        }
    }
}
