//! Farm-household leader survey

use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::validation::{self, present, MAX_NAME_TEXT, MAX_SHORT_TEXT};
use super::{clean_text, flexible_bool, flexible_int, flexible_text, Facilities, IntInput};
use crate::catalog::builtin::EQUIPMENT_OTHER;
use crate::catalog::CatalogSet;
use crate::entry::CanonicalField;
use crate::error::ValidationErrors;
use crate::normalize::{normalize, normalize_multi_select, RawItem};
use crate::query::{EqualityValue, Filterable, SortKey};
use crate::Result;

const LEADER_AGE: std::ops::RangeInclusive<i64> = 18..=100;

/// Stored farm survey
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FarmSurvey {
    pub id: i64,
    pub operator: Option<String>,
    pub meeting_date: NaiveDate,
    pub rayon: String,
    pub jamoat: String,
    pub selo: Option<String>,
    pub accept: bool,
    pub farm_name: String,
    pub leader_full_name: String,
    pub leader_age: i64,
    pub leader_phone: String,
    pub farm_plot_ha: Option<String>,
    pub agriculture_experience: String,
    pub seeds: Option<CanonicalField>,
    pub seedlings: Option<CanonicalField>,
    pub equipment_choice: String,
    /// Only set when `equipment_choice` is `other`
    pub equipment_other_text: Option<String>,
    pub irrigation_sources: Vec<String>,
    #[serde(flatten)]
    pub facilities: Facilities,
    pub signature: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Farm form as posted
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FarmSubmission {
    #[serde(default, deserialize_with = "flexible_text")]
    pub meeting_date: Option<String>,
    #[serde(default, deserialize_with = "flexible_text")]
    pub rayon: Option<String>,
    #[serde(default, deserialize_with = "flexible_text")]
    pub jamoat: Option<String>,
    #[serde(default, deserialize_with = "flexible_text")]
    pub selo: Option<String>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub accept: bool,
    #[serde(default, deserialize_with = "flexible_text")]
    pub farm_name: Option<String>,
    #[serde(default, deserialize_with = "flexible_text")]
    pub leader_full_name: Option<String>,
    #[serde(default, deserialize_with = "flexible_int")]
    pub leader_age: Option<IntInput>,
    #[serde(default, deserialize_with = "flexible_text")]
    pub leader_phone: Option<String>,
    #[serde(default, deserialize_with = "flexible_text")]
    pub farm_plot_ha: Option<String>,
    #[serde(default, deserialize_with = "flexible_text")]
    pub agriculture_experience: Option<String>,
    #[serde(default)]
    pub seeds: Option<Vec<RawItem>>,
    #[serde(default)]
    pub seedlings: Option<Vec<RawItem>>,
    #[serde(default, deserialize_with = "flexible_text")]
    pub equipment_choice: Option<String>,
    #[serde(default, deserialize_with = "flexible_text")]
    pub equipment_other_text: Option<String>,
    #[serde(default)]
    pub irrigation_sources: Option<Vec<String>>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub beekeeping: bool,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub has_storage: bool,
    #[serde(default, deserialize_with = "flexible_int")]
    pub storage_area_sqm: Option<IntInput>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub has_refrigerator: bool,
    #[serde(default, deserialize_with = "flexible_text")]
    pub signature: Option<String>,
}

impl FarmSubmission {
    /// Validate, then normalize into a record ready for insertion (`id == 0`)
    pub fn into_record(self, catalogs: &CatalogSet, operator: Option<String>) -> Result<FarmSurvey> {
        let mut errors = ValidationErrors::new();
        let e = &mut errors;

        let meeting_date = validation::meeting_date(e, self.meeting_date.as_deref());
        let rayon = validation::required_text(e, "rayon", self.rayon.as_deref(), MAX_SHORT_TEXT);
        let jamoat = validation::required_text(e, "jamoat", self.jamoat.as_deref(), MAX_SHORT_TEXT);
        let selo = validation::optional_text(e, "selo", self.selo.as_deref(), MAX_SHORT_TEXT);
        validation::accepted(e, self.accept);

        let farm_name = validation::required_text(e, "farm_name", self.farm_name.as_deref(), MAX_NAME_TEXT);
        let leader_full_name = validation::required_text(
            e,
            "leader_full_name",
            self.leader_full_name.as_deref(),
            MAX_NAME_TEXT,
        );
        let leader_age = validation::int_in_range(e, "leader_age", self.leader_age.as_ref(), LEADER_AGE, true);
        let leader_phone = validation::phone(e, "leader_phone", self.leader_phone.as_deref());
        let farm_plot_ha = validation::decimal(e, "farm_plot_ha", self.farm_plot_ha.as_deref());

        let experience = validation::catalog_key(
            e,
            "agriculture_experience",
            self.agriculture_experience.as_deref(),
            &catalogs.experience,
        );

        let seeds = self.seeds.unwrap_or_default();
        let seedlings = self.seedlings.unwrap_or_default();
        validation::items(e, "seeds", &seeds, &catalogs.seeds);
        validation::items(e, "seedlings", &seedlings, &catalogs.seedlings);

        let equipment = validation::catalog_key(
            e,
            "equipment_choice",
            self.equipment_choice.as_deref(),
            &catalogs.equipment,
        );
        let equipment_other_text = if equipment.as_deref() == Some(EQUIPMENT_OTHER) {
            let text = validation::optional_text(
                e,
                "equipment_other_text",
                self.equipment_other_text.as_deref(),
                MAX_SHORT_TEXT,
            );
            if clean_text(self.equipment_other_text.as_deref()).is_none() {
                e.add(
                    "equipment_other_text",
                    "Укажите название техники в поле «Другое».",
                );
            }
            text
        } else {
            None
        };

        validation::multi_select(
            e,
            "irrigation_sources",
            self.irrigation_sources.as_deref(),
            &catalogs.irrigation,
        );
        let storage_area = validation::storage_area(e, self.has_storage, self.storage_area_sqm.as_ref());
        let signature = validation::optional_text(e, "signature", self.signature.as_deref(), MAX_NAME_TEXT);

        if !errors.is_empty() {
            debug!("Farm submission rejected: {}", errors);
        }
        errors.into_result()?;

        Ok(FarmSurvey {
            id: 0,
            operator: clean_text(operator.as_deref()),
            meeting_date: present(meeting_date, "meeting_date")?,
            rayon: present(rayon, "rayon")?,
            jamoat: present(jamoat, "jamoat")?,
            selo,
            accept: self.accept,
            farm_name: present(farm_name, "farm_name")?,
            leader_full_name: present(leader_full_name, "leader_full_name")?,
            leader_age: present(leader_age, "leader_age")?,
            leader_phone: present(leader_phone, "leader_phone")?,
            farm_plot_ha,
            agriculture_experience: present(experience, "agriculture_experience")?,
            seeds: normalize(&seeds, &catalogs.seeds),
            seedlings: normalize(&seedlings, &catalogs.seedlings),
            equipment_choice: present(equipment, "equipment_choice")?,
            equipment_other_text,
            irrigation_sources: normalize_multi_select(
                self.irrigation_sources.as_deref().unwrap_or_default(),
                &catalogs.irrigation,
            ),
            facilities: Facilities::new(
                self.beekeeping,
                self.has_storage,
                storage_area,
                self.has_refrigerator,
            ),
            signature,
            created_at: Utc::now().naive_utc(),
        })
    }
}

impl Filterable for FarmSurvey {
    const SORT_FIELDS: &'static [&'static str] = &[
        "created_at",
        "meeting_date",
        "farm_name",
        "leader_full_name",
        "leader_age",
        "rayon",
        "jamoat",
        "farm_plot_ha",
        "equipment_choice",
    ];
    const EQUALITY_FIELDS: &'static [&'static str] = &[
        "experience",
        "equipment_choice",
        "rayon",
        "jamoat",
        "beekeeping",
        "has_storage",
        "has_refrigerator",
    ];
    const FACET_FIELDS: &'static [&'static str] = &["rayon", "jamoat", "experience", "equipment_choice"];

    fn search_text(&self) -> Vec<&str> {
        let mut fields = vec![
            self.farm_name.as_str(),
            self.leader_full_name.as_str(),
            self.leader_phone.as_str(),
            self.rayon.as_str(),
            self.jamoat.as_str(),
            self.equipment_choice.as_str(),
            self.agriculture_experience.as_str(),
        ];
        if let Some(selo) = self.selo.as_deref() {
            fields.push(selo);
        }
        fields
    }

    fn filter_date(&self) -> NaiveDate {
        self.meeting_date
    }

    fn equality_value(&self, field: &str) -> Option<EqualityValue<'_>> {
        let value = match field {
            "experience" => EqualityValue::Text(Some(&self.agriculture_experience)),
            "equipment_choice" => EqualityValue::Text(Some(&self.equipment_choice)),
            "rayon" => EqualityValue::Text(Some(&self.rayon)),
            "jamoat" => EqualityValue::Text(Some(&self.jamoat)),
            "beekeeping" => EqualityValue::Flag(self.facilities.beekeeping()),
            "has_storage" => EqualityValue::Flag(self.facilities.has_storage()),
            "has_refrigerator" => EqualityValue::Flag(self.facilities.has_refrigerator()),
            _ => return None,
        };
        Some(value)
    }

    fn sort_key(&self, field: &str) -> SortKey {
        match field {
            "meeting_date" => SortKey::Date(self.meeting_date),
            "farm_name" => SortKey::text(&self.farm_name),
            "leader_full_name" => SortKey::text(&self.leader_full_name),
            "leader_age" => SortKey::Int(self.leader_age),
            "rayon" => SortKey::text(&self.rayon),
            "jamoat" => SortKey::text(&self.jamoat),
            "farm_plot_ha" => SortKey::decimal(self.farm_plot_ha.as_deref()),
            "equipment_choice" => SortKey::text(&self.equipment_choice),
            _ => SortKey::DateTime(self.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    fn submission(overrides: serde_json::Value) -> FarmSubmission {
        let mut base = json!({
            "meeting_date": "07.03.2025",
            "rayon": "Рудаки",
            "jamoat": "Чимтеппа",
            "accept": true,
            "farm_name": "ДХ Бахор",
            "leader_full_name": "Каримов Азиз",
            "leader_age": 45,
            "leader_phone": "93 555 44 33",
            "farm_plot_ha": "12,5",
            "agriculture_experience": "садоводство",
            "seedlings": [{"key": "apple", "area": "3"}],
            "equipment_choice": "freza",
            "equipment_other_text": "Трактор",
            "irrigation_sources": [],
            "beekeeping": "on",
            "has_storage": true,
            "storage_area_sqm": "40",
            "has_refrigerator": 0
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), overrides.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(base).unwrap()
    }

    fn validation_errors(err: Error) -> ValidationErrors {
        match err {
            Error::Validation(errors) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_submission() {
        let record = submission(json!({})).into_record(&CatalogSet::builtin(), None).unwrap();
        assert_eq!(record.meeting_date, NaiveDate::from_ymd_opt(2025, 3, 7).unwrap());
        assert_eq!(record.leader_phone, "935554433");
        assert_eq!(record.farm_plot_ha.as_deref(), Some("12.50"));
        assert_eq!(record.equipment_other_text, None);
        assert!(record.irrigation_sources.is_empty());
        assert!(record.seeds.is_none());
        assert_eq!(record.facilities.storage_area_sqm(), Some(40));
        assert!(record.facilities.beekeeping());
        assert!(!record.facilities.has_refrigerator());
    }

    #[test]
    fn test_other_equipment_requires_text() {
        let err = submission(json!({"equipment_choice": "other", "equipment_other_text": " "}))
            .into_record(&CatalogSet::builtin(), None)
            .unwrap_err();
        assert!(validation_errors(err).has("equipment_other_text"));

        let record = submission(json!({"equipment_choice": "other"}))
            .into_record(&CatalogSet::builtin(), None)
            .unwrap();
        assert_eq!(record.equipment_other_text.as_deref(), Some("Трактор"));
    }

    #[test]
    fn test_leader_must_be_adult() {
        let err = submission(json!({"leader_age": 17}))
            .into_record(&CatalogSet::builtin(), None)
            .unwrap_err();
        assert!(validation_errors(err).has("leader_age"));
    }

    #[test]
    fn test_flag_equality() {
        let record = submission(json!({})).into_record(&CatalogSet::builtin(), None).unwrap();
        assert_eq!(record.equality_value("has_storage"), Some(EqualityValue::Flag(true)));
        assert_eq!(record.equality_value("income"), None);
        assert_eq!(record.sort_key("leader_age"), SortKey::Int(45));
    }
}
