//! Individual worker survey

use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::validation::{self, present, MAX_NAME_TEXT, MAX_SHORT_TEXT};
use super::{clean_text, flexible_bool, flexible_int, flexible_text, Facilities, IntInput};
use crate::catalog::CatalogSet;
use crate::entry::CanonicalField;
use crate::error::ValidationErrors;
use crate::normalize::{normalize, normalize_multi_select, RawItem};
use crate::query::{EqualityValue, Filterable, SortKey};
use crate::Result;

const WORKER_AGE: std::ops::RangeInclusive<i64> = 1..=100;
const HOUSEHOLD_COUNT: std::ops::RangeInclusive<i64> = 0..=1000;

/// Stored worker survey
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerSurvey {
    pub id: i64,
    pub operator: Option<String>,
    pub meeting_date: NaiveDate,
    pub rayon: String,
    pub jamoat: String,
    pub selo: Option<String>,
    pub accept: bool,
    pub full_name: String,
    pub age: i64,
    pub phone: String,
    pub family_count: i64,
    pub children_count: i64,
    pub elderly_count: i64,
    pub able_count: i64,
    /// Comma-separated income keys
    pub income: String,
    pub plot_ha: Option<String>,
    pub agriculture_experience: String,
    pub seeds: Option<CanonicalField>,
    pub seedlings: Option<CanonicalField>,
    pub irrigation_sources: Vec<String>,
    #[serde(flatten)]
    pub facilities: Facilities,
    pub created_at: NaiveDateTime,
}

/// Worker form as posted
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkerSubmission {
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
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "flexible_int")]
    pub age: Option<IntInput>,
    #[serde(default, deserialize_with = "flexible_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "flexible_int")]
    pub family_count: Option<IntInput>,
    #[serde(default, deserialize_with = "flexible_int")]
    pub children_count: Option<IntInput>,
    #[serde(default, deserialize_with = "flexible_int")]
    pub elderly_count: Option<IntInput>,
    #[serde(default, deserialize_with = "flexible_int")]
    pub able_count: Option<IntInput>,
    #[serde(default, deserialize_with = "flexible_text")]
    pub income: Option<String>,
    #[serde(default, deserialize_with = "flexible_text")]
    pub plot_ha: Option<String>,
    #[serde(default, deserialize_with = "flexible_text")]
    pub agriculture_experience: Option<String>,
    #[serde(default)]
    pub seeds: Option<Vec<RawItem>>,
    #[serde(default)]
    pub seedlings: Option<Vec<RawItem>>,
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
}

impl WorkerSubmission {
    /// Validate, then normalize into a record ready for insertion.
    ///
    /// The returned record has `id == 0`; the store assigns the real one.
    pub fn into_record(self, catalogs: &CatalogSet, operator: Option<String>) -> Result<WorkerSurvey> {
        let mut errors = ValidationErrors::new();
        let e = &mut errors;

        let meeting_date = validation::meeting_date(e, self.meeting_date.as_deref());
        let rayon = validation::required_text(e, "rayon", self.rayon.as_deref(), MAX_SHORT_TEXT);
        let jamoat = validation::required_text(e, "jamoat", self.jamoat.as_deref(), MAX_SHORT_TEXT);
        let selo = validation::optional_text(e, "selo", self.selo.as_deref(), MAX_SHORT_TEXT);
        validation::accepted(e, self.accept);

        let full_name =
            validation::required_text(e, "full_name", self.full_name.as_deref(), MAX_NAME_TEXT);
        let age = validation::int_in_range(e, "age", self.age.as_ref(), WORKER_AGE, true);
        let phone = validation::phone(e, "phone", self.phone.as_deref());

        let family_count =
            validation::int_in_range(e, "family_count", self.family_count.as_ref(), HOUSEHOLD_COUNT, true);
        let children_count =
            validation::int_in_range(e, "children_count", self.children_count.as_ref(), HOUSEHOLD_COUNT, false);
        let elderly_count =
            validation::int_in_range(e, "elderly_count", self.elderly_count.as_ref(), HOUSEHOLD_COUNT, false);
        let able_count =
            validation::int_in_range(e, "able_count", self.able_count.as_ref(), HOUSEHOLD_COUNT, false);
        if let Some(total) = family_count {
            let members = children_count.unwrap_or(0) + elderly_count.unwrap_or(0) + able_count.unwrap_or(0);
            if members > total {
                e.add(
                    "family_count",
                    "Сумма детей, пожилых и трудоспособных превышает численность семьи.",
                );
            }
        }

        let income = validation::required_text(e, "income", self.income.as_deref(), MAX_SHORT_TEXT);
        let plot_ha = validation::decimal(e, "plot_ha", self.plot_ha.as_deref());
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
        validation::multi_select(
            e,
            "irrigation_sources",
            self.irrigation_sources.as_deref(),
            &catalogs.irrigation,
        );
        let storage_area = validation::storage_area(e, self.has_storage, self.storage_area_sqm.as_ref());

        if !errors.is_empty() {
            debug!("Worker submission rejected: {}", errors);
        }
        errors.into_result()?;

        Ok(WorkerSurvey {
            id: 0,
            operator: clean_text(operator.as_deref()),
            meeting_date: present(meeting_date, "meeting_date")?,
            rayon: present(rayon, "rayon")?,
            jamoat: present(jamoat, "jamoat")?,
            selo,
            accept: self.accept,
            full_name: present(full_name, "full_name")?,
            age: present(age, "age")?,
            phone: present(phone, "phone")?,
            family_count: present(family_count, "family_count")?,
            children_count: children_count.unwrap_or(0),
            elderly_count: elderly_count.unwrap_or(0),
            able_count: able_count.unwrap_or(0),
            income: present(income, "income")?,
            plot_ha,
            agriculture_experience: present(experience, "agriculture_experience")?,
            seeds: normalize(&seeds, &catalogs.seeds),
            seedlings: normalize(&seedlings, &catalogs.seedlings),
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
            created_at: Utc::now().naive_utc(),
        })
    }
}

impl Filterable for WorkerSurvey {
    const SORT_FIELDS: &'static [&'static str] = &[
        "created_at",
        "meeting_date",
        "full_name",
        "age",
        "rayon",
        "jamoat",
        "income",
        "plot_ha",
    ];
    const EQUALITY_FIELDS: &'static [&'static str] = &["experience", "income", "rayon", "jamoat"];
    const FACET_FIELDS: &'static [&'static str] = &["rayon", "jamoat", "experience", "income"];

    fn search_text(&self) -> Vec<&str> {
        let mut fields = vec![
            self.full_name.as_str(),
            self.rayon.as_str(),
            self.jamoat.as_str(),
            self.phone.as_str(),
            self.income.as_str(),
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
            "experience" => self.agriculture_experience.as_str(),
            "income" => self.income.as_str(),
            "rayon" => self.rayon.as_str(),
            "jamoat" => self.jamoat.as_str(),
            _ => return None,
        };
        Some(EqualityValue::Text(Some(value)))
    }

    fn sort_key(&self, field: &str) -> SortKey {
        match field {
            "meeting_date" => SortKey::Date(self.meeting_date),
            "full_name" => SortKey::text(&self.full_name),
            "age" => SortKey::Int(self.age),
            "rayon" => SortKey::text(&self.rayon),
            "jamoat" => SortKey::text(&self.jamoat),
            "income" => SortKey::text(&self.income),
            "plot_ha" => SortKey::decimal(self.plot_ha.as_deref()),
            _ => SortKey::DateTime(self.created_at),
        }
    }
}
