//! Query filter/sort gate
//!
//! Read-only refinement of an already loaded record collection: text
//! search, inclusive date range, exact-match filters and an allow-listed
//! sort. Nothing here touches the store; callers get back references into
//! the slice they passed in.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::normalize::normalize_date;

/// Sort field used whenever the requested one is not allowed
pub const DEFAULT_SORT_FIELD: &str = "created_at";

/// Request parameters that are not equality filters
const RESERVED_PARAMS: &[&str] = &["q", "date_from", "date_to", "sort", "order", "page", "per_page"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// `asc` only when spelled exactly so; anything else is `desc`
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("asc") => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Comparable projection of one attribute.
///
/// Variant order matters: `Missing` sorts before any value.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub enum SortKey {
    Missing,
    Int(i64),
    Number(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl SortKey {
    /// Case-insensitive text key
    pub fn text(value: &str) -> Self {
        SortKey::Text(value.to_lowercase())
    }

    pub fn optional_text(value: Option<&str>) -> Self {
        value.map(Self::text).unwrap_or(SortKey::Missing)
    }

    /// Numeric key from a decimal stored as text
    pub fn decimal(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.parse::<f64>().ok())
            .map(SortKey::Number)
            .unwrap_or(SortKey::Missing)
    }
}

/// Value an exact-match filter compares against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqualityValue<'a> {
    Text(Option<&'a str>),
    Flag(bool),
}

/// A record type the gate can refine
pub trait Filterable {
    /// Allow-listed sort fields (must contain DEFAULT_SORT_FIELD)
    const SORT_FIELDS: &'static [&'static str];
    /// Fields accepted as exact-match filters
    const EQUALITY_FIELDS: &'static [&'static str];
    /// Text fields whose distinct values are offered to filter UIs
    const FACET_FIELDS: &'static [&'static str];

    /// Attributes searched by the text filter
    fn search_text(&self) -> Vec<&str>;

    /// Attribute the date range applies to
    fn filter_date(&self) -> NaiveDate;

    /// Value of an equality field, `None` for fields the type does not have
    fn equality_value(&self, field: &str) -> Option<EqualityValue<'_>>;

    /// Sort key of an allow-listed field
    fn sort_key(&self, field: &str) -> SortKey;
}

/// Filter part of a list/export request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Filters {
    pub text: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub equality: BTreeMap<String, String>,
}

impl Filters {
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    pub fn equals(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.equality.insert(field.into(), value.into());
        self
    }

    /// Trimmed, lowercased search term; `None` when blank
    fn needle(&self) -> Option<String> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
    }

    /// True if the record passes every filter
    pub fn matches<R: Filterable>(&self, record: &R) -> bool {
        if let Some(needle) = self.needle() {
            let hit = record
                .search_text()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        let date = record.filter_date();
        if self.date_from.is_some_and(|from| date < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| date > to) {
            return false;
        }

        self.equality.iter().all(|(field, wanted)| {
            if wanted.is_empty() || !R::EQUALITY_FIELDS.contains(&field.as_str()) {
                return true;
            }
            match record.equality_value(field) {
                Some(EqualityValue::Text(actual)) => actual == Some(wanted.as_str()),
                Some(EqualityValue::Flag(actual)) => match parse_flag(wanted) {
                    Some(flag) => actual == flag,
                    None => true,
                },
                None => true,
            }
        })
    }
}

/// Sort part of a list/export request, already gated by the allow-list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Gate a requested field through the allow-list of `R`.
    /// Unknown fields fall back to DEFAULT_SORT_FIELD.
    pub fn resolve<R: Filterable>(field: Option<&str>, order: Option<&str>) -> Self {
        let field = match field {
            Some(f) if R::SORT_FIELDS.contains(&f) => f,
            Some(f) => {
                debug!("Sort field {} not allowed, using {}", f, DEFAULT_SORT_FIELD);
                DEFAULT_SORT_FIELD
            }
            None => DEFAULT_SORT_FIELD,
        };
        Self {
            field: field.to_string(),
            direction: SortDirection::parse(order),
        }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: DEFAULT_SORT_FIELD.to_string(),
            direction: SortDirection::Desc,
        }
    }
}

/// Filter then sort. Ties keep the input order.
pub fn apply<'r, R: Filterable>(records: &'r [R], filters: &Filters, sort: &SortSpec) -> Vec<&'r R> {
    let sort = SortSpec::resolve::<R>(Some(sort.field.as_str()), Some(sort.direction.as_str()));

    let mut selected: Vec<(SortKey, &R)> = records
        .iter()
        .filter(|r| filters.matches(*r))
        .map(|r| (r.sort_key(&sort.field), r))
        .collect();

    selected.sort_by(|(a, _), (b, _)| {
        let ord = a.partial_cmp(b).unwrap_or(Ordering::Equal);
        match sort.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });

    selected.into_iter().map(|(_, r)| r).collect()
}

/// Distinct non-empty values of every facet field, sorted
pub fn facets<R: Filterable>(records: &[R]) -> BTreeMap<String, Vec<String>> {
    R::FACET_FIELDS
        .iter()
        .map(|field| {
            let values: BTreeSet<String> = records
                .iter()
                .filter_map(|r| match r.equality_value(field) {
                    Some(EqualityValue::Text(Some(v))) if !v.trim().is_empty() => {
                        Some(v.to_string())
                    }
                    _ => None,
                })
                .collect();
            (field.to_string(), values.into_iter().collect())
        })
        .collect()
}

/// Accepts `1/0`, `true/false`, `yes/no`, `on/off`
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Full list/export request as it arrives in the query string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    pub filters: Filters,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl ListQuery {
    /// Build from raw query parameters. Unparseable dates and numbers are
    /// dropped rather than rejected.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let get = |k: &str| params.get(k).map(|v| v.trim()).filter(|v| !v.is_empty());

        let date = |k: &str| {
            get(k).and_then(|raw| match normalize_date(raw) {
                Ok(date) => Some(date),
                Err(e) => {
                    debug!("Ignoring {}: {}", k, e);
                    None
                }
            })
        };

        let equality = params
            .iter()
            .filter(|(k, v)| !RESERVED_PARAMS.contains(&k.as_str()) && !v.trim().is_empty())
            .map(|(k, v)| (k.clone(), v.trim().to_string()))
            .collect();

        Self {
            filters: Filters {
                text: get("q").map(str::to_string),
                date_from: date("date_from"),
                date_to: date("date_to"),
                equality,
            },
            sort: get("sort").map(str::to_string),
            order: get("order").map(str::to_string),
            page: get("page").and_then(|p| p.parse().ok()),
            per_page: get("per_page").and_then(|p| p.parse().ok()),
        }
    }

    /// Sort gated through the allow-list of `R`
    pub fn sort_for<R: Filterable>(&self) -> SortSpec {
        SortSpec::resolve::<R>(self.sort.as_deref(), self.order.as_deref())
    }
}
