//! Survey records and submissions
//!
//! Two variants share most of their shape:
//! - [`worker`]: individual agricultural worker
//! - [`farm`]: farm-household (dehqan farm) leader

pub mod farm;
pub mod validation;
pub mod worker;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub use farm::{FarmSubmission, FarmSurvey};
pub use worker::{WorkerSubmission, WorkerSurvey};

/// Which form a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyKind {
    Worker,
    Farm,
}

impl SurveyKind {
    pub fn table(&self) -> &'static str {
        match self {
            SurveyKind::Worker => "worker_surveys",
            SurveyKind::Farm => "farm_surveys",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SurveyKind::Worker => "Анкеты (Работницы)",
            SurveyKind::Farm => "Анкеты (Дехканские хозяйства)",
        }
    }
}

/// Storage/beekeeping/refrigeration answers.
///
/// A storage area only exists together with `has_storage`; the constructor
/// drops it otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Facilities {
    beekeeping: bool,
    has_storage: bool,
    storage_area_sqm: Option<i64>,
    has_refrigerator: bool,
}

impl Facilities {
    pub fn new(
        beekeeping: bool,
        has_storage: bool,
        storage_area_sqm: Option<i64>,
        has_refrigerator: bool,
    ) -> Self {
        Self {
            beekeeping,
            has_storage,
            storage_area_sqm: if has_storage { storage_area_sqm } else { None },
            has_refrigerator,
        }
    }

    pub fn beekeeping(&self) -> bool {
        self.beekeeping
    }

    pub fn has_storage(&self) -> bool {
        self.has_storage
    }

    pub fn storage_area_sqm(&self) -> Option<i64> {
        self.storage_area_sqm
    }

    pub fn has_refrigerator(&self) -> bool {
        self.has_refrigerator
    }
}

/// Booleans arrive as `true`, `1`, `"1"`, `"on"`, `"yes"` from the forms
pub(crate) fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
        Value::String(s) => crate::query::parse_flag(&s).unwrap_or(false),
        _ => false,
    })
}

/// Text field that may be posted as a JSON number
pub(crate) fn flexible_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Integer field that may be posted as text. Non-numeric text becomes
/// `Some(Err(text))` so validation can report it.
pub(crate) fn flexible_int<'de, D>(deserializer: D) -> Result<Option<IntInput>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => Some(match n.as_i64() {
            Some(v) => IntInput::Value(v),
            None => IntInput::Invalid(n.to_string()),
        }),
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(match s.trim().parse::<i64>() {
            Ok(v) => IntInput::Value(v),
            Err(_) => IntInput::Invalid(s),
        }),
        _ => None,
    })
}

/// Integer as submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntInput {
    Value(i64),
    Invalid(String),
}

impl IntInput {
    pub fn value(&self) -> Option<i64> {
        match self {
            IntInput::Value(v) => Some(*v),
            IntInput::Invalid(_) => None,
        }
    }
}

impl From<i64> for IntInput {
    fn from(v: i64) -> Self {
        IntInput::Value(v)
    }
}

/// Trimmed text, `None` when blank
pub(crate) fn clean_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_area_requires_storage() {
        let f = Facilities::new(false, false, Some(40), true);
        assert_eq!(f.storage_area_sqm(), None);
        let f = Facilities::new(false, true, Some(40), true);
        assert_eq!(f.storage_area_sqm(), Some(40));
    }

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "flexible_bool")]
        flag: bool,
        #[serde(default, deserialize_with = "flexible_int")]
        count: Option<IntInput>,
        #[serde(default, deserialize_with = "flexible_text")]
        text: Option<String>,
    }

    #[test]
    fn test_flexible_inputs() {
        let p: Probe = serde_json::from_str(r#"{"flag":"on","count":"12","text":1.5}"#).unwrap();
        assert!(p.flag);
        assert_eq!(p.count, Some(IntInput::Value(12)));
        assert_eq!(p.text.as_deref(), Some("1.5"));

        let p: Probe = serde_json::from_str(r#"{"flag":0,"count":"twelve"}"#).unwrap();
        assert!(!p.flag);
        assert_eq!(p.count, Some(IntInput::Invalid("twelve".into())));
        assert!(p.text.is_none());
    }
}
