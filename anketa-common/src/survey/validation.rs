//! Submission validation
//!
//! Each check records its message into a shared [`ValidationErrors`] and
//! returns the cleaned value, so one pass reports every problem at once.

use std::ops::RangeInclusive;

use chrono::NaiveDate;

use super::IntInput;
use crate::catalog::Catalog;
use crate::error::ValidationErrors;
use crate::{Error, Result};
use crate::normalize::{normalize_date, normalize_decimal, normalize_phone, RawItem};

/// Phone numbers are stored as exactly this many digits
pub const PHONE_DIGITS: usize = 9;
/// Longest accepted area string for a seeds/seedlings item
pub const MAX_AREA_LEN: usize = 20;
/// Location and short free-text fields
pub const MAX_SHORT_TEXT: usize = 120;
/// Names
pub const MAX_NAME_TEXT: usize = 200;

const MSG_REQUIRED: &str = "Обязательное поле.";

pub(crate) fn required_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Option<String> {
    match super::clean_text(value) {
        None => {
            errors.add(field, MSG_REQUIRED);
            None
        }
        Some(text) => check_length(errors, field, text, max),
    }
}

pub(crate) fn optional_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Option<String> {
    super::clean_text(value).and_then(|text| check_length(errors, field, text, max))
}

fn check_length(errors: &mut ValidationErrors, field: &str, text: String, max: usize) -> Option<String> {
    if text.chars().count() > max {
        errors.add(field, format!("Не более {} символов.", max));
        None
    } else {
        Some(text)
    }
}

pub(crate) fn accepted(errors: &mut ValidationErrors, accept: bool) {
    if !accept {
        errors.add("accept", "Необходимо согласие на участие.");
    }
}

pub(crate) fn phone(errors: &mut ValidationErrors, field: &str, raw: Option<&str>) -> Option<String> {
    let digits = normalize_phone(raw.unwrap_or_default());
    if digits.len() == PHONE_DIGITS {
        Some(digits)
    } else {
        errors.add(field, "Номер телефона должен содержать ровно 9 цифр.");
        None
    }
}

pub(crate) fn meeting_date(errors: &mut ValidationErrors, raw: Option<&str>) -> Option<NaiveDate> {
    match super::clean_text(raw) {
        None => {
            errors.add("meeting_date", MSG_REQUIRED);
            None
        }
        Some(text) => match normalize_date(&text) {
            Ok(date) => Some(date),
            Err(_) => {
                errors.add("meeting_date", "Некорректная дата.");
                None
            }
        },
    }
}

/// Integer within `range`; a missing value is an error only when `required`
pub(crate) fn int_in_range(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&IntInput>,
    range: RangeInclusive<i64>,
    required: bool,
) -> Option<i64> {
    match value {
        None => {
            if required {
                errors.add(field, MSG_REQUIRED);
            }
            None
        }
        Some(IntInput::Invalid(_)) => {
            errors.add(field, "Должно быть целым числом.");
            None
        }
        Some(IntInput::Value(v)) if !range.contains(v) => {
            errors.add(
                field,
                format!("Значение должно быть от {} до {}.", range.start(), range.end()),
            );
            None
        }
        Some(IntInput::Value(v)) => Some(*v),
    }
}

/// Non-negative decimal rendered with two places; blank is fine
pub(crate) fn decimal(errors: &mut ValidationErrors, field: &str, raw: Option<&str>) -> Option<String> {
    match normalize_decimal(raw) {
        Ok(Some(value)) if value.starts_with('-') => {
            errors.add(field, "Значение не может быть отрицательным.");
            None
        }
        Ok(value) => value,
        Err(_) => {
            errors.add(field, "Должно быть числом.");
            None
        }
    }
}

/// Required single choice from a catalog
pub(crate) fn catalog_key(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    catalog: &Catalog,
) -> Option<String> {
    match super::clean_text(value) {
        None => {
            errors.add(field, MSG_REQUIRED);
            None
        }
        Some(key) if catalog.contains(&key) => Some(key),
        Some(_) => {
            errors.add(field, "Недопустимое значение.");
            None
        }
    }
}

/// Seeds/seedlings items: keys from the catalog (or `other`), short areas.
/// Incomplete items are left for the normalizer to drop.
pub(crate) fn items(errors: &mut ValidationErrors, field: &str, raw: &[RawItem], catalog: &Catalog) {
    for (i, item) in raw.iter().enumerate() {
        if let Some(key) = item.key.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            if !catalog.accepts(key) {
                errors.add(format!("{}.{}.key", field, i), "Недопустимое значение.");
            }
        }
        if let Some(area) = item.area.as_deref() {
            if area.chars().count() > MAX_AREA_LEN {
                errors.add(
                    format!("{}.{}.area", field, i),
                    format!("Не более {} символов.", MAX_AREA_LEN),
                );
            }
        }
    }
}

/// Required multi-select; may be an empty list but must be present
pub(crate) fn multi_select(
    errors: &mut ValidationErrors,
    field: &str,
    keys: Option<&[String]>,
    catalog: &Catalog,
) {
    match keys {
        None => errors.add(field, MSG_REQUIRED),
        Some(keys) => {
            for (i, key) in keys.iter().enumerate() {
                let key = key.trim();
                if !key.is_empty() && !catalog.contains(key) {
                    errors.add(format!("{}.{}", field, i), "Недопустимое значение.");
                }
            }
        }
    }
}

/// Storage area is required (and non-negative) when the respondent has storage
pub(crate) fn storage_area(
    errors: &mut ValidationErrors,
    has_storage: bool,
    value: Option<&IntInput>,
) -> Option<i64> {
    if !has_storage {
        return None;
    }
    let area = int_in_range(errors, "storage_area_sqm", value, 0..=i64::from(u32::MAX), false);
    if value.is_none() {
        errors.add("storage_area_sqm", "Укажите площадь склада (м²).");
    }
    area
}

/// Unwrap a value whose check already passed
pub(crate) fn present<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| Error::Internal(format!("{} missing after validation", field)))
}
