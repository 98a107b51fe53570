//! # Anketa Common Library
//!
//! Survey pipeline shared by the Anketa services:
//! - Category catalogs with Tajik/Russian labels
//! - Entry normalizer (raw form items to canonical fields)
//! - Record projector (canonical fields to spreadsheet cells)
//! - Query filter/sort gate
//! - Export driver and per-survey layouts
//! - Survey records, submission validation, SQLite persistence
//! - Configuration loading

pub mod catalog;
pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod entry;
pub mod error;
pub mod export;
pub mod normalize;
pub mod projection;
pub mod query;
pub mod survey;

pub use catalog::{Catalog, CatalogSet, Locale};
pub use entry::{CanonicalField, ItemEntry, OtherSlot};
pub use error::{Error, Result, ValidationErrors};
pub use survey::{FarmSurvey, SurveyKind, WorkerSurvey};
