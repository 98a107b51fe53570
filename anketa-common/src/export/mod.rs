//! Export driver
//!
//! Turns a selection of records into a [`TabularDocument`]: one header row
//! plus one row per record, every row exactly as wide as the header. Each
//! survey kind provides two layouts over the same records:
//!
//! - full sheet: one column per atomic value (fixed slot columns)
//! - condensed document: one string column per multi-value field

pub mod farm;
pub mod worker;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{Catalog, CatalogSet, Locale};
use crate::entry::OtherSlot;
use crate::projection::{Cell, OtherLabel};
use crate::query::Filterable;
use crate::survey::SurveyKind;
use crate::{Error, Result};

/// Byte-order mark prepended to CSV output so spreadsheet tools read UTF-8
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Header row plus data rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabularDocument {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl TabularDocument {
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Encode as CSV (UTF-8 with BOM)
    pub fn to_csv(&self) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new().from_writer(UTF8_BOM.to_vec());
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer
            .into_inner()
            .map_err(|e| Error::Internal(format!("CSV writer flush failed: {}", e)))
    }
}

/// Which layout to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    FullSheet,
    Condensed,
}

/// Catalogs and labelling choices shared by every layout
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub catalogs: CatalogSet,
    pub other_label: OtherLabel,
}

/// A record kind with export layouts
pub trait Exportable: Filterable + Sized {
    const KIND: SurveyKind;

    fn full_sheet(records: &[&Self], options: &ExportOptions) -> Result<TabularDocument>;

    fn condensed(records: &[&Self], options: &ExportOptions) -> Result<TabularDocument>;
}

/// Build `layout` for already filtered and sorted records
pub fn render<R: Exportable>(records: &[&R], layout: Layout, options: &ExportOptions) -> Result<TabularDocument> {
    match layout {
        Layout::FullSheet => R::full_sheet(records, options),
        Layout::Condensed => R::condensed(records, options),
    }
}

/// Assemble a document, calling `row_builder` with a 1-based row counter.
///
/// A row whose width differs from the header is a bug in the layout and
/// fails the whole export.
pub fn export<'r, R, I, F>(
    title: &str,
    records: I,
    headers: Vec<String>,
    mut row_builder: F,
) -> Result<TabularDocument>
where
    R: 'r,
    I: IntoIterator<Item = &'r R>,
    F: FnMut(usize, &R) -> Vec<Cell>,
{
    let mut rows = Vec::new();
    for (i, record) in records.into_iter().enumerate() {
        let row = row_builder(i + 1, record);
        if row.len() != headers.len() {
            return Err(Error::Internal(format!(
                "{}: row {} has {} cells, header has {}",
                title,
                i + 1,
                row.len(),
                headers.len()
            )));
        }
        rows.push(row);
    }

    debug!("Exported {} rows x {} columns for {}", rows.len(), headers.len(), title);

    Ok(TabularDocument {
        title: title.to_string(),
        headers,
        rows,
    })
}

/// Headers of a fixed-columns projection: `label, unit` per category, then
/// `(name, unit)` per other slot
pub(crate) fn slot_headers(
    catalog: &Catalog,
    locale: Locale,
    unit: &str,
    other_name: impl Fn(OtherSlot) -> String,
) -> Vec<String> {
    let mut headers: Vec<String> = catalog
        .entries()
        .iter()
        .map(|entry| format!("{}, {}", entry.labels.get(locale), unit))
        .collect();
    for slot in OtherSlot::up_to(catalog.other_slots()) {
        headers.push(other_name(slot));
        headers.push(unit.to_string());
    }
    headers
}

/// Numbered headers for a column group of fixed width
pub(crate) fn numbered_headers(prefix: &str, count: usize) -> Vec<String> {
    (1..=count).map(|n| format!("{} {}", prefix, n)).collect()
}

/// Integer cell
pub(crate) fn int_cell(value: i64) -> Cell {
    value.to_string()
}

pub(crate) fn opt_cell(value: Option<&str>) -> Cell {
    value.unwrap_or_default().to_string()
}
