//! Survey inserts and reads
//!
//! Seeds and seedlings are stored as JSON TEXT in the historical
//! `[{key, name?, area}]` shape; irrigation is a JSON array of keys.

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::entry::CanonicalField;
use crate::survey::{Facilities, FarmSurvey, SurveyKind, WorkerSurvey};
use crate::{Error, Result};

/// Insert a validated worker survey, returning its id
pub async fn insert_worker(pool: &SqlitePool, survey: &WorkerSurvey) -> Result<i64> {
    let seeds = CanonicalField::to_column(survey.seeds.as_ref())?;
    let seedlings = CanonicalField::to_column(survey.seedlings.as_ref())?;
    let irrigation = serde_json::to_string(&survey.irrigation_sources)?;
    let facilities = &survey.facilities;

    let result = sqlx::query(
        r#"
        INSERT INTO worker_surveys (
            operator, meeting_date, rayon, jamoat, selo, accept,
            full_name, age, phone,
            family_count, children_count, elderly_count, able_count,
            income, plot_ha, agriculture_experience,
            seeds, seedlings, irrigation_sources,
            beekeeping, has_storage, storage_area_sqm, has_refrigerator,
            created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&survey.operator)
    .bind(survey.meeting_date)
    .bind(&survey.rayon)
    .bind(&survey.jamoat)
    .bind(&survey.selo)
    .bind(survey.accept)
    .bind(&survey.full_name)
    .bind(survey.age)
    .bind(&survey.phone)
    .bind(survey.family_count)
    .bind(survey.children_count)
    .bind(survey.elderly_count)
    .bind(survey.able_count)
    .bind(&survey.income)
    .bind(&survey.plot_ha)
    .bind(&survey.agriculture_experience)
    .bind(seeds)
    .bind(seedlings)
    .bind(irrigation)
    .bind(facilities.beekeeping())
    .bind(facilities.has_storage())
    .bind(facilities.storage_area_sqm())
    .bind(facilities.has_refrigerator())
    .bind(survey.created_at)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    debug!("Inserted worker survey {}", id);
    Ok(id)
}

/// Insert a validated farm survey, returning its id
pub async fn insert_farm(pool: &SqlitePool, survey: &FarmSurvey) -> Result<i64> {
    let seeds = CanonicalField::to_column(survey.seeds.as_ref())?;
    let seedlings = CanonicalField::to_column(survey.seedlings.as_ref())?;
    let irrigation = serde_json::to_string(&survey.irrigation_sources)?;
    let facilities = &survey.facilities;

    let result = sqlx::query(
        r#"
        INSERT INTO farm_surveys (
            operator, meeting_date, rayon, jamoat, selo, accept,
            farm_name, leader_full_name, leader_age, leader_phone,
            farm_plot_ha, agriculture_experience,
            seeds, seedlings, equipment_choice, equipment_other_text, irrigation_sources,
            beekeeping, has_storage, storage_area_sqm, has_refrigerator,
            signature, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&survey.operator)
    .bind(survey.meeting_date)
    .bind(&survey.rayon)
    .bind(&survey.jamoat)
    .bind(&survey.selo)
    .bind(survey.accept)
    .bind(&survey.farm_name)
    .bind(&survey.leader_full_name)
    .bind(survey.leader_age)
    .bind(&survey.leader_phone)
    .bind(&survey.farm_plot_ha)
    .bind(&survey.agriculture_experience)
    .bind(seeds)
    .bind(seedlings)
    .bind(&survey.equipment_choice)
    .bind(&survey.equipment_other_text)
    .bind(irrigation)
    .bind(facilities.beekeeping())
    .bind(facilities.has_storage())
    .bind(facilities.storage_area_sqm())
    .bind(facilities.has_refrigerator())
    .bind(&survey.signature)
    .bind(survey.created_at)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    debug!("Inserted farm survey {}", id);
    Ok(id)
}

/// Every worker survey in store order (id ascending)
pub async fn fetch_all_workers(pool: &SqlitePool) -> Result<Vec<WorkerSurvey>> {
    let rows = sqlx::query("SELECT * FROM worker_surveys ORDER BY id ASC")
        .fetch_all(pool)
        .await?;
    rows.iter().map(worker_from_row).collect()
}

/// Every farm survey in store order (id ascending)
pub async fn fetch_all_farms(pool: &SqlitePool) -> Result<Vec<FarmSurvey>> {
    let rows = sqlx::query("SELECT * FROM farm_surveys ORDER BY id ASC")
        .fetch_all(pool)
        .await?;
    rows.iter().map(farm_from_row).collect()
}

pub async fn fetch_worker(pool: &SqlitePool, id: i64) -> Result<WorkerSurvey> {
    let row = sqlx::query("SELECT * FROM worker_surveys WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("worker survey {}", id)))?;
    worker_from_row(&row)
}

pub async fn fetch_farm(pool: &SqlitePool, id: i64) -> Result<FarmSurvey> {
    let row = sqlx::query("SELECT * FROM farm_surveys WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("farm survey {}", id)))?;
    farm_from_row(&row)
}

pub async fn count_surveys(pool: &SqlitePool, kind: SurveyKind) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", kind.table()))
        .fetch_one(pool)
        .await?;
    Ok(count)
}

fn json_column<T: serde::de::DeserializeOwned + Default>(row: &SqliteRow, column: &str) -> Result<T> {
    let raw: Option<String> = row.try_get(column)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(T::default()),
        Some(text) => Ok(serde_json::from_str(text)?),
    }
}

fn canonical_column(row: &SqliteRow, column: &str) -> Result<Option<CanonicalField>> {
    let raw: Option<String> = row.try_get(column)?;
    CanonicalField::from_column(raw.as_deref())
}

fn facilities(row: &SqliteRow) -> Result<Facilities> {
    Ok(Facilities::new(
        row.try_get("beekeeping")?,
        row.try_get("has_storage")?,
        row.try_get("storage_area_sqm")?,
        row.try_get("has_refrigerator")?,
    ))
}

fn worker_from_row(row: &SqliteRow) -> Result<WorkerSurvey> {
    Ok(WorkerSurvey {
        id: row.try_get("id")?,
        operator: row.try_get("operator")?,
        meeting_date: row.try_get::<NaiveDate, _>("meeting_date")?,
        rayon: row.try_get("rayon")?,
        jamoat: row.try_get("jamoat")?,
        selo: row.try_get("selo")?,
        accept: row.try_get("accept")?,
        full_name: row.try_get("full_name")?,
        age: row.try_get("age")?,
        phone: row.try_get("phone")?,
        family_count: row.try_get("family_count")?,
        children_count: row.try_get("children_count")?,
        elderly_count: row.try_get("elderly_count")?,
        able_count: row.try_get("able_count")?,
        income: row.try_get("income")?,
        plot_ha: row.try_get("plot_ha")?,
        agriculture_experience: row.try_get("agriculture_experience")?,
        seeds: canonical_column(row, "seeds")?,
        seedlings: canonical_column(row, "seedlings")?,
        irrigation_sources: json_column(row, "irrigation_sources")?,
        facilities: facilities(row)?,
        created_at: row.try_get::<NaiveDateTime, _>("created_at")?,
    })
}

fn farm_from_row(row: &SqliteRow) -> Result<FarmSurvey> {
    Ok(FarmSurvey {
        id: row.try_get("id")?,
        operator: row.try_get("operator")?,
        meeting_date: row.try_get::<NaiveDate, _>("meeting_date")?,
        rayon: row.try_get("rayon")?,
        jamoat: row.try_get("jamoat")?,
        selo: row.try_get("selo")?,
        accept: row.try_get("accept")?,
        farm_name: row.try_get("farm_name")?,
        leader_full_name: row.try_get("leader_full_name")?,
        leader_age: row.try_get("leader_age")?,
        leader_phone: row.try_get("leader_phone")?,
        farm_plot_ha: row.try_get("farm_plot_ha")?,
        agriculture_experience: row.try_get("agriculture_experience")?,
        seeds: canonical_column(row, "seeds")?,
        seedlings: canonical_column(row, "seedlings")?,
        equipment_choice: row.try_get("equipment_choice")?,
        equipment_other_text: row.try_get("equipment_other_text")?,
        irrigation_sources: json_column(row, "irrigation_sources")?,
        facilities: facilities(row)?,
        signature: row.try_get("signature")?,
        created_at: row.try_get::<NaiveDateTime, _>("created_at")?,
    })
}
