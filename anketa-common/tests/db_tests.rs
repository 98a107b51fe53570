//! Database round trips for both survey tables

use anketa_common::db::{
    count_surveys, fetch_all_farms, fetch_all_workers, fetch_farm, fetch_worker, init_database,
    insert_farm, insert_worker,
};
use anketa_common::survey::{FarmSubmission, WorkerSubmission};
use anketa_common::{CatalogSet, Error, SurveyKind};
use chrono::NaiveDate;
use serde_json::json;
use sqlx::SqlitePool;
use tempfile::TempDir;

async fn test_pool() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("anketa.db")).await.unwrap();
    (dir, pool)
}

fn worker_submission() -> WorkerSubmission {
    serde_json::from_value(json!({
        "meeting_date": "2025-04-10",
        "rayon": "Вахдат",
        "jamoat": "Ромит",
        "selo": "Навобод",
        "accept": true,
        "full_name": "Саидова Мадина",
        "age": 34,
        "phone": "901234567",
        "family_count": 5,
        "children_count": 2,
        "income": "agriculture, abroad",
        "plot_ha": "0.25",
        "agriculture_experience": "овощеводство",
        "seeds": [
            {"key": "onion", "area": "1,5"},
            {"key": "other", "name": "Базилик", "area": "0.5"}
        ],
        "irrigation_sources": ["pump"],
        "has_storage": true,
        "storage_area_sqm": 12,
        "has_refrigerator": false
    }))
    .unwrap()
}

fn farm_submission() -> FarmSubmission {
    serde_json::from_value(json!({
        "meeting_date": "2025-04-11",
        "rayon": "Рудаки",
        "jamoat": "Чимтеппа",
        "accept": true,
        "farm_name": "ДХ Бахор",
        "leader_full_name": "Каримов Азиз",
        "leader_age": 52,
        "leader_phone": "935554433",
        "agriculture_experience": "садоводство",
        "seedlings": [{"key": "grape", "area": "4"}],
        "equipment_choice": "other",
        "equipment_other_text": "Трактор МТЗ",
        "irrigation_sources": ["canal", "well"],
        "beekeeping": true,
        "has_storage": false,
        "has_refrigerator": true,
        "signature": "Каримов"
    }))
    .unwrap()
}

#[tokio::test]
async fn test_worker_round_trip() {
    let (_dir, pool) = test_pool().await;
    let catalogs = CatalogSet::builtin();

    let record = worker_submission()
        .into_record(&catalogs, Some("Оператор".into()))
        .unwrap();
    let id = insert_worker(&pool, &record).await.unwrap();
    assert!(id > 0);

    let stored = fetch_worker(&pool, id).await.unwrap();
    assert_eq!(stored.id, id);
    assert_eq!(stored.operator.as_deref(), Some("Оператор"));
    assert_eq!(stored.meeting_date, NaiveDate::from_ymd_opt(2025, 4, 10).unwrap());
    assert_eq!(stored.seeds, record.seeds);
    assert!(stored.seedlings.is_none());
    assert_eq!(stored.irrigation_sources, vec!["pump"]);
    assert_eq!(stored.facilities, record.facilities);
    assert_eq!(stored.children_count, 2);
    assert_eq!(stored.elderly_count, 0);

    let all = fetch_all_workers(&pool).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(count_surveys(&pool, SurveyKind::Worker).await.unwrap(), 1);
    assert_eq!(count_surveys(&pool, SurveyKind::Farm).await.unwrap(), 0);
}

#[tokio::test]
async fn test_farm_round_trip() {
    let (_dir, pool) = test_pool().await;
    let catalogs = CatalogSet::builtin();

    let record = farm_submission().into_record(&catalogs, None).unwrap();
    let first = insert_farm(&pool, &record).await.unwrap();
    let second = insert_farm(&pool, &record).await.unwrap();
    assert!(second > first);

    let stored = fetch_farm(&pool, first).await.unwrap();
    assert_eq!(stored.equipment_other_text.as_deref(), Some("Трактор МТЗ"));
    assert_eq!(stored.seedlings, record.seedlings);
    assert!(stored.seeds.is_none());
    assert_eq!(stored.facilities.storage_area_sqm(), None);
    assert_eq!(stored.signature.as_deref(), Some("Каримов"));

    let ids: Vec<i64> = fetch_all_farms(&pool).await.unwrap().iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![first, second]);
}

#[tokio::test]
async fn test_missing_record_is_not_found() {
    let (_dir, pool) = test_pool().await;
    assert!(matches!(fetch_worker(&pool, 42).await, Err(Error::NotFound(_))));
    assert!(matches!(fetch_farm(&pool, 42).await, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_storage_area_without_storage_rejected_by_schema() {
    let (_dir, pool) = test_pool().await;
    let result = sqlx::query(
        "INSERT INTO worker_surveys (meeting_date, rayon, jamoat, full_name, age, phone, family_count, income, agriculture_experience, has_storage, storage_area_sqm, created_at)
         VALUES ('2025-01-01', 'r', 'j', 'n', 30, '901234567', 1, 'agriculture', 'нет опыта', 0, 10, '2025-01-01 00:00:00')",
    )
    .execute(&pool)
    .await;
    assert!(result.is_err());
}
