//! SQLite persistence for survey records
//!
//! Records are append-only: inserted once after validation, then read back
//! in full for listing and export.

pub mod surveys;

pub use surveys::{
    count_surveys, fetch_all_farms, fetch_all_workers, fetch_farm, fetch_worker, insert_farm,
    insert_worker,
};

use std::path::Path;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::info;

use crate::Result;

/// Open (creating if needed) the database and its tables
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_worker_surveys_table(&pool).await?;
    create_farm_surveys_table(&pool).await?;

    Ok(pool)
}

async fn create_worker_surveys_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS worker_surveys (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            operator TEXT,
            meeting_date TEXT NOT NULL,
            rayon TEXT NOT NULL,
            jamoat TEXT NOT NULL,
            selo TEXT,
            accept INTEGER NOT NULL DEFAULT 0,
            full_name TEXT NOT NULL,
            age INTEGER NOT NULL,
            phone TEXT NOT NULL,
            family_count INTEGER NOT NULL,
            children_count INTEGER NOT NULL DEFAULT 0,
            elderly_count INTEGER NOT NULL DEFAULT 0,
            able_count INTEGER NOT NULL DEFAULT 0,
            income TEXT NOT NULL,
            plot_ha TEXT,
            agriculture_experience TEXT NOT NULL,
            seeds TEXT,
            seedlings TEXT,
            irrigation_sources TEXT NOT NULL DEFAULT '[]',
            beekeeping INTEGER NOT NULL DEFAULT 0,
            has_storage INTEGER NOT NULL DEFAULT 0,
            storage_area_sqm INTEGER,
            has_refrigerator INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            CHECK (has_storage = 1 OR storage_area_sqm IS NULL)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_worker_surveys_meeting_date ON worker_surveys(meeting_date)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_farm_surveys_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS farm_surveys (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            operator TEXT,
            meeting_date TEXT NOT NULL,
            rayon TEXT NOT NULL,
            jamoat TEXT NOT NULL,
            selo TEXT,
            accept INTEGER NOT NULL DEFAULT 0,
            farm_name TEXT NOT NULL,
            leader_full_name TEXT NOT NULL,
            leader_age INTEGER NOT NULL,
            leader_phone TEXT NOT NULL,
            farm_plot_ha TEXT,
            agriculture_experience TEXT NOT NULL,
            seeds TEXT,
            seedlings TEXT,
            equipment_choice TEXT NOT NULL,
            equipment_other_text TEXT,
            irrigation_sources TEXT NOT NULL DEFAULT '[]',
            beekeeping INTEGER NOT NULL DEFAULT 0,
            has_storage INTEGER NOT NULL DEFAULT 0,
            storage_area_sqm INTEGER,
            has_refrigerator INTEGER NOT NULL DEFAULT 0,
            signature TEXT,
            created_at TEXT NOT NULL,
            CHECK (has_storage = 1 OR storage_area_sqm IS NULL)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_farm_surveys_meeting_date ON farm_surveys(meeting_date)")
        .execute(pool)
        .await?;

    Ok(())
}
