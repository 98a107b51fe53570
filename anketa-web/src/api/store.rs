//! Persistence seam shared by the generic survey handlers

use std::future::Future;

use anketa_common::db::{
    fetch_all_farms, fetch_all_workers, fetch_farm, fetch_worker, insert_farm, insert_worker,
};
use anketa_common::export::Exportable;
use anketa_common::survey::{FarmSubmission, WorkerSubmission};
use anketa_common::{CatalogSet, FarmSurvey, Result, WorkerSurvey};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;

/// A survey kind the service can accept, list and export
pub trait SurveyStore: Exportable + Serialize + Send + Sync + 'static {
    /// Raw JSON body of a submission
    type Submission: DeserializeOwned + Send + 'static;

    /// Validate and normalize a submission
    fn accept(submission: Self::Submission, catalogs: &CatalogSet, operator: Option<String>) -> Result<Self>;

    fn insert<'a>(pool: &'a SqlitePool, record: &'a Self) -> impl Future<Output = Result<i64>> + Send + 'a;

    fn fetch_all(pool: &SqlitePool) -> impl Future<Output = Result<Vec<Self>>> + Send + '_;

    fn fetch(pool: &SqlitePool, id: i64) -> impl Future<Output = Result<Self>> + Send + '_;
}

impl SurveyStore for WorkerSurvey {
    type Submission = WorkerSubmission;

    fn accept(submission: WorkerSubmission, catalogs: &CatalogSet, operator: Option<String>) -> Result<Self> {
        submission.into_record(catalogs, operator)
    }

    fn insert<'a>(pool: &'a SqlitePool, record: &'a Self) -> impl Future<Output = Result<i64>> + Send + 'a {
        insert_worker(pool, record)
    }

    fn fetch_all(pool: &SqlitePool) -> impl Future<Output = Result<Vec<Self>>> + Send + '_ {
        fetch_all_workers(pool)
    }

    fn fetch(pool: &SqlitePool, id: i64) -> impl Future<Output = Result<Self>> + Send + '_ {
        fetch_worker(pool, id)
    }
}

impl SurveyStore for FarmSurvey {
    type Submission = FarmSubmission;

    fn accept(submission: FarmSubmission, catalogs: &CatalogSet, operator: Option<String>) -> Result<Self> {
        submission.into_record(catalogs, operator)
    }

    fn insert<'a>(pool: &'a SqlitePool, record: &'a Self) -> impl Future<Output = Result<i64>> + Send + 'a {
        insert_farm(pool, record)
    }

    fn fetch_all(pool: &SqlitePool) -> impl Future<Output = Result<Vec<Self>>> + Send + '_ {
        fetch_all_farms(pool)
    }

    fn fetch(pool: &SqlitePool, id: i64) -> impl Future<Output = Result<Self>> + Send + '_ {
        fetch_farm(pool, id)
    }
}
