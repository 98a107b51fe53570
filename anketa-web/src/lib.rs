//! anketa-web library - survey intake, review and export service
//!
//! Accepts worker and farm survey submissions, lists them with filters,
//! and exports the filtered selection as a spreadsheet or a condensed
//! document.

use std::sync::Arc;

use anketa_common::export::ExportOptions;
use anketa_common::{FarmSurvey, WorkerSurvey};
use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod pagination;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Catalogs and labelling used for validation and exports
    pub options: Arc<ExportOptions>,
}

impl AppState {
    pub fn new(db: SqlitePool, options: ExportOptions) -> Self {
        Self {
            db,
            options: Arc::new(options),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(survey_routes::<WorkerSurvey>("/api/worker-surveys"))
        .merge(survey_routes::<FarmSurvey>("/api/farm-surveys"))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Submit, list, fetch and export routes for one survey kind
fn survey_routes<R: api::SurveyStore>(base: &str) -> Router<AppState> {
    use axum::routing::get;

    Router::new()
        .route(base, get(api::list_surveys::<R>).post(api::submit_survey::<R>))
        .route(&format!("{}/:id", base), get(api::get_survey::<R>))
        .route(&format!("{}/export/sheet", base), get(api::export_sheet::<R>))
        .route(&format!("{}/export/document", base), get(api::export_document::<R>))
}
