//! Spreadsheet and document export endpoints
//!
//! Both take the same filter and sort parameters as the list endpoint and
//! export every matching row (no pagination).

use std::collections::HashMap;

use anketa_common::export::{render, Layout, TabularDocument};
use anketa_common::query::{apply, ListQuery};
use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::info;

use super::{ApiResult, SurveyStore};
use crate::AppState;

/// GET /api/{kind}/export/sheet
///
/// Full sheet as a CSV attachment.
pub async fn export_sheet<R: SurveyStore>(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Response> {
    let document = build_document::<R>(&state, &params, Layout::FullSheet).await?;
    let body = document.to_csv()?;
    let filename = format!("{}_{}.csv", R::KIND.table(), Utc::now().format("%Y%m%d_%H%M"));

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response())
}

/// GET /api/{kind}/export/document
///
/// Condensed document as `{title, headers, rows}` for an external renderer.
pub async fn export_document<R: SurveyStore>(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<TabularDocument>> {
    let document = build_document::<R>(&state, &params, Layout::Condensed).await?;
    Ok(Json(document))
}

async fn build_document<R: SurveyStore>(
    state: &AppState,
    params: &HashMap<String, String>,
    layout: Layout,
) -> ApiResult<TabularDocument> {
    let query = ListQuery::from_params(params);
    let sort = query.sort_for::<R>();

    let records = R::fetch_all(&state.db).await?;
    let selected = apply(&records, &query.filters, &sort);
    let document = render(&selected, layout, &state.options)?;

    info!(
        "Exported {} of {} {} rows as {:?}",
        document.rows.len(),
        records.len(),
        R::KIND.table(),
        layout
    );
    Ok(document)
}
