//! Survey listing with filters, sorting and pagination

use std::collections::HashMap;

use anketa_common::query::{apply, facets, ListQuery};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use tracing::debug;

use super::{ApiResult, SurveyStore};
use crate::pagination::calculate_pagination;
use crate::AppState;

/// GET /api/{kind}
///
/// Query parameters: `q`, `date_from`, `date_to`, per-kind equality
/// filters, `sort`, `order`, `page`, `per_page`. Unknown sort fields fall
/// back to `created_at`; unknown filter keys are ignored.
pub async fn list_surveys<R: SurveyStore>(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Value>> {
    let query = ListQuery::from_params(&params);
    let sort = query.sort_for::<R>();

    let records = R::fetch_all(&state.db).await?;
    let selected = apply(&records, &query.filters, &sort);
    let pagination = calculate_pagination(selected.len(), query.page, query.per_page);

    debug!(
        "{}: {} of {} rows match, page {}/{}",
        R::KIND.table(),
        selected.len(),
        records.len(),
        pagination.page,
        pagination.last_page
    );

    Ok(Json(json!({
        "total": selected.len(),
        "page": pagination.page,
        "per_page": pagination.per_page,
        "last_page": pagination.last_page,
        "filters": {
            "q": query.filters.text,
            "date_from": query.filters.date_from,
            "date_to": query.filters.date_to,
            "equality": query.filters.equality,
            "sort": sort.field,
            "order": sort.direction.as_str(),
        },
        "available": facets::<R>(&records),
        "data": pagination.slice(&selected),
    })))
}

/// GET /api/{kind}/:id
pub async fn get_survey<R: SurveyStore>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<R>> {
    let record = R::fetch(&state.db, id).await?;
    Ok(Json(record))
}
