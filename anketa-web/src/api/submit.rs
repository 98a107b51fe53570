//! Survey submission endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use super::{ApiError, ApiResult, SurveyStore};
use crate::AppState;

/// Header naming the operator who entered the survey
pub const OPERATOR_HEADER: &str = "x-operator";

/// POST /api/{kind}
///
/// Validates, normalizes and stores one submission. Returns `201 {id}`,
/// or `422` with per-field messages.
pub async fn submit_survey<R: SurveyStore>(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<R::Submission>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(submission) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let operator = operator_name(&headers);

    let record = R::accept(submission, &state.options.catalogs, operator)?;
    let id = R::insert(&state.db, &record).await?;
    info!("Stored {} row {}", R::KIND.table(), id);

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// Operator name from the request, if present and non-blank
fn operator_name(headers: &HeaderMap) -> Option<String> {
    headers
        .get(OPERATOR_HEADER)
        .and_then(|v| std::str::from_utf8(v.as_bytes()).ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_operator_name() {
        let mut headers = HeaderMap::new();
        assert_eq!(operator_name(&headers), None);

        headers.insert(OPERATOR_HEADER, HeaderValue::from_static("   "));
        assert_eq!(operator_name(&headers), None);

        headers.insert(OPERATOR_HEADER, HeaderValue::from_static(" Nigora "));
        assert_eq!(operator_name(&headers).as_deref(), Some("Nigora"));
    }
}
