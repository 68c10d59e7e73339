//! Admin endpoints: answer export, activity log browsing, summaries

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::pagination::{calculate_pagination, PAGE_SIZE};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub diagnosis: Option<String>,
}

/// GET /api/admin/answers
///
/// Every answer row across all images, newest first.
pub async fn all_answers(State(state): State<AppState>) -> Json<Value> {
    let answers = state.store.all_answers().await;
    Json(json!({
        "total": answers.len(),
        "answers": answers,
    }))
}

/// GET /api/admin/activity-logs?page=N
///
/// Paginated activity log view, newest first, page clamped to bounds.
pub async fn activity_logs(
    State(state): State<AppState>,
    Query(query): Query<LogsQuery>,
) -> Json<Value> {
    let total = state.store.activity_log_count().await;
    let pagination = calculate_pagination(total, query.page);
    let logs = state.store.activity_logs(PAGE_SIZE, pagination.offset).await;

    Json(json!({
        "logs": logs,
        "total": total,
        "page": pagination.page,
        "page_size": PAGE_SIZE,
        "total_pages": pagination.total_pages,
    }))
}

/// GET /api/admin/summary?diagnosis=name
///
/// Per-image answer summaries, optionally filtered by diagnosis substring.
pub async fn answer_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Json<Value> {
    let summaries = state
        .store
        .image_answer_summary_by_diagnosis(query.diagnosis.as_deref())
        .await;

    Json(json!({
        "total": summaries.len(),
        "summaries": summaries,
    }))
}
