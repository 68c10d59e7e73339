//! Feature answer endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::api::ApiError;
use crate::AppState;

/// One submitted answer for one feature question
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerPayload {
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub explanation: String,
}

/// POST body: all answers of the review form, keyed by feature id
#[derive(Debug, Deserialize)]
pub struct SaveAnswersRequest {
    pub answers: HashMap<String, AnswerPayload>,
}

#[derive(Debug, Serialize)]
pub struct SaveAnswersResponse {
    pub success: bool,
    pub saved_count: usize,
    pub total_count: usize,
}

/// GET /api/feature-answers/:image_name
///
/// Current answers plus progress counts for the review page.
pub async fn get_feature_answers(
    State(state): State<AppState>,
    Path(image_name): Path<String>,
) -> Json<Value> {
    let answers = state.store.feature_answers(&image_name).await;
    let total_questions = state.diagnosis.total_questions(&image_name);

    Json(json!({
        "answers": answers,
        "total_questions": total_questions,
        "answered_questions": answers.len(),
    }))
}

/// POST /api/feature-answers/:image_name
///
/// Upserts each submitted answer. Per-feature failures (empty payloads,
/// store errors) reduce saved_count but do not fail the request.
pub async fn save_feature_answers(
    State(state): State<AppState>,
    Path(image_name): Path<String>,
    Json(request): Json<SaveAnswersRequest>,
) -> Result<Json<SaveAnswersResponse>, ApiError> {
    let total_count = request.answers.len();
    if total_count == 0 {
        return Err(ApiError::InvalidRequest("No answers submitted".to_string()));
    }

    let mut saved_count = 0;
    for (feature_id, payload) in &request.answers {
        let saved = state
            .store
            .save_feature_answer(
                &image_name,
                feature_id,
                &payload.answer,
                &payload.reason,
                &payload.explanation,
            )
            .await;
        if saved {
            saved_count += 1;
        }
    }

    Ok(Json(SaveAnswersResponse {
        success: true,
        saved_count,
        total_count,
    }))
}

/// DELETE /api/feature-answers/:image_name
pub async fn delete_feature_answers(
    State(state): State<AppState>,
    Path(image_name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if state.store.delete_feature_answers(&image_name).await {
        Ok(Json(json!({ "success": true })))
    } else {
        Err(ApiError::StoreFailure("Failed to delete answers".to_string()))
    }
}
