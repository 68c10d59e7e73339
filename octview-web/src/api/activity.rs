//! Activity logging endpoint

use axum::{extract::State, Json};
use octview_common::db::models::ActivityEvent;
use serde_json::{json, Value};

use crate::api::ApiError;
use crate::AppState;

/// POST /api/log-activity
///
/// Appends one UI event to the activity log. The typed payload requires
/// `action` and `image_name`; everything else is optional.
pub async fn log_activity(
    State(state): State<AppState>,
    Json(event): Json<ActivityEvent>,
) -> Result<Json<Value>, ApiError> {
    if event.action.is_empty() {
        return Err(ApiError::InvalidRequest("Missing action".to_string()));
    }
    if event.image_name.is_empty() {
        return Err(ApiError::InvalidRequest("Missing image_name".to_string()));
    }

    let success = state.store.log_activity(&event).await;
    Ok(Json(json!({ "success": success })))
}
