//! octview-web library - retina image review tool
//!
//! Web UI for browsing diagnosis-labelled retina images, answering
//! AI-extracted clinical feature questions per image, and inspecting
//! reviewer activity through admin summary views.

use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::db::AnswerStore;
use crate::services::{DiagnosisIndex, ImageLibrary};

pub mod api;
pub mod db;
pub mod pagination;
pub mod services;

/// Application state shared across HTTP handlers
///
/// Constructed once at startup and injected into the router; handlers reach
/// the store and collaborator services exclusively through this.
#[derive(Clone)]
pub struct AppState {
    /// Reviewer answer / activity log store
    pub store: AnswerStore,
    /// Diagnosis and extracted-feature lookup (loaded from JSON)
    pub diagnosis: Arc<DiagnosisIndex>,
    /// Filesystem-backed category/image listing
    pub images: Arc<ImageLibrary>,
}

impl AppState {
    /// Create new application state
    pub fn new(pool: SqlitePool, diagnosis: DiagnosisIndex, images: ImageLibrary) -> Self {
        Self {
            store: AnswerStore::new(pool),
            diagnosis: Arc::new(diagnosis),
            images: Arc::new(images),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};
    use tower_http::trace::TraceLayer;

    Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .route("/images/:category_id/:filename", get(api::serve_image))
        .route("/api/categories", get(api::list_categories))
        .route("/api/category/:category_id/images", get(api::list_category_images))
        .route("/api/image/:category_id/:filename", get(api::image_detail))
        .route(
            "/api/feature-answers/:image_name",
            get(api::get_feature_answers)
                .post(api::save_feature_answers)
                .delete(api::delete_feature_answers),
        )
        .route("/api/log-activity", post(api::log_activity))
        .route("/api/admin/answers", get(api::all_answers))
        .route("/api/admin/activity-logs", get(api::activity_logs))
        .route("/api/admin/summary", get(api::answer_summary))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
