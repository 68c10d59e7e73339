//! Category browsing and image detail endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::api::ApiError;
use crate::services::ImageEntry;
use crate::AppState;

/// Image entry annotated with its diagnosis record, if any
#[derive(Debug, Serialize)]
pub struct AnnotatedImage {
    pub filename: String,
    pub path: String,
    pub category_id: String,
    pub diagnosis_id: Option<i64>,
    pub has_diagnosis: bool,
}

fn annotate(state: &AppState, image: ImageEntry) -> AnnotatedImage {
    let diagnosis_id = state.diagnosis.by_filename(&image.filename).map(|r| r.id);
    AnnotatedImage {
        filename: image.filename,
        path: image.path,
        category_id: image.category_id,
        has_diagnosis: diagnosis_id.is_some(),
        diagnosis_id,
    }
}

/// GET /api/categories
pub async fn list_categories(State(state): State<AppState>) -> Json<Value> {
    let categories = state.images.categories();
    Json(json!({ "categories": categories }))
}

/// GET /api/category/:category_id/images
///
/// Images of one category, each annotated with diagnosis information.
pub async fn list_category_images(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let category = state
        .images
        .category_by_id(&category_id)
        .ok_or_else(|| ApiError::NotFound(format!("Category not found: {}", category_id)))?;

    let images: Vec<AnnotatedImage> = state
        .images
        .images_in_category(&category.id)
        .into_iter()
        .map(|img| annotate(&state, img))
        .collect();

    Ok(Json(json!({
        "category": category,
        "images": images,
    })))
}

/// GET /api/image/:category_id/:filename
///
/// Detail payload for the review page: the image, its diagnosis record
/// (or null) and the extracted clinical features (or null).
pub async fn image_detail(
    State(state): State<AppState>,
    Path((category_id, filename)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let category = state
        .images
        .category_by_id(&category_id)
        .ok_or_else(|| ApiError::NotFound(format!("Category not found: {}", category_id)))?;

    let diagnosis = state.diagnosis.by_filename(&filename);
    let features = diagnosis.and_then(|record| state.diagnosis.features_for(record.id));

    Ok(Json(json!({
        "current_image": {
            "filename": filename,
            "path": format!("/images/{}/{}", category.id, filename),
            "category_id": category.id,
            "id": diagnosis.map(|r| r.id),
        },
        "diagnosis_info": diagnosis,
        "extracted_features": features,
    })))
}
