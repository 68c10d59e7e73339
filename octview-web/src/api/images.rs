//! Image file serving

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::api::ApiError;
use crate::AppState;

/// GET /images/:category_id/:filename
///
/// Serves one image from the downloaded images directory. Path traversal is
/// rejected by the library's component validation; unknown files are 404.
pub async fn serve_image(
    State(state): State<AppState>,
    Path((category_id, filename)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let path = state
        .images
        .image_path(&category_id, &filename)
        .ok_or_else(|| ApiError::NotFound(format!("Image not found: {}", filename)))?;

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| ApiError::StoreFailure(format!("Failed to read image: {}", e)))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type_for(&filename))],
        bytes,
    )
        .into_response())
}

fn content_type_for(filename: &str) -> &'static str {
    match filename.rsplit('.').next().map(|e| e.to_lowercase()) {
        Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
        Some(ext) if ext == "png" => "image/png",
        Some(ext) if ext == "gif" => "image/gif",
        Some(ext) if ext == "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}
