//! Integration tests for octview-web API endpoints
//!
//! Drives the real router with `tower::ServiceExt::oneshot` against a
//! temporary database and image directory.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use octview_common::db::init::init_database;
use octview_web::services::{
    DiagnosisIndex, DiagnosisRecord, ExtractedFeatures, Feature, FeatureRecord, ImageLibrary,
};
use octview_web::{build_router, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

/// Test fixture: temp data root with one category, one image, one diagnosis
async fn setup_app() -> (TempDir, axum::Router) {
    let dir = TempDir::new().unwrap();

    let images_dir = dir.path().join("downloaded_images");
    let drusen = images_dir.join("Drusen");
    std::fs::create_dir_all(&drusen).unwrap();
    std::fs::write(drusen.join("drusen-1.jpeg"), b"not a real jpeg").unwrap();

    let pool = init_database(&dir.path().join("reviews.db")).await.unwrap();

    let diagnosis = DiagnosisIndex::from_records(
        vec![DiagnosisRecord {
            id: 3,
            image: "images/drusen-1.jpeg".to_string(),
            diagnosis: "Drusen".to_string(),
            rationale: None,
        }],
        vec![FeatureRecord {
            id: 3,
            extracted_features: ExtractedFeatures {
                features: vec![Feature {
                    id: "f1".to_string(),
                    label: "RPE elevation".to_string(),
                    description: "dome-shaped elevation".to_string(),
                }],
            },
        }],
    );
    let images = ImageLibrary::new(images_dir);

    let state = AppState::new(pool, diagnosis, images);
    (dir, build_router(state))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

#[tokio::test]
async fn test_health_endpoint() {
    let (_dir, app) = setup_app().await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "octview-web");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_category_listing_and_images() {
    let (_dir, app) = setup_app().await;

    let response = app.clone().oneshot(get("/api/categories")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["categories"][0]["id"], "Drusen");

    let response = app
        .clone()
        .oneshot(get("/api/category/Drusen/images"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["images"][0]["filename"], "drusen-1.jpeg");
    assert_eq!(body["images"][0]["has_diagnosis"], true);
    assert_eq!(body["images"][0]["diagnosis_id"], 3);

    let response = app.oneshot(get("/api/category/Missing/images")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_image_detail_includes_features() {
    let (_dir, app) = setup_app().await;

    let response = app
        .oneshot(get("/api/image/Drusen/drusen-1.jpeg"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["current_image"]["id"], 3);
    assert_eq!(body["diagnosis_info"]["revised_answer_final"], "Drusen");
    assert_eq!(
        body["extracted_features"]["extracted_features"]["features"][0]["id"],
        "f1"
    );
}

#[tokio::test]
async fn test_image_serving_and_miss() {
    let (_dir, app) = setup_app().await;

    let response = app
        .clone()
        .oneshot(get("/images/Drusen/drusen-1.jpeg"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "image/jpeg"
    );

    let response = app.oneshot(get("/images/Drusen/missing.jpeg")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_answer_round_trip_over_http() {
    let (_dir, app) = setup_app().await;

    let save = json_request(
        "POST",
        "/api/feature-answers/drusen-1.jpeg",
        json!({
            "answers": {
                "label_match": {"answer": "agree", "reason": "", "explanation": ""},
                "f1": {"answer": "disagree", "reason": "no elevation visible", "explanation": ""},
            }
        }),
    );
    let response = app.clone().oneshot(save).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["saved_count"], 2);
    assert_eq!(body["total_count"], 2);

    let response = app
        .clone()
        .oneshot(get("/api/feature-answers/drusen-1.jpeg"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["answered_questions"], 2);
    // label-agreement question + 1 extracted feature
    assert_eq!(body["total_questions"], 2);
    assert_eq!(body["answers"]["f1"]["answer"], "disagree");
    assert_eq!(body["answers"]["f1"]["reason"], "no elevation visible");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/feature-answers/drusen-1.jpeg")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get("/api/feature-answers/drusen-1.jpeg"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["answered_questions"], 0);
}

#[tokio::test]
async fn test_save_rejects_malformed_body() {
    let (_dir, app) = setup_app().await;

    // Body without the required "answers" key fails schema validation
    let request = json_request(
        "POST",
        "/api/feature-answers/drusen-1.jpeg",
        json!({"something": "else"}),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let request = json_request(
        "POST",
        "/api/feature-answers/drusen-1.jpeg",
        json!({"answers": {}}),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_activity_logging_and_validation() {
    let (_dir, app) = setup_app().await;

    let request = json_request(
        "POST",
        "/api/log-activity",
        json!({
            "action": "answer_check",
            "image_name": "drusen-1.jpeg",
            "feature_id": "f1",
            "answer": "agree",
            "is_checked": true,
            "element_type": "radio",
        }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], true);

    // Missing action is a client error
    let request = json_request(
        "POST",
        "/api/log-activity",
        json!({"action": "", "image_name": "drusen-1.jpeg"}),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("action"));

    let response = app.oneshot(get("/api/admin/activity-logs?page=1")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["logs"][0]["action"], "answer_check");
    assert_eq!(body["logs"][0]["is_checked"], true);
}

#[tokio::test]
async fn test_admin_summary_with_diagnosis_filter() {
    let (_dir, app) = setup_app().await;

    let save = json_request(
        "POST",
        "/api/feature-answers/drusen-1.jpeg",
        json!({"answers": {"f1": {"answer": "agree"}}}),
    );
    app.clone().oneshot(save).await.unwrap();

    let response = app
        .clone()
        .oneshot(get("/api/admin/summary?diagnosis=DRUSEN"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["summaries"][0]["image_name"], "drusen-1.jpeg");
    assert_eq!(body["summaries"][0]["total_answers"], 1);

    let response = app
        .oneshot(get("/api/admin/summary?diagnosis=cnv"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_admin_logs_page_clamped() {
    let (_dir, app) = setup_app().await;

    let response = app
        .oneshot(get("/api/admin/activity-logs?page=9999"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["page"], 1);
    assert_eq!(body["total"], 0);
}
