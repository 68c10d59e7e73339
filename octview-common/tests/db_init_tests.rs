//! Unit tests for database initialization
//!
//! Tests cover:
//! - Automatic database creation with default schema
//! - Idempotent re-initialization of an existing database
//! - Additive column migration preserving existing rows

use octview_common::db::init::init_database;
use sqlx::Row;
use tempfile::TempDir;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("reviews.db");

    let result = init_database(&db_path).await;
    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");

    // Both tables should exist and be queryable
    let pool = result.unwrap();
    let answers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM feature_answers")
        .fetch_one(&pool)
        .await
        .unwrap();
    let logs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM answer_activity_logs")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(answers, 0);
    assert_eq!(logs, 0);
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("reviews.db");

    let pool1 = init_database(&db_path).await;
    assert!(pool1.is_ok());
    drop(pool1);

    // Second initialization must succeed without side effects
    let pool2 = init_database(&db_path).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.err());
}

#[tokio::test]
async fn test_explanation_column_added_non_destructively() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("reviews.db");

    // Simulate a database created before the explanation column existed
    {
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = sqlx::SqlitePool::connect(&url).await.unwrap();
        sqlx::query(
            r#"
            CREATE TABLE feature_answers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                image_name TEXT NOT NULL,
                feature_id TEXT NOT NULL,
                answer TEXT NOT NULL,
                reason TEXT,
                timestamp TEXT NOT NULL,
                UNIQUE(image_name, feature_id)
            )
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();

        sqlx::query(
            "INSERT INTO feature_answers (image_name, feature_id, answer, reason, timestamp) \
             VALUES ('img.jpeg', 'f1', 'yes', 'because', '2026-01-01T00:00:00.000000Z')",
        )
        .execute(&pool)
        .await
        .unwrap();
        pool.close().await;
    }

    let pool = init_database(&db_path).await.unwrap();

    // Column was added...
    let columns = sqlx::query("PRAGMA table_info(feature_answers)")
        .fetch_all(&pool)
        .await
        .unwrap();
    let names: Vec<String> = columns.iter().map(|r| r.get::<String, _>(1)).collect();
    assert!(names.contains(&"explanation".to_string()), "columns: {:?}", names);

    // ...and the pre-existing row survived with its data intact
    let row = sqlx::query(
        "SELECT answer, reason, explanation FROM feature_answers WHERE image_name = 'img.jpeg'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(row.get::<String, _>(0), "yes");
    assert_eq!(row.get::<String, _>(1), "because");
    assert_eq!(row.get::<Option<String>, _>(2), None);
}
