//! Database initialization
//!
//! Creates the review database on first start and keeps the schema current
//! on later starts. Initialization is idempotent: every step is either
//! `CREATE TABLE IF NOT EXISTS` or an additive column sync, so calling it
//! repeatedly (or from multiple construction paths) has no effect beyond
//! the first successful run. Schema changes are additive only — a missing
//! column is added with `ALTER TABLE`, existing rows are never touched.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, Row, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // WAL allows concurrent readers while one writer commits; the store
    // relies on SQLite's own isolation for its single-statement writes.
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_feature_answers_table(&pool).await?;
    create_answer_activity_logs_table(&pool).await?;

    // Additive schema sync: add columns that predate-schema databases lack
    sync_table_columns(&pool, "feature_answers", &[("explanation", "TEXT")]).await?;

    Ok(pool)
}

async fn create_feature_answers_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS feature_answers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            image_name TEXT NOT NULL,
            feature_id TEXT NOT NULL,
            answer TEXT NOT NULL,
            reason TEXT,
            explanation TEXT,
            timestamp TEXT NOT NULL,
            UNIQUE(image_name, feature_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_answer_activity_logs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS answer_activity_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            image_name TEXT NOT NULL,
            action TEXT NOT NULL,
            feature_id TEXT,
            answer TEXT,
            is_checked INTEGER,
            element_type TEXT,
            form_id TEXT,
            form_action TEXT,
            timestamp TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Add any expected column missing from an existing table
///
/// Non-destructive: introspects `PRAGMA table_info` and issues
/// `ALTER TABLE ... ADD COLUMN` only for columns that do not exist yet.
/// Existing rows keep their data; the new column reads as NULL for them.
pub async fn sync_table_columns(
    pool: &SqlitePool,
    table: &str,
    expected: &[(&str, &str)],
) -> Result<()> {
    let rows = sqlx::query(&format!("PRAGMA table_info({})", table))
        .fetch_all(pool)
        .await?;

    // PRAGMA table_info returns (cid, name, type, notnull, dflt_value, pk)
    let existing: Vec<String> = rows.iter().map(|row| row.get::<String, _>(1)).collect();

    for (name, sql_type) in expected {
        if !existing.iter().any(|c| c == name) {
            let sql = format!("ALTER TABLE {} ADD COLUMN {} {}", table, name, sql_type);
            sqlx::query(&sql).execute(pool).await?;
            info!("Added missing column {}.{} ({})", table, name, sql_type);
        }
    }

    Ok(())
}
