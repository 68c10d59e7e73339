//! Review-state persistence
//!
//! Two tables back the review workflow: `feature_answers` holds at most one
//! current row per (image_name, feature_id) pair, upserted on every reviewer
//! submit; `answer_activity_logs` is an append-only record of UI events.
//!
//! Failure semantics: every public operation catches storage errors, reports
//! them via `tracing`, and returns a safe default (false / empty / zero)
//! instead of propagating. Callers must treat those defaults as "operation
//! did not happen", and check the boolean result of writes.

use octview_common::db::models::{
    ActivityEvent, ActivityLogEntry, AnswerDetail, FeatureAnswer, ACTION_ANSWER_DELETE,
    DELETED_ANSWER_PLACEHOLDER,
};
use octview_common::time::now_timestamp;
use octview_common::Result;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use tracing::{error, warn};

mod summary;

/// Durable keyed storage for reviewer answers and the activity log
#[derive(Clone)]
pub struct AnswerStore {
    pool: SqlitePool,
}

impl AnswerStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Upsert one reviewer answer, keyed by (image_name, feature_id)
    ///
    /// Returns false without writing when answer, reason and explanation are
    /// all empty. True on insert and on pure update of an existing key.
    pub async fn save_feature_answer(
        &self,
        image_name: &str,
        feature_id: &str,
        answer: &str,
        reason: &str,
        explanation: &str,
    ) -> bool {
        if answer.is_empty() && reason.is_empty() && explanation.is_empty() {
            warn!("Rejected empty answer for {}/{}", image_name, feature_id);
            return false;
        }

        match self
            .try_save_answer(image_name, feature_id, answer, reason, explanation)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to save answer for {}/{}: {}", image_name, feature_id, e);
                false
            }
        }
    }

    /// All answers for one image, keyed by feature_id
    ///
    /// Empty optional fields normalize to "". Returns an empty map both for
    /// unknown images and on storage failure; reads never raise.
    pub async fn feature_answers(&self, image_name: &str) -> HashMap<String, AnswerDetail> {
        match self.try_feature_answers(image_name).await {
            Ok(answers) => answers,
            Err(e) => {
                error!("Failed to load answers for {}: {}", image_name, e);
                HashMap::new()
            }
        }
    }

    /// Delete all answers for one image; idempotent, true on zero matches
    pub async fn delete_feature_answers(&self, image_name: &str) -> bool {
        let result = sqlx::query("DELETE FROM feature_answers WHERE image_name = ?")
            .bind(image_name)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => true,
            Err(e) => {
                error!("Failed to delete answers for {}: {}", image_name, e);
                false
            }
        }
    }

    /// Every answer row across all images, newest first (admin export)
    pub async fn all_answers(&self) -> Vec<FeatureAnswer> {
        match self.try_all_answers().await {
            Ok(rows) => rows,
            Err(e) => {
                error!("Failed to load all answers: {}", e);
                Vec::new()
            }
        }
    }

    /// Append one activity log entry
    ///
    /// `answer_delete` events are stored with a fixed placeholder answer and
    /// is_checked = false, regardless of caller-supplied fields, to mark
    /// that the answer was removed rather than left blank.
    pub async fn log_activity(&self, event: &ActivityEvent) -> bool {
        match self.try_log_activity(event).await {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to log {} for {}: {}", event.action, event.image_name, e);
                false
            }
        }
    }

    /// One page of activity log entries, newest first
    pub async fn activity_logs(&self, limit: i64, offset: i64) -> Vec<ActivityLogEntry> {
        match self.try_activity_logs(limit, offset).await {
            Ok(logs) => logs,
            Err(e) => {
                error!("Failed to load activity logs: {}", e);
                Vec::new()
            }
        }
    }

    /// Total row count in the activity log table
    pub async fn activity_log_count(&self) -> i64 {
        let result: std::result::Result<i64, sqlx::Error> =
            sqlx::query_scalar("SELECT COUNT(*) FROM answer_activity_logs")
                .fetch_one(&self.pool)
                .await;

        match result {
            Ok(count) => count,
            Err(e) => {
                error!("Failed to count activity logs: {}", e);
                0
            }
        }
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn try_save_answer(
        &self,
        image_name: &str,
        feature_id: &str,
        answer: &str,
        reason: &str,
        explanation: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO feature_answers (image_name, feature_id, answer, reason, explanation, timestamp)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(image_name, feature_id) DO UPDATE SET
                answer = excluded.answer,
                reason = excluded.reason,
                explanation = excluded.explanation,
                timestamp = excluded.timestamp
            "#,
        )
        .bind(image_name)
        .bind(feature_id)
        .bind(answer)
        .bind(reason)
        .bind(explanation)
        .bind(now_timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn try_feature_answers(&self, image_name: &str) -> Result<HashMap<String, AnswerDetail>> {
        let rows = sqlx::query(
            r#"
            SELECT feature_id, answer, reason, explanation, timestamp
            FROM feature_answers
            WHERE image_name = ?
            "#,
        )
        .bind(image_name)
        .fetch_all(&self.pool)
        .await?;

        let mut answers = HashMap::new();
        for row in rows {
            answers.insert(
                row.get::<String, _>("feature_id"),
                AnswerDetail {
                    answer: row.get("answer"),
                    reason: row.get::<Option<String>, _>("reason").unwrap_or_default(),
                    explanation: row
                        .get::<Option<String>, _>("explanation")
                        .unwrap_or_default(),
                    timestamp: row.get("timestamp"),
                },
            );
        }

        Ok(answers)
    }

    async fn try_all_answers(&self) -> Result<Vec<FeatureAnswer>> {
        let rows = sqlx::query(
            r#"
            SELECT image_name, feature_id, answer, reason, explanation, timestamp
            FROM feature_answers
            ORDER BY timestamp DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| FeatureAnswer {
                image_name: row.get("image_name"),
                feature_id: row.get("feature_id"),
                answer: row.get("answer"),
                reason: row.get::<Option<String>, _>("reason").unwrap_or_default(),
                explanation: row
                    .get::<Option<String>, _>("explanation")
                    .unwrap_or_default(),
                timestamp: row.get("timestamp"),
            })
            .collect())
    }

    async fn try_log_activity(&self, event: &ActivityEvent) -> Result<()> {
        // answer_delete rows get a synthetic marker, not the caller's fields
        let (answer, is_checked, element_type) = if event.action == ACTION_ANSWER_DELETE {
            (
                Some(DELETED_ANSWER_PLACEHOLDER.to_string()),
                Some(false),
                Some("delete".to_string()),
            )
        } else {
            (
                event.answer.clone(),
                event.is_checked,
                event.element_type.clone(),
            )
        };

        sqlx::query(
            r#"
            INSERT INTO answer_activity_logs
                (image_name, action, feature_id, answer, is_checked, element_type, form_id, form_action, timestamp)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&event.image_name)
        .bind(&event.action)
        .bind(&event.feature_id)
        .bind(answer)
        .bind(is_checked)
        .bind(element_type)
        .bind(&event.form_id)
        .bind(&event.form_action)
        .bind(now_timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn try_activity_logs(&self, limit: i64, offset: i64) -> Result<Vec<ActivityLogEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, image_name, action, feature_id, answer, is_checked,
                   element_type, form_id, form_action, timestamp
            FROM answer_activity_logs
            ORDER BY timestamp DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| ActivityLogEntry {
                id: row.get("id"),
                image_name: row.get("image_name"),
                action: row.get("action"),
                feature_id: row.get("feature_id"),
                answer: row.get("answer"),
                is_checked: row.get("is_checked"),
                element_type: row.get("element_type"),
                form_id: row.get("form_id"),
                form_action: row.get("form_action"),
                timestamp: row.get("timestamp"),
            })
            .collect())
    }
}
