//! Answer aggregation
//!
//! Read-only rollups joining the answers table against the activity log.
//! The `is_checked` flag is not persisted on the answer itself; it is
//! recovered from the most recent `answer_check` log entry for the same
//! (image_name, feature_id) key, defaulting to false when none exists.

use octview_common::db::models::{ImageAnswerSummary, SummaryAnswer, ACTION_ANSWER_CHECK};
use octview_common::Result;
use sqlx::Row;
use std::collections::HashMap;
use tracing::error;

use super::AnswerStore;

impl AnswerStore {
    /// Per-image summary of the latest answer per feature
    ///
    /// Sorted by `last_updated` descending. Empty on storage failure.
    pub async fn image_answer_summary(&self) -> Vec<ImageAnswerSummary> {
        match self.try_image_answer_summary().await {
            Ok(summaries) => summaries,
            Err(e) => {
                error!("Failed to build answer summary: {}", e);
                Vec::new()
            }
        }
    }

    /// Summary filtered by case-insensitive diagnosis substring on the
    /// image name; empty/None filter returns the unfiltered list
    pub async fn image_answer_summary_by_diagnosis(
        &self,
        diagnosis_name: Option<&str>,
    ) -> Vec<ImageAnswerSummary> {
        let all = self.image_answer_summary().await;

        let needle = match diagnosis_name {
            Some(name) if !name.is_empty() => name.to_lowercase(),
            _ => return all,
        };

        all.into_iter()
            .filter(|s| s.image_name.to_lowercase().contains(&needle))
            .collect()
    }

    async fn try_image_answer_summary(&self) -> Result<Vec<ImageAnswerSummary>> {
        // The subquery picks the latest answer_check row per key; SQLite's
        // bare-column-with-MAX semantics select the row holding MAX(id).
        let rows = sqlx::query(
            r#"
            SELECT
                fa.image_name,
                fa.feature_id,
                fa.answer,
                fa.timestamp,
                COALESCE(al.is_checked, 0) AS is_checked
            FROM feature_answers fa
            LEFT JOIN (
                SELECT image_name, feature_id, is_checked, MAX(id)
                FROM answer_activity_logs
                WHERE action = ?
                GROUP BY image_name, feature_id
            ) al ON al.image_name = fa.image_name AND al.feature_id = fa.feature_id
            ORDER BY fa.image_name, fa.timestamp DESC
            "#,
        )
        .bind(ACTION_ANSWER_CHECK)
        .fetch_all(self.pool())
        .await?;

        let mut by_image: HashMap<String, ImageAnswerSummary> = HashMap::new();

        for row in rows {
            let image_name: String = row.get("image_name");
            let feature_id: String = row.get("feature_id");
            let timestamp: String = row.get("timestamp");
            let answer = SummaryAnswer {
                answer: row.get("answer"),
                timestamp: timestamp.clone(),
                is_checked: row.get("is_checked"),
            };

            let summary = by_image
                .entry(image_name.clone())
                .or_insert_with(|| ImageAnswerSummary {
                    image_name,
                    answers: Default::default(),
                    total_answers: 0,
                    last_updated: timestamp.clone(),
                });

            // The UNIQUE(image_name, feature_id) constraint makes duplicate
            // keys impossible in a healthy database; tolerate them anyway by
            // keeping the greatest timestamp (RFC 3339 strings order
            // lexicographically the same as temporally).
            let keep_existing = summary
                .answers
                .get(&feature_id)
                .map(|existing| existing.timestamp >= answer.timestamp)
                .unwrap_or(false);
            if !keep_existing {
                summary.answers.insert(feature_id, answer);
            }

            if timestamp > summary.last_updated {
                summary.last_updated = timestamp;
            }
        }

        let mut result: Vec<ImageAnswerSummary> = by_image
            .into_values()
            .map(|mut s| {
                s.total_answers = s.answers.len();
                s
            })
            .collect();
        result.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));

        Ok(result)
    }
}
