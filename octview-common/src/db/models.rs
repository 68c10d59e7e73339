//! Database models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placeholder answer stored for `answer_delete` activity entries.
///
/// Marks that an answer was removed rather than left blank; the log row
/// keeps this synthetic value regardless of what the caller supplied.
pub const DELETED_ANSWER_PLACEHOLDER: &str = "[deleted]";

/// Activity action that records a checkbox/radio toggle
pub const ACTION_ANSWER_CHECK: &str = "answer_check";

/// Activity action that records an answer deletion
pub const ACTION_ANSWER_DELETE: &str = "answer_delete";

/// One reviewer judgment about one clinical feature of one image.
///
/// At most one live row exists per (image_name, feature_id); a new write
/// with the same key replaces the prior value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureAnswer {
    pub image_name: String,
    pub feature_id: String,
    pub answer: String,
    pub reason: String,
    pub explanation: String,
    pub timestamp: String,
}

/// Per-feature answer detail as returned for a single image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerDetail {
    pub answer: String,
    pub reason: String,
    pub explanation: String,
    pub timestamp: String,
}

/// An immutable record of one UI interaction (append-only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    pub id: i64,
    pub image_name: String,
    pub action: String,
    pub feature_id: Option<String>,
    pub answer: Option<String>,
    pub is_checked: Option<bool>,
    pub element_type: Option<String>,
    pub form_id: Option<String>,
    pub form_action: Option<String>,
    pub timestamp: String,
}

/// One UI event as submitted by the browser, validated at the boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub image_name: String,
    pub action: String,
    #[serde(default)]
    pub feature_id: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub is_checked: Option<bool>,
    #[serde(default)]
    pub element_type: Option<String>,
    #[serde(default)]
    pub form_id: Option<String>,
    #[serde(default)]
    pub form_action: Option<String>,
}

/// Latest answer for one feature within an image summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryAnswer {
    pub answer: String,
    pub timestamp: String,
    pub is_checked: bool,
}

/// Per-image rollup computed on demand from answers and the activity log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAnswerSummary {
    pub image_name: String,
    /// Latest answer per feature_id; `is_checked` is recovered from the
    /// most recent `answer_check` log entry for the same key
    pub answers: BTreeMap<String, SummaryAnswer>,
    pub total_answers: usize,
    pub last_updated: String,
}
