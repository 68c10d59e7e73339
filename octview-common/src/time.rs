//! Timestamp formatting helpers
//!
//! All persisted timestamps use RFC 3339 UTC with microsecond precision and
//! a trailing `Z`. That keeps the stored strings fixed-width, so
//! lexicographic comparison of two timestamps matches temporal order. The
//! answer summary logic relies on this when it tie-breaks duplicate rows.

use chrono::{DateTime, SecondsFormat, Utc};

/// Current time as a persistable RFC 3339 UTC string
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Format an arbitrary instant in the persisted timestamp format
pub fn format_timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}
