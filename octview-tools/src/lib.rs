//! Shared helpers for the offline dataset tools
//!
//! The three bins in this crate prepare the files octview-web reads:
//! `sample-dataset` picks N records per diagnosis label out of the raw
//! dataset, `download-images` fetches their images into per-diagnosis
//! directories, and `extract-features` turns each record's free-text
//! rationale into structured clinical feature questions via an LLM.

use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Dataset field carrying the reviewed diagnosis label
pub const DIAGNOSIS_FIELD: &str = "revised_answer_final";

/// Read a JSON array of loosely-shaped dataset records
pub fn read_records(path: &Path) -> Result<Vec<Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let records: Vec<Value> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(records)
}

/// Write records back as pretty-printed JSON
pub fn write_records(path: &Path, records: &[Value]) -> Result<()> {
    let content = serde_json::to_string_pretty(records)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Group records by their diagnosis label, preserving input order
pub fn group_by_diagnosis(records: &[Value]) -> BTreeMap<String, Vec<&Value>> {
    let mut groups: BTreeMap<String, Vec<&Value>> = BTreeMap::new();
    for record in records {
        let diagnosis = record
            .get(DIAGNOSIS_FIELD)
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown")
            .to_string();
        groups.entry(diagnosis).or_default().push(record);
    }
    groups
}

/// Randomly sample up to `per_diagnosis` records per label
///
/// Labels with fewer records keep everything. A fixed seed makes the
/// sampling reproducible; None seeds from the OS.
pub fn sample_per_diagnosis(
    records: &[Value],
    per_diagnosis: usize,
    target_diagnoses: Option<&[String]>,
    seed: Option<u64>,
) -> Vec<Value> {
    let mut rng = match seed {
        Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
        None => rand::rngs::StdRng::from_entropy(),
    };

    let groups = group_by_diagnosis(records);
    let mut sampled = Vec::new();

    for (diagnosis, items) in groups {
        if let Some(targets) = target_diagnoses {
            if !targets.iter().any(|t| t == &diagnosis) {
                continue;
            }
        }

        let chosen: Vec<&&Value> = items.choose_multiple(&mut rng, per_diagnosis).collect();
        tracing::info!(
            "{}: sampled {} of {} records",
            diagnosis,
            chosen.len(),
            items.len()
        );
        sampled.extend(chosen.into_iter().map(|v| (*v).clone()));
    }

    sampled
}

/// Extract the first JSON object from an LLM reply
///
/// Prefers a fenced ```json block; falls back to the outermost brace pair.
/// Returns the candidate only if it parses as JSON.
pub fn extract_json_object(reply: &str) -> Option<String> {
    if let Some(candidate) = fenced_block(reply) {
        if serde_json::from_str::<Value>(candidate).is_ok() {
            return Some(candidate.to_string());
        }
    }

    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    if end <= start {
        return None;
    }
    let candidate = &reply[start..=end];
    if serde_json::from_str::<Value>(candidate).is_ok() {
        Some(candidate.to_string())
    } else {
        None
    }
}

/// Contents of the first ``` fence, with an optional `json` language tag
fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_open = &text[open + 3..];
    let after_tag = after_open
        .strip_prefix("json")
        .unwrap_or(after_open)
        .trim_start_matches(['\r', '\n']);
    let close = after_tag.find("```")?;
    Some(after_tag[..close].trim())
}

/// Final path component of a slash-separated path or URL
pub fn basename(path: &str) -> &str {
    path.trim_end_matches('/')
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(path)
}
