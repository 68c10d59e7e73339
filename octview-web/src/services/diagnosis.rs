//! Diagnosis and extracted-feature lookup
//!
//! Loads the two JSON documents the offline tools produce:
//! `sampled_by_diagnosis.json` (one record per sampled image, with the
//! reviewed diagnosis label) and `extracted_features.json` (per-diagnosis-id
//! clinical feature questions). Both are read once at startup; a missing or
//! malformed file degrades to an empty index with a warning rather than
//! failing startup, matching the non-fatal read policy of the store.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{info, warn};

/// One sampled dataset record with its reviewed diagnosis label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisRecord {
    pub id: i64,
    /// Source image path; lookups match on the basename
    pub image: String,
    /// Final reviewed diagnosis label
    #[serde(rename = "revised_answer_final")]
    pub diagnosis: String,
    /// Free-text model rationale the features were extracted from
    #[serde(rename = "rationale_o4_hf", default)]
    pub rationale: Option<String>,
}

/// One clinical feature question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    pub id: String,
    pub label: String,
    pub description: String,
}

/// Feature list wrapper as stored in extracted_features.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedFeatures {
    #[serde(default)]
    pub features: Vec<Feature>,
}

/// Extracted features for one diagnosis record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub id: i64,
    pub extracted_features: ExtractedFeatures,
}

/// In-memory index over both JSON documents
pub struct DiagnosisIndex {
    records: Vec<DiagnosisRecord>,
    features: Vec<FeatureRecord>,
}

impl DiagnosisIndex {
    /// Load the index from the data root's JSON files
    pub fn load(diagnosis_file: &Path, features_file: &Path) -> Self {
        let records: Vec<DiagnosisRecord> = load_json_array(diagnosis_file);
        let features: Vec<FeatureRecord> = load_json_array(features_file);
        info!(
            "Loaded {} diagnosis records, {} feature records",
            records.len(),
            features.len()
        );
        Self { records, features }
    }

    /// Build an index from already-parsed records (tests)
    pub fn from_records(records: Vec<DiagnosisRecord>, features: Vec<FeatureRecord>) -> Self {
        Self { records, features }
    }

    /// Find the diagnosis record whose image basename matches `filename`
    pub fn by_filename(&self, filename: &str) -> Option<&DiagnosisRecord> {
        self.records
            .iter()
            .find(|r| basename(&r.image) == filename)
    }

    /// Extracted features for a diagnosis record id
    pub fn features_for(&self, diagnosis_id: i64) -> Option<&FeatureRecord> {
        self.features.iter().find(|f| f.id == diagnosis_id)
    }

    /// Total questions for an image: the label-agreement question plus one
    /// per extracted feature; 0 when the image has no feature record
    pub fn total_questions(&self, filename: &str) -> usize {
        self.by_filename(filename)
            .and_then(|record| self.features_for(record.id))
            .map(|f| 1 + f.extracted_features.features.len())
            .unwrap_or(0)
    }

    /// All distinct diagnosis labels, sorted
    pub fn all_diagnoses(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.records.iter().map(|r| r.diagnosis.as_str()).collect();
        set.into_iter().map(String::from).collect()
    }
}

fn load_json_array<T: serde::de::DeserializeOwned>(path: &Path) -> Vec<T> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Could not read {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    match serde_json::from_str(&content) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Could not parse {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Final path component of a slash-separated image path
fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
