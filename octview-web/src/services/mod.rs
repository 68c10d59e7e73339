//! Collaborator services consumed by the HTTP handlers

pub mod diagnosis;
pub mod images;

pub use diagnosis::{DiagnosisIndex, DiagnosisRecord, ExtractedFeatures, Feature, FeatureRecord};
pub use images::{Category, ImageEntry, ImageLibrary};
