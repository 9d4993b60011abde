use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sentinel used when a record carries no abstract text
pub const NO_ABSTRACT: &str = "No Abstract";

fn not_reported() -> String {
    "not reported".to_string()
}

/// A normalized article awaiting quality filtering and annotation
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRecord {
    /// Stable source identifier, never empty
    pub id: String,
    /// Free-text publication date, empty if unavailable
    pub publication_date: String,
    /// Venue name, title-cased for display
    pub journal: String,
    /// Venue quality score, 0.0 for venues missing from the ratings table
    pub impact_factor: f64,
    pub title: String,
    /// Abstract body, or [`NO_ABSTRACT`] when none was published
    pub abstract_text: String,
}

impl CandidateRecord {
    pub fn has_abstract(&self) -> bool {
        self.abstract_text != NO_ABSTRACT
    }
}

/// Structured extraction produced for one article.
///
/// Fields absent from an otherwise valid reply default individually to
/// "not reported" rather than failing the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleAnnotation {
    #[serde(default = "not_reported")]
    pub summary: String,
    #[serde(default = "not_reported")]
    pub sequencing_methods: String,
    #[serde(default = "not_reported")]
    pub tools: String,
    #[serde(default = "not_reported")]
    pub innovation: String,
}

impl ArticleAnnotation {
    /// Substitute for records that carry no abstract; no service call is made
    pub fn no_abstract() -> Self {
        Self {
            summary: "no abstract".to_string(),
            sequencing_methods: "none".to_string(),
            tools: "none".to_string(),
            innovation: "none".to_string(),
        }
    }

    /// Substitute when the analysis service was unreachable or errored
    pub fn transport_failure() -> Self {
        Self {
            summary: "extraction failed".to_string(),
            sequencing_methods: "unknown".to_string(),
            tools: "unknown".to_string(),
            innovation: "unknown".to_string(),
        }
    }

    /// Substitute when the service replied outside the expected structure
    pub fn format_failure() -> Self {
        Self {
            summary: "malformed response".to_string(),
            sequencing_methods: "error".to_string(),
            tools: "error".to_string(),
            innovation: "error".to_string(),
        }
    }
}

/// The persisted unit: a candidate minus its abstract, plus its annotation
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub id: String,
    pub publication_date: String,
    pub journal: String,
    pub impact_factor: f64,
    pub title: String,
    pub annotation: ArticleAnnotation,
}

impl EnrichedRecord {
    pub fn new(candidate: CandidateRecord, annotation: ArticleAnnotation) -> Self {
        Self {
            id: candidate.id,
            publication_date: candidate.publication_date,
            journal: candidate.journal,
            impact_factor: candidate.impact_factor,
            title: candidate.title,
            annotation,
        }
    }
}

/// Why one raw record was dropped during normalization
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("record does not match the expected structure: {0}")]
    Malformed(String),
    #[error("record has no usable identifier")]
    MissingIdentifier,
}

/// Why one annotation call produced no usable extraction
#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("analysis service unreachable: {0}")]
    Transport(String),
    #[error("analysis reply not in the expected structure: {0}")]
    MalformedResponse(String),
}
