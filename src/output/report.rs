//! Report structures for screening results

use crate::processing::matcher::RankedResult;
use crate::processing::screening::{Screener, ScreeningOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything a caller needs to render or serialize one screening
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningReport {
    /// Original filename (or path) of the resume
    pub resume: String,

    /// Ranked roles, best first
    pub scores: RankedResult,

    pub extraction: ExtractionSummary,

    pub model: ModelSummary,

    pub metadata: ReportMetadata,

    /// Extracted text, included on request for downstream reuse
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStatus {
    Extracted,
    /// The document parsed but contained no text
    Empty,
    /// Extraction failed; scores were computed from empty text
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionSummary {
    pub status: ExtractionStatus,
    pub characters: usize,
    pub words: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSummary {
    pub name: String,
    pub dimension: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub processing_time_ms: u64,
    pub version: String,
}

impl ScreeningReport {
    pub fn from_outcome(
        resume: &str,
        outcome: ScreeningOutcome,
        screener: &Screener,
        include_text: bool,
    ) -> Self {
        let status = match (&outcome.extraction_error, outcome.resume_text.trim().is_empty()) {
            (Some(_), _) => ExtractionStatus::Failed,
            (None, true) => ExtractionStatus::Empty,
            (None, false) => ExtractionStatus::Extracted,
        };

        let extraction = ExtractionSummary {
            status,
            characters: outcome.resume_text.chars().count(),
            words: outcome.resume_text.split_whitespace().count(),
            error_kind: outcome.extraction_error.as_ref().map(|e| e.kind().to_string()),
            error: outcome.extraction_error.as_ref().map(|e| e.to_string()),
        };

        Self {
            resume: resume.to_string(),
            scores: outcome.ranking,
            extraction,
            model: ModelSummary {
                name: screener.model_name().to_string(),
                dimension: screener.embedding_dimension(),
            },
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                processing_time_ms: outcome.processing_time_ms,
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            resume_text: include_text.then_some(outcome.resume_text),
        }
    }

    /// Whether the ranking carries no information about the resume
    pub fn is_low_confidence(&self) -> bool {
        self.extraction.status != ExtractionStatus::Extracted
    }
}
