//! Error handling for the resume screener

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreenerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Model loading error: {0}")]
    ModelLoading(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Role catalog error: {0}")]
    Catalog(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),
}

pub type Result<T> = std::result::Result<T, ScreenerError>;

/// Why a document produced no text.
///
/// Extraction never aborts the screening pipeline; callers receive this
/// alongside an empty text and decide whether to surface it.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to extract text from PDF '{}': {reason}", path.display())]
    Pdf { path: PathBuf, reason: String },

    #[error("failed to extract text from Word document '{}': {reason}", path.display())]
    Word { path: PathBuf, reason: String },
}

impl ExtractionError {
    /// Short machine-readable label for reports and API responses
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionError::Io { .. } => "io",
            ExtractionError::Pdf { .. } => "pdf",
            ExtractionError::Word { .. } => "word",
        }
    }
}

/// Convert anyhow errors (model2vec-rs reports these) to our custom error type
impl From<anyhow::Error> for ScreenerError {
    fn from(err: anyhow::Error) -> Self {
        ScreenerError::ModelLoading(err.to_string())
    }
}
