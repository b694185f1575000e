//! Input manager for handling different file types

use crate::error::ExtractionError;
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    ExtractResult, PdfExtractor, PlainTextExtractor, TextExtractor, WordExtractor,
};
use log::{debug, info, warn};
use std::path::Path;

/// Routes a saved upload to the extractor matching its declared extension.
///
/// The extension comes from the original filename rather than the path on
/// disk, since uploads are stored under generated names.
pub struct InputManager {
    word: WordExtractor,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            word: WordExtractor::new(),
        }
    }

    /// Extract text, reporting why extraction failed.
    pub async fn extract(&self, path: &Path, declared_extension: &str) -> ExtractResult {
        let file_type = FileType::from_extension(declared_extension);

        let text = match file_type {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Word => {
                info!("Extracting text from Word document: {}", path.display());
                self.word.extract(path).await?
            }
            FileType::PlainText => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
        };

        debug!("Extracted {} characters from {}", text.chars().count(), path.display());
        Ok(text)
    }

    /// Extract text, collapsing every failure to an empty string.
    pub async fn extract_text(&self, path: &Path, declared_extension: &str) -> String {
        match self.extract(path, declared_extension).await {
            Ok(text) => text,
            Err(e) => {
                log_extraction_failure(&e);
                String::new()
            }
        }
    }
}

pub fn log_extraction_failure(error: &ExtractionError) {
    warn!("Text extraction failed ({}), continuing with empty text: {}", error.kind(), error);
}

/// Extension of the path itself, for callers that kept the original filename
pub fn declared_extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default()
}
