//! Resume screening pipeline: extract, embed, rank

use crate::error::ExtractionError;
use crate::input::manager::{log_extraction_failure, InputManager};
use crate::processing::catalog::RoleCatalog;
use crate::processing::embeddings::Embedder;
use crate::processing::matcher::{RankedResult, RoleMatcher};
use log::info;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Result of screening one uploaded resume
#[derive(Debug)]
pub struct ScreeningOutcome {
    pub ranking: RankedResult,
    /// Extracted text, kept for downstream reuse
    pub resume_text: String,
    /// Set when extraction failed and the ranking was computed from empty text
    pub extraction_error: Option<ExtractionError>,
    pub processing_time_ms: u64,
}

impl ScreeningOutcome {
    pub fn is_degraded(&self) -> bool {
        self.extraction_error.is_some()
    }
}

pub struct Screener {
    input: InputManager,
    embedder: Arc<dyn Embedder>,
    catalog: RoleCatalog,
    matcher: RoleMatcher,
    top_n: usize,
}

impl Screener {
    /// Embeds the catalog once; the screener is immutable afterwards.
    pub fn new(embedder: Arc<dyn Embedder>, catalog: RoleCatalog, top_n: usize) -> Self {
        let start_time = Instant::now();
        let matcher = RoleMatcher::build(&catalog, embedder.as_ref());
        info!(
            "Embedded {} role descriptions with {} in {:.2?}",
            matcher.len(),
            embedder.model_name(),
            start_time.elapsed()
        );

        Self {
            input: InputManager::new(),
            embedder,
            catalog,
            matcher,
            top_n,
        }
    }

    pub async fn screen_file(&self, path: &Path, declared_extension: &str) -> ScreeningOutcome {
        let start_time = Instant::now();

        let (resume_text, extraction_error) = match self.input.extract(path, declared_extension).await {
            Ok(text) => (text, None),
            Err(e) => {
                log_extraction_failure(&e);
                (String::new(), Some(e))
            }
        };

        let ranking = self.screen_text(&resume_text);

        ScreeningOutcome {
            ranking,
            resume_text,
            extraction_error,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        }
    }

    pub fn screen_text(&self, text: &str) -> RankedResult {
        let resume_embedding = self.embedder.embed(text);
        self.matcher.rank(&resume_embedding, self.top_n)
    }

    pub fn catalog(&self) -> &RoleCatalog {
        &self.catalog
    }

    pub fn input(&self) -> &InputManager {
        &self.input
    }

    pub fn model_name(&self) -> &str {
        self.embedder.model_name()
    }

    pub fn embedding_dimension(&self) -> usize {
        self.embedder.dimension()
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }
}
