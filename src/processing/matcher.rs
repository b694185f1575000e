//! Resume-to-role ranking by cosine similarity

use crate::processing::catalog::{Role, RoleCatalog};
use crate::processing::embeddings::{cosine_similarity, Embedder, Embedding};
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Number of roles returned per resume
pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRole {
    pub id: String,
    pub title: String,
    pub score: f32,
}

/// Roles ordered by descending score; equal scores keep catalog order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankedResult {
    entries: Vec<ScoredRole>,
}

impl RankedResult {
    /// Sort scored roles (stable, descending) and keep the first `top_n`.
    pub fn from_scores(mut scored: Vec<ScoredRole>, top_n: usize) -> Self {
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(top_n);
        Self { entries: scored }
    }

    pub fn entries(&self) -> &[ScoredRole] {
        &self.entries
    }

    pub fn best(&self) -> Option<&ScoredRole> {
        self.entries.first()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.title.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_sorted_descending(&self) -> bool {
        self.entries.windows(2).all(|w| w[0].score >= w[1].score)
    }
}

struct IndexedRole {
    role: Role,
    embedding: Embedding,
}

/// Role catalog with every description embedded up front.
pub struct RoleMatcher {
    roles: Vec<IndexedRole>,
    dimension: usize,
}

impl RoleMatcher {
    pub fn build(catalog: &RoleCatalog, embedder: &dyn Embedder) -> Self {
        let roles = catalog
            .roles()
            .iter()
            .map(|role| IndexedRole {
                role: role.clone(),
                embedding: embedder.embed(&role.description),
            })
            .collect();

        Self {
            roles,
            dimension: embedder.dimension(),
        }
    }

    /// Score every role against the resume and return the best `top_n`.
    pub fn rank(&self, resume_embedding: &[f32], top_n: usize) -> RankedResult {
        if resume_embedding.len() != self.dimension {
            debug!(
                "Resume embedding has {} dimensions, catalog was embedded with {}",
                resume_embedding.len(),
                self.dimension
            );
        }

        let scored = self
            .roles
            .iter()
            .map(|indexed| ScoredRole {
                id: indexed.role.id.clone(),
                title: indexed.role.title.clone(),
                score: cosine_similarity(resume_embedding, &indexed.embedding),
            })
            .collect();

        let ranked = RankedResult::from_scores(scored, top_n);
        debug!("Ranked {} roles, best: {:?}", self.roles.len(), ranked.best().map(|r| &r.title));
        ranked
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}
