//! Shared helpers for integration tests
#![allow(dead_code)]

use resume_screener::processing::catalog::{Role, RoleCatalog};
use resume_screener::processing::embeddings::{Embedder, Embedding};
use resume_screener::processing::matcher::DEFAULT_TOP_N;
use resume_screener::processing::screening::Screener;
use std::sync::Arc;

pub const HASHING_DIMENSION: usize = 1024;

/// Bag-of-words embedder: each lowercased alphanumeric token bumps one
/// FNV-1a bucket. Deterministic and offline, so rankings are predictable.
pub struct HashingEmbedder;

impl HashingEmbedder {
    fn bucket(token: &str) -> usize {
        let mut hash: u64 = 0xcbf29ce484222325;
        for byte in token.bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x100000001b3);
        }
        (hash % HASHING_DIMENSION as u64) as usize
    }
}

impl Embedder for HashingEmbedder {
    fn embed(&self, text: &str) -> Embedding {
        let mut vector = vec![0.0f32; HASHING_DIMENSION];
        let lowered = text.to_lowercase();
        for token in lowered
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            vector[Self::bucket(token)] += 1.0;
        }
        vector
    }

    fn dimension(&self) -> usize {
        HASHING_DIMENSION
    }

    fn model_name(&self) -> &str {
        "hashing"
    }
}

pub fn hashing_embedder() -> Arc<dyn Embedder> {
    Arc::new(HashingEmbedder)
}

pub fn default_screener() -> Screener {
    Screener::new(hashing_embedder(), RoleCatalog::default_roles(), DEFAULT_TOP_N)
}

pub fn screener_with_roles(roles: &[(&str, &str, &str)], top_n: usize) -> Screener {
    let roles = roles
        .iter()
        .map(|(id, title, description)| Role::new(id, title, description))
        .collect();
    let catalog = RoleCatalog::new(roles).expect("valid test catalog");
    Screener::new(hashing_embedder(), catalog, top_n)
}
