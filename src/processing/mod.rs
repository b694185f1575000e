//! Embedding, role catalog and ranking

pub mod catalog;
pub mod embeddings;
pub mod embedding_manager;
pub mod matcher;
pub mod screening;
