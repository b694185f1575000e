//! Embeddings generation using Model2Vec

use crate::config::Config;
use crate::error::{Result, ScreenerError};
use crate::processing::embedding_manager::EmbeddingModelManager;
use async_trait::async_trait;
use log::info;
use model2vec_rs::model::StaticModel;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::OnceCell;

pub type Embedding = Vec<f32>;

/// Maps text to a fixed-dimension vector.
///
/// Embeddings are only comparable when produced by the same implementation
/// and model version.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Embedding;
    fn dimension(&self) -> usize;
    fn model_name(&self) -> &str;
}

pub struct Model2VecEmbedder {
    model: StaticModel,
    model_name: String,
    dimension: usize,
}

impl Model2VecEmbedder {
    /// Load a model from a local directory holding
    /// `model.safetensors`, `tokenizer.json` and `config.json`.
    pub fn load(model_path: &Path, model_name: &str) -> Result<Self> {
        let start_time = Instant::now();
        info!("Loading Model2Vec embedding model from: {}", model_path.display());

        let model = StaticModel::from_pretrained(model_path, None, None, None).map_err(|e| {
            ScreenerError::ModelLoading(format!(
                "Failed to load model from {}: {}",
                model_path.display(),
                e
            ))
        })?;

        // The empty sentence encodes to a zero vector of full width
        let dimension = model.encode_single("").len();
        if dimension == 0 {
            return Err(ScreenerError::ModelLoading(format!(
                "Model at {} produced zero-width embeddings",
                model_path.display()
            )));
        }

        info!("Model loaded in {:.2?} ({} dimensions)", start_time.elapsed(), dimension);

        Ok(Self {
            model,
            model_name: model_name.to_string(),
            dimension,
        })
    }
}

impl Embedder for Model2VecEmbedder {
    fn embed(&self, text: &str) -> Embedding {
        self.model.encode_single(text)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Cosine similarity between two embeddings.
///
/// Empty slices stand for an absent embedding. Absent inputs, mismatched
/// dimensions and zero-norm vectors all score `0.0`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;

    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let score = dot / (norm_a.sqrt() * norm_b.sqrt());
    if !score.is_finite() {
        return 0.0;
    }

    score.clamp(-1.0, 1.0) as f32
}

/// Produces the process-wide embedder the first time it is needed
#[async_trait]
pub trait EmbedderLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn Embedder>>;
}

/// Resolves the configured model (downloading it on first use) and loads it.
pub struct HubModelLoader {
    models_dir: PathBuf,
    model: String,
}

impl HubModelLoader {
    pub fn new(models_dir: PathBuf, model: impl Into<String>) -> Self {
        Self {
            models_dir,
            model: model.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.models.models_dir.clone(), config.models.embedding_model.clone())
    }
}

#[async_trait]
impl EmbedderLoader for HubModelLoader {
    async fn load(&self) -> Result<Arc<dyn Embedder>> {
        let mut manager = EmbeddingModelManager::new(self.models_dir.clone()).await?;
        let model_path = manager.ensure_model_available(&self.model).await?;

        let model_name = self.model.clone();
        let embedder = tokio::task::spawn_blocking(move || {
            Model2VecEmbedder::load(&model_path, &model_name)
        })
        .await
        .map_err(|e| ScreenerError::ModelLoading(format!("Model loading task failed: {}", e)))??;

        Ok(Arc::new(embedder))
    }
}

/// Process-lifetime owner of the embedding model.
///
/// The model is loaded at most once, even when several requests ask for it
/// concurrently before it is ready. A failed load is not cached, so a later
/// call tries again.
pub struct ModelContext {
    embedder: OnceCell<Arc<dyn Embedder>>,
    loader: Box<dyn EmbedderLoader>,
}

impl ModelContext {
    pub fn new(loader: impl EmbedderLoader + 'static) -> Self {
        Self {
            embedder: OnceCell::new(),
            loader: Box::new(loader),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(HubModelLoader::from_config(config))
    }

    /// Context around an already constructed embedder
    pub fn preloaded(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder: OnceCell::new_with(Some(embedder)),
            loader: Box::new(PreloadedLoader),
        }
    }

    pub async fn embedder(&self) -> Result<Arc<dyn Embedder>> {
        self.embedder
            .get_or_try_init(|| self.loader.load())
            .await
            .map(Arc::clone)
    }

    pub fn is_loaded(&self) -> bool {
        self.embedder.initialized()
    }
}

struct PreloadedLoader;

#[async_trait]
impl EmbedderLoader for PreloadedLoader {
    async fn load(&self) -> Result<Arc<dyn Embedder>> {
        Err(ScreenerError::ModelLoading(
            "preloaded model context has no loader".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct ConstantEmbedder(Vec<f32>);

    impl Embedder for ConstantEmbedder {
        fn embed(&self, _text: &str) -> Embedding {
            self.0.clone()
        }

        fn dimension(&self) -> usize {
            self.0.len()
        }

        fn model_name(&self) -> &str {
            "constant"
        }
    }

    struct CountingLoader {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl EmbedderLoader for CountingLoader {
        async fn load(&self) -> Result<Arc<dyn Embedder>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            if self.fail {
                return Err(ScreenerError::ModelLoading("weights unavailable".to_string()));
            }
            Ok(Arc::new(ConstantEmbedder(vec![1.0, 0.0])))
        }
    }

    #[test]
    fn test_cosine_similarity_of_vector_with_itself() {
        let a = [0.3, -1.2, 4.0, 0.01];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_is_symmetric() {
        let a = [1.0, 2.0, 3.0];
        let b = [-0.5, 4.0, 0.25];
        assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
    }

    #[test]
    fn test_cosine_similarity_known_values() {
        assert!((cosine_similarity(&[1.0, 0.0], &[0.0, 1.0])).abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-2.0, 0.0]) + 1.0).abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 1.0], &[1.0, 0.0]) - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_degenerate_inputs() {
        let zero = [0.0, 0.0, 0.0];
        let other = [1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&zero, &other), 0.0);
        assert_eq!(cosine_similarity(&other, &zero), 0.0);
        assert_eq!(cosine_similarity(&[], &other), 0.0);
        assert_eq!(cosine_similarity(&other, &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[f32::NAN, 1.0], &[1.0, 1.0]), 0.0);
    }

    #[tokio::test]
    async fn test_model_context_loads_once_under_concurrency() {
        let calls = Arc::new(AtomicUsize::new(0));
        let context = Arc::new(ModelContext::new(CountingLoader {
            calls: Arc::clone(&calls),
            fail: false,
        }));
        assert!(!context.is_loaded());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let context = Arc::clone(&context);
                tokio::spawn(async move { context.embedder().await.map(|e| e.dimension()) })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), 2);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(context.is_loaded());
    }

    #[tokio::test]
    async fn test_model_context_surfaces_load_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let context = ModelContext::new(CountingLoader {
            calls: Arc::clone(&calls),
            fail: true,
        });

        assert!(matches!(context.embedder().await, Err(ScreenerError::ModelLoading(_))));
        assert!(!context.is_loaded());

        // Not cached: the next request tries again
        let _ = context.embedder().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_preloaded_context() {
        let context = ModelContext::preloaded(Arc::new(ConstantEmbedder(vec![0.5; 4])));
        assert!(context.is_loaded());
        assert_eq!(context.embedder().await.unwrap().model_name(), "constant");
    }
}
