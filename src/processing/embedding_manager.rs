//! Embedding model management for downloading and locating Model2Vec models

use crate::error::{Result, ScreenerError};
use hf_hub::api::tokio::Api;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Files `StaticModel::from_pretrained` needs in a local model directory
const REQUIRED_FILES: [&str; 3] = ["model.safetensors", "tokenizer.json", "config.json"];

/// Information about an available embedding model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingModelInfo {
    pub name: String,
    pub repo_id: String,
    pub size_mb: u64,
    pub description: String,
    pub model_type: EmbeddingModelType,
    pub dimensions: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EmbeddingModelType {
    Model2Vec,
    Potion,
}

/// Manager for embedding models - handles download, caching, and selection
pub struct EmbeddingModelManager {
    models_dir: PathBuf,
    available_models: BTreeMap<String, EmbeddingModelInfo>,
    downloaded_models: HashSet<String>,
    api: Api,
}

impl EmbeddingModelManager {
    /// Create a new embedding model manager
    pub async fn new(models_dir: PathBuf) -> Result<Self> {
        if !models_dir.exists() {
            fs::create_dir_all(&models_dir).await.map_err(|e| {
                ScreenerError::ModelLoading(format!("Failed to create models directory: {}", e))
            })?;
        }

        let api = Api::new().map_err(|e| {
            ScreenerError::Network(format!("Failed to initialize HF API: {}", e))
        })?;

        let mut manager = Self {
            models_dir,
            available_models: BTreeMap::new(),
            downloaded_models: HashSet::new(),
            api,
        };

        manager.init_available_models();
        manager.scan_downloaded_models().await?;

        Ok(manager)
    }

    fn init_available_models(&mut self) {
        self.available_models.insert(
            "potion-base-8M".to_string(),
            EmbeddingModelInfo {
                name: "Potion Base 8M".to_string(),
                repo_id: "minishlab/potion-base-8M".to_string(),
                size_mb: 33,
                description: "High-quality Model2Vec embeddings with 8M parameters".to_string(),
                model_type: EmbeddingModelType::Potion,
                dimensions: 256,
            },
        );

        self.available_models.insert(
            "m2v-base".to_string(),
            EmbeddingModelInfo {
                name: "Model2Vec Base".to_string(),
                repo_id: "minishlab/M2V_base_output".to_string(),
                size_mb: 90,
                description: "Legacy Model2Vec base embeddings model".to_string(),
                model_type: EmbeddingModelType::Model2Vec,
                dimensions: 256,
            },
        );

        self.available_models.insert(
            "m2v-large".to_string(),
            EmbeddingModelInfo {
                name: "Model2Vec Large".to_string(),
                repo_id: "minishlab/M2V_large_output".to_string(),
                size_mb: 250,
                description: "High-capacity Model2Vec large embeddings model".to_string(),
                model_type: EmbeddingModelType::Model2Vec,
                dimensions: 512,
            },
        );
    }

    async fn scan_downloaded_models(&mut self) -> Result<()> {
        let mut entries = fs::read_dir(&self.models_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() && is_valid_model_directory(&entry.path()).await {
                self.downloaded_models
                    .insert(entry.file_name().to_string_lossy().to_string());
            }
        }

        Ok(())
    }

    /// Directory name used for a model under `models_dir`
    fn local_dir_name(&self, model: &str) -> String {
        self.resolve_model_id(model)
            .unwrap_or_else(|| model.replace('/', "--"))
    }

    fn repo_id_for(&self, model: &str) -> String {
        self.resolve_model_id(model)
            .and_then(|id| self.available_models.get(&id))
            .map(|info| info.repo_id.clone())
            .unwrap_or_else(|| model.to_string())
    }

    /// Download an embedding model from Hugging Face Hub
    pub async fn download_model(&mut self, model: &str, force: bool) -> Result<PathBuf> {
        let dir_name = self.local_dir_name(model);
        let model_dir = self.models_dir.join(&dir_name);

        if !force && self.downloaded_models.contains(&dir_name) {
            return Ok(model_dir);
        }

        let repo_id = self.repo_id_for(model);
        info!("Downloading embedding model {} into {}", repo_id, model_dir.display());

        fs::create_dir_all(&model_dir).await?;

        let repo = self.api.repo(hf_hub::Repo::model(repo_id.clone()));

        for file in REQUIRED_FILES {
            let cached = repo.get(file).await.map_err(|e| {
                ScreenerError::ModelLoading(format!(
                    "Failed to download {} from {}: {}",
                    file, repo_id, e
                ))
            })?;

            fs::copy(&cached, model_dir.join(file)).await.map_err(|e| {
                ScreenerError::ModelLoading(format!("Failed to copy {}: {}", file, e))
            })?;
            info!("  downloaded {}", file);
        }

        match repo.get("README.md").await {
            Ok(readme) => {
                if let Err(e) = fs::copy(&readme, model_dir.join("README.md")).await {
                    warn!("Could not copy model card: {}", e);
                }
            }
            Err(e) => warn!("Optional file README.md not found: {}", e),
        }

        self.downloaded_models.insert(dir_name);
        Ok(model_dir)
    }

    /// Get path to a downloaded model
    pub fn get_model_path(&self, model: &str) -> Option<PathBuf> {
        let dir_name = self.local_dir_name(model);
        if self.downloaded_models.contains(&dir_name) {
            Some(self.models_dir.join(dir_name))
        } else {
            None
        }
    }

    /// Resolve a model reference to a loadable directory, downloading if needed.
    ///
    /// Accepts a local model directory, a registry key, a repo id or a
    /// display name.
    pub async fn ensure_model_available(&mut self, model: &str) -> Result<PathBuf> {
        let as_path = Path::new(model);
        if as_path.is_dir() {
            if is_valid_model_directory(as_path).await {
                return Ok(as_path.to_path_buf());
            }
            return Err(ScreenerError::ModelLoading(format!(
                "Local model directory {} is missing one of: {}",
                as_path.display(),
                REQUIRED_FILES.join(", ")
            )));
        }

        if let Some(path) = self.get_model_path(model) {
            return Ok(path);
        }

        self.download_model(model, false).await
    }

    pub fn list_available_models(&self) -> Vec<(&String, &EmbeddingModelInfo)> {
        self.available_models.iter().collect()
    }

    pub fn list_downloaded_models(&self) -> Vec<String> {
        let mut models: Vec<String> = self.downloaded_models.iter().cloned().collect();
        models.sort();
        models
    }

    pub fn get_model_info(&self, model: &str) -> Option<&EmbeddingModelInfo> {
        self.resolve_model_id(model)
            .and_then(|id| self.available_models.get(&id))
    }

    pub fn is_model_downloaded(&self, model: &str) -> bool {
        self.downloaded_models.contains(&self.local_dir_name(model))
    }

    /// Resolve model ID from various formats (repo_id, name, etc.)
    pub fn resolve_model_id(&self, input: &str) -> Option<String> {
        if self.available_models.contains_key(input) {
            return Some(input.to_string());
        }

        for (id, info) in &self.available_models {
            if info.repo_id == input {
                return Some(id.clone());
            }
        }

        let input_lower = input.to_lowercase();
        for (id, info) in &self.available_models {
            if info.name.to_lowercase() == input_lower {
                return Some(id.clone());
            }
        }

        None
    }
}

async fn is_valid_model_directory(path: &Path) -> bool {
    for file in REQUIRED_FILES {
        if fs::metadata(path.join(file)).await.is_err() {
            return false;
        }
    }
    true
}
