//! Embedding model management for downloading and loading Model2Vec models

use crate::error::{Result, ResumeScorerError};
use crate::processing::embeddings::Model2VecEncoder;
use hf_hub::api::tokio::Api;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Files a Model2Vec model directory must contain.
pub const REQUIRED_MODEL_FILES: [&str; 3] = ["tokenizer.json", "model.safetensors", "config.json"];
const OPTIONAL_MODEL_FILES: [&str; 1] = ["README.md"];

pub const DEFAULT_EMBEDDING_MODEL: &str = "potion-base-8M";

/// Information about an available embedding model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingModelInfo {
    pub name: String,
    pub repo_id: String,
    pub size_mb: u64,
    pub description: String,
    pub dimensions: u32,
}

/// Where a model reference points once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// A catalog entry, stored under `models_dir/<id>`.
    Catalog(String),
    /// An existing local directory.
    LocalPath(PathBuf),
}

/// Handles download, caching and selection of embedding models
pub struct EmbeddingModelManager {
    models_dir: PathBuf,
    available_models: BTreeMap<String, EmbeddingModelInfo>,
    downloaded_models: BTreeSet<String>,
}

impl EmbeddingModelManager {
    pub async fn new(models_dir: PathBuf) -> Result<Self> {
        if !models_dir.exists() {
            fs::create_dir_all(&models_dir).await?;
        }

        let mut manager = Self {
            models_dir,
            available_models: catalog(),
            downloaded_models: BTreeSet::new(),
        };
        manager.scan_downloaded_models().await?;

        Ok(manager)
    }

    async fn scan_downloaded_models(&mut self) -> Result<()> {
        let mut entries = fs::read_dir(&self.models_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() && is_complete_model_dir(&entry.path()).await {
                self.downloaded_models
                    .insert(entry.file_name().to_string_lossy().to_string());
            }
        }

        Ok(())
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    /// Download a catalog model from the Hugging Face Hub.
    pub async fn download_model(&mut self, model_id: &str, force: bool) -> Result<PathBuf> {
        let model_info = self
            .available_models
            .get(model_id)
            .ok_or_else(|| ResumeScorerError::ModelNotFound(model_id.to_string()))?
            .clone();
        let model_dir = self.models_dir.join(model_id);

        if !force && self.downloaded_models.contains(model_id) {
            return Ok(model_dir);
        }

        info!(
            "Downloading embedding model {} ({} MB) from {}",
            model_info.name, model_info.size_mb, model_info.repo_id
        );
        fs::create_dir_all(&model_dir).await?;

        let api = Api::new().map_err(|e| {
            ResumeScorerError::Network(format!("Failed to initialize Hugging Face API: {}", e))
        })?;
        let repo = api.model(model_info.repo_id.clone());

        for file in REQUIRED_MODEL_FILES {
            let cached = repo.get(file).await.map_err(|e| {
                ResumeScorerError::Network(format!("Failed to download required file {}: {}", file, e))
            })?;
            fs::copy(&cached, model_dir.join(file)).await?;
            info!("Downloaded {}", file);
        }
        for file in OPTIONAL_MODEL_FILES {
            match repo.get(file).await {
                Ok(cached) => {
                    fs::copy(&cached, model_dir.join(file)).await?;
                }
                Err(e) => warn!("Optional file {} not available: {}", file, e),
            }
        }

        self.downloaded_models.insert(model_id.to_string());
        info!("Embedding model {} is ready at {}", model_id, model_dir.display());
        Ok(model_dir)
    }

    pub async fn remove_model(&mut self, model_id: &str) -> Result<()> {
        if !self.downloaded_models.contains(model_id) {
            return Err(ResumeScorerError::ModelNotFound(model_id.to_string()));
        }

        fs::remove_dir_all(self.models_dir.join(model_id)).await?;
        self.downloaded_models.remove(model_id);
        info!("Removed embedding model {}", model_id);
        Ok(())
    }

    pub fn get_model_path(&self, model_id: &str) -> Option<PathBuf> {
        if self.downloaded_models.contains(model_id) {
            Some(self.models_dir.join(model_id))
        } else {
            None
        }
    }

    /// Resolve `reference` and make sure its files are on disk.
    pub async fn ensure_model_available(&mut self, reference: &str) -> Result<PathBuf> {
        match self.resolve(reference)? {
            ModelSource::LocalPath(path) => Ok(path),
            ModelSource::Catalog(model_id) => match self.get_model_path(&model_id) {
                Some(path) => Ok(path),
                None => self.download_model(&model_id, false).await,
            },
        }
    }

    /// Download if needed, then load the model off the async runtime.
    pub async fn load_encoder(
        &mut self,
        reference: &str,
        max_length: Option<usize>,
    ) -> Result<Model2VecEncoder> {
        let model_path = self.ensure_model_available(reference).await?;
        let model_name = reference.to_string();

        tokio::task::spawn_blocking(move || {
            Model2VecEncoder::load(&model_path, &model_name)
                .map(|encoder| encoder.with_max_length(max_length))
        })
        .await
        .map_err(|e| ResumeScorerError::ModelUnavailable(format!("Model loading task failed: {}", e)))?
    }

    /// Accepts a catalog id, a repo id, a display name or a local directory.
    pub fn resolve(&self, reference: &str) -> Result<ModelSource> {
        if let Some(model_id) = self.resolve_model_id(reference) {
            return Ok(ModelSource::Catalog(model_id));
        }

        let path = Path::new(reference);
        if path.is_dir() {
            return Ok(ModelSource::LocalPath(path.to_path_buf()));
        }

        Err(ResumeScorerError::ModelNotFound(format!(
            "'{}' is neither a known model nor a model directory",
            reference
        )))
    }

    pub fn resolve_model_id(&self, input: &str) -> Option<String> {
        if self.available_models.contains_key(input) {
            return Some(input.to_string());
        }

        let input_lower = input.to_lowercase();
        self.available_models
            .iter()
            .find(|(_, info)| info.repo_id == input || info.name.to_lowercase() == input_lower)
            .map(|(id, _)| id.clone())
    }

    pub fn list_available_models(&self) -> Vec<(&str, &EmbeddingModelInfo)> {
        self.available_models
            .iter()
            .map(|(id, info)| (id.as_str(), info))
            .collect()
    }

    pub fn list_downloaded_models(&self) -> Vec<String> {
        self.downloaded_models.iter().cloned().collect()
    }

    pub fn get_model_info(&self, model_id: &str) -> Option<&EmbeddingModelInfo> {
        self.available_models.get(model_id)
    }

    pub fn is_model_downloaded(&self, model_id: &str) -> bool {
        self.downloaded_models.contains(model_id)
    }
}

async fn is_complete_model_dir(path: &Path) -> bool {
    for file in REQUIRED_MODEL_FILES {
        if fs::metadata(path.join(file)).await.is_err() {
            return false;
        }
    }
    true
}

fn catalog() -> BTreeMap<String, EmbeddingModelInfo> {
    let entries = [
        (
            DEFAULT_EMBEDDING_MODEL,
            "Potion Base 8M",
            "minishlab/potion-base-8M",
            33,
            256,
            "Compact general-purpose static embeddings, the default",
        ),
        (
            "potion-base-32M",
            "Potion Base 32M",
            "minishlab/potion-base-32M",
            130,
            512,
            "Larger static embeddings with better accuracy",
        ),
        (
            "m2v-base",
            "Model2Vec Base",
            "minishlab/M2V_base_output",
            90,
            256,
            "Original Model2Vec base model",
        ),
    ];

    entries
        .into_iter()
        .map(|(id, name, repo_id, size_mb, dimensions, description)| {
            (
                id.to_string(),
                EmbeddingModelInfo {
                    name: name.to_string(),
                    repo_id: repo_id.to_string(),
                    size_mb,
                    description: description.to_string(),
                    dimensions,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn write_fake_model(dir: &Path) {
        fs::create_dir_all(dir).await.unwrap();
        for file in REQUIRED_MODEL_FILES {
            fs::write(dir.join(file), b"{}").await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_manager_creates_models_dir() {
        let temp_dir = TempDir::new().unwrap();
        let models_dir = temp_dir.path().join("models");

        let manager = EmbeddingModelManager::new(models_dir.clone()).await.unwrap();
        assert!(models_dir.is_dir());
        assert_eq!(manager.list_available_models().len(), 3);
        assert!(manager.list_downloaded_models().is_empty());
    }

    #[tokio::test]
    async fn test_scan_finds_complete_models_only() {
        let temp_dir = TempDir::new().unwrap();
        write_fake_model(&temp_dir.path().join("potion-base-8M")).await;
        fs::create_dir_all(temp_dir.path().join("partial")).await.unwrap();
        fs::write(temp_dir.path().join("partial").join("tokenizer.json"), b"{}")
            .await
            .unwrap();

        let manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf()).await.unwrap();
        assert_eq!(manager.list_downloaded_models(), vec!["potion-base-8M"]);
        assert!(manager.is_model_downloaded("potion-base-8M"));
        assert!(!manager.is_model_downloaded("partial"));
    }

    #[tokio::test]
    async fn test_resolve_model_id() {
        let temp_dir = TempDir::new().unwrap();
        let manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf()).await.unwrap();

        assert_eq!(manager.resolve_model_id("potion-base-8M"), Some("potion-base-8M".to_string()));
        assert_eq!(
            manager.resolve_model_id("minishlab/potion-base-8M"),
            Some("potion-base-8M".to_string())
        );
        assert_eq!(manager.resolve_model_id("potion base 8m"), Some("potion-base-8M".to_string()));
        assert_eq!(manager.resolve_model_id("bert-large"), None);
    }

    #[tokio::test]
    async fn test_resolve_local_directory() {
        let temp_dir = TempDir::new().unwrap();
        let manager = EmbeddingModelManager::new(temp_dir.path().join("models")).await.unwrap();
        let local = temp_dir.path().join("my-model");
        write_fake_model(&local).await;

        let source = manager.resolve(local.to_str().unwrap()).unwrap();
        assert_eq!(source, ModelSource::LocalPath(local));
        assert!(matches!(
            manager.resolve("no-such-model"),
            Err(ResumeScorerError::ModelNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_ensure_available_uses_downloaded_copy() {
        let temp_dir = TempDir::new().unwrap();
        write_fake_model(&temp_dir.path().join("m2v-base")).await;
        let mut manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf()).await.unwrap();

        let path = manager.ensure_model_available("minishlab/M2V_base_output").await.unwrap();
        assert_eq!(path, temp_dir.path().join("m2v-base"));
    }

    #[tokio::test]
    async fn test_remove_model() {
        let temp_dir = TempDir::new().unwrap();
        write_fake_model(&temp_dir.path().join("potion-base-8M")).await;
        let mut manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf()).await.unwrap();

        manager.remove_model("potion-base-8M").await.unwrap();
        assert!(!temp_dir.path().join("potion-base-8M").exists());
        assert!(!manager.is_model_downloaded("potion-base-8M"));
        assert!(manager.remove_model("potion-base-8M").await.is_err());
    }
}
