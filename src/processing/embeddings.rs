//! Sentence embeddings using Model2Vec

use crate::error::{Result, ResumeScorerError};
use anyhow::Context;
use log::info;
use model2vec_rs::model::StaticModel;
use std::path::Path;
use std::time::Instant;

/// A pretrained, read-only sentence encoder.
///
/// Implementations must be deterministic for a given model version and safe
/// to call from many threads at once.
pub trait SentenceEncoder: Send + Sync {
    /// One fixed-length vector per input text, in input order.
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn model_name(&self) -> &str;
}

const ENCODE_BATCH_SIZE: usize = 1024;

pub struct Model2VecEncoder {
    model: StaticModel,
    model_name: String,
    max_length: Option<usize>,
}

impl Model2VecEncoder {
    /// Load a Model2Vec model from a local directory or a Hugging Face repo id.
    pub fn load(model_path: &Path, model_name: &str) -> Result<Self> {
        let start_time = Instant::now();
        info!("Loading Model2Vec embedding model from: {}", model_path.display());

        let model = StaticModel::from_pretrained(
            model_path,
            None, // token
            None, // normalize
            None, // subfolder
        )
        .with_context(|| {
            format!("Failed to load model '{}' from {}", model_name, model_path.display())
        })?;

        info!("Model loaded in {:.2?}", start_time.elapsed());

        Ok(Self {
            model,
            model_name: model_name.to_string(),
            max_length: Some(512),
        })
    }

    /// Subword tokens considered per text. `None` encodes the whole text.
    pub fn with_max_length(mut self, max_length: Option<usize>) -> Self {
        self.max_length = max_length;
        self
    }
}

impl SentenceEncoder for Model2VecEncoder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(self
            .model
            .encode_with_args(texts, self.max_length, ENCODE_BATCH_SIZE))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Cosine of the angle between `a` and `b`. Zero vectors give 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(ResumeScorerError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (norm_a.sqrt() * norm_b.sqrt()))
}
