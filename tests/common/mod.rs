//! Shared helpers for integration tests

use resume_scorer::{AnalysisEngine, Config, Result, SentenceEncoder};
use std::sync::Arc;

/// Deterministic bag-of-words encoder: every whitespace token adds 1.0 to
/// an FNV-1a hashed bucket. Vectors are non-negative, so cosine similarity
/// never drops below zero, and identical texts embed identically.
pub struct HashingEncoder {
    dimensions: usize,
}

impl HashingEncoder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

impl SentenceEncoder for HashingEncoder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| {
                let mut vector = vec![0.0f32; self.dimensions];
                for token in text.split_whitespace() {
                    vector[fnv1a(token) as usize % self.dimensions] += 1.0;
                }
                vector
            })
            .collect())
    }

    fn model_name(&self) -> &str {
        "hashing-test-encoder"
    }
}

fn fnv1a(token: &str) -> u64 {
    token.bytes().fold(0xcbf29ce484222325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x100000001b3)
    })
}

pub fn engine() -> AnalysisEngine {
    AnalysisEngine::new(&Config::default(), Arc::new(HashingEncoder::new(256)))
        .expect("default config is valid")
}
