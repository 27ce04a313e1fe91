//! Semantic similarity between two normalized documents

use crate::error::{Result, ResumeScorerError};
use crate::processing::document::Document;
use crate::processing::embeddings::{cosine_similarity, SentenceEncoder};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    /// Cosine similarity floored at 0, within [0, 1].
    pub score: f64,
}

impl SimilarityResult {
    pub fn zero() -> Self {
        Self { score: 0.0 }
    }

    fn clamped(raw: f64) -> Self {
        let score = if raw.is_finite() { raw.clamp(0.0, 1.0) } else { 0.0 };
        Self { score }
    }
}

/// Compares documents through a shared, read-only encoder handle.
#[derive(Clone)]
pub struct SemanticComparator {
    encoder: Arc<dyn SentenceEncoder>,
}

impl SemanticComparator {
    pub fn new(encoder: Arc<dyn SentenceEncoder>) -> Self {
        Self { encoder }
    }

    pub fn model_name(&self) -> &str {
        self.encoder.model_name()
    }

    /// Anti-correlated documents score 0. If either document normalized to
    /// nothing the encoder is not consulted at all.
    pub fn compare(&self, doc_a: &Document, doc_b: &Document) -> Result<SimilarityResult> {
        if doc_a.normalized_text().is_empty() || doc_b.normalized_text().is_empty() {
            return Ok(SimilarityResult::zero());
        }

        let texts = [
            doc_a.normalized_text().to_string(),
            doc_b.normalized_text().to_string(),
        ];
        let embeddings = self.encoder.encode(&texts)?;
        let [a, b] = embeddings.as_slice() else {
            return Err(ResumeScorerError::ModelUnavailable(format!(
                "Model '{}' returned {} embeddings for 2 texts",
                self.encoder.model_name(),
                embeddings.len()
            )));
        };
        if a.is_empty() {
            return Err(ResumeScorerError::ModelUnavailable(format!(
                "Model '{}' returned empty embeddings",
                self.encoder.model_name()
            )));
        }
        if a.len() != b.len() {
            return Err(ResumeScorerError::ModelUnavailable(format!(
                "Model '{}' returned embeddings of different sizes ({} and {})",
                self.encoder.model_name(),
                a.len(),
                b.len()
            )));
        }

        let raw = cosine_similarity(a, b)?;
        debug!("Raw cosine similarity: {:.4}", raw);
        Ok(SimilarityResult::clamped(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::lexicon::Lexicon;
    use crate::processing::normalizer::{Normalizer, NormalizerSettings};
    use approx::assert_relative_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns fixed vectors and counts calls.
    struct FixedEncoder {
        vectors: Vec<Vec<f32>>,
        calls: AtomicUsize,
    }

    impl FixedEncoder {
        fn new(vectors: Vec<Vec<f32>>) -> Arc<Self> {
            Arc::new(Self {
                vectors,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl SentenceEncoder for FixedEncoder {
        fn encode(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.vectors.clone())
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    struct BrokenEncoder;

    impl SentenceEncoder for BrokenEncoder {
        fn encode(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Err(ResumeScorerError::ModelUnavailable("backend offline".to_string()))
        }

        fn model_name(&self) -> &str {
            "broken"
        }
    }

    fn normalize(text: &str) -> Document {
        Normalizer::new(Arc::new(Lexicon::english()), NormalizerSettings::default()).normalize(text)
    }

    #[test]
    fn test_empty_document_skips_model() {
        let encoder = FixedEncoder::new(vec![vec![1.0], vec![1.0]]);
        let comparator = SemanticComparator::new(encoder.clone());

        let result = comparator.compare(&normalize(""), &normalize("python developer")).unwrap();
        assert_eq!(result.score, 0.0);
        assert_eq!(encoder.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_negative_cosine_is_floored() {
        let encoder = FixedEncoder::new(vec![vec![1.0, 0.0], vec![-1.0, 0.0]]);
        let comparator = SemanticComparator::new(encoder);

        let result = comparator.compare(&normalize("rust"), &normalize("golang")).unwrap();
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_positive_cosine_passes_through() {
        let encoder = FixedEncoder::new(vec![vec![3.0, 4.0], vec![4.0, 3.0]]);
        let comparator = SemanticComparator::new(encoder);

        let result = comparator.compare(&normalize("rust"), &normalize("golang")).unwrap();
        assert_relative_eq!(result.score, 0.96, epsilon = 1e-6);
    }

    #[test]
    fn test_wrong_embedding_count_is_model_failure() {
        let encoder = FixedEncoder::new(vec![vec![1.0]]);
        let comparator = SemanticComparator::new(encoder);

        let result = comparator.compare(&normalize("rust"), &normalize("golang"));
        assert!(matches!(result, Err(ResumeScorerError::ModelUnavailable(_))));
    }

    #[test]
    fn test_mismatched_dimensions_are_model_failure() {
        let encoder = FixedEncoder::new(vec![vec![1.0, 0.0], vec![1.0]]);
        let comparator = SemanticComparator::new(encoder);

        let result = comparator.compare(&normalize("rust"), &normalize("golang"));
        assert!(matches!(result, Err(ResumeScorerError::ModelUnavailable(_))));
    }

    #[test]
    fn test_encoder_failure_propagates() {
        let comparator = SemanticComparator::new(Arc::new(BrokenEncoder));
        let result = comparator.compare(&normalize("rust"), &normalize("golang"));
        assert!(matches!(result, Err(ResumeScorerError::ModelUnavailable(_))));
    }
}
