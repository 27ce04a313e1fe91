//! Analysis engine running the full scoring pipeline

use crate::config::Config;
use crate::error::Result;
use crate::processing::document::Document;
use crate::processing::embeddings::SentenceEncoder;
use crate::processing::feedback::{EmptyInput, FeedbackReport, FeedbackSynthesizer, MatchBand};
use crate::processing::keywords::{KeywordExtractor, KeywordSet};
use crate::processing::lexicon::Lexicon;
use crate::processing::normalizer::{Normalizer, NormalizerSettings};
use crate::processing::scorer::{ScoreBreakdown, Scorer};
use crate::processing::semantic::SemanticComparator;
use crate::processing::tfidf::is_weighted_term;
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// The result of one analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub overall_score: f64,
    pub semantic_similarity_score: f64,
    pub keyword_match_score: f64,
    pub resume_keywords: Vec<String>,
    pub jd_keywords: Vec<String>,
    pub feedback: FeedbackReport,
}

/// An `AnalysisResult` plus the intermediate signals and run metadata the
/// report formatters show.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub result: AnalysisResult,
    pub breakdown: ScoreBreakdown,
    pub band: MatchBand,
    pub metadata: AnalysisMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub model_name: String,
    pub semantic_weight: f64,
    pub keyword_weight: f64,
    pub resume_tokens: usize,
    pub jd_tokens: usize,
    pub input_truncated: bool,
    pub processing_time_ms: u64,
    pub generated_at: DateTime<Utc>,
}

/// Owns one instance of every pipeline stage. Built once, then shared:
/// every method takes `&self` and the engine is `Send + Sync`.
pub struct AnalysisEngine {
    normalizer: Normalizer,
    extractor: KeywordExtractor,
    comparator: SemanticComparator,
    scorer: Scorer,
    feedback: FeedbackSynthesizer,
}

impl AnalysisEngine {
    pub fn new(config: &Config, encoder: Arc<dyn SentenceEncoder>) -> Result<Self> {
        Self::with_lexicon(config, encoder, Arc::new(Lexicon::english()))
    }

    pub fn with_lexicon(
        config: &Config,
        encoder: Arc<dyn SentenceEncoder>,
        lexicon: Arc<Lexicon>,
    ) -> Result<Self> {
        config.validate()?;

        info!(
            "Initializing analysis engine (model: {}, weights: {:.2} semantic / {:.2} keyword)",
            encoder.model_name(),
            config.scoring.semantic_weight,
            config.scoring.keyword_weight
        );

        Ok(Self {
            normalizer: Normalizer::new(lexicon, NormalizerSettings::from(&config.processing)),
            extractor: KeywordExtractor::new(&config.keywords),
            comparator: SemanticComparator::new(encoder),
            scorer: Scorer::new(&config.scoring),
            feedback: FeedbackSynthesizer::new(&config.feedback),
        })
    }

    /// Add reference texts to the IDF corpus used for keyword weighting.
    pub fn with_reference_texts<I, S>(mut self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let documents: Vec<Document> = texts
            .into_iter()
            .map(|text| self.normalizer.normalize(text.as_ref()))
            .collect();
        self.extractor = self.extractor.with_reference_documents(documents);
        self
    }

    pub fn model_name(&self) -> &str {
        self.comparator.model_name()
    }

    pub fn normalize(&self, text: &str) -> Document {
        self.normalizer.normalize(text)
    }

    pub fn analyze(&self, resume_text: &str, job_description_text: &str) -> Result<AnalysisResult> {
        Ok(self.analyze_report(resume_text, job_description_text)?.result)
    }

    pub fn analyze_report(
        &self,
        resume_text: &str,
        job_description_text: &str,
    ) -> Result<AnalysisReport> {
        let start_time = Instant::now();

        let resume = self.normalizer.normalize(resume_text);
        let job = self.normalizer.normalize(job_description_text);
        debug!(
            "Normalized resume to {} tokens, job description to {} tokens",
            resume.token_count(),
            job.token_count()
        );

        let resume_empty = !has_weighted_terms(&resume);
        let job_empty = !has_weighted_terms(&job);

        let (result, breakdown) = if resume_empty || job_empty {
            info!("Input has no analyzable text, returning an empty result");
            let feedback = self.feedback.insufficient_input(EmptyInput {
                resume: resume_empty,
                job_description: job_empty,
            });
            let breakdown = ScoreBreakdown::zero();
            let result = build_result(&breakdown, &KeywordSet::empty(), &KeywordSet::empty(), feedback);
            (result, breakdown)
        } else {
            let resume_keywords = self.extractor.extract_keywords(&resume, Some(&job));
            let jd_keywords = self.extractor.extract_keywords(&job, Some(&resume));
            debug!(
                "Extracted {} resume keywords and {} job keywords",
                resume_keywords.len(),
                jd_keywords.len()
            );

            let similarity = self.comparator.compare(&resume, &job)?;
            let breakdown = self.scorer.score(&resume_keywords, &jd_keywords, similarity);
            let feedback = self.feedback.synthesize(&breakdown);
            let result = build_result(&breakdown, &resume_keywords, &jd_keywords, feedback);
            (result, breakdown)
        };

        let processing_time_ms = start_time.elapsed().as_millis() as u64;
        info!(
            "Analysis completed in {}ms: overall {:.1}, semantic {:.3}, keyword {:.3}",
            processing_time_ms,
            result.overall_score,
            result.semantic_similarity_score,
            result.keyword_match_score
        );

        let (semantic_weight, keyword_weight) = self.scorer.weights();
        Ok(AnalysisReport {
            band: self.feedback.band(result.overall_score),
            metadata: AnalysisMetadata {
                model_name: self.model_name().to_string(),
                semantic_weight,
                keyword_weight,
                resume_tokens: resume.token_count(),
                jd_tokens: job.token_count(),
                input_truncated: resume.truncated() || job.truncated(),
                processing_time_ms,
                generated_at: Utc::now(),
            },
            result,
            breakdown,
        })
    }
}

/// A document made only of numbers yields no keywords on either side, so it
/// is scored like an empty one.
fn has_weighted_terms(doc: &Document) -> bool {
    doc.normalized_tokens().iter().any(|token| is_weighted_term(token))
}

fn build_result(
    breakdown: &ScoreBreakdown,
    resume_keywords: &KeywordSet,
    jd_keywords: &KeywordSet,
    feedback: FeedbackReport,
) -> AnalysisResult {
    AnalysisResult {
        overall_score: breakdown.overall_score,
        semantic_similarity_score: breakdown.semantic_similarity_score,
        keyword_match_score: breakdown.keyword_match_score,
        resume_keywords: resume_keywords.terms(),
        jd_keywords: jd_keywords.terms(),
        feedback,
    }
}
