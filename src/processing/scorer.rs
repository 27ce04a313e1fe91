//! Score composition

use crate::config::ScoringConfig;
use crate::processing::keywords::KeywordSet;
use crate::processing::semantic::SimilarityResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// 0 to 100.
    pub overall_score: f64,
    pub semantic_similarity_score: f64,
    pub keyword_match_score: f64,
    /// Job keywords present in the resume, by job weight descending.
    pub matched_keywords: Vec<String>,
    /// Job keywords absent from the resume, by job weight descending.
    pub missing_keywords: Vec<String>,
    /// The job description produced no keywords, so the keyword score is 0
    /// by policy rather than by measurement.
    pub jd_keywords_empty: bool,
}

impl ScoreBreakdown {
    pub fn zero() -> Self {
        Self {
            overall_score: 0.0,
            semantic_similarity_score: 0.0,
            keyword_match_score: 0.0,
            matched_keywords: Vec::new(),
            missing_keywords: Vec::new(),
            jd_keywords_empty: true,
        }
    }
}

pub struct Scorer {
    semantic_weight: f64,
    keyword_weight: f64,
}

impl Scorer {
    /// Weights are expected to be validated already (see `Config::validate`).
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            semantic_weight: config.semantic_weight,
            keyword_weight: config.keyword_weight,
        }
    }

    pub fn weights(&self) -> (f64, f64) {
        (self.semantic_weight, self.keyword_weight)
    }

    pub fn score(
        &self,
        resume_keywords: &KeywordSet,
        jd_keywords: &KeywordSet,
        similarity: SimilarityResult,
    ) -> ScoreBreakdown {
        let (matched_keywords, missing_keywords): (Vec<String>, Vec<String>) = jd_keywords
            .iter()
            .map(|keyword| keyword.term.clone())
            .partition(|term| resume_keywords.contains(term));

        let jd_keywords_empty = jd_keywords.is_empty();
        let keyword_match_score = if jd_keywords_empty {
            0.0
        } else {
            matched_keywords.len() as f64 / jd_keywords.len() as f64
        };

        let semantic_similarity_score = similarity.score.clamp(0.0, 1.0);
        let overall_score = (100.0
            * (self.semantic_weight * semantic_similarity_score
                + self.keyword_weight * keyword_match_score))
            .clamp(0.0, 100.0);

        ScoreBreakdown {
            overall_score,
            semantic_similarity_score,
            keyword_match_score,
            matched_keywords,
            missing_keywords,
            jd_keywords_empty,
        }
    }
}
