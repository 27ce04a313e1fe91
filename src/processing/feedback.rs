//! Template-driven feedback from a score breakdown
//!
//! Pure rule selection: the same breakdown always yields the same sentences.

use crate::config::FeedbackConfig;
use crate::processing::scorer::ScoreBreakdown;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackReport {
    pub overall_summary: Vec<String>,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub missing_keywords_suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchBand {
    Strong,
    Moderate,
    Weak,
}

impl MatchBand {
    pub fn label(self) -> &'static str {
        match self {
            MatchBand::Strong => "strong match",
            MatchBand::Moderate => "moderate match",
            MatchBand::Weak => "weak match",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WeakerSignal {
    Semantic,
    Keyword,
}

/// Which parts of the input were empty after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyInput {
    pub resume: bool,
    pub job_description: bool,
}

pub struct FeedbackSynthesizer {
    config: FeedbackConfig,
}

impl FeedbackSynthesizer {
    pub fn new(config: &FeedbackConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn band(&self, overall_score: f64) -> MatchBand {
        if overall_score >= self.config.strong_match_threshold {
            MatchBand::Strong
        } else if overall_score >= self.config.moderate_match_threshold {
            MatchBand::Moderate
        } else {
            MatchBand::Weak
        }
    }

    pub fn synthesize(&self, breakdown: &ScoreBreakdown) -> FeedbackReport {
        let band = self.band(breakdown.overall_score);

        FeedbackReport {
            overall_summary: self.summary(band, breakdown),
            strengths: self.strengths(breakdown),
            areas_for_improvement: self.improvements(band, breakdown),
            missing_keywords_suggestions: breakdown
                .missing_keywords
                .iter()
                .take(self.config.max_missing_suggestions)
                .cloned()
                .collect(),
        }
    }

    /// Feedback for input that normalized to nothing.
    pub fn insufficient_input(&self, empty: EmptyInput) -> FeedbackReport {
        let what = match (empty.resume, empty.job_description) {
            (true, true) => "neither the resume nor the job description contains",
            (true, false) => "the resume contains no",
            _ => "the job description contains no",
        };

        FeedbackReport {
            overall_summary: vec![format!(
                "Insufficient input: {} analyzable text, so no score could be computed.",
                what
            )],
            strengths: Vec::new(),
            areas_for_improvement: vec![
                "Provide the full text of both the resume and the job description, not just headings or contact details."
                    .to_string(),
            ],
            missing_keywords_suggestions: Vec::new(),
        }
    }

    fn summary(&self, band: MatchBand, breakdown: &ScoreBreakdown) -> Vec<String> {
        let headline = match band {
            MatchBand::Strong => format!(
                "Strong match: your resume aligns very well with this job description (overall score {:.0}/100).",
                breakdown.overall_score
            ),
            MatchBand::Moderate => format!(
                "Moderate match: your resume shows reasonable alignment with this job description (overall score {:.0}/100).",
                breakdown.overall_score
            ),
            MatchBand::Weak => format!(
                "Weak match: your resume needs tailoring to fit this job description (overall score {:.0}/100).",
                breakdown.overall_score
            ),
        };

        let signals = if breakdown.jd_keywords_empty {
            format!(
                "Semantic similarity is {:.0}%; keyword coverage could not be measured.",
                breakdown.semantic_similarity_score * 100.0
            )
        } else {
            let total = breakdown.matched_keywords.len() + breakdown.missing_keywords.len();
            format!(
                "Semantic similarity is {:.0}% and your resume covers {} of {} job keywords ({:.0}%).",
                breakdown.semantic_similarity_score * 100.0,
                breakdown.matched_keywords.len(),
                total,
                breakdown.keyword_match_score * 100.0
            )
        };

        vec![headline, signals]
    }

    fn strengths(&self, breakdown: &ScoreBreakdown) -> Vec<String> {
        let mut strengths = Vec::new();

        if !breakdown.matched_keywords.is_empty() {
            let top: Vec<&str> = breakdown
                .matched_keywords
                .iter()
                .take(self.config.max_strengths)
                .map(String::as_str)
                .collect();
            strengths.push(format!(
                "Your resume highlights terms the job description emphasizes: {}.",
                top.join(", ")
            ));
        }

        if breakdown.semantic_similarity_score >= self.config.semantic_strength_threshold {
            strengths.push(
                "Your experience is described in language closely aligned with the role's core responsibilities."
                    .to_string(),
            );
        }

        if !breakdown.jd_keywords_empty && breakdown.missing_keywords.is_empty() {
            strengths.push(
                "Every keyword extracted from the job description appears in your resume.".to_string(),
            );
        }

        strengths
    }

    fn improvements(&self, band: MatchBand, breakdown: &ScoreBreakdown) -> Vec<String> {
        let mut areas = Vec::new();

        if breakdown.jd_keywords_empty {
            areas.push(
                "No keywords could be extracted from the job description; a more detailed posting would allow keyword coverage to be measured."
                    .to_string(),
            );
        }

        let weaker = if breakdown.semantic_similarity_score < breakdown.keyword_match_score {
            WeakerSignal::Semantic
        } else {
            WeakerSignal::Keyword
        };
        let keyword_gap = !breakdown.missing_keywords.is_empty();

        let advice = match (band, weaker) {
            (MatchBand::Strong, WeakerSignal::Keyword) if keyword_gap => Some(
                "Add the few remaining job keywords where they genuinely apply to round out your coverage.",
            ),
            (MatchBand::Strong, WeakerSignal::Semantic) => Some(
                "Mirror the job description's phrasing in your most relevant achievements to tighten the overall fit.",
            ),
            (MatchBand::Moderate, WeakerSignal::Keyword) if keyword_gap => Some(
                "Keyword coverage is the weaker signal: work the missing skills and tools into your experience where you have them.",
            ),
            (MatchBand::Moderate, WeakerSignal::Semantic) => Some(
                "Semantic alignment is the weaker signal: rephrase your experience to reflect the responsibilities and focus areas of the job description.",
            ),
            (MatchBand::Weak, WeakerSignal::Keyword) if keyword_gap => Some(
                "Most job keywords are missing from your resume: review the requirements and highlight every relevant skill you actually have.",
            ),
            (MatchBand::Weak, WeakerSignal::Semantic) => Some(
                "Your resume's content diverges from the job description: rework your summary and experience around the role's core responsibilities.",
            ),
            (MatchBand::Weak, WeakerSignal::Keyword) => Some(
                "Review the job description carefully and make sure your resume clearly presents your most relevant experience.",
            ),
            _ => None,
        };
        areas.extend(advice.map(str::to_string));

        areas
    }
}
