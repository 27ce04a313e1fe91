//! Configuration management for the resume scorer
//!
//! Every tunable policy constant of the pipeline lives here with a documented
//! default. A `Config` is validated once and then passed down by reference.

use crate::error::{Result, ResumeScorerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub models: ModelConfig,
    pub processing: ProcessingConfig,
    pub keywords: KeywordConfig,
    pub scoring: ScoringConfig,
    pub feedback: FeedbackConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    /// Catalog id, Hugging Face repo id, or a local model directory.
    pub embedding_model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Raw input beyond this many graphemes is cut off before normalization.
    pub max_input_chars: usize,
    /// Normalized token sequences are cut to this length.
    pub max_tokens: usize,
    pub min_token_chars: usize,
    pub max_chunk_words: usize,
    pub analysis_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    pub top_n: usize,
    /// Multiplier for terms found by both the statistical and phrase signals.
    pub dual_signal_boost: f64,
    /// Extra documents (.txt, .md, .pdf) added to the IDF corpus, so terms
    /// common across many postings weigh less.
    pub reference_files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub semantic_weight: f64,
    pub keyword_weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub strong_match_threshold: f64,
    pub moderate_match_threshold: f64,
    pub semantic_strength_threshold: f64,
    pub max_strengths: usize,
    pub max_missing_suggestions: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            models: ModelConfig::default(),
            processing: ProcessingConfig::default(),
            keywords: KeywordConfig::default(),
            scoring: ScoringConfig::default(),
            feedback: FeedbackConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".resume-scorer")
            .join("models");

        Self {
            models_dir,
            embedding_model: "potion-base-8M".to_string(),
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            max_input_chars: 200_000,
            max_tokens: 4096,
            min_token_chars: 2,
            max_chunk_words: 3,
            analysis_timeout_secs: 60,
        }
    }
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            top_n: 20,
            dual_signal_boost: 1.2,
            reference_files: Vec::new(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            semantic_weight: 0.6,
            keyword_weight: 0.4,
        }
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            strong_match_threshold: 80.0,
            moderate_match_threshold: 50.0,
            semantic_strength_threshold: 0.75,
            max_strengths: 5,
            max_missing_suggestions: 10,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
        }
    }
}

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

impl Config {
    /// Load from the default location, writing defaults there on first use.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            toml::from_str::<Config>(&content).map_err(|e| {
                ResumeScorerError::Configuration(format!(
                    "Failed to parse config {}: {}",
                    config_path.display(),
                    e
                ))
            })?
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            config
        };

        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            ResumeScorerError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-scorer")
            .join("config.toml")
    }

    pub fn models_dir(&self) -> &Path {
        &self.models.models_dir
    }

    /// Reject values the pipeline cannot honor.
    pub fn validate(&self) -> Result<()> {
        let scoring = &self.scoring;
        for (name, weight) in [
            ("scoring.semantic_weight", scoring.semantic_weight),
            ("scoring.keyword_weight", scoring.keyword_weight),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(invalid(format!("{} must be within [0, 1], got {}", name, weight)));
            }
        }
        let sum = scoring.semantic_weight + scoring.keyword_weight;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(invalid(format!(
                "scoring weights must sum to 1.0, got {:.4}",
                sum
            )));
        }

        if self.keywords.top_n == 0 {
            return Err(invalid("keywords.top_n must be at least 1".to_string()));
        }
        if !self.keywords.dual_signal_boost.is_finite() || self.keywords.dual_signal_boost < 1.0 {
            return Err(invalid(format!(
                "keywords.dual_signal_boost must be >= 1.0, got {}",
                self.keywords.dual_signal_boost
            )));
        }

        let feedback = &self.feedback;
        if !(0.0..=100.0).contains(&feedback.moderate_match_threshold)
            || !(0.0..=100.0).contains(&feedback.strong_match_threshold)
            || feedback.moderate_match_threshold > feedback.strong_match_threshold
        {
            return Err(invalid(format!(
                "feedback thresholds must satisfy 0 <= moderate ({}) <= strong ({}) <= 100",
                feedback.moderate_match_threshold, feedback.strong_match_threshold
            )));
        }
        if !(0.0..=1.0).contains(&feedback.semantic_strength_threshold) {
            return Err(invalid(format!(
                "feedback.semantic_strength_threshold must be within [0, 1], got {}",
                feedback.semantic_strength_threshold
            )));
        }

        let processing = &self.processing;
        if processing.max_tokens == 0 || processing.max_input_chars == 0 {
            return Err(invalid("processing length bounds must be positive".to_string()));
        }
        if processing.min_token_chars == 0 || processing.max_chunk_words == 0 {
            return Err(invalid(
                "processing.min_token_chars and processing.max_chunk_words must be positive"
                    .to_string(),
            ));
        }
        if processing.analysis_timeout_secs == 0 {
            return Err(invalid("processing.analysis_timeout_secs must be positive".to_string()));
        }

        Ok(())
    }
}

fn invalid(message: String) -> ResumeScorerError {
    ResumeScorerError::Configuration(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scoring.semantic_weight, 0.6);
        assert_eq!(config.keywords.top_n, 20);
        assert_eq!(config.feedback.max_missing_suggestions, 10);
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let mut config = Config::default();
        config.scoring.keyword_weight = 0.5;
        assert!(matches!(
            config.validate(),
            Err(ResumeScorerError::Configuration(_))
        ));
    }

    #[test]
    fn test_weights_must_be_in_range() {
        let mut config = Config::default();
        config.scoring.semantic_weight = 1.5;
        config.scoring.keyword_weight = -0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_bands_rejected() {
        let mut config = Config::default();
        config.feedback.moderate_match_threshold = 90.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.models.embedding_model, "potion-base-8M");
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[scoring]\nsemantic_weight = 0.5\nkeyword_weight = 0.5\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.scoring.keyword_weight, 0.5);
        assert_eq!(config.keywords.top_n, 20);
    }

    #[test]
    fn test_reference_files_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[keywords]\ntop_n = 10\nreference_files = [\"postings/backend.txt\"]\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.keywords.reference_files, vec![PathBuf::from("postings/backend.txt")]);
        assert_eq!(config.keywords.dual_signal_boost, 1.2);
        assert!(Config::default().keywords.reference_files.is_empty());
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[scoring]\nsemantic_weight = 0.9\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
