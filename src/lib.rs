//! Resume and job description compatibility scoring library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod processing;
pub mod output;

pub use config::Config;
pub use error::{Result, ResumeScorerError};
pub use processing::{AnalysisEngine, AnalysisReport, AnalysisResult, FeedbackReport, SentenceEncoder};
