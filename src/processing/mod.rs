//! Text normalization, keyword extraction, semantic comparison and scoring

pub mod lexicon;
pub mod pos;
pub mod lemmatizer;
pub mod document;
pub mod normalizer;
pub mod tfidf;
pub mod keywords;
pub mod embeddings;
pub mod embedding_manager;
pub mod semantic;
pub mod scorer;
pub mod feedback;
pub mod analyzer;

pub use analyzer::{AnalysisEngine, AnalysisReport, AnalysisResult};
pub use document::Document;
pub use embeddings::{Model2VecEncoder, SentenceEncoder};
pub use feedback::FeedbackReport;
