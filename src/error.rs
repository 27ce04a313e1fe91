//! Error handling for the resume scorer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeScorerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The embedding backend failed to load or to answer a request.
    #[error("Embedding model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Analysis timed out after {0} seconds")]
    Timeout(u64),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

impl ResumeScorerError {
    /// Whether a caller may reasonably retry the failed operation.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ResumeScorerError::ModelUnavailable(_)
                | ResumeScorerError::Network(_)
                | ResumeScorerError::Timeout(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ResumeScorerError>;

/// model2vec-rs reports load failures through anyhow. The whole context
/// chain is kept in the message.
impl From<anyhow::Error> for ResumeScorerError {
    fn from(err: anyhow::Error) -> Self {
        ResumeScorerError::ModelUnavailable(format!("{:#}", err))
    }
}
