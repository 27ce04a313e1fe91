//! Normalized document representation

use serde::Serialize;

/// One input text after normalization. Built by the normalizer and never
/// modified afterwards; all fields are exposed read-only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    raw_text: String,
    normalized_tokens: Vec<String>,
    normalized_text: String,
    noun_chunks: Vec<String>,
    truncated: bool,
}

impl Document {
    pub(crate) fn new(
        raw_text: String,
        normalized_tokens: Vec<String>,
        noun_chunks: Vec<String>,
        truncated: bool,
    ) -> Self {
        let normalized_text = normalized_tokens.join(" ");
        Self {
            raw_text,
            normalized_tokens,
            normalized_text,
            noun_chunks,
            truncated,
        }
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn normalized_tokens(&self) -> &[String] {
        &self.normalized_tokens
    }

    pub fn normalized_text(&self) -> &str {
        &self.normalized_text
    }

    /// Noun phrases in reading order, duplicates included.
    pub fn noun_chunks(&self) -> &[String] {
        &self.noun_chunks
    }

    /// True when a length bound cut the input short.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    pub fn is_empty(&self) -> bool {
        self.normalized_tokens.is_empty()
    }

    pub fn token_count(&self) -> usize {
        self.normalized_tokens.len()
    }
}
