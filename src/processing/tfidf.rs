//! TF-IDF weighting over a small corpus of token sequences
//!
//! Raw term counts, smoothed idf `ln((1 + n) / (1 + df)) + 1` and L2
//! normalization per document, so every weight falls in [0, 1]. Ordered maps
//! keep iteration, and therefore floating point summation, reproducible.

use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone)]
pub struct TfIdfModel {
    document_count: usize,
    document_frequency: BTreeMap<String, usize>,
}

impl TfIdfModel {
    pub fn fit<'a, I>(corpus: I) -> Self
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        let mut document_count = 0;
        let mut document_frequency = BTreeMap::new();

        for tokens in corpus {
            document_count += 1;
            let unique: BTreeSet<&str> = tokens
                .iter()
                .map(String::as_str)
                .filter(|term| is_weighted_term(term))
                .collect();
            for term in unique {
                *document_frequency.entry(term.to_string()).or_insert(0) += 1;
            }
        }

        Self {
            document_count,
            document_frequency,
        }
    }

    pub fn document_count(&self) -> usize {
        self.document_count
    }

    /// Terms absent from the fitted corpus are treated as appearing nowhere.
    pub fn idf(&self, term: &str) -> f64 {
        let df = self.document_frequency.get(term).copied().unwrap_or(0);
        ((1.0 + self.document_count as f64) / (1.0 + df as f64)).ln() + 1.0
    }

    /// L2-normalized TF-IDF vector for one token sequence.
    pub fn weigh(&self, tokens: &[String]) -> BTreeMap<String, f64> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for term in tokens.iter().map(String::as_str).filter(|t| is_weighted_term(t)) {
            *counts.entry(term).or_insert(0) += 1;
        }

        let raw: BTreeMap<String, f64> = counts
            .into_iter()
            .map(|(term, count)| (term.to_string(), count as f64 * self.idf(term)))
            .collect();

        let norm = raw.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm == 0.0 {
            return BTreeMap::new();
        }

        raw.into_iter()
            .map(|(term, weight)| (term, (weight / norm).min(1.0)))
            .collect()
    }
}

/// Pure numbers carry no skill information; "3d" or "401k" still do.
pub fn is_weighted_term(term: &str) -> bool {
    term.chars().any(char::is_alphabetic)
}
