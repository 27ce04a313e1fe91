//! Keyword extraction from statistical and phrase signals

use crate::config::KeywordConfig;
use crate::processing::document::Document;
use crate::processing::tfidf::TfIdfModel;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub term: String,
    pub weight: f64,
}

/// Weighted terms, unique by term, kept in rank order: weight descending,
/// longer term first on ties, then lexical order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordSet {
    keywords: Vec<Keyword>,
}

impl KeywordSet {
    /// Build a set from arbitrary pairs. Duplicate terms keep their highest
    /// weight and weights are clamped into [0, 1].
    pub fn from_weighted<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut best: BTreeMap<String, f64> = BTreeMap::new();
        for (term, weight) in pairs {
            let weight = if weight.is_finite() { weight.clamp(0.0, 1.0) } else { 0.0 };
            let entry = best.entry(term.into()).or_insert(weight);
            if weight > *entry {
                *entry = weight;
            }
        }

        let mut keywords: Vec<Keyword> = best
            .into_iter()
            .map(|(term, weight)| Keyword { term, weight })
            .collect();
        keywords.sort_by(rank_order);
        Self { keywords }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keyword> {
        self.keywords.iter()
    }

    pub fn terms(&self) -> Vec<String> {
        self.keywords.iter().map(|k| k.term.clone()).collect()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.keywords.iter().any(|k| k.term == term)
    }

    pub fn weight(&self, term: &str) -> Option<f64> {
        self.keywords.iter().find(|k| k.term == term).map(|k| k.weight)
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    fn truncated(mut self, top_n: usize) -> Self {
        self.keywords.truncate(top_n);
        self
    }
}

fn rank_order(a: &Keyword, b: &Keyword) -> Ordering {
    b.weight
        .total_cmp(&a.weight)
        .then_with(|| b.term.chars().count().cmp(&a.term.chars().count()))
        .then_with(|| a.term.cmp(&b.term))
}

pub struct KeywordExtractor {
    top_n: usize,
    dual_signal_boost: f64,
    reference_corpus: Vec<Vec<String>>,
}

impl KeywordExtractor {
    pub fn new(config: &KeywordConfig) -> Self {
        Self {
            top_n: config.top_n,
            dual_signal_boost: config.dual_signal_boost,
            reference_corpus: Vec::new(),
        }
    }

    /// Widen the IDF corpus with extra normalized documents.
    pub fn with_reference_documents<I>(mut self, documents: I) -> Self
    where
        I: IntoIterator<Item = Document>,
    {
        self.reference_corpus.extend(
            documents
                .into_iter()
                .filter(|doc| !doc.is_empty())
                .map(|doc| doc.normalized_tokens().to_vec()),
        );
        self
    }

    pub fn reference_document_count(&self) -> usize {
        self.reference_corpus.len()
    }

    /// Rank the salient terms of `doc`.
    ///
    /// The statistical signal is TF-IDF over `doc`, `corpus_context` and any
    /// reference documents. The structural signal is the document's noun
    /// chunks; a chunk weighs the mean of its words' statistical weights.
    /// Terms found by both signals are boosted, capped at 1.0.
    pub fn extract_keywords(&self, doc: &Document, corpus_context: Option<&Document>) -> KeywordSet {
        if doc.is_empty() {
            return KeywordSet::empty();
        }

        let corpus = std::iter::once(doc.normalized_tokens())
            .chain(corpus_context.map(Document::normalized_tokens))
            .chain(self.reference_corpus.iter().map(Vec::as_slice));
        let model = TfIdfModel::fit(corpus);
        let statistical = model.weigh(doc.normalized_tokens());

        let structural: BTreeMap<String, f64> = doc
            .noun_chunks()
            .iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|chunk| (chunk.clone(), mean_word_weight(chunk, &statistical)))
            .collect();

        let mut merged: BTreeMap<String, f64> = BTreeMap::new();
        for (term, weight) in &statistical {
            let weight = if structural.contains_key(term) {
                (weight * self.dual_signal_boost).min(1.0)
            } else {
                *weight
            };
            merged.insert(term.clone(), weight);
        }
        for (chunk, weight) in structural {
            merged.entry(chunk).or_insert(weight);
        }

        KeywordSet::from_weighted(merged).truncated(self.top_n)
    }
}

fn mean_word_weight(chunk: &str, statistical: &BTreeMap<String, f64>) -> f64 {
    let weights: Vec<f64> = chunk
        .split(' ')
        .map(|word| statistical.get(word).copied().unwrap_or(0.0))
        .collect();
    if weights.is_empty() {
        0.0
    } else {
        weights.iter().sum::<f64>() / weights.len() as f64
    }
}
