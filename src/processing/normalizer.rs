//! Text normalization pipeline
//!
//! `Normalizer::normalize` runs an ordered chain of small steps:
//!
//! 1. bound the raw input length
//! 2. lowercase
//! 3. scrub contact details and rewrite symbol-bearing names (`c++`, `c#`)
//! 4. strip punctuation, keeping internal hyphens
//! 5. tokenize on whitespace
//! 6. drop short tokens, then stopwords
//! 7. tag parts of speech and lemmatize
//! 8. bound the token count and chunk noun phrases
//!
//! Each step is a free function so it can be tested on its own. Punctuation,
//! line breaks and removed words leave a clause boundary behind, which keeps
//! noun phrases from spanning list items or sentences.

use crate::config::ProcessingConfig;
use crate::processing::document::Document;
use crate::processing::lemmatizer::lemmatize_word;
use crate::processing::lexicon::Lexicon;
use crate::processing::pos::{tag_word, PartOfSpeech};
use log::{debug, warn};
use regex::Regex;
use std::borrow::Cow;
use std::sync::Arc;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// First token after a clause boundary.
    pub clause_start: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    pub text: String,
    pub pos: PartOfSpeech,
    pub clause_start: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizerSettings {
    pub max_input_chars: usize,
    pub max_tokens: usize,
    pub min_token_chars: usize,
    pub max_chunk_words: usize,
}

impl From<&ProcessingConfig> for NormalizerSettings {
    fn from(config: &ProcessingConfig) -> Self {
        Self {
            max_input_chars: config.max_input_chars,
            max_tokens: config.max_tokens,
            min_token_chars: config.min_token_chars,
            max_chunk_words: config.max_chunk_words,
        }
    }
}

impl Default for NormalizerSettings {
    fn default() -> Self {
        Self::from(&ProcessingConfig::default())
    }
}

/// Compiled patterns for text that would otherwise shred into junk tokens.
#[derive(Debug)]
struct TextPatterns {
    url: Regex,
    email: Regex,
    phone: Regex,
    cpp: Regex,
    sharp: Regex,
    dotnet: Regex,
}

impl TextPatterns {
    fn new() -> Self {
        Self {
            url: Regex::new(r"(?:https?://|www\.)[^\s]+").expect("Invalid URL regex"),
            email: Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}")
                .expect("Invalid email regex"),
            phone: Regex::new(r"(?:\+?\d{1,2}[-. ]?)?\(?\d{3}\)?[-. ]?\d{3}[-. ]?\d{4}\b")
                .expect("Invalid phone regex"),
            cpp: Regex::new(r"\bc\+\+").expect("Invalid C++ regex"),
            sharp: Regex::new(r"\b([cf])#").expect("Invalid C# regex"),
            dotnet: Regex::new(r"(^|[^a-z0-9])\.net\b").expect("Invalid .NET regex"),
        }
    }
}

pub struct Normalizer {
    lexicon: Arc<Lexicon>,
    patterns: TextPatterns,
    settings: NormalizerSettings,
}

impl Normalizer {
    pub fn new(lexicon: Arc<Lexicon>, settings: NormalizerSettings) -> Self {
        Self {
            lexicon,
            patterns: TextPatterns::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &NormalizerSettings {
        &self.settings
    }

    /// Never fails. Empty or whitespace-only input yields an empty document.
    pub fn normalize(&self, raw_text: &str) -> Document {
        let (bounded, input_truncated) = bound_input(raw_text, self.settings.max_input_chars);
        if input_truncated {
            warn!(
                "Input exceeds {} characters, analyzing only the leading part",
                self.settings.max_input_chars
            );
        }

        let text = lowercase(&bounded);
        let text = scrub_contact_details(&text, &self.patterns);
        let text = rewrite_symbol_names(&text, &self.patterns);
        let text = strip_punctuation(&text);

        let tokens = tokenize(&text);
        let tokens = drop_short_tokens(tokens, self.settings.min_token_chars);
        let tokens = remove_stopwords(tokens, &self.lexicon);
        let tagged = tag_parts_of_speech(tokens, &self.lexicon);
        let lemmas = lemmatize(tagged, &self.lexicon);

        let (lemmas, tokens_truncated) = truncate_tokens(lemmas, self.settings.max_tokens);
        if tokens_truncated {
            warn!(
                "Normalized text exceeds {} tokens, keeping the first {}",
                self.settings.max_tokens, self.settings.max_tokens
            );
        }

        let noun_chunks = chunk_noun_phrases(&lemmas, self.settings.max_chunk_words);
        debug!(
            "Normalized {} characters into {} tokens and {} noun chunks",
            raw_text.len(),
            lemmas.len(),
            noun_chunks.len()
        );

        Document::new(
            raw_text.to_string(),
            lemmas.into_iter().map(|token| token.text).collect(),
            noun_chunks,
            input_truncated || tokens_truncated,
        )
    }
}

/// Cut `text` to at most `max_chars` grapheme clusters.
pub fn bound_input(text: &str, max_chars: usize) -> (Cow<'_, str>, bool) {
    match text.grapheme_indices(true).nth(max_chars) {
        Some((cut, _)) => (Cow::Borrowed(&text[..cut]), true),
        None => (Cow::Borrowed(text), false),
    }
}

pub fn lowercase(text: &str) -> String {
    text.to_lowercase()
}

fn scrub_contact_details(text: &str, patterns: &TextPatterns) -> String {
    let text = patterns.url.replace_all(text, "\n");
    let text = patterns.email.replace_all(&text, "\n");
    patterns.phone.replace_all(&text, "\n").into_owned()
}

fn rewrite_symbol_names(text: &str, patterns: &TextPatterns) -> String {
    let text = patterns.cpp.replace_all(text, "cpp");
    let text = patterns.sharp.replace_all(&text, "${1}sharp");
    patterns.dotnet.replace_all(&text, "${1}dotnet").into_owned()
}

/// Remove everything that is not a letter, digit or whitespace.
///
/// A hyphen between two alphanumerics survives (`end-to-end`). A period or
/// apostrophe between two alphanumerics is dropped so the word stays whole
/// (`node.js` becomes `nodejs`). Any other symbol becomes a line break, which
/// later reads as a clause boundary.
pub fn strip_punctuation(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut stripped = String::with_capacity(text.len());

    for (i, &c) in chars.iter().enumerate() {
        if c.is_alphanumeric() {
            stripped.push(c);
            continue;
        }

        let inside_word = i > 0
            && i + 1 < chars.len()
            && chars[i - 1].is_alphanumeric()
            && chars[i + 1].is_alphanumeric();

        match c {
            '-' if inside_word => stripped.push('-'),
            '.' | '\'' | '\u{2019}' if inside_word => {}
            '\n' => stripped.push('\n'),
            c if c.is_whitespace() => stripped.push(' '),
            _ => stripped.push('\n'),
        }
    }

    stripped
}

pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    for clause in text.split('\n') {
        let mut clause_start = true;
        for word in clause.split_whitespace() {
            tokens.push(Token {
                text: word.to_string(),
                clause_start,
            });
            clause_start = false;
        }
    }
    tokens
}

pub fn drop_short_tokens(tokens: Vec<Token>, min_chars: usize) -> Vec<Token> {
    drop_with_boundary(tokens, |token| token.text.chars().count() < min_chars)
}

pub fn remove_stopwords(tokens: Vec<Token>, lexicon: &Lexicon) -> Vec<Token> {
    drop_with_boundary(tokens, |token| lexicon.is_stopword(&token.text))
}

/// Filter tokens, marking the token after each removed run as a clause start.
fn drop_with_boundary(tokens: Vec<Token>, drop: impl Fn(&Token) -> bool) -> Vec<Token> {
    let mut kept = Vec::with_capacity(tokens.len());
    let mut pending_boundary = false;

    for token in tokens {
        if drop(&token) {
            pending_boundary = true;
            continue;
        }
        kept.push(Token {
            clause_start: token.clause_start || pending_boundary,
            text: token.text,
        });
        pending_boundary = false;
    }

    kept
}

pub fn tag_parts_of_speech(tokens: Vec<Token>, lexicon: &Lexicon) -> Vec<TaggedToken> {
    tokens
        .into_iter()
        .map(|token| TaggedToken {
            pos: tag_word(&token.text, lexicon),
            text: token.text,
            clause_start: token.clause_start,
        })
        .collect()
}

pub fn lemmatize(tokens: Vec<TaggedToken>, lexicon: &Lexicon) -> Vec<TaggedToken> {
    tokens
        .into_iter()
        .map(|token| TaggedToken {
            text: lemmatize_word(&token.text, token.pos, lexicon),
            ..token
        })
        .collect()
}

pub fn truncate_tokens(mut tokens: Vec<TaggedToken>, max_tokens: usize) -> (Vec<TaggedToken>, bool) {
    if tokens.len() > max_tokens {
        tokens.truncate(max_tokens);
        (tokens, true)
    } else {
        (tokens, false)
    }
}

/// Maximal runs of adjectives and nouns inside one clause that end in a noun.
/// Runs longer than `max_words` keep their last `max_words` words, since the
/// head noun sits at the end of an English noun phrase.
pub fn chunk_noun_phrases(tokens: &[TaggedToken], max_words: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut run: Vec<&TaggedToken> = Vec::new();

    for token in tokens {
        if token.clause_start || !token.pos.is_nominal() {
            flush_run(&mut run, max_words, &mut chunks);
        }
        if token.pos.is_nominal() {
            run.push(token);
        }
    }
    flush_run(&mut run, max_words, &mut chunks);

    chunks
}

fn flush_run(run: &mut Vec<&TaggedToken>, max_words: usize, chunks: &mut Vec<String>) {
    while run.last().map_or(false, |token| token.pos != PartOfSpeech::Noun) {
        run.pop();
    }
    if !run.is_empty() {
        let start = run.len().saturating_sub(max_words);
        let words: Vec<&str> = run[start..].iter().map(|token| token.text.as_str()).collect();
        chunks.push(words.join(" "));
    }
    run.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> Normalizer {
        Normalizer::new(Arc::new(Lexicon::english()), NormalizerSettings::default())
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        let normalizer = normalizer();
        for input in ["", "   ", "\n\t \n"] {
            let doc = normalizer.normalize(input);
            assert!(doc.is_empty());
            assert_eq!(doc.normalized_text(), "");
            assert!(doc.noun_chunks().is_empty());
        }
    }

    #[test]
    fn test_resume_sentence() {
        let doc = normalizer()
            .normalize("Experienced Python developer skilled in Django and REST APIs");

        assert_eq!(
            doc.normalized_tokens(),
            &["python", "developer", "django", "rest", "api"]
        );
        assert_eq!(doc.normalized_text(), "python developer django rest api");
        assert_eq!(doc.noun_chunks(), &["python developer", "django", "rest api"]);
        assert!(!doc.truncated());
    }

    #[test]
    fn test_verbs_break_noun_phrases() {
        let doc = normalizer().normalize("Developed distributed systems, managed cloud infrastructure");

        assert_eq!(
            doc.normalized_tokens(),
            &["develop", "distributed", "system", "manage", "cloud", "infrastructure"]
        );
        assert_eq!(doc.noun_chunks(), &["distributed system", "cloud infrastructure"]);
    }

    #[test]
    fn test_hyphenated_compounds_survive() {
        let doc = normalizer().normalize("End-to-end testing -- with a twist");
        assert_eq!(doc.normalized_tokens()[0], "end-to-end");
        assert!(!doc.normalized_tokens().iter().any(|t| t.starts_with('-')));
    }

    #[test]
    fn test_symbol_names_and_dotted_words() {
        let doc = normalizer().normalize("C++, C# and .NET; Node.js");
        assert_eq!(doc.normalized_tokens(), &["cpp", "csharp", "dotnet", "nodejs"]);
    }

    #[test]
    fn test_contact_details_are_scrubbed() {
        let doc = normalizer()
            .normalize("Jane Roe jane.roe@example.com (555) 123-4567 https://github.com/janeroe");
        assert_eq!(doc.normalized_tokens(), &["jane", "roe"]);
    }

    #[test]
    fn test_short_tokens_dropped() {
        let doc = normalizer().normalize("J R Tolkien x y");
        assert_eq!(doc.normalized_tokens(), &["tolkien"]);
    }

    #[test]
    fn test_strip_punctuation() {
        assert_eq!(strip_punctuation("ci/cd"), "ci\ncd");
        assert_eq!(strip_punctuation("don't"), "dont");
        assert_eq!(strip_punctuation("state-of-the-art."), "state-of-the-art\n");
        assert_eq!(strip_punctuation("- bullet"), "\n bullet");
    }

    #[test]
    fn test_removed_words_mark_boundaries() {
        let tokens = tokenize("python and django");
        let tokens = remove_stopwords(tokens, &Lexicon::english());
        assert_eq!(tokens.len(), 2);
        assert!(tokens[0].clause_start);
        assert!(tokens[1].clause_start);
    }

    #[test]
    fn test_chunk_length_is_capped() {
        let settings = NormalizerSettings {
            max_chunk_words: 2,
            ..NormalizerSettings::default()
        };
        let normalizer = Normalizer::new(Arc::new(Lexicon::english()), settings);
        let doc = normalizer.normalize("senior machine learning engineer");
        assert_eq!(doc.noun_chunks(), &["learning engineer"]);
    }

    #[test]
    fn test_token_bound_truncates() {
        let settings = NormalizerSettings {
            max_tokens: 3,
            ..NormalizerSettings::default()
        };
        let normalizer = Normalizer::new(Arc::new(Lexicon::english()), settings);
        let doc = normalizer.normalize("rust go java kotlin scala");
        assert_eq!(doc.normalized_tokens(), &["rust", "go", "java"]);
        assert!(doc.truncated());
    }

    #[test]
    fn test_input_bound_respects_graphemes() {
        let (bounded, truncated) = bound_input("héllo wörld", 5);
        assert_eq!(bounded, "héllo");
        assert!(truncated);

        let (bounded, truncated) = bound_input("short", 100);
        assert_eq!(bounded, "short");
        assert!(!truncated);
    }

    #[test]
    fn test_deterministic() {
        let normalizer = normalizer();
        let text = "Built scalable microservices in Go and Rust for payments.";
        assert_eq!(normalizer.normalize(text), normalizer.normalize(text));
    }
}
