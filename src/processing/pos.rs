//! Shallow part-of-speech tagging
//!
//! Lexicon lookups first, suffix heuristics second, noun as the fallback.
//! Good enough to tell noun phrases apart from the verbs and adverbs around
//! them, which is all the chunker needs.

use crate::processing::lexicon::Lexicon;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartOfSpeech {
    Noun,
    Adjective,
    Verb,
    Adverb,
    Number,
}

impl PartOfSpeech {
    /// Whether the tag may appear inside a noun phrase.
    pub fn is_nominal(self) -> bool {
        matches!(self, PartOfSpeech::Noun | PartOfSpeech::Adjective)
    }
}

const ADJECTIVE_SUFFIXES: &[&str] = &["ful", "ous", "ive", "able", "ible", "ical", "less"];

/// -ly words that are not adverbs.
const LY_NOUNS: &[&str] = &[
    "family", "assembly", "supply", "anomaly", "monopoly", "italy", "july", "reply", "rely",
];

pub fn tag_word(word: &str, lexicon: &Lexicon) -> PartOfSpeech {
    if word.chars().next().map_or(false, |c| c.is_ascii_digit()) {
        return PartOfSpeech::Number;
    }

    // Compounds take the category of their head: "cross-functional", "end-to-end".
    if lexicon.is_adjective(word) {
        return PartOfSpeech::Adjective;
    }
    let head = word.rsplit('-').next().unwrap_or(word);

    if lexicon.verb_base(head).is_some() && !word.contains('-') {
        return PartOfSpeech::Verb;
    }
    if lexicon.is_adjective(head) {
        return PartOfSpeech::Adjective;
    }
    if head.len() > 4 && head.ends_with("ly") && !LY_NOUNS.contains(&head) {
        return PartOfSpeech::Adverb;
    }
    // Participles of verbs we don't know act as modifiers: "distributed systems".
    if head.len() > 4 && head.ends_with("ed") && !head.ends_with("eed") {
        return PartOfSpeech::Adjective;
    }
    if ADJECTIVE_SUFFIXES
        .iter()
        .any(|suffix| head.len() > suffix.len() + 2 && head.ends_with(suffix))
        && !lexicon.is_uninflected(head)
    {
        return PartOfSpeech::Adjective;
    }

    PartOfSpeech::Noun
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexicon_categories() {
        let lexicon = Lexicon::english();
        assert_eq!(tag_word("developed", &lexicon), PartOfSpeech::Verb);
        assert_eq!(tag_word("senior", &lexicon), PartOfSpeech::Adjective);
        assert_eq!(tag_word("python", &lexicon), PartOfSpeech::Noun);
        assert_eq!(tag_word("2019", &lexicon), PartOfSpeech::Number);
    }

    #[test]
    fn test_suffix_heuristics() {
        let lexicon = Lexicon::english();
        assert_eq!(tag_word("quickly", &lexicon), PartOfSpeech::Adverb);
        assert_eq!(tag_word("supply", &lexicon), PartOfSpeech::Noun);
        assert_eq!(tag_word("distributed", &lexicon), PartOfSpeech::Adjective);
        assert_eq!(tag_word("responsive", &lexicon), PartOfSpeech::Adjective);
        assert_eq!(tag_word("learning", &lexicon), PartOfSpeech::Noun);
    }

    #[test]
    fn test_hyphenated_compounds_follow_head() {
        let lexicon = Lexicon::english();
        assert_eq!(tag_word("cross-functional", &lexicon), PartOfSpeech::Adjective);
        assert_eq!(tag_word("end-to-end", &lexicon), PartOfSpeech::Noun);
        assert!(tag_word("micro-services", &lexicon).is_nominal());
    }
}
