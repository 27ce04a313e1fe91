//! Rule-based lemmatization guided by part of speech

use crate::processing::lexicon::Lexicon;
use crate::processing::pos::PartOfSpeech;

/// Reduce `word` to its dictionary form. Only nouns and verbs inflect here;
/// modifiers and numbers pass through unchanged.
pub fn lemmatize_word(word: &str, pos: PartOfSpeech, lexicon: &Lexicon) -> String {
    match pos {
        PartOfSpeech::Verb => lexicon.verb_base(word).unwrap_or_else(|| word.to_string()),
        PartOfSpeech::Noun => match word.rsplit_once('-') {
            Some((prefix, head)) => format!("{}-{}", prefix, singularize(head, lexicon)),
            None => singularize(word, lexicon),
        },
        PartOfSpeech::Adjective | PartOfSpeech::Adverb | PartOfSpeech::Number => word.to_string(),
    }
}

pub fn singularize(word: &str, lexicon: &Lexicon) -> String {
    if let Some(singular) = lexicon.irregular_noun(word) {
        return singular.to_string();
    }
    if word.len() <= 3 || lexicon.is_uninflected(word) {
        return word.to_string();
    }

    if let Some(stem) = word.strip_suffix("ies") {
        if stem.len() > 1 {
            return format!("{}y", stem);
        }
    }
    if word.ends_with("sses")
        || word.ends_with("xes")
        || word.ends_with("ches")
        || word.ends_with("shes")
    {
        return word[..word.len() - 2].to_string();
    }
    // "apis" and "kpis" are plurals, "redis" and "analysis" are not.
    if word.ends_with("ss") || word.ends_with("us") || (word.ends_with("is") && word.len() > 4) {
        return word.to_string();
    }
    match word.strip_suffix('s') {
        Some(stem) => stem.to_string(),
        None => word.to_string(),
    }
}
