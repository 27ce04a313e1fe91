//! English linguistic resources shared by the normalizer stages
//!
//! Everything here is built once per process and only read afterwards, so a
//! single `Arc<Lexicon>` can back any number of concurrent analyses.

use std::collections::{HashMap, HashSet};

/// NLTK English stopwords. Contractions appear in their joined form because
/// punctuation stripping removes internal apostrophes.
const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "can", "will", "just",
    "don", "dont", "should", "shouldve", "now", "ll", "re", "ve", "ain", "aren", "arent",
    "couldn", "couldnt", "didn", "didnt", "doesn", "doesnt", "hadn", "hadnt", "hasn",
    "hasnt", "haven", "havent", "isn", "isnt", "ma", "mightn", "mightnt", "mustn", "mustnt",
    "needn", "neednt", "shan", "shant", "shouldn", "shouldnt", "wasn", "wasnt", "weren",
    "werent", "won", "wont", "wouldn", "wouldnt", "youd", "youll", "youre", "youve", "shes",
    "thatll", "also", "etc", "via", "within", "across", "per", "would", "could", "may",
    "might", "must", "shall",
];

/// Recruiting boilerplate that carries no information about the role itself.
const JOB_POSTING_FILLER: &[&str] = &[
    "seeking", "seek", "looking", "candidate", "candidates", "ideal", "role", "position",
    "responsibilities", "responsibility", "requirements", "requirement", "required",
    "preferred", "plus", "including", "include", "includes", "ability", "able", "years",
    "year", "experience", "experiences", "experienced", "skilled", "skill", "skills",
    "strong", "excellent", "proven", "solid", "knowledge", "proficiency", "proficient",
    "work", "working", "job", "opportunity", "opportunities", "nice", "bonus",
    "familiarity", "understanding", "demonstrated", "track", "record", "using", "use",
    "well", "good", "great", "highly", "join", "hiring", "apply", "applicant", "applicants",
];

/// Base forms of verbs common in resumes and job postings. Words that are
/// just as often nouns in this domain ("design", "test", "support") are left
/// out so they can take part in noun phrases.
const VERBS: &[&str] = &[
    "achieve", "administer", "analyze", "assist", "automate", "build", "collaborate",
    "communicate", "configure", "contribute", "coordinate", "create", "debug", "define",
    "deliver", "deploy", "develop", "drive", "enable", "enhance", "ensure", "establish",
    "evaluate", "execute", "facilitate", "gather",
    "grow", "guide", "help", "identify", "implement", "improve", "increase", "integrate",
    "launch", "maintain", "make", "manage", "mentor", "migrate", "modernize", "monitor",
    "optimize", "orchestrate", "organize", "oversee", "perform", "prepare",
    "prioritize", "produce", "provide", "publish", "reduce", "refactor", "resolve",
    "run", "scale", "ship", "solve", "spearhead", "streamline", "supervise", "take",
    "teach", "translate", "troubleshoot", "understand", "upgrade", "utilize", "write",
];

const IRREGULAR_VERBS: &[(&str, &str)] = &[
    ("led", "lead"),
    ("built", "build"),
    ("rebuilt", "build"),
    ("wrote", "write"),
    ("written", "write"),
    ("rewrote", "write"),
    ("made", "make"),
    ("ran", "run"),
    ("drove", "drive"),
    ("driven", "drive"),
    ("took", "take"),
    ("taken", "take"),
    ("grew", "grow"),
    ("grown", "grow"),
    ("taught", "teach"),
    ("thought", "think"),
    ("brought", "bring"),
    ("began", "begin"),
    ("begun", "begin"),
    ("kept", "keep"),
    ("held", "hold"),
    ("spent", "spend"),
    ("sent", "send"),
    ("gave", "give"),
    ("given", "give"),
    ("found", "find"),
    ("chose", "choose"),
    ("chosen", "choose"),
    ("understood", "understand"),
    ("oversaw", "oversee"),
    ("overseen", "oversee"),
    ("undertook", "undertake"),
];

const ADJECTIVES: &[&str] = &[
    "agile", "back-end", "best", "big", "senior", "junior", "principal", "new", "large",
    "small", "scalable", "remote", "technical", "modern", "complex", "robust", "reliable",
    "high", "low", "fast", "full", "key", "various", "multiple", "relevant", "similar",
    "efficient", "innovative", "dynamic", "real-time", "open", "hands-on", "creative",
    "independent", "familiar", "professional", "functional", "global", "digital",
    "internal", "external", "personal", "critical", "cross-functional", "front-end",
    "full-stack", "mobile", "secure", "native", "advanced", "deep", "natural",
    "relational", "visual", "verbal", "quantitative", "continuous", "financial",
    "clinical", "social", "public", "private", "hybrid",
];

/// Plural nouns the suffix rules would get wrong.
const IRREGULAR_NOUNS: &[(&str, &str)] = &[
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("analyses", "analysis"),
    ("diagnoses", "diagnosis"),
    ("hypotheses", "hypothesis"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
    ("caches", "cache"),
    ("niches", "niche"),
    ("headaches", "headache"),
    ("quizzes", "quiz"),
    ("leaves", "leave"),
    ("lives", "life"),
];

/// Words ending in "s" that are not plurals. Many are product names.
const UNINFLECTED: &[&str] = &[
    "kubernetes", "jenkins", "pandas", "postgres", "analytics", "statistics", "economics",
    "physics", "mathematics", "graphics", "logistics", "ethics", "electronics", "robotics",
    "devops", "mlops", "finops", "windows", "news", "series", "species", "sales", "alias",
    "canvas", "atlas", "chaos", "ethos", "kudos", "macos", "chromeos", "iaas", "paas",
    "saas", "aws", "ops", "lens", "always", "perhaps", "various", "numerous", "sas",
    "keras", "ads", "https", "dns", "nas", "cms", "ecs", "eks", "gis", "ios", "lms",
    "ems", "express", "business", "cypress", "less", "axis",
];

#[derive(Debug)]
pub struct Lexicon {
    stopwords: HashSet<&'static str>,
    verbs: HashSet<&'static str>,
    adjectives: HashSet<&'static str>,
    irregular_verbs: HashMap<&'static str, &'static str>,
    irregular_nouns: HashMap<&'static str, &'static str>,
    uninflected: HashSet<&'static str>,
}

impl Lexicon {
    pub fn english() -> Self {
        Self {
            stopwords: ENGLISH_STOPWORDS
                .iter()
                .chain(JOB_POSTING_FILLER.iter())
                .copied()
                .collect(),
            verbs: VERBS.iter().copied().collect(),
            adjectives: ADJECTIVES.iter().copied().collect(),
            irregular_verbs: IRREGULAR_VERBS.iter().copied().collect(),
            irregular_nouns: IRREGULAR_NOUNS.iter().copied().collect(),
            uninflected: UNINFLECTED.iter().copied().collect(),
        }
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    pub fn is_adjective(&self, word: &str) -> bool {
        self.adjectives.contains(word)
    }

    pub fn is_uninflected(&self, word: &str) -> bool {
        self.uninflected.contains(word) || word.ends_with("js")
    }

    pub fn irregular_noun(&self, word: &str) -> Option<&'static str> {
        self.irregular_nouns.get(word).copied()
    }

    /// Base form of `word` when it is a known verb or an inflection of one.
    pub fn verb_base(&self, word: &str) -> Option<String> {
        if let Some(base) = self.irregular_verbs.get(word) {
            return Some((*base).to_string());
        }
        if self.verbs.contains(word) {
            return Some(word.to_string());
        }

        inflection_candidates(word)
            .into_iter()
            .find(|candidate| self.verbs.contains(candidate.as_str()))
    }

    pub fn stopword_count(&self) -> usize {
        self.stopwords.len()
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::english()
    }
}

/// Possible base forms for a regularly inflected verb, most likely first.
fn inflection_candidates(word: &str) -> Vec<String> {
    let mut candidates = Vec::new();

    if let Some(stem) = word.strip_suffix("ied").or_else(|| word.strip_suffix("ies")) {
        candidates.push(format!("{}y", stem));
    }
    if let Some(stem) = word.strip_suffix("ing") {
        push_stem_forms(&mut candidates, stem);
    }
    if let Some(stem) = word.strip_suffix("ed") {
        push_stem_forms(&mut candidates, stem);
    }
    if let Some(stem) = word.strip_suffix("es") {
        candidates.push(stem.to_string());
    }
    if let Some(stem) = word.strip_suffix('s') {
        candidates.push(stem.to_string());
    }

    candidates
}

fn push_stem_forms(candidates: &mut Vec<String>, stem: &str) {
    if stem.len() < 2 {
        return;
    }
    candidates.push(stem.to_string());
    candidates.push(format!("{}e", stem));

    // running -> run, shipped -> ship
    let mut chars = stem.chars().rev();
    if let (Some(last), Some(prev)) = (chars.next(), chars.next()) {
        if last == prev && !matches!(last, 'l' | 's' | 'z') {
            candidates.push(stem[..stem.len() - last.len_utf8()].to_string());
        }
    }
}
