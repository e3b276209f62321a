//! Shared English linguistic resources
//!
//! A [`LinguisticContext`] is built once at startup and shared read-only
//! (behind an `Arc`) by the normalizer, the skill recognizer and the
//! similarity scorer.

use crate::processing::chunker::{HeuristicChunker, NounPhraseChunker};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// NLTK's English stop-word list
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're",
    "you've", "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he",
    "him", "his", "himself", "she", "she's", "her", "hers", "herself", "it", "it's",
    "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "that'll", "these", "those", "am", "is", "are",
    "was", "were", "be", "been", "being", "have", "has", "had", "having", "do",
    "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or", "because",
    "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below",
    "to", "from", "up", "down", "in", "out", "on", "off", "over", "under", "again",
    "further", "then", "once", "here", "there", "when", "where", "why", "how",
    "all", "any", "both", "each", "few", "more", "most", "other", "some", "such",
    "no", "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s",
    "t", "can", "will", "just", "don", "don't", "should", "should've", "now", "d",
    "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't",
    "didn", "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't",
    "haven", "haven't", "isn", "isn't", "ma", "mightn", "mightn't", "mustn",
    "mustn't", "needn", "needn't", "shan", "shan't", "shouldn", "shouldn't", "wasn",
    "wasn't", "weren", "weren't", "won", "won't", "wouldn", "wouldn't",
];

/// Noun plural rules, tried in order
const NOUN_SUFFIX_RULES: &[(&str, &str)] = &[
    ("sses", "ss"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("xes", "x"),
    ("zes", "z"),
    ("ies", "y"),
    ("s", ""),
];

/// Endings of singular words that look plural
const INVARIANT_ENDINGS: &[&str] = &["ss", "us", "is", "ous", "ics"];

const IRREGULAR_NOUNS: &[(&str, &str)] = &[
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("people", "person"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("analyses", "analysis"),
    ("theses", "thesis"),
    ("diagnoses", "diagnosis"),
    ("hypotheses", "hypothesis"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
    ("appendices", "appendix"),
    ("data", "data"),
    ("media", "medium"),
    ("curricula", "curriculum"),
    ("alumni", "alumnus"),
    ("leaves", "leaf"),
    ("lives", "life"),
    ("wives", "wife"),
    ("knives", "knife"),
    ("halves", "half"),
    ("selves", "self"),
    ("movies", "movie"),
    ("cookies", "cookie"),
    ("ties", "tie"),
    ("lies", "lie"),
    ("pies", "pie"),
    ("series", "series"),
    ("species", "species"),
    ("news", "news"),
    ("kubernetes", "kubernetes"),
];

/// Lemmas shorter than this are left as the inflected word
const MIN_LEMMA_LEN: usize = 3;

/// Rule-based English noun lemmatizer
#[derive(Debug, Clone)]
pub struct Lemmatizer {
    irregular: HashMap<String, String>,
    protected: HashSet<String>,
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lemmatizer {
    pub fn new() -> Self {
        let irregular = IRREGULAR_NOUNS
            .iter()
            .map(|(word, lemma)| (word.to_string(), lemma.to_string()))
            .collect();

        Self {
            irregular,
            protected: HashSet::new(),
        }
    }

    /// Words returned unchanged, e.g. product names such as "jenkins"
    pub fn with_protected_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.protected
            .extend(terms.into_iter().map(|t| t.as_ref().to_lowercase()));
        self
    }

    pub fn lemmatize(&self, word: &str) -> String {
        if self.protected.contains(word) {
            return word.to_string();
        }

        if let Some(lemma) = self.irregular.get(word) {
            return lemma.clone();
        }

        if INVARIANT_ENDINGS.iter().any(|ending| word.ends_with(ending)) {
            return word.to_string();
        }

        for (suffix, replacement) in NOUN_SUFFIX_RULES {
            if let Some(stem) = word.strip_suffix(suffix) {
                if stem.len() + replacement.len() >= MIN_LEMMA_LEN {
                    return format!("{}{}", stem, replacement);
                }
                break;
            }
        }

        word.to_string()
    }
}

/// Immutable bundle of stop words, lemmatizer and optional noun-phrase chunker
pub struct LinguisticContext {
    stop_words: HashSet<String>,
    lemmatizer: Lemmatizer,
    chunker: Option<Box<dyn NounPhraseChunker>>,
}

impl LinguisticContext {
    /// English resources with the heuristic noun-phrase chunker
    pub fn english() -> Self {
        Self {
            stop_words: ENGLISH_STOP_WORDS.iter().map(|s| s.to_string()).collect(),
            lemmatizer: Lemmatizer::new(),
            chunker: Some(Box::new(HeuristicChunker::new())),
        }
    }

    pub fn with_protected_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.lemmatizer = self.lemmatizer.with_protected_terms(terms);
        self
    }

    /// `None` turns the noun-phrase pass of skill recognition off
    pub fn with_chunker(mut self, chunker: Option<Box<dyn NounPhraseChunker>>) -> Self {
        self.chunker = chunker;
        self
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    pub fn lemmatizer(&self) -> &Lemmatizer {
        &self.lemmatizer
    }

    pub fn chunker(&self) -> Option<&dyn NounPhraseChunker> {
        self.chunker.as_deref()
    }
}

impl fmt::Debug for LinguisticContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinguisticContext")
            .field("stop_words", &self.stop_words.len())
            .field("chunker", &self.chunker.as_ref().map(|c| c.name().to_string()))
            .finish()
    }
}
