//! Text normalization

use crate::processing::linguistics::LinguisticContext;
use regex::Regex;
use std::sync::Arc;
use unicode_segmentation::UnicodeSegmentation;

/// Tokens of this length or shorter are dropped
const MIN_TOKEN_LEN: usize = 2;

/// Turns raw text into the normalized token stream used for skill matching
/// and TF-IDF scoring
#[derive(Debug, Clone)]
pub struct TextProcessor {
    context: Arc<LinguisticContext>,
    non_alpha_regex: Regex,
}

impl TextProcessor {
    pub fn new(context: Arc<LinguisticContext>) -> Self {
        let non_alpha_regex = Regex::new(r"[^a-zA-Z\s]").expect("Invalid non-alphabetic regex");

        Self {
            context,
            non_alpha_regex,
        }
    }

    /// Lowercase, strip non-letters, tokenize, drop stop words and short
    /// tokens, lemmatize, and re-join with single spaces.
    ///
    /// Deterministic for a given [`LinguisticContext`].
    pub fn normalize(&self, text: &str) -> String {
        self.tokens(text).join(" ")
    }

    /// Normalized tokens, in order of appearance
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let cleaned = self.non_alpha_regex.replace_all(&lowered, "");
        let lemmatizer = self.context.lemmatizer();

        cleaned
            .unicode_words()
            .filter(|word| word.len() > MIN_TOKEN_LEN && !self.context.is_stop_word(word))
            .map(|word| lemmatizer.lemmatize(word))
            .collect()
    }

    pub fn context(&self) -> &Arc<LinguisticContext> {
        &self.context
    }
}
