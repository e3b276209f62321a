//! Noun-phrase chunking
//!
//! The chunker feeds the second pass of skill recognition. It works on the
//! lowercased raw text so tokens such as "c++", "node.js" or "ci/cd" keep
//! their punctuation.

use crate::processing::linguistics::ENGLISH_STOP_WORDS;
use anyhow::bail;
use regex::Regex;
use std::collections::HashSet;

pub trait NounPhraseChunker: Send + Sync {
    fn name(&self) -> &str;

    /// Noun-phrase spans of `text`, in order of appearance
    fn noun_phrases(&self, text: &str) -> anyhow::Result<Vec<String>>;
}

/// Default input limit, in characters
pub const DEFAULT_MAX_CHARS: usize = 1_000_000;

/// Dependency-free chunker: a phrase is a maximal run of tokens inside one
/// clause that contains no function word.
pub struct HeuristicChunker {
    function_words: HashSet<&'static str>,
    clause_regex: Regex,
    max_chars: usize,
}

impl Default for HeuristicChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl HeuristicChunker {
    pub fn new() -> Self {
        let mut function_words: HashSet<&'static str> = ENGLISH_STOP_WORDS.iter().copied().collect();
        function_words.extend([
            "also", "etc", "using", "used", "including", "like", "within", "across", "via", "per",
            "strong", "excellent", "good", "knowledge", "plus",
        ]);

        // A period only ends a clause when followed by whitespace or the end,
        // so "node.js" and "asp.net" survive
        let clause_regex = Regex::new(r#"[,;:!?()\[\]{}<>"|\n\r\t•·]+|\.(?:\s|$)"#)
            .expect("Invalid clause regex");

        Self {
            function_words,
            clause_regex,
            max_chars: DEFAULT_MAX_CHARS,
        }
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    fn clean_token<'a>(&self, token: &'a str) -> &'a str {
        token
            .trim_matches(|c: char| matches!(c, '\'' | '`' | '*' | '-' | '–' | '—' | '_'))
            .trim_end_matches('.')
    }
}

impl NounPhraseChunker for HeuristicChunker {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn noun_phrases(&self, text: &str) -> anyhow::Result<Vec<String>> {
        let length = text.chars().count();
        if length > self.max_chars {
            bail!(
                "text of {} characters exceeds the chunker limit of {}",
                length,
                self.max_chars
            );
        }

        let mut phrases = Vec::new();

        for clause in self.clause_regex.split(text) {
            let mut current: Vec<&str> = Vec::new();

            for raw in clause.split_whitespace() {
                let token = self.clean_token(raw);
                if token.is_empty() || self.function_words.contains(token.to_lowercase().as_str()) {
                    if !current.is_empty() {
                        phrases.push(current.join(" ").to_lowercase());
                        current.clear();
                    }
                } else {
                    current.push(token);
                }
            }

            if !current.is_empty() {
                phrases.push(current.join(" ").to_lowercase());
            }
        }

        Ok(phrases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phrases_split_on_function_words() {
        let chunker = HeuristicChunker::new();
        let phrases = chunker
            .noun_phrases("experienced python developer with aws and docker skills.")
            .unwrap();

        assert_eq!(phrases, vec!["experienced python developer", "aws", "docker skills"]);
    }

    #[test]
    fn test_symbols_inside_tokens_survive() {
        let chunker = HeuristicChunker::new();
        let phrases = chunker
            .noun_phrases("built apis in c++, node.js and asp.net; owned ci/cd.")
            .unwrap();

        assert!(phrases.contains(&"c++".to_string()));
        assert!(phrases.contains(&"node.js".to_string()));
        assert!(phrases.contains(&"asp.net".to_string()));
        assert!(phrases.contains(&"owned ci/cd".to_string()));
    }

    #[test]
    fn test_input_limit() {
        let chunker = HeuristicChunker::new().with_max_chars(10);
        assert!(chunker.noun_phrases("short").is_ok());
        assert!(chunker.noun_phrases("this text is too long").is_err());
    }
}
