//! Skill recognition against the controlled vocabulary

use crate::error::{Result, ResumeMatcherError};
use crate::processing::linguistics::LinguisticContext;
use crate::processing::text_processor::TextProcessor;
use crate::processing::vocabulary::SkillVocabulary;
use aho_corasick::{AhoCorasick, MatchKind};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Set of vocabulary entries found in a document.
///
/// Members always come from a [`SkillVocabulary`]; the only public
/// constructors filter against one. Serializes as a sorted list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SkillSet(BTreeSet<String>);

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only the candidates that are vocabulary entries
    pub fn from_vocabulary<I, S>(vocabulary: &SkillVocabulary, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for candidate in candidates {
            let skill = candidate.as_ref().trim().to_lowercase();
            if vocabulary.contains(&skill) {
                set.0.insert(skill);
            }
        }
        set
    }

    pub(crate) fn insert_entry(&mut self, skill: &str) -> bool {
        self.0.insert(skill.to_string())
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.0.contains(skill)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_superset(&self, other: &SkillSet) -> bool {
        self.0.is_superset(&other.0)
    }

    pub fn is_disjoint(&self, other: &SkillSet) -> bool {
        self.0.is_disjoint(&other.0)
    }

    pub fn union(&self, other: &SkillSet) -> SkillSet {
        SkillSet(self.0.union(&other.0).cloned().collect())
    }

    /// Sorted list, for persistence and display
    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

/// Multi-pattern search for vocabulary phrases
#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    automaton: AhoCorasick,
    word_boundaries: bool,
}

impl PhraseMatcher {
    pub fn new(vocabulary: &SkillVocabulary, word_boundaries: bool) -> Result<Self> {
        // Standard semantics are required for overlapping search, which lets
        // "machine learning" and "nlp" both be seen in "machine learning nlp"
        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(vocabulary.entries())
            .map_err(|e| ResumeMatcherError::Processing(format!("Failed to build skill matcher: {}", e)))?;

        Ok(Self {
            automaton,
            word_boundaries,
        })
    }

    /// Vocabulary indices of every phrase contained in `text`
    pub fn find(&self, text: &str) -> BTreeSet<usize> {
        self.automaton
            .find_overlapping_iter(text)
            .filter(|m| !self.word_boundaries || is_word_bounded(text, m.start(), m.end()))
            .map(|m| m.pattern().as_usize())
            .collect()
    }
}

fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();

    !before.map_or(false, char::is_alphanumeric) && !after.map_or(false, char::is_alphanumeric)
}

/// Outcome of the noun-phrase pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum EnhancementStatus {
    Applied { phrases: usize, added: usize },
    Disabled,
    Unavailable { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillRecognition {
    pub skills: SkillSet,
    pub enhancement: EnhancementStatus,
}

impl SkillRecognition {
    pub fn is_degraded(&self) -> bool {
        matches!(self.enhancement, EnhancementStatus::Unavailable { .. })
    }
}

pub struct SkillRecognizer {
    processor: TextProcessor,
    vocabulary: Arc<SkillVocabulary>,
    matcher: PhraseMatcher,
}

impl SkillRecognizer {
    pub fn new(
        context: Arc<LinguisticContext>,
        vocabulary: Arc<SkillVocabulary>,
        word_boundaries: bool,
    ) -> Result<Self> {
        let matcher = PhraseMatcher::new(&vocabulary, word_boundaries)?;

        Ok(Self {
            processor: TextProcessor::new(context),
            vocabulary,
            matcher,
        })
    }

    /// Two passes: vocabulary phrases in the normalized text, then in each
    /// noun phrase of the lowercased raw text. A failing chunker only costs
    /// the second pass.
    pub fn recognize(&self, text: &str) -> SkillRecognition {
        let lowered = text.to_lowercase();
        let normalized = self.processor.normalize(&lowered);

        let mut skills = SkillSet::new();
        self.collect(&normalized, &mut skills);
        debug!("Normalized-text pass found {} skills", skills.len());

        let enhancement = match self.processor.context().chunker() {
            None => EnhancementStatus::Disabled,
            Some(chunker) => match chunker.noun_phrases(&lowered) {
                Ok(phrases) => {
                    let before = skills.len();
                    for phrase in &phrases {
                        self.collect(phrase.to_lowercase().trim(), &mut skills);
                    }
                    EnhancementStatus::Applied {
                        phrases: phrases.len(),
                        added: skills.len() - before,
                    }
                }
                Err(e) => {
                    warn!("Noun-phrase chunker '{}' failed, using keyword matches only: {}", chunker.name(), e);
                    EnhancementStatus::Unavailable {
                        reason: e.to_string(),
                    }
                }
            },
        };

        SkillRecognition { skills, enhancement }
    }

    pub fn vocabulary(&self) -> &SkillVocabulary {
        &self.vocabulary
    }

    fn collect(&self, text: &str, skills: &mut SkillSet) {
        let entries = self.vocabulary.entries();
        for index in self.matcher.find(text) {
            skills.insert_entry(&entries[index]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::chunker::NounPhraseChunker;

    struct FailingChunker;

    impl NounPhraseChunker for FailingChunker {
        fn name(&self) -> &str {
            "failing"
        }

        fn noun_phrases(&self, _text: &str) -> anyhow::Result<Vec<String>> {
            anyhow::bail!("model not loaded")
        }
    }

    fn recognizer_with(context: LinguisticContext, word_boundaries: bool) -> SkillRecognizer {
        let vocabulary = Arc::new(SkillVocabulary::builtin());
        let context = context.with_protected_terms(vocabulary.words());
        SkillRecognizer::new(Arc::new(context), vocabulary, word_boundaries).unwrap()
    }

    fn recognizer() -> SkillRecognizer {
        recognizer_with(LinguisticContext::english(), true)
    }

    fn set(skills: &[&str]) -> SkillSet {
        SkillSet::from_vocabulary(&SkillVocabulary::builtin(), skills)
    }

    #[test]
    fn test_job_description_skills() {
        let recognition = recognizer().recognize("Looking for a Python developer with AWS experience.");

        assert_eq!(recognition.skills, set(&["python", "aws"]));
        assert!(!recognition.is_degraded());
    }

    #[test]
    fn test_resume_skills() {
        let recognition = recognizer().recognize(
            "Experienced Python developer with AWS and Docker skills. Bachelor of Science in Computer Science.",
        );

        assert_eq!(recognition.skills, set(&["python", "aws", "docker"]));
    }

    #[test]
    fn test_noun_phrases_catch_symbol_skills() {
        let recognition = recognizer().recognize("Shipped services in C++ and C#, deployed with CI/CD.");

        assert!(recognition.skills.contains("c++"));
        assert!(recognition.skills.contains("c#"));
        assert!(recognition.skills.contains("ci/cd"));
        assert!(matches!(recognition.enhancement, EnhancementStatus::Applied { added, .. } if added >= 3));
    }

    #[test]
    fn test_multi_word_skills() {
        let recognition = recognizer().recognize("Background in machine learning, data analysis and project management.");

        assert!(recognition.skills.contains("machine learning"));
        assert!(recognition.skills.contains("data analysis"));
        assert!(recognition.skills.contains("project management"));
    }

    #[test]
    fn test_chunker_failure_falls_back_to_keywords() {
        let context = LinguisticContext::english().with_chunker(Some(Box::new(FailingChunker)));
        let recognition = recognizer_with(context, true).recognize("Python and C++ engineer");

        assert!(recognition.is_degraded());
        assert!(recognition.skills.contains("python"));
        // only the noun-phrase pass can see "c++"
        assert!(!recognition.skills.contains("c++"));
    }

    #[test]
    fn test_disabled_chunker() {
        let context = LinguisticContext::english().with_chunker(None);
        let recognition = recognizer_with(context, true).recognize("Kubernetes and Terraform");

        assert_eq!(recognition.enhancement, EnhancementStatus::Disabled);
        assert_eq!(recognition.skills, set(&["kubernetes", "terraform"]));
    }

    #[test]
    fn test_substring_mode_over_matches() {
        let recognition = recognizer_with(LinguisticContext::english(), false).recognize("JavaScript developer");

        // "java" inside "javascript" and "r" inside "developer"
        assert!(recognition.skills.contains("java"));
        assert!(recognition.skills.contains("r"));

        let bounded = recognizer().recognize("JavaScript developer");
        assert_eq!(bounded.skills, set(&["javascript"]));
    }

    #[test]
    fn test_recognized_skills_are_vocabulary_members() {
        let recognizer = recognizer();
        let text = "Go, Rust, R, Excel, Spark and Tableau; also leadership and public speaking. Sparkling water.";
        let recognition = recognizer.recognize(text);

        assert!(!recognition.skills.is_empty());
        assert!(recognition
            .skills
            .iter()
            .all(|skill| recognizer.vocabulary().contains(skill)));
    }

    #[test]
    fn test_from_vocabulary_filters_unknown() {
        let skills = set(&["Python", "basket weaving", "python"]);
        assert_eq!(skills.to_vec(), vec!["python".to_string()]);
    }
}
