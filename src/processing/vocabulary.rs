//! The controlled skill vocabulary

use crate::config::VocabularyConfig;
use crate::error::{Result, ResumeMatcherError};
use log::{debug, info};
use std::collections::HashSet;
use std::path::Path;

/// Built-in vocabulary, in its canonical order
pub const DEFAULT_SKILLS: &[&str] = &[
    // Programming languages
    "python", "java", "javascript", "c++", "c#", "ruby", "php", "swift", "kotlin", "typescript", "go",
    "scala", "rust",
    // Web development
    "html", "css", "react", "angular", "vue.js", "node.js", "django", "flask", "express.js", "spring",
    "asp.net",
    // Databases
    "sql", "mysql", "postgresql", "mongodb", "oracle", "sqlite", "redis", "cassandra", "elasticsearch",
    // DevOps and tools
    "git", "docker", "kubernetes", "jenkins", "aws", "azure", "gcp", "terraform", "ansible", "ci/cd",
    // Data science and AI
    "machine learning", "deep learning", "data analysis", "tensorflow", "pytorch", "pandas", "numpy",
    "scikit-learn", "nlp", "computer vision", "big data", "hadoop", "spark", "tableau", "power bi", "r",
    "matlab",
    // General business skills
    "project management", "agile", "scrum", "leadership", "team management", "communication",
    "problem solving", "critical thinking", "time management", "presentation", "public speaking",
    "microsoft office", "excel",
];

/// Ordered, duplicate-free list of lowercase skill phrases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillVocabulary {
    entries: Vec<String>,
    lookup: HashSet<String>,
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SkillVocabulary {
    pub fn builtin() -> Self {
        Self::from_entries(DEFAULT_SKILLS.iter().copied())
    }

    /// Lowercases and trims every phrase; blanks and repeats are dropped,
    /// first occurrence wins.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocabulary = Self {
            entries: Vec::new(),
            lookup: HashSet::new(),
        };
        vocabulary.push_all(entries);
        vocabulary
    }

    /// One phrase per line. A `#` at the start of a line or after whitespace
    /// starts a comment, so "c#" stays intact.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let vocabulary = Self::parse(&content);

        if vocabulary.is_empty() {
            return Err(ResumeMatcherError::Configuration(format!(
                "Skill vocabulary '{}' contains no entries",
                path.display()
            )));
        }

        info!("Loaded {} skills from {}", vocabulary.len(), path.display());
        Ok(vocabulary)
    }

    pub fn parse(content: &str) -> Self {
        Self::from_entries(content.lines().map(strip_comment))
    }

    pub fn from_config(config: &VocabularyConfig) -> Result<Self> {
        let mut vocabulary = match &config.path {
            Some(path) => Self::load(path)?,
            None => Self::builtin(),
        };

        if !config.extra_skills.is_empty() {
            debug!("Adding {} extra skills from configuration", config.extra_skills.len());
            vocabulary.push_all(&config.extra_skills);
        }

        Ok(vocabulary)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.lookup.contains(skill)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Individual words of all phrases, used to keep skill names out of
    /// lemmatization
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().flat_map(|entry| entry.split_whitespace())
    }

    fn push_all<I, S>(&mut self, entries: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for entry in entries {
            let normalized = entry.as_ref().trim().to_lowercase();
            if normalized.is_empty() || self.lookup.contains(&normalized) {
                continue;
            }
            self.lookup.insert(normalized.clone());
            self.entries.push(normalized);
        }
    }
}

fn strip_comment(line: &str) -> &str {
    let line = line.trim();
    if line.starts_with('#') {
        return "";
    }
    match line.find(" #").or_else(|| line.find("\t#")) {
        Some(index) => line[..index].trim(),
        None => line,
    }
}
