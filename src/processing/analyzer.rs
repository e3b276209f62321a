//! Analysis pipeline: extraction, skill recognition, evidence extraction,
//! similarity scoring and skills comparison in one call

use crate::config::Config;
use crate::error::{Result, ResumeMatcherError};
use crate::input::{Document, Extraction, ExtractionWarning, InputManager};
use crate::processing::chunker::{HeuristicChunker, NounPhraseChunker};
use crate::processing::linguistics::LinguisticContext;
use crate::processing::sections::SectionExtractor;
use crate::processing::similarity::SimilarityScorer;
use crate::processing::skills::{EnhancementStatus, SkillRecognizer, SkillSet};
use crate::processing::skills_match::{compare_skills, SkillsMatch};
use crate::processing::vocabulary::SkillVocabulary;
use log::{info, warn};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Everything one analysis produces. Owned by the caller.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub resume_text: String,
    pub skills: SkillSet,
    pub education: Vec<String>,
    pub experience: Vec<String>,
    /// TF-IDF cosine similarity, 0 to 100
    pub match_score: f64,
    pub skills_match: SkillsMatch,
    /// Non-fatal degradations hit along the way
    pub warnings: Vec<PipelineWarning>,
}

impl AnalysisResult {
    pub fn job_skills(&self) -> SkillSet {
        self.skills_match.required()
    }

    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentRole {
    Resume,
    JobDescription,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PipelineWarning {
    Extraction(ExtractionWarning),
    EnhancementUnavailable { document: DocumentRole, reason: String },
}

/// Holds the shared linguistic resources; safe to share across threads and
/// reuse for any number of independent analyses
pub struct ResumeAnalyzer {
    input: InputManager,
    recognizer: SkillRecognizer,
    sections: SectionExtractor,
    scorer: SimilarityScorer,
}

impl ResumeAnalyzer {
    pub fn new(
        context: Arc<LinguisticContext>,
        vocabulary: Arc<SkillVocabulary>,
        word_boundaries: bool,
    ) -> Result<Self> {
        Ok(Self {
            input: InputManager::new(),
            recognizer: SkillRecognizer::new(context.clone(), vocabulary, word_boundaries)?,
            sections: SectionExtractor::new(),
            scorer: SimilarityScorer::new(context),
        })
    }

    /// Built-in vocabulary, English resources, word-boundary matching
    pub fn with_defaults() -> Result<Self> {
        Self::from_config(&Config::default())
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let vocabulary = Arc::new(SkillVocabulary::from_config(&config.vocabulary)?);

        let chunker: Option<Box<dyn NounPhraseChunker>> = if config.matching.noun_phrases {
            Some(Box::new(
                HeuristicChunker::new().with_max_chars(config.matching.max_chunker_chars),
            ))
        } else {
            None
        };

        let context = LinguisticContext::english()
            .with_protected_terms(vocabulary.words())
            .with_chunker(chunker);

        info!(
            "Analyzer ready: {} skills, noun phrases {}, word boundaries {}",
            vocabulary.len(),
            if config.matching.noun_phrases { "on" } else { "off" },
            if config.matching.word_boundaries { "on" } else { "off" },
        );

        Self::new(Arc::new(context), vocabulary, config.matching.word_boundaries)
    }

    /// Analyze the résumé at `path` against `job_description`.
    ///
    /// `extension` picks the extractor (`pdf` or `docx`, with or without the
    /// dot, any case). Fails with `UnsupportedFormat` for anything else and
    /// with `EmptyDocument` when no text could be extracted.
    pub fn analyze_resume(&self, path: &Path, extension: &str, job_description: &str) -> Result<AnalysisResult> {
        info!("Analyzing résumé {}", path.display());
        let extraction = self.input.extract_file(path, extension)?;
        self.analyze_extraction(extraction, job_description)
    }

    pub fn analyze_document(&self, document: &Document, job_description: &str) -> Result<AnalysisResult> {
        let extraction = self.input.extract_document(document);
        self.analyze_extraction(extraction, job_description)
    }

    /// Run the stages after extraction on text the caller already has
    pub fn analyze_text(&self, resume_text: &str, job_description: &str) -> Result<AnalysisResult> {
        let extraction = Extraction {
            text: resume_text.to_string(),
            warnings: Vec::new(),
        };
        self.analyze_extraction(extraction, job_description)
    }

    pub fn recognizer(&self) -> &SkillRecognizer {
        &self.recognizer
    }

    fn analyze_extraction(&self, extraction: Extraction, job_description: &str) -> Result<AnalysisResult> {
        let start = Instant::now();

        if extraction.is_empty() {
            let detail = if extraction.warnings.is_empty() {
                "document contains no text layer".to_string()
            } else {
                extraction
                    .warnings
                    .iter()
                    .map(|w| w.to_string())
                    .collect::<Vec<_>>()
                    .join("; ")
            };
            return Err(ResumeMatcherError::EmptyDocument(detail));
        }

        let mut warnings: Vec<PipelineWarning> = extraction
            .warnings
            .into_iter()
            .map(PipelineWarning::Extraction)
            .collect();
        let resume_text = extraction.text;

        let resume_recognition = self.recognizer.recognize(&resume_text);
        let education = self.sections.extract_education(&resume_text);
        let experience = self.sections.extract_experience(&resume_text);

        let job_recognition = self.recognizer.recognize(job_description);

        for (role, status) in [
            (DocumentRole::Resume, &resume_recognition.enhancement),
            (DocumentRole::JobDescription, &job_recognition.enhancement),
        ] {
            if let EnhancementStatus::Unavailable { reason } = status {
                warnings.push(PipelineWarning::EnhancementUnavailable {
                    document: role,
                    reason: reason.clone(),
                });
            }
        }

        let match_score = self.scorer.score(&resume_text, job_description);
        let skills_match = compare_skills(&resume_recognition.skills, &job_recognition.skills);

        if !warnings.is_empty() {
            warn!("Analysis completed with {} warnings", warnings.len());
        }
        info!(
            "Analysis finished in {} ms: score {:.1}, {} of {} required skills matched",
            start.elapsed().as_millis(),
            match_score,
            skills_match.matched.len(),
            job_recognition.skills.len()
        );

        Ok(AnalysisResult {
            resume_text,
            skills: resume_recognition.skills,
            education,
            experience,
            match_score,
            skills_match,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_text_end_to_end() {
        let analyzer = ResumeAnalyzer::with_defaults().unwrap();
        let result = analyzer
            .analyze_text(
                "Experienced Python developer with AWS and Docker skills. Bachelor of Science in Computer Science.",
                "Looking for a Python developer with AWS experience.",
            )
            .unwrap();

        assert_eq!(result.skills.to_vec(), vec!["aws", "docker", "python"]);
        assert_eq!(result.skills_match.matched.to_vec(), vec!["aws", "python"]);
        assert!(result.skills_match.missing.is_empty());
        assert_eq!(result.skills_match.match_percentage, 100.0);
        assert_eq!(result.education, vec!["Bachelor of Science in Computer Science"]);
        assert_eq!(result.experience.len(), 1);
        assert!(result.match_score > 0.0 && result.match_score <= 100.0);
        assert!(!result.is_degraded());
    }

    #[test]
    fn test_blank_text_is_empty_document() {
        let analyzer = ResumeAnalyzer::with_defaults().unwrap();
        let result = analyzer.analyze_text("  \n\n ", "Python developer");

        assert!(matches!(result, Err(ResumeMatcherError::EmptyDocument(_))));
    }

    #[test]
    fn test_enhancement_failure_is_reported() {
        let mut config = Config::default();
        config.matching.max_chunker_chars = 20;
        let analyzer = ResumeAnalyzer::from_config(&config).unwrap();

        let result = analyzer
            .analyze_text("Python and SQL across many long paragraphs of text", "SQL")
            .unwrap();

        assert!(result.skills.contains("python"));
        assert_eq!(
            result.warnings,
            vec![PipelineWarning::EnhancementUnavailable {
                document: DocumentRole::Resume,
                reason: "text of 50 characters exceeds the chunker limit of 20".to_string(),
            }]
        );
    }

    #[test]
    fn test_analyzer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ResumeAnalyzer>();
    }
}
