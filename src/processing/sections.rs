//! Keyword-driven extraction of education and experience evidence
//!
//! Both extractors are heuristics. Their output is advisory and never feeds
//! the score.

use regex::Regex;

/// Matched anywhere in a sentence ("bachelor" also covers "bachelor's")
const EDUCATION_TERMS: &[&str] = &["bachelor", "master", "phd", "doctorate", "degree"];

/// Degree abbreviations, matched as whole words so "ma" does not fire on
/// "machine" or "ba" on "database"
const EDUCATION_ABBREVIATIONS: &[&str] = &["bs", "ba", "bsc", "msc", "ma"];

const EXPERIENCE_TERMS: &[&str] = &[
    "experience",
    "work",
    "job",
    "position",
    "role",
    "profession",
    "employment",
    "career",
];

#[derive(Debug, Clone)]
pub struct SectionExtractor {
    sentence_regex: Regex,
    paragraph_regex: Regex,
    abbreviation_regex: Regex,
}

impl Default for SectionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionExtractor {
    pub fn new() -> Self {
        let sentence_regex = Regex::new(r"[.!?]").expect("Invalid sentence regex");
        let paragraph_regex = Regex::new(r"\n[ \t\r]*\n").expect("Invalid paragraph regex");

        let abbreviation_regex = Regex::new(&format!(r"\b(?:{})\b", EDUCATION_ABBREVIATIONS.join("|")))
            .expect("Invalid abbreviation regex");

        Self {
            sentence_regex,
            paragraph_regex,
            abbreviation_regex,
        }
    }

    /// Trimmed sentences that mention a degree, in order of appearance
    pub fn extract_education(&self, text: &str) -> Vec<String> {
        self.sentence_regex
            .split(text)
            .filter(|sentence| {
                let lowered = sentence.to_lowercase();
                EDUCATION_TERMS.iter().any(|term| lowered.contains(term))
                    || self.abbreviation_regex.is_match(&lowered)
            })
            .map(|sentence| sentence.trim().to_string())
            .collect()
    }

    /// Trimmed blank-line-separated paragraphs that mention work history
    pub fn extract_experience(&self, text: &str) -> Vec<String> {
        self.paragraph_regex
            .split(text)
            .filter(|paragraph| {
                let lowered = paragraph.to_lowercase();
                EXPERIENCE_TERMS.iter().any(|term| lowered.contains(term))
            })
            .map(|paragraph| paragraph.trim().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_education_sentence_selected() {
        let extractor = SectionExtractor::new();
        let education = extractor.extract_education("I have a Bachelor of Science degree. I worked at Acme.");

        assert_eq!(education, vec!["I have a Bachelor of Science degree"]);
    }

    #[test]
    fn test_education_abbreviations_are_whole_words() {
        let extractor = SectionExtractor::new();
        let text = "Built a database for machine learning! Earned a BSc in Physics? MA, History";
        let education = extractor.extract_education(text);

        assert_eq!(education, vec!["Earned a BSc in Physics", "MA, History"]);
    }

    #[test]
    fn test_education_keeps_duplicates_in_order() {
        let extractor = SectionExtractor::new();
        let education = extractor.extract_education("PhD in CS. Master of Arts. PhD in CS.");

        assert_eq!(education, vec!["PhD in CS", "Master of Arts", "PhD in CS"]);
    }

    #[test]
    fn test_experience_paragraphs() {
        let extractor = SectionExtractor::new();
        let text = "Jane Roe\njane@example.com\n\nWork Experience\nSenior engineer at Acme, 2019-2024\n\n  \nHobbies: chess\n\nCareer goal: staff engineer  ";
        let experience = extractor.extract_experience(text);

        assert_eq!(
            experience,
            vec![
                "Work Experience\nSenior engineer at Acme, 2019-2024",
                "Career goal: staff engineer",
            ]
        );
    }

    #[test]
    fn test_no_evidence() {
        let extractor = SectionExtractor::new();
        assert!(extractor.extract_education("Nothing relevant here").is_empty());
        assert!(extractor.extract_experience("").is_empty());
    }
}
