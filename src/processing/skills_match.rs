//! Partition of a job's required skills against a résumé's skills

use crate::processing::skills::SkillSet;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillsMatch {
    pub matched: SkillSet,
    pub missing: SkillSet,
    /// `100 * |matched| / |job skills|`, or 0 when the job lists none
    pub match_percentage: f64,
}

impl SkillsMatch {
    /// All skills the job asked for
    pub fn required(&self) -> SkillSet {
        self.matched.union(&self.missing)
    }
}

pub fn compare_skills(resume_skills: &SkillSet, job_skills: &SkillSet) -> SkillsMatch {
    let mut matched = SkillSet::new();
    let mut missing = SkillSet::new();

    for skill in job_skills.iter() {
        if resume_skills.contains(skill) {
            matched.insert_entry(skill);
        } else {
            missing.insert_entry(skill);
        }
    }

    let match_percentage = if job_skills.is_empty() {
        0.0
    } else {
        matched.len() as f64 / job_skills.len() as f64 * 100.0
    };

    SkillsMatch {
        matched,
        missing,
        match_percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::vocabulary::SkillVocabulary;

    fn set(skills: &[&str]) -> SkillSet {
        SkillSet::from_vocabulary(&SkillVocabulary::builtin(), skills)
    }

    #[test]
    fn test_all_required_skills_present() {
        let result = compare_skills(&set(&["python", "aws", "docker"]), &set(&["python", "aws"]));

        assert_eq!(result.matched, set(&["python", "aws"]));
        assert!(result.missing.is_empty());
        assert_eq!(result.match_percentage, 100.0);
    }

    #[test]
    fn test_no_required_skills_present() {
        let result = compare_skills(&set(&["python"]), &set(&["kubernetes", "terraform"]));

        assert!(result.matched.is_empty());
        assert_eq!(result.missing, set(&["kubernetes", "terraform"]));
        assert_eq!(result.match_percentage, 0.0);
    }

    #[test]
    fn test_empty_job_skills() {
        let result = compare_skills(&set(&["python"]), &SkillSet::new());

        assert!(result.matched.is_empty());
        assert!(result.missing.is_empty());
        assert_eq!(result.match_percentage, 0.0);
    }

    #[test]
    fn test_partition_invariants() {
        let resume = set(&["python", "sql", "excel"]);
        let job = set(&["python", "sql", "tableau", "power bi"]);
        let result = compare_skills(&resume, &job);

        assert!(result.matched.is_disjoint(&result.missing));
        assert_eq!(result.required(), job);
        assert_eq!(result.match_percentage, 50.0);
    }

    #[test]
    fn test_full_coverage_whenever_resume_covers_job() {
        let resume = set(&["rust", "go", "docker", "kubernetes", "terraform", "leadership"]);
        let cases = [
            set(&["rust"]),
            set(&["go", "kubernetes"]),
            set(&["docker", "terraform", "leadership", "rust"]),
        ];

        for job in &cases {
            assert!(resume.is_superset(job));
            let result = compare_skills(&resume, job);
            assert_eq!(result.match_percentage, 100.0);
            assert_eq!(&result.matched, job);
        }

        let uncovered = set(&["rust", "scala"]);
        assert!(!resume.is_superset(&uncovered));
        assert!(compare_skills(&resume, &uncovered).match_percentage < 100.0);
    }

    #[test]
    fn test_serializes_as_lists() {
        let result = compare_skills(&set(&["sql"]), &set(&["sql", "git"]));
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["matched"], serde_json::json!(["sql"]));
        assert_eq!(json["missing"], serde_json::json!(["git"]));
        assert_eq!(json["match_percentage"], serde_json::json!(50.0));
    }
}
