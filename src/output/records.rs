//! Flat records for storing an analysis
//!
//! List-valued fields are JSON-encoded strings so each record maps onto a
//! single table row.

use crate::error::Result;
use crate::processing::analyzer::AnalysisResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_JOB_TITLE: &str = "Untitled Job";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub filename: String,
    pub content: String,
    pub extracted_skills: String,
    pub extracted_education: String,
    pub extracted_experience: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescriptionRecord {
    pub title: String,
    pub content: String,
    /// Matched followed by missing skills
    pub required_skills: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub score: f64,
    pub skills_match: String,
    pub created_at: DateTime<Utc>,
}

/// The three records written for one analysis, sharing a timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistenceBundle {
    pub resume: ResumeRecord,
    pub job_description: JobDescriptionRecord,
    pub application: ApplicationRecord,
}

impl PersistenceBundle {
    pub fn from_analysis(filename: &str, job_title: &str, job_text: &str, result: &AnalysisResult) -> Result<Self> {
        Self::at(Utc::now(), filename, job_title, job_text, result)
    }

    pub fn at(
        created_at: DateTime<Utc>,
        filename: &str,
        job_title: &str,
        job_text: &str,
        result: &AnalysisResult,
    ) -> Result<Self> {
        let title = match job_title.trim() {
            "" => DEFAULT_JOB_TITLE.to_string(),
            title => title.to_string(),
        };

        let mut required_skills = result.skills_match.matched.to_vec();
        required_skills.extend(result.skills_match.missing.to_vec());

        Ok(Self {
            resume: ResumeRecord {
                filename: filename.to_string(),
                content: result.resume_text.clone(),
                extracted_skills: serde_json::to_string(&result.skills)?,
                extracted_education: serde_json::to_string(&result.education)?,
                extracted_experience: serde_json::to_string(&result.experience)?,
                created_at,
            },
            job_description: JobDescriptionRecord {
                title,
                content: job_text.to_string(),
                required_skills: serde_json::to_string(&required_skills)?,
                created_at,
            },
            application: ApplicationRecord {
                score: result.match_score,
                skills_match: serde_json::to_string(&result.skills_match)?,
                created_at,
            },
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        crate::output::formatter::save_report_to_file(&content, path)
    }
}
