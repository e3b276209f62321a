//! Report structures wrapping an analysis result for presentation

use crate::processing::analyzer::AnalysisResult;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// An analysis result plus the context it was produced in
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub metadata: ReportMetadata,

    /// Qualitative band for the match score
    pub verdict: ScoreBand,

    pub result: AnalysisResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// File name of the résumé, without directories
    pub resume_file: String,

    pub job_title: String,

    pub generated_at: DateTime<Utc>,

    pub processing_time_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Strong,
    Good,
    Fair,
    Weak,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 75.0 => ScoreBand::Strong,
            s if s >= 50.0 => ScoreBand::Good,
            s if s >= 25.0 => ScoreBand::Fair,
            _ => ScoreBand::Weak,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Strong => "STRONG MATCH",
            ScoreBand::Good => "GOOD MATCH",
            ScoreBand::Fair => "PARTIAL MATCH",
            ScoreBand::Weak => "WEAK MATCH",
        }
    }
}

impl AnalysisReport {
    pub fn new(resume_file: &str, job_title: &str, processing_time_ms: u64, result: AnalysisResult) -> Self {
        let resume_file = std::path::Path::new(resume_file)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| resume_file.to_string());

        Self {
            metadata: ReportMetadata {
                resume_file,
                job_title: job_title.to_string(),
                generated_at: Utc::now(),
                processing_time_ms,
            },
            verdict: ScoreBand::from_score(result.match_score),
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::from_score(100.0), ScoreBand::Strong);
        assert_eq!(ScoreBand::from_score(75.0), ScoreBand::Strong);
        assert_eq!(ScoreBand::from_score(60.2), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(25.0), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(0.0), ScoreBand::Weak);
    }
}
