//! Text processing and analysis module

pub mod analyzer;
pub mod chunker;
pub mod linguistics;
pub mod sections;
pub mod similarity;
pub mod skills;
pub mod skills_match;
pub mod text_processor;
pub mod vocabulary;

pub use analyzer::{AnalysisResult, PipelineWarning, ResumeAnalyzer};
pub use skills::SkillSet;
pub use vocabulary::SkillVocabulary;
