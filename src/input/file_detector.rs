//! File type detection

use crate::error::{Result, ResumeMatcherError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    pub const SUPPORTED_EXTENSIONS: [&'static str; 2] = ["pdf", "docx"];

    /// Accepts `pdf`, `.PDF`, `docx`, `.Docx`, ...
    pub fn from_extension(ext: &str) -> Result<Self> {
        let normalized = ext.trim().trim_start_matches('.').to_lowercase();
        match normalized.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            _ => Err(ResumeMatcherError::UnsupportedFormat(format!(
                "'{}' (supported: {})",
                ext,
                Self::SUPPORTED_EXTENSIONS.join(", ")
            ))),
        }
    }

    /// Uses the final dot-extension of the file name
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                ResumeMatcherError::UnsupportedFormat(format!("File has no extension: {}", path.display()))
            })?;

        Self::from_extension(extension)
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Pdf => write!(f, "pdf"),
            DocumentFormat::Docx => write!(f, "docx"),
        }
    }
}
