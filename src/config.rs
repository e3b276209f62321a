//! Configuration management for the resume matcher

use crate::error::{Result, ResumeMatcherError};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub vocabulary: VocabularyConfig,
    pub matching: MatchingConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VocabularyConfig {
    /// Replaces the built-in skill list; one phrase per line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Appended after the base list
    #[serde(default)]
    pub extra_skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Require skill phrases to start and end on a word boundary
    pub word_boundaries: bool,
    /// Run the noun-phrase pass of skill recognition
    pub noun_phrases: bool,
    /// Inputs longer than this are rejected by the noun-phrase chunker
    pub max_chunker_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub max_file_size_mb: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            word_boundaries: true,
            noun_phrases: true,
            max_chunker_chars: 1_000_000,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { max_file_size_mb: 16 }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vocabulary: VocabularyConfig::default(),
            matching: MatchingConfig::default(),
            input: InputConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| ResumeMatcherError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a path given on the command line. A missing file is an
    /// error unless `allow_missing` is set, in which case defaults are used.
    pub fn load_explicit(path: &Path, allow_missing: bool) -> Result<Self> {
        if path.exists() {
            return Self::load_from(path);
        }

        if allow_missing {
            warn!("Config file {} does not exist, using defaults", path.display());
            Ok(Self::default())
        } else {
            Err(ResumeMatcherError::Configuration(format!(
                "Config file {} does not exist",
                path.display()
            )))
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeMatcherError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-matcher")
            .join("config.toml")
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.input.max_file_size_mb * 1024 * 1024
    }

    fn validate(&self) -> Result<()> {
        if self.matching.max_chunker_chars == 0 {
            return Err(ResumeMatcherError::Configuration(
                "matching.max_chunker_chars must be greater than zero".to_string(),
            ));
        }
        if self.input.max_file_size_mb == 0 {
            return Err(ResumeMatcherError::Configuration(
                "input.max_file_size_mb must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
