//! Output formatters for analysis reports

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::{AnalysisReport, ScoreBand};
use crate::processing::analyzer::{DocumentRole, PipelineWarning};
use colored::{Color, Colorize};
use std::path::Path;

/// Renders a report into one output format
pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Terminal output with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
    include_text: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
    detailed: bool,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_band(&self, band: ScoreBand) -> String {
        let color = match band {
            ScoreBand::Strong => Color::Green,
            ScoreBand::Good => Color::BrightGreen,
            ScoreBand::Fair => Color::Yellow,
            ScoreBand::Weak => Color::Red,
        };

        if self.use_colors {
            format!("[{}]", band.label().color(color).bold())
        } else {
            format!("[{}]", band.label())
        }
    }

    fn format_list(&self, items: &[String], color: Color) -> String {
        if items.is_empty() {
            return format!("  {}\n", self.colorize("(none)", Color::BrightBlack));
        }

        items
            .iter()
            .map(|item| format!("  • {}\n", self.colorize(item, color)))
            .collect()
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let result = &report.result;
        let mut output = String::new();

        output.push_str(&self.format_header("RESUME MATCH ANALYSIS", 1));
        output.push_str(&format!(
            "Résumé: {} | Job: {}\n",
            report.metadata.resume_file, report.metadata.job_title
        ));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms
        ));

        output.push_str(&self.format_header("Summary", 2));
        output.push_str(&format!(
            "Match score: {:.1}% {}\n",
            result.match_score,
            self.format_band(report.verdict)
        ));
        output.push_str(&format!(
            "Skills matched: {} of {} ({:.1}%)\n",
            result.skills_match.matched.len(),
            result.job_skills().len(),
            result.skills_match.match_percentage
        ));

        output.push_str(&self.format_header("Matched Skills", 3));
        output.push_str(&self.format_list(&result.skills_match.matched.to_vec(), Color::Green));

        output.push_str(&self.format_header("Missing Skills", 3));
        output.push_str(&self.format_list(&result.skills_match.missing.to_vec(), Color::Red));

        if self.detailed {
            output.push_str(&self.format_header("All Résumé Skills", 3));
            output.push_str(&self.format_list(&result.skills.to_vec(), Color::Cyan));

            output.push_str(&self.format_header("Education", 3));
            output.push_str(&self.format_list(&result.education, Color::White));

            output.push_str(&self.format_header("Experience", 3));
            output.push_str(&self.format_list(&result.experience, Color::White));
        }

        if !result.warnings.is_empty() {
            output.push_str(&self.format_header("Warnings", 2));
            for warning in &result.warnings {
                output.push_str(&format!("  ! {}\n", self.colorize(&describe_warning(warning), Color::Yellow)));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self {
            pretty,
            include_text: true,
        }
    }

    /// Leave the extracted résumé text out of the document
    pub fn without_text(mut self) -> Self {
        self.include_text = false;
        self
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut value = serde_json::to_value(report)?;
        if !self.include_text {
            if let Some(result) = value.get_mut("result").and_then(|r| r.as_object_mut()) {
                result.remove("resume_text");
            }
        }

        if self.pretty {
            Ok(serde_json::to_string_pretty(&value)?)
        } else {
            Ok(serde_json::to_string(&value)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool, detailed: bool) -> Self {
        Self {
            include_metadata,
            detailed,
        }
    }

    fn markdown_list(items: &[String]) -> String {
        if items.is_empty() {
            return "_None_\n\n".to_string();
        }

        let mut output: String = items.iter().map(|item| format!("- {}\n", item)).collect();
        output.push('\n');
        output
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let result = &report.result;
        let mut output = String::new();

        output.push_str("# Resume Match Analysis\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Résumé:** `{}` | **Job:** {}\n",
                report.metadata.resume_file, report.metadata.job_title
            ));
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms\n\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.processing_time_ms
            ));
        }

        output.push_str("## Summary\n\n");
        output.push_str("| Metric | Value |\n");
        output.push_str("|--------|-------|\n");
        output.push_str(&format!("| Match score | {:.1}% |\n", result.match_score));
        output.push_str(&format!(
            "| Skills matched | {} of {} ({:.1}%) |\n",
            result.skills_match.matched.len(),
            result.job_skills().len(),
            result.skills_match.match_percentage
        ));
        output.push_str(&format!("| Verdict | {} |\n\n", report.verdict.label()));

        output.push_str("## Matched Skills\n\n");
        output.push_str(&Self::markdown_list(&result.skills_match.matched.to_vec()));

        output.push_str("## Missing Skills\n\n");
        output.push_str(&Self::markdown_list(&result.skills_match.missing.to_vec()));

        if self.detailed {
            output.push_str("## Résumé Skills\n\n");
            output.push_str(&Self::markdown_list(&result.skills.to_vec()));

            output.push_str("## Education\n\n");
            output.push_str(&Self::markdown_list(&result.education));

            output.push_str("## Experience\n\n");
            for paragraph in &result.experience {
                for line in paragraph.lines() {
                    output.push_str(&format!("> {}\n", line));
                }
                output.push('\n');
            }
        }

        if !result.warnings.is_empty() {
            output.push_str("## Warnings\n\n");
            let warnings: Vec<String> = result.warnings.iter().map(describe_warning).collect();
            output.push_str(&Self::markdown_list(&warnings));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

fn describe_warning(warning: &PipelineWarning) -> String {
    match warning {
        PipelineWarning::Extraction(w) => format!("Extraction, {}", w),
        PipelineWarning::EnhancementUnavailable { document, reason } => {
            let document = match document {
                DocumentRole::Resume => "résumé",
                DocumentRole::JobDescription => "job description",
            };
            format!("Noun-phrase matching skipped for {}: {}", document, reason)
        }
    }
}

/// Picks a formatter for the requested format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ReportGenerator {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true, detailed),
        }
    }

    pub fn generate_report(&self, report: &AnalysisReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::analyzer::ResumeAnalyzer;

    fn report() -> AnalysisReport {
        let analyzer = ResumeAnalyzer::with_defaults().unwrap();
        let result = analyzer
            .analyze_text(
                "Python developer with SQL.\n\nWork experience at Acme for five years.",
                "Python, SQL and Kubernetes engineer",
            )
            .unwrap();
        AnalysisReport::new("/tmp/cv/jane.pdf", "Platform Engineer", 12, result)
    }

    #[test]
    fn test_console_without_colors() {
        let output = ConsoleFormatter::new(false, true).format_report(&report()).unwrap();

        assert!(output.contains("Résumé: jane.pdf | Job: Platform Engineer"));
        assert!(output.contains("Skills matched: 2 of 3 (66.7%)"));
        assert!(output.contains("  • kubernetes"));
        assert!(output.contains("Work experience at Acme for five years"));
        assert!(!output.contains("\u{1b}["));
    }

    #[test]
    fn test_json_shape() {
        let output = JsonFormatter::new(false).format_report(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["metadata"]["resume_file"], "jane.pdf");
        assert_eq!(value["result"]["skills_match"]["missing"], serde_json::json!(["kubernetes"]));
        assert_eq!(value["result"]["skills"], serde_json::json!(["python", "sql"]));
        assert!(value["result"]["resume_text"].is_string());

        let trimmed = JsonFormatter::new(false).without_text().format_report(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&trimmed).unwrap();
        assert!(value["result"].get("resume_text").is_none());
    }

    #[test]
    fn test_markdown_sections() {
        let output = MarkdownFormatter::new(false, false).format_report(&report()).unwrap();

        assert!(output.starts_with("# Resume Match Analysis"));
        assert!(output.contains("## Missing Skills\n\n- kubernetes\n"));
        assert!(!output.contains("## Education"));
    }

    #[test]
    fn test_generator_dispatch() {
        let generator = ReportGenerator::new(false, false);
        let report = report();

        for format in [OutputFormat::Console, OutputFormat::Json, OutputFormat::Markdown] {
            assert!(!generator.generate_report(&report, format).unwrap().is_empty());
        }
    }
}
