//! Job descriptions arrive as text, either inline or from a .txt/.md file

use crate::error::{Result, ResumeMatcherError};
use pulldown_cmark::{html, Parser};
use regex::Regex;
use std::path::Path;

pub fn read_job_description(path: &Path) -> Result<String> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default();

    let content = std::fs::read_to_string(path)?;

    match extension.as_str() {
        "md" | "markdown" => Ok(markdown_to_text(&content)),
        "txt" | "" => Ok(content),
        other => Err(ResumeMatcherError::UnsupportedFormat(format!(
            "Job description must be .txt or .md, got .{}",
            other
        ))),
    }
}

/// Render markdown and strip the markup, keeping paragraph breaks as blank
/// lines so experience paragraphs still split.
pub fn markdown_to_text(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    let text = html_output
        .replace("<br />", "\n")
        .replace("</p>", "\n\n")
        .replace("</li>", "\n")
        .replace("</h1>", "\n\n")
        .replace("</h2>", "\n\n")
        .replace("</h3>", "\n\n");

    let tag_regex = Regex::new(r"<[^>]*>").expect("Invalid tag regex");
    let clean_text = tag_regex.replace_all(&text, "");

    let decoded = clean_text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    let blank_lines = Regex::new(r"\n{3,}").expect("Invalid blank line regex");
    blank_lines.replace_all(decoded.trim(), "\n\n").to_string()
}
