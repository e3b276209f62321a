//! Text extraction from PDF and DOCX documents
//!
//! Extraction never fails outright. Anything that goes wrong is logged and
//! recorded as an [`ExtractionWarning`]; the worst case is empty text, which
//! the analyzer turns into an `EmptyDocument` error.

use crate::input::file_detector::DocumentFormat;
use log::{debug, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{Cursor, Read};
use std::panic::{self, AssertUnwindSafe};

pub trait TextExtractor {
    fn format(&self) -> DocumentFormat;
    fn extract(&self, bytes: &[u8]) -> Extraction;
}

/// Raw text of a document plus every soft failure hit while producing it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub text: String,
    pub warnings: Vec<ExtractionWarning>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionWarning {
    pub location: ExtractionLocation,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "index")]
pub enum ExtractionLocation {
    Document,
    Page(u32),
    Paragraph(usize),
}

impl Extraction {
    pub fn failed(warning: ExtractionWarning) -> Self {
        Self {
            text: String::new(),
            warnings: vec![warning],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }
}

impl ExtractionWarning {
    pub fn new(location: ExtractionLocation, reason: impl Into<String>) -> Self {
        let warning = Self {
            location,
            reason: reason.into(),
        };
        warn!("Extraction warning: {}", warning);
        warning
    }
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            ExtractionLocation::Document => write!(f, "document: {}", self.reason),
            ExtractionLocation::Page(page) => write!(f, "page {}: {}", page, self.reason),
            ExtractionLocation::Paragraph(index) => write!(f, "paragraph {}: {}", index, self.reason),
        }
    }
}

/// PDF text in page order.
///
/// Every page is walked with lopdf so a page that cannot be decoded is
/// reported by number. The text itself comes from pdf-extract when it can
/// read the whole document, and from the per-page walk otherwise.
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Pdf
    }

    fn extract(&self, bytes: &[u8]) -> Extraction {
        let mut warnings = Vec::new();
        let page_text = lopdf::Document::load_mem(bytes).map(|document| self.extract_pages(&document, &mut warnings));

        // pdf-extract is known to panic on some malformed files
        let reason = match panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
            Ok(Ok(text)) => return Extraction { text, warnings },
            Ok(Err(e)) => format!("Failed to extract text from PDF: {}", e),
            Err(_) => "PDF text extraction panicked".to_string(),
        };
        warnings.insert(0, ExtractionWarning::new(ExtractionLocation::Document, reason));

        match page_text {
            Ok(text) => Extraction { text, warnings },
            Err(e) => {
                warnings.push(ExtractionWarning::new(
                    ExtractionLocation::Document,
                    format!("Failed to parse PDF: {}", e),
                ));
                Extraction {
                    text: String::new(),
                    warnings,
                }
            }
        }
    }
}

impl PdfExtractor {
    fn extract_pages(&self, document: &lopdf::Document, warnings: &mut Vec<ExtractionWarning>) -> String {
        let pages = document.get_pages();
        debug!("Walking {} PDF pages", pages.len());

        let mut text = String::new();
        for (page_number, page_id) in pages {
            let content = match page_content(document, page_id) {
                Ok(content) => content,
                Err(reason) => {
                    warnings.push(ExtractionWarning::new(ExtractionLocation::Page(page_number), reason));
                    continue;
                }
            };

            let result = panic::catch_unwind(AssertUnwindSafe(|| document.extract_text(&[page_number])));
            match result {
                Ok(Ok(page_text)) => {
                    if page_text.trim().is_empty() && draws_text(&content) {
                        warnings.push(ExtractionWarning::new(
                            ExtractionLocation::Page(page_number),
                            "page draws text but none could be decoded",
                        ));
                    }
                    text.push_str(&page_text);
                    if !text.is_empty() && !text.ends_with('\n') {
                        text.push('\n');
                    }
                }
                Ok(Err(e)) => warnings.push(ExtractionWarning::new(
                    ExtractionLocation::Page(page_number),
                    e.to_string(),
                )),
                Err(_) => warnings.push(ExtractionWarning::new(
                    ExtractionLocation::Page(page_number),
                    "page extraction panicked",
                )),
            }
        }

        text
    }
}

/// Decoded content streams of one page, concatenated.
///
/// lopdf hands back an empty buffer for a compressed stream it cannot
/// inflate, so a non-empty stream that decodes to nothing counts as a failure.
fn page_content(document: &lopdf::Document, page_id: lopdf::ObjectId) -> std::result::Result<Vec<u8>, String> {
    let mut content = Vec::new();

    for stream_id in document.get_page_contents(page_id) {
        let stream = document
            .get_object(stream_id)
            .and_then(lopdf::Object::as_stream)
            .map_err(|e| format!("Content stream {} {} unreadable: {}", stream_id.0, stream_id.1, e))?;

        if stream.dict.get(b"Filter").is_err() {
            content.extend_from_slice(&stream.content);
        } else {
            match stream.decompressed_content() {
                Ok(decoded) if decoded.is_empty() && !stream.content.is_empty() => {
                    return Err(format!(
                        "Content stream {} {} could not be decoded",
                        stream_id.0, stream_id.1
                    ))
                }
                Ok(decoded) => content.extend(decoded),
                Err(e) => {
                    return Err(format!(
                        "Content stream {} {} could not be decoded: {}",
                        stream_id.0, stream_id.1, e
                    ))
                }
            }
        }
        content.push(b'\n');
    }

    Ok(content)
}

/// True when a content stream contains a text-showing operator
fn draws_text(content: &[u8]) -> bool {
    content.windows(2).any(|op| op == b"Tj" || op == b"TJ")
}

pub struct DocxExtractor {
    paragraph_regex: Regex,
    run_regex: Regex,
    fallback_regex: Regex,
    text_box_regex: Regex,
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for DocxExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Docx
    }

    fn extract(&self, bytes: &[u8]) -> Extraction {
        let xml = match Self::read_document_xml(bytes) {
            Ok(xml) => xml,
            Err(reason) => {
                return Extraction::failed(ExtractionWarning::new(ExtractionLocation::Document, reason))
            }
        };

        let xml = self.flatten_text_boxes(&xml);

        let mut text = String::new();
        let mut warnings = Vec::new();

        for (index, captures) in self.paragraph_regex.captures_iter(&xml).enumerate() {
            let body = captures.get(1).map(|m| m.as_str()).unwrap_or("");
            match self.paragraph_text(body) {
                Ok(paragraph) => {
                    text.push_str(&paragraph);
                    text.push('\n');
                }
                Err(reason) => {
                    warnings.push(ExtractionWarning::new(ExtractionLocation::Paragraph(index), reason))
                }
            }
        }

        Extraction { text, warnings }
    }
}

impl DocxExtractor {
    pub fn new() -> Self {
        // Self-closing <w:p/> elements are empty paragraphs
        let paragraph_regex = Regex::new(r"(?s)<w:p(?:\s[^>]*?)?(?:/>|>(.*?)</w:p>)")
            .expect("Invalid paragraph regex");

        let run_regex = Regex::new(
            r"(?s)<w:t(?:\s[^>]*?)?(?:/>|>(.*?)</w:t>)|<w:tab\s*/>|<w:(?:br|cr)(?:\s[^>]*?)?/>",
        )
        .expect("Invalid run regex");

        let fallback_regex = Regex::new(r"(?s)<mc:Fallback\b.*?</mc:Fallback>")
            .expect("Invalid fallback regex");
        let text_box_regex = Regex::new(r"(?s)<w:txbxContent\b[^>]*>(.*?)</w:txbxContent>")
            .expect("Invalid text box regex");

        Self {
            paragraph_regex,
            run_regex,
            fallback_regex,
            text_box_regex,
        }
    }

    /// Text boxes hold paragraphs nested inside a paragraph. Close the outer
    /// paragraph around each box so its inner paragraphs come out in reading
    /// order, and drop `mc:Fallback` copies that repeat the same box.
    fn flatten_text_boxes(&self, xml: &str) -> String {
        let without_fallbacks = self.fallback_regex.replace_all(xml, "");
        self.text_box_regex
            .replace_all(&without_fallbacks, "</w:p>${1}<w:p>")
            .into_owned()
    }

    fn read_document_xml(bytes: &[u8]) -> std::result::Result<String, String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| format!("Not a DOCX container: {}", e))?;

        let mut entry = archive
            .by_name("word/document.xml")
            .map_err(|e| format!("Missing word/document.xml: {}", e))?;

        let mut xml = String::new();
        entry
            .read_to_string(&mut xml)
            .map_err(|e| format!("Failed to read word/document.xml: {}", e))?;

        Ok(xml)
    }

    fn paragraph_text(&self, body: &str) -> std::result::Result<String, String> {
        let mut paragraph = String::new();

        for run in self.run_regex.captures_iter(body) {
            let matched = run.get(0).map(|m| m.as_str()).unwrap_or("");
            if let Some(content) = run.get(1) {
                paragraph.push_str(&unescape_xml(content.as_str())?);
            } else if matched.starts_with("<w:tab") {
                paragraph.push('\t');
            } else if matched.starts_with("<w:br") || matched.starts_with("<w:cr") {
                paragraph.push('\n');
            }
        }

        Ok(paragraph)
    }
}

/// Decode the five predefined XML entities and numeric character references
fn unescape_xml(text: &str) -> std::result::Result<String, String> {
    let mut output = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('&') {
        output.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after
            .find(';')
            .ok_or_else(|| format!("Unterminated entity near '{}'", truncate(&rest[start..], 16)))?;
        let entity = &after[..end];

        let decoded = match entity {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            _ => decode_char_reference(entity).ok_or_else(|| format!("Unknown entity '&{};'", entity))?,
        };
        output.push(decoded);
        rest = &after[end + 1..];
    }

    output.push_str(rest);
    Ok(output)
}

fn decode_char_reference(entity: &str) -> Option<char> {
    let code = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        entity.strip_prefix('#')?.parse::<u32>().ok()?
    };
    char::from_u32(code)
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;

    fn build_docx(document_xml: &str) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            writer
                .start_file("word/document.xml", FileOptions::default())
                .unwrap();
            writer.write_all(document_xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        buffer.into_inner()
    }

    fn wrap_body(paragraphs: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}<w:sectPr/></w:body></w:document>"#,
            paragraphs
        )
    }

    #[test]
    fn test_docx_paragraphs_in_order() {
        let xml = wrap_body(
            r#"<w:p><w:pPr><w:pStyle w:val="Title"/></w:pPr><w:r><w:t>Jane Roe</w:t></w:r></w:p><w:p w:rsidR="00A1"><w:r><w:t xml:space="preserve">Python </w:t></w:r><w:r><w:t>&amp; Rust</w:t></w:r></w:p><w:p/><w:p><w:r><w:t>A</w:t><w:tab/><w:t>B</w:t></w:r></w:p>"#,
        );
        let extraction = DocxExtractor::new().extract(&build_docx(&xml));

        assert!(!extraction.is_degraded());
        assert_eq!(extraction.text, "Jane Roe\nPython & Rust\n\nA\tB\n");
    }

    #[test]
    fn test_docx_bad_paragraph_is_skipped() {
        let xml = wrap_body(r#"<w:p><w:r><w:t>Good</w:t></w:r></w:p><w:p><w:r><w:t>Bad &bogus; text</w:t></w:r></w:p><w:p><w:r><w:t>Also good</w:t></w:r></w:p>"#);
        let extraction = DocxExtractor::new().extract(&build_docx(&xml));

        assert_eq!(extraction.text, "Good\nAlso good\n");
        assert_eq!(extraction.warnings.len(), 1);
        assert_eq!(extraction.warnings[0].location, ExtractionLocation::Paragraph(1));
    }

    #[test]
    fn test_docx_text_box_in_reading_order() {
        let xml = wrap_body(concat!(
            r#"<w:p><w:r><w:t>Before</w:t></w:r><w:r><mc:AlternateContent><mc:Choice Requires="wps">"#,
            r#"<w:drawing><wps:txbx><w:txbxContent><w:p><w:r><w:t>Boxed</w:t></w:r></w:p></w:txbxContent></wps:txbx></w:drawing>"#,
            r#"</mc:Choice><mc:Fallback><w:pict><v:textbox><w:txbxContent><w:p><w:r><w:t>Boxed</w:t></w:r></w:p></w:txbxContent></v:textbox></w:pict></mc:Fallback>"#,
            r#"</mc:AlternateContent></w:r><w:r><w:t>After</w:t></w:r></w:p><w:p><w:r><w:t>Next</w:t></w:r></w:p>"#,
        ));
        let extraction = DocxExtractor::new().extract(&build_docx(&xml));

        assert!(!extraction.is_degraded());
        assert_eq!(extraction.text, "Before\nBoxed\nAfter\nNext\n");
    }

    #[test]
    fn test_docx_not_a_zip() {
        let extraction = DocxExtractor::new().extract(b"definitely not a zip archive");

        assert!(extraction.is_empty());
        assert_eq!(extraction.warnings[0].location, ExtractionLocation::Document);
    }

    #[test]
    fn test_pdf_garbage_degrades_to_empty() {
        let extraction = PdfExtractor.extract(b"%PDF-1.4 this is not really a pdf");

        assert!(extraction.is_empty());
        assert!(extraction.is_degraded());
    }

    /// One page per entry; `None` is a page whose compressed content stream
    /// is not valid zlib
    fn build_pdf(pages: &[Option<&str>]) -> Vec<u8> {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Object, Stream};

        let mut doc = lopdf::Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });

        let mut kids: Vec<Object> = Vec::new();
        for page in pages {
            let stream = match page {
                Some(line) => {
                    let content = Content {
                        operations: vec![
                            Operation::new("BT", vec![]),
                            Operation::new("Tf", vec!["F1".into(), 12.into()]),
                            Operation::new("Td", vec![72.into(), 720.into()]),
                            Operation::new("Tj", vec![Object::string_literal(*line)]),
                            Operation::new("ET", vec![]),
                        ],
                    };
                    Stream::new(dictionary! {}, content.encode().unwrap())
                }
                None => Stream::new(
                    dictionary! { "Filter" => "FlateDecode" },
                    b"garbage that is not a zlib stream".to_vec(),
                ),
            };
            let content_id = doc.add_object(stream);
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
            });
            kids.push(page_id.into());
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Count" => pages.len() as i64,
                "Kids" => kids,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_pdf_bad_page_is_reported() {
        let pdf = build_pdf(&[Some("Python developer page one"), None, Some("Rust page three")]);
        let extraction = PdfExtractor.extract(&pdf);

        assert!(extraction.text.contains("page one"));
        assert!(extraction.text.contains("page three"));

        let pages: Vec<ExtractionLocation> = extraction
            .warnings
            .iter()
            .map(|w| w.location)
            .filter(|location| matches!(location, ExtractionLocation::Page(_)))
            .collect();
        assert_eq!(pages, vec![ExtractionLocation::Page(2)]);
    }

    #[test]
    fn test_pdf_clean_pages_have_no_warnings() {
        let pdf = build_pdf(&[Some("Python developer"), Some("Rust and Go")]);
        let extraction = PdfExtractor.extract(&pdf);

        assert!(extraction.text.contains("Python developer"));
        assert!(extraction.text.contains("Rust and Go"));
        assert!(!extraction.is_degraded());
    }

    #[test]
    fn test_unescape_numeric_references() {
        assert_eq!(unescape_xml("caf&#233; &#x41;&lt;").unwrap(), "café A<");
        assert!(unescape_xml("broken &amp").is_err());
    }
}
