//! Input manager for reading résumé documents and routing them to an extractor

use crate::error::{Result, ResumeMatcherError};
use crate::input::file_detector::DocumentFormat;
use crate::input::text_extractor::{
    DocxExtractor, Extraction, ExtractionLocation, ExtractionWarning, PdfExtractor, TextExtractor,
};
use log::info;
use std::path::Path;

/// Binary payload plus its declared format
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub bytes: Vec<u8>,
    pub format: DocumentFormat,
}

impl Document {
    pub fn new(bytes: Vec<u8>, format: DocumentFormat) -> Self {
        Self { bytes, format }
    }
}

pub struct InputManager {
    pdf: PdfExtractor,
    docx: DocxExtractor,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            pdf: PdfExtractor,
            docx: DocxExtractor::new(),
        }
    }

    /// Extract text from a file, using `extension` (not the file name) to
    /// choose the extractor.
    ///
    /// Only an unsupported extension is an error. A file that cannot be read
    /// degrades to an empty [`Extraction`] carrying a warning.
    pub fn extract_file(&self, path: &Path, extension: &str) -> Result<Extraction> {
        let format = DocumentFormat::from_extension(extension)?;

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                return Ok(Extraction::failed(ExtractionWarning::new(
                    ExtractionLocation::Document,
                    format!("Failed to read '{}': {}", path.display(), e),
                )))
            }
        };

        Ok(self.extract_document(&Document::new(bytes, format)))
    }

    pub fn extract_document(&self, document: &Document) -> Extraction {
        let extractor = self.extractor_for(document.format);
        info!(
            "Extracting text from {} document ({} bytes)",
            extractor.format(),
            document.bytes.len()
        );
        extractor.extract(&document.bytes)
    }

    /// Reject files the calling layer should never hand to the pipeline
    pub fn check_size(path: &Path, max_bytes: u64) -> Result<()> {
        let size = std::fs::metadata(path)?.len();
        if size > max_bytes {
            return Err(ResumeMatcherError::InvalidInput(format!(
                "File too large: {} bytes (maximum {} bytes)",
                size, max_bytes
            )));
        }
        Ok(())
    }

    fn extractor_for(&self, format: DocumentFormat) -> &dyn TextExtractor {
        match format {
            DocumentFormat::Pdf => &self.pdf,
            DocumentFormat::Docx => &self.docx,
        }
    }
}
