//! Input processing module
//! Handles format detection, text extraction, and input management

pub mod file_detector;
pub mod job_description;
pub mod manager;
pub mod text_extractor;

pub use file_detector::DocumentFormat;
pub use manager::{Document, InputManager};
pub use text_extractor::{Extraction, ExtractionLocation, ExtractionWarning};
