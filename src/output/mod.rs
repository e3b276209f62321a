//! Output module
//! Report structures, formatters and persistence records

pub mod formatter;
pub mod records;
pub mod report;

pub use formatter::{OutputFormatter, ReportGenerator};
pub use records::PersistenceBundle;
pub use report::AnalysisReport;
