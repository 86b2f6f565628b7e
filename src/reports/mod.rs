//! Report generation for diff results.
//!
//! This module provides the output formats of the command line tool:
//! - JSON: change documents for storage and programmatic integration
//! - Summary: compact shell-friendly counts
//! - Table: one line per change

mod json;
mod summary;
mod types;

pub use json::JsonReporter;
pub use summary::{SummaryReporter, TableReporter};
pub use types::{ReportConfig, ReportFormat};

use crate::codec::ChangeCodec;
use crate::diff::Diff;
use crate::error::GraphDeltaError;
use crate::metamodel::TypeMapper;
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Encoding error: {0}")]
    EncodingError(#[from] GraphDeltaError),

    #[error("Format error: {0}")]
    FormatError(#[from] std::fmt::Error),
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate a report from diff results
    fn generate_diff_report(
        &self,
        diff: &Diff,
        codec: &ChangeCodec<'_>,
        config: &ReportConfig,
    ) -> Result<String, ReportError>;

    /// Generate a report describing the metamodel (inspect mode)
    fn generate_metamodel_report(
        &self,
        mapper: &TypeMapper,
        config: &ReportConfig,
    ) -> Result<String, ReportError>;

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Create a report generator for the given format
#[must_use]
pub fn create_reporter(format: ReportFormat) -> Box<dyn ReportGenerator> {
    create_reporter_with_options(format, false)
}

/// Create a report generator with color control
#[must_use]
pub fn create_reporter_with_options(format: ReportFormat, colored: bool) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Json => Box::new(JsonReporter::new()),
        ReportFormat::Table => Box::new(TableReporter::new().colored(colored)),
        ReportFormat::Auto | ReportFormat::Summary => Box::new(SummaryReporter::new().colored(colored)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_reporter_formats() {
        assert_eq!(create_reporter(ReportFormat::Json).format(), ReportFormat::Json);
        assert_eq!(create_reporter(ReportFormat::Table).format(), ReportFormat::Table);
        assert_eq!(create_reporter(ReportFormat::Auto).format(), ReportFormat::Summary);
    }
}
