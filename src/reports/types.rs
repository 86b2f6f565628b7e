//! Report type definitions.

use crate::changes::CommitMetadata;
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Auto-detect: summary if TTY, JSON otherwise
    #[default]
    Auto,
    /// Brief summary output
    Summary,
    /// One line per change
    Table,
    /// Change documents as a JSON array
    Json,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Summary => write!(f, "summary"),
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Settings shared by all report generators
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Pretty-print JSON output
    pub pretty: bool,
    /// Commit metadata written into every change document
    pub commit_metadata: Option<CommitMetadata>,
    /// Colored terminal output
    pub colored: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            commit_metadata: None,
            colored: false,
        }
    }
}

impl ReportConfig {
    #[must_use]
    pub fn with_commit_metadata(mut self, metadata: Option<CommitMetadata>) -> Self {
        self.commit_metadata = metadata;
        self
    }
}
