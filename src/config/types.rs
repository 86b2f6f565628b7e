//! Configuration types for graph-delta operations.
//!
//! Provides structured configuration for the diff, decode and inspect commands.

use super::defaults::DEFAULT_PARALLEL_THRESHOLD;
use crate::changes::{CommitId, CommitMetadata};
use crate::error::{GraphDeltaError, Result};
use crate::reports::ReportFormat;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// Aggregates every option of the tool. CLI arguments are layered over
/// values loaded from a config file with [`AppConfig::merge`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Diff engine settings
    pub engine: EngineConfig,
    /// Change document encoding settings
    pub codec: CodecConfig,
    /// Output configuration (format, file, colors)
    pub output: OutputConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Emit property changes for one-sided pairs.
    pub const fn initial_changes(mut self, enabled: bool) -> Self {
        self.config.engine.initial_changes = enabled;
        self
    }

    /// Set the pair count at which diffing switches to parallel.
    pub const fn parallel_threshold(mut self, threshold: usize) -> Self {
        self.config.engine.parallel_threshold = threshold;
        self
    }

    /// Pretty-print encoded change documents.
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.config.codec.pretty = pretty;
        self
    }

    /// Set the output format.
    pub const fn output_format(mut self, format: ReportFormat) -> Self {
        self.config.output.format = format;
        self
    }

    /// Set the output file.
    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    /// Disable colored output.
    pub const fn no_color(mut self, no_color: bool) -> Self {
        self.config.output.no_color = no_color;
        self
    }

    /// Enable fail-on-change mode.
    pub const fn fail_on_change(mut self, fail: bool) -> Self {
        self.config.behavior.fail_on_change = fail;
        self
    }

    /// Enable quiet mode.
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Command-specific Configuration Types
// ============================================================================

/// Configuration for diff operations
#[derive(Debug, Clone)]
pub struct DiffConfig {
    /// Input files
    pub paths: DiffPaths,
    /// Diff engine settings
    pub engine: EngineConfig,
    /// Encoding settings
    pub codec: CodecConfig,
    /// Output configuration
    pub output: OutputConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
    /// Commit metadata to attach to the emitted documents
    pub commit: CommitConfig,
}

/// Paths for diff operation
#[derive(Debug, Clone)]
pub struct DiffPaths {
    /// YAML schema describing the managed classes
    pub schema: PathBuf,
    /// JSON file with the node pairs to compare
    pub pairs: PathBuf,
}

/// Configuration for decode operations
#[derive(Debug, Clone)]
pub struct DecodeConfig {
    /// YAML schema describing the managed classes
    pub schema: PathBuf,
    /// JSON file with one change document or an array of them
    pub changes: PathBuf,
    /// Encoding settings used when re-emitting the decoded changes
    pub codec: CodecConfig,
    /// Output configuration
    pub output: OutputConfig,
}

/// Configuration for inspect operations
#[derive(Debug, Clone)]
pub struct InspectConfig {
    /// YAML schema describing the managed classes
    pub schema: PathBuf,
    /// Output configuration
    pub output: OutputConfig,
}

// ============================================================================
// Sub-configuration Types
// ============================================================================

/// Diff engine settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EngineConfig {
    /// Emit property changes for new and removed objects (absent side is all null)
    pub initial_changes: bool,
    /// Number of pairs from which diffing runs in parallel (0 disables)
    pub parallel_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_changes: false,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

/// Change document encoding settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CodecConfig {
    /// Pretty-print JSON documents
    pub pretty: bool,
    /// Write commit metadata into every change document
    pub embed_commit_metadata: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            embed_commit_metadata: true,
        }
    }
}

/// Output-related configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: ReportFormat,
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Disable colored output
    pub no_color: bool,
}

/// Behavior flags for diff operations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Exit with code 1 if any changes detected
    pub fail_on_change: bool,
    /// Suppress non-essential output
    pub quiet: bool,
}

/// Commit metadata requested on the command line
#[derive(Debug, Clone, Default)]
pub struct CommitConfig {
    /// Commit author
    pub author: Option<String>,
    /// Commit id as `major.minor`
    pub commit_id: Option<String>,
    /// Free-form commit properties
    pub properties: BTreeMap<String, String>,
}

impl CommitConfig {
    /// Whether any commit option was given.
    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.author.is_some() || self.commit_id.is_some() || !self.properties.is_empty()
    }

    /// Build commit metadata dated `commit_date`.
    ///
    /// Returns `None` when no commit option was given. The commit id
    /// defaults to `1.0`.
    pub fn to_metadata(&self, commit_date: DateTime<Utc>) -> Result<Option<CommitMetadata>> {
        if !self.is_requested() {
            return Ok(None);
        }
        let author = self
            .author
            .as_deref()
            .ok_or_else(|| GraphDeltaError::config("commit metadata requires an author"))?;
        let id = match &self.commit_id {
            Some(text) => text.parse::<CommitId>().map_err(GraphDeltaError::config)?,
            None => CommitId::new(1, 0),
        };
        let metadata = self
            .properties
            .iter()
            .fold(CommitMetadata::new(author, commit_date, id), |metadata, (key, value)| {
                metadata.with_property(key.as_str(), value.as_str())
            });
        Ok(Some(metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().expect("valid date")
    }

    #[test]
    fn test_builder() {
        let config = AppConfig::builder()
            .initial_changes(true)
            .parallel_threshold(0)
            .output_format(ReportFormat::Json)
            .fail_on_change(true)
            .build();
        assert!(config.engine.initial_changes);
        assert_eq!(config.engine.parallel_threshold, 0);
        assert_eq!(config.output.format, ReportFormat::Json);
        assert!(config.behavior.fail_on_change);
        assert!(config.codec.pretty);
    }

    #[test]
    fn test_commit_metadata_from_options() {
        let commit = CommitConfig {
            author: Some("ops".to_string()),
            commit_id: Some("7.2".to_string()),
            properties: BTreeMap::from([("ticket".to_string(), "GD-1".to_string())]),
        };
        let metadata = commit.to_metadata(date()).expect("valid").expect("requested");
        assert_eq!(metadata.author, "ops");
        assert_eq!(metadata.id, CommitId::new(7, 2));
        assert_eq!(metadata.properties["ticket"], "GD-1");
    }

    #[test]
    fn test_commit_metadata_not_requested() {
        assert_eq!(CommitConfig::default().to_metadata(date()).expect("valid"), None);
    }

    #[test]
    fn test_commit_metadata_requires_author() {
        let commit = CommitConfig {
            commit_id: Some("1.0".to_string()),
            ..CommitConfig::default()
        };
        assert!(commit.to_metadata(date()).is_err());
    }

    #[test]
    fn test_commit_metadata_rejects_bad_id() {
        let commit = CommitConfig {
            author: Some("ops".to_string()),
            commit_id: Some("one".to_string()),
            ..CommitConfig::default()
        };
        assert!(commit.to_metadata(date()).is_err());
    }
}
