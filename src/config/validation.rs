//! Configuration validation for graph-delta.
//!
//! Provides validation traits and implementations for all configuration types.

use super::types::*;
use std::path::Path;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

fn require_file(errors: &mut Vec<ConfigError>, field: &str, path: &Path) {
    if !path.exists() {
        errors.push(ConfigError {
            field: field.to_string(),
            message: format!("File not found: {}", path.display()),
        });
    } else if path.is_dir() {
        errors.push(ConfigError {
            field: field.to_string(),
            message: format!("Expected a file, found a directory: {}", path.display()),
        });
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.engine.validate());
        errors.extend(self.output.validate());
        errors
    }
}

impl Validatable for EngineConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.parallel_threshold == 1 {
            errors.push(ConfigError {
                field: "engine.parallel_threshold".to_string(),
                message: "Must be 0 (disabled) or at least 2".to_string(),
            });
        }
        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(ref file) = self.file {
            if let Some(parent) = file.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    errors.push(ConfigError {
                        field: "output.file".to_string(),
                        message: format!("Parent directory does not exist: {}", parent.display()),
                    });
                }
            }
            if file.is_dir() {
                errors.push(ConfigError {
                    field: "output.file".to_string(),
                    message: format!("Output path is a directory: {}", file.display()),
                });
            }
        }
        errors
    }
}

impl Validatable for CommitConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.is_requested() {
            match self.author.as_deref() {
                None => errors.push(ConfigError {
                    field: "commit.author".to_string(),
                    message: "Required when commit metadata is requested".to_string(),
                }),
                Some(author) if author.trim().is_empty() => errors.push(ConfigError {
                    field: "commit.author".to_string(),
                    message: "Must not be empty".to_string(),
                }),
                Some(_) => {}
            }
        }
        if let Some(ref id) = self.commit_id {
            if let Err(message) = id.parse::<crate::changes::CommitId>() {
                errors.push(ConfigError {
                    field: "commit.commit_id".to_string(),
                    message,
                });
            }
        }
        errors
    }
}

impl Validatable for DiffConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        require_file(&mut errors, "paths.schema", &self.paths.schema);
        require_file(&mut errors, "paths.pairs", &self.paths.pairs);
        errors.extend(self.engine.validate());
        errors.extend(self.output.validate());
        errors.extend(self.commit.validate());
        errors
    }
}

impl Validatable for DecodeConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        require_file(&mut errors, "schema", &self.schema);
        require_file(&mut errors, "changes", &self.changes);
        errors.extend(self.output.validate());
        errors
    }
}

impl Validatable for InspectConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        require_file(&mut errors, "schema", &self.schema);
        errors.extend(self.output.validate());
        errors
    }
}

// ============================================================================
// Tests
// ============================================================================
