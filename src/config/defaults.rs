//! Default configurations and presets for graph-delta.
//!
//! Provides named presets for common use cases and default values.

use super::types::{AppConfig, BehaviorConfig, CodecConfig, EngineConfig, OutputConfig};
use crate::reports::ReportFormat;

// ============================================================================
// Configuration Presets
// ============================================================================

/// Named configuration presets for common use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// Default settings for interactive use
    Default,
    /// CI/CD: compact machine-readable output, fail on changes
    CiCd,
    /// Audit: full property history for created and removed objects
    Audit,
}

impl ConfigPreset {
    /// Get the preset name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::CiCd => "ci-cd",
            Self::Audit => "audit",
        }
    }

    /// Parse a preset from a string name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::Default),
            "ci-cd" | "ci" | "cd" | "pipeline" => Some(Self::CiCd),
            "audit" | "history" => Some(Self::Audit),
            _ => None,
        }
    }

    /// Get a description of this preset.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Default => "Summary output on terminals, JSON change documents otherwise",
            Self::CiCd => "Compact JSON output that fails the build when objects changed",
            Self::Audit => "Property-level changes for created and removed objects as well",
        }
    }

    /// Get all available presets.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Default, Self::CiCd, Self::Audit]
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Preset Implementations
// ============================================================================

impl AppConfig {
    /// Create an `AppConfig` from a named preset.
    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        match preset {
            ConfigPreset::Default => Self::default(),
            ConfigPreset::CiCd => Self::ci_cd_preset(),
            ConfigPreset::Audit => Self::audit_preset(),
        }
    }

    /// CI/CD preset.
    ///
    /// - Compact JSON documents
    /// - Fail on any change
    /// - No colors, quiet
    #[must_use]
    pub fn ci_cd_preset() -> Self {
        Self {
            engine: EngineConfig::default(),
            codec: CodecConfig {
                pretty: false,
                embed_commit_metadata: true,
            },
            output: OutputConfig {
                format: ReportFormat::Json,
                file: None,
                no_color: true,
            },
            behavior: BehaviorConfig {
                fail_on_change: true,
                quiet: true,
            },
        }
    }

    /// Audit preset.
    ///
    /// Records the initial and final state of created and removed objects
    /// property by property.
    #[must_use]
    pub fn audit_preset() -> Self {
        Self {
            engine: EngineConfig {
                initial_changes: true,
                ..EngineConfig::default()
            },
            output: OutputConfig {
                format: ReportFormat::Json,
                ..OutputConfig::default()
            },
            ..Self::default()
        }
    }
}

// ============================================================================
// Default Values
// ============================================================================

/// Default number of node pairs from which diffing runs on the rayon pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_names() {
        assert_eq!(ConfigPreset::Default.name(), "default");
        assert_eq!(ConfigPreset::CiCd.name(), "ci-cd");
        assert_eq!(ConfigPreset::Audit.to_string(), "audit");
    }

    #[test]
    fn test_preset_from_name() {
        assert_eq!(ConfigPreset::from_name("default"), Some(ConfigPreset::Default));
        assert_eq!(ConfigPreset::from_name("CI"), Some(ConfigPreset::CiCd));
        assert_eq!(ConfigPreset::from_name("pipeline"), Some(ConfigPreset::CiCd));
        assert_eq!(ConfigPreset::from_name("history"), Some(ConfigPreset::Audit));
        assert_eq!(ConfigPreset::from_name("invalid"), None);
    }

    #[test]
    fn test_ci_cd_preset() {
        let config = AppConfig::ci_cd_preset();
        assert!(config.behavior.fail_on_change);
        assert!(config.behavior.quiet);
        assert!(config.output.no_color);
        assert!(!config.codec.pretty);
        assert_eq!(config.output.format, ReportFormat::Json);
    }

    #[test]
    fn test_audit_preset() {
        let config = AppConfig::audit_preset();
        assert!(config.engine.initial_changes);
        assert_eq!(config.engine.parallel_threshold, DEFAULT_PARALLEL_THRESHOLD);
        assert!(!config.behavior.fail_on_change);
    }

    #[test]
    fn test_from_preset() {
        assert_eq!(AppConfig::from_preset(ConfigPreset::Default), AppConfig::default());
        assert_eq!(AppConfig::from_preset(ConfigPreset::CiCd), AppConfig::ci_cd_preset());
    }

    #[test]
    fn test_all_presets() {
        assert_eq!(ConfigPreset::all().len(), 3);
        for preset in ConfigPreset::all() {
            assert_eq!(ConfigPreset::from_name(preset.name()), Some(*preset));
        }
    }
}
