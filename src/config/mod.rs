//! Configuration module for graph-delta.
//!
//! This module provides a unified configuration system with:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - Named presets for common use cases
//! - YAML config file loading and discovery
//! - Layered file settings that override a preset key by key
//! - CLI argument merging
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use graph_delta::config::{AppConfig, ConfigPreset};
//!
//! // Use defaults
//! let config = AppConfig::default();
//!
//! // Use a preset
//! let config = AppConfig::from_preset(ConfigPreset::CiCd);
//!
//! // Use builder
//! let config = AppConfig::builder()
//!     .initial_changes(true)
//!     .fail_on_change(true)
//!     .build();
//!
//! // Load from file
//! use graph_delta::config::file::load_or_default;
//! let (config, loaded_from) = load_or_default(None);
//! ```
//!
//! # Configuration File
//!
//! Place a `.graph-delta.yaml` file in your project root or `~/.config/graph-delta/`:
//!
//! ```yaml
//! engine:
//!   initial_changes: true
//! behavior:
//!   fail_on_change: true
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{ConfigPreset, DEFAULT_PARALLEL_THRESHOLD};
pub use types::{
    AppConfig, AppConfigBuilder, BehaviorConfig, CodecConfig, CommitConfig, DecodeConfig,
    DiffConfig, DiffPaths, EngineConfig, InspectConfig, OutputConfig,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, generate_full_example_config, load_config_file,
    load_config_layer, load_layer_or_default, load_or_default, ConfigFileError, ConfigLayer,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// Documents every option that can be set in `.graph-delta.yaml` files,
/// for editor validation and autocompletion.
pub fn generate_json_schema() -> crate::error::Result<String> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
        .map_err(|e| crate::error::GraphDeltaError::config(format!("schema serialization: {e}")))
}
