//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::AppConfig;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
const CONFIG_FILE_NAMES: &[&str] = &[
    ".graph-delta.yaml",
    ".graph-delta.yml",
    "graph-delta.yaml",
    "graph-delta.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/graph-delta/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    if let Some(path) = std::env::current_dir()
        .ok()
        .and_then(|cwd| find_config_in_dir(&cwd))
    {
        return Some(path);
    }

    if let Some(path) = find_git_root().and_then(|root| find_config_in_dir(&root)) {
        return Some(path);
    }

    if let Some(config_dir) = dirs::config_dir() {
        if let Some(path) = find_config_in_dir(&config_dir.join("graph-delta")) {
            return Some(path);
        }
    }

    dirs::home_dir().and_then(|home| find_config_in_dir(&home))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up the directory tree.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();

    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found
    NotFound(PathBuf),
    /// IO error reading file
    Io(std::io::Error),
    /// YAML parsing error
    Parse(serde_yaml::Error),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigFileError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(err)
    }
}

/// The settings a config file spells out, without defaults filled in.
///
/// Applying a layer overrides exactly the keys it names, so a file can
/// switch a boolean either way on top of a preset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigLayer {
    values: serde_yaml::Mapping,
}

impl ConfigLayer {
    /// Parse a layer from YAML text. Empty text is an empty layer.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        // Reject unknown values up front, not when the layer is applied.
        let _: AppConfig = serde_yaml::from_str(content)?;
        let values = match serde_yaml::from_str::<serde_yaml::Value>(content)? {
            serde_yaml::Value::Mapping(values) => values,
            _ => serde_yaml::Mapping::new(),
        };
        Ok(Self { values })
    }

    /// Whether the layer sets nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn merge_yaml(base: &mut serde_yaml::Value, layer: &serde_yaml::Value) {
    match (base, layer) {
        (serde_yaml::Value::Mapping(base), serde_yaml::Value::Mapping(layer)) => {
            for (key, value) in layer {
                match base.get_mut(key) {
                    Some(existing) => merge_yaml(existing, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, layer) => *base = layer.clone(),
    }
}

/// Load the layer a YAML config file describes.
pub fn load_config_layer(path: &Path) -> Result<ConfigLayer, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    Ok(ConfigLayer::from_yaml(&content)?)
}

/// Load an `AppConfig` from a YAML file, on top of the defaults.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    let layer = load_config_layer(path)?;
    let mut config = AppConfig::default();
    config.apply_layer(&layer)?;
    Ok(config)
}

/// Load the layer of the discovered config file, or an empty one.
#[must_use]
pub fn load_layer_or_default(explicit_path: Option<&Path>) -> (ConfigLayer, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (ConfigLayer::default(), None),
        |path| match load_config_layer(&path) {
            Ok(layer) => {
                tracing::debug!("Loaded config from {}", path.display());
                (layer, Some(path))
            }
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (ConfigLayer::default(), None)
            }
        },
    )
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    let (layer, loaded_from) = load_layer_or_default(explicit_path);
    let mut config = AppConfig::default();
    match config.apply_layer(&layer) {
        Ok(()) => (config, loaded_from),
        Err(e) => {
            tracing::warn!("Failed to apply config file: {e}");
            (AppConfig::default(), None)
        }
    }
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Override every setting the layer names, keeping the rest.
    pub fn apply_layer(&mut self, layer: &ConfigLayer) -> Result<(), serde_yaml::Error> {
        if layer.is_empty() {
            return Ok(());
        }
        let mut merged = serde_yaml::to_value(&*self)?;
        merge_yaml(&mut merged, &serde_yaml::Value::Mapping(layer.values.clone()));
        *self = serde_yaml::from_value(merged)?;
        Ok(())
    }

    /// Merge another config into this one, with `other` taking precedence.
    ///
    /// Only values that differ from the defaults override, so CLI args that
    /// were not given leave file settings intact.
    pub fn merge(&mut self, other: &Self) {
        let defaults = Self::default();

        // Engine config
        if other.engine.initial_changes {
            self.engine.initial_changes = true;
        }
        if other.engine.parallel_threshold != defaults.engine.parallel_threshold {
            self.engine.parallel_threshold = other.engine.parallel_threshold;
        }

        // Codec config (defaults are true, so overrides switch them off)
        if !other.codec.pretty {
            self.codec.pretty = false;
        }
        if !other.codec.embed_commit_metadata {
            self.codec.embed_commit_metadata = false;
        }

        // Output config - only override if explicitly set
        if other.output.format != defaults.output.format {
            self.output.format = other.output.format;
        }
        if other.output.file.is_some() {
            self.output.file.clone_from(&other.output.file);
        }
        if other.output.no_color {
            self.output.no_color = true;
        }

        // Behavior config
        if other.behavior.fail_on_change {
            self.behavior.fail_on_change = true;
        }
        if other.behavior.quiet {
            self.behavior.quiet = true;
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &Self,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file content.
#[must_use]
pub fn generate_example_config() -> String {
    let example = AppConfig::default();
    format!(
        r"# graph-delta configuration
# Place this file at .graph-delta.yaml in your project root or ~/.config/graph-delta/

{}",
        serde_yaml::to_string(&example).unwrap_or_default()
    )
}

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_full_example_config() -> String {
    r"# graph-delta configuration file
# ===============================
#
# Place it at:
#   - .graph-delta.yaml in your project root
#   - ~/.config/graph-delta/graph-delta.yaml for global config
#
# CLI arguments always override file settings.

# Diff engine
engine:
  # Emit property changes for new and removed objects
  initial_changes: false
  # Number of node pairs from which diffing runs in parallel (0 disables)
  parallel_threshold: 64

# Change documents
codec:
  # Pretty-print JSON output
  pretty: true
  # Write commit metadata into every change document
  embed_commit_metadata: true

# Output configuration
output:
  # Format: auto, summary, table, json
  format: auto
  # Output file path (omit for stdout)
  # file: changes.json
  # Disable colored output
  no_color: false

# Behavior flags
behavior:
  # Exit with code 1 if any changes detected
  fail_on_change: false
  # Suppress non-essential output
  quiet: false
"
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::ReportFormat;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_dir() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(".graph-delta.yaml");
        std::fs::write(&config_path, "engine:\n  initial_changes: true\n").unwrap();

        let found = find_config_in_dir(tmp.path());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_dir_not_found() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(find_config_in_dir(tmp.path()), None);
    }

    #[test]
    fn test_load_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");

        let yaml = r#"
engine:
  parallel_threshold: 8
output:
  format: json
behavior:
  fail_on_change: true
"#;
        std::fs::write(&config_path, yaml).unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.engine.parallel_threshold, 8);
        assert!(!config.engine.initial_changes);
        assert_eq!(config.output.format, ReportFormat::Json);
        assert!(config.behavior.fail_on_change);
        assert!(config.codec.pretty);
    }

    #[test]
    fn test_load_empty_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("empty.yaml");
        std::fs::write(&config_path, "\n").unwrap();
        assert_eq!(load_config_file(&config_path).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config_file(Path::new("/nonexistent/config.yaml"));
        assert!(matches!(result, Err(ConfigFileError::NotFound(_))));
    }

    #[test]
    fn test_load_config_file_parse_error() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("bad.yaml");
        std::fs::write(&config_path, "engine:\n  parallel_threshold: many\n").unwrap();
        assert!(matches!(
            load_config_file(&config_path),
            Err(ConfigFileError::Parse(_))
        ));
    }

    #[test]
    fn test_config_merge() {
        let mut base = AppConfig {
            engine: super::super::types::EngineConfig {
                initial_changes: false,
                parallel_threshold: 8,
            },
            ..AppConfig::default()
        };
        let overrides = AppConfig::builder()
            .initial_changes(true)
            .output_format(ReportFormat::Table)
            .quiet(true)
            .build();

        base.merge(&overrides);

        assert!(base.engine.initial_changes);
        assert_eq!(base.engine.parallel_threshold, 8);
        assert_eq!(base.output.format, ReportFormat::Table);
        assert!(base.behavior.quiet);
        assert!(!base.behavior.fail_on_change);
    }

    #[test]
    fn test_layer_switches_preset_booleans_off() {
        use crate::config::ConfigPreset;

        let layer = ConfigLayer::from_yaml("engine:\n  initial_changes: false\n").unwrap();
        let mut config = AppConfig::from_preset(ConfigPreset::Audit);
        assert!(config.engine.initial_changes);

        config.apply_layer(&layer).unwrap();
        assert!(!config.engine.initial_changes);
        assert_eq!(
            config.engine.parallel_threshold,
            AppConfig::from_preset(ConfigPreset::Audit).engine.parallel_threshold
        );
    }

    #[test]
    fn test_layer_switches_preset_booleans_on() {
        use crate::config::ConfigPreset;

        let preset = AppConfig::from_preset(ConfigPreset::CiCd);
        assert!(!preset.codec.pretty);

        let layer = ConfigLayer::from_yaml("codec:\n  pretty: true\n").unwrap();
        let mut config = preset.clone();
        config.apply_layer(&layer).unwrap();
        assert!(config.codec.pretty);
        assert_eq!(config.behavior, preset.behavior);
        assert_eq!(config.output.format, preset.output.format);
    }

    #[test]
    fn test_empty_layer_keeps_config() {
        let layer = ConfigLayer::from_yaml("  \n").unwrap();
        assert!(layer.is_empty());
        let mut config = AppConfig::builder().fail_on_change(true).build();
        let before = config.clone();
        config.apply_layer(&layer).unwrap();
        assert_eq!(config, before);
    }

    #[test]
    fn test_layer_rejects_invalid_values() {
        assert!(ConfigLayer::from_yaml("codec:\n  pretty: sometimes\n").is_err());
    }

    #[test]
    fn test_generated_configs_parse() {
        let example = generate_example_config();
        assert!(example.contains("engine:"));
        let parsed: AppConfig = serde_yaml::from_str(&example).unwrap();
        assert_eq!(parsed, AppConfig::default());

        let full: AppConfig = serde_yaml::from_str(&generate_full_example_config()).unwrap();
        assert_eq!(full, AppConfig::default());
    }

    #[test]
    fn test_discover_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("custom-config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "behavior:\n  quiet: true").unwrap();

        let discovered = discover_config_file(Some(&config_path));
        assert_eq!(discovered, Some(config_path));
    }
}
