//! graph-delta: object-graph diff and change-document tool
//!
//! Compares matched snapshots of managed objects and emits typed change
//! documents.

#![allow(clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use graph_delta::{
    cli,
    config::{
        AppConfig, CommitConfig, ConfigPreset, DecodeConfig, DiffConfig, DiffPaths, InspectConfig,
    },
    pipeline::exit_codes,
    reports::ReportFormat,
};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "graph-delta")]
#[command(version)]
#[command(about = "Object-graph diff and change-document tool", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  No changes detected (or changes without --fail-on-change)
    1  Changes detected with --fail-on-change
    3  Error occurred

EXAMPLES:
    # Diff node pairs against a schema
    graph-delta diff --schema model.yaml pairs.json

    # Emit change documents with commit metadata
    graph-delta diff --schema model.yaml pairs.json -o json --author ops --commit-id 12.0

    # CI/CD check
    graph-delta diff --schema model.yaml pairs.json -o summary --fail-on-change

    # Validate stored change documents
    graph-delta decode --schema model.yaml changes.json")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Start from a named preset (default, ci-cd, audit)
    #[arg(long, global = true)]
    preset: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Arguments for the `diff` subcommand
#[derive(Parser)]
struct DiffArgs {
    /// YAML schema describing the managed classes
    #[arg(long, short = 's')]
    schema: PathBuf,

    /// JSON file with the node pairs to compare
    pairs: PathBuf,

    /// Output format (auto: summary on a terminal, json otherwise)
    #[arg(short, long, default_value = "auto")]
    output: ReportFormat,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Emit property changes for new and removed objects
    #[arg(long)]
    initial_changes: bool,

    /// Number of pairs from which diffing runs in parallel (0 disables)
    #[arg(long)]
    parallel_threshold: Option<usize>,

    /// Write compact JSON
    #[arg(long)]
    compact: bool,

    /// Exit with code 1 if any changes detected
    #[arg(long)]
    fail_on_change: bool,

    /// Commit author written into change documents
    #[arg(long, env = "GRAPH_DELTA_AUTHOR")]
    author: Option<String>,

    /// Commit id (`major.minor`) written into change documents
    #[arg(long)]
    commit_id: Option<String>,

    /// Extra commit property as key=value (repeatable)
    #[arg(long = "commit-property", value_parser = parse_key_val)]
    commit_properties: Vec<(String, String)>,
}

/// Arguments for the `decode` subcommand
#[derive(Parser)]
struct DecodeArgs {
    /// YAML schema describing the managed classes
    #[arg(long, short = 's')]
    schema: PathBuf,

    /// JSON file with one change document or an array of them
    changes: PathBuf,

    /// Output format (auto: summary on a terminal, json otherwise)
    #[arg(short, long, default_value = "auto")]
    output: ReportFormat,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Write compact JSON
    #[arg(long)]
    compact: bool,
}

/// Arguments for the `inspect` subcommand
#[derive(Parser)]
struct InspectArgs {
    /// YAML schema describing the managed classes
    #[arg(long, short = 's')]
    schema: PathBuf,

    /// Output format (auto: summary on a terminal, json otherwise)
    #[arg(short, long, default_value = "auto")]
    output: ReportFormat,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare matched node pairs and emit changes
    Diff(DiffArgs),

    /// Strictly decode stored change documents
    Decode(DecodeArgs),

    /// Show managed classes, properties and their categories
    Inspect(InspectArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .graph-delta.yaml in the current directory
    Init,
    /// Generate JSON Schema for the config file format
    Schema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the available presets
    Presets,
}

fn parse_key_val(text: &str) -> std::result::Result<(String, String), String> {
    text.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{text}'"))
}

/// Effective config: preset, then config file, then CLI overrides.
fn effective_config(cli: &Cli, overrides: &AppConfig) -> Result<AppConfig> {
    let mut config = match cli.preset.as_deref() {
        Some(name) => ConfigPreset::from_name(name)
            .map(AppConfig::from_preset)
            .with_context(|| format!("unknown preset '{name}'"))?,
        None => AppConfig::default(),
    };
    let (layer, loaded_from) = graph_delta::config::load_layer_or_default(cli.config.as_deref());
    if let Some(path) = loaded_from {
        tracing::debug!("Using config file {}", path.display());
        config
            .apply_layer(&layer)
            .with_context(|| format!("invalid config file {}", path.display()))?;
    }
    config.merge(overrides);
    Ok(config)
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    match run(cli) {
        Ok(code) if code != exit_codes::SUCCESS => std::process::exit(code),
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(exit_codes::ERROR);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    match &cli.command {
        Commands::Diff(args) => {
            let overrides = AppConfig::builder()
                .initial_changes(args.initial_changes)
                .pretty(!args.compact)
                .output_format(args.output)
                .output_file(args.output_file.clone())
                .no_color(cli.no_color)
                .fail_on_change(args.fail_on_change)
                .quiet(cli.quiet)
                .build();
            let mut app = effective_config(&cli, &overrides)?;
            if let Some(threshold) = args.parallel_threshold {
                app.engine.parallel_threshold = threshold;
            }

            let config = DiffConfig {
                paths: DiffPaths {
                    schema: args.schema.clone(),
                    pairs: args.pairs.clone(),
                },
                engine: app.engine,
                codec: app.codec,
                output: app.output,
                behavior: app.behavior,
                commit: CommitConfig {
                    author: args.author.clone(),
                    commit_id: args.commit_id.clone(),
                    properties: args.commit_properties.iter().cloned().collect::<BTreeMap<_, _>>(),
                },
            };
            cli::run_diff(config)
        }

        Commands::Decode(args) => {
            let overrides = AppConfig::builder()
                .pretty(!args.compact)
                .output_format(args.output)
                .output_file(args.output_file.clone())
                .no_color(cli.no_color)
                .quiet(cli.quiet)
                .build();
            let app = effective_config(&cli, &overrides)?;
            let config = DecodeConfig {
                schema: args.schema.clone(),
                changes: args.changes.clone(),
                codec: app.codec,
                output: app.output,
            };
            cli::run_decode(config, app.behavior.quiet)?;
            Ok(exit_codes::SUCCESS)
        }

        Commands::Inspect(args) => {
            let overrides = AppConfig::builder()
                .output_format(args.output)
                .output_file(args.output_file.clone())
                .no_color(cli.no_color)
                .quiet(cli.quiet)
                .build();
            let app = effective_config(&cli, &overrides)?;
            let config = InspectConfig {
                schema: args.schema.clone(),
                output: app.output,
            };
            cli::run_inspect(config, app.behavior.quiet)?;
            Ok(exit_codes::SUCCESS)
        }

        Commands::Completions { shell } => {
            generate(*shell, &mut Cli::command(), "graph-delta", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }

        Commands::Config { action } => {
            run_config(action, cli.config.as_deref())?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

fn run_config(action: &ConfigAction, explicit: Option<&Path>) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let (config, loaded_from) = graph_delta::config::load_or_default(explicit);
            if let Some(path) = &loaded_from {
                eprintln!("# Loaded from: {}", path.display());
            } else {
                eprintln!("# No config file found; showing defaults");
            }
            let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
            print!("{yaml}");
        }
        ConfigAction::Path => {
            let search_paths: [Option<String>; 3] = [
                std::env::current_dir().ok().map(|p| p.display().to_string()),
                dirs::config_dir().map(|p| p.join("graph-delta").display().to_string()),
                dirs::home_dir().map(|p| p.display().to_string()),
            ];
            eprintln!("Config file search paths (in order):");
            for path in search_paths.into_iter().flatten() {
                eprintln!("  {path}");
            }
            eprintln!();
            eprintln!("Recognized file names:");
            for name in &[
                ".graph-delta.yaml",
                ".graph-delta.yml",
                "graph-delta.yaml",
                "graph-delta.yml",
            ] {
                eprintln!("  {name}");
            }
            eprintln!();
            match graph_delta::config::discover_config_file(explicit) {
                Some(path) => eprintln!("Active config file: {}", path.display()),
                None => eprintln!("No config file found."),
            }
        }
        ConfigAction::Init => {
            let target = std::env::current_dir()
                .context("cannot determine current directory")?
                .join(".graph-delta.yaml");
            if target.exists() {
                anyhow::bail!(
                    "{} already exists. Remove it first to re-initialize.",
                    target.display()
                );
            }
            let content = graph_delta::config::generate_full_example_config();
            std::fs::write(&target, content)
                .with_context(|| format!("failed to write {}", target.display()))?;
            eprintln!("Created {}", target.display());
        }
        ConfigAction::Schema { output } => {
            let schema = graph_delta::config::generate_json_schema()?;
            match output {
                Some(path) => {
                    std::fs::write(path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => println!("{schema}"),
            }
        }
        ConfigAction::Presets => {
            for preset in ConfigPreset::all() {
                println!("{:<10} {}", preset.name(), preset.description());
            }
        }
    }
    Ok(())
}
