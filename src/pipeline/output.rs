//! Output handling for reports.
//!
//! Provides utilities for auto-detecting output format and writing reports.

use crate::reports::ReportFormat;
use anyhow::{Context, Result};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Target for output - either stdout or a file
#[derive(Debug, Clone)]
pub enum OutputTarget {
    /// Write to stdout
    Stdout,
    /// Write to a file
    File(PathBuf),
}

impl OutputTarget {
    /// Create output target from optional path
    #[must_use]
    pub fn from_option(path: Option<PathBuf>) -> Self {
        match path {
            Some(p) => Self::File(p),
            None => Self::Stdout,
        }
    }

    /// Check if output is to a terminal
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stdout) && std::io::stdout().is_terminal()
    }
}

/// Auto-detect the output format based on TTY and output target
///
/// Returns Summary for interactive terminals (stdout to TTY),
/// otherwise JSON change documents.
#[must_use]
pub fn auto_detect_format(format: ReportFormat, target: &OutputTarget) -> ReportFormat {
    match format {
        ReportFormat::Auto => {
            if target.is_terminal() {
                ReportFormat::Summary
            } else {
                ReportFormat::Json
            }
        }
        other => other,
    }
}

/// Determine if color should be used based on flags and environment
#[must_use]
pub fn should_use_color(no_color_flag: bool) -> bool {
    !no_color_flag && std::env::var("NO_COLOR").is_err()
}

/// Write output to the target (stdout or file)
pub fn write_output(content: &str, target: &OutputTarget, quiet: bool) -> Result<()> {
    match target {
        OutputTarget::Stdout => {
            println!("{content}");
            Ok(())
        }
        OutputTarget::File(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            if !quiet {
                tracing::info!("Report written to {}", path.display());
            }
            Ok(())
        }
    }
}
