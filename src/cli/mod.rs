//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the business logic for a specific CLI subcommand.

mod decode;
mod diff;
mod inspect;

pub use decode::run_decode;
pub use diff::run_diff;
pub use inspect::run_inspect;

// Re-export config types used by handlers
pub use crate::config::{DecodeConfig, DiffConfig, InspectConfig};

use crate::config::Validatable;

/// Fail with every validation error of a command config.
fn ensure_valid(config: &dyn Validatable) -> anyhow::Result<()> {
    let errors = config.validate();
    if errors.is_empty() {
        return Ok(());
    }
    let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
    anyhow::bail!("Invalid configuration:\n  {}", details.join("\n  "))
}
