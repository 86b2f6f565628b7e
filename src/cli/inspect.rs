//! Inspect command handler.
//!
//! Implements the `inspect` subcommand: prints every managed class of a
//! schema with its properties and their categories.

use super::ensure_valid;
use crate::config::InspectConfig;
use crate::pipeline::{load_schema, output_metamodel};
use anyhow::Result;

/// Run the inspect command.
#[allow(clippy::needless_pass_by_value)]
pub fn run_inspect(config: InspectConfig, quiet: bool) -> Result<()> {
    ensure_valid(&config)?;
    let mapper = load_schema(&config.schema, quiet)?;
    output_metamodel(&mapper, &config.output, quiet)
}
