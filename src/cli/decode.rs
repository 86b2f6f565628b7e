//! Decode command handler.
//!
//! Implements the `decode` subcommand: strictly decodes stored change
//! documents against a schema and reports what they contain.

use super::ensure_valid;
use crate::codec::ChangeCodec;
use crate::config::DecodeConfig;
use crate::diff::Diff;
use crate::pipeline::{load_schema, output_report, read_changes};
use anyhow::Result;

/// Run the decode command.
///
/// Any document that does not match the schema fails the whole command.
/// JSON output re-encodes the decoded changes in canonical form, keeping
/// the commit metadata they carry unless embedding is switched off.
#[allow(clippy::needless_pass_by_value)]
pub fn run_decode(config: DecodeConfig, quiet: bool) -> Result<()> {
    ensure_valid(&config)?;

    let mapper = load_schema(&config.schema, quiet)?;
    let codec = ChangeCodec::new(&mapper);
    let changes = read_changes(&config.changes, &codec, quiet)?;

    let diff = Diff::new(changes, 0);
    output_report(&diff, &codec, None, &config.codec, &config.output, quiet)
}
