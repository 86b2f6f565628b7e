//! Diff command handler.
//!
//! Implements the `diff` subcommand: compares matched node pairs and emits
//! the resulting changes.

use super::ensure_valid;
use crate::codec::ChangeCodec;
use crate::config::DiffConfig;
use crate::diff::Diff;
use crate::pipeline::{compute_diff, exit_codes, load_schema, output_report, read_pairs};
use anyhow::Result;
use chrono::Utc;

/// Run the diff command, returning the desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
#[allow(clippy::needless_pass_by_value)]
pub fn run_diff(config: DiffConfig) -> Result<i32> {
    ensure_valid(&config)?;
    let quiet = config.behavior.quiet;

    let commit = config.commit.to_metadata(Utc::now())?;
    let mapper = load_schema(&config.paths.schema, quiet)?;
    let pairs = read_pairs(&config.paths.pairs, &mapper, quiet)?;

    let diff = compute_diff(&config, pairs, &mapper)?;
    let exit_code = determine_exit_code(&config, &diff);

    let codec = ChangeCodec::new(&mapper);
    output_report(&diff, &codec, commit, &config.codec, &config.output, quiet)?;

    Ok(exit_code)
}

/// Determine the appropriate exit code based on diff results and config flags.
const fn determine_exit_code(config: &DiffConfig, diff: &Diff) -> i32 {
    if config.behavior.fail_on_change && diff.summary.has_changes() {
        return exit_codes::CHANGES_DETECTED;
    }
    exit_codes::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::Change;
    use crate::config::{
        BehaviorConfig, CodecConfig, CommitConfig, DiffPaths, EngineConfig, OutputConfig,
    };
    use crate::metamodel::GlobalId;
    use std::path::PathBuf;

    fn config(fail_on_change: bool) -> DiffConfig {
        DiffConfig {
            paths: DiffPaths {
                schema: PathBuf::from("schema.yaml"),
                pairs: PathBuf::from("pairs.json"),
            },
            engine: EngineConfig::default(),
            codec: CodecConfig::default(),
            output: OutputConfig::default(),
            behavior: BehaviorConfig {
                fail_on_change,
                quiet: true,
            },
            commit: CommitConfig::default(),
        }
    }

    #[test]
    fn test_exit_code() {
        let changed = Diff::new(vec![Change::new_object(GlobalId::instance("Person", "1"))], 1);
        let unchanged = Diff::new(Vec::new(), 1);

        assert_eq!(determine_exit_code(&config(true), &changed), exit_codes::CHANGES_DETECTED);
        assert_eq!(determine_exit_code(&config(true), &unchanged), exit_codes::SUCCESS);
        assert_eq!(determine_exit_code(&config(false), &changed), exit_codes::SUCCESS);
    }

    #[test]
    fn test_missing_inputs_fail_validation() {
        let err = run_diff(config(false)).expect_err("missing files");
        assert!(err.to_string().contains("paths.schema"));
    }
}
