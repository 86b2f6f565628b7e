//! Pipeline orchestration for graph-delta commands.
//!
//! This module provides the shared load → diff → report workflow used by the
//! CLI command handlers.

mod diff_stage;
mod input;
mod output;
mod report_stage;

pub use diff_stage::compute_diff;
pub use input::{load_schema, read_changes, read_pairs};
pub use output::{auto_detect_format, should_use_color, write_output, OutputTarget};
pub use report_stage::{output_metamodel, output_report};

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success - no changes detected (or changes without --fail-on-change)
    pub const SUCCESS: i32 = 0;
    /// Changes were detected with --fail-on-change
    pub const CHANGES_DETECTED: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_values() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::CHANGES_DETECTED, 1);
        assert_eq!(exit_codes::ERROR, 3);
    }
}
