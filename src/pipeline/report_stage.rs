//! Report output stage.
//!
//! Handles generating and writing reports to the configured destination.

use crate::changes::{Change, CommitMetadata};
use crate::codec::ChangeCodec;
use crate::config::{CodecConfig, OutputConfig};
use crate::diff::Diff;
use crate::metamodel::TypeMapper;
use crate::reports::{create_reporter_with_options, ReportConfig};
use anyhow::Result;

use super::{auto_detect_format, should_use_color, write_output, OutputTarget};

fn report_config(codec: &CodecConfig, output: &OutputConfig) -> ReportConfig {
    ReportConfig {
        pretty: codec.pretty,
        colored: should_use_color(output.no_color),
        ..ReportConfig::default()
    }
}

/// Output a diff report to the configured destination.
///
/// Commit metadata is only written into change documents when the codec
/// config embeds it. With embedding off, metadata carried by the changes
/// themselves is dropped as well.
pub fn output_report(
    diff: &Diff,
    codec: &ChangeCodec<'_>,
    commit: Option<CommitMetadata>,
    codec_config: &CodecConfig,
    output: &OutputConfig,
    quiet: bool,
) -> Result<()> {
    let target = OutputTarget::from_option(output.file.clone());
    let format = auto_detect_format(output.format, &target);

    let mut config = report_config(codec_config, output);
    let stripped;
    let diff = if codec_config.embed_commit_metadata {
        config = config.with_commit_metadata(commit);
        diff
    } else {
        stripped = Diff::new(
            diff.changes
                .iter()
                .cloned()
                .map(Change::without_commit_metadata)
                .collect(),
            diff.summary.pairs_compared,
        );
        &stripped
    };

    let reporter = create_reporter_with_options(format, config.colored && target.is_terminal());
    let report = reporter.generate_diff_report(diff, codec, &config)?;

    write_output(&report, &target, quiet)
}

/// Output a metamodel description to the configured destination.
pub fn output_metamodel(mapper: &TypeMapper, output: &OutputConfig, quiet: bool) -> Result<()> {
    let target = OutputTarget::from_option(output.file.clone());
    let format = auto_detect_format(output.format, &target);

    let config = report_config(&CodecConfig::default(), output);
    let reporter = create_reporter_with_options(format, config.colored && target.is_terminal());
    let report = reporter.generate_metamodel_report(mapper, &config)?;

    write_output(&report, &target, quiet)
}
