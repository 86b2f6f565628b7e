//! Diff computation stage.
//!
//! Builds the engine from the configured options and runs it over the
//! loaded node pairs.

use crate::config::DiffConfig;
use crate::diff::{Diff, DiffEngine};
use crate::metamodel::{MetadataSource, NodePair};
use anyhow::{Context, Result};

/// Run the diff over `pairs`.
pub fn compute_diff(
    config: &DiffConfig,
    pairs: Vec<NodePair>,
    metadata: &dyn MetadataSource,
) -> Result<Diff> {
    let quiet = config.behavior.quiet;

    if !quiet {
        tracing::info!("Comparing {} node pairs...", pairs.len());
        if config.engine.initial_changes {
            tracing::info!("Initial property changes enabled for new and removed objects");
        }
    }

    let engine = DiffEngine::from_config(&config.engine);
    let diff = engine.diff(pairs, metadata).context("Failed to compute diff")?;

    if !quiet {
        tracing::info!(
            "Diff complete: {} changes across {} objects",
            diff.summary.total_changes,
            diff.summary.objects_changed
        );
    }

    Ok(diff)
}
