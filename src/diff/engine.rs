//! Diff engine implementation.

use super::registry::AppenderRegistry;
use super::result::Diff;
use crate::changes::Change;
use crate::config::EngineConfig;
use crate::error::{ErrorContext, Result};
use crate::metamodel::{MetadataSource, NodePair};
use rayon::prelude::*;

/// Computes the changes between matched old/new node pairs.
///
/// The engine holds no per-run state, so one instance can diff any number
/// of batches, from any number of threads.
#[derive(Debug)]
pub struct DiffEngine {
    registry: AppenderRegistry,
    initial_changes: bool,
    parallel_threshold: usize,
}

impl DiffEngine {
    /// Create a new diff engine with the standard appenders and default settings
    pub fn new() -> Self {
        Self::from_config(&EngineConfig::default())
    }

    /// Create a diff engine from engine settings
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            registry: AppenderRegistry::standard(),
            initial_changes: config.initial_changes,
            parallel_threshold: config.parallel_threshold,
        }
    }

    /// Use a custom appender registry
    #[must_use]
    pub fn with_registry(mut self, registry: AppenderRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Also report property values of objects that were added or removed
    #[must_use]
    pub const fn with_initial_changes(mut self, enabled: bool) -> Self {
        self.initial_changes = enabled;
        self
    }

    /// Diff batches of at least this many pairs in parallel; 0 disables
    #[must_use]
    pub const fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    #[must_use]
    pub const fn registry(&self) -> &AppenderRegistry {
        &self.registry
    }

    /// Compute the changes of one node pair.
    ///
    /// Graph-membership changes come first, then property changes in
    /// declaration order. Any appender failure fails the whole pair.
    pub fn diff_pair(&self, pair: &NodePair, metadata: &dyn MetadataSource) -> Result<Vec<Change>> {
        let mut changes = Vec::new();
        match (pair.left(), pair.right()) {
            (None, None) => return Ok(changes),
            (None, Some(_)) => {
                changes.push(Change::new_object(pair.global_id().clone()));
                if !self.initial_changes {
                    return Ok(changes);
                }
            }
            (Some(_), None) => {
                changes.push(Change::object_removed(pair.global_id().clone()));
                if !self.initial_changes {
                    return Ok(changes);
                }
            }
            (Some(_), Some(_)) => {}
        }

        for property in pair.properties() {
            let appender = self.registry.dispatch(property, metadata)?;
            let property_changes = appender
                .calculate_changes(pair, property, metadata)
                .with_context(|| format!("diffing {}.{}", pair.global_id(), property.name()))?;
            changes.extend(property_changes);
        }

        tracing::debug!(
            global_id = %pair.global_id(),
            changes = changes.len(),
            "Diffed node pair"
        );
        Ok(changes)
    }

    /// Compute the changes of a batch of node pairs.
    ///
    /// Changes keep the order of the input pairs. The first failing pair
    /// fails the whole batch.
    pub fn diff(
        &self,
        pairs: impl IntoIterator<Item = NodePair>,
        metadata: &dyn MetadataSource,
    ) -> Result<Diff> {
        let pairs: Vec<NodePair> = pairs.into_iter().collect();
        let parallel = self.parallel_threshold > 0 && pairs.len() >= self.parallel_threshold;

        let per_pair: Vec<Vec<Change>> = if parallel {
            tracing::debug!(pairs = pairs.len(), "Diffing node pairs in parallel");
            pairs
                .par_iter()
                .map(|pair| self.diff_pair(pair, metadata))
                .collect::<Result<_>>()?
        } else {
            pairs
                .iter()
                .map(|pair| self.diff_pair(pair, metadata))
                .collect::<Result<_>>()?
        };

        let diff = Diff::new(per_pair.into_iter().flatten().collect(), pairs.len());
        tracing::info!(
            pairs = diff.summary.pairs_compared,
            changes = diff.summary.total_changes,
            objects = diff.summary.objects_changed,
            "Diff complete"
        );
        Ok(diff)
    }
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::new()
    }
}
