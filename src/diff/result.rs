//! Diff result types.

use crate::changes::{Change, ChangeKind};
use crate::metamodel::GlobalId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Complete result of diffing a batch of node pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct Diff {
    /// Summary statistics
    pub summary: DiffSummary,
    /// Changes in pair order, grouped per property within each pair
    pub changes: Vec<Change>,
}

/// Counts of changes per variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub pairs_compared: usize,
    pub objects_changed: usize,
    pub total_changes: usize,
    pub objects_added: usize,
    pub objects_removed: usize,
    pub values_changed: usize,
    pub values_added: usize,
    pub values_removed: usize,
    pub references_changed: usize,
    pub maps_changed: usize,
}

impl Diff {
    /// Collect changes and derive their summary.
    pub fn new(changes: Vec<Change>, pairs_compared: usize) -> Self {
        let summary = DiffSummary::from_changes(&changes, pairs_compared);
        Self { summary, changes }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Changes owned by one node.
    pub fn changes_for<'a>(&'a self, global_id: &'a GlobalId) -> impl Iterator<Item = &'a Change> {
        self.changes.iter().filter(move |c| c.global_id() == global_id)
    }
}

impl DiffSummary {
    #[must_use]
    pub fn from_changes(changes: &[Change], pairs_compared: usize) -> Self {
        let mut summary = Self {
            pairs_compared,
            total_changes: changes.len(),
            ..Self::default()
        };
        let mut objects = HashSet::new();
        for change in changes {
            objects.insert(change.global_id());
            match change.kind() {
                ChangeKind::NewObject => summary.objects_added += 1,
                ChangeKind::ObjectRemoved => summary.objects_removed += 1,
                ChangeKind::ValueChanged { .. } => summary.values_changed += 1,
                ChangeKind::ValueAdded { .. } => summary.values_added += 1,
                ChangeKind::ValueRemoved { .. } => summary.values_removed += 1,
                ChangeKind::ReferenceChanged { .. } => summary.references_changed += 1,
                ChangeKind::MapChanged { .. } => summary.maps_changed += 1,
            }
        }
        summary.objects_changed = objects.len();
        summary
    }

    #[must_use]
    pub const fn has_changes(&self) -> bool {
        self.total_changes > 0
    }
}
