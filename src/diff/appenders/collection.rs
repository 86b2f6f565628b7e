//! Multiset appender for list and set properties.

use super::value_shape;
use crate::changes::Change;
use crate::diff::traits::PropertyChangeAppender;
use crate::error::Result;
use crate::metamodel::{MetadataSource, NodePair, Property, TypeCategory, Value};
use indexmap::IndexMap;

/// Compares collections as multisets of values.
///
/// For every distinct element, surplus occurrences in the old collection are
/// reported as `ValueRemoved` and surplus occurrences in the new collection
/// as `ValueAdded`. Element order is ignored. Removals come first, in the
/// order elements first appear in the old collection, followed by additions
/// in the order they first appear in the new one.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionChangeAppender;

/// Occurrence count of each distinct element, keyed in first-seen order.
fn occurrences(items: &[Value]) -> IndexMap<&Value, usize> {
    let mut counts = IndexMap::with_capacity(items.len());
    for item in items {
        *counts.entry(item).or_insert(0) += 1;
    }
    counts
}

impl PropertyChangeAppender for CollectionChangeAppender {
    fn supported_category(&self) -> TypeCategory {
        TypeCategory::Collection
    }

    fn calculate_changes(
        &self,
        pair: &NodePair,
        property: &Property,
        _metadata: &dyn MetadataSource,
    ) -> Result<Vec<Change>> {
        let old_items = pair
            .left_value(property)
            .as_items()
            .ok_or_else(|| value_shape(property))?;
        let new_items = pair
            .right_value(property)
            .as_items()
            .ok_or_else(|| value_shape(property))?;
        if old_items == new_items {
            return Ok(Vec::new());
        }

        let old_counts = occurrences(old_items);
        let new_counts = occurrences(new_items);
        let global_id = pair.global_id();
        let mut changes = Vec::new();

        for (&item, &count) in &old_counts {
            let surplus = count.saturating_sub(new_counts.get(item).copied().unwrap_or(0));
            changes.extend((0..surplus).map(|_| {
                Change::value_removed(global_id.clone(), property.name(), item.clone())
            }));
        }
        for (&item, &count) in &new_counts {
            let surplus = count.saturating_sub(old_counts.get(item).copied().unwrap_or(0));
            changes.extend((0..surplus).map(|_| {
                Change::value_added(global_id.clone(), property.name(), item.clone())
            }));
        }

        Ok(changes)
    }

    fn name(&self) -> &str {
        "CollectionChangeAppender"
    }
}
