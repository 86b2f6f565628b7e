//! Entry-wise appender for map properties.

use super::value_shape;
use crate::changes::{Change, EntryChange};
use crate::diff::traits::PropertyChangeAppender;
use crate::error::{GraphDeltaError, Result};
use crate::metamodel::{MetadataSource, NodePair, Property, TypeCategory, Value};
use std::collections::BTreeMap;

/// Compares map properties key by key and reports one `MapChanged` holding
/// every changed entry.
///
/// Entry values are compared by equality, so only maps whose values are
/// primitives, value objects or entity references are supported. Maps of
/// collections or nested maps fail with a not-implemented error.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapChangeAppender;

impl MapChangeAppender {
    fn check_value_type(&self, property: &Property, metadata: &dyn MetadataSource) -> Result<()> {
        let (_, value_type) = property
            .declared_type()
            .map_types()
            .ok_or_else(|| value_shape(property))?;
        match metadata.classify_type(value_type)? {
            TypeCategory::Collection | TypeCategory::Map => Err(GraphDeltaError::not_implemented(
                self.name(),
                property.name(),
                format!("entries of type '{value_type}' cannot be compared"),
            )),
            _ => Ok(()),
        }
    }
}

fn entries<'a>(value: &'a Value, property: &Property) -> Result<Option<&'a BTreeMap<String, Value>>> {
    value.as_entries().ok_or_else(|| value_shape(property))
}

impl PropertyChangeAppender for MapChangeAppender {
    fn supported_category(&self) -> TypeCategory {
        TypeCategory::Map
    }

    fn calculate_changes(
        &self,
        pair: &NodePair,
        property: &Property,
        metadata: &dyn MetadataSource,
    ) -> Result<Vec<Change>> {
        self.check_value_type(property, metadata)?;

        let empty = BTreeMap::new();
        let old = entries(pair.left_value(property), property)?.unwrap_or(&empty);
        let new = entries(pair.right_value(property), property)?.unwrap_or(&empty);

        let mut changed = Vec::new();
        for (key, left) in old {
            match new.get(key) {
                None => changed.push(EntryChange::Removed {
                    key: key.clone(),
                    value: left.clone(),
                }),
                Some(right) if right != left => changed.push(EntryChange::ValueChanged {
                    key: key.clone(),
                    left: left.clone(),
                    right: right.clone(),
                }),
                Some(_) => {}
            }
        }
        for (key, right) in new {
            if !old.contains_key(key) {
                changed.push(EntryChange::Added {
                    key: key.clone(),
                    value: right.clone(),
                });
            }
        }

        if changed.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![Change::map_changed(
            pair.global_id().clone(),
            property.name(),
            changed,
        )])
    }

    fn name(&self) -> &str {
        "MapChangeAppender"
    }
}
