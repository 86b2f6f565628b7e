//! Identity-based appender for entity references.

use super::value_shape;
use crate::changes::Change;
use crate::diff::traits::PropertyChangeAppender;
use crate::error::Result;
use crate::metamodel::{MetadataSource, NodePair, Property, TypeCategory};

/// Reports a `ReferenceChanged` when a property points at another entity.
///
/// Only the referenced ids are compared; the referenced entities themselves
/// are diffed as their own node pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceChangeAppender;

impl PropertyChangeAppender for ReferenceChangeAppender {
    fn supported_category(&self) -> TypeCategory {
        TypeCategory::EntityReference
    }

    fn calculate_changes(
        &self,
        pair: &NodePair,
        property: &Property,
        _metadata: &dyn MetadataSource,
    ) -> Result<Vec<Change>> {
        let left = pair
            .left_value(property)
            .as_reference()
            .ok_or_else(|| value_shape(property))?;
        let right = pair
            .right_value(property)
            .as_reference()
            .ok_or_else(|| value_shape(property))?;
        if left == right {
            return Ok(Vec::new());
        }
        Ok(vec![Change::reference_changed(
            pair.global_id().clone(),
            property.name(),
            left.cloned(),
            right.cloned(),
        )])
    }

    fn name(&self) -> &str {
        "ReferenceChangeAppender"
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{mapper, pair, person, property};
    use super::*;
    use crate::changes::ChangeKind;
    use crate::metamodel::{GlobalId, Value};

    #[test]
    fn test_reference_reassigned() {
        let mapper = mapper();
        let boss = property(&mapper, "boss");
        let pair = pair(
            &mapper,
            person(&[]),
            person(&[("boss", Value::Reference(GlobalId::instance("Person", "2")))]),
        );
        let changes = ReferenceChangeAppender
            .calculate_changes(&pair, &boss, &mapper)
            .expect("comparable");
        assert_eq!(
            changes[0].kind(),
            &ChangeKind::ReferenceChanged {
                property: "boss".to_string(),
                left: None,
                right: Some(GlobalId::instance("Person", "2")),
            }
        );
    }

    #[test]
    fn test_same_reference() {
        let mapper = mapper();
        let boss = property(&mapper, "boss");
        let id = Value::Reference(GlobalId::instance("Person", "2"));
        let pair = pair(&mapper, person(&[("boss", id.clone())]), person(&[("boss", id)]));
        assert!(ReferenceChangeAppender
            .calculate_changes(&pair, &boss, &mapper)
            .expect("comparable")
            .is_empty());
    }
}
