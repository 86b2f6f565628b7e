//! Snapshot nodes and matched node pairs.

use super::{GlobalId, ManagedClass, Property, Value, value::NULL};
use crate::error::{DiffErrorKind, GraphDeltaError, Result};
use indexmap::IndexMap;

/// One object as captured in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectNode {
    global_id: GlobalId,
    values: IndexMap<String, Value>,
}

impl ObjectNode {
    pub fn new(global_id: GlobalId) -> Self {
        Self {
            global_id,
            values: IndexMap::new(),
        }
    }

    /// Set a property value; `Null` removes it.
    #[must_use]
    pub fn with_value(mut self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(property, value);
        self
    }

    /// Set a property value; `Null` removes it.
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<Value>) {
        let property = property.into();
        let value = value.into();
        if value.is_null() {
            self.values.shift_remove(&property);
        } else {
            self.values.insert(property, value);
        }
    }

    #[must_use]
    pub const fn global_id(&self) -> &GlobalId {
        &self.global_id
    }

    /// Value of a property, `Null` when absent.
    #[must_use]
    pub fn get(&self, property: &str) -> &Value {
        self.values.get(property).unwrap_or(&NULL)
    }

    /// Present property values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Matched old/new versions of the same logical object.
///
/// Either side may be missing: an object that only exists in the new
/// snapshot was added, one that only exists in the old snapshot was removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePair {
    global_id: GlobalId,
    class_name: String,
    left: Option<ObjectNode>,
    right: Option<ObjectNode>,
    properties: Vec<Property>,
}

impl NodePair {
    /// Pair two snapshot sides of an object of class `class`.
    ///
    /// Both present sides must carry `global_id`, the id must belong to
    /// `class`, and every stored value must name a property of `class`.
    pub fn new(
        class: &ManagedClass,
        global_id: GlobalId,
        left: Option<ObjectNode>,
        right: Option<ObjectNode>,
    ) -> Result<Self> {
        if global_id.type_name() != class.name() {
            return Err(mismatch(format!(
                "{global_id} does not belong to class '{}'",
                class.name()
            )));
        }
        for node in left.iter().chain(right.iter()) {
            if node.global_id() != &global_id {
                return Err(mismatch(format!(
                    "node {} paired under {global_id}",
                    node.global_id()
                )));
            }
            if let Some((name, _)) = node.values().find(|(name, _)| class.property(name).is_none()) {
                return Err(mismatch(format!(
                    "{global_id} carries unknown property '{name}' for class '{}'",
                    class.name()
                )));
            }
        }
        Ok(Self {
            global_id,
            class_name: class.name().to_string(),
            left,
            right,
            properties: class.properties().to_vec(),
        })
    }

    /// Pair two sides, taking the id from whichever side is present.
    pub fn matched(
        class: &ManagedClass,
        left: Option<ObjectNode>,
        right: Option<ObjectNode>,
    ) -> Result<Self> {
        let global_id = left
            .as_ref()
            .or(right.as_ref())
            .map(|node| node.global_id().clone())
            .ok_or_else(|| mismatch("a node pair needs at least one side to derive its id".to_string()))?;
        Self::new(class, global_id, left, right)
    }

    #[must_use]
    pub const fn global_id(&self) -> &GlobalId {
        &self.global_id
    }

    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    #[must_use]
    pub const fn left(&self) -> Option<&ObjectNode> {
        self.left.as_ref()
    }

    #[must_use]
    pub const fn right(&self) -> Option<&ObjectNode> {
        self.right.as_ref()
    }

    /// Properties to compare, in declaration order.
    #[must_use]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Old value of a property, `Null` when the side or the value is absent.
    #[must_use]
    pub fn left_value(&self, property: &Property) -> &Value {
        self.left.as_ref().map_or(&NULL, |node| node.get(property.name()))
    }

    /// New value of a property, `Null` when the side or the value is absent.
    #[must_use]
    pub fn right_value(&self, property: &Property) -> &Value {
        self.right.as_ref().map_or(&NULL, |node| node.get(property.name()))
    }
}

fn mismatch(message: String) -> GraphDeltaError {
    GraphDeltaError::diff("building node pair", DiffErrorKind::PairMismatch(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metamodel::{DeclaredType, EntityDefinition, MetadataSource, TypeMapper};

    fn mapper() -> TypeMapper {
        TypeMapper::new([EntityDefinition::new("Person")
            .with_property("id", DeclaredType::Int)
            .with_property("name", DeclaredType::String)
            .into()])
        .expect("valid")
    }

    #[test]
    fn test_absent_values_read_as_null() {
        let mapper = mapper();
        let person = mapper.managed_class("Person").expect("Person");
        let id = GlobalId::instance("Person", "1");
        let pair = NodePair::new(
            person,
            id.clone(),
            None,
            Some(ObjectNode::new(id).with_value("name", "Ada")),
        )
        .expect("valid pair");

        let name = person.property("name").expect("name");
        assert!(pair.left_value(name).is_null());
        assert_eq!(pair.right_value(name), &Value::from("Ada"));
    }

    #[test]
    fn test_rejects_foreign_nodes() {
        let mapper = mapper();
        let person = mapper.managed_class("Person").expect("Person");
        let id = GlobalId::instance("Person", "1");
        let other = ObjectNode::new(GlobalId::instance("Person", "2"));
        assert!(NodePair::new(person, id.clone(), Some(other), None).is_err());

        let unknown = ObjectNode::new(id.clone()).with_value("salary", 10_i64);
        assert!(NodePair::new(person, id.clone(), Some(unknown), None).is_err());

        let wrong_class = GlobalId::instance("Company", "1");
        assert!(NodePair::new(person, wrong_class, None, None).is_err());
    }

    #[test]
    fn test_matched_derives_id() {
        let mapper = mapper();
        let person = mapper.managed_class("Person").expect("Person");
        let node = ObjectNode::new(GlobalId::instance("Person", "9"));
        let pair = NodePair::matched(person, Some(node), None).expect("valid pair");
        assert_eq!(pair.global_id().to_string(), "Person/9");
        assert!(NodePair::matched(person, None, None).is_err());
    }

    #[test]
    fn test_setting_null_removes_value() {
        let mut node = ObjectNode::new(GlobalId::instance("Person", "1")).with_value("name", "Ada");
        node.set("name", Value::Null);
        assert_eq!(node.values().count(), 0);
    }
}
