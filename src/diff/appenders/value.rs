//! Equality-based appender for primitives and value objects.

use super::value_shape;
use crate::changes::Change;
use crate::diff::traits::PropertyChangeAppender;
use crate::error::Result;
use crate::metamodel::{MetadataSource, NodePair, Property, TypeCategory, Value};

/// Reports a `ValueChanged` when the old and new value differ.
///
/// Primitives compare by value, value objects by full structural equality.
/// An absent value is treated as null.
#[derive(Debug, Clone, Copy)]
pub struct ValueChangeAppender {
    category: TypeCategory,
}

impl ValueChangeAppender {
    /// Appender for scalar properties.
    #[must_use]
    pub const fn for_primitives() -> Self {
        Self {
            category: TypeCategory::Primitive,
        }
    }

    /// Appender for value-object properties.
    #[must_use]
    pub const fn for_value_objects() -> Self {
        Self {
            category: TypeCategory::Value,
        }
    }

    fn fits(&self, value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::Object(_) => self.category == TypeCategory::Value,
            Value::Reference(_) | Value::List(_) | Value::Map(_) => false,
            _ => self.category == TypeCategory::Primitive,
        }
    }
}

impl PropertyChangeAppender for ValueChangeAppender {
    fn supported_category(&self) -> TypeCategory {
        self.category
    }

    fn calculate_changes(
        &self,
        pair: &NodePair,
        property: &Property,
        _metadata: &dyn MetadataSource,
    ) -> Result<Vec<Change>> {
        let left = pair.left_value(property);
        let right = pair.right_value(property);
        if !self.fits(left) || !self.fits(right) {
            return Err(value_shape(property));
        }
        if left == right {
            return Ok(Vec::new());
        }
        Ok(vec![Change::value_changed(
            pair.global_id().clone(),
            property.name(),
            left.clone(),
            right.clone(),
        )])
    }

    fn name(&self) -> &str {
        match self.category {
            TypeCategory::Value => "ValueObjectChangeAppender",
            _ => "PrimitiveChangeAppender",
        }
    }
}
