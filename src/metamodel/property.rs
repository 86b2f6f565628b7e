//! Properties of managed classes.

use super::{DeclaredType, TypeCategory};
use serde::Serialize;

/// A named attribute of a managed class.
///
/// Carries the declared generic type (needed to decode payloads) and the
/// category the classifier assigned to it. Properties are only created by
/// [`TypeMapper`](super::TypeMapper) and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Property {
    name: String,
    #[serde(rename = "type")]
    declared_type: DeclaredType,
    category: TypeCategory,
}

impl Property {
    pub(crate) fn new(
        name: impl Into<String>,
        declared_type: DeclaredType,
        category: TypeCategory,
    ) -> Self {
        Self {
            name: name.into(),
            declared_type,
            category,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn declared_type(&self) -> &DeclaredType {
        &self.declared_type
    }

    /// Category assigned when the metamodel was built.
    #[must_use]
    pub const fn category(&self) -> TypeCategory {
        self.category
    }
}
