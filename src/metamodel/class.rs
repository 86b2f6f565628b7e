//! Resolved managed classes.

use super::Property;
use serde::Serialize;

/// Whether a managed class has identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ClassKind {
    Entity {
        #[serde(rename = "idProperty")]
        id_property: String,
        #[serde(rename = "customId")]
        custom_id: bool,
    },
    ValueObject,
}

/// A class after its definition has been resolved and its properties classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManagedClass {
    name: String,
    #[serde(flatten)]
    kind: ClassKind,
    properties: Vec<Property>,
}

impl ManagedClass {
    pub(crate) const fn new(name: String, kind: ClassKind, properties: Vec<Property>) -> Self {
        Self {
            name,
            kind,
            properties,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> &ClassKind {
        &self.kind
    }

    #[must_use]
    pub const fn is_entity(&self) -> bool {
        matches!(self.kind, ClassKind::Entity { .. })
    }

    /// Properties in declaration order.
    #[must_use]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name() == name)
    }

    /// The id property of an entity.
    #[must_use]
    pub fn id_property(&self) -> Option<&Property> {
        match &self.kind {
            ClassKind::Entity { id_property, .. } => self.property(id_property),
            ClassKind::ValueObject => None,
        }
    }
}
