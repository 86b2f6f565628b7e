//! User-facing descriptions of how domain classes map into the metamodel.

use super::DeclaredType;
use crate::error::{GraphDeltaError, MetamodelErrorKind, Result};
use serde::{Deserialize, Serialize};

/// One property as declared by the user, before classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDeclaration {
    pub name: String,
    #[serde(rename = "type")]
    pub declared_type: DeclaredType,
    /// Marks the id property of an entity when no custom id is named
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub id: bool,
}

impl PropertyDeclaration {
    pub fn new(name: impl Into<String>, declared_type: DeclaredType) -> Self {
        Self {
            name: name.into(),
            declared_type,
            id: false,
        }
    }
}

/// Entity: a class with identity.
///
/// The id property is either detected from the declarations (a property
/// flagged `id`, otherwise one literally named `id`) or named explicitly with
/// [`EntityDefinition::with_custom_id`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDefinition {
    name: String,
    id_property_name: Option<String>,
    properties: Vec<PropertyDeclaration>,
}

impl EntityDefinition {
    /// Entity whose id property is detected from its declarations.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id_property_name: None,
            properties: Vec::new(),
        }
    }

    /// Entity whose id property is selected explicitly by name.
    pub fn with_custom_id(name: impl Into<String>, id_property_name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let id_property_name = id_property_name.into();
        if id_property_name.trim().is_empty() {
            return Err(GraphDeltaError::metamodel(
                "creating entity definition",
                MetamodelErrorKind::EmptyIdProperty { class: name },
            ));
        }
        Ok(Self {
            name,
            id_property_name: Some(id_property_name),
            properties: Vec::new(),
        })
    }

    /// Append a property declaration.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, declared_type: DeclaredType) -> Self {
        self.properties.push(PropertyDeclaration::new(name, declared_type));
        self
    }

    /// Append a property declaration flagged as the id.
    #[must_use]
    pub fn with_id_property(mut self, name: impl Into<String>, declared_type: DeclaredType) -> Self {
        let mut declaration = PropertyDeclaration::new(name, declared_type);
        declaration.id = true;
        self.properties.push(declaration);
        self
    }

    /// Append a prepared declaration.
    #[must_use]
    pub fn with_declaration(mut self, declaration: PropertyDeclaration) -> Self {
        self.properties.push(declaration);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the id property was named explicitly.
    #[must_use]
    pub const fn has_custom_id(&self) -> bool {
        self.id_property_name.is_some()
    }

    /// The explicitly named id property, if any.
    #[must_use]
    pub fn id_property_name(&self) -> Option<&str> {
        self.id_property_name.as_deref()
    }

    #[must_use]
    pub fn properties(&self) -> &[PropertyDeclaration] {
        &self.properties
    }
}

/// Value object: no identity, compared by full structural equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueObjectDefinition {
    name: String,
    properties: Vec<PropertyDeclaration>,
}

impl ValueObjectDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// Append a property declaration.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, declared_type: DeclaredType) -> Self {
        self.properties.push(PropertyDeclaration::new(name, declared_type));
        self
    }

    /// Append a prepared declaration.
    #[must_use]
    pub fn with_declaration(mut self, declaration: PropertyDeclaration) -> Self {
        self.properties.push(declaration);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn properties(&self) -> &[PropertyDeclaration] {
        &self.properties
    }
}

/// How a domain class maps into the metamodel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagedClassDefinition {
    Entity(EntityDefinition),
    ValueObject(ValueObjectDefinition),
}

impl ManagedClassDefinition {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Entity(def) => def.name(),
            Self::ValueObject(def) => def.name(),
        }
    }

    #[must_use]
    pub fn properties(&self) -> &[PropertyDeclaration] {
        match self {
            Self::Entity(def) => def.properties(),
            Self::ValueObject(def) => def.properties(),
        }
    }

    #[must_use]
    pub const fn is_entity(&self) -> bool {
        matches!(self, Self::Entity(_))
    }
}

impl From<EntityDefinition> for ManagedClassDefinition {
    fn from(value: EntityDefinition) -> Self {
        Self::Entity(value)
    }
}

impl From<ValueObjectDefinition> for ManagedClassDefinition {
    fn from(value: ValueObjectDefinition) -> Self {
        Self::ValueObject(value)
    }
}
