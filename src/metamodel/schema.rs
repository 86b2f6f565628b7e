//! Loading class definitions from YAML schema files.
//!
//! ```yaml
//! classes:
//!   - name: Person
//!     kind: entity
//!     id: login
//!     properties:
//!       - { name: login, type: string }
//!       - { name: tags, type: "list<string>" }
//!   - name: Address
//!     kind: value
//!     properties:
//!       - { name: city, type: string }
//! ```

use super::{
    EntityDefinition, ManagedClassDefinition, PropertyDeclaration, TypeMapper,
    ValueObjectDefinition,
};
use crate::error::{ErrorContext, GraphDeltaError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level schema document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaFile {
    #[serde(default)]
    pub classes: Vec<ClassSchema>,
}

/// Kind of class in a schema file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SchemaKind {
    Entity,
    #[serde(alias = "valueObject")]
    Value,
}

/// One class entry of a schema file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSchema {
    pub name: String,
    pub kind: SchemaKind,
    /// Explicit id property of an entity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub properties: Vec<PropertyDeclaration>,
}

impl ClassSchema {
    /// Convert into a definition, enforcing definition invariants.
    pub fn into_definition(self) -> Result<ManagedClassDefinition> {
        match self.kind {
            SchemaKind::Entity => {
                let entity = match self.id {
                    Some(id) => EntityDefinition::with_custom_id(self.name, id)?,
                    None => EntityDefinition::new(self.name),
                };
                Ok(self
                    .properties
                    .into_iter()
                    .fold(entity, EntityDefinition::with_declaration)
                    .into())
            }
            SchemaKind::Value => {
                if self.id.is_some() {
                    return Err(GraphDeltaError::validation(format!(
                        "value object '{}' cannot name an id property",
                        self.name
                    )));
                }
                Ok(self
                    .properties
                    .into_iter()
                    .fold(ValueObjectDefinition::new(self.name), ValueObjectDefinition::with_declaration)
                    .into())
            }
        }
    }
}

impl TypeMapper {
    /// Build a metamodel from a parsed schema.
    pub fn from_schema(schema: SchemaFile) -> Result<Self> {
        let definitions = schema
            .classes
            .into_iter()
            .map(ClassSchema::into_definition)
            .collect::<Result<Vec<_>>>()?;
        Self::new(definitions)
    }

    /// Build a metamodel from YAML schema text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let schema: SchemaFile = serde_yaml::from_str(yaml)?;
        Self::from_schema(schema)
    }

    /// Build a metamodel from a YAML schema file.
    pub fn from_schema_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| GraphDeltaError::io(path, e))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("loading schema {}", path.display()))
    }
}
