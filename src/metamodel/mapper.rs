//! Type classification and the metadata collaborator.

use super::{
    ClassKind, DeclaredType, ManagedClass, ManagedClassDefinition, Property, PropertyDeclaration,
    TypeCategory,
};
use crate::error::{ErrorContext, GraphDeltaError, MetamodelErrorKind, Result};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Read-only source of class metadata.
///
/// The diff engine and the change codec only ever see metadata through this
/// trait. Implementations must be deterministic and safe for concurrent reads.
pub trait MetadataSource: Send + Sync {
    /// Look up a managed class by name.
    fn find_class(&self, name: &str) -> Option<&ManagedClass>;

    /// Look up a managed class by name, failing if it is unknown.
    fn managed_class(&self, name: &str) -> Result<&ManagedClass> {
        self.find_class(name).ok_or_else(|| {
            GraphDeltaError::metamodel(
                "resolving managed class",
                MetamodelErrorKind::UnknownClass(name.to_string()),
            )
        })
    }

    /// Properties of a class in declaration order.
    fn properties_of<'a>(&'a self, class: &'a ManagedClass) -> &'a [Property] {
        class.properties()
    }

    /// Classify a declared type.
    ///
    /// Looks only at the declared type, never at instance data, so the same
    /// type always yields the same category.
    fn classify_type(&self, declared: &DeclaredType) -> Result<TypeCategory> {
        classify_declared(declared, &|name| self.find_class(name).map(ManagedClass::is_entity))
    }

    /// Classify a property by its declared type.
    fn classify(&self, property: &Property) -> Result<TypeCategory> {
        self.classify_type(property.declared_type())
            .with_context(|| format!("property '{}'", property.name()))
    }
}

/// Classify `declared`, resolving class names through `is_entity`
/// (`Some(true)` for entities, `Some(false)` for value objects).
fn classify_declared(
    declared: &DeclaredType,
    is_entity: &dyn Fn(&str) -> Option<bool>,
) -> Result<TypeCategory> {
    let unresolvable = |reason: String| GraphDeltaError::unresolvable_type(declared.to_string(), reason);

    match declared {
        DeclaredType::Bool
        | DeclaredType::Int
        | DeclaredType::Float
        | DeclaredType::String
        | DeclaredType::Timestamp
        | DeclaredType::Date => Ok(TypeCategory::Primitive),
        DeclaredType::Named(name) => match is_entity(name) {
            Some(true) => Ok(TypeCategory::EntityReference),
            Some(false) => Ok(TypeCategory::Value),
            None => Err(unresolvable(format!("'{name}' is not a managed class"))),
        },
        DeclaredType::Optional(inner) => {
            if matches!(**inner, DeclaredType::Optional(_)) {
                return Err(unresolvable("nested optional types are not supported".to_string()));
            }
            classify_declared(inner, is_entity)
        }
        DeclaredType::List(element) | DeclaredType::Set(element) => {
            match classify_declared(element, is_entity)? {
                TypeCategory::Collection | TypeCategory::Map => Err(unresolvable(
                    "collections of collections or maps are not supported".to_string(),
                )),
                _ => Ok(TypeCategory::Collection),
            }
        }
        DeclaredType::Map(key, value) => {
            if !key.is_scalar() {
                return Err(unresolvable(format!("map key '{key}' must be a scalar type")));
            }
            classify_declared(value, is_entity)?;
            Ok(TypeCategory::Map)
        }
    }
}

/// The metamodel: every managed class, resolved and classified.
///
/// Built once from definitions and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct TypeMapper {
    classes: IndexMap<String, ManagedClass>,
}

impl TypeMapper {
    /// Resolve and classify a set of class definitions.
    ///
    /// Definitions may reference each other in any order.
    pub fn new(definitions: impl IntoIterator<Item = ManagedClassDefinition>) -> Result<Self> {
        let definitions: Vec<ManagedClassDefinition> = definitions.into_iter().collect();

        let mut natures: IndexMap<String, bool> = IndexMap::with_capacity(definitions.len());
        for definition in &definitions {
            let name = definition.name().to_string();
            if natures.insert(name.clone(), definition.is_entity()).is_some() {
                return Err(GraphDeltaError::metamodel(
                    "building metamodel",
                    MetamodelErrorKind::DuplicateClass(name),
                ));
            }
        }
        let is_entity = |name: &str| natures.get(name).copied();

        let mut classes = IndexMap::with_capacity(definitions.len());
        for definition in definitions {
            let class = resolve_class(definition, &is_entity)?;
            classes.insert(class.name().to_string(), class);
        }

        tracing::debug!(classes = classes.len(), "Metamodel built");
        Ok(Self { classes })
    }

    /// All classes in definition order.
    pub fn classes(&self) -> impl Iterator<Item = &ManagedClass> {
        self.classes.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl MetadataSource for TypeMapper {
    fn find_class(&self, name: &str) -> Option<&ManagedClass> {
        self.classes.get(name)
    }
}

fn resolve_class(
    definition: ManagedClassDefinition,
    is_entity: &dyn Fn(&str) -> Option<bool>,
) -> Result<ManagedClass> {
    let class_name = definition.name().to_string();
    let properties = classify_properties(&class_name, definition.properties(), is_entity)?;

    let kind = match &definition {
        ManagedClassDefinition::Entity(entity) => {
            let id_property = match entity.id_property_name() {
                Some(custom) => custom.to_string(),
                None => detect_id_property(&class_name, definition.properties())?,
            };
            let property = properties
                .iter()
                .find(|p| p.name() == id_property)
                .ok_or_else(|| {
                    GraphDeltaError::metamodel(
                        "resolving id property",
                        MetamodelErrorKind::MissingIdProperty {
                            class: class_name.clone(),
                            property: Some(id_property.clone()),
                        },
                    )
                })?;
            if property.category() != TypeCategory::Primitive
                || matches!(property.declared_type(), DeclaredType::Optional(_))
            {
                return Err(GraphDeltaError::metamodel(
                    "resolving id property",
                    MetamodelErrorKind::InvalidIdType {
                        class: class_name,
                        property: id_property,
                        declared: property.declared_type().to_string(),
                    },
                ));
            }
            ClassKind::Entity {
                id_property,
                custom_id: entity.has_custom_id(),
            }
        }
        ManagedClassDefinition::ValueObject(value_object) => {
            if let Some(flagged) = value_object.properties().iter().find(|p| p.id) {
                tracing::warn!(
                    class = %class_name,
                    property = %flagged.name,
                    "Value objects have no identity; id flag ignored"
                );
            }
            ClassKind::ValueObject
        }
    };

    Ok(ManagedClass::new(class_name, kind, properties))
}

fn classify_properties(
    class_name: &str,
    declarations: &[PropertyDeclaration],
    is_entity: &dyn Fn(&str) -> Option<bool>,
) -> Result<Vec<Property>> {
    let mut seen = HashSet::with_capacity(declarations.len());
    let mut properties = Vec::with_capacity(declarations.len());
    for declaration in declarations {
        if !seen.insert(declaration.name.as_str()) {
            return Err(GraphDeltaError::metamodel(
                "building metamodel",
                MetamodelErrorKind::DuplicateProperty {
                    class: class_name.to_string(),
                    property: declaration.name.clone(),
                },
            ));
        }
        let category = classify_declared(&declaration.declared_type, is_entity)
            .with_context(|| format!("property '{class_name}.{}'", declaration.name))?;
        properties.push(Property::new(
            declaration.name.clone(),
            declaration.declared_type.clone(),
            category,
        ));
    }
    Ok(properties)
}

/// Pick the id property of an entity without a custom id: the first property
/// flagged `id`, otherwise a property named `id`.
fn detect_id_property(class_name: &str, declarations: &[PropertyDeclaration]) -> Result<String> {
    let mut flagged = declarations.iter().filter(|p| p.id);
    if let Some(first) = flagged.next() {
        if flagged.next().is_some() {
            tracing::warn!(
                class = %class_name,
                property = %first.name,
                "Several properties flagged as id; using the first"
            );
        }
        return Ok(first.name.clone());
    }
    declarations
        .iter()
        .find(|p| p.name == "id")
        .map(|p| p.name.clone())
        .ok_or_else(|| {
            GraphDeltaError::metamodel(
                "detecting id property",
                MetamodelErrorKind::MissingIdProperty {
                    class: class_name.to_string(),
                    property: None,
                },
            )
        })
}
