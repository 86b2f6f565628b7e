//! Metamodel of managed classes.
//!
//! The metamodel describes how domain classes map into the comparison and
//! serialization system:
//!
//! - [`ManagedClassDefinition`]: what the user declares (entity or value
//!   object, property names and declared types)
//! - [`TypeMapper`]: the resolved metamodel; classifies every property into a
//!   [`TypeCategory`] and serves as the [`MetadataSource`] for the diff engine
//!   and the change codec
//! - [`NodePair`]: matched old/new [`ObjectNode`]s fed to the diff engine

mod class;
mod definition;
mod global_id;
mod mapper;
mod node;
mod property;
pub mod schema;
mod types;
mod value;

pub use class::{ClassKind, ManagedClass};
pub use definition::{
    EntityDefinition, ManagedClassDefinition, PropertyDeclaration, ValueObjectDefinition,
};
pub use global_id::GlobalId;
pub use mapper::{MetadataSource, TypeMapper};
pub use node::{NodePair, ObjectNode};
pub use property::Property;
pub use schema::{ClassSchema, SchemaFile, SchemaKind};
pub use types::{DeclaredType, TypeCategory};
pub use value::Value;
