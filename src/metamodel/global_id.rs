//! Identity of nodes in an object graph.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of the node that owns a change.
///
/// Entities are identified by class name and id value. Value objects have no
/// identity of their own and are addressed through their owner plus a
/// property path fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GlobalId {
    Instance {
        #[serde(rename = "entity")]
        type_name: String,
        #[serde(rename = "cdoId")]
        cdo_id: String,
    },
    ValueObject {
        #[serde(rename = "valueObject")]
        type_name: String,
        #[serde(rename = "ownerId")]
        owner: Box<GlobalId>,
        fragment: String,
    },
}

impl GlobalId {
    /// Identity of an entity instance.
    pub fn instance(type_name: impl Into<String>, cdo_id: impl Into<String>) -> Self {
        Self::Instance {
            type_name: type_name.into(),
            cdo_id: cdo_id.into(),
        }
    }

    /// Identity of a value object embedded in `owner` at `fragment`.
    pub fn value_object(
        type_name: impl Into<String>,
        owner: Self,
        fragment: impl Into<String>,
    ) -> Self {
        Self::ValueObject {
            type_name: type_name.into(),
            owner: Box::new(owner),
            fragment: fragment.into(),
        }
    }

    /// Name of the managed class this id belongs to.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Instance { type_name, .. } | Self::ValueObject { type_name, .. } => type_name,
        }
    }

    /// Owning node for value objects.
    #[must_use]
    pub fn owner(&self) -> Option<&Self> {
        match self {
            Self::Instance { .. } => None,
            Self::ValueObject { owner, .. } => Some(owner),
        }
    }

    /// The root entity id, walking up through value-object owners.
    #[must_use]
    pub fn root(&self) -> &Self {
        let mut current = self;
        while let Some(owner) = current.owner() {
            current = owner;
        }
        current
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance { type_name, cdo_id } => write!(f, "{type_name}/{cdo_id}"),
            Self::ValueObject {
                owner, fragment, ..
            } => write!(f, "{owner}#{fragment}"),
        }
    }
}
