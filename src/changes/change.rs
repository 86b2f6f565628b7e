//! The closed taxonomy of change records.

use super::CommitMetadata;
use crate::metamodel::{GlobalId, Value};
use std::fmt;

/// One detected difference for one node.
///
/// Changes are created once during a diff pass and never mutated; commit
/// metadata is attached by building a new record with
/// [`Change::with_commit_metadata`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    global_id: GlobalId,
    kind: ChangeKind,
    commit_metadata: Option<CommitMetadata>,
}

/// Variant-specific payload of a [`Change`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    /// A scalar or value-object property was replaced
    ValueChanged {
        property: String,
        left: Value,
        right: Value,
    },
    /// An element was added to a collection property
    ValueAdded { property: String, value: Value },
    /// An element was removed from a collection property
    ValueRemoved { property: String, value: Value },
    /// An entity reference now points elsewhere
    ReferenceChanged {
        property: String,
        left: Option<GlobalId>,
        right: Option<GlobalId>,
    },
    /// Entries of a map property changed
    MapChanged {
        property: String,
        entries: Vec<EntryChange>,
    },
    /// The object joined the graph
    NewObject,
    /// The object left the graph
    ObjectRemoved,
}

/// One changed entry of a map property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryChange {
    Added { key: String, value: Value },
    Removed { key: String, value: Value },
    ValueChanged { key: String, left: Value, right: Value },
}

impl EntryChange {
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Added { key, .. } | Self::Removed { key, .. } | Self::ValueChanged { key, .. } => {
                key
            }
        }
    }
}

impl ChangeKind {
    /// Wire discriminator of this variant.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::ValueChanged { .. } => "ValueChange",
            Self::ValueAdded { .. } => "ValueAdded",
            Self::ValueRemoved { .. } => "ValueRemoved",
            Self::ReferenceChanged { .. } => "ReferenceChange",
            Self::MapChanged { .. } => "MapChange",
            Self::NewObject => "NewObject",
            Self::ObjectRemoved => "ObjectRemoved",
        }
    }

    /// Name of the changed property; graph-membership changes have none.
    #[must_use]
    pub fn property(&self) -> Option<&str> {
        match self {
            Self::ValueChanged { property, .. }
            | Self::ValueAdded { property, .. }
            | Self::ValueRemoved { property, .. }
            | Self::ReferenceChanged { property, .. }
            | Self::MapChanged { property, .. } => Some(property),
            Self::NewObject | Self::ObjectRemoved => None,
        }
    }
}

impl Change {
    pub const fn new(global_id: GlobalId, kind: ChangeKind) -> Self {
        Self {
            global_id,
            kind,
            commit_metadata: None,
        }
    }

    pub fn value_changed(
        global_id: GlobalId,
        property: impl Into<String>,
        left: Value,
        right: Value,
    ) -> Self {
        Self::new(
            global_id,
            ChangeKind::ValueChanged {
                property: property.into(),
                left,
                right,
            },
        )
    }

    pub fn value_added(global_id: GlobalId, property: impl Into<String>, value: Value) -> Self {
        Self::new(
            global_id,
            ChangeKind::ValueAdded {
                property: property.into(),
                value,
            },
        )
    }

    pub fn value_removed(global_id: GlobalId, property: impl Into<String>, value: Value) -> Self {
        Self::new(
            global_id,
            ChangeKind::ValueRemoved {
                property: property.into(),
                value,
            },
        )
    }

    pub fn reference_changed(
        global_id: GlobalId,
        property: impl Into<String>,
        left: Option<GlobalId>,
        right: Option<GlobalId>,
    ) -> Self {
        Self::new(
            global_id,
            ChangeKind::ReferenceChanged {
                property: property.into(),
                left,
                right,
            },
        )
    }

    pub fn map_changed(
        global_id: GlobalId,
        property: impl Into<String>,
        entries: Vec<EntryChange>,
    ) -> Self {
        Self::new(
            global_id,
            ChangeKind::MapChanged {
                property: property.into(),
                entries,
            },
        )
    }

    pub const fn new_object(global_id: GlobalId) -> Self {
        Self::new(global_id, ChangeKind::NewObject)
    }

    pub const fn object_removed(global_id: GlobalId) -> Self {
        Self::new(global_id, ChangeKind::ObjectRemoved)
    }

    /// The same change with commit metadata attached.
    #[must_use]
    pub fn with_commit_metadata(mut self, metadata: CommitMetadata) -> Self {
        self.commit_metadata = Some(metadata);
        self
    }

    /// The same change with any commit metadata dropped.
    #[must_use]
    pub fn without_commit_metadata(mut self) -> Self {
        self.commit_metadata = None;
        self
    }

    #[must_use]
    pub const fn global_id(&self) -> &GlobalId {
        &self.global_id
    }

    #[must_use]
    pub const fn kind(&self) -> &ChangeKind {
        &self.kind
    }

    #[must_use]
    pub fn property(&self) -> Option<&str> {
        self.kind.property()
    }

    #[must_use]
    pub const fn commit_metadata(&self) -> Option<&CommitMetadata> {
        self.commit_metadata.as_ref()
    }
}

fn fmt_ref(id: Option<&GlobalId>) -> String {
    id.map_or_else(|| "null".to_string(), ToString::to_string)
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = &self.global_id;
        match &self.kind {
            ChangeKind::ValueChanged {
                property,
                left,
                right,
            } => write!(f, "~ {id}.{property}: {left} -> {right}"),
            ChangeKind::ValueAdded { property, value } => write!(f, "+ {id}.{property}: {value}"),
            ChangeKind::ValueRemoved { property, value } => {
                write!(f, "- {id}.{property}: {value}")
            }
            ChangeKind::ReferenceChanged {
                property,
                left,
                right,
            } => write!(
                f,
                "~ {id}.{property}: {} -> {}",
                fmt_ref(left.as_ref()),
                fmt_ref(right.as_ref())
            ),
            ChangeKind::MapChanged { property, entries } => {
                write!(f, "~ {id}.{property}:")?;
                for entry in entries {
                    match entry {
                        EntryChange::Added { key, value } => write!(f, " +[{key}]={value}")?,
                        EntryChange::Removed { key, value } => write!(f, " -[{key}]={value}")?,
                        EntryChange::ValueChanged { key, left, right } => {
                            write!(f, " ~[{key}]={left}->{right}")?;
                        }
                    }
                }
                Ok(())
            }
            ChangeKind::NewObject => write!(f, "+ {id} (new object)"),
            ChangeKind::ObjectRemoved => write!(f, "- {id} (object removed)"),
        }
    }
}
