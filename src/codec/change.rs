//! Polymorphic JSON codec for change records.

use super::value::{canonical_key, ValueCodec};
use crate::changes::{Change, ChangeKind, CommitMetadata, EntryChange};
use crate::error::{CodecErrorKind, ErrorContext, GraphDeltaError, Result};
use crate::metamodel::{DeclaredType, GlobalId, ManagedClass, MetadataSource, Property, TypeCategory, Value};
use serde_json::{Map, Value as Json};

const CHANGE_TYPE: &str = "changeType";
const GLOBAL_ID: &str = "globalId";
const PROPERTY: &str = "property";
const LEFT: &str = "left";
const RIGHT: &str = "right";
const VALUE: &str = "value";
const ENTRY_CHANGES: &str = "entryChanges";
const ENTRY_CHANGE_TYPE: &str = "entryChangeType";
const KEY: &str = "key";
const COMMIT_METADATA: &str = "commitMetadata";

/// Wire discriminators, in [`ChangeKind`] order.
pub const CHANGE_TYPES: [&str; 7] = [
    "ValueChange",
    "ValueAdded",
    "ValueRemoved",
    "ReferenceChange",
    "MapChange",
    "NewObject",
    "ObjectRemoved",
];

/// Encodes changes to self-describing JSON documents and decodes them back.
///
/// Decoding first resolves the owning class from the `globalId`, then the
/// property from the class and finally the declared type from the property.
/// Only then are the payload fields decoded, typed by that declared type.
#[derive(Clone, Copy)]
pub struct ChangeCodec<'a> {
    metadata: &'a dyn MetadataSource,
    values: ValueCodec<'a>,
}

impl<'a> ChangeCodec<'a> {
    pub fn new(metadata: &'a dyn MetadataSource) -> Self {
        Self {
            metadata,
            values: ValueCodec::new(metadata),
        }
    }

    /// Encode one change.
    ///
    /// `metadata`, when given, is written instead of any metadata the change
    /// already carries.
    pub fn encode(&self, change: &Change, metadata: Option<&CommitMetadata>) -> Result<Json> {
        let mut doc = Map::new();
        doc.insert(CHANGE_TYPE.into(), Json::from(change.kind().type_name()));
        doc.insert(GLOBAL_ID.into(), serde_json::to_value(change.global_id())?);

        if let Some(property) = change.property() {
            doc.insert(PROPERTY.into(), Json::from(property));
        }
        match change.kind() {
            ChangeKind::ValueChanged { left, right, .. } => {
                doc.insert(LEFT.into(), self.values.to_json(left)?);
                doc.insert(RIGHT.into(), self.values.to_json(right)?);
            }
            ChangeKind::ValueAdded { value, .. } | ChangeKind::ValueRemoved { value, .. } => {
                doc.insert(VALUE.into(), self.values.to_json(value)?);
            }
            ChangeKind::ReferenceChanged { left, right, .. } => {
                doc.insert(LEFT.into(), serde_json::to_value(left)?);
                doc.insert(RIGHT.into(), serde_json::to_value(right)?);
            }
            ChangeKind::MapChanged { entries, .. } => {
                let entries = entries
                    .iter()
                    .map(|entry| self.encode_entry(entry))
                    .collect::<Result<Vec<_>>>()?;
                doc.insert(ENTRY_CHANGES.into(), Json::Array(entries));
            }
            ChangeKind::NewObject | ChangeKind::ObjectRemoved => {}
        }

        if let Some(metadata) = metadata.or_else(|| change.commit_metadata()) {
            doc.insert(COMMIT_METADATA.into(), serde_json::to_value(metadata)?);
        }
        Ok(Json::Object(doc))
    }

    fn encode_entry(&self, entry: &EntryChange) -> Result<Json> {
        let mut doc = Map::new();
        match entry {
            EntryChange::Added { key, value } => {
                doc.insert(ENTRY_CHANGE_TYPE.into(), Json::from("EntryAdded"));
                doc.insert(KEY.into(), Json::from(key.as_str()));
                doc.insert(VALUE.into(), self.values.to_json(value)?);
            }
            EntryChange::Removed { key, value } => {
                doc.insert(ENTRY_CHANGE_TYPE.into(), Json::from("EntryRemoved"));
                doc.insert(KEY.into(), Json::from(key.as_str()));
                doc.insert(VALUE.into(), self.values.to_json(value)?);
            }
            EntryChange::ValueChanged { key, left, right } => {
                doc.insert(ENTRY_CHANGE_TYPE.into(), Json::from("EntryValueChange"));
                doc.insert(KEY.into(), Json::from(key.as_str()));
                doc.insert(LEFT.into(), self.values.to_json(left)?);
                doc.insert(RIGHT.into(), self.values.to_json(right)?);
            }
        }
        Ok(Json::Object(doc))
    }

    /// Decode one change document.
    pub fn decode(&self, json: &Json) -> Result<Change> {
        let doc = json
            .as_object()
            .ok_or_else(|| GraphDeltaError::malformed("change document must be a JSON object"))?;

        let change_type = string_field(doc, CHANGE_TYPE)?;
        if !CHANGE_TYPES.contains(&change_type) {
            return Err(GraphDeltaError::codec(
                "decoding document",
                CodecErrorKind::UnsupportedVariant(change_type.to_string()),
            ));
        }

        let global_id: GlobalId = serde_json::from_value(field(doc, GLOBAL_ID)?.clone())
            .map_err(|e| GraphDeltaError::malformed(format!("invalid '{GLOBAL_ID}': {e}")))?;
        let class = self.metadata.find_class(global_id.type_name()).ok_or_else(|| {
            GraphDeltaError::unresolvable_type(global_id.type_name(), "not a managed class")
        })?;

        let kind = match change_type {
            "NewObject" => ChangeKind::NewObject,
            "ObjectRemoved" => ChangeKind::ObjectRemoved,
            _ => {
                let property = self.resolve_property(class, doc)?;
                self.decode_property_change(change_type, property, doc)
                    .with_context(|| format!("property '{}'", property.name()))?
            }
        };

        let mut change = Change::new(global_id, kind);
        if let Some(metadata) = doc.get(COMMIT_METADATA).filter(|m| !m.is_null()) {
            let metadata: CommitMetadata = serde_json::from_value(metadata.clone()).map_err(|e| {
                GraphDeltaError::malformed(format!("invalid '{COMMIT_METADATA}': {e}"))
            })?;
            change = change.with_commit_metadata(metadata);
        }
        Ok(change)
    }

    fn resolve_property<'c>(&self, class: &'c ManagedClass, doc: &Map<String, Json>) -> Result<&'c Property> {
        let name = string_field(doc, PROPERTY)?;
        class.property(name).ok_or_else(|| {
            GraphDeltaError::unresolvable_type(
                format!("{}.{name}", class.name()),
                "not a property of the managed class",
            )
        })
    }

    fn decode_property_change(
        &self,
        change_type: &str,
        property: &Property,
        doc: &Map<String, Json>,
    ) -> Result<ChangeKind> {
        let category = self.metadata.classify(property)?;
        let declared = property.declared_type();
        let name = property.name().to_string();

        let expected = match change_type {
            "ValueChange" => matches!(category, TypeCategory::Primitive | TypeCategory::Value),
            "ValueAdded" | "ValueRemoved" => category == TypeCategory::Collection,
            "ReferenceChange" => category == TypeCategory::EntityReference,
            _ => category == TypeCategory::Map,
        };
        if !expected {
            return Err(GraphDeltaError::malformed(format!(
                "{change_type} does not apply to {category} property of type '{declared}'"
            )));
        }

        Ok(match change_type {
            "ValueChange" => ChangeKind::ValueChanged {
                property: name,
                left: self.typed_field(doc, LEFT, declared)?,
                right: self.typed_field(doc, RIGHT, declared)?,
            },
            "ValueAdded" | "ValueRemoved" => {
                let element = declared
                    .element_type()
                    .ok_or_else(|| GraphDeltaError::malformed(format!("'{declared}' has no element type")))?;
                let value = self.typed_field(doc, VALUE, element)?;
                if change_type == "ValueAdded" {
                    ChangeKind::ValueAdded { property: name, value }
                } else {
                    ChangeKind::ValueRemoved { property: name, value }
                }
            }
            "ReferenceChange" => ChangeKind::ReferenceChanged {
                property: name,
                left: reference(self.typed_field(doc, LEFT, declared)?)?,
                right: reference(self.typed_field(doc, RIGHT, declared)?)?,
            },
            _ => ChangeKind::MapChanged {
                property: name,
                entries: self.decode_entries(declared, doc)?,
            },
        })
    }

    fn decode_entries(&self, declared: &DeclaredType, doc: &Map<String, Json>) -> Result<Vec<EntryChange>> {
        let (key_type, value_type) = declared
            .map_types()
            .ok_or_else(|| GraphDeltaError::malformed(format!("'{declared}' is not a map type")))?;
        let entries = field(doc, ENTRY_CHANGES)?
            .as_array()
            .ok_or_else(|| GraphDeltaError::malformed(format!("'{ENTRY_CHANGES}' must be an array")))?;

        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                self.decode_entry(key_type, value_type, entry)
                    .with_context(|| format!("entry #{index}"))
            })
            .collect()
    }

    fn decode_entry(
        &self,
        key_type: &DeclaredType,
        value_type: &DeclaredType,
        entry: &Json,
    ) -> Result<EntryChange> {
        let entry = entry
            .as_object()
            .ok_or_else(|| GraphDeltaError::malformed("entry change must be a JSON object"))?;
        let key = canonical_key(key_type, string_field(entry, KEY)?)?;
        Ok(match string_field(entry, ENTRY_CHANGE_TYPE)? {
            "EntryAdded" => EntryChange::Added {
                key,
                value: self.typed_field(entry, VALUE, value_type)?,
            },
            "EntryRemoved" => EntryChange::Removed {
                key,
                value: self.typed_field(entry, VALUE, value_type)?,
            },
            "EntryValueChange" => EntryChange::ValueChanged {
                key,
                left: self.typed_field(entry, LEFT, value_type)?,
                right: self.typed_field(entry, RIGHT, value_type)?,
            },
            other => {
                return Err(GraphDeltaError::codec(
                    "decoding map entry",
                    CodecErrorKind::UnsupportedVariant(other.to_string()),
                ))
            }
        })
    }

    fn typed_field(&self, doc: &Map<String, Json>, name: &str, declared: &DeclaredType) -> Result<Value> {
        self.values
            .from_json(declared, field(doc, name)?)
            .with_context(|| format!("field '{name}'"))
    }

    /// Encode a batch of changes as a JSON array.
    pub fn encode_all<'c>(
        &self,
        changes: impl IntoIterator<Item = &'c Change>,
        metadata: Option<&CommitMetadata>,
    ) -> Result<Json> {
        changes
            .into_iter()
            .map(|change| self.encode(change, metadata))
            .collect::<Result<Vec<_>>>()
            .map(Json::Array)
    }

    /// Decode a JSON array of change documents.
    pub fn decode_all(&self, json: &Json) -> Result<Vec<Change>> {
        json.as_array()
            .ok_or_else(|| GraphDeltaError::malformed("expected an array of change documents"))?
            .iter()
            .enumerate()
            .map(|(index, doc)| {
                self.decode(doc)
                    .with_context(|| format!("decoding change #{index}"))
            })
            .collect()
    }

    /// Encode one change as compact JSON text.
    pub fn encode_to_string(&self, change: &Change, metadata: Option<&CommitMetadata>) -> Result<String> {
        let json = self.encode(change, metadata)?;
        Ok(serde_json::to_string(&json)?)
    }

    /// Decode one change from JSON text.
    pub fn decode_str(&self, text: &str) -> Result<Change> {
        let json: Json = serde_json::from_str(text)?;
        self.decode(&json)
    }

    /// Decode either a single change document or an array of them.
    pub fn decode_document_str(&self, text: &str) -> Result<Vec<Change>> {
        let json: Json = serde_json::from_str(text)?;
        if json.is_array() {
            self.decode_all(&json)
        } else {
            self.decode(&json).map(|change| vec![change])
        }
    }
}

fn reference(value: Value) -> Result<Option<GlobalId>> {
    match value {
        Value::Null => Ok(None),
        Value::Reference(id) => Ok(Some(id)),
        other => Err(GraphDeltaError::malformed(format!(
            "expected a reference, found {}",
            other.kind_name()
        ))),
    }
}

fn field<'j>(doc: &'j Map<String, Json>, name: &str) -> Result<&'j Json> {
    doc.get(name)
        .ok_or_else(|| GraphDeltaError::malformed(format!("missing field '{name}'")))
}

fn string_field<'j>(doc: &'j Map<String, Json>, name: &str) -> Result<&'j str> {
    field(doc, name)?
        .as_str()
        .ok_or_else(|| GraphDeltaError::malformed(format!("field '{name}' must be a string")))
}
