//! Typed JSON codec for property values.

use crate::error::{ErrorContext, GraphDeltaError, Result};
use crate::metamodel::{ClassKind, DeclaredType, GlobalId, MetadataSource, Value};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::{Map, Number, Value as Json};
use std::collections::{BTreeMap, HashSet};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Converts [`Value`]s to and from JSON.
///
/// Encoding needs no type information. Decoding is always driven by a
/// declared type: the JSON is never inspected to guess what it holds, so
/// `1` decodes to `Int(1)` for an `int` property and `Float(1.0)` for a
/// `float` property.
#[derive(Clone, Copy)]
pub struct ValueCodec<'a> {
    metadata: &'a dyn MetadataSource,
}

impl<'a> ValueCodec<'a> {
    pub fn new(metadata: &'a dyn MetadataSource) -> Self {
        Self { metadata }
    }

    /// Encode a value.
    ///
    /// Fails only for non-finite floats, which JSON cannot represent.
    pub fn to_json(&self, value: &Value) -> Result<Json> {
        Ok(match value {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => Json::from(*i),
            Value::Float(f) => Number::from_f64(*f).map(Json::Number).ok_or_else(|| {
                GraphDeltaError::malformed(format!("cannot encode non-finite float {f}"))
            })?,
            Value::String(s) => Json::String(s.clone()),
            Value::Timestamp(t) => Json::String(t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::Date(d) => Json::String(d.format(DATE_FORMAT).to_string()),
            Value::Reference(id) => serde_json::to_value(id)?,
            Value::List(items) => Json::Array(
                items
                    .iter()
                    .map(|item| self.to_json(item))
                    .collect::<Result<_>>()?,
            ),
            Value::Map(entries) | Value::Object(entries) => Json::Object(
                entries
                    .iter()
                    .map(|(key, value)| Ok((key.clone(), self.to_json(value)?)))
                    .collect::<Result<Map<_, _>>>()?,
            ),
        })
    }

    /// Decode `json` as a value of type `declared`.
    ///
    /// JSON `null` always decodes to [`Value::Null`].
    pub fn from_json(&self, declared: &DeclaredType, json: &Json) -> Result<Value> {
        if json.is_null() {
            return Ok(Value::Null);
        }
        match declared {
            DeclaredType::Optional(inner) => self.from_json(inner, json),
            DeclaredType::Bool => json.as_bool().map(Value::Bool).ok_or_else(|| mistyped(declared, json)),
            DeclaredType::Int => json.as_i64().map(Value::Int).ok_or_else(|| mistyped(declared, json)),
            DeclaredType::Float => json.as_f64().map(Value::Float).ok_or_else(|| mistyped(declared, json)),
            DeclaredType::String => json
                .as_str()
                .map(|s| Value::String(s.to_string()))
                .ok_or_else(|| mistyped(declared, json)),
            DeclaredType::Timestamp | DeclaredType::Date => {
                let text = json.as_str().ok_or_else(|| mistyped(declared, json))?;
                parse_scalar(declared, text)
            }
            DeclaredType::Named(name) => self.decode_class_value(name, json),
            DeclaredType::List(element) => self.decode_items(element, json, declared).map(Value::List),
            DeclaredType::Set(element) => {
                let items = self.decode_items(element, json, declared)?;
                let mut seen = HashSet::with_capacity(items.len());
                Ok(Value::List(
                    items.into_iter().filter(|item| seen.insert(item.clone())).collect(),
                ))
            }
            DeclaredType::Map(key_type, value_type) => {
                let object = json.as_object().ok_or_else(|| mistyped(declared, json))?;
                let mut entries = BTreeMap::new();
                for (key, value) in object {
                    let key = canonical_key(key_type, key)?;
                    let value = self
                        .from_json(value_type, value)
                        .with_context(|| format!("map entry '{key}'"))?;
                    if value.is_null() {
                        return Err(GraphDeltaError::malformed(format!(
                            "map entry '{key}' is null"
                        )));
                    }
                    entries.insert(key, value);
                }
                Ok(Value::Map(entries))
            }
        }
    }

    /// Decode the properties of a value object or entity snapshot.
    ///
    /// Every key must name a property of `class`; `null` values are absent.
    pub fn decode_properties(
        &self,
        class: &str,
        object: &Map<String, Json>,
    ) -> Result<BTreeMap<String, Value>> {
        let class = self.metadata.managed_class(class)?;
        let mut values = BTreeMap::new();
        for (name, json) in object {
            let property = class.property(name).ok_or_else(|| {
                GraphDeltaError::malformed(format!(
                    "unknown property '{name}' for class '{}'",
                    class.name()
                ))
            })?;
            let value = self
                .from_json(property.declared_type(), json)
                .with_context(|| format!("property '{name}'"))?;
            if !value.is_null() {
                values.insert(name.clone(), value);
            }
        }
        Ok(values)
    }

    fn decode_class_value(&self, name: &str, json: &Json) -> Result<Value> {
        let class = self
            .metadata
            .find_class(name)
            .ok_or_else(|| GraphDeltaError::unresolvable_type(name, "not a managed class"))?;
        match class.kind() {
            ClassKind::Entity { .. } => self.decode_reference(name, json).map(Value::Reference),
            ClassKind::ValueObject => {
                let object = json
                    .as_object()
                    .ok_or_else(|| mistyped(&DeclaredType::named(name), json))?;
                self.decode_properties(name, object).map(Value::Object)
            }
        }
    }

    /// Decode an entity reference written either as a global id or as a bare
    /// id value.
    fn decode_reference(&self, class: &str, json: &Json) -> Result<GlobalId> {
        let id = match json {
            Json::String(id) => GlobalId::instance(class, id.clone()),
            Json::Number(id) => GlobalId::instance(class, id.to_string()),
            Json::Object(_) => serde_json::from_value(json.clone()).map_err(|e| {
                GraphDeltaError::malformed(format!("invalid reference to '{class}': {e}"))
            })?,
            other => return Err(mistyped(&DeclaredType::named(class), other)),
        };
        if id.type_name() != class {
            return Err(GraphDeltaError::malformed(format!(
                "reference to {id} where '{class}' was declared"
            )));
        }
        Ok(id)
    }

    fn decode_items(&self, element: &DeclaredType, json: &Json, declared: &DeclaredType) -> Result<Vec<Value>> {
        let items = json.as_array().ok_or_else(|| mistyped(declared, json))?;
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                if item.is_null() {
                    return Err(GraphDeltaError::malformed(format!("element #{index} is null")));
                }
                self.from_json(element, item)
                    .with_context(|| format!("element #{index}"))
            })
            .collect()
    }
}

/// Canonical text of a map key of type `key_type`.
///
/// Keys arrive as JSON object keys, i.e. strings, and are normalized so that
/// `"01"` and `"1"` name the same `int` key.
pub(crate) fn canonical_key(key_type: &DeclaredType, key: &str) -> Result<String> {
    let key_type = key_type.unwrap_optional();
    let value = match key_type {
        DeclaredType::String => return Ok(key.to_string()),
        DeclaredType::Bool => key.parse().map(Value::Bool).ok(),
        DeclaredType::Int => key.parse().map(Value::Int).ok(),
        DeclaredType::Float => key.parse().map(Value::Float).ok(),
        DeclaredType::Timestamp | DeclaredType::Date => parse_scalar(key_type, key).ok(),
        _ => None,
    };
    value
        .and_then(|v| v.scalar_text())
        .ok_or_else(|| GraphDeltaError::malformed(format!("invalid {key_type} map key '{key}'")))
}

fn parse_scalar(declared: &DeclaredType, text: &str) -> Result<Value> {
    let parsed = match declared {
        DeclaredType::Timestamp => DateTime::parse_from_rfc3339(text)
            .map(|t| Value::Timestamp(t.with_timezone(&Utc)))
            .map_err(|e| e.to_string()),
        DeclaredType::Date => NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map(Value::Date)
            .map_err(|e| e.to_string()),
        _ => Err(format!("'{declared}' is not a textual scalar")),
    };
    parsed.map_err(|reason| GraphDeltaError::malformed(format!("invalid {declared} '{text}': {reason}")))
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(n) if n.is_f64() => "float",
        Json::Number(_) => "integer",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

fn mistyped(declared: &DeclaredType, json: &Json) -> GraphDeltaError {
    GraphDeltaError::malformed(format!("expected {declared}, found {}", json_kind(json)))
}
