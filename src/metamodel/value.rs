//! Decoded property values.

use super::GlobalId;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A property value taken from one side of a snapshot.
///
/// Values are always decoded against a declared type, so `Int(1)` and
/// `Float(1.0)` are distinct and a timestamp never degrades to a string.
/// `Null` stands for an absent value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
    /// Reference to an entity
    Reference(GlobalId),
    /// Contents of a list or set property
    List(Vec<Value>),
    /// Map entries keyed by the canonical text of a scalar key
    Map(BTreeMap<String, Value>),
    /// Value object properties by name; absent properties are not stored
    Object(BTreeMap<String, Value>),
}

/// Shared absent value.
pub static NULL: Value = Value::Null;

impl Value {
    /// Build a value object, dropping absent properties.
    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Self::Object(
            entries
                .into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.into(), v))
                .collect(),
        )
    }

    /// Build a list value.
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Self::List(items.into_iter().collect())
    }

    /// Build a map value.
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short label of the variant, used in diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Timestamp(_) => "timestamp",
            Self::Date(_) => "date",
            Self::Reference(_) => "reference",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Object(_) => "object",
        }
    }

    /// Items of a collection value; `Null` counts as empty.
    #[must_use]
    pub fn as_items(&self) -> Option<&[Value]> {
        match self {
            Self::Null => Some(&[]),
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Entries of a map value; `Null` counts as empty.
    #[must_use]
    pub fn as_entries(&self) -> Option<Option<&BTreeMap<String, Value>>> {
        match self {
            Self::Null => Some(None),
            Self::Map(entries) => Some(Some(entries)),
            _ => None,
        }
    }

    /// Referenced entity; `Null` counts as no reference.
    #[must_use]
    pub fn as_reference(&self) -> Option<Option<&GlobalId>> {
        match self {
            Self::Null => Some(None),
            Self::Reference(id) => Some(Some(id)),
            _ => None,
        }
    }

    /// Canonical text of a scalar, used for entity ids and map keys.
    #[must_use]
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(i) => Some(i.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::String(s) => Some(s.clone()),
            Self::Timestamp(t) => Some(t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Self::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            _ => None,
        }
    }
}

/// Bit pattern used for float equality and hashing: `-0.0` equals `0.0` and
/// every NaN equals every other NaN.
fn float_bits(f: f64) -> u64 {
    if f == 0.0 {
        0
    } else if f.is_nan() {
        f64::NAN.to_bits()
    } else {
        f.to_bits()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => float_bits(*a) == float_bits(*b),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Timestamp(a), Self::Timestamp(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::Reference(a), Self::Reference(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) | (Self::Object(a), Self::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Bool(b) => b.hash(state),
            Self::Int(i) => i.hash(state),
            Self::Float(f) => float_bits(*f).hash(state),
            Self::String(s) => s.hash(state),
            Self::Timestamp(t) => t.hash(state),
            Self::Date(d) => d.hash(state),
            Self::Reference(id) => id.hash(state),
            Self::List(items) => items.hash(state),
            Self::Map(entries) | Self::Object(entries) => entries.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Reference(id) => write!(f, "{id}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(entries) | Self::Object(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            scalar => match scalar.scalar_text() {
                Some(text) => f.write_str(&text),
                None => Ok(()),
            },
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<GlobalId> for Value {
    fn from(value: GlobalId) -> Self {
        Self::Reference(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_float_equality_is_total() {
        assert_eq!(Value::Float(0.0), Value::Float(-0.0));
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_ne!(Value::Float(1.0), Value::Int(1));

        let set: HashSet<Value> = [Value::Float(0.0), Value::Float(-0.0)].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_object_drops_absent_properties() {
        let with_null = Value::object([("city", Value::from("Oslo")), ("zip", Value::Null)]);
        let without = Value::object([("city", Value::from("Oslo"))]);
        assert_eq!(with_null, without);
    }

    #[test]
    fn test_null_reads_as_empty() {
        assert_eq!(Value::Null.as_items(), Some(&[][..]));
        assert_eq!(Value::Null.as_entries(), Some(None));
        assert_eq!(Value::Null.as_reference(), Some(None));
        assert!(Value::Int(3).as_items().is_none());
    }

    #[test]
    fn test_display() {
        let value = Value::list([Value::from("a"), Value::Int(2), Value::Null]);
        assert_eq!(value.to_string(), "[\"a\", 2, null]");
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).map(Value::Date);
        assert_eq!(date.map(|d| d.to_string()).as_deref(), Some("2024-02-29"));
    }
}
