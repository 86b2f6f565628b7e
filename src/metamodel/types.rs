//! Declared property types and their semantic categories.

use crate::error::{GraphDeltaError, MetamodelErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic classification of a property's declared type.
///
/// The set is closed: the appender registry keeps exactly one appender per
/// category and the change codec relies on the same classification when
/// resolving payload types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TypeCategory {
    /// Scalars: bool, int, float, string, timestamp, date
    Primitive,
    /// Value objects, compared by structural equality
    Value,
    /// References to entities, compared by identity
    EntityReference,
    /// Lists and sets, compared as multisets
    Collection,
    /// Maps keyed by scalars
    Map,
}

impl TypeCategory {
    /// Every category, in table order.
    pub const ALL: [Self; 5] = [
        Self::Primitive,
        Self::Value,
        Self::EntityReference,
        Self::Collection,
        Self::Map,
    ];

    /// Position of this category in [`TypeCategory::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Primitive => 0,
            Self::Value => 1,
            Self::EntityReference => 2,
            Self::Collection => 3,
            Self::Map => 4,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Primitive => "Primitive",
            Self::Value => "Value",
            Self::EntityReference => "EntityReference",
            Self::Collection => "Collection",
            Self::Map => "Map",
        }
    }
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The declared (generic) type of a property.
///
/// Written in schemas as `int`, `list<string>`, `map<string, Address>`,
/// `optional<timestamp>` or a bare managed class name such as `Person`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DeclaredType {
    Bool,
    Int,
    Float,
    String,
    /// UTC instant, RFC 3339 on the wire
    Timestamp,
    /// Calendar date, `YYYY-MM-DD` on the wire
    Date,
    /// A managed class (entity or value object) by name
    Named(String),
    List(Box<DeclaredType>),
    Set(Box<DeclaredType>),
    Map(Box<DeclaredType>, Box<DeclaredType>),
    Optional(Box<DeclaredType>),
}

impl DeclaredType {
    #[must_use]
    pub fn list(element: Self) -> Self {
        Self::List(Box::new(element))
    }

    #[must_use]
    pub fn set(element: Self) -> Self {
        Self::Set(Box::new(element))
    }

    #[must_use]
    pub fn map(key: Self, value: Self) -> Self {
        Self::Map(Box::new(key), Box::new(value))
    }

    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }

    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Whether this is one of the built-in scalar types.
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::Bool | Self::Int | Self::Float | Self::String | Self::Timestamp | Self::Date
        )
    }

    /// Strip one level of `optional<..>`.
    #[must_use]
    pub fn unwrap_optional(&self) -> &Self {
        match self {
            Self::Optional(inner) => inner,
            other => other,
        }
    }

    /// Element type of a `list<T>` or `set<T>`, looking through `optional<..>`.
    #[must_use]
    pub fn element_type(&self) -> Option<&Self> {
        match self.unwrap_optional() {
            Self::List(element) | Self::Set(element) => Some(element),
            _ => None,
        }
    }

    /// Key and value types of a `map<K, V>`, looking through `optional<..>`.
    #[must_use]
    pub fn map_types(&self) -> Option<(&Self, &Self)> {
        match self.unwrap_optional() {
            Self::Map(key, value) => Some((key, value)),
            _ => None,
        }
    }

    /// Whether this is a list, set or map (looking through `optional<..>`).
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(
            self.unwrap_optional(),
            Self::List(_) | Self::Set(_) | Self::Map(_, _)
        )
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::String => f.write_str("string"),
            Self::Timestamp => f.write_str("timestamp"),
            Self::Date => f.write_str("date"),
            Self::Named(name) => f.write_str(name),
            Self::List(element) => write!(f, "list<{element}>"),
            Self::Set(element) => write!(f, "set<{element}>"),
            Self::Map(key, value) => write!(f, "map<{key}, {value}>"),
            Self::Optional(inner) => write!(f, "optional<{inner}>"),
        }
    }
}

impl FromStr for DeclaredType {
    type Err = GraphDeltaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = TypeParser::new(s);
        let parsed = parser.parse_type()?;
        parser.skip_whitespace();
        if parser.pos < parser.input.len() {
            return Err(parser.error(format!(
                "unexpected trailing input '{}'",
                &parser.input[parser.pos..]
            )));
        }
        Ok(parsed)
    }
}

impl TryFrom<String> for DeclaredType {
    type Error = GraphDeltaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DeclaredType> for String {
    fn from(value: DeclaredType) -> Self {
        value.to_string()
    }
}

/// Recursive-descent parser for the declared type grammar.
struct TypeParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> TypeParser<'a> {
    const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn error(&self, reason: impl Into<String>) -> GraphDeltaError {
        GraphDeltaError::metamodel(
            "parsing declared type",
            MetamodelErrorKind::InvalidTypeSyntax {
                text: self.input.to_string(),
                reason: reason.into(),
            },
        )
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn identifier(&mut self) -> Result<&'a str, GraphDeltaError> {
        self.skip_whitespace();
        let input = self.input;
        let rest = &input[self.pos..];
        let len = rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.' || c == ':'))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error(format!("expected a type name at offset {}", self.pos)));
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    fn expect(&mut self, token: char) -> Result<(), GraphDeltaError> {
        self.skip_whitespace();
        if self.input[self.pos..].starts_with(token) {
            self.pos += token.len_utf8();
            Ok(())
        } else {
            Err(self.error(format!("expected '{token}' at offset {}", self.pos)))
        }
    }

    fn parse_type(&mut self) -> Result<DeclaredType, GraphDeltaError> {
        let name = self.identifier()?;
        let parsed = match name {
            "bool" | "boolean" => DeclaredType::Bool,
            "int" | "integer" | "long" => DeclaredType::Int,
            "float" | "double" => DeclaredType::Float,
            "string" => DeclaredType::String,
            "timestamp" | "instant" => DeclaredType::Timestamp,
            "date" => DeclaredType::Date,
            "list" => DeclaredType::list(self.single_argument()?),
            "set" => DeclaredType::set(self.single_argument()?),
            "optional" => DeclaredType::optional(self.single_argument()?),
            "map" => {
                self.expect('<')?;
                let key = self.parse_type()?;
                self.expect(',')?;
                let value = self.parse_type()?;
                self.expect('>')?;
                DeclaredType::map(key, value)
            }
            other => DeclaredType::Named(other.to_string()),
        };
        Ok(parsed)
    }

    fn single_argument(&mut self) -> Result<DeclaredType, GraphDeltaError> {
        self.expect('<')?;
        let inner = self.parse_type()?;
        self.expect('>')?;
        Ok(inner)
    }
}
