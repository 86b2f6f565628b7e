//! Unified error types for graph-delta.
//!
//! This module provides the error hierarchy for the library. Every failure of
//! classification, dispatch, diffing or (de)serialization surfaces here with
//! a context chain describing where it happened.

use crate::metamodel::TypeCategory;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for graph-delta operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GraphDeltaError {
    /// Errors while building or querying the metamodel
    #[error("Metamodel error: {context}")]
    Metamodel {
        context: String,
        #[source]
        source: MetamodelErrorKind,
    },

    /// Errors while building or using the appender registry
    #[error("Appender dispatch failed: {context}")]
    Dispatch {
        context: String,
        #[source]
        source: DispatchErrorKind,
    },

    /// Errors during diff computation
    #[error("Diff computation failed: {context}")]
    Diff {
        context: String,
        #[source]
        source: DiffErrorKind,
    },

    /// Errors while encoding or decoding change documents
    #[error("Change codec failed: {context}")]
    Codec {
        context: String,
        #[source]
        source: CodecErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific metamodel error kinds
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MetamodelErrorKind {
    #[error("Unresolvable type '{declared}': {reason}")]
    UnresolvableType { declared: String, reason: String },

    #[error("Invalid type syntax '{text}': {reason}")]
    InvalidTypeSyntax { text: String, reason: String },

    #[error("Entity '{class}' declares an empty id property name")]
    EmptyIdProperty { class: String },

    #[error("Entity '{class}' has no id property{}", .property.as_ref().map(|p| format!(" named '{p}'")).unwrap_or_default())]
    MissingIdProperty {
        class: String,
        property: Option<String>,
    },

    #[error("Id property '{class}.{property}' must be a scalar, found '{declared}'")]
    InvalidIdType {
        class: String,
        property: String,
        declared: String,
    },

    #[error("Unknown managed class: {0}")]
    UnknownClass(String),

    #[error("Managed class '{0}' is defined more than once")]
    DuplicateClass(String),

    #[error("Property '{class}.{property}' is declared more than once")]
    DuplicateProperty { class: String, property: String },
}

/// Specific dispatch error kinds
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DispatchErrorKind {
    #[error("No appender registered for {0} properties")]
    NoAppenderRegistered(TypeCategory),

    #[error("Appender '{rejected}' conflicts with '{existing}' for {category} properties")]
    DuplicateAppenderRegistration {
        category: TypeCategory,
        existing: String,
        rejected: String,
    },
}

/// Specific diff error kinds
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DiffErrorKind {
    #[error("{appender} cannot compare property '{property}': {reason}")]
    NotImplemented {
        appender: String,
        property: String,
        reason: String,
    },

    #[error("Node pair invariant violated: {0}")]
    PairMismatch(String),

    #[error("Value of property '{property}' does not match its declared type '{declared}'")]
    ValueShape { property: String, declared: String },
}

/// Specific codec error kinds
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CodecErrorKind {
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Unsupported change variant: {0}")]
    UnsupportedVariant(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for graph-delta operations
pub type Result<T> = std::result::Result<T, GraphDeltaError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl GraphDeltaError {
    /// Create a metamodel error with context
    pub fn metamodel(context: impl Into<String>, source: MetamodelErrorKind) -> Self {
        Self::Metamodel {
            context: context.into(),
            source,
        }
    }

    /// Create an unresolvable type error
    pub fn unresolvable_type(declared: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::metamodel(
            "type classification",
            MetamodelErrorKind::UnresolvableType {
                declared: declared.into(),
                reason: reason.into(),
            },
        )
    }

    /// Create a dispatch error with context
    pub fn dispatch(context: impl Into<String>, source: DispatchErrorKind) -> Self {
        Self::Dispatch {
            context: context.into(),
            source,
        }
    }

    /// Create a diff error with context
    pub fn diff(context: impl Into<String>, source: DiffErrorKind) -> Self {
        Self::Diff {
            context: context.into(),
            source,
        }
    }

    /// Create a not-implemented error for an appender that cannot compare a property
    pub fn not_implemented(
        appender: impl Into<String>,
        property: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::diff(
            "comparing property",
            DiffErrorKind::NotImplemented {
                appender: appender.into(),
                property: property.into(),
                reason: reason.into(),
            },
        )
    }

    /// Create a codec error with context
    pub fn codec(context: impl Into<String>, source: CodecErrorKind) -> Self {
        Self::Codec {
            context: context.into(),
            source,
        }
    }

    /// Create a malformed document error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::codec(
            "decoding document",
            CodecErrorKind::MalformedDocument(message.into()),
        )
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether this error reports a declared type that could not be classified.
    #[must_use]
    pub const fn is_unresolvable_type(&self) -> bool {
        matches!(
            self,
            Self::Metamodel {
                source: MetamodelErrorKind::UnresolvableType { .. },
                ..
            }
        )
    }

    /// Whether this error reports an appender that cannot compare a property.
    #[must_use]
    pub const fn is_not_implemented(&self) -> bool {
        matches!(
            self,
            Self::Diff {
                source: DiffErrorKind::NotImplemented { .. },
                ..
            }
        )
    }

    /// Whether this error reports a document that is missing or mistypes a field.
    #[must_use]
    pub const fn is_malformed_document(&self) -> bool {
        matches!(
            self,
            Self::Codec {
                source: CodecErrorKind::MalformedDocument(_),
                ..
            }
        )
    }

    /// Whether this error reports an unknown change discriminator.
    #[must_use]
    pub const fn is_unsupported_variant(&self) -> bool {
        matches!(
            self,
            Self::Codec {
                source: CodecErrorKind::UnsupportedVariant(_),
                ..
            }
        )
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for GraphDeltaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for GraphDeltaError {
    fn from(err: serde_json::Error) -> Self {
        Self::codec(
            "JSON deserialization",
            CodecErrorKind::MalformedDocument(err.to_string()),
        )
    }
}

impl From<serde_yaml::Error> for GraphDeltaError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config(format!("YAML deserialization: {err}"))
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The context string is prepended to the error's existing context, so a
/// failure deep inside the codec reads like
/// `"decoding change #3: property 'tags': expected array"`.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure (lazy evaluation).
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<GraphDeltaError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: GraphDeltaError, new_ctx: &str) -> GraphDeltaError {
    match err {
        GraphDeltaError::Metamodel {
            context: existing,
            source,
        } => GraphDeltaError::Metamodel {
            context: chain_context(new_ctx, &existing),
            source,
        },
        GraphDeltaError::Dispatch {
            context: existing,
            source,
        } => GraphDeltaError::Dispatch {
            context: chain_context(new_ctx, &existing),
            source,
        },
        GraphDeltaError::Diff {
            context: existing,
            source,
        } => GraphDeltaError::Diff {
            context: chain_context(new_ctx, &existing),
            source,
        },
        GraphDeltaError::Codec {
            context: existing,
            source,
        } => GraphDeltaError::Codec {
            context: chain_context(new_ctx, &existing),
            source,
        },
        GraphDeltaError::Io {
            path,
            message,
            source,
        } => GraphDeltaError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        GraphDeltaError::Config(msg) => GraphDeltaError::Config(chain_context(new_ctx, &msg)),
        GraphDeltaError::Validation(msg) => {
            GraphDeltaError::Validation(chain_context(new_ctx, &msg))
        }
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GraphDeltaError::unresolvable_type("list<list<int>>", "nested collection");
        let display = err.to_string();
        assert!(
            display.contains("Metamodel") && display.contains("type classification"),
            "Error message should mention metamodel classification: {}",
            display
        );
        assert!(err.is_unresolvable_type());

        let err = GraphDeltaError::malformed("missing field 'globalId'");
        assert!(err.is_malformed_document());
        assert!(!err.is_unsupported_variant());
    }

    #[test]
    fn test_kind_display() {
        let kind = DispatchErrorKind::NoAppenderRegistered(TypeCategory::Map);
        assert_eq!(kind.to_string(), "No appender registered for Map properties");

        let kind = MetamodelErrorKind::MissingIdProperty {
            class: "Person".to_string(),
            property: Some("login".to_string()),
        };
        assert_eq!(kind.to_string(), "Entity 'Person' has no id property named 'login'");

        let kind = MetamodelErrorKind::MissingIdProperty {
            class: "Person".to_string(),
            property: None,
        };
        assert_eq!(kind.to_string(), "Entity 'Person' has no id property");
    }

    #[test]
    fn test_error_chain() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = GraphDeltaError::io("/path/to/schema.yaml", io_err);

        assert!(err.to_string().contains("/path/to/schema.yaml"));
    }

    #[test]
    fn test_context_chaining() {
        let initial_err: Result<()> = Err(GraphDeltaError::codec(
            "initial context",
            CodecErrorKind::UnsupportedVariant("Bogus".to_string()),
        ));

        let err_with_context = initial_err.context("outer context");

        match err_with_context {
            Err(GraphDeltaError::Codec { context, source }) => {
                assert_eq!(context, "outer context: initial context");
                assert_eq!(source, CodecErrorKind::UnsupportedVariant("Bogus".to_string()));
            }
            _ => panic!("Expected Codec error"),
        }
    }

    #[test]
    fn test_context_chaining_multiple_levels() {
        fn inner() -> Result<()> {
            Err(GraphDeltaError::not_implemented("MapChangeAppender", "scores", "nested"))
        }

        fn middle() -> Result<()> {
            inner().context("middle layer")
        }

        fn outer() -> Result<()> {
            middle().context("outer layer")
        }

        let result = outer();
        match result {
            Err(ref err @ GraphDeltaError::Diff { ref context, .. }) => {
                assert!(err.is_not_implemented());
                assert_eq!(context, "outer layer: middle layer: comparing property");
            }
            _ => panic!("Expected Diff error"),
        }
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;

        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called, "Closure should not be called for Ok result");

        let err_result: Result<i32> = Err(GraphDeltaError::validation("error"));
        let _ = err_result.with_context(|| {
            called = true;
            "should be called"
        });
        assert!(called, "Closure should be called for Err result");
    }

    #[test]
    fn test_chain_context_helper() {
        assert_eq!(chain_context("new", ""), "new");
        assert_eq!(chain_context("new", "existing"), "new: existing");
        assert_eq!(
            chain_context("outer", "middle: inner"),
            "outer: middle: inner"
        );
    }
}
