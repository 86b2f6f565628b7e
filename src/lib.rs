//! **Property-level diffing of object graphs with typed change documents.**
//!
//! `graph-delta` compares two snapshots of the same managed objects and
//! reports what changed, property by property, as a closed taxonomy of
//! change records. Those records round-trip through a JSON wire format that
//! is typed by the same metamodel that drove the comparison.
//!
//! ## Core Concepts & Modules
//!
//! - **[`metamodel`]**: managed classes (entities and value objects), their
//!   properties, and the [`TypeMapper`] that classifies every property into a
//!   [`TypeCategory`](metamodel::TypeCategory).
//! - **[`diff`]**: the [`DiffEngine`], which walks matched [`NodePair`]s and
//!   dispatches each property to the appender registered for its category.
//! - **[`changes`]**: the [`Change`] records and optional
//!   [`CommitMetadata`](changes::CommitMetadata).
//! - **[`codec`]**: the [`ChangeCodec`], which encodes changes as JSON
//!   documents and decodes them strictly against the metamodel.
//! - **[`reports`]**, **[`pipeline`]**, **[`config`]** and **[`cli`]**: the
//!   command line tool built on top.
//!
//! ## Getting Started
//!
//! ```
//! use graph_delta::codec::ChangeCodec;
//! use graph_delta::metamodel::{MetadataSource, NodePair, ObjectNode, GlobalId, Value};
//! use graph_delta::{DiffEngine, TypeMapper};
//!
//! let mapper = TypeMapper::from_yaml_str(r#"
//! classes:
//!   - name: Person
//!     kind: entity
//!     properties:
//!       - { name: id, type: int }
//!       - { name: tags, type: "list<string>" }
//! "#)?;
//!
//! let id = GlobalId::instance("Person", "1");
//! let left = ObjectNode::new(id.clone())
//!     .with_value("id", 1_i64)
//!     .with_value("tags", Value::list([Value::from("a"), Value::from("b")]));
//! let right = ObjectNode::new(id.clone())
//!     .with_value("id", 1_i64)
//!     .with_value("tags", Value::list([Value::from("b"), Value::from("c")]));
//! let pair = NodePair::new(mapper.managed_class("Person")?, id, Some(left), Some(right))?;
//!
//! let diff = DiffEngine::new().diff([pair], &mapper)?;
//! assert_eq!(diff.len(), 2);
//!
//! let codec = ChangeCodec::new(&mapper);
//! let documents = codec.encode_all(&diff.changes, None)?;
//! assert_eq!(codec.decode_all(&documents)?, diff.changes);
//! # Ok::<(), graph_delta::GraphDeltaError>(())
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::needless_pass_by_value
)]

pub mod changes;
pub mod cli;
pub mod codec;
pub mod config;
pub mod diff;
pub mod error;
pub mod metamodel;
pub mod pipeline;
pub mod reports;

// Re-export main types for convenience
pub use changes::{Change, ChangeKind, CommitId, CommitMetadata, EntryChange};
pub use codec::{ChangeCodec, ValueCodec};
pub use config::{AppConfig, AppConfigBuilder, ConfigPreset, EngineConfig};
pub use config::{ConfigError, Validatable};
pub use diff::{AppenderRegistry, Diff, DiffEngine, DiffSummary, PropertyChangeAppender};
pub use error::{ErrorContext, GraphDeltaError, Result};
pub use metamodel::{
    GlobalId, ManagedClass, MetadataSource, NodePair, ObjectNode, Property, TypeCategory,
    TypeMapper, Value,
};
pub use reports::{ReportFormat, ReportGenerator};
