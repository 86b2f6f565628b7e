//! Property-level diff engine.
//!
//! # Architecture
//!
//! The diff system is built on traits for extensibility:
//!
//! - [`PropertyChangeAppender`](traits::PropertyChangeAppender): compares one
//!   category of property
//! - [`AppenderRegistry`]: exactly one appender per
//!   [`TypeCategory`](crate::metamodel::TypeCategory), checked when built
//! - [`DiffEngine`]: walks node pairs property by property and dispatches
//!
//! # Example
//!
//! ```ignore
//! use graph_delta::diff::DiffEngine;
//!
//! let engine = DiffEngine::new();
//! let diff = engine.diff(pairs, &mapper)?;
//! for change in &diff.changes {
//!     println!("{change}");
//! }
//! ```

pub mod appenders;
mod engine;
mod registry;
mod result;
pub mod traits;

pub use appenders::{
    CollectionChangeAppender, MapChangeAppender, ReferenceChangeAppender, ValueChangeAppender,
};
pub use engine::DiffEngine;
pub use registry::{AppenderRegistry, AppenderRegistryBuilder};
pub use result::{Diff, DiffSummary};
pub use traits::PropertyChangeAppender;
