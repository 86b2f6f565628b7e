//! Trait definitions for property comparison strategies.
//!
//! Each [`PropertyChangeAppender`] knows how to compare one category of
//! property. The [`AppenderRegistry`](super::AppenderRegistry) picks exactly
//! one appender per category.

use crate::changes::Change;
use crate::error::Result;
use crate::metamodel::{MetadataSource, NodePair, Property, TypeCategory};

/// Trait for computing the changes of one property of a node pair.
///
/// Implementors must be stateless with respect to a single diff run so the
/// engine can share them across threads.
pub trait PropertyChangeAppender: Send + Sync {
    /// The category of property this appender compares.
    fn supported_category(&self) -> TypeCategory;

    /// Compare the old and new value of `property` in `pair`.
    ///
    /// Returns an empty vector when the values are equal. Fails with a
    /// not-implemented error for declared shapes the appender cannot compare.
    fn calculate_changes(
        &self,
        pair: &NodePair,
        property: &Property,
        metadata: &dyn MetadataSource,
    ) -> Result<Vec<Change>>;

    /// Get the name of this appender for logging/debugging.
    fn name(&self) -> &str;
}
