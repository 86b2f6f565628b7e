//! Built-in property change appenders.
//!
//! One appender per [`TypeCategory`](crate::metamodel::TypeCategory):
//! primitives and value objects by equality, entity references by identity,
//! collections as multisets and maps entry by entry.

mod collection;
mod map;
mod reference;
mod value;

pub use collection::CollectionChangeAppender;
pub use map::MapChangeAppender;
pub use reference::ReferenceChangeAppender;
pub use value::ValueChangeAppender;

use crate::error::{DiffErrorKind, GraphDeltaError};
use crate::metamodel::Property;

/// Error for a stored value that does not fit the property's declared type.
fn value_shape(property: &Property) -> GraphDeltaError {
    GraphDeltaError::diff(
        format!("comparing property '{}'", property.name()),
        DiffErrorKind::ValueShape {
            property: property.name().to_string(),
            declared: property.declared_type().to_string(),
        },
    )
}
