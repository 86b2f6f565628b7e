//! JSON encoding and decoding of change records.
//!
//! A change document names its variant in `changeType`, its owner in
//! `globalId`, and carries variant-specific payload fields:
//!
//! ```json
//! {
//!   "changeType": "ValueChange",
//!   "globalId": { "entity": "Person", "cdoId": "1" },
//!   "property": "age",
//!   "left": 10,
//!   "right": 11,
//!   "commitMetadata": { "author": "ops", "properties": {}, "commitDate": "2024-05-01T12:00:00Z", "id": "1.0" }
//! }
//! ```
//!
//! Payloads are typed by the declared type of the property they belong to,
//! which the codec resolves through a
//! [`MetadataSource`](crate::metamodel::MetadataSource) before decoding.
//! Snapshot input for the diff engine goes through the same value codec
//! ([`decode_pairs`]).

mod change;
mod pairs;
mod value;

pub use change::{ChangeCodec, CHANGE_TYPES};
pub use pairs::decode_pairs;
pub use value::ValueCodec;
