//! Change records produced by the diff engine.
//!
//! The taxonomy is closed: [`ChangeKind`] lists every kind of difference the
//! engine can report. New kinds are added as a variant plus the matching
//! arms in the appenders and the codec.

mod change;
mod metadata;

pub use change::{Change, ChangeKind, EntryChange};
pub use metadata::{CommitId, CommitMetadata};
