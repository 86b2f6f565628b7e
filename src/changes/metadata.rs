//! Commit metadata attached to persisted changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Version id of a commit, rendered as `major.minor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommitId {
    pub major: u64,
    pub minor: u32,
}

impl CommitId {
    #[must_use]
    pub const fn new(major: u64, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for CommitId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (major, minor) = s.split_once('.').unwrap_or((s, "0"));
        let major = major
            .parse()
            .map_err(|e| format!("invalid commit id '{s}': {e}"))?;
        let minor = minor
            .parse()
            .map_err(|e| format!("invalid commit id '{s}': {e}"))?;
        Ok(Self { major, minor })
    }
}

impl TryFrom<String> for CommitId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CommitId> for String {
    fn from(value: CommitId) -> Self {
        value.to_string()
    }
}

/// Provenance of a change: who committed it, when, and under which version.
///
/// Opaque to the diff engine; only attached when changes are persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitMetadata {
    pub author: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    pub commit_date: DateTime<Utc>,
    pub id: CommitId,
}

impl CommitMetadata {
    pub fn new(author: impl Into<String>, commit_date: DateTime<Utc>, id: CommitId) -> Self {
        Self {
            author: author.into(),
            properties: BTreeMap::new(),
            commit_date,
            id,
        }
    }

    /// Add a free-form commit property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}
