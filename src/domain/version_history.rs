//! Version history as published by a registry
//!
//! This module provides:
//! - VersionHistory: the registry's version -> publish-timestamp mapping
//! - VersionInfo: one history entry with its parsed publish instant
//! - PackageMetadata: the slice of registry metadata the resolver reads

use super::timestamp::{parse_timestamp, Instant};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Mapping from version string to publish-timestamp string
///
/// Keys are taken as-is from the registry, so they include markers such
/// as `created` and `modified` that are not versions. Non-string values
/// (npm's `unpublished` record) are dropped while deserializing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "IndexMap<String, Value>",
    into = "IndexMap<String, String>"
)]
pub struct VersionHistory(IndexMap<String, String>);

impl VersionHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry (builder style)
    pub fn with(mut self, version: impl Into<String>, timestamp: impl Into<String>) -> Self {
        self.insert(version, timestamp);
        self
    }

    /// Add or replace an entry
    pub fn insert(&mut self, version: impl Into<String>, timestamp: impl Into<String>) {
        self.0.insert(version.into(), timestamp.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over (key, timestamp) pairs in registry order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries published at or before `cutoff`
    ///
    /// Equality is inclusive. Entries whose timestamp does not parse cannot
    /// be shown to predate the cutoff and are left out.
    pub fn published_by(&self, cutoff: Instant) -> Vec<VersionInfo> {
        self.iter()
            .filter_map(|(version, timestamp)| match parse_timestamp(timestamp) {
                Ok(released_at) => Some(VersionInfo::new(version, released_at)),
                Err(_) => {
                    warn!(version, timestamp, "ignoring history entry with unparseable timestamp");
                    None
                }
            })
            .filter(|info| info.released_at <= cutoff)
            .collect()
    }
}

impl From<IndexMap<String, Value>> for VersionHistory {
    fn from(raw: IndexMap<String, Value>) -> Self {
        raw.into_iter()
            .filter_map(|(key, value)| match value {
                Value::String(timestamp) => Some((key, timestamp)),
                _ => {
                    debug!(key = %key, "skipping non-string history entry");
                    None
                }
            })
            .collect()
    }
}

impl From<VersionHistory> for IndexMap<String, String> {
    fn from(history: VersionHistory) -> Self {
        history.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VersionHistory {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A history entry with its publish instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    /// The history key (e.g., "1.2.3" or "created")
    pub version: String,
    /// When this entry was published
    pub released_at: Instant,
}

impl VersionInfo {
    /// Create a new VersionInfo
    pub fn new(version: impl Into<String>, released_at: Instant) -> Self {
        Self {
            version: version.into(),
            released_at,
        }
    }
}

/// Registry metadata for one package
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PackageMetadata {
    /// Package name as reported by the registry
    #[serde(default)]
    pub name: String,
    /// Version publish times (npm's `time` field)
    #[serde(default)]
    pub time: VersionHistory,
}

impl PackageMetadata {
    /// Create metadata from a name and history
    pub fn new(name: impl Into<String>, time: VersionHistory) -> Self {
        Self {
            name: name.into(),
            time,
        }
    }
}
