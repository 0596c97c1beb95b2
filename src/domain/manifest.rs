//! Manifest-like structures with dependency groups
//!
//! A manifest is modelled as the five recognized dependency groups plus
//! an open bag of every other field. The bag is copied through untouched,
//! and serialization writes every field back at the position it was read.

use super::spec::ANY_RANGE;
use crate::error::ManifestError;
use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Package name -> version range
pub type DependencyGroup = IndexMap<String, String>;

/// Package name -> pinned exact version (`None` when nothing satisfied the range)
pub type PinnedDependencyGroup = IndexMap<String, Option<String>>;

/// A manifest whose groups have been pinned
pub type PinnedManifest = ManifestLike<PinnedDependencyGroup>;

/// The recognized dependency group keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyGroupKind {
    Dependencies,
    DevDependencies,
    PeerDependencies,
    BundledDependencies,
    OptionalDependencies,
}

impl DependencyGroupKind {
    /// All groups, in processing order
    pub const ALL: [DependencyGroupKind; 5] = [
        DependencyGroupKind::Dependencies,
        DependencyGroupKind::DevDependencies,
        DependencyGroupKind::PeerDependencies,
        DependencyGroupKind::BundledDependencies,
        DependencyGroupKind::OptionalDependencies,
    ];

    /// The manifest key for this group
    pub fn key(&self) -> &'static str {
        match self {
            DependencyGroupKind::Dependencies => "dependencies",
            DependencyGroupKind::DevDependencies => "devDependencies",
            DependencyGroupKind::PeerDependencies => "peerDependencies",
            DependencyGroupKind::BundledDependencies => "bundledDependencies",
            DependencyGroupKind::OptionalDependencies => "optionalDependencies",
        }
    }

    /// Look up a group by its manifest key
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

impl fmt::Display for DependencyGroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Dependency groups plus passthrough fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManifestLike<G = DependencyGroup> {
    pub dependencies: Option<G>,
    pub dev_dependencies: Option<G>,
    pub peer_dependencies: Option<G>,
    pub bundled_dependencies: Option<G>,
    pub optional_dependencies: Option<G>,
    /// Every field that is not a recognized group
    pub other: Map<String, Value>,
    /// Top-level keys in the order they were read
    key_order: Vec<String>,
}

impl<G> ManifestLike<G> {
    /// A manifest carrying only passthrough fields
    pub fn with_other(other: Map<String, Value>) -> Self {
        Self {
            dependencies: None,
            dev_dependencies: None,
            peer_dependencies: None,
            bundled_dependencies: None,
            optional_dependencies: None,
            other,
            key_order: Vec::new(),
        }
    }

    /// The passthrough fields and field layout of this manifest, with no groups
    pub fn passthrough<H>(&self) -> ManifestLike<H> {
        ManifestLike {
            key_order: self.key_order.clone(),
            ..ManifestLike::with_other(self.other.clone())
        }
    }

    /// Borrow a group if present
    pub fn group(&self, kind: DependencyGroupKind) -> Option<&G> {
        match kind {
            DependencyGroupKind::Dependencies => self.dependencies.as_ref(),
            DependencyGroupKind::DevDependencies => self.dev_dependencies.as_ref(),
            DependencyGroupKind::PeerDependencies => self.peer_dependencies.as_ref(),
            DependencyGroupKind::BundledDependencies => self.bundled_dependencies.as_ref(),
            DependencyGroupKind::OptionalDependencies => self.optional_dependencies.as_ref(),
        }
    }

    /// Replace (or clear) a group
    pub fn set_group(&mut self, kind: DependencyGroupKind, group: Option<G>) {
        let slot = match kind {
            DependencyGroupKind::Dependencies => &mut self.dependencies,
            DependencyGroupKind::DevDependencies => &mut self.dev_dependencies,
            DependencyGroupKind::PeerDependencies => &mut self.peer_dependencies,
            DependencyGroupKind::BundledDependencies => &mut self.bundled_dependencies,
            DependencyGroupKind::OptionalDependencies => &mut self.optional_dependencies,
        };
        *slot = group;
    }

    /// Present groups in processing order
    pub fn groups(&self) -> impl Iterator<Item = (DependencyGroupKind, &G)> {
        DependencyGroupKind::ALL
            .into_iter()
            .filter_map(|kind| self.group(kind).map(|group| (kind, group)))
    }
}

impl ManifestLike<DependencyGroup> {
    /// Build a manifest from a parsed JSON object
    pub fn from_value(value: Value) -> Result<Self, ManifestError> {
        let Value::Object(mut fields) = value else {
            return Err(ManifestError::invalid_group(
                "<root>",
                "manifest must be a JSON object",
            ));
        };

        let key_order = fields.keys().cloned().collect();
        let mut groups = Vec::new();
        for kind in DependencyGroupKind::ALL {
            if let Some(raw) = fields.shift_remove(kind.key()) {
                groups.push((kind, parse_group(kind, raw)?));
            }
        }

        let mut manifest = Self::with_other(fields);
        manifest.key_order = key_order;
        for (kind, group) in groups {
            manifest.set_group(kind, Some(group));
        }
        Ok(manifest)
    }
}

impl<G: Serialize> ManifestLike<G> {
    /// Serialize back into a JSON value
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Fields in output order: the read layout first, then groups and
    /// passthrough fields the layout does not mention
    fn ordered_fields(&self) -> Vec<(&str, Field<'_, G>)> {
        let known: HashSet<&str> = self.key_order.iter().map(String::as_str).collect();
        let mut fields = Vec::new();

        for key in &self.key_order {
            let field = match DependencyGroupKind::from_key(key) {
                Some(kind) => self.group(kind).map(Field::Group),
                None => self.other.get(key).map(Field::Other),
            };
            if let Some(field) = field {
                fields.push((key.as_str(), field));
            }
        }
        for (kind, group) in self.groups() {
            if !known.contains(kind.key()) {
                fields.push((kind.key(), Field::Group(group)));
            }
        }
        for (key, value) in &self.other {
            if !known.contains(key.as_str()) {
                fields.push((key.as_str(), Field::Other(value)));
            }
        }
        fields
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum Field<'a, G> {
    Group(&'a G),
    Other(&'a Value),
}

impl<G: Serialize> Serialize for ManifestLike<G> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = self.ordered_fields();
        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for (key, field) in fields {
            map.serialize_entry(key, &field)?;
        }
        map.end()
    }
}

impl TryFrom<Value> for ManifestLike<DependencyGroup> {
    type Error = ManifestError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

fn parse_group(kind: DependencyGroupKind, raw: Value) -> Result<DependencyGroup, ManifestError> {
    let Value::Object(entries) = raw else {
        return Err(ManifestError::invalid_group(
            kind.key(),
            "expected an object mapping package names to ranges",
        ));
    };

    entries
        .into_iter()
        .map(|(name, range)| match range {
            Value::String(range) => Ok((name, range)),
            Value::Null => {
                debug!(group = %kind, package = %name, "null range read as '*'");
                Ok((name, ANY_RANGE.to_string()))
            }
            other => Err(ManifestError::invalid_group(
                kind.key(),
                format!("range for '{}' must be a string, found {}", name, other),
            )),
        })
        .collect()
}
