//! Core domain models for timepin
//!
//! This module contains the fundamental types used throughout the crate:
//! - Instants and timestamp parsing
//! - Dependency specs (`name@range` tokens)
//! - Registry version history
//! - Manifest dependency groups, before and after pinning

mod manifest;
mod spec;
mod timestamp;
mod version_history;

pub use manifest::{
    DependencyGroup, DependencyGroupKind, ManifestLike, PinnedDependencyGroup, PinnedManifest,
};
pub use spec::{DependencySpec, ANY_RANGE};
pub use timestamp::{parse_timestamp, Instant};
pub use version_history::{PackageMetadata, VersionHistory, VersionInfo};
