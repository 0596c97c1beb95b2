//! Pin a manifest's dependency ranges to exact versions as of a cutoff
//!
//! Groups are processed one at a time in the fixed group order. Within a
//! group, lookups run concurrently; the pinned group keeps the input's
//! key order regardless of completion order.

use crate::config::DEFAULT_CONCURRENCY;
use crate::domain::{
    DependencyGroup, DependencyGroupKind, Instant, ManifestLike, PinnedDependencyGroup,
    PinnedManifest,
};
use crate::error::ResolveError;
use crate::resolver::VersionResolver;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

/// A single range that was replaced while pinning
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinChange {
    pub group: DependencyGroupKind,
    pub name: String,
    pub range: String,
    pub pinned: Option<String>,
}

impl PinChange {
    /// Whether the range already named the version it was pinned to
    pub fn is_unchanged(&self) -> bool {
        self.pinned.as_deref() == Some(self.range.as_str())
    }
}

/// Rewrites dependency groups to the versions that were current at a cutoff
pub struct ManifestPinner {
    resolver: VersionResolver,
    concurrency: usize,
}

impl ManifestPinner {
    /// Create a pinner with the default concurrency
    pub fn new(resolver: VersionResolver) -> Self {
        Self {
            resolver,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Limit the number of registry queries in flight (minimum 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Pin every recognized group of `manifest` as of `timestamp`
    ///
    /// Absent groups stay absent and passthrough fields are copied as-is.
    /// The first failing lookup aborts the whole operation.
    pub async fn pin(
        &self,
        manifest: &ManifestLike,
        timestamp: &str,
    ) -> Result<PinnedManifest, ResolveError> {
        let cutoff = Instant::parse(timestamp)?;
        info!(%cutoff, "pinning manifest");

        let mut pinned: PinnedManifest = manifest.passthrough();
        for (kind, group) in manifest.groups() {
            let resolved = self.pin_group(kind, group, cutoff).await?;
            pinned.set_group(kind, Some(resolved));
        }
        Ok(pinned)
    }

    async fn pin_group(
        &self,
        kind: DependencyGroupKind,
        group: &DependencyGroup,
        cutoff: Instant,
    ) -> Result<PinnedDependencyGroup, ResolveError> {
        debug!(group = %kind, count = group.len(), "pinning group");

        let mut resolved: HashMap<&str, Option<String>> = stream::iter(group.iter())
            .map(|(name, range)| async move {
                let version = self.resolver.resolve_at(name, range, cutoff).await?;
                Ok::<_, ResolveError>((name.as_str(), version))
            })
            .buffer_unordered(self.concurrency)
            .try_collect()
            .await?;

        Ok(group
            .keys()
            .map(|name| {
                let version = resolved.remove(name.as_str()).flatten();
                (name.clone(), version)
            })
            .collect())
    }
}

/// List what pinning changed, group by group in processing order
pub fn pin_changes(original: &ManifestLike, pinned: &PinnedManifest) -> Vec<PinChange> {
    let mut changes = Vec::new();
    for (kind, group) in original.groups() {
        let Some(pinned_group) = pinned.group(kind) else {
            continue;
        };
        for (name, range) in group {
            changes.push(PinChange {
                group: kind,
                name: name.clone(),
                range: range.clone(),
                pinned: pinned_group.get(name).cloned().flatten(),
            });
        }
    }
    changes
}
