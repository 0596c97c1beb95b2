//! Point-in-time version resolution
//!
//! Given a package, a range and a cutoff, pick the highest version that
//! satisfies the range among versions published at or before the cutoff:
//! parse cutoff -> fetch history -> keep extant entries -> keep valid
//! versions -> highest satisfying.

use crate::config::ResolverConfig;
use crate::domain::{Instant, VersionHistory};
use crate::error::{RegistryError, ResolveError};
use crate::range::{NpmVersionMatcher, VersionMatcher};
use crate::registry::{FetchOptions, HttpClient, NpmRegistry, PackageRegistry};
use std::sync::Arc;
use tracing::debug;

/// Resolves ranges against a registry's history as of a cutoff
#[derive(Clone)]
pub struct VersionResolver {
    registry: Arc<dyn PackageRegistry>,
    matcher: Arc<dyn VersionMatcher>,
    options: FetchOptions,
}

impl VersionResolver {
    /// Create a resolver over `registry` with npm range rules
    pub fn new(registry: Arc<dyn PackageRegistry>) -> Self {
        Self {
            registry,
            matcher: Arc::new(NpmVersionMatcher),
            options: FetchOptions::default(),
        }
    }

    /// Create a resolver for the npm registry described by `config`
    pub fn from_config(config: &ResolverConfig) -> Result<Self, RegistryError> {
        let client = HttpClient::new()?.with_max_retries(config.max_retries);
        let registry = NpmRegistry::with_base_url(client, &config.registry_url);
        Ok(Self::new(Arc::new(registry)).with_options(config.fetch_options()))
    }

    /// Replace the range matcher
    pub fn with_matcher(mut self, matcher: Arc<dyn VersionMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    /// Replace the per-query fetch options
    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolve `name@range` as of `timestamp`
    ///
    /// Fails with `InvalidTimestamp` before touching the registry when the
    /// cutoff does not parse. `Ok(None)` means no extant version matched.
    pub async fn resolve(
        &self,
        name: &str,
        range: &str,
        timestamp: &str,
    ) -> Result<Option<String>, ResolveError> {
        let cutoff = Instant::parse(timestamp)?;
        self.resolve_at(name, range, cutoff).await
    }

    /// Resolve `name@range` as of an already parsed cutoff
    pub async fn resolve_at(
        &self,
        name: &str,
        range: &str,
        cutoff: Instant,
    ) -> Result<Option<String>, ResolveError> {
        let metadata = self.registry.fetch_package(name, self.options).await?;
        let resolved = select_version(&metadata.time, range, cutoff, self.matcher.as_ref());

        debug!(
            package = name,
            range,
            %cutoff,
            resolved = resolved.as_deref().unwrap_or("null"),
            "resolved dependency"
        );
        Ok(resolved)
    }
}

/// Pick the highest version in `history` satisfying `range` as of `cutoff`
pub fn select_version(
    history: &VersionHistory,
    range: &str,
    cutoff: Instant,
    matcher: &dyn VersionMatcher,
) -> Option<String> {
    let extant = history.published_by(cutoff);
    let candidates: Vec<&str> = extant
        .iter()
        .map(|info| info.version.as_str())
        .filter(|version| matcher.is_valid_version(version))
        .collect();

    debug!(
        entries = history.len(),
        extant = extant.len(),
        candidates = candidates.len(),
        "filtered version history"
    );

    matcher
        .max_satisfying(&candidates, range)
        .map(str::to_string)
}
