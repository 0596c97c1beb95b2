//! Registry adapters for fetching package version history
//!
//! This module provides:
//! - HTTP client shared foundation with timeout and retry logic
//! - npm Registry adapter
//! - Per-request fetch options (timeout, staleness tolerance)

mod client;
mod npm;

pub use client::{HttpClient, RequestContext, DEFAULT_MAX_RETRIES};
pub use npm::{NpmRegistry, NPM_REGISTRY_URL};

use crate::domain::PackageMetadata;
use crate::error::RegistryError;
use async_trait::async_trait;
use std::time::Duration;

#[cfg(test)]
use mockall::automock;

/// Default per-request timeout
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Options attached to a single registry query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Per-request timeout; exceeding it fails the query with `Timeout`
    pub timeout: Duration,
    /// Whether cached (possibly stale) responses are acceptable
    pub stale_ok: bool,
    /// Request the full metadata document (includes publish times)
    pub full_metadata: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_FETCH_TIMEOUT,
            stale_ok: true,
            full_metadata: true,
        }
    }
}

impl FetchOptions {
    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set whether stale responses are acceptable
    pub fn with_stale_ok(mut self, stale_ok: bool) -> Self {
        self.stale_ok = stale_ok;
        self
    }
}

/// Trait for registries that can report a package's version history
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PackageRegistry: Send + Sync {
    /// Get the registry name
    fn registry_name(&self) -> &'static str;

    /// Fetch a package's metadata, including its version history
    async fn fetch_package(
        &self,
        package: &str,
        options: FetchOptions,
    ) -> Result<PackageMetadata, RegistryError>;
}
