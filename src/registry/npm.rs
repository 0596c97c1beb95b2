//! npm Registry adapter
//!
//! Fetches full package metadata (including the `time` map) from the npm
//! registry. API endpoint: {registry}/{package}

use crate::domain::PackageMetadata;
use crate::error::RegistryError;
use crate::registry::client::RequestContext;
use crate::registry::{FetchOptions, HttpClient, PackageRegistry};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CACHE_CONTROL};
use tracing::debug;

/// npm registry base URL
pub const NPM_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Full metadata document media type
const FULL_METADATA: &str = "application/json";

/// Abbreviated install metadata media type (no per-version publish times)
const ABBREVIATED_METADATA: &str = "application/vnd.npm.install-v1+json";

/// npm Registry adapter
pub struct NpmRegistry {
    client: HttpClient,
    base_url: String,
}

impl NpmRegistry {
    /// Create an adapter for the public npm registry
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, NPM_REGISTRY_URL)
    }

    /// Create an adapter for a registry mirror or test server
    pub fn with_base_url(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build the URL for a package
    ///
    /// Scoped names are sent as `@scope%2Fname`.
    fn build_url(&self, package: &str) -> String {
        let encoded = if package.starts_with('@') {
            package.replace('/', "%2F")
        } else {
            package.to_string()
        };
        format!("{}/{}", self.base_url, encoded)
    }

    fn headers(options: &FetchOptions) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let accept = if options.full_metadata {
            FULL_METADATA
        } else {
            ABBREVIATED_METADATA
        };
        headers.insert(ACCEPT, HeaderValue::from_static(accept));
        if !options.stale_ok {
            headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        }
        headers
    }
}

#[async_trait]
impl PackageRegistry for NpmRegistry {
    fn registry_name(&self) -> &'static str {
        "npm"
    }

    async fn fetch_package(
        &self,
        package: &str,
        options: FetchOptions,
    ) -> Result<PackageMetadata, RegistryError> {
        let url = self.build_url(package);
        let ctx = RequestContext {
            package,
            registry: self.registry_name(),
            timeout: options.timeout,
            headers: Self::headers(&options),
        };

        let metadata: PackageMetadata = self.client.get_json(&url, &ctx).await?;
        debug!(package, entries = metadata.time.len(), "fetched version history");

        Ok(metadata)
    }
}
