//! Resolver configuration
//!
//! Settings are layered, highest priority first:
//! 1. Command-line flags
//! 2. `registry=` in an `.npmrc` in the working directory
//! 3. Built-in defaults

use crate::error::ConfigError;
use crate::registry::{
    FetchOptions, DEFAULT_FETCH_TIMEOUT, DEFAULT_MAX_RETRIES, NPM_REGISTRY_URL,
};
use std::path::Path;
use std::time::Duration;

/// Default number of registry queries in flight per batch
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Resolver and registry settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Registry base URL
    pub registry_url: String,
    /// Per-query timeout
    pub timeout: Duration,
    /// Whether stale cached registry responses are acceptable
    pub stale_ok: bool,
    /// Maximum registry queries in flight per batch
    pub concurrency: usize,
    /// Retries after a failed transport attempt
    pub max_retries: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            registry_url: NPM_REGISTRY_URL.to_string(),
            timeout: DEFAULT_FETCH_TIMEOUT,
            stale_ok: true,
            concurrency: DEFAULT_CONCURRENCY,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl ResolverConfig {
    /// Defaults overlaid with a `registry=` setting from `dir/.npmrc`
    pub fn from_dir(dir: &Path) -> Self {
        let mut config = Self::default();
        if let Some(registry) = read_npmrc_registry(dir) {
            config.registry_url = registry;
        }
        config
    }

    /// Set the registry URL
    pub fn with_registry(mut self, url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        validate_registry_url(&url)?;
        self.registry_url = url.trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Set the per-query timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set whether stale responses are acceptable
    pub fn with_stale_ok(mut self, stale_ok: bool) -> Self {
        self.stale_ok = stale_ok;
        self
    }

    /// Set the batch concurrency
    pub fn with_concurrency(mut self, concurrency: usize) -> Result<Self, ConfigError> {
        if concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency { value: concurrency });
        }
        self.concurrency = concurrency;
        Ok(self)
    }

    /// Set the retry count
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Fetch options for each registry query
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions::default()
            .with_timeout(self.timeout)
            .with_stale_ok(self.stale_ok)
    }
}

/// Parse a timeout string: `Nms`, `Ns`, `Nm`, or a bare number of seconds
pub fn parse_timeout(s: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidTimeout {
        value: s.to_string(),
    };
    let s = s.trim();
    if s.is_empty() {
        return Err(invalid());
    }

    let (num_str, millis_per_unit) = if let Some(n) = s.strip_suffix("ms") {
        (n, 1)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1_000)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60_000)
    } else {
        (s, 1_000)
    };

    let num: u64 = num_str.trim().parse().map_err(|_| invalid())?;
    if num == 0 {
        return Err(invalid());
    }

    num.checked_mul(millis_per_unit)
        .map(Duration::from_millis)
        .ok_or_else(invalid)
}

fn validate_registry_url(url: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidRegistry {
            value: url.to_string(),
            message: "expected an http:// or https:// URL".to_string(),
        })
    }
}

/// Read `registry=` from an .npmrc file
fn read_npmrc_registry(dir: &Path) -> Option<String> {
    let content = std::fs::read_to_string(dir.join(".npmrc")).ok()?;

    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(value) = line.strip_prefix("registry") {
            let Some(value) = value.trim_start().strip_prefix('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if validate_registry_url(value).is_ok() {
                return Some(value.trim_end_matches('/').to_string());
            }
        }
    }

    None
}
