//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ResolveError: Failures of a single point-in-time resolution
//! - RegistryError: Issues with package registry communication
//! - ManifestError: Issues reading, parsing or writing a manifest
//! - ConfigError: Issues with CLI or .npmrc configuration
//!
//! A range that no extant version satisfies is not an error; it is
//! reported as `None` by the resolver. The binary wraps all of these in
//! `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a resolution (and the batch containing it)
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The cutoff timestamp could not be parsed into a valid instant
    #[error("could not parse timestamp: \"{value}\"")]
    InvalidTimestamp { value: String },

    /// A "name@range" token could not be split unambiguously
    #[error("invalid dependency spec '{spec}': {message}")]
    InvalidSpec { spec: String, message: String },

    /// The registry query failed; propagated unchanged
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Errors related to package registry communication
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Package not found in registry
    #[error("package '{package}' not found in {registry} registry")]
    PackageNotFound { package: String, registry: String },

    /// Network request failed
    #[error("failed to fetch package '{package}' from {registry}: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {registry} registry")]
    RateLimitExceeded { registry: String },

    /// Invalid response from registry
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },
}

/// Errors related to manifest handling
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write manifest file
    #[error("failed to write manifest file {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error
    #[error("failed to parse JSON in {path}: {message}")]
    JsonParseError { path: PathBuf, message: String },

    /// A recognized dependency group is not a name -> range mapping
    #[error("invalid dependency group '{key}': {message}")]
    InvalidGroup { key: String, message: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid timeout format
    #[error("invalid timeout '{value}': expected format like '10s', '500ms', '1m'")]
    InvalidTimeout { value: String },

    /// Invalid registry URL
    #[error("invalid registry URL '{value}': {message}")]
    InvalidRegistry { value: String, message: String },

    /// Concurrency must allow at least one request in flight
    #[error("invalid concurrency '{value}': must be at least 1")]
    InvalidConcurrency { value: usize },
}

impl ResolveError {
    /// Creates a new InvalidTimestamp error
    pub fn invalid_timestamp(value: impl Into<String>) -> Self {
        ResolveError::InvalidTimestamp {
            value: value.into(),
        }
    }

    /// Creates a new InvalidSpec error
    pub fn invalid_spec(spec: impl Into<String>, message: impl Into<String>) -> Self {
        ResolveError::InvalidSpec {
            spec: spec.into(),
            message: message.into(),
        }
    }

    /// Returns true when the failure came from the registry
    pub fn is_registry(&self) -> bool {
        matches!(self, ResolveError::Registry(_))
    }
}

impl RegistryError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::PackageNotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new RateLimitExceeded error
    pub fn rate_limit_exceeded(registry: impl Into<String>) -> Self {
        RegistryError::RateLimitExceeded {
            registry: registry.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::InvalidResponse {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }
}

impl ManifestError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new JsonParseError
    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::JsonParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidGroup error
    pub fn invalid_group(key: impl Into<String>, message: impl Into<String>) -> Self {
        ManifestError::InvalidGroup {
            key: key.into(),
            message: message.into(),
        }
    }
}
