//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - User-Agent and per-request timeout
//! - Exponential backoff retry logic for transport failures and 429s
//! - Status mapping (404 -> not found, other non-2xx -> network error)
//!
//! The client is cheap to clone and safe to use from many concurrent
//! queries; clones share one connection pool.

use crate::error::RegistryError;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("timepin/", env!("CARGO_PKG_VERSION"));

/// Default number of retry attempts after the first request
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Base delay for exponential backoff (in milliseconds)
const BASE_DELAY_MS: u64 = 100;

/// Per-request parameters
#[derive(Debug, Clone)]
pub struct RequestContext<'a> {
    /// Package being fetched (for error context)
    pub package: &'a str,
    /// Registry name (for error context)
    pub registry: &'a str,
    /// Timeout for this request
    pub timeout: Duration,
    /// Extra request headers
    pub headers: HeaderMap,
}

/// HTTP client wrapper with retry logic
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, RegistryError> {
        Self::with_user_agent(DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with a custom User-Agent
    pub fn with_user_agent(user_agent: &str) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                RegistryError::network_error(
                    "",
                    "HTTP client",
                    format!("failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self {
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Maximum number of retries after the first attempt
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Perform a GET request with retry logic and error context
    pub async fn get(
        &self,
        url: &str,
        ctx: &RequestContext<'_>,
    ) -> Result<reqwest::Response, RegistryError> {
        let mut last_error = None;
        let mut delay = BASE_DELAY_MS;

        for attempt in 0..=self.max_retries {
            debug!(url, attempt, "registry request");

            let request = self
                .client
                .get(url)
                .timeout(ctx.timeout)
                .headers(ctx.headers.clone());

            match request.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(RegistryError::rate_limit_exceeded(ctx.registry));
                    } else if status == StatusCode::NOT_FOUND {
                        return Err(RegistryError::package_not_found(ctx.package, ctx.registry));
                    } else if !status.is_success() {
                        return Err(RegistryError::network_error(
                            ctx.package,
                            ctx.registry,
                            format!("HTTP {}", status),
                        ));
                    } else {
                        return Ok(response);
                    }
                }
                Err(e) if e.is_timeout() => {
                    last_error = Some(RegistryError::timeout(ctx.package, ctx.registry));
                }
                Err(e) => {
                    last_error = Some(RegistryError::network_error(
                        ctx.package,
                        ctx.registry,
                        e.to_string(),
                    ));
                }
            }

            if attempt < self.max_retries {
                warn!(url, attempt, delay_ms = delay, "registry request failed, retrying");
                tokio::time::sleep(Duration::from_millis(delay)).await;
                delay *= 2;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            RegistryError::network_error(ctx.package, ctx.registry, "unknown error")
        }))
    }

    /// Perform a GET request and parse the JSON response body
    ///
    /// Malformed bodies are not retried.
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        ctx: &RequestContext<'_>,
    ) -> Result<T, RegistryError> {
        let response = self.get(url, ctx).await?;

        response.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                RegistryError::timeout(ctx.package, ctx.registry)
            } else {
                RegistryError::invalid_response(
                    ctx.package,
                    ctx.registry,
                    format!("failed to parse JSON: {}", e),
                )
            }
        })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new().expect("failed to create default HTTP client")
    }
}
