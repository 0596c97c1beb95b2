//! Resolution reports for lists of `name@range` specs
//!
//! Every spec is resolved against the same cutoff. Queries run
//! concurrently (bounded), output order follows input order, and the
//! first failure aborts the batch.

use crate::config::DEFAULT_CONCURRENCY;
use crate::domain::{DependencySpec, Instant};
use crate::error::ResolveError;
use crate::resolver::VersionResolver;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use std::fmt;
use tracing::info;

/// One resolved spec
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// The spec as parsed from the input token
    pub spec: DependencySpec,
    /// Highest satisfying version at the cutoff, if any
    pub resolved: Option<String>,
    /// The cutoff exactly as supplied by the caller
    pub timestamp: String,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} resolved to \"{}\" at {}",
            self.spec,
            self.resolved.as_deref().unwrap_or("null"),
            self.timestamp
        )
    }
}

/// Produces resolution reports for batches of specs
pub struct ReportGenerator {
    resolver: VersionResolver,
    concurrency: usize,
}

impl ReportGenerator {
    /// Create a generator with the default concurrency
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

    /// Resolve every token, returning structured results in input order
    pub async fn resolve_all<S: AsRef<str>>(
        &self,
        tokens: &[S],
        timestamp: &str,
    ) -> Result<Vec<Resolution>, ResolveError> {
        let cutoff = Instant::parse(timestamp)?;
        let specs = tokens
            .iter()
            .map(|token| DependencySpec::parse(token.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        info!(count = specs.len(), %cutoff, "generating resolution reports");

        stream::iter(specs)
            .map(|spec| async move {
                let resolved = self
                    .resolver
                    .resolve_at(&spec.name, &spec.range, cutoff)
                    .await?;
                Ok::<_, ResolveError>(Resolution {
                    spec,
                    resolved,
                    timestamp: timestamp.to_string(),
                })
            })
            .buffered(self.concurrency)
            .try_collect()
            .await
    }

    /// Resolve every token and format one report line per token
    ///
    /// Lines read `{name}@{range} resolved to "{version}" at {timestamp}`,
    /// with `null` standing in for an unmatched range.
    pub async fn generate<S: AsRef<str>>(
        &self,
        tokens: &[S],
        timestamp: &str,
    ) -> Result<Vec<String>, ResolveError> {
        let resolutions = self.resolve_all(tokens, timestamp).await?;
        Ok(resolutions.iter().map(ToString::to_string).collect())
    }
}
