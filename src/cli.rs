//! CLI argument parsing module for timepin

use crate::config::{parse_timeout, ResolverConfig};
use crate::error::ConfigError;
use crate::manifest_file::MANIFEST_FILE;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Resolve npm dependency ranges as they stood at a point in time
#[derive(Parser, Debug, Clone)]
#[command(
    name = "timepin",
    version,
    about = "Resolve npm dependency ranges as of a point in time"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Registry base URL (overrides .npmrc)
    #[arg(long, global = true)]
    pub registry: Option<String>,

    /// Per-request timeout (e.g. 10s, 500ms, 1m)
    #[arg(long, global = true, value_parser = parse_timeout)]
    pub timeout: Option<Duration>,

    /// Maximum registry queries in flight
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,

    /// Retries after a failed registry request
    #[arg(long, global = true)]
    pub retries: Option<u32>,

    /// Refuse stale cached registry responses
    #[arg(long, global = true)]
    pub no_stale: bool,

    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Enable quiet mode - no progress spinner
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print what each `name@range` resolved to at TIMESTAMP
    Report {
        /// Cutoff instant (RFC 3339, RFC 2822, YYYY-MM-DD, YYYY-MM or YYYY)
        timestamp: String,
        /// Dependency specs, `name` or `name@range`
        specs: Vec<String>,
    },
    /// Pin a package.json's ranges to the versions current at TIMESTAMP
    Pin {
        /// Cutoff instant (RFC 3339, RFC 2822, YYYY-MM-DD, YYYY-MM or YYYY)
        timestamp: String,
        /// Manifest to pin
        #[arg(default_value = MANIFEST_FILE)]
        path: PathBuf,
        /// Rewrite the manifest in place
        #[arg(long)]
        write: bool,
        /// Show range -> version lines instead of JSON
        #[arg(long)]
        diff: bool,
    },
}

impl CliArgs {
    /// Layer CLI flags over `.npmrc` settings in `dir` and the defaults
    pub fn resolver_config(&self, dir: &Path) -> Result<ResolverConfig, ConfigError> {
        let mut config = ResolverConfig::from_dir(dir);
        if let Some(ref url) = self.registry {
            config = config.with_registry(url.as_str())?;
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        if let Some(concurrency) = self.concurrency {
            config = config.with_concurrency(concurrency)?;
        }
        if let Some(retries) = self.retries {
            config = config.with_max_retries(retries);
        }
        if self.no_stale {
            config = config.with_stale_ok(false);
        }
        Ok(config)
    }
}
