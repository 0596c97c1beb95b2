//! timepin - point-in-time npm dependency resolution
//!
//! This library answers "which version would `name@range` have resolved to
//! at instant T?" by filtering a registry's publish history to versions
//! that existed at T and picking the highest one satisfying the range.
//! On top of that it provides:
//! - Batch reports for lists of `name@range` specs
//! - Pinning every dependency group of a package.json-style manifest

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod manifest_file;
pub mod output;
pub mod pin;
pub mod progress;
pub mod range;
pub mod registry;
pub mod report;
pub mod resolver;

pub use config::ResolverConfig;
pub use pin::{pin_changes, ManifestPinner, PinChange};
pub use report::{ReportGenerator, Resolution};
pub use resolver::VersionResolver;
