//! Output formatting for pinned manifests
//!
//! This module provides:
//! - JSON output of the pinned manifest
//! - Diff output listing each range and the version it was pinned to

mod diff;
mod json;

pub use diff::DiffFormatter;
pub use json::JsonFormatter;

use crate::domain::{ManifestLike, PinnedManifest};
use std::io::Write;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// The pinned manifest as pretty JSON
    #[default]
    Json,
    /// One line per pinned entry
    Diff,
}

impl OutputFormat {
    /// Pick the format from CLI flags
    pub fn from_cli(diff: bool) -> Self {
        if diff {
            OutputFormat::Diff
        } else {
            OutputFormat::Json
        }
    }
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format and write the result of pinning `original`
    fn format(
        &self,
        original: &ManifestLike,
        pinned: &PinnedManifest,
        writer: &mut dyn Write,
    ) -> std::io::Result<()>;
}

/// Create an output formatter
pub fn create_formatter(format: OutputFormat, color: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter::new()),
        OutputFormat::Diff => Box::new(DiffFormatter::new(color)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Json);
    }

    #[test]
    fn test_output_format_from_cli() {
        assert_eq!(OutputFormat::from_cli(false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_cli(true), OutputFormat::Diff);
    }

    #[test]
    fn test_create_formatter_writes_json() {
        let original = ManifestLike::default();
        let pinned = PinnedManifest::default();
        let mut buf = Vec::new();

        create_formatter(OutputFormat::Json, false)
            .format(&original, &pinned, &mut buf)
            .unwrap();

        assert_eq!(String::from_utf8(buf).unwrap(), "{}\n");
    }
}
