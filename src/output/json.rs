//! JSON output formatter for the pinned manifest

use crate::domain::{ManifestLike, PinnedManifest};
use crate::manifest_file::render_manifest;
use crate::output::OutputFormatter;
use std::io::Write;

/// Writes the pinned manifest as pretty JSON
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(
        &self,
        _original: &ManifestLike,
        pinned: &PinnedManifest,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let rendered = render_manifest(pinned)?;
        writer.write_all(rendered.as_bytes())
    }
}
