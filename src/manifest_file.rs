//! Reading and writing package.json-style manifest files

use crate::domain::{ManifestLike, PinnedManifest};
use crate::error::ManifestError;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Default manifest file name
pub const MANIFEST_FILE: &str = "package.json";

/// Read and parse a manifest file
pub fn read_manifest(path: &Path) -> Result<ManifestLike, ManifestError> {
    let content = fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))?;
    parse_manifest(path, &content)
}

/// Parse manifest JSON content; `path` is only used for error messages
pub fn parse_manifest(path: &Path, content: &str) -> Result<ManifestLike, ManifestError> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| ManifestError::json_parse_error(path, e.to_string()))?;
    ManifestLike::from_value(value)
}

/// Render a pinned manifest as pretty JSON with a trailing newline
pub fn render_manifest(manifest: &PinnedManifest) -> Result<String, serde_json::Error> {
    let mut out = serde_json::to_string_pretty(manifest)?;
    out.push('\n');
    Ok(out)
}

/// Overwrite `path` with the pinned manifest
pub fn write_manifest(path: &Path, manifest: &PinnedManifest) -> Result<(), ManifestError> {
    let content = render_manifest(manifest).map_err(|e| encode_error(path, e))?;
    fs::write(path, content).map_err(|e| ManifestError::write_error(path, e))
}

fn encode_error(path: &Path, error: serde_json::Error) -> ManifestError {
    ManifestError::write_error(path, std::io::Error::from(error))
}
