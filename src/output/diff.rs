//! Diff output formatter for showing pinned ranges
//!
//! One line per entry: `group name: range -> version`, followed by a
//! summary comment line.

use crate::domain::{ManifestLike, PinnedManifest};
use crate::output::OutputFormatter;
use crate::pin::{pin_changes, PinChange};
use colored::Colorize;
use std::io::Write;

/// Diff formatter for showing range -> version changes
pub struct DiffFormatter {
    color: bool,
}

impl DiffFormatter {
    /// Create a new diff formatter
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn format_change(&self, change: &PinChange) -> String {
        let pinned = change.pinned.as_deref().unwrap_or("null");
        if !self.color {
            return format!(
                "{} {}: {} -> {}",
                change.group, change.name, change.range, pinned
            );
        }

        let pinned = match change.pinned {
            None => pinned.red().bold().to_string(),
            Some(_) if change.is_unchanged() => pinned.dimmed().to_string(),
            Some(_) => pinned.green().to_string(),
        };
        format!(
            "{} {}: {} {} {}",
            change.group.to_string().dimmed(),
            change.name.bold(),
            change.range,
            "->".dimmed(),
            pinned
        )
    }
}

impl OutputFormatter for DiffFormatter {
    fn format(
        &self,
        original: &ManifestLike,
        pinned: &PinnedManifest,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let changes = pin_changes(original, pinned);
        for change in &changes {
            writeln!(writer, "{}", self.format_change(change))?;
        }

        let unresolved = changes.iter().filter(|c| c.pinned.is_none()).count();
        writeln!(
            writer,
            "# {} package(s) pinned, {} unresolved",
            changes.len() - unresolved,
            unresolved
        )?;

        Ok(())
    }
}
