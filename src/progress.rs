//! Stderr spinner shown while registry queries are in flight

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";
const TICK_INTERVAL: Duration = Duration::from_millis(80);

/// A running spinner, or nothing in quiet mode
pub struct Spinner {
    bar: Option<ProgressBar>,
}

impl Spinner {
    /// Start ticking with `message`; no-op when `visible` is false
    pub fn start(visible: bool, message: impl Into<String>) -> Self {
        let bar = visible.then(|| {
            let bar = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner()
                .tick_chars(TICK_CHARS)
                .template("{spinner:.cyan} {msg}")
            {
                bar.set_style(style);
            }
            bar.set_message(message.into());
            bar.enable_steady_tick(TICK_INTERVAL);
            bar
        });
        Self { bar }
    }

    pub fn is_visible(&self) -> bool {
        self.bar.is_some()
    }

    /// Stop and erase the spinner line
    pub fn clear(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_spinner_has_no_bar() {
        let spinner = Spinner::start(false, "Resolving");
        assert!(!spinner.is_visible());
        spinner.clear();
    }

    #[test]
    fn test_visible_spinner() {
        let spinner = Spinner::start(true, format!("Pinning {}...", "package.json"));
        assert!(spinner.is_visible());
        spinner.clear();
    }
}
