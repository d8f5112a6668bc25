use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

/// Status lines on stderr. Stdout is reserved for the report.
#[derive(Clone, Copy, Debug)]
pub struct Status {
    quiet: bool,
}

impl Status {
    pub fn new(quiet: bool) -> Self {
        Status { quiet }
    }

    /// Spinner shown while `what` is loading. Hidden when quiet or when stderr is not a terminal.
    pub fn spinner(&self, what: &str) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} ({elapsed})") {
            pb.set_style(style);
        }
        pb.set_message(format!("fetching {what}"));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    pub fn extracted(&self, n: usize, from: &str) {
        if self.quiet {
            return;
        }
        let noun = if n == 1 { "publication" } else { "publications" };
        eprintln!("{} {} from {}", format!("✓ {n}").green(), noun, from);
    }

    pub fn bot_protected(&self, from: &str) {
        if self.quiet {
            return;
        }
        eprintln!(
            "{} {} returned Scholar's bot-protection page; no publications extracted",
            "⚠".yellow(),
            from
        );
    }

    /// Errors are printed even when quiet.
    pub fn error(&self, err: &anyhow::Error) {
        eprintln!("{} {err:#}", "error:".red().bold());
    }
}
