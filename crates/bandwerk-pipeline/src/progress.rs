// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Progress reporting for retrieval tasks and transform stages.

use indicatif::{ProgressBar, ProgressStyle};

/// Observer for long-running retrieval and transform work.
///
/// Both retrieval tasks report into one shared sink, so implementations
/// must tolerate concurrent calls; the provided implementations are
/// internally synchronised and the trait takes `&self` throughout.
pub trait ProgressSink: Send + Sync {
    /// Grow the expected amount of work by `n` units.
    fn increase_total(&self, n: u64);
    /// Record `n` units of completed work.
    fn advance(&self, n: u64);
    /// Abandon the work, keeping `label` as the final status.
    fn cancel(&self, label: &str);
    /// Mark the work as finished.
    fn done(&self);
}

/// Sink that discards every notification. Useful in tests and headless
/// callers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn increase_total(&self, _n: u64) {}
    fn advance(&self, _n: u64) {}
    fn cancel(&self, _label: &str) {}
    fn done(&self) {}
}

/// Terminal progress bar that vanishes once the work completes.
pub struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    /// Create a bar titled `title` with zero expected work; retrieval
    /// tasks grow the total as they discover pages.
    pub fn new(title: impl Into<String>) -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{msg:<12} [{bar:40.cyan/blue}] {pos}/{len}")
                .expect("static template is valid")
                .progress_chars("##-"),
        );
        bar.set_message(title.into());
        Self { bar }
    }
}

impl ProgressSink for CliProgress {
    fn increase_total(&self, n: u64) {
        self.bar.inc_length(n);
    }

    fn advance(&self, n: u64) {
        self.bar.inc(n);
    }

    fn cancel(&self, label: &str) {
        self.bar.abandon_with_message(label.to_string());
    }

    fn done(&self) {
        self.bar.finish_and_clear();
    }
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// The CLI bar accepts the full notification sequence without
    /// panicking, including concurrent advances.
    #[test]
    fn cli_progress_accepts_notifications() {
        let progress = CliProgress::new("Testing");
        progress.increase_total(10);
        std::thread::scope(|scope| {
            for _ in 0..2 {
                scope.spawn(|| {
                    for _ in 0..5 {
                        progress.advance(1);
                    }
                });
            }
        });
        progress.done();
    }

    #[test]
    fn cancelled_bar_keeps_its_label() {
        let progress = CliProgress::new("Testing");
        progress.increase_total(3);
        progress.advance(1);
        progress.cancel("Error");
        assert_eq!(progress.bar.message(), "Error");
    }
}
