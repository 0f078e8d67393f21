//! Spinner-backed progress reporting.

use indicatif::{ProgressBar, ProgressStyle};
use shopcast::data::{Reporter, TracingReporter};
use std::time::Duration;

/// Shows the running stage on a spinner and forwards every message to
/// `tracing`, pausing the spinner while the line is written.
#[derive(Debug)]
pub(crate) struct SpinnerReporter {
    bar: ProgressBar,
}

impl SpinnerReporter {
    pub(crate) fn new(command: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style);
        bar.set_prefix(command.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    pub(crate) fn finish(&self, message: String) {
        self.bar.finish_with_message(message);
    }

    pub(crate) fn fail(&self) {
        self.bar.abandon_with_message("failed");
    }
}

impl Reporter for SpinnerReporter {
    fn stage(&self, name: &str) {
        self.bar.set_message(name.to_string());
        self.bar.suspend(|| TracingReporter.stage(name));
    }

    fn info(&self, message: &str) {
        self.bar.suspend(|| TracingReporter.info(message));
    }

    fn warn(&self, message: &str) {
        self.bar.suspend(|| TracingReporter.warn(message));
    }
}
