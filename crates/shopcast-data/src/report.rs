//! Progress reporting seam.
//!
//! Stages never install a logger. They receive a [`Reporter`] from the
//! entry point and describe what they do through it.

use std::sync::Mutex;

/// Sink for stage progress messages.
pub trait Reporter {
    /// A named pipeline stage is starting.
    fn stage(&self, name: &str);

    /// Informational message.
    fn info(&self, message: &str);

    /// Something unusual that did not stop the stage.
    fn warn(&self, message: &str);
}

/// Forwards every message to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn stage(&self, name: &str) {
        tracing::info!(stage = name, "stage started");
    }

    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }
}

/// Severity of a recorded message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// [`Reporter::stage`]
    Stage,
    /// [`Reporter::info`]
    Info,
    /// [`Reporter::warn`]
    Warn,
}

/// Keeps messages in memory, for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    messages: Mutex<Vec<(Level, String)>>,
}

impl MemoryReporter {
    /// Create an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Names of the stages reported, in order.
    pub fn stages(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(level, _)| *level == Level::Stage)
            .map(|(_, msg)| msg)
            .collect()
    }

    fn push(&self, level: Level, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push((level, message.to_string()));
        }
    }
}

impl Reporter for MemoryReporter {
    fn stage(&self, name: &str) {
        self.push(Level::Stage, name);
    }

    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.push(Level::Warn, message);
    }
}
