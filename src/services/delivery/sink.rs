//! Operator status reporting.

use std::io::Write;
use std::sync::Mutex;

/// Line-oriented status output for the operator
pub trait StatusSink: Send + Sync {
    fn status(&self, line: &str);
}

/// Prints status lines to stdout
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl StatusSink for ConsoleSink {
    fn status(&self, line: &str) {
        let mut out = std::io::stdout().lock();
        // A closed stdout must not fail the run
        let _ = writeln!(out, "{line}");
    }
}

/// Emits status lines as log events
#[derive(Debug, Default)]
pub struct TracingSink;

impl StatusSink for TracingSink {
    fn status(&self, line: &str) {
        tracing::info!(target: "dunning::status", "{line}");
    }
}

/// Keeps status lines in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

impl StatusSink for MemorySink {
    fn status(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}
