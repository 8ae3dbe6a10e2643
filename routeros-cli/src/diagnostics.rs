//! Diagnostics port handed to each component at construction.
//!
//! Components never call the `log` macros directly. They hold an
//! `Arc<dyn Diagnostics>` so the orchestration layer can route driver events
//! wherever it likes. [`LogDiagnostics`] forwards to the `log` facade and is
//! what [`DriverBuilder`](crate::driver::DriverBuilder) installs by default.

use std::fmt;
use std::sync::{Arc, Mutex};

use log::Level;

/// Sink for driver diagnostics.
pub trait Diagnostics: Send + Sync {
    /// Record a diagnostic event.
    fn emit(&self, level: Level, args: fmt::Arguments<'_>);
}

/// Default sink forwarding everything to the `log` crate.
#[derive(Debug, Clone)]
pub struct LogDiagnostics {
    target: &'static str,
}

impl LogDiagnostics {
    /// Create a sink logging under the given target.
    pub fn new(target: &'static str) -> Self {
        Self { target }
    }
}

impl Default for LogDiagnostics {
    fn default() -> Self {
        Self::new("routeros_cli")
    }
}

impl Diagnostics for LogDiagnostics {
    fn emit(&self, level: Level, args: fmt::Arguments<'_>) {
        log::log!(target: self.target, level, "{}", args);
    }
}

/// Sink that keeps events in memory, for assertions in tests and tooling.
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    events: Mutex<Vec<(Level, String)>>,
}

impl MemoryDiagnostics {
    /// Create an empty memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events.
    pub fn events(&self) -> Vec<(Level, String)> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Whether any recorded message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.events().iter().any(|(_, msg)| msg.contains(needle))
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn emit(&self, level: Level, args: fmt::Arguments<'_>) {
        if let Ok(mut events) = self.events.lock() {
            events.push((level, args.to_string()));
        }
    }
}

/// The default diagnostics sink.
pub fn default_diagnostics() -> Arc<dyn Diagnostics> {
    Arc::new(LogDiagnostics::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_diagnostics_records() {
        let diag = MemoryDiagnostics::new();
        diag.emit(Level::Debug, format_args!("prompt: {}", "[admin@MikroTik] >"));
        diag.emit(Level::Warn, format_args!("unanswered"));

        let events = diag.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].0, Level::Debug);
        assert!(diag.contains("[admin@MikroTik]"));
        assert!(!diag.contains("missing"));
    }
}
