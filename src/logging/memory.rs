//! In-memory logger that captures entries instead of printing them.
use std::sync::Mutex;

use super::types::{Level, Log, Verbosity};

/// A single captured log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Level the message was logged at.
    pub level: Level,
    /// Message text.
    pub message: String,
}

/// Logger that records every message in order.
///
/// An optional [`Verbosity`] drops messages the console would not show, so
/// a capture reflects exactly what a user would have seen.
#[derive(Debug, Default)]
pub struct MemoryLog {
    verbosity: Option<Verbosity>,
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLog {
    /// Capture everything regardless of level.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture only what would be displayed at `verbosity`.
    #[must_use]
    pub const fn with_verbosity(verbosity: Verbosity) -> Self {
        Self {
            verbosity: Some(verbosity),
            entries: Mutex::new(Vec::new()),
        }
    }

    /// A copy of all captured entries.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map_or_else(|_| Vec::new(), |guard| guard.clone())
    }

    /// Captured messages without their levels.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.entries().into_iter().map(|e| e.message).collect()
    }

    /// Whether any captured message contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.entries().iter().any(|e| e.message.contains(needle))
    }
}

impl Log for MemoryLog {
    fn log(&self, level: Level, msg: &str) {
        if self.verbosity.is_some_and(|v| !v.shows(level)) {
            return;
        }
        if let Ok(mut guard) = self.entries.lock() {
            guard.push(LogEntry {
                level,
                message: msg.to_string(),
            });
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn captures_in_order() {
        let log = MemoryLog::new();
        log.stage("Planning stow");
        log.info("Executing pre-stow hooks");
        log.trace("details");
        assert_eq!(
            log.messages(),
            vec!["Planning stow", "Executing pre-stow hooks", "details"]
        );
        assert_eq!(log.entries()[0].level, Level::Links);
    }

    #[test]
    fn verbosity_drops_hidden_levels() {
        let log = MemoryLog::with_verbosity(Verbosity::new(1));
        log.stage("Planning stow");
        log.info("Executing pre-stow hooks");
        log.warn("careful");
        assert_eq!(log.messages(), vec!["Planning stow", "careful"]);
    }

    #[test]
    fn contains_matches_substrings() {
        let log = MemoryLog::new();
        log.error("pre-stow hook of package vim failed");
        assert!(log.contains("package vim"));
        assert!(!log.contains("package zsh"));
    }
}
