//! Host log forwarding
//!
//! The core logs through `tracing`. Hosts that want those events in their
//! own pipeline (OSLog, Logcat, a desktop log file) implement [`LoggerSink`];
//! `core_runtime::logging` mirrors every event that passes filtering into it.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Severity, ordered from most to least verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Lowercase name as used in filter directives
    pub const fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One event as handed to a [`LoggerSink`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub timestamp: DateTime<Utc>,
    /// Module path of the emitter, e.g. `core_fs::service`
    pub target: String,
    pub message: String,
    /// Structured fields, rendered as text
    pub fields: BTreeMap<String, String>,
    /// Innermost span the event was emitted in
    pub span: Option<String>,
}

impl LogEntry {
    pub fn new(level: LogLevel, target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            timestamp: Utc::now(),
            target: target.into(),
            message: message.into(),
            fields: BTreeMap::new(),
            span: None,
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_span(mut self, span: impl Into<String>) -> Self {
        self.span = Some(span.into());
        self
    }
}

/// Receiver for log events on the host side
///
/// Called synchronously on the emitting thread.
pub trait LoggerSink: Send + Sync {
    fn log(&self, entry: LogEntry) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// Events below this level are never delivered
    fn min_level(&self) -> LogLevel {
        LogLevel::Info
    }
}

/// Sink that prints one line per event to stderr
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    pub min_level: LogLevel,
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
        }
    }
}

impl ConsoleLogger {
    fn render(entry: &LogEntry) -> String {
        let mut line = format!(
            "{} {:>5} {}: {}",
            entry.timestamp.format("%H:%M:%S%.3f"),
            entry.level.as_str().to_ascii_uppercase(),
            entry.target,
            entry.message
        );
        for (key, value) in &entry.fields {
            line.push_str(&format!(" {}={}", key, value));
        }
        line
    }
}

impl LoggerSink for ConsoleLogger {
    fn log(&self, entry: LogEntry) -> Result<()> {
        if entry.level >= self.min_level {
            eprintln!("{}", Self::render(&entry));
        }
        Ok(())
    }

    fn min_level(&self) -> LogLevel {
        self.min_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_order_and_names() {
        assert!(LogLevel::Trace < LogLevel::Warn);
        assert_eq!(LogLevel::Warn.to_string(), "warn");
    }

    #[test]
    fn test_entry_builder() {
        let entry = LogEntry::new(LogLevel::Info, "core_fs::service", "Wrote file")
            .with_field("path", "notes.txt")
            .with_span("write_file");

        assert_eq!(entry.fields.get("path").map(String::as_str), Some("notes.txt"));
        assert_eq!(entry.span.as_deref(), Some("write_file"));
    }

    #[test]
    fn test_entry_serializes_level() {
        let entry = LogEntry::new(LogLevel::Warn, "core_fs", "append fallback");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["level"], "Warn");
        assert_eq!(json["target"], "core_fs");
    }

    #[test]
    fn test_console_line_lists_fields_in_order() {
        let entry = LogEntry::new(LogLevel::Debug, "core_fs", "Read file")
            .with_field("size", "3")
            .with_field("path", "a.txt");

        let line = ConsoleLogger::render(&entry);
        assert!(line.contains("DEBUG core_fs: Read file path=a.txt size=3"));
    }
}
