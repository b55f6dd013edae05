//! Bounded diagnostic log of checker events.
//!
//! Entries are kept for the host to display (`relcheck logs`) and are also
//! mirrored to the process logger.

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of entries retained.
pub const LOG_CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Info => write!(f, "info"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.level,
            self.message
        )
    }
}

/// FIFO of the most recent [`LOG_CAPACITY`] entries. Recording never fails.
#[derive(Debug, Clone)]
pub struct LogSink {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink {
    pub fn new() -> Self {
        Self::with_capacity(LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Rebuilds a sink from persisted entries, keeping only the newest.
    pub fn restore(entries: Vec<LogEntry>) -> Self {
        let mut sink = Self::new();
        for entry in entries {
            sink.push(entry);
        }
        sink
    }

    pub fn record(&mut self, level: LogLevel, message: impl Into<String>, now: DateTime<Utc>) {
        let message = message.into();
        match level {
            LogLevel::Info => log::info!("{}", message),
            LogLevel::Error => log::error!("{}", message),
        }
        self.push(LogEntry {
            timestamp: now,
            level,
            message,
        });
    }

    pub fn info(&mut self, message: impl Into<String>, now: DateTime<Utc>) {
        self.record(LogLevel::Info, message, now);
    }

    pub fn error(&mut self, message: impl Into<String>, now: DateTime<Utc>) {
        self.record(LogLevel::Error, message, now);
    }

    fn push(&mut self, entry: LogEntry) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// The newest `n` entries, oldest first.
    pub fn tail(&self, n: usize) -> Vec<LogEntry> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).cloned().collect()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
