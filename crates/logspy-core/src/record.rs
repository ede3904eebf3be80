//! Captured log records.

use std::fmt;
use std::thread;

use serde::Serialize;
use time::OffsetDateTime;

use crate::level::Level;

/// An immutable captured log entry.
///
/// Records are created once, when an enabled logging call is dispatched, and
/// are shared read-only (behind `Arc`) by the store and every query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    logger: String,
    level: Level,
    text: String,
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
    origin: String,
    sequence: u64,
}

impl Record {
    /// Create a record stamped with the current time and calling thread.
    #[must_use]
    pub fn new(
        logger: impl Into<String>,
        level: Level,
        text: impl Into<String>,
        sequence: u64,
    ) -> Self {
        Self {
            logger: logger.into(),
            level,
            text: text.into(),
            timestamp: OffsetDateTime::now_utc(),
            origin: current_origin(),
            sequence,
        }
    }

    /// Replace the origin identifier.
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Name of the logger that captured this record.
    #[must_use]
    pub fn logger(&self) -> &str {
        &self.logger
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Fully rendered message text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Wall-clock capture time (UTC).
    #[must_use]
    pub fn timestamp(&self) -> OffsetDateTime {
        self.timestamp
    }

    /// Identifier of the thread that made the logging call.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Registry-wide capture order.
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Record({},{},{})", self.logger, self.level, self.text)
    }
}

/// Identifier for the current thread: its name if it has one, otherwise its id.
#[must_use]
pub fn current_origin() -> String {
    let current = thread::current();
    match current.name() {
        Some(name) => name.to_string(),
        None => format!("{:?}", current.id()),
    }
}
