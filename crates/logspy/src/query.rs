//! Queries over captured records.

use std::sync::Arc;

use logspy_core::{Level, LogspyError, Record, Result};

use crate::pattern::TextPattern;
use crate::predicate::LogPredicate;

/// Read access to captured records, with matching helpers.
///
/// Implemented by [`SpyLogger`](crate::SpyLogger) for its own records and by
/// [`Registry`](crate::Registry) for the union of all its loggers. Every
/// method works on a fresh snapshot from [`CapturedLogs::lines`]; predicates
/// run without any store lock held.
pub trait CapturedLogs {
    /// Captured records in capture order.
    ///
    /// The returned vector is a copy; changing it does not affect the store.
    fn lines(&self) -> Vec<Arc<Record>>;

    /// Returns true if any record's text contains `substring`.
    fn contains(&self, substring: &str) -> bool {
        self.lines().iter().any(|r| r.text().contains(substring))
    }

    /// Returns true if any record at `level` contains `substring`.
    fn contains_at(&self, level: Level, substring: &str) -> bool {
        self.lines()
            .iter()
            .any(|r| r.level() == level && r.text().contains(substring))
    }

    /// Returns true if any record's whole text matches `pattern`.
    ///
    /// `.` matches newlines, so multi-line messages can be matched as a
    /// whole. Fails only if `pattern` does not compile.
    fn matches(&self, pattern: &str) -> Result<bool> {
        Ok(self.matches_pattern(&TextPattern::new(pattern)?))
    }

    /// Like [`CapturedLogs::matches`], restricted to `level`.
    fn matches_at(&self, level: Level, pattern: &str) -> Result<bool> {
        Ok(self.matches_pattern_at(level, &TextPattern::new(pattern)?))
    }

    fn matches_pattern(&self, pattern: &TextPattern) -> bool {
        self.lines().iter().any(|r| pattern.is_match(r.text()))
    }

    fn matches_pattern_at(&self, level: Level, pattern: &TextPattern) -> bool {
        self.lines()
            .iter()
            .any(|r| r.level() == level && pattern.is_match(r.text()))
    }

    /// Returns true if any record satisfies `predicate`.
    fn matches_predicate(&self, predicate: &dyn LogPredicate) -> bool {
        self.lines().iter().any(|r| predicate.matches(r))
    }

    /// Number of records satisfying `predicate`.
    fn count_matching(&self, predicate: &dyn LogPredicate) -> usize {
        self.lines().iter().filter(|r| predicate.matches(r)).count()
    }

    /// Fails with [`LogspyError::Unmatched`] if no record satisfies `predicate`.
    fn check_matches(&self, predicate: &dyn LogPredicate) -> Result<()> {
        let lines = self.lines();
        if lines.iter().any(|r| predicate.matches(r)) {
            Ok(())
        } else {
            Err(LogspyError::Unmatched {
                description: predicate.describe(),
                captured: lines.len(),
            })
        }
    }

    /// Assert that some record satisfies `predicate`.
    ///
    /// # Panics
    ///
    /// Panics with the predicate's description and a JSON dump of the
    /// captured records if nothing matches.
    fn assert_matches(&self, predicate: &dyn LogPredicate) {
        if let Err(err) = self.check_matches(predicate) {
            panic!("{err}. Captured records:\n{}", dump(&self.lines()));
        }
    }
}

/// Pretty JSON rendering of records, for failure messages.
#[must_use]
pub fn dump(records: &[Arc<Record>]) -> String {
    let plain: Vec<&Record> = records.iter().map(|r| &**r).collect();
    serde_json::to_string_pretty(&plain).unwrap_or_else(|e| format!("<unprintable: {e}>"))
}
