//! Describable predicates over captured records.
//!
//! A [`LogPredicate`] pairs a check with a description, so a failed
//! [`assert_matches`](crate::CapturedLogs::assert_matches) can say what it
//! was looking for.
//!
//! ```
//! use logspy::Level;
//! use logspy::predicate::{PredicateExt, LogPredicate, level_is, text_contains};
//!
//! let p = level_is(Level::Warn).and(text_contains("retry"));
//! assert_eq!(p.describe(), "(level is WARN and text contains \"retry\")");
//! ```

use logspy_core::{Level, Record, Result};

use crate::pattern::TextPattern;

/// A check over a [`Record`] that can describe itself.
pub trait LogPredicate {
    fn matches(&self, record: &Record) -> bool;

    fn describe(&self) -> String;
}

impl<P: LogPredicate + ?Sized> LogPredicate for &P {
    fn matches(&self, record: &Record) -> bool {
        (**self).matches(record)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<P: LogPredicate + ?Sized> LogPredicate for Box<P> {
    fn matches(&self, record: &Record) -> bool {
        (**self).matches(record)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Combinators for predicates.
pub trait PredicateExt: LogPredicate + Sized {
    fn and<P: LogPredicate>(self, other: P) -> And<Self, P> {
        And(self, other)
    }

    fn or<P: LogPredicate>(self, other: P) -> Or<Self, P> {
        Or(self, other)
    }

    fn negate(self) -> Not<Self> {
        Not(self)
    }
}

impl<T: LogPredicate> PredicateExt for T {}

/// A closure with a description.
pub struct FnPredicate<F> {
    description: String,
    check: F,
}

impl<F> LogPredicate for FnPredicate<F>
where
    F: Fn(&Record) -> bool,
{
    fn matches(&self, record: &Record) -> bool {
        (self.check)(record)
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}

/// Wrap `check` as a predicate described by `description`.
pub fn predicate<F>(description: impl Into<String>, check: F) -> FnPredicate<F>
where
    F: Fn(&Record) -> bool,
{
    FnPredicate {
        description: description.into(),
        check,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LevelIs(Level);

impl LogPredicate for LevelIs {
    fn matches(&self, record: &Record) -> bool {
        record.level() == self.0
    }

    fn describe(&self) -> String {
        format!("level is {}", self.0)
    }
}

#[must_use]
pub fn level_is(level: Level) -> LevelIs {
    LevelIs(level)
}

#[derive(Debug, Clone)]
pub struct LoggerIs(String);

impl LogPredicate for LoggerIs {
    fn matches(&self, record: &Record) -> bool {
        record.logger() == self.0
    }

    fn describe(&self) -> String {
        format!("logger is {:?}", self.0)
    }
}

pub fn logger_is(name: impl Into<String>) -> LoggerIs {
    LoggerIs(name.into())
}

#[derive(Debug, Clone)]
pub struct OriginIs(String);

impl LogPredicate for OriginIs {
    fn matches(&self, record: &Record) -> bool {
        record.origin() == self.0
    }

    fn describe(&self) -> String {
        format!("origin is {:?}", self.0)
    }
}

pub fn origin_is(origin: impl Into<String>) -> OriginIs {
    OriginIs(origin.into())
}

#[derive(Debug, Clone)]
pub struct TextContains(String);

impl LogPredicate for TextContains {
    fn matches(&self, record: &Record) -> bool {
        record.text().contains(self.0.as_str())
    }

    fn describe(&self) -> String {
        format!("text contains {:?}", self.0)
    }
}

pub fn text_contains(needle: impl Into<String>) -> TextContains {
    TextContains(needle.into())
}

#[derive(Debug, Clone)]
pub struct TextMatches(TextPattern);

impl LogPredicate for TextMatches {
    fn matches(&self, record: &Record) -> bool {
        self.0.is_match(record.text())
    }

    fn describe(&self) -> String {
        format!("text matches /{}/", self.0)
    }
}

/// Whole-text match; `.` spans newlines.
pub fn text_matches(pattern: &str) -> Result<TextMatches> {
    TextPattern::new(pattern).map(TextMatches)
}

/// Whole-text match against a pre-compiled pattern.
#[must_use]
pub fn text_matches_pattern(pattern: TextPattern) -> TextMatches {
    TextMatches(pattern)
}

#[derive(Debug, Clone)]
pub struct And<A, B>(A, B);

impl<A: LogPredicate, B: LogPredicate> LogPredicate for And<A, B> {
    fn matches(&self, record: &Record) -> bool {
        self.0.matches(record) && self.1.matches(record)
    }

    fn describe(&self) -> String {
        format!("({} and {})", self.0.describe(), self.1.describe())
    }
}

#[derive(Debug, Clone)]
pub struct Or<A, B>(A, B);

impl<A: LogPredicate, B: LogPredicate> LogPredicate for Or<A, B> {
    fn matches(&self, record: &Record) -> bool {
        self.0.matches(record) || self.1.matches(record)
    }

    fn describe(&self) -> String {
        format!("({} or {})", self.0.describe(), self.1.describe())
    }
}

#[derive(Debug, Clone)]
pub struct Not<A>(A);

impl<A: LogPredicate> LogPredicate for Not<A> {
    fn matches(&self, record: &Record) -> bool {
        !self.0.matches(record)
    }

    fn describe(&self) -> String {
        format!("not {}", self.0.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(level: Level, text: &str) -> Record {
        Record::new("svc", level, text, 0).with_origin("main")
    }

    #[test]
    fn builtins() {
        let r = record(Level::Warn, "retry 3 of 5");
        assert!(level_is(Level::Warn).matches(&r));
        assert!(!level_is(Level::Error).matches(&r));
        assert!(logger_is("svc").matches(&r));
        assert!(origin_is("main").matches(&r));
        assert!(text_contains("3 of").matches(&r));
        assert!(text_matches(r"retry \d of \d").unwrap().matches(&r));
        assert!(!text_matches("retry").unwrap().matches(&r));
    }

    #[test]
    fn combinators() {
        let r = record(Level::Info, "hello");
        assert!(level_is(Level::Info).and(text_contains("ell")).matches(&r));
        assert!(!level_is(Level::Info).and(text_contains("bye")).matches(&r));
        assert!(level_is(Level::Error).or(text_contains("hell")).matches(&r));
        assert!(level_is(Level::Error).negate().matches(&r));
    }

    #[test]
    fn descriptions_compose() {
        let p = level_is(Level::Error)
            .or(origin_is("worker-1"))
            .and(text_contains("x").negate());
        assert_eq!(
            p.describe(),
            "((level is ERROR or origin is \"worker-1\") and not text contains \"x\")"
        );
    }

    #[test]
    fn closure_predicate() {
        let p = predicate("text is short", |r: &Record| r.text().len() < 4);
        assert!(p.matches(&record(Level::Info, "abc")));
        assert!(!p.matches(&record(Level::Info, "abcdef")));
        assert_eq!(p.describe(), "text is short");
    }

    #[test]
    fn boxed_and_borrowed() {
        let boxed: Box<dyn LogPredicate> = Box::new(level_is(Level::Debug));
        let r = record(Level::Debug, "d");
        assert!(boxed.matches(&r));
        assert!((&boxed).matches(&r));
        assert_eq!(boxed.describe(), "level is DEBUG");
    }

    #[test]
    fn malformed_text_pattern() {
        assert!(text_matches("(").is_err());
    }
}
