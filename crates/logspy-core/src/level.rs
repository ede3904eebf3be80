//! Log severities and sets of enabled severities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LogspyError;

/// Logging severity.
///
/// There are exactly five levels. Whether a level is enabled is decided by
/// membership in a [`LevelSet`], not by comparing severities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Level {
    /// Every level, most severe first.
    pub const ALL: [Level; 5] = [
        Level::Error,
        Level::Warn,
        Level::Info,
        Level::Debug,
        Level::Trace,
    ];

    /// Upper-case name used in console output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        }
    }

    fn bit(self) -> u8 {
        match self {
            Level::Error => 1,
            Level::Warn => 1 << 1,
            Level::Info => 1 << 2,
            Level::Debug => 1 << 3,
            Level::Trace => 1 << 4,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LogspyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(Level::Error),
            "warn" | "warning" => Ok(Level::Warn),
            "info" => Ok(Level::Info),
            "debug" => Ok(Level::Debug),
            "trace" => Ok(Level::Trace),
            _ => Err(LogspyError::InvalidLevel(s.to_string())),
        }
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warn,
            log::Level::Info => Level::Info,
            log::Level::Debug => Level::Debug,
            log::Level::Trace => Level::Trace,
        }
    }
}

impl From<Level> for log::Level {
    fn from(level: Level) -> Self {
        match level {
            Level::Error => log::Level::Error,
            Level::Warn => log::Level::Warn,
            Level::Info => log::Level::Info,
            Level::Debug => log::Level::Debug,
            Level::Trace => log::Level::Trace,
        }
    }
}

/// A set of levels, stored as a bitmask.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LevelSet(u8);

impl LevelSet {
    /// The empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// All five levels.
    #[must_use]
    pub fn all() -> Self {
        Level::ALL.into_iter().collect()
    }

    /// A set containing a single level.
    #[must_use]
    pub fn only(level: Level) -> Self {
        Self(level.bit())
    }

    #[must_use]
    pub fn contains(self, level: Level) -> bool {
        self.0 & level.bit() != 0
    }

    #[must_use]
    pub fn with(self, level: Level) -> Self {
        Self(self.0 | level.bit())
    }

    #[must_use]
    pub fn without(self, level: Level) -> Self {
        Self(self.0 & !level.bit())
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in [`Level::ALL`] order.
    pub fn iter(self) -> impl Iterator<Item = Level> {
        Level::ALL.into_iter().filter(move |l| self.contains(*l))
    }
}

impl FromIterator<Level> for LevelSet {
    fn from_iter<I: IntoIterator<Item = Level>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), LevelSet::with)
    }
}

impl fmt::Debug for LevelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_level_names() {
        assert_eq!("error".parse::<Level>().unwrap(), Level::Error);
        assert_eq!("WARN".parse::<Level>().unwrap(), Level::Warn);
        assert_eq!("warning".parse::<Level>().unwrap(), Level::Warn);
        assert_eq!(" info ".parse::<Level>().unwrap(), Level::Info);
        assert_eq!("Debug".parse::<Level>().unwrap(), Level::Debug);
        assert_eq!("trace".parse::<Level>().unwrap(), Level::Trace);
    }

    #[test]
    fn unknown_level_name_fails_fast() {
        let err = "verbose".parse::<Level>().unwrap_err();
        assert!(matches!(err, LogspyError::InvalidLevel(ref name) if name == "verbose"));
    }

    #[test]
    fn display_is_upper_case() {
        let names: Vec<String> = Level::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(names, ["ERROR", "WARN", "INFO", "DEBUG", "TRACE"]);
    }

    #[test]
    fn log_crate_round_trip() {
        for level in Level::ALL {
            let converted: log::Level = level.into();
            assert_eq!(Level::from(converted), level);
        }
    }

    #[test]
    fn level_set_membership() {
        let set = LevelSet::only(Level::Error).with(Level::Debug);
        assert!(set.contains(Level::Error));
        assert!(set.contains(Level::Debug));
        assert!(!set.contains(Level::Warn));
        assert_eq!(set.len(), 2);

        let set = set.without(Level::Error);
        assert!(!set.contains(Level::Error));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Level::Debug]);
    }

    #[test]
    fn level_set_is_not_a_threshold() {
        // Trace without Debug is a valid configuration.
        let set: LevelSet = [Level::Trace].into_iter().collect();
        assert!(set.contains(Level::Trace));
        assert!(!set.contains(Level::Debug));
        assert!(!set.contains(Level::Error));
    }

    #[test]
    fn level_set_all_and_empty() {
        assert_eq!(LevelSet::all().len(), 5);
        assert!(LevelSet::empty().is_empty());
        assert_eq!(format!("{:?}", LevelSet::only(Level::Info)), "{Info}");
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Level::Warn).unwrap();
        assert_eq!(json, "\"warn\"");
        let parsed: Level = serde_json::from_str("\"trace\"").unwrap();
        assert_eq!(parsed, Level::Trace);
    }
}
