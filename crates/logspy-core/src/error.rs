//! Error types for logspy operations.

use thiserror::Error;

/// Errors raised at the point where bad input is supplied.
///
/// Query operations never produce an error for "no match"; only
/// [`LogspyError::Unmatched`] signals a failed assertion-style check.
#[derive(Debug, Error)]
pub enum LogspyError {
    /// A level name that is not one of error/warn/info/debug/trace.
    #[error("invalid log level '{0}'")]
    InvalidLevel(String),

    /// A routing profile name that is not recognised.
    #[error("invalid routing profile '{0}'")]
    InvalidProfile(String),

    /// A regular expression failed to compile.
    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A boolean setting that is not one of 1/true/on/yes or 0/false/off/no.
    #[error("invalid flag value '{0}'")]
    InvalidFlag(String),

    /// A configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// No captured record satisfied a predicate.
    #[error("did not match {description} ({captured} records captured)")]
    Unmatched { description: String, captured: usize },
}

impl LogspyError {
    /// Wrap a regex compilation failure together with the offending pattern.
    pub fn pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            source,
        }
    }

    /// Returns true if this error reports an unmet assertion.
    #[must_use]
    pub fn is_unmatched(&self) -> bool {
        matches!(self, Self::Unmatched { .. })
    }
}

/// Result alias used throughout logspy.
pub type Result<T> = std::result::Result<T, LogspyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_error_keeps_source() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = LogspyError::pattern("(", source);
        assert!(err.to_string().starts_with("invalid pattern '('"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn unmatched_is_distinguishable() {
        let err = LogspyError::Unmatched {
            description: "level is WARN".to_string(),
            captured: 3,
        };
        assert!(err.is_unmatched());
        assert_eq!(err.to_string(), "did not match level is WARN (3 records captured)");
        assert!(!LogspyError::InvalidLevel("loud".into()).is_unmatched());
        assert_eq!(
            LogspyError::InvalidFlag("maybe".into()).to_string(),
            "invalid flag value 'maybe'"
        );
    }
}
