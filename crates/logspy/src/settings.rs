//! Immutable capture settings.
//!
//! [`Settings`] is a value: every `with`-style method returns a new snapshot
//! and leaves the receiver untouched. Unchanged collections are shared
//! between snapshots through `Arc`.
//!
//! ```
//! use logspy::{Level, Settings};
//!
//! let base = Settings::new();
//! let verbose = base.enable(Level::Info).printing_enabled(false);
//!
//! assert!(!base.is_enabled(Level::Info));
//! assert!(base.is_printing());
//! assert!(verbose.is_enabled(Level::Info));
//! assert!(!verbose.is_printing());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use logspy_console::{ConsoleSink, noop, stderr, stdout};
use logspy_core::{Level, LevelSet, Logger, LogspyError, Result};

use crate::pattern::TextPattern;

/// How levels other than ERROR are routed by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RoutingProfile {
    /// ERROR to stderr, everything else discarded
    #[default]
    Quiet,
    /// ERROR to stderr, everything else to stdout
    Standard,
}

impl FromStr for RoutingProfile {
    type Err = LogspyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "quiet" | "default" => Ok(Self::Quiet),
            "standard" | "stdout" => Ok(Self::Standard),
            _ => Err(LogspyError::InvalidProfile(s.to_string())),
        }
    }
}

/// A rule that withholds a message from the console without affecting capture.
#[derive(Clone)]
pub enum Suppression {
    /// The whole text matches a pattern
    Pattern(TextPattern),
    /// The text contains a substring
    Substring(String),
    /// Caller-supplied check
    Custom {
        description: String,
        check: Arc<dyn Fn(&str) -> bool + Send + Sync>,
    },
}

impl Suppression {
    /// Suppress messages whose whole text matches `pattern`.
    pub fn pattern(pattern: &str) -> Result<Self> {
        TextPattern::new(pattern).map(Self::Pattern)
    }

    /// Suppress messages containing `needle`.
    pub fn substring(needle: impl Into<String>) -> Self {
        Self::Substring(needle.into())
    }

    /// Suppress messages for which `check` returns true.
    pub fn custom<F>(description: impl Into<String>, check: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self::Custom {
            description: description.into(),
            check: Arc::new(check),
        }
    }

    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Self::Pattern(p) => p.is_match(text),
            Self::Substring(needle) => text.contains(needle.as_str()),
            Self::Custom { check, .. } => check(text),
        }
    }

    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Pattern(p) => format!("text matches /{p}/"),
            Self::Substring(needle) => format!("text contains {needle:?}"),
            Self::Custom { description, .. } => description.clone(),
        }
    }
}

impl fmt::Debug for Suppression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Suppression").field(&self.describe()).finish()
    }
}

/// A snapshot of capture settings.
///
/// Defaults: printing on, ERROR routed to stderr, other levels routed to a
/// no-op sink, no suppressions, only ERROR enabled, no delegates.
#[derive(Clone)]
pub struct Settings {
    printing: bool,
    sinks: Arc<HashMap<Level, Arc<dyn ConsoleSink>>>,
    suppressions: Arc<Vec<Suppression>>,
    enabled: LevelSet,
    delegates: Arc<HashMap<String, Arc<dyn Logger>>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::for_profile(RoutingProfile::Quiet)
    }
}

impl Settings {
    /// Default settings (quiet routing profile).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default settings with the given routing profile.
    #[must_use]
    pub fn for_profile(profile: RoutingProfile) -> Self {
        let others = match profile {
            RoutingProfile::Quiet => noop(),
            RoutingProfile::Standard => stdout(),
        };
        let sinks = Level::ALL
            .into_iter()
            .map(|level| {
                let sink = if level == Level::Error {
                    stderr()
                } else {
                    others.clone()
                };
                (level, sink)
            })
            .collect();

        Self {
            printing: true,
            sinks: Arc::new(sinks),
            suppressions: Arc::new(Vec::new()),
            enabled: LevelSet::only(Level::Error),
            delegates: Arc::new(HashMap::new()),
        }
    }

    // ─────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────

    /// Whether calls at `level` are captured. Independent of printing.
    #[must_use]
    pub fn is_enabled(&self, level: Level) -> bool {
        self.enabled.contains(level)
    }

    #[must_use]
    pub fn enabled_levels(&self) -> LevelSet {
        self.enabled
    }

    #[must_use]
    pub fn is_printing(&self) -> bool {
        self.printing
    }

    /// The sink `level` is routed to.
    #[must_use]
    pub fn sink(&self, level: Level) -> Arc<dyn ConsoleSink> {
        self.sinks.get(&level).cloned().unwrap_or_else(noop)
    }

    #[must_use]
    pub fn suppressions(&self) -> &[Suppression] {
        &self.suppressions
    }

    /// Returns true if any suppression matches `text`.
    #[must_use]
    pub fn is_suppressed(&self, text: &str) -> bool {
        self.suppressions.iter().any(|s| s.matches(text))
    }

    /// The delegate registered for exactly `name`.
    #[must_use]
    pub fn delegate_of(&self, name: &str) -> Option<Arc<dyn Logger>> {
        self.delegates.get(name).cloned()
    }

    // ─────────────────────────────────────────────────
    // Builder Methods
    // ─────────────────────────────────────────────────

    /// Turn console mirroring on or off. Capture is unaffected.
    #[must_use]
    pub fn printing_enabled(&self, printing: bool) -> Self {
        let mut next = self.clone();
        next.printing = printing;
        next
    }

    #[must_use]
    pub fn enable(&self, level: Level) -> Self {
        let mut next = self.clone();
        next.enabled = next.enabled.with(level);
        next
    }

    #[must_use]
    pub fn disable(&self, level: Level) -> Self {
        let mut next = self.clone();
        next.enabled = next.enabled.without(level);
        next
    }

    #[must_use]
    pub fn enable_levels(&self, levels: impl IntoIterator<Item = Level>) -> Self {
        let mut next = self.clone();
        next.enabled = levels.into_iter().fold(next.enabled, LevelSet::with);
        next
    }

    #[must_use]
    pub fn disable_levels(&self, levels: impl IntoIterator<Item = Level>) -> Self {
        let mut next = self.clone();
        next.enabled = levels.into_iter().fold(next.enabled, LevelSet::without);
        next
    }

    /// Replace the enabled set.
    #[must_use]
    pub fn with_enabled_levels(&self, levels: LevelSet) -> Self {
        let mut next = self.clone();
        next.enabled = levels;
        next
    }

    /// Withhold messages whose whole text matches `pattern` from the console.
    ///
    /// The pattern is compiled here; a malformed pattern is an error at this
    /// call.
    pub fn suppress_printing(&self, pattern: &str) -> Result<Self> {
        Ok(self.suppress_printing_with(Suppression::pattern(pattern)?))
    }

    #[must_use]
    pub fn suppress_printing_with(&self, suppression: Suppression) -> Self {
        let mut next = self.clone();
        Arc::make_mut(&mut next.suppressions).push(suppression);
        next
    }

    /// Route console output for `level` to `sink`.
    #[must_use]
    pub fn route(&self, level: Level, sink: Arc<dyn ConsoleSink>) -> Self {
        let mut next = self.clone();
        Arc::make_mut(&mut next.sinks).insert(level, sink);
        next
    }

    /// Forward every call on logger `name` to `delegate`.
    #[must_use]
    pub fn delegate(&self, name: impl Into<String>, delegate: Arc<dyn Logger>) -> Self {
        let mut next = self.clone();
        Arc::make_mut(&mut next.delegates).insert(name.into(), delegate);
        next
    }

    /// Like [`Settings::delegate`], naming the logger after type `T`.
    #[must_use]
    pub fn delegate_for<T: ?Sized>(&self, delegate: Arc<dyn Logger>) -> Self {
        self.delegate(std::any::type_name::<T>(), delegate)
    }

    /// Replace all delegates.
    #[must_use]
    pub fn delegates(&self, delegates: HashMap<String, Arc<dyn Logger>>) -> Self {
        let mut next = self.clone();
        next.delegates = Arc::new(delegates);
        next
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let routes: Vec<(Level, &str)> = Level::ALL
            .into_iter()
            .filter_map(|l| self.sinks.get(&l).map(|s| (l, s.describe())))
            .collect();
        let mut delegates: Vec<&str> = self.delegates.keys().map(String::as_str).collect();
        delegates.sort_unstable();

        f.debug_struct("Settings")
            .field("printing", &self.printing)
            .field("enabled", &self.enabled)
            .field("routes", &routes)
            .field("suppressions", &self.suppressions)
            .field("delegates", &delegates)
            .finish()
    }
}
