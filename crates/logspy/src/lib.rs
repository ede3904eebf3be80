//! logspy: a capturing test double for leveled logging.
//!
//! Code under test logs through the [`Logger`] trait (or through the `log`
//! and `tracing` facades via the bridges). A [`Registry`] hands out one
//! [`SpyLogger`] per name; each one
//!
//! 1. captures enabled calls as immutable [`Record`]s,
//! 2. mirrors captured calls to a per-level [`ConsoleSink`] unless printing is
//!    off or a [`Suppression`] matches,
//! 3. forwards every call, enabled or not, to a delegate registered for its
//!    name.
//!
//! Tests then query captures through [`CapturedLogs`], either on one logger or
//! across the whole registry.
//!
//! # Example
//!
//! ```
//! use logspy::{CapturedLogs, CaptureSink, Level, Logger, Registry, Settings, args};
//!
//! let errors = CaptureSink::new();
//! let settings = Settings::new()
//!     .enable(Level::Warn)
//!     .route(Level::Error, errors.shared());
//! let registry = Registry::with_settings(settings);
//!
//! let logger = registry.get_logger("billing");
//! logger.error("charge {} failed", args![42]);
//! logger.info("not captured", args![]);
//!
//! assert!(logger.contains("charge 42 failed"));
//! assert!(!registry.contains("not captured"));
//! errors.assert_contains("ERROR");
//! ```

#![forbid(unsafe_code)]

mod bridge;
mod config;
mod engine;
mod layer;
mod pattern;
pub mod predicate;
mod query;
mod registry;
mod settings;

pub use bridge::LogBridge;
pub use config::SettingsFile;
pub use engine::SpyLogger;
pub use layer::SpyLayer;
pub use pattern::TextPattern;
pub use predicate::LogPredicate;
pub use query::CapturedLogs;
pub use registry::Registry;
pub use settings::{RoutingProfile, Settings, Suppression};

pub use logspy_console::{CaptureSink, ConsoleSink, NoopSink, StderrSink, StdoutSink, WriterSink};
pub use logspy_core::{
    Arg, Level, LevelSet, Logger, LoggerFactory, LogspyError, Record, Result, args, render,
};
