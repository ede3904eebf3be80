//! The logging-call surface.

use std::sync::Arc;

use crate::level::Level;
use crate::render::Arg;

/// A named logger with one entry point per severity.
///
/// Capturing loggers implement this trait, and so does anything used as a
/// delegate: a delegate receives the same call the caller made, with the
/// unrendered template and arguments.
///
/// Only [`Logger::name`], [`Logger::is_enabled`] and [`Logger::log`] are
/// required; the per-level methods forward to them.
pub trait Logger: Send + Sync {
    /// The logger's name.
    fn name(&self) -> &str;

    /// Whether calls at `level` are enabled.
    fn is_enabled(&self, level: Level) -> bool;

    /// Log `template` rendered against `args` at `level`.
    fn log(&self, level: Level, template: &str, args: &[Arg<'_>]);

    fn error(&self, template: &str, args: &[Arg<'_>]) {
        self.log(Level::Error, template, args);
    }

    fn warn(&self, template: &str, args: &[Arg<'_>]) {
        self.log(Level::Warn, template, args);
    }

    fn info(&self, template: &str, args: &[Arg<'_>]) {
        self.log(Level::Info, template, args);
    }

    fn debug(&self, template: &str, args: &[Arg<'_>]) {
        self.log(Level::Debug, template, args);
    }

    fn trace(&self, template: &str, args: &[Arg<'_>]) {
        self.log(Level::Trace, template, args);
    }

    fn is_error_enabled(&self) -> bool {
        self.is_enabled(Level::Error)
    }

    fn is_warn_enabled(&self) -> bool {
        self.is_enabled(Level::Warn)
    }

    fn is_info_enabled(&self) -> bool {
        self.is_enabled(Level::Info)
    }

    fn is_debug_enabled(&self) -> bool {
        self.is_enabled(Level::Debug)
    }

    fn is_trace_enabled(&self) -> bool {
        self.is_enabled(Level::Trace)
    }
}

/// Hands out loggers by name.
///
/// Application code that takes a `&dyn LoggerFactory` in its constructor can
/// be handed a capturing registry in tests.
pub trait LoggerFactory: Send + Sync {
    fn get_logger(&self, name: &str) -> Arc<dyn Logger>;
}

/// Build an argument slice for a [`Logger`] call.
///
/// ```
/// use logspy_core::{args, render};
///
/// let port = 8080;
/// assert_eq!(render("listening on {}", args![port]), "listening on 8080");
/// ```
///
/// An error after `;` is passed last, as the trace:
///
/// ```
/// use logspy_core::{args, render};
///
/// let err = std::io::Error::other("disk full");
/// assert_eq!(render("write {} failed", args!["a.log"; err]), "write a.log failed\ndisk full");
/// ```
#[macro_export]
macro_rules! args {
    () => {
        &[] as &[$crate::Arg<'_>]
    };
    (; $err:expr) => {
        &[$crate::Arg::error(&$err)]
    };
    ($($arg:expr),+ ; $err:expr) => {
        &[$($crate::Arg::from(&$arg)),+, $crate::Arg::error(&$err)]
    };
    ($($arg:expr),+ $(,)?) => {
        &[$($crate::Arg::from(&$arg)),+]
    };
}
