//! `log` crate integration.
//!
//! Routes records emitted through the [`log`] facade into a [`Registry`],
//! using the record target as the logger name.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use logspy::{CapturedLogs, Level, Registry, Settings};
//!
//! let registry = Arc::new(Registry::with_settings(Settings::new().enable(Level::Info)));
//! Registry::install(&registry).expect("no other logger installed");
//!
//! log::info!(target: "billing", "charged {} cents", 250);
//! assert!(registry.get_logger("billing").contains("charged 250 cents"));
//! ```
//!
//! Only one global logger can exist per process, so tests that install the
//! bridge belong in their own integration test binary.

use std::sync::Arc;

use log::{LevelFilter, Log, Metadata, Record};
use logspy_core::Level;
use logspy_core::logging::is_internal_target;

use crate::registry::Registry;

/// A `log` crate logger that dispatches into a [`Registry`].
///
/// Targets under `logspy` are ignored so the registry's own diagnostics are
/// never captured.
pub struct LogBridge {
    registry: Arc<Registry>,
}

impl LogBridge {
    #[must_use]
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl Registry {
    /// Install a [`LogBridge`] for `registry` as the global `log` logger.
    ///
    /// Returns an error if a logger has already been set.
    pub fn install(registry: &Arc<Registry>) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(LogBridge::new(Arc::clone(registry))))?;
        // Filtering happens per call against the live settings.
        log::set_max_level(LevelFilter::Trace);
        Ok(())
    }

    /// Install as the global logger, ignoring errors if one is already set.
    pub fn try_install(registry: &Arc<Registry>) {
        let _ = Self::install(registry);
    }
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if is_internal_target(metadata.target()) {
            return false;
        }
        let settings = self.registry.settings();
        settings.is_enabled(Level::from(metadata.level()))
            || settings.delegate_of(metadata.target()).is_some()
    }

    fn log(&self, record: &Record) {
        if is_internal_target(record.target()) {
            return;
        }

        let text = record.args().to_string();
        self.registry
            .get_logger(record.target())
            .log_rendered(Level::from(record.level()), &text);
    }

    fn flush(&self) {
        let settings = self.registry.settings();
        for level in Level::ALL {
            let _ = settings.sink(level).flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::CapturedLogs;
    use crate::settings::Settings;

    fn record_for<'a>(target: &'a str, level: log::Level, args: std::fmt::Arguments<'a>) -> Record<'a> {
        Record::builder().target(target).level(level).args(args).build()
    }

    #[test]
    fn routes_by_target() {
        let registry = Arc::new(Registry::with_settings(Settings::new().enable(Level::Info)));
        let bridge = LogBridge::new(registry.clone());

        bridge.log(&record_for("billing", log::Level::Info, format_args!("charged {}", 250)));
        bridge.log(&record_for("billing", log::Level::Debug, format_args!("detail")));

        let logger = registry.get_logger("billing");
        assert!(logger.contains_at(Level::Info, "charged 250"));
        assert!(!logger.contains("detail"));
    }

    #[test]
    fn ignores_internal_targets() {
        let registry = Arc::new(Registry::with_settings(Settings::new().enable(Level::Debug)));
        let bridge = LogBridge::new(registry.clone());

        bridge.log(&record_for("logspy::registry", log::Level::Debug, format_args!("created")));

        assert!(!registry.logger_exists("logspy::registry"));
        assert!(!bridge.enabled(&Metadata::builder().target("logspy::engine").level(log::Level::Error).build()));
    }

    #[test]
    fn enabled_follows_live_settings() {
        let registry = Arc::new(Registry::new());
        let bridge = LogBridge::new(registry.clone());
        let warn = Metadata::builder().target("svc").level(log::Level::Warn).build();

        assert!(!bridge.enabled(&warn));
        registry.update_settings(|s| s.enable(Level::Warn));
        assert!(bridge.enabled(&warn));
        assert!(Arc::ptr_eq(bridge.registry(), &registry));
    }
}
