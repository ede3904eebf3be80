//! Name to logger directory.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use logspy_core::logging::{debug, targets};
use logspy_core::{Logger, LoggerFactory, Record};

use crate::engine::{Shared, SpyLogger};
use crate::query::CapturedLogs;
use crate::settings::Settings;

#[derive(Default)]
struct Loggers {
    by_name: HashMap<String, Arc<SpyLogger>>,
    /// Creation order
    order: Vec<Arc<SpyLogger>>,
}

/// Directory of capturing loggers plus the settings they share.
///
/// The registry owns the current [`Settings`]. Loggers read it on every call,
/// so [`Registry::set_settings`] and [`Registry::update_settings`] also apply
/// to loggers handed out before the change.
///
/// Usually one registry is created per test.
pub struct Registry {
    shared: Arc<Shared>,
    loggers: RwLock<Loggers>,
}

impl Registry {
    /// A registry with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    #[must_use]
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            shared: Arc::new(Shared::new(settings)),
            loggers: RwLock::new(Loggers::default()),
        }
    }

    // ─────────────────────────────────────────────────
    // Loggers
    // ─────────────────────────────────────────────────

    /// Get or create the logger called `name`.
    ///
    /// Concurrent callers asking for the same name get the same instance.
    pub fn get_logger(&self, name: &str) -> Arc<SpyLogger> {
        if let Some(existing) = self.read_loggers().by_name.get(name) {
            return Arc::clone(existing);
        }

        let (logger, created) = {
            let mut guard = self.loggers.write().unwrap_or_else(PoisonError::into_inner);
            let loggers = &mut *guard;
            match loggers.by_name.entry(name.to_string()) {
                Entry::Occupied(entry) => (Arc::clone(entry.get()), false),
                Entry::Vacant(entry) => {
                    let logger = Arc::new(SpyLogger::new(name, Arc::clone(&self.shared)));
                    entry.insert(Arc::clone(&logger));
                    loggers.order.push(Arc::clone(&logger));
                    (logger, true)
                }
            }
        };

        if created {
            debug!(target: targets::REGISTRY, "created logger {}", name);
        }
        logger
    }

    /// Get or create the logger named after type `T`.
    pub fn get_logger_for<T: ?Sized>(&self) -> Arc<SpyLogger> {
        self.get_logger(std::any::type_name::<T>())
    }

    /// Returns true if a logger called `name` exists. Never creates one.
    #[must_use]
    pub fn logger_exists(&self, name: &str) -> bool {
        self.read_loggers().by_name.contains_key(name)
    }

    #[must_use]
    pub fn logger_exists_for<T: ?Sized>(&self) -> bool {
        self.logger_exists(std::any::type_name::<T>())
    }

    /// Logger names in creation order.
    #[must_use]
    pub fn logger_names(&self) -> Vec<String> {
        self.read_loggers()
            .order
            .iter()
            .map(|l| l.name().to_string())
            .collect()
    }

    /// Empty every logger's store. Loggers and settings are kept.
    pub fn clear(&self) {
        for logger in self.snapshot_loggers() {
            logger.clear();
        }
    }

    // ─────────────────────────────────────────────────
    // Settings
    // ─────────────────────────────────────────────────

    /// The current settings snapshot.
    #[must_use]
    pub fn settings(&self) -> Settings {
        self.shared.settings()
    }

    /// Replace the settings used by all loggers from now on.
    pub fn set_settings(&self, settings: Settings) {
        debug!(target: targets::REGISTRY, "settings replaced: {:?}", settings);
        self.shared.replace_settings(settings);
    }

    /// Derive new settings from the current ones.
    ///
    /// `f` runs without the settings lock held, so it may read settings or
    /// log through this registry. Concurrent updates are applied one at a
    /// time. Calling `update_settings` or `set_settings` from inside `f`
    /// deadlocks.
    ///
    /// ```
    /// use logspy::{Level, Logger, Registry};
    ///
    /// let registry = Registry::new();
    /// let logger = registry.get_logger("svc");
    /// assert!(!logger.is_debug_enabled());
    ///
    /// registry.update_settings(|s| s.enable(Level::Debug));
    /// assert!(logger.is_debug_enabled());
    /// ```
    pub fn update_settings<F>(&self, f: F)
    where
        F: FnOnce(&Settings) -> Settings,
    {
        self.shared.update_settings(f);
        debug!(target: targets::REGISTRY, "settings updated");
    }

    fn read_loggers(&self) -> std::sync::RwLockReadGuard<'_, Loggers> {
        self.loggers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot_loggers(&self) -> Vec<Arc<SpyLogger>> {
        self.read_loggers().order.clone()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerFactory for Registry {
    fn get_logger(&self, name: &str) -> Arc<dyn Logger> {
        Registry::get_logger(self, name)
    }
}

impl CapturedLogs for Registry {
    /// Records of every logger, in global capture order.
    fn lines(&self) -> Vec<Arc<Record>> {
        let mut all: Vec<Arc<Record>> = self
            .snapshot_loggers()
            .iter()
            .flat_map(|l| l.lines())
            .collect();
        all.sort_by_key(|r| r.sequence());
        all
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("settings", &self.settings())
            .field("loggers", &self.logger_names())
            .finish()
    }
}
