//! Per-name capture and dispatch.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Instant;

use logspy_core::logging::{debug, targets, trace};
use logspy_core::{Arg, Level, Logger, Record, render};

use crate::query::CapturedLogs;
use crate::settings::Settings;

/// State shared by a registry and every logger it issues.
pub(crate) struct Shared {
    settings: RwLock<Settings>,
    updates: Mutex<()>,
    started: Instant,
    sequence: AtomicU64,
}

impl Shared {
    pub(crate) fn new(settings: Settings) -> Self {
        Self {
            settings: RwLock::new(settings),
            updates: Mutex::new(()),
            started: Instant::now(),
            sequence: AtomicU64::new(0),
        }
    }

    /// The current settings snapshot.
    pub(crate) fn settings(&self) -> Settings {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn replace_settings(&self, settings: Settings) {
        let _update = self.updates.lock().unwrap_or_else(PoisonError::into_inner);
        self.store_settings(settings);
    }

    /// Runs `f` on a snapshot with the settings lock released, so `f` may
    /// read settings or log through this registry. Updaters are serialised
    /// by `updates`; `f` must not itself update settings.
    pub(crate) fn update_settings<F>(&self, f: F)
    where
        F: FnOnce(&Settings) -> Settings,
    {
        let _update = self.updates.lock().unwrap_or_else(PoisonError::into_inner);
        let next = f(&self.settings());
        self.store_settings(next);
    }

    fn store_settings(&self, settings: Settings) {
        *self
            .settings
            .write()
            .unwrap_or_else(PoisonError::into_inner) = settings;
    }

    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }

    fn elapsed_ms(&self) -> u128 {
        self.started.elapsed().as_millis()
    }
}

/// A capturing logger bound to one name.
///
/// Each call reads the registry's current [`Settings`], so settings swapped on
/// the registry apply to loggers that were issued earlier.
///
/// For every call:
/// - enabled levels are rendered and appended to this logger's store,
/// - captured messages are mirrored to the level's console sink unless
///   printing is off or a suppression matches,
/// - a delegate registered for this exact name receives the original call,
///   whether or not the level is enabled.
///
/// A panicking delegate unwinds into the caller; no lock is held while the
/// delegate runs.
pub struct SpyLogger {
    name: String,
    shared: Arc<Shared>,
    store: RwLock<Vec<Arc<Record>>>,
}

impl SpyLogger {
    pub(crate) fn new(name: impl Into<String>, shared: Arc<Shared>) -> Self {
        Self {
            name: name.into(),
            shared,
            store: RwLock::new(Vec::new()),
        }
    }

    /// Dispatch a call whose text is already rendered.
    ///
    /// Used by the `log` and `tracing` bridges. A delegate receives
    /// `log(level, text, &[])`.
    pub fn log_rendered(&self, level: Level, text: &str) {
        let settings = self.shared.settings();
        if settings.is_enabled(level) {
            self.capture(&settings, level, text.to_string());
        } else {
            trace!(target: targets::ENGINE, "{} {} not enabled", self.name, level);
        }
        if let Some(delegate) = settings.delegate_of(&self.name) {
            delegate.log(level, text, &[]);
        }
    }

    /// Discard every captured record.
    pub fn clear(&self) {
        self.store
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of captured records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capture(&self, settings: &Settings, level: Level, text: String) {
        let record = {
            let mut store = self.store.write().unwrap_or_else(PoisonError::into_inner);
            // Sequence is taken under the store lock so per-logger order and
            // sequence order agree.
            let record = Arc::new(Record::new(
                self.name.as_str(),
                level,
                text,
                self.shared.next_sequence(),
            ));
            store.push(Arc::clone(&record));
            record
        };
        self.mirror(settings, &record);
    }

    fn mirror(&self, settings: &Settings, record: &Record) {
        if !settings.is_printing() {
            return;
        }
        if settings.is_suppressed(record.text()) {
            trace!(target: targets::ENGINE, "{} console output suppressed", self.name);
            return;
        }

        let sink = settings.sink(record.level());
        if sink.is_noop() {
            return;
        }

        let line = format!(
            "{} {} [{}] {} - {}",
            self.shared.elapsed_ms(),
            record.level(),
            record.origin(),
            self.name,
            record.text()
        );
        if let Err(err) = sink.write_line(&line).and_then(|()| sink.flush()) {
            debug!(
                target: targets::ENGINE,
                "console write to {} failed for {}: {}",
                sink.describe(),
                self.name,
                err
            );
        }
    }
}

impl Logger for SpyLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self, level: Level) -> bool {
        self.shared.settings().is_enabled(level)
    }

    fn log(&self, level: Level, template: &str, args: &[Arg<'_>]) {
        let settings = self.shared.settings();
        if settings.is_enabled(level) {
            self.capture(&settings, level, render(template, args));
        } else {
            trace!(target: targets::ENGINE, "{} {} not enabled", self.name, level);
        }
        if let Some(delegate) = settings.delegate_of(&self.name) {
            delegate.log(level, template, args);
        }
    }
}

impl CapturedLogs for SpyLogger {
    fn lines(&self) -> Vec<Arc<Record>> {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl fmt::Debug for SpyLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpyLogger")
            .field("name", &self.name)
            .field("records", &self.len())
            .finish_non_exhaustive()
    }
}
