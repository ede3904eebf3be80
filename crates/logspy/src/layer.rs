//! `tracing` integration.
//!
//! Provides a tracing `Layer` that dispatches events into a [`Registry`],
//! using the event target as the logger name.

use std::fmt;
use std::sync::Arc;

use logspy_core::Level;
use logspy_core::logging::is_internal_target;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::registry::Registry;

/// A tracing layer that captures events into a [`Registry`].
///
/// The captured text is the event message followed by its other fields as
/// `key=value` pairs, then the enclosing span path if there is one.
pub struct SpyLayer {
    registry: Arc<Registry>,
}

impl SpyLayer {
    #[must_use]
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }
}

#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl FieldCollector {
    fn record_value(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            if self.message.is_none() {
                self.message = Some(value);
            }
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }

    fn into_text(self, fallback: &str) -> String {
        let mut text = self.message.unwrap_or_else(|| fallback.to_string());
        for (key, value) in self.fields {
            text.push(' ');
            text.push_str(&key);
            text.push('=');
            text.push_str(&value);
        }
        text
    }
}

impl Visit for FieldCollector {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_value(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_value(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record_value(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_value(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record_value(field, value.to_string());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.record_value(field, value.to_string());
    }
}

fn level_of(level: &tracing::Level) -> Level {
    if *level == tracing::Level::ERROR {
        Level::Error
    } else if *level == tracing::Level::WARN {
        Level::Warn
    } else if *level == tracing::Level::INFO {
        Level::Info
    } else if *level == tracing::Level::DEBUG {
        Level::Debug
    } else {
        Level::Trace
    }
}

impl<S> Layer<S> for SpyLayer
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if is_internal_target(metadata.target()) {
            return;
        }

        let mut collector = FieldCollector::default();
        event.record(&mut collector);

        if let Some(scope) = ctx.event_scope(event) {
            let spans: Vec<String> = scope.from_root().map(|span| span.name().to_string()).collect();
            if !spans.is_empty() {
                collector
                    .fields
                    .push(("span".to_string(), spans.join("::")));
            }
        }

        let text = collector.into_text(metadata.name());
        self.registry
            .get_logger(metadata.target())
            .log_rendered(level_of(metadata.level()), &text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::CapturedLogs;
    use crate::settings::Settings;
    use tracing_subscriber::prelude::*;

    fn capture<F: FnOnce()>(registry: &Arc<Registry>, f: F) {
        let subscriber = tracing_subscriber::registry().with(SpyLayer::new(registry.clone()));
        tracing::subscriber::with_default(subscriber, f);
    }

    #[test]
    fn captures_message_and_fields() {
        let registry = Arc::new(Registry::with_settings(Settings::new().enable(Level::Warn)));

        capture(&registry, || {
            tracing::warn!(target: "auth", user = "ada", attempts = 3, "login failed");
        });

        let logger = registry.get_logger("auth");
        assert!(logger.contains_at(Level::Warn, "login failed user=ada attempts=3"));
    }

    #[test]
    fn respects_enabled_levels() {
        let registry = Arc::new(Registry::new());

        capture(&registry, || {
            tracing::info!(target: "auth", "not captured");
            tracing::error!(target: "auth", "captured");
        });

        let logger = registry.get_logger("auth");
        assert!(!logger.contains("not captured"));
        assert!(logger.contains_at(Level::Error, "captured"));
    }

    #[test]
    fn records_span_path() {
        let registry = Arc::new(Registry::new());

        capture(&registry, || {
            let outer = tracing::info_span!("request");
            let _outer = outer.enter();
            let inner = tracing::info_span!("db");
            let _inner = inner.enter();
            tracing::error!(target: "svc", "timeout");
        });

        assert!(registry.contains("timeout span=request::db"));
    }

    #[test]
    fn ignores_internal_targets() {
        let registry = Arc::new(Registry::with_settings(Settings::new().enable(Level::Debug)));

        capture(&registry, || {
            tracing::debug!(target: "logspy::engine", "internal");
        });

        assert!(registry.logger_names().is_empty());
    }

    #[test]
    fn level_mapping() {
        assert_eq!(level_of(&tracing::Level::ERROR), Level::Error);
        assert_eq!(level_of(&tracing::Level::WARN), Level::Warn);
        assert_eq!(level_of(&tracing::Level::INFO), Level::Info);
        assert_eq!(level_of(&tracing::Level::DEBUG), Level::Debug);
        assert_eq!(level_of(&tracing::Level::TRACE), Level::Trace);
    }
}
