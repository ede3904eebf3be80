//! Constructor injection of a logger factory.
//!
//! Components ask a `&dyn LoggerFactory` for their loggers, so production code
//! can pass any factory while a test passes a capturing [`Registry`] and then
//! inspects what was logged.

use std::sync::Arc;

use logspy::{CapturedLogs, Level, Logger, LoggerFactory, Registry, Settings, StdoutSink, args};

struct Grandchild {
    logger: Arc<dyn Logger>,
}

impl Grandchild {
    fn new(factory: &dyn LoggerFactory) -> Self {
        Self {
            logger: factory.get_logger(std::any::type_name::<Self>()),
        }
    }

    fn work(&self) {
        self.logger.info("Hello from {}", args!["grandchild"]);
    }
}

struct Child {
    logger: Arc<dyn Logger>,
    grandchild: Grandchild,
}

impl Child {
    fn new(factory: &dyn LoggerFactory) -> Self {
        Self {
            logger: factory.get_logger(std::any::type_name::<Self>()),
            grandchild: Grandchild::new(factory),
        }
    }

    fn work(&self) {
        self.logger.info("Hello from {}", args!["child"]);
        self.grandchild.work();
    }
}

fn main() {
    let settings = Settings::new()
        .enable(Level::Info)
        .route(Level::Info, Arc::new(StdoutSink));
    let registry = Registry::with_settings(settings);

    Child::new(&registry).work();

    assert!(registry.contains("Hello from child"));
    assert!(registry.contains("Hello from grandchild"));
    assert!(registry.logger_exists_for::<Child>());
    assert!(registry.logger_exists_for::<Grandchild>());

    println!("captured {} records from {:?}", registry.lines().len(), registry.logger_names());
}
