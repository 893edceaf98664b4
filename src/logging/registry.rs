//! Registry of per-source logs
//!
//! Owns every [`Log`] and creates them lazily. Constructed explicitly and shared
//! as `Arc<LogRegistry>` with whoever needs it.

use super::{Log, SourceId};
use crate::signal::Signal;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Default)]
struct Logs {
    by_source: HashMap<SourceId, Arc<Log>>,
    /// Creation order
    ordered: Vec<Arc<Log>>,
}

/// Owner and factory of per-source logs.
///
/// At most one [`Log`] exists per source id. [`LogRegistry::registry_changed`]
/// fires exactly once per distinct source id, when its log is created.
pub struct LogRegistry {
    logs: Mutex<Logs>,
    registry_changed: Signal<SourceId>,
}

impl LogRegistry {
    pub fn new() -> Self {
        Self {
            logs: Mutex::new(Logs::default()),
            registry_changed: Signal::new(),
        }
    }

    /// Get the log for `source`, creating it on first use
    pub fn get_logger(&self, source: impl Into<SourceId>) -> Arc<Log> {
        let source = source.into();
        let created = {
            let mut logs = self.logs.lock();
            if let Some(log) = logs.by_source.get(&source) {
                return Arc::clone(log);
            }
            let log = Arc::new(Log::new(source.clone()));
            logs.by_source.insert(source.clone(), Arc::clone(&log));
            logs.ordered.push(Arc::clone(&log));
            log
        };

        debug!(source = %source, "log created");
        self.registry_changed.emit(&source);
        created
    }

    /// All logs, oldest first
    pub fn get_loggers(&self) -> Vec<Arc<Log>> {
        self.logs.lock().ordered.clone()
    }

    /// Look up a log without creating it
    pub fn find(&self, source: &str) -> Option<Arc<Log>> {
        self.logs.lock().by_source.get(source).cloned()
    }

    /// Number of logs created so far
    pub fn len(&self) -> usize {
        self.logs.lock().ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raised once per newly created log, carrying its source id
    pub fn registry_changed(&self) -> &Signal<SourceId> {
        &self.registry_changed
    }
}

impl Default for LogRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogEntry;

    fn record_created(
        registry: &LogRegistry,
    ) -> (Arc<Mutex<Vec<SourceId>>>, crate::signal::Subscription) {
        let created = Arc::new(Mutex::new(Vec::new()));
        let store = Arc::clone(&created);
        let sub = registry
            .registry_changed()
            .connect(move |id| store.lock().push(id.clone()));
        (created, sub)
    }

    #[test]
    fn test_get_logger_returns_same_instance() {
        let registry = LogRegistry::new();
        let a1 = registry.get_logger("a");
        let a2 = registry.get_logger("a");
        assert!(Arc::ptr_eq(&a1, &a2));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_changed_fires_once_per_source() {
        let registry = LogRegistry::new();
        let (created, _sub) = record_created(&registry);

        registry.get_logger("a");
        registry.get_logger("b");
        registry.get_logger("a");
        registry.get_logger(SourceId::from("b"));

        assert_eq!(
            *created.lock(),
            vec![SourceId::from("a"), SourceId::from("b")]
        );
    }

    #[test]
    fn test_ids_compare_exactly() {
        let registry = LogRegistry::new();
        let lower = registry.get_logger("nb.ipynb");
        let upper = registry.get_logger("NB.ipynb");
        assert!(!Arc::ptr_eq(&lower, &upper));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_get_loggers_in_creation_order() {
        let registry = LogRegistry::new();
        registry.get_logger("z");
        registry.get_logger("a");
        registry.get_logger("m");

        let order: Vec<String> = registry
            .get_loggers()
            .iter()
            .map(|log| log.source().to_string())
            .collect();
        assert_eq!(order, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_find_does_not_create() {
        let registry = LogRegistry::new();
        let (created, _sub) = record_created(&registry);

        assert!(registry.find("a").is_none());
        assert!(registry.is_empty());
        assert!(created.lock().is_empty());

        registry.get_logger("a");
        assert!(registry.find("a").is_some());
    }

    #[test]
    fn test_logger_visible_inside_registry_changed_handler() {
        let registry = Arc::new(LogRegistry::new());
        let lengths = Arc::new(Mutex::new(Vec::new()));

        let weak = Arc::downgrade(&registry);
        let store = Arc::clone(&lengths);
        let _sub = registry.registry_changed().connect(move |id| {
            if let Some(registry) = weak.upgrade() {
                store.lock().push(registry.find(id.as_str()).map(|l| l.length()));
            }
        });

        registry.get_logger("a").log(LogEntry::stream("x"));
        assert_eq!(*lengths.lock(), vec![Some(0)]);
        assert_eq!(registry.get_logger("a").length(), 1);
    }
}
