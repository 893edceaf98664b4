//! Append-only per-source log
//!
//! No rotation and no clearing: a log only grows for the lifetime of its registry.

use super::{LogEntry, SourceId};
use crate::signal::Signal;
use parking_lot::Mutex;

/// Ordered entries for exactly one source.
///
/// Every [`Log::log`] call raises [`Log::changed`] once, synchronously,
/// carrying the source id.
pub struct Log {
    source: SourceId,
    entries: Mutex<Vec<LogEntry>>,
    changed: Signal<SourceId>,
}

impl Log {
    pub(crate) fn new(source: SourceId) -> Self {
        Self {
            source,
            entries: Mutex::new(Vec::new()),
            changed: Signal::new(),
        }
    }

    /// Append an entry and notify subscribers
    pub fn log(&self, entry: LogEntry) {
        self.entries.lock().push(entry);
        self.changed.emit(&self.source);
    }

    /// Number of entries appended so far
    pub fn length(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.length() == 0
    }

    pub fn source(&self) -> &SourceId {
        &self.source
    }

    /// Raised once per appended entry
    pub fn changed(&self) -> &Signal<SourceId> {
        &self.changed
    }

    /// Snapshot of all entries in insertion order
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    /// Most recent entry
    pub fn last(&self) -> Option<LogEntry> {
        self.entries.lock().last().cloned()
    }
}

impl std::fmt::Debug for Log {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Log")
            .field("source", &self.source)
            .field("length", &self.length())
            .finish()
    }
}
