//! Read/unread tracking per source
//!
//! [`ReadTracker`] follows every log in a [`LogRegistry`], flags a source dirty
//! whenever its log grows, and raises [`ReadTracker::state_changed`] for changes
//! that matter to the active source.

use crate::logging::{LogRegistry, SourceId};
use crate::signal::{Signal, Subscription};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tracing::trace;

/// Why the tracker raised `state_changed`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    /// `set_active_source` was called (even with the same id)
    ActiveSource,
    /// The active source's log received an entry
    EntryAdded(SourceId),
    /// Highlighting was suspended (`false`) or resumed (`true`)
    Highlighting(bool),
}

/// What the highlight machine needs to know about one `state_changed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub highlighting_enabled: bool,
    /// Re-derive the highlight from read state instead of treating this as a new entry
    pub reevaluate: bool,
    /// Active source exists and has entries the user has not seen
    pub active_source_unread: bool,
}

struct TrackerState {
    /// true = read. Missing means read.
    watched: HashMap<SourceId, bool>,
    /// One subscription per log, keyed by source
    subscriptions: HashMap<SourceId, Subscription>,
    active: Option<SourceId>,
    highlighting_enabled: bool,
    active_source_changed: bool,
}

impl TrackerState {
    fn active_source_unread(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|id| self.watched.get(id) == Some(&false))
    }
}

/// Watched-set, active source and suppression flag for the status indicator.
pub struct ReadTracker {
    registry: Arc<LogRegistry>,
    state: Mutex<TrackerState>,
    state_changed: Signal<StateChange>,
    _registry_subscription: Subscription,
}

impl ReadTracker {
    /// Create a tracker following every current and future log of `registry`
    pub fn new(registry: Arc<LogRegistry>) -> Arc<Self> {
        let tracker = Arc::new_cyclic(|weak: &Weak<Self>| {
            let weak = weak.clone();
            let registry_subscription = registry.registry_changed().connect(move |_| {
                if let Some(tracker) = weak.upgrade() {
                    tracker.attach_new_logs();
                }
            });

            Self {
                registry: Arc::clone(&registry),
                state: Mutex::new(TrackerState {
                    watched: HashMap::new(),
                    subscriptions: HashMap::new(),
                    active: None,
                    highlighting_enabled: true,
                    active_source_changed: false,
                }),
                state_changed: Signal::new(),
                _registry_subscription: registry_subscription,
            }
        });

        // Logs created before the tracker existed
        tracker.attach_new_logs();
        tracker
    }

    /// Subscribe to every log not followed yet and mark it read
    fn attach_new_logs(self: &Arc<Self>) {
        let logs = self.registry.get_loggers();
        let mut state = self.state.lock();

        for log in logs {
            let source = log.source().clone();
            if state.subscriptions.contains_key(&source) {
                continue;
            }

            let weak = Arc::downgrade(self);
            let subscription = log.changed().connect(move |id| {
                if let Some(tracker) = weak.upgrade() {
                    tracker.on_entry_added(id);
                }
            });
            trace!(source = %source, "tracking log");
            state.watched.insert(source.clone(), true);
            state.subscriptions.insert(source, subscription);
        }
    }

    fn on_entry_added(&self, source: &SourceId) {
        let is_active = {
            let mut state = self.state.lock();
            state.watched.insert(source.clone(), false);
            state.active.as_ref() == Some(source)
        };

        if is_active {
            self.state_changed
                .emit(&StateChange::EntryAdded(source.clone()));
        }
    }

    /// Point the tracker at a new active source. Always notifies.
    pub fn set_active_source(&self, source: Option<SourceId>) {
        {
            let mut state = self.state.lock();
            state.active = source;
            state.active_source_changed = true;
        }
        self.state_changed.emit(&StateChange::ActiveSource);
    }

    pub fn active_source(&self) -> Option<SourceId> {
        self.state.lock().active.clone()
    }

    /// Mark `source` as seen. Raises nothing.
    pub fn mark_source_read(&self, source: &SourceId) {
        self.state.lock().watched.insert(source.clone(), true);
    }

    /// True unless an entry arrived since the source was last marked read
    pub fn is_source_read(&self, source: &str) -> bool {
        self.state.lock().watched.get(source).copied().unwrap_or(true)
    }

    /// Total entries of the active source's log; 0 without an active source
    pub fn log_count(&self) -> usize {
        let Some(active) = self.active_source() else {
            return 0;
        };
        self.registry
            .find(active.as_str())
            .map_or(0, |log| log.length())
    }

    /// Suspend (`false`) or resume (`true`) highlighting. Always notifies.
    pub fn set_highlighting_enabled(&self, enabled: bool) {
        self.state.lock().highlighting_enabled = enabled;
        self.state_changed.emit(&StateChange::Highlighting(enabled));
    }

    pub fn highlighting_enabled(&self) -> bool {
        self.state.lock().highlighting_enabled
    }

    /// Whether a source switch is waiting to be handled
    pub fn active_source_changed(&self) -> bool {
        self.state.lock().active_source_changed
    }

    /// Snapshot for one `state_changed`, consuming a pending source switch.
    ///
    /// A switch stays pending while highlighting is suspended.
    pub fn observe(&self, change: &StateChange) -> Observation {
        let mut state = self.state.lock();
        let enabled = state.highlighting_enabled;
        let reevaluate = enabled
            && (std::mem::take(&mut state.active_source_changed)
                || matches!(change, StateChange::Highlighting(true)));

        Observation {
            highlighting_enabled: enabled,
            reevaluate,
            active_source_unread: state.active_source_unread(),
        }
    }

    /// Snapshot without consuming anything (used when a timer fires)
    pub fn snapshot(&self) -> Observation {
        let state = self.state.lock();
        Observation {
            highlighting_enabled: state.highlighting_enabled,
            reevaluate: false,
            active_source_unread: state.active_source_unread(),
        }
    }

    /// Raised for active-source switches, entries on the active source and
    /// suspension changes
    pub fn state_changed(&self) -> &Signal<StateChange> {
        &self.state_changed
    }

    pub fn registry(&self) -> &Arc<LogRegistry> {
        &self.registry
    }
}
