//! Console orchestration
//!
//! [`Console`] wires a [`LogRegistry`], a [`ReadTracker`] and a
//! [`HighlightMachine`] together, routes host events into them and publishes
//! the resulting [`Presentation`]. [`run`] is the event loop that feeds it
//! and fires the highlight timer.

use crate::logging::{HostEvent, Log, LogEntry, LogRegistry, ProducerMessage, SourceId};
use crate::signal::{Signal, Subscription};
use crate::tracking::{
    HighlightMachine, HighlightSettings, HighlightState, Presentation, ReadTracker, StateChange,
};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, trace};

struct Shared {
    registry: Arc<LogRegistry>,
    tracker: Arc<ReadTracker>,
    machine: Mutex<HighlightMachine>,
    last: Mutex<Presentation>,
    presentation_changed: Signal<Presentation>,
    _tracker_subscription: Subscription,
}

impl Shared {
    fn on_state_changed(&self, change: &StateChange) {
        let obs = self.tracker.observe(change);
        self.machine.lock().on_state_changed(obs, Instant::now());
        self.publish();
    }

    /// Recompute the presentation and notify if it differs from the last one
    fn publish(&self) {
        let current = Presentation {
            state: self.machine.lock().state(),
            unread_count: self.tracker.log_count(),
        };

        {
            let mut last = self.last.lock();
            if *last == current {
                return;
            }
            *last = current;
        }

        debug!(state = ?current.state, unread = current.unread_count, "presentation changed");
        self.presentation_changed.emit(&current);
    }
}

/// Handle to the log core plus its attention signal. Cheap to clone.
#[derive(Clone)]
pub struct Console {
    shared: Arc<Shared>,
}

impl Console {
    pub fn new(registry: Arc<LogRegistry>, settings: HighlightSettings) -> Self {
        let tracker = ReadTracker::new(Arc::clone(&registry));

        let shared = Arc::new_cyclic(|weak: &Weak<Shared>| {
            let weak = weak.clone();
            let subscription = tracker.state_changed().connect(move |change| {
                if let Some(shared) = weak.upgrade() {
                    shared.on_state_changed(change);
                }
            });

            Shared {
                registry,
                tracker: Arc::clone(&tracker),
                machine: Mutex::new(HighlightMachine::new(settings)),
                last: Mutex::new(Presentation::default()),
                presentation_changed: Signal::new(),
                _tracker_subscription: subscription,
            }
        });

        Self { shared }
    }

    /// Route one host event
    pub fn handle(&self, event: HostEvent) {
        match event {
            HostEvent::Message(message) => {
                self.ingest(&message);
            }
            HostEvent::ActiveSource { source } => self.set_active_source(source),
            HostEvent::ViewerOpened => {
                self.open_viewer();
            }
            HostEvent::ViewerClosed => self.close_viewer(),
        }
    }

    /// Log a producer message. Returns false if its kind is not logged.
    pub fn ingest(&self, message: &ProducerMessage) -> bool {
        let Some(entry) = LogEntry::from_message(message) else {
            trace!(source = %message.source, msg_type = %message.msg_type, "ignoring message");
            return false;
        };
        self.shared.registry.get_logger(&message.source).log(entry);
        true
    }

    pub fn set_active_source(&self, source: Option<SourceId>) {
        debug!(source = ?source, "active source changed");
        self.shared.tracker.set_active_source(source);
    }

    /// Open or focus the viewer for the active source.
    ///
    /// Marks the source read and suspends highlighting until [`Console::close_viewer`].
    /// Returns `None` when there is no active source.
    pub fn open_viewer(&self) -> Option<Arc<Log>> {
        let source = self.shared.tracker.active_source()?;
        let log = self.shared.registry.get_logger(&source);
        self.shared.tracker.mark_source_read(&source);
        self.shared.tracker.set_highlighting_enabled(false);
        Some(log)
    }

    /// Viewer lost focus: resume highlighting
    pub fn close_viewer(&self) {
        self.shared.tracker.set_highlighting_enabled(true);
    }

    /// Fire the highlight timer if it is due at `now`
    pub fn poll_timers(&self, now: Instant) {
        let obs = self.shared.tracker.snapshot();
        let fired = self.shared.machine.lock().poll(obs, now);
        if fired {
            self.shared.publish();
        }
    }

    /// Deadline of the pending highlight timer
    pub fn next_deadline(&self) -> Option<Instant> {
        self.shared.machine.lock().next_deadline()
    }

    pub fn presentation(&self) -> Presentation {
        *self.shared.last.lock()
    }

    pub fn highlight_state(&self) -> HighlightState {
        self.shared.machine.lock().state()
    }

    /// Transitions into `Flashing` since creation
    pub fn flash_count(&self) -> u64 {
        self.shared.machine.lock().flash_count()
    }

    /// Raised whenever the presentation differs from the previous one
    pub fn presentation_changed(&self) -> &Signal<Presentation> {
        &self.shared.presentation_changed
    }

    pub fn registry(&self) -> &Arc<LogRegistry> {
        &self.shared.registry
    }

    pub fn tracker(&self) -> &Arc<ReadTracker> {
        &self.shared.tracker
    }
}

/// Sleep until `deadline`, or forever without one
async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Event loop: handle host events in order and fire the highlight timer.
///
/// Returns when the event channel closes.
pub async fn run(console: Console, mut events: mpsc::Receiver<HostEvent>) {
    loop {
        let deadline = console.next_deadline();

        tokio::select! {
            event = events.recv() => match event {
                Some(event) => console.handle(event),
                None => break,
            },
            _ = sleep_until_deadline(deadline) => {
                console.poll_timers(Instant::now());
            }
        }
    }
    debug!("console event loop stopped");
}
