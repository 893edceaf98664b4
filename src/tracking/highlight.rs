//! Debounced highlight state machine for the status indicator.
//!
//! Rules, applied to every tracker `state_changed` in priority order:
//!
//! - **Suppressed**: highlighting disabled forces `Clear` and cancels the timer.
//! - **Re-evaluate** (source switch, or highlighting resumed): `Steady` if the
//!   active source is unread, else `Clear`. No debounce.
//! - **New entry**: from `Clear` with nothing pending, flash immediately.
//!   Otherwise drop to `Clear` and (re)schedule a flash one debounce window
//!   out, so a burst of entries produces one flash after it goes quiet.
//!
//! A flash lasts one pulse, then settles to `Steady` or `Clear` depending on
//! the read state at that moment.
//!
//! The machine owns a single timer slot. Scheduling replaces whatever was in
//! it; the host calls [`HighlightMachine::poll`] once
//! [`HighlightMachine::next_deadline`] has passed.

use super::Observation;
use crate::constants::{DEFAULT_FLASH_DEBOUNCE_MS, DEFAULT_FLASH_PULSE_MS};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

/// Visual attention state of the status indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightState {
    #[default]
    Clear,
    /// Brief attention pulse
    Flashing,
    /// Persistent highlight until cleared
    Steady,
}

impl HighlightState {
    pub fn is_highlighted(self) -> bool {
        !matches!(self, Self::Clear)
    }

    /// Presentation class for the indicator (none / flashing / steady)
    pub fn css_class(self) -> Option<&'static str> {
        match self {
            Self::Clear => None,
            Self::Flashing => Some("flashing"),
            Self::Steady => Some("steady"),
        }
    }
}

/// Debounce window and pulse length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSettings {
    pub debounce: Duration,
    pub pulse: Duration,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_FLASH_DEBOUNCE_MS),
            pulse: Duration::from_millis(DEFAULT_FLASH_PULSE_MS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerAction {
    /// Debounce elapsed: start the pulse
    Flash,
    /// Pulse elapsed: settle
    Settle,
}

#[derive(Debug, Clone, Copy)]
struct ScheduledTask {
    due: Instant,
    action: TimerAction,
}

pub struct HighlightMachine {
    state: HighlightState,
    timer: Option<ScheduledTask>,
    settings: HighlightSettings,
    flash_count: u64,
}

impl HighlightMachine {
    pub fn new(settings: HighlightSettings) -> Self {
        Self {
            state: HighlightState::Clear,
            timer: None,
            settings,
            flash_count: 0,
        }
    }

    pub fn state(&self) -> HighlightState {
        self.state
    }

    /// Transitions into `Flashing` since creation
    pub fn flash_count(&self) -> u64 {
        self.flash_count
    }

    /// A debounced flash is waiting for its window to elapse
    pub fn flash_pending(&self) -> bool {
        matches!(
            self.timer,
            Some(ScheduledTask {
                action: TimerAction::Flash,
                ..
            })
        )
    }

    /// When the host must call `poll` next
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.map(|task| task.due)
    }

    /// Apply one tracker `state_changed`. Returns the resulting state.
    pub fn on_state_changed(&mut self, obs: Observation, now: Instant) -> HighlightState {
        if !obs.highlighting_enabled {
            self.cancel();
            self.state = HighlightState::Clear;
        } else if obs.reevaluate {
            self.cancel();
            self.state = Self::resting_state(obs);
        } else if self.state.is_highlighted() || self.flash_pending() {
            self.state = HighlightState::Clear;
            self.schedule(now + self.settings.debounce, TimerAction::Flash);
        } else {
            self.start_flash(now);
        }

        trace!(state = ?self.state, "highlight updated");
        self.state
    }

    /// Fire the timer if it is due. Returns true if the state changed.
    pub fn poll(&mut self, obs: Observation, now: Instant) -> bool {
        let Some(task) = self.timer else {
            return false;
        };
        if task.due > now {
            return false;
        }
        self.timer = None;

        let before = self.state;
        if !obs.highlighting_enabled {
            self.state = HighlightState::Clear;
        } else {
            match task.action {
                TimerAction::Flash => self.start_flash(now),
                TimerAction::Settle => self.state = Self::resting_state(obs),
            }
        }

        trace!(action = ?task.action, state = ?self.state, "highlight timer fired");
        self.state != before
    }

    fn resting_state(obs: Observation) -> HighlightState {
        if obs.active_source_unread {
            HighlightState::Steady
        } else {
            HighlightState::Clear
        }
    }

    fn start_flash(&mut self, now: Instant) {
        self.state = HighlightState::Flashing;
        self.flash_count += 1;
        self.schedule(now + self.settings.pulse, TimerAction::Settle);
    }

    /// Replace the timer slot
    fn schedule(&mut self, due: Instant, action: TimerAction) {
        self.timer = Some(ScheduledTask { due, action });
    }

    fn cancel(&mut self) {
        self.timer = None;
    }
}

impl Default for HighlightMachine {
    fn default() -> Self {
        Self::new(HighlightSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(100);
    const PULSE: Duration = Duration::from_millis(500);

    fn machine() -> HighlightMachine {
        HighlightMachine::new(HighlightSettings {
            debounce: WINDOW,
            pulse: PULSE,
        })
    }

    fn entry() -> Observation {
        Observation {
            highlighting_enabled: true,
            reevaluate: false,
            active_source_unread: true,
        }
    }

    fn switch(unread: bool) -> Observation {
        Observation {
            highlighting_enabled: true,
            reevaluate: true,
            active_source_unread: unread,
        }
    }

    fn suppressed() -> Observation {
        Observation {
            highlighting_enabled: false,
            reevaluate: false,
            active_source_unread: true,
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_initial_state_clear() {
        let m = machine();
        assert_eq!(m.state(), HighlightState::Clear);
        assert!(m.next_deadline().is_none());
    }

    #[test]
    fn test_switch_to_read_source_clears() {
        let mut m = machine();
        let t0 = Instant::now();
        m.on_state_changed(switch(true), t0);
        assert_eq!(m.state(), HighlightState::Steady);

        assert_eq!(m.on_state_changed(switch(false), t0), HighlightState::Clear);
    }

    #[test]
    fn test_switch_to_unread_source_is_immediate() {
        let mut m = machine();
        let t0 = Instant::now();
        assert_eq!(m.on_state_changed(switch(true), t0), HighlightState::Steady);
        assert!(m.next_deadline().is_none());
        assert_eq!(m.flash_count(), 0);
    }

    #[test]
    fn test_entry_from_clear_flashes_immediately() {
        let mut m = machine();
        let t0 = Instant::now();
        assert_eq!(m.on_state_changed(entry(), t0), HighlightState::Flashing);
        assert_eq!(m.flash_count(), 1);
        assert_eq!(m.next_deadline(), Some(t0 + PULSE));
    }

    #[test]
    fn test_flash_settles_to_steady() {
        let mut m = machine();
        let t0 = Instant::now();
        m.on_state_changed(entry(), t0);

        assert!(!m.poll(entry(), t0 + ms(499)));
        assert!(m.poll(entry(), t0 + PULSE));
        assert_eq!(m.state(), HighlightState::Steady);
        assert!(m.next_deadline().is_none());
    }

    #[test]
    fn test_flash_settles_to_clear_when_read() {
        let mut m = machine();
        let t0 = Instant::now();
        m.on_state_changed(entry(), t0);

        let read = Observation {
            active_source_unread: false,
            ..entry()
        };
        m.poll(read, t0 + PULSE);
        assert_eq!(m.state(), HighlightState::Clear);
    }

    #[test]
    fn test_burst_from_steady_flashes_once_after_last_entry() {
        let mut m = machine();
        let t0 = Instant::now();
        m.on_state_changed(switch(true), t0);
        assert_eq!(m.state(), HighlightState::Steady);

        m.on_state_changed(entry(), t0);
        m.on_state_changed(entry(), t0 + ms(10));
        m.on_state_changed(entry(), t0 + ms(20));
        assert_eq!(m.state(), HighlightState::Clear);
        assert_eq!(m.flash_count(), 0);

        // Windows of the first two entries have passed; nothing fires
        assert!(!m.poll(entry(), t0 + ms(110)));
        assert_eq!(m.flash_count(), 0);

        assert!(m.poll(entry(), t0 + ms(120)));
        assert_eq!(m.state(), HighlightState::Flashing);
        assert_eq!(m.flash_count(), 1);
    }

    #[test]
    fn test_single_timer_slot() {
        let mut m = machine();
        let t0 = Instant::now();
        m.on_state_changed(switch(true), t0);
        for i in 0..5 {
            m.on_state_changed(entry(), t0 + ms(i * 10));
        }
        assert_eq!(m.next_deadline(), Some(t0 + ms(40) + WINDOW));
    }

    #[test]
    fn test_entry_during_pulse_restarts_debounce() {
        let mut m = machine();
        let t0 = Instant::now();
        m.on_state_changed(entry(), t0);
        assert_eq!(m.state(), HighlightState::Flashing);

        m.on_state_changed(entry(), t0 + ms(50));
        assert_eq!(m.state(), HighlightState::Clear);
        assert!(m.flash_pending());
        assert_eq!(m.next_deadline(), Some(t0 + ms(150)));

        m.poll(entry(), t0 + ms(150));
        assert_eq!(m.flash_count(), 2);
    }

    #[test]
    fn test_suppression_forces_clear_and_cancels() {
        let mut m = machine();
        let t0 = Instant::now();
        m.on_state_changed(switch(true), t0);
        m.on_state_changed(entry(), t0);
        assert!(m.flash_pending());

        assert_eq!(m.on_state_changed(suppressed(), t0 + ms(5)), HighlightState::Clear);
        assert!(m.next_deadline().is_none());
        assert!(!m.poll(suppressed(), t0 + ms(1000)));
        assert_eq!(m.flash_count(), 0);
    }

    #[test]
    fn test_entries_while_suppressed_stay_clear() {
        let mut m = machine();
        let t0 = Instant::now();
        for i in 0..3 {
            assert_eq!(
                m.on_state_changed(suppressed(), t0 + ms(i)),
                HighlightState::Clear
            );
        }
        assert_eq!(m.flash_count(), 0);
    }

    #[test]
    fn test_due_timer_does_not_flash_while_suppressed() {
        let mut m = machine();
        let t0 = Instant::now();
        m.on_state_changed(switch(true), t0);
        m.on_state_changed(entry(), t0);

        // Suppression observed only at fire time
        m.poll(suppressed(), t0 + WINDOW);
        assert_eq!(m.state(), HighlightState::Clear);
        assert_eq!(m.flash_count(), 0);
        assert!(m.next_deadline().is_none());
    }

    #[test]
    fn test_switch_cancels_pending_flash() {
        let mut m = machine();
        let t0 = Instant::now();
        m.on_state_changed(switch(true), t0);
        m.on_state_changed(entry(), t0);

        m.on_state_changed(switch(false), t0 + ms(10));
        assert_eq!(m.state(), HighlightState::Clear);
        assert!(!m.poll(entry(), t0 + ms(500)));
        assert_eq!(m.flash_count(), 0);
    }

    #[test]
    fn test_css_class() {
        assert_eq!(HighlightState::Clear.css_class(), None);
        assert_eq!(HighlightState::Flashing.css_class(), Some("flashing"));
        assert_eq!(HighlightState::Steady.css_class(), Some("steady"));
    }
}
