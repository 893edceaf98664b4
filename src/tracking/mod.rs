//! Unread tracking and the status indicator's attention signal
//!
//! - `ReadTracker` - Watched-set and active source
//! - `HighlightMachine` - Debounced Clear / Flashing / Steady state
//! - `Presentation` - What the status indicator renders

pub mod highlight;
pub mod model;

pub use highlight::{HighlightMachine, HighlightSettings, HighlightState};
pub use model::{Observation, ReadTracker, StateChange};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Derived indicator state. Recomputed on every relevant event, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Presentation {
    pub state: HighlightState,
    pub unread_count: usize,
}

impl fmt::Display for Presentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state.css_class() {
            Some(class) => write!(f, "Log: {} [{}]", self.unread_count, class),
            None => write!(f, "Log: {}", self.unread_count),
        }
    }
}
