//! Log Console - per-source output logs with an unread attention indicator
//!
//! Producers append entries to per-source logs held by a [`LogRegistry`].
//! A [`ReadTracker`] follows every log and the host's active source, and a
//! debounced [`HighlightMachine`] turns new entries into the indicator's
//! Clear / Flashing / Steady [`Presentation`]. [`Console`] wires them together.

pub mod cli;
pub mod config;
pub mod console;
pub mod constants;
pub mod error;
pub mod logging;
pub mod signal;
pub mod tracking;

pub use console::Console;
pub use error::{ConsoleError, Result};
pub use logging::{HostEvent, Log, LogEntry, LogRegistry, OutputKind, ProducerMessage, SourceId};
pub use signal::{Signal, Subscription};
pub use tracking::{HighlightMachine, HighlightSettings, HighlightState, Presentation, ReadTracker};
