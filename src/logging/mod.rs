//! Per-source output logs
//!
//! - `LogEntry` / `SourceId` - Entries and the producer they belong to
//! - `Log` - Append-only log for one source
//! - `LogRegistry` - Owner and lazy factory of logs
//! - `receiver` - UDP host event feed (host → console)

pub mod entry;
pub mod log;
pub mod receiver;
pub mod registry;

pub use entry::{LogEntry, OutputKind, ProducerMessage, SourceId};
pub use log::Log;
pub use receiver::HostEvent;
pub use registry::LogRegistry;

/// Initialize tracing output
///
/// Call early in main() before any logging occurs.
/// `level` is an `EnvFilter` directive; `verbose` forces debug-level output.
pub fn init_tracing(level: &str, verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = if verbose { "debug" } else { level };

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(false)
                .compact(),
        )
        .with(tracing_subscriber::EnvFilter::new(level))
        .try_init();
}
