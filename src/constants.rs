//! Application-wide constants
//!
//! Centralized constants to avoid duplication and ensure consistency.

// =============================================================================
// Network
// =============================================================================

/// Default localhost UDP port for the host event feed
pub const DEFAULT_FEED_PORT: u16 = 9410;

/// UDP receive buffer size
pub const UDP_BUFFER_SIZE: usize = 65535;

/// Read timeout on the feed socket, so the receiver can observe shutdown (milliseconds)
pub const FEED_READ_TIMEOUT_MS: u64 = 100;

// =============================================================================
// Timing - Highlight
// =============================================================================

/// Quiet period before a new entry on a highlighted source flashes again (milliseconds)
pub const DEFAULT_FLASH_DEBOUNCE_MS: u64 = 100;

/// Duration of the attention pulse before it settles (milliseconds)
pub const DEFAULT_FLASH_PULSE_MS: u64 = 500;

// =============================================================================
// Buffers
// =============================================================================

/// Channel capacity for host events between the feed receiver and the event loop
pub const CHANNEL_CAPACITY: usize = 256;

// =============================================================================
// Files
// =============================================================================

/// Config file name, looked up next to the executable
pub const CONFIG_FILE_NAME: &str = "log-console.toml";
