//! Log entry types
//!
//! Source identifiers, producer messages and the entries stored per source.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Identifier of one producer (e.g. a document path). Compared by exact string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&SourceId> for SourceId {
    fn from(id: &SourceId) -> Self {
        id.clone()
    }
}

impl Borrow<str> for SourceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of producer output that is recorded in a log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    /// Rich display output
    DisplayData,
    /// stdout/stderr text
    Stream,
    /// Error with traceback
    Error,
}

impl OutputKind {
    /// Map a producer message type to a loggable kind.
    ///
    /// Returns `None` for every other message type; those are dropped by the feed.
    pub fn classify(msg_type: &str) -> Option<Self> {
        match msg_type {
            "display_data" => Some(Self::DisplayData),
            "stream" => Some(Self::Stream),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

/// Raw message as delivered by a producer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProducerMessage {
    pub source: SourceId,
    pub msg_type: String,
    #[serde(default)]
    pub content: serde_json::Value,
}

impl ProducerMessage {
    pub fn new(
        source: impl Into<SourceId>,
        msg_type: impl Into<String>,
        content: serde_json::Value,
    ) -> Self {
        Self {
            source: source.into(),
            msg_type: msg_type.into(),
            content,
        }
    }
}

/// One stored output record. The payload is opaque to the log core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String, // HH:MM:SS.mmm
    pub kind: OutputKind,
    pub content: serde_json::Value,
}

impl LogEntry {
    /// Current timestamp as HH:MM:SS.mmm
    #[inline]
    fn now() -> String {
        chrono::Local::now().format("%H:%M:%S%.3f").to_string()
    }

    pub fn new(kind: OutputKind, content: serde_json::Value) -> Self {
        Self {
            timestamp: Self::now(),
            kind,
            content,
        }
    }

    /// Create a stream entry holding `text`
    pub fn stream(text: impl Into<String>) -> Self {
        Self::new(
            OutputKind::Stream,
            serde_json::json!({ "name": "stdout", "text": text.into() }),
        )
    }

    /// Build an entry from a producer message, or `None` if its type is not logged
    pub fn from_message(message: &ProducerMessage) -> Option<Self> {
        let kind = OutputKind::classify(&message.msg_type)?;
        Some(Self::new(kind, message.content.clone()))
    }
}
