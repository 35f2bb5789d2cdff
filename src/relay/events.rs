//! Events emitted by the streaming relay

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One event of a streamed exchange
///
/// Every stream is `Start`, any number of `Content`, then exactly one of
/// `End` or `Error`. An `Error` can also arrive without a preceding `Start`
/// when the exchange fails before the provider stream is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RelayEvent {
    /// Provider stream is open
    Start {
        #[serde(rename = "conversationId")]
        conversation_id: String,
    },
    /// One chunk of generated text (only the chunk, not the running total)
    Content { content: String },
    /// Assistant turn has been persisted
    End {
        #[serde(rename = "conversationId")]
        conversation_id: String,
        timestamp: DateTime<Utc>,
    },
    /// Exchange failed; nothing was persisted for the assistant
    Error { message: String, error: String },
}

impl RelayEvent {
    /// Whether no further events follow this one
    pub fn is_terminal(&self) -> bool {
        matches!(self, RelayEvent::End { .. } | RelayEvent::Error { .. })
    }
}
