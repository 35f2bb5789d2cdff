use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::turn::Role;

/// One row of the conversation listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub conversation_id: String,

    /// Content of the newest turn
    pub last_message: String,

    /// Role of the newest turn
    pub last_message_role: Role,

    /// Creation time of the newest turn
    pub last_message_time: DateTime<Utc>,

    pub message_count: i64,

    /// Content of the oldest turn
    pub first_message: String,
}
