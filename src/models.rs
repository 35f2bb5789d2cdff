// Request and response bodies of the HTTP surface

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::relay::{MessageReply, ERROR_MESSAGE};

// POST /chatbot/message and /chatbot/message/stream
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub message: String,
    pub conversation_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub message: String,
    pub conversation_id: String,
    pub timestamp: DateTime<Utc>,
}

impl From<MessageReply> for SendMessageResponse {
    fn from(reply: MessageReply) -> Self {
        Self {
            message: reply.message,
            conversation_id: reply.conversation_id,
            timestamp: reply.timestamp,
        }
    }
}

// Exchange failed after the user message was saved
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FailedMessageResponse {
    pub message: String,
    pub conversation_id: String,
    pub error: String,
}

impl FailedMessageResponse {
    pub fn new(conversation_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            message: ERROR_MESSAGE.to_string(),
            conversation_id: conversation_id.into(),
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeleteConversationResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WelcomeResponse {
    pub message: String,
}

// Body of every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}
