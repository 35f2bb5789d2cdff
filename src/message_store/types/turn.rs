use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::message_store::error::Error;

/// Author of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Fixed instructions prepended to every prompt
    System,
    /// Human input
    User,
    /// Model output
    Assistant,
}

impl Role {
    /// Get the role as it is stored and sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(Role::System),
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(Error::ValidationError(format!("Unknown role: {}", other))),
        }
    }
}

/// Current time at the precision Postgres keeps (microseconds)
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// A turn that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTurn {
    /// Conversation the turn belongs to
    pub conversation_id: String,

    /// Author of the turn
    pub role: Role,

    /// Message text
    pub content: String,

    /// Time the turn was constructed; becomes both `created_at` and `updated_at`
    pub created_at: DateTime<Utc>,
}

impl NewTurn {
    /// Create a new unsaved turn stamped with the current time
    pub fn new(conversation_id: impl Into<String>, role: Role, content: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            role,
            content: content.into(),
            created_at: now(),
        }
    }

    /// Override the creation time (builder pattern)
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Create a user turn
    pub fn user(conversation_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(conversation_id, Role::User, content)
    }

    /// Create an assistant turn
    pub fn assistant(conversation_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(conversation_id, Role::Assistant, content)
    }

    /// Assign an id, producing the record the store keeps
    pub(crate) fn into_turn(self) -> Turn {
        Turn {
            id: Uuid::new_v4(),
            conversation_id: self.conversation_id,
            role: self.role,
            content: self.content,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// A persisted chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    /// Unique identifier of the turn
    #[serde(rename = "_id")]
    pub id: Uuid,

    /// Conversation the turn belongs to
    pub conversation_id: String,

    /// Author of the turn
    pub role: Role,

    /// Message text
    pub content: String,

    /// UTC time the turn was inserted
    pub created_at: DateTime<Utc>,

    /// UTC time the turn was last written (equal to `created_at`, turns are append-only)
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in [Role::System, Role::User, Role::Assistant] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let err = "tool".parse::<Role>().unwrap_err();
        assert!(matches!(err, Error::ValidationError(_)));
        assert!(err.to_string().contains("tool"));
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), r#""assistant""#);
        assert!(serde_json::from_str::<Role>(r#""tool""#).is_err());
    }

    #[test]
    fn test_new_turn_constructors() {
        let turn = NewTurn::user("c1", "hi");
        assert_eq!(turn.conversation_id, "c1");
        assert_eq!(turn.role, Role::User);
        assert_eq!(turn.content, "hi");

        let turn = NewTurn::assistant("c1", "hello");
        assert_eq!(turn.role, Role::Assistant);
    }

    #[test]
    fn test_into_turn_sets_both_timestamps() {
        let at = now();
        let turn = NewTurn::user("c1", "hi").with_created_at(at).into_turn();
        assert_eq!(turn.created_at, at);
        assert_eq!(turn.updated_at, at);
    }

    #[test]
    fn test_now_is_microsecond_precision() {
        assert_eq!(now().timestamp_subsec_nanos() % 1_000, 0);
    }

    #[test]
    fn test_turn_json_shape() {
        let turn = NewTurn::user("c1", "hi").into_turn();
        let value = serde_json::to_value(&turn).unwrap();
        assert_eq!(value["_id"], turn.id.to_string());
        assert_eq!(value["conversationId"], "c1");
        assert_eq!(value["role"], "user");
        assert_eq!(value["content"], "hi");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
    }
}
