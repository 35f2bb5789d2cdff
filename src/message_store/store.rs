//! Backend-agnostic interface to the message store

use async_trait::async_trait;

use crate::message_store::{
    error::Result,
    types::{ConversationSummary, NewTurn, Turn},
};

/// Persistence operations the relay and the HTTP layer need
///
/// Implementations only ever append turns or delete whole conversations;
/// a stored turn is never modified.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persist one turn and return it with its assigned id
    async fn insert_turn(&self, turn: NewTurn) -> Result<Turn>;

    /// All turns of a conversation, ascending by `created_at` (insertion order on ties)
    async fn find_turns_by_conversation(&self, conversation_id: &str) -> Result<Vec<Turn>>;

    /// One summary per conversation, most recently active first
    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>>;

    /// Delete every turn of a conversation, returning how many were removed
    async fn delete_conversation(&self, conversation_id: &str) -> Result<u64>;

    /// Check that the backend is reachable
    async fn ping(&self) -> Result<()>;
}
