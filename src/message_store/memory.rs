//! In-process message store
//!
//! Same ordering and listing semantics as the Postgres store, kept in a
//! `Vec` behind an async lock. Used by tests and by `STORE_BACKEND=memory`.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::message_store::{
    error::Result,
    store::MessageStore,
    types::{ConversationSummary, NewTurn, Turn},
};

#[derive(Debug, Default)]
pub struct InMemoryMessageStore {
    // Insertion order doubles as the tie-breaker for equal timestamps
    turns: RwLock<Vec<Turn>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored turns across all conversations
    pub async fn len(&self) -> usize {
        self.turns.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.turns.read().await.is_empty()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn insert_turn(&self, turn: NewTurn) -> Result<Turn> {
        let turn = turn.into_turn();
        self.turns.write().await.push(turn.clone());
        Ok(turn)
    }

    async fn find_turns_by_conversation(&self, conversation_id: &str) -> Result<Vec<Turn>> {
        let mut turns: Vec<Turn> = self
            .turns
            .read()
            .await
            .iter()
            .filter(|t| t.conversation_id == conversation_id)
            .cloned()
            .collect();
        // Stable sort keeps insertion order for equal timestamps
        turns.sort_by_key(|t| t.created_at);
        Ok(turns)
    }

    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>> {
        let turns = self.turns.read().await;

        let mut grouped: HashMap<&str, Vec<&Turn>> = HashMap::new();
        for turn in turns.iter() {
            grouped
                .entry(turn.conversation_id.as_str())
                .or_default()
                .push(turn);
        }

        let mut summaries: Vec<ConversationSummary> = grouped
            .into_iter()
            .filter_map(|(conversation_id, mut turns)| {
                turns.sort_by_key(|t| t.created_at);
                let first = turns.first()?;
                let last = turns.last()?;
                Some(ConversationSummary {
                    conversation_id: conversation_id.to_string(),
                    last_message: last.content.clone(),
                    last_message_role: last.role,
                    last_message_time: last.created_at,
                    message_count: turns.len() as i64,
                    first_message: first.content.clone(),
                })
            })
            .collect();

        summaries.sort_by(|a, b| {
            b.last_message_time
                .cmp(&a.last_message_time)
                .then_with(|| a.conversation_id.cmp(&b.conversation_id))
        });

        Ok(summaries)
    }

    async fn delete_conversation(&self, conversation_id: &str) -> Result<u64> {
        let mut turns = self.turns.write().await;
        let before = turns.len();
        turns.retain(|t| t.conversation_id != conversation_id);
        Ok((before - turns.len()) as u64)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
