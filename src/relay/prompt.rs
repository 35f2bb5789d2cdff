use crate::llm::{ChatMessage, MessageRole};
use crate::message_store::{Role, Turn};

impl From<Role> for MessageRole {
    fn from(role: Role) -> Self {
        match role {
            Role::System => MessageRole::System,
            Role::User => MessageRole::User,
            Role::Assistant => MessageRole::Assistant,
        }
    }
}

/// Prompt sequence for one exchange: the system instruction, then the history as stored
pub fn build_prompt(system_prompt: &str, history: &[Turn]) -> Vec<ChatMessage> {
    std::iter::once(ChatMessage::system(system_prompt))
        .chain(history.iter().map(|turn| ChatMessage {
            role: turn.role.into(),
            content: turn.content.clone(),
        }))
        .collect()
}
