//! Core types for the LLM abstraction layer

use serde::{Deserialize, Serialize};

use super::config::GenerationConfig;

/// Request for a chat completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Prompt sequence, system instruction first
    pub messages: Vec<ChatMessage>,
    /// Generation parameters
    pub config: GenerationConfig,
}

impl CompletionRequest {
    pub fn new(messages: Vec<ChatMessage>, config: GenerationConfig) -> Self {
        Self { messages, config }
    }
}

/// A single prompt entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Role of a prompt entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Instructions for the model
    System,
    /// Human input
    User,
    /// Model output
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// Result of a single-shot completion
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Generated text; providers may legitimately return none
    pub text: Option<String>,
    pub finish_reason: Option<FinishReason>,
    pub usage: Option<UsageMetadata>,
}

/// One incremental piece of a streamed completion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamChunk {
    /// Text delta, absent for role-only or usage-only chunks
    pub content: Option<String>,
    pub finish_reason: Option<FinishReason>,
}

impl StreamChunk {
    /// Chunk carrying a text delta
    pub fn text_delta(text: impl Into<String>) -> Self {
        Self {
            content: Some(text.into()),
            finish_reason: None,
        }
    }

    /// Delta text, only when it is non-empty
    pub fn text(&self) -> Option<&str> {
        self.content.as_deref().filter(|t| !t.is_empty())
    }
}

/// Reason why generation finished
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural completion
    Stop,
    /// Hit token limit
    Length,
    /// Blocked by content filters
    ContentFilter,
    /// Waiting for tool execution
    ToolCalls,
    /// Provider-specific reason
    Other(String),
}

impl FinishReason {
    /// Map the provider's wire value
    pub fn parse(reason: &str) -> Self {
        match reason {
            "stop" => FinishReason::Stop,
            "length" => FinishReason::Length,
            "content_filter" => FinishReason::ContentFilter,
            "tool_calls" | "function_call" => FinishReason::ToolCalls,
            other => FinishReason::Other(other.to_string()),
        }
    }
}

/// Token usage information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageMetadata {
    /// Prompt tokens consumed
    pub input_tokens: u32,
    /// Response tokens generated
    pub output_tokens: u32,
    /// Sum of input and output
    pub total_tokens: u32,
}

impl UsageMetadata {
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        assert_eq!(ChatMessage::system("s").role, MessageRole::System);
        assert_eq!(ChatMessage::user("u").role, MessageRole::User);
        let msg = ChatMessage::assistant("a");
        assert_eq!(msg.role, MessageRole::Assistant);
        assert_eq!(msg.content, "a");
    }

    #[test]
    fn test_chunk_text_filters_empty() {
        assert_eq!(StreamChunk::text_delta("he").text(), Some("he"));
        assert_eq!(StreamChunk::text_delta("").text(), None);
        assert_eq!(StreamChunk::default().text(), None);
    }

    #[test]
    fn test_finish_reason_parse() {
        assert_eq!(FinishReason::parse("stop"), FinishReason::Stop);
        assert_eq!(FinishReason::parse("length"), FinishReason::Length);
        assert_eq!(FinishReason::parse("function_call"), FinishReason::ToolCalls);
        assert_eq!(
            FinishReason::parse("eos"),
            FinishReason::Other("eos".to_string())
        );
    }

    #[test]
    fn test_usage_metadata_new() {
        let usage = UsageMetadata::new(100, 50);
        assert_eq!(usage.total_tokens, 150);
    }

    #[test]
    fn test_message_role_serialization() {
        assert_eq!(serde_json::to_string(&MessageRole::System).unwrap(), "\"system\"");
        assert_eq!(serde_json::to_string(&MessageRole::Assistant).unwrap(), "\"assistant\"");
    }
}
