//! Mapping between abstraction types and OpenAI wire types

use crate::llm::core::{
    error::LlmError,
    types::{Completion, CompletionRequest, FinishReason, StreamChunk, UsageMetadata},
};

use super::types::{
    ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse, OpenAiMessage, OpenAiUsage,
};

/// Convert our abstraction request to the wire request
pub fn to_openai_request(
    model: &str,
    request: CompletionRequest,
    stream: bool,
) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.to_string(),
        messages: request
            .messages
            .into_iter()
            .map(|message| OpenAiMessage {
                role: message.role.as_str().to_string(),
                content: message.content,
            })
            .collect(),
        max_tokens: request.config.max_tokens,
        temperature: request.config.temperature,
        stream,
    }
}

/// Convert a single-shot response, reading the first choice
pub fn from_openai_response(response: ChatCompletionResponse) -> Result<Completion, LlmError> {
    let usage = response.usage.map(to_usage);
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(LlmError::EmptyResponse)?;

    Ok(Completion {
        text: choice.message.content,
        finish_reason: choice.finish_reason.as_deref().map(FinishReason::parse),
        usage,
    })
}

/// Convert one stream chunk, reading the first choice
///
/// Chunks without choices (e.g. a trailing usage report) become an empty chunk.
pub fn from_openai_chunk(chunk: ChatCompletionChunk) -> StreamChunk {
    match chunk.choices.into_iter().next() {
        Some(choice) => StreamChunk {
            content: choice.delta.content,
            finish_reason: choice.finish_reason.as_deref().map(FinishReason::parse),
        },
        None => StreamChunk::default(),
    }
}

fn to_usage(usage: OpenAiUsage) -> UsageMetadata {
    UsageMetadata::new(usage.prompt_tokens, usage.completion_tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::core::{config::GenerationConfig, types::ChatMessage};

    #[test]
    fn test_to_openai_request_keeps_order_and_roles() {
        let request = CompletionRequest::new(
            vec![
                ChatMessage::system("be nice"),
                ChatMessage::user("hi"),
                ChatMessage::assistant("hello"),
            ],
            GenerationConfig::default(),
        );

        let wire = to_openai_request("gpt-3.5-turbo", request, false);
        let roles: Vec<&str> = wire.messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "user", "assistant"]);
        assert_eq!(wire.max_tokens, 500);
        assert_eq!(wire.temperature, Some(0.7));
        assert!(!wire.stream);
    }

    #[test]
    fn test_from_openai_response() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"id":"c","choices":[{"index":0,"message":{"role":"assistant","content":"hello"},"finish_reason":"stop"}],"usage":{"prompt_tokens":5,"completion_tokens":1,"total_tokens":6}}"#,
        )
        .unwrap();

        let completion = from_openai_response(response).unwrap();
        assert_eq!(completion.text.as_deref(), Some("hello"));
        assert_eq!(completion.finish_reason, Some(FinishReason::Stop));
        assert_eq!(completion.usage.unwrap().total_tokens, 6);
    }

    #[test]
    fn test_from_openai_response_without_choices() {
        let response: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            from_openai_response(response),
            Err(LlmError::EmptyResponse)
        ));
    }

    #[test]
    fn test_from_openai_chunk() {
        let chunk: ChatCompletionChunk =
            serde_json::from_str(r#"{"choices":[{"index":0,"delta":{"content":"he"}}]}"#).unwrap();
        assert_eq!(from_openai_chunk(chunk).text(), Some("he"));

        let usage_only: ChatCompletionChunk =
            serde_json::from_str(r#"{"choices":[],"usage":{"prompt_tokens":1,"completion_tokens":1,"total_tokens":2}}"#)
                .unwrap();
        assert_eq!(from_openai_chunk(usage_only), StreamChunk::default());
    }
}
