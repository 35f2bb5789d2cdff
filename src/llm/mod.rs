//! LLM Abstraction Layer
//!
//! This module provides the completion provider the relay talks to: a
//! backend-agnostic [`CompletionProvider`] trait and an OpenAI-compatible
//! HTTP implementation supporting single-shot and streamed completions.

pub mod core;
pub mod openai;

// Re-export commonly used types
pub use core::{
    config::GenerationConfig,
    error::LlmError,
    provider::{create_provider, ChunkStream, CompletionProvider},
    types::{
        ChatMessage, Completion, CompletionRequest, FinishReason, MessageRole, StreamChunk,
        UsageMetadata,
    },
};
pub use openai::{OpenAiClient, OpenAiConfig};
