//! Provider trait for completion backends

use async_trait::async_trait;
use futures::stream::Stream;
use std::pin::Pin;
use std::sync::Arc;

use super::{
    error::LlmError,
    types::{Completion, CompletionRequest, StreamChunk},
};
use crate::llm::openai::{OpenAiClient, OpenAiConfig};

/// Lazy, finite, non-restartable sequence of completion chunks
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<StreamChunk, LlmError>> + Send>>;

/// Interface every completion backend must satisfy
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Request the whole completion in one response
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, LlmError>;

    /// Open an incremental completion stream
    ///
    /// Errors before the first chunk (bad status, unreachable endpoint) are
    /// returned here; errors after that arrive as `Err` items of the stream.
    async fn complete_stream(&self, request: CompletionRequest) -> Result<ChunkStream, LlmError>;
}

/// Create the process-wide completion provider from static configuration
///
/// # Example
///
/// ```rust,no_run
/// use chatbot_relay::llm::{create_provider, OpenAiConfig};
///
/// let provider = create_provider(OpenAiConfig::new(
///     "https://api.openai.com/v1",
///     "sk-test",
///     "gpt-3.5-turbo",
/// ))?;
/// # Ok::<(), chatbot_relay::llm::LlmError>(())
/// ```
pub fn create_provider(config: OpenAiConfig) -> Result<Arc<dyn CompletionProvider>, LlmError> {
    let client = OpenAiClient::new(config)?;
    Ok(Arc::new(client))
}
