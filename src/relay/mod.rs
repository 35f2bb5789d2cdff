//! Chat relay
//!
//! Orchestrates one exchange between the caller, the message store and the
//! completion provider:
//!
//! 1. persist the user turn
//! 2. reload the ordered history
//! 3. prepend the system instruction
//! 4. ask the provider for a completion (streamed or single-shot)
//! 5. persist the assistant turn once the full text is known
//!
//! A failure in step 1 is returned as [`RelayError::UserTurnNotSaved`].
//! Anything failing afterwards is an [`ExchangeError`]: the single-shot path
//! returns it, the streaming path turns it into a terminal
//! [`RelayEvent::Error`]. Neither path retries, and no assistant turn is
//! written on failure.

pub mod error;
pub mod events;
pub mod prompt;

pub use error::{ExchangeError, RelayError};
pub use events::RelayEvent;
pub use prompt::build_prompt;

use chrono::{DateTime, Utc};
use futures::stream::Stream;
use futures::StreamExt;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error, info};

use crate::llm::{CompletionProvider, CompletionRequest, GenerationConfig};
use crate::message_store::{MessageStore, NewTurn, Turn};

/// Fixed instruction placed before every conversation history
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant. Be concise and friendly.";

/// User-facing text reported for any failed exchange
pub const ERROR_MESSAGE: &str = "Sorry, I encountered an error processing your request.";

/// Stored and returned when a single-shot completion carries no text
pub const EMPTY_REPLY_MESSAGE: &str = "Sorry, I could not generate a response.";

const EVENT_BUFFER: usize = 32;

/// Events of one streamed exchange
pub type RelayEventStream = Pin<Box<dyn Stream<Item = RelayEvent> + Send>>;

/// Settings fixed at startup and shared by every exchange
#[derive(Debug, Clone, PartialEq)]
pub struct RelaySettings {
    pub system_prompt: String,
    pub generation: GenerationConfig,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            generation: GenerationConfig::default(),
        }
    }
}

/// Result of a single-shot exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageReply {
    /// Assistant text, as persisted
    pub message: String,
    pub conversation_id: String,
    /// Creation time of the assistant turn
    pub timestamp: DateTime<Utc>,
}

/// Relay between callers, the message store and the completion provider
///
/// Cheap to clone; every clone shares the same store and provider.
#[derive(Clone)]
pub struct ChatRelay {
    store: Arc<dyn MessageStore>,
    provider: Arc<dyn CompletionProvider>,
    settings: Arc<RelaySettings>,
}

impl ChatRelay {
    pub fn new(
        store: Arc<dyn MessageStore>,
        provider: Arc<dyn CompletionProvider>,
        settings: RelaySettings,
    ) -> Self {
        Self {
            store,
            provider,
            settings: Arc::new(settings),
        }
    }

    pub fn store(&self) -> &Arc<dyn MessageStore> {
        &self.store
    }

    pub fn settings(&self) -> &RelaySettings {
        &self.settings
    }

    /// Run one exchange and return the whole reply at once
    ///
    /// # Errors
    ///
    /// * `RelayError::UserTurnNotSaved` - the user turn could not be written;
    ///   the provider was not called
    /// * `RelayError::Exchange` - the user turn is saved, but reading history,
    ///   the completion or saving the assistant turn failed
    pub async fn process_message(
        &self,
        conversation_id: &str,
        message: &str,
    ) -> Result<MessageReply, RelayError> {
        self.save_user_turn(conversation_id, message).await?;

        match self.complete_exchange(conversation_id).await {
            Ok(reply) => Ok(reply),
            Err(err) => {
                error!(conversation_id, error = %err, "exchange failed");
                Err(err.into())
            }
        }
    }

    async fn complete_exchange(&self, conversation_id: &str) -> Result<MessageReply, ExchangeError> {
        let request = self.load_prompt(conversation_id).await?;
        let completion = self.provider.complete(request).await?;

        let text = reply_text(completion.text.unwrap_or_default());

        let turn = self
            .store
            .insert_turn(NewTurn::assistant(conversation_id, text))
            .await?;

        info!(conversation_id, "assistant reply saved");

        Ok(MessageReply {
            message: turn.content,
            conversation_id: turn.conversation_id,
            timestamp: turn.created_at,
        })
    }

    /// Persist the user turn, then return the events of the streamed exchange
    ///
    /// The returned stream is lazy: history is read and the provider is
    /// called only once it is polled. It always ends with exactly one
    /// [`RelayEvent::End`] or [`RelayEvent::Error`].
    ///
    /// # Errors
    ///
    /// Only `RelayError::UserTurnNotSaved`; later failures are reported in the stream.
    pub async fn process_message_stream(
        &self,
        conversation_id: &str,
        message: &str,
    ) -> Result<RelayEventStream, RelayError> {
        self.save_user_turn(conversation_id, message).await?;

        let relay = self.clone();
        let conversation_id = conversation_id.to_string();

        Ok(Box::pin(async_stream::stream! {
            let request = match relay.load_prompt(&conversation_id).await {
                Ok(request) => request,
                Err(err) => {
                    yield failed(&conversation_id, err);
                    return;
                }
            };

            let mut chunks = match relay.provider.complete_stream(request).await {
                Ok(chunks) => chunks,
                Err(err) => {
                    yield failed(&conversation_id, err.into());
                    return;
                }
            };

            yield RelayEvent::Start {
                conversation_id: conversation_id.clone(),
            };

            let mut full_text = String::new();
            let mut emitted = 0usize;
            while let Some(chunk) = chunks.next().await {
                match chunk {
                    Ok(chunk) => {
                        if let Some(text) = chunk.text() {
                            full_text.push_str(text);
                            emitted += 1;
                            yield RelayEvent::Content {
                                content: text.to_string(),
                            };
                        }
                    }
                    Err(err) => {
                        yield failed(&conversation_id, err.into());
                        return;
                    }
                }
            }

            match relay
                .store
                .insert_turn(NewTurn::assistant(conversation_id.as_str(), reply_text(full_text)))
                .await
            {
                Ok(turn) => {
                    info!(conversation_id = %conversation_id, chunks = emitted, "streamed reply saved");
                    yield RelayEvent::End {
                        conversation_id,
                        timestamp: turn.created_at,
                    };
                }
                Err(err) => yield failed(&conversation_id, err.into()),
            }
        }))
    }

    async fn save_user_turn(&self, conversation_id: &str, message: &str) -> Result<Turn, RelayError> {
        let turn = self
            .store
            .insert_turn(NewTurn::user(conversation_id, message))
            .await
            .map_err(|err| {
                error!(conversation_id, error = %err, "failed to save user message");
                RelayError::UserTurnNotSaved(err)
            })?;
        debug!(conversation_id, turn_id = %turn.id, "user message saved");
        Ok(turn)
    }

    async fn load_prompt(&self, conversation_id: &str) -> Result<CompletionRequest, ExchangeError> {
        let history = self.store.find_turns_by_conversation(conversation_id).await?;
        let messages = build_prompt(&self.settings.system_prompt, &history);
        Ok(CompletionRequest::new(messages, self.settings.generation.clone()))
    }
}

/// Both paths persist the same text for a reply with no content
fn reply_text(text: String) -> String {
    if text.is_empty() {
        EMPTY_REPLY_MESSAGE.to_string()
    } else {
        text
    }
}

fn failed(conversation_id: &str, err: ExchangeError) -> RelayEvent {
    error!(conversation_id, error = %err, "streamed exchange failed");
    RelayEvent::Error {
        message: ERROR_MESSAGE.to_string(),
        error: err.to_string(),
    }
}

/// Drive an event stream on its own task, forwarding events through a channel
///
/// If the receiving side is dropped (the client disconnected) the exchange
/// still runs to completion, so a generated reply is persisted even though
/// nobody receives the remaining events.
pub fn detach(mut events: RelayEventStream) -> ReceiverStream<RelayEvent> {
    let (tx, rx) = mpsc::channel(EVENT_BUFFER);

    tokio::spawn(async move {
        let mut receiver_gone = false;
        while let Some(event) = events.next().await {
            if receiver_gone {
                continue;
            }
            if tx.send(event).await.is_err() {
                receiver_gone = true;
                debug!("client disconnected, finishing exchange without forwarding events");
            }
        }
    });

    ReceiverStream::new(rx)
}
