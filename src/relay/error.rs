use crate::llm::LlmError;
use crate::message_store;

/// Failures of one relay invocation
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The inbound user turn could not be persisted; nothing else was attempted
    #[error("failed to save user message: {0}")]
    UserTurnNotSaved(#[source] message_store::Error),

    /// The user turn is saved but the exchange that follows it failed
    #[error(transparent)]
    Exchange(#[from] ExchangeError),
}

/// Failures after the user turn is persisted
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    /// History read or assistant-turn write failed
    #[error("{0}")]
    Store(#[from] message_store::Error),

    /// Completion provider failed (network, status, quota, stream)
    #[error("{0}")]
    Provider(#[from] LlmError),
}
