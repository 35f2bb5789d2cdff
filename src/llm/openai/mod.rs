//! OpenAI-compatible completion provider
//!
//! Works against OpenAI itself and against any server exposing the same
//! `/chat/completions` contract (the base URL is configurable).

pub mod client;
pub mod mapper;
pub mod sse;
pub mod types;

// Re-export commonly used types
pub use client::{OpenAiClient, OpenAiConfig};
