//! Server-Sent Events (SSE) parser for streamed chat completions

use bytes::Bytes;
use futures::stream::Stream;
use futures::StreamExt;
use std::pin::Pin;

use crate::llm::core::error::LlmError;

use super::types::{ChatCompletionChunk, ErrorEnvelope};

/// Incremental decoder for the completion event stream
///
/// The stream looks like:
/// ```text
/// data: {"choices":[{"delta":{"content":"he"}}]}
///
/// data: {"choices":[{"delta":{"content":"llo"}}]}
///
/// data: [DONE]
/// ```
///
/// Bytes are buffered rather than decoded per network chunk, so a multi-byte
/// character split across chunks is reassembled before UTF-8 decoding.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    done: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the `[DONE]` sentinel has been seen
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feed raw bytes, returning every event completed by them
    pub fn push(&mut self, bytes: &[u8]) -> Vec<Result<ChatCompletionChunk, LlmError>> {
        if self.done {
            return Vec::new();
        }

        // CR only ever appears as part of a line ending
        self.buffer
            .extend(bytes.iter().copied().filter(|b| *b != b'\r'));

        let mut events = Vec::new();
        while let Some(end) = self.buffer.windows(2).position(|w| w == b"\n\n") {
            let raw: Vec<u8> = self.buffer.drain(..end + 2).collect();
            if let Some(event) = self.parse_event(&raw[..end]) {
                events.push(event);
            }
            if self.done {
                self.buffer.clear();
                break;
            }
        }
        events
    }

    /// Flush a final event that was not followed by a blank line
    pub fn finish(&mut self) -> Vec<Result<ChatCompletionChunk, LlmError>> {
        if self.done || self.buffer.iter().all(|b| b.is_ascii_whitespace()) {
            return Vec::new();
        }
        let raw = std::mem::take(&mut self.buffer);
        self.parse_event(&raw).into_iter().collect()
    }

    fn parse_event(&mut self, raw: &[u8]) -> Option<Result<ChatCompletionChunk, LlmError>> {
        let text = match std::str::from_utf8(raw) {
            Ok(text) => text,
            Err(e) => {
                return Some(Err(LlmError::StreamError(format!(
                    "Invalid UTF-8 in stream: {}",
                    e
                ))))
            }
        };

        let mut data: Option<String> = None;
        for line in text.lines() {
            // Comment lines keep proxies from closing idle connections
            if line.starts_with(':') {
                continue;
            }
            if let Some(value) = line.strip_prefix("data:") {
                let value = value.strip_prefix(' ').unwrap_or(value);
                match data.as_mut() {
                    Some(existing) => {
                        existing.push('\n');
                        existing.push_str(value);
                    }
                    None => data = Some(value.to_string()),
                }
            }
        }

        let data = data?;
        let data = data.trim();
        if data.is_empty() {
            return None;
        }
        if data == "[DONE]" {
            self.done = true;
            return None;
        }

        Some(parse_payload(data))
    }
}

/// Parse one `data:` payload, surfacing in-band provider errors
fn parse_payload(data: &str) -> Result<ChatCompletionChunk, LlmError> {
    let value: serde_json::Value = serde_json::from_str(data).map_err(|e| {
        LlmError::SerializationError(format!("Failed to parse SSE chunk: {}. Data: {}", e, data))
    })?;

    if value.get("error").is_some() {
        let envelope: ErrorEnvelope = serde_json::from_value(value)?;
        return Err(LlmError::ProviderError {
            code: envelope.error.code_string(),
            message: envelope.error.message,
        });
    }

    Ok(serde_json::from_value(value)?)
}

/// Parse a stream of bytes as completion chunks
///
/// The returned stream ends at `[DONE]`, at the end of the body, or right
/// after the first error it yields.
pub fn parse_sse_stream(
    byte_stream: Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>,
) -> Pin<Box<dyn Stream<Item = Result<ChatCompletionChunk, LlmError>> + Send>> {
    Box::pin(async_stream::stream! {
        let mut byte_stream = byte_stream;
        let mut decoder = SseDecoder::new();

        while let Some(chunk) = byte_stream.next().await {
            let bytes = match chunk {
                Ok(bytes) => bytes,
                Err(e) => {
                    yield Err(LlmError::StreamError(e.to_string()));
                    return;
                }
            };

            for event in decoder.push(&bytes) {
                let failed = event.is_err();
                yield event;
                if failed {
                    return;
                }
            }

            if decoder.is_done() {
                return;
            }
        }

        for event in decoder.finish() {
            yield event;
        }
    })
}
