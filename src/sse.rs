use std::convert::Infallible;
use warp::sse::Event;

use crate::relay::RelayEvent;

/// Encode a relay event as one `data: <json>` frame
///
/// The payload goes through serde_json, so quotes and newlines in chunk text
/// are escaped and each frame stays on a single `data:` line. warp writes the
/// data right after the colon, so the separating space is part of the payload.
pub fn encode_event(event: &RelayEvent) -> Result<Event, Infallible> {
    let payload = match serde_json::to_string(event) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!(error = %e, "failed to encode stream event");
            serde_json::json!({
                "type": "error",
                "message": crate::relay::ERROR_MESSAGE,
                "error": e.to_string(),
            })
            .to_string()
        }
    };

    Ok(Event::default().data(format!(" {}", payload)))
}
