// POST /chatbot/message/stream handler

use crate::models::SendMessageRequest;
use crate::relay::{detach, ChatRelay};
use crate::sse::encode_event;
use futures_util::stream::StreamExt;
use tracing::info;
use warp::Reply;

use super::ApiError;

pub async fn stream_message_handler(
    request: SendMessageRequest,
    relay: ChatRelay,
) -> Result<warp::reply::Response, warp::Rejection> {
    info!(conversation_id = %request.conversation_id, "POST /chatbot/message/stream");

    // Failing to save the user message is reported before any frame is sent
    let events = relay
        .process_message_stream(&request.conversation_id, &request.message)
        .await
        .map_err(|err| warp::reject::custom(ApiError::from(err)))?;

    let frames = detach(events).map(|event| encode_event(&event));

    let reply = warp::sse::reply(warp::sse::keep_alive().stream(frames));
    let reply = warp::reply::with_header(reply, "Cache-Control", "no-cache");
    Ok(warp::reply::with_header(reply, "Connection", "keep-alive").into_response())
}
